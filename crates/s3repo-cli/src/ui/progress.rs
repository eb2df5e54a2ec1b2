//! Single-line download progress, e.g. `app:  42%`.

use std::io::{Write, stdout};
use std::sync::atomic::{AtomicU64, Ordering};

use crossterm::{
    QueueableCommand,
    cursor::MoveToColumn,
    style::Print,
    terminal::{Clear, ClearType},
};
use s3repo_core::ProgressSink;

const NOTHING_DRAWN: u64 = u64::MAX;

/// Renders progress for one service on the current terminal line.
#[derive(Debug)]
pub struct ConsoleProgress {
    label: String,
    enabled: bool,
    last_percent: AtomicU64,
}

impl ConsoleProgress {
    /// A renderer labelled with `label`; when disabled every event is ignored.
    pub fn new(label: &str, enabled: bool) -> Self {
        Self {
            label: label.to_string(),
            enabled,
            last_percent: AtomicU64::new(NOTHING_DRAWN),
        }
    }

    fn draw(&self, current: u64, total: Option<u64>) {
        if let Some(pct) = percent(current, total) {
            // Redraw only when the visible number changes
            if self.last_percent.swap(pct, Ordering::Relaxed) == pct {
                return;
            }
        }

        let line = format_progress(&self.label, current, total);
        let mut out = stdout();
        let _ = out
            .queue(MoveToColumn(0))
            .and_then(|o| o.queue(Clear(ClearType::CurrentLine)))
            .and_then(|o| o.queue(Print(line)))
            .and_then(|o| o.flush());
    }
}

impl ProgressSink for ConsoleProgress {
    fn started(&self, _key: &str, total: Option<u64>) {
        if self.enabled {
            self.draw(0, total);
        }
    }

    fn advanced(&self, _key: &str, current: u64, total: Option<u64>) {
        if self.enabled {
            self.draw(current, total);
        }
    }

    fn finished(&self, _key: &str, _bytes: u64) {
        if self.enabled {
            println!();
        }
    }
}

/// Percentage of `total`, or `None` when the size is unknown.
pub fn percent(current: u64, total: Option<u64>) -> Option<u64> {
    total
        .filter(|&t| t > 0)
        .map(|t| (current.saturating_mul(100) / t).min(100))
}

/// Format one progress line.
pub fn format_progress(label: &str, current: u64, total: Option<u64>) -> String {
    match percent(current, total) {
        Some(pct) => format!("{label}: {pct:3}%"),
        None => format!("{label}: {}", format_size(current)),
    }
}

/// Human-readable byte count.
pub fn format_size(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    let mb = kb / 1024.0;
    if mb >= 1024.0 {
        format!("{:.1} GB", mb / 1024.0)
    } else if kb >= 1024.0 {
        format!("{mb:.1} MB")
    } else if kb >= 1.0 {
        format!("{kb:.1} KB")
    } else {
        format!("{bytes} B")
    }
}
