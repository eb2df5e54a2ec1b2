//! Output formatting for `s3repo list`

use std::io::{self, Write};

use s3repo_core::{CandidateKey, SelectionOutcome, Winner};
use serde::Serialize;

/// Print one line per compatible key; the winner is prefixed with `*`.
pub fn write_listing(out: &mut dyn Write, outcome: &SelectionOutcome) -> io::Result<()> {
    for candidate in &outcome.compatible {
        let marker = if outcome.is_winner(candidate) { '*' } else { ' ' };
        writeln!(out, "{marker}{}", candidate.key)?;
    }
    Ok(())
}

/// JSON shape of `s3repo list --json`.
#[derive(Debug, Serialize)]
pub struct ListReport<'a> {
    pub service: &'a str,
    pub pattern: &'a str,
    pub winner: Option<&'a Winner>,
    pub compatible: &'a [CandidateKey],
}

/// Print the selection as pretty JSON.
pub fn write_json(
    out: &mut dyn Write,
    service: &str,
    pattern: &str,
    outcome: &SelectionOutcome,
) -> io::Result<()> {
    let report = ListReport {
        service,
        pattern,
        winner: outcome.winner(),
        compatible: &outcome.compatible,
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)
}
