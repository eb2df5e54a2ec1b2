//! Artifact selection.
//!
//! Runs a listing through a compiled [`Matcher`] and settles on one winner:
//!
//! 1. The compatible key with the highest `%B` build number. Comparison is
//!    strictly greater-than, so the first key to reach a build number keeps it.
//! 2. Otherwise the last compatible key without a build number.
//! 3. Otherwise the most recently modified key of the whole listing, whether
//!    or not it matched. Ties go to the earlier key.

use serde::Serialize;

use crate::pattern::{MatchResult, Matcher};
use crate::reporter::{NullReporter, SelectionObserver};
use crate::types::CandidateKey;

/// Which rule picked the winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum WinReason {
    /// Highest build number among compatible keys.
    BuildNumber {
        /// The winning build number.
        build: u64,
    },
    /// Compatible key without a build number, and no numbered key beat it.
    Unnumbered,
    /// Latest last-modified time across the full listing.
    MostRecent,
}

/// The selected artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Winner {
    /// The winning key.
    pub key: CandidateKey,
    /// Why it won.
    pub reason: WinReason,
}

/// Compatible keys plus the winner of one selection pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionOutcome {
    /// Keys whose basename matched, in listing order.
    pub compatible: Vec<CandidateKey>,
    /// The single selected key, `None` only when the listing was empty.
    pub winner: Option<Winner>,
}

impl SelectionOutcome {
    /// The winner, if any.
    pub fn winner(&self) -> Option<&Winner> {
        self.winner.as_ref()
    }

    /// The winning key string, if any.
    pub fn winner_key(&self) -> Option<&str> {
        self.winner.as_ref().map(|w| w.key.key.as_str())
    }

    /// Whether `candidate` is the winner.
    pub fn is_winner(&self, candidate: &CandidateKey) -> bool {
        self.winner.as_ref().is_some_and(|w| &w.key == candidate)
    }

    /// True when there was nothing to select from.
    pub fn is_empty(&self) -> bool {
        self.winner.is_none()
    }

    /// The winner, or [`crate::Error::NoArtifacts`] for `service`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::NoArtifacts`] when no winner was selected.
    pub fn require_winner(&self, service: &str) -> crate::Result<&Winner> {
        self.winner.as_ref().ok_or_else(|| crate::Error::NoArtifacts {
            service: service.to_string(),
        })
    }
}

/// Select the winner among `candidates` without diagnostics.
pub fn select(matcher: &Matcher, candidates: &[CandidateKey]) -> SelectionOutcome {
    select_with(matcher, candidates, &NullReporter)
}

/// Select the winner among `candidates`, reporting each step to `observer`.
pub fn select_with(
    matcher: &Matcher,
    candidates: &[CandidateKey],
    observer: &dyn SelectionObserver,
) -> SelectionOutcome {
    let mut compatible = Vec::new();
    let mut max_build: u64 = 0;
    let mut winner: Option<Winner> = None;

    for candidate in candidates {
        let basename = candidate.basename();
        let result = matcher.evaluate(basename);
        observer.candidate_checked(&candidate.key, basename, result.is_match());

        let MatchResult::Matched { build } = result else {
            continue;
        };
        compatible.push(candidate.clone());

        match build.filter(|text| !text.is_empty()) {
            None => {
                // Later unnumbered keys replace earlier ones until a positive
                // build number has been seen.
                if max_build == 0 {
                    winner = Some(Winner {
                        key: candidate.clone(),
                        reason: WinReason::Unnumbered,
                    });
                }
            }
            Some(text) => match text.parse::<u64>() {
                Ok(build) => {
                    observer.build_found(&candidate.key, build);
                    if build > max_build {
                        max_build = build;
                        winner = Some(Winner {
                            key: candidate.clone(),
                            reason: WinReason::BuildNumber { build },
                        });
                    }
                }
                Err(_) => observer.build_unparsable(&candidate.key, text),
            },
        }
    }

    if winner.is_none() && !candidates.is_empty() {
        observer.recency_fallback(candidates.len());
        winner = most_recent(candidates).map(|key| Winner {
            key: key.clone(),
            reason: WinReason::MostRecent,
        });
    }

    if let Some(w) = &winner {
        observer.winner_selected(w);
    }

    SelectionOutcome { compatible, winner }
}

/// Latest `last_modified`; on ties the earliest entry wins.
fn most_recent(candidates: &[CandidateKey]) -> Option<&CandidateKey> {
    let mut best: Option<&CandidateKey> = None;
    for candidate in candidates {
        match best {
            Some(current) if candidate.last_modified <= current.last_modified => {}
            _ => best = Some(candidate),
        }
    }
    best
}
