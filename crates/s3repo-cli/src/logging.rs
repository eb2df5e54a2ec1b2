//! Log subscriber setup.
//!
//! Only errors are shown by default. `-v` turns on debug output for the
//! s3repo crates, and `RUST_LOG` overrides both.

use tracing_subscriber::EnvFilter;

/// Filter directives used when `RUST_LOG` is not set.
pub fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "error,s3repo_core=debug,s3repo_cli=debug"
    } else {
        "error"
    }
}

/// Install the global subscriber, writing to stderr.
pub fn init(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        for verbose in [false, true] {
            let directives = default_directives(verbose);
            assert!(directives.parse::<EnvFilter>().is_ok(), "{directives}");
        }
    }

    #[test]
    fn test_verbose_enables_debug() {
        assert!(default_directives(true).contains("s3repo_core=debug"));
        assert!(!default_directives(false).contains("debug"));
    }
}
