//! Version pattern compilation.
//!
//! A pattern is literal text mixed with typed placeholders:
//!
//! | Token | Matches                                          |
//! |-------|--------------------------------------------------|
//! | `%V`  | a single decimal version number                  |
//! | `%S`  | an alphanumeric subversion (`.` and `,` allowed) |
//! | `%G`  | an optional git distance suffix, `-12-gdeadbee`  |
//! | `%B`  | the build sequence number                        |
//! | `%W`  | any text                                         |
//!
//! Everything else is matched verbatim, and the service name plus `-` is
//! always prepended.

use regex::Regex;
use thiserror::Error;

/// Name of the capture group filled by `%B`.
pub const BUILD_GROUP: &str = "buildnum";

/// Deprecated version prefix applied when no explicit pattern is given.
pub const DEFAULT_PREFIX: &str = "0.1.";

const PLACEHOLDERS: [(&str, &str); 5] = [
    ("%V", "([0-9]+)"),
    ("%S", "([0-9a-zA-Z.,]+)"),
    ("%G", "(-[0-9]+-g[0-9a-z]+)?"),
    ("%B", "(?P<buildnum>[0-9]+)"),
    ("%W", "(.*)"),
];

/// The pattern did not produce a valid expression.
#[derive(Error, Debug)]
#[error("Error parsing version pattern `{template}`: {source}")]
pub struct CompileError {
    /// The template as supplied by the user.
    pub template: String,
    /// Underlying regex failure.
    #[source]
    pub source: regex::Error,
}

/// Result of testing one basename against a [`Matcher`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult<'h> {
    /// The basename does not conform to the pattern.
    NoMatch,
    /// The basename conforms; `build` holds the `%B` text when the pattern has one.
    Matched {
        /// Captured build text, `None` when the pattern has no `%B`.
        build: Option<&'h str>,
    },
}

impl MatchResult<'_> {
    /// Whether the basename matched.
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// A compiled, fully anchored version pattern.
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
    template: String,
    has_build: bool,
}

impl Matcher {
    /// Compile `template` for artifacts of `service`.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError`] if the expanded expression is rejected by the
    /// regex engine, e.g. when `%B` appears twice.
    ///
    /// # Example
    ///
    /// ```
    /// use s3repo_core::Matcher;
    ///
    /// let m = Matcher::compile("app", "%V.%S-%B").unwrap();
    /// assert!(m.is_match("app-1.2.3-44"));
    /// assert!(!m.is_match("app-1.2.3-44-extra"));
    /// ```
    pub fn compile(service: &str, template: &str) -> Result<Self, CompileError> {
        let expr = expand(service, template);
        let regex = Regex::new(&expr).map_err(|source| CompileError {
            template: template.to_string(),
            source,
        })?;
        let has_build = regex.capture_names().any(|name| name == Some(BUILD_GROUP));

        Ok(Self {
            regex,
            template: template.to_string(),
            has_build,
        })
    }

    /// The expanded regular expression.
    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    /// The template this matcher was compiled from.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Whether the pattern contains `%B`.
    pub fn has_build_number(&self) -> bool {
        self.has_build
    }

    /// Test a basename against the pattern.
    pub fn is_match(&self, basename: &str) -> bool {
        self.regex.is_match(basename)
    }

    /// Test a basename and extract the build text.
    pub fn evaluate<'h>(&self, basename: &'h str) -> MatchResult<'h> {
        let Some(caps) = self.regex.captures(basename) else {
            return MatchResult::NoMatch;
        };

        let build = self
            .has_build
            .then(|| caps.name(BUILD_GROUP).map_or("", |m| m.as_str()));

        MatchResult::Matched { build }
    }
}

impl std::fmt::Display for Matcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.regex.as_str())
    }
}

/// Compile a pattern; shorthand for [`Matcher::compile`].
///
/// # Errors
///
/// See [`Matcher::compile`].
pub fn compile(service: &str, template: &str) -> Result<Matcher, CompileError> {
    Matcher::compile(service, template)
}

/// Build the pattern implied by the deprecated version prefix.
///
/// # Example
///
/// ```
/// use s3repo_core::pattern::legacy_pattern;
///
/// assert_eq!(legacy_pattern("0.1."), "0.1..%W-%B");
/// ```
pub fn legacy_pattern(prefix: &str) -> String {
    format!("{prefix}.%W-%B")
}

/// Escape the literal text, then swap each placeholder for its sub-expression.
fn expand(service: &str, template: &str) -> String {
    let mut expr = regex::escape(&format!("{service}-{template}"));
    for (token, replacement) in PLACEHOLDERS {
        expr = expr.replace(token, replacement);
    }
    format!("^{expr}$")
}
