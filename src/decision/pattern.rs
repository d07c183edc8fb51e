//! Pattern-based interceptor
//!
//! This module provides a ready-made [`Interceptor`] that matches the
//! rendered text of a failure against an ordered list of regex patterns and
//! forces the first matching pattern's verdict in the independent pass. It
//! covers hosts whose failure messages carry signal the kind hierarchy does
//! not, such as provider-specific status strings.

use regex::Regex;

use crate::taxonomy::Failure;

use super::interceptor::Interceptor;
use super::verdict::Verdict;

/// A regex pattern paired with the verdict to force when it matches.
#[derive(Debug)]
pub struct VerdictPattern {
    /// The compiled regex pattern.
    regex: Regex,
    /// The verdict to force when this pattern matches.
    verdict: Verdict,
    /// A human-readable description of what this pattern detects.
    description: String,
}

impl VerdictPattern {
    /// Creates a new verdict pattern.
    ///
    /// # Panics
    /// Panics if the regex pattern is invalid.
    pub fn new(pattern: &str, verdict: Verdict, description: impl Into<String>) -> Self {
        Self {
            regex: Regex::new(pattern).expect("Invalid regex pattern"),
            verdict,
            description: description.into(),
        }
    }

    /// Creates a new verdict pattern with a pre-compiled regex.
    pub fn with_regex(regex: Regex, verdict: Verdict, description: impl Into<String>) -> Self {
        Self {
            regex,
            verdict,
            description: description.into(),
        }
    }

    /// Returns the regex pattern.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Returns the verdict forced on match.
    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Checks if this pattern matches the given text.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Interceptor that classifies failures by their rendered message.
///
/// Patterns are checked in order; the first match wins. When no pattern
/// matches, the interceptor has no opinion and the rest of the pipeline
/// decides.
#[derive(Debug)]
pub struct PatternInterceptor {
    name: String,
    patterns: Vec<VerdictPattern>,
}

impl PatternInterceptor {
    /// Creates a pattern interceptor with the given patterns, in priority
    /// order.
    pub fn new(name: impl Into<String>, patterns: Vec<VerdictPattern>) -> Self {
        Self {
            name: name.into(),
            patterns,
        }
    }

    /// Returns the registered patterns in priority order.
    pub fn patterns(&self) -> &[VerdictPattern] {
        &self.patterns
    }
}

impl Interceptor for PatternInterceptor {
    fn name(&self) -> &str {
        &self.name
    }

    fn judge(&self, failure: &dyn Failure) -> Verdict {
        let text = failure.to_string();
        for pattern in &self.patterns {
            if pattern.matches(&text) {
                return pattern.verdict();
            }
        }
        Verdict::Undecided
    }
}
