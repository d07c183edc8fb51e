//! Classification verdicts
//!
//! [`Verdict`] is the tri-state result of a single classification step;
//! `Undecided` is a legal intermediate and a legal interceptor answer.
//! [`Decision`] is the two-state result visible to the retry loop:
//! `Undecided` never escapes the orchestrator.

use serde::{Deserialize, Serialize};

/// Result of one classification attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The failure should be retried.
    Retry,
    /// The failure should not be retried.
    Abort,
    /// No applicable rule; the next stage of the pipeline decides.
    Undecided,
}

impl Verdict {
    /// Stable string form, matching the serde representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Verdict::Retry => "retry",
            Verdict::Abort => "abort",
            Verdict::Undecided => "undecided",
        }
    }

    /// Returns true unless the verdict is `Undecided`.
    pub const fn is_decided(self) -> bool {
        !matches!(self, Verdict::Undecided)
    }

    /// Resolves the verdict at the observable boundary: when nothing says
    /// retry, do not retry.
    pub const fn or_abort(self) -> Decision {
        match self {
            Verdict::Retry => Decision::Retry,
            Verdict::Abort | Verdict::Undecided => Decision::Abort,
        }
    }
}

/// Final decision handed to the retry loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Retry the operation.
    Retry,
    /// Give up and surface the failure.
    Abort,
}

impl Decision {
    /// Stable string form, matching the serde representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Decision::Retry => "retry",
            Decision::Abort => "abort",
        }
    }

    /// Returns true if the decision is to retry.
    pub const fn should_retry(self) -> bool {
        matches!(self, Decision::Retry)
    }
}

impl From<Decision> for Verdict {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Retry => Verdict::Retry,
            Decision::Abort => Verdict::Abort,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_decided() {
        assert!(Verdict::Retry.is_decided());
        assert!(Verdict::Abort.is_decided());
        assert!(!Verdict::Undecided.is_decided());
    }

    #[test]
    fn test_or_abort_resolves_undecided_to_abort() {
        assert_eq!(Verdict::Retry.or_abort(), Decision::Retry);
        assert_eq!(Verdict::Abort.or_abort(), Decision::Abort);
        assert_eq!(Verdict::Undecided.or_abort(), Decision::Abort);
    }

    #[test]
    fn test_should_retry() {
        assert!(Decision::Retry.should_retry());
        assert!(!Decision::Abort.should_retry());
    }

    #[test]
    fn test_decision_into_verdict() {
        assert_eq!(Verdict::from(Decision::Retry), Verdict::Retry);
        assert_eq!(Verdict::from(Decision::Abort), Verdict::Abort);
    }

    #[test]
    fn test_serde_representation() {
        assert_eq!(serde_json::to_string(&Verdict::Undecided).unwrap(), "\"undecided\"");
        assert_eq!(serde_json::to_string(&Decision::Retry).unwrap(), "\"retry\"");
        let verdict: Verdict = serde_json::from_str("\"abort\"").unwrap();
        assert_eq!(verdict, Verdict::Abort);
    }
}
