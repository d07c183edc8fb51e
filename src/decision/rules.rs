//! Taxonomy matching rules
//!
//! [`RuleSet`] holds the explicitly registered retryable and non-retryable
//! kinds and implements the ancestor-walk matcher: the most specific
//! registration along a failure kind's ancestor chain wins, regardless of
//! which set it is in. [`default_policy`] is the zero-configuration fallback
//! used by handlers built without explicit rules.

use std::collections::HashSet;

use crate::taxonomy::{FailureKind, KindClass};

use super::verdict::Verdict;

/// Explicit classification rules: which kinds retry, which abort.
///
/// Registrations do not automatically cover sub-kinds; sub-kind matching is
/// computed at classification time by walking the ancestor chain. That is
/// what lets a narrow registration override a broad one: register `io` as
/// retryable and `closed_by_interrupt` (a sub-kind of `io`) as non-retryable,
/// and the narrow abort registration wins for interrupt failures.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    retryable: HashSet<&'static FailureKind>,
    non_retryable: HashSet<&'static FailureKind>,
}

impl RuleSet {
    /// Creates a rule set from the two registration sets. Disjointness is
    /// enforced by the handler builder before this is called.
    pub(crate) fn new(
        retryable: HashSet<&'static FailureKind>,
        non_retryable: HashSet<&'static FailureKind>,
    ) -> Self {
        Self {
            retryable,
            non_retryable,
        }
    }

    /// Returns true if neither set has any registration.
    pub fn is_empty(&self) -> bool {
        self.retryable.is_empty() && self.non_retryable.is_empty()
    }

    /// Returns true if `kind` is exactly registered in either set.
    ///
    /// Exact means the kind itself: being an ancestor or a descendant of a
    /// registered kind does not count. Caller-safety verification depends on
    /// this distinction.
    pub fn is_registered(&self, kind: &'static FailureKind) -> bool {
        self.retryable.contains(kind) || self.non_retryable.contains(kind)
    }

    /// Classifies a failure kind against the registered sets.
    ///
    /// Walks the ancestor chain from `kind` itself up to the root and returns
    /// the verdict of the first level registered in either set; specificity
    /// strictly dominates. Returns `Undecided` when no level is registered.
    ///
    /// The builder rejects a kind registered in both sets, but the check at
    /// each level is still ordered non-retryable first, so the tie-break is
    /// deterministic: abort wins.
    pub fn classify(&self, kind: &'static FailureKind) -> Verdict {
        for ancestor in kind.ancestors() {
            if self.non_retryable.contains(ancestor) {
                return Verdict::Abort;
            }
            if self.retryable.contains(ancestor) {
                return Verdict::Retry;
            }
        }
        Verdict::Undecided
    }
}

/// The zero-configuration classification rule.
///
/// Recoverable-class kinds retry, defect-class kinds abort, and fatal-class
/// kinds stay `Undecided`: a fatal failure must never be silently retried or
/// absorbed, so the default policy refuses to classify it and caller-safety
/// verification rejects operations that can raise one.
pub fn default_policy(kind: &'static FailureKind) -> Verdict {
    match kind.class() {
        KindClass::Recoverable => Verdict::Retry,
        KindClass::Defect => Verdict::Abort,
        KindClass::Fatal => Verdict::Undecided,
    }
}
