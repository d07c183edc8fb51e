//! Interceptor chain
//!
//! Interceptors are pluggable policies consulted before and after the rule
//! set. The chain runs two passes over the registered interceptors, in
//! registration order:
//!
//! 1. Independent pass: each interceptor's [`judge`](Interceptor::judge) sees
//!    the raw failure. The first decided answer short-circuits the whole
//!    decision; the rule set is never consulted.
//! 2. Review pass: only reached when every `judge` stayed undecided. The base
//!    verdict is computed, then each interceptor's
//!    [`review`](Interceptor::review) may replace the running verdict.
//!
//! The chain itself is a small state machine: `Pending` until pass 1 either
//! short-circuits or falls through to a `Resolved` review pass.

use std::fmt;

use tracing::trace;

use crate::taxonomy::Failure;

use super::verdict::Verdict;

/// A pluggable classification policy.
///
/// Interceptors must be side-effect-free with respect to classification
/// state. They may log or record metrics, but those effects must be
/// independently thread-safe: one handler is shared across concurrent retry
/// loops. Both methods default to `Undecided` (no opinion).
pub trait Interceptor: Send + Sync {
    /// Name used in trace output.
    fn name(&self) -> &str;

    /// Independent first opinion on the raw failure. A decided answer from
    /// the first interceptor to give one becomes the final verdict
    /// immediately.
    fn judge(&self, failure: &dyn Failure) -> Verdict {
        let _ = failure;
        Verdict::Undecided
    }

    /// Second opinion informed by the pipeline's running verdict. A decided
    /// answer replaces the running verdict for the rest of the chain.
    fn review(&self, failure: &dyn Failure, prior: Verdict) -> Verdict {
        let _ = (failure, prior);
        Verdict::Undecided
    }
}

/// Progress of a single chain run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ChainState {
    Pending,
    ShortCircuited(Verdict),
    Resolved(Verdict),
}

/// An ordered, immutable list of interceptors.
pub struct InterceptorChain {
    entries: Vec<Box<dyn Interceptor>>,
}

impl InterceptorChain {
    /// Creates a chain from interceptors in registration order.
    pub fn new(entries: Vec<Box<dyn Interceptor>>) -> Self {
        Self { entries }
    }

    /// Returns the number of registered interceptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no interceptors are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs both passes and returns the chain's verdict.
    ///
    /// `base` computes the rule-set (or default-policy) verdict and is only
    /// invoked when the independent pass produced no opinion.
    pub fn run(&self, failure: &dyn Failure, base: impl FnOnce() -> Verdict) -> Verdict {
        let state = match self.independent_pass(failure) {
            ChainState::Pending => self.review_pass(failure, base()),
            short_circuited => short_circuited,
        };
        match state {
            ChainState::ShortCircuited(verdict) | ChainState::Resolved(verdict) => verdict,
            ChainState::Pending => Verdict::Undecided,
        }
    }

    /// Pass 1: first decided opinion on the raw failure wins outright.
    fn independent_pass(&self, failure: &dyn Failure) -> ChainState {
        for interceptor in &self.entries {
            let verdict = interceptor.judge(failure);
            if verdict.is_decided() {
                trace!(
                    interceptor = interceptor.name(),
                    verdict = verdict.as_str(),
                    "interceptor short-circuited classification"
                );
                return ChainState::ShortCircuited(verdict);
            }
        }
        ChainState::Pending
    }

    /// Pass 2: each decided review replaces the running verdict in order.
    fn review_pass(&self, failure: &dyn Failure, base: Verdict) -> ChainState {
        let mut running = base;
        for interceptor in &self.entries {
            let verdict = interceptor.review(failure, running);
            if verdict.is_decided() {
                if verdict != running {
                    trace!(
                        interceptor = interceptor.name(),
                        prior = running.as_str(),
                        verdict = verdict.as_str(),
                        "interceptor overrode running verdict"
                    );
                }
                running = verdict;
            }
        }
        ChainState::Resolved(running)
    }
}

impl fmt::Debug for InterceptorChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|i| i.name()))
            .finish()
    }
}
