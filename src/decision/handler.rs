//! Exception handler orchestrator
//!
//! [`ExceptionHandler`] combines the rule set (or the default policy) with
//! the interceptor chain into a single [`decide`](ExceptionHandler::decide)
//! operation, and exposes the caller-safety verifier. Handlers are built once
//! via [`Builder`], are immutable afterwards, and are safe to share across
//! concurrent retry loops.

use std::collections::HashSet;
use std::sync::OnceLock;

use tracing::debug;

use crate::taxonomy::{Failure, FailureKind, KindClass};

use super::interceptor::{Interceptor, InterceptorChain};
use super::rules::{default_policy, RuleSet};
use super::verdict::{Decision, Verdict};

/// Configuration error, reported at build or verification time.
///
/// These are programmer errors: they are never deferred to a `decide` call
/// and never retried.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A kind was registered as both retryable and non-retryable.
    #[error("failure kind `{kind}` is registered as both retryable and non-retryable")]
    ConflictingKind {
        /// Name of the conflicting kind.
        kind: &'static str,
    },
    /// Under the default policy, an operation declared a fatal kind. Fatal
    /// kinds can never receive a decided verdict from the default policy.
    #[error("declared failure kind `{kind}` is fatal and cannot be classified by the default policy")]
    FatalKindDeclared {
        /// Name of the fatal kind.
        kind: &'static str,
    },
    /// Under explicit rules, an operation declared a kind that is not exactly
    /// registered. At runtime it could materialize as an unregistered
    /// descendant and fall through to the abort fallback unnoticed.
    #[error("declared failure kind `{kind}` is not registered as retryable or non-retryable")]
    UnregisteredKindDeclared {
        /// Name of the unregistered kind.
        kind: &'static str,
    },
}

/// Decides whether a caught failure should be retried or aborted.
///
/// ```
/// use retriage::decision::{Decision, ExceptionHandler};
/// use retriage::taxonomy::{FailureKind, Fault, KindClass};
///
/// static FAILURE: FailureKind = FailureKind::root("failure", KindClass::Recoverable);
/// static IO: FailureKind = FailureKind::new("io", &FAILURE, KindClass::Recoverable);
/// static RUNTIME: FailureKind = FailureKind::new("runtime", &FAILURE, KindClass::Defect);
///
/// let handler = ExceptionHandler::builder()
///     .retry_on([&IO])
///     .abort_on([&RUNTIME])
///     .build()
///     .unwrap();
///
/// assert_eq!(handler.decide(&Fault::new(&IO, "disk error")), Decision::Retry);
/// assert_eq!(handler.decide(&Fault::new(&RUNTIME, "bug")), Decision::Abort);
/// ```
#[derive(Debug)]
pub struct ExceptionHandler {
    rules: Option<RuleSet>,
    chain: InterceptorChain,
}

impl ExceptionHandler {
    /// Returns a builder for configuring a handler.
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// Returns the shared parameterless handler: no explicit rules (the
    /// default policy applies) and no interceptors.
    pub fn default_instance() -> &'static ExceptionHandler {
        static DEFAULT: OnceLock<ExceptionHandler> = OnceLock::new();
        DEFAULT.get_or_init(|| {
            Builder::default()
                .build()
                .expect("empty configuration cannot conflict")
        })
    }

    /// Decides whether `failure` should be retried.
    ///
    /// Runs the interceptor chain's independent pass; if no interceptor
    /// short-circuits, classifies the failure's kind against the configured
    /// rules (or the default policy) and runs the review pass seeded with
    /// that verdict. A verdict still undecided at this point resolves to
    /// [`Decision::Abort`].
    pub fn decide(&self, failure: &dyn Failure) -> Decision {
        let verdict = self
            .chain
            .run(failure, || self.base_verdict(failure.kind()));
        let decision = verdict.or_abort();
        debug!(
            kind = failure.kind().name(),
            verdict = verdict.as_str(),
            decision = decision.as_str(),
            "classified failure"
        );
        decision
    }

    /// Convenience form of [`decide`](Self::decide) for boolean call sites.
    pub fn should_retry(&self, failure: &dyn Failure) -> bool {
        self.decide(failure).should_retry()
    }

    /// Pre-flight check that every kind an operation declares it may raise
    /// is unambiguously classifiable by this handler.
    ///
    /// Under the default policy a declared kind must not be fatal. Under
    /// explicit rules it must be exactly registered: a declared ancestor of a
    /// registered kind is rejected, because at runtime it could materialize
    /// as some other, unregistered descendant. Fails fast so misconfiguration
    /// surfaces at setup time, not mid-retry-loop.
    pub fn verify_caller<I>(&self, declared: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = &'static FailureKind>,
    {
        for kind in declared {
            match &self.rules {
                Some(rules) => {
                    if !rules.is_registered(kind) {
                        return Err(ConfigError::UnregisteredKindDeclared { kind: kind.name() });
                    }
                }
                None => {
                    if kind.class() == KindClass::Fatal {
                        return Err(ConfigError::FatalKindDeclared { kind: kind.name() });
                    }
                }
            }
        }
        Ok(())
    }

    /// Returns the explicit rules, if any were configured.
    pub fn rules(&self) -> Option<&RuleSet> {
        self.rules.as_ref()
    }

    /// Returns the number of registered interceptors.
    pub fn interceptor_count(&self) -> usize {
        self.chain.len()
    }

    fn base_verdict(&self, kind: &'static FailureKind) -> Verdict {
        match &self.rules {
            Some(rules) => rules.classify(kind),
            None => default_policy(kind),
        }
    }
}

/// Builder for [`ExceptionHandler`].
///
/// Registration order of interceptors is preserved; it is the chain's
/// precedence order in both passes.
#[derive(Default)]
pub struct Builder {
    retryable: HashSet<&'static FailureKind>,
    non_retryable: HashSet<&'static FailureKind>,
    interceptors: Vec<Box<dyn Interceptor>>,
}

impl Builder {
    /// Registers kinds whose failures should be retried.
    pub fn retry_on<I>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = &'static FailureKind>,
    {
        self.retryable.extend(kinds);
        self
    }

    /// Registers kinds whose failures should abort the retry loop.
    pub fn abort_on<I>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = &'static FailureKind>,
    {
        self.non_retryable.extend(kinds);
        self
    }

    /// Appends an interceptor to the chain.
    pub fn interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Box::new(interceptor));
        self
    }

    /// Builds the handler.
    ///
    /// Fails with [`ConfigError::ConflictingKind`] if any kind was registered
    /// in both sets. With no registrations at all, the handler uses the
    /// default policy.
    pub fn build(self) -> Result<ExceptionHandler, ConfigError> {
        if let Some(kind) = self.retryable.intersection(&self.non_retryable).next() {
            return Err(ConfigError::ConflictingKind { kind: kind.name() });
        }
        let rules = if self.retryable.is_empty() && self.non_retryable.is_empty() {
            None
        } else {
            Some(RuleSet::new(self.retryable, self.non_retryable))
        };
        Ok(ExceptionHandler {
            rules,
            chain: InterceptorChain::new(self.interceptors),
        })
    }
}
