//! Integration tests for the decision engine.
//!
//! This module tests the engine end-to-end: taxonomy matching with
//! specificity precedence, the default policy split, interceptor chain
//! short-circuit and review behavior, caller-safety verification, and the
//! builder's configuration checks.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use retriage::decision::{
    ConfigError, Decision, ExceptionHandler, Interceptor, PatternInterceptor, Verdict,
    VerdictPattern,
};
use retriage::taxonomy::{Failure, FailureKind, Fault, KindClass};

// A small host taxonomy: I/O failures with two sub-kinds, a defect branch,
// and a fatal kind.
static FAILURE: FailureKind = FailureKind::root("failure", KindClass::Recoverable);
static IO: FailureKind = FailureKind::new("io", &FAILURE, KindClass::Recoverable);
static FILE_NOT_FOUND: FailureKind =
    FailureKind::new("file_not_found", &IO, KindClass::Recoverable);
static CLOSED_BY_INTERRUPT: FailureKind =
    FailureKind::new("closed_by_interrupt", &IO, KindClass::Recoverable);
static INTERRUPTED: FailureKind = FailureKind::new("interrupted", &FAILURE, KindClass::Recoverable);
static RUNTIME: FailureKind = FailureKind::new("runtime", &FAILURE, KindClass::Defect);
static NULL_DEREF: FailureKind = FailureKind::new("null_deref", &RUNTIME, KindClass::Defect);
static ILLEGAL_ARGUMENT: FailureKind =
    FailureKind::new("illegal_argument", &RUNTIME, KindClass::Defect);
static OUT_OF_MEMORY: FailureKind = FailureKind::new("out_of_memory", &FAILURE, KindClass::Fatal);

fn fault(kind: &'static FailureKind) -> Fault {
    Fault::new(kind, kind.name().replace('_', " "))
}

// ============================================================================
// Taxonomy Matching Tests
// ============================================================================

#[test]
fn test_specificity_precedence_subkind_beats_ancestor() {
    let handler = ExceptionHandler::builder()
        .retry_on([&IO])
        .abort_on([&CLOSED_BY_INTERRUPT])
        .build()
        .expect("valid configuration");

    assert_eq!(handler.decide(&fault(&CLOSED_BY_INTERRUPT)), Decision::Abort);
    assert_eq!(handler.decide(&fault(&IO)), Decision::Retry);
    // Unregistered sub-kind inherits the nearest registered ancestor.
    assert_eq!(handler.decide(&fault(&FILE_NOT_FOUND)), Decision::Retry);
}

#[test]
fn test_unmatched_kind_aborts() {
    let handler = ExceptionHandler::builder()
        .retry_on([&IO])
        .build()
        .expect("valid configuration");

    assert_eq!(handler.decide(&fault(&RUNTIME)), Decision::Abort);
    assert_eq!(handler.decide(&fault(&INTERRUPTED)), Decision::Abort);
    assert!(!handler.should_retry(&fault(&NULL_DEREF)));
}

#[test]
fn test_mixed_registration_scenario() {
    // retryable = {io}, non-retryable = {interrupted, runtime,
    // closed_by_interrupt}: the interrupt-carrying I/O sub-kind aborts even
    // though its ancestor retries.
    let handler = ExceptionHandler::builder()
        .retry_on([&IO, &NULL_DEREF])
        .abort_on([&RUNTIME, &CLOSED_BY_INTERRUPT, &INTERRUPTED])
        .build()
        .expect("valid configuration");

    assert!(handler.should_retry(&fault(&IO)));
    assert!(!handler.should_retry(&fault(&CLOSED_BY_INTERRUPT)));
    assert!(!handler.should_retry(&fault(&INTERRUPTED)));
    assert!(!handler.should_retry(&fault(&RUNTIME)));
    assert!(handler.should_retry(&fault(&NULL_DEREF)));
}

// ============================================================================
// Default Policy Tests
// ============================================================================

#[test]
fn test_default_policy_split() {
    let handler = ExceptionHandler::default_instance();

    assert_eq!(handler.decide(&fault(&IO)), Decision::Retry);
    assert_eq!(handler.decide(&fault(&FILE_NOT_FOUND)), Decision::Retry);
    assert_eq!(handler.decide(&fault(&INTERRUPTED)), Decision::Retry);
    assert_eq!(handler.decide(&fault(&RUNTIME)), Decision::Abort);
    assert_eq!(handler.decide(&fault(&NULL_DEREF)), Decision::Abort);
}

#[test]
fn test_default_policy_never_silently_retries_fatal() {
    let handler = ExceptionHandler::default_instance();

    // Undecided resolves to abort at the boundary, and verification rejects
    // operations that can raise the kind at all.
    assert_eq!(handler.decide(&fault(&OUT_OF_MEMORY)), Decision::Abort);
    assert!(matches!(
        handler.verify_caller([&OUT_OF_MEMORY]),
        Err(ConfigError::FatalKindDeclared { .. })
    ));
}

// ============================================================================
// Interceptor Chain Tests
// ============================================================================

/// Interceptor whose first opinion is toggled externally; its review inverts
/// whatever verdict it is handed.
struct Toggled {
    first_opinion: Arc<AtomicU8>,
}

const OPINION_NONE: u8 = 0;
const OPINION_RETRY: u8 = 1;
const OPINION_ABORT: u8 = 2;

impl Toggled {
    fn new() -> (Self, Arc<AtomicU8>) {
        let opinion = Arc::new(AtomicU8::new(OPINION_NONE));
        (
            Self {
                first_opinion: Arc::clone(&opinion),
            },
            opinion,
        )
    }
}

impl Interceptor for Toggled {
    fn name(&self) -> &str {
        "toggled"
    }

    fn judge(&self, _failure: &dyn Failure) -> Verdict {
        match self.first_opinion.load(Ordering::SeqCst) {
            OPINION_RETRY => Verdict::Retry,
            OPINION_ABORT => Verdict::Abort,
            _ => Verdict::Undecided,
        }
    }

    fn review(&self, _failure: &dyn Failure, prior: Verdict) -> Verdict {
        match prior {
            Verdict::Abort => Verdict::Retry,
            _ => Verdict::Abort,
        }
    }
}

#[test]
fn test_judge_short_circuits_over_any_taxonomy() {
    let (interceptor, opinion) = Toggled::new();
    let handler = ExceptionHandler::builder()
        .retry_on([&IO, &NULL_DEREF])
        .abort_on([&RUNTIME, &CLOSED_BY_INTERRUPT, &INTERRUPTED])
        .interceptor(interceptor)
        .build()
        .expect("valid configuration");

    opinion.store(OPINION_RETRY, Ordering::SeqCst);
    for kind in [&IO, &CLOSED_BY_INTERRUPT, &INTERRUPTED, &RUNTIME, &NULL_DEREF] {
        assert!(handler.should_retry(&fault(kind)), "kind {kind}");
    }

    opinion.store(OPINION_ABORT, Ordering::SeqCst);
    for kind in [&IO, &CLOSED_BY_INTERRUPT, &INTERRUPTED, &RUNTIME, &NULL_DEREF] {
        assert!(!handler.should_retry(&fault(kind)), "kind {kind}");
    }
}

#[test]
fn test_review_inverts_taxonomy_verdict() {
    let (interceptor, opinion) = Toggled::new();
    let handler = ExceptionHandler::builder()
        .retry_on([&IO, &NULL_DEREF])
        .abort_on([&RUNTIME, &CLOSED_BY_INTERRUPT, &INTERRUPTED])
        .interceptor(interceptor)
        .build()
        .expect("valid configuration");

    // No first opinion: the review pass inverts whatever the taxonomy said.
    opinion.store(OPINION_NONE, Ordering::SeqCst);
    assert!(!handler.should_retry(&fault(&IO)));
    assert!(handler.should_retry(&fault(&CLOSED_BY_INTERRUPT)));
    assert!(handler.should_retry(&fault(&INTERRUPTED)));
    assert!(handler.should_retry(&fault(&RUNTIME)));
    assert!(!handler.should_retry(&fault(&NULL_DEREF)));
}

#[test]
fn test_two_inverting_reviews_cancel_out() {
    let (first, first_opinion) = Toggled::new();
    let (second, second_opinion) = Toggled::new();
    first_opinion.store(OPINION_NONE, Ordering::SeqCst);
    second_opinion.store(OPINION_NONE, Ordering::SeqCst);

    let handler = ExceptionHandler::builder()
        .retry_on([&IO])
        .abort_on([&RUNTIME])
        .interceptor(first)
        .interceptor(second)
        .build()
        .expect("valid configuration");

    assert!(handler.should_retry(&fault(&IO)));
    assert!(!handler.should_retry(&fault(&RUNTIME)));
}

#[test]
fn test_pattern_interceptor_end_to_end() {
    let handler = ExceptionHandler::builder()
        .retry_on([&IO])
        .interceptor(PatternInterceptor::new(
            "maintenance-window",
            vec![VerdictPattern::new(
                r"(?i)maintenance",
                Verdict::Retry,
                "Scheduled maintenance notice",
            )],
        ))
        .build()
        .expect("valid configuration");

    // Unregistered kind, but the message matches: the pattern forces a retry.
    let during_maintenance = Fault::new(&RUNTIME, "service down for maintenance");
    assert_eq!(handler.decide(&during_maintenance), Decision::Retry);

    // No pattern match: the taxonomy decides as usual.
    assert_eq!(handler.decide(&fault(&RUNTIME)), Decision::Abort);
    assert_eq!(handler.decide(&fault(&IO)), Decision::Retry);
}

// ============================================================================
// Caller-Safety Verification Tests
// ============================================================================

#[test]
fn test_verify_caller_default_policy() {
    let handler = ExceptionHandler::default_instance();

    // Recoverable and defect kinds are classifiable; only fatal is rejected.
    assert!(handler.verify_caller([&IO, &INTERRUPTED]).is_ok());
    assert!(handler.verify_caller([&FILE_NOT_FOUND]).is_ok());
    assert!(handler.verify_caller([&ILLEGAL_ARGUMENT]).is_ok());
    assert!(handler.verify_caller([&NULL_DEREF]).is_ok());
    assert!(handler.verify_caller([&OUT_OF_MEMORY]).is_err());
    assert!(handler.verify_caller([&IO, &OUT_OF_MEMORY]).is_err());
}

#[test]
fn test_verify_caller_explicit_rules_require_exact_registration() {
    let handler = ExceptionHandler::builder()
        .retry_on([&FILE_NOT_FOUND, &NULL_DEREF])
        .build()
        .expect("valid configuration");

    // Declared ancestors of registered kinds are not good enough: at runtime
    // they could materialize as some other, unregistered descendant.
    assert!(handler.verify_caller([&IO, &INTERRUPTED]).is_err());
    assert!(handler.verify_caller([&FILE_NOT_FOUND]).is_ok());
    assert!(handler.verify_caller([&ILLEGAL_ARGUMENT]).is_err());
    assert!(handler.verify_caller([&NULL_DEREF]).is_ok());
    assert!(handler.verify_caller([&OUT_OF_MEMORY]).is_err());
}

#[test]
fn test_verify_caller_abort_registration_also_counts() {
    let handler = ExceptionHandler::builder()
        .retry_on([&IO])
        .abort_on([&INTERRUPTED])
        .build()
        .expect("valid configuration");

    assert!(handler.verify_caller([&IO, &INTERRUPTED]).is_ok());
    assert!(handler.verify_caller([&FILE_NOT_FOUND]).is_err());
}

#[test]
fn test_verify_caller_empty_declaration_passes() {
    let handler = ExceptionHandler::builder()
        .retry_on([&IO])
        .build()
        .expect("valid configuration");

    assert!(handler.verify_caller([]).is_ok());
    assert!(ExceptionHandler::default_instance().verify_caller([]).is_ok());
}

// ============================================================================
// Builder Configuration Tests
// ============================================================================

#[test]
fn test_builder_rejects_kind_in_both_sets() {
    let result = ExceptionHandler::builder()
        .retry_on([&IO, &FILE_NOT_FOUND])
        .abort_on([&FILE_NOT_FOUND])
        .build();

    assert_eq!(
        result.unwrap_err(),
        ConfigError::ConflictingKind {
            kind: "file_not_found"
        }
    );
}

#[test]
fn test_builder_accepts_sibling_registrations() {
    let handler = ExceptionHandler::builder()
        .retry_on([&FILE_NOT_FOUND])
        .abort_on([&CLOSED_BY_INTERRUPT])
        .build()
        .expect("siblings under the same ancestor are not a conflict");

    assert!(handler.should_retry(&fault(&FILE_NOT_FOUND)));
    assert!(!handler.should_retry(&fault(&CLOSED_BY_INTERRUPT)));
}

#[test]
fn test_handler_is_shareable_across_threads() {
    let handler = Arc::new(
        ExceptionHandler::builder()
            .retry_on([&IO])
            .abort_on([&CLOSED_BY_INTERRUPT])
            .build()
            .expect("valid configuration"),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let handler = Arc::clone(&handler);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    assert!(handler.should_retry(&fault(&IO)));
                    assert!(!handler.should_retry(&fault(&CLOSED_BY_INTERRUPT)));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("worker thread panicked");
    }
}
