//! Retriage - failure classification and retry-decision engine
//!
//! Given a caught failure, decides whether it should be retried or aborted,
//! over a host-supplied taxonomy of failure kinds related by a subtype
//! hierarchy, with a pluggable interceptor chain that can short-circuit or
//! override the computed verdict. The retry loop itself (backoff, attempt
//! counting, sleeping) is the host's concern; this crate only answers
//! "retry or abort" for one failure at a time.
//!
//! ```
//! use retriage::decision::{Decision, ExceptionHandler};
//! use retriage::taxonomy::{FailureKind, Fault, KindClass};
//!
//! static FAILURE: FailureKind = FailureKind::root("failure", KindClass::Recoverable);
//! static IO: FailureKind = FailureKind::new("io", &FAILURE, KindClass::Recoverable);
//! static INTERRUPTED: FailureKind =
//!     FailureKind::new("interrupted", &IO, KindClass::Recoverable);
//!
//! // Retry all I/O failures, but abort on the interruption sub-kind: the
//! // more specific registration wins.
//! let handler = ExceptionHandler::builder()
//!     .retry_on([&IO])
//!     .abort_on([&INTERRUPTED])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(handler.decide(&Fault::new(&IO, "disk error")), Decision::Retry);
//! assert_eq!(handler.decide(&Fault::new(&INTERRUPTED, "ctrl-c")), Decision::Abort);
//! ```

pub mod decision;
pub mod logging;
pub mod taxonomy;
