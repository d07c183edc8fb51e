//! Failure values
//!
//! The engine classifies anything implementing [`Failure`]: a caught failure
//! value that knows its [`FailureKind`]. [`Fault`] is a minimal concrete
//! implementation for hosts that do not have their own error type to adapt.

use std::fmt;

use super::kind::FailureKind;

/// A caught failure with an associated kind.
///
/// `Display` should render the failure's message; built-in interceptors that
/// match on message text (see `decision::PatternInterceptor`) use it.
pub trait Failure: fmt::Debug + fmt::Display {
    /// The kind of this failure, used for taxonomy matching.
    fn kind(&self) -> &'static FailureKind;
}

/// A minimal concrete failure: a kind plus a human-readable message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fault {
    kind: &'static FailureKind,
    message: String,
}

impl Fault {
    /// Creates a new fault of the given kind.
    pub fn new(kind: &'static FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Returns the fault's message.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Failure for Fault {
    fn kind(&self) -> &'static FailureKind {
        self.kind
    }
}

impl std::error::Error for Fault {}
