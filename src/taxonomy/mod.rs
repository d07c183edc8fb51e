//! Failure taxonomy module
//!
//! This module provides the failure-kind hierarchy the decision engine
//! classifies against. Kinds form a single-rooted subtype tree expressed
//! as explicit parent links, so no runtime type introspection is needed.

pub mod failure;
pub mod kind;

// Re-export main types for convenient access
pub use failure::{Failure, Fault};
pub use kind::{Ancestry, FailureKind, KindClass};
