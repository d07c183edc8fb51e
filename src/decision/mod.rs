//! Decision engine module
//!
//! This module turns a caught failure into a retry-or-abort decision. The
//! pipeline runs an interceptor chain (which may short-circuit), falls back
//! to the configured rule set or the default policy, then lets interceptors
//! review the running verdict. Any verdict still undecided at the boundary
//! resolves to abort.

pub mod handler;
pub mod interceptor;
pub mod pattern;
pub mod rules;
pub mod verdict;

// Re-export main types for convenient access
pub use handler::{Builder, ConfigError, ExceptionHandler};
pub use interceptor::{Interceptor, InterceptorChain};
pub use pattern::{PatternInterceptor, VerdictPattern};
pub use rules::{default_policy, RuleSet};
pub use verdict::{Decision, Verdict};
