//! Failure kind hierarchy
//!
//! A [`FailureKind`] identifies a category of failure. Kinds form a
//! single-rooted tree: every kind except the root has a parent, and the
//! [`ancestors`](FailureKind::ancestors) iterator walks from the kind itself
//! up to the root. Kinds are declared as `'static` values by the host
//! failure-reporting mechanism and are identified by name, so two statics
//! with the same name are the same kind.

use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Broad class of a failure kind, used by the default policy when no
/// explicit rules are configured.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindClass {
    /// Expected, checked failures an operation can recover from (I/O errors,
    /// timeouts, contended resources).
    Recoverable,
    /// Programming errors: invalid arguments, broken invariants, logic bugs.
    Defect,
    /// Process-fatal conditions (out of memory, stack exhaustion). Never
    /// silently retried or absorbed.
    Fatal,
}

impl KindClass {
    /// Stable string form, matching the serde representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            KindClass::Recoverable => "recoverable",
            KindClass::Defect => "defect",
            KindClass::Fatal => "fatal",
        }
    }
}

/// A category of failure, part of a single-rooted subtype hierarchy.
///
/// Declare kinds as `static` items so they can reference each other:
///
/// ```
/// use retriage::taxonomy::{FailureKind, KindClass};
///
/// static FAILURE: FailureKind = FailureKind::root("failure", KindClass::Recoverable);
/// static IO: FailureKind = FailureKind::new("io", &FAILURE, KindClass::Recoverable);
///
/// assert!(IO.is_subkind_of(&FAILURE));
/// ```
#[derive(Debug)]
pub struct FailureKind {
    name: &'static str,
    parent: Option<&'static FailureKind>,
    class: KindClass,
}

impl FailureKind {
    /// Creates the root kind of a taxonomy.
    pub const fn root(name: &'static str, class: KindClass) -> Self {
        Self {
            name,
            parent: None,
            class,
        }
    }

    /// Creates a kind as a sub-kind of `parent`.
    pub const fn new(
        name: &'static str,
        parent: &'static FailureKind,
        class: KindClass,
    ) -> Self {
        Self {
            name,
            parent: Some(parent),
            class,
        }
    }

    /// Returns the kind's name. Names identify kinds: keep them unique
    /// within a taxonomy.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the kind's class.
    pub fn class(&self) -> KindClass {
        self.class
    }

    /// Returns the direct parent, or `None` for the root.
    pub fn parent(&self) -> Option<&'static FailureKind> {
        self.parent
    }

    /// Walks the ancestor chain from this kind (inclusive) up to the root,
    /// most specific first.
    pub fn ancestors(&'static self) -> Ancestry {
        Ancestry { cursor: Some(self) }
    }

    /// Returns true if `other` appears anywhere in this kind's ancestor
    /// chain, including the kind itself.
    pub fn is_subkind_of(&'static self, other: &FailureKind) -> bool {
        self.ancestors().any(|kind| kind == other)
    }
}

impl PartialEq for FailureKind {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for FailureKind {}

impl Hash for FailureKind {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Iterator over a kind's ancestor chain, most specific first.
#[derive(Debug, Clone)]
pub struct Ancestry {
    cursor: Option<&'static FailureKind>,
}

impl Iterator for Ancestry {
    type Item = &'static FailureKind;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.cursor?;
        self.cursor = current.parent;
        Some(current)
    }
}
