//! The predicate type and its boolean combinators.

use std::fmt;
use std::sync::Arc;

/// A boolean test over a single column's cell value.
///
/// Predicates are deliberately concrete over `&str`: cell values are strings
/// and nothing else, so no generic parameter pretends otherwise. A predicate
/// is immutable once constructed; cloning is cheap (shared function).
#[derive(Clone)]
pub struct Predicate {
    test: Arc<dyn Fn(&str) -> bool + Send + Sync>,
}

impl Predicate {
    pub fn new(test: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self {
            test: Arc::new(test),
        }
    }

    pub fn test(&self, value: &str) -> bool {
        (self.test)(value)
    }

    /// Both this predicate and `other` must accept the value.
    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::new(move |value| self.test(value) && other.test(value))
    }

    /// Either this predicate or `other` must accept the value.
    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::new(move |value| self.test(value) || other.test(value))
    }

    /// Accepts exactly the values this predicate rejects.
    pub fn negate(self) -> Predicate {
        Predicate::new(move |value| !self.test(value))
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").finish_non_exhaustive()
    }
}
