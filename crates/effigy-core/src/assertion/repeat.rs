//! Repeat constraints: predicates over an observed call count.
//!
//! Each constraint carries a description fragment used verbatim in failure
//! reports ("exactly once", "at least twice", "never"), so the rendering is
//! part of the contract and pinned by golden tests.

use std::fmt;
use std::sync::Arc;

use crate::error::ConfigurationError;

type CountPredicate = Arc<dyn Fn(u64) -> bool + Send + Sync>;

/// A predicate over the number of matching calls observed.
#[derive(Clone)]
pub struct RepeatConstraint {
    kind: RepeatKind,
}

#[derive(Clone)]
enum RepeatKind {
    Exactly(u64),
    AtLeast(u64),
    AtMost(u64),
    Between(u64, u64),
    Custom {
        predicate: CountPredicate,
        description: String,
    },
    And(Box<RepeatKind>, Box<RepeatKind>),
    Or(Box<RepeatKind>, Box<RepeatKind>),
}

impl RepeatConstraint {
    /// Satisfied iff the count is exactly `n`.
    #[must_use]
    pub const fn exactly(n: u64) -> Self {
        Self {
            kind: RepeatKind::Exactly(n),
        }
    }

    /// Satisfied iff the count is `n` or more.
    #[must_use]
    pub const fn at_least(n: u64) -> Self {
        Self {
            kind: RepeatKind::AtLeast(n),
        }
    }

    /// Satisfied iff the count is `n` or fewer.
    #[must_use]
    pub const fn at_most(n: u64) -> Self {
        Self {
            kind: RepeatKind::AtMost(n),
        }
    }

    /// Satisfied iff `lower <= count <= upper`.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::InvalidRepeatRange`] when `lower > upper`.
    pub const fn between(lower: u64, upper: u64) -> Result<Self, ConfigurationError> {
        if lower > upper {
            return Err(ConfigurationError::InvalidRepeatRange { lower, upper });
        }
        Ok(Self {
            kind: RepeatKind::Between(lower, upper),
        })
    }

    /// Satisfied iff no matching call was observed.
    #[must_use]
    pub const fn never() -> Self {
        Self::exactly(0)
    }

    /// Satisfied iff exactly one matching call was observed.
    #[must_use]
    pub const fn once() -> Self {
        Self::exactly(1)
    }

    /// Satisfied iff exactly two matching calls were observed.
    #[must_use]
    pub const fn twice() -> Self {
        Self::exactly(2)
    }

    /// Wraps an arbitrary count predicate with an explicit description
    /// (e.g. `repeat > 2`).
    #[must_use]
    pub fn custom<F>(predicate: F, description: impl Into<String>) -> Self
    where
        F: Fn(u64) -> bool + Send + Sync + 'static,
    {
        Self {
            kind: RepeatKind::Custom {
                predicate: Arc::new(predicate),
                description: description.into(),
            },
        }
    }

    /// Conjunction of two constraints.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self {
            kind: RepeatKind::And(Box::new(self.kind), Box::new(other.kind)),
        }
    }

    /// Disjunction of two constraints.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self {
            kind: RepeatKind::Or(Box::new(self.kind), Box::new(other.kind)),
        }
    }

    /// Evaluates the constraint against an observed count.
    #[must_use]
    pub fn evaluate(&self, count: u64) -> bool {
        self.kind.evaluate(count)
    }
}

impl RepeatKind {
    fn evaluate(&self, count: u64) -> bool {
        match self {
            Self::Exactly(n) => count == *n,
            Self::AtLeast(n) => count >= *n,
            Self::AtMost(n) => count <= *n,
            Self::Between(lower, upper) => count >= *lower && count <= *upper,
            Self::Custom { predicate, .. } => predicate(count),
            Self::And(a, b) => a.evaluate(count) && b.evaluate(count),
            Self::Or(a, b) => a.evaluate(count) || b.evaluate(count),
        }
    }
}

fn times(n: u64) -> String {
    match n {
        1 => "once".to_string(),
        2 => "twice".to_string(),
        n => format!("{n} times"),
    }
}

impl fmt::Display for RepeatConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl fmt::Display for RepeatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exactly(0) => f.write_str("never"),
            Self::Exactly(n) => write!(f, "exactly {}", times(*n)),
            Self::AtLeast(n) => write!(f, "at least {}", times(*n)),
            Self::AtMost(n) => write!(f, "no more than {}", times(*n)),
            Self::Between(lower, upper) => write!(f, "between {lower} and {upper} times"),
            Self::Custom { description, .. } => f.write_str(description),
            Self::And(a, b) => write!(f, "({a} and {b})"),
            Self::Or(a, b) => write!(f, "({a} or {b})"),
        }
    }
}

impl fmt::Debug for RepeatConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RepeatConstraint({self})")
    }
}
