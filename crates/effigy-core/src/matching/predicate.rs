//! Whole-argument-list predicates.
//!
//! An [`ArgumentsPredicate`] decides whether an invocation's full argument
//! list satisfies a rule or query. Positional predicates hold one validator
//! per declared parameter; freeform predicates wrap a single condition over
//! the whole list; the default form matches unconditionally and backs the
//! catch-all rule.
//!
//! A positional length mismatch is a matching failure, never an error: a
//! rule built for `create(name)` is simply not applicable to `create()`.

use std::fmt;
use std::sync::Arc;

use super::validator::ArgumentValidator;
use crate::call::{ArgumentList, MemberRef};
use crate::error::ConfigurationError;

type ListPredicate = Arc<dyn Fn(&ArgumentList) -> bool + Send + Sync>;

/// A predicate over an invocation's full argument list.
#[derive(Clone)]
pub struct ArgumentsPredicate {
    kind: ArgumentsKind,
}

#[derive(Clone)]
enum ArgumentsKind {
    Any,
    Positional(Vec<ArgumentValidator>),
    Freeform {
        predicate: ListPredicate,
        description: String,
    },
}

impl ArgumentsPredicate {
    /// Matches any argument list. This is the predicate of the catch-all
    /// rule and of unfiltered queries.
    #[must_use]
    pub fn any() -> Self {
        Self {
            kind: ArgumentsKind::Any,
        }
    }

    /// One validator per parameter, in declaration order. Matches iff the
    /// list has exactly this arity and every validator accepts its value.
    #[must_use]
    pub fn positional(validators: Vec<ArgumentValidator>) -> Self {
        Self {
            kind: ArgumentsKind::Positional(validators),
        }
    }

    /// Positional form validated against a member's declared parameter
    /// count.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::ValidatorCountMismatch`] when the counts
    /// differ; this is the canonical malformed-configuration case.
    pub fn positional_for(
        member: &MemberRef,
        validators: Vec<ArgumentValidator>,
    ) -> Result<Self, ConfigurationError> {
        if validators.len() != member.parameters().len() {
            return Err(ConfigurationError::ValidatorCountMismatch {
                member: member.qualified_name(),
                validators: validators.len(),
                parameters: member.parameters().len(),
            });
        }
        Ok(Self::positional(validators))
    }

    /// A single condition over the whole ordered argument collection, with
    /// an explicit description for reports.
    #[must_use]
    pub fn freeform<F>(predicate: F, description: impl Into<String>) -> Self
    where
        F: Fn(&ArgumentList) -> bool + Send + Sync + 'static,
    {
        Self {
            kind: ArgumentsKind::Freeform {
                predicate: Arc::new(predicate),
                description: description.into(),
            },
        }
    }

    /// Applies the predicate.
    #[must_use]
    pub fn matches(&self, arguments: &ArgumentList) -> bool {
        match &self.kind {
            ArgumentsKind::Any => true,
            ArgumentsKind::Positional(validators) => {
                validators.len() == arguments.len()
                    && validators
                        .iter()
                        .zip(arguments.values())
                        .all(|(v, a)| v.is_valid(a))
            },
            ArgumentsKind::Freeform { predicate, .. } => predicate(arguments),
        }
    }
}

impl fmt::Display for ArgumentsPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ArgumentsKind::Any => f.write_str("(…)"),
            ArgumentsKind::Positional(validators) => {
                let inner = validators
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "({inner})")
            },
            ArgumentsKind::Freeform { description, .. } => f.write_str(description),
        }
    }
}

impl fmt::Debug for ArgumentsPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArgumentsPredicate({self})")
    }
}
