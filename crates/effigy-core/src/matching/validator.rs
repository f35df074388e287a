//! Single-argument validators and their combinators.
//!
//! A validator is a predicate over one [`ArgValue`] plus a renderable
//! description. The description is a contract: it appears verbatim in
//! assertion failure reports and must be deterministic, so golden-output
//! tests can pin it.
//!
//! Validators are a closed tagged-variant algebra (equality, predicate,
//! type-check, negation, conjunction, disjunction) rather than an open trait
//! hierarchy; arbitrary user logic enters through the predicate variant.
//! Validators are stateless and cheap to clone; composites evaluate their
//! operands left-to-right.
//!
//! Validating the absent value never panics: equality compares it against
//! the expected value, type checks consult their nullability flag, and typed
//! predicates reject it by failing the downcast.

use std::fmt;
use std::sync::Arc;

use crate::call::{ArgValue, TypeToken};

type ValuePredicate = Arc<dyn Fn(&ArgValue) -> bool + Send + Sync>;

/// A predicate over one argument value with a renderable description.
#[derive(Clone)]
pub struct ArgumentValidator {
    kind: ValidatorKind,
}

#[derive(Clone)]
enum ValidatorKind {
    Equality(ArgValue),
    Predicate {
        predicate: ValuePredicate,
        description: String,
    },
    TypeCheck {
        token: TypeToken,
        accepts_none: bool,
    },
    Not(Box<ValidatorKind>),
    And(Box<ValidatorKind>, Box<ValidatorKind>),
    Or(Box<ValidatorKind>, Box<ValidatorKind>),
}

impl ArgumentValidator {
    /// Valid iff the argument equals `expected`. The absent value is matched
    /// by [`equal_to_none`](Self::equal_to_none), never by this form.
    #[must_use]
    pub fn equal_to<T>(expected: T) -> Self
    where
        T: PartialEq + fmt::Debug + Send + Sync + 'static,
    {
        Self {
            kind: ValidatorKind::Equality(ArgValue::of(expected)),
        }
    }

    /// Valid iff the argument is the absent value.
    #[must_use]
    pub fn equal_to_none() -> Self {
        Self {
            kind: ValidatorKind::Equality(ArgValue::none()),
        }
    }

    /// Wraps a freeform predicate over the erased value with an explicit
    /// description.
    #[must_use]
    pub fn satisfies<F>(predicate: F, description: impl Into<String>) -> Self
    where
        F: Fn(&ArgValue) -> bool + Send + Sync + 'static,
    {
        Self {
            kind: ValidatorKind::Predicate {
                predicate: Arc::new(predicate),
                description: description.into(),
            },
        }
    }

    /// Wraps a typed predicate. Values of a different concrete type (and the
    /// absent value) fail the downcast and are invalid. The description
    /// defaults to `<predicate {TypeName}>`.
    #[must_use]
    pub fn satisfies_typed<T, F>(predicate: F) -> Self
    where
        T: 'static,
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let description = format!("<predicate {}>", TypeToken::of::<T>().display_name());
        Self::satisfies(
            move |value| value.downcast_ref::<T>().is_some_and(&predicate),
            description,
        )
    }

    /// Valid iff the argument is a `T`. The absent value is invalid;
    /// [`any_nullable`](Self::any_nullable) accepts it.
    #[must_use]
    pub fn any<T: 'static>() -> Self {
        Self {
            kind: ValidatorKind::TypeCheck {
                token: TypeToken::of::<T>(),
                accepts_none: false,
            },
        }
    }

    /// Valid iff the argument is a `T` or the absent value. Mirrors the
    /// nullable-type acceptance of type checks against nullable parameters.
    #[must_use]
    pub fn any_nullable<T: 'static>() -> Self {
        Self {
            kind: ValidatorKind::TypeCheck {
                token: TypeToken::of::<T>(),
                accepts_none: true,
            },
        }
    }

    /// Negation: valid iff `self` is invalid.
    #[must_use]
    pub fn negated(self) -> Self {
        Self {
            kind: ValidatorKind::Not(Box::new(self.kind)),
        }
    }

    /// Conjunction, evaluated left-to-right.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self {
            kind: ValidatorKind::And(Box::new(self.kind), Box::new(other.kind)),
        }
    }

    /// Disjunction, evaluated left-to-right.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self {
            kind: ValidatorKind::Or(Box::new(self.kind), Box::new(other.kind)),
        }
    }

    /// Applies the validator. Never panics, including for the absent value.
    #[must_use]
    pub fn is_valid(&self, value: &ArgValue) -> bool {
        self.kind.is_valid(value)
    }
}

impl ValidatorKind {
    fn is_valid(&self, value: &ArgValue) -> bool {
        match self {
            Self::Equality(expected) => expected == value,
            Self::Predicate { predicate, .. } => predicate(value),
            Self::TypeCheck {
                token,
                accepts_none,
            } => {
                if value.is_none() {
                    *accepts_none
                } else {
                    value.type_token() == Some(*token)
                }
            },
            Self::Not(inner) => !inner.is_valid(value),
            Self::And(a, b) => a.is_valid(value) && b.is_valid(value),
            Self::Or(a, b) => a.is_valid(value) || b.is_valid(value),
        }
    }
}

impl fmt::Display for ArgumentValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

impl fmt::Display for ValidatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equality(expected) => f.write_str(expected.rendered()),
            Self::Predicate { description, .. } => f.write_str(description),
            Self::TypeCheck { token, .. } => write!(f, "<Any {}>", token.display_name()),
            Self::Not(inner) => write!(f, "not {inner}"),
            Self::And(a, b) => write!(f, "({a} and {b})"),
            Self::Or(a, b) => write!(f, "({a} or {b})"),
        }
    }
}

impl fmt::Debug for ArgumentValidator {
    // The predicate closure has no useful debug form; render the description.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArgumentValidator({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_matches_value() {
        let v = ArgumentValidator::equal_to("x".to_string());
        assert!(v.is_valid(&ArgValue::of("x".to_string())));
        assert!(!v.is_valid(&ArgValue::of("y".to_string())));
        assert!(!v.is_valid(&ArgValue::none()));
        assert_eq!(v.to_string(), "\"x\"");
    }

    #[test]
    fn test_equality_none_matches_none() {
        let v = ArgumentValidator::equal_to_none();
        assert!(v.is_valid(&ArgValue::none()));
        assert!(!v.is_valid(&ArgValue::of(0u8)));
        assert_eq!(v.to_string(), "<null>");
    }

    #[test]
    fn test_typed_predicate() {
        let v = ArgumentValidator::satisfies_typed::<u32, _>(|n| *n > 10);
        assert!(v.is_valid(&ArgValue::of(11u32)));
        assert!(!v.is_valid(&ArgValue::of(10u32)));
        // Wrong type and the absent value fail the downcast, not the test
        // runner.
        assert!(!v.is_valid(&ArgValue::of("11".to_string())));
        assert!(!v.is_valid(&ArgValue::none()));
        assert_eq!(v.to_string(), "<predicate u32>");
    }

    #[test]
    fn test_custom_description() {
        let v = ArgumentValidator::satisfies(|_| true, "anything at all");
        assert_eq!(v.to_string(), "anything at all");
    }

    #[test]
    fn test_type_check() {
        let v = ArgumentValidator::any::<String>();
        assert!(v.is_valid(&ArgValue::of("x".to_string())));
        assert!(!v.is_valid(&ArgValue::of(1u32)));
        assert!(!v.is_valid(&ArgValue::none()));
        assert_eq!(v.to_string(), "<Any String>");
    }

    #[test]
    fn test_nullable_type_check_accepts_none() {
        let v = ArgumentValidator::any_nullable::<String>();
        assert!(v.is_valid(&ArgValue::of("x".to_string())));
        assert!(v.is_valid(&ArgValue::none()));
        assert!(!v.is_valid(&ArgValue::of(1u32)));
    }

    #[test]
    fn test_negation() {
        let v = ArgumentValidator::equal_to(1u32).negated();
        assert!(!v.is_valid(&ArgValue::of(1u32)));
        assert!(v.is_valid(&ArgValue::of(2u32)));
        assert_eq!(v.to_string(), "not 1");
    }

    #[test]
    fn test_conjunction_and_disjunction() {
        let gt = ArgumentValidator::satisfies_typed::<u32, _>(|n| *n > 2);
        let lt = ArgumentValidator::satisfies_typed::<u32, _>(|n| *n < 5);
        let both = gt.clone().and(lt.clone());
        assert!(both.is_valid(&ArgValue::of(3u32)));
        assert!(!both.is_valid(&ArgValue::of(7u32)));
        assert_eq!(both.to_string(), "(<predicate u32> and <predicate u32>)");

        let either = ArgumentValidator::equal_to(1u32).or(ArgumentValidator::equal_to(9u32));
        assert!(either.is_valid(&ArgValue::of(9u32)));
        assert!(!either.is_valid(&ArgValue::of(5u32)));
        assert_eq!(either.to_string(), "(1 or 9)");
    }

    #[test]
    fn test_composite_description_nesting() {
        let v = ArgumentValidator::any::<u32>()
            .and(ArgumentValidator::equal_to(4u32).negated());
        assert_eq!(v.to_string(), "(<Any u32> and not 4)");
    }
}
