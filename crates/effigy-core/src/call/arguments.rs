//! Dynamic argument values and the per-invocation argument list.
//!
//! Argument values cross the interception boundary type-erased. An
//! [`ArgValue`] captures the value itself together with everything the
//! matching and reporting machinery needs without knowing the concrete type:
//! type identity, a pre-rendered `Debug` form, and a value-equality closure.
//! The explicit absent value ([`ArgValue::none`]) models the source system's
//! null: every validator must treat it as a normal input, never a failure
//! condition.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use super::type_token::TypeToken;
use crate::error::ConfigurationError;

/// Maximum length of a rendered value in descriptions and reports. Longer
/// renderings are cut at a character boundary and marked with `…`.
pub const MAX_RENDERED_LEN: usize = 256;

/// Rendering used for the absent value in descriptions and reports.
pub const NULL_RENDERING: &str = "<null>";

type ErasedValue = Arc<dyn Any + Send + Sync>;
type ErasedEq = Arc<dyn Fn(&(dyn Any + Send + Sync)) -> bool + Send + Sync>;

/// A type-erased argument or return value.
///
/// Cheap to clone (the payload is shared). Equality compares the underlying
/// typed values; values of different concrete types are never equal, and
/// `none` equals only `none`.
#[derive(Clone)]
pub struct ArgValue {
    repr: Repr,
}

#[derive(Clone)]
enum Repr {
    None,
    Value {
        token: TypeToken,
        rendered: Arc<str>,
        value: ErasedValue,
        eq: ErasedEq,
    },
}

impl ArgValue {
    /// Wraps a concrete value.
    #[must_use]
    pub fn of<T>(value: T) -> Self
    where
        T: PartialEq + fmt::Debug + Send + Sync + 'static,
    {
        let shared = Arc::new(value);
        let rendered = truncate_rendering(&format!("{:?}", &*shared));
        let probe = Arc::clone(&shared);
        Self {
            repr: Repr::Value {
                token: TypeToken::of::<T>(),
                rendered: rendered.into(),
                value: shared,
                eq: Arc::new(move |other| other.downcast_ref::<T>() == Some(&*probe)),
            },
        }
    }

    /// The explicit absent value.
    #[must_use]
    pub const fn none() -> Self {
        Self { repr: Repr::None }
    }

    /// Returns `true` for the absent value.
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self.repr, Repr::None)
    }

    /// The type token of the wrapped value, or `None` for the absent value.
    #[must_use]
    pub fn type_token(&self) -> Option<TypeToken> {
        match &self.repr {
            Repr::None => None,
            Repr::Value { token, .. } => Some(*token),
        }
    }

    /// Borrows the wrapped value as `T`, if it is one.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match &self.repr {
            Repr::None => None,
            Repr::Value { value, .. } => value.downcast_ref::<T>(),
        }
    }

    /// The stable rendered form used in descriptions and reports.
    #[must_use]
    pub fn rendered(&self) -> &str {
        match &self.repr {
            Repr::None => NULL_RENDERING,
            Repr::Value { rendered, .. } => rendered,
        }
    }
}

impl PartialEq for ArgValue {
    fn eq(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::None, Repr::None) => true,
            (Repr::Value { eq, .. }, Repr::Value { value, .. }) => eq(value.as_ref()),
            _ => false,
        }
    }
}

impl fmt::Display for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.rendered())
    }
}

impl fmt::Debug for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.repr {
            Repr::None => f.write_str("ArgValue::none"),
            Repr::Value { token, rendered, .. } => f
                .debug_struct("ArgValue")
                .field("type", &token.display_name())
                .field("value", &rendered)
                .finish(),
        }
    }
}

fn truncate_rendering(raw: &str) -> String {
    if raw.len() <= MAX_RENDERED_LEN {
        return raw.to_string();
    }
    let mut cut = MAX_RENDERED_LEN;
    while !raw.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut out = raw[..cut].to_string();
    out.push('…');
    out
}

/// The ordered argument values of one invocation, paired with the member's
/// parameter names for by-name access.
#[derive(Debug, Clone, PartialEq)]
pub struct ArgumentList {
    names: Arc<[String]>,
    values: Vec<ArgValue>,
}

impl ArgumentList {
    /// The empty argument list.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            names: Arc::from(Vec::new()),
            values: Vec::new(),
        }
    }

    /// Pairs parameter names with values.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::ArgumentArityMismatch`] when the counts differ.
    pub fn new(
        names: impl IntoIterator<Item = impl Into<String>>,
        values: Vec<ArgValue>,
    ) -> Result<Self, ConfigurationError> {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.len() != values.len() {
            return Err(ConfigurationError::ArgumentArityMismatch {
                names: names.len(),
                values: values.len(),
            });
        }
        Ok(Self {
            names: names.into(),
            values,
        })
    }

    /// Builds the list for a member's declared parameters.
    ///
    /// # Errors
    ///
    /// [`ConfigurationError::ArgumentArityMismatch`] when the value count
    /// does not match the member's parameter count.
    pub fn for_member(
        member: &super::member::MemberRef,
        values: Vec<ArgValue>,
    ) -> Result<Self, ConfigurationError> {
        Self::new(
            member.parameters().iter().map(|p| p.name().to_string()),
            values,
        )
    }

    /// Number of arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when the invocation carried no arguments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The value at `position`, if present.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<&ArgValue> {
        self.values.get(position)
    }

    /// The value of the parameter called `name`, if present.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&ArgValue> {
        self.names
            .iter()
            .position(|n| n == name)
            .and_then(|i| self.values.get(i))
    }

    /// The values in positional order.
    #[must_use]
    pub fn values(&self) -> &[ArgValue] {
        &self.values
    }

    /// Renders `(a, b, c)` with each value's stable form.
    #[must_use]
    pub fn rendered(&self) -> String {
        let inner = self
            .values
            .iter()
            .map(ArgValue::rendered)
            .collect::<Vec<_>>()
            .join(", ");
        format!("({inner})")
    }
}
