//! Member references: the identity of a faked method, property accessor, or
//! event accessor.
//!
//! A [`MemberRef`] is captured once from an invocation (or built by the
//! configuration layer from a resolved call expression) and is immutable
//! afterwards. Two references are equal when they have the same declaring
//! type, name, kind, and parameter types; the return type is not part of the
//! signature, matching overload-resolution semantics.

use std::fmt;
use std::hash::{Hash, Hasher};

use super::type_token::TypeToken;
use crate::error::ConfigurationError;

/// Maximum number of parameters a member may declare.
pub const MAX_PARAMETERS: usize = 32;

/// The kind of member an invocation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MemberKind {
    /// A regular method.
    Method,
    /// A property getter.
    PropertyGetter,
    /// A property setter.
    PropertySetter,
    /// An event subscription accessor.
    EventAdd,
    /// An event unsubscription accessor.
    EventRemove,
}

impl MemberKind {
    /// Stable lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Method => "method",
            Self::PropertyGetter => "property_getter",
            Self::PropertySetter => "property_setter",
            Self::EventAdd => "event_add",
            Self::EventRemove => "event_remove",
        }
    }
}

impl fmt::Display for MemberKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared parameter of a member: its name and type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    ty: TypeToken,
}

impl Parameter {
    /// Creates a parameter declaration for type `T`.
    #[must_use]
    pub fn of<T: 'static>(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: TypeToken::of::<T>(),
        }
    }

    /// The parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The parameter type.
    #[must_use]
    pub const fn ty(&self) -> TypeToken {
        self.ty
    }
}

/// Reference to a member of a faked type.
#[derive(Debug, Clone)]
pub struct MemberRef {
    declaring_type: TypeToken,
    name: String,
    kind: MemberKind,
    parameters: Vec<Parameter>,
    return_type: TypeToken,
}

impl MemberRef {
    /// Starts building a method reference on declaring type `T`.
    #[must_use]
    pub fn method<T: 'static + ?Sized>(name: impl Into<String>) -> MemberRefBuilder {
        MemberRefBuilder::new(TypeToken::of::<T>(), MemberKind::Method, name.into())
    }

    /// Starts building a property-getter reference on declaring type `T`.
    #[must_use]
    pub fn property_getter<T: 'static + ?Sized>(name: impl Into<String>) -> MemberRefBuilder {
        MemberRefBuilder::new(TypeToken::of::<T>(), MemberKind::PropertyGetter, name.into())
    }

    /// Starts building a property-setter reference on declaring type `T`.
    #[must_use]
    pub fn property_setter<T: 'static + ?Sized>(name: impl Into<String>) -> MemberRefBuilder {
        MemberRefBuilder::new(TypeToken::of::<T>(), MemberKind::PropertySetter, name.into())
    }

    /// Starts building a member reference of the given kind on an explicit
    /// declaring-type token.
    #[must_use]
    pub fn of_kind(
        declaring_type: TypeToken,
        kind: MemberKind,
        name: impl Into<String>,
    ) -> MemberRefBuilder {
        MemberRefBuilder::new(declaring_type, kind, name.into())
    }

    /// The type declaring this member.
    #[must_use]
    pub const fn declaring_type(&self) -> TypeToken {
        self.declaring_type
    }

    /// The member name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The member kind.
    #[must_use]
    pub const fn kind(&self) -> MemberKind {
        self.kind
    }

    /// The declared parameters, in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// The declared return type.
    #[must_use]
    pub const fn return_type(&self) -> TypeToken {
        self.return_type
    }

    /// Renders `Type.name` without the parameter list.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.declaring_type.display_name(), self.name)
    }

    /// Renders the full signature, e.g. `Factory.create(name: String) -> Widget`.
    #[must_use]
    pub fn signature(&self) -> String {
        let params = self
            .parameters
            .iter()
            .map(|p| format!("{}: {}", p.name(), p.ty().display_name()))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "{}.{}({}) -> {}",
            self.declaring_type.display_name(),
            self.name,
            params,
            self.return_type.display_name()
        )
    }
}

impl PartialEq for MemberRef {
    fn eq(&self, other: &Self) -> bool {
        // Signature equality: declaring type, name, kind, parameter types.
        // Return type and parameter names are excluded.
        self.declaring_type == other.declaring_type
            && self.kind == other.kind
            && self.name == other.name
            && self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(other.parameters.iter())
                .all(|(a, b)| a.ty() == b.ty())
    }
}

impl Eq for MemberRef {}

impl Hash for MemberRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.declaring_type.hash(state);
        self.kind.hash(state);
        self.name.hash(state);
        for p in &self.parameters {
            p.ty().hash(state);
        }
    }
}

impl fmt::Display for MemberRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}

/// Builder for [`MemberRef`] values.
#[derive(Debug)]
pub struct MemberRefBuilder {
    declaring_type: TypeToken,
    kind: MemberKind,
    name: String,
    parameters: Vec<Parameter>,
    return_type: TypeToken,
}

impl MemberRefBuilder {
    fn new(declaring_type: TypeToken, kind: MemberKind, name: String) -> Self {
        Self {
            declaring_type,
            kind,
            name,
            parameters: Vec::new(),
            return_type: TypeToken::unit(),
        }
    }

    /// Appends a parameter of type `P`.
    #[must_use]
    pub fn parameter<P: 'static>(mut self, name: impl Into<String>) -> Self {
        self.parameters.push(Parameter::of::<P>(name));
        self
    }

    /// Sets the return type to `R`. Defaults to unit when not called.
    #[must_use]
    pub fn returning<R: 'static>(mut self) -> Self {
        self.return_type = TypeToken::of::<R>();
        self
    }

    /// Finishes the reference.
    ///
    /// # Errors
    ///
    /// - [`ConfigurationError::EmptyMemberName`] if the name is empty.
    /// - [`ConfigurationError::TooManyParameters`] if more than
    ///   [`MAX_PARAMETERS`] parameters were declared.
    /// - [`ConfigurationError::DuplicateParameter`] if two parameters share a
    ///   name.
    pub fn build(self) -> Result<MemberRef, ConfigurationError> {
        if self.name.is_empty() {
            return Err(ConfigurationError::EmptyMemberName);
        }
        if self.parameters.len() > MAX_PARAMETERS {
            return Err(ConfigurationError::TooManyParameters {
                count: self.parameters.len(),
                max: MAX_PARAMETERS,
            });
        }
        for (i, p) in self.parameters.iter().enumerate() {
            if self.parameters[..i].iter().any(|q| q.name() == p.name()) {
                return Err(ConfigurationError::DuplicateParameter {
                    name: p.name().to_string(),
                });
            }
        }
        Ok(MemberRef {
            declaring_type: self.declaring_type,
            name: self.name,
            kind: self.kind,
            parameters: self.parameters,
            return_type: self.return_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Factory;
    struct Widget;

    fn create_with_name() -> MemberRef {
        MemberRef::method::<Factory>("create")
            .parameter::<String>("name")
            .returning::<Widget>()
            .build()
            .unwrap()
    }

    #[test]
    fn test_signature_equality_ignores_return_type_and_names() {
        let a = MemberRef::method::<Factory>("create")
            .parameter::<String>("name")
            .returning::<Widget>()
            .build()
            .unwrap();
        let b = MemberRef::method::<Factory>("create")
            .parameter::<String>("label")
            .returning::<u32>()
            .build()
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_overloads_are_distinct() {
        let unary = create_with_name();
        let nullary = MemberRef::method::<Factory>("create")
            .returning::<Widget>()
            .build()
            .unwrap();
        assert_ne!(unary, nullary);
    }

    #[test]
    fn test_declaring_type_distinguishes_members() {
        struct OtherFactory;
        let a = MemberRef::method::<Factory>("create").build().unwrap();
        let b = MemberRef::method::<OtherFactory>("create").build().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_kind_distinguishes_members() {
        let getter = MemberRef::property_getter::<Factory>("count")
            .returning::<u32>()
            .build()
            .unwrap();
        let method = MemberRef::method::<Factory>("count")
            .returning::<u32>()
            .build()
            .unwrap();
        assert_ne!(getter, method);
    }

    #[test]
    fn test_rendering() {
        let member = create_with_name();
        assert_eq!(member.qualified_name(), "Factory.create");
        assert_eq!(
            member.signature(),
            "Factory.create(name: String) -> Widget"
        );
    }

    #[test]
    fn test_empty_name_rejected() {
        let result = MemberRef::method::<Factory>("").build();
        assert!(matches!(result, Err(ConfigurationError::EmptyMemberName)));
    }

    #[test]
    fn test_duplicate_parameter_rejected() {
        let result = MemberRef::method::<Factory>("create")
            .parameter::<String>("name")
            .parameter::<u32>("name")
            .build();
        assert!(matches!(
            result,
            Err(ConfigurationError::DuplicateParameter { .. })
        ));
    }

    #[test]
    fn test_too_many_parameters_rejected() {
        let mut builder = MemberRef::method::<Factory>("create");
        for i in 0..=MAX_PARAMETERS {
            builder = builder.parameter::<u8>(format!("p{i}"));
        }
        assert!(matches!(
            builder.build(),
            Err(ConfigurationError::TooManyParameters { .. })
        ));
    }
}
