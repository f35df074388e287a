//! Member filters for call-history queries.

use std::fmt;

use crate::call::{MemberRef, TypeToken};

/// Selects which members a history query or assertion is interested in.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub enum CallFilter {
    /// Exactly one member, by declaring type and signature (one overload).
    Exact(MemberRef),
    /// Every member named `name` on the declaring type, across overloads
    /// and kinds.
    Named {
        /// The declaring type.
        declaring_type: TypeToken,
        /// The member name.
        name: String,
    },
    /// Every member of the declaring type.
    AnyOf(TypeToken),
    /// Every recorded call.
    Any,
}

impl CallFilter {
    /// Builds a by-name filter for declaring type `T`.
    #[must_use]
    pub fn named<T: 'static + ?Sized>(name: impl Into<String>) -> Self {
        Self::Named {
            declaring_type: TypeToken::of::<T>(),
            name: name.into(),
        }
    }

    /// Builds an any-member filter for declaring type `T`.
    #[must_use]
    pub fn any_of<T: 'static + ?Sized>() -> Self {
        Self::AnyOf(TypeToken::of::<T>())
    }

    /// Applies the filter to a recorded call's member.
    #[must_use]
    pub fn matches(&self, member: &MemberRef) -> bool {
        match self {
            Self::Exact(expected) => expected == member,
            Self::Named {
                declaring_type,
                name,
            } => member.declaring_type() == *declaring_type && member.name() == name,
            Self::AnyOf(token) => member.declaring_type() == *token,
            Self::Any => true,
        }
    }

    /// Renders the filter as a call-site description for reports.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Exact(member) => member.signature(),
            Self::Named {
                declaring_type,
                name,
            } => format!("{}.{name}", declaring_type.display_name()),
            Self::AnyOf(token) => format!("any member of {}", token.display_name()),
            Self::Any => "any call".to_string(),
        }
    }
}

impl fmt::Display for CallFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
