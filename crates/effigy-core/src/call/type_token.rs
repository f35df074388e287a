//! Type identity for members, parameters, and dynamic values.
//!
//! A [`TypeToken`] pairs a `TypeId` with the type's name. Equality is exact
//! `TypeId` equality: a token for `Option<String>` never equals a token for
//! `String`, and no assignability or subtyping relation is consulted. Rules
//! that match "any member returning T" rely on this exact-match behavior.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a Rust type, usable as a map key and in descriptions.
#[derive(Debug, Clone, Copy)]
pub struct TypeToken {
    id: TypeId,
    name: &'static str,
}

impl TypeToken {
    /// Returns the token for `T`.
    #[must_use]
    pub fn of<T: 'static + ?Sized>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Returns the token for the unit type, used as the return type of
    /// members that return nothing.
    #[must_use]
    pub fn unit() -> Self {
        Self::of::<()>()
    }

    /// The fully qualified type name (e.g. `alloc::string::String`).
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The type name with module paths stripped (e.g. `String`,
    /// `Option<String>`), used in validator descriptions and reports.
    #[must_use]
    pub fn display_name(&self) -> String {
        strip_module_paths(self.name)
    }

    /// Returns `true` if this token identifies `T`.
    #[must_use]
    pub fn is<T: 'static + ?Sized>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for TypeToken {
    fn eq(&self, other: &Self) -> bool {
        // Exact TypeId equality only; names for equal ids are identical.
        self.id == other.id
    }
}

impl Eq for TypeToken {}

impl Hash for TypeToken {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

/// Strips `path::to::` prefixes from every identifier in a rendered type
/// name, leaving generics and punctuation intact.
fn strip_module_paths(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut segment = String::new();
    for c in name.chars() {
        if c.is_alphanumeric() || c == '_' || c == ':' {
            segment.push(c);
        } else {
            out.push_str(last_path_segment(&segment));
            segment.clear();
            out.push(c);
        }
    }
    out.push_str(last_path_segment(&segment));
    out
}

fn last_path_segment(s: &str) -> &str {
    s.rsplit("::").next().unwrap_or(s)
}
