//! Reservation scopes.
//!
//! A scope is the namespace a name lives in. Scope keys are fixed
//! strings; they are the only vocabulary through which components share
//! name state, so the formats here are load-bearing contracts.

use crate::ids::TypeStableId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace visibility partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    Internal,
}

impl Visibility {
    #[must_use]
    const fn key_part(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Internal => "internal",
        }
    }
}

/// Instance/static sub-scope. Statics and instance members never
/// collide in the target system, so they reserve independently.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Side {
    Instance,
    Static,
}

impl Side {
    #[must_use]
    pub const fn from_static(is_static: bool) -> Self {
        if is_static { Self::Static } else { Self::Instance }
    }

    #[must_use]
    const fn key_part(self) -> &'static str {
        match self {
            Self::Instance => "instance",
            Self::Static => "static",
        }
    }
}

/// A reservation scope. Type and view scopes split further by `Side`
/// when keyed; namespace scopes do not.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Top-level type names within a namespace.
    Namespace { name: String, visibility: Visibility },
    /// Members on a type's emitted surface.
    Type { full_name: String },
    /// Members carried by one explicit interface view on one type.
    View {
        type_id: TypeStableId,
        interface_id: TypeStableId,
    },
}

impl Scope {
    #[must_use]
    pub fn namespace(name: impl Into<String>, visibility: Visibility) -> Self {
        Self::Namespace {
            name: name.into(),
            visibility,
        }
    }

    #[must_use]
    pub fn ty(full_name: impl Into<String>) -> Self {
        Self::Type {
            full_name: full_name.into(),
        }
    }

    #[must_use]
    pub const fn view(type_id: TypeStableId, interface_id: TypeStableId) -> Self {
        Self::View {
            type_id,
            interface_id,
        }
    }

    /// The string key for this scope at the given side. The formats are
    /// fixed: `ns:<name>:<vis>`, `type:<full>#<side>`,
    /// `view:<type-id>:<iface-id>#<side>`.
    #[must_use]
    pub fn key(&self, side: Side) -> String {
        match self {
            Self::Namespace { name, visibility } => {
                format!("ns:{name}:{}", visibility.key_part())
            }
            Self::Type { full_name } => {
                format!("type:{full_name}#{}", side.key_part())
            }
            Self::View {
                type_id,
                interface_id,
            } => {
                format!("view:{type_id}:{interface_id}#{}", side.key_part())
            }
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key(Side::Instance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_key_ignores_side() {
        let scope = Scope::namespace("System.IO", Visibility::Public);
        assert_eq!(scope.key(Side::Instance), "ns:System.IO:public");
        assert_eq!(scope.key(Side::Static), "ns:System.IO:public");
    }

    #[test]
    fn type_key_splits_by_side() {
        let scope = Scope::ty("System.IO.Stream");
        assert_eq!(scope.key(Side::Instance), "type:System.IO.Stream#instance");
        assert_eq!(scope.key(Side::Static), "type:System.IO.Stream#static");
    }

    #[test]
    fn view_key_carries_both_stable_ids() {
        let scope = Scope::view(
            TypeStableId::new("CoreLib", "System.Collections.ArrayList"),
            TypeStableId::new("CoreLib", "System.Collections.IList"),
        );
        assert_eq!(
            scope.key(Side::Instance),
            "view:CoreLib:System.Collections.ArrayList:CoreLib:System.Collections.IList#instance"
        );
    }
}
