//! Stable identities.
//!
//! A stable id names an entity by content (assembly, CLR names,
//! canonical signature), so it survives every pass unchanged and two
//! graphs built from the same input agree on every id. Ordering is
//! derived lexicographically, which gives the pipeline its
//! deterministic tiebreakers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a type: `assembly` + CLR full name (backtick-arity form
/// for generics, `+` separators for nesting).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TypeStableId {
    pub assembly: String,
    pub clr_full_name: String,
}

impl TypeStableId {
    #[must_use]
    pub fn new(assembly: impl Into<String>, clr_full_name: impl Into<String>) -> Self {
        Self {
            assembly: assembly.into(),
            clr_full_name: clr_full_name.into(),
        }
    }
}

impl fmt::Display for TypeStableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.assembly, self.clr_full_name)
    }
}

/// Identity of a member. Equality deliberately excludes any backing
/// metadata token: a member is its declaring type, name, and canonical
/// signature, nothing more.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MemberStableId {
    pub assembly: String,
    pub declaring_clr_full_name: String,
    pub member_name: String,
    pub canonical_signature: String,
}

impl MemberStableId {
    #[must_use]
    pub fn new(
        assembly: impl Into<String>,
        declaring_clr_full_name: impl Into<String>,
        member_name: impl Into<String>,
        canonical_signature: impl Into<String>,
    ) -> Self {
        Self {
            assembly: assembly.into(),
            declaring_clr_full_name: declaring_clr_full_name.into(),
            member_name: member_name.into(),
            canonical_signature: canonical_signature.into(),
        }
    }

    /// Re-home this member id onto a different declaring type, keeping
    /// name and signature. Used when a pass synthesizes a counterpart
    /// owned by the new type (base-overload re-adds).
    #[must_use]
    pub fn rehomed(&self, assembly: &str, declaring_clr_full_name: &str) -> Self {
        Self {
            assembly: assembly.to_string(),
            declaring_clr_full_name: declaring_clr_full_name.to_string(),
            member_name: self.member_name.clone(),
            canonical_signature: self.canonical_signature.clone(),
        }
    }
}

impl fmt::Display for MemberStableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}::{}|{}",
            self.assembly, self.declaring_clr_full_name, self.member_name, self.canonical_signature
        )
    }
}

/// Derive the stable id a type reference denotes: the open definition,
/// with the assembly taken from the reference's head named type.
/// Generic parameters and placeholders denote no type.
#[must_use]
pub fn stable_id_for(reference: &crate::typeref::TypeReference) -> Option<TypeStableId> {
    let key = reference.clr_lookup_key()?;
    let mut assembly = None;
    reference.for_each_named(&mut |named| {
        if assembly.is_none() {
            assembly = Some(named.assembly.clone());
        }
    });
    Some(TypeStableId::new(assembly?, key))
}

/// Either kind of stable id. The naming authority keys its decision map
/// with this, since types and members reserve through the same tables.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StableId {
    Type(TypeStableId),
    Member(MemberStableId),
}

impl fmt::Display for StableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Type(id) => write!(f, "{id}"),
            Self::Member(id) => write!(f, "{id}"),
        }
    }
}

impl From<TypeStableId> for StableId {
    fn from(id: TypeStableId) -> Self {
        Self::Type(id)
    }
}

impl From<MemberStableId> for StableId {
    fn from(id: MemberStableId) -> Self {
        Self::Member(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_id_display_is_assembly_qualified() {
        let id = TypeStableId::new("CoreLib", "System.Collections.Generic.List`1");
        assert_eq!(id.to_string(), "CoreLib:System.Collections.Generic.List`1");
    }

    #[test]
    fn member_ids_compare_by_content_only() {
        let a = MemberStableId::new("CoreLib", "System.Object", "ToString", "ToString|arity=0|()|->System.String|static=false");
        let b = MemberStableId::new("CoreLib", "System.Object", "ToString", "ToString|arity=0|()|->System.String|static=false");
        assert_eq!(a, b);
    }

    #[test]
    fn rehomed_keeps_name_and_signature() {
        let base = MemberStableId::new("CoreLib", "System.IO.Stream", "Read", "sig");
        let derived = base.rehomed("CoreLib", "System.IO.FileStream");
        assert_eq!(derived.declaring_clr_full_name, "System.IO.FileStream");
        assert_eq!(derived.member_name, "Read");
        assert_eq!(derived.canonical_signature, "sig");
        assert_ne!(base, derived);
    }
}
