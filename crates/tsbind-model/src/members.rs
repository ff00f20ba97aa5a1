//! Member symbols.
//!
//! Every member carries its stable id, how it entered the graph
//! (`Provenance`), and where it surfaces in the output (`EmitScope`).
//! Shape passes communicate entirely through those two tags plus the
//! `source_interface` back-reference.

use crate::ids::MemberStableId;
use crate::typeref::TypeReference;
use crate::types::GenericParam;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

bitflags! {
    /// CLR member modifier flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct MemberFlags: u16 {
        const STATIC   = 1 << 0;
        const ABSTRACT = 1 << 1;
        const VIRTUAL  = 1 << 2;
        const OVERRIDE = 1 << 3;
        const SEALED   = 1 << 4;
        /// Hides a base member (`new` in the source language).
        const NEW      = 1 << 5;
        const CONST    = 1 << 6;
        const READONLY = 1 << 7;
    }
}

impl Serialize for MemberFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.bits())
    }
}

impl<'de> Deserialize<'de> for MemberFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u16::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}

/// Source visibility. Only `Public` and `Family` members reach the
/// emitted surface; the rest are carried for sidecar metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MemberVisibility {
    #[default]
    Public,
    Family,
    Internal,
    Private,
}

/// How a member entered the graph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Provenance {
    /// Declared directly on the type in metadata.
    #[default]
    Original,
    /// Inlined from a base interface.
    FromInterface,
    /// Synthesized to satisfy an interface requirement.
    Synthesized,
    /// Re-added from a base class to complete an overload set.
    BaseOverload,
    /// Explicit interface implementation clone.
    ExplicitView,
    /// Produced by indexer-to-method conversion.
    IndexerNormalized,
    /// Survivor of diamond resolution.
    DiamondResolved,
}

/// Where the member surfaces in the final output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EmitScope {
    #[default]
    ClassSurface,
    StaticSurface,
    /// Emitted only inside an explicit interface view.
    ViewOnly,
    /// Dropped from emission entirely (kept for sidecar metadata).
    Omitted,
}

/// Parameter passing mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ParameterKind {
    #[default]
    In,
    Ref,
    Out,
    /// Variadic tail (`params` array).
    Params,
}

impl ParameterKind {
    /// Short tag used inside canonical signatures.
    #[must_use]
    pub const fn canonical_tag(self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Ref => "ref",
            Self::Out => "out",
            Self::Params => "params",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeReference,
    pub kind: ParameterKind,
    pub optional: bool,
    /// Textual default value, when one exists in metadata.
    pub default: Option<String>,
}

impl Parameter {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeReference) -> Self {
        Self {
            name: name.into(),
            ty,
            kind: ParameterKind::In,
            optional: false,
            default: None,
        }
    }

    #[must_use]
    pub fn with_kind(mut self, kind: ParameterKind) -> Self {
        self.kind = kind;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MethodSymbol {
    pub id: MemberStableId,
    pub clr_name: String,
    pub return_type: TypeReference,
    pub parameters: Vec<Parameter>,
    pub generic_params: Vec<GenericParam>,
    pub flags: MemberFlags,
    pub visibility: MemberVisibility,
    pub provenance: Provenance,
    /// Set when this member stands in for an interface requirement.
    pub source_interface: Option<TypeReference>,
    pub emit_scope: EmitScope,
    pub ts_emit_name: Option<String>,
}

impl MethodSymbol {
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MemberFlags::STATIC)
    }

    #[must_use]
    pub fn generic_arity(&self) -> u16 {
        u16::try_from(self.generic_params.len()).unwrap_or(u16::MAX)
    }

    /// Count of `ref`/`out` parameters, the widest-signature metric.
    #[must_use]
    pub fn ref_out_count(&self) -> usize {
        self.parameters
            .iter()
            .filter(|p| matches!(p.kind, ParameterKind::Ref | ParameterKind::Out))
            .count()
    }

    #[must_use]
    pub fn constraint_count(&self) -> usize {
        self.generic_params
            .iter()
            .map(|gp| gp.constraints.len())
            .sum()
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropertySymbol {
    pub id: MemberStableId,
    pub clr_name: String,
    pub property_type: TypeReference,
    /// Empty for ordinary properties; one or more for indexers.
    pub index_parameters: Vec<Parameter>,
    pub has_getter: bool,
    pub has_setter: bool,
    pub flags: MemberFlags,
    pub visibility: MemberVisibility,
    pub provenance: Provenance,
    pub source_interface: Option<TypeReference>,
    pub emit_scope: EmitScope,
    pub ts_emit_name: Option<String>,
}

impl PropertySymbol {
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MemberFlags::STATIC)
    }

    #[must_use]
    pub fn is_indexer(&self) -> bool {
        !self.index_parameters.is_empty()
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.has_getter && !self.has_setter
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldSymbol {
    pub id: MemberStableId,
    pub clr_name: String,
    pub field_type: TypeReference,
    pub flags: MemberFlags,
    pub visibility: MemberVisibility,
    pub provenance: Provenance,
    pub emit_scope: EmitScope,
    pub ts_emit_name: Option<String>,
}

impl FieldSymbol {
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags
            .intersects(MemberFlags::STATIC | MemberFlags::CONST)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventSymbol {
    pub id: MemberStableId,
    pub clr_name: String,
    pub handler_type: TypeReference,
    pub flags: MemberFlags,
    pub visibility: MemberVisibility,
    pub provenance: Provenance,
    pub source_interface: Option<TypeReference>,
    pub emit_scope: EmitScope,
    pub ts_emit_name: Option<String>,
}

impl EventSymbol {
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MemberFlags::STATIC)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConstructorSymbol {
    pub id: MemberStableId,
    pub parameters: Vec<Parameter>,
    pub flags: MemberFlags,
    pub visibility: MemberVisibility,
    pub provenance: Provenance,
    pub emit_scope: EmitScope,
}

impl ConstructorSymbol {
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MemberFlags::STATIC)
    }
}

/// Generic-parameter substitution map entry lists, sized for the
/// overwhelmingly common one-or-two argument case.
pub type TypeArgs = SmallVec<[TypeReference; 2]>;
