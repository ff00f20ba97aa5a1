//! Type symbols, generic parameters, and explicit views.

use crate::ids::{MemberStableId, TypeStableId};
use crate::members::{
    ConstructorSymbol, EventSymbol, FieldSymbol, MethodSymbol, PropertySymbol,
};
use crate::typeref::TypeReference;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Declaration kind, also the first emission-order tier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TypeKind {
    Class,
    Interface,
    Struct,
    Enum,
    Delegate,
    /// A static container emitted as a namespace-like value.
    StaticNamespace,
}

impl TypeKind {
    /// Emission-order tier: enums and delegates carry no dependencies
    /// on later tiers, so they sort first.
    #[must_use]
    pub const fn tier(self) -> u8 {
        match self {
            Self::Enum => 0,
            Self::Delegate => 1,
            Self::Interface => 2,
            Self::Struct => 3,
            Self::Class => 4,
            Self::StaticNamespace => 5,
        }
    }
}

/// Generic-parameter variance as declared in metadata.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Variance {
    #[default]
    Invariant,
    Covariant,
    Contravariant,
}

bitflags! {
    /// Special (non-type) generic constraints.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SpecialConstraints: u8 {
        const REFERENCE_TYPE = 1 << 0;
        const VALUE_TYPE     = 1 << 1;
        /// `new()` - no counterpart in the target system.
        const DEFAULT_CTOR   = 1 << 2;
    }
}

impl Serialize for SpecialConstraints {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for SpecialConstraints {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenericParam {
    pub name: String,
    pub position: u16,
    pub variance: Variance,
    pub constraints: Vec<TypeReference>,
    pub special: SpecialConstraints,
}

impl GenericParam {
    #[must_use]
    pub fn new(name: impl Into<String>, position: u16) -> Self {
        Self {
            name: name.into(),
            position,
            variance: Variance::default(),
            constraints: Vec::new(),
            special: SpecialConstraints::default(),
        }
    }
}

bitflags! {
    /// Type-level modifier flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TypeFlags: u8 {
        const VALUE_TYPE = 1 << 0;
        const ABSTRACT   = 1 << 1;
        const SEALED     = 1 << 2;
        const STATIC     = 1 << 3;
    }
}

impl Serialize for TypeFlags {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.bits())
    }
}

impl<'de> Deserialize<'de> for TypeFlags {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u8::deserialize(deserializer)?;
        Ok(Self::from_bits_truncate(bits))
    }
}

/// An explicit interface view: the `As_<Interface>` property that
/// carries members unable to live on the class surface. Members are
/// referenced by stable id; the graph's member lists own the data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExplicitView {
    /// The (possibly constructed) interface this view presents.
    pub interface: TypeReference,
    /// Stable id of the open interface definition.
    pub interface_id: TypeStableId,
    /// The view property's name, assigned during view planning.
    pub property_name: Option<String>,
    pub members: Vec<MemberStableId>,
}

impl ExplicitView {
    #[must_use]
    pub fn new(interface: TypeReference, interface_id: TypeStableId) -> Self {
        Self {
            interface,
            interface_id,
            property_name: None,
            members: Vec::new(),
        }
    }

    /// Union-insert a member reference, keeping the list sorted so two
    /// graphs built from the same input agree byte-for-byte.
    pub fn add_member(&mut self, id: MemberStableId) {
        if let Err(pos) = self.members.binary_search(&id) {
            self.members.insert(pos, id);
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TypeSymbol {
    pub id: TypeStableId,
    /// CLR simple name with arity suffix (`List`1`).
    pub clr_name: String,
    /// Simple name without the suffix (`List`).
    pub simple_name: String,
    pub namespace: String,
    pub kind: TypeKind,
    pub arity: u16,
    pub generic_params: Vec<GenericParam>,
    pub base_type: Option<TypeReference>,
    pub interfaces: Vec<TypeReference>,
    pub methods: Vec<MethodSymbol>,
    pub properties: Vec<PropertySymbol>,
    pub fields: Vec<FieldSymbol>,
    pub events: Vec<EventSymbol>,
    pub constructors: Vec<ConstructorSymbol>,
    pub nested_types: Vec<TypeSymbol>,
    /// Filled by view planning (shape pass 14).
    pub explicit_views: Vec<ExplicitView>,
    pub flags: TypeFlags,
    /// Final emitted name, set by name reservation.
    pub ts_emit_name: Option<String>,
}

impl TypeSymbol {
    /// CLR full name in the graph's index key form.
    #[must_use]
    pub fn clr_full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.clr_name.clone()
        } else {
            format!("{}.{}", self.namespace, self.clr_name)
        }
    }

    #[must_use]
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    #[must_use]
    pub fn is_static_container(&self) -> bool {
        self.kind == TypeKind::StaticNamespace || self.flags.contains(TypeFlags::STATIC)
    }

    /// A self-reference with this type's own parameters as arguments
    /// (the open form `List<T>` seen from inside `List`).
    #[must_use]
    pub fn self_reference(&self) -> TypeReference {
        TypeReference::named(
            self.id.assembly.clone(),
            self.namespace.clone(),
            self.simple_name.clone(),
            self.arity,
            self.generic_params
                .iter()
                .map(|gp| TypeReference::type_param(gp.name.clone(), gp.position)),
        )
    }

    /// Find the view for an interface stable id, if planned already.
    #[must_use]
    pub fn view_for(&self, interface_id: &TypeStableId) -> Option<&ExplicitView> {
        self.explicit_views
            .iter()
            .find(|v| &v.interface_id == interface_id)
    }
}
