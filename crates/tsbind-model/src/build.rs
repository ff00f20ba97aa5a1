//! Fluent fixture builders.
//!
//! The reflection loader lives outside this workspace; these builders
//! produce the same graphs it would, with stable ids and canonical
//! signatures computed the way the load boundary requires. Tests and
//! demos construct their inputs through them.

use crate::graph::{NamespaceSymbol, SymbolGraph};
use crate::ids::{MemberStableId, TypeStableId};
use crate::members::{
    ConstructorSymbol, EmitScope, EventSymbol, FieldSymbol, MemberFlags, MemberVisibility,
    MethodSymbol, Parameter, PropertySymbol, Provenance,
};
use crate::signature;
use crate::typeref::TypeReference;
use crate::types::{GenericParam, TypeFlags, TypeKind, TypeSymbol};

/// Reference to `System.Object`.
#[must_use]
pub fn object_ref() -> TypeReference {
    TypeReference::named("CoreLib", "System", "Object", 0, [])
}

/// Reference to `System.String`.
#[must_use]
pub fn string_ref() -> TypeReference {
    TypeReference::named("CoreLib", "System", "String", 0, [])
}

/// Reference to `System.Int32`.
#[must_use]
pub fn int_ref() -> TypeReference {
    TypeReference::named("CoreLib", "System", "Int32", 0, [])
}

/// Reference to `System.Int64`.
#[must_use]
pub fn long_ref() -> TypeReference {
    TypeReference::named("CoreLib", "System", "Int64", 0, [])
}

/// Reference to `System.Boolean`.
#[must_use]
pub fn bool_ref() -> TypeReference {
    TypeReference::named("CoreLib", "System", "Boolean", 0, [])
}

/// Reference to `System.Void` (method return position only).
#[must_use]
pub fn void_ref() -> TypeReference {
    TypeReference::named("CoreLib", "System", "Void", 0, [])
}

pub struct MethodBuilder {
    clr_name: String,
    return_type: TypeReference,
    parameters: Vec<Parameter>,
    generic_params: Vec<GenericParam>,
    flags: MemberFlags,
    visibility: MemberVisibility,
    provenance: Provenance,
    source_interface: Option<TypeReference>,
}

impl MethodBuilder {
    #[must_use]
    pub fn new(clr_name: impl Into<String>) -> Self {
        Self {
            clr_name: clr_name.into(),
            return_type: void_ref(),
            parameters: Vec::new(),
            generic_params: Vec::new(),
            flags: MemberFlags::default(),
            visibility: MemberVisibility::Public,
            provenance: Provenance::Original,
            source_interface: None,
        }
    }

    #[must_use]
    pub fn returns(mut self, ty: TypeReference) -> Self {
        self.return_type = ty;
        self
    }

    #[must_use]
    pub fn param(mut self, param: Parameter) -> Self {
        self.parameters.push(param);
        self
    }

    #[must_use]
    pub fn generic(mut self, name: &str) -> Self {
        let position = u16::try_from(self.generic_params.len()).unwrap_or(u16::MAX);
        self.generic_params.push(GenericParam::new(name, position));
        self
    }

    #[must_use]
    pub fn flags(mut self, flags: MemberFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn static_(mut self) -> Self {
        self.flags |= MemberFlags::STATIC;
        self
    }

    #[must_use]
    pub fn provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    #[must_use]
    pub fn from_interface(mut self, iface: TypeReference) -> Self {
        self.source_interface = Some(iface);
        self
    }

    /// Build for a declaring type; the stable id embeds the canonical
    /// signature the load boundary would have computed.
    #[must_use]
    pub fn build_for(self, assembly: &str, declaring_full_name: &str) -> MethodSymbol {
        let is_static = self.flags.contains(MemberFlags::STATIC);
        let canonical = signature::method_signature(
            &self.clr_name,
            u16::try_from(self.generic_params.len()).unwrap_or(u16::MAX),
            &self.parameters,
            &self.return_type,
            is_static,
        );
        MethodSymbol {
            id: MemberStableId::new(assembly, declaring_full_name, &self.clr_name, canonical),
            clr_name: self.clr_name,
            return_type: self.return_type,
            parameters: self.parameters,
            generic_params: self.generic_params,
            flags: self.flags,
            visibility: self.visibility,
            provenance: self.provenance,
            source_interface: self.source_interface,
            emit_scope: if is_static {
                EmitScope::StaticSurface
            } else {
                EmitScope::ClassSurface
            },
            ts_emit_name: None,
        }
    }
}

pub struct PropertyBuilder {
    clr_name: String,
    property_type: TypeReference,
    index_parameters: Vec<Parameter>,
    has_getter: bool,
    has_setter: bool,
    flags: MemberFlags,
    provenance: Provenance,
    source_interface: Option<TypeReference>,
}

impl PropertyBuilder {
    #[must_use]
    pub fn new(clr_name: impl Into<String>, property_type: TypeReference) -> Self {
        Self {
            clr_name: clr_name.into(),
            property_type,
            index_parameters: Vec::new(),
            has_getter: true,
            has_setter: true,
            flags: MemberFlags::default(),
            provenance: Provenance::Original,
            source_interface: None,
        }
    }

    #[must_use]
    pub fn index(mut self, param: Parameter) -> Self {
        self.index_parameters.push(param);
        self
    }

    #[must_use]
    pub fn getter_only(mut self) -> Self {
        self.has_getter = true;
        self.has_setter = false;
        self
    }

    #[must_use]
    pub fn static_(mut self) -> Self {
        self.flags |= MemberFlags::STATIC;
        self
    }

    #[must_use]
    pub fn provenance(mut self, provenance: Provenance) -> Self {
        self.provenance = provenance;
        self
    }

    #[must_use]
    pub fn from_interface(mut self, iface: TypeReference) -> Self {
        self.source_interface = Some(iface);
        self
    }

    #[must_use]
    pub fn build_for(self, assembly: &str, declaring_full_name: &str) -> PropertySymbol {
        let is_static = self.flags.contains(MemberFlags::STATIC);
        let canonical = signature::property_signature(
            &self.clr_name,
            &self.index_parameters,
            &self.property_type,
            is_static,
            self.has_getter,
            self.has_setter,
        );
        PropertySymbol {
            id: MemberStableId::new(assembly, declaring_full_name, &self.clr_name, canonical),
            clr_name: self.clr_name,
            property_type: self.property_type,
            index_parameters: self.index_parameters,
            has_getter: self.has_getter,
            has_setter: self.has_setter,
            flags: self.flags,
            visibility: MemberVisibility::Public,
            provenance: self.provenance,
            source_interface: self.source_interface,
            emit_scope: if is_static {
                EmitScope::StaticSurface
            } else {
                EmitScope::ClassSurface
            },
            ts_emit_name: None,
        }
    }
}

pub struct TypeBuilder {
    assembly: String,
    namespace: String,
    simple_name: String,
    kind: TypeKind,
    arity: u16,
    generic_params: Vec<GenericParam>,
    base_type: Option<TypeReference>,
    interfaces: Vec<TypeReference>,
    methods: Vec<MethodBuilder>,
    properties: Vec<PropertyBuilder>,
    fields: Vec<FieldSymbol>,
    events: Vec<EventSymbol>,
    constructors: Vec<ConstructorSymbol>,
    flags: TypeFlags,
}

impl TypeBuilder {
    fn new(assembly: &str, namespace: &str, simple_name: &str, kind: TypeKind) -> Self {
        Self {
            assembly: assembly.to_string(),
            namespace: namespace.to_string(),
            simple_name: simple_name.to_string(),
            kind,
            arity: 0,
            generic_params: Vec::new(),
            base_type: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
            properties: Vec::new(),
            fields: Vec::new(),
            events: Vec::new(),
            constructors: Vec::new(),
            flags: TypeFlags::default(),
        }
    }

    #[must_use]
    pub fn class(assembly: &str, namespace: &str, simple_name: &str) -> Self {
        Self::new(assembly, namespace, simple_name, TypeKind::Class)
    }

    #[must_use]
    pub fn interface(assembly: &str, namespace: &str, simple_name: &str) -> Self {
        Self::new(assembly, namespace, simple_name, TypeKind::Interface)
    }

    #[must_use]
    pub fn struct_(assembly: &str, namespace: &str, simple_name: &str) -> Self {
        let mut b = Self::new(assembly, namespace, simple_name, TypeKind::Struct);
        b.flags |= TypeFlags::VALUE_TYPE;
        b
    }

    #[must_use]
    pub fn enum_(assembly: &str, namespace: &str, simple_name: &str) -> Self {
        let mut b = Self::new(assembly, namespace, simple_name, TypeKind::Enum);
        b.flags |= TypeFlags::VALUE_TYPE | TypeFlags::SEALED;
        b
    }

    #[must_use]
    pub fn static_container(assembly: &str, namespace: &str, simple_name: &str) -> Self {
        let mut b = Self::new(assembly, namespace, simple_name, TypeKind::StaticNamespace);
        b.flags |= TypeFlags::STATIC;
        b
    }

    #[must_use]
    pub fn generic(mut self, name: &str) -> Self {
        let position = u16::try_from(self.generic_params.len()).unwrap_or(u16::MAX);
        self.generic_params.push(GenericParam::new(name, position));
        self.arity = u16::try_from(self.generic_params.len()).unwrap_or(u16::MAX);
        self
    }

    #[must_use]
    pub fn generic_param(mut self, param: GenericParam) -> Self {
        self.generic_params.push(param);
        self.arity = u16::try_from(self.generic_params.len()).unwrap_or(u16::MAX);
        self
    }

    #[must_use]
    pub fn extends(mut self, base: TypeReference) -> Self {
        self.base_type = Some(base);
        self
    }

    #[must_use]
    pub fn implements(mut self, iface: TypeReference) -> Self {
        self.interfaces.push(iface);
        self
    }

    #[must_use]
    pub fn method(mut self, method: MethodBuilder) -> Self {
        self.methods.push(method);
        self
    }

    #[must_use]
    pub fn property(mut self, property: PropertyBuilder) -> Self {
        self.properties.push(property);
        self
    }

    #[must_use]
    pub fn ctor(mut self, parameters: Vec<Parameter>) -> Self {
        let full_name = self.full_name();
        let canonical = signature::constructor_signature(&parameters, false);
        self.constructors.push(ConstructorSymbol {
            id: MemberStableId::new(&self.assembly, &full_name, ".ctor", canonical),
            parameters,
            flags: MemberFlags::default(),
            visibility: MemberVisibility::Public,
            provenance: Provenance::Original,
            emit_scope: EmitScope::ClassSurface,
        });
        self
    }

    #[must_use]
    pub fn field(mut self, name: &str, field_type: TypeReference, flags: MemberFlags) -> Self {
        let full_name = self.full_name();
        let is_static = flags.intersects(MemberFlags::STATIC | MemberFlags::CONST);
        let canonical = signature::field_signature(name, &field_type, is_static);
        self.fields.push(FieldSymbol {
            id: MemberStableId::new(&self.assembly, &full_name, name, canonical),
            clr_name: name.to_string(),
            field_type,
            flags,
            visibility: MemberVisibility::Public,
            provenance: Provenance::Original,
            emit_scope: if is_static {
                EmitScope::StaticSurface
            } else {
                EmitScope::ClassSurface
            },
            ts_emit_name: None,
        });
        self
    }

    #[must_use]
    pub fn event(mut self, name: &str, handler_type: TypeReference) -> Self {
        let full_name = self.full_name();
        let canonical = signature::event_signature(name, &handler_type, false);
        self.events.push(EventSymbol {
            id: MemberStableId::new(&self.assembly, &full_name, name, canonical),
            clr_name: name.to_string(),
            handler_type,
            flags: MemberFlags::default(),
            visibility: MemberVisibility::Public,
            provenance: Provenance::Original,
            source_interface: None,
            emit_scope: EmitScope::ClassSurface,
            ts_emit_name: None,
        });
        self
    }

    fn full_name(&self) -> String {
        let clr_name = if self.arity > 0 {
            format!("{}`{}", self.simple_name, self.arity)
        } else {
            self.simple_name.clone()
        };
        if self.namespace.is_empty() {
            clr_name
        } else {
            format!("{}.{}", self.namespace, clr_name)
        }
    }

    #[must_use]
    pub fn build(self) -> TypeSymbol {
        let full_name = self.full_name();
        let clr_name = if self.arity > 0 {
            format!("{}`{}", self.simple_name, self.arity)
        } else {
            self.simple_name.clone()
        };
        TypeSymbol {
            id: TypeStableId::new(&self.assembly, &full_name),
            clr_name,
            simple_name: self.simple_name,
            namespace: self.namespace,
            kind: self.kind,
            arity: self.arity,
            generic_params: self.generic_params,
            base_type: self.base_type,
            interfaces: self.interfaces,
            methods: self
                .methods
                .into_iter()
                .map(|m| m.build_for(&self.assembly, &full_name))
                .collect(),
            properties: self
                .properties
                .into_iter()
                .map(|p| p.build_for(&self.assembly, &full_name))
                .collect(),
            fields: self.fields,
            events: self.events,
            constructors: self.constructors,
            nested_types: Vec::new(),
            explicit_views: Vec::new(),
            flags: self.flags,
            ts_emit_name: None,
        }
    }
}

/// Assembles namespaces and types into a graph, the way the load
/// boundary hands one to the pipeline.
#[derive(Default)]
pub struct GraphBuilder {
    graph: SymbolGraph,
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn assembly(mut self, name: &str) -> Self {
        self.graph.assemblies.insert(name.to_string());
        self
    }

    /// Add a type under its namespace, creating the namespace symbol on
    /// first use and recording the contributing assembly.
    #[must_use]
    pub fn ty(mut self, ty: TypeSymbol) -> Self {
        let ns_name = ty.namespace.clone();
        let assembly = ty.id.assembly.clone();
        let idx = match self.graph.namespaces.iter().position(|ns| ns.name == ns_name) {
            Some(idx) => idx,
            None => {
                self.graph.namespaces.push(NamespaceSymbol::new(&ns_name));
                self.graph.namespaces.len() - 1
            }
        };
        let ns = &mut self.graph.namespaces[idx];
        ns.contributing_assemblies.insert(assembly.clone());
        ns.types.push(ty);
        self.graph.assemblies.insert(assembly);
        self
    }

    /// Finish, returning the normalized graph (`G1`).
    #[must_use]
    pub fn build(self) -> SymbolGraph {
        self.graph.normalized()
    }
}
