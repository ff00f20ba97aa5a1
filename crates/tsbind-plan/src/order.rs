//! The emission-order planner.
//!
//! A total, content-based order: namespaces lexicographically, types
//! by kind tier then final name then arity, members by family tier
//! (constructors, fields, properties, events, methods), instance
//! before static, then final name and canonical signature. Every key
//! is a final name from the reservation stage - never a raw CLR name -
//! so renames cannot reorder output between runs.

use serde::Serialize;
use tsbind_model::{EmitScope, MemberStableId, SymbolGraph, TypeStableId, TypeSymbol};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TypeOrderEntry {
    pub id: TypeStableId,
    /// Emitted members in print order (omitted members excluded).
    pub members: Vec<MemberStableId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NamespaceOrder {
    pub namespace: String,
    pub types: Vec<TypeOrderEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EmitOrder {
    pub namespaces: Vec<NamespaceOrder>,
}

/// Member family tier within a type body.
const TIER_CONSTRUCTOR: u8 = 0;
const TIER_FIELD: u8 = 1;
const TIER_PROPERTY: u8 = 2;
const TIER_EVENT: u8 = 3;
const TIER_METHOD: u8 = 4;

#[must_use]
pub fn plan_emission_order(graph: &SymbolGraph) -> EmitOrder {
    let mut namespaces: Vec<NamespaceOrder> = graph
        .namespaces
        .iter()
        .map(|ns| {
            let mut types: Vec<&TypeSymbol> = ns.types.iter().collect();
            types.sort_by(|a, b| {
                (
                    a.kind.tier(),
                    a.ts_emit_name.as_deref().unwrap_or(""),
                    a.arity,
                )
                    .cmp(&(b.kind.tier(), b.ts_emit_name.as_deref().unwrap_or(""), b.arity))
            });
            NamespaceOrder {
                namespace: ns.name.clone(),
                types: types.into_iter().map(order_type_members).collect(),
            }
        })
        .collect();
    namespaces.sort_by(|a, b| a.namespace.cmp(&b.namespace));
    EmitOrder { namespaces }
}

fn order_type_members(ty: &TypeSymbol) -> TypeOrderEntry {
    // (family tier, static?, final name, canonical signature)
    let mut keyed: Vec<(u8, bool, String, String, MemberStableId)> = Vec::new();

    for ctor in &ty.constructors {
        if ctor.emit_scope == EmitScope::Omitted {
            continue;
        }
        keyed.push((
            TIER_CONSTRUCTOR,
            ctor.is_static(),
            String::new(),
            ctor.id.canonical_signature.clone(),
            ctor.id.clone(),
        ));
    }
    for field in &ty.fields {
        if field.emit_scope == EmitScope::Omitted {
            continue;
        }
        keyed.push((
            TIER_FIELD,
            field.is_static(),
            field.ts_emit_name.clone().unwrap_or_default(),
            field.id.canonical_signature.clone(),
            field.id.clone(),
        ));
    }
    for prop in &ty.properties {
        if prop.emit_scope == EmitScope::Omitted {
            continue;
        }
        keyed.push((
            TIER_PROPERTY,
            prop.is_static(),
            prop.ts_emit_name.clone().unwrap_or_default(),
            prop.id.canonical_signature.clone(),
            prop.id.clone(),
        ));
    }
    for event in &ty.events {
        if event.emit_scope == EmitScope::Omitted {
            continue;
        }
        keyed.push((
            TIER_EVENT,
            event.is_static(),
            event.ts_emit_name.clone().unwrap_or_default(),
            event.id.canonical_signature.clone(),
            event.id.clone(),
        ));
    }
    for method in &ty.methods {
        if method.emit_scope == EmitScope::Omitted {
            continue;
        }
        keyed.push((
            TIER_METHOD,
            method.is_static(),
            method.ts_emit_name.clone().unwrap_or_default(),
            method.id.canonical_signature.clone(),
            method.id.clone(),
        ));
    }

    keyed.sort();
    TypeOrderEntry {
        id: ty.id.clone(),
        members: keyed.into_iter().map(|(_, _, _, _, id)| id).collect(),
    }
}
