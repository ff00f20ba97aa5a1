//! Indexer planning and enforcement (shape passes 8 and 10).
//!
//! The target system has exactly one indexed-property slot per type.
//! Policy permitting, a lone class-surface indexer keeps that slot;
//! everything else becomes a `get_*`/`set_*` method pair. View-only
//! indexers never survive: a view cannot carry an indexed property, so
//! they are always converted. Pass 10 re-applies the invariant after
//! the intervening passes and hard-errors on any survivor.

use crate::context::PassContext;
use tsbind_common::{DiagnosticCode, DiagnosticSite};
use tsbind_model::signature::method_signature;
use tsbind_model::{
    EmitScope, MemberStableId, MethodSymbol, Parameter, PropertySymbol, Provenance, SymbolGraph,
    TypeReference, TypeSymbol,
};

/// Pass 8: the planning sweep.
pub fn run_planning(graph: SymbolGraph, ctx: &mut PassContext<'_>) -> SymbolGraph {
    let mut graph = graph;
    for ns in &mut graph.namespaces {
        for ty in &mut ns.types {
            plan_indexers(ty, ctx, false);
        }
    }
    graph
}

/// Pass 10: the enforcement sweep. Anything pass 8's invariant no
/// longer holds for is converted again; a view-only indexer that still
/// remains is a hard error.
pub fn run_enforcement(graph: SymbolGraph, ctx: &mut PassContext<'_>) -> SymbolGraph {
    let mut graph = graph;
    for ns in &mut graph.namespaces {
        for ty in &mut ns.types {
            plan_indexers(ty, ctx, true);
        }
    }
    graph
}

fn plan_indexers(ty: &mut TypeSymbol, ctx: &mut PassContext<'_>, enforce: bool) {
    let surface_indexer_count = ty
        .properties
        .iter()
        .filter(|p| {
            p.is_indexer()
                && matches!(p.emit_scope, EmitScope::ClassSurface | EmitScope::StaticSurface)
        })
        .count();
    let keep_single =
        surface_indexer_count == 1 && ctx.policy.indexer.property_when_single;

    let mut kept: Vec<PropertySymbol> = Vec::new();
    let mut methods: Vec<MethodSymbol> = Vec::new();
    for prop in ty.properties.drain(..) {
        if !prop.is_indexer() {
            kept.push(prop);
            continue;
        }
        match prop.emit_scope {
            EmitScope::ClassSurface | EmitScope::StaticSurface if keep_single => {
                kept.push(prop);
            }
            EmitScope::Omitted => kept.push(prop),
            EmitScope::ViewOnly if enforce => {
                // Conversion should already have consumed this one.
                ctx.diagnostics.report_at(
                    DiagnosticCode::IndexerConflict,
                    format!("indexer `{}` survived in a view position", prop.clr_name),
                    DiagnosticSite::member(&ty.namespace, &ty.clr_name, &prop.clr_name),
                );
                kept.push(prop);
            }
            _ => {
                methods.extend(convert_indexer(&prop, &ctx.policy.indexer.method_name));
            }
        }
    }
    ty.properties = kept;
    ty.methods.extend(methods);
}

/// Convert one indexer property into its accessor method pair.
fn convert_indexer(prop: &PropertySymbol, stem: &str) -> Vec<MethodSymbol> {
    let mut out = Vec::with_capacity(2);
    let assembly = &prop.id.assembly;
    let declaring = &prop.id.declaring_clr_full_name;
    let is_static = prop.is_static();

    if prop.has_getter {
        let name = format!("get_{stem}");
        let sig = method_signature(&name, 0, &prop.index_parameters, &prop.property_type, is_static);
        out.push(MethodSymbol {
            id: MemberStableId::new(assembly, declaring, &name, sig),
            clr_name: name,
            return_type: prop.property_type.clone(),
            parameters: prop.index_parameters.clone(),
            generic_params: Vec::new(),
            flags: prop.flags,
            visibility: prop.visibility,
            provenance: Provenance::IndexerNormalized,
            source_interface: prop.source_interface.clone(),
            emit_scope: prop.emit_scope,
            ts_emit_name: None,
        });
    }
    if prop.has_setter {
        let name = format!("set_{stem}");
        let void = TypeReference::named(assembly.clone(), "System", "Void", 0, []);
        let mut params = prop.index_parameters.clone();
        params.push(Parameter::new("value", prop.property_type.clone()));
        let sig = method_signature(&name, 0, &params, &void, is_static);
        out.push(MethodSymbol {
            id: MemberStableId::new(assembly, declaring, &name, sig),
            clr_name: name,
            return_type: void,
            parameters: params,
            generic_params: Vec::new(),
            flags: prop.flags,
            visibility: prop.visibility,
            provenance: Provenance::IndexerNormalized,
            source_interface: prop.source_interface.clone(),
            emit_scope: prop.emit_scope,
            ts_emit_name: None,
        });
    }
    out
}
