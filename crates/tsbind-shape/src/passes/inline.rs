//! Interface inlining (shape pass 3).
//!
//! The target system has no interface multiple-inheritance worth
//! relying on for bindings: each interface absorbs its base-interface
//! closure and drops the `extends` list. Deduplication keys differ by
//! member family - canonical signature for methods and events, bare
//! name for non-indexer properties (the target system cannot overload
//! properties), full signature for indexers.

use crate::context::PassContext;
use crate::passes::resolve_interface;
use crate::substitute::{
    instantiate_method, instantiate_property, instantiated_method_signature,
    instantiated_property_signature, substitute,
};
use rustc_hash::FxHashSet;
use std::collections::VecDeque;
use tsbind_common::limits::MAX_INTERFACE_CLOSURE;
use tsbind_common::DiagnosticCode;
use tsbind_model::signature::event_signature;
use tsbind_model::{EmitScope, Provenance, SymbolGraph, TypeReference, TypeSymbol};

pub fn run(graph: SymbolGraph, ctx: &mut PassContext<'_>) -> SymbolGraph {
    if !ctx.policy.interface.inline_all {
        return graph;
    }
    let mut next = graph.clone();
    for ns in &mut next.namespaces {
        for ty in &mut ns.types {
            if ty.is_interface() {
                inline_interface(ty, &graph, ctx);
            }
        }
    }
    next
}

fn inline_interface(ty: &mut TypeSymbol, graph: &SymbolGraph, ctx: &mut PassContext<'_>) {
    let mut seen_method_sigs: FxHashSet<String> = ty
        .methods
        .iter()
        .map(instantiated_method_signature)
        .collect();
    let mut seen_property_names: FxHashSet<String> = ty
        .properties
        .iter()
        .filter(|p| !p.is_indexer())
        .map(|p| p.clr_name.clone())
        .collect();
    let mut seen_indexer_sigs: FxHashSet<String> = ty
        .properties
        .iter()
        .filter(|p| p.is_indexer())
        .map(instantiated_property_signature)
        .collect();
    let mut seen_event_sigs: FxHashSet<String> = ty
        .events
        .iter()
        .map(|e| event_signature(&e.clr_name, &e.handler_type, e.is_static()))
        .collect();

    let mut queue: VecDeque<TypeReference> = ty.interfaces.drain(..).collect();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut steps = 0usize;

    while let Some(base_ref) = queue.pop_front() {
        steps += 1;
        if steps > MAX_INTERFACE_CLOSURE {
            ctx.diagnostics.report(
                DiagnosticCode::ExternalInterfaceReference,
                format!(
                    "base-interface closure of {} exceeded {MAX_INTERFACE_CLOSURE} steps",
                    ty.clr_full_name()
                ),
            );
            break;
        }
        if !visited.insert(base_ref.to_string()) {
            continue;
        }
        let Some((base, args)) = resolve_interface(graph, &base_ref) else {
            // Base lives outside the compiled set; its members cannot
            // be inlined. Left for the import planner to surface.
            continue;
        };

        for method in &base.methods {
            let mut inlined = instantiate_method(method, &args);
            if seen_method_sigs.insert(instantiated_method_signature(&inlined)) {
                inlined.provenance = Provenance::FromInterface;
                inlined.source_interface = Some(base_ref.clone());
                inlined.emit_scope = EmitScope::ClassSurface;
                ty.methods.push(inlined);
            }
        }
        for property in &base.properties {
            let mut inlined = instantiate_property(property, &args);
            let fresh = if inlined.is_indexer() {
                seen_indexer_sigs.insert(instantiated_property_signature(&inlined))
            } else {
                seen_property_names.insert(inlined.clr_name.clone())
            };
            if fresh {
                inlined.provenance = Provenance::FromInterface;
                inlined.source_interface = Some(base_ref.clone());
                inlined.emit_scope = EmitScope::ClassSurface;
                ty.properties.push(inlined);
            }
        }
        for event in &base.events {
            let mut inlined = event.clone();
            inlined.handler_type = substitute(&event.handler_type, &args);
            let key = event_signature(&inlined.clr_name, &inlined.handler_type, inlined.is_static());
            if seen_event_sigs.insert(key) {
                inlined.provenance = Provenance::FromInterface;
                inlined.source_interface = Some(base_ref.clone());
                inlined.emit_scope = EmitScope::ClassSurface;
                ty.events.push(inlined);
            }
        }

        // Grandparents arrive expressed in this base's parameter
        // space; rewrite them into ours before queueing.
        for grand in &base.interfaces {
            queue.push_back(substitute(grand, &args));
        }
    }
}
