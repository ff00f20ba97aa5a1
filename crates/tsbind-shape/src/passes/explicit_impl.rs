//! Explicit-implementation synthesis (shape pass 4).
//!
//! After conformance and inlining, any interface requirement a type
//! still lacks under *exact* canonical-signature matching (no erasure)
//! gets a clone. The clone's destination depends on policy: a view
//! member (default), a suffixed class-surface member, or nothing.

use crate::context::PassContext;
use crate::passes::resolve_interface;
use crate::substitute::{
    instantiate_method, instantiate_property, instantiated_method_signature,
    instantiated_property_signature,
};
use rustc_hash::FxHashSet;
use tsbind_common::policy::ExplicitImplMode;
use tsbind_common::{DiagnosticCode, DiagnosticSite};
use tsbind_model::{EmitScope, Provenance, SymbolGraph, TypeKind, TypeSymbol};

pub fn run(graph: SymbolGraph, ctx: &mut PassContext<'_>) -> SymbolGraph {
    if ctx.policy.class.explicit_impl == ExplicitImplMode::Skip {
        return graph;
    }
    let mut next = graph.clone();
    for ns in &mut next.namespaces {
        for ty in &mut ns.types {
            synthesize_for_type(ty, &graph, ctx);
        }
    }
    next
}

fn clone_scope(mode: ExplicitImplMode) -> EmitScope {
    match mode {
        ExplicitImplMode::SynthesizeWithSuffix => EmitScope::ClassSurface,
        ExplicitImplMode::EmitExplicitViews | ExplicitImplMode::Skip => EmitScope::ViewOnly,
    }
}

fn synthesize_for_type(ty: &mut TypeSymbol, graph: &SymbolGraph, ctx: &mut PassContext<'_>) {
    if !matches!(ty.kind, TypeKind::Class | TypeKind::Struct) {
        return;
    }
    let mode = ctx.policy.class.explicit_impl;

    let method_sigs: FxHashSet<String> = ty
        .methods
        .iter()
        .map(instantiated_method_signature)
        .collect();
    let property_sigs: FxHashSet<String> = ty
        .properties
        .iter()
        .map(instantiated_property_signature)
        .collect();
    let method_ids: FxHashSet<_> = ty.methods.iter().map(|m| m.id.clone()).collect();
    let property_ids: FxHashSet<_> = ty.properties.iter().map(|p| p.id.clone()).collect();

    let interfaces = ty.interfaces.clone();
    for iface_ref in &interfaces {
        let Some((iface, args)) = resolve_interface(graph, iface_ref) else {
            continue;
        };

        for method in &iface.methods {
            if method.is_static() {
                continue;
            }
            let required = instantiate_method(method, &args);
            if method_sigs.contains(&instantiated_method_signature(&required))
                || method_ids.contains(&required.id)
            {
                continue;
            }
            ctx.diagnostics.report_at(
                DiagnosticCode::ExplicitImplSynthesized,
                format!("synthesized `{}` required by {iface_ref}", required.clr_name),
                DiagnosticSite::member(&ty.namespace, &ty.clr_name, &required.clr_name),
            );
            let mut clone = required;
            clone.provenance = Provenance::ExplicitView;
            clone.source_interface = Some(iface_ref.clone());
            clone.emit_scope = clone_scope(mode);
            ty.methods.push(clone);
        }

        for property in &iface.properties {
            if property.is_static() {
                continue;
            }
            let required = instantiate_property(property, &args);
            if property_sigs.contains(&instantiated_property_signature(&required))
                || property_ids.contains(&required.id)
            {
                continue;
            }
            ctx.diagnostics.report_at(
                DiagnosticCode::ExplicitImplSynthesized,
                format!("synthesized `{}` required by {iface_ref}", required.clr_name),
                DiagnosticSite::member(&ty.namespace, &ty.clr_name, &required.clr_name),
            );
            let mut clone = required;
            clone.provenance = Provenance::ExplicitView;
            clone.source_interface = Some(iface_ref.clone());
            clone.emit_scope = clone_scope(mode);
            ty.properties.push(clone);
        }
    }
}
