//! Class-surface deduplication by emitted name (shape pass 11).
//!
//! Two properties that will emit under the same name cannot share a
//! class surface. Grouping uses the name the naming authority *would*
//! assign (the non-mutating peek), so a style transform or sanitation
//! cannot split or merge groups behind the pass's back. One winner
//! stays; the rest demote to views.

use crate::context::PassContext;
use std::collections::BTreeMap;
use tsbind_common::{DiagnosticCode, DiagnosticSite};
use tsbind_model::{EmitScope, Provenance, Scope, SymbolGraph, TypeSymbol};

pub fn run(graph: SymbolGraph, ctx: &mut PassContext<'_>) -> SymbolGraph {
    let mut graph = graph;
    for ns in &mut graph.namespaces {
        for ty in &mut ns.types {
            dedup_surface_properties(ty, ctx);
        }
    }
    graph
}

fn dedup_surface_properties(ty: &mut TypeSymbol, ctx: &mut PassContext<'_>) {
    let scope = Scope::ty(ty.clr_full_name());

    let mut groups: BTreeMap<(String, bool), Vec<usize>> = BTreeMap::new();
    for (idx, prop) in ty.properties.iter().enumerate() {
        if !matches!(prop.emit_scope, EmitScope::ClassSurface | EmitScope::StaticSurface) {
            continue;
        }
        let would_be = ctx
            .renamer
            .peek_final_member(&scope, &prop.clr_name, prop.is_static());
        groups
            .entry((would_be, prop.is_static()))
            .or_default()
            .push(idx);
    }

    for ((name, _), indices) in groups {
        if indices.len() < 2 {
            continue;
        }
        let winner = indices
            .iter()
            .copied()
            .min_by_key(|&i| winner_rank(ty, i))
            .unwrap_or(indices[0]);

        let winner_type = ty.properties[winner].property_type.clone();
        ctx.diagnostics.report_at(
            DiagnosticCode::DedupWinner,
            format!(
                "`{name}` kept from {}; {} duplicate(s) demoted",
                ty.properties[winner].id.declaring_clr_full_name,
                indices.len() - 1
            ),
            DiagnosticSite::member(&ty.namespace, &ty.clr_name, &name),
        );

        for &i in &indices {
            if i == winner {
                continue;
            }
            if ty.properties[i].property_type != winner_type {
                ctx.diagnostics.report_at(
                    DiagnosticCode::CovarianceLoss,
                    format!(
                        "`{name}`: surface keeps `{}`, variant typed `{}` moves to a view",
                        winner_type, ty.properties[i].property_type
                    ),
                    DiagnosticSite::member(&ty.namespace, &ty.clr_name, &name),
                );
            }
            ty.properties[i].emit_scope = EmitScope::ViewOnly;
        }
    }
}

/// Strict lexicographic winner rank:
/// non-explicit-view provenance, then generic-typed before concrete,
/// then non-`Object` before `Object`, then declaring type and
/// canonical signature.
fn winner_rank(ty: &TypeSymbol, idx: usize) -> (u8, u8, u8, String, String) {
    let prop = &ty.properties[idx];
    let explicit = u8::from(prop.provenance == Provenance::ExplicitView);
    let generic = u8::from(!prop.property_type.mentions_generic_parameter());
    let object = u8::from(matches!(
        &prop.property_type,
        tsbind_model::TypeReference::Named(n)
            if n.namespace == "System" && n.simple_name == "Object"
    ));
    (
        explicit,
        generic,
        object,
        prop.id.declaring_clr_full_name.clone(),
        prop.id.canonical_signature.clone(),
    )
}
