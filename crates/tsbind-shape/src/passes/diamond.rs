//! Diamond resolution (shape pass 5).
//!
//! A diamond exists when one method name carries two or more distinct
//! canonical signatures contributed by distinct interfaces. Policy
//! decides: keep all variants as overloads, keep the preferred path
//! and demote the rest to views, or report and leave the shape alone.

use crate::context::PassContext;
use crate::substitute::instantiated_method_signature;
use std::collections::BTreeMap;
use tsbind_common::policy::DiamondPolicy;
use tsbind_common::{DiagnosticCode, DiagnosticSite};
use tsbind_model::{EmitScope, Provenance, SymbolGraph, TypeSymbol};

pub fn run(graph: SymbolGraph, ctx: &mut PassContext<'_>) -> SymbolGraph {
    let mut graph = graph;
    for ns in &mut graph.namespaces {
        for ty in &mut ns.types {
            resolve_diamonds(ty, ctx);
        }
    }
    graph
}

fn resolve_diamonds(ty: &mut TypeSymbol, ctx: &mut PassContext<'_>) {
    // Ordered name grouping keeps the policy outcome deterministic.
    let mut by_name: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, method) in ty.methods.iter().enumerate() {
        if method.emit_scope == EmitScope::ClassSurface && !method.is_static() {
            by_name.entry(method.clr_name.clone()).or_default().push(idx);
        }
    }

    let declared_order = ty.interfaces.clone();
    let namespace = ty.namespace.clone();
    let type_name = ty.clr_name.clone();

    for (name, indices) in by_name {
        if indices.len() < 2 {
            continue;
        }
        // Distinct signatures from distinct interface sources.
        let mut sources: Vec<String> = indices
            .iter()
            .filter_map(|&i| ty.methods[i].source_interface.as_ref())
            .map(|r| r.to_string())
            .collect();
        sources.sort();
        sources.dedup();
        if sources.len() < 2 {
            continue;
        }
        let mut sigs: Vec<String> = indices
            .iter()
            .map(|&i| instantiated_method_signature(&ty.methods[i]))
            .collect();
        sigs.sort();
        sigs.dedup();
        if sigs.len() < 2 {
            continue;
        }

        match ctx.policy.interface.diamond {
            DiamondPolicy::OverloadAll => {
                // Every variant stays; reservation shares the name and
                // the unifier arbitrates anything the target system
                // cannot tell apart.
            }
            DiamondPolicy::PreferDerived => {
                let winner = indices
                    .iter()
                    .copied()
                    .min_by_key(|&i| diamond_rank(ty, i, &declared_order))
                    .unwrap_or(indices[0]);
                for &i in &indices {
                    if i != winner {
                        let method = &mut ty.methods[i];
                        method.emit_scope = EmitScope::ViewOnly;
                        method.provenance = Provenance::DiamondResolved;
                    }
                }
            }
            DiamondPolicy::Error => {
                ctx.diagnostics.report_at(
                    DiagnosticCode::DiamondConflict,
                    format!(
                        "`{name}` reaches {} through {} distinct interface paths",
                        type_name,
                        sources.len()
                    ),
                    DiagnosticSite::member(&namespace, &type_name, &name),
                );
            }
        }
    }
}

/// Preference rank under `PreferDerived`: the type's own declarations
/// first, then interface contributions in declared-interface order
/// (metadata lists the most-derived interface ahead of its bases),
/// canonical signature as the final tiebreak.
fn diamond_rank(
    ty: &TypeSymbol,
    idx: usize,
    declared_order: &[tsbind_model::TypeReference],
) -> (usize, String) {
    let method = &ty.methods[idx];
    let source_rank = match &method.source_interface {
        None => 0,
        Some(source) => {
            let key = source.to_string();
            declared_order
                .iter()
                .position(|r| r.to_string() == key)
                .map_or(usize::MAX - 1, |p| p + 1)
        }
    };
    (source_rank, instantiated_method_signature(method))
}
