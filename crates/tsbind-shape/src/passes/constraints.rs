//! Constraint closure (shape pass 12).
//!
//! Generic-parameter constraints arrive as raw CLR references. The
//! closure walk resolves each against the graph (memoized, cycle-safe,
//! depth-capped), validates the special-constraint flags, and merges
//! duplicates per policy. Constraints the target system cannot encode
//! (pointer, byref) are reported, not dropped - the shape stays intact
//! for the sidecars.

use crate::context::PassContext;
use rustc_hash::{FxHashMap, FxHashSet};
use tsbind_common::limits::MAX_CONSTRAINT_DEPTH;
use tsbind_common::policy::ConstraintMerge;
use tsbind_common::{DiagnosticCode, DiagnosticSite};
use tsbind_model::{GenericParam, SpecialConstraints, SymbolGraph, TypeReference, TypeSymbol};

pub fn run(graph: SymbolGraph, ctx: &mut PassContext<'_>) -> SymbolGraph {
    let mut next = graph.clone();
    let mut memo: FxHashMap<String, bool> = FxHashMap::default();
    for ns in &mut next.namespaces {
        for ty in &mut ns.types {
            close_type_constraints(ty, &graph, ctx, &mut memo);
        }
    }
    next
}

fn close_type_constraints(
    ty: &mut TypeSymbol,
    graph: &SymbolGraph,
    ctx: &mut PassContext<'_>,
    memo: &mut FxHashMap<String, bool>,
) {
    let namespace = ty.namespace.clone();
    let type_name = ty.clr_name.clone();

    let mut params: Vec<&mut GenericParam> = ty.generic_params.iter_mut().collect();
    for method in &mut ty.methods {
        params.extend(method.generic_params.iter_mut());
    }

    for param in params {
        let site = DiagnosticSite::member(&namespace, &type_name, &param.name);

        if param
            .special
            .contains(SpecialConstraints::REFERENCE_TYPE | SpecialConstraints::VALUE_TYPE)
        {
            ctx.diagnostics.report_at(
                DiagnosticCode::ConstraintContradiction,
                format!(
                    "`{}` carries both reference-type and value-type constraints",
                    param.name
                ),
                site.clone(),
            );
        }

        for constraint in &param.constraints {
            if matches!(
                constraint,
                TypeReference::Pointer { .. } | TypeReference::ByRef { .. }
            ) {
                ctx.diagnostics.report_at(
                    DiagnosticCode::ConstraintUnrepresentable,
                    format!("constraint `{constraint}` on `{}` has no target encoding", param.name),
                    site.clone(),
                );
            } else if matches!(constraint, TypeReference::Placeholder) {
                ctx.diagnostics.report_at(
                    DiagnosticCode::ConstraintNarrowed,
                    format!("unresolvable constraint on `{}` narrows to the object type", param.name),
                    site.clone(),
                );
            } else if ctx.policy.constraint.strict_closure {
                let mut visiting = FxHashSet::default();
                let _ = resolve_closure(constraint, graph, memo, &mut visiting, 0);
            }
        }

        merge_constraints(param, ctx, &site);
    }
}

/// Whether a constraint reference (and, transitively, the constraints
/// of the types it names) resolves within the graph. Memoized per CLR
/// key; the visiting set breaks F-bounded cycles like
/// `T : IComparable<T>`.
fn resolve_closure(
    constraint: &TypeReference,
    graph: &SymbolGraph,
    memo: &mut FxHashMap<String, bool>,
    visiting: &mut FxHashSet<String>,
    depth: usize,
) -> bool {
    if depth > MAX_CONSTRAINT_DEPTH {
        return false;
    }
    let Some(key) = constraint.clr_lookup_key() else {
        // Generic parameters and placeholders resolve trivially.
        return true;
    };
    if let Some(&resolved) = memo.get(&key) {
        return resolved;
    }
    if !visiting.insert(key.clone()) {
        return true;
    }
    let resolved = match graph.type_by_full_name(&key) {
        Some(target) => target
            .generic_params
            .iter()
            .flat_map(|gp| gp.constraints.iter())
            .all(|c| resolve_closure(c, graph, memo, visiting, depth + 1)),
        None => true, // external; the import planner accounts for it
    };
    visiting.remove(&key);
    memo.insert(key, resolved);
    resolved
}

fn merge_constraints(param: &mut GenericParam, ctx: &mut PassContext<'_>, site: &DiagnosticSite) {
    if param.constraints.len() < 2 {
        return;
    }
    match ctx.policy.constraint.merge {
        ConstraintMerge::Intersection => {
            dedup_in_place(&mut param.constraints);
        }
        ConstraintMerge::Union => {
            // Union semantics have no downstream encoding; approximate
            // with the intersection-like concatenation and say so.
            ctx.diagnostics.report_at(
                DiagnosticCode::ConstraintMergeUnsupported,
                format!("union merge on `{}` approximated by concatenation", param.name),
                site.clone(),
            );
            dedup_in_place(&mut param.constraints);
        }
        ConstraintMerge::PreferLeft => {
            param.constraints.truncate(1);
        }
    }
}

fn dedup_in_place(constraints: &mut Vec<TypeReference>) {
    let mut seen: FxHashSet<String> = FxHashSet::default();
    constraints.retain(|c| seen.insert(c.to_string()));
}
