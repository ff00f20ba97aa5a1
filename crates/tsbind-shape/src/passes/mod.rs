//! The shape pass pipeline.
//!
//! Order matters and is fixed here. Passes transform what they can and
//! record the rest as diagnostics; only the gate refuses emission.

use crate::context::PassContext;
use tsbind_model::typeref::TypeReference;
use tsbind_model::{SymbolGraph, TypeStableId, TypeSymbol};

pub mod conformance;
pub mod inline;
pub mod explicit_impl;
pub mod diamond;
pub mod base_overloads;
pub mod static_side;
pub mod indexers;
pub mod hidden;
pub mod surface_dedup;
pub mod constraints;
pub mod return_overloads;
pub mod views;
pub mod dedup;

/// Resolve a (possibly constructed) interface reference against the
/// graph: the open interface symbol plus the argument list to
/// instantiate its members with.
#[must_use]
pub fn resolve_interface<'g>(
    graph: &'g SymbolGraph,
    reference: &TypeReference,
) -> Option<(&'g TypeSymbol, Vec<TypeReference>)> {
    let key = reference.clr_lookup_key()?;
    let symbol = graph.type_by_full_name(&key)?;
    if !symbol.is_interface() {
        return None;
    }
    let args = match reference {
        TypeReference::Named(named) => named.type_arguments.to_vec(),
        _ => Vec::new(),
    };
    Some((symbol, args))
}

/// The stable id an interface reference denotes (its open definition).
#[must_use]
pub fn interface_stable_id(reference: &TypeReference) -> Option<TypeStableId> {
    tsbind_model::stable_id_for(reference)
}

/// Run the shape passes in their fixed order: `G1 → G2`.
#[must_use]
pub fn run_shape_passes(graph: SymbolGraph, ctx: &mut PassContext<'_>) -> SymbolGraph {
    let passes: &[(&str, fn(SymbolGraph, &mut PassContext<'_>) -> SymbolGraph)] = &[
        ("structural-conformance", conformance::run),
        ("interface-inlining", inline::run),
        ("explicit-impl-synthesis", explicit_impl::run),
        ("diamond-resolution", diamond::run),
        ("base-overload-addition", base_overloads::run),
        ("static-side-analysis", static_side::run),
        ("indexer-planning", indexers::run_planning),
        ("hidden-member-planning", hidden::run),
        ("indexer-enforcement", indexers::run_enforcement),
        ("class-surface-dedup", surface_dedup::run),
        ("constraint-closure", constraints::run),
        ("return-overload-resolution", return_overloads::run),
        ("view-planning", views::run),
        ("member-dedup", dedup::run),
    ];

    let mut graph = graph;
    // The global interface index is pass zero: building the graph's
    // indices up front warms the lookups every later pass leans on.
    let _ = graph.indices();
    for (name, pass) in passes {
        let span = tracing::debug_span!("shape_pass", pass = name);
        let _guard = span.enter();
        let before = graph.type_count();
        graph = pass(graph, ctx);
        tracing::debug!(pass = name, types_before = before, types_after = graph.type_count(), "pass done");
    }
    graph
}
