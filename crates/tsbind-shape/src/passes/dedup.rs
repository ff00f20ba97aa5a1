//! Member deduplication (shape pass 15).
//!
//! Earlier passes may have introduced the same stable id twice (a
//! conformance clone and an explicit-impl clone racing for the same
//! interface member). Within each member family, the first occurrence
//! per stable id wins; order is storage order, which is deterministic
//! by construction.

use crate::context::PassContext;
use rustc_hash::FxHashSet;
use tsbind_model::SymbolGraph;

pub fn run(graph: SymbolGraph, _ctx: &mut PassContext<'_>) -> SymbolGraph {
    let mut graph = graph;
    for ns in &mut graph.namespaces {
        for ty in &mut ns.types {
            let mut seen = FxHashSet::default();
            ty.methods.retain(|m| seen.insert(m.id.clone()));
            let mut seen = FxHashSet::default();
            ty.properties.retain(|p| seen.insert(p.id.clone()));
            let mut seen = FxHashSet::default();
            ty.fields.retain(|f| seen.insert(f.id.clone()));
            let mut seen = FxHashSet::default();
            ty.events.retain(|e| seen.insert(e.id.clone()));
            let mut seen = FxHashSet::default();
            ty.constructors.retain(|c| seen.insert(c.id.clone()));
        }
    }
    graph
}
