//! The overload unifier.
//!
//! Runs after name reservation: final names are known, so the key the
//! target system actually sees exists. Within a type, non-static
//! class-surface methods sharing an erasure key are indistinguishable
//! downstream; the widest signature survives and the rest are omitted.
//! The unifier never edits a kept method.

use crate::context::PassContext;
use std::collections::BTreeMap;
use tsbind_common::{DiagnosticCode, DiagnosticSite};
use tsbind_model::{EmitScope, MethodSymbol, SymbolGraph, TypeSymbol};

/// The coarse key for overloads the target system cannot tell apart:
/// final name, generic arity, parameter count.
#[must_use]
pub fn erasure_key(method: &MethodSymbol) -> String {
    let name = method.ts_emit_name.as_deref().unwrap_or(&method.clr_name);
    format!(
        "{name}|{}|{}",
        method.generic_arity(),
        method.parameters.len()
    )
}

pub fn unify_overloads(graph: SymbolGraph, ctx: &mut PassContext<'_>) -> SymbolGraph {
    let mut graph = graph;
    for ns in &mut graph.namespaces {
        for ty in &mut ns.types {
            unify_type(ty, ctx);
        }
    }
    graph
}

fn unify_type(ty: &mut TypeSymbol, ctx: &mut PassContext<'_>) {
    let mut buckets: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, method) in ty.methods.iter().enumerate() {
        // Statics are untouchable here; they stay on the class surface.
        if method.is_static() || method.emit_scope != EmitScope::ClassSurface {
            continue;
        }
        buckets.entry(erasure_key(method)).or_default().push(idx);
    }

    for (key, indices) in buckets {
        if indices.len() < 2 {
            continue;
        }
        // Widest signature: fewest ref/out, fewest constraints, then
        // stable-id order as the deterministic tail.
        let winner = indices
            .iter()
            .copied()
            .min_by_key(|&i| {
                let m = &ty.methods[i];
                (m.ref_out_count(), m.constraint_count(), m.id.clone())
            })
            .unwrap_or(indices[0]);

        for &i in &indices {
            if i == winner {
                continue;
            }
            ty.methods[i].emit_scope = EmitScope::Omitted;
            ctx.diagnostics.report_at(
                DiagnosticCode::OverloadOmitted,
                format!(
                    "`{}` omitted: indistinguishable from a kept overload under key `{key}`",
                    ty.methods[i].clr_name
                ),
                DiagnosticSite::member(&ty.namespace, &ty.clr_name, &ty.methods[i].clr_name),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsbind_common::policy::Policy;
    use tsbind_common::{DiagnosticBag, Interner};
    use tsbind_model::build::{GraphBuilder, MethodBuilder, TypeBuilder, int_ref, long_ref, string_ref};
    use tsbind_model::members::{Parameter, ParameterKind};
    use tsbind_naming::Renamer;

    fn run_on(graph: SymbolGraph) -> (SymbolGraph, DiagnosticBag) {
        let policy = Policy::default();
        let mut renamer = Renamer::new();
        let mut interner = Interner::new();
        let mut diagnostics = DiagnosticBag::new();
        let mut ctx = PassContext::new(&policy, &mut renamer, &mut interner, &mut diagnostics);
        let out = unify_overloads(graph, &mut ctx);
        (out, diagnostics)
    }

    #[test]
    fn same_arity_same_count_collapses_to_widest() {
        let graph = GraphBuilder::new()
            .ty(TypeBuilder::class("CoreLib", "System", "Widget")
                .method(
                    MethodBuilder::new("Parse")
                        .returns(int_ref())
                        .param(Parameter::new("s", string_ref()).with_kind(ParameterKind::Ref)),
                )
                .method(
                    MethodBuilder::new("Parse")
                        .returns(int_ref())
                        .param(Parameter::new("s", string_ref())),
                )
                .build())
            .build();
        let (out, diag) = run_on(graph);
        let ty = &out.namespaces[0].types[0];
        let kept: Vec<&MethodSymbol> = ty
            .methods
            .iter()
            .filter(|m| m.emit_scope == EmitScope::ClassSurface)
            .collect();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].ref_out_count(), 0, "plain parameter wins over ref");
        assert_eq!(diag.count_of(DiagnosticCode::OverloadOmitted), 1);
    }

    #[test]
    fn distinct_param_counts_both_survive() {
        let graph = GraphBuilder::new()
            .ty(TypeBuilder::class("CoreLib", "System", "Widget")
                .method(MethodBuilder::new("Add").param(Parameter::new("a", int_ref())))
                .method(
                    MethodBuilder::new("Add")
                        .param(Parameter::new("a", int_ref()))
                        .param(Parameter::new("b", long_ref())),
                )
                .build())
            .build();
        let (out, diag) = run_on(graph);
        let ty = &out.namespaces[0].types[0];
        assert!(ty
            .methods
            .iter()
            .all(|m| m.emit_scope == EmitScope::ClassSurface));
        assert_eq!(diag.count_of(DiagnosticCode::OverloadOmitted), 0);
    }

    #[test]
    fn statics_are_never_omitted() {
        let graph = GraphBuilder::new()
            .ty(TypeBuilder::class("CoreLib", "System", "Widget")
                .method(MethodBuilder::new("Of").static_().param(Parameter::new("a", int_ref())))
                .method(MethodBuilder::new("Of").static_().param(Parameter::new("a", long_ref())))
                .build())
            .build();
        let (out, _) = run_on(graph);
        let ty = &out.namespaces[0].types[0];
        assert!(ty.methods.iter().all(|m| m.emit_scope != EmitScope::Omitted));
    }
}
