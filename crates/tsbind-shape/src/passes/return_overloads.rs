//! Return-type overload resolution (shape pass 13).
//!
//! The target system cannot overload on return type alone. Instance
//! methods that agree on everything but the return type keep one
//! representative on the class surface; the others move to views.
//! Statics are never touched - they stay on the class surface.

use crate::context::PassContext;
use std::collections::BTreeMap;
use tsbind_common::{DiagnosticCode, DiagnosticSite};
use tsbind_model::signature::method_signature_excluding_return;
use tsbind_model::{EmitScope, Provenance, SymbolGraph, TypeSymbol};

pub fn run(graph: SymbolGraph, ctx: &mut PassContext<'_>) -> SymbolGraph {
    let mut graph = graph;
    for ns in &mut graph.namespaces {
        for ty in &mut ns.types {
            resolve_return_overloads(ty, ctx);
        }
    }
    graph
}

fn resolve_return_overloads(ty: &mut TypeSymbol, ctx: &mut PassContext<'_>) {
    let mut buckets: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (idx, method) in ty.methods.iter().enumerate() {
        if method.is_static() || method.emit_scope != EmitScope::ClassSurface {
            continue;
        }
        let key = method_signature_excluding_return(
            &method.clr_name,
            method.generic_arity(),
            &method.parameters,
            false,
        );
        buckets.entry(key).or_default().push(idx);
    }

    for (_, indices) in buckets {
        if indices.len() < 2 {
            continue;
        }
        let mut returns: Vec<String> = indices
            .iter()
            .map(|&i| ty.methods[i].return_type.to_string())
            .collect();
        returns.sort();
        returns.dedup();
        if returns.len() < 2 {
            continue;
        }

        // The type's own declaration outranks an explicit-impl clone;
        // then non-void, then fewest ref/out, then lexicographic.
        let winner = indices
            .iter()
            .copied()
            .min_by_key(|&i| {
                let m = &ty.methods[i];
                (
                    u8::from(m.provenance == Provenance::ExplicitView),
                    u8::from(m.return_type.is_void()),
                    m.ref_out_count(),
                    m.id.canonical_signature.clone(),
                )
            })
            .unwrap_or(indices[0]);

        for &i in &indices {
            if i == winner {
                continue;
            }
            let (name, ns, ty_name) = (
                ty.methods[i].clr_name.clone(),
                ty.namespace.clone(),
                ty.clr_name.clone(),
            );
            ty.methods[i].emit_scope = EmitScope::ViewOnly;
            ctx.diagnostics.report_at(
                DiagnosticCode::ReturnOverloadDemoted,
                format!(
                    "`{name}` return-type variant `{}` demoted to a view",
                    ty.methods[i].return_type
                ),
                DiagnosticSite::member(ns, ty_name, name.clone()),
            );
        }
    }
}
