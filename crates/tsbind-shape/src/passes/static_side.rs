//! Static-side analysis (shape pass 7).
//!
//! Statics do not inherit in the target system, so a derived type's
//! static member and a base static of the same name would land on two
//! unrelated objects - or collide when the printer merges surfaces.
//! Policy picks the response: analyze (warn), auto-rename through the
//! naming authority, or error.

use crate::context::PassContext;
use rustc_hash::FxHashSet;
use tsbind_common::policy::StaticSideAction;
use tsbind_common::{DiagnosticCode, DiagnosticSite};
use tsbind_model::{Scope, SymbolGraph, TypeKind, TypeSymbol};
use tsbind_naming::{ReserveReason, ReserveSource};

pub fn run(graph: SymbolGraph, ctx: &mut PassContext<'_>) -> SymbolGraph {
    let mut next = graph.clone();
    for ns in &mut next.namespaces {
        for ty in &mut ns.types {
            if ty.kind == TypeKind::Class {
                analyze_statics(ty, &graph, ctx);
            }
        }
    }
    next
}

/// Static member names declared anywhere up the base chain.
fn base_static_names(ty: &TypeSymbol, graph: &SymbolGraph) -> FxHashSet<String> {
    let mut names = FxHashSet::default();
    let mut current = ty.base_type.clone();
    let mut visited: FxHashSet<String> = FxHashSet::default();
    while let Some(base_ref) = current.take() {
        let Some(key) = base_ref.clr_lookup_key() else {
            break;
        };
        if !visited.insert(key.clone()) {
            break;
        }
        let Some(base) = graph.type_by_full_name(&key) else {
            break;
        };
        for m in base.methods.iter().filter(|m| m.is_static()) {
            names.insert(m.clr_name.clone());
        }
        for p in base.properties.iter().filter(|p| p.is_static()) {
            names.insert(p.clr_name.clone());
        }
        for f in base.fields.iter().filter(|f| f.is_static()) {
            names.insert(f.clr_name.clone());
        }
        for e in base.events.iter().filter(|e| e.is_static()) {
            names.insert(e.clr_name.clone());
        }
        current = base.base_type.clone();
    }
    names
}

fn analyze_statics(ty: &mut TypeSymbol, graph: &SymbolGraph, ctx: &mut PassContext<'_>) {
    let base_names = base_static_names(ty, graph);
    if base_names.is_empty() {
        return;
    }
    let scope = Scope::ty(ty.clr_full_name());
    let namespace = ty.namespace.clone();
    let type_name = ty.clr_name.clone();

    let mut colliding: Vec<(String, tsbind_model::MemberStableId, bool)> = Vec::new();
    for m in ty.methods.iter().filter(|m| m.is_static()) {
        if base_names.contains(&m.clr_name) {
            colliding.push((m.clr_name.clone(), m.id.clone(), true));
        }
    }
    for p in ty.properties.iter().filter(|p| p.is_static()) {
        if base_names.contains(&p.clr_name) {
            colliding.push((p.clr_name.clone(), p.id.clone(), false));
        }
    }
    for f in ty.fields.iter().filter(|f| f.is_static()) {
        if base_names.contains(&f.clr_name) {
            colliding.push((f.clr_name.clone(), f.id.clone(), false));
        }
    }
    colliding.sort();

    for (name, id, is_method) in colliding {
        let site = DiagnosticSite::member(&namespace, &type_name, &name);
        match ctx.policy.static_side.action {
            StaticSideAction::Analyze => {
                ctx.diagnostics.report_at(
                    DiagnosticCode::StaticSideCollisionNoted,
                    format!("static `{name}` shadows a base static of the same name"),
                    site,
                );
            }
            StaticSideAction::AutoRename => {
                if !ctx.policy.renaming.allow_static_member_rename {
                    ctx.diagnostics.report_at(
                        DiagnosticCode::StaticSideNameCollision,
                        format!("static `{name}` collides with a base static and renaming is disabled"),
                        site,
                    );
                    continue;
                }
                let requested = format!("{name}_static");
                let final_name = if is_method {
                    ctx.renamer.reserve_method(
                        &id,
                        &requested,
                        &scope,
                        ReserveReason::StaticSideNameCollision,
                        true,
                        &ReserveSource::plain(),
                        ctx.diagnostics,
                    )
                } else {
                    ctx.renamer.reserve_member(
                        &id,
                        &requested,
                        &scope,
                        ReserveReason::StaticSideNameCollision,
                        true,
                        &ReserveSource::plain(),
                        ctx.diagnostics,
                    )
                };
                ctx.diagnostics.report_at(
                    DiagnosticCode::StaticSideRenamed,
                    format!("static `{name}` renamed to `{final_name}`"),
                    site,
                );
            }
            StaticSideAction::Error => {
                ctx.diagnostics.report_at(
                    DiagnosticCode::StaticSideNameCollision,
                    format!("static `{name}` collides with a base static of the same name"),
                    site,
                );
            }
        }
    }
}
