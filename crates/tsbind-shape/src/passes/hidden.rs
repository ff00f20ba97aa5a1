//! Hidden-member planning (shape pass 9).
//!
//! A member that hides its base counterpart (`new` in the source
//! language) cannot share the base's emitted slot. The renamed
//! identifier is reserved now, through the naming authority, so the
//! later reservation stage (idempotent per stable id and scope) keeps
//! it.

use crate::context::PassContext;
use tsbind_common::{DiagnosticCode, DiagnosticSite};
use tsbind_model::{EmitScope, MemberFlags, Scope, SymbolGraph, TypeSymbol};
use tsbind_naming::{ReserveReason, ReserveSource};

pub fn run(graph: SymbolGraph, ctx: &mut PassContext<'_>) -> SymbolGraph {
    if !ctx.policy.renaming.hidden_new {
        return graph;
    }
    let mut graph = graph;
    for ns in &mut graph.namespaces {
        for ty in &mut ns.types {
            plan_hidden(ty, ctx);
        }
    }
    graph
}

fn on_surface(scope: EmitScope) -> bool {
    matches!(scope, EmitScope::ClassSurface | EmitScope::StaticSurface)
}

fn plan_hidden(ty: &TypeSymbol, ctx: &mut PassContext<'_>) {
    let suffix = ctx.policy.class.hidden_member_suffix.clone();
    let scope = Scope::ty(ty.clr_full_name());

    for method in &ty.methods {
        if !method.flags.contains(MemberFlags::NEW) || !on_surface(method.emit_scope) {
            continue;
        }
        let requested = format!("{}{suffix}", method.clr_name);
        let final_name = ctx.renamer.reserve_method(
            &method.id,
            &requested,
            &scope,
            ReserveReason::HiddenNewConflict,
            method.is_static(),
            &ReserveSource::plain(),
            ctx.diagnostics,
        );
        ctx.diagnostics.report_at(
            DiagnosticCode::HiddenNewConflict,
            format!("hiding member `{}` reserved as `{final_name}`", method.clr_name),
            DiagnosticSite::member(&ty.namespace, &ty.clr_name, &method.clr_name),
        );
    }
    for prop in &ty.properties {
        if !prop.flags.contains(MemberFlags::NEW) || !on_surface(prop.emit_scope) {
            continue;
        }
        let requested = format!("{}{suffix}", prop.clr_name);
        let final_name = ctx.renamer.reserve_member(
            &prop.id,
            &requested,
            &scope,
            ReserveReason::HiddenNewConflict,
            prop.is_static(),
            &ReserveSource::plain(),
            ctx.diagnostics,
        );
        ctx.diagnostics.report_at(
            DiagnosticCode::HiddenNewConflict,
            format!("hiding member `{}` reserved as `{final_name}`", prop.clr_name),
            DiagnosticSite::member(&ty.namespace, &ty.clr_name, &prop.clr_name),
        );
    }
    for field in &ty.fields {
        if !field.flags.contains(MemberFlags::NEW) || !on_surface(field.emit_scope) {
            continue;
        }
        let requested = format!("{}{suffix}", field.clr_name);
        let final_name = ctx.renamer.reserve_member(
            &field.id,
            &requested,
            &scope,
            ReserveReason::HiddenNewConflict,
            field.is_static(),
            &ReserveSource::plain(),
            ctx.diagnostics,
        );
        ctx.diagnostics.report_at(
            DiagnosticCode::HiddenNewConflict,
            format!("hiding member `{}` reserved as `{final_name}`", field.clr_name),
            DiagnosticSite::member(&ty.namespace, &ty.clr_name, &field.clr_name),
        );
    }
}
