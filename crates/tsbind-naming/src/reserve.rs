//! The name reservation stage.
//!
//! Runs after the shape passes and assigns a final name to everything
//! the emission plan will reference: types (nested included), class
//! surface members, view properties, and view members. The walk order
//! is fixed so numeric-suffix allocation is deterministic:
//! namespaces lexicographically, types by kind tier then name, members
//! instance-side before static-side, class surface before views.

use crate::renamer::{Renamer, ReserveReason, ReserveSource};
use tsbind_common::policy::Policy;
use tsbind_common::DiagnosticBag;
use tsbind_model::{
    EmitScope, MemberFlags, MemberStableId, NamespaceSymbol, Provenance, Scope, SymbolGraph,
    TypeReference, TypeSymbol, Visibility,
};

/// Reserve final names across the whole graph, producing the revision
/// the planners consume. Every emitted entity in the result carries a
/// non-empty `ts_emit_name`.
#[must_use]
pub fn reserve_names(
    graph: &SymbolGraph,
    policy: &Policy,
    renamer: &mut Renamer,
    diagnostics: &mut DiagnosticBag,
) -> SymbolGraph {
    let mut next = graph.clone();
    for ns in &mut next.namespaces {
        reserve_namespace(ns, policy, renamer, diagnostics);
    }
    next
}

fn reserve_namespace(
    ns: &mut NamespaceSymbol,
    policy: &Policy,
    renamer: &mut Renamer,
    diagnostics: &mut DiagnosticBag,
) {
    let ns_scope = Scope::namespace(&ns.name, Visibility::Public);

    // Type names first, in the emission-order tiebreak order (kind
    // tier, requested name, arity) so suffix allocation matches the
    // order types later appear in output.
    let mut order: Vec<usize> = (0..ns.types.len()).collect();
    order.sort_by(|&a, &b| {
        let (ta, tb) = (&ns.types[a], &ns.types[b]);
        (ta.kind.tier(), requested_type_name(ta), ta.arity).cmp(&(
            tb.kind.tier(),
            requested_type_name(tb),
            tb.arity,
        ))
    });

    for &idx in &order {
        let ty = &mut ns.types[idx];
        reserve_type_tree(ty, None, &ns_scope, renamer, diagnostics);
    }
    for &idx in &order {
        let ty = &mut ns.types[idx];
        reserve_members_tree(ty, policy, renamer, diagnostics);
    }
}

/// The name a type asks for before any conflict handling: simple name,
/// with `_<arity>` appended for generics (the target system cannot
/// overload one simple name across arities).
fn requested_type_name(ty: &TypeSymbol) -> String {
    if ty.arity > 0 {
        format!("{}_{}", ty.simple_name, ty.arity)
    } else {
        ty.simple_name.clone()
    }
}

fn reserve_type_tree(
    ty: &mut TypeSymbol,
    parent_final: Option<&str>,
    ns_scope: &Scope,
    renamer: &mut Renamer,
    diagnostics: &mut DiagnosticBag,
) {
    let requested = match parent_final {
        // Nested types flatten into the namespace scope with a `$`
        // separator, mirroring the external `+` → `$` mapping.
        Some(outer) => format!("{outer}${}", requested_type_name(ty)),
        None => requested_type_name(ty),
    };
    let final_name = renamer.reserve_type(
        &ty.id,
        &requested,
        ns_scope,
        ReserveReason::Requested,
        &ReserveSource::plain(),
        diagnostics,
    );
    ty.ts_emit_name = Some(final_name.clone());

    let mut order: Vec<usize> = (0..ty.nested_types.len()).collect();
    order.sort_by(|&a, &b| {
        let (na, nb) = (&ty.nested_types[a], &ty.nested_types[b]);
        (na.kind.tier(), requested_type_name(na)).cmp(&(nb.kind.tier(), requested_type_name(nb)))
    });
    for idx in order {
        reserve_type_tree(
            &mut ty.nested_types[idx],
            Some(&final_name),
            ns_scope,
            renamer,
            diagnostics,
        );
    }
}

fn reserve_members_tree(
    ty: &mut TypeSymbol,
    policy: &Policy,
    renamer: &mut Renamer,
    diagnostics: &mut DiagnosticBag,
) {
    reserve_type_members(ty, policy, renamer, diagnostics);
    for nested in &mut ty.nested_types {
        reserve_members_tree(nested, policy, renamer, diagnostics);
    }
}

/// The name a member asks for: its CLR name, except hiding members
/// which request the hidden-member suffix up front.
fn requested_member_name(clr_name: &str, flags: MemberFlags, policy: &Policy) -> (String, ReserveReason) {
    if flags.contains(MemberFlags::NEW) && policy.renaming.hidden_new {
        (
            format!("{clr_name}{}", policy.class.hidden_member_suffix),
            ReserveReason::HiddenNewConflict,
        )
    } else {
        (clr_name.to_string(), ReserveReason::Requested)
    }
}

fn source_for(provenance: Provenance, source_interface: Option<&TypeReference>) -> ReserveSource {
    if provenance == Provenance::ExplicitView
        && let Some(TypeReference::Named(named)) = source_interface
    {
        ReserveSource::from_interface(named.simple_name.clone())
    } else {
        ReserveSource::plain()
    }
}

fn on_surface(scope: EmitScope) -> bool {
    matches!(scope, EmitScope::ClassSurface | EmitScope::StaticSurface)
}

fn reserve_type_members(
    ty: &mut TypeSymbol,
    policy: &Policy,
    renamer: &mut Renamer,
    diagnostics: &mut DiagnosticBag,
) {
    let type_scope = Scope::ty(ty.clr_full_name());

    // Class surface: instance side fully reserved before the static
    // side, member families in emission-tier order, each family sorted
    // by (name, canonical signature).
    for want_static in [false, true] {
        let mut field_order: Vec<usize> = (0..ty.fields.len()).collect();
        field_order.sort_by(|&a, &b| {
            (&ty.fields[a].clr_name, &ty.fields[a].id.canonical_signature)
                .cmp(&(&ty.fields[b].clr_name, &ty.fields[b].id.canonical_signature))
        });
        for idx in field_order {
            let field = &mut ty.fields[idx];
            if field.is_static() != want_static || !on_surface(field.emit_scope) {
                continue;
            }
            let (requested, reason) = requested_member_name(&field.clr_name, field.flags, policy);
            let name = renamer.reserve_member(
                &field.id,
                &requested,
                &type_scope,
                reason,
                field.is_static(),
                &ReserveSource::plain(),
                diagnostics,
            );
            field.ts_emit_name = Some(name);
        }

        let mut prop_order: Vec<usize> = (0..ty.properties.len()).collect();
        prop_order.sort_by(|&a, &b| {
            (&ty.properties[a].clr_name, &ty.properties[a].id.canonical_signature)
                .cmp(&(&ty.properties[b].clr_name, &ty.properties[b].id.canonical_signature))
        });
        for idx in prop_order {
            let prop = &mut ty.properties[idx];
            if prop.is_static() != want_static || !on_surface(prop.emit_scope) {
                continue;
            }
            let (requested, reason) = requested_member_name(&prop.clr_name, prop.flags, policy);
            let source = source_for(prop.provenance, prop.source_interface.as_ref());
            let name = renamer.reserve_member(
                &prop.id,
                &requested,
                &type_scope,
                reason,
                prop.is_static(),
                &source,
                diagnostics,
            );
            prop.ts_emit_name = Some(name);
        }

        let mut event_order: Vec<usize> = (0..ty.events.len()).collect();
        event_order.sort_by(|&a, &b| {
            (&ty.events[a].clr_name, &ty.events[a].id.canonical_signature)
                .cmp(&(&ty.events[b].clr_name, &ty.events[b].id.canonical_signature))
        });
        for idx in event_order {
            let event = &mut ty.events[idx];
            if event.is_static() != want_static || !on_surface(event.emit_scope) {
                continue;
            }
            let (requested, reason) = requested_member_name(&event.clr_name, event.flags, policy);
            let source = source_for(event.provenance, event.source_interface.as_ref());
            let name = renamer.reserve_member(
                &event.id,
                &requested,
                &type_scope,
                reason,
                event.is_static(),
                &source,
                diagnostics,
            );
            event.ts_emit_name = Some(name);
        }

        let mut method_order: Vec<usize> = (0..ty.methods.len()).collect();
        method_order.sort_by(|&a, &b| {
            (&ty.methods[a].clr_name, &ty.methods[a].id.canonical_signature)
                .cmp(&(&ty.methods[b].clr_name, &ty.methods[b].id.canonical_signature))
        });
        for idx in method_order {
            let method = &mut ty.methods[idx];
            if method.is_static() != want_static || !on_surface(method.emit_scope) {
                continue;
            }
            let (requested, reason) = requested_member_name(&method.clr_name, method.flags, policy);
            let source = source_for(method.provenance, method.source_interface.as_ref());
            let name = renamer.reserve_method(
                &method.id,
                &requested,
                &type_scope,
                reason,
                method.is_static(),
                &source,
                diagnostics,
            );
            method.ts_emit_name = Some(name);
        }
    }

    // View properties next: they occupy instance slots on the class
    // surface alongside the members reserved above.
    let mut view_order: Vec<usize> = (0..ty.explicit_views.len()).collect();
    view_order.sort_by(|&a, &b| {
        ty.explicit_views[a]
            .interface_id
            .cmp(&ty.explicit_views[b].interface_id)
    });
    for &idx in &view_order {
        let view = &mut ty.explicit_views[idx];
        let requested = view.property_name.clone().unwrap_or_else(|| {
            // View planning normally names views; this fallback keeps
            // the identifier legal if one slipped through unnamed.
            let flat = view
                .interface_id
                .clr_full_name
                .replace(['.', '`', '+'], "_");
            format!("As_{flat}")
        });
        let final_name = renamer.reserve_type(
            &view.interface_id,
            &requested,
            &type_scope,
            ReserveReason::ViewProperty,
            &ReserveSource::plain(),
            diagnostics,
        );
        view.property_name = Some(final_name);
    }

    // View members last: probe the class surface, suffix on collision.
    for &idx in &view_order {
        let member_ids = ty.explicit_views[idx].members.clone();
        let view_scope = Scope::view(ty.id.clone(), ty.explicit_views[idx].interface_id.clone());
        for member_id in &member_ids {
            let Some((clr_name, is_static)) = view_member_facts(ty, member_id) else {
                continue;
            };
            let natural = renamer.peek_final_member(&type_scope, &clr_name, is_static);
            let (requested, reason) = if renamer.is_taken(&type_scope, &natural, is_static) {
                (format!("{clr_name}$view"), ReserveReason::ViewMemberCollision)
            } else {
                (clr_name.clone(), ReserveReason::Requested)
            };
            let name = renamer.reserve_member(
                member_id,
                &requested,
                &view_scope,
                reason,
                is_static,
                &ReserveSource::plain(),
                diagnostics,
            );
            set_view_member_name(ty, member_id, name);
        }
    }
}

fn view_member_facts(ty: &TypeSymbol, id: &MemberStableId) -> Option<(String, bool)> {
    if let Some(m) = ty.methods.iter().find(|m| &m.id == id) {
        return Some((m.clr_name.clone(), m.is_static()));
    }
    if let Some(p) = ty.properties.iter().find(|p| &p.id == id) {
        return Some((p.clr_name.clone(), p.is_static()));
    }
    if let Some(e) = ty.events.iter().find(|e| &e.id == id) {
        return Some((e.clr_name.clone(), e.is_static()));
    }
    None
}

fn set_view_member_name(ty: &mut TypeSymbol, id: &MemberStableId, name: String) {
    if let Some(m) = ty.methods.iter_mut().find(|m| &m.id == id) {
        m.ts_emit_name = Some(name);
    } else if let Some(p) = ty.properties.iter_mut().find(|p| &p.id == id) {
        p.ts_emit_name = Some(name);
    } else if let Some(e) = ty.events.iter_mut().find(|e| &e.id == id) {
        e.ts_emit_name = Some(name);
    }
}
