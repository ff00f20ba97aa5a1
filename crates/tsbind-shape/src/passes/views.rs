//! View planning (shape pass 14).
//!
//! Every view-only member that knows its source interface must end up
//! in exactly one explicit view for that interface. Views merge by the
//! interface's stable id (open definition), so `IList<KV<K,V>>` seen
//! twice produces one view with the union of members.
//!
//! View property names: `As_<Simple>` for non-generic interfaces;
//! `As_<Simple>_<arity>_of_<arg>{_and_<arg>}*` for generic ones, with
//! argument labels taken from type-parameter names (open) or sanitized
//! simple names (closed).

use crate::context::PassContext;
use crate::passes::interface_stable_id;
use tsbind_model::{
    EmitScope, ExplicitView, MemberStableId, SymbolGraph, TypeKind, TypeReference, TypeSymbol,
};

pub fn run(graph: SymbolGraph, _ctx: &mut PassContext<'_>) -> SymbolGraph {
    let mut graph = graph;
    for ns in &mut graph.namespaces {
        for ty in &mut ns.types {
            // Interfaces participate too: diamond resolution can leave
            // view-only members on an interface surface.
            if matches!(ty.kind, TypeKind::Class | TypeKind::Struct | TypeKind::Interface) {
                plan_views(ty);
            }
        }
    }
    graph
}

fn plan_views(ty: &mut TypeSymbol) {
    let lenient_statics = ty.is_static_container();

    let mut memberships: Vec<(TypeReference, MemberStableId)> = Vec::new();
    for method in &ty.methods {
        if method.emit_scope == EmitScope::ViewOnly
            && let Some(source) = &method.source_interface
        {
            if lenient_statics && method.is_static() {
                continue;
            }
            memberships.push((source.clone(), method.id.clone()));
        }
    }
    for prop in &ty.properties {
        if prop.emit_scope == EmitScope::ViewOnly
            && let Some(source) = &prop.source_interface
        {
            if lenient_statics && prop.is_static() {
                continue;
            }
            memberships.push((source.clone(), prop.id.clone()));
        }
    }
    for event in &ty.events {
        if event.emit_scope == EmitScope::ViewOnly
            && let Some(source) = &event.source_interface
        {
            if lenient_statics && event.is_static() {
                continue;
            }
            memberships.push((source.clone(), event.id.clone()));
        }
    }

    // Deterministic view creation order: by interface stable id, then
    // member id.
    memberships.sort_by(|a, b| {
        (interface_stable_id(&a.0), &a.1).cmp(&(interface_stable_id(&b.0), &b.1))
    });

    for (source, member_id) in memberships {
        let Some(iface_id) = interface_stable_id(&source) else {
            continue;
        };
        let view = match ty
            .explicit_views
            .iter_mut()
            .find(|v| v.interface_id == iface_id)
        {
            Some(existing) => existing,
            None => {
                let mut fresh = ExplicitView::new(source.clone(), iface_id);
                fresh.property_name = Some(view_property_name(&source));
                ty.explicit_views.push(fresh);
                let last = ty.explicit_views.len() - 1;
                &mut ty.explicit_views[last]
            }
        };
        view.add_member(member_id);
    }
}

/// The `As_*` property name for a view over `reference`.
#[must_use]
pub fn view_property_name(reference: &TypeReference) -> String {
    match reference {
        TypeReference::Named(named) => {
            if named.arity == 0 {
                format!("As_{}", named.simple_name)
            } else {
                let mut name = format!("As_{}_{}", named.simple_name, named.arity);
                for (i, arg) in named.type_arguments.iter().enumerate() {
                    let sep = if i == 0 { "_of_" } else { "_and_" };
                    name.push_str(sep);
                    name.push_str(&argument_label(arg));
                }
                name
            }
        }
        other => format!("As_{}", argument_label(other)),
    }
}

/// A short identifier-safe label for one type argument.
fn argument_label(arg: &TypeReference) -> String {
    match arg {
        TypeReference::GenericParameter { name, .. } => name.clone(),
        TypeReference::Named(named) => named.simple_name.replace(['`', '+', '.'], "_"),
        TypeReference::Nested { nested_name, .. } => nested_name.replace(['`', '+', '.'], "_"),
        TypeReference::Array { element, .. } => format!("{}Array", argument_label(element)),
        TypeReference::Pointer { pointee } => argument_label(pointee),
        TypeReference::ByRef { referenced } => argument_label(referenced),
        TypeReference::Placeholder => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsbind_model::build::string_ref;

    #[test]
    fn non_generic_view_names() {
        let iface = TypeReference::named("CoreLib", "System", "IDisposable", 0, []);
        assert_eq!(view_property_name(&iface), "As_IDisposable");
    }

    #[test]
    fn closed_generic_view_names() {
        let iface = TypeReference::named(
            "CoreLib",
            "System.Collections.Generic",
            "IEnumerable",
            1,
            [string_ref()],
        );
        assert_eq!(view_property_name(&iface), "As_IEnumerable_1_of_String");
    }

    #[test]
    fn open_generic_view_names_use_parameter_names() {
        let iface = TypeReference::named(
            "CoreLib",
            "System.Collections.Generic",
            "IDictionary",
            2,
            [
                TypeReference::type_param("TKey", 0),
                TypeReference::type_param("TValue", 1),
            ],
        );
        assert_eq!(
            view_property_name(&iface),
            "As_IDictionary_2_of_TKey_and_TValue"
        );
    }

    #[test]
    fn constructed_argument_uses_sanitized_simple_name() {
        let kvp = TypeReference::named(
            "CoreLib",
            "System.Collections.Generic",
            "KeyValuePair",
            2,
            [
                TypeReference::type_param("K", 0),
                TypeReference::type_param("V", 1),
            ],
        );
        let iface = TypeReference::named(
            "CoreLib",
            "System.Collections.Generic",
            "IList",
            1,
            [kvp],
        );
        assert_eq!(view_property_name(&iface), "As_IList_1_of_KeyValuePair");
    }
}
