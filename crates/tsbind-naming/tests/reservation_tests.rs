use tsbind_common::policy::Policy;
use tsbind_common::DiagnosticBag;
use tsbind_model::build::{GraphBuilder, MethodBuilder, TypeBuilder, string_ref};
use tsbind_model::{EmitScope, ExplicitView, MemberFlags, TypeStableId};
use tsbind_naming::{reserve_names, Renamer};

#[test]
fn generic_types_request_arity_suffixed_names() {
    let graph = GraphBuilder::new()
        .ty(TypeBuilder::class("CoreLib", "System.Collections.Generic", "List")
            .generic("T")
            .build())
        .ty(TypeBuilder::class("CoreLib", "System.Collections.Generic", "Dictionary")
            .generic("TKey")
            .generic("TValue")
            .build())
        .build();

    let mut renamer = Renamer::new();
    let mut diag = DiagnosticBag::new();
    let named = reserve_names(&graph, &Policy::default(), &mut renamer, &mut diag);

    let names: Vec<&str> = named.namespaces[0]
        .types
        .iter()
        .filter_map(|t| t.ts_emit_name.as_deref())
        .collect();
    assert!(names.contains(&"List_1"));
    assert!(names.contains(&"Dictionary_2"));
}

#[test]
fn hidden_members_request_the_suffix() {
    let graph = GraphBuilder::new()
        .ty(TypeBuilder::class("CoreLib", "System", "Derived")
            .method(
                MethodBuilder::new("ToString")
                    .returns(string_ref())
                    .flags(MemberFlags::NEW),
            )
            .build())
        .build();

    let mut renamer = Renamer::new();
    let mut diag = DiagnosticBag::new();
    let named = reserve_names(&graph, &Policy::default(), &mut renamer, &mut diag);
    let method = &named.namespaces[0].types[0].methods[0];
    assert_eq!(method.ts_emit_name.as_deref(), Some("ToString_new"));
}

#[test]
fn view_members_get_view_suffix_when_class_surface_claims_the_name() {
    let iface_id = TypeStableId::new("CoreLib", "System.IConvertible");
    let mut ty = TypeBuilder::class("CoreLib", "System", "Widget")
        .method(MethodBuilder::new("ToByte").returns(string_ref()))
        .method(MethodBuilder::new("ToByte").returns(string_ref()).generic("T"))
        .build();
    // Second method becomes the interface's view-only clone.
    ty.methods[1].emit_scope = EmitScope::ViewOnly;
    ty.methods[1].source_interface = Some(tsbind_model::TypeReference::named(
        "CoreLib",
        "System",
        "IConvertible",
        0,
        [],
    ));
    let mut view = ExplicitView::new(
        tsbind_model::TypeReference::named("CoreLib", "System", "IConvertible", 0, []),
        iface_id.clone(),
    );
    view.property_name = Some("As_IConvertible".to_string());
    view.add_member(ty.methods[1].id.clone());
    ty.explicit_views.push(view);

    let graph = GraphBuilder::new().ty(ty).build();
    let mut renamer = Renamer::new();
    let mut diag = DiagnosticBag::new();
    let named = reserve_names(&graph, &Policy::default(), &mut renamer, &mut diag);

    let ty = &named.namespaces[0].types[0];
    let class_method = ty
        .methods
        .iter()
        .find(|m| m.emit_scope == EmitScope::ClassSurface)
        .unwrap();
    let view_method = ty
        .methods
        .iter()
        .find(|m| m.emit_scope == EmitScope::ViewOnly)
        .unwrap();
    assert_eq!(class_method.ts_emit_name.as_deref(), Some("ToByte"));
    assert_eq!(view_method.ts_emit_name.as_deref(), Some("ToByte$view"));
    assert_eq!(
        ty.explicit_views[0].property_name.as_deref(),
        Some("As_IConvertible")
    );
}

#[test]
fn reservation_is_deterministic_across_runs() {
    let build = || {
        GraphBuilder::new()
            .ty(TypeBuilder::class("CoreLib", "System", "Alpha")
                .method(MethodBuilder::new("Run"))
                .build())
            .ty(TypeBuilder::class("WinLib", "System", "Alpha")
                .method(MethodBuilder::new("Run"))
                .build())
            .build()
    };

    let run = |graph| {
        let mut renamer = Renamer::new();
        let mut diag = DiagnosticBag::new();
        reserve_names(&graph, &Policy::default(), &mut renamer, &mut diag)
    };

    let a = run(build());
    let b = run(build());
    assert_eq!(a, b);
}
