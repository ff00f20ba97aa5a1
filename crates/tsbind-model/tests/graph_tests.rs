use tsbind_model::build::{
    GraphBuilder, MethodBuilder, PropertyBuilder, TypeBuilder, int_ref, string_ref,
};
use tsbind_model::members::{EmitScope, Parameter};
use tsbind_model::typeref::TypeReference;

#[test]
fn builder_produces_normalized_graph() {
    let graph = GraphBuilder::new()
        .assembly("CoreLib")
        .ty(TypeBuilder::class("CoreLib", "System.IO", "Stream").build())
        .ty(TypeBuilder::class("CoreLib", "System", "Object").build())
        .ty(TypeBuilder::class("CoreLib", "System", "Array").build())
        .build();

    let names: Vec<&str> = graph.namespaces.iter().map(|ns| ns.name.as_str()).collect();
    assert_eq!(names, vec!["System", "System.IO"]);
    let system_types: Vec<&str> = graph.namespaces[0]
        .types
        .iter()
        .map(|t| t.simple_name.as_str())
        .collect();
    assert_eq!(system_types, vec!["Array", "Object"]);
}

#[test]
fn member_ids_embed_canonical_signatures() {
    let ty = TypeBuilder::class("CoreLib", "System", "Console")
        .method(
            MethodBuilder::new("WriteLine")
                .param(Parameter::new("value", string_ref()))
                .static_(),
        )
        .build();
    let method = &ty.methods[0];
    assert_eq!(method.id.declaring_clr_full_name, "System.Console");
    assert!(method.id.canonical_signature.contains("static=true"));
    assert_eq!(method.emit_scope, EmitScope::StaticSurface);
}

#[test]
fn generic_type_gets_backtick_name_and_self_reference() {
    let ty = TypeBuilder::class("CoreLib", "System.Collections.Generic", "Dictionary")
        .generic("TKey")
        .generic("TValue")
        .build();
    assert_eq!(ty.clr_name, "Dictionary`2");
    assert_eq!(ty.arity, 2);
    assert_eq!(
        ty.id.clr_full_name,
        "System.Collections.Generic.Dictionary`2"
    );
    assert!(matches!(ty.self_reference(), TypeReference::Named(ref n) if n.arity == 2));
}

#[test]
fn indexer_detection() {
    let ty = TypeBuilder::class("CoreLib", "System.Collections", "ArrayList")
        .property(
            PropertyBuilder::new("Item", string_ref()).index(Parameter::new("index", int_ref())),
        )
        .property(PropertyBuilder::new("Count", int_ref()).getter_only())
        .build();
    assert!(ty.properties[0].is_indexer());
    assert!(!ty.properties[1].is_indexer());
    assert!(ty.properties[1].is_read_only());
}
