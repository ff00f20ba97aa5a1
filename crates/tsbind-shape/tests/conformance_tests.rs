//! Structural conformance scenarios: a satisfied closed-generic
//! interface produces no view; a covariant property forces one.

use tsbind_common::policy::Policy;
use tsbind_common::{DiagnosticBag, Interner};
use tsbind_model::build::{GraphBuilder, MethodBuilder, PropertyBuilder, TypeBuilder, string_ref};
use tsbind_model::{EmitScope, Provenance, SymbolGraph, TypeReference};
use tsbind_naming::Renamer;
use tsbind_shape::{run_shape_passes, PassContext};

fn shape(graph: SymbolGraph) -> (SymbolGraph, DiagnosticBag) {
    let policy = Policy::default();
    let mut renamer = Renamer::new();
    let mut interner = Interner::new();
    let mut diagnostics = DiagnosticBag::new();
    let mut ctx = PassContext::new(&policy, &mut renamer, &mut interner, &mut diagnostics);
    let out = run_shape_passes(graph, &mut ctx);
    (out, diagnostics)
}

fn enumerator_of(arg: TypeReference) -> TypeReference {
    TypeReference::named(
        "CoreLib",
        "System.Collections.Generic",
        "IEnumerator",
        1,
        [arg],
    )
}

/// A class implementing `IEnumerable<string>` with a matching
/// `GetEnumerator` conforms structurally: no clone, no view.
#[test]
fn satisfied_closed_generic_interface_creates_no_view() {
    let ienumerable = TypeBuilder::interface(
        "CoreLib",
        "System.Collections.Generic",
        "IEnumerable",
    )
    .generic("T")
    .method(
        MethodBuilder::new("GetEnumerator")
            .returns(enumerator_of(TypeReference::type_param("T", 0))),
    )
    .build();

    let my_list = TypeBuilder::class("CoreLib", "System.Collections", "MyList")
        .implements(TypeReference::named(
            "CoreLib",
            "System.Collections.Generic",
            "IEnumerable",
            1,
            [string_ref()],
        ))
        .method(MethodBuilder::new("GetEnumerator").returns(enumerator_of(string_ref())))
        .build();

    let graph = GraphBuilder::new().ty(ienumerable).ty(my_list).build();
    let (shaped, _) = shape(graph);

    let my_list = shaped.type_by_full_name("System.Collections.MyList").unwrap();
    assert!(
        my_list.explicit_views.is_empty(),
        "structural conformance passed; no view expected"
    );
    assert_eq!(my_list.methods.len(), 1, "no clone synthesized");
    assert_eq!(my_list.methods[0].emit_scope, EmitScope::ClassSurface);
    // The interface list survives for the heritage clause.
    assert_eq!(my_list.interfaces.len(), 1);
}

/// `IList<KeyValuePair<K,V>>.Item` against a class surface `Item: V`
/// fails conformance; the clone carries the interface's stable id and
/// lands in a view named for the constructed interface.
#[test]
fn covariant_property_forces_view() {
    let kvp = |k: TypeReference, v: TypeReference| {
        TypeReference::named(
            "CoreLib",
            "System.Collections.Generic",
            "KeyValuePair",
            2,
            [k, v],
        )
    };

    let ilist = TypeBuilder::interface("CoreLib", "System.Collections.Generic", "IList")
        .generic("T")
        .property(PropertyBuilder::new("Item", TypeReference::type_param("T", 0)))
        .build();
    let ilist_member_id = ilist.properties[0].id.clone();

    let dict = TypeBuilder::class("Collections", "System.Collections.Specialized", "OrderedDictionary")
        .generic("K")
        .generic("V")
        .implements(TypeReference::named(
            "CoreLib",
            "System.Collections.Generic",
            "IList",
            1,
            [kvp(
                TypeReference::type_param("K", 0),
                TypeReference::type_param("V", 1),
            )],
        ))
        .property(PropertyBuilder::new("Item", TypeReference::type_param("V", 1)))
        .build();

    let graph = GraphBuilder::new().ty(ilist).ty(dict).build();
    let (shaped, _) = shape(graph);

    let dict = shaped
        .type_by_full_name("System.Collections.Specialized.OrderedDictionary`2")
        .unwrap();

    // The class surface keeps its own Item: V.
    let surface: Vec<_> = dict
        .properties
        .iter()
        .filter(|p| p.emit_scope == EmitScope::ClassSurface)
        .collect();
    assert_eq!(surface.len(), 1);
    assert_eq!(surface[0].property_type.to_string(), "!1(V)");

    // The clone keeps the interface member's stable id and its source.
    let view_members: Vec<_> = dict
        .properties
        .iter()
        .filter(|p| p.emit_scope == EmitScope::ViewOnly)
        .collect();
    assert_eq!(view_members.len(), 1);
    assert_eq!(view_members[0].id, ilist_member_id);
    assert_eq!(view_members[0].provenance, Provenance::FromInterface);
    assert!(view_members[0].source_interface.is_some());

    // Exactly one view for the interface, named for the construction.
    assert_eq!(dict.explicit_views.len(), 1);
    assert_eq!(
        dict.explicit_views[0].property_name.as_deref(),
        Some("As_IList_1_of_KeyValuePair")
    );
    assert_eq!(dict.explicit_views[0].members.len(), 1);
    assert_eq!(dict.explicit_views[0].members[0], ilist_member_id);
}
