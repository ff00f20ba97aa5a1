//! End-to-end scenarios through the full pipeline: graph in, gated
//! emission plan out.

use tsbindgen::common::policy::{Policy, StaticSideAction};
use tsbindgen::common::DiagnosticCode;
use tsbindgen::model::build::{
    GraphBuilder, MethodBuilder, TypeBuilder, int_ref, object_ref, string_ref,
};
use tsbindgen::model::members::Parameter;
use tsbindgen::model::{EmitScope, MemberFlags, TypeReference};
use tsbindgen::run_pipeline;

/// A class satisfying `IEnumerable<string>` structurally: clean gate,
/// no views, the interface kept for the heritage clause.
#[test]
fn closed_generic_interface_conformance() {
    let enumerator = |arg: TypeReference| {
        TypeReference::named("CoreLib", "System.Collections.Generic", "IEnumerator", 1, [arg])
    };
    let graph = GraphBuilder::new()
        .ty(TypeBuilder::interface("CoreLib", "System.Collections.Generic", "IEnumerable")
            .generic("T")
            .method(
                MethodBuilder::new("GetEnumerator")
                    .returns(enumerator(TypeReference::type_param("T", 0))),
            )
            .build())
        .ty(TypeBuilder::class("CoreLib", "System.Collections", "MyList")
            .implements(TypeReference::named(
                "CoreLib",
                "System.Collections.Generic",
                "IEnumerable",
                1,
                [string_ref()],
            ))
            .method(MethodBuilder::new("GetEnumerator").returns(enumerator(string_ref())))
            .build())
        .build();

    let run = run_pipeline(graph, &Policy::default());
    assert!(run.outcome.passed);

    let my_list = run.plan.graph.type_by_full_name("System.Collections.MyList").unwrap();
    assert!(my_list.explicit_views.is_empty());
    assert_eq!(my_list.interfaces.len(), 1);
    // The generic interface's emitted name carries its arity.
    let iface = run
        .plan
        .graph
        .type_by_full_name("System.Collections.Generic.IEnumerable`1")
        .unwrap();
    assert_eq!(iface.ts_emit_name.as_deref(), Some("IEnumerable_1"));
}

/// Reserved-word sanitization end to end: a type named `Delegate` with
/// a method named `default` emits as `Delegate_` / `default_`.
#[test]
fn reserved_words_sanitize_end_to_end() {
    let graph = GraphBuilder::new()
        .ty(TypeBuilder::class("CoreLib", "System", "Delegate")
            .method(MethodBuilder::new("default").returns(string_ref()))
            .build())
        .build();

    let run = run_pipeline(graph, &Policy::default());
    assert!(run.outcome.passed);
    let ty = run.plan.graph.type_by_full_name("System.Delegate").unwrap();
    assert_eq!(ty.ts_emit_name.as_deref(), Some("Delegate_"));
    assert_eq!(ty.methods[0].ts_emit_name.as_deref(), Some("default_"));
}

/// Return-type overloads: the own `F(int): string` keeps the surface,
/// the explicit-impl `F(int): object` lands in its interface's view,
/// and the gate accepts the result.
#[test]
fn return_type_overload_end_to_end() {
    let iface_ref = TypeReference::named("CoreLib", "System", "IBoxed", 0, []);
    let mut widget = TypeBuilder::class("CoreLib", "System", "Widget")
        .implements(iface_ref.clone())
        .method(
            MethodBuilder::new("F")
                .returns(object_ref())
                .param(Parameter::new("i", int_ref()))
                .provenance(tsbindgen::model::Provenance::ExplicitView),
        )
        .method(
            MethodBuilder::new("F")
                .returns(string_ref())
                .param(Parameter::new("i", int_ref())),
        )
        .build();
    widget.methods[0].source_interface = Some(iface_ref);

    let graph = GraphBuilder::new()
        .ty(widget)
        .ty(TypeBuilder::interface("CoreLib", "System", "IBoxed")
            .method(
                MethodBuilder::new("F")
                    .returns(object_ref())
                    .param(Parameter::new("i", int_ref())),
            )
            .build())
        .build();

    let run = run_pipeline(graph, &Policy::default());
    assert!(run.outcome.passed, "{:?}", run.diagnostics.iter().collect::<Vec<_>>());

    let widget = run.plan.graph.type_by_full_name("System.Widget").unwrap();
    let surface: Vec<_> = widget
        .methods
        .iter()
        .filter(|m| m.clr_name == "F" && m.emit_scope == EmitScope::ClassSurface)
        .collect();
    assert_eq!(surface.len(), 1);
    assert_eq!(surface[0].return_type, string_ref());
    assert_eq!(widget.explicit_views.len(), 1);
    assert_eq!(
        widget.explicit_views[0].property_name.as_deref(),
        Some("As_IBoxed")
    );
}

/// Static-side collision under AutoRename: the derived static takes
/// the `_static` suffix through the naming authority.
#[test]
fn static_collision_auto_renames() {
    let graph = GraphBuilder::new()
        .ty(TypeBuilder::class("CoreLib", "System", "Base")
            .method(MethodBuilder::new("Create").static_().returns(string_ref()))
            .build())
        .ty(TypeBuilder::class("CoreLib", "System", "Derived")
            .extends(TypeReference::named("CoreLib", "System", "Base", 0, []))
            .method(MethodBuilder::new("Create").static_().returns(string_ref()))
            .build())
        .build();

    let mut policy = Policy::default();
    policy.static_side.action = StaticSideAction::AutoRename;
    let run = run_pipeline(graph, &policy);
    assert!(run.outcome.passed);
    assert!(run.diagnostics.count_of(DiagnosticCode::StaticSideRenamed) >= 1);

    let derived = run.plan.graph.type_by_full_name("System.Derived").unwrap();
    assert_eq!(derived.methods[0].ts_emit_name.as_deref(), Some("Create_static"));
    let base = run.plan.graph.type_by_full_name("System.Base").unwrap();
    assert_eq!(base.methods[0].ts_emit_name.as_deref(), Some("Create"));
}

/// Hidden members take the configured suffix through reservation.
#[test]
fn hidden_member_suffix_applies() {
    let graph = GraphBuilder::new()
        .ty(TypeBuilder::class("CoreLib", "System", "Derived")
            .method(
                MethodBuilder::new("Equals")
                    .returns(string_ref())
                    .flags(MemberFlags::NEW),
            )
            .build())
        .build();
    let run = run_pipeline(graph, &Policy::default());
    assert!(run.outcome.passed);
    let ty = run.plan.graph.type_by_full_name("System.Derived").unwrap();
    assert_eq!(ty.methods[0].ts_emit_name.as_deref(), Some("Equals_new"));
    assert!(run.diagnostics.count_of(DiagnosticCode::HiddenNewConflict) >= 1);
}

/// Base overload completion: a derived override of one `Write`
/// signature pulls the base's other `Write` signature down with it.
#[test]
fn base_overload_sets_are_completed() {
    let graph = GraphBuilder::new()
        .ty(TypeBuilder::class("CoreLib", "System.IO", "Stream")
            .method(MethodBuilder::new("Write").param(Parameter::new("text", string_ref())))
            .method(MethodBuilder::new("Write").param(Parameter::new("value", int_ref())))
            .build())
        .ty(TypeBuilder::class("CoreLib", "System.IO", "FileStream")
            .extends(TypeReference::named("CoreLib", "System.IO", "Stream", 0, []))
            .method(
                MethodBuilder::new("Write")
                    .param(Parameter::new("text", string_ref()))
                    .flags(MemberFlags::OVERRIDE),
            )
            .build())
        .build();

    let run = run_pipeline(graph, &Policy::default());
    assert!(run.outcome.passed);
    let derived = run.plan.graph.type_by_full_name("System.IO.FileStream").unwrap();
    let writes: Vec<_> = derived.methods.iter().filter(|m| m.clr_name == "Write").collect();
    assert_eq!(writes.len(), 2, "the int overload was re-added");
    assert!(writes
        .iter()
        .any(|m| m.provenance == tsbindgen::model::Provenance::BaseOverload));
    // The re-add is owned by the derived type.
    assert!(writes
        .iter()
        .all(|m| m.id.declaring_clr_full_name == "System.IO.FileStream"));
}

/// Determinism at driver level: identical input graphs produce
/// identical plan fingerprints and diagnostic summaries.
#[test]
fn pipeline_runs_are_bit_identical() {
    let build = || {
        GraphBuilder::new()
            .ty(TypeBuilder::class("CoreLib", "System", "Alpha")
                .method(MethodBuilder::new("Run").returns(string_ref()))
                .build())
            .ty(TypeBuilder::interface("CoreLib", "System", "IThing")
                .method(MethodBuilder::new("Poke"))
                .build())
            .ty(TypeBuilder::class("CoreLib", "System.Extra", "Beta")
                .extends(TypeReference::named("CoreLib", "System", "Alpha", 0, []))
                .build())
            .build()
    };
    let a = run_pipeline(build(), &Policy::default());
    let b = run_pipeline(build(), &Policy::default());
    assert_eq!(a.plan.fingerprint(), b.plan.fingerprint());
    assert_eq!(a.diagnostics.summary(), b.diagnostics.summary());
    assert_eq!(a.outcome, b.outcome);
}
