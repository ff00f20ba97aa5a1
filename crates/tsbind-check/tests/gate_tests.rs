use tsbind_common::policy::Policy;
use tsbind_common::{DiagnosticBag, DiagnosticCode, Interner};
use tsbind_model::build::{GraphBuilder, MethodBuilder, PropertyBuilder, TypeBuilder, int_ref, string_ref};
use tsbind_model::members::Parameter;
use tsbind_model::{EmitScope, SymbolGraph, TypeReference};
use tsbind_naming::{reserve_names, Renamer};
use tsbind_check::{persist_artifacts, run_gate};
use tsbind_plan::{build_import_graph, build_import_plan, plan_emission_order, EmissionPlan};
use tsbind_shape::{run_shape_passes, unify_overloads, PassContext};

/// Run the full core pipeline on a built graph, as the driver does.
fn pipeline(graph: SymbolGraph, policy: &Policy) -> (EmissionPlan, DiagnosticBag) {
    let mut renamer = Renamer::new();
    let mut interner = Interner::new();
    let mut diagnostics = DiagnosticBag::new();

    let shaped = {
        let mut ctx = PassContext::new(policy, &mut renamer, &mut interner, &mut diagnostics);
        run_shape_passes(graph, &mut ctx)
    };
    let reserved = reserve_names(&shaped, policy, &mut renamer, &mut diagnostics);
    let unified = {
        let mut ctx = PassContext::new(policy, &mut renamer, &mut interner, &mut diagnostics);
        unify_overloads(reserved, &mut ctx)
    };
    let import_graph = build_import_graph(&unified, &mut diagnostics);
    let import_plan = build_import_plan(&unified, &import_graph, policy, &mut diagnostics);
    let emit_order = plan_emission_order(&unified);
    (
        EmissionPlan {
            graph: unified,
            import_plan,
            emit_order,
        },
        diagnostics,
    )
}

fn clean_fixture() -> SymbolGraph {
    GraphBuilder::new()
        .ty(TypeBuilder::class("CoreLib", "System", "Widget")
            .method(MethodBuilder::new("Run").returns(string_ref()))
            .property(PropertyBuilder::new("Count", int_ref()).getter_only())
            .build())
        .ty(TypeBuilder::interface("CoreLib", "System", "IDisposable")
            .method(MethodBuilder::new("Dispose"))
            .build())
        .build()
}

#[test]
fn clean_graph_passes_the_gate() {
    let (plan, mut diag) = pipeline(clean_fixture(), &Policy::default());
    let outcome = run_gate(&plan, &mut diag);
    assert!(outcome.passed, "diagnostics: {:?}", diag.iter().collect::<Vec<_>>());
}

/// Gate correctness (P9): if the gate reports zero errors, every
/// emitted entity has a usable final name and scopes are collision
/// free.
#[test]
fn gate_pass_implies_name_totality() {
    let (plan, mut diag) = pipeline(clean_fixture(), &Policy::default());
    let outcome = run_gate(&plan, &mut diag);
    assert!(outcome.passed);
    for (_, ty) in plan.graph.types() {
        assert!(ty.ts_emit_name.as_deref().is_some_and(|n| !n.is_empty()));
        for m in &ty.methods {
            if m.emit_scope != EmitScope::Omitted {
                assert!(m.ts_emit_name.as_deref().is_some_and(|n| !n.is_empty()));
            }
        }
    }
}

#[test]
fn missing_final_name_fails_the_gate() {
    let (mut plan, mut diag) = pipeline(clean_fixture(), &Policy::default());
    plan.graph.namespaces[0].types[0].ts_emit_name = None;
    let outcome = run_gate(&plan, &mut diag);
    assert!(!outcome.passed);
    assert!(diag.count_of(DiagnosticCode::ValidationFailed) >= 1);
}

#[test]
fn duplicate_type_names_fail_the_gate() {
    let (mut plan, mut diag) = pipeline(clean_fixture(), &Policy::default());
    // Force the interface's final name onto the class.
    let forced = plan.graph.namespaces[0].types[1].ts_emit_name.clone();
    plan.graph.namespaces[0].types[0].ts_emit_name = forced;
    let outcome = run_gate(&plan, &mut diag);
    assert!(!outcome.passed);
    assert!(diag.count_of(DiagnosticCode::DuplicateMember) >= 1);
}

#[test]
fn view_only_indexer_fails_the_gate() {
    let (mut plan, mut diag) = pipeline(
        GraphBuilder::new()
            .ty(TypeBuilder::class("CoreLib", "System", "Bag")
                .property(
                    PropertyBuilder::new("Item", string_ref())
                        .index(Parameter::new("i", int_ref())),
                )
                .build())
            .build(),
        &Policy::default(),
    );
    plan.graph.namespaces[0].types[0].properties[0].emit_scope = EmitScope::ViewOnly;
    let outcome = run_gate(&plan, &mut diag);
    assert!(!outcome.passed);
    assert!(diag.count_of(DiagnosticCode::IndexerConflict) >= 1);
}

#[test]
fn orphan_view_member_fails_the_gate() {
    let (mut plan, mut diag) = pipeline(clean_fixture(), &Policy::default());
    let widget = &mut plan.graph.namespaces[0].types[0];
    widget.methods[0].emit_scope = EmitScope::ViewOnly;
    widget.methods[0].source_interface =
        Some(TypeReference::named("CoreLib", "System", "IDisposable", 0, []));
    // No view registered for it.
    let outcome = run_gate(&plan, &mut diag);
    assert!(!outcome.passed);
    assert!(diag.count_of(DiagnosticCode::ViewCoverageMissing) >= 1);
}

#[test]
fn import_cycles_are_reported_with_their_path() {
    let a = TypeBuilder::class("CoreLib", "Alpha", "A")
        .method(MethodBuilder::new("GetB").returns(TypeReference::named(
            "CoreLib", "Beta", "B", 0, [],
        )))
        .build();
    let b = TypeBuilder::class("CoreLib", "Beta", "B")
        .method(MethodBuilder::new("GetA").returns(TypeReference::named(
            "CoreLib", "Alpha", "A", 0, [],
        )))
        .build();
    let (plan, mut diag) = pipeline(
        GraphBuilder::new().ty(a).ty(b).build(),
        &Policy::default(),
    );
    let outcome = run_gate(&plan, &mut diag);
    assert!(!outcome.passed);
    assert_eq!(diag.count_of(DiagnosticCode::CircularNamespaceDependency), 1);
    let cycle = diag
        .iter()
        .find(|d| d.code == DiagnosticCode::CircularNamespaceDependency)
        .unwrap();
    assert!(cycle.message.contains("Alpha"));
    assert!(cycle.message.contains("Beta"));
}

/// Determinism (P5): identical input, identical fingerprints and
/// identical diagnostic counts.
#[test]
fn pipeline_is_deterministic() {
    let (plan_a, mut diag_a) = pipeline(clean_fixture(), &Policy::default());
    let (plan_b, mut diag_b) = pipeline(clean_fixture(), &Policy::default());
    run_gate(&plan_a, &mut diag_a);
    run_gate(&plan_b, &mut diag_b);
    assert_eq!(plan_a.fingerprint(), plan_b.fingerprint());
    assert_eq!(diag_a.summary(), diag_b.summary());
}

#[test]
fn artifacts_survive_gate_failure() {
    let (mut plan, mut diag) = pipeline(clean_fixture(), &Policy::default());
    plan.graph.namespaces[0].types[0].ts_emit_name = None;
    let outcome = run_gate(&plan, &mut diag);
    assert!(!outcome.passed);

    let mut summary = Vec::new();
    let mut human = Vec::new();
    persist_artifacts(&diag, &mut summary, &mut human).unwrap();
    assert!(!summary.is_empty());
    assert!(!human.is_empty());
}
