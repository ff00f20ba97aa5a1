//! Pipeline orchestration.
//!
//! One entry point, fixed stage order, timing per stage at debug
//! level. The driver owns the per-run mutable state (naming authority,
//! interner, diagnostic bag) and threads it through every stage; there
//! is no global state anywhere in the pipeline.

use std::time::Instant;
use tsbind_check::{run_gate, GateOutcome};
use tsbind_common::policy::Policy;
use tsbind_common::{DiagnosticBag, Interner};
use tsbind_model::SymbolGraph;
use tsbind_naming::{reserve_names, Renamer};
use tsbind_plan::{
    audit_constraints, build_import_graph, build_import_plan, plan_emission_order, EmissionPlan,
};
use tsbind_shape::{run_shape_passes, unify_overloads, PassContext};

/// Everything a completed run produced. The plan is present even when
/// the gate failed - emission is skipped, the explanation is not.
#[derive(Debug)]
pub struct BindingRun {
    pub plan: EmissionPlan,
    pub outcome: GateOutcome,
    pub diagnostics: DiagnosticBag,
}

/// Run the core pipeline on a loaded graph:
/// `G0 → normalize → shape → reserve → unify → plan → gate`.
#[must_use]
pub fn run_pipeline(graph: SymbolGraph, policy: &Policy) -> BindingRun {
    let started = Instant::now();

    let mut renamer = Renamer::new();
    renamer.adopt_style(policy.emission.name_transform);
    renamer.set_static_conflict(policy.renaming.static_conflict);
    renamer.apply_overrides(policy.renaming.explicit_map.clone());
    let mut interner = Interner::new();
    let mut diagnostics = DiagnosticBag::new();

    let normalized = stage("normalize", || graph.normalized());

    let shaped = stage("shape", || {
        let mut ctx = PassContext::new(policy, &mut renamer, &mut interner, &mut diagnostics);
        run_shape_passes(normalized, &mut ctx)
    });

    let reserved = stage("reserve", || {
        reserve_names(&shaped, policy, &mut renamer, &mut diagnostics)
    });

    let unified = stage("unify", || {
        let mut ctx = PassContext::new(policy, &mut renamer, &mut interner, &mut diagnostics);
        unify_overloads(reserved, &mut ctx)
    });

    let plan = stage("plan", || {
        let import_graph = build_import_graph(&unified, &mut diagnostics);
        let import_plan = build_import_plan(&unified, &import_graph, policy, &mut diagnostics);
        audit_constraints(&unified, &import_graph, policy, &mut diagnostics);
        let emit_order = plan_emission_order(&unified);
        EmissionPlan {
            graph: unified,
            import_plan,
            emit_order,
        }
    });

    let outcome = stage("gate", || run_gate(&plan, &mut diagnostics));

    tracing::info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        passed = outcome.passed,
        fingerprint = plan.fingerprint(),
        "pipeline complete"
    );

    BindingRun {
        plan,
        outcome,
        diagnostics,
    }
}

fn stage<T>(name: &str, f: impl FnOnce() -> T) -> T {
    let span = tracing::debug_span!("stage", stage = name);
    let _guard = span.enter();
    let started = Instant::now();
    let result = f();
    tracing::debug!(stage = name, elapsed_ms = started.elapsed().as_millis() as u64, "stage done");
    result
}
