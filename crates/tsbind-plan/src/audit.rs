//! The constraint auditor.
//!
//! The target system cannot express a default-constructor (`new()`)
//! constraint. For each `(type, interface)` pair whose interface
//! carries one, exactly one finding is reported - not one per cloned
//! view member.

use crate::import_graph::ImportGraph;
use rustc_hash::FxHashSet;
use tsbind_common::policy::Policy;
use tsbind_common::{DiagnosticBag, DiagnosticCode, DiagnosticSite};
use tsbind_model::{SpecialConstraints, SymbolGraph};

pub fn audit_constraints(
    graph: &SymbolGraph,
    _import_graph: &ImportGraph,
    policy: &Policy,
    diagnostics: &mut DiagnosticBag,
) {
    let mut reported: FxHashSet<(String, String)> = FxHashSet::default();

    for (ns, ty) in graph.types() {
        let mut candidates: Vec<&tsbind_model::TypeReference> = ty.interfaces.iter().collect();
        candidates.extend(ty.explicit_views.iter().map(|v| &v.interface));

        for iface_ref in candidates {
            let Some(key) = iface_ref.clr_lookup_key() else {
                continue;
            };
            let Some(iface) = graph.type_by_full_name(&key) else {
                continue;
            };
            let has_ctor_constraint = iface
                .generic_params
                .iter()
                .any(|gp| gp.special.contains(SpecialConstraints::DEFAULT_CTOR));
            if !has_ctor_constraint {
                continue;
            }
            if !reported.insert((ty.clr_full_name(), key.clone())) {
                continue;
            }
            diagnostics.report_at(
                DiagnosticCode::CtorConstraintLoss,
                format!(
                    "`{key}` requires a default constructor; the binding cannot enforce it"
                ),
                DiagnosticSite::ty(&ns.name, &ty.clr_name),
            );
            if !policy.constraint.allow_ctor_constraint_loss {
                diagnostics.report_at(
                    DiagnosticCode::ValidationFailed,
                    format!("constructor-constraint loss on `{key}` is disallowed by policy"),
                    DiagnosticSite::ty(&ns.name, &ty.clr_name),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import_graph::build_import_graph;
    use tsbind_model::build::{GraphBuilder, TypeBuilder};
    use tsbind_model::{GenericParam, TypeReference};

    fn fixture() -> SymbolGraph {
        let mut param = GenericParam::new("T", 0);
        param.special |= SpecialConstraints::DEFAULT_CTOR;
        let factory = TypeBuilder::interface("CoreLib", "System", "IFactory")
            .generic_param(param)
            .build();
        let widget = TypeBuilder::class("CoreLib", "System", "Widget")
            .implements(TypeReference::named(
                "CoreLib",
                "System",
                "IFactory",
                1,
                [TypeReference::named("CoreLib", "System", "String", 0, [])],
            ))
            .build();
        GraphBuilder::new().ty(factory).ty(widget).build()
    }

    #[test]
    fn one_finding_per_type_interface_pair() {
        let graph = fixture();
        let mut diagnostics = DiagnosticBag::new();
        let imports = build_import_graph(&graph, &mut diagnostics);
        audit_constraints(&graph, &imports, &Policy::default(), &mut diagnostics);
        assert_eq!(diagnostics.count_of(DiagnosticCode::CtorConstraintLoss), 1);
        assert!(!diagnostics.has_errors());
    }

    #[test]
    fn disallowed_loss_escalates() {
        let graph = fixture();
        let mut policy = Policy::default();
        policy.constraint.allow_ctor_constraint_loss = false;
        let mut diagnostics = DiagnosticBag::new();
        let imports = build_import_graph(&graph, &mut diagnostics);
        audit_constraints(&graph, &imports, &policy, &mut diagnostics);
        assert!(diagnostics.has_errors());
    }
}
