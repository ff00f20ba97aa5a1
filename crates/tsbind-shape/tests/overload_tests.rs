//! Return-type overloads and diamond policy scenarios.

use tsbind_common::policy::{DiamondPolicy, Policy};
use tsbind_common::{DiagnosticBag, DiagnosticCode, Interner};
use tsbind_model::build::{GraphBuilder, MethodBuilder, TypeBuilder, int_ref, long_ref, object_ref, string_ref};
use tsbind_model::members::Parameter;
use tsbind_model::{EmitScope, Provenance, SymbolGraph, TypeReference};
use tsbind_naming::Renamer;
use tsbind_shape::{run_shape_passes, PassContext};

fn shape_with(graph: SymbolGraph, policy: &Policy) -> (SymbolGraph, DiagnosticBag) {
    let mut renamer = Renamer::new();
    let mut interner = Interner::new();
    let mut diagnostics = DiagnosticBag::new();
    let mut ctx = PassContext::new(policy, &mut renamer, &mut interner, &mut diagnostics);
    let out = run_shape_passes(graph, &mut ctx);
    (out, diagnostics)
}

/// `F(int): object` (explicit impl) vs `F(int): string` (own): the
/// non-`Object` variant keeps the class surface, the other becomes a
/// view member of its source interface.
#[test]
fn return_type_overload_resolves_toward_own_member() {
    let iface_ref = TypeReference::named("CoreLib", "System", "IFormatter", 0, []);
    let mut widget = TypeBuilder::class("CoreLib", "System", "Widget")
        .implements(iface_ref.clone())
        .method(
            MethodBuilder::new("F")
                .returns(object_ref())
                .param(Parameter::new("i", int_ref()))
                .provenance(Provenance::ExplicitView),
        )
        .method(
            MethodBuilder::new("F")
                .returns(string_ref())
                .param(Parameter::new("i", int_ref())),
        )
        .build();
    widget.methods[0].source_interface = Some(iface_ref.clone());

    let iface = TypeBuilder::interface("CoreLib", "System", "IFormatter")
        .method(
            MethodBuilder::new("F")
                .returns(object_ref())
                .param(Parameter::new("i", int_ref())),
        )
        .build();

    let graph = GraphBuilder::new().ty(widget).ty(iface).build();
    let (shaped, diag) = shape_with(graph, &Policy::default());

    let widget = shaped.type_by_full_name("System.Widget").unwrap();
    let surface: Vec<_> = widget
        .methods
        .iter()
        .filter(|m| m.clr_name == "F" && m.emit_scope == EmitScope::ClassSurface)
        .collect();
    assert_eq!(surface.len(), 1);
    assert_eq!(surface[0].return_type, string_ref());

    let demoted: Vec<_> = widget
        .methods
        .iter()
        .filter(|m| m.clr_name == "F" && m.emit_scope == EmitScope::ViewOnly)
        .collect();
    assert_eq!(demoted.len(), 1);
    assert_eq!(demoted[0].return_type, object_ref());
    assert!(diag.count_of(DiagnosticCode::ReturnOverloadDemoted) >= 1);

    // The demoted variant landed in the interface's view.
    assert_eq!(widget.explicit_views.len(), 1);
    assert!(widget.explicit_views[0].members.contains(&demoted[0].id));
}

/// `IBoth : ILeft + IRight`, where `ILeft.F(int)` and `IRight.F(long)`
/// arrive at `IBoth` through two inheritance paths.
fn diamond_fixture() -> SymbolGraph {
    let ileft = TypeBuilder::interface("CoreLib", "System", "ILeft")
        .method(MethodBuilder::new("F").param(Parameter::new("a", int_ref())))
        .build();
    let iright = TypeBuilder::interface("CoreLib", "System", "IRight")
        .method(MethodBuilder::new("F").param(Parameter::new("a", long_ref())))
        .build();
    let iboth = TypeBuilder::interface("CoreLib", "System", "IBoth")
        .implements(TypeReference::named("CoreLib", "System", "ILeft", 0, []))
        .implements(TypeReference::named("CoreLib", "System", "IRight", 0, []))
        .build();
    GraphBuilder::new().ty(ileft).ty(iright).ty(iboth).build()
}

#[test]
fn diamond_overload_all_keeps_both_variants() {
    let (shaped, _) = shape_with(diamond_fixture(), &Policy::default());
    let iboth = shaped.type_by_full_name("System.IBoth").unwrap();
    let fs: Vec<_> = iboth
        .methods
        .iter()
        .filter(|m| m.clr_name == "F" && m.emit_scope == EmitScope::ClassSurface)
        .collect();
    assert_eq!(fs.len(), 2, "both diamond variants survive");
}

#[test]
fn diamond_prefer_derived_demotes_the_later_path() {
    let mut policy = Policy::default();
    policy.interface.diamond = DiamondPolicy::PreferDerived;
    let (shaped, _) = shape_with(diamond_fixture(), &policy);
    let iboth = shaped.type_by_full_name("System.IBoth").unwrap();

    let surface: Vec<_> = iboth
        .methods
        .iter()
        .filter(|m| m.clr_name == "F" && m.emit_scope == EmitScope::ClassSurface)
        .collect();
    let demoted: Vec<_> = iboth
        .methods
        .iter()
        .filter(|m| m.clr_name == "F" && m.emit_scope == EmitScope::ViewOnly)
        .collect();
    assert_eq!(surface.len(), 1);
    assert_eq!(demoted.len(), 1);
    assert_eq!(demoted[0].provenance, Provenance::DiamondResolved);
    // The demoted variant lands in its originating interface's view.
    assert_eq!(iboth.explicit_views.len(), 1);
    assert!(iboth.explicit_views[0].members.contains(&demoted[0].id));
}

#[test]
fn diamond_error_policy_reports_and_leaves_shape() {
    let mut policy = Policy::default();
    policy.interface.diamond = DiamondPolicy::Error;
    let (shaped, diag) = shape_with(diamond_fixture(), &policy);
    let iboth = shaped.type_by_full_name("System.IBoth").unwrap();
    let fs: Vec<_> = iboth
        .methods
        .iter()
        .filter(|m| m.clr_name == "F" && m.emit_scope != EmitScope::Omitted)
        .collect();
    assert_eq!(fs.len(), 2, "shape untouched under error policy");
    assert!(diag.count_of(DiagnosticCode::DiamondConflict) >= 1);
}
