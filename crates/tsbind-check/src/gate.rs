//! Gate checks.

use rustc_hash::{FxHashMap, FxHashSet};
use tsbind_common::{is_reserved, DiagnosticBag, DiagnosticCode, DiagnosticSite};
use tsbind_model::{EmitScope, NamespaceSymbol, TypeSymbol};
use tsbind_plan::EmissionPlan;
use tsbind_shape::unify::erasure_key;

/// Result of a gate run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GateOutcome {
    pub passed: bool,
    pub errors: usize,
}

/// Run every gate check against the finished plan, appending findings
/// to the bag. The gate fails when any error-severity diagnostic is in
/// the bag afterwards - including errors earlier stages reported.
pub fn run_gate(plan: &EmissionPlan, diagnostics: &mut DiagnosticBag) -> GateOutcome {
    for ns in &plan.graph.namespaces {
        check_namespace(ns, diagnostics);
    }
    check_import_cycles(plan, diagnostics);
    check_import_names(plan, diagnostics);

    let errors = diagnostics.error_count();
    let passed = errors == 0;
    tracing::info!(passed, errors, "gate complete");
    GateOutcome { passed, errors }
}

fn check_namespace(ns: &NamespaceSymbol, diagnostics: &mut DiagnosticBag) {
    let mut type_names: FxHashMap<&str, &str> = FxHashMap::default();
    for ty in &ns.types {
        match ty.ts_emit_name.as_deref() {
            None | Some("") => {
                diagnostics.report_at(
                    DiagnosticCode::ValidationFailed,
                    format!("type `{}` has no final name", ty.clr_full_name()),
                    DiagnosticSite::ty(&ns.name, &ty.clr_name),
                );
            }
            Some(name) => {
                if is_reserved(name) {
                    diagnostics.report_at(
                        DiagnosticCode::ReservedWordUnsanitized,
                        format!("type name `{name}` is a reserved word"),
                        DiagnosticSite::ty(&ns.name, &ty.clr_name),
                    );
                }
                if let Some(previous) = type_names.insert(name, &ty.clr_name) {
                    diagnostics.report_at(
                        DiagnosticCode::DuplicateMember,
                        format!("type name `{name}` also used by `{previous}`"),
                        DiagnosticSite::ty(&ns.name, &ty.clr_name),
                    );
                }
            }
        }
        check_type(ns, ty, diagnostics);
    }
}

fn check_type(ns: &NamespaceSymbol, ty: &TypeSymbol, diagnostics: &mut DiagnosticBag) {
    check_member_names(ns, ty, diagnostics);
    check_view_coverage(ns, ty, diagnostics);
    check_indexers(ns, ty, diagnostics);
    check_view_properties(ns, ty, diagnostics);
    check_reference_hygiene(ns, ty, diagnostics);
    for nested in &ty.nested_types {
        check_type(ns, nested, diagnostics);
    }
}

fn on_surface(scope: EmitScope) -> bool {
    matches!(scope, EmitScope::ClassSurface | EmitScope::StaticSurface)
}

/// Validate a member's final name: present, non-empty, not reserved.
/// Returns the name when usable.
fn require_name<'a>(
    ns: &NamespaceSymbol,
    ty: &TypeSymbol,
    clr_name: &str,
    final_name: Option<&'a str>,
    diagnostics: &mut DiagnosticBag,
) -> Option<&'a str> {
    match final_name {
        None | Some("") => {
            diagnostics.report_at(
                DiagnosticCode::ValidationFailed,
                format!("member `{clr_name}` has no final name"),
                DiagnosticSite::member(&ns.name, &ty.clr_name, clr_name),
            );
            None
        }
        Some(name) => {
            if is_reserved(name) {
                diagnostics.report_at(
                    DiagnosticCode::ReservedWordUnsanitized,
                    format!("member name `{name}` is a reserved word"),
                    DiagnosticSite::member(&ns.name, &ty.clr_name, clr_name),
                );
            }
            Some(name)
        }
    }
}

fn check_member_names(ns: &NamespaceSymbol, ty: &TypeSymbol, diagnostics: &mut DiagnosticBag) {
    // Non-method members: unique final names per (type, side).
    for is_static in [false, true] {
        let mut names: FxHashSet<&str> = FxHashSet::default();

        for field in &ty.fields {
            if field.is_static() != is_static || !on_surface(field.emit_scope) {
                continue;
            }
            if let Some(name) = require_name(ns, ty, &field.clr_name, field.ts_emit_name.as_deref(), diagnostics)
                && !names.insert(name)
            {
                diagnostics.report_at(
                    DiagnosticCode::DuplicateMember,
                    format!("field name `{name}` duplicated"),
                    DiagnosticSite::member(&ns.name, &ty.clr_name, &field.clr_name),
                );
            }
        }
        for prop in &ty.properties {
            if prop.is_static() != is_static || !on_surface(prop.emit_scope) {
                continue;
            }
            if let Some(name) = require_name(ns, ty, &prop.clr_name, prop.ts_emit_name.as_deref(), diagnostics)
                && !names.insert(name)
            {
                diagnostics.report_at(
                    DiagnosticCode::DuplicateMember,
                    format!("property name `{name}` duplicated"),
                    DiagnosticSite::member(&ns.name, &ty.clr_name, &prop.clr_name),
                );
            }
        }
        for event in &ty.events {
            if event.is_static() != is_static || !on_surface(event.emit_scope) {
                continue;
            }
            if let Some(name) = require_name(ns, ty, &event.clr_name, event.ts_emit_name.as_deref(), diagnostics)
                && !names.insert(name)
            {
                diagnostics.report_at(
                    DiagnosticCode::DuplicateMember,
                    format!("event name `{name}` duplicated"),
                    DiagnosticSite::member(&ns.name, &ty.clr_name, &event.clr_name),
                );
            }
        }

        // Methods may share a final name; what must stay unique per
        // side is the erasure key (instance side - statics keep their
        // full overload sets for the runtime binder to marshal).
        let mut erasure_keys: FxHashSet<String> = FxHashSet::default();
        for method in &ty.methods {
            if method.is_static() != is_static || !on_surface(method.emit_scope) {
                continue;
            }
            let Some(name) = require_name(ns, ty, &method.clr_name, method.ts_emit_name.as_deref(), diagnostics)
            else {
                continue;
            };
            if names.contains(name) {
                diagnostics.report_at(
                    DiagnosticCode::DuplicateMember,
                    format!("method name `{name}` collides with a non-method member"),
                    DiagnosticSite::member(&ns.name, &ty.clr_name, &method.clr_name),
                );
            }
            if !is_static && !erasure_keys.insert(erasure_key(method)) {
                diagnostics.report_at(
                    DiagnosticCode::AmbiguousOverload,
                    format!(
                        "`{name}` has two overloads indistinguishable after erasure"
                    ),
                    DiagnosticSite::member(&ns.name, &ty.clr_name, &method.clr_name),
                );
            }
        }
    }
}

fn check_view_coverage(ns: &NamespaceSymbol, ty: &TypeSymbol, diagnostics: &mut DiagnosticBag) {
    let mut check = |clr_name: &str,
                     id: &tsbind_model::MemberStableId,
                     is_static: bool,
                     diagnostics: &mut DiagnosticBag| {
        let holders = ty
            .explicit_views
            .iter()
            .filter(|v| v.members.contains(id))
            .count();
        if holders == 1 {
            return;
        }
        // Static extension members on static containers legitimately
        // surface without a view.
        if holders == 0 && ty.is_static_container() && is_static {
            diagnostics.report_at(
                DiagnosticCode::ViewCoverageOrphan,
                format!("static view-only member `{clr_name}` has no view (static container)"),
                DiagnosticSite::member(&ns.name, &ty.clr_name, clr_name),
            );
            return;
        }
        diagnostics.report_at(
            DiagnosticCode::ViewCoverageMissing,
            format!("view-only member `{clr_name}` appears in {holders} views, expected 1"),
            DiagnosticSite::member(&ns.name, &ty.clr_name, clr_name),
        );
    };

    for method in &ty.methods {
        if method.emit_scope == EmitScope::ViewOnly && method.source_interface.is_some() {
            check(&method.clr_name, &method.id, method.is_static(), diagnostics);
        }
    }
    for prop in &ty.properties {
        if prop.emit_scope == EmitScope::ViewOnly && prop.source_interface.is_some() {
            check(&prop.clr_name, &prop.id, prop.is_static(), diagnostics);
        }
    }
    for event in &ty.events {
        if event.emit_scope == EmitScope::ViewOnly && event.source_interface.is_some() {
            check(&event.clr_name, &event.id, event.is_static(), diagnostics);
        }
    }
}

fn check_indexers(ns: &NamespaceSymbol, ty: &TypeSymbol, diagnostics: &mut DiagnosticBag) {
    for prop in &ty.properties {
        if prop.is_indexer() && prop.emit_scope == EmitScope::ViewOnly {
            diagnostics.report_at(
                DiagnosticCode::IndexerConflict,
                format!("indexer `{}` is view-only", prop.clr_name),
                DiagnosticSite::member(&ns.name, &ty.clr_name, &prop.clr_name),
            );
        }
    }
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn check_view_properties(ns: &NamespaceSymbol, ty: &TypeSymbol, diagnostics: &mut DiagnosticBag) {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for view in &ty.explicit_views {
        match view.property_name.as_deref() {
            None | Some("") => {
                diagnostics.report_at(
                    DiagnosticCode::ViewPropertyNameInvalid,
                    format!("view over `{}` has no property name", view.interface_id),
                    DiagnosticSite::ty(&ns.name, &ty.clr_name),
                );
            }
            Some(name) => {
                if !is_valid_identifier(name) || is_reserved(name) {
                    diagnostics.report_at(
                        DiagnosticCode::ViewPropertyNameInvalid,
                        format!("view property name `{name}` is not a legal identifier"),
                        DiagnosticSite::ty(&ns.name, &ty.clr_name),
                    );
                }
                if !seen.insert(name) {
                    diagnostics.report_at(
                        DiagnosticCode::ViewPropertyNameInvalid,
                        format!("view property name `{name}` duplicated"),
                        DiagnosticSite::ty(&ns.name, &ty.clr_name),
                    );
                }
            }
        }
    }
}

fn check_reference_hygiene(ns: &NamespaceSymbol, ty: &TypeSymbol, diagnostics: &mut DiagnosticBag) {
    let mut check = |reference: &tsbind_model::TypeReference| {
        if reference.has_assembly_qualified_text() {
            diagnostics.report_at(
                DiagnosticCode::ImportKeyContaminated,
                format!("reference `{reference}` carries assembly-qualified text"),
                DiagnosticSite::ty(&ns.name, &ty.clr_name),
            );
        }
    };
    if let Some(base) = &ty.base_type {
        check(base);
    }
    for iface in &ty.interfaces {
        check(iface);
    }
    for view in &ty.explicit_views {
        check(&view.interface);
    }
}

/// Cycle detection over the namespace import edges, with the cycle
/// path in the report.
fn check_import_cycles(plan: &EmissionPlan, diagnostics: &mut DiagnosticBag) {
    let edges: std::collections::BTreeMap<&str, Vec<&str>> = plan
        .import_plan
        .namespaces
        .iter()
        .map(|(ns, imports)| {
            (
                ns.as_str(),
                imports.imports.keys().map(String::as_str).collect(),
            )
        })
        .collect();

    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Visiting,
        Done,
    }

    let mut marks: FxHashMap<&str, Mark> = FxHashMap::default();
    let mut stack: Vec<&str> = Vec::new();
    let mut reported = false;

    fn visit<'a>(
        node: &'a str,
        edges: &std::collections::BTreeMap<&'a str, Vec<&'a str>>,
        marks: &mut FxHashMap<&'a str, Mark>,
        stack: &mut Vec<&'a str>,
        diagnostics: &mut DiagnosticBag,
        reported: &mut bool,
    ) {
        match marks.get(node) {
            Some(Mark::Done) => return,
            Some(Mark::Visiting) => {
                if !*reported {
                    let start = stack.iter().position(|&n| n == node).unwrap_or(0);
                    let mut cycle: Vec<&str> = stack[start..].to_vec();
                    cycle.push(node);
                    diagnostics.report(
                        DiagnosticCode::CircularNamespaceDependency,
                        format!("namespace import cycle: {}", cycle.join(" -> ")),
                    );
                    *reported = true;
                }
                return;
            }
            None => {}
        }
        marks.insert(node, Mark::Visiting);
        stack.push(node);
        if let Some(targets) = edges.get(node) {
            for &target in targets {
                visit(target, edges, marks, stack, diagnostics, reported);
            }
        }
        stack.pop();
        marks.insert(node, Mark::Done);
    }

    let roots: Vec<&str> = edges.keys().copied().collect();
    for root in roots {
        visit(root, &edges, &mut marks, &mut stack, diagnostics, &mut reported);
    }
}

/// Every import path and local TS name must be free of
/// assembly-qualified residue.
fn check_import_names(plan: &EmissionPlan, diagnostics: &mut DiagnosticBag) {
    let dirty = |text: &str| {
        text.contains('[') || text.contains("Culture=") || text.contains("PublicKeyToken=")
    };
    for (ns, imports) in &plan.import_plan.namespaces {
        for (target, statement) in &imports.imports {
            if dirty(&statement.specifier) {
                diagnostics.report(
                    DiagnosticCode::InvalidImportModulePath,
                    format!("import path `{}` from `{ns}` to `{target}` is malformed", statement.specifier),
                );
            }
            for imported in &statement.types {
                if dirty(imported.local_name()) || dirty(&imported.clr_key) {
                    diagnostics.report(
                        DiagnosticCode::InvalidImportModulePath,
                        format!("import of `{}` in `{ns}` is malformed", imported.clr_key),
                    );
                }
            }
        }
    }
}
