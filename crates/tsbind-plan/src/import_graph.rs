//! Cross-module dependency discovery.
//!
//! Scans every emitted position of every emitted type - heritage
//! clauses, constraints, member signatures - recursing into
//! constructed generics, arrays, pointers and byrefs. Each referenced
//! type is keyed by its *open-generic* CLR lookup key; assembly
//! qualification never enters a key, and the gate re-checks that.

use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tsbind_common::{DiagnosticBag, DiagnosticCode};
use tsbind_model::{EmitScope, SymbolGraph, TypeReference, TypeSymbol};

/// Why one type mentions another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ReferenceKind {
    BaseType,
    Interface,
    Constraint,
    Return,
    Parameter,
    Property,
    Field,
    EventHandler,
    Constructor,
}

impl ReferenceKind {
    /// Heritage positions force a value import; everything else can be
    /// imported type-only.
    #[must_use]
    pub const fn is_heritage(self) -> bool {
        matches!(self, Self::BaseType | Self::Interface)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct CrossRef {
    pub source_ns: String,
    pub source_type: String,
    pub target_ns: String,
    pub target_type: String,
    pub reference_kind: ReferenceKind,
}

#[derive(Debug, Default, Serialize)]
pub struct ImportGraph {
    /// Namespace → namespaces it must import from.
    pub namespace_deps: BTreeMap<String, BTreeSet<String>>,
    pub cross_refs: Vec<CrossRef>,
    /// CLR keys that resolve to no type in the graph - candidates for
    /// cross-assembly resolution or warnings.
    pub unresolved_keys: BTreeSet<String>,
    /// Fast map from CLR full name to owning namespace.
    pub type_namespace: BTreeMap<String, String>,
}

fn key_is_contaminated(key: &str) -> bool {
    key.contains('[') || key.contains("Culture=") || key.contains("PublicKeyToken=")
}

/// Build the namespace-level dependency graph.
#[must_use]
pub fn build_import_graph(graph: &SymbolGraph, diagnostics: &mut DiagnosticBag) -> ImportGraph {
    let mut out = ImportGraph::default();
    for (ns, ty) in graph.types() {
        out.type_namespace
            .insert(ty.clr_full_name(), ns.name.clone());
    }

    let mut refs: BTreeSet<CrossRef> = BTreeSet::new();
    for (ns, ty) in graph.types() {
        scan_type(graph, &ns.name, ty, &mut refs, &mut out, diagnostics);
    }
    for cross in &refs {
        out.namespace_deps
            .entry(cross.source_ns.clone())
            .or_default()
            .insert(cross.target_ns.clone());
    }
    out.cross_refs = refs.into_iter().collect();
    tracing::debug!(
        cross_refs = out.cross_refs.len(),
        unresolved = out.unresolved_keys.len(),
        "import graph built"
    );
    out
}

fn scan_type(
    graph: &SymbolGraph,
    source_ns: &str,
    ty: &TypeSymbol,
    refs: &mut BTreeSet<CrossRef>,
    out: &mut ImportGraph,
    diagnostics: &mut DiagnosticBag,
) {
    let mut record = |reference: &TypeReference, kind: ReferenceKind| {
        collect_reference(graph, source_ns, &ty.clr_full_name(), reference, kind, refs, out, diagnostics);
    };

    if let Some(base) = &ty.base_type {
        record(base, ReferenceKind::BaseType);
    }
    for iface in &ty.interfaces {
        record(iface, ReferenceKind::Interface);
    }
    for view in &ty.explicit_views {
        record(&view.interface, ReferenceKind::Interface);
    }
    for gp in &ty.generic_params {
        for constraint in &gp.constraints {
            record(constraint, ReferenceKind::Constraint);
        }
    }
    for method in &ty.methods {
        if method.emit_scope == EmitScope::Omitted {
            continue;
        }
        record(&method.return_type, ReferenceKind::Return);
        for param in &method.parameters {
            record(&param.ty, ReferenceKind::Parameter);
        }
        for gp in &method.generic_params {
            for constraint in &gp.constraints {
                record(constraint, ReferenceKind::Constraint);
            }
        }
    }
    for prop in &ty.properties {
        if prop.emit_scope == EmitScope::Omitted {
            continue;
        }
        record(&prop.property_type, ReferenceKind::Property);
        for param in &prop.index_parameters {
            record(&param.ty, ReferenceKind::Parameter);
        }
    }
    for field in &ty.fields {
        if field.emit_scope == EmitScope::Omitted {
            continue;
        }
        record(&field.field_type, ReferenceKind::Field);
    }
    for event in &ty.events {
        if event.emit_scope == EmitScope::Omitted {
            continue;
        }
        record(&event.handler_type, ReferenceKind::EventHandler);
    }
    for ctor in &ty.constructors {
        if ctor.emit_scope == EmitScope::Omitted {
            continue;
        }
        for param in &ctor.parameters {
            record(&param.ty, ReferenceKind::Constructor);
        }
    }

    for nested in &ty.nested_types {
        scan_type(graph, source_ns, nested, refs, out, diagnostics);
    }
}

fn collect_reference(
    graph: &SymbolGraph,
    source_ns: &str,
    source_type: &str,
    reference: &TypeReference,
    kind: ReferenceKind,
    refs: &mut BTreeSet<CrossRef>,
    out: &mut ImportGraph,
    diagnostics: &mut DiagnosticBag,
) {
    reference.for_each_named(&mut |named| {
        let key = named.clr_full_name();
        if key_is_contaminated(&key) {
            diagnostics.report(
                DiagnosticCode::ImportKeyContaminated,
                format!("CLR key `{key}` carries assembly-qualified text"),
            );
            return;
        }
        match graph.type_by_full_name(&key) {
            Some(target) => {
                let target_ns = target.namespace.clone();
                if target_ns != source_ns {
                    refs.insert(CrossRef {
                        source_ns: source_ns.to_string(),
                        source_type: source_type.to_string(),
                        target_ns,
                        target_type: key,
                        reference_kind: kind,
                    });
                }
            }
            None => {
                out.unresolved_keys.insert(key);
            }
        }
    });
}
