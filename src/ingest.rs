//! The load boundary.
//!
//! Reflection ingestion lives outside this workspace; what lives here
//! is the narrow interface it must satisfy and the ingestion rules the
//! pipeline depends on: compiler-generated types never enter the
//! graph, parameter names arrive pre-sanitized, and stable ids carry
//! canonical signatures. `JsonGraphIngest` reads symbol-graph dumps
//! (produced by the external reflection tool) and is what the CLI
//! drives.

use std::path::{Path, PathBuf};
use tsbind_common::{sanitize_identifier, Diagnostic, DiagnosticBag, DiagnosticCode};
use tsbind_model::{SymbolGraph, TypeSymbol};

/// The reflection boundary: paths in, CLR-flavored graph out. A failed
/// assembly is fatal for that load - no partial processing.
pub trait AssemblyIngest {
    fn load(&mut self, paths: &[PathBuf]) -> Result<SymbolGraph, Diagnostic>;
}

/// Whether a simple name marks a compiler-generated type (closure
/// display classes, async state machines). These never enter the
/// graph.
#[must_use]
pub fn is_compiler_generated(simple_name: &str) -> bool {
    simple_name.contains('<') || simple_name.contains('>')
}

/// Parameter names are sanitized at ingestion so later stages can
/// treat them as emission-ready.
#[must_use]
pub fn sanitize_parameter_name(raw: &str) -> String {
    let (sanitized, _) = sanitize_identifier(raw);
    sanitized
}

/// Apply the ingestion rules to a freshly loaded graph: drop
/// compiler-generated types (counted per type) and sanitize every
/// parameter name in place.
#[must_use]
pub fn apply_ingest_rules(graph: SymbolGraph, diagnostics: &mut DiagnosticBag) -> SymbolGraph {
    let mut graph = graph;
    for ns in &mut graph.namespaces {
        let before = ns.types.len();
        ns.types.retain(|ty| !is_compiler_generated(&ty.simple_name));
        let dropped = before - ns.types.len();
        if dropped > 0 {
            diagnostics.report(
                DiagnosticCode::CompilerGeneratedSkipped,
                format!("{dropped} compiler-generated type(s) skipped in `{}`", ns.name),
            );
        }
        for ty in &mut ns.types {
            sanitize_type_parameters(ty);
        }
    }
    graph
}

fn sanitize_type_parameters(ty: &mut TypeSymbol) {
    for method in &mut ty.methods {
        for param in &mut method.parameters {
            param.name = sanitize_parameter_name(&param.name);
        }
    }
    for prop in &mut ty.properties {
        for param in &mut prop.index_parameters {
            param.name = sanitize_parameter_name(&param.name);
        }
    }
    for ctor in &mut ty.constructors {
        for param in &mut ctor.parameters {
            param.name = sanitize_parameter_name(&param.name);
        }
    }
    for nested in &mut ty.nested_types {
        sanitize_type_parameters(nested);
    }
}

/// Loads symbol-graph dumps serialized as JSON, merging multiple dumps
/// into one graph.
#[derive(Debug, Default)]
pub struct JsonGraphIngest;

impl JsonGraphIngest {
    fn load_one(path: &Path) -> Result<SymbolGraph, Diagnostic> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            Diagnostic::new(
                DiagnosticCode::AssemblyLoadFailed,
                format!("cannot read `{}`: {e}", path.display()),
            )
        })?;
        serde_json::from_str(&text).map_err(|e| {
            Diagnostic::new(
                DiagnosticCode::AssemblyLoadFailed,
                format!("cannot parse `{}`: {e}", path.display()),
            )
        })
    }
}

impl AssemblyIngest for JsonGraphIngest {
    fn load(&mut self, paths: &[PathBuf]) -> Result<SymbolGraph, Diagnostic> {
        let mut merged = SymbolGraph::new();
        for path in paths {
            let graph = Self::load_one(path)?;
            merged.assemblies.extend(graph.assemblies);
            merged.namespaces.extend(graph.namespaces);
        }
        Ok(merged)
    }
}
