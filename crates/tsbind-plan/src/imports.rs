//! The import/export planner.
//!
//! For every namespace: which types it pulls from which other
//! namespaces, under what local names, value or type-only; and the
//! export manifest of its own public types. Arity rides along on each
//! export - the printer cannot otherwise tell a generic type declared
//! as a value from a plain one.

use crate::import_graph::ImportGraph;
use crate::paths::module_specifier;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tsbind_common::policy::Policy;
use tsbind_common::{sanitize_identifier, DiagnosticBag, DiagnosticCode};
use tsbind_model::SymbolGraph;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImportedType {
    /// Open-generic CLR lookup key of the referenced type.
    pub clr_key: String,
    /// The name the target module exports it under.
    pub ts_name: String,
    /// Local alias, present on collision or under unconditional
    /// aliasing policy.
    pub alias: Option<String>,
    /// `import type` - the reference never appears in a heritage
    /// position from this namespace.
    pub type_only: bool,
    /// Fully qualified fallback name for value imports.
    pub qualified_name: Option<String>,
}

impl ImportedType {
    /// The identifier this namespace uses locally.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.ts_name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ImportStatement {
    pub specifier: String,
    pub types: Vec<ImportedType>,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ExportEntry {
    pub name: String,
    pub arity: u16,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NamespaceImports {
    pub namespace: String,
    /// Target namespace → statement, ordered.
    pub imports: BTreeMap<String, ImportStatement>,
    pub exports: Vec<ExportEntry>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ImportPlan {
    pub namespaces: BTreeMap<String, NamespaceImports>,
}

/// External types keep their simple name, with the backtick arity
/// mapped to an underscore and nested-type `+` to `$`, then reserved
/// words sanitized.
#[must_use]
pub fn external_ts_name(clr_key: &str) -> String {
    let simple = clr_key.rsplit('.').next().unwrap_or(clr_key);
    let mapped = simple.replace('`', "_").replace('+', "$");
    let (sanitized, _) = sanitize_identifier(&mapped);
    sanitized
}

fn ts_name_is_contaminated(name: &str) -> bool {
    name.contains('[') || name.contains(',') || name.contains("Culture=") || name.contains("PublicKeyToken=")
}

fn namespace_alias(target_ns: &str) -> String {
    if target_ns.is_empty() {
        "$ns_root".to_string()
    } else {
        format!("$ns_{}", target_ns.replace('.', "_"))
    }
}

/// Build the per-namespace import/export plan.
#[must_use]
pub fn build_import_plan(
    graph: &SymbolGraph,
    import_graph: &ImportGraph,
    policy: &Policy,
    diagnostics: &mut DiagnosticBag,
) -> ImportPlan {
    let mut plan = ImportPlan::default();

    for ns in &graph.namespaces {
        let mut entry = NamespaceImports {
            namespace: ns.name.clone(),
            ..NamespaceImports::default()
        };

        // Exports: every public type, with arity.
        for ty in &ns.types {
            if let Some(name) = &ty.ts_emit_name {
                entry.exports.push(ExportEntry {
                    name: name.clone(),
                    arity: ty.arity,
                });
            }
        }
        entry.exports.sort();

        // Per-target imported type sets, from the cross-ref list.
        let mut per_target: BTreeMap<String, BTreeMap<String, bool>> = BTreeMap::new();
        for cross in &import_graph.cross_refs {
            if cross.source_ns != ns.name {
                continue;
            }
            let heritage = per_target
                .entry(cross.target_ns.clone())
                .or_default()
                .entry(cross.target_type.clone())
                .or_insert(false);
            *heritage = *heritage || cross.reference_kind.is_heritage();
        }

        // Names already taken locally: this namespace's own types.
        let mut taken: BTreeSet<String> = entry.exports.iter().map(|e| e.name.clone()).collect();

        for (target_ns, types) in per_target {
            let specifier = module_specifier(&ns.name, &target_ns);
            let mut statement = ImportStatement {
                specifier,
                types: Vec::new(),
            };
            for (clr_key, heritage) in types {
                let (ts_name, has_views) = match graph.type_by_full_name(&clr_key) {
                    Some(target) => (
                        target
                            .ts_emit_name
                            .clone()
                            .unwrap_or_else(|| external_ts_name(&clr_key)),
                        !target.explicit_views.is_empty(),
                    ),
                    None => (external_ts_name(&clr_key), false),
                };
                if ts_name_is_contaminated(&ts_name) {
                    diagnostics.report(
                        DiagnosticCode::InvalidImportModulePath,
                        format!("import name `{ts_name}` for `{clr_key}` is malformed"),
                    );
                    continue;
                }

                let needs_alias =
                    policy.modules.always_alias_imports || taken.contains(&ts_name);
                let alias = needs_alias.then(|| {
                    let flat = if target_ns.is_empty() {
                        "root".to_string()
                    } else {
                        target_ns.replace('.', "_")
                    };
                    format!("{ts_name}${flat}")
                });
                taken.insert(alias.clone().unwrap_or_else(|| ts_name.clone()));

                let qualified_name = heritage.then(|| {
                    // The plain alias slot belongs to the view-carrying
                    // shape when views exist; the instance class hangs
                    // off the `$instance` suffix.
                    let suffix = if has_views { "$instance" } else { "" };
                    format!(
                        "{}.{}.{ts_name}{suffix}",
                        namespace_alias(&target_ns),
                        target_ns
                    )
                });

                statement.types.push(ImportedType {
                    clr_key,
                    ts_name,
                    alias,
                    type_only: !heritage,
                    qualified_name,
                });
            }
            if !statement.types.is_empty() {
                entry.imports.insert(target_ns, statement);
            }
        }

        plan.namespaces.insert(ns.name.clone(), entry);
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_names_map_backtick_and_nesting() {
        assert_eq!(external_ts_name("System.Collections.Generic.List`1"), "List_1");
        assert_eq!(external_ts_name("System.Environment+SpecialFolder"), "Environment$SpecialFolder");
        assert_eq!(external_ts_name("System.Delegate"), "Delegate_");
    }

    #[test]
    fn contamination_guard() {
        assert!(ts_name_is_contaminated("List, Culture=neutral"));
        assert!(!ts_name_is_contaminated("List_1"));
    }
}
