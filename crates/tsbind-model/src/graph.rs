//! The symbol graph and its lazily-built indices.
//!
//! Ownership is tree-shaped: graph → namespaces → types → members and
//! nested types. Indices are derived data; they are rebuilt on first
//! use after any structural change (cloning for the next pass drops
//! them, which is the pass-boundary invalidation the pipeline relies
//! on).

use crate::ids::TypeStableId;
use crate::types::{TypeKind, TypeSymbol};
use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One namespace and the types it holds. Multiple assemblies can
/// contribute types to the same namespace name; normalization merges
/// them into one symbol with the union of contributors.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NamespaceSymbol {
    pub name: String,
    pub types: Vec<TypeSymbol>,
    pub contributing_assemblies: BTreeSet<String>,
}

impl NamespaceSymbol {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            types: Vec::new(),
            contributing_assemblies: BTreeSet::new(),
        }
    }

    /// Whether this is the root (empty-name) namespace.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.name.is_empty()
    }
}

/// Position of a type inside a graph: (namespace index, type index).
pub type TypeSlot = (usize, usize);

/// Derived lookup tables. Never serialized, never compared.
#[derive(Debug, Default)]
pub struct GraphIndices {
    /// CLR full name (backtick-arity form) → position.
    pub type_by_full_name: FxHashMap<String, TypeSlot>,
    /// Interface stable id → position. Interfaces only.
    pub interface_by_id: FxHashMap<TypeStableId, TypeSlot>,
    /// Namespace name → namespace index.
    pub namespace_by_name: FxHashMap<String, usize>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SymbolGraph {
    pub namespaces: Vec<NamespaceSymbol>,
    /// Identities of the assemblies this graph was loaded from.
    pub assemblies: BTreeSet<String>,
    #[serde(skip)]
    indices: OnceCell<GraphIndices>,
}

impl Clone for SymbolGraph {
    fn clone(&self) -> Self {
        // Indices are intentionally not cloned: a clone marks a pass
        // boundary, after which the structure may change.
        Self {
            namespaces: self.namespaces.clone(),
            assemblies: self.assemblies.clone(),
            indices: OnceCell::new(),
        }
    }
}

impl PartialEq for SymbolGraph {
    fn eq(&self, other: &Self) -> bool {
        self.namespaces == other.namespaces && self.assemblies == other.assemblies
    }
}

impl SymbolGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a freshly-loaded graph: merge namespaces that share a
    /// name, sort namespaces and types lexicographically, and union
    /// assembly contributor sets. Produces the `G1` the shape passes
    /// consume.
    #[must_use]
    pub fn normalized(self) -> Self {
        let assemblies = self.assemblies;
        let mut merged: Vec<NamespaceSymbol> = Vec::new();
        for ns in self.namespaces {
            if let Some(existing) = merged.iter_mut().find(|m| m.name == ns.name) {
                existing.types.extend(ns.types);
                existing
                    .contributing_assemblies
                    .extend(ns.contributing_assemblies);
            } else {
                merged.push(ns);
            }
        }
        merged.sort_by(|a, b| a.name.cmp(&b.name));
        for ns in &mut merged {
            ns.types.sort_by_key(|t| t.clr_full_name());
        }
        Self {
            namespaces: merged,
            assemblies,
            indices: OnceCell::new(),
        }
    }

    /// The lazily-built indices for this graph revision.
    #[must_use]
    pub fn indices(&self) -> &GraphIndices {
        self.indices.get_or_init(|| {
            let mut indices = GraphIndices::default();
            for (ns_idx, ns) in self.namespaces.iter().enumerate() {
                indices.namespace_by_name.insert(ns.name.clone(), ns_idx);
                for (ty_idx, ty) in ns.types.iter().enumerate() {
                    indices
                        .type_by_full_name
                        .insert(ty.clr_full_name(), (ns_idx, ty_idx));
                    if ty.kind == TypeKind::Interface {
                        indices.interface_by_id.insert(ty.id.clone(), (ns_idx, ty_idx));
                    }
                }
            }
            indices
        })
    }

    /// Look a type up by CLR full name (open-generic backtick form).
    #[must_use]
    pub fn type_by_full_name(&self, full_name: &str) -> Option<&TypeSymbol> {
        let &(ns_idx, ty_idx) = self.indices().type_by_full_name.get(full_name)?;
        Some(&self.namespaces[ns_idx].types[ty_idx])
    }

    /// Look an interface up by stable id.
    #[must_use]
    pub fn interface_by_id(&self, id: &TypeStableId) -> Option<&TypeSymbol> {
        let &(ns_idx, ty_idx) = self.indices().interface_by_id.get(id)?;
        Some(&self.namespaces[ns_idx].types[ty_idx])
    }

    /// Iterate `(namespace, type)` pairs in storage order.
    pub fn types(&self) -> impl Iterator<Item = (&NamespaceSymbol, &TypeSymbol)> {
        self.namespaces
            .iter()
            .flat_map(|ns| ns.types.iter().map(move |ty| (ns, ty)))
    }

    /// Total type count across namespaces (excluding nested types).
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.namespaces.iter().map(|ns| ns.types.len()).sum()
    }

    /// Map a transformation over every type, producing the next graph
    /// revision. The shape passes are all expressed through this.
    #[must_use]
    pub fn map_types(&self, mut f: impl FnMut(&NamespaceSymbol, &TypeSymbol) -> TypeSymbol) -> Self {
        let namespaces = self
            .namespaces
            .iter()
            .map(|ns| NamespaceSymbol {
                name: ns.name.clone(),
                types: ns.types.iter().map(|ty| f(ns, ty)).collect(),
                contributing_assemblies: ns.contributing_assemblies.clone(),
            })
            .collect();
        Self {
            namespaces,
            assemblies: self.assemblies.clone(),
            indices: OnceCell::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::TypeBuilder;

    #[test]
    fn normalization_merges_namespaces_and_sorts() {
        let mut graph = SymbolGraph::new();
        graph.assemblies.insert("LibB".to_string());
        graph.assemblies.insert("LibA".to_string());

        let mut ns_b = NamespaceSymbol::new("System.Zeta");
        ns_b.contributing_assemblies.insert("LibB".to_string());
        ns_b.types.push(TypeBuilder::class("LibB", "System.Zeta", "Widget").build());

        let mut ns_a1 = NamespaceSymbol::new("System.Alpha");
        ns_a1.contributing_assemblies.insert("LibA".to_string());
        ns_a1.types.push(TypeBuilder::class("LibA", "System.Alpha", "Beta").build());

        let mut ns_a2 = NamespaceSymbol::new("System.Alpha");
        ns_a2.contributing_assemblies.insert("LibB".to_string());
        ns_a2.types.push(TypeBuilder::class("LibB", "System.Alpha", "Alpha").build());

        graph.namespaces = vec![ns_b, ns_a1, ns_a2];
        let graph = graph.normalized();

        assert_eq!(graph.namespaces.len(), 2);
        assert_eq!(graph.namespaces[0].name, "System.Alpha");
        assert_eq!(graph.namespaces[0].types.len(), 2);
        assert_eq!(graph.namespaces[0].types[0].simple_name, "Alpha");
        assert_eq!(
            graph.namespaces[0].contributing_assemblies.len(),
            2,
            "merged namespace keeps both contributors"
        );
    }

    #[test]
    fn indices_resolve_types_and_interfaces() {
        let mut graph = SymbolGraph::new();
        let mut ns = NamespaceSymbol::new("System");
        ns.types.push(TypeBuilder::interface("CoreLib", "System", "IDisposable").build());
        graph.namespaces.push(ns);

        let found = graph.type_by_full_name("System.IDisposable").unwrap();
        assert_eq!(found.simple_name, "IDisposable");
        let id = TypeStableId::new("CoreLib", "System.IDisposable");
        assert!(graph.interface_by_id(&id).is_some());
    }

    #[test]
    fn clone_drops_indices() {
        let mut graph = SymbolGraph::new();
        let mut ns = NamespaceSymbol::new("System");
        ns.types.push(TypeBuilder::class("CoreLib", "System", "Object").build());
        graph.namespaces.push(ns);
        let _ = graph.indices();

        let mut clone = graph.clone();
        clone.namespaces[0]
            .types
            .push(TypeBuilder::class("CoreLib", "System", "String").build());
        // The clone rebuilds its own indices and sees the new type.
        assert!(clone.type_by_full_name("System.String").is_some());
    }
}
