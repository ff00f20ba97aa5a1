//! The emission plan and the printer boundary.
//!
//! The plan owns everything the printer needs: the reserved graph, the
//! import/export plan, and the total emission order. The printer never
//! walks the graph freely - it follows `EmitOrder`, which is what
//! makes output byte-stable. Sidecar models (per-member metadata,
//! final-name-to-CLR bindings) serialize with serde.

use crate::imports::ImportPlan;
use crate::order::EmitOrder;
use rustc_hash::FxHasher;
use serde::Serialize;
use std::collections::BTreeMap;
use std::hash::Hasher;
use std::path::PathBuf;
use tsbind_model::{EmitScope, MemberVisibility, ParameterKind, SymbolGraph};

#[derive(Debug, Serialize)]
pub struct EmissionPlan {
    pub graph: SymbolGraph,
    pub import_plan: ImportPlan,
    pub emit_order: EmitOrder,
}

impl EmissionPlan {
    /// Content fingerprint of the ordered plan. Two runs over the same
    /// input must agree on this; the determinism tests assert it.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = FxHasher::default();
        // Serialized form is deterministic: ordered maps throughout,
        // derived indices skipped.
        match serde_json::to_string(self) {
            Ok(json) => hasher.write(json.as_bytes()),
            Err(_) => hasher.write(b"<unserializable>"),
        }
        hasher.finish()
    }
}

/// The narrow emit boundary. Implementations turn the plan into
/// declaration files, facades, and sidecars; the core never writes
/// output bytes itself.
pub trait DeclarationPrinter {
    /// Print every artifact for the plan, returning the paths written.
    fn print(&mut self, plan: &EmissionPlan) -> std::io::Result<Vec<PathBuf>>;
}

/// Per-member metadata sidecar entry, keyed by canonical signature.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MemberMetadata {
    pub canonical_signature: String,
    pub clr_name: String,
    pub is_virtual: bool,
    pub is_override: bool,
    pub is_static: bool,
    /// Bit `i` set when parameter `i` is `ref` or `out`.
    pub ref_out_mask: u32,
    pub visibility: MemberVisibility,
}

/// Final-name-to-CLR-name binding sidecar entry.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct BindingEntry {
    pub ts_name: String,
    pub clr_name: String,
}

fn ref_out_mask(params: &[tsbind_model::Parameter]) -> u32 {
    let mut mask = 0u32;
    for (i, p) in params.iter().enumerate().take(32) {
        if matches!(p.kind, ParameterKind::Ref | ParameterKind::Out) {
            mask |= 1 << i;
        }
    }
    mask
}

/// Collect the metadata sidecar: type CLR full name → entries in
/// storage order.
#[must_use]
pub fn member_metadata(graph: &SymbolGraph) -> BTreeMap<String, Vec<MemberMetadata>> {
    use tsbind_model::MemberFlags;
    let mut out: BTreeMap<String, Vec<MemberMetadata>> = BTreeMap::new();
    for (_, ty) in graph.types() {
        let mut entries = Vec::new();
        for method in &ty.methods {
            if method.emit_scope == EmitScope::Omitted {
                continue;
            }
            entries.push(MemberMetadata {
                canonical_signature: method.id.canonical_signature.clone(),
                clr_name: method.clr_name.clone(),
                is_virtual: method.flags.contains(MemberFlags::VIRTUAL),
                is_override: method.flags.contains(MemberFlags::OVERRIDE),
                is_static: method.is_static(),
                ref_out_mask: ref_out_mask(&method.parameters),
                visibility: method.visibility,
            });
        }
        for prop in &ty.properties {
            if prop.emit_scope == EmitScope::Omitted {
                continue;
            }
            entries.push(MemberMetadata {
                canonical_signature: prop.id.canonical_signature.clone(),
                clr_name: prop.clr_name.clone(),
                is_virtual: prop.flags.contains(MemberFlags::VIRTUAL),
                is_override: prop.flags.contains(MemberFlags::OVERRIDE),
                is_static: prop.is_static(),
                ref_out_mask: 0,
                visibility: prop.visibility,
            });
        }
        if !entries.is_empty() {
            entries.sort_by(|a, b| a.canonical_signature.cmp(&b.canonical_signature));
            out.insert(ty.clr_full_name(), entries);
        }
    }
    out
}

/// Collect the binding sidecar: final emitted names back to CLR names,
/// types and members both.
#[must_use]
pub fn binding_entries(graph: &SymbolGraph) -> Vec<BindingEntry> {
    let mut out = Vec::new();
    for (_, ty) in graph.types() {
        if let Some(name) = &ty.ts_emit_name {
            out.push(BindingEntry {
                ts_name: name.clone(),
                clr_name: ty.clr_full_name(),
            });
        }
        for method in &ty.methods {
            if let Some(name) = &method.ts_emit_name
                && method.emit_scope != EmitScope::Omitted
            {
                out.push(BindingEntry {
                    ts_name: format!("{}.{}", ty.clr_full_name(), name),
                    clr_name: format!("{}.{}", ty.clr_full_name(), method.clr_name),
                });
            }
        }
        for prop in &ty.properties {
            if let Some(name) = &prop.ts_emit_name
                && prop.emit_scope != EmitScope::Omitted
            {
                out.push(BindingEntry {
                    ts_name: format!("{}.{}", ty.clr_full_name(), name),
                    clr_name: format!("{}.{}", ty.clr_full_name(), prop.clr_name),
                });
            }
        }
    }
    out.sort();
    out.dedup();
    out
}
