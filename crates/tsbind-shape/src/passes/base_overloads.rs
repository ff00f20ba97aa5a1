//! Base overload addition (shape pass 6).
//!
//! The target system hides a base class's whole overload set as soon
//! as a derived class declares any method of the same name. When D
//! overrides `N` from its base chain, every `N`-signature the chain
//! declares but D lacks is re-added to D, under a fresh stable id
//! scoped to D.

use crate::context::PassContext;
use crate::substitute::{instantiate_method, instantiated_method_signature};
use rustc_hash::FxHashSet;
use tsbind_model::typeref::TypeReference;
use tsbind_model::{EmitScope, MemberFlags, MethodSymbol, Provenance, SymbolGraph, TypeKind, TypeSymbol};

const MAX_BASE_CHAIN: usize = 64;

pub fn run(graph: SymbolGraph, _ctx: &mut PassContext<'_>) -> SymbolGraph {
    let mut next = graph.clone();
    for ns in &mut next.namespaces {
        for ty in &mut ns.types {
            if ty.kind == TypeKind::Class {
                complete_overload_sets(ty, &graph);
            }
        }
    }
    next
}

fn complete_overload_sets(ty: &mut TypeSymbol, graph: &SymbolGraph) {
    let overridden_names: FxHashSet<String> = ty
        .methods
        .iter()
        .filter(|m| m.flags.contains(MemberFlags::OVERRIDE))
        .map(|m| m.clr_name.clone())
        .collect();
    if overridden_names.is_empty() {
        return;
    }

    let mut own_sigs: FxHashSet<String> = ty
        .methods
        .iter()
        .map(instantiated_method_signature)
        .collect();

    let mut additions: Vec<MethodSymbol> = Vec::new();
    let assembly = ty.id.assembly.clone();
    let declaring = ty.clr_full_name();

    // Walk the base chain, composing type arguments as we go so a
    // `Derived : Base<string>` sees `Base`'s members closed over
    // string.
    let mut current: Option<(TypeReference, Vec<TypeReference>)> = ty
        .base_type
        .clone()
        .map(|base| (base.clone(), base_args(&base)));
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut depth = 0usize;

    while let Some((base_ref, args)) = current.take() {
        depth += 1;
        if depth > MAX_BASE_CHAIN {
            break;
        }
        let Some(key) = base_ref.clr_lookup_key() else {
            break;
        };
        if !visited.insert(key.clone()) {
            break;
        }
        let Some(base) = graph.type_by_full_name(&key) else {
            break;
        };

        for method in &base.methods {
            if method.is_static()
                || method.emit_scope != EmitScope::ClassSurface
                || !overridden_names.contains(&method.clr_name)
            {
                continue;
            }
            let instantiated = instantiate_method(method, &args);
            let sig = instantiated_method_signature(&instantiated);
            if own_sigs.contains(&sig) {
                continue;
            }
            own_sigs.insert(sig.clone());
            let mut added = instantiated;
            added.id = added.id.rehomed(&assembly, &declaring);
            added.id.canonical_signature = sig;
            added.provenance = Provenance::BaseOverload;
            added.flags.remove(MemberFlags::ABSTRACT);
            added.emit_scope = EmitScope::ClassSurface;
            additions.push(added);
        }

        current = base.base_type.clone().map(|next_base| {
            // Rewrite the grandparent reference into this type's
            // parameter space before continuing up.
            let rewritten = crate::substitute::substitute(&next_base, &args);
            let next_args = base_args(&rewritten);
            (rewritten, next_args)
        });
    }

    ty.methods.extend(additions);
}

fn base_args(base_ref: &TypeReference) -> Vec<TypeReference> {
    match base_ref {
        TypeReference::Named(named) => named.type_arguments.to_vec(),
        _ => Vec::new(),
    }
}
