//! Structural conformance (shape pass 2).
//!
//! For each class or struct and each declared interface, any interface
//! member the type's class surface does not structurally satisfy gets a
//! view-only clone. Satisfaction is judged at the target system's
//! level: erased signatures, names under the active transform - not
//! CLR signature identity. Clones keep the interface member's stable
//! id and record the constructed interface as their source.

use crate::context::PassContext;
use crate::passes::resolve_interface;
use crate::relate::{erase, method_assignable, property_assignable};
use crate::substitute::{instantiate_method, instantiate_property};
use tsbind_model::{EmitScope, Provenance, SymbolGraph, TypeKind, TypeSymbol};

pub fn run(graph: SymbolGraph, ctx: &mut PassContext<'_>) -> SymbolGraph {
    let mut next = graph.clone();
    for ns in &mut next.namespaces {
        for ty in &mut ns.types {
            conform_type(ty, &graph, ctx);
        }
    }
    next
}

fn conform_type(ty: &mut TypeSymbol, graph: &SymbolGraph, ctx: &mut PassContext<'_>) {
    if !matches!(ty.kind, TypeKind::Class | TypeKind::Struct) {
        return;
    }
    let transform = ctx.policy.emission.name_transform;

    let interfaces = ty.interfaces.clone();
    for iface_ref in &interfaces {
        let Some((iface, args)) = resolve_interface(graph, iface_ref) else {
            continue;
        };

        for method in &iface.methods {
            if method.is_static() {
                continue;
            }
            let required = instantiate_method(method, &args);
            let satisfied = ty.methods.iter().any(|candidate| {
                candidate.emit_scope == EmitScope::ClassSurface
                    && transform.apply(&candidate.clr_name) == transform.apply(&required.clr_name)
                    && method_assignable(candidate, &required)
            });
            let already_cloned = ty.methods.iter().any(|m| m.id == required.id);
            if !satisfied && !already_cloned {
                let mut clone = required;
                clone.provenance = Provenance::FromInterface;
                clone.source_interface = Some(iface_ref.clone());
                clone.emit_scope = EmitScope::ViewOnly;
                ty.methods.push(clone);
            }
        }

        for property in &iface.properties {
            if property.is_static() {
                continue;
            }
            let required = instantiate_property(property, &args);
            let satisfied = ty.properties.iter().any(|candidate| {
                candidate.emit_scope == EmitScope::ClassSurface
                    && transform.apply(&candidate.clr_name) == transform.apply(&required.clr_name)
                    && property_assignable(candidate, &required)
            });
            let already_cloned = ty.properties.iter().any(|p| p.id == required.id);
            if !satisfied && !already_cloned {
                let mut clone = required;
                clone.provenance = Provenance::FromInterface;
                clone.source_interface = Some(iface_ref.clone());
                clone.emit_scope = EmitScope::ViewOnly;
                ty.properties.push(clone);
            }
        }

        for event in &iface.events {
            if event.is_static() {
                continue;
            }
            let mut required = event.clone();
            required.handler_type = crate::substitute::substitute(&event.handler_type, &args);
            let satisfied = ty.events.iter().any(|candidate| {
                candidate.emit_scope == EmitScope::ClassSurface
                    && transform.apply(&candidate.clr_name) == transform.apply(&required.clr_name)
                    && erase(&candidate.handler_type) == erase(&required.handler_type)
            });
            let already_cloned = ty.events.iter().any(|e| e.id == required.id);
            if !satisfied && !already_cloned {
                required.provenance = Provenance::FromInterface;
                required.source_interface = Some(iface_ref.clone());
                required.emit_scope = EmitScope::ViewOnly;
                ty.events.push(required);
            }
        }
    }
}
