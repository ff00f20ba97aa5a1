//! Generic-parameter substitution.
//!
//! When a constructed interface (`IEnumerable<string>`) contributes
//! members to a type, every type-scope parameter in those members is
//! replaced by the corresponding argument. Method-scope parameters are
//! untouched; they belong to the member, not the interface.

use tsbind_model::members::{MethodSymbol, Parameter, PropertySymbol};
use tsbind_model::signature;
use tsbind_model::typeref::{GenericScope, NamedType, TypeReference};

/// Substitute type-scope generic parameters by position. Out-of-range
/// positions are left in place (open constructions stay open).
#[must_use]
pub fn substitute(ty: &TypeReference, args: &[TypeReference]) -> TypeReference {
    match ty {
        TypeReference::GenericParameter {
            scope: GenericScope::Type,
            position,
            ..
        } => match args.get(*position as usize) {
            Some(replacement) => replacement.clone(),
            None => ty.clone(),
        },
        TypeReference::GenericParameter { .. } | TypeReference::Placeholder => ty.clone(),
        TypeReference::Named(named) => TypeReference::Named(Box::new(NamedType {
            assembly: named.assembly.clone(),
            namespace: named.namespace.clone(),
            simple_name: named.simple_name.clone(),
            arity: named.arity,
            type_arguments: named
                .type_arguments
                .iter()
                .map(|arg| substitute(arg, args))
                .collect(),
        })),
        TypeReference::Nested {
            declaring,
            nested_name,
        } => TypeReference::Nested {
            declaring: Box::new(substitute(declaring, args)),
            nested_name: nested_name.clone(),
        },
        TypeReference::Array { element, rank } => TypeReference::Array {
            element: Box::new(substitute(element, args)),
            rank: *rank,
        },
        TypeReference::Pointer { pointee } => TypeReference::Pointer {
            pointee: Box::new(substitute(pointee, args)),
        },
        TypeReference::ByRef { referenced } => TypeReference::ByRef {
            referenced: Box::new(substitute(referenced, args)),
        },
    }
}

fn substitute_parameters(params: &[Parameter], args: &[TypeReference]) -> Vec<Parameter> {
    params
        .iter()
        .map(|p| Parameter {
            name: p.name.clone(),
            ty: substitute(&p.ty, args),
            kind: p.kind,
            optional: p.optional,
            default: p.default.clone(),
        })
        .collect()
}

/// Instantiate an interface method for a constructed reference. The
/// clone keeps the interface member's stable id; only the types (and
/// the derived canonical signature used for matching) change.
#[must_use]
pub fn instantiate_method(method: &MethodSymbol, args: &[TypeReference]) -> MethodSymbol {
    let mut clone = method.clone();
    clone.return_type = substitute(&method.return_type, args);
    clone.parameters = substitute_parameters(&method.parameters, args);
    for gp in &mut clone.generic_params {
        gp.constraints = gp.constraints.iter().map(|c| substitute(c, args)).collect();
    }
    clone
}

/// Instantiate an interface property for a constructed reference.
#[must_use]
pub fn instantiate_property(property: &PropertySymbol, args: &[TypeReference]) -> PropertySymbol {
    let mut clone = property.clone();
    clone.property_type = substitute(&property.property_type, args);
    clone.index_parameters = substitute_parameters(&property.index_parameters, args);
    clone
}

/// The canonical signature of a method as it reads after substitution.
/// Matching against a type's members goes through this, not the open
/// form baked into the stable id.
#[must_use]
pub fn instantiated_method_signature(method: &MethodSymbol) -> String {
    signature::method_signature(
        &method.clr_name,
        method.generic_arity(),
        &method.parameters,
        &method.return_type,
        method.is_static(),
    )
}

/// The canonical signature of a property as it reads after substitution.
#[must_use]
pub fn instantiated_property_signature(property: &PropertySymbol) -> String {
    signature::property_signature(
        &property.clr_name,
        &property.index_parameters,
        &property.property_type,
        property.is_static(),
        property.has_getter,
        property.has_setter,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsbind_model::build::string_ref;

    #[test]
    fn type_params_replace_by_position() {
        let open = TypeReference::named(
            "CoreLib",
            "System.Collections.Generic",
            "IEnumerator",
            1,
            [TypeReference::type_param("T", 0)],
        );
        let closed = substitute(&open, &[string_ref()]);
        assert_eq!(
            closed.to_string(),
            "System.Collections.Generic.IEnumerator`1<System.String>"
        );
    }

    #[test]
    fn method_scope_params_are_untouched() {
        let method_param = TypeReference::method_param("M", 0);
        assert_eq!(substitute(&method_param, &[string_ref()]), method_param);
    }

    #[test]
    fn out_of_range_positions_stay_open() {
        let param = TypeReference::type_param("U", 3);
        assert_eq!(substitute(&param, &[string_ref()]), param);
    }

    #[test]
    fn nested_structures_substitute_through() {
        let arr = TypeReference::array_of(TypeReference::by_ref(TypeReference::type_param("T", 0)));
        let closed = substitute(&arr, &[string_ref()]);
        assert_eq!(closed.to_string(), "System.String&[]");
    }
}
