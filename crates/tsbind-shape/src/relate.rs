//! Target-system erasure and assignability.
//!
//! The target type system sees a flattened shape of every CLR
//! reference: ranks erased from arrays, pointers and byrefs collapsed
//! to their referent, numerics folded together. Conformance checking
//! (shape pass 2) and the gate both relate members through these
//! shapes, never through raw CLR signatures.

use tsbind_model::members::{MethodSymbol, PropertySymbol};
use tsbind_model::typeref::TypeReference;

/// Compact erased shape of a type reference.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErasedShape {
    Named(String),
    GenericApplication(String, Vec<ErasedShape>),
    TypeParameter(String),
    /// Rank-erased, element-typed array.
    Array(Box<ErasedShape>),
    /// Analysis-only safety valve: assigns in both directions.
    Unknown(String),
}

/// Erase a type reference to its target-system shape.
#[must_use]
pub fn erase(ty: &TypeReference) -> ErasedShape {
    match ty {
        TypeReference::Named(named) => {
            if named.type_arguments.is_empty() {
                ErasedShape::Named(named.clr_full_name())
            } else {
                ErasedShape::GenericApplication(
                    named.clr_full_name(),
                    named.type_arguments.iter().map(erase).collect(),
                )
            }
        }
        TypeReference::Nested { .. } => match ty.clr_lookup_key() {
            Some(key) => ErasedShape::Named(key),
            None => ErasedShape::Unknown(ty.to_string()),
        },
        TypeReference::GenericParameter { name, .. } => ErasedShape::TypeParameter(name.clone()),
        TypeReference::Array { element, .. } => ErasedShape::Array(Box::new(erase(element))),
        TypeReference::Pointer { pointee } => erase(pointee),
        TypeReference::ByRef { referenced } => erase(referenced),
        TypeReference::Placeholder => ErasedShape::Unknown("?".to_string()),
    }
}

/// Numeric primitives all surface as one numeric type downstream.
fn is_numeric(full_name: &str) -> bool {
    matches!(
        full_name,
        "System.SByte"
            | "System.Byte"
            | "System.Int16"
            | "System.UInt16"
            | "System.Int32"
            | "System.UInt32"
            | "System.Int64"
            | "System.UInt64"
            | "System.Single"
            | "System.Double"
            | "System.Decimal"
    )
}

/// Conservative structural assignability over erased shapes.
#[must_use]
pub fn is_assignable(from: &ErasedShape, to: &ErasedShape) -> bool {
    if from == to {
        return true;
    }
    match (from, to) {
        (ErasedShape::Unknown(_), _) | (_, ErasedShape::Unknown(_)) => true,
        // Arrays are covariant in their element type.
        (ErasedShape::Array(a), ErasedShape::Array(b)) => is_assignable(a, b),
        (ErasedShape::GenericApplication(head_a, args_a), ErasedShape::GenericApplication(head_b, args_b)) => {
            head_a == head_b
                && args_a.len() == args_b.len()
                && args_a
                    .iter()
                    .zip(args_b.iter())
                    .all(|(a, b)| is_assignable(a, b))
        }
        (ErasedShape::Named(a), ErasedShape::Named(b)) => {
            (is_numeric(a) && is_numeric(b)) || b == "System.Object"
        }
        // Everything widens to the object type.
        (_, ErasedShape::Named(b)) => b == "System.Object",
        _ => false,
    }
}

/// Whether `candidate` structurally satisfies the `required` method.
/// Names are compared by the caller (under the active name transform);
/// this relates arity, parameter count, and types only. Return types
/// are covariant; parameters are checked bi-directionally as a
/// conservative approximation of contravariance.
#[must_use]
pub fn method_assignable(candidate: &MethodSymbol, required: &MethodSymbol) -> bool {
    if candidate.generic_arity() != required.generic_arity() {
        return false;
    }
    if candidate.parameters.len() != required.parameters.len() {
        return false;
    }
    if !is_assignable(&erase(&candidate.return_type), &erase(&required.return_type)) {
        return false;
    }
    candidate
        .parameters
        .iter()
        .zip(required.parameters.iter())
        .all(|(c, r)| {
            let ce = erase(&c.ty);
            let re = erase(&r.ty);
            is_assignable(&re, &ce) || is_assignable(&ce, &re)
        })
}

/// Whether `candidate` structurally satisfies the `required` property.
/// Read-only properties are covariant in their type; mutable ones are
/// invariant.
#[must_use]
pub fn property_assignable(candidate: &PropertySymbol, required: &PropertySymbol) -> bool {
    if candidate.index_parameters.len() != required.index_parameters.len() {
        return false;
    }
    for (c, r) in candidate
        .index_parameters
        .iter()
        .zip(required.index_parameters.iter())
    {
        if erase(&c.ty) != erase(&r.ty) {
            return false;
        }
    }
    let ce = erase(&candidate.property_type);
    let re = erase(&required.property_type);
    if required.is_read_only() {
        is_assignable(&ce, &re)
    } else {
        ce == re
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tsbind_model::build::{int_ref, long_ref, object_ref, string_ref};

    #[test]
    fn pointer_and_byref_erase_to_referent() {
        let ptr = TypeReference::Pointer {
            pointee: Box::new(int_ref()),
        };
        let byref = TypeReference::by_ref(int_ref());
        assert_eq!(erase(&ptr), erase(&int_ref()));
        assert_eq!(erase(&byref), erase(&int_ref()));
    }

    #[test]
    fn arrays_are_rank_erased_and_covariant() {
        let flat = TypeReference::Array {
            element: Box::new(string_ref()),
            rank: 1,
        };
        let square = TypeReference::Array {
            element: Box::new(string_ref()),
            rank: 2,
        };
        assert_eq!(erase(&flat), erase(&square));
        assert!(is_assignable(
            &erase(&TypeReference::array_of(string_ref())),
            &erase(&TypeReference::array_of(object_ref())),
        ));
    }

    #[test]
    fn numerics_fold_together() {
        assert!(is_assignable(&erase(&int_ref()), &erase(&long_ref())));
        assert!(is_assignable(&erase(&long_ref()), &erase(&int_ref())));
        assert!(!is_assignable(&erase(&string_ref()), &erase(&int_ref())));
    }

    #[test]
    fn everything_widens_to_object() {
        assert!(is_assignable(&erase(&string_ref()), &erase(&object_ref())));
        assert!(is_assignable(
            &erase(&TypeReference::array_of(int_ref())),
            &erase(&object_ref()),
        ));
        assert!(!is_assignable(&erase(&object_ref()), &erase(&string_ref())));
    }

    #[test]
    fn generic_applications_relate_elementwise() {
        let list = |arg: TypeReference| {
            TypeReference::named("CoreLib", "System.Collections.Generic", "List", 1, [arg])
        };
        assert!(is_assignable(
            &erase(&list(int_ref())),
            &erase(&list(long_ref())),
        ));
        assert!(!is_assignable(
            &erase(&list(string_ref())),
            &erase(&list(int_ref())),
        ));
    }

    #[test]
    fn unknown_assigns_both_directions() {
        let unknown = erase(&TypeReference::Placeholder);
        assert!(is_assignable(&unknown, &erase(&string_ref())));
        assert!(is_assignable(&erase(&string_ref()), &unknown));
    }
}
