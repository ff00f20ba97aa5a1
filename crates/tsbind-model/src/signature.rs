//! Canonical signature forms.
//!
//! One textual form per member kind, used as the key for member dedup,
//! overload grouping, and interface-requirement matching. The forms
//! embed the canonical type text from `TypeReference::Display`, so they
//! are stable across runs and total on any reference shape.

use crate::members::{Parameter, PropertySymbol};
use crate::typeref::TypeReference;
use std::fmt::Write;

fn push_parameter(out: &mut String, param: &Parameter) {
    let _ = write!(
        out,
        "{}:{}:{}:{}",
        param.kind.canonical_tag(),
        param.ty,
        if param.optional { "opt" } else { "req" },
        if matches!(param.kind, crate::members::ParameterKind::Params) {
            "params"
        } else {
            "norm"
        }
    );
}

fn push_parameter_list(out: &mut String, params: &[Parameter]) {
    out.push('(');
    for (i, param) in params.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        push_parameter(out, param);
    }
    out.push(')');
}

/// Canonical method signature:
/// `<Name>|arity=<N>|(<kind>:<type>:<opt>:<params>,…)|-><Return>|static=<bool>`
#[must_use]
pub fn method_signature(
    name: &str,
    generic_arity: u16,
    params: &[Parameter],
    return_type: &TypeReference,
    is_static: bool,
) -> String {
    let mut out = String::with_capacity(64);
    let _ = write!(out, "{name}|arity={generic_arity}|");
    push_parameter_list(&mut out, params);
    let _ = write!(out, "|->{return_type}|static={is_static}");
    out
}

/// The coarser bucket key for return-type overload detection: the full
/// method signature with the return type position blanked. Parameter
/// kinds stay in the key (a `ref` overload is a different bucket).
#[must_use]
pub fn method_signature_excluding_return(
    name: &str,
    generic_arity: u16,
    params: &[Parameter],
    is_static: bool,
) -> String {
    let mut out = String::with_capacity(64);
    let _ = write!(out, "{name}|arity={generic_arity}|");
    push_parameter_list(&mut out, params);
    let _ = write!(out, "|->_|static={is_static}");
    out
}

/// Canonical property signature:
/// `<Name>|(<idx0type>,…)|-><PropType>|static=<bool>|accessor=<get|set|getset>`
#[must_use]
pub fn property_signature(
    name: &str,
    index_params: &[Parameter],
    property_type: &TypeReference,
    is_static: bool,
    has_getter: bool,
    has_setter: bool,
) -> String {
    let accessor = match (has_getter, has_setter) {
        (true, true) => "getset",
        (true, false) => "get",
        (false, true) => "set",
        (false, false) => "none",
    };
    let mut out = String::with_capacity(48);
    let _ = write!(out, "{name}|(");
    for (i, param) in index_params.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}", param.ty);
    }
    let _ = write!(
        out,
        ")|->{property_type}|static={is_static}|accessor={accessor}"
    );
    out
}

/// Property signature excluding the property type, for grouping
/// covariant interface properties (same name and index list, different
/// type).
#[must_use]
pub fn property_signature_excluding_type(prop: &PropertySymbol) -> String {
    let mut out = String::with_capacity(32);
    let _ = write!(out, "{}|(", prop.clr_name);
    for (i, param) in prop.index_parameters.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        let _ = write!(out, "{}", param.ty);
    }
    let _ = write!(out, ")|->_|static={}", prop.is_static());
    out
}

/// Canonical field signature: `<Name>|field:<Type>|static=<bool>`
#[must_use]
pub fn field_signature(name: &str, field_type: &TypeReference, is_static: bool) -> String {
    format!("{name}|field:{field_type}|static={is_static}")
}

/// Canonical event signature: `<Name>|event:<Handler>|static=<bool>`
#[must_use]
pub fn event_signature(name: &str, handler_type: &TypeReference, is_static: bool) -> String {
    format!("{name}|event:{handler_type}|static={is_static}")
}

/// Canonical constructor signature: `.ctor|(<params>)|static=<bool>`
#[must_use]
pub fn constructor_signature(params: &[Parameter], is_static: bool) -> String {
    let mut out = String::with_capacity(32);
    out.push_str(".ctor|");
    push_parameter_list(&mut out, params);
    let _ = write!(out, "|static={is_static}");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::members::ParameterKind;

    fn int() -> TypeReference {
        TypeReference::named("CoreLib", "System", "Int32", 0, [])
    }

    fn string() -> TypeReference {
        TypeReference::named("CoreLib", "System", "String", 0, [])
    }

    #[test]
    fn method_signature_shape() {
        let params = vec![
            Parameter::new("index", int()),
            Parameter::new("value", string()).with_kind(ParameterKind::Out),
        ];
        let sig = method_signature("TryGet", 0, &params, &string(), false);
        assert_eq!(
            sig,
            "TryGet|arity=0|(in:System.Int32:req:norm,out:System.String:req:norm)|->System.String|static=false"
        );
    }

    #[test]
    fn generic_arity_distinguishes_signatures() {
        let a = method_signature("Create", 0, &[], &string(), true);
        let b = method_signature("Create", 1, &[], &string(), true);
        assert_ne!(a, b);
    }

    #[test]
    fn excluding_return_merges_return_variants() {
        let a = method_signature_excluding_return("Get", 0, &[Parameter::new("i", int())], false);
        let b = method_signature_excluding_return("Get", 0, &[Parameter::new("i", int())], false);
        assert_eq!(a, b);
        assert!(!a.contains("System.String"));
    }

    #[test]
    fn property_signature_shape() {
        let sig = property_signature(
            "Item",
            &[Parameter::new("index", int())],
            &string(),
            false,
            true,
            true,
        );
        assert_eq!(
            sig,
            "Item|(System.Int32)|->System.String|static=false|accessor=getset"
        );
    }

    #[test]
    fn constructor_signature_shape() {
        let sig = constructor_signature(&[Parameter::new("capacity", int())], false);
        assert_eq!(sig, ".ctor|(in:System.Int32:req:norm)|static=false");
    }
}
