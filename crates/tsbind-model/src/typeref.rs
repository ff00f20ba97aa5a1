//! The closed type-reference sum type.
//!
//! Cross-type references never point into the graph; a reference is a
//! self-contained description (assembly, namespace, name, arity,
//! arguments) resolved through the graph's indices on demand. Cycles
//! therefore only exist through the index, never through this type.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// Whether a generic parameter belongs to its declaring type or to a
/// generic method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GenericScope {
    Type,
    Method,
}

/// A reference to a (possibly constructed) named type.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NamedType {
    pub assembly: String,
    /// Empty string for the root namespace.
    pub namespace: String,
    /// Simple name without the backtick suffix (`List`, not `List`1`).
    pub simple_name: String,
    pub arity: u16,
    /// Empty for open generics and non-generic types.
    pub type_arguments: SmallVec<[TypeReference; 2]>,
}

impl NamedType {
    /// CLR full name in backtick-arity form: `System.Collections.Generic.List`1`.
    #[must_use]
    pub fn clr_full_name(&self) -> String {
        let base = if self.namespace.is_empty() {
            self.simple_name.clone()
        } else {
            format!("{}.{}", self.namespace, self.simple_name)
        };
        if self.arity > 0 {
            format!("{base}`{}", self.arity)
        } else {
            base
        }
    }
}

/// A type reference. The sum is closed: every shape the pipeline can
/// meet is one of these, and walks are total.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TypeReference {
    Named(Box<NamedType>),
    Nested {
        declaring: Box<TypeReference>,
        nested_name: String,
    },
    GenericParameter {
        name: String,
        scope: GenericScope,
        position: u16,
    },
    Array {
        element: Box<TypeReference>,
        rank: u8,
    },
    Pointer {
        pointee: Box<TypeReference>,
    },
    ByRef {
        referenced: Box<TypeReference>,
    },
    /// Stands in for a reference the loader could not resolve.
    Placeholder,
}

impl TypeReference {
    #[must_use]
    pub fn named(
        assembly: impl Into<String>,
        namespace: impl Into<String>,
        simple_name: impl Into<String>,
        arity: u16,
        type_arguments: impl IntoIterator<Item = TypeReference>,
    ) -> Self {
        Self::Named(Box::new(NamedType {
            assembly: assembly.into(),
            namespace: namespace.into(),
            simple_name: simple_name.into(),
            arity,
            type_arguments: type_arguments.into_iter().collect(),
        }))
    }

    #[must_use]
    pub fn type_param(name: impl Into<String>, position: u16) -> Self {
        Self::GenericParameter {
            name: name.into(),
            scope: GenericScope::Type,
            position,
        }
    }

    #[must_use]
    pub fn method_param(name: impl Into<String>, position: u16) -> Self {
        Self::GenericParameter {
            name: name.into(),
            scope: GenericScope::Method,
            position,
        }
    }

    #[must_use]
    pub fn array_of(element: TypeReference) -> Self {
        Self::Array {
            element: Box::new(element),
            rank: 1,
        }
    }

    #[must_use]
    pub fn by_ref(referenced: TypeReference) -> Self {
        Self::ByRef {
            referenced: Box::new(referenced),
        }
    }

    /// The open-generic CLR lookup key for the import graph:
    /// `Namespace.Name` or `Namespace.Name`\`Arity`, never the
    /// constructed or assembly-qualified form. Modifier wrappers
    /// (array, pointer, byref) key by their element.
    #[must_use]
    pub fn clr_lookup_key(&self) -> Option<String> {
        match self {
            Self::Named(named) => Some(named.clr_full_name()),
            Self::Nested {
                declaring,
                nested_name,
            } => declaring
                .clr_lookup_key()
                .map(|outer| format!("{outer}+{nested_name}")),
            Self::Array { element, .. } => element.clr_lookup_key(),
            Self::Pointer { pointee } => pointee.clr_lookup_key(),
            Self::ByRef { referenced } => referenced.clr_lookup_key(),
            Self::GenericParameter { .. } | Self::Placeholder => None,
        }
    }

    /// Visit every `NamedType` in this reference, recursing through
    /// constructed generics, nesting, and modifier wrappers.
    pub fn for_each_named(&self, f: &mut impl FnMut(&NamedType)) {
        match self {
            Self::Named(named) => {
                f(named);
                for arg in &named.type_arguments {
                    arg.for_each_named(f);
                }
            }
            Self::Nested { declaring, .. } => declaring.for_each_named(f),
            Self::Array { element, .. } => element.for_each_named(f),
            Self::Pointer { pointee } => pointee.for_each_named(f),
            Self::ByRef { referenced } => referenced.for_each_named(f),
            Self::GenericParameter { .. } | Self::Placeholder => {}
        }
    }

    /// Whether any textual component carries assembly-qualified
    /// residue (`[`, `, Culture=`, `PublicKeyToken=`). The gate rejects
    /// graphs where this returns true for an emitted reference.
    #[must_use]
    pub fn has_assembly_qualified_text(&self) -> bool {
        fn dirty(text: &str) -> bool {
            text.contains('[') || text.contains("Culture=") || text.contains("PublicKeyToken=")
        }
        let mut found = false;
        self.for_each_named(&mut |named| {
            if dirty(&named.namespace) || dirty(&named.simple_name) {
                found = true;
            }
        });
        found
    }

    /// Whether this is the `System.Void` marker (method return
    /// position only).
    #[must_use]
    pub fn is_void(&self) -> bool {
        matches!(self, Self::Named(n) if n.namespace == "System" && n.simple_name == "Void")
    }

    /// Whether this reference (transitively) mentions a generic
    /// parameter, i.e. is an open form.
    #[must_use]
    pub fn mentions_generic_parameter(&self) -> bool {
        match self {
            Self::GenericParameter { .. } => true,
            Self::Named(named) => named
                .type_arguments
                .iter()
                .any(TypeReference::mentions_generic_parameter),
            Self::Nested { declaring, .. } => declaring.mentions_generic_parameter(),
            Self::Array { element, .. } => element.mentions_generic_parameter(),
            Self::Pointer { pointee } => pointee.mentions_generic_parameter(),
            Self::ByRef { referenced } => referenced.mentions_generic_parameter(),
            Self::Placeholder => false,
        }
    }
}

impl fmt::Display for TypeReference {
    /// Canonical textual form. Stable across runs, total on every
    /// variant; this is the form canonical signatures embed.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(named) => {
                write!(f, "{}", named.clr_full_name())?;
                if !named.type_arguments.is_empty() {
                    write!(f, "<")?;
                    for (i, arg) in named.type_arguments.iter().enumerate() {
                        if i > 0 {
                            write!(f, ",")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, ">")?;
                }
                Ok(())
            }
            Self::Nested {
                declaring,
                nested_name,
            } => write!(f, "{declaring}+{nested_name}"),
            Self::GenericParameter {
                name,
                scope,
                position,
            } => match scope {
                GenericScope::Type => write!(f, "!{position}({name})"),
                GenericScope::Method => write!(f, "!!{position}({name})"),
            },
            Self::Array { element, rank } => {
                if *rank <= 1 {
                    write!(f, "{element}[]")
                } else {
                    write!(f, "{element}[{rank}]")
                }
            }
            Self::Pointer { pointee } => write!(f, "{pointee}*"),
            Self::ByRef { referenced } => write!(f, "{referenced}&"),
            Self::Placeholder => write!(f, "?"),
        }
    }
}
