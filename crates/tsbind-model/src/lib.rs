//! Symbol graph data model for the tsbindgen binding generator.
//!
//! Everything here is a value object: passes produce new graphs rather
//! than mutating shared state, and all cross-references between
//! entities go through stable ids (never pointers into the tree), so a
//! graph can be cloned, diffed, and serialized freely.

// Stable identities that survive every transformation
pub mod ids;
pub use ids::{stable_id_for, MemberStableId, StableId, TypeStableId};

// Reservation scopes and their string keys
pub mod scope;
pub use scope::{Scope, Side, Visibility};

// The closed type-reference sum type
pub mod typeref;
pub use typeref::{GenericScope, NamedType, TypeReference};

// Type symbols, generic parameters, explicit views
pub mod types;
pub use types::{
    ExplicitView, GenericParam, SpecialConstraints, TypeFlags, TypeKind, TypeSymbol, Variance,
};

// Member symbols (methods, properties, fields, events, constructors)
pub mod members;
pub use members::{
    ConstructorSymbol, EmitScope, EventSymbol, FieldSymbol, MemberFlags, MemberVisibility,
    MethodSymbol, Parameter, ParameterKind, PropertySymbol, Provenance,
};

// The graph itself plus its lazily-built indices
pub mod graph;
pub use graph::{GraphIndices, NamespaceSymbol, SymbolGraph};

// Canonical signature forms for dedup and overload grouping
pub mod signature;

// Fluent fixture builders standing in for the reflection loader
pub mod build;
