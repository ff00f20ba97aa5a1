//! Planning: cross-module imports, relative paths, emission order.
//!
//! Planners read the reserved graph and produce plain data - no side
//! effects. The printer (outside this workspace) consumes the
//! `EmissionPlan` and never walks the graph freely, which is what
//! makes the output byte-stable.

pub mod import_graph;
pub use import_graph::{build_import_graph, CrossRef, ImportGraph, ReferenceKind};

pub mod paths;
pub use paths::{module_specifier, namespace_directory};

pub mod imports;
pub use imports::{build_import_plan, ExportEntry, ImportPlan, ImportStatement, ImportedType, NamespaceImports};

pub mod order;
pub use order::{plan_emission_order, EmitOrder, NamespaceOrder, TypeOrderEntry};

pub mod audit;
pub use audit::audit_constraints;

pub mod emission;
pub use emission::{
    binding_entries, member_metadata, BindingEntry, DeclarationPrinter, EmissionPlan,
    MemberMetadata,
};
