//! Common types and utilities for the tsbindgen binding generator.
//!
//! This crate provides foundational types used across all tsbind crates:
//! - String interning (`Atom`, `Interner`)
//! - Diagnostics (`Diagnostic`, `DiagnosticBag`, `RunSummary`)
//! - Policy knobs (`Policy` and its per-area sub-policies)
//! - Reserved-identifier sanitization for the target type system
//! - Centralized limits and thresholds

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Diagnostics - coded, counted, severity-tagged
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticBag, DiagnosticCode, DiagnosticSite, RunSummary, Severity,
};

// Policy knobs recognized by the pipeline
pub mod policy;
pub use policy::{
    ClassPolicy, ConstraintMerge, ConstraintPolicy, DiamondPolicy, EmissionPolicy,
    ExplicitImplMode, IndexerPolicy, InterfacePolicy, ModulesPolicy, NameTransform, Policy,
    RenamingPolicy, StaticConflictStrategy, StaticSideAction, StaticSidePolicy,
};

// Reserved-word handling for emitted identifiers
pub mod identifiers;
pub use identifiers::{is_reserved, sanitize_identifier};

// Centralized limits and thresholds
pub mod limits;
