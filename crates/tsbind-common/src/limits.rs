//! Centralized limits and thresholds.
//!
//! These are backstops against malformed input, not tuning knobs; the
//! pipeline reports a diagnostic rather than looping when one is hit.

/// Upper bound on numeric-suffix probing during name reservation.
pub const MAX_SUFFIX_ATTEMPTS: usize = 10_000;

/// Upper bound on base-interface BFS while inlining interface closures.
pub const MAX_INTERFACE_CLOSURE: usize = 10_000;

/// Recursion cap for constraint-closure resolution.
pub const MAX_CONSTRAINT_DEPTH: usize = 64;

/// Recursion cap for type-reference walks (nested generics, arrays).
pub const MAX_TYPEREF_DEPTH: usize = 128;
