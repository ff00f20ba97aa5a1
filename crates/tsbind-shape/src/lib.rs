//! Shape passes - lowering the CLR surface into the target structural
//! type system.
//!
//! Each pass takes an immutable graph and yields a new one; anomalies
//! become diagnostics, never aborts. The fixed pass order lives in
//! `passes::run_shape_passes`; the post-reservation overload unifier in
//! `unify`.

pub mod context;
pub use context::PassContext;

pub mod relate;
pub use relate::{is_assignable, method_assignable, property_assignable, ErasedShape};

pub mod substitute;
pub use substitute::substitute;

pub mod passes;
pub use passes::run_shape_passes;

pub mod unify;
pub use unify::unify_overloads;
