//! Naming authority and name reservation.
//!
//! Every identifier that reaches the output goes through the `Renamer`:
//! one chokepoint, one decision record per `(stable id, scope)` pair.
//! The reservation pass walks the shaped graph in a fixed order and
//! assigns final names everywhere the emission plan will need them.

pub mod renamer;
pub use renamer::{Decision, NamingError, Renamer, ReserveReason, ReserveSource};

pub mod reserve;
pub use reserve::reserve_names;
