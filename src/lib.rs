//! strictrec - a strict, deterministic record validation engine
//!
//! Validates structured records against a declarative schema in two phases:
//! per-field constraints first (accumulating every defect), then ordered
//! cross-field invariants (failing fast at the first breach).

pub mod schema;
pub mod validate;
