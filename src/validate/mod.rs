//! Validation engine for strictrec
//!
//! Two composing layers:
//!
//! - Field Constraint Layer: checks every field of a candidate in
//!   schema-declaration order, accumulating ALL field violations.
//! - Record Invariant Layer: runs only once every field passed, evaluating
//!   invariant rules in order and failing fast at the first breach.
//!
//! The asymmetry is deliberate: field errors are independent and cheap to
//! report exhaustively; invariant rules may implicitly depend on earlier
//! rules having already rejected malformed states.
//!
//! Validation is a pure, stateless function of the candidate and schema.
//! Re-running it on the same inputs yields a byte-identical violation list.

mod engine;
mod errors;
mod fields;
mod invariants;
pub mod rules;
mod value;

pub use engine::{validate, ValidateError, Validator};
pub use errors::{ValidationError, Violation, ViolationKind};
pub use invariants::{InvariantBreach, InvariantRule};
pub use value::{FieldValue, ValidatedRecord};
