//! Schema subsystem for strictrec
//!
//! Schemas are declarative, first-class artifacts: one `RecordSchema` per
//! record kind, holding an ordered list of field constraints and an ordered
//! list of invariant rules.
//!
//! # Design Principles
//!
//! - Schemas are immutable once registered
//! - Field order is declaration order (no hash iteration anywhere)
//! - Enumerated fields are closed sets declared up front
//! - Validation is deterministic

mod errors;
mod registry;
mod types;

pub use errors::{SchemaError, SchemaResult};
pub use registry::SchemaRegistry;
pub use types::{FieldSpec, FieldType, RecordSchema};
