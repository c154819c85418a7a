//! Two-phase validation pipeline.
//!
//! Per record: FieldChecking, then InvariantChecking, then Accepted or
//! Rejected. Any field error moves straight to Rejected without entering the
//! invariant phase, so a returned error never interleaves the two layers.

use serde_json::Value;
use thiserror::Error;

use super::errors::{ValidationError, Violation};
use super::fields;
use super::invariants;
use super::value::ValidatedRecord;
use crate::schema::{RecordSchema, SchemaRegistry};

/// Validates one candidate against one schema.
///
/// Returns the fully-typed record, or the ordered violation list: every
/// field violation in schema-declaration order if any field failed, else at
/// most one invariant violation (fail-fast).
pub fn validate(schema: &RecordSchema, candidate: &Value) -> Result<ValidatedRecord, ValidationError> {
    let mut violations = Vec::new();
    match validate_at(schema, candidate, "", &mut violations) {
        Some(record) => Ok(record),
        None => Err(ValidationError::new(violations)),
    }
}

/// Runs the full pipeline for one (possibly nested) record, appending
/// violations with paths rooted at `path_prefix`.
///
/// Returns `None` whenever any violation was appended; nested callers use
/// this to withhold their own invariant phase.
pub(crate) fn validate_at(
    schema: &RecordSchema,
    candidate: &Value,
    path_prefix: &str,
    out: &mut Vec<Violation>,
) -> Option<ValidatedRecord> {
    let before = out.len();

    let field_map = fields::check_fields(schema, candidate, path_prefix, out)?;
    if out.len() > before {
        // Field errors exist: invariants never run.
        return None;
    }

    let record = ValidatedRecord::new(schema.name.clone(), field_map);
    if let Some(violation) = invariants::check_invariants(schema, &record, path_prefix) {
        out.push(violation);
        return None;
    }

    Some(record)
}

/// Error from registry-backed validation.
#[derive(Debug, Error)]
pub enum ValidateError {
    /// Schema name not registered
    #[error("schema '{0}' not found")]
    UnknownSchema(String),
    /// Candidate rejected by the engine
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Validator backed by a schema registry.
///
/// Resolves record kind names before running the engine; holds the registry
/// by shared reference, so independent candidates may validate in parallel.
pub struct Validator<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> Validator<'a> {
    /// Creates a validator backed by the given registry.
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Validates a candidate against the named schema.
    pub fn validate(
        &self,
        schema_name: &str,
        candidate: &Value,
    ) -> Result<ValidatedRecord, ValidateError> {
        let schema = self
            .registry
            .get(schema_name)
            .ok_or_else(|| ValidateError::UnknownSchema(schema_name.to_string()))?;
        Ok(validate(schema, candidate)?)
    }
}
