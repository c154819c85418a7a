//! Schema registry and definition errors.

use thiserror::Error;

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;

/// Errors raised while defining, registering, or loading schemas.
///
/// These are distinct from [`crate::validate::ValidationError`]: a
/// `SchemaError` means the schema itself (or the registry call) is wrong,
/// never that a candidate record failed validation.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Schema name not found in the registry
    #[error("schema '{0}' not found")]
    UnknownSchema(String),

    /// Attempt to register a schema name twice (schemas are immutable)
    #[error("schema '{0}' is already registered")]
    SchemaExists(String),

    /// Schema file could not be read or parsed
    #[error("malformed schema file '{path}': {reason}")]
    MalformedSchema { path: String, reason: String },

    /// Schema definition fails its structural self-check
    #[error("invalid schema '{schema}': {reason}")]
    InvalidStructure { schema: String, reason: String },
}
