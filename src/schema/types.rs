//! Schema type definitions.
//!
//! Supported field kinds:
//! - string: UTF-8 string with optional length bounds
//! - int: 64-bit signed integer with optional range bounds
//! - float: 64-bit floating point with optional range bounds
//! - bool: Boolean
//! - timestamp: RFC 3339 timestamp string
//! - enum: closed set of declared string variants
//! - record: nested record with its own full schema
//! - list: homogeneous list of nested records

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::validate::{self, InvariantRule, ValidatedRecord, ValidationError};

/// Supported field kinds and their per-field constraints.
///
/// Bounds are inclusive. `None` means unbounded on that side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FieldType {
    /// UTF-8 string with optional length bounds (in characters)
    String {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_len: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_len: Option<usize>,
    },
    /// 64-bit signed integer with optional range bounds
    Int {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<i64>,
    },
    /// 64-bit floating point with optional range bounds
    Float {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    /// Boolean
    Bool,
    /// RFC 3339 timestamp string
    Timestamp,
    /// Closed set of permitted string variants
    Enum {
        /// Declared variants, in declaration order
        variants: Vec<String>,
    },
    /// Nested record validated against its own full schema
    Record {
        /// Sub-schema (boxed to allow recursion)
        schema: Box<RecordSchema>,
    },
    /// Homogeneous list of nested records
    List {
        /// Element sub-schema
        schema: Box<RecordSchema>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_len: Option<usize>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max_len: Option<usize>,
    },
}

impl FieldType {
    /// Returns the kind name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldType::String { .. } => "string",
            FieldType::Int { .. } => "int",
            FieldType::Float { .. } => "float",
            FieldType::Bool => "bool",
            FieldType::Timestamp => "timestamp",
            FieldType::Enum { .. } => "enum",
            FieldType::Record { .. } => "record",
            FieldType::List { .. } => "list",
        }
    }

    /// String with inclusive length bounds
    pub fn string(min_len: usize, max_len: usize) -> Self {
        FieldType::String {
            min_len: Some(min_len),
            max_len: Some(max_len),
        }
    }

    /// String with only an upper length bound
    pub fn string_max(max_len: usize) -> Self {
        FieldType::String {
            min_len: None,
            max_len: Some(max_len),
        }
    }

    /// Integer with inclusive range bounds
    pub fn int(min: i64, max: i64) -> Self {
        FieldType::Int {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Float with inclusive range bounds
    pub fn float(min: f64, max: f64) -> Self {
        FieldType::Float {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Enum over the given variants
    pub fn enumeration(variants: &[&str]) -> Self {
        FieldType::Enum {
            variants: variants.iter().map(|v| (*v).to_string()).collect(),
        }
    }

    /// Nested record field
    pub fn record(schema: RecordSchema) -> Self {
        FieldType::Record {
            schema: Box::new(schema),
        }
    }

    /// List of nested records with inclusive size bounds
    pub fn list(schema: RecordSchema, min_len: usize, max_len: usize) -> Self {
        FieldType::List {
            schema: Box::new(schema),
            min_len: Some(min_len),
            max_len: Some(max_len),
        }
    }
}

/// Declarative constraint description for one field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Field name as it appears in candidate records
    pub name: String,
    /// Whether the field must be present (null counts as absent)
    pub required: bool,
    /// Field kind and its constraints
    #[serde(flatten)]
    pub field_type: FieldType,
}

impl FieldSpec {
    /// Create a required field
    pub fn required(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            required: true,
            field_type,
        }
    }

    /// Create an optional field
    pub fn optional(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            required: false,
            field_type,
        }
    }
}

/// Full constraint and invariant set for one record kind.
///
/// Fields and invariants are both evaluated in declaration order. A schema
/// is immutable once registered; invariant rules are code, attached via
/// [`RecordSchema::with_invariant`] (they are skipped by serde, since a
/// schema file can only carry the declarative field constraints).
#[derive(Clone, Serialize, Deserialize)]
pub struct RecordSchema {
    /// Record kind name (e.g. "station", "mission")
    pub name: String,
    /// Ordered field constraint list
    pub fields: Vec<FieldSpec>,
    #[serde(skip)]
    invariants: Vec<Arc<dyn InvariantRule>>,
}

impl RecordSchema {
    /// Create a schema with the given ordered fields and no invariants.
    pub fn new(name: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            name: name.into(),
            fields,
            invariants: Vec::new(),
        }
    }

    /// Append an invariant rule. Rules run in the order they are attached.
    #[must_use]
    pub fn with_invariant(mut self, rule: impl InvariantRule + 'static) -> Self {
        self.invariants.push(Arc::new(rule));
        self
    }

    /// Append a pre-wrapped invariant rule.
    pub fn push_invariant(&mut self, rule: Arc<dyn InvariantRule>) {
        self.invariants.push(rule);
    }

    /// Ordered invariant rules for this record kind.
    pub fn invariants(&self) -> &[Arc<dyn InvariantRule>] {
        &self.invariants
    }

    /// Looks up a field spec by name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validates a candidate against this schema.
    ///
    /// Runs the full two-phase pipeline: all field constraints (accumulating
    /// every field defect), then invariant rules in order (failing fast).
    pub fn validate(&self, candidate: &Value) -> Result<ValidatedRecord, ValidationError> {
        validate::validate(self, candidate)
    }

    /// Validates the schema definition itself (not a candidate record).
    ///
    /// Checks duplicate field names, empty enum variant sets, inverted
    /// bounds, and empty invariant names, recursing into nested schemas.
    pub fn validate_structure(&self) -> Result<(), String> {
        for (i, spec) in self.fields.iter().enumerate() {
            if spec.name.is_empty() {
                return Err(format!("field #{} has an empty name", i));
            }
            if self.fields[..i].iter().any(|f| f.name == spec.name) {
                return Err(format!("duplicate field '{}'", spec.name));
            }
            check_field_type(&spec.name, &spec.field_type)?;
        }

        for rule in &self.invariants {
            if rule.name().is_empty() {
                return Err("invariant rule has an empty name".into());
            }
        }

        Ok(())
    }
}

fn check_field_type(field: &str, field_type: &FieldType) -> Result<(), String> {
    match field_type {
        FieldType::String { min_len, max_len } => {
            check_bounds(field, *min_len, *max_len)?;
        }
        FieldType::Int { min, max } => {
            check_bounds(field, *min, *max)?;
        }
        FieldType::Float { min, max } => {
            check_bounds(field, *min, *max)?;
        }
        FieldType::Bool | FieldType::Timestamp => {}
        FieldType::Enum { variants } => {
            if variants.is_empty() {
                return Err(format!("enum field '{}' declares no variants", field));
            }
            for (i, v) in variants.iter().enumerate() {
                if variants[..i].contains(v) {
                    return Err(format!("enum field '{}' repeats variant '{}'", field, v));
                }
            }
        }
        FieldType::Record { schema } => {
            schema
                .validate_structure()
                .map_err(|e| format!("nested record '{}': {}", field, e))?;
        }
        FieldType::List {
            schema,
            min_len,
            max_len,
        } => {
            check_bounds(field, *min_len, *max_len)?;
            schema
                .validate_structure()
                .map_err(|e| format!("list field '{}': {}", field, e))?;
        }
    }
    Ok(())
}

fn check_bounds<T: PartialOrd>(field: &str, min: Option<T>, max: Option<T>) -> Result<(), String> {
    if let (Some(lo), Some(hi)) = (min, max) {
        if lo > hi {
            return Err(format!("field '{}' has min bound above max", field));
        }
    }
    Ok(())
}

impl fmt::Debug for RecordSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordSchema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field(
                "invariants",
                &self.invariants.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
