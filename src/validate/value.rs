//! Typed values produced by successful validation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One converted field value.
///
/// Conversion is strict: ints are never coerced from floats, floats accept
/// integer JSON numbers, timestamps come from RFC 3339 strings only.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Timestamp(DateTime<Utc>),
    /// Enum variant name, already checked against the declared set
    Enum(String),
    Record(ValidatedRecord),
    List(Vec<ValidatedRecord>),
}

impl FieldValue {
    /// Returns the kind name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Str(_) => "string",
            FieldValue::Int(_) => "int",
            FieldValue::Float(_) => "float",
            FieldValue::Bool(_) => "bool",
            FieldValue::Timestamp(_) => "timestamp",
            FieldValue::Enum(_) => "enum",
            FieldValue::Record(_) => "record",
            FieldValue::List(_) => "list",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            FieldValue::Float(x) => Some(*x),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Timestamp(t) => Some(*t),
            _ => None,
        }
    }

    /// Variant name of an enum value
    pub fn as_enum(&self) -> Option<&str> {
        match self {
            FieldValue::Enum(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&ValidatedRecord> {
        match self {
            FieldValue::Record(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ValidatedRecord]> {
        match self {
            FieldValue::List(l) => Some(l),
            _ => None,
        }
    }
}

/// Output of successful validation.
///
/// Guaranteed to satisfy every field constraint and invariant rule of its
/// schema at the moment of construction; immutable afterwards, nothing is
/// re-checked on read. Optional fields that were absent from the candidate
/// are absent from the map. Iteration order is field-name order.
#[derive(Debug, Clone, Serialize)]
pub struct ValidatedRecord {
    schema: String,
    fields: BTreeMap<String, FieldValue>,
}

impl ValidatedRecord {
    pub(crate) fn new(schema: String, fields: BTreeMap<String, FieldValue>) -> Self {
        Self { schema, fields }
    }

    /// Name of the schema this record was validated against
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// Looks up a field value.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// Whether the (possibly optional) field is present.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Number of present fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates (name, value) pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    // Typed accessors for invariant rule code. Field constraints are already
    // enforced, so rules may rely on required fields being present and typed.

    pub fn str_field(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_str)
    }

    pub fn int_field(&self, field: &str) -> Option<i64> {
        self.get(field).and_then(FieldValue::as_int)
    }

    pub fn float_field(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_float)
    }

    pub fn bool_field(&self, field: &str) -> Option<bool> {
        self.get(field).and_then(FieldValue::as_bool)
    }

    pub fn timestamp_field(&self, field: &str) -> Option<DateTime<Utc>> {
        self.get(field).and_then(FieldValue::as_timestamp)
    }

    pub fn enum_field(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_enum)
    }

    pub fn record_field(&self, field: &str) -> Option<&ValidatedRecord> {
        self.get(field).and_then(FieldValue::as_record)
    }

    pub fn list_field(&self, field: &str) -> Option<&[ValidatedRecord]> {
        self.get(field).and_then(FieldValue::as_list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> ValidatedRecord {
        let mut fields = BTreeMap::new();
        fields.insert("name".to_string(), FieldValue::Str("Ares".into()));
        fields.insert("crew_size".to_string(), FieldValue::Int(6));
        fields.insert("power_level".to_string(), FieldValue::Float(85.5));
        fields.insert("operational".to_string(), FieldValue::Bool(true));
        fields.insert("rank".to_string(), FieldValue::Enum("commander".into()));
        ValidatedRecord::new("station".into(), fields)
    }

    #[test]
    fn test_typed_accessors() {
        let record = sample_record();
        assert_eq!(record.str_field("name"), Some("Ares"));
        assert_eq!(record.int_field("crew_size"), Some(6));
        assert_eq!(record.float_field("power_level"), Some(85.5));
        assert_eq!(record.bool_field("operational"), Some(true));
        assert_eq!(record.enum_field("rank"), Some("commander"));
    }

    #[test]
    fn test_accessors_do_not_coerce() {
        let record = sample_record();
        // crew_size is an int, not a float
        assert_eq!(record.float_field("crew_size"), None);
        assert_eq!(record.str_field("crew_size"), None);
    }

    #[test]
    fn test_absent_field() {
        let record = sample_record();
        assert!(!record.contains("notes"));
        assert!(record.get("notes").is_none());
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let record = sample_record();
        let names: Vec<&str> = record.iter().map(|(k, _)| k).collect();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(FieldValue::Int(1).type_name(), "int");
        assert_eq!(FieldValue::Str("x".into()).type_name(), "string");
        assert_eq!(FieldValue::List(Vec::new()).type_name(), "list");
    }
}
