//! Field Constraint Layer.
//!
//! Checks every field of a candidate in schema-declaration order and
//! accumulates ALL field violations (no short-circuit within this layer).
//! Nested records and list elements run the full two-phase pipeline, so a
//! parent's invariant code may trust each child's own constraints.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde_json::Value;

use super::engine::validate_at;
use super::errors::Violation;
use super::value::FieldValue;
use crate::schema::{FieldType, RecordSchema};

/// Joins a path prefix and a field name with a dot.
pub(crate) fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

/// Returns the JSON type name for error messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "int"
            } else {
                "float"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "record",
    }
}

fn bounds_string<T: std::fmt::Display>(min: Option<T>, max: Option<T>) -> String {
    let lo = min.map_or("..".to_string(), |v| v.to_string());
    let hi = max.map_or("..".to_string(), |v| v.to_string());
    format!("[{}, {}]", lo, hi)
}

/// Checks all fields of `candidate` against `schema`, pushing every field
/// violation onto `out` in schema-declaration order.
///
/// Returns the converted field map, partial if violations were pushed, or
/// `None` when the candidate is not an object at all. Callers gate on `out`
/// growth before using the map.
pub(crate) fn check_fields(
    schema: &RecordSchema,
    candidate: &Value,
    path_prefix: &str,
    out: &mut Vec<Violation>,
) -> Option<BTreeMap<String, FieldValue>> {
    let obj = match candidate.as_object() {
        Some(obj) => obj,
        None => {
            let path = if path_prefix.is_empty() {
                "$root"
            } else {
                path_prefix
            };
            out.push(Violation::type_mismatch(
                path,
                "record",
                json_type_name(candidate),
            ));
            return None;
        }
    };

    let mut fields = BTreeMap::new();

    for spec in &schema.fields {
        let path = make_path(path_prefix, &spec.name);

        match obj.get(&spec.name) {
            None => {
                if spec.required {
                    out.push(Violation::missing_field(path));
                }
            }
            Some(Value::Null) => {
                // Null counts as absent; only required fields complain.
                if spec.required {
                    out.push(Violation::null_field(path));
                }
            }
            Some(value) => {
                if let Some(converted) = convert_value(&spec.field_type, value, &path, out) {
                    fields.insert(spec.name.clone(), converted);
                }
            }
        }
    }

    // No undeclared fields. Candidate key order is caller-controlled, so
    // sort for a deterministic violation order.
    let mut unknown: Vec<&String> = obj
        .keys()
        .filter(|k| schema.field(k).is_none())
        .collect();
    unknown.sort_unstable();
    for key in unknown {
        out.push(Violation::unknown_field(make_path(path_prefix, key)));
    }

    Some(fields)
}

/// Converts one value to its declared kind and applies kind constraints.
///
/// Pushes violations onto `out`; returns the converted value only when the
/// value is defect-free.
fn convert_value(
    field_type: &FieldType,
    value: &Value,
    path: &str,
    out: &mut Vec<Violation>,
) -> Option<FieldValue> {
    match field_type {
        FieldType::String { min_len, max_len } => {
            let s = match value.as_str() {
                Some(s) => s,
                None => {
                    out.push(Violation::type_mismatch(path, "string", json_type_name(value)));
                    return None;
                }
            };
            let len = s.chars().count();
            if min_len.map_or(false, |lo| len < lo) || max_len.map_or(false, |hi| len > hi) {
                out.push(Violation::length(
                    path,
                    "string",
                    len,
                    &bounds_string(*min_len, *max_len),
                ));
                return None;
            }
            Some(FieldValue::Str(s.to_string()))
        }
        FieldType::Int { min, max } => {
            // Exact: floats are never accepted as ints.
            let n = match value.as_i64() {
                Some(n) => n,
                None => {
                    out.push(Violation::type_mismatch(path, "int", json_type_name(value)));
                    return None;
                }
            };
            if min.map_or(false, |lo| n < lo) || max.map_or(false, |hi| n > hi) {
                out.push(Violation::out_of_range(
                    path,
                    &n.to_string(),
                    &bounds_string(*min, *max),
                ));
                return None;
            }
            Some(FieldValue::Int(n))
        }
        FieldType::Float { min, max } => {
            // Integer JSON numbers are acceptable floats.
            let x = match value.as_f64() {
                Some(x) => x,
                None => {
                    out.push(Violation::type_mismatch(path, "float", json_type_name(value)));
                    return None;
                }
            };
            if min.map_or(false, |lo| x < lo) || max.map_or(false, |hi| x > hi) {
                out.push(Violation::out_of_range(
                    path,
                    &x.to_string(),
                    &bounds_string(*min, *max),
                ));
                return None;
            }
            Some(FieldValue::Float(x))
        }
        FieldType::Bool => match value.as_bool() {
            Some(b) => Some(FieldValue::Bool(b)),
            None => {
                out.push(Violation::type_mismatch(path, "bool", json_type_name(value)));
                None
            }
        },
        FieldType::Timestamp => {
            let s = match value.as_str() {
                Some(s) => s,
                None => {
                    out.push(Violation::type_mismatch(path, "timestamp", json_type_name(value)));
                    return None;
                }
            };
            match DateTime::parse_from_rfc3339(s) {
                Ok(t) => Some(FieldValue::Timestamp(t.with_timezone(&Utc))),
                Err(_) => {
                    out.push(Violation::type_mismatch(
                        path,
                        "RFC 3339 timestamp",
                        "unparseable string",
                    ));
                    None
                }
            }
        }
        FieldType::Enum { variants } => {
            let s = match value.as_str() {
                Some(s) => s,
                None => {
                    out.push(Violation::type_mismatch(path, "enum", json_type_name(value)));
                    return None;
                }
            };
            if !variants.iter().any(|v| v == s) {
                out.push(Violation::invalid_enum(path, s, variants));
                return None;
            }
            Some(FieldValue::Enum(s.to_string()))
        }
        FieldType::Record { schema } => {
            validate_at(schema, value, path, out).map(FieldValue::Record)
        }
        FieldType::List {
            schema,
            min_len,
            max_len,
        } => {
            let arr = match value.as_array() {
                Some(arr) => arr,
                None => {
                    out.push(Violation::type_mismatch(path, "list", json_type_name(value)));
                    return None;
                }
            };

            let mut size_ok = true;
            if min_len.map_or(false, |lo| arr.len() < lo)
                || max_len.map_or(false, |hi| arr.len() > hi)
            {
                out.push(Violation::length(
                    path,
                    "list",
                    arr.len(),
                    &bounds_string(*min_len, *max_len),
                ));
                size_ok = false;
            }

            // Every element is scanned even after a failure, so the caller
            // sees the complete defect list for the whole collection.
            let mut elements = Vec::with_capacity(arr.len());
            let mut all_ok = size_ok;
            for (i, elem) in arr.iter().enumerate() {
                let elem_path = format!("{}[{}]", path, i);
                match validate_at(schema, elem, &elem_path, out) {
                    Some(record) => elements.push(record),
                    None => all_ok = false,
                }
            }

            if all_ok {
                Some(FieldValue::List(elements))
            } else {
                None
            }
        }
    }
}
