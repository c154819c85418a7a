//! Record Invariant Layer.
//!
//! Invariant rules are named predicates over a fully field-valid record.
//! They run in declaration order and fail fast: the first breach aborts the
//! pass, so a record-level rejection carries exactly one invariant violation.

use super::errors::Violation;
use super::fields::make_path;
use super::value::ValidatedRecord;
use crate::schema::RecordSchema;

/// A breached invariant, before it is tagged with the rule name.
///
/// `field` names the offending field (or list element, e.g. `crew[1]`) when
/// the rule can point at one; whole-record breaches leave it unset.
#[derive(Debug, Clone)]
pub struct InvariantBreach {
    /// Offending field path relative to the record, if any
    pub field: Option<String>,
    /// Human-readable reason
    pub message: String,
}

impl InvariantBreach {
    /// Whole-record breach with no single offending field.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }

    /// Breach pinned to a specific field or element path.
    pub fn at(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.into()),
            message: message.into(),
        }
    }
}

/// A named cross-field business predicate.
///
/// Rules are pure functions of the record's field values. They run only
/// after every field constraint passed, so implementations may rely on
/// required fields being present and correctly typed. Schemas hold rules as
/// `Arc<dyn InvariantRule>`, shared read-only across concurrent validations.
pub trait InvariantRule: Send + Sync {
    /// Stable rule identifier, surfaced in violations
    fn name(&self) -> &str;

    /// Checks the rule against a field-valid record.
    fn check(&self, record: &ValidatedRecord) -> Result<(), InvariantBreach>;
}

/// Runs the schema's invariant rules in order, stopping at the first breach.
pub(crate) fn check_invariants(
    schema: &RecordSchema,
    record: &ValidatedRecord,
    path_prefix: &str,
) -> Option<Violation> {
    for rule in schema.invariants() {
        if let Err(breach) = rule.check(record) {
            let field = match breach.field {
                Some(f) => make_path(path_prefix, &f),
                None => path_prefix.to_string(),
            };
            return Some(Violation::invariant(field, rule.name(), breach.message));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldSpec, FieldType, RecordSchema};
    use crate::validate::rules::Predicate;
    use crate::validate::ViolationKind;
    use serde_json::json;

    fn schema_with_two_failing_rules() -> RecordSchema {
        RecordSchema::new(
            "r",
            vec![FieldSpec::required("n", FieldType::int(0, 100))],
        )
        .with_invariant(Predicate::new("first_rule", |_| {
            Err("first rule breached".to_string())
        }))
        .with_invariant(Predicate::new("second_rule", |_| {
            Err("second rule breached".to_string())
        }))
    }

    #[test]
    fn test_fail_fast_reports_only_first_rule() {
        let schema = schema_with_two_failing_rules();
        let err = schema.validate(&json!({ "n": 5 })).unwrap_err();

        assert_eq!(err.len(), 1);
        let v = err.first();
        assert_eq!(v.kind, ViolationKind::InvariantViolation);
        assert_eq!(v.rule, "first_rule");
        assert!(v.message.contains("first rule breached"));
    }

    #[test]
    fn test_rules_run_in_declaration_order() {
        let schema = RecordSchema::new(
            "r",
            vec![FieldSpec::required("n", FieldType::int(0, 100))],
        )
        .with_invariant(Predicate::new("passes", |_| Ok(())))
        .with_invariant(Predicate::new("breaks", |_| Err("nope".to_string())));

        let err = schema.validate(&json!({ "n": 5 })).unwrap_err();
        assert_eq!(err.first().rule, "breaks");
    }

    #[test]
    fn test_breach_field_path_is_prefixed() {
        let breach = InvariantBreach::at("crew[1]", "inactive member");
        assert_eq!(breach.field.as_deref(), Some("crew[1]"));

        let whole = InvariantBreach::new("no commander");
        assert!(whole.field.is_none());
    }
}
