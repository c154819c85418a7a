//! The error contract: ordered violation lists.
//!
//! A failed validation returns a [`ValidationError`] holding every field
//! violation in schema-declaration order, or exactly one invariant violation.
//! Field violations always precede invariant violations; callers that only
//! want the first actionable defect use [`ValidationError::first`].

use std::fmt;

use serde::Serialize;

/// Kind of a reported defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Required field absent (or null)
    MissingField,
    /// Value does not convert to the declared field kind
    TypeMismatch,
    /// Numeric value outside its inclusive bounds
    OutOfRange,
    /// String or list length outside its inclusive bounds
    LengthViolation,
    /// Value is not one of the declared enum variants
    InvalidEnumValue,
    /// Candidate carries a field the schema does not declare
    UnknownField,
    /// A record-level business rule was breached
    InvariantViolation,
}

impl ViolationKind {
    /// Returns the stable string code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::MissingField => "MISSING_FIELD",
            ViolationKind::TypeMismatch => "TYPE_MISMATCH",
            ViolationKind::OutOfRange => "OUT_OF_RANGE",
            ViolationKind::LengthViolation => "LENGTH_VIOLATION",
            ViolationKind::InvalidEnumValue => "INVALID_ENUM_VALUE",
            ViolationKind::UnknownField => "UNKNOWN_FIELD",
            ViolationKind::InvariantViolation => "INVARIANT_VIOLATION",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One reported defect.
///
/// `rule` is the kind code for field-level violations, and the invariant's
/// declared name for invariant-level ones.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    /// Dotted/indexed field path (e.g. "crew[1].age"); empty for
    /// whole-record invariant breaches with no single offending field
    pub field: String,
    /// Rule identifier
    pub rule: String,
    /// Defect kind
    pub kind: ViolationKind,
    /// Human-readable reason
    pub message: String,
}

impl Violation {
    fn field_level(field: impl Into<String>, kind: ViolationKind, message: String) -> Self {
        Self {
            field: field.into(),
            rule: kind.code().to_string(),
            kind,
            message,
        }
    }

    pub(crate) fn missing_field(field: impl Into<String>) -> Self {
        Self::field_level(
            field,
            ViolationKind::MissingField,
            "required field is missing".into(),
        )
    }

    pub(crate) fn null_field(field: impl Into<String>) -> Self {
        Self::field_level(
            field,
            ViolationKind::MissingField,
            "required field is null".into(),
        )
    }

    pub(crate) fn type_mismatch(field: impl Into<String>, expected: &str, actual: &str) -> Self {
        Self::field_level(
            field,
            ViolationKind::TypeMismatch,
            format!("expected {}, got {}", expected, actual),
        )
    }

    pub(crate) fn out_of_range(field: impl Into<String>, value: &str, bounds: &str) -> Self {
        Self::field_level(
            field,
            ViolationKind::OutOfRange,
            format!("value {} outside range {}", value, bounds),
        )
    }

    pub(crate) fn length(field: impl Into<String>, what: &str, len: usize, bounds: &str) -> Self {
        Self::field_level(
            field,
            ViolationKind::LengthViolation,
            format!("{} length {} outside range {}", what, len, bounds),
        )
    }

    pub(crate) fn invalid_enum(field: impl Into<String>, value: &str, variants: &[String]) -> Self {
        Self::field_level(
            field,
            ViolationKind::InvalidEnumValue,
            format!("'{}' is not one of [{}]", value, variants.join(", ")),
        )
    }

    pub(crate) fn unknown_field(field: impl Into<String>) -> Self {
        Self::field_level(
            field,
            ViolationKind::UnknownField,
            "field is not declared in the schema".into(),
        )
    }

    pub(crate) fn invariant(
        field: impl Into<String>,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            rule: rule.into(),
            kind: ViolationKind::InvariantViolation,
            message: message.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            write!(f, "[{}] {}", self.rule, self.message)
        } else {
            write!(f, "[{}] field '{}': {}", self.rule, self.field, self.message)
        }
    }
}

/// Ordered, non-empty list of violations for one rejected candidate.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    violations: Vec<Violation>,
}

impl ValidationError {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        debug_assert!(!violations.is_empty());
        Self { violations }
    }

    /// The first actionable defect, per the terse-caller convention.
    pub fn first(&self) -> &Violation {
        &self.violations[0]
    }

    /// The full ordered violation list.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Consumes the error, yielding the violation list.
    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }

    /// Number of violations (always at least one).
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Always false; present to satisfy the len/is_empty convention.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: {}", self.first())?;
        if self.violations.len() > 1 {
            write!(f, " (and {} more)", self.violations.len() - 1)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
