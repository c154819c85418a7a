//! Reusable invariant rule shapes.
//!
//! Business rules that were inline conditionals in ad hoc validation code
//! become named rule objects here, so a record kind gains new invariants by
//! appending to its schema's rule list, never by touching the engine loop.
//!
//! Each shape is generic over field names and element predicates; schemas
//! compose them (see the mission schema in the integration tests) or fall
//! back to [`Predicate`] for one-off conditions.

use super::invariants::{InvariantBreach, InvariantRule};
use super::value::ValidatedRecord;

type ElementPredicate = Box<dyn Fn(&ValidatedRecord) -> bool + Send + Sync>;
type RecordPredicate = Box<dyn Fn(&ValidatedRecord) -> bool + Send + Sync>;

/// A string identifier field must begin with a declared prefix token.
pub struct IdPrefix {
    name: String,
    field: String,
    prefix: String,
}

impl IdPrefix {
    pub fn new(
        name: impl Into<String>,
        field: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            field: field.into(),
            prefix: prefix.into(),
        }
    }
}

impl InvariantRule for IdPrefix {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, record: &ValidatedRecord) -> Result<(), InvariantBreach> {
        let value = record.str_field(&self.field).ok_or_else(|| {
            InvariantBreach::at(self.field.clone(), "identifier field is absent or not a string")
        })?;
        if value.starts_with(&self.prefix) {
            Ok(())
        } else {
            Err(InvariantBreach::at(
                self.field.clone(),
                format!("identifier must start with \"{}\"", self.prefix),
            ))
        }
    }
}

/// When a condition holds, a dependent requirement must also hold.
///
/// Covers "a physical encounter must be verified" and "strong signals must
/// carry a message" style rules.
pub struct Conditional {
    name: String,
    when: RecordPredicate,
    require: RecordPredicate,
    message: String,
}

impl Conditional {
    pub fn new(
        name: impl Into<String>,
        when: impl Fn(&ValidatedRecord) -> bool + Send + Sync + 'static,
        require: impl Fn(&ValidatedRecord) -> bool + Send + Sync + 'static,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            when: Box::new(when),
            require: Box::new(require),
            message: message.into(),
        }
    }
}

impl InvariantRule for Conditional {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, record: &ValidatedRecord) -> Result<(), InvariantBreach> {
        if (self.when)(record) && !(self.require)(record) {
            return Err(InvariantBreach::new(self.message.clone()));
        }
        Ok(())
    }
}

/// Required minimum for an aggregate over a list field.
#[derive(Debug, Clone, Copy)]
pub enum Threshold {
    /// At least this many matching elements
    Count(usize),
    /// Matching elements must be at least this fraction of the list length
    Ratio(f64),
}

/// Counts list elements matching a predicate and requires a threshold.
///
/// Covers "at least one commander or captain" (Count) and "at least half
/// the crew has five-plus years of experience" (Ratio).
pub struct AggregateThreshold {
    name: String,
    list_field: String,
    predicate: ElementPredicate,
    threshold: Threshold,
    message: String,
}

impl AggregateThreshold {
    pub fn new(
        name: impl Into<String>,
        list_field: impl Into<String>,
        predicate: impl Fn(&ValidatedRecord) -> bool + Send + Sync + 'static,
        threshold: Threshold,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            list_field: list_field.into(),
            predicate: Box::new(predicate),
            threshold,
            message: message.into(),
        }
    }
}

impl InvariantRule for AggregateThreshold {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, record: &ValidatedRecord) -> Result<(), InvariantBreach> {
        let list = record.list_field(&self.list_field).ok_or_else(|| {
            InvariantBreach::at(self.list_field.clone(), "field is absent or not a list")
        })?;

        let matching = list.iter().filter(|e| (self.predicate)(e)).count();
        let satisfied = match self.threshold {
            Threshold::Count(n) => matching >= n,
            Threshold::Ratio(r) => (matching as f64) >= r * (list.len() as f64),
        };

        if satisfied {
            Ok(())
        } else {
            Err(InvariantBreach::at(self.list_field.clone(), self.message.clone()))
        }
    }
}

/// Every element of a list field must satisfy a predicate.
///
/// Breached by the first offending element, whose indexed path is reported
/// instead of continuing the scan.
pub struct UniformProperty {
    name: String,
    list_field: String,
    predicate: ElementPredicate,
    message: String,
}

impl UniformProperty {
    pub fn new(
        name: impl Into<String>,
        list_field: impl Into<String>,
        predicate: impl Fn(&ValidatedRecord) -> bool + Send + Sync + 'static,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            list_field: list_field.into(),
            predicate: Box::new(predicate),
            message: message.into(),
        }
    }
}

impl InvariantRule for UniformProperty {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, record: &ValidatedRecord) -> Result<(), InvariantBreach> {
        let list = record.list_field(&self.list_field).ok_or_else(|| {
            InvariantBreach::at(self.list_field.clone(), "field is absent or not a list")
        })?;

        for (i, element) in list.iter().enumerate() {
            if !(self.predicate)(element) {
                return Err(InvariantBreach::at(
                    format!("{}[{}]", self.list_field, i),
                    self.message.clone(),
                ));
            }
        }
        Ok(())
    }
}

/// Arbitrary whole-record predicate for one-off rules.
pub struct Predicate {
    name: String,
    check_fn: Box<dyn Fn(&ValidatedRecord) -> Result<(), String> + Send + Sync>,
}

impl Predicate {
    pub fn new(
        name: impl Into<String>,
        check_fn: impl Fn(&ValidatedRecord) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            check_fn: Box::new(check_fn),
        }
    }
}

impl InvariantRule for Predicate {
    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, record: &ValidatedRecord) -> Result<(), InvariantBreach> {
        (self.check_fn)(record).map_err(InvariantBreach::new)
    }
}
