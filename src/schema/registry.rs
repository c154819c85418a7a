//! Schema registry with optional loading of schema files from disk.
//!
//! Schema files are JSON renditions of [`RecordSchema`] field constraints,
//! one file per record kind. Invariant rules are code, not data, so they are
//! attached programmatically after load via [`SchemaRegistry::attach_invariants`].

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::errors::{SchemaError, SchemaResult};
use super::types::RecordSchema;
use crate::validate::InvariantRule;

/// In-memory registry of record schemas, keyed by record kind name.
///
/// Registered schemas are immutable: registering the same name twice is an
/// error. Iteration order is name order, so registry contents are
/// deterministic regardless of load order.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, RecordSchema>,
}

impl SchemaRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads all `*.json` schema files from a directory.
    ///
    /// A missing directory is created and yields zero schemas. Non-JSON
    /// files are skipped. Malformed files and structurally invalid schemas
    /// are errors. Returns the number of schemas loaded.
    pub fn load_dir(&mut self, dir: &Path) -> SchemaResult<usize> {
        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| SchemaError::MalformedSchema {
                path: dir.display().to_string(),
                reason: format!("failed to create schema directory: {}", e),
            })?;
            return Ok(0);
        }

        let entries = fs::read_dir(dir).map_err(|e| SchemaError::MalformedSchema {
            path: dir.display().to_string(),
            reason: format!("failed to read schema directory: {}", e),
        })?;

        let mut loaded = 0;
        for entry in entries {
            let entry = entry.map_err(|e| SchemaError::MalformedSchema {
                path: dir.display().to_string(),
                reason: format!("failed to read directory entry: {}", e),
            })?;

            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }

            self.load_schema_file(&path)?;
            loaded += 1;
        }

        Ok(loaded)
    }

    fn load_schema_file(&mut self, path: &Path) -> SchemaResult<()> {
        let content = fs::read_to_string(path).map_err(|e| SchemaError::MalformedSchema {
            path: path.display().to_string(),
            reason: format!("failed to read file: {}", e),
        })?;

        let schema: RecordSchema =
            serde_json::from_str(&content).map_err(|e| SchemaError::MalformedSchema {
                path: path.display().to_string(),
                reason: format!("invalid JSON: {}", e),
            })?;

        self.register(schema)
    }

    /// Registers a schema, running its structural self-check first.
    pub fn register(&mut self, schema: RecordSchema) -> SchemaResult<()> {
        schema
            .validate_structure()
            .map_err(|reason| SchemaError::InvalidStructure {
                schema: schema.name.clone(),
                reason,
            })?;

        if self.schemas.contains_key(&schema.name) {
            return Err(SchemaError::SchemaExists(schema.name.clone()));
        }

        self.schemas.insert(schema.name.clone(), schema);
        Ok(())
    }

    /// Attaches invariant rules to an already-registered schema, in order.
    pub fn attach_invariants(
        &mut self,
        name: &str,
        rules: Vec<Arc<dyn InvariantRule>>,
    ) -> SchemaResult<()> {
        let schema = self
            .schemas
            .get_mut(name)
            .ok_or_else(|| SchemaError::UnknownSchema(name.to_string()))?;

        for rule in rules {
            if rule.name().is_empty() {
                return Err(SchemaError::InvalidStructure {
                    schema: name.to_string(),
                    reason: "invariant rule has an empty name".into(),
                });
            }
            schema.push_invariant(rule);
        }
        Ok(())
    }

    /// Gets a schema by record kind name.
    pub fn get(&self, name: &str) -> Option<&RecordSchema> {
        self.schemas.get(name)
    }

    /// Checks whether a schema is registered.
    pub fn exists(&self, name: &str) -> bool {
        self.schemas.contains_key(name)
    }

    /// Iterates all registered schemas in name order.
    pub fn all_schemas(&self) -> impl Iterator<Item = &RecordSchema> {
        self.schemas.values()
    }

    /// Returns the number of registered schemas.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }
}
