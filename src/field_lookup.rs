//! Field lookup
//!
//! Field names are resolved by the remote service's symbol tables. The
//! validators only need "does this field exist and which macro owns it", so
//! that question is a trait; the host wires in its HTTP client, tests and the
//! command line use a [`FieldCatalog`] loaded from JSON.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult, FieldDataError, FieldDataResult};

/// Metadata for one named field, as returned by the field search endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldReference {
    /// Field label
    pub label: String,
    /// Owning macro
    pub name: String,
    /// Field length in bytes
    pub length: u32,
    /// Displacement within the macro
    #[serde(default)]
    pub dsp: u32,
}

impl FieldReference {
    pub fn macro_name(&self) -> &str {
        &self.name
    }
}

/// Resolves field names to their references
pub trait FieldLookup {
    /// `field_name` is already upper case
    fn lookup(&self, field_name: &str) -> Option<FieldReference>;
}

impl<F> FieldLookup for F
where
    F: Fn(&str) -> Option<FieldReference>,
{
    fn lookup(&self, field_name: &str) -> Option<FieldReference> {
        self(field_name)
    }
}

/// In-memory field lookup keyed by upper-case label
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    fields: HashMap<String, FieldReference>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: FieldReference) {
        self.fields.insert(reference.label.to_uppercase(), reference);
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Parse a JSON array of field references
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let references: Vec<FieldReference> = serde_json::from_str(json)?;
        Ok(references.into_iter().collect())
    }

    /// Load a JSON array of field references from disk
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::FileError {
            path: path.display().to_string(),
            error: e.to_string(),
        })?;
        Self::from_json(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            error: e.to_string(),
        })
    }
}

impl FromIterator<FieldReference> for FieldCatalog {
    fn from_iter<I: IntoIterator<Item = FieldReference>>(iter: I) -> Self {
        let mut catalog = FieldCatalog::new();
        for reference in iter {
            catalog.insert(reference);
        }
        catalog
    }
}

impl FieldLookup for FieldCatalog {
    fn lookup(&self, field_name: &str) -> Option<FieldReference> {
        self.fields.get(field_name).cloned()
    }
}

/// Resolve one field name typed by the user
pub fn search_field<L>(lookup: &L, field_name: &str) -> FieldDataResult<FieldReference>
where
    L: FieldLookup + ?Sized,
{
    let field = field_name.trim().to_uppercase();
    lookup
        .lookup(&field)
        .ok_or(FieldDataError::UnknownField { field })
}
