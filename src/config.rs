//! Diff configuration loaded from TOML.
//!
//! ```toml
//! link_compare = "link_role_as_label"
//!
//! [[type]]
//! name = "SemanticPredicate"
//! label_features = ["category"]
//! link_features = ["arguments"]
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::adapter::DiffAdapter;
use crate::cas::TypeSystem;
use crate::cas_diff::CasDiff;
use crate::errors::DiffError;
use crate::link_compare::LinkCompareBehavior;

/// Which features of one type to compare.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterConfig {
    pub name: String,
    #[serde(default)]
    pub label_features: Vec<String>,
    #[serde(default)]
    pub link_features: Vec<String>,
}

/// Entry types, their adapters, and the link-compare policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffConfig {
    #[serde(default)]
    pub link_compare: LinkCompareBehavior,
    #[serde(default, rename = "type")]
    pub types: Vec<AdapterConfig>,
}

impl DiffConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, DiffError> {
        toml::from_str(content).map_err(|e| DiffError::Config {
            message: e.to_string(),
        })
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, DiffError> {
        let content = fs::read_to_string(path).map_err(|e| DiffError::Config {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// Resolve every configured type against the schema and build the diff.
    ///
    /// Entry types are the configured types, in configuration order.
    pub fn build(&self, types: &TypeSystem) -> Result<CasDiff, DiffError> {
        let mut adapters = Vec::with_capacity(self.types.len());
        for adapter in &self.types {
            let schema = types.get(&adapter.name).ok_or_else(|| DiffError::UnknownType {
                type_name: adapter.name.clone(),
            })?;
            let labels: Vec<&str> = adapter.label_features.iter().map(String::as_str).collect();
            let links: Vec<&str> = adapter.link_features.iter().map(String::as_str).collect();
            adapters.push(DiffAdapter::for_type(schema, &labels, &links)?);
        }

        let entry_types: Vec<&str> = self.types.iter().map(|t| t.name.as_str()).collect();
        CasDiff::new(&entry_types, adapters, self.link_compare)
    }
}
