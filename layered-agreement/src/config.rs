//! Agreement settings loaded from TOML.
//!
//! ```toml
//! measure = "cohen_kappa"
//! exclude_incomplete = true
//! stacking = "exclude_stacked"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::builder::{AgreementOptions, StackingPolicy};
use crate::errors::AgreementError;
use crate::measures::MeasureKind;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgreementConfig {
    #[serde(default)]
    pub measure: MeasureKind,
    #[serde(default)]
    pub exclude_incomplete: bool,
    #[serde(default)]
    pub stacking: StackingPolicy,
}

impl AgreementConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, AgreementError> {
        toml::from_str(content).map_err(|e| AgreementError::Config {
            message: e.to_string(),
        })
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, AgreementError> {
        let content = fs::read_to_string(path).map_err(|source| AgreementError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn with_measure(mut self, measure: MeasureKind) -> Self {
        self.measure = measure;
        self
    }

    pub fn options(&self) -> AgreementOptions {
        AgreementOptions::new()
            .with_exclude_incomplete(self.exclude_incomplete)
            .with_stacking(self.stacking)
    }
}
