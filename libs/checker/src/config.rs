//! Marking configuration.
//!
//! A [`MarkingConfig`] is plain data (YAML friendly, every field defaulted) and
//! is compiled into an immutable [`MarkingPlan`] before use. The defaults give
//! the standard decision sequence.

use crate::marking::{DiagnosticsPlan, MarkingPlan, ValidityPlan};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkingConfig {
    pub validity: ValidityConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidityConfig {
    /// Chemical statements must balance charge as well as atoms.
    pub charge_balance: bool,
    /// Nuclear statements must write every nuclide with its true numbers.
    pub nuclide_parameters: bool,
}

impl Default for ValidityConfig {
    fn default() -> Self {
        Self {
            charge_balance: true,
            nuclide_parameters: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Include missing and extraneous formulas in verdict term lists.
    pub report_unmatched_terms: bool,
    /// Upper bound on reported terms; `None` reports all of them.
    pub max_wrong_terms: Option<usize>,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            report_unmatched_terms: true,
            max_wrong_terms: None,
        }
    }
}

impl MarkingConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(source)?)
    }

    pub fn compile(&self) -> Result<MarkingPlan, ConfigError> {
        if self.diagnostics.max_wrong_terms == Some(0) {
            return Err(ConfigError::InvalidConfig(
                "diagnostics.max_wrong_terms must be at least 1".into(),
            ));
        }

        Ok(MarkingPlan::standard(
            ValidityPlan::from(&self.validity),
            DiagnosticsPlan::from(&self.diagnostics),
        ))
    }
}

impl From<&ValidityConfig> for ValidityPlan {
    fn from(cfg: &ValidityConfig) -> Self {
        Self {
            charge_balance: cfg.charge_balance,
            nuclide_parameters: cfg.nuclide_parameters,
        }
    }
}

impl From<&DiagnosticsConfig> for DiagnosticsPlan {
    fn from(cfg: &DiagnosticsConfig) -> Self {
        Self {
            report_unmatched_terms: cfg.report_unmatched_terms,
            max_wrong_terms: cfg.max_wrong_terms,
        }
    }
}
