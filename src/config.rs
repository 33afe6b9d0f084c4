//! Numerical tolerances, loadable from TOML.
//!
//! - `NumericsConfig::from_toml_file(path)` → load overrides
//! - `NumericsConfig::from_user_default_or_builtin()` → ~/.spin_network/numerics.toml if present
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::quantum::algebra::{matrix_exponential_with, EXP_MAX_TERMS, EXP_TOLERANCE};
use crate::core::quantum::types::{Operator, StateVector, HERMITIAN_TOLERANCE, ZERO_TOLERANCE};

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct NumericsConfig {
    pub zero_tolerance: f64,
    pub hermitian_tolerance: f64,
    pub exp_max_terms: usize,
    pub exp_tolerance: f64,
}

impl Default for NumericsConfig {
    fn default() -> Self {
        Self {
            zero_tolerance: ZERO_TOLERANCE,
            hermitian_tolerance: HERMITIAN_TOLERANCE,
            exp_max_terms: EXP_MAX_TERMS,
            exp_tolerance: EXP_TOLERANCE,
        }
    }
}

impl NumericsConfig {
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let txt =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let cfg: NumericsConfig =
            toml::from_str(&txt).with_context(|| format!("parsing {}", path.display()))?;
        anyhow::ensure!(
            cfg.exp_max_terms >= 1,
            "exp_max_terms must be at least 1 in {}",
            path.display()
        );
        Ok(cfg)
    }

    /// Use ~/.spin_network/numerics.toml if present; otherwise built-in.
    pub fn from_user_default_or_builtin() -> Self {
        if let Some(p) = default_config_path() {
            if p.exists() {
                if let Ok(cfg) = Self::from_toml_file(&p) {
                    return cfg;
                }
                eprintln!("(warn) failed loading {}, using builtin tolerances", p.display());
            }
        }
        Self::default()
    }

    pub fn matrix_exponential(&self, m: &Operator) -> Operator {
        matrix_exponential_with(m, self.exp_max_terms, self.exp_tolerance)
    }

    pub fn is_hermitian(&self, op: &Operator) -> bool {
        op.is_hermitian(self.hermitian_tolerance)
    }

    pub fn is_zero(&self, state: &StateVector) -> bool {
        state.is_zero(self.zero_tolerance)
    }
}

/// ~/.spin_network/numerics.toml
pub fn default_config_path() -> Option<PathBuf> {
    dirs_next::home_dir().map(|h| h.join(".spin_network").join("numerics.toml"))
}

pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Create config parent dir {}", parent.display()))?;
    }
    Ok(())
}
