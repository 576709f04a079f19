// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("com.alphavelocity", "Dompet", "dompet"));

pub const ENV_DATA_DIR: &str = "DOMPET_DATA_DIR";
pub const ENV_LOG: &str = "DOMPET_LOG";

/// Key prefix shared by every persisted collection.
pub const DEFAULT_NAMESPACE: &str = "finance_app";
pub const DEFAULT_CURRENCY: &str = "Rp";
pub const DEFAULT_LOG_FILTER: &str = "dompet=warn";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub namespace: String,
    pub currency: String,
    pub log_filter: String,
}

impl Config {
    /// Flags win over environment, environment wins over platform defaults.
    pub fn resolve(data_dir: Option<PathBuf>, verbose: bool) -> Result<Self> {
        let data_dir = match data_dir.or_else(|| std::env::var_os(ENV_DATA_DIR).map(PathBuf::from))
        {
            Some(dir) => dir,
            None => default_data_dir()?,
        };
        let log_filter = if verbose {
            "dompet=debug".to_string()
        } else {
            std::env::var(ENV_LOG).unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string())
        };
        Ok(Self {
            data_dir,
            namespace: DEFAULT_NAMESPACE.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            log_filter,
        })
    }

    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            currency: DEFAULT_CURRENCY.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }

    pub fn ensure_data_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Failed to create data dir {}", self.data_dir.display()))
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    Ok(proj.data_dir().to_path_buf())
}
