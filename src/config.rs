//! Catalog configuration.
//!
//! Settings come from an optional YAML file; every field has a default.
//! `RECIPE_CATALOG_PAGE_SIZE` overrides the page size from the environment.

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use tracing::{info, warn};

use crate::store::HIGHEST_CODEPOINT;

pub const PAGE_SIZE_ENV: &str = "RECIPE_CATALOG_PAGE_SIZE";
pub const DEFAULT_PAGE_SIZE: usize = 12;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CatalogConfig {
    /// Recipes per listing page
    pub page_size: usize,
    /// Appended to a search prefix to close the title range
    pub search_upper_bound: char,
    /// Directory of YAML recipes loaded into an in-memory store
    pub seed_dir: Option<Utf8PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            page_size: DEFAULT_PAGE_SIZE,
            search_upper_bound: HIGHEST_CODEPOINT,
            seed_dir: None,
        }
    }
}

impl CatalogConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let config: CatalogConfig = if content.trim().is_empty() {
            CatalogConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Reads a YAML config file. Relative `seed_dir` values are resolved
    /// against the file's directory.
    pub fn from_path(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml_str(&content)?;
        if let (Some(seed_dir), Some(parent)) = (&config.seed_dir, path.parent()) {
            if seed_dir.is_relative() {
                config.seed_dir = Some(parent.join(seed_dir));
            }
        }
        Ok(config)
    }

    /// Applies environment overrides. Invalid values are logged and ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(raw) = env::var(PAGE_SIZE_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(page_size) if page_size > 0 => {
                    info!("{PAGE_SIZE_ENV} set, using page size {page_size}");
                    self.page_size = page_size;
                }
                _ => warn!("Invalid {PAGE_SIZE_ENV} value: {raw}, keeping {}", self.page_size),
            }
        }
        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be at least 1".to_string()));
        }
        Ok(())
    }
}
