//! Configuration for scan and cleanup defaults.
//!
//! Load order: `.rsp/config.toml` → environment variables → defaults.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RspConfig {
    pub scan: ScanConfig,
    pub cleanup: CleanupConfig,
}

/// Defaults for a scan request when the caller leaves a parameter out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Roots searched for responsive nodes.
    pub search_paths: Vec<String>,
    /// Category reported: shadow, shadowInTemplateInitial, shadowInContent, orphan.
    pub category: String,
    /// Report layout: noView, simple, detailed.
    pub view: String,
}

/// Deletion settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanupConfig {
    /// Deletion runs only when the number of matches is strictly greater
    /// than this. The default of 1 means a lone match is never removed.
    pub min_batch_size: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            search_paths: vec!["/content".to_string(), "/conf".to_string()],
            category: "shadow".to_string(),
            view: "simple".to_string(),
        }
    }
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self { min_batch_size: 1 }
    }
}

/// Helper to parse an env var and apply it to a config field.
fn env_override<T: std::str::FromStr>(var: &str, target: &mut T) {
    if let Ok(v) = std::env::var(var)
        && let Ok(n) = v.parse()
    {
        *target = n;
    }
}

impl RspConfig {
    /// Load config from `.rsp/config.toml` in the project root, with env var overrides.
    /// Falls back to defaults if no config file exists.
    pub fn load(project_root: &Path) -> Result<Self> {
        let config_path = crate::storage::config_file(project_root);

        let mut config = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content)?
        } else {
            Self::default()
        };

        env_override("RSP_MIN_BATCH_SIZE", &mut config.cleanup.min_batch_size);
        env_override("RSP_CATEGORY", &mut config.scan.category);
        env_override("RSP_VIEW", &mut config.scan.view);

        if let Some(bad) = config
            .scan
            .search_paths
            .iter()
            .find(|p| !p.starts_with('/'))
        {
            anyhow::bail!("search path '{}' must be absolute", bad);
        }

        Ok(config)
    }
}
