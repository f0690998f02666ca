//! Configuration types for the point set inspector.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Where point files are looked up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Directory scanned non-recursively for point files
    #[serde(default = "default_directory")]
    pub directory: PathBuf,

    /// Required file extension, without the leading dot
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_directory() -> PathBuf {
    PathBuf::from("./point_sets")
}

fn default_extension() -> String {
    "pt".to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            extension: default_extension(),
        }
    }
}

/// Console report formatting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Decimal places for printed coordinates and distances
    #[serde(default = "default_precision")]
    pub precision: usize,
}

fn default_precision() -> usize {
    3
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            precision: default_precision(),
        }
    }
}

/// Main configuration combining all sub-configs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InspectorConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub report: ReportConfig,
}

impl InspectorConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: InspectorConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }
}
