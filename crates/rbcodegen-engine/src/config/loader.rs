//! Finds and parses the YAML config file.

use super::schema::CodegenConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Looked up in the working directory before the per-user file.
pub const LOCAL_CONFIG: &str = "rbcodegen.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// `./rbcodegen.yaml`, then `~/.rbcodegen/config.yaml` when a home directory is known.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![Path::new(".").join(LOCAL_CONFIG)];
        paths.extend(dirs::home_dir().map(|home| home.join(".rbcodegen").join("config.yaml")));
        paths
    }

    pub async fn load_default() -> Result<CodegenConfig, ConfigError> {
        Self::load_first(&Self::search_paths()).await
    }

    /// Loads the first of `paths` that exists. Built-in defaults if none does.
    pub async fn load_first(paths: &[PathBuf]) -> Result<CodegenConfig, ConfigError> {
        for path in paths {
            if matches!(tokio::fs::try_exists(path).await, Ok(true)) {
                return Self::load_from(path).await;
            }
        }
        debug!("No config file found, using defaults");
        Ok(CodegenConfig::default())
    }

    /// An empty file counts as all defaults.
    pub async fn load_from(path: &Path) -> Result<CodegenConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        if content.trim().is_empty() {
            return Ok(CodegenConfig::default());
        }
        let config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}
