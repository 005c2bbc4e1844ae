use pathlight_core::semantic::RegistryError;
use pathlight_core::{PathlightConfig, SemanticRegistry};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Failed to load registry {}: {source}", path.display())]
    Registry {
        path: PathBuf,
        #[source]
        source: RegistryError,
    },
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from default locations:
    /// 1. ./pathlight.yaml
    /// 2. ~/.pathlight/config.yaml
    /// 3. Default configuration
    pub async fn load_default() -> Result<PathlightConfig, ConfigError> {
        let local_config = PathBuf::from("./pathlight.yaml");
        if local_config.exists() {
            return Self::load_from(&local_config).await;
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".pathlight").join("config.yaml");
            if home_config.exists() {
                return Self::load_from(&home_config).await;
            }
        }

        Ok(PathlightConfig::default())
    }

    pub async fn load_from(path: &Path) -> Result<PathlightConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: PathlightConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Built-in registry (unless disabled) overlaid with every configured
    /// registry file, then `extra` files, in order.
    pub async fn load_registry(
        config: &PathlightConfig,
        extra: &[PathBuf],
    ) -> Result<SemanticRegistry, ConfigError> {
        let mut registry = if config.resolver.use_builtin_registry {
            SemanticRegistry::builtin()
        } else {
            SemanticRegistry::new()
        };

        for path in config.resolver.registry_paths.iter().chain(extra) {
            let content = tokio::fs::read_to_string(path).await?;
            let overlay =
                SemanticRegistry::from_yaml_str(&content).map_err(|source| ConfigError::Registry {
                    path: path.clone(),
                    source,
                })?;
            debug!(path = %path.display(), "Merged registry file");
            registry.merge(overlay);
        }

        Ok(registry)
    }
}
