use crate::error::Error;
use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::Deserialize;

pub const DEFAULT_MAX_WORKERS: usize = 50;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Upper bound on concurrent move/delete operations.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    /// Unpack archives that land in the `archives` category.
    #[serde(default = "default_extract_archives")]
    pub extract_archives: bool,
}

fn default_max_workers() -> usize {
    DEFAULT_MAX_WORKERS
}

fn default_extract_archives() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_workers: DEFAULT_MAX_WORKERS,
            extract_archives: true,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), Error> {
        if self.max_workers == 0 {
            return Err(Error::Config(ConfigError::Message(
                "max_workers must be at least 1".to_string(),
            )));
        }
        Ok(())
    }
}

/// Loads `Config.*` from the working directory (optional) layered under
/// `CLEAN_FOLDER_*` environment variables.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .add_source(Environment::with_prefix("CLEAN_FOLDER").try_parsing(true))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.max_workers, 50);
        assert!(config.extract_archives);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let config = AppConfig {
            max_workers: 0,
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_deserialize_fills_defaults() {
        let config: AppConfig = Config::builder()
            .set_override("max_workers", 8)
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(config.max_workers, 8);
        assert!(config.extract_archives);
    }
}
