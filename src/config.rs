//! Application configuration.
//!
//! Values are layered with the `config` crate: serde defaults, then an
//! optional `dropbox-uploader.toml` next to the binary's working directory,
//! then `DROPBOX_UPLOADER__SECTION__KEY` environment variables.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

const CONFIG_FILE: &str = "dropbox-uploader";
const ENV_PREFIX: &str = "DROPBOX_UPLOADER";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the backend lives and how it is paged.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Base URL including the `/api` prefix, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// `limit` sent with every folder listing request.
    #[serde(default = "default_page_size")]
    pub folder_page_size: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_base_url() -> String {
    "http://conector_dropbox:5000/api".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            folder_page_size: default_page_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        Self::from_settings(settings)
    }

    fn from_settings(settings: Config) -> Result<Self, ConfigError> {
        let mut config: AppConfig = settings.try_deserialize()?;
        config.api.base_url = config.api.base_url.trim_end_matches('/').to_string();
        if config.api.folder_page_size == 0 {
            return Err(ConfigError::Message(
                "api.folder_page_size must be greater than zero".to_string(),
            ));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<AppConfig, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?;
        AppConfig::from_settings(settings)
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = from_toml("").unwrap();
        assert_eq!(config.api.base_url, "http://conector_dropbox:5000/api");
        assert_eq!(config.api.folder_page_size, 100);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config = from_toml(
            r#"
            [api]
            base_url = "http://localhost:5000/api/"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.base_url, "http://localhost:5000/api");
        assert_eq!(config.api.folder_page_size, 100);
    }

    #[test]
    fn zero_page_size_is_rejected() {
        let result = from_toml(
            r#"
            [api]
            folder_page_size = 0
            "#,
        );
        assert!(result.is_err());
    }
}
