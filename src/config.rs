//! TOML configuration for Flowboard.
//!
//! Layered configuration with sensible defaults, environment variable
//! override for the config file path, and a standard filesystem location.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub server: ServerConfig,
    pub ui: UiConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        info!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Try to load configuration from, in order:
    /// 1. The path specified by the `FLOWBOARD_CONFIG` environment variable.
    /// 2. `/etc/flowboard/flowboard.toml`.
    /// 3. Fall back to compiled-in defaults.
    pub fn load_or_default() -> Self {
        if let Ok(env_path) = std::env::var("FLOWBOARD_CONFIG") {
            let path = Path::new(&env_path);
            match Self::load(path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "FLOWBOARD_CONFIG set but file could not be loaded, trying fallback"
                    );
                }
            }
        }

        let system_path = Path::new("/etc/flowboard/flowboard.toml");
        if system_path.exists() {
            match Self::load(system_path) {
                Ok(cfg) => return cfg,
                Err(e) => {
                    warn!(
                        path = %system_path.display(),
                        error = %e,
                        "system config file exists but could not be loaded, using defaults"
                    );
                }
            }
        }

        debug!("no config file found, using compiled-in defaults");
        Self::default()
    }
}

/// Connection settings for the remote platform API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the platform, without a trailing path.
    pub base_url: String,
    /// Static API key sent as `X-N8N-API-KEY` on every request.
    pub api_key: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Default server-side limit for listing calls.
    pub default_limit: u32,
    /// Project scope applied to listing calls when set.
    pub project_id: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5678".to_string(),
            api_key: String::new(),
            timeout_secs: 30,
            default_limit: 250,
            project_id: None,
        }
    }
}

/// Dashboard HTTP service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address and port the JSON API listens on.
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8090".to_string(),
        }
    }
}

/// Presentation defaults shared by the CLI and the HTTP service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Rows per table page.
    pub page_size: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { page_size: 10 }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Minimum tracing level (`trace`, `debug`, `info`, `warn`, `error`).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let cfg = Config::default();

        assert_eq!(cfg.api.base_url, "http://localhost:5678");
        assert!(cfg.api.api_key.is_empty());
        assert_eq!(cfg.api.timeout_secs, 30);
        assert_eq!(cfg.api.default_limit, 250);
        assert!(cfg.api.project_id.is_none());

        assert_eq!(cfg.server.bind, "0.0.0.0:8090");
        assert_eq!(cfg.ui.page_size, 10);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_parse_example_toml() {
        let toml_str = r#"
[api]
base_url = "https://n8n.example.com"
api_key = "secret"
timeout_secs = 10
default_limit = 100
project_id = "yxhyeLFN7bv5SYj3"

[server]
bind = "127.0.0.1:9000"

[ui]
page_size = 25

[logging]
level = "debug"
"#;

        let cfg: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.api.base_url, "https://n8n.example.com");
        assert_eq!(cfg.api.api_key, "secret");
        assert_eq!(cfg.api.timeout_secs, 10);
        assert_eq!(cfg.api.default_limit, 100);
        assert_eq!(cfg.api.project_id.as_deref(), Some("yxhyeLFN7bv5SYj3"));
        assert_eq!(cfg.server.bind, "127.0.0.1:9000");
        assert_eq!(cfg.ui.page_size, 25);
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_str = r#"
[api]
base_url = "https://n8n.internal"
"#;

        let cfg: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(cfg.api.base_url, "https://n8n.internal");
        assert_eq!(cfg.api.timeout_secs, 30);
        assert_eq!(cfg.server.bind, "0.0.0.0:8090");
        assert_eq!(cfg.ui.page_size, 10);
    }

    #[test]
    fn test_empty_toml_uses_all_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.api.base_url, Config::default().api.base_url);
        assert_eq!(cfg.ui.page_size, Config::default().ui.page_size);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("flowboard.toml");
        std::fs::write(
            &path,
            r#"
[server]
bind = "0.0.0.0:9999"
"#,
        )
        .unwrap();

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.server.bind, "0.0.0.0:9999");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = Config::load(Path::new("/nonexistent/path/flowboard.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let roundtripped: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(cfg.api.base_url, roundtripped.api.base_url);
        assert_eq!(cfg.server.bind, roundtripped.server.bind);
        assert_eq!(cfg.ui.page_size, roundtripped.ui.page_size);
    }
}
