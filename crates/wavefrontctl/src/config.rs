//! Configuration loading.
//!
//! Sources, lowest precedence first: built-in defaults, the TOML config file,
//! then `WAVEFRONT__SECTION__KEY` environment variables.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use ::config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use wavefront_api::ClientConfig;

pub const APP_NAME: &str = "wavefront";
const ENV_PREFIX: &str = "WAVEFRONT";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ClientConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Load configuration from `path`, or from the default location.
pub fn load(path: Option<&Path>) -> Result<AppConfig> {
    let path = match path {
        Some(path) => expand_path(path)?,
        None => default_config_dir()?.join("config.toml"),
    };

    let built = Config::builder()
        .set_default("logging.level", "warn")?
        .set_default("api.timeout_secs", 30_i64)?
        .add_source(
            File::from(path.as_path())
                .format(FileFormat::Toml)
                .required(false),
        )
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .with_context(|| format!("reading config from {}", path.display()))?;

    built
        .try_deserialize()
        .context("parsing configuration")
}

fn expand_path(path: &Path) -> Result<PathBuf> {
    match path.to_str() {
        Some(text) => {
            let expanded = shellexpand::full(text).context("expanding path")?;
            Ok(PathBuf::from(expanded.to_string()))
        }
        None => Ok(path.to_path_buf()),
    }
}

fn default_config_dir() -> Result<PathBuf> {
    if let Some(dir) = env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir).join(APP_NAME));
    }

    if let Some(mut dir) = dirs::config_dir() {
        dir.push(APP_NAME);
        return Ok(dir);
    }

    dirs::home_dir()
        .map(|home| home.join(".config").join(APP_NAME))
        .ok_or_else(|| anyhow!("unable to determine configuration directory"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn loads_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[api]
address = "example.wavefront.com"
token = "abc"
http_proxy = "http://proxy.internal:3128"
skip_tls_verify = true

[logging]
level = "debug"
"#,
        )
        .unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.api.address, "example.wavefront.com");
        assert_eq!(config.api.token, "abc");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(
            config.api.http_proxy.as_deref(),
            Some("http://proxy.internal:3128")
        );
        assert!(config.api.skip_tls_verify);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.logging.level, "warn");
        assert!(config.api.http_proxy.is_none());
    }
}
