use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "postsmith";
const CONFIG_FILE: &str = "config.toml";
const API_KEY_ENV: &str = "GEMINI_API_KEY";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generative Language API key. Falls back to $GEMINI_API_KEY when
    /// the file leaves it empty.
    pub api_key: String,
    pub model: String,
    pub image_model: String,
    pub request_timeout_secs: u64,
    pub tick_rate_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            image_model: "imagen-3.0-generate-002".to_string(),
            request_timeout_secs: 60,
            tick_rate_ms: 250,
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from the default location when
    /// no path is given. A missing file yields defaults; a file that
    /// exists but does not parse is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path(),
        };

        let mut config = if path.exists() {
            let raw = fs::read_to_string(&path)
                .with_context(|| format!("failed to read config at {}", path.display()))?;
            toml::from_str(&raw)
                .with_context(|| format!("failed to parse config at {}", path.display()))?
        } else {
            Config::default()
        };

        config.api_key = fallback_api_key(&config.api_key, std::env::var(API_KEY_ENV).ok());
        Ok(config)
    }

    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR)
            .join(CONFIG_FILE)
    }

    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

/// Prefer the configured key; fall back to the environment when it is blank.
fn fallback_api_key(configured: &str, env: Option<String>) -> String {
    if configured.trim().is_empty() {
        env.unwrap_or_default()
    } else {
        configured.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.image_model, "imagen-3.0-generate-002");
        assert_eq!(config.request_timeout_secs, 60);
        assert!(!config.has_api_key());
    }

    #[test]
    fn test_load_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(&dir.path().join("nope.toml"))).unwrap();
        assert_eq!(config.model, Config::default().model);
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "api_key = \"abc123\"").unwrap();
        writeln!(file, "model = \"gemini-2.5-pro\"").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.api_key, "abc123");
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.tick_rate_ms, 250);
    }

    #[test]
    fn test_load_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "model = [not toml").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_fallback_api_key_prefers_configured() {
        assert_eq!(
            fallback_api_key("from-file", Some("from-env".to_string())),
            "from-file"
        );
    }

    #[test]
    fn test_fallback_api_key_uses_env_when_blank() {
        assert_eq!(
            fallback_api_key("  ", Some("from-env".to_string())),
            "from-env"
        );
        assert_eq!(fallback_api_key("", None), "");
    }
}
