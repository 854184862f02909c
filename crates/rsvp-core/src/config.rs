//! Application configuration
//!
//! Configuration is loaded from:
//! 1. Default values
//! 2. Config file (~/.config/rsvp/config.toml)
//! 3. Environment variables (RSVP_* prefix)
//!
//! Environment variables take precedence over config file values.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable prefix
const ENV_PREFIX: &str = "RSVP";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the REST API (every request path is appended to it)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Directory for client state (cookie jar, theme preference)
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Cookie the CSRF token is read from
    #[serde(default = "default_csrf_cookie")]
    pub csrf_cookie: String,

    /// Header the CSRF token is mirrored into
    #[serde(default = "default_csrf_header")]
    pub csrf_header: String,

    /// Path fetched before login to obtain the CSRF cookie
    ///
    /// Relative to `api_url` unless it is a full `http(s)://` URL.
    #[serde(default)]
    pub csrf_prime_path: Option<String>,

    /// Per-request timeout in seconds (0 disables)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Log file path (optional, logs to stderr if unset)
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            data_dir: default_data_dir(),
            csrf_cookie: default_csrf_cookie(),
            csrf_header: default_csrf_header(),
            csrf_prime_path: None,
            request_timeout_secs: default_request_timeout_secs(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from default location and environment
    ///
    /// Order of precedence (highest to lowest):
    /// 1. Environment variables (RSVP_API_URL, RSVP_DATA_DIR, RSVP_TIMEOUT_SECS, RSVP_LOG_FILE)
    /// 2. Config file (~/.config/rsvp/config.toml or RSVP_CONFIG)
    /// 3. Default values
    pub fn load() -> Result<Self> {
        Self::load_from_path(&Self::config_file_path())
    }

    /// Load configuration, preferring a path given on the command line
    pub fn load_with_cli_override(config_path: Option<&PathBuf>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_path(path),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    ///
    /// Environment variables are still applied as overrides.
    /// If the file doesn't exist, defaults are used.
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?
        } else {
            Self::default()
        };

        config.apply_env_overrides();
        config.ensure_data_dir()?;
        Ok(config)
    }

    /// Load configuration from a TOML string (useful for testing)
    pub fn load_from_str(toml_content: &str) -> Result<Self> {
        let mut config: Config =
            toml::from_str(toml_content).context("Failed to parse config TOML")?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // RSVP_API_URL
        if let Ok(val) = std::env::var(format!("{}_API_URL", ENV_PREFIX)) {
            if !val.is_empty() {
                self.api_url = val;
            }
        }

        // RSVP_DATA_DIR
        if let Ok(val) = std::env::var(format!("{}_DATA_DIR", ENV_PREFIX)) {
            self.data_dir = PathBuf::from(val);
        }

        // RSVP_TIMEOUT_SECS (ignored if not a number)
        if let Ok(val) = std::env::var(format!("{}_TIMEOUT_SECS", ENV_PREFIX)) {
            if let Ok(secs) = val.trim().parse() {
                self.request_timeout_secs = secs;
            }
        }

        // RSVP_LOG_FILE
        if let Ok(val) = std::env::var(format!("{}_LOG_FILE", ENV_PREFIX)) {
            self.log_file = if val.is_empty() {
                None
            } else {
                Some(PathBuf::from(val))
            };
        }
    }

    /// Ensure data directory exists
    fn ensure_data_dir(&self) -> Result<()> {
        if !self.data_dir.exists() {
            std::fs::create_dir_all(&self.data_dir)
                .with_context(|| format!("Failed to create data directory: {:?}", self.data_dir))?;
        }
        Ok(())
    }

    /// Save configuration to the default file
    pub fn save(&self) -> Result<()> {
        self.save_to_path(&Self::config_file_path())
    }

    /// Save configuration to a specific file
    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;
        Ok(())
    }

    /// Get the config file path
    ///
    /// Can be overridden with RSVP_CONFIG environment variable
    pub fn config_file_path() -> PathBuf {
        if let Ok(path) = std::env::var(format!("{}_CONFIG", ENV_PREFIX)) {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rsvp")
            .join("config.toml")
    }

    /// Request timeout, `None` when disabled
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Get the path to the persisted session cookies
    pub fn cookie_path(&self) -> PathBuf {
        self.data_dir.join("cookies")
    }

    /// Get the path to the theme preference
    pub fn theme_path(&self) -> PathBuf {
        self.data_dir.join("theme")
    }
}

fn default_api_url() -> String {
    "http://localhost:8000/api".to_string()
}

/// Get the default data directory
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("rsvp")
}

fn default_csrf_cookie() -> String {
    "XSRF-TOKEN".to_string()
}

fn default_csrf_header() -> String {
    "X-XSRF-TOKEN".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to serialize tests that touch environment variables
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    /// Guard that locks env access and saves/restores env vars
    struct EnvGuard<'a> {
        _lock: std::sync::MutexGuard<'a, ()>,
        saved: Vec<(String, Option<String>)>,
    }

    impl<'a> EnvGuard<'a> {
        fn new(vars: &[&str]) -> Self {
            let lock = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
            let saved = vars
                .iter()
                .map(|&name| (name.to_string(), env::var(name).ok()))
                .collect();
            for name in vars {
                env::remove_var(name);
            }
            Self { _lock: lock, saved }
        }
    }

    impl Drop for EnvGuard<'_> {
        fn drop(&mut self) {
            for (name, value) in &self.saved {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }

    const ENV_VARS: &[&str] = &[
        "RSVP_API_URL",
        "RSVP_DATA_DIR",
        "RSVP_TIMEOUT_SECS",
        "RSVP_LOG_FILE",
    ];

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_url, "http://localhost:8000/api");
        assert_eq!(config.csrf_cookie, "XSRF-TOKEN");
        assert_eq!(config.csrf_header, "X-XSRF-TOKEN");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));
        assert!(config.csrf_prime_path.is_none());
        assert!(config.data_dir.ends_with("rsvp"));
    }

    #[test]
    fn test_file_paths() {
        let config = Config::default();
        assert!(config.cookie_path().ends_with("cookies"));
        assert!(config.theme_path().ends_with("theme"));
    }

    #[test]
    fn test_zero_timeout_disables() {
        let config = Config {
            request_timeout_secs: 0,
            ..Config::default()
        };
        assert!(config.request_timeout().is_none());
    }

    #[test]
    fn test_env_override_api_url() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("RSVP_API_URL", "https://events.example.com/api");
        config.apply_env_overrides();
        assert_eq!(config.api_url, "https://events.example.com/api");

        // Empty string keeps the previous value
        env::set_var("RSVP_API_URL", "");
        config.apply_env_overrides();
        assert_eq!(config.api_url, "https://events.example.com/api");
    }

    #[test]
    fn test_env_override_timeout() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("RSVP_TIMEOUT_SECS", "5");
        config.apply_env_overrides();
        assert_eq!(config.request_timeout_secs, 5);

        env::set_var("RSVP_TIMEOUT_SECS", "soon");
        config.apply_env_overrides();
        assert_eq!(config.request_timeout_secs, 5);
    }

    #[test]
    fn test_env_override_data_dir() {
        let _guard = EnvGuard::new(ENV_VARS);

        let mut config = Config::default();
        env::set_var("RSVP_DATA_DIR", "/tmp/rsvp-test");
        config.apply_env_overrides();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/rsvp-test"));
    }

    #[test]
    fn test_load_from_str() {
        let _guard = EnvGuard::new(ENV_VARS);

        let toml = r#"
            api_url = "http://api.test"
            data_dir = "/custom/data"
            csrf_prime_path = "/csrf"
            request_timeout_secs = 10
        "#;

        let config = Config::load_from_str(toml).unwrap();
        assert_eq!(config.api_url, "http://api.test");
        assert_eq!(config.data_dir, PathBuf::from("/custom/data"));
        assert_eq!(config.csrf_prime_path.as_deref(), Some("/csrf"));
        assert_eq!(config.request_timeout_secs, 10);
        // Unset keys fall back to defaults
        assert_eq!(config.csrf_header, "X-XSRF-TOKEN");
    }

    #[test]
    fn test_save_and_reload() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");

        let config = Config {
            api_url: "http://saved.test/api".to_string(),
            data_dir: temp_dir.path().join("data"),
            ..Config::default()
        };
        config.save_to_path(&path).unwrap();

        let loaded = Config::load_with_cli_override(Some(&path)).unwrap();
        assert_eq!(loaded.api_url, "http://saved.test/api");
        assert!(loaded.data_dir.exists());
    }

    #[test]
    fn test_load_from_path_missing_file() {
        let _guard = EnvGuard::new(ENV_VARS);
        let temp_dir = tempfile::TempDir::new().unwrap();
        env::set_var("RSVP_DATA_DIR", temp_dir.path().join("data"));

        let path = PathBuf::from("/nonexistent/config.toml");
        let config = Config::load_from_path(&path).unwrap();
        assert_eq!(config.api_url, default_api_url());
    }
}
