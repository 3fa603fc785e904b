//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.mercodex/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MercodexConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct BackendConfig {
    pub base_url: Option<String>,
    pub user_id: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct UiConfig {
    pub sidebar_open: Option<bool>,
    pub suggestions: Option<Vec<String>>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost:5001";
pub const DEFAULT_USER_ID: &str = "U-123";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

pub const DEFAULT_SUGGESTIONS: [&str; 4] = [
    "Analyze the iPhone 15 Pro Max",
    "Compare Samsung Galaxy S24 vs iPhone",
    "Generate a report on the Tesla Model 3",
    "Reviews of the PlayStation 5",
];

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub user_id: String,
    pub request_timeout_secs: u64,
    pub sidebar_open: bool,
    pub suggestions: Vec<String>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        resolve_with(&MercodexConfig::default(), &Overrides::default())
    }
}

/// Values from outside the config file: env vars and CLI flags.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub env_base_url: Option<String>,
    pub env_user_id: Option<String>,
    pub cli_base_url: Option<String>,
    pub cli_user_id: Option<String>,
}

impl Overrides {
    /// Read `MERCODEX_BASE_URL` / `MERCODEX_USER_ID` and attach CLI values.
    pub fn from_env(cli_base_url: Option<String>, cli_user_id: Option<String>) -> Self {
        Self {
            env_base_url: std::env::var("MERCODEX_BASE_URL").ok(),
            env_user_id: std::env::var("MERCODEX_USER_ID").ok(),
            cli_base_url,
            cli_user_id,
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.mercodex/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".mercodex").join("config.toml"))
}

/// Load config from `~/.mercodex/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `MercodexConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<MercodexConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(MercodexConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(MercodexConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: MercodexConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# Mercodex Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [backend]
# base_url = "http://localhost:5001"   # Or set MERCODEX_BASE_URL / --base-url
# user_id = "U-123"                    # Or set MERCODEX_USER_ID / --user-id
# request_timeout_secs = 120

# [ui]
# sidebar_open = true
# suggestions = [
#   "Analyze the iPhone 15 Pro Max",
#   "Compare Samsung Galaxy S24 vs iPhone",
# ]
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve_with(config: &MercodexConfig, overrides: &Overrides) -> ResolvedConfig {
    // Base URL: CLI → env → config → default
    let base_url = overrides
        .cli_base_url
        .clone()
        .or_else(|| overrides.env_base_url.clone())
        .or_else(|| config.backend.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
        .trim_end_matches('/')
        .to_string();

    // User ID: CLI → env → config → default
    let user_id = overrides
        .cli_user_id
        .clone()
        .or_else(|| overrides.env_user_id.clone())
        .or_else(|| config.backend.user_id.clone())
        .unwrap_or_else(|| DEFAULT_USER_ID.to_string());

    // An empty list in the file means "use the defaults", not "show nothing"
    let suggestions = config
        .ui
        .suggestions
        .clone()
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_SUGGESTIONS.iter().map(|s| s.to_string()).collect());

    ResolvedConfig {
        base_url,
        user_id,
        request_timeout_secs: request_timeout(config.backend.request_timeout_secs),
        sidebar_open: config.ui.sidebar_open.unwrap_or(true),
        suggestions,
    }
}

/// A zero timeout would fail every request immediately.
fn request_timeout(configured: Option<u64>) -> u64 {
    match configured {
        Some(0) => {
            warn!("request_timeout_secs = 0 is not usable; using {}", DEFAULT_REQUEST_TIMEOUT_SECS);
            DEFAULT_REQUEST_TIMEOUT_SECS
        }
        Some(secs) => secs,
        None => DEFAULT_REQUEST_TIMEOUT_SECS,
    }
}

/// Load the config file (falling back to defaults on error) and resolve it.
pub fn resolve(cli_base_url: Option<String>, cli_user_id: Option<String>) -> ResolvedConfig {
    let config = load_config().unwrap_or_else(|e| {
        warn!("{}; using defaults", e);
        MercodexConfig::default()
    });
    resolve_with(&config, &Overrides::from_env(cli_base_url, cli_user_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with(&MercodexConfig::default(), &Overrides::default());
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.user_id, DEFAULT_USER_ID);
        assert_eq!(resolved.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert!(resolved.sidebar_open);
        assert_eq!(resolved.suggestions.len(), DEFAULT_SUGGESTIONS.len());
    }

    #[test]
    fn test_resolve_config_values_override_defaults() {
        let config = MercodexConfig {
            backend: BackendConfig {
                base_url: Some("http://research.local:8080/".to_string()),
                user_id: Some("U-7".to_string()),
                request_timeout_secs: Some(30),
            },
            ui: UiConfig {
                sidebar_open: Some(false),
                suggestions: Some(vec!["Compare laptops".to_string()]),
            },
        };
        let resolved = resolve_with(&config, &Overrides::default());
        assert_eq!(resolved.base_url, "http://research.local:8080");
        assert_eq!(resolved.user_id, "U-7");
        assert_eq!(resolved.request_timeout_secs, 30);
        assert!(!resolved.sidebar_open);
        assert_eq!(resolved.suggestions, vec!["Compare laptops".to_string()]);
    }

    #[test]
    fn test_zero_timeout_falls_back_to_default() {
        let mut config = MercodexConfig::default();
        config.backend.request_timeout_secs = Some(0);
        let resolved = resolve_with(&config, &Overrides::default());
        assert_eq!(resolved.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    }

    #[test]
    fn test_resolve_cli_wins_over_env_and_file() {
        let config = MercodexConfig {
            backend: BackendConfig {
                base_url: Some("http://file".to_string()),
                user_id: Some("file-user".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let overrides = Overrides {
            env_base_url: Some("http://env".to_string()),
            env_user_id: Some("env-user".to_string()),
            cli_base_url: Some("http://cli".to_string()),
            cli_user_id: None,
        };
        let resolved = resolve_with(&config, &overrides);
        assert_eq!(resolved.base_url, "http://cli");
        assert_eq!(resolved.user_id, "env-user");
    }

    #[test]
    fn test_empty_suggestion_list_falls_back_to_defaults() {
        let config = MercodexConfig {
            ui: UiConfig {
                suggestions: Some(Vec::new()),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = resolve_with(&config, &Overrides::default());
        assert_eq!(resolved.suggestions[0], DEFAULT_SUGGESTIONS[0]);
    }

    #[test]
    fn test_toml_parses() {
        let toml_str = r#"
[backend]
base_url = "http://127.0.0.1:5000"
user_id = "U-1"
request_timeout_secs = 15

[ui]
sidebar_open = false
suggestions = ["A", "B"]
"#;
        let config: MercodexConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.base_url.as_deref(), Some("http://127.0.0.1:5000"));
        assert_eq!(config.backend.request_timeout_secs, Some(15));
        assert_eq!(config.ui.sidebar_open, Some(false));
        assert_eq!(config.ui.suggestions.as_ref().map(Vec::len), Some(2));
    }

    #[test]
    fn test_sparse_toml_parses() {
        // Only override one thing; everything else stays default
        let config: MercodexConfig = toml::from_str("[backend]\nuser_id = \"me\"\n").unwrap();
        assert_eq!(config.backend.user_id.as_deref(), Some("me"));
        assert!(config.backend.base_url.is_none());
        assert!(config.ui.suggestions.is_none());
    }
}
