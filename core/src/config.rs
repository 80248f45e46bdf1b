//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::fmt;
use std::path::PathBuf;

/// Default Gemini REST endpoint
pub const GEMINI_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API settings
    pub gemini: GeminiConfig,
    /// Model identifiers used by the version profiles
    pub models: ModelConfig,
    /// Quota settings
    pub quota: QuotaConfig,
    /// Session archive settings
    pub persistence: PersistenceConfig,
    /// Version selected at startup
    pub default_version: String,
}

/// Gemini API configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key; empty when not configured
    pub api_key: String,
    /// Base URL of the REST API
    pub base_url: String,
    /// Timeout for one-shot generation requests (in seconds)
    pub timeout_secs: u64,
}

/// Model identifiers for the two profile families
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelConfig {
    /// Model behind the "Nox Pro" version
    pub pro_model: String,
    /// Model behind every numbered version
    pub standard_model: String,
}

/// Quota configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaConfig {
    /// Generations granted to the Standard tier on every tier switch
    pub standard_limit: u32,
    /// Generations granted per solved puzzle
    pub puzzle_reward: u32,
}

/// Session archive configuration
#[derive(Debug, Clone)]
pub struct PersistenceConfig {
    /// Whether chat sessions are saved between runs
    pub enabled: bool,
    /// Directory holding the archive
    pub data_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gemini: GeminiConfig::default(),
            models: ModelConfig::default(),
            quota: QuotaConfig::default(),
            persistence: PersistenceConfig::default(),
            default_version: crate::profile::PRO_VERSION.to_string(),
        }
    }
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: GEMINI_API_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

// Keep the key out of logs.
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field(
                "api_key",
                &if self.api_key.is_empty() { "<unset>" } else { "<redacted>" },
            )
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            pro_model: "gemini-2.5-pro".to_string(),
            standard_model: "gemini-2.5-flash".to_string(),
        }
    }
}

impl Default for QuotaConfig {
    fn default() -> Self {
        Self {
            standard_limit: 20,
            puzzle_reward: 100,
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            data_dir: default_data_dir(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            gemini: GeminiConfig {
                api_key: env::var("GEMINI_API_KEY")
                    .or_else(|_| env::var("API_KEY"))
                    .unwrap_or_default(),
                base_url: env::var("GEMINI_API_BASE_URL")
                    .unwrap_or_else(|_| GEMINI_API_BASE_URL.to_string()),
                timeout_secs: parse_var("GEMINI_TIMEOUT_SECS")
                    .unwrap_or(defaults.gemini.timeout_secs),
            },
            models: ModelConfig {
                pro_model: env::var("NOX_PRO_MODEL").unwrap_or(defaults.models.pro_model),
                standard_model: env::var("NOX_STANDARD_MODEL")
                    .unwrap_or(defaults.models.standard_model),
            },
            quota: QuotaConfig {
                standard_limit: parse_var("NOX_STANDARD_LIMIT")
                    .unwrap_or(defaults.quota.standard_limit),
                puzzle_reward: parse_var("NOX_PUZZLE_REWARD")
                    .unwrap_or(defaults.quota.puzzle_reward),
            },
            persistence: PersistenceConfig {
                enabled: env::var("NOX_PERSIST_SESSIONS")
                    .map(|v| parse_flag(&v))
                    .unwrap_or(false),
                data_dir: env::var_os("NOX_DATA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.persistence.data_dir),
            },
            default_version: env::var("NOX_DEFAULT_VERSION").unwrap_or(defaults.default_version),
        }
    }

    /// Path of the session archive file
    pub fn sessions_path(&self) -> PathBuf {
        self.persistence.data_dir.join("sessions.json")
    }

    /// Whether an API key is available
    pub fn has_api_key(&self) -> bool {
        !self.gemini.api_key.trim().is_empty()
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

fn default_data_dir() -> PathBuf {
    // Default to ~/.nox-coder or current directory
    if let Some(home) = env::var_os("HOME") {
        PathBuf::from(home).join(".nox-coder")
    } else {
        PathBuf::from(".nox-coder")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.gemini.base_url, GEMINI_API_BASE_URL);
        assert_eq!(config.gemini.timeout_secs, 30);
        assert_eq!(config.quota.standard_limit, 20);
        assert_eq!(config.quota.puzzle_reward, 100);
        assert_eq!(config.models.pro_model, "gemini-2.5-pro");
        assert_eq!(config.models.standard_model, "gemini-2.5-flash");
        assert!(!config.persistence.enabled);
        assert!(!config.has_api_key());
        assert_eq!(config.default_version, "Nox Pro");
    }

    #[test]
    fn test_sessions_path() {
        let mut config = Config::default();
        config.persistence.data_dir = PathBuf::from("/tmp/nox");
        assert_eq!(config.sessions_path(), PathBuf::from("/tmp/nox/sessions.json"));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("1"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag(" yes "));
        assert!(!parse_flag("0"));
        assert!(!parse_flag("off"));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let gemini = GeminiConfig {
            api_key: "secret-key".to_string(),
            ..GeminiConfig::default()
        };
        let rendered = format!("{:?}", gemini);
        assert!(!rendered.contains("secret-key"));
        assert!(rendered.contains("<redacted>"));
    }
}
