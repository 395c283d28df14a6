//! Configuration for the cache, provider backends, credentials, and static catalog.

use crate::types::{DispatchOptions, Model, TaskCategory};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Complete router configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Response cache configuration
    pub cache: CacheConfig,
    /// Provider backend configuration
    pub providers: ProviderConfig,
    /// API keys for model providers
    pub api_keys: ApiKeys,
    /// Default options forwarded with every dispatch
    pub dispatch: DispatchOptions,
    /// Static catalog entries used when providers report too few models
    pub models: Vec<Model>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            providers: ProviderConfig::default(),
            api_keys: ApiKeys::default(),
            dispatch: DispatchOptions::default(),
            models: builtin_models(),
        }
    }
}

/// API keys for model providers.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ApiKeys {
    /// `OpenAI` API key
    pub openai_api_key: Option<String>,
    /// Anthropic API key for Claude models
    pub anthropic_api_key: Option<String>,
    /// Groq API key
    pub groq_api_key: Option<String>,
}

/// Response cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Whether caching is enabled
    pub enabled: bool,
    /// Maximum number of entries
    pub max_size: usize,
    /// Time-to-live for cache entries in minutes
    pub ttl_minutes: u64,
    /// Period of the background expiry sweep in seconds
    pub cleanup_interval_seconds: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size: 1000,
            ttl_minutes: 60,
            cleanup_interval_seconds: 300,
        }
    }
}

/// Provider backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Per-call timeout in seconds
    pub timeout_seconds: u64,
    /// Chat-completions endpoint for `OpenAI`
    pub openai_base_url: String,
    /// Messages endpoint for Anthropic
    pub anthropic_base_url: String,
    /// Chat-completions endpoint for Groq
    pub groq_base_url: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 5,
            openai_base_url: "https://api.openai.com/v1/chat/completions".to_owned(),
            anthropic_base_url: "https://api.anthropic.com/v1/messages".to_owned(),
            groq_base_url: "https://api.groq.com/openai/v1/chat/completions".to_owned(),
        }
    }
}

/// Built-in fallback catalog, priced per token.
#[must_use]
pub fn builtin_models() -> Vec<Model> {
    let without_coding = [
        TaskCategory::Summary,
        TaskCategory::Translation,
        TaskCategory::Analysis,
        TaskCategory::General,
    ];

    vec![
        Model::new("gpt-4o", "GPT-4o", "openai")
            .with_cost_per_token(0.000_005)
            .with_max_tokens(128_000)
            .with_ratings(10, 8),
        Model::new("gpt-4o-mini", "GPT-4o Mini", "openai")
            .with_cost_per_token(0.000_000_15)
            .with_max_tokens(128_000)
            .with_ratings(8, 9),
        Model::new("claude-3-sonnet", "Claude 3 Sonnet", "anthropic")
            .with_cost_per_token(0.000_003)
            .with_max_tokens(200_000)
            .with_ratings(9, 7),
        Model::new("gemini-1.5-flash", "Gemini 1.5 Flash", "google")
            .with_cost_per_token(0.000_001)
            .with_max_tokens(1_000_000)
            .with_ratings(7, 10)
            .with_supported(without_coding),
        Model::new("grok-beta", "Grok Beta", "xai")
            .with_cost_per_token(0.000_005)
            .with_max_tokens(131_072)
            .with_ratings(8, 6),
    ]
}

impl RouterConfig {
    /// Get the default config directory path (`~/.routewise`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_dir() -> Result<PathBuf> {
        use dirs::home_dir;
        let home = home_dir()
            .ok_or_else(|| Error::Config("Could not determine home directory".to_owned()))?;
        Ok(home.join(".routewise"))
    }

    /// Get the default config file path (`~/.routewise/config.toml`)
    ///
    /// # Errors
    /// Returns an error if the home directory cannot be determined
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load config from the default location, creating it with defaults if missing.
    ///
    /// # Errors
    /// Returns an error if the config cannot be read or created
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from_file(&config_path)
        } else {
            let config = Self::default();
            config.save_to_file(&config_path)?;
            Ok(config)
        }
    }

    /// Load config from a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, parsed, or fails validation
    pub fn load_from_file(path: &Path) -> Result<Self> {
        use toml::from_str;
        let contents = fs::read_to_string(path)
            .map_err(|error| Error::Config(format!("Failed to read config: {error}")))?;
        let config: Self = from_str(&contents)?;
        config.validate()?;

        tracing::debug!(
            "Loaded config from {:?}: {} static models, openai_api_key={}, anthropic_api_key={}",
            path,
            config.models.len(),
            if config.api_keys.openai_api_key.is_some() {
                "present"
            } else {
                "missing"
            },
            if config.api_keys.anthropic_api_key.is_some() {
                "present"
            } else {
                "missing"
            }
        );

        Ok(config)
    }

    /// Save config to a specific file
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        use toml::to_string_pretty;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = to_string_pretty(self)
            .map_err(|error| Error::Config(format!("Failed to serialize config: {error}")))?;

        let header = "# Routewise Configuration File\n\
                      # This file is automatically generated on first run\n\
                      # Edit this file to customize your settings\n\n";

        fs::write(path, format!("{header}{contents}"))?;

        Ok(())
    }

    /// Checks value ranges that serde cannot express.
    ///
    /// # Errors
    /// Returns `Error::Config` describing the first invalid value
    pub fn validate(&self) -> Result<()> {
        if self.cache.max_size == 0 {
            return Err(Error::Config("cache.max_size must be at least 1".to_owned()));
        }
        if self.cache.ttl_minutes == 0 {
            return Err(Error::Config(
                "cache.ttl_minutes must be at least 1".to_owned(),
            ));
        }
        if self.providers.timeout_seconds == 0 {
            return Err(Error::Config(
                "providers.timeout_seconds must be at least 1".to_owned(),
            ));
        }
        for model in &self.models {
            if !(1..=10).contains(&model.speed_rating) || !(1..=10).contains(&model.quality_rating)
            {
                return Err(Error::Config(format!(
                    "model {} has ratings outside 1-10",
                    model.id
                )));
            }
            if model.cost_per_token < 0.0 || !model.cost_per_token.is_finite() {
                return Err(Error::Config(format!(
                    "model {} has an invalid cost_per_token",
                    model.id
                )));
            }
        }
        Ok(())
    }

    /// Get API key for a provider, checking config first, then environment variables
    pub fn get_api_key(&self, provider: &str) -> Option<String> {
        let (configured, variable) = match provider {
            "openai" => (&self.api_keys.openai_api_key, "OPENAI_API_KEY"),
            "anthropic" => (&self.api_keys.anthropic_api_key, "ANTHROPIC_API_KEY"),
            "groq" => (&self.api_keys.groq_api_key, "GROQ_API_KEY"),
            _ => return None,
        };
        configured
            .clone()
            .or_else(|| env::var(variable).ok())
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = RouterConfig::default();
        assert!(config.cache.enabled);
        assert_eq!(config.cache.max_size, 1000);
        assert_eq!(config.cache.ttl_minutes, 60);
        assert_eq!(config.cache.cleanup_interval_seconds, 300);
        assert_eq!(config.dispatch.max_tokens, 1000);
        assert_eq!(config.models.len(), 5);
        config.validate().unwrap();
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut config = RouterConfig::default();
        config.cache.max_size = 42;
        config.api_keys.anthropic_api_key = Some("sk-test".to_owned());
        config.save_to_file(&path).unwrap();

        let loaded = RouterConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.cache.max_size, 42);
        assert_eq!(loaded.models, config.models);
        assert_eq!(loaded.get_api_key("anthropic").as_deref(), Some("sk-test"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[cache]\nttl_minutes = 5\n").unwrap();

        let loaded = RouterConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.cache.ttl_minutes, 5);
        assert_eq!(loaded.cache.max_size, 1000);
        assert_eq!(loaded.providers.timeout_seconds, 5);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let mut config = RouterConfig::default();
        config.cache.max_size = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_out_of_range_rating() {
        let mut config = RouterConfig::default();
        config.models.push(Model::new("broken", "Broken", "x").with_ratings(11, 5));
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_unknown_provider_has_no_key() {
        let config = RouterConfig::default();
        assert!(config.get_api_key("xai").is_none());
    }
}
