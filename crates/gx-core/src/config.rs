//! Configuration management
//!
//! Configuration is resolved in the following priority order:
//! 1. Environment variables
//! 2. grok-gateway.toml configuration file
//! 3. Defaults
//!
//! `${VAR_NAME}` references inside the file are expanded from the
//! environment before parsing.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// xAI API configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct XaiConfig {
    /// API key
    pub api_key: String,

    /// Base URL (optional, for custom endpoints)
    pub base_url: Option<String>,
}

/// Discord configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiscordConfig {
    /// Bot token
    pub token: String,

    /// Guilds to register commands in; empty registers globally
    #[serde(default)]
    pub guild_ids: Vec<u64>,
}

/// Main configuration for grok-gateway
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub xai: XaiConfig,

    #[serde(default)]
    pub discord: DiscordConfig,
}

impl Config {
    /// Expand `${VAR_NAME}` references from the environment.
    ///
    /// Unset variables expand to the empty string.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next(); // consume '{'

                let mut var_name = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '}' {
                        chars.next(); // consume '}'
                        break;
                    }
                    var_name.push(c);
                    chars.next();
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Load configuration from a TOML file, then apply environment
    /// overrides (environment wins).
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let toml_content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| Error::Config(format!("Failed to read config file: {e}")))?;

        let expanded_content = Self::expand_env_vars(&toml_content);

        let toml_config: TomlConfig = toml::from_str(&expanded_content)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {e}")))?;

        let mut config = Self::from_toml_config(toml_config);
        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from the default locations.
    ///
    /// `./grok-gateway.toml` is used when present; otherwise environment
    /// variables only.
    pub fn load() -> Result<Self> {
        if Path::new("grok-gateway.toml").exists() {
            return Self::from_toml_file("grok-gateway.toml");
        }

        Self::from_env()
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_toml_config(toml: TomlConfig) -> Self {
        let xai = toml.xai.unwrap_or_default();
        let discord = toml.discord.unwrap_or_default();

        Config {
            xai: XaiConfig {
                api_key: xai.api_key.unwrap_or_default(),
                base_url: xai.base_url,
            },
            discord: DiscordConfig {
                token: discord.token.unwrap_or_default(),
                guild_ids: discord.guild_ids.unwrap_or_default(),
            },
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(api_key) = std::env::var("XAI_API_KEY") {
            if !api_key.is_empty() {
                self.xai.api_key = api_key;
            }
        }
        if let Ok(base_url) = std::env::var("XAI_BASE_URL") {
            if !base_url.is_empty() {
                self.xai.base_url = Some(base_url);
            }
        }
        if let Ok(token) = std::env::var("DISCORD_BOT_TOKEN") {
            if !token.is_empty() {
                self.discord.token = token;
            }
        }
        if let Ok(ids) = std::env::var("DISCORD_GUILD_IDS") {
            self.discord.guild_ids = ids
                .split(',')
                .filter_map(|id| id.trim().parse().ok())
                .collect();
        }
    }

    fn validate(&self) -> Result<()> {
        if self.xai.api_key.is_empty() {
            return Err(Error::Config("XAI_API_KEY not set".to_string()));
        }
        if self.discord.token.is_empty() {
            return Err(Error::Config("DISCORD_BOT_TOKEN not set".to_string()));
        }
        Ok(())
    }
}

// ============================================================================
// TOML mirror structs (file parsing)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TomlConfig {
    xai: Option<TomlXaiConfig>,
    discord: Option<TomlDiscordConfig>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlXaiConfig {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default)]
    base_url: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlDiscordConfig {
    token: Option<String>,
    guild_ids: Option<Vec<u64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_env_vars() {
        unsafe {
            std::env::set_var("GX_CONFIG_TEST_VAR", "test_value");
        }

        let result = Config::expand_env_vars("prefix_${GX_CONFIG_TEST_VAR}_suffix");
        assert_eq!(result, "prefix_test_value_suffix");

        let result = Config::expand_env_vars("prefix_${GX_NONEXISTENT_VAR}_suffix");
        assert_eq!(result, "prefix__suffix");

        unsafe {
            std::env::remove_var("GX_CONFIG_TEST_VAR");
        }
    }

    #[test]
    fn test_expand_env_vars_no_braces() {
        let result = Config::expand_env_vars("no_vars_here");
        assert_eq!(result, "no_vars_here");
    }

    #[test]
    fn test_toml_config_parsing() {
        let toml_content = r#"
[xai]
api_key = "xai-test-key"
base_url = "https://api.example.com/v1"

[discord]
token = "discord-token"
guild_ids = [123456, 789012]
"#;

        let toml_config: TomlConfig = toml::from_str(toml_content).unwrap();
        let config = Config::from_toml_config(toml_config);

        assert_eq!(config.xai.api_key, "xai-test-key");
        assert_eq!(
            config.xai.base_url,
            Some("https://api.example.com/v1".to_string())
        );
        assert_eq!(config.discord.token, "discord-token");
        assert_eq!(config.discord.guild_ids, vec![123456, 789012]);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let toml_config: TomlConfig = toml::from_str("[xai]\napi_key = \"k\"\n").unwrap();
        let config = Config::from_toml_config(toml_config);

        assert_eq!(config.xai.api_key, "k");
        assert!(config.xai.base_url.is_none());
        assert!(config.discord.token.is_empty());
        assert!(config.discord.guild_ids.is_empty());
    }

    #[test]
    fn test_validate_requires_credentials() {
        let config = Config::default();
        assert!(config.validate().is_err());

        let config = Config {
            xai: XaiConfig {
                api_key: "k".to_string(),
                base_url: None,
            },
            discord: DiscordConfig {
                token: "t".to_string(),
                guild_ids: Vec::new(),
            },
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_guild_ids_env_parsing() {
        unsafe {
            std::env::set_var("DISCORD_GUILD_IDS", "111, 222,abc,333");
        }

        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.discord.guild_ids, vec![111, 222, 333]);

        unsafe {
            std::env::remove_var("DISCORD_GUILD_IDS");
        }
    }
}
