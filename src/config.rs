//! Configuration parsing and validation for willow.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::path::Path;

use crate::router::{default_providers, Catalog, ProviderProfile, RegionIntensity, WorstCase};

/// Convention env var consulted when `upstream.api_key` is absent.
pub const API_KEY_ENV_VAR: &str = "WILLOW_API_KEY";

/// Root configuration structure.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub worst_case: WorstCase,
    pub regions: RegionIntensity,
    /// Empty means the built-in illustrative catalog
    pub providers: Vec<ProviderProfile>,
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "127.0.0.1:8080")
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "127.0.0.1:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

/// Chat-completion upstream configuration.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Base URL of an OpenAI-compatible API (e.g., "https://api.deepseek.com")
    pub url: String,
    /// Model id sent with every completion request
    pub model: String,
    pub api_key: Option<ApiKey>,
    /// System message prepended to the user's query
    pub system_prompt: String,
    pub timeout_secs: u64,
}

fn default_upstream_url() -> String {
    "https://api.deepseek.com".to_string()
}

fn default_upstream_model() -> String {
    "deepseek-chat".to_string()
}

fn default_system_prompt() -> String {
    "You are a helpful AI assistant. Do not use LaTeX in your response".to_string()
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            model: default_upstream_model(),
            api_key: None,
            system_prompt: default_system_prompt(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// API key wrapper that redacts in Debug/Display and zeroizes on drop.
///
/// Only accessible via `.expose_secret()`.
#[derive(Clone)]
pub struct ApiKey(SecretString);

impl ApiKey {
    pub fn expose_secret(&self) -> &str {
        self.0.expose_secret()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl std::fmt::Display for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl From<String> for ApiKey {
    fn from(s: String) -> Self {
        ApiKey(SecretString::from(s))
    }
}

impl From<&str> for ApiKey {
    fn from(s: &str) -> Self {
        ApiKey(SecretString::from(s))
    }
}

/// How the upstream API key was resolved.
#[derive(Debug, Clone, PartialEq)]
pub enum KeySource {
    /// Key was a literal string in config (no ${} references)
    Literal,
    /// Key contained ${VAR} references expanded from environment
    EnvExpanded,
    /// Key was read from [`API_KEY_ENV_VAR`]
    Convention,
    /// No key available
    None,
}

impl std::fmt::Display for KeySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KeySource::Literal => write!(f, "config-literal"),
            KeySource::EnvExpanded => write!(f, "env-expanded"),
            KeySource::Convention => write!(f, "convention ({})", API_KEY_ENV_VAR),
            KeySource::None => write!(f, "none"),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level for the willow target
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Build the provider catalog described by this configuration.
    pub fn catalog(&self) -> Result<Catalog, ConfigError> {
        let providers = if self.providers.is_empty() {
            tracing::debug!("No providers configured, using built-in catalog");
            default_providers()
        } else {
            self.providers.clone()
        };

        Catalog::new(providers, self.regions.clone(), self.worst_case)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Upstream has empty URL".to_string(),
            ));
        }
        if self.upstream.model.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Upstream has empty model".to_string(),
            ));
        }
        if self.upstream.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "Upstream timeout_secs must be greater than zero".to_string(),
            ));
        }

        self.catalog()?;
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable '{var}' not set for '{field}': {message}")]
    EnvVar {
        var: String,
        field: String,
        message: String,
    },
}

/// Raw upstream config deserialized directly from TOML.
/// api_key may contain `${VAR}` references not yet expanded.
#[derive(Deserialize)]
pub struct RawUpstreamConfig {
    #[serde(default = "default_upstream_url")]
    url: String,
    #[serde(default = "default_upstream_model")]
    model: String,
    api_key: Option<String>,
    #[serde(default = "default_system_prompt")]
    system_prompt: String,
    #[serde(default = "default_timeout_secs")]
    timeout_secs: u64,
}

impl Default for RawUpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            model: default_upstream_model(),
            api_key: None,
            system_prompt: default_system_prompt(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Raw configuration deserialized directly from TOML.
#[derive(Deserialize, Default)]
pub struct RawConfig {
    #[serde(default)]
    server: ServerConfig,
    #[serde(default)]
    upstream: RawUpstreamConfig,
    #[serde(default)]
    worst_case: WorstCase,
    #[serde(default)]
    regions: RegionIntensity,
    #[serde(default)]
    providers: Vec<ProviderProfile>,
    #[serde(default)]
    logging: LoggingConfig,
}

/// Expand all `${VAR}` references in a string using a custom lookup function.
///
/// Supports multiple `${VAR}` in one string (e.g., `${SCHEME}://${HOST}/v1`).
/// Fails on first missing variable, unclosed `${`, or empty variable name.
fn expand_env_vars_with<F>(input: &str, field: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !input.contains("${") {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let end = after.find('}').ok_or_else(|| ConfigError::EnvVar {
            var: "<unclosed>".to_string(),
            field: field.to_string(),
            message: format!("Unclosed '${{' in config value: {}", input),
        })?;

        let var_name = &after[..end];
        if var_name.is_empty() {
            return Err(ConfigError::EnvVar {
                var: "".to_string(),
                field: field.to_string(),
                message: "Empty variable name in '${}' reference".to_string(),
            });
        }

        let value = lookup(var_name).ok_or_else(|| ConfigError::EnvVar {
            var: var_name.to_string(),
            field: field.to_string(),
            message: format!(
                "Environment variable '{}' is not set (referenced in '{}')",
                var_name, field
            ),
        })?;

        result.push_str(&value);
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    Ok(result)
}

/// Resolve the upstream API key from the raw value or the convention env var.
fn resolve_api_key<F>(
    raw_key: Option<&str>,
    lookup: F,
) -> Result<(Option<ApiKey>, KeySource), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match raw_key {
        Some(raw_key) if raw_key.contains("${") => {
            let expanded = expand_env_vars_with(raw_key, "upstream.api_key", lookup)?;
            Ok((Some(ApiKey::from(expanded)), KeySource::EnvExpanded))
        }
        Some(raw_key) => Ok((Some(ApiKey::from(raw_key)), KeySource::Literal)),
        None => match lookup(API_KEY_ENV_VAR) {
            Some(value) => Ok((Some(ApiKey::from(value)), KeySource::Convention)),
            None => Ok((None, KeySource::None)),
        },
    }
}

impl Config {
    /// Convert raw (deserialized) config to final config with env var expansion.
    ///
    /// - `api_key` containing `${VAR}`: expanded from environment, `EnvExpanded`
    /// - literal `api_key`: wrapped directly, `Literal`
    /// - absent `api_key`: `WILLOW_API_KEY` if set (`Convention`), else `None`
    pub fn from_raw(raw: RawConfig) -> Result<(Self, KeySource), ConfigError> {
        Self::from_raw_with(raw, |name| std::env::var(name).ok())
    }

    fn from_raw_with<F>(raw: RawConfig, lookup: F) -> Result<(Self, KeySource), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let (api_key, source) = resolve_api_key(raw.upstream.api_key.as_deref(), lookup)?;

        let config = Config {
            server: raw.server,
            upstream: UpstreamConfig {
                url: raw.upstream.url,
                model: raw.upstream.model,
                api_key,
                system_prompt: raw.upstream.system_prompt,
                timeout_secs: raw.upstream.timeout_secs,
            },
            worst_case: raw.worst_case,
            regions: raw.regions,
            providers: raw.providers,
            logging: raw.logging,
        };
        config.validate()?;

        Ok((config, source))
    }

    /// Parse configuration from a TOML string with environment variable expansion.
    pub fn parse_str(content: &str) -> Result<(Self, KeySource), ConfigError> {
        let raw: RawConfig = toml::from_str(content).map_err(ConfigError::Parse)?;
        Self::from_raw(raw)
    }

    /// Load configuration from a TOML file with environment variable expansion.
    ///
    /// Returns the config and how the upstream key was resolved.
    pub fn from_file_with_env(path: impl AsRef<Path>) -> Result<(Self, KeySource), ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
            path: path.as_ref().display().to_string(),
            source: e,
        })?;

        Self::parse_str(&content)
    }
}
