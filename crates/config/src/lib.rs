//! Configuration loading, validation, and management for Vitae.
//!
//! Loads configuration from `~/.vitae/config.toml` (or an explicit path) with
//! environment variable overrides. Missing credentials never stop startup:
//! they are reported through `tracing` and left empty.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// The root configuration structure.
///
/// Maps directly to `~/.vitae/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// LLM API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus-sampling threshold
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Who the agent speaks as
    #[serde(default)]
    pub persona: PersonaConfig,

    /// Conversation loop settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Push notification settings
    #[serde(default)]
    pub notifier: NotifierConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.2
}
fn default_top_p() -> f32 {
    0.9
}
fn default_max_tokens() -> u32 {
    500
}

/// Redact a secret for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("max_tokens", &self.max_tokens)
            .field("persona", &self.persona)
            .field("agent", &self.agent)
            .field("notifier", &self.notifier)
            .field("gateway", &self.gateway)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonaConfig {
    /// The person the agent represents
    #[serde(default = "default_persona_name")]
    pub name: String,

    /// Plain-text background file, read once at startup
    #[serde(default = "default_background_path")]
    pub background_path: String,
}

fn default_persona_name() -> String {
    "Your Name".into()
}
fn default_background_path() -> String {
    "me.txt".into()
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            name: default_persona_name(),
            background_path: default_background_path(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Maximum consecutive LLM rounds that may request tools in one turn
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: u32,

    /// User turns (1-based) that get the contact reminder
    #[serde(default = "default_contact_prompt_turns")]
    pub contact_prompt_turns: Vec<u32>,
}

fn default_max_tool_rounds() -> u32 {
    8
}
fn default_contact_prompt_turns() -> Vec<u32> {
    vec![1, 5]
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_tool_rounds: default_max_tool_rounds(),
            contact_prompt_turns: default_contact_prompt_turns(),
        }
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct NotifierConfig {
    /// Pushover user key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Pushover application token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Messages endpoint
    #[serde(default = "default_pushover_url")]
    pub api_url: String,
}

fn default_pushover_url() -> String {
    "https://api.pushover.net/1/messages.json".into()
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            user: None,
            token: None,
            api_url: default_pushover_url(),
        }
    }
}

impl std::fmt::Debug for NotifierConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifierConfig")
            .field("user", &redact(&self.user))
            .field("token", &redact(&self.token))
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,
}

fn default_port() -> u16 {
    7860
}
fn default_host() -> String {
    "127.0.0.1".into()
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the default path (~/.vitae/config.toml),
    /// then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(None)
    }

    /// Load from `path` (or the default location) and apply environment
    /// overrides:
    /// - `VITAE_API_KEY`, then `OPENAI_API_KEY`
    /// - `VITAE_MODEL`
    /// - `VITAE_PERSONA_NAME`, `VITAE_BACKGROUND`
    /// - `PUSHOVER_USER`, `PUSHOVER_TOKEN`
    pub fn load_with(path: Option<&Path>) -> Result<Self, ConfigError> {
        let default_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(path.unwrap_or(&default_path))?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Overlay values from an environment lookup. Empty values are ignored.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if self.api_key.is_none() {
            self.api_key = get("VITAE_API_KEY").or_else(|| get("OPENAI_API_KEY"));
        }
        if let Some(model) = get("VITAE_MODEL") {
            self.model = model;
        }
        if let Some(name) = get("VITAE_PERSONA_NAME") {
            self.persona.name = name;
        }
        if let Some(path) = get("VITAE_BACKGROUND") {
            self.persona.background_path = path;
        }
        if let Some(user) = get("PUSHOVER_USER") {
            self.notifier.user = Some(user);
        }
        if let Some(token) = get("PUSHOVER_TOKEN") {
            self.notifier.token = Some(token);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".vitae")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.top_p <= 0.0 || self.top_p > 1.0 {
            return Err(ConfigError::ValidationError(
                "top_p must be in (0.0, 1.0]".into(),
            ));
        }

        if self.agent.max_tool_rounds == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_tool_rounds must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Log which secrets are present without revealing them.
    ///
    /// Absent secrets are warnings only; the affected calls will go out with
    /// empty credentials and fail at the remote end.
    pub fn report_credentials(&self) {
        for (label, value) in [
            ("LLM API key", &self.api_key),
            ("Pushover user", &self.notifier.user),
            ("Pushover token", &self.notifier.token),
        ] {
            match credential_hint(value) {
                Some(first) => info!("{label} found and starts with {first}"),
                None => warn!("{label} not found"),
            }
        }
    }

    /// Generate a default config TOML string (for `init`).
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// First character of a secret, for startup diagnostics.
pub fn credential_hint(secret: &Option<String>) -> Option<char> {
    secret.as_deref().and_then(|s| s.chars().next())
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_tokens: default_max_tokens(),
            persona: PersonaConfig::default(),
            agent: AgentConfig::default(),
            notifier: NotifierConfig::default(),
            gateway: GatewayConfig::default(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}
