//! Configuration for the scout binary.
//!
//! Settings come from, in order:
//! 1. Default values
//! 2. Config file (`~/.config/scout/config.toml`, or `--config PATH`)
//!
//! The model host credential never lives in the file; it is read from the
//! `GITHUB_TOKEN` environment variable at startup.

use scout::agent::{Agent, instructions};
use scout::model::openai;
use scout::tools::search;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

/// Environment variable holding the GitHub Models token.
pub const CREDENTIAL_VAR: &str = "GITHUB_TOKEN";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    /// Credential not present in the environment.
    #[error("missing credential: set the {0} environment variable")]
    MissingCredential(&'static str),
    /// Invalid value.
    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Read the model host credential from the environment.
///
/// An unset or empty variable counts as missing, so the failure happens
/// here rather than as an HTTP 401 later.
///
/// # Errors
///
/// Returns [`ConfigError::MissingCredential`] when the variable is absent.
pub fn credential() -> ConfigResult<String> {
    match std::env::var(CREDENTIAL_VAR) {
        Ok(token) if !token.is_empty() => Ok(token),
        _ => Err(ConfigError::MissingCredential(CREDENTIAL_VAR)),
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Get the default config file path.
#[must_use]
pub fn config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("scout")
        .join("config.toml")
}

/// Load configuration from the default path.
///
/// # Errors
///
/// Same failure modes as [`load_from`].
pub async fn load() -> ConfigResult<ScoutConfig> {
    load_from(config_path()).await
}

/// Load configuration from a specific path.
///
/// A missing file is not an error; defaults apply.
///
/// # Errors
///
/// Returns a [`ConfigError`] when the file exists but cannot be read or
/// parsed, or when a parsed value is out of range.
pub async fn load_from(path: PathBuf) -> ConfigResult<ScoutConfig> {
    if !path.exists() {
        info!(path = %path.display(), "config file not found, using defaults");
        return Ok(ScoutConfig::default());
    }

    let content = tokio::fs::read_to_string(&path).await?;
    let config: ScoutConfig = toml::from_str(&content)?;
    config.validate()?;
    debug!(path = %path.display(), "loaded config file");

    Ok(config)
}

// ---------------------------------------------------------------------------
// Schema
// ---------------------------------------------------------------------------

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoutConfig {
    /// Model host configuration.
    #[serde(default)]
    pub model: ModelConfig,

    /// Agent loop configuration.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Web search configuration.
    #[serde(default)]
    pub search: SearchConfig,
}

impl ScoutConfig {
    /// Check the invariants the agent loop relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for out-of-range settings.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.agent.max_steps == 0 {
            return Err(ConfigError::InvalidValue(
                "agent.max_steps must be at least 1".to_string(),
            ));
        }
        if self.agent.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "agent.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Model host settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Inference endpoint base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier.
    #[serde(default = "default_model_id")]
    pub id: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Response token cap. Unset leaves the host default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

fn default_base_url() -> String {
    openai::GITHUB_MODELS_BASE_URL.to_string()
}

fn default_model_id() -> String {
    openai::DEFAULT_MODEL_ID.to_string()
}

const fn default_temperature() -> f32 {
    0.1
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            id: default_model_id(),
            temperature: default_temperature(),
            max_tokens: None,
        }
    }
}

/// Agent loop settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Maximum model turns per run.
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,

    /// Total run deadline in seconds.
    #[serde(default = "default_run_timeout")]
    pub timeout_secs: u64,

    /// System instruction preset.
    #[serde(default)]
    pub instructions: InstructionsPreset,
}

const fn default_max_steps() -> usize {
    Agent::DEFAULT_MAX_STEPS
}

const fn default_run_timeout() -> u64 {
    Agent::DEFAULT_TIMEOUT_SECS
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            timeout_secs: default_run_timeout(),
            instructions: InstructionsPreset::default(),
        }
    }
}

/// Named system instruction presets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstructionsPreset {
    /// Bias the model toward searching before it answers.
    #[default]
    SearchBiased,
    /// Plain assistant prompt that only mentions the search tool.
    Minimal,
}

impl InstructionsPreset {
    /// The system prompt text for this preset.
    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::SearchBiased => instructions::SEARCH_BIASED,
            Self::Minimal => instructions::MINIMAL,
        }
    }
}

/// Web search settings.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SearchConfig {
    /// Maximum results folded into the tool output.
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Per-request timeout in seconds.
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,

    /// Also register the endpoint reachability probe tool.
    #[serde(default)]
    pub probe: bool,
}

const fn default_max_results() -> usize {
    search::DEFAULT_MAX_RESULTS
}

const fn default_search_timeout() -> u64 {
    search::DEFAULT_SEARCH_TIMEOUT_SECS
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_max_results(),
            timeout_secs: default_search_timeout(),
            probe: false,
        }
    }
}
