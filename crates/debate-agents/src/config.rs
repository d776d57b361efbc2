//! Provider and debate runtime configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (applied by `cli::Cli::resolve_config`)
//! 2. Environment variables (`BUYSKIP_*`, `GROQ_API_KEY`)
//! 3. TOML config file (`--config`)
//! 4. Built-in defaults (DeepSeek R1 distill on Groq's OpenAI-compatible API)
//!
//! Configuration lives on the instance; nothing here is process-global.

use std::path::Path;
use std::time::Duration;

use deliberation::{DebateConfig, DecisionPolicy};
use rig::providers::openai;
use serde::{Deserialize, Serialize};

use crate::error::AgentError;

/// Default OpenAI-compatible base URL.
const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// Default model for every role.
const DEFAULT_MODEL: &str = "deepseek-r1-distill-llama-70b";
/// Per-call timeout; a timed-out round is spent.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
/// Retries per agent call on transient HTTP errors.
const DEFAULT_MAX_RETRIES: u32 = 2;
/// Concurrent debates in batch mode.
const DEFAULT_MAX_PARALLEL_DEBATES: usize = 4;

const ENV_BASE_URL: &str = "BUYSKIP_BASE_URL";
const ENV_API_KEY: &str = "BUYSKIP_API_KEY";
const ENV_GROQ_API_KEY: &str = "GROQ_API_KEY";
const ENV_MODEL: &str = "BUYSKIP_MODEL";
const ENV_ROUNDS_PER_SIDE: &str = "BUYSKIP_ROUNDS_PER_SIDE";

/// OpenAI-compatible inference endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL (e.g. `https://api.groq.com/openai/v1`).
    pub base_url: String,
    /// API key; required before any agent is built.
    pub api_key: Option<String>,
    /// Model used for all four roles.
    pub model: String,
    /// Timeout for a single agent call, retries included.
    pub request_timeout_secs: u64,
    /// Retries on transient errors (429, 502, 503, connection failures).
    pub max_retries: u32,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl ProviderConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Top-level configuration for the debate agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentsConfig {
    pub provider: ProviderConfig,
    /// Temperature for the pro and con advocates.
    pub advocate_temperature: f64,
    /// Temperature for the judge and formatter (lower = more deterministic).
    pub judge_temperature: f64,
    /// Pro rounds (and Con rounds) per debate.
    pub rounds_per_side: u32,
    /// Upper bound on concurrently running debates in batch mode.
    pub max_parallel_debates: usize,
    /// Verdict thresholds.
    pub policy: DecisionPolicy,
}

impl Default for AgentsConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            advocate_temperature: 0.7,
            judge_temperature: 0.1,
            rounds_per_side: 1,
            max_parallel_debates: DEFAULT_MAX_PARALLEL_DEBATES,
            policy: DecisionPolicy::default(),
        }
    }
}

impl AgentsConfig {
    /// Parse a TOML document. Missing keys take their defaults.
    pub fn from_toml_str(raw: &str, origin: &Path) -> Result<Self, AgentError> {
        toml::from_str(raw).map_err(|source| AgentError::ConfigParse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load from an optional TOML file, then layer the environment on top.
    pub fn load(path: Option<&Path>) -> Result<Self, AgentError> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path).map_err(|source| {
                    AgentError::ConfigRead {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                Self::from_toml_str(&raw, path)?
            }
            None => Self::default(),
        };
        config.apply_env()?;
        Ok(config)
    }

    /// Apply process environment overrides.
    pub fn apply_env(&mut self) -> Result<(), AgentError> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup (the environment in production).
    ///
    /// A variable that is set but not parseable is a configuration error.
    pub fn apply_env_from(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), AgentError> {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.provider.base_url = url;
        }
        if let Some(model) = lookup(ENV_MODEL) {
            self.provider.model = model;
        }
        if let Some(key) = lookup(ENV_API_KEY).or_else(|| lookup(ENV_GROQ_API_KEY)) {
            self.provider.api_key = Some(key);
        }
        if let Some(raw) = lookup(ENV_ROUNDS_PER_SIDE) {
            self.rounds_per_side = raw.trim().parse::<u32>().map_err(|e| {
                AgentError::Configuration(format!(
                    "{ENV_ROUNDS_PER_SIDE} must be a non-negative integer, got {raw:?}: {e}"
                ))
            })?;
        }
        Ok(())
    }

    /// Validate all fields.
    pub fn validate(&self) -> Result<(), AgentError> {
        if self.provider.base_url.trim().is_empty() {
            return Err(AgentError::Configuration("provider.base_url is empty".into()));
        }
        if self.provider.model.trim().is_empty() {
            return Err(AgentError::Configuration("provider.model is empty".into()));
        }
        if self.provider.request_timeout_secs == 0 {
            return Err(AgentError::Configuration(
                "provider.request_timeout_secs must be > 0".into(),
            ));
        }
        for (name, value) in [
            ("advocate_temperature", self.advocate_temperature),
            ("judge_temperature", self.judge_temperature),
        ] {
            if !(0.0..=2.0).contains(&value) {
                return Err(AgentError::Configuration(format!(
                    "{name} must be in [0, 2], got {value}"
                )));
            }
        }
        if self.max_parallel_debates == 0 {
            return Err(AgentError::Configuration(
                "max_parallel_debates must be > 0".into(),
            ));
        }
        self.debate_config()
            .validate()
            .map_err(AgentError::Configuration)
    }

    /// Orchestrator settings derived from this config.
    pub fn debate_config(&self) -> DebateConfig {
        DebateConfig {
            rounds_per_side: self.rounds_per_side,
            policy: self.policy,
        }
    }

    /// The API key, or a configuration error naming the variables to set.
    pub fn api_key(&self) -> Result<&str, AgentError> {
        self.provider
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                AgentError::Configuration(format!(
                    "no API key: set {ENV_API_KEY} or {ENV_GROQ_API_KEY}, or provider.api_key in the config file"
                ))
            })
    }

    /// Build a rig OpenAI-compatible client for the configured provider.
    pub fn client(&self) -> Result<openai::CompletionsClient, AgentError> {
        openai::CompletionsClient::builder()
            .api_key(self.api_key()?)
            .base_url(&self.provider.base_url)
            .build()
            .map_err(|e| AgentError::ClientBuild(e.to_string()))
    }
}

/// Check if an inference endpoint is reachable (GET `<url>/models`).
pub async fn check_endpoint(url: &str, api_key: Option<&str>) -> bool {
    let models_url = format!("{}/models", url.trim_end_matches('/'));
    let mut request = reqwest::Client::new()
        .get(&models_url)
        .timeout(Duration::from_secs(5));
    if let Some(key) = api_key {
        request = request.bearer_auth(key);
    }
    match request.send().await {
        Ok(resp) => resp.status().is_success(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn default_config_validates() {
        let cfg = AgentsConfig::default();
        cfg.validate().expect("default config should be valid");
        assert_eq!(cfg.provider.model, DEFAULT_MODEL);
        assert_eq!(cfg.debate_config(), DebateConfig::default());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let raw = r#"
            rounds_per_side = 2

            [provider]
            model = "llama-3.3-70b-versatile"

            [policy]
            buy_margin = 25
        "#;
        let cfg = AgentsConfig::from_toml_str(raw, Path::new("test.toml")).unwrap();
        assert_eq!(cfg.rounds_per_side, 2);
        assert_eq!(cfg.provider.model, "llama-3.3-70b-versatile");
        assert_eq!(cfg.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.policy.buy_margin, 25);
        assert_eq!(cfg.policy.skip_margin, 15);
        assert_eq!(cfg.max_parallel_debates, DEFAULT_MAX_PARALLEL_DEBATES);
    }

    #[test]
    fn bad_toml_is_parse_error() {
        let err = AgentsConfig::from_toml_str("rounds_per_side = \"two\"", Path::new("x.toml"))
            .unwrap_err();
        assert!(matches!(err, AgentError::ConfigParse { .. }));
    }

    #[test]
    fn env_overrides_file_values() {
        let mut cfg = AgentsConfig::default();
        cfg.apply_env_from(lookup(&[
            (ENV_MODEL, "mixtral"),
            (ENV_BASE_URL, "http://localhost:8080/v1"),
            (ENV_ROUNDS_PER_SIDE, "3"),
        ]))
        .unwrap();
        assert_eq!(cfg.provider.model, "mixtral");
        assert_eq!(cfg.provider.base_url, "http://localhost:8080/v1");
        assert_eq!(cfg.rounds_per_side, 3);
    }

    #[test]
    fn malformed_rounds_env_is_configuration_error() {
        let mut cfg = AgentsConfig::default();
        let err = cfg
            .apply_env_from(lookup(&[(ENV_ROUNDS_PER_SIDE, "two")]))
            .unwrap_err();
        assert!(matches!(err, AgentError::Configuration(_)));
        assert!(err.to_string().contains(ENV_ROUNDS_PER_SIDE));
        assert_eq!(cfg.rounds_per_side, 1);
    }

    #[test]
    fn buyskip_key_wins_over_groq_key() {
        let mut cfg = AgentsConfig::default();
        cfg.apply_env_from(lookup(&[(ENV_API_KEY, "primary"), (ENV_GROQ_API_KEY, "groq")]))
            .unwrap();
        assert_eq!(cfg.api_key().unwrap(), "primary");

        let mut cfg = AgentsConfig::default();
        cfg.apply_env_from(lookup(&[(ENV_GROQ_API_KEY, "groq")])).unwrap();
        assert_eq!(cfg.api_key().unwrap(), "groq");
    }

    #[test]
    fn missing_api_key_is_configuration_error() {
        let cfg = AgentsConfig::default();
        assert!(matches!(cfg.api_key(), Err(AgentError::Configuration(_))));
        assert!(cfg.client().is_err());
    }

    #[test]
    fn invalid_values_rejected() {
        let mut cfg = AgentsConfig::default();
        cfg.rounds_per_side = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AgentsConfig::default();
        cfg.advocate_temperature = 3.0;
        assert!(cfg.validate().is_err());

        let mut cfg = AgentsConfig::default();
        cfg.max_parallel_debates = 0;
        assert!(cfg.validate().is_err());

        let mut cfg = AgentsConfig::default();
        cfg.provider.model = " ".into();
        assert!(cfg.validate().is_err());

        let mut cfg = AgentsConfig::default();
        cfg.policy.skip_margin = -5;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("buyskip.toml");
        std::fs::write(&path, "judge_temperature = 0.0\n").unwrap();
        let cfg = AgentsConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.judge_temperature, 0.0);
    }

    #[test]
    fn load_missing_file_is_read_error() {
        let err = AgentsConfig::load(Some(Path::new("/nonexistent/buyskip.toml"))).unwrap_err();
        assert!(matches!(err, AgentError::ConfigRead { .. }));
    }
}
