//! Benchmark configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (applied by the binary)
//! 2. Values in the TOML file
//! 3. Environment variables (`MAD_BASE_URL`, `MAD_API_KEY`, `MAD_MODEL`)
//! 4. Built-in defaults
//!
//! ```toml
//! [gateway]
//! model = "glm-4.5-flash"
//!
//! [dataset]
//! source = "hub"
//! max_questions = 20
//!
//! [evaluation]
//! strategy = "chateval"
//! parallel_fanout = true
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::strategies::StrategyKind;

const DEFAULT_BASE_URL: &str = "https://api.apiyi.com/v1";
const DEFAULT_MODEL: &str = "glm-4.5-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_LOCAL_PATH: &str = "./data/mmlu_pro_validation.jsonl";
const DEFAULT_HUB_DATASET: &str = "TIGER-Lab/MMLU-Pro";
const DEFAULT_HUB_CONFIG: &str = "default";
const DEFAULT_HUB_SPLIT: &str = "validation";

const DEFAULT_TEMPERATURE: f32 = 0.3;
const DEFAULT_MAX_TOKENS: u32 = 500;
const DEFAULT_REQUEST_DELAY_SECS: f64 = 0.5;
const DEFAULT_RESULTS_DIR: &str = "./logs";

/// Environment variables feeding gateway defaults.
pub const ENV_BASE_URL: &str = "MAD_BASE_URL";
pub const ENV_API_KEY: &str = "MAD_API_KEY";
pub const ENV_MODEL: &str = "MAD_MODEL";

// ── Gateway ─────────────────────────────────────────────────────────

/// Chat-completion endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySettings {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    /// Per-request timeout.
    pub timeout_secs: u64,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }
}

impl GatewaySettings {
    /// Defaults resolved through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            base_url: lookup(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            api_key: lookup(ENV_API_KEY).unwrap_or_default(),
            model: lookup(ENV_MODEL).unwrap_or_else(|| DEFAULT_MODEL.into()),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// ── Dataset ─────────────────────────────────────────────────────────

/// Where questions come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum DatasetSource {
    /// A JSONL/JSON snapshot on disk.
    Local,
    /// The Hugging Face datasets-server API.
    Hub,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetSettings {
    pub source: DatasetSource,
    pub local_path: PathBuf,
    pub hub_name: String,
    pub hub_config: String,
    pub hub_split: String,
    /// Evaluate only the first N questions; `None` or 0 means all.
    pub max_questions: Option<usize>,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            source: DatasetSource::Local,
            local_path: PathBuf::from(DEFAULT_LOCAL_PATH),
            hub_name: DEFAULT_HUB_DATASET.into(),
            hub_config: DEFAULT_HUB_CONFIG.into(),
            hub_split: DEFAULT_HUB_SPLIT.into(),
            max_questions: None,
        }
    }
}

// ── Evaluation ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationSettings {
    pub strategy: StrategyKind,
    /// Sampling temperature for non-final calls.
    pub temperature: f32,
    /// Token cap for non-final calls.
    pub max_tokens: u32,
    /// Pause between questions.
    pub request_delay_secs: f64,
    pub save_results: bool,
    pub results_dir: PathBuf,
    /// Single-agent: reason step by step instead of answering directly.
    pub single_agent_step_by_step: bool,
    /// ChatEval: issue each judge round's three calls concurrently.
    pub parallel_fanout: bool,
}

impl Default for EvaluationSettings {
    fn default() -> Self {
        Self {
            strategy: StrategyKind::AngelDemon,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            request_delay_secs: DEFAULT_REQUEST_DELAY_SECS,
            save_results: true,
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            single_agent_step_by_step: false,
            parallel_fanout: false,
        }
    }
}

impl EvaluationSettings {
    pub fn request_delay(&self) -> Duration {
        Duration::from_secs_f64(self.request_delay_secs.max(0.0))
    }
}

// ── Top level ───────────────────────────────────────────────────────

/// Full benchmark configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    pub gateway: GatewaySettings,
    pub dataset: DatasetSettings,
    pub evaluation: EvaluationSettings,
}

impl BenchConfig {
    /// Parse TOML; missing keys fall back to environment and defaults.
    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check invariants the run depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: &str| Err(ConfigError::Invalid(msg.to_string()));

        if self.gateway.base_url.trim().is_empty() {
            return invalid("gateway.base_url must not be empty");
        }
        if self.gateway.model.trim().is_empty() {
            return invalid("gateway.model must not be empty");
        }
        if self.gateway.timeout_secs == 0 {
            return invalid("gateway.timeout_secs must be > 0");
        }

        let eval = &self.evaluation;
        if !eval.temperature.is_finite() || eval.temperature < 0.0 {
            return invalid("evaluation.temperature must be a finite value >= 0");
        }
        if eval.max_tokens == 0 {
            return invalid("evaluation.max_tokens must be > 0");
        }
        if !eval.request_delay_secs.is_finite() || eval.request_delay_secs < 0.0 {
            return invalid("evaluation.request_delay_secs must be a finite value >= 0");
        }

        match self.dataset.source {
            DatasetSource::Local if self.dataset.local_path.as_os_str().is_empty() => {
                invalid("dataset.local_path is required for a local source")
            }
            DatasetSource::Hub if self.dataset.hub_name.trim().is_empty() => {
                invalid("dataset.hub_name is required for a hub source")
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BenchConfig::default();
        assert_eq!(config.gateway.timeout_secs, 30);
        assert_eq!(config.evaluation.temperature, 0.3);
        assert_eq!(config.evaluation.max_tokens, 500);
        assert_eq!(config.evaluation.request_delay(), Duration::from_millis(500));
        assert!(config.evaluation.save_results);
        assert!(!config.evaluation.parallel_fanout);
        assert_eq!(config.dataset.source, DatasetSource::Local);
        assert_eq!(config.dataset.max_questions, None);
    }

    #[test]
    fn test_env_lookup_feeds_gateway() {
        let settings = GatewaySettings::from_lookup(|key| match key {
            ENV_BASE_URL => Some("http://localhost:8000/v1".into()),
            ENV_MODEL => Some("qwen".into()),
            _ => None,
        });
        assert_eq!(settings.base_url, "http://localhost:8000/v1");
        assert_eq!(settings.model, "qwen");
        assert_eq!(settings.api_key, "");
    }

    #[test]
    fn test_toml_overrides_and_keeps_defaults() {
        let config = BenchConfig::from_toml_str(
            r#"
            [gateway]
            model = "glm-4.5-air"
            timeout_secs = 60

            [dataset]
            source = "hub"
            max_questions = 20

            [evaluation]
            strategy = "chateval"
            parallel_fanout = true
            "#,
        )
        .unwrap();

        assert_eq!(config.gateway.model, "glm-4.5-air");
        assert_eq!(config.gateway.timeout_secs, 60);
        assert_eq!(config.dataset.source, DatasetSource::Hub);
        assert_eq!(config.dataset.hub_name, "TIGER-Lab/MMLU-Pro");
        assert_eq!(config.dataset.max_questions, Some(20));
        assert_eq!(config.evaluation.strategy, StrategyKind::ChatEval);
        assert!(config.evaluation.parallel_fanout);
        assert_eq!(config.evaluation.max_tokens, 500);
    }

    #[test]
    fn test_unknown_strategy_rejected() {
        let err = BenchConfig::from_toml_str("[evaluation]\nstrategy = \"tree_of_thought\"\n");
        assert!(err.is_err());
    }

    #[test]
    fn test_validate() {
        assert!(BenchConfig::default().validate().is_ok());

        let mut config = BenchConfig::default();
        config.evaluation.temperature = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = BenchConfig::default();
        config.evaluation.max_tokens = 0;
        assert!(config.validate().is_err());

        let mut config = BenchConfig::default();
        config.evaluation.request_delay_secs = -1.0;
        assert!(config.validate().is_err());

        let mut config = BenchConfig::default();
        config.gateway.model = "  ".into();
        assert!(config.validate().is_err());

        let mut config = BenchConfig::default();
        config.dataset.local_path = PathBuf::new();
        assert!(config.validate().is_err());
        config.dataset.source = DatasetSource::Hub;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bench.toml");
        std::fs::write(&path, "[evaluation\n").unwrap();
        let err = BenchConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("bench.toml"));
    }
}
