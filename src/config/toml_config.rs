use crate::adapters::remote_summarizer::RemoteSummarizerConfig;
use crate::core::summarizer::{DEFAULT_MAX_CHARS, DEFAULT_MIN_SENTENCE_CHARS};
use crate::domain::model::TopicTag;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub input: Option<InputConfig>,
    pub output: Option<OutputConfig>,
    pub summarizer: Option<SummarizerConfig>,
    /// Extra hashtag markers, e.g. `study = "studies"`.
    pub topics: Option<HashMap<String, TopicTag>>,
    pub cleaner: Option<CleanerConfig>,
    pub pipeline: Option<PipelineConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum SummarizerMode {
    #[default]
    Rule,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub mode: SummarizerMode,
    pub max_chars: usize,
    pub min_sentence_chars: usize,
    pub remote: RemoteSummarizerConfig,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            mode: SummarizerMode::Rule,
            max_chars: DEFAULT_MAX_CHARS,
            min_sentence_chars: DEFAULT_MIN_SENTENCE_CHARS,
            remote: RemoteSummarizerConfig::default(),
        }
    }
}

impl Validate for SummarizerConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_positive_number("summarizer.max_chars", self.max_chars, 1)?;
        if self.mode == SummarizerMode::Remote {
            let remote = &self.remote;
            validation::validate_url("summarizer.remote.endpoint", &remote.endpoint)?;
            validation::validate_non_empty_string("summarizer.remote.model", &remote.model)?;
            validation::validate_non_empty_string("summarizer.remote.api_key_env", &remote.api_key_env)?;
            validation::validate_positive_number(
                "summarizer.remote.max_tokens",
                remote.max_tokens as usize,
                1,
            )?;
            validation::validate_range("summarizer.remote.temperature", remote.temperature, 0.0, 2.0)?;
            validation::validate_positive_number(
                "summarizer.remote.timeout_seconds",
                remote.timeout_seconds as usize,
                1,
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleanerConfig {
    #[serde(default)]
    pub trailing_patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub progress_interval: Option<usize>,
}

impl TomlConfig {
    /// Loads and parses a TOML configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| EtlError::ConfigError {
            message: format!("cannot read {}: {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables are left as is.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn summarizer(&self) -> SummarizerConfig {
        self.summarizer.clone().unwrap_or_default()
    }

    pub fn trailing_patterns(&self) -> Vec<String> {
        self.cleaner
            .as_ref()
            .map(|c| c.trailing_patterns.clone())
            .unwrap_or_default()
    }

    pub fn progress_interval(&self) -> Option<usize> {
        self.pipeline.as_ref().and_then(|p| p.progress_interval)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(input) = &self.input {
            validation::validate_path("input.path", &input.path)?;
        }
        if let Some(output) = &self.output {
            validation::validate_path("output.path", &output.path)?;
        }
        if let Some(interval) = self.progress_interval() {
            validation::validate_positive_number("pipeline.progress_interval", interval, 1)?;
        }
        self.summarizer().validate()
    }
}
