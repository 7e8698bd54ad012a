#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::core::batch::DEFAULT_PROGRESS_INTERVAL;
use crate::core::cleaner::TextCleaner;
use crate::core::topic::TopicMapping;
use crate::domain::model::TopicTag;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use toml_config::{SummarizerConfig, TomlConfig};

pub const INPUT_EXTENSIONS: [&str; 2] = ["csv", "tsv"];
pub const OUTPUT_EXTENSIONS: [&str; 3] = ["csv", "tsv", "json"];

/// Everything a run needs, fixed before the first row is read.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub summarizer: SummarizerConfig,
    pub topic_aliases: HashMap<String, TopicTag>,
    pub trailing_patterns: Vec<String>,
    pub progress_interval: usize,
}

impl RunConfig {
    /// Defaults for `input_path`, writing next to it.
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        let input_path = input_path.into();
        Self {
            output_path: default_output_path(&input_path),
            input_path,
            summarizer: SummarizerConfig::default(),
            topic_aliases: HashMap::new(),
            trailing_patterns: Vec::new(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Applies the file's settings. `input_path` is taken from the file when it
    /// names one, otherwise from `input_path`.
    pub fn from_toml(toml: &TomlConfig, input_path: Option<PathBuf>) -> Result<Self> {
        let from_file = toml.input.as_ref().map(|i| PathBuf::from(&i.path));
        let input = input_path.or(from_file);
        let input = validation::validate_required_field("input.path", &input)?;

        let mut config = Self::new(input);
        if let Some(output) = &toml.output {
            config.output_path = PathBuf::from(&output.path);
        }
        config.summarizer = toml.summarizer();
        config.topic_aliases = toml.topics.clone().unwrap_or_default();
        config.trailing_patterns = toml.trailing_patterns();
        if let Some(interval) = toml.progress_interval() {
            config.progress_interval = interval;
        }
        Ok(config)
    }

    pub fn topic_mapping(&self) -> Result<TopicMapping> {
        TopicMapping::with_aliases(&self.topic_aliases)
    }

    pub fn text_cleaner(&self) -> Result<TextCleaner> {
        TextCleaner::with_trailing_patterns(&self.trailing_patterns)
    }
}

/// `dir/Posts.csv` becomes `dir/Posts_Transformed.csv`.
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "posts".to_string());
    let ext = input
        .extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_else(|| "csv".to_string());
    input.with_file_name(format!("{}_Transformed.{}", stem, ext))
}

impl Validate for RunConfig {
    fn validate(&self) -> Result<()> {
        let input = self.input_path.to_string_lossy();
        let output = self.output_path.to_string_lossy();
        validation::validate_path("input.path", &input)?;
        validation::validate_file_extension("input.path", &input, &INPUT_EXTENSIONS)?;
        validation::validate_path("output.path", &output)?;
        validation::validate_file_extension("output.path", &output, &OUTPUT_EXTENSIONS)?;
        validation::validate_positive_number("pipeline.progress_interval", self.progress_interval, 1)?;
        self.summarizer.validate()?;
        self.topic_mapping()?;
        self.text_cleaner()?;
        Ok(())
    }
}
