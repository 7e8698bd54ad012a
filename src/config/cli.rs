use super::toml_config::{SummarizerMode, TomlConfig};
use super::RunConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "confess-etl")]
#[command(about = "Adds topics and summaries to an exported confession channel CSV")]
pub struct CliConfig {
    /// Input CSV (or TSV) with post_id, timestamp and text columns
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file; .csv, .tsv or .json. Defaults to <input>_Transformed.<ext>
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, help = "Summarizer used for the whole run")]
    pub summarizer: Option<SummarizerMode>,

    #[arg(long, help = "Model name for the remote summarizer")]
    pub model: Option<String>,

    #[arg(long, help = "Upper bound for rule-based summaries, in characters")]
    pub max_chars: Option<usize>,

    /// Print the transformation of the first N rows and exit without writing
    #[arg(long, value_name = "N")]
    pub preview: Option<usize>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Merges the TOML file (if any) with command line overrides.
    pub fn resolve(&self) -> Result<RunConfig> {
        let toml = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                let toml = TomlConfig::from_file(path)?;
                toml.validate()?;
                toml
            }
            None => TomlConfig::default(),
        };

        let mut config = RunConfig::from_toml(&toml, self.input.clone())?;
        if let Some(output) = &self.output {
            config.output_path = output.clone();
        }
        if let Some(mode) = self.summarizer {
            tracing::info!("🔧 Summarizer overridden to: {:?}", mode);
            config.summarizer.mode = mode;
        }
        if let Some(model) = &self.model {
            config.summarizer.remote.model = model.clone();
        }
        if let Some(max_chars) = self.max_chars {
            config.summarizer.max_chars = max_chars;
        }

        config.validate()?;
        Ok(config)
    }
}
