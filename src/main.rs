use anyhow::Context;
use clap::Parser;
use confess_etl::core::preview::{format_preview, preview_with};
use confess_etl::domain::ports::PostSource;
use confess_etl::utils::error::ErrorSeverity;
use confess_etl::utils::logger;
use confess_etl::{
    CliConfig, CsvPipeline, CsvPostSource, EtlEngine, EtlError, RowTransformer, RuleBasedSummarizer,
    RunConfig, TopicExtractor,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting confess-etl");
    tracing::debug!("CLI arguments: {:?}", cli);

    let config = match cli.resolve() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if let Some(rows) = cli.preview {
        return run_preview(&config, rows).await;
    }

    let pipeline = CsvPipeline::from_config(&config).context("failed to set up the pipeline")?;
    let engine = EtlEngine::new(pipeline);

    let outcome = match engine.run().await {
        Ok(outcome) => outcome,
        Err(e) => exit_with(e),
    };

    println!("{}", outcome.result.stats);
    match outcome.write {
        Ok(written) => {
            println!("✅ Transformation completed in {:.2?}", outcome.elapsed);
            if let Some(backup) = &written.backup {
                println!("💾 Previous output backed up to: {}", backup.display());
            }
            if written.used_fallback {
                println!("⚠️ Primary output could not be written; saved to fallback file instead");
            }
            println!("📁 Output saved to: {}", written.path.display());
        }
        Err(e) => exit_with(e),
    }

    Ok(())
}

/// Transforms the first rows with rule-based summaries and prints them; writes nothing.
async fn run_preview(config: &RunConfig, rows: usize) -> anyhow::Result<()> {
    let posts = CsvPostSource::new(&config.input_path)
        .read_posts()
        .with_context(|| format!("failed to read {}", config.input_path.display()))?;

    let transformer = RowTransformer::new(
        TopicExtractor::new(config.topic_mapping()?),
        config.text_cleaner()?,
        Box::new(RuleBasedSummarizer::new(
            config.summarizer.max_chars,
            config.summarizer.min_sentence_chars,
        )),
        RuleBasedSummarizer::new(config.summarizer.max_chars, config.summarizer.min_sentence_chars),
    );

    let preview = preview_with(&transformer, &posts, rows).await;
    print!("{}", format_preview(&preview));
    Ok(())
}

fn exit_with(e: EtlError) -> ! {
    tracing::error!(
        "❌ ETL process failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
