// Adapters layer: concrete implementations for external systems (files, http).

pub mod csv_source;
pub mod output_writer;
pub mod remote_summarizer;

pub use csv_source::CsvPostSource;
pub use output_writer::{OutputFormat, OutputWriter};
pub use remote_summarizer::{RemoteSummarizer, RemoteSummarizerConfig};
