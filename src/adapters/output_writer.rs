use crate::domain::model::{TransformedPost, WriteResult};
use crate::domain::ports::PostSink;
use crate::utils::error::{EtlError, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const OUTPUT_COLUMNS: [&str; 5] = ["post_id", "timestamp", "topic", "summary", "text"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    /// Picks the format from the file extension, defaulting to CSV.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .as_deref()
        {
            Some("tsv") => OutputFormat::Tsv,
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Csv,
        }
    }
}

fn local_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// `dir/name.ext` becomes `dir/name_<suffix>.ext`.
pub fn sibling_path(destination: &Path, suffix: &str) -> PathBuf {
    let stem = destination
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    let name = match destination.extension() {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}_{}", stem, suffix),
    };
    destination.with_file_name(name)
}

/// First of `dir/name_<suffix>.ext`, `dir/name_<suffix>_1.ext`, ... that does not exist.
fn unused_sibling(destination: &Path, suffix: &str) -> PathBuf {
    let mut candidate = sibling_path(destination, suffix);
    let mut n = 1;
    while candidate.exists() {
        candidate = sibling_path(destination, &format!("{}_{}", suffix, n));
        n += 1;
    }
    candidate
}

/// Persists the transformed table without ever silently replacing an
/// earlier output.
///
/// `CheckExisting -> [Backup] -> WritePrimary -> (on failure) WriteFallback`.
/// An existing file is renamed to `<name>_backup_<timestamp>.<ext>`. If that
/// rename fails the table goes to `<name>_<timestamp>.<ext>` instead. A failed
/// primary write is retried once at `<name>_fallback_<timestamp>.<ext>`.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    timestamp: fn() -> String,
}

impl Default for OutputWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputWriter {
    pub fn new() -> Self {
        Self {
            timestamp: local_timestamp,
        }
    }

    /// Fixed clock, for reproducible file names.
    pub fn with_timestamp_fn(timestamp: fn() -> String) -> Self {
        Self { timestamp }
    }

    pub fn write(&self, rows: &[TransformedPost], destination: &Path) -> Result<WriteResult> {
        let stamp = (self.timestamp)();

        let mut backup = None;
        let mut primary = destination.to_path_buf();
        if destination.is_file() {
            tracing::warn!("Output file already exists: {}", destination.display());
            let backup_path = unused_sibling(destination, &format!("backup_{}", stamp));
            match fs::rename(destination, &backup_path) {
                Ok(()) => {
                    tracing::info!("💾 Existing file backed up as: {}", backup_path.display());
                    backup = Some(backup_path);
                }
                Err(e) => {
                    primary = unused_sibling(destination, &stamp);
                    tracing::warn!(
                        "Could not back up {} ({}); writing to {} instead",
                        destination.display(),
                        e,
                        primary.display()
                    );
                }
            }
        }

        let primary_err = match write_table(rows, &primary) {
            Ok(()) => {
                tracing::info!("📁 Wrote {} rows to {}", rows.len(), primary.display());
                return Ok(WriteResult {
                    path: primary,
                    backup,
                    used_fallback: false,
                    rows_written: rows.len(),
                });
            }
            Err(e) => e,
        };

        let fallback = unused_sibling(destination, &format!("fallback_{}", stamp));
        tracing::error!(
            "❌ Writing {} failed: {}; trying {}",
            primary.display(),
            primary_err,
            fallback.display()
        );

        match write_table(rows, &fallback) {
            Ok(()) => {
                tracing::info!("📁 Saved to fallback file: {}", fallback.display());
                Ok(WriteResult {
                    path: fallback,
                    backup,
                    used_fallback: true,
                    rows_written: rows.len(),
                })
            }
            Err(fallback_err) => {
                tracing::error!("❌ Fallback write failed: {}", fallback_err);
                Err(EtlError::PersistenceError {
                    path: primary.display().to_string(),
                    fallback: fallback.display().to_string(),
                    message: format!("{}; fallback: {}", primary_err, fallback_err),
                })
            }
        }
    }
}

impl PostSink for OutputWriter {
    fn write(&self, rows: &[TransformedPost], destination: &Path) -> Result<WriteResult> {
        OutputWriter::write(self, rows, destination)
    }
}

fn write_table(rows: &[TransformedPost], path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path)?;
    match OutputFormat::from_path(path) {
        OutputFormat::Csv => write_delimited(rows, file, b','),
        OutputFormat::Tsv => write_delimited(rows, file, b'\t'),
        OutputFormat::Json => {
            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, rows)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
            Ok(())
        }
    }
}

fn write_delimited(rows: &[TransformedPost], file: File, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .from_writer(BufWriter::new(file));

    // Written by hand so an empty table still gets a header row.
    writer.write_record(OUTPUT_COLUMNS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}
