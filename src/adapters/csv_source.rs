use crate::domain::model::RawPost;
use crate::domain::ports::PostSource;
use crate::utils::error::{EtlError, Result};
use std::borrow::Cow;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

pub const REQUIRED_COLUMNS: [&str; 3] = ["post_id", "timestamp", "text"];

/// Reads `post_id`, `timestamp` and `text` from a delimited export. Other
/// columns are ignored and column order is free.
#[derive(Debug, Clone)]
pub struct CsvPostSource {
    path: PathBuf,
    delimiter: u8,
}

impl CsvPostSource {
    /// Tab separated when the file ends in `.tsv`, comma otherwise.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let delimiter = match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
            _ => b',',
        };
        Self { path, delimiter }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_from<R: Read>(&self, reader: R) -> Result<Vec<RawPost>> {
        let label = self.path.display().to_string();
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .from_reader(reader);

        let headers = rdr.byte_headers()?.clone();
        let mut indices = [0usize; 3];
        for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| String::from_utf8_lossy(h).trim().eq_ignore_ascii_case(column))
                .ok_or_else(|| EtlError::InputError {
                    path: label.clone(),
                    message: format!("missing required column '{}'", column),
                })?;
        }

        let mut posts = Vec::new();
        for record in rdr.byte_records() {
            let record = record?;
            let field = |index: usize| -> String {
                record
                    .get(index)
                    .map(String::from_utf8_lossy)
                    .map(Cow::into_owned)
                    .unwrap_or_default()
            };
            posts.push(RawPost {
                post_id: field(indices[0]).trim().to_string(),
                timestamp: field(indices[1]).trim().to_string(),
                text: field(indices[2]),
            });
        }

        tracing::debug!("Read {} rows from {}", posts.len(), label);
        Ok(posts)
    }
}

impl PostSource for CsvPostSource {
    fn read_posts(&self) -> Result<Vec<RawPost>> {
        let file = File::open(&self.path).map_err(|e| EtlError::InputError {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        self.read_from(file)
    }
}
