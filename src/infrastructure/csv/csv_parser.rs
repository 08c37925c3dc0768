// ============================================================
// CSV PARSER
// ============================================================
// Parse partner-school exports with encoding detection and file-level checks

use crate::domain::error::{AppError, Result};
use csv::{ReaderBuilder, Trim};
use encoding_rs::{Encoding, WINDOWS_1252};
use tracing::{debug, warn};

/// Header line plus data rows, cells aligned to headers
#[derive(Debug, Clone, Default)]
pub struct RawTable {
    /// Column names as written in the file
    pub headers: Vec<String>,

    /// Data rows; short rows padded with empty cells, surplus cells dropped
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// CSV parser with delimiter detection
pub struct CsvParser {
    /// Pick the delimiter from the content instead of using a comma
    auto_detect_delimiter: bool,

    /// Maximum number of data rows accepted
    max_rows: usize,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self {
            auto_detect_delimiter: false,
            max_rows: 10_000,
        }
    }
}

impl CsvParser {
    /// Create a new CSV parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_auto_detect_delimiter(mut self, enabled: bool) -> Self {
        self.auto_detect_delimiter = enabled;
        self
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    /// Parse CSV content from string
    pub fn parse_content(&self, content: &str) -> Result<RawTable> {
        if content.trim().is_empty() {
            return Err(AppError::ValidationError("CSV file is empty".to_string()));
        }

        let delimiter = if self.auto_detect_delimiter {
            Self::detect_delimiter(content)
        } else {
            b','
        };

        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .trim(Trim::All)
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(str::to_string)
            .collect();

        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(AppError::ValidationError(
                "CSV file has no header row".to_string(),
            ));
        }

        let mut rows = Vec::new();
        let mut skipped = 0usize;

        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;

            if record.iter().all(|cell| cell.trim().is_empty()) {
                skipped += 1;
                continue;
            }

            if rows.len() >= self.max_rows {
                return Err(AppError::ValidationError(format!(
                    "CSV file has too many rows, maximum allowed: {}",
                    self.max_rows
                )));
            }

            let cells = (0..headers.len())
                .map(|i| record.get(i).unwrap_or("").to_string())
                .collect();
            rows.push(cells);
        }

        if skipped > 0 {
            debug!(skipped, "skipped blank CSV rows");
        }

        if rows.is_empty() {
            return Err(AppError::ValidationError(
                "CSV file must contain a header row and at least one data row".to_string(),
            ));
        }

        Ok(RawTable { headers, rows })
    }

    /// Detect delimiter from content (comma, semicolon, tab, pipe)
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];
        let sample_lines: Vec<&str> = content.lines().take(10).collect();

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        if sample_lines.is_empty() {
            return best_delimiter;
        }

        for &delimiter in &candidates {
            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            // Score by consistency (low standard deviation) and frequency
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());

            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}

/// Decode file bytes to text.
///
/// A BOM wins; otherwise UTF-8 is tried and Windows-1252 is the fallback,
/// which is what spreadsheet software on partner-school machines tends to emit.
pub fn decode_bytes(bytes: &[u8]) -> String {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        if had_errors {
            warn!(encoding = encoding.name(), "replaced malformed sequences while decoding");
        }
        return text.into_owned();
    }

    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => {
            debug!("content is not UTF-8, decoding as windows-1252");
            let (text, _, had_errors) = WINDOWS_1252.decode(bytes);
            if had_errors {
                warn!("replaced malformed sequences while decoding windows-1252");
            }
            text.into_owned()
        }
    }
}
