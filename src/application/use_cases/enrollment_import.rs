// ============================================================
// ENROLLMENT IMPORT USE CASE
// ============================================================
// Orchestrate decoding, header mapping, normalization, validation and upload

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};
use uuid::Uuid;

use super::header_mapper::{HeaderMapper, HeaderMapping};
use super::row_validator::RowValidator;
use super::value_normalizer::ValueNormalizer;
use crate::domain::enrollment::{
    FieldValue, MappedRow, NormalizedRecord, RowOutcome, UpdateMode, ValidationOutcome,
};
use crate::domain::error::{AppError, Result};
use crate::infrastructure::aliases::{HeaderAliasTable, ValueAliasTable};
use crate::infrastructure::config::ImportConfig;
use crate::infrastructure::csv::{decode_bytes, CsvParser, RawTable, TemplateWriter};
use crate::infrastructure::persistence::{PersistenceApi, UploadReceipt, UploadRequest};

/// Enrollment import use case
pub struct EnrollmentImportUseCase {
    config: ImportConfig,
    default_update_mode: UpdateMode,
    header_aliases: &'static HeaderAliasTable,
    value_aliases: &'static ValueAliasTable,
    persistence: Option<Arc<dyn PersistenceApi>>,
}

impl EnrollmentImportUseCase {
    pub fn new(config: ImportConfig) -> Self {
        Self {
            config,
            default_update_mode: UpdateMode::default(),
            header_aliases: HeaderAliasTable::builtin(),
            value_aliases: ValueAliasTable::builtin(),
            persistence: None,
        }
    }

    pub fn with_persistence(mut self, persistence: Arc<dyn PersistenceApi>) -> Self {
        self.persistence = Some(persistence);
        self
    }

    pub fn with_default_update_mode(mut self, mode: UpdateMode) -> Self {
        self.default_update_mode = mode;
        self
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    pub fn default_update_mode(&self) -> UpdateMode {
        self.default_update_mode
    }

    /// Read and validate a file from disk
    pub async fn import_file(&self, path: &Path) -> Result<ValidationOutcome> {
        let metadata = tokio::fs::metadata(path).await?;
        self.check_size(metadata.len())?;

        let bytes = tokio::fs::read(path).await?;
        info!(path = %path.display(), bytes = bytes.len(), "read import file");
        self.import_bytes(&bytes)
    }

    /// Validate raw upload bytes in any supported encoding
    pub fn import_bytes(&self, bytes: &[u8]) -> Result<ValidationOutcome> {
        self.check_size(bytes.len() as u64)?;
        self.import_content(&decode_bytes(bytes))
    }

    pub fn import_content(&self, content: &str) -> Result<ValidationOutcome> {
        let start = Instant::now();

        let table = self.parser().parse_content(content)?;
        let mapping = HeaderMapper::new(self.header_aliases).map_headers(&table.headers);
        if mapping.is_empty() {
            warn!(headers = ?table.headers, "no column matched a known enrollment field");
        }

        let validator = RowValidator::new();
        let rows: Vec<RowOutcome> = self
            .map_rows(&table, &mapping)
            .into_iter()
            .map(|row| validator.validate(row))
            .collect();

        let mut outcome = ValidationOutcome::from_rows(Uuid::new_v4(), rows);
        outcome.mapped_fields = mapping.fields();
        outcome.unmapped_headers = mapping.unmapped;

        info!(
            import_id = %outcome.import_id,
            total = outcome.total_records,
            valid = outcome.valid_records,
            errors = outcome.error_records,
            warnings = outcome.warning_records,
            new = outcome.new_records,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "validated enrollment import"
        );

        Ok(outcome)
    }

    /// Header mapping only, for column previews before a full import
    pub fn preview_mapping(&self, content: &str) -> Result<HeaderMapping> {
        let table = self.parser().parse_content(content)?;
        Ok(HeaderMapper::new(self.header_aliases).map_headers(&table.headers))
    }

    pub fn template_csv(&self) -> Result<String> {
        TemplateWriter::new(self.header_aliases).render()
    }

    /// Forward an outcome's valid rows. Refused while any row has errors.
    pub async fn upload(
        &self,
        outcome: &ValidationOutcome,
        mode: UpdateMode,
    ) -> Result<UploadReceipt> {
        if outcome.has_errors() {
            return Err(AppError::ValidationError(format!(
                "Cannot upload: {} of {} rows have errors",
                outcome.error_records, outcome.total_records
            )));
        }
        if outcome.valid_data.is_empty() {
            return Err(AppError::ValidationError(
                "Cannot upload: no valid records".to_string(),
            ));
        }

        self.upload_records(outcome.import_id, outcome.valid_data.clone(), mode)
            .await
    }

    /// Forward records that were validated elsewhere, e.g. by the upload UI
    pub async fn upload_records(
        &self,
        import_id: Uuid,
        records: Vec<NormalizedRecord>,
        mode: UpdateMode,
    ) -> Result<UploadReceipt> {
        let persistence = self.persistence.as_ref().ok_or_else(|| {
            AppError::ConfigError("No persistence API configured".to_string())
        })?;
        if records.is_empty() {
            return Err(AppError::ValidationError(
                "Cannot upload: no valid records".to_string(),
            ));
        }

        let request = UploadRequest {
            import_id,
            update_mode: mode,
            records,
        };
        let receipt = persistence.upload(&request).await?;

        info!(
            %import_id,
            %mode,
            records = request.records.len(),
            inserted = ?receipt.inserted,
            updated = ?receipt.updated,
            deleted = ?receipt.deleted,
            "uploaded enrollment records"
        );

        Ok(receipt)
    }

    fn parser(&self) -> CsvParser {
        CsvParser::new()
            .with_max_rows(self.config.max_rows)
            .with_auto_detect_delimiter(self.config.auto_detect_delimiter)
    }

    fn check_size(&self, len: u64) -> Result<()> {
        if len > self.config.max_file_bytes {
            return Err(AppError::ValidationError(format!(
                "CSV file is too large ({} bytes), maximum allowed: {} bytes",
                len, self.config.max_file_bytes
            )));
        }
        Ok(())
    }

    /// Pick one cell per mapped field and normalize it
    fn map_rows(&self, table: &RawTable, mapping: &HeaderMapping) -> Vec<MappedRow> {
        let normalizer = ValueNormalizer::new(self.value_aliases);
        let fields = mapping.fields();

        table
            .rows
            .iter()
            .enumerate()
            .map(|(index, cells)| {
                let mut row = MappedRow::new(index);
                for &field in &fields {
                    let cell = mapping
                        .columns_for(field)
                        .into_iter()
                        .filter_map(|m| cells.get(m.column))
                        .map(|cell| cell.trim())
                        .find(|cell| !cell.is_empty());

                    if let Some(raw) = cell {
                        row.fields.insert(
                            field,
                            FieldValue {
                                raw: raw.to_string(),
                                normalized: normalizer.normalize(field, raw),
                            },
                        );
                    }
                }
                row
            })
            .collect()
    }
}
