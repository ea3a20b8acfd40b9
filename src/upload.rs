use std::io::Write;
use std::path::Path;

use indexmap::IndexMap;
use serde::Serialize;

use crate::charts::generate::generate;
use crate::charts::spec::ChartSpec;
use crate::data::loader::load_file;
use crate::data::table::Table;
use crate::error::{AnalysisError, DataLoadError};
use crate::processing::characteristics::{extract, DatasetCharacteristics};

/// Uploads above this size are rejected before staging.
pub const MAX_UPLOAD_BYTES: u64 = 16 * 1024 * 1024;

/// File extensions the pipeline accepts.
pub const ALLOWED_EXTENSIONS: &[&str] = &["csv", "xlsx", "xls", "json", "txt"];

/// Whether a filename carries an extension this pipeline accepts.
pub fn allowed_file(filename: &str) -> bool {
    extension_of(filename)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn extension_of(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

/// Keep the ASCII alphanumerics, dots, dashes and underscores of an
/// uploaded filename's stem; everything else becomes an underscore.
fn sanitize_stem(filename: &str) -> String {
    let stem = filename
        .rsplit_once('.')
        .map(|(stem, _)| stem)
        .unwrap_or(filename);
    let sanitized: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if sanitized.is_empty() {
        "upload".to_string()
    } else {
        sanitized
    }
}

fn validate_upload(filename: &str, size: u64) -> Result<String, AnalysisError> {
    if filename.trim().is_empty() {
        return Err(AnalysisError::EmptyUpload);
    }
    let extension = extension_of(filename).unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AnalysisError::UnsupportedFileType { extension });
    }
    if size > MAX_UPLOAD_BYTES {
        return Err(AnalysisError::TooLarge {
            size,
            limit: MAX_UPLOAD_BYTES,
        });
    }
    Ok(extension)
}

/// An upload written to the staging directory under a collision-safe
/// name, keeping the original extension so the loader can dispatch on
/// it. The file is removed when this value is dropped, so a staged
/// upload never outlives its request, success or failure.
pub struct StagedUpload {
    file: tempfile::NamedTempFile,
}

impl StagedUpload {
    pub fn stage(
        staging_dir: &Path,
        filename: &str,
        contents: &[u8],
    ) -> Result<StagedUpload, AnalysisError> {
        let extension = validate_upload(filename, contents.len() as u64)?;

        std::fs::create_dir_all(staging_dir).map_err(DataLoadError::Io)?;
        let mut file = tempfile::Builder::new()
            .prefix(&format!("{}-", sanitize_stem(filename)))
            .suffix(&format!(".{extension}"))
            .tempfile_in(staging_dir)
            .map_err(DataLoadError::Io)?;
        file.write_all(contents).map_err(DataLoadError::Io)?;
        file.flush().map_err(DataLoadError::Io)?;

        Ok(StagedUpload { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// The hand-off contract to the presentation layer: everything a
/// renderer needs to show one analyzed dataset.
#[derive(Debug, Serialize)]
pub struct RenderContext {
    pub filename: String,
    pub characteristics: DatasetCharacteristics,
    pub visualizations: IndexMap<String, ChartSpec>,
}

/// Extract characteristics and generate chart specs for a loaded table.
pub fn analyze_table(table: &Table) -> (DatasetCharacteristics, IndexMap<String, ChartSpec>) {
    let characteristics = extract(table);
    let visualizations = generate(table, &characteristics);
    (characteristics, visualizations)
}

/// Run the full pipeline for one uploaded payload: validate, stage,
/// load, extract, generate. The staged file is gone by the time this
/// returns, whatever the outcome.
pub fn analyze_upload(
    staging_dir: &Path,
    filename: &str,
    contents: &[u8],
) -> Result<RenderContext, AnalysisError> {
    let staged = StagedUpload::stage(staging_dir, filename, contents)?;
    let table = load_file(staged.path())?;
    tracing::info!(
        rows = table.row_count,
        columns = table.column_count(),
        "loaded {filename}"
    );

    let (characteristics, visualizations) = analyze_table(&table);
    tracing::debug!(charts = visualizations.len(), "analysis complete");

    Ok(RenderContext {
        filename: filename.to_string(),
        characteristics,
        visualizations,
    })
}
