use thiserror::Error;

/// Failure while parsing a recognized file format into a table.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("Cannot read file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot parse CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Cannot open spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("Cannot parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Structural problems the format parsers don't surface themselves,
    /// e.g. a sheetless workbook or unequal JSON column lengths.
    #[error("{0}")]
    Malformed(String),
    #[error("Unsupported file format: .{0}")]
    UnsupportedExtension(String),
}

/// Terminal failure for one upload request. Every variant maps to a
/// user-visible message; none is retried.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No file selected")]
    EmptyUpload,
    #[error("Invalid file type: .{extension}. Please upload CSV, Excel, JSON, or TXT files.")]
    UnsupportedFileType { extension: String },
    #[error("File is {size} bytes, above the {limit} byte upload limit")]
    TooLarge { size: u64, limit: u64 },
    #[error("Error loading file: {0}")]
    DataLoad(#[from] DataLoadError),
}
