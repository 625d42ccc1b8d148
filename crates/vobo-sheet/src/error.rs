use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    /// The file is missing or not a readable workbook archive.
    #[error("failed to open workbook {path}: {reason}")]
    Open { path: String, reason: String },

    #[error("sheet not found: {0}")]
    MissingSheet(String),

    #[error("failed to read sheet {sheet}: {reason}")]
    Read { sheet: String, reason: String },
}
