use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("No data to export. Run the analysis first.")]
    NoData,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Workbook error: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),

    #[error("Chart rendering error: {0}")]
    Chart(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AnalyzerError {
    /// True for the empty-input condition, which callers treat as non-fatal.
    pub fn is_no_data(&self) -> bool {
        matches!(self, AnalyzerError::NoData)
    }
}
