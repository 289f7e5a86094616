pub mod csv_file;
pub mod sample;

use crate::error::AnalyzerError;
use crate::model::SymbolRecord;

pub use csv_file::CsvSource;
pub use sample::SampleSource;

/// Supplies the ordered symbol universe for one analysis run.
pub trait SymbolSource {
    fn name(&self) -> &str;

    fn load(&self) -> Result<Vec<SymbolRecord>, AnalyzerError>;
}
