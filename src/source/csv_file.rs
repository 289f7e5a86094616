use std::path::PathBuf;

use crate::error::AnalyzerError;
use crate::model::SymbolRecord;

use super::SymbolSource;

/// Symbol records from a CSV file with a
/// `symbol,spot_price,high_52w,low_52w,lot_size` header. Row order is kept.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SymbolSource for CsvSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn load(&self) -> Result<Vec<SymbolRecord>, AnalyzerError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&self.path)?;
        let rows = rdr
            .deserialize()
            .collect::<Result<Vec<SymbolRecord>, _>>()?;
        Ok(rows)
    }
}
