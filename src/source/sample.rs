use crate::error::AnalyzerError;
use crate::model::SymbolRecord;

use super::SymbolSource;

/// Fixed NSE universe with illustrative prices. Stands in for a live
/// market-data provider.
#[derive(Debug, Default, Clone, Copy)]
pub struct SampleSource;

impl SampleSource {
    pub fn records() -> Vec<SymbolRecord> {
        vec![
            SymbolRecord::new("NIFTY", 19500.0, 20000.0, 18000.0, 50),
            SymbolRecord::new("BANKNIFTY", 44500.0, 46000.0, 42000.0, 25),
            SymbolRecord::new("RELIANCE", 2450.0, 2650.0, 2250.0, 250),
            SymbolRecord::new("TCS", 3600.0, 3850.0, 3200.0, 125),
            SymbolRecord::new("INFY", 1480.0, 1600.0, 1350.0, 300),
            SymbolRecord::new("HDFCBANK", 1650.0, 1750.0, 1450.0, 550),
            SymbolRecord::new("ICICIBANK", 950.0, 1050.0, 850.0, 1375),
            SymbolRecord::new("SBIN", 590.0, 650.0, 520.0, 1500),
            SymbolRecord::new("BHARTIARTL", 880.0, 950.0, 750.0, 1220),
            SymbolRecord::new("HINDUNILVR", 2580.0, 2800.0, 2350.0, 300),
        ]
    }
}

impl SymbolSource for SampleSource {
    fn name(&self) -> &str {
        "sample"
    }

    fn load(&self) -> Result<Vec<SymbolRecord>, AnalyzerError> {
        Ok(Self::records())
    }
}

/// Print the sample universe as CSV, usable as a template for `--input`.
pub fn print_csv() -> Result<(), AnalyzerError> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for record in SampleSource::records() {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}
