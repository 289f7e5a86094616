use std::fmt;

use serde::{Deserialize, Serialize};

/// One underlying as supplied by a data source.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SymbolRecord {
    pub symbol: String,
    pub spot_price: f64,
    pub high_52w: f64,
    pub low_52w: f64,
    pub lot_size: u32,
}

impl SymbolRecord {
    pub fn new(symbol: &str, spot_price: f64, high_52w: f64, low_52w: f64, lot_size: u32) -> Self {
        Self {
            symbol: symbol.to_string(),
            spot_price,
            high_52w,
            low_52w,
            lot_size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionType {
    Call,
    Put,
}

impl OptionType {
    /// Exchange designation: `CE` for calls, `PE` for puts.
    pub fn code(&self) -> &'static str {
        match self {
            OptionType::Call => "CE",
            OptionType::Put => "PE",
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Column headers of the report, in `AnalysisRow` field order.
pub const REPORT_HEADERS: [&str; 13] = [
    "Symbol",
    "Spot Price",
    "52W High",
    "52W Low",
    "Percentile",
    "Lot Size",
    "CE Strike",
    "CE Premium",
    "CE IRR",
    "PE Strike",
    "PE Premium",
    "PE IRR",
    "Margin Used (%)",
];

/// A single report cell: either text or a number.
///
/// Numbers display with their fractional part kept, so `3290.0` stays
/// `3290.0` rather than `3290`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell<'a> {
    Text(&'a str),
    Number(f64),
}

impl fmt::Display for Cell<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{n:?}"),
        }
    }
}

/// Derived metrics for one symbol. Serialized names match the report headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRow {
    #[serde(rename = "Symbol")]
    pub symbol: String,
    #[serde(rename = "Spot Price")]
    pub spot_price: f64,
    #[serde(rename = "52W High")]
    pub high_52w: f64,
    #[serde(rename = "52W Low")]
    pub low_52w: f64,
    #[serde(rename = "Percentile")]
    pub percentile: f64,
    #[serde(rename = "Lot Size")]
    pub adjusted_lot_size: f64,
    #[serde(rename = "CE Strike")]
    pub ce_strike: f64,
    #[serde(rename = "CE Premium")]
    pub ce_premium: f64,
    #[serde(rename = "CE IRR")]
    pub ce_irr: f64,
    #[serde(rename = "PE Strike")]
    pub pe_strike: f64,
    #[serde(rename = "PE Premium")]
    pub pe_premium: f64,
    #[serde(rename = "PE IRR")]
    pub pe_irr: f64,
    #[serde(rename = "Margin Used (%)")]
    pub margin_percent_used: f64,
}

impl AnalysisRow {
    /// Cells in `REPORT_HEADERS` order.
    pub fn cells(&self) -> [Cell<'_>; 13] {
        [
            Cell::Text(&self.symbol),
            Cell::Number(self.spot_price),
            Cell::Number(self.high_52w),
            Cell::Number(self.low_52w),
            Cell::Number(self.percentile),
            Cell::Number(self.adjusted_lot_size),
            Cell::Number(self.ce_strike),
            Cell::Number(self.ce_premium),
            Cell::Number(self.ce_irr),
            Cell::Number(self.pe_strike),
            Cell::Number(self.pe_premium),
            Cell::Number(self.pe_irr),
            Cell::Number(self.margin_percent_used),
        ]
    }

    pub fn strike(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => self.ce_strike,
            OptionType::Put => self.pe_strike,
        }
    }

    pub fn premium(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => self.ce_premium,
            OptionType::Put => self.pe_premium,
        }
    }

    pub fn irr(&self, option_type: OptionType) -> f64 {
        match option_type {
            OptionType::Call => self.ce_irr,
            OptionType::Put => self.pe_irr,
        }
    }

    /// Premium as a percentage of strike; 0 when the strike is 0.
    pub fn premium_to_strike_pct(&self, option_type: OptionType) -> f64 {
        let strike = self.strike(option_type);
        if strike == 0.0 {
            return 0.0;
        }
        self.premium(option_type) / strike * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_names_match_headers() {
        let row = AnalysisRow {
            symbol: "SBIN".into(),
            spot_price: 590.0,
            high_52w: 650.0,
            low_52w: 520.0,
            percentile: 53.85,
            adjusted_lot_size: 1500.0,
            ce_strike: 500.0,
            ce_premium: 101.8,
            ce_irr: 1651.42,
            pe_strike: 700.0,
            pe_premium: 121.8,
            pe_irr: 1411.33,
            margin_percent_used: 15.0,
        };
        let json = serde_json::to_value(&row).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        for header in REPORT_HEADERS {
            assert!(keys.contains(&header), "missing {header}");
        }
        assert_eq!(row.cells().len(), REPORT_HEADERS.len());
        assert_eq!(row.cells()[0], Cell::Text("SBIN"));
    }

    #[test]
    fn test_option_type_codes() {
        assert_eq!(OptionType::Call.to_string(), "CE");
        assert_eq!(OptionType::Put.to_string(), "PE");
    }

    #[test]
    fn test_number_cell_keeps_fraction() {
        assert_eq!(Cell::Number(3290.0).to_string(), "3290.0");
        assert_eq!(Cell::Number(1607.56).to_string(), "1607.56");
        assert_eq!(Cell::Text("NIFTY").to_string(), "NIFTY");
    }
}
