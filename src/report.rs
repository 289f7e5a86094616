use std::path::{Path, PathBuf};

use rust_xlsxwriter::{Format, Workbook};
use tracing::{debug, info};

use crate::error::AnalyzerError;
use crate::model::{AnalysisRow, Cell, REPORT_HEADERS};
use crate::output;

pub const SHEET_NAME: &str = "Options Analysis";
pub const MAX_COLUMN_WIDTH: usize = 20;
const COLUMN_PADDING: usize = 2;

/// Width per column: longest cell text or header, padded, capped at 20.
pub fn column_widths(rows: &[AnalysisRow]) -> Vec<usize> {
    let mut widths: Vec<usize> = REPORT_HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.to_string().chars().count());
        }
    }
    widths
        .into_iter()
        .map(|w| (w + COLUMN_PADDING).min(MAX_COLUMN_WIDTH))
        .collect()
}

/// Write the rows to a single-sheet workbook and return the path written.
///
/// Without `filename`, writes `Options_Analysis_YYYYMMDD_HHMMSS.xlsx` in the
/// working directory. An existing file at the path is replaced.
pub fn write_workbook(
    rows: &[AnalysisRow],
    filename: Option<&Path>,
) -> Result<PathBuf, AnalyzerError> {
    if rows.is_empty() {
        return Err(AnalyzerError::NoData);
    }
    let path = output::resolve_filename(filename, "Options_Analysis", "xlsx");

    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in REPORT_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }
    for (i, row) in rows.iter().enumerate() {
        let r = i as u32 + 1;
        for (col, cell) in row.cells().into_iter().enumerate() {
            match cell {
                Cell::Text(s) => worksheet.write_string(r, col as u16, s)?,
                Cell::Number(n) => worksheet.write_number(r, col as u16, n)?,
            };
        }
    }
    for (col, width) in column_widths(rows).into_iter().enumerate() {
        worksheet.set_column_width(col as u16, width as f64)?;
    }

    workbook.save(&path)?;
    debug!(rows = rows.len(), path = %path.display(), "workbook written");
    info!("Excel file saved: {}", path.display());
    Ok(path)
}

/// Pretty-printed JSON array of the rows, keyed by report header.
pub fn write_json(rows: &[AnalysisRow], path: &Path) -> Result<PathBuf, AnalyzerError> {
    if rows.is_empty() {
        return Err(AnalyzerError::NoData);
    }
    let json = serde_json::to_string_pretty(rows)?;
    std::fs::write(path, json)?;
    info!("JSON saved: {}", path.display());
    Ok(path.to_path_buf())
}

pub fn print_table(rows: &[AnalysisRow]) {
    println!("\n{}", "═".repeat(132));
    println!("  Options Analysis");
    println!("{}", "═".repeat(132));
    println!(
        "  {:<12} {:>9} {:>9} {:>9} {:>6} {:>7} {:>9} {:>9} {:>8} {:>9} {:>9} {:>8} {:>6}",
        "Symbol",
        "Spot",
        "52W Hi",
        "52W Lo",
        "Pctl",
        "Lot",
        "CE Strk",
        "CE Prem",
        "CE IRR%",
        "PE Strk",
        "PE Prem",
        "PE IRR%",
        "Mrg%",
    );
    println!("  {}", "-".repeat(126));
    for r in rows {
        println!(
            "  {:<12} {:>9.2} {:>9.2} {:>9.2} {:>6.2} {:>7} {:>9.0} {:>9.2} {:>8.2} {:>9.0} {:>9.2} {:>8.2} {:>6}",
            r.symbol,
            r.spot_price,
            r.high_52w,
            r.low_52w,
            r.percentile,
            r.adjusted_lot_size,
            r.ce_strike,
            r.ce_premium,
            r.ce_irr,
            r.pe_strike,
            r.pe_premium,
            r.pe_irr,
            r.margin_percent_used,
        );
    }
    println!("{}", "═".repeat(132));
    println!("  {} symbols", rows.len());
}
