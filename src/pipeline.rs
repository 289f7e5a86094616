use std::path::PathBuf;

use tracing::{error, info, warn};

use crate::chart;
use crate::config::AnalysisConfig;
use crate::error::AnalyzerError;
use crate::metrics;
use crate::model::AnalysisRow;
use crate::report;
use crate::source::SymbolSource;

/// Where a run writes its outputs. `None` means a timestamped default name.
#[derive(Debug, Clone, Default)]
pub struct OutputPaths {
    pub report: Option<PathBuf>,
    pub chart: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

/// Files produced by one run. A `None` entry was skipped for lack of data.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub symbols: usize,
    pub report: Option<PathBuf>,
    pub chart: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

/// Load records from `source` and compute one row per record.
pub fn analyze_source(
    source: &dyn SymbolSource,
    config: &AnalysisConfig,
) -> Result<Vec<AnalysisRow>, AnalyzerError> {
    info!(source = source.name(), "Starting options analysis...");
    let records = source.load()?;
    let rows = metrics::analyze(&records, config);
    info!("Analysis completed for {} symbols", rows.len());
    Ok(rows)
}

/// Run the full pipeline: analyze, then write the workbook and the dashboard.
///
/// The two output stages are independent: a failure in one is logged and
/// the other still runs; the first failure is returned afterwards. An empty
/// universe is not an error, both outputs are skipped with a warning.
pub fn run(
    source: &dyn SymbolSource,
    config: &AnalysisConfig,
    outputs: &OutputPaths,
) -> Result<RunSummary, AnalyzerError> {
    info!(
        margin_percent = config.margin_percent,
        lot_multiplier = config.lot_multiplier,
        strike_interval = config.strike_interval,
        days_to_expiry = config.days_to_expiry,
        "Configuration"
    );
    let rows = analyze_source(source, config)?;

    let mut summary = RunSummary {
        symbols: rows.len(),
        ..Default::default()
    };
    let mut first_error = None;

    summary.report = settle(
        "report",
        report::write_workbook(&rows, outputs.report.as_deref()),
        &mut first_error,
    );
    summary.chart = settle(
        "chart",
        chart::render_dashboard(&rows, outputs.chart.as_deref()),
        &mut first_error,
    );
    if let Some(path) = &outputs.json {
        summary.json = settle("json", report::write_json(&rows, path), &mut first_error);
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(summary),
    }
}

fn settle(
    stage: &str,
    result: Result<PathBuf, AnalyzerError>,
    first_error: &mut Option<AnalyzerError>,
) -> Option<PathBuf> {
    match result {
        Ok(path) => Some(path),
        Err(AnalyzerError::NoData) => {
            warn!(stage, "No data to export. Skipping.");
            None
        }
        Err(e) => {
            error!(stage, "{e}");
            if first_error.is_none() {
                *first_error = Some(e);
            }
            None
        }
    }
}

pub fn print_summary(summary: &RunSummary) {
    let skipped = || "(skipped: no data)".to_string();
    let show = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
    println!("\n{}", "═".repeat(60));
    println!("  ANALYSIS COMPLETE");
    println!("{}", "═".repeat(60));
    println!("  Symbols:      {}", summary.symbols);
    println!("  Excel Report: {}", show(&summary.report).unwrap_or_else(skipped));
    println!("  Graphs:       {}", show(&summary.chart).unwrap_or_else(skipped));
    if let Some(json) = show(&summary.json) {
        println!("  JSON:         {json}");
    }
    println!("{}", "═".repeat(60));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SymbolRecord;
    use crate::source::SampleSource;

    struct EmptySource;

    impl SymbolSource for EmptySource {
        fn name(&self) -> &str {
            "empty"
        }

        fn load(&self) -> Result<Vec<SymbolRecord>, AnalyzerError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_analyze_source_sample() {
        let rows = analyze_source(&SampleSource, &AnalysisConfig::default()).unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[1].symbol, "BANKNIFTY");
        assert_eq!(rows[1].ce_strike, 37800.0);
        assert_eq!(rows[1].pe_strike, 51150.0);
    }

    #[test]
    fn test_empty_run_skips_outputs() {
        let dir = std::env::temp_dir();
        let outputs = OutputPaths {
            report: Some(dir.join(format!("oa_run_empty_{}.xlsx", std::process::id()))),
            chart: Some(dir.join(format!("oa_run_empty_{}.png", std::process::id()))),
            json: None,
        };
        let summary = run(&EmptySource, &AnalysisConfig::default(), &outputs).unwrap();
        assert_eq!(summary.symbols, 0);
        assert!(summary.report.is_none());
        assert!(summary.chart.is_none());
        assert!(!outputs.report.as_ref().unwrap().exists());
        assert!(!outputs.chart.as_ref().unwrap().exists());
    }

    #[test]
    fn test_settle_keeps_first_error() {
        let mut first = None;
        assert!(settle("a", Err(AnalyzerError::Chart("boom".into())), &mut first).is_none());
        assert!(settle("b", Err(AnalyzerError::Config("late".into())), &mut first).is_none());
        assert!(settle("c", Err(AnalyzerError::NoData), &mut first).is_none());
        assert!(matches!(first, Some(AnalyzerError::Chart(_))));
        assert_eq!(
            settle("d", Ok(PathBuf::from("x.xlsx")), &mut first),
            Some(PathBuf::from("x.xlsx"))
        );
    }
}
