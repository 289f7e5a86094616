use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use options_analyzer::config::ConfigOverrides;

/// Options analyzer: strike selection, synthetic premiums and annualized
/// returns for NSE option writers, exported as a spreadsheet and a chart
/// dashboard.
#[derive(Parser)]
#[command(name = "options-analyzer", version, about)]
pub struct Cli {
    /// Log debug detail
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Analyze the symbol universe and write the Excel report and graphs
    Run {
        #[command(flatten)]
        params: AnalysisArgs,

        /// Excel report path (default: Options_Analysis_<timestamp>.xlsx)
        #[arg(long)]
        report: Option<PathBuf>,

        /// Dashboard image path, .png or .svg (default: Options_Analysis_Graphs_<timestamp>.png)
        #[arg(long)]
        chart: Option<PathBuf>,

        /// Also write the analysis rows as JSON to this file
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Analyze and print the results to stdout without writing files
    Table {
        #[command(flatten)]
        params: AnalysisArgs,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the built-in sample universe as CSV (template for --input)
    Symbols,
}

#[derive(Args)]
pub struct AnalysisArgs {
    /// Strike distance from spot in percent (default: 15)
    #[arg(long)]
    pub margin_percent: Option<f64>,

    /// Lot size multiplier (default: 1)
    #[arg(long)]
    pub lot_multiplier: Option<f64>,

    /// Strike grid interval (default: 50)
    #[arg(long)]
    pub strike_interval: Option<f64>,

    /// Days to expiry used to annualize returns (default: 30)
    #[arg(long)]
    pub days_to_expiry: Option<u32>,

    /// JSON config file; flags override its values
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// CSV of symbol,spot_price,high_52w,low_52w,lot_size (default: built-in sample)
    #[arg(long)]
    pub input: Option<PathBuf>,
}

impl AnalysisArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            margin_percent: self.margin_percent,
            lot_multiplier: self.lot_multiplier,
            strike_interval: self.strike_interval,
            days_to_expiry: self.days_to_expiry,
        }
    }
}
