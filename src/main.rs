use anyhow::Context;
use clap::Parser;

use options_analyzer::config::AnalysisConfig;
use options_analyzer::pipeline::{self, OutputPaths};
use options_analyzer::report;
use options_analyzer::source::{self, CsvSource, SampleSource, SymbolSource};

mod cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_target(false)
        .init();

    match cli.command {
        cli::Command::Run {
            params,
            report,
            chart,
            json,
        } => {
            let (config, source) = prepare(&params)?;
            let summary = pipeline::run(
                source.as_ref(),
                &config,
                &OutputPaths {
                    report,
                    chart,
                    json,
                },
            )?;
            pipeline::print_summary(&summary);
            Ok(())
        }
        cli::Command::Table { params, json } => {
            let (config, source) = prepare(&params)?;
            let rows = pipeline::analyze_source(source.as_ref(), &config)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else {
                report::print_table(&rows);
            }
            Ok(())
        }
        cli::Command::Symbols => {
            source::sample::print_csv()?;
            Ok(())
        }
    }
}

fn prepare(params: &cli::AnalysisArgs) -> anyhow::Result<(AnalysisConfig, Box<dyn SymbolSource>)> {
    let config = AnalysisConfig::resolve(params.config.as_deref(), &params.overrides())
        .context("loading analysis config")?;
    let source: Box<dyn SymbolSource> = match &params.input {
        Some(path) => Box::new(CsvSource::new(path)),
        None => Box::new(SampleSource),
    };
    Ok((config, source))
}
