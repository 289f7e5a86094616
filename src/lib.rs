pub mod chart;
pub mod config;
pub mod error;
pub mod metrics;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod report;
pub mod source;

pub use config::AnalysisConfig;
pub use error::AnalyzerError;
pub use model::{AnalysisRow, OptionType, SymbolRecord};
