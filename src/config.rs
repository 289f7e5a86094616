use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AnalyzerError;

/// Run-level parameters for one analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Distance of the written strikes from spot, in percent.
    pub margin_percent: f64,
    /// Scales each symbol's exchange lot size.
    pub lot_multiplier: f64,
    /// Strike grid spacing.
    pub strike_interval: f64,
    pub days_to_expiry: u32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            margin_percent: 15.0,
            lot_multiplier: 1.0,
            strike_interval: 50.0,
            days_to_expiry: 30,
        }
    }
}

/// Per-field overrides, typically from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub margin_percent: Option<f64>,
    pub lot_multiplier: Option<f64>,
    pub strike_interval: Option<f64>,
    pub days_to_expiry: Option<u32>,
}

impl AnalysisConfig {
    /// Load a config from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self, AnalyzerError> {
        let contents = std::fs::read_to_string(path)?;
        let config: AnalysisConfig = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Resolve the effective config: optional file, then overrides, then validation.
    pub fn resolve(path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, AnalyzerError> {
        let base = match path {
            Some(p) => Self::load(p)?,
            None => Self::default(),
        };
        let config = base.with_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn with_overrides(mut self, overrides: &ConfigOverrides) -> Self {
        if let Some(v) = overrides.margin_percent {
            self.margin_percent = v;
        }
        if let Some(v) = overrides.lot_multiplier {
            self.lot_multiplier = v;
        }
        if let Some(v) = overrides.strike_interval {
            self.strike_interval = v;
        }
        if let Some(v) = overrides.days_to_expiry {
            self.days_to_expiry = v;
        }
        self
    }

    /// Reject values that break the metric arithmetic outright.
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        if !self.margin_percent.is_finite() {
            return Err(AnalyzerError::Config(format!(
                "margin_percent must be finite, got {}",
                self.margin_percent
            )));
        }
        if !self.lot_multiplier.is_finite() {
            return Err(AnalyzerError::Config(format!(
                "lot_multiplier must be finite, got {}",
                self.lot_multiplier
            )));
        }
        if !(self.strike_interval.is_finite() && self.strike_interval > 0.0) {
            return Err(AnalyzerError::Config(format!(
                "strike_interval must be positive, got {}",
                self.strike_interval
            )));
        }
        if self.days_to_expiry == 0 {
            return Err(AnalyzerError::Config(
                "days_to_expiry must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let c = AnalysisConfig::default();
        assert_eq!(c.margin_percent, 15.0);
        assert_eq!(c.lot_multiplier, 1.0);
        assert_eq!(c.strike_interval, 50.0);
        assert_eq!(c.days_to_expiry, 30);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let c: AnalysisConfig = serde_json::from_str(r#"{"margin_percent": 10}"#).unwrap();
        assert_eq!(c.margin_percent, 10.0);
        assert_eq!(c.days_to_expiry, 30);
    }

    #[test]
    fn test_overrides_win() {
        let overrides = ConfigOverrides {
            lot_multiplier: Some(2.0),
            days_to_expiry: Some(7),
            ..Default::default()
        };
        let c = AnalysisConfig::default().with_overrides(&overrides);
        assert_eq!(c.margin_percent, 15.0);
        assert_eq!(c.lot_multiplier, 2.0);
        assert_eq!(c.days_to_expiry, 7);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut c = AnalysisConfig::default();
        c.strike_interval = 0.0;
        assert!(matches!(c.validate(), Err(AnalyzerError::Config(_))));

        let mut c = AnalysisConfig::default();
        c.days_to_expiry = 0;
        assert!(c.validate().is_err());

        let mut c = AnalysisConfig::default();
        c.margin_percent = f64::NAN;
        assert!(c.validate().is_err());
    }

    #[test]
    fn test_resolve_from_file() {
        let path = std::env::temp_dir().join(format!("oa_config_{}.json", std::process::id()));
        std::fs::write(&path, r#"{"margin_percent": 20, "lot_multiplier": 3}"#).unwrap();
        let overrides = ConfigOverrides {
            margin_percent: Some(5.0),
            ..Default::default()
        };
        let c = AnalysisConfig::resolve(Some(&path), &overrides).unwrap();
        assert_eq!(c.margin_percent, 5.0);
        assert_eq!(c.lot_multiplier, 3.0);
        std::fs::remove_file(&path).ok();
    }
}
