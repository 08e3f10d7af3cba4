//! Analysis Parameters

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Parameter errors
#[derive(Debug, Error)]
pub enum ParamError {
    /// Value outside its documented range
    #[error("{param} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        param: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Config file or environment could not be loaded
    #[error("failed to load parameters: {0}")]
    Load(#[from] config::ConfigError),
}

/// Classification thresholds.
///
/// Percentages are whole numbers and converted to fractions at the point
/// of use. Each field has a documented range enforced by [`validate`].
///
/// [`validate`]: AnalysisParams::validate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    /// Winter reading below this volume is suspicious (m³/month, 10-100)
    pub winter_low_threshold_m3: f64,

    /// Flags winter consumption below this percentage of the building
    /// peer average (30-90)
    pub building_average_ratio_pct: u32,

    /// Flags a drop from the prior winter of at least this percentage (40-90)
    pub sudden_drop_ratio_pct: u32,

    /// Prior winter must reach this volume for the drop rule to apply
    /// (m³, 50-200)
    pub min_prior_winter_m3: f64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            winter_low_threshold_m3: 30.0,
            building_average_ratio_pct: 60,
            sudden_drop_ratio_pct: 70,
            min_prior_winter_m3: 100.0,
        }
    }
}

impl AnalysisParams {
    /// Aggressive preset: flags more installations
    pub fn strict() -> Self {
        Self {
            winter_low_threshold_m3: 50.0,
            building_average_ratio_pct: 75,
            sudden_drop_ratio_pct: 50,
            min_prior_winter_m3: 60.0,
        }
    }

    /// Conservative preset: flags only pronounced cases
    pub fn lenient() -> Self {
        Self {
            winter_low_threshold_m3: 15.0,
            building_average_ratio_pct: 40,
            sudden_drop_ratio_pct: 85,
            min_prior_winter_m3: 150.0,
        }
    }

    /// Load parameters from an optional config file and `GASWATCH_`-prefixed
    /// environment variables, on top of the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ParamError> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("winter_low_threshold_m3", defaults.winter_low_threshold_m3)?
            .set_default(
                "building_average_ratio_pct",
                i64::from(defaults.building_average_ratio_pct),
            )?
            .set_default(
                "sudden_drop_ratio_pct",
                i64::from(defaults.sudden_drop_ratio_pct),
            )?
            .set_default("min_prior_winter_m3", defaults.min_prior_winter_m3)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let params: Self = builder
            .add_source(Environment::with_prefix("GASWATCH").try_parsing(true))
            .build()?
            .try_deserialize()?;
        params.validate()?;
        Ok(params)
    }

    /// Check every field against its documented range
    pub fn validate(&self) -> Result<(), ParamError> {
        check_range(
            "winter_low_threshold_m3",
            self.winter_low_threshold_m3,
            10.0,
            100.0,
        )?;
        check_range(
            "building_average_ratio_pct",
            f64::from(self.building_average_ratio_pct),
            30.0,
            90.0,
        )?;
        check_range(
            "sudden_drop_ratio_pct",
            f64::from(self.sudden_drop_ratio_pct),
            40.0,
            90.0,
        )?;
        check_range("min_prior_winter_m3", self.min_prior_winter_m3, 50.0, 200.0)?;
        Ok(())
    }
}

fn check_range(param: &'static str, value: f64, min: f64, max: f64) -> Result<(), ParamError> {
    if value < min || value > max {
        Err(ParamError::OutOfRange {
            param,
            value,
            min,
            max,
        })
    } else {
        Ok(())
    }
}
