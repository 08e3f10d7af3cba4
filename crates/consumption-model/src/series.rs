//! Per-Installation Consumption Series

use crate::period::{Period, WinterSeason};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One installation-month reading
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// Metered service point (tesisat) identifier
    pub installation_id: String,
    /// Building (bina) the installation belongs to
    pub building_id: String,
    /// Calendar month of the reading
    pub period: Period,
    /// Consumption volume in m³, non-negative
    pub consumption: f64,
}

/// Ordered monthly consumption history of one installation.
///
/// Built during ingestion, read-only during a classification run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallationSeries {
    installation_id: String,
    building_id: String,
    readings: BTreeMap<Period, f64>,
}

impl InstallationSeries {
    /// Create an empty series
    pub fn new(installation_id: impl Into<String>, building_id: impl Into<String>) -> Self {
        Self {
            installation_id: installation_id.into(),
            building_id: building_id.into(),
            readings: BTreeMap::new(),
        }
    }

    /// Installation identifier
    pub fn installation_id(&self) -> &str {
        &self.installation_id
    }

    /// Building identifier
    pub fn building_id(&self) -> &str {
        &self.building_id
    }

    /// Insert a reading. Returns true if it replaced an earlier reading
    /// for the same period (last write wins).
    pub fn insert(&mut self, period: Period, consumption: f64) -> bool {
        self.readings.insert(period, consumption).is_some()
    }

    /// Reading for one period, if present
    pub fn get(&self, period: Period) -> Option<f64> {
        self.readings.get(&period).copied()
    }

    /// Number of readings
    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Whether the series has no readings
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// All readings in period order
    pub fn readings(&self) -> impl Iterator<Item = (Period, f64)> + '_ {
        self.readings.iter().map(|(p, v)| (*p, *v))
    }

    /// Readings falling in the given winter season, in period order
    pub fn winter_readings(&self, season: WinterSeason) -> Vec<f64> {
        season
            .months()
            .iter()
            .filter_map(|p| self.get(*p))
            .collect()
    }

    /// Mean winter consumption for the season, or None without winter data
    pub fn winter_mean(&self, season: WinterSeason) -> Option<f64> {
        let readings = self.winter_readings(season);
        if readings.is_empty() {
            return None;
        }
        Some(readings.iter().sum::<f64>() / readings.len() as f64)
    }

    /// Most recent winter season with at least one reading
    pub fn latest_winter_season(&self) -> Option<WinterSeason> {
        self.readings
            .keys()
            .filter_map(Period::winter_season)
            .max()
    }
}
