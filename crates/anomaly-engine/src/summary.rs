//! Aggregates over a Result Set

use crate::result::{AnomalyResult, RuleOutcome};
use serde::Serialize;
use std::collections::BTreeMap;

/// Fired / clear / not-applicable tallies for one rule
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuleCount {
    pub fired: usize,
    pub clear: usize,
    pub not_applicable: usize,
}

impl RuleCount {
    fn record(&mut self, outcome: RuleOutcome) {
        match outcome {
            RuleOutcome::Fired => self.fired += 1,
            RuleOutcome::Clear => self.clear += 1,
            RuleOutcome::NotApplicable(_) => self.not_applicable += 1,
        }
    }
}

/// Per-building rollup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildingSummary {
    pub building_id: String,
    pub installations: usize,
    pub anomalous: usize,
}

/// Counts over a full run, for rendering and reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    /// Installations classified
    pub installations: usize,
    /// Installations with at least one fired rule
    pub anomalous: usize,
    /// Tallies for the absolute low-consumption rule
    pub low_winter_consumption: RuleCount,
    /// Tallies for the building-average rule
    pub below_building_average: RuleCount,
    /// Tallies for the sudden-drop rule
    pub sudden_drop: RuleCount,
    /// Per-building rollups, in building-id order
    pub buildings: Vec<BuildingSummary>,
}

impl AnalysisSummary {
    /// Aggregate a result set
    pub fn from_results(results: &[AnomalyResult]) -> Self {
        let mut low_winter_consumption = RuleCount::default();
        let mut below_building_average = RuleCount::default();
        let mut sudden_drop = RuleCount::default();
        let mut by_building: BTreeMap<&str, (usize, usize)> = BTreeMap::new();

        for result in results {
            low_winter_consumption.record(result.low_winter_consumption);
            below_building_average.record(result.below_building_average);
            sudden_drop.record(result.sudden_drop);

            let entry = by_building.entry(result.building_id.as_str()).or_default();
            entry.0 += 1;
            if result.anomalous {
                entry.1 += 1;
            }
        }

        Self {
            installations: results.len(),
            anomalous: results.iter().filter(|r| r.anomalous).count(),
            low_winter_consumption,
            below_building_average,
            sudden_drop,
            buildings: by_building
                .into_iter()
                .map(|(building_id, (installations, anomalous))| BuildingSummary {
                    building_id: building_id.to_string(),
                    installations,
                    anomalous,
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::{Evidence, SkipReason};
    use consumption_model::WinterSeason;

    fn result(installation: &str, building: &str, rule1: RuleOutcome) -> AnomalyResult {
        AnomalyResult {
            installation_id: installation.to_string(),
            building_id: building.to_string(),
            season: Some(WinterSeason(2023)),
            low_winter_consumption: rule1,
            below_building_average: RuleOutcome::Clear,
            sudden_drop: RuleOutcome::NotApplicable(SkipReason::NoPriorWinter),
            anomalous: rule1.fired(),
            evidence: Evidence::default(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let results = vec![
            result("T1", "B2", RuleOutcome::Fired),
            result("T2", "B1", RuleOutcome::Clear),
            result("T3", "B1", RuleOutcome::Fired),
        ];
        let summary = AnalysisSummary::from_results(&results);

        assert_eq!(summary.installations, 3);
        assert_eq!(summary.anomalous, 2);
        assert_eq!(summary.low_winter_consumption.fired, 2);
        assert_eq!(summary.low_winter_consumption.clear, 1);
        assert_eq!(summary.sudden_drop.not_applicable, 3);

        // Building order is deterministic
        assert_eq!(summary.buildings[0].building_id, "B1");
        assert_eq!(summary.buildings[0].installations, 2);
        assert_eq!(summary.buildings[0].anomalous, 1);
        assert_eq!(summary.buildings[1].building_id, "B2");
    }

    #[test]
    fn test_empty_results() {
        let summary = AnalysisSummary::from_results(&[]);
        assert_eq!(summary.installations, 0);
        assert!(summary.buildings.is_empty());
    }
}
