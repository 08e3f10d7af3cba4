//! Classification Result Types

use consumption_model::WinterSeason;
use serde::{Deserialize, Serialize};

/// Why a rule could not be evaluated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// No winter readings for the reference season
    NoWinterData,
    /// No other installation in the building has winter data
    InsufficientPeers,
    /// No readings for the prior winter season
    NoPriorWinter,
    /// Prior winter consumption below the eligibility minimum
    PriorWinterBelowMinimum,
}

/// Outcome of one rule for one installation.
///
/// `NotApplicable` is a valid result state, distinct from both "fired"
/// and "clear". Collapsing it into either would hide the data quality
/// story from the analyst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RuleOutcome {
    /// The rule flagged the installation
    Fired,
    /// Evaluated and not flagged
    Clear,
    /// Could not be evaluated
    NotApplicable(SkipReason),
}

impl RuleOutcome {
    /// Whether the rule flagged the installation
    pub fn fired(&self) -> bool {
        matches!(self, RuleOutcome::Fired)
    }

    /// Whether the rule could be evaluated at all
    pub fn applicable(&self) -> bool {
        !matches!(self, RuleOutcome::NotApplicable(_))
    }
}

/// Numeric values behind the rule outcomes, for rendering and audit
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    /// Lowest winter reading of the reference season (m³)
    pub winter_low_m3: Option<f64>,
    /// Mean winter consumption of the reference season (m³)
    pub winter_mean_m3: Option<f64>,
    /// Pooled peer average winter consumption, self excluded (m³)
    pub peer_average_m3: Option<f64>,
    /// Cutoff applied in the peer comparison (m³)
    pub peer_cutoff_m3: Option<f64>,
    /// Mean winter consumption of the prior season (m³)
    pub prior_winter_mean_m3: Option<f64>,
    /// Percent drop from the prior winter mean
    pub drop_pct: Option<f64>,
}

/// Classification of one installation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyResult {
    /// Installation under test
    pub installation_id: String,
    /// Building the installation belongs to
    pub building_id: String,
    /// Winter season the rules were evaluated against. None when the
    /// dataset held no winter readings at all.
    pub season: Option<WinterSeason>,
    /// Rule 1: a winter reading below the absolute threshold
    pub low_winter_consumption: RuleOutcome,
    /// Rule 2: winter mean below a fraction of the building peer average
    pub below_building_average: RuleOutcome,
    /// Rule 3: a large drop against the prior winter
    pub sudden_drop: RuleOutcome,
    /// True when any rule fired
    pub anomalous: bool,
    /// Values behind the outcomes
    pub evidence: Evidence,
}

impl AnomalyResult {
    /// Short names of the rules that fired
    pub fn triggered_rules(&self) -> Vec<&'static str> {
        let mut rules = Vec::new();
        if self.low_winter_consumption.fired() {
            rules.push("low_winter_consumption");
        }
        if self.below_building_average.fired() {
            rules.push("below_building_average");
        }
        if self.sudden_drop.fired() {
            rules.push("sudden_drop");
        }
        rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_applicable_never_fires() {
        let outcome = RuleOutcome::NotApplicable(SkipReason::NoPriorWinter);
        assert!(!outcome.fired());
        assert!(!outcome.applicable());
        assert!(RuleOutcome::Clear.applicable());
    }

    #[test]
    fn test_triggered_rules() {
        let result = AnomalyResult {
            installation_id: "T1".into(),
            building_id: "B1".into(),
            season: Some(WinterSeason(2023)),
            low_winter_consumption: RuleOutcome::Fired,
            below_building_average: RuleOutcome::Clear,
            sudden_drop: RuleOutcome::NotApplicable(SkipReason::NoPriorWinter),
            anomalous: true,
            evidence: Evidence::default(),
        };
        assert_eq!(result.triggered_rules(), vec!["low_winter_consumption"]);
    }
}
