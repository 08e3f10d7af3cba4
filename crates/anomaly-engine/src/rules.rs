//! The Three Classification Rules
//!
//! Pure threshold checks over winter readings. Level rules (1 and 2) use
//! strict "below" comparisons; the change rule (3) is inclusive at the
//! boundary, since it tests a drop magnitude rather than a level.

use crate::result::{RuleOutcome, SkipReason};

/// Rule 1: any winter reading strictly below the absolute threshold.
pub(crate) fn check_low_winter(winter_readings: &[f64], threshold_m3: f64) -> RuleOutcome {
    if winter_readings.is_empty() {
        return RuleOutcome::NotApplicable(SkipReason::NoWinterData);
    }
    if winter_readings.iter().any(|&v| v < threshold_m3) {
        RuleOutcome::Fired
    } else {
        RuleOutcome::Clear
    }
}

/// Rule 2: winter mean strictly below `ratio_pct`% of the peer average.
///
/// The peer average must already exclude the installation under test.
pub(crate) fn check_below_building_average(
    winter_mean: Option<f64>,
    peer_average: Option<f64>,
    ratio_pct: u32,
) -> RuleOutcome {
    let Some(mean) = winter_mean else {
        return RuleOutcome::NotApplicable(SkipReason::NoWinterData);
    };
    let Some(peer_average) = peer_average else {
        return RuleOutcome::NotApplicable(SkipReason::InsufficientPeers);
    };
    let cutoff = peer_average * f64::from(ratio_pct) / 100.0;
    if mean < cutoff {
        RuleOutcome::Fired
    } else {
        RuleOutcome::Clear
    }
}

/// Rule 3: current winter mean dropped by at least `drop_ratio_pct`%
/// against the prior winter mean.
///
/// Only eligible when the prior winter reached `min_prior_m3`; guards
/// against near-zero denominators and against flagging installations that
/// were already low.
pub(crate) fn check_sudden_drop(
    current_mean: Option<f64>,
    prior_mean: Option<f64>,
    drop_ratio_pct: u32,
    min_prior_m3: f64,
) -> RuleOutcome {
    let Some(current) = current_mean else {
        return RuleOutcome::NotApplicable(SkipReason::NoWinterData);
    };
    let Some(prior) = prior_mean else {
        return RuleOutcome::NotApplicable(SkipReason::NoPriorWinter);
    };
    if prior < min_prior_m3 {
        return RuleOutcome::NotApplicable(SkipReason::PriorWinterBelowMinimum);
    }
    let cutoff = prior * (1.0 - f64::from(drop_ratio_pct) / 100.0);
    if current <= cutoff {
        RuleOutcome::Fired
    } else {
        RuleOutcome::Clear
    }
}
