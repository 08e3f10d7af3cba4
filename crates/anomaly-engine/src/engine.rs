//! Dataset-Level Classification

use crate::params::{AnalysisParams, ParamError};
use crate::result::{AnomalyResult, Evidence, RuleOutcome, SkipReason};
use crate::rules;
use consumption_model::{Dataset, WinterSeason};
use tracing::{debug, info, warn};

/// The anomaly classification engine.
///
/// Stateless apart from its validated parameters: a run is a pure
/// function of the dataset snapshot, so results are deterministic and
/// installations are classified independently.
pub struct AnomalyEngine {
    params: AnalysisParams,
}

impl AnomalyEngine {
    /// Create an engine, rejecting out-of-range parameters
    pub fn new(params: AnalysisParams) -> Result<Self, ParamError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// The parameters in force
    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    /// Classify every installation in the dataset. Output order matches
    /// the dataset's input order.
    ///
    /// `reference` pins the winter season under test; by default the most
    /// recent winter with any reading in the dataset is used. Without any
    /// winter reading at all, every rule reports not applicable.
    pub fn run(&self, dataset: &Dataset, reference: Option<WinterSeason>) -> Vec<AnomalyResult> {
        let season = reference.or_else(|| dataset.latest_winter_season());
        match season {
            Some(season) => info!(
                "classifying {} installations against winter {}",
                dataset.len(),
                season
            ),
            None => warn!("dataset has no winter readings; all rules not applicable"),
        }

        let results: Vec<AnomalyResult> = (0..dataset.len())
            .map(|idx| self.classify(dataset, idx, season))
            .collect();

        let anomalous = results.iter().filter(|r| r.anomalous).count();
        info!("{} of {} installations flagged", anomalous, results.len());
        results
    }

    /// Classify one installation against the reference season
    fn classify(
        &self,
        dataset: &Dataset,
        idx: usize,
        season: Option<WinterSeason>,
    ) -> AnomalyResult {
        let series = &dataset.series()[idx];

        let Some(season) = season else {
            let na = RuleOutcome::NotApplicable(SkipReason::NoWinterData);
            return AnomalyResult {
                installation_id: series.installation_id().to_string(),
                building_id: series.building_id().to_string(),
                season: None,
                low_winter_consumption: na,
                below_building_average: na,
                sudden_drop: na,
                anomalous: false,
                evidence: Evidence::default(),
            };
        };

        let readings = series.winter_readings(season);
        let winter_mean = series.winter_mean(season);
        let prior_mean = series.winter_mean(season.prev());
        let peer_average = peer_average(dataset, idx, season);

        let low_winter_consumption =
            rules::check_low_winter(&readings, self.params.winter_low_threshold_m3);
        let below_building_average = rules::check_below_building_average(
            winter_mean,
            peer_average,
            self.params.building_average_ratio_pct,
        );
        let sudden_drop = rules::check_sudden_drop(
            winter_mean,
            prior_mean,
            self.params.sudden_drop_ratio_pct,
            self.params.min_prior_winter_m3,
        );

        let evidence = Evidence {
            winter_low_m3: readings.iter().copied().reduce(f64::min),
            winter_mean_m3: winter_mean,
            peer_average_m3: peer_average,
            peer_cutoff_m3: peer_average
                .map(|avg| avg * f64::from(self.params.building_average_ratio_pct) / 100.0),
            prior_winter_mean_m3: prior_mean,
            drop_pct: match (winter_mean, prior_mean) {
                (Some(current), Some(prior)) if prior > 0.0 => {
                    Some((prior - current) / prior * 100.0)
                }
                _ => None,
            },
        };

        let anomalous = low_winter_consumption.fired()
            || below_building_average.fired()
            || sudden_drop.fired();
        if anomalous {
            debug!(
                "{} flagged: {:?}",
                series.installation_id(),
                [low_winter_consumption, below_building_average, sudden_drop]
            );
        }

        AnomalyResult {
            installation_id: series.installation_id().to_string(),
            building_id: series.building_id().to_string(),
            season: Some(season),
            low_winter_consumption,
            below_building_average,
            sudden_drop,
            anomalous,
            evidence,
        }
    }
}

/// Pooled mean of winter readings across the other installations in the
/// building. None when no peer has winter data for the season, which the
/// peer rule reports as insufficient peers.
fn peer_average(dataset: &Dataset, idx: usize, season: WinterSeason) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for peer in dataset.peers_of(idx) {
        for value in peer.winter_readings(season) {
            sum += value;
            count += 1;
        }
    }
    (count > 0).then(|| sum / count as f64)
}
