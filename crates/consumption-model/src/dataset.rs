//! Normalized Dataset with Building Peer Groups

use crate::period::WinterSeason;
use crate::series::{InstallationSeries, Observation};
use std::collections::{BTreeMap, HashMap};

/// A full analysis dataset: one series per installation, grouped by
/// building for peer comparison.
///
/// Series keep their first-seen order so engine output is deterministic
/// with respect to the input. An installation's building assignment is
/// fixed by its first observation; later observations with a different
/// building id keep the original assignment.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    series: Vec<InstallationSeries>,
    by_installation: HashMap<String, usize>,
    buildings: BTreeMap<String, Vec<usize>>,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one observation. Returns true when it replaced an earlier
    /// reading for the same (installation, period) pair.
    pub fn add(&mut self, obs: Observation) -> bool {
        let idx = match self.by_installation.get(&obs.installation_id) {
            Some(&idx) => idx,
            None => {
                let idx = self.series.len();
                self.series
                    .push(InstallationSeries::new(&obs.installation_id, &obs.building_id));
                self.by_installation.insert(obs.installation_id.clone(), idx);
                self.buildings
                    .entry(obs.building_id.clone())
                    .or_default()
                    .push(idx);
                idx
            }
        };
        self.series[idx].insert(obs.period, obs.consumption)
    }

    /// All series, in first-seen input order
    pub fn series(&self) -> &[InstallationSeries] {
        &self.series
    }

    /// Series for one installation
    pub fn get(&self, installation_id: &str) -> Option<&InstallationSeries> {
        self.by_installation
            .get(installation_id)
            .map(|&idx| &self.series[idx])
    }

    /// Number of installations
    pub fn len(&self) -> usize {
        self.series.len()
    }

    /// Whether the dataset holds no installations
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Buildings and their member series indices, in building-id order
    pub fn buildings(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.buildings.iter().map(|(id, idxs)| (id.as_str(), idxs.as_slice()))
    }

    /// Series in the same building as `idx`, excluding `idx` itself
    pub fn peers_of(&self, idx: usize) -> impl Iterator<Item = &InstallationSeries> {
        let building = self.series[idx].building_id();
        self.buildings
            .get(building)
            .into_iter()
            .flatten()
            .filter(move |&&i| i != idx)
            .map(|&i| &self.series[i])
    }

    /// Most recent winter season with any reading across the dataset
    pub fn latest_winter_season(&self) -> Option<WinterSeason> {
        self.series
            .iter()
            .filter_map(InstallationSeries::latest_winter_season)
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::Period;

    fn obs(installation: &str, building: &str, year: i32, month: u32, m3: f64) -> Observation {
        Observation {
            installation_id: installation.to_string(),
            building_id: building.to_string(),
            period: Period::new(year, month).unwrap(),
            consumption: m3,
        }
    }

    #[test]
    fn test_input_order_preserved() {
        let mut ds = Dataset::new();
        ds.add(obs("T3", "B1", 2023, 12, 10.0));
        ds.add(obs("T1", "B2", 2023, 12, 20.0));
        ds.add(obs("T2", "B1", 2023, 12, 30.0));

        let ids: Vec<&str> = ds.series().iter().map(|s| s.installation_id()).collect();
        assert_eq!(ids, vec!["T3", "T1", "T2"]);
    }

    #[test]
    fn test_duplicate_observation_replaces() {
        let mut ds = Dataset::new();
        assert!(!ds.add(obs("T1", "B1", 2023, 12, 10.0)));
        assert!(ds.add(obs("T1", "B1", 2023, 12, 25.0)));
        assert_eq!(ds.get("T1").unwrap().get(Period::new(2023, 12).unwrap()), Some(25.0));
    }

    #[test]
    fn test_peers_exclude_self() {
        let mut ds = Dataset::new();
        ds.add(obs("T1", "B1", 2023, 12, 10.0));
        ds.add(obs("T2", "B1", 2023, 12, 20.0));
        ds.add(obs("T3", "B2", 2023, 12, 30.0));

        let peers: Vec<&str> = ds.peers_of(0).map(|s| s.installation_id()).collect();
        assert_eq!(peers, vec!["T2"]);

        // single-installation building has no peers
        let peers: Vec<&str> = ds.peers_of(2).map(|s| s.installation_id()).collect();
        assert!(peers.is_empty());
    }

    #[test]
    fn test_building_assignment_fixed_by_first_observation() {
        let mut ds = Dataset::new();
        ds.add(obs("T1", "B1", 2023, 12, 10.0));
        ds.add(obs("T1", "B9", 2024, 1, 10.0));

        assert_eq!(ds.get("T1").unwrap().building_id(), "B1");
        let buildings: Vec<&str> = ds.buildings().map(|(id, _)| id).collect();
        assert_eq!(buildings, vec!["B1"]);
    }

    #[test]
    fn test_latest_winter_season() {
        let mut ds = Dataset::new();
        ds.add(obs("T1", "B1", 2022, 12, 10.0));
        ds.add(obs("T2", "B1", 2024, 1, 10.0));
        assert_eq!(ds.latest_winter_season(), Some(WinterSeason(2023)));
    }
}
