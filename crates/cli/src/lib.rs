//! Gaswatch Command-Line Front End
//!
//! Thin presentation layer over the core crates: loads a consumption CSV,
//! runs ingestion and the classification engine, and renders the result
//! table plus summary, as text or JSON.

mod render;

use anomaly_engine::{AnalysisParams, AnalysisSummary, AnomalyEngine};
use anyhow::Context;
use consumption_model::WinterSeason;
use data_ingest::{ingest, RawTable};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Parsed command-line arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    /// CSV file with the consumption export
    pub input: PathBuf,
    /// Optional parameter config file
    pub params_file: Option<PathBuf>,
    /// Pin the winter season under test (year of its December)
    pub season: Option<i32>,
    /// Emit JSON instead of the text table
    pub json: bool,
}

impl Args {
    pub const USAGE: &'static str =
        "usage: gaswatch <data.csv> [--params <file>] [--season <year>] [--json]";

    /// Parse arguments, returning a usage message on failure
    pub fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut input = None;
        let mut params_file = None;
        let mut season = None;
        let mut json = false;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--params" => {
                    let value = args.next().ok_or("--params requires a file path")?;
                    params_file = Some(PathBuf::from(value));
                }
                "--season" => {
                    let value = args.next().ok_or("--season requires a year")?;
                    season = Some(
                        value
                            .parse::<i32>()
                            .map_err(|_| format!("'{}' is not a year", value))?,
                    );
                }
                "--json" => json = true,
                other if other.starts_with("--") => {
                    return Err(format!("unknown option '{}'", other));
                }
                other => {
                    if input.replace(PathBuf::from(other)).is_some() {
                        return Err("only one input file is supported".to_string());
                    }
                }
            }
        }

        Ok(Self {
            input: input.ok_or("missing input file")?,
            params_file,
            season,
            json,
        })
    }
}

/// Install the global tracing subscriber
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the full pipeline: ingest, classify, render
pub fn run(args: Args) -> anyhow::Result<()> {
    let params = AnalysisParams::load(args.params_file.as_deref())
        .context("invalid analysis parameters")?;
    let engine = AnomalyEngine::new(params)?;

    let table = RawTable::from_csv_path(&args.input)?;
    let (dataset, report) = ingest(&table)?;
    info!("loaded {} installations", dataset.len());

    let results = engine.run(&dataset, args.season.map(WinterSeason));
    let summary = AnalysisSummary::from_results(&results);

    if args.json {
        render::json(&results, &summary, &report)?;
    } else {
        render::text(&results, &summary, &report);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Args, String> {
        Args::parse(args.iter().map(|a| a.to_string()))
    }

    #[test]
    fn test_parse_minimal() {
        let args = parse(&["data.csv"]).unwrap();
        assert_eq!(args.input, PathBuf::from("data.csv"));
        assert_eq!(args.params_file, None);
        assert!(!args.json);
    }

    #[test]
    fn test_parse_full() {
        let args = parse(&["data.csv", "--params", "params.toml", "--season", "2023", "--json"])
            .unwrap();
        assert_eq!(args.params_file, Some(PathBuf::from("params.toml")));
        assert_eq!(args.season, Some(2023));
        assert!(args.json);
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["data.csv", "--season"]).is_err());
        assert!(parse(&["data.csv", "--season", "soon"]).is_err());
        assert!(parse(&["data.csv", "--bogus"]).is_err());
        assert!(parse(&["a.csv", "b.csv"]).is_err());
    }
}
