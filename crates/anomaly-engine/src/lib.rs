//! Anomaly Classification Engine
//!
//! Deterministic rule engine flagging suspiciously low winter gas
//! consumption per installation: an absolute threshold, deviation from
//! the building peer average, and sudden drops against the installation's
//! own prior winter.

mod engine;
mod params;
mod result;
mod rules;
mod summary;

pub use engine::AnomalyEngine;
pub use params::{AnalysisParams, ParamError};
pub use result::{AnomalyResult, Evidence, RuleOutcome, SkipReason};
pub use summary::{AnalysisSummary, BuildingSummary, RuleCount};
