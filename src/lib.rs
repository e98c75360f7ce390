//! RideStats - streaming analysis of cycling power and heart-rate data
//!
//! Computes, in a single forward pass over 1 Hz samples, peak average power
//! and peak Normalized Power per duration, whole-activity NP/IF/TSS, the most
//! stable heart-rate windows, and Efficiency Factor. Activities are read from
//! FIT files; timer stops split an activity into segments that reset sliding
//! windows while best-ever records persist.

pub mod activity;
pub mod config;
pub mod metrics;

// Re-export commonly used types
pub use activity::{ActivityAnalyzer, ActivityRecord, ActivitySummary, SensorSample};
pub use config::AnalysisConfig;
pub use metrics::{MetricsError, MetricsResult, RingSampleBuffer};
