//! Evaluation of benchmark tables.
//!
//! [`evaluate`] scores a predictor column against binary labels;
//! [`label_distribution`] summarizes class balance.

pub mod distribution;
pub mod error;
pub mod metrics;

pub use distribution::{LabelDistribution, label_distribution};
pub use error::{MetricError, Result};
pub use metrics::{MetricReport, evaluate};
