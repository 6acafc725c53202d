//! Check that the settings a benchmark run was configured with comply with the MLPerf
//! specification for its scenario and model.
//!
//! The settings are extracted from the "Effective Settings" block that the load generator writes
//! to its log, then judged field by field against the required values for the logged scenario.

#[macro_use]
extern crate log;

mod error;
pub mod evaluate;
pub mod extract;
pub mod report;
pub mod rules;
pub mod scenario;

pub use error::{LogReadError, ParseError};
pub use evaluate::{evaluate, verify, ComplianceVerdict, Evaluation, RunStatus};
pub use extract::{extract, LogReader};
