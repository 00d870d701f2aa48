//! Runtime orchestrator — drives coverage analysis, the header pass and the
//! body pass toward a target score, and assembles the run report.

pub mod orchestrator;
pub mod types;

pub use orchestrator::{inject_missing_terms, Orchestrator};
pub use types::*;
