//! Termweave server — HTTP surface over coverage analysis and term injection.

use std::path::Path;

use anyhow::Context;
use termweave_analyze::CoverageAnalysis;
use termweave_core::Term;

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::{AppState, RunStats};

/// Analyze an HTML file against a JSON term list (`termweave check`).
pub fn check_files(html_path: &Path, terms_path: &Path) -> anyhow::Result<CoverageAnalysis> {
    let content = std::fs::read_to_string(html_path)
        .with_context(|| format!("Failed to read {}", html_path.display()))?;
    let terms_json = std::fs::read_to_string(terms_path)
        .with_context(|| format!("Failed to read {}", terms_path.display()))?;
    let terms: Vec<Term> = serde_json::from_str(&terms_json)
        .with_context(|| format!("Invalid term list in {}", terms_path.display()))?;

    Ok(termweave_analyze::analyze(&content, &terms))
}
