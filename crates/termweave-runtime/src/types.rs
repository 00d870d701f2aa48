//! Runtime types.

use chrono::{DateTime, Utc};
use serde::Serialize;
use termweave_analyze::CoverageAnalysis;
use termweave_markup::BlockKind;

/// Relevance recorded for heading rewrites, which are not scored.
pub const SYNTHETIC_HEADING_SCORE: u32 = 100;

/// Where an inserted term ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementKind {
    Paragraph,
    List,
    Heading,
    Callout,
}

impl From<BlockKind> for PlacementKind {
    fn from(kind: BlockKind) -> Self {
        match kind {
            BlockKind::Paragraph | BlockKind::Cell => PlacementKind::Paragraph,
            BlockKind::ListItem => PlacementKind::List,
            BlockKind::Container => PlacementKind::Callout,
        }
    }
}

/// One line of the audit trail.
#[derive(Debug, Clone, Serialize)]
pub struct InsertionReportEntry {
    pub term: String,
    #[serde(rename = "placementKind")]
    pub placement_kind: PlacementKind,
    #[serde(rename = "templateUsed")]
    pub template_used: String,
    #[serde(rename = "relevanceScore")]
    pub relevance_score: u32,
}

/// Phases of one orchestration run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RunState {
    Initialized,
    /// Nothing to do: degenerate input or target already met.
    EarlyExit,
    HeaderPass,
    BodyPass,
    Finalized,
}

/// Everything a run produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectionResult {
    pub run_id: String,
    pub state: RunState,
    pub final_content: String,
    pub added_terms: Vec<String>,
    /// Terms attempted without success.
    pub failed_terms: Vec<String>,
    /// Terms never attempted because the target or the budget was reached.
    pub skipped_terms: Vec<String>,
    pub initial_coverage: CoverageAnalysis,
    pub final_coverage: CoverageAnalysis,
    pub insertion_report: Vec<InsertionReportEntry>,
    /// SHA-256 of the input content, hex.
    pub input_digest: String,
    /// SHA-256 of the final content, hex.
    pub output_digest: String,
    pub completed_at: DateTime<Utc>,
}

impl InjectionResult {
    /// Whether the run changed the content.
    pub fn mutated(&self) -> bool {
        self.input_digest != self.output_digest
    }
}
