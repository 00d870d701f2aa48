//! Shared application state.

use parking_lot::RwLock;
use serde::Serialize;
use termweave_core::EngineConfig;
use termweave_runtime::{InjectionResult, RunState};

/// Counters over every injection run served by this process.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub total: u64,
    pub early_exits: u64,
    pub insertions: u64,
    pub failures: u64,
}

impl RunStats {
    pub fn record(&mut self, result: &InjectionResult) {
        self.total += 1;
        if result.state == RunState::EarlyExit {
            self.early_exits += 1;
        }
        self.insertions += result.insertion_report.len() as u64;
        self.failures += result.failed_terms.len() as u64;
    }
}

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: EngineConfig,
    pub runs: RwLock<RunStats>,
}

impl AppState {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            runs: RwLock::new(RunStats::default()),
        }
    }
}
