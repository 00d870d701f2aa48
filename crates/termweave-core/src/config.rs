//! Injection options and engine configuration persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::Error;

pub const DEFAULT_PORT: u16 = 3040;
pub const DEFAULT_TARGET_COVERAGE: u32 = 85;
pub const DEFAULT_MAX_INSERTIONS: usize = 30;

/// Per-run knobs for the orchestrator. Every field is optional on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InjectionOptions {
    /// Raw coverage percentage at which the run stops.
    pub target_coverage: u32,
    /// Upper bound on header plus body insertions.
    pub max_insertions: usize,
    pub inject_headers: bool,
    /// Sort critical terms first, then by descending importance.
    pub prioritize_important: bool,
    /// Allow leaf `div`/`aside`/`section` blocks as insertion points.
    pub include_containers: bool,
}

impl Default for InjectionOptions {
    fn default() -> Self {
        Self {
            target_coverage: DEFAULT_TARGET_COVERAGE,
            max_insertions: DEFAULT_MAX_INSERTIONS,
            inject_headers: true,
            prioritize_important: true,
            include_containers: false,
        }
    }
}

impl InjectionOptions {
    /// Target coverage clamped to `[0, 100]`.
    pub fn target(&self) -> u32 {
        self.target_coverage.min(100)
    }

    /// Header pass budget: 20% of the insertion budget, at most 5.
    pub fn header_budget(&self) -> usize {
        self.max_insertions.div_ceil(5).min(5)
    }
}

/// Stored engine configuration (persisted to `termweave.json`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub defaults: InjectionOptions,
    /// Fixed seed for template choices; random per run when unset.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Path to config file for saving.
    #[serde(skip)]
    pub config_path: PathBuf,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            defaults: InjectionOptions::default(),
            seed: None,
            config_path: PathBuf::new(),
        }
    }
}

impl EngineConfig {
    /// Load config from file, then apply environment overrides.
    pub fn load(config_path: &Path) -> Self {
        let mut config: EngineConfig = std::fs::read_to_string(config_path)
            .ok()
            .and_then(|s| serde_json::from_str(&s).ok())
            .unwrap_or_default();

        config.config_path = config_path.to_path_buf();
        config.apply_env();
        config
    }

    fn apply_env(&mut self) {
        if let Some(port) = env_parse::<u16>("TERMWEAVE_PORT") {
            self.port = port;
        }
        if let Some(target) = env_parse::<u32>("TERMWEAVE_TARGET_COVERAGE") {
            self.defaults.target_coverage = target.min(100);
        }
        if let Some(max) = env_parse::<usize>("TERMWEAVE_MAX_INSERTIONS") {
            self.defaults.max_insertions = max;
        }
        if let Some(seed) = env_parse::<u64>("TERMWEAVE_SEED") {
            self.seed = Some(seed);
        }
    }

    /// Reject settings the server cannot start with.
    pub fn validate(&self) -> crate::Result<()> {
        if self.port == 0 {
            return Err(Error::Config("port must be non-zero".into()));
        }
        if self.defaults.target_coverage > 100 {
            warn!(
                "targetCoverage {} exceeds 100 and will be clamped",
                self.defaults.target_coverage
            );
        }
        Ok(())
    }

    /// Save config to disk.
    pub fn save(&self) -> crate::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(&self.config_path, json)?;
        info!("Saved engine config to {}", self.config_path.display());
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_budget() {
        let mut opts = InjectionOptions::default();
        assert_eq!(opts.header_budget(), 5);
        opts.max_insertions = 7;
        assert_eq!(opts.header_budget(), 2);
        opts.max_insertions = 0;
        assert_eq!(opts.header_budget(), 0);
    }

    #[test]
    fn test_partial_options_fill_defaults() {
        let opts: InjectionOptions = serde_json::from_str(r#"{"targetCoverage": 60}"#).unwrap();
        assert_eq!(opts.target_coverage, 60);
        assert_eq!(opts.max_insertions, DEFAULT_MAX_INSERTIONS);
        assert!(opts.inject_headers);
        assert!(opts.prioritize_important);
    }

    #[test]
    fn test_target_is_clamped() {
        let opts = InjectionOptions {
            target_coverage: 140,
            ..Default::default()
        };
        assert_eq!(opts.target(), 100);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("termweave.json");
        let mut config = EngineConfig::load(&path);
        config.defaults.include_containers = true;
        config.save().unwrap();

        let loaded = EngineConfig::load(&path);
        assert!(loaded.defaults.include_containers);
        assert_eq!(loaded.config_path, path);
    }

    #[test]
    fn test_zero_port_is_rejected() {
        let config = EngineConfig {
            port: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = EngineConfig::load(&dir.path().join("absent.json"));
        assert!(config.defaults.inject_headers);
    }
}
