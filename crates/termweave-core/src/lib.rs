//! Termweave Core — term records, error type, engine configuration.

pub mod config;
pub mod error;
pub mod term;

pub use config::{EngineConfig, InjectionOptions};
pub use error::{Error, Result};
pub use term::{Term, TermCategory, DEFAULT_IMPORTANCE};
