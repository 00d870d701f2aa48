//! Termweave Analyze — lexical coverage of weighted terms and the static
//! topic clusters used as a relevance signal.

pub mod coverage;
pub mod related;

pub use coverage::{analyze, analyze_document, CoverageAnalysis, TermUsage};
pub use related::{matching_topics, related_terms};
