//! Weighted keyword records consumed by the engine.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Importance assumed when the discovery service leaves it unset.
pub const DEFAULT_IMPORTANCE: u32 = 50;

/// Importance at or above which a term is considered critical.
pub const CRITICAL_IMPORTANCE: u32 = 80;

/// Where a term is expected to appear in the content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermCategory {
    Title,
    Header,
    #[default]
    Basic,
    Extended,
}

impl TermCategory {
    /// Title and header terms belong in headings.
    pub fn is_heading_class(&self) -> bool {
        matches!(self, TermCategory::Title | TermCategory::Header)
    }

    pub fn is_body_class(&self) -> bool {
        !self.is_heading_class()
    }
}

/// A weighted keyword phrase the content should mention.
///
/// Identity is case-insensitive text equality (see [`Term::key`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub text: String,
    #[serde(default)]
    pub category: TermCategory,
    #[serde(default = "default_importance")]
    pub importance: u32,
}

fn default_importance() -> u32 {
    DEFAULT_IMPORTANCE
}

impl Term {
    pub fn new(text: impl Into<String>, category: TermCategory, importance: u32) -> Self {
        Self {
            text: text.into(),
            category,
            importance,
        }
    }

    /// A body term with default importance.
    pub fn basic(text: impl Into<String>) -> Self {
        Self::new(text, TermCategory::Basic, DEFAULT_IMPORTANCE)
    }

    /// Reject terms that can never match anything.
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(Error::InvalidTerm("term text is empty".into()));
        }
        Ok(())
    }

    /// Lowercased text, used for identity and matching.
    pub fn key(&self) -> String {
        self.text.trim().to_lowercase()
    }

    /// Importance clamped to `[0, 100]`.
    pub fn weight(&self) -> u32 {
        self.importance.min(100)
    }

    pub fn is_critical(&self) -> bool {
        self.weight() >= CRITICAL_IMPORTANCE
    }

    /// Lowercased words longer than three characters.
    pub fn significant_words(&self) -> Vec<String> {
        significant_words(&self.text)
    }
}

/// Lowercased whitespace-separated words longer than three characters.
pub fn significant_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.to_lowercase())
        .filter(|w| w.chars().count() > 3)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_importance_defaults_when_missing() {
        let term: Term = serde_json::from_str(r#"{"text": "seo"}"#).unwrap();
        assert_eq!(term.importance, DEFAULT_IMPORTANCE);
        assert_eq!(term.category, TermCategory::Basic);
    }

    #[test]
    fn test_category_parses_lowercase() {
        let term: Term =
            serde_json::from_str(r#"{"text": "Guide", "category": "title", "importance": 95}"#)
                .unwrap();
        assert!(term.category.is_heading_class());
        assert!(term.is_critical());
    }

    #[test]
    fn test_weight_clamps() {
        let term = Term::new("x", TermCategory::Extended, 250);
        assert_eq!(term.weight(), 100);
    }

    #[test]
    fn test_significant_words_skip_short() {
        let term = Term::basic("Best SEO Tools for you");
        assert_eq!(term.significant_words(), vec!["best", "tools"]);
    }

    #[test]
    fn test_blank_term_is_invalid() {
        assert!(Term::basic("   ").validate().is_err());
        assert!(Term::basic("seo").validate().is_ok());
    }
}
