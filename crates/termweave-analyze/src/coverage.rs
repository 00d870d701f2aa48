//! Whole-word, case-insensitive term coverage.

use std::collections::HashSet;

use regex::Regex;
use serde::Serialize;
use termweave_core::Term;
use termweave_markup::Document;
use tracing::warn;

/// A term found at least once.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TermUsage {
    pub term: Term,
    pub occurrence_count: usize,
    /// Character offsets into the lowercased visible text.
    pub match_positions: Vec<usize>,
}

/// Coverage of a term list over one piece of content.
#[derive(Debug, Clone, Serialize)]
pub struct CoverageAnalysis {
    #[serde(rename = "rawScore")]
    pub raw_score: u32,
    #[serde(rename = "weightedScore")]
    pub weighted_score: u32,
    #[serde(rename = "totalTerms")]
    pub total_terms: usize,
    #[serde(rename = "usedTerms")]
    pub used_terms: Vec<TermUsage>,
    #[serde(rename = "missingTerms")]
    pub missing_terms: Vec<Term>,
    /// Missing terms with importance >= 80.
    #[serde(rename = "criticalMissing")]
    pub critical_missing: Vec<Term>,
    /// Missing title/header terms.
    #[serde(rename = "headerMissing")]
    pub header_missing: Vec<Term>,
    /// Missing basic/extended terms.
    #[serde(rename = "bodyMissing")]
    pub body_missing: Vec<Term>,
}

impl CoverageAnalysis {
    /// Nothing to measure: full marks, empty buckets.
    pub fn vacuous() -> Self {
        Self {
            raw_score: 100,
            weighted_score: 100,
            total_terms: 0,
            used_terms: Vec::new(),
            missing_terms: Vec::new(),
            critical_missing: Vec::new(),
            header_missing: Vec::new(),
            body_missing: Vec::new(),
        }
    }

    pub fn used_count(&self) -> usize {
        self.used_terms.len()
    }

    /// Occurrence count for a term, by case-insensitive identity.
    pub fn occurrences(&self, text: &str) -> usize {
        let key = text.trim().to_lowercase();
        self.used_terms
            .iter()
            .find(|u| u.term.key() == key)
            .map(|u| u.occurrence_count)
            .unwrap_or(0)
    }
}

/// Analyze markup against a term list.
pub fn analyze(content: &str, terms: &[Term]) -> CoverageAnalysis {
    analyze_document(&Document::parse(content), terms)
}

/// Analyze an already parsed document.
pub fn analyze_document(doc: &Document, terms: &[Term]) -> CoverageAnalysis {
    let terms = distinct_terms(terms);
    let text = doc.text().to_lowercase();
    if terms.is_empty() || text.is_empty() {
        return CoverageAnalysis::vacuous();
    }

    let mut used_terms = Vec::new();
    let mut missing_terms = Vec::new();

    for term in &terms {
        let positions = find_occurrences(&text, &term.key());
        if positions.is_empty() {
            missing_terms.push(term.clone());
        } else {
            used_terms.push(TermUsage {
                term: term.clone(),
                occurrence_count: positions.len(),
                match_positions: positions,
            });
        }
    }

    let total_weight: u32 = terms.iter().map(Term::weight).sum();
    let used_weight: u32 = used_terms.iter().map(|u| u.term.weight()).sum();
    let raw_score = percent(used_terms.len() as u64, terms.len() as u64);
    let weighted_score = if total_weight == 0 {
        raw_score
    } else {
        percent(used_weight as u64, total_weight as u64)
    };

    let critical_missing = missing_terms
        .iter()
        .filter(|t| t.is_critical())
        .cloned()
        .collect();
    let header_missing = missing_terms
        .iter()
        .filter(|t| t.category.is_heading_class())
        .cloned()
        .collect();
    let body_missing = missing_terms
        .iter()
        .filter(|t| t.category.is_body_class())
        .cloned()
        .collect();

    CoverageAnalysis {
        raw_score,
        weighted_score,
        total_terms: terms.len(),
        used_terms,
        missing_terms,
        critical_missing,
        header_missing,
        body_missing,
    }
}

/// Drop blank terms and case-insensitive duplicates, keeping first occurrence.
fn distinct_terms(terms: &[Term]) -> Vec<Term> {
    let mut seen = HashSet::new();
    terms
        .iter()
        .filter(|t| match t.validate() {
            Ok(()) => true,
            Err(e) => {
                warn!("Skipping term: {}", e);
                false
            }
        })
        .filter(|t| seen.insert(t.key()))
        .cloned()
        .collect()
}

fn percent(part: u64, whole: u64) -> u32 {
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

/// Character offsets of every whole-word occurrence of `needle` in `haystack`.
///
/// Both arguments are expected lowercased. Boundaries are only enforced on a
/// side of the needle that starts or ends with a word character.
pub fn find_occurrences(haystack: &str, needle: &str) -> Vec<usize> {
    let Some(re) = whole_word_pattern(needle) else {
        return Vec::new();
    };

    let mut positions = Vec::new();
    let mut byte_cursor = 0;
    let mut char_cursor = 0;
    for m in re.find_iter(haystack) {
        char_cursor += haystack[byte_cursor..m.start()].chars().count();
        byte_cursor = m.start();
        positions.push(char_cursor);
    }
    positions
}

fn whole_word_pattern(needle: &str) -> Option<Regex> {
    let first = needle.chars().next()?;
    let last = needle.chars().last()?;
    let is_word = |c: char| c.is_alphanumeric() || c == '_';

    let mut pattern = String::new();
    if is_word(first) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(needle));
    if is_word(last) {
        pattern.push_str(r"\b");
    }

    match Regex::new(&pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            warn!("Could not build pattern for {:?}: {}", needle, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termweave_core::TermCategory;

    fn term(text: &str, category: TermCategory, importance: u32) -> Term {
        Term::new(text, category, importance)
    }

    #[test]
    fn test_word_boundary_rejects_longer_words() {
        let analysis = analyze(
            "<p>Here are some examples of cats and a preexample.</p>",
            &[Term::basic("example")],
        );
        assert_eq!(analysis.raw_score, 0);
        assert_eq!(analysis.missing_terms.len(), 1);
    }

    #[test]
    fn test_counts_and_positions() {
        let analysis = analyze("<p>SEO tips: seo, Seo and more SEO.</p>", &[Term::basic("seo")]);
        assert_eq!(analysis.raw_score, 100);
        let usage = &analysis.used_terms[0];
        assert_eq!(usage.occurrence_count, 4);
        assert_eq!(usage.match_positions, vec![0, 10, 15, 28]);
    }

    #[test]
    fn test_positions_are_character_offsets() {
        let analysis = analyze("<p>café seo</p>", &[Term::basic("seo")]);
        assert_eq!(analysis.used_terms[0].match_positions, vec![5]);
    }

    #[test]
    fn test_partition_and_buckets() {
        let terms = vec![
            term("content", TermCategory::Basic, 40),
            term("Guide", TermCategory::Title, 90),
            term("ranking", TermCategory::Extended, 85),
            term("writing", TermCategory::Header, 20),
        ];
        let analysis = analyze("<p>Content writing matters.</p>", &terms);

        assert_eq!(analysis.used_count() + analysis.missing_terms.len(), terms.len());
        assert_eq!(analysis.raw_score, 50);
        // (40 + 20) / 235
        assert_eq!(analysis.weighted_score, 26);
        let critical: Vec<&str> = analysis.critical_missing.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(critical, vec!["Guide", "ranking"]);
        assert_eq!(analysis.header_missing.len(), 1);
        assert_eq!(analysis.body_missing.len(), 1);
    }

    #[test]
    fn test_empty_inputs_are_vacuous() {
        let empty_terms = analyze("<p>Anything</p>", &[]);
        assert_eq!((empty_terms.raw_score, empty_terms.weighted_score), (100, 100));

        let empty_content = analyze("  <p> </p> ", &[Term::basic("seo")]);
        assert_eq!(empty_content.raw_score, 100);
        assert!(empty_content.missing_terms.is_empty());
    }

    #[test]
    fn test_duplicate_terms_collapse() {
        let analysis = analyze(
            "<p>seo</p>",
            &[Term::basic("SEO"), Term::basic("seo"), Term::basic("links")],
        );
        assert_eq!(analysis.total_terms, 2);
        assert_eq!(analysis.raw_score, 50);
    }

    #[test]
    fn test_symbol_terms_match() {
        assert_eq!(find_occurrences("we like c++ a lot", "c++"), vec![8]);
        assert!(find_occurrences("abc++", "c++").is_empty());
    }

    #[test]
    fn test_attributes_do_not_count() {
        let analysis = analyze(r#"<p><a href="/seo">link</a></p>"#, &[Term::basic("seo")]);
        assert_eq!(analysis.raw_score, 0);
    }

    #[test]
    fn test_zero_weights_fall_back_to_raw() {
        let analysis = analyze("<p>alpha</p>", &[term("alpha", TermCategory::Basic, 0), term("beta", TermCategory::Basic, 0)]);
        assert_eq!(analysis.weighted_score, analysis.raw_score);
    }

    #[test]
    fn test_serializes_camel_case() {
        let analysis = analyze("<p>seo</p>", &[Term::basic("seo")]);
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["rawScore"], 100);
        assert_eq!(json["usedTerms"][0]["occurrenceCount"], 1);
    }
}
