//! Heading rewrites for title/header terms.
//!
//! Unlike body insertion this overwrites the heading's inner content with a
//! plain-text combination of the old heading and the term.

use std::collections::HashSet;

use rand::Rng;
use serde::Serialize;
use termweave_core::term::significant_words;
use termweave_core::Term;
use termweave_markup::{escape_html, Document};
use tracing::{debug, warn};

/// Only second and third level headings are rewritten.
pub const HEADING_LEVELS: &[u8] = &[2, 3];

/// Longer headings are left alone.
pub const MAX_HEADING_CHARS: usize = 80;

/// Headings shorter than this may get the term appended.
pub const SHORT_HEADING_CHARS: usize = 40;

/// Terms this important may go into a heading without word overlap.
pub const FORCE_IMPORTANCE: u32 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    /// `"<heading>: <term>"`
    Append,
    /// `"<term> in <heading>"`
    Prepend,
}

impl HeadingStyle {
    pub fn name(&self) -> &'static str {
        match self {
            HeadingStyle::Append => "append",
            HeadingStyle::Prepend => "prepend",
        }
    }
}

/// One successful heading rewrite.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HeaderInjection {
    pub term: Term,
    pub style: HeadingStyle,
    pub level: u8,
    pub previous: String,
    pub heading: String,
}

/// Rewrite up to `max_count` h2/h3 headings to include heading-class terms.
///
/// Terms are tried in descending importance; each term takes the first
/// acceptable heading still unused in this pass.
pub fn inject_headers<R: Rng + ?Sized>(
    doc: &mut Document,
    candidates: &[Term],
    max_count: usize,
    rng: &mut R,
) -> Vec<HeaderInjection> {
    let mut terms: Vec<&Term> = candidates
        .iter()
        .filter(|t| t.category.is_heading_class())
        .collect();
    if terms.is_empty() || max_count == 0 || doc.headings(HEADING_LEVELS).is_empty() {
        return Vec::new();
    }
    terms.sort_by(|a, b| b.weight().cmp(&a.weight()));

    let mut used_headings: HashSet<usize> = HashSet::new();
    let mut injected = Vec::new();

    for term in terms {
        if injected.len() >= max_count {
            break;
        }

        let headings = doc.headings(HEADING_LEVELS);
        let Some(heading) = headings
            .into_iter()
            .filter(|h| !used_headings.contains(&h.ordinal))
            .find(|h| accepts(&h.text, term))
        else {
            continue;
        };

        let style = if heading.text.chars().count() < SHORT_HEADING_CHARS && rng.gen_bool(0.5) {
            HeadingStyle::Append
        } else {
            HeadingStyle::Prepend
        };
        let rewritten = rewrite(&heading.text, term.text.trim(), style);

        if let Err(e) = doc.replace_inner(heading.element, &escape_html(&rewritten)) {
            warn!("Heading rewrite failed for {:?}: {}", term.text, e);
            continue;
        }
        debug!(
            "Rewrote h{} {:?} -> {:?}",
            heading.level, heading.text, rewritten
        );

        used_headings.insert(heading.ordinal);
        injected.push(HeaderInjection {
            term: term.clone(),
            style,
            level: heading.level,
            previous: heading.text,
            heading: rewritten,
        });
    }

    injected
}

/// A heading takes a term when it lacks it, is not too long, and either shares
/// a significant word with it or the term is important enough to force.
fn accepts(heading: &str, term: &Term) -> bool {
    if heading.is_empty() || heading.chars().count() > MAX_HEADING_CHARS {
        return false;
    }
    if heading.to_lowercase().contains(&term.key()) {
        return false;
    }
    if term.weight() >= FORCE_IMPORTANCE {
        return true;
    }
    let heading_words: HashSet<String> = significant_words(heading)
        .into_iter()
        .map(|w| trim_punctuation(&w).to_string())
        .collect();
    term.significant_words()
        .iter()
        .any(|w| heading_words.contains(trim_punctuation(w)))
}

fn trim_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}

fn rewrite(heading: &str, term: &str, style: HeadingStyle) -> String {
    match style {
        HeadingStyle::Append if heading.contains(':') => format!("{} \u{2014} {}", heading, term),
        HeadingStyle::Append => format!("{}: {}", heading, term),
        HeadingStyle::Prepend => format!("{} in {}", term, heading),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use termweave_core::TermCategory;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(11)
    }

    #[test]
    fn test_forced_injection_without_overlap() {
        let mut doc = Document::parse("<h2>Getting Started</h2><p>Body.</p>");
        let term = Term::new("keyword research", TermCategory::Title, 95);
        let injected = inject_headers(&mut doc, &[term], 5, &mut rng());

        assert_eq!(injected.len(), 1);
        let heading = &doc.headings(HEADING_LEVELS)[0];
        assert!(heading.text.to_lowercase().contains("keyword research"));
        assert!(heading.text.contains("Getting Started"));
        assert!(doc.as_str().ends_with("<p>Body.</p>"));
    }

    #[test]
    fn test_requires_overlap_below_force_threshold() {
        let mut doc = Document::parse("<h2>Getting Started</h2><h3>Research Basics</h3>");
        let term = Term::new("keyword research", TermCategory::Header, 60);
        let injected = inject_headers(&mut doc, &[term], 5, &mut rng());

        assert_eq!(injected.len(), 1);
        assert_eq!(injected[0].previous, "Research Basics");
        assert_eq!(doc.headings(HEADING_LEVELS)[0].text, "Getting Started");
    }

    #[test]
    fn test_one_term_per_heading_and_budget() {
        let mut doc = Document::parse("<h2>Alpha</h2><h2>Beta</h2><h2>Gamma</h2>");
        let terms = vec![
            Term::new("first", TermCategory::Title, 91),
            Term::new("second", TermCategory::Title, 99),
            Term::new("third", TermCategory::Header, 95),
        ];
        let injected = inject_headers(&mut doc, &terms, 2, &mut rng());

        assert_eq!(injected.len(), 2);
        // Highest importance goes first and takes the first heading.
        assert_eq!(injected[0].term.text, "second");
        assert_eq!(injected[0].previous, "Alpha");
        assert_eq!(injected[1].previous, "Beta");
        assert_eq!(doc.headings(HEADING_LEVELS)[2].text, "Gamma");
    }

    #[test]
    fn test_skips_body_terms_and_other_levels() {
        let mut doc = Document::parse("<h1>Main Topic</h1><h4>Minor Topic</h4>");
        let terms = vec![
            Term::new("topic guide", TermCategory::Title, 99),
            Term::new("extra", TermCategory::Basic, 99),
        ];
        assert!(inject_headers(&mut doc, &terms, 5, &mut rng()).is_empty());
        assert_eq!(doc.as_str(), "<h1>Main Topic</h1><h4>Minor Topic</h4>");
    }

    #[test]
    fn test_long_heading_is_rejected() {
        let long = "A".repeat(81);
        let mut doc = Document::parse(format!("<h2>{}</h2>", long));
        let term = Term::new("guide", TermCategory::Title, 99);
        assert!(inject_headers(&mut doc, &[term], 5, &mut rng()).is_empty());
    }

    #[test]
    fn test_rewrite_styles() {
        assert_eq!(rewrite("Tips", "seo", HeadingStyle::Append), "Tips: seo");
        assert_eq!(rewrite("Step 1: Plan", "seo", HeadingStyle::Append), "Step 1: Plan \u{2014} seo");
        assert_eq!(rewrite("Tips", "seo", HeadingStyle::Prepend), "seo in Tips");
        assert_eq!(rewrite("Tips", "SEO Audit", HeadingStyle::Prepend), "SEO Audit in Tips");
    }

    #[test]
    fn test_long_headings_always_prepend() {
        let heading = "A fairly long heading about many useful things";
        let mut doc = Document::parse(format!("<h3>{}</h3>", heading));
        let term = Term::new("checklist", TermCategory::Header, 95);
        let injected = inject_headers(&mut doc, &[term], 1, &mut rng());
        assert_eq!(injected[0].style, HeadingStyle::Prepend);
        assert_eq!(injected[0].heading, format!("checklist in {}", heading));
    }

    #[test]
    fn test_heading_text_is_escaped() {
        let mut doc = Document::parse("<h2>Q&amp;A</h2>");
        let term = Term::new("R&D", TermCategory::Title, 99);
        inject_headers(&mut doc, &[term], 1, &mut rng());
        assert!(doc.as_str().contains("R&amp;D"));
        assert!(!doc.as_str().contains("R&D"));
    }
}
