//! Static topic clusters used to judge whether a block is topically close
//! to a term. Loose substring matching; short terms can over-match.

use std::collections::BTreeSet;

use termweave_core::term::significant_words;

/// Topic → hand-authored word list.
const TERM_CLUSTERS: &[(&str, &[&str])] = &[
    ("content", &[
        "content", "article", "writing", "blog", "post", "copy", "quality",
        "readers", "audience", "editorial", "story", "publish",
    ]),
    ("seo", &[
        "seo", "search", "ranking", "rankings", "keyword", "keywords",
        "optimization", "serp", "traffic", "visibility", "backlinks", "google",
        "organic", "content",
    ]),
    ("marketing", &[
        "marketing", "campaign", "brand", "audience", "conversion", "funnel",
        "leads", "promotion", "advertising", "social", "email", "engagement",
    ]),
    ("technology", &[
        "technology", "software", "digital", "platform", "tools", "automation",
        "data", "cloud", "integration", "system", "developer",
    ]),
    ("business", &[
        "business", "company", "revenue", "growth", "customers", "market",
        "sales", "profit", "enterprise", "startup", "management",
    ]),
    ("ecommerce", &[
        "ecommerce", "shop", "store", "product", "products", "checkout", "cart",
        "pricing", "retail", "online", "shipping",
    ]),
    ("health", &[
        "health", "wellness", "fitness", "nutrition", "medical", "diet",
        "exercise", "care", "sleep",
    ]),
    ("education", &[
        "education", "learning", "course", "training", "student", "teaching",
        "lesson", "skills", "tutorial",
    ]),
    ("finance", &[
        "finance", "money", "investment", "budget", "savings", "credit",
        "banking", "loan", "insurance",
    ]),
    ("design", &[
        "design", "layout", "user", "experience", "interface", "visual",
        "usability", "accessibility", "typography",
    ]),
];

/// Always part of the related set, whatever the term.
const GENERIC_WORDS: &[&str] = &[
    "important", "effective", "strategy", "method", "approach", "process",
];

/// Minimum topic score for a cluster to count as related.
const TOPIC_THRESHOLD: u32 = 2;

/// Words topically related to `term`, including the generic set.
pub fn related_terms(term: &str) -> BTreeSet<String> {
    let mut related: BTreeSet<String> = GENERIC_WORDS.iter().map(|w| w.to_string()).collect();
    for (_, words) in qualifying_clusters(term) {
        related.extend(words.iter().map(|w| w.to_string()));
    }
    related
}

/// Names of the clusters `term` qualifies for, in table order.
pub fn matching_topics(term: &str) -> Vec<&'static str> {
    qualifying_clusters(term)
        .map(|(topic, _)| topic)
        .collect()
}

fn qualifying_clusters(term: &str) -> impl Iterator<Item = (&'static str, &'static [&'static str])> {
    let term_lower = term.trim().to_lowercase();
    let term_words = significant_words(&term_lower);
    TERM_CLUSTERS
        .iter()
        .copied()
        .filter(move |(_, words)| topic_score(&term_lower, &term_words, words) >= TOPIC_THRESHOLD)
}

/// +2 when the term and some topic word contain one another; +1 for each
/// significant term word that appears inside some topic word.
fn topic_score(term_lower: &str, term_words: &[String], topic_words: &[&str]) -> u32 {
    if term_lower.is_empty() {
        return 0;
    }
    let mut score = 0;
    if topic_words
        .iter()
        .any(|w| term_lower.contains(w) || w.contains(term_lower))
    {
        score += 2;
    }
    for word in term_words {
        if topic_words.iter().any(|w| w.contains(word.as_str())) {
            score += 1;
        }
    }
    score
}
