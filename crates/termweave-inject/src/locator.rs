//! Insertion-point scoring — which block should carry a given term.
//!
//! Blocks are rejected in order of cost: saturation, length window, existing
//! mention, forbidden ancestors. Survivors are scored on related-word hits,
//! literal term-word hits and sentence structure.

use std::collections::HashMap;

use serde::Serialize;
use termweave_analyze::related_terms;
use termweave_core::Term;
use termweave_markup::{count_terminators, split_sentences, Block, BlockId, BlockKind, Document};
use tracing::debug;

/// Body insertions allowed per block within one run.
pub const MAX_INSERTIONS_PER_BLOCK: usize = 2;

/// Plausibility window for a block's visible text, in characters.
pub const MIN_BLOCK_CHARS: usize = 80;
pub const MAX_BLOCK_CHARS: usize = 600;

/// Candidates scoring below this are dropped.
pub const MIN_RELEVANCE: u32 = 10;

const RELATED_HIT_SCORE: u32 = 15;
const TERM_WORD_SCORE: u32 = 10;
const STRUCTURE_BONUS: u32 = 5;

/// Sentences longer than this count towards the splice position.
const SUBSTANTIAL_SENTENCE_CHARS: usize = 20;

/// Content inside these must stay verbatim.
pub const FORBIDDEN_ANCESTORS: &[&str] = &[
    "a", "h1", "h2", "h3", "h4", "h5", "h6", "blockquote", "q", "code", "pre", "script", "style",
];

/// Block identity → body insertions made so far this run.
pub type SaturationCounters = HashMap<BlockId, usize>;

/// Where in a block the new sentence goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsertPosition {
    Start,
    Middle,
    End,
}

/// A scored destination for one term. Valid only for the parse it came from.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertionPoint {
    pub block: BlockId,
    #[serde(skip)]
    pub element: usize,
    pub block_kind: BlockKind,
    pub normalized_text: String,
    pub matched_related_terms: Vec<String>,
    pub relevance_score: u32,
    pub insert_position: InsertPosition,
}

/// Scans candidate blocks for one term.
#[derive(Debug, Clone, Copy, Default)]
pub struct InsertionPointLocator {
    /// Also consider leaf `div`/`aside`/`section` blocks.
    pub include_containers: bool,
}

impl InsertionPointLocator {
    pub fn new(include_containers: bool) -> Self {
        Self { include_containers }
    }

    /// Ranked insertion points for `term`, best first. Ties keep document order.
    pub fn find(
        &self,
        doc: &Document,
        term: &Term,
        saturation: &SaturationCounters,
    ) -> Vec<InsertionPoint> {
        let term_key = term.key();
        let term_words = term.significant_words();
        let related = related_terms(&term.text);

        let mut points: Vec<InsertionPoint> = doc
            .blocks()
            .into_iter()
            .filter(|block| self.accepts_kind(block.kind))
            .filter(|block| saturation.get(&block.id).copied().unwrap_or(0) < MAX_INSERTIONS_PER_BLOCK)
            .filter(|block| {
                let len = block.text.chars().count();
                (MIN_BLOCK_CHARS..=MAX_BLOCK_CHARS).contains(&len)
            })
            .filter_map(|block| {
                let lower = block.text.to_lowercase();
                if lower.contains(&term_key) {
                    return None;
                }
                if doc.has_ancestor(block.element, FORBIDDEN_ANCESTORS) {
                    return None;
                }
                score_block(block, &lower, &term_words, related.iter().map(String::as_str))
            })
            .collect();

        points.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));
        debug!(
            "Found {} insertion points for {:?}",
            points.len(),
            term.text
        );
        points
    }

    fn accepts_kind(&self, kind: BlockKind) -> bool {
        kind != BlockKind::Container || self.include_containers
    }
}

fn score_block<'a>(
    block: Block,
    lower: &str,
    term_words: &[String],
    related: impl Iterator<Item = &'a str>,
) -> Option<InsertionPoint> {
    let matched: Vec<String> = related
        .filter(|word| lower.contains(word))
        .map(str::to_string)
        .collect();

    let mut score = matched.len() as u32 * RELATED_HIT_SCORE;
    score += term_words
        .iter()
        .filter(|w| lower.contains(w.as_str()))
        .count() as u32
        * TERM_WORD_SCORE;
    if count_terminators(&block.text) >= 2 {
        score += STRUCTURE_BONUS;
    }
    if score < MIN_RELEVANCE {
        return None;
    }

    let insert_position = preferred_position(&block.text);
    Some(InsertionPoint {
        block: block.id,
        element: block.element,
        block_kind: block.kind,
        normalized_text: block.text,
        matched_related_terms: matched,
        relevance_score: score,
        insert_position,
    })
}

/// Three or more substantial sentences go in the middle; otherwise the end.
fn preferred_position(text: &str) -> InsertPosition {
    let substantial = split_sentences(text)
        .into_iter()
        .filter(|s| s.chars().count() > SUBSTANTIAL_SENTENCE_CHARS)
        .count();
    if substantial >= 3 {
        InsertPosition::Middle
    } else {
        InsertPosition::End
    }
}
