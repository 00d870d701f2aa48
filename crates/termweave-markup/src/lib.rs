//! Termweave Markup — a flat, indexable view over rendered markup.
//!
//! Content is tokenized once into an element list with byte spans. Edits
//! replace exactly one element's inner span and re-parse, so everything
//! outside the edited element stays byte-identical.

pub mod document;
pub mod text;

pub use document::{Block, BlockId, BlockKind, Document, Element, Heading};
pub use text::{
    count_terminators, decode_entities, escape_html, sentence_breaks, split_sentences,
    visible_text,
};
