//! Termweave Inject — the structural edits: where a term should go, what
//! sentence carries it, and how that sentence or heading rewrite is applied.
//!
//! Every random choice draws from a caller-supplied [`rand::Rng`].

pub mod headers;
pub mod locator;
pub mod sentence;
pub mod templates;

pub use headers::{inject_headers, HeaderInjection, HeadingStyle};
pub use locator::{InsertPosition, InsertionPoint, InsertionPointLocator, SaturationCounters};
pub use sentence::{inject_sentence, splice_sentence, InjectedSentence};
pub use templates::{select_category, select_template, TemplateCategory};
