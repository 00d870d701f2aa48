//! Sentence splicing — places a rendered template inside one block.

use rand::Rng;
use serde::Serialize;
use termweave_core::{Error, Result, Term};
use termweave_markup::{sentence_breaks, Document};
use tracing::debug;

use crate::locator::{InsertPosition, InsertionPoint, FORBIDDEN_ANCESTORS};
use crate::templates::{render, select_category, select_template, TemplateCategory};

/// What was written into a block.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InjectedSentence {
    pub category: TemplateCategory,
    pub template: &'static str,
    pub sentence: String,
}

/// Choose a template for `term`, render it and splice it into the block at `point`.
///
/// `point` must come from the current parse of `doc`. On error the document
/// is left untouched.
pub fn inject_sentence<R: Rng + ?Sized>(
    doc: &mut Document,
    point: &InsertionPoint,
    term: &Term,
    rng: &mut R,
) -> Result<InjectedSentence> {
    let category = select_category(
        rng,
        term,
        point.matched_related_terms.len(),
        point.insert_position,
    );
    let template = select_template(rng, category);
    let sentence = render(template, &term.text);

    let spliced = splice_sentence(doc.inner_html(point.element), &sentence, point.insert_position)?;
    doc.replace_inner(point.element, &spliced)?;

    debug!(
        "Spliced {:?} into block {:?} ({:?}, {})",
        term.text,
        point.block,
        point.insert_position,
        category.name()
    );
    Ok(InjectedSentence {
        category,
        template,
        sentence,
    })
}

/// Insert `sentence` into a block's inner markup.
///
/// `Start` prefixes and `End` suffixes the sentence. `Middle` cuts the markup
/// at its median sentence break, counting only breaks in text outside tags
/// and outside [`FORBIDDEN_ANCESTORS`]; with no such break it suffixes.
/// Leading and trailing whitespace of the original markup is kept.
pub fn splice_sentence(inner: &str, sentence: &str, position: InsertPosition) -> Result<String> {
    let body = inner.trim();
    if body.is_empty() {
        return Err(Error::Unsplittable(format!(
            "no sentence chunks in {:?}",
            inner
        )));
    }
    let lead = &inner[..inner.len() - inner.trim_start().len()];
    let trail = &inner[inner.trim_end().len()..];

    let spliced = match position {
        InsertPosition::Start => format!("{} {}", sentence, body),
        InsertPosition::Middle => match middle_break(body) {
            Some(at) => format!("{} {} {}", body[..at].trim_end(), sentence, body[at..].trim_start()),
            None => format!("{} {}", body, sentence),
        },
        InsertPosition::End => format!("{} {}", body, sentence),
    };

    Ok(format!("{}{}{}", lead, spliced, trail))
}

/// The break that splits the body's sentence chunks into two halves, the
/// first half holding the smaller share.
fn middle_break(body: &str) -> Option<usize> {
    let breaks: Vec<usize> = sentence_breaks(body, FORBIDDEN_ANCESTORS)
        .into_iter()
        .filter(|&at| !body[at..].trim().is_empty())
        .collect();
    if breaks.is_empty() {
        return None;
    }
    Some(breaks[(breaks.len() + 1) / 2 - 1])
}
