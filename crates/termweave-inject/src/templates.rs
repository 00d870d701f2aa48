//! Sentence frames and the policy for choosing one.

use rand::Rng;
use serde::Serialize;
use termweave_core::Term;
use termweave_markup::escape_html;

use crate::locator::InsertPosition;

/// Placeholder replaced by the emphasized term.
pub const TERM_PLACEHOLDER: &str = "{term}";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateCategory {
    Definition,
    Importance,
    Example,
    Comparison,
    Action,
    Transition,
    Expert,
}

impl TemplateCategory {
    pub const ALL: [TemplateCategory; 7] = [
        Self::Definition,
        Self::Importance,
        Self::Example,
        Self::Comparison,
        Self::Action,
        Self::Transition,
        Self::Expert,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Definition => "definition",
            Self::Importance => "importance",
            Self::Example => "example",
            Self::Comparison => "comparison",
            Self::Action => "action",
            Self::Transition => "transition",
            Self::Expert => "expert",
        }
    }

    pub fn templates(&self) -> &'static [&'static str] {
        match self {
            Self::Definition => &[
                "In simple terms, {term} describes the core idea behind this topic.",
                "Put plainly, {term} refers to the practice discussed here.",
                "At its core, {term} is about getting the fundamentals right.",
                "Many readers first meet {term} as a practical concept rather than a theory.",
            ],
            Self::Importance => &[
                "Paying attention to {term} makes a real difference in the outcome.",
                "It is worth remembering that {term} plays a key role here.",
                "Few factors matter as much as {term} in this area.",
                "Getting {term} right is often what separates good results from average ones.",
            ],
            Self::Example => &[
                "A good example is how {term} fits naturally into everyday work.",
                "For instance, {term} can be applied step by step to the situation above.",
                "Consider how {term} shows up in the cases described here.",
                "One practical case is using {term} to guide each decision.",
            ],
            Self::Comparison => &[
                "Compared with older habits, {term} offers a clearer path forward.",
                "Unlike quick fixes, {term} tends to deliver lasting results.",
                "Where other options fall short, {term} often fills the gap.",
            ],
            Self::Action => &[
                "Start by looking at {term} before making any changes.",
                "Begin with {term} and build from there.",
                "Take a moment to review {term} as a first step.",
            ],
            Self::Transition => &[
                "With that in mind, {term} deserves a closer look.",
                "This is also where {term} comes into play.",
                "Building on this, {term} becomes the natural next consideration.",
                "All of this connects directly to {term}.",
            ],
            Self::Expert => &[
                "Experienced practitioners often point to {term} as a deciding factor.",
                "Specialists tend to agree that {term} rewards careful attention.",
                "Seasoned professionals rarely overlook {term}.",
            ],
        }
    }
}

/// Pick a template category for a term at a given insertion point.
///
/// Heading-class terms get a framing category; topically rich blocks get an
/// illustration; otherwise the splice position decides.
pub fn select_category<R: Rng + ?Sized>(
    rng: &mut R,
    term: &Term,
    matched_related: usize,
    position: InsertPosition,
) -> TemplateCategory {
    if term.category.is_heading_class() {
        return if rng.gen_bool(0.5) {
            TemplateCategory::Importance
        } else {
            TemplateCategory::Definition
        };
    }
    if matched_related >= 2 {
        return TemplateCategory::Example;
    }
    match position {
        InsertPosition::Start => TemplateCategory::Action,
        InsertPosition::End => TemplateCategory::Transition,
        InsertPosition::Middle => {
            TemplateCategory::ALL[rng.gen_range(0..TemplateCategory::ALL.len())]
        }
    }
}

/// Uniformly pick one frame from a category.
pub fn select_template<R: Rng + ?Sized>(rng: &mut R, category: TemplateCategory) -> &'static str {
    let templates = category.templates();
    templates[rng.gen_range(0..templates.len())]
}

/// Substitute the emphasized, escaped term into a frame.
pub fn render(template: &str, term: &str) -> String {
    let emphasized = format!("<strong>{}</strong>", escape_html(term.trim()));
    template.replacen(TERM_PLACEHOLDER, &emphasized, 1)
}
