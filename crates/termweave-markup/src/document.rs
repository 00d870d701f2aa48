//! Flat element index over a markup string.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use termweave_core::{Error, Result};
use tracing::debug;

use crate::text::{skip_raw_text, visible_text, RAW_TEXT_TAGS, TAG_RE};

/// Elements that never have content.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements that implicitly close an open `p`.
const P_CLOSERS: &[&str] = &[
    "address", "article", "aside", "blockquote", "div", "dl", "figure", "footer", "form", "h1",
    "h2", "h3", "h4", "h5", "h6", "header", "hr", "main", "nav", "ol", "p", "pre", "section",
    "table", "ul",
];

/// Elements that count as block-level structure when deciding whether a
/// container is a leaf.
const STRUCTURAL_TAGS: &[&str] = &[
    "article", "aside", "blockquote", "div", "dl", "figure", "footer", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "li", "nav", "ol", "p", "pre", "section", "table", "td", "th",
    "ul",
];

/// One element of the parsed markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Lowercased tag name.
    pub tag: String,
    /// Byte span of the start tag.
    pub open: Range<usize>,
    /// Byte span between the start tag and the (possibly implicit) end tag.
    pub inner: Range<usize>,
    /// Index of the enclosing element.
    pub parent: Option<usize>,
}

/// Kind of block-level content that can receive a sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockKind {
    Paragraph,
    ListItem,
    Cell,
    Container,
}

impl BlockKind {
    fn for_tag(tag: &str) -> Option<Self> {
        match tag {
            "p" => Some(Self::Paragraph),
            "li" => Some(Self::ListItem),
            "td" | "th" => Some(Self::Cell),
            "div" | "aside" | "section" => Some(Self::Container),
            _ => None,
        }
    }
}

/// Stable identity of a block: its ordinal among block-kind elements.
///
/// Survives re-parsing as long as edits add no block-level tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BlockId(pub usize);

/// A block-level element with its visible text.
#[derive(Debug, Clone)]
pub struct Block {
    pub id: BlockId,
    /// Index into [`Document::elements`] at the time the block was listed.
    pub element: usize,
    pub kind: BlockKind,
    pub text: String,
}

/// A heading element with its visible text.
#[derive(Debug, Clone)]
pub struct Heading {
    /// Ordinal among headings of any level.
    pub ordinal: usize,
    pub element: usize,
    pub level: u8,
    pub text: String,
}

/// Owned markup plus its element index.
#[derive(Debug, Clone)]
pub struct Document {
    source: String,
    elements: Vec<Element>,
}

impl Document {
    /// Tokenize markup into an element index. Never fails: stray end tags are
    /// ignored and unclosed elements end where the input ends.
    pub fn parse(markup: impl Into<String>) -> Self {
        let source = markup.into();
        let elements = index_elements(&source);
        Self { source, elements }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn into_markup(self) -> String {
        self.source
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Visible text of the whole document.
    pub fn text(&self) -> String {
        visible_text(&self.source)
    }

    pub fn inner_html(&self, element: usize) -> &str {
        self.elements
            .get(element)
            .map(|el| &self.source[el.inner.clone()])
            .unwrap_or("")
    }

    pub fn text_of(&self, element: usize) -> String {
        visible_text(self.inner_html(element))
    }

    /// Walk enclosing elements, innermost first.
    pub fn ancestors(&self, element: usize) -> impl Iterator<Item = &Element> + '_ {
        let mut next = self.elements.get(element).and_then(|el| el.parent);
        std::iter::from_fn(move || {
            let idx = next?;
            let el = &self.elements[idx];
            next = el.parent;
            Some(el)
        })
    }

    /// Whether any enclosing element has one of `tags`.
    pub fn has_ancestor(&self, element: usize, tags: &[&str]) -> bool {
        self.ancestors(element)
            .any(|el| tags.contains(&el.tag.as_str()))
    }

    /// All block-kind elements in document order.
    ///
    /// Containers are only listed when they hold no nested block structure.
    pub fn blocks(&self) -> Vec<Block> {
        let has_structure = self.structural_descendants();
        let mut blocks = Vec::new();
        let mut ordinal = 0;

        for (idx, el) in self.elements.iter().enumerate() {
            let Some(kind) = BlockKind::for_tag(&el.tag) else {
                continue;
            };
            let id = BlockId(ordinal);
            ordinal += 1;
            if kind == BlockKind::Container && has_structure[idx] {
                continue;
            }
            blocks.push(Block {
                id,
                element: idx,
                kind,
                text: self.text_of(idx),
            });
        }
        blocks
    }

    /// Headings whose level is in `levels`.
    pub fn headings(&self, levels: &[u8]) -> Vec<Heading> {
        self.elements
            .iter()
            .enumerate()
            .filter_map(|(idx, el)| heading_level(&el.tag).map(|level| (idx, level)))
            .enumerate()
            .filter(|(_, (_, level))| levels.contains(level))
            .map(|(ordinal, (idx, level))| Heading {
                ordinal,
                element: idx,
                level,
                text: self.text_of(idx),
            })
            .collect()
    }

    /// Replace the inner markup of one element, leaving every other byte intact.
    pub fn replace_inner(&mut self, element: usize, markup: &str) -> Result<()> {
        let range = self
            .elements
            .get(element)
            .map(|el| el.inner.clone())
            .ok_or_else(|| Error::Markup(format!("no element at index {}", element)))?;

        let mut source = std::mem::take(&mut self.source);
        source.replace_range(range.clone(), markup);
        debug!(
            "Replaced inner markup of element {} ({} -> {} bytes)",
            element,
            range.len(),
            markup.len()
        );
        *self = Self::parse(source);
        Ok(())
    }

    /// For each element, whether it has a structural descendant.
    fn structural_descendants(&self) -> Vec<bool> {
        let mut flags = vec![false; self.elements.len()];
        for (idx, el) in self.elements.iter().enumerate() {
            if !STRUCTURAL_TAGS.contains(&el.tag.as_str()) {
                continue;
            }
            let mut parent = self.elements[idx].parent;
            while let Some(p) = parent {
                if flags[p] {
                    break;
                }
                flags[p] = true;
                parent = self.elements[p].parent;
            }
        }
        flags
    }
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag.as_bytes() {
        [b'h', d @ b'1'..=b'6'] => Some(d - b'0'),
        _ => None,
    }
}

/// Build the element list with a stack of open elements.
fn index_elements(source: &str) -> Vec<Element> {
    let lower = source.to_ascii_lowercase();
    let mut elements: Vec<Element> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut pos = 0;

    while let Some(caps) = TAG_RE.captures_at(source, pos) {
        let Some(whole) = caps.get(0) else { break };
        pos = whole.end();

        let Some(name) = caps.get(2) else { continue };
        let tag = name.as_str().to_ascii_lowercase();
        let closing = caps.get(1).is_some_and(|c| !c.as_str().is_empty());

        if closing {
            close_named(&mut elements, &mut open, &tag, whole.start());
            continue;
        }

        close_implied(&mut elements, &mut open, &tag, whole.start());

        let self_closing = caps
            .get(3)
            .is_some_and(|attrs| attrs.as_str().trim_end().ends_with('/'));
        let idx = elements.len();
        elements.push(Element {
            tag: tag.clone(),
            open: whole.range(),
            inner: whole.end()..whole.end(),
            parent: open.last().copied(),
        });

        if VOID_TAGS.contains(&tag.as_str()) || self_closing {
            continue;
        }
        if RAW_TEXT_TAGS.contains(&tag.as_str()) {
            let (content_end, resume) = skip_raw_text(&lower, &tag, whole.end());
            elements[idx].inner.end = content_end;
            pos = resume;
            continue;
        }
        open.push(idx);
    }

    for idx in open {
        elements[idx].inner.end = source.len();
    }
    elements
}

/// Close the innermost open element named `tag` and everything nested in it.
fn close_named(elements: &mut [Element], open: &mut Vec<usize>, tag: &str, at: usize) {
    let Some(depth) = open.iter().rposition(|&idx| elements[idx].tag == tag) else {
        return;
    };
    for idx in open.drain(depth..) {
        elements[idx].inner.end = at;
    }
}

/// Apply the implicit end-tag rules for `p`, `li` and table cells.
fn close_implied(elements: &mut [Element], open: &mut Vec<usize>, tag: &str, at: usize) {
    if P_CLOSERS.contains(&tag) && top_is(elements, open, &["p"]) {
        close_top(elements, open, at);
    }
    match tag {
        "li" if top_is(elements, open, &["li"]) => close_top(elements, open, at),
        "td" | "th" if top_is(elements, open, &["td", "th"]) => close_top(elements, open, at),
        "tr" => {
            if top_is(elements, open, &["td", "th"]) {
                close_top(elements, open, at);
            }
            if top_is(elements, open, &["tr"]) {
                close_top(elements, open, at);
            }
        }
        _ => {}
    }
}

fn top_is(elements: &[Element], open: &[usize], names: &[&str]) -> bool {
    open.last()
        .is_some_and(|&idx| names.contains(&elements[idx].tag.as_str()))
}

fn close_top(elements: &mut [Element], open: &mut Vec<usize>, at: usize) {
    if let Some(idx) = open.pop() {
        elements[idx].inner.end = at;
    }
}
