//! # HTML Extraction
//!
//! Converts a DOM subtree of lyric markup into plain text with the source's
//! line breaks preserved.
//!
//! This is a selective filter, not a general HTML-to-text converter. Each
//! scrape-based provider supplies [`ExtractionRules`] naming the inline tags
//! it is known to use; text inside those tags is kept, a line-break tag
//! becomes `\n`, and every other element is dropped together with its
//! children (scripts, ads, navigation).
//!
//! Entity decoding happens once, in the html5ever parser behind `scraper`.
//! Traversal is bounded by [`ExtractionRules::max_depth`] and never fails:
//! malformed or hostile markup yields an empty or partial string.

use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Default nesting limit for inline-tag recursion.
pub const MAX_DEPTH: usize = 64;

/// Per-source extraction allowlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRules {
    /// Inline tags whose children are kept; the tag itself is invisible
    pub inline_tags: Vec<&'static str>,
    /// Tag that emits a newline
    pub line_break: &'static str,
    /// Deepest inline nesting followed before giving up on a branch
    pub max_depth: usize,
}

impl ExtractionRules {
    pub fn new(inline_tags: &[&'static str], line_break: &'static str) -> Self {
        Self {
            inline_tags: inline_tags.to_vec(),
            line_break,
            max_depth: MAX_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn is_inline(&self, tag: &str) -> bool {
        self.inline_tags
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(tag))
    }
}

/// Extracts the text of `root`'s children according to `rules`.
///
/// Leading and trailing newlines of the whole block are trimmed; spaces and
/// tabs at either end are kept.
pub fn extract_text(root: ElementRef<'_>, rules: &ExtractionRules) -> String {
    let mut output = String::new();
    collect(root, rules, 0, &mut output);
    output.trim_matches(is_newline).to_string()
}

/// Parses `markup` as a body fragment and extracts it with `rules`.
pub fn extract_fragment(markup: &str, rules: &ExtractionRules) -> String {
    let fragment = Html::parse_fragment(markup);
    extract_text(fragment.root_element(), rules)
}

/// First element in document order satisfying `predicate`.
pub fn find_element<'a, P>(document: &'a Html, mut predicate: P) -> Option<ElementRef<'a>>
where
    P: FnMut(&ElementRef<'a>) -> bool,
{
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| predicate(element))
}

fn is_newline(c: char) -> bool {
    c == '\n' || c == '\r'
}

fn collect(element: ElementRef<'_>, rules: &ExtractionRules, depth: usize, output: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                output.push_str(text.trim_matches(is_newline));
            }
            Node::Element(el) => {
                let name = el.name();
                if name.eq_ignore_ascii_case(rules.line_break) {
                    output.push('\n');
                } else if rules.is_inline(name) && depth < rules.max_depth {
                    if let Some(inner) = ElementRef::wrap(child) {
                        collect(inner, rules, depth + 1, output);
                    }
                }
            }
            _ => {}
        }
    }
}
