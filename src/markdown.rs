//! Markdown parsing utilities
//!
//! Wiki links and inline tags are not part of CommonMark, so they are found
//! with regexes. Inline tags are only searched in text that pulldown-cmark
//! reports as prose, which keeps `#include` inside a code block from being
//! read as a tag.

use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use regex::{Regex, RegexBuilder};

/// `[[target]]`, `[[target|alias]]`, `[[target#heading]]`
static WIKI_LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\[\]]+)\]\]").expect("valid wiki link regex"));

/// `#tag`, `#parent/child`, preceded by start of text or whitespace
static INLINE_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)#([\p{L}\p{N}_/\-]+)").expect("valid tag regex"));

/// A wiki-style link found in a note body
#[derive(Debug, Clone, PartialEq)]
pub struct WikiLink {
    /// Link target as written (no alias, heading, or block suffix)
    pub target: String,
    /// Display alias after `|`, if any
    pub alias: Option<String>,
}

/// Extract all `[[...]]` links from markdown content, in order of appearance
pub fn extract_wiki_links(content: &str) -> Vec<WikiLink> {
    WIKI_LINK_RE
        .captures_iter(content)
        .filter_map(|caps| {
            let inner = caps.get(1)?.as_str();
            let (target, alias) = match inner.split_once('|') {
                Some((target, alias)) => (target, Some(alias.trim().to_string())),
                None => (inner, None),
            };
            // Drop "#heading" and "^block" references
            let target = target.split(['#', '^']).next().unwrap_or("").trim();
            if target.is_empty() {
                return None;
            }
            Some(WikiLink { target: target.to_string(), alias })
        })
        .collect()
}

/// Extract inline `#tags` from markdown prose (without the `#`).
///
/// Code spans, code blocks, and HTML are skipped. Purely numeric tags
/// such as `#123` are not tags. Duplicates are removed, first occurrence wins.
pub fn extract_inline_tags(content: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let mut buffer = String::new();
    let mut in_code_block = false;

    for event in Parser::new(content) {
        match event {
            Event::Start(Tag::CodeBlock(_)) => {
                flush_tags(&mut buffer, &mut tags);
                in_code_block = true;
            }
            Event::End(TagEnd::CodeBlock) => {
                in_code_block = false;
            }
            Event::Text(text) => {
                if !in_code_block {
                    buffer.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => buffer.push('\n'),
            // A code span separates the text around it
            Event::Code(_) => buffer.push(' '),
            _ => flush_tags(&mut buffer, &mut tags),
        }
    }
    flush_tags(&mut buffer, &mut tags);

    tags
}

/// Collect tags from accumulated prose, then reset the buffer
fn flush_tags(buffer: &mut String, tags: &mut Vec<String>) {
    for caps in INLINE_TAG_RE.captures_iter(buffer) {
        let tag = caps[1].trim_end_matches('/');
        if tag.is_empty() || tag.chars().all(|c| c.is_ascii_digit()) {
            continue;
        }
        if !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    }
    buffer.clear();
}

/// First line of `body` that contains `#tag` as a whole token.
///
/// The tag must be preceded by the start of the line or whitespace and
/// followed by the end of the line, whitespace, or a character that can
/// not continue a tag, so `#project` does not match `#project/alpha` or
/// `#projectX`. Letter case only matters when `ignore_case` is false.
pub fn find_tag_line<'a>(body: &'a str, tag: &str, ignore_case: bool) -> Option<&'a str> {
    if tag.is_empty() {
        return None;
    }
    let pattern = format!(r"(?:^|\s)#{}(?:$|\s|[^\w/\-])", regex::escape(tag));
    let re = RegexBuilder::new(&pattern).case_insensitive(ignore_case).build().ok()?;
    body.lines().find(|line| re.is_match(line))
}
