use std::sync::LazyLock;

use regex::Regex;

use crate::block::{BlockKind, Span};
use crate::error::{Error, Result};
use crate::html::HtmlNode;
use crate::inline::{self, ItalicDelimiter};

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^#{1,6} .+").unwrap());

const FENCE: &str = "```";

/// Knobs for rendering a document.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub italic: ItalicDelimiter,
}

/// Split a document into blank-line separated blocks, trimmed, with empty
/// blocks dropped.
pub fn split_into_blocks(markdown: &str) -> Vec<&str> {
    markdown
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .collect()
}

pub fn classify(block: &str) -> BlockKind {
    if HEADING_RE.is_match(block) {
        return BlockKind::Heading;
    }
    if block.starts_with(FENCE) && block.ends_with(FENCE) {
        return BlockKind::Code;
    }
    if block.starts_with("> ") {
        return BlockKind::Quote;
    }
    if block.starts_with("- ") || block.starts_with("* ") {
        return BlockKind::UnorderedList;
    }
    if is_ordered_item(block) {
        return BlockKind::OrderedList;
    }
    BlockKind::Paragraph
}

/// `1. ` through `9. `; multi-digit markers don't count.
fn is_ordered_item(block: &str) -> bool {
    let bytes = block.as_bytes();
    bytes.len() >= 3 && matches!(bytes[0], b'1'..=b'9') && bytes[1] == b'.' && bytes[2] == b' '
}

/// Convert one block into its HTML subtree.
pub fn compose(block: &str, options: &RenderOptions) -> Result<HtmlNode> {
    match classify(block) {
        BlockKind::Paragraph => paragraph_to_html(block, options),
        BlockKind::Heading => heading_to_html(block, options),
        BlockKind::Code => code_to_html(block, options),
        BlockKind::Quote => quote_to_html(block, options),
        BlockKind::UnorderedList => list_to_html(block, "ul", 2, options),
        BlockKind::OrderedList => list_to_html(block, "ol", 3, options),
    }
}

/// Render a whole document into a `div` holding one subtree per block.
pub fn document_to_tree(markdown: &str, options: &RenderOptions) -> Result<HtmlNode> {
    let children = split_into_blocks(markdown)
        .into_iter()
        .map(|block| compose(block, options))
        .collect::<Result<Vec<_>>>()?;
    Ok(HtmlNode::parent("div", children))
}

/// The text of the first `# ` heading.
pub fn extract_title(markdown: &str) -> Result<String> {
    markdown
        .lines()
        .find_map(|line| line.strip_prefix("# "))
        .map(|title| title.trim().to_string())
        .ok_or(Error::NoTitle)
}

fn text_to_children(text: &str, options: &RenderOptions) -> Result<Vec<HtmlNode>> {
    let spans = inline::tokenize(text, options.italic)?;
    Ok(spans.iter().map(Span::to_html_node).collect())
}

fn paragraph_to_html(block: &str, options: &RenderOptions) -> Result<HtmlNode> {
    let text = block.lines().collect::<Vec<_>>().join(" ");
    Ok(HtmlNode::parent("p", text_to_children(&text, options)?))
}

fn heading_to_html(block: &str, options: &RenderOptions) -> Result<HtmlNode> {
    let level = block.bytes().take_while(|&b| b == b'#').count();
    let text = block[level..].strip_prefix(' ').unwrap_or_default();
    if text.trim().is_empty() {
        return Err(Error::EmptyHeading);
    }
    Ok(HtmlNode::parent(
        format!("h{level}"),
        text_to_children(text, options)?,
    ))
}

// Drops the opening fence plus one character and the closing fence. A fence
// with a language tag keeps all but the tag's first character in the output.
fn code_to_html(block: &str, options: &RenderOptions) -> Result<HtmlNode> {
    if !(block.starts_with(FENCE) && block.ends_with(FENCE)) {
        return Err(Error::MalformedCodeBlock);
    }

    let after_fence = &block[FENCE.len()..];
    let start = FENCE.len() + after_fence.chars().next().map_or(0, char::len_utf8);
    let end = block.len() - FENCE.len();
    let text = if start < end { &block[start..end] } else { "" };

    let code = HtmlNode::parent("code", text_to_children(text, options)?);
    Ok(HtmlNode::parent("pre", vec![code]))
}

fn quote_to_html(block: &str, options: &RenderOptions) -> Result<HtmlNode> {
    let mut lines = Vec::new();
    for line in block.lines() {
        if !line.starts_with("> ") && !line.ends_with('>') {
            return Err(Error::MalformedQuote {
                line: line.to_string(),
            });
        }
        lines.push(line.strip_prefix('>').unwrap_or(line).trim());
    }
    let text = lines.join(" ");
    Ok(HtmlNode::parent("blockquote", text_to_children(&text, options)?))
}

fn list_to_html(
    block: &str,
    tag: &str,
    marker_width: usize,
    options: &RenderOptions,
) -> Result<HtmlNode> {
    let items = block
        .lines()
        .map(|line| {
            let text = skip_chars(line, marker_width);
            Ok(HtmlNode::parent("li", text_to_children(text, options)?))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(HtmlNode::parent(tag, items))
}

fn skip_chars(line: &str, count: usize) -> &str {
    match line.char_indices().nth(count) {
        Some((i, _)) => &line[i..],
        None => "",
    }
}
