use crate::html::HtmlNode;

/// A run of inline text with a single formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Span {
    Text(String),
    Bold(String),
    Italic(String),
    Code(String),
    Link { text: String, url: String },
    Image { alt: String, url: String },
}

/// The formatting of a [`Span`], without its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Text,
    Bold,
    Italic,
    Code,
    Link,
    Image,
}

/// Block-level constructs recognized in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    Heading,
    Code,
    Quote,
    UnorderedList,
    OrderedList,
}

impl Span {
    pub fn kind(&self) -> SpanKind {
        match self {
            Span::Text(_) => SpanKind::Text,
            Span::Bold(_) => SpanKind::Bold,
            Span::Italic(_) => SpanKind::Italic,
            Span::Code(_) => SpanKind::Code,
            Span::Link { .. } => SpanKind::Link,
            Span::Image { .. } => SpanKind::Image,
        }
    }

    /// Visible text of the span; the alt text for images.
    pub fn text(&self) -> &str {
        match self {
            Span::Text(text) | Span::Bold(text) | Span::Italic(text) | Span::Code(text) => text,
            Span::Link { text, .. } => text,
            Span::Image { alt, .. } => alt,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Span::Link { url, .. } | Span::Image { url, .. } => Some(url),
            _ => None,
        }
    }

    pub fn to_html_node(&self) -> HtmlNode {
        match self {
            Span::Text(text) => HtmlNode::text(text.as_str()),
            Span::Bold(text) => HtmlNode::leaf("b", text.as_str()),
            Span::Italic(text) => HtmlNode::leaf("i", text.as_str()),
            Span::Code(text) => HtmlNode::leaf("code", text.as_str()),
            Span::Link { text, url } => {
                HtmlNode::leaf("a", text.as_str()).with_attr("href", url.as_str())
            }
            Span::Image { alt, url } => HtmlNode::leaf("img", "")
                .with_attr("src", url.as_str())
                .with_attr("alt", alt.as_str()),
        }
    }
}
