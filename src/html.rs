//! HTML element tree and its serialization to markup.
//!
//! Text and attribute values are written verbatim, with no escaping.

use std::fmt;

use crate::error::{Error, Result};

/// Element attributes as ordered name/value pairs.
pub type Attrs = Vec<(String, String)>;

/// A node of the output tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HtmlNode {
    /// Terminal content. Without a tag the value is emitted as raw text.
    Leaf {
        tag: Option<String>,
        value: String,
        attrs: Attrs,
    },
    /// A container element. An empty child list renders as `<tag></tag>`.
    Parent {
        tag: String,
        children: Vec<HtmlNode>,
        attrs: Attrs,
    },
}

impl HtmlNode {
    pub fn leaf(tag: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Leaf {
            tag: Some(tag.into()),
            value: value.into(),
            attrs: Attrs::new(),
        }
    }

    /// Untagged leaf: raw text passthrough.
    pub fn text(value: impl Into<String>) -> Self {
        Self::Leaf {
            tag: None,
            value: value.into(),
            attrs: Attrs::new(),
        }
    }

    pub fn parent(tag: impl Into<String>, children: Vec<HtmlNode>) -> Self {
        Self::Parent {
            tag: tag.into(),
            children,
            attrs: Attrs::new(),
        }
    }

    /// Build a leaf from possibly-missing parts.
    ///
    /// A tagged leaf must carry a value. An untagged leaf without one is
    /// empty text.
    pub fn try_leaf(tag: Option<String>, value: Option<String>, attrs: Attrs) -> Result<Self> {
        let value = match (&tag, value) {
            (_, Some(value)) => value,
            (None, None) => String::new(),
            (Some(_), None) => return Err(Error::InvalidNode("leaf node has no value")),
        };
        Ok(Self::Leaf { tag, value, attrs })
    }

    /// Build a parent from possibly-missing parts. Both the tag and the child
    /// list are required; the list may be empty.
    pub fn try_parent(
        tag: Option<String>,
        children: Option<Vec<HtmlNode>>,
        attrs: Attrs,
    ) -> Result<Self> {
        let tag = tag.ok_or(Error::InvalidNode("parent node has no tag"))?;
        let children = children.ok_or(Error::InvalidNode("parent node has no children"))?;
        Ok(Self::Parent {
            tag,
            children,
            attrs,
        })
    }

    /// Append an attribute, keeping insertion order.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        match &mut self {
            Self::Leaf { attrs, .. } | Self::Parent { attrs, .. } => {
                attrs.push((name.into(), value.into()));
            }
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            Self::Leaf { tag, .. } => tag.as_deref(),
            Self::Parent { tag, .. } => Some(tag),
        }
    }

    pub fn attrs(&self) -> &Attrs {
        match self {
            Self::Leaf { attrs, .. } | Self::Parent { attrs, .. } => attrs,
        }
    }

    /// Children of a parent node; leaves have none.
    pub fn children(&self) -> &[HtmlNode] {
        match self {
            Self::Leaf { .. } => &[],
            Self::Parent { children, .. } => children,
        }
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Leaf {
                tag: None, value, ..
            } => out.push_str(value),
            Self::Leaf {
                tag: Some(tag),
                value,
                attrs,
            } => {
                open_tag(tag, attrs, out);
                out.push_str(value);
                close_tag(tag, out);
            }
            Self::Parent {
                tag,
                children,
                attrs,
            } => {
                open_tag(tag, attrs, out);
                for child in children {
                    child.write_html(out);
                }
                close_tag(tag, out);
            }
        }
    }
}

impl fmt::Display for HtmlNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_html())
    }
}

fn open_tag(tag: &str, attrs: &Attrs, out: &mut String) {
    out.push('<');
    out.push_str(tag);
    attrs_to_html(attrs, out);
    out.push('>');
}

fn close_tag(tag: &str, out: &mut String) {
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

fn attrs_to_html(attrs: &Attrs, out: &mut String) {
    for (name, value) in attrs {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(value);
        out.push('"');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn leaf() {
        assert_eq!(HtmlNode::leaf("p", "Hello, world!").to_html(), "<p>Hello, world!</p>");
    }

    #[test]
    fn untagged_leaf_is_raw_text() {
        assert_eq!(HtmlNode::text("Hello, <b>world</b>").to_html(), "Hello, <b>world</b>");
    }

    #[test]
    fn attributes_keep_insertion_order() {
        let node = HtmlNode::leaf("a", "link")
            .with_attr("href", "https://example.com")
            .with_attr("class", "external")
            .with_attr("target", "_blank");

        assert_eq!(
            node.to_html(),
            r#"<a href="https://example.com" class="external" target="_blank">link</a>"#
        );
    }

    #[test]
    fn tagged_leaf_needs_value() {
        let err = HtmlNode::try_leaf(Some("p".into()), None, Attrs::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidNode(_)));
    }

    #[test]
    fn untagged_leaf_without_value_is_empty() {
        let node = HtmlNode::try_leaf(None, None, Attrs::new()).unwrap();
        assert_eq!(node.to_html(), "");
    }

    #[test]
    fn parent_needs_tag_and_children() {
        let child = HtmlNode::leaf("span", "child");
        assert!(HtmlNode::try_parent(None, Some(vec![child]), Attrs::new()).is_err());
        assert!(HtmlNode::try_parent(Some("div".into()), None, Attrs::new()).is_err());
    }

    #[test]
    fn empty_parent() {
        let node =
            HtmlNode::try_parent(Some("div".into()), Some(Vec::new()), Attrs::new()).unwrap();
        assert_eq!(node.to_html(), "<div></div>");
    }

    #[test]
    fn nested_parents() {
        let left =
            HtmlNode::parent("div", vec![HtmlNode::leaf("p", "Left")]).with_attr("class", "left");
        let right =
            HtmlNode::parent("div", vec![HtmlNode::leaf("p", "Right")]).with_attr("class", "right");
        let main = HtmlNode::parent("main", vec![left, right]);

        assert_eq!(
            main.to_html(),
            r#"<main><div class="left"><p>Left</p></div><div class="right"><p>Right</p></div></main>"#
        );
    }

    #[test]
    fn deep_nesting() {
        let code = HtmlNode::leaf("code", "deep code");
        let root = HtmlNode::parent(
            "body",
            vec![HtmlNode::parent(
                "section",
                vec![HtmlNode::parent("div", vec![HtmlNode::parent("pre", vec![code])])],
            )],
        );

        assert_eq!(
            root.to_string(),
            "<body><section><div><pre><code>deep code</code></pre></div></section></body>"
        );
    }

    #[test]
    fn mixed_children() {
        let node = HtmlNode::parent(
            "div",
            vec![
                HtmlNode::leaf("b", "bold text"),
                HtmlNode::parent("span", vec![HtmlNode::leaf("i", "italic text")]),
                HtmlNode::text(" tail"),
            ],
        );

        assert_eq!(node.children().len(), 3);
        assert_eq!(
            node.to_html(),
            "<div><b>bold text</b><span><i>italic text</i></span> tail</div>"
        );
    }
}
