mod block;
mod config;
mod error;
mod html;
mod inline;
mod parser;
mod site;

pub use block::{BlockKind, Span, SpanKind};
pub use config::{Config, ConfigError, MarkdownConfig, SiteConfig};
pub use error::{Error, Result};
pub use html::{Attrs, HtmlNode};
pub use inline::{
    ItalicDelimiter, extract_images, extract_links, split_delimiter, split_images, split_links,
    tokenize,
};
pub use parser::{
    RenderOptions, classify, compose, document_to_tree, extract_title, split_into_blocks,
};
pub use site::{CONTENT_PLACEHOLDER, Site, TITLE_PLACEHOLDER, render_page};

/// Convert markdown to HTML using default options.
pub fn markdown_to_html(markdown: &str) -> Result<String> {
    markdown_to_html_with_options(markdown, &RenderOptions::default())
}

/// Convert markdown to HTML with custom options.
pub fn markdown_to_html_with_options(markdown: &str, options: &RenderOptions) -> Result<String> {
    Ok(document_to_tree(markdown, options)?.to_html())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end() {
        let md = "# Hi\n\nSome **bold** text.";
        assert_eq!(extract_title(md).unwrap(), "Hi");
        assert_eq!(
            markdown_to_html(md).unwrap(),
            "<div><h1>Hi</h1><p>Some <b>bold</b> text.</p></div>"
        );
    }

    #[test]
    fn empty() {
        assert_eq!(markdown_to_html("").unwrap(), "<div></div>");
    }
}
