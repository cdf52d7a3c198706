//! Inline tokenizer.
//!
//! Text is split into [`Span`]s in a fixed order: bold, italic and code by
//! delimiter, then images, then links. Each pass only touches spans that are
//! still plain text, so formatting found by an earlier pass is never
//! re-scanned by a later one.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Deserialize;

use crate::block::Span;
use crate::error::{Error, Result};

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[(.*?)\]\((.*?)\)").unwrap());

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[(.*?)\]\((.*?)\)").unwrap());

/// Marker used for italic spans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum ItalicDelimiter {
    #[default]
    #[serde(rename = "*")]
    Asterisk,
    #[serde(rename = "_")]
    Underscore,
}

impl ItalicDelimiter {
    pub fn as_str(self) -> &'static str {
        match self {
            ItalicDelimiter::Asterisk => "*",
            ItalicDelimiter::Underscore => "_",
        }
    }
}

/// Split `text` into formatted spans.
pub fn tokenize(text: &str, italic: ItalicDelimiter) -> Result<Vec<Span>> {
    let spans = vec![Span::Text(text.to_string())];
    let spans = split_delimiter(spans, "**", Span::Bold)?;
    let spans = split_delimiter(spans, italic.as_str(), Span::Italic)?;
    let spans = split_delimiter(spans, "`", Span::Code)?;
    let spans = split_images(spans);
    Ok(split_links(spans))
}

/// Split every text span on `delimiter`, wrapping the enclosed fragments with
/// `wrap`. Fragments alternate between plain and formatted, so an even count
/// means a delimiter was left open.
pub fn split_delimiter(
    spans: Vec<Span>,
    delimiter: &str,
    wrap: fn(String) -> Span,
) -> Result<Vec<Span>> {
    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        let Span::Text(text) = span else {
            out.push(span);
            continue;
        };

        let sections: Vec<&str> = text.split(delimiter).collect();
        if sections.len() % 2 == 0 {
            return Err(Error::UnclosedDelimiter {
                delimiter: delimiter.to_string(),
            });
        }

        for (i, section) in sections.into_iter().enumerate() {
            if section.is_empty() {
                continue;
            }
            if i % 2 == 0 {
                out.push(Span::Text(section.to_string()));
            } else {
                out.push(wrap(section.to_string()));
            }
        }
    }

    Ok(out)
}

/// `(alt, url)` pairs of every `![alt](url)` in `text`.
pub fn extract_images(text: &str) -> Vec<(String, String)> {
    find_images(text).map(|m| (m.label, m.target)).collect()
}

/// `(text, url)` pairs of every `[text](url)` in `text` that is not an image.
pub fn extract_links(text: &str) -> Vec<(String, String)> {
    find_links(text).map(|m| (m.label, m.target)).collect()
}

pub fn split_images(spans: Vec<Span>) -> Vec<Span> {
    split_matches(spans, |text| find_images(text).collect(), |alt, url| Span::Image {
        alt,
        url,
    })
}

pub fn split_links(spans: Vec<Span>) -> Vec<Span> {
    split_matches(spans, |text| find_links(text).collect(), |text, url| Span::Link {
        text,
        url,
    })
}

struct Match {
    range: Range<usize>,
    label: String,
    target: String,
}

fn find_images(text: &str) -> impl Iterator<Item = Match> + '_ {
    IMAGE_RE.captures_iter(text).map(|caps| Match {
        range: caps.get(0).map_or(0..0, |m| m.range()),
        label: caps[1].to_string(),
        target: caps[2].to_string(),
    })
}

/// Link matches, skipping any that start right after a `!`.
///
/// A rejected candidate restarts the search one byte later rather than
/// after the whole candidate, so a link nested inside a rejected match is
/// still found.
fn find_links(text: &str) -> impl Iterator<Item = Match> + '_ {
    let mut pos = 0;
    std::iter::from_fn(move || {
        while pos <= text.len() {
            let caps = LINK_RE.captures_at(text, pos)?;
            let whole = caps.get(0)?;

            if text[..whole.start()].ends_with('!') {
                // `[` is a single byte, so this stays on a char boundary.
                pos = whole.start() + 1;
                continue;
            }

            pos = whole.end();
            return Some(Match {
                range: whole.range(),
                label: caps[1].to_string(),
                target: caps[2].to_string(),
            });
        }
        None
    })
}

fn split_matches(
    spans: Vec<Span>,
    find: impl Fn(&str) -> Vec<Match>,
    build: impl Fn(String, String) -> Span,
) -> Vec<Span> {
    let mut out = Vec::with_capacity(spans.len());

    for span in spans {
        let Span::Text(text) = span else {
            out.push(span);
            continue;
        };

        let matches = find(&text);
        if matches.is_empty() {
            out.push(Span::Text(text));
            continue;
        }

        let mut cursor = 0;
        for m in matches {
            let before = &text[cursor..m.range.start];
            if !before.is_empty() {
                out.push(Span::Text(before.to_string()));
            }
            out.push(build(m.label, m.target));
            cursor = m.range.end;
        }

        let rest = &text[cursor..];
        if !rest.is_empty() {
            out.push(Span::Text(rest.to_string()));
        }
    }

    out
}
