use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while rendering markdown or generating a site.
#[derive(Debug, Error)]
pub enum Error {
    /// A bold, italic or code delimiter was opened but never closed.
    #[error("invalid markdown, formatted section not closed: `{delimiter}`")]
    UnclosedDelimiter { delimiter: String },

    #[error("invalid markdown, heading has no text")]
    EmptyHeading,

    #[error("invalid markdown, code block is not fenced with ```")]
    MalformedCodeBlock,

    #[error("invalid markdown, quote line does not start with '> ': {line:?}")]
    MalformedQuote { line: String },

    /// The document has no `# ` heading to use as the page title.
    #[error("no title found, the document needs a top-level '# ' heading")]
    NoTitle,

    #[error("invalid html node: {0}")]
    InvalidNode(&'static str),

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("{path} is not within the site root")]
    OutsideWorkspace { path: PathBuf },

    /// The output tree would replace the site root or one of its inputs.
    #[error("output directory {output} would overwrite {input}")]
    OutputOverlap { output: PathBuf, input: PathBuf },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
