//! Markdown conversion.
//!
//! The renderer only sees the [`MarkdownConverter`] trait, so tests can swap in
//! a stub that returns fixed fragments. [`CommonMark`] is the real converter,
//! backed by `pulldown-cmark`, which never rejects input: malformed Markdown
//! still renders as best it can. The only failure is a source that is not
//! UTF-8.

use pulldown_cmark::{Options, Parser, html};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConversionError {
    #[error("source is unreadable: {0}")]
    Unreadable(#[from] std::io::Error),
    #[error("source is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("{0}")]
    Other(String),
}

/// Markdown source bytes in, HTML fragment out.
pub trait MarkdownConverter {
    fn convert(&self, source: &[u8]) -> Result<String, ConversionError>;
}

/// CommonMark with the common extensions (tables, footnotes, strikethrough,
/// smart punctuation).
#[derive(Debug, Clone)]
pub struct CommonMark {
    options: Options,
}

impl CommonMark {
    pub fn new() -> Self {
        Self {
            options: Options::ENABLE_TABLES
                | Options::ENABLE_FOOTNOTES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_SMART_PUNCTUATION,
        }
    }

    /// Strict CommonMark, no extensions.
    pub fn plain() -> Self {
        Self {
            options: Options::empty(),
        }
    }
}

impl Default for CommonMark {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownConverter for CommonMark {
    fn convert(&self, source: &[u8]) -> Result<String, ConversionError> {
        let text = std::str::from_utf8(source)?;
        let parser = Parser::new_ext(text, self.options);
        let mut out = String::with_capacity(text.len() * 3 / 2);
        html::push_html(&mut out, parser);
        Ok(out)
    }
}
