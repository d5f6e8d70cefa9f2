//! Embedded-JSON Extractor: pulls the hydration payload out of a
//! server-rendered search-results page.
//!
//! Both marketplaces inline their search state as a JavaScript assignment in a
//! `<script>` element at a fixed position. The position, prefix length, and
//! token are properties of the sites' markup and live with each marketplace's
//! constants; this module only knows how to apply them.

use scraper::{Html, Selector};
use serde_json::Value;

use crate::error::ExtractionError;

/// Decodes a page's embedded payload.
pub trait EmbeddedJsonExtractor: Send + Sync {
    /// # Errors
    ///
    /// Returns [`ExtractionError`] when the script element is absent or empty,
    /// the expected preamble is missing, or the remaining text is not JSON.
    fn extract(&self, html: &str) -> Result<Value, ExtractionError>;
}

/// Takes the `index`-th element matching `selector`, drops the first
/// `prefix_chars` characters of its text, and parses the rest.
#[derive(Debug, Clone, Copy)]
pub struct ScriptPrefixExtractor {
    pub selector: &'static str,
    pub index: usize,
    pub prefix_chars: usize,
}

impl EmbeddedJsonExtractor for ScriptPrefixExtractor {
    fn extract(&self, html: &str) -> Result<Value, ExtractionError> {
        let text = script_text(html, self.selector, self.index)?;
        let start = text
            .char_indices()
            .nth(self.prefix_chars)
            .map_or(text.len(), |(i, _)| i);
        Ok(serde_json::from_str(&text[start..])?)
    }
}

/// Takes the `index`-th element matching `selector`, slices its text from
/// just after the first occurrence of `token` up to `trailing_chars`
/// characters before the end, and parses that slice.
#[derive(Debug, Clone, Copy)]
pub struct ScriptTokenExtractor {
    pub selector: &'static str,
    pub index: usize,
    pub token: &'static str,
    pub trailing_chars: usize,
}

impl EmbeddedJsonExtractor for ScriptTokenExtractor {
    fn extract(&self, html: &str) -> Result<Value, ExtractionError> {
        let text = script_text(html, self.selector, self.index)?;
        let start = text
            .find(self.token)
            .ok_or(ExtractionError::TokenNotFound { token: self.token })?
            + self.token.len();
        let body = &text[start..];
        let end = if self.trailing_chars == 0 {
            body.len()
        } else {
            body.char_indices()
                .rev()
                .nth(self.trailing_chars - 1)
                .map_or(0, |(i, _)| i)
        };
        Ok(serde_json::from_str(&body[..end])?)
    }
}

/// Returns the first text node of the `index`-th element matching `selector`.
///
/// Script content is raw text to the HTML parser, so the first text node is
/// the whole script body.
pub(crate) fn script_text(
    html: &str,
    selector: &'static str,
    index: usize,
) -> Result<String, ExtractionError> {
    let parsed =
        Selector::parse(selector).map_err(|_| ExtractionError::InvalidSelector { selector })?;
    let document = Html::parse_document(html);
    let element = document
        .select(&parsed)
        .nth(index)
        .ok_or(ExtractionError::ScriptNotFound { selector, index })?;
    element
        .text()
        .next()
        .map(str::to_owned)
        .ok_or(ExtractionError::EmptyScript)
}
