//! Failure classes of the extraction pipeline.
//!
//! - [`FetchError`]: the page could not be retrieved.
//! - [`ExtractionError`]: the page was retrieved but the embedded payload is
//!   missing or malformed.
//! - [`PageError`]: either of the above for a search-results page. This is the
//!   only error that stops a scrape, and it is reported to the notification sink.
//! - [`LocateError`]: a seller detail page could not be resolved. Recovered
//!   silently by rejecting the listings tied to that owner.
//! - [`RecordRejection`]: a single listing failed validation. Routine filtering,
//!   never reported.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("no <script> element #{index} matching \"{selector}\"")]
    ScriptNotFound { selector: &'static str, index: usize },

    #[error("<script> element has no text content")]
    EmptyScript,

    #[error("token \"{token}\" not found in script text")]
    TokenNotFound { token: &'static str },

    #[error("embedded payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload is missing {path}")]
    MissingField { path: &'static str },

    #[error("invalid CSS selector \"{selector}\"")]
    InvalidSelector { selector: &'static str },
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("failed to fetch page: {0}")]
    Fetch(#[from] FetchError),

    #[error("failed to extract page payload: {0}")]
    Extraction(#[from] ExtractionError),
}

#[derive(Debug, Error)]
pub enum LocateError {
    #[error("failed to fetch seller page: {0}")]
    Fetch(#[from] FetchError),

    #[error("seller page has no ld+json block")]
    StructuredDataNotFound,

    #[error("seller ld+json block is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("seller ld+json block is missing {field}")]
    MissingField { field: &'static str },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordRejection {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("record is missing {field}")]
    MissingField { field: &'static str },

    #[error("record has empty {field}")]
    EmptyField { field: &'static str },

    #[error("record has non-numeric {field}: \"{value}\"")]
    InvalidNumber { field: &'static str, value: String },

    #[error("VIN has {len} characters, expected 17")]
    InvalidVin { len: usize },

    #[error("seller for owner {owner_id} could not be resolved")]
    SellerUnresolved { owner_id: String },
}

/// Renders an error and its `source()` chain, one cause per line.
pub(crate) fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str("\ncaused by: ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
