//! In-memory doubles for the fetch, locate, and notify seams.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use pscraper_core::SellerInfo;

use crate::error::{FetchError, LocateError};
use crate::fetch::PageFetcher;
use crate::locate::SellerLocator;
use crate::notify::Notifier;

/// Serves canned bodies by exact URL. Unknown URLs fail with a 404.
#[derive(Default)]
pub(crate) struct MockFetcher {
    pages: Mutex<HashMap<String, String>>,
    requests: Mutex<Vec<String>>,
}

impl MockFetcher {
    pub(crate) fn respond(&self, url: impl Into<String>, body: impl Into<String>) {
        self.pages.lock().unwrap().insert(url.into(), body.into());
    }

    /// URLs requested so far, in order.
    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.lock().unwrap().push(url.to_owned());
        self.pages
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::UnexpectedStatus {
                status: 404,
                url: url.to_owned(),
            })
    }
}

#[derive(Default)]
pub(crate) struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub(crate) fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_owned());
    }
}

/// Resolves the owners it was given and fails on any other id, counting
/// every call.
#[derive(Default)]
pub(crate) struct CountingLocator {
    sellers: HashMap<String, SellerInfo>,
    calls: Mutex<Vec<String>>,
}

impl CountingLocator {
    pub(crate) fn with_seller(mut self, owner_id: &str, seller: SellerInfo) -> Self {
        self.sellers.insert(owner_id.to_owned(), seller);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SellerLocator for CountingLocator {
    async fn locate(&self, owner_id: &str) -> Result<SellerInfo, LocateError> {
        self.calls.lock().unwrap().push(owner_id.to_owned());
        self.sellers
            .get(owner_id)
            .cloned()
            .ok_or(LocateError::StructuredDataNotFound)
    }
}

/// A dealer with a complete address.
pub(crate) fn dealer(name: &str) -> SellerInfo {
    SellerInfo {
        name: name.to_owned(),
        phone_number: "555-0100".to_owned(),
        street_address: "1 Main St".to_owned(),
        city: "Springfield".to_owned(),
        state: "IL".to_owned(),
    }
}
