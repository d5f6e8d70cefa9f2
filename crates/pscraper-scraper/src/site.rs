//! The per-marketplace plug-in the pagination driver runs.

use std::ops::Range;

use async_trait::async_trait;
use pscraper_core::{Marketplace, VehicleListing};
use serde_json::Value;

use crate::cache::SellerCache;
use crate::error::{ExtractionError, RecordRejection};

/// Everything the pagination driver needs to know about one marketplace:
/// how to address a page, decode it, size the result set, and normalize the
/// records it contains.
#[async_trait]
pub trait MarketplaceSite: Send + Sync {
    fn marketplace(&self) -> Marketplace;

    /// Page requested first to learn the size of the result set.
    fn probe_page(&self) -> u32;

    fn page_url(&self, page: u32) -> String;

    /// Decodes the embedded payload of a search-results page.
    ///
    /// # Errors
    ///
    /// See [`crate::extract::EmbeddedJsonExtractor::extract`].
    fn extract(&self, html: &str) -> Result<Value, ExtractionError>;

    /// Pages to walk, computed from the probe page's payload.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::MissingField`] if the count field is absent.
    fn page_range(&self, probe: &Value) -> Result<Range<u32>, ExtractionError>;

    /// Raw listing records of one page, in page order.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError::MissingField`] if the listing collection is
    /// absent.
    fn listings(&self, payload: Value) -> Result<Vec<Value>, ExtractionError>;

    /// Maps one raw record onto the common schema.
    ///
    /// # Errors
    ///
    /// Returns [`RecordRejection`] when the record is not a valid listing.
    async fn normalize(
        &self,
        raw: Value,
        sellers: &mut SellerCache,
    ) -> Result<VehicleListing, RecordRejection>;
}
