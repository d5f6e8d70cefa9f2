//! Autotrader search results.
//!
//! The search page hydrates from `window.__BONNET_DATA__={...}` in the third
//! `text/javascript` script. Listings sit in `initialState.inventory` keyed by
//! listing id and carry only an owner id for the seller, so every new owner
//! costs one dealer-page lookup through the [`SellerLocator`].

use std::ops::Range;

use async_trait::async_trait;
use pscraper_core::{Marketplace, SellerInfo, VehicleListing};
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde_json::Value;

use crate::cache::{CachedSeller, SellerCache};
use crate::error::{ExtractionError, RecordRejection};
use crate::extract::{EmbeddedJsonExtractor, ScriptPrefixExtractor};
use crate::locate::SellerLocator;
use crate::record::{
    check_vin, decimal, integer, into_extra, into_object, optional_text, present, required_text,
    year, RawRecord,
};
use crate::site::MarketplaceSite;

/// Records requested per search page.
pub const RESULTS_PER_PAGE: u64 = 100;

/// Third `text/javascript` script, minus `window.__BONNET_DATA__=`.
pub const SEARCH_PAYLOAD: ScriptPrefixExtractor = ScriptPrefixExtractor {
    selector: r#"script[type="text/javascript"]"#,
    index: 2,
    prefix_chars: 23,
};

const COUNT_PATH: &str = "/initialState/domain/srp/results/count";
const INVENTORY_PATH: &str = "/initialState/inventory";

/// Headers sent with every Autotrader request, search and dealer pages alike.
#[must_use]
pub fn request_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    headers
}

/// Number of search pages for `total_results` listings.
///
/// Rounds `total_results / 100` half-to-even rather than taking the ceiling:
/// a trailing partial page is dropped when it is less than half full, or
/// exactly half full after an even page count (250 results -> 2 pages).
/// At most 100 results is always one page.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn page_count(total_results: u64) -> u32 {
    if total_results <= RESULTS_PER_PAGE {
        return 1;
    }
    (total_results as f64 / RESULTS_PER_PAGE as f64).round_ties_even() as u32
}

pub struct Autotrader<L> {
    search_url: String,
    locator: L,
}

impl<L: SellerLocator> Autotrader<L> {
    /// `search_url` must contain `{offset}`, replaced with each page's first
    /// record offset.
    pub fn new(search_url: impl Into<String>, locator: L) -> Self {
        Self {
            search_url: search_url.into(),
            locator,
        }
    }

    /// Looks the owner up in the run's cache, falling back to the locator on
    /// a miss. Both outcomes of a lookup are cached.
    async fn resolve_seller(
        &self,
        owner_id: &str,
        sellers: &mut SellerCache,
    ) -> Result<SellerInfo, RecordRejection> {
        let cached = if let Some(hit) = sellers.get(owner_id) {
            tracing::debug!(owner_id, "seller cache hit");
            hit.clone()
        } else {
            tracing::debug!(owner_id, "seller cache miss");
            let resolved = match self.locator.locate(owner_id).await {
                Ok(seller) => CachedSeller::Resolved(seller),
                Err(err) => {
                    tracing::warn!(owner_id, error = %err, "seller could not be resolved");
                    CachedSeller::Unresolvable
                }
            };
            sellers.put(owner_id, resolved.clone());
            resolved
        };

        match cached {
            CachedSeller::Resolved(seller) => Ok(seller),
            CachedSeller::Unresolvable => Err(RecordRejection::SellerUnresolved {
                owner_id: owner_id.to_owned(),
            }),
        }
    }
}

#[async_trait]
impl<L: SellerLocator> MarketplaceSite for Autotrader<L> {
    fn marketplace(&self) -> Marketplace {
        Marketplace::Autotrader
    }

    fn probe_page(&self) -> u32 {
        0
    }

    fn page_url(&self, page: u32) -> String {
        let offset = u64::from(page) * RESULTS_PER_PAGE;
        self.search_url.replace("{offset}", &offset.to_string())
    }

    fn extract(&self, html: &str) -> Result<Value, ExtractionError> {
        SEARCH_PAYLOAD.extract(html)
    }

    fn page_range(&self, probe: &Value) -> Result<Range<u32>, ExtractionError> {
        let total = probe
            .pointer(COUNT_PATH)
            .and_then(Value::as_u64)
            .ok_or(ExtractionError::MissingField {
                path: "initialState.domain.srp.results.count",
            })?;
        Ok(0..page_count(total))
    }

    fn listings(&self, mut payload: Value) -> Result<Vec<Value>, ExtractionError> {
        match payload.pointer_mut(INVENTORY_PATH).map(Value::take) {
            Some(Value::Object(inventory)) => Ok(inventory.into_iter().map(|(_, v)| v).collect()),
            Some(Value::Array(inventory)) => Ok(inventory),
            _ => Err(ExtractionError::MissingField {
                path: "initialState.inventory",
            }),
        }
    }

    async fn normalize(
        &self,
        raw: Value,
        sellers: &mut SellerCache,
    ) -> Result<VehicleListing, RecordRejection> {
        let record = into_object(raw)?;

        let owner_id = required_text(&record, "owner")?;
        let seller = self.resolve_seller(&owner_id, sellers).await?;

        let listing_id = required_text(&record, "id")?;
        let trim = optional_text(&record, "trim");
        let mileage = mileage(&record)?;
        let body_style = body_style(&record);
        let price = price(&record)?;

        let vin = required_text(&record, "vin")?;
        let make = required_text(&record, "make")?;
        let model = required_text(&record, "model")?;
        let year = year(&record)?;
        check_vin(&vin)?;

        Ok(VehicleListing {
            vin,
            listing_id,
            make,
            model,
            year,
            trim,
            mileage,
            body_style,
            price,
            seller,
            extra: into_extra(record),
        })
    }
}

/// `specifications.mileage` must exist; its `value` is optional.
fn mileage(record: &RawRecord) -> Result<Option<i64>, RecordRejection> {
    let mileage = present(record, "specifications")
        .and_then(|specs| specs.get("mileage"))
        .filter(|m| !m.is_null())
        .ok_or(RecordRejection::MissingField {
            field: "specifications.mileage",
        })?;
    match mileage.get("value").filter(|v| !v.is_null()) {
        Some(value) => integer("mileage", value).map(Some),
        None => Ok(None),
    }
}

fn body_style(record: &RawRecord) -> Option<String> {
    let styles: Vec<&str> = match present(record, "style")? {
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        Value::String(s) => vec![s.as_str()],
        _ => return None,
    };
    Some(styles.join(", ")).filter(|s| !s.is_empty())
}

/// A non-zero `salePrice` wins over `primary`.
fn price(record: &RawRecord) -> Result<Option<f64>, RecordRejection> {
    let detail = present(record, "pricingDetail").ok_or(RecordRejection::MissingField {
        field: "pricingDetail",
    })?;
    if let Some(sale) = detail.get("salePrice").filter(|v| !v.is_null()) {
        let sale = decimal("salePrice", sale)?;
        if sale != 0.0 {
            return Ok(Some(sale));
        }
    }
    detail
        .get("primary")
        .filter(|v| !v.is_null())
        .map(|primary| decimal("primary", primary))
        .transpose()
}

#[cfg(test)]
#[path = "autotrader_test.rs"]
mod tests;
