//! cars.com search results.
//!
//! The payload is assigned to `CARS.digitalData` in the third `<head>`
//! script. Records already use the common schema and embed the seller inline,
//! so normalization is validation only. Mileage and price are informational:
//! values that do not parse as numbers are dropped, never grounds for
//! rejecting a listing.

use std::ops::Range;

use async_trait::async_trait;
use pscraper_core::{Marketplace, SellerInfo, VehicleListing};
use serde_json::Value;

use crate::cache::SellerCache;
use crate::error::{ExtractionError, RecordRejection};
use crate::extract::{EmbeddedJsonExtractor, ScriptTokenExtractor};
use crate::record::{
    check_vin, decimal, integer, into_extra, into_object, optional_text, present, required_text,
    year, RawRecord,
};
use crate::site::MarketplaceSite;

/// Text between `CARS.digitalData = ` and the trailing `;\n`.
pub const SEARCH_PAYLOAD: ScriptTokenExtractor = ScriptTokenExtractor {
    selector: "head > script",
    index: 2,
    token: "CARS.digitalData = ",
    trailing_chars: 2,
};

const TOTAL_PAGES_PATH: &str = "/page/search/totalNumPages";
const VEHICLE_PATH: &str = "/page/vehicle";

pub struct Cars {
    search_url: String,
}

impl Cars {
    /// `search_url` must contain `{page}`, replaced with the 1-based page
    /// number.
    pub fn new(search_url: impl Into<String>) -> Self {
        Self {
            search_url: search_url.into(),
        }
    }
}

#[async_trait]
impl MarketplaceSite for Cars {
    fn marketplace(&self) -> Marketplace {
        Marketplace::Cars
    }

    fn probe_page(&self) -> u32 {
        1
    }

    fn page_url(&self, page: u32) -> String {
        self.search_url.replace("{page}", &page.to_string())
    }

    fn extract(&self, html: &str) -> Result<Value, ExtractionError> {
        SEARCH_PAYLOAD.extract(html)
    }

    fn page_range(&self, probe: &Value) -> Result<Range<u32>, ExtractionError> {
        let total = probe
            .pointer(TOTAL_PAGES_PATH)
            .and_then(Value::as_u64)
            .ok_or(ExtractionError::MissingField {
                path: "page.search.totalNumPages",
            })?;
        let total = u32::try_from(total).unwrap_or(u32::MAX);
        Ok(1..total.saturating_add(1))
    }

    fn listings(&self, mut payload: Value) -> Result<Vec<Value>, ExtractionError> {
        match payload.pointer_mut(VEHICLE_PATH).map(Value::take) {
            Some(Value::Array(vehicles)) => Ok(vehicles),
            _ => Err(ExtractionError::MissingField {
                path: "page.vehicle",
            }),
        }
    }

    async fn normalize(
        &self,
        raw: Value,
        _sellers: &mut SellerCache,
    ) -> Result<VehicleListing, RecordRejection> {
        let record = into_object(raw)?;

        let vin = required_text(&record, "vin")?;
        let listing_id = required_text(&record, "listingId")?;
        let seller = seller(&record)?;
        check_vin(&vin)?;

        let make = required_text(&record, "make")?;
        let model = required_text(&record, "model")?;
        let year = year(&record)?;

        // Placeholders such as "N/A" or "Call for price" leave the field empty.
        let mileage = present(&record, "mileage").and_then(|v| integer("mileage", v).ok());
        let price = present(&record, "price").and_then(|v| decimal("price", v).ok());

        Ok(VehicleListing {
            vin,
            listing_id,
            make,
            model,
            year,
            trim: optional_text(&record, "trim"),
            mileage,
            body_style: optional_text(&record, "bodyStyle"),
            price,
            seller,
            extra: into_extra(record),
        })
    }
}

/// The inline seller block. Phone and the three address parts are required;
/// the name is not.
fn seller(record: &RawRecord) -> Result<SellerInfo, RecordRejection> {
    let block = match present(record, "seller") {
        Some(Value::Object(block)) => block,
        _ => return Err(RecordRejection::MissingField { field: "seller" }),
    };
    Ok(SellerInfo {
        name: optional_text(block, "name").unwrap_or_default(),
        phone_number: required_text(block, "phoneNumber")?,
        street_address: required_text(block, "streetAddress")?,
        city: required_text(block, "city")?,
        state: required_text(block, "state")?,
    })
}

#[cfg(test)]
#[path = "cars_test.rs"]
mod tests;
