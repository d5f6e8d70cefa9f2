//! Seller Locator: resolves an Autotrader owner id to a dealer address via the
//! schema.org block on the owner's detail page.

use std::sync::Arc;

use async_trait::async_trait;
use pscraper_core::SellerInfo;
use serde_json::Value;

use crate::error::LocateError;
use crate::extract::script_text;
use crate::fetch::PageFetcher;

/// The block emitted by the site's head manager; preferred when present.
const HELMET_LD_JSON: &str = r#"script[type="application/ld+json"][data-rh="true"]"#;
const ANY_LD_JSON: &str = r#"script[type="application/ld+json"]"#;

/// Resolves an owner id to seller details.
#[async_trait]
pub trait SellerLocator: Send + Sync {
    /// # Errors
    ///
    /// Returns [`LocateError`] when the owner cannot be resolved to a
    /// complete address. Callers treat every error the same way: the owner
    /// is unresolvable.
    async fn locate(&self, owner_id: &str) -> Result<SellerInfo, LocateError>;
}

#[async_trait]
impl<T: SellerLocator + ?Sized> SellerLocator for Arc<T> {
    async fn locate(&self, owner_id: &str) -> Result<SellerInfo, LocateError> {
        (**self).locate(owner_id).await
    }
}

/// [`SellerLocator`] that fetches `{owner_url}{owner_id}` and reads the
/// page's `application/ld+json` block.
pub struct JsonLdSellerLocator<F> {
    fetcher: F,
    owner_url: String,
}

impl<F: PageFetcher> JsonLdSellerLocator<F> {
    pub fn new(fetcher: F, owner_url: impl Into<String>) -> Self {
        Self {
            fetcher,
            owner_url: owner_url.into(),
        }
    }
}

#[async_trait]
impl<F: PageFetcher> SellerLocator for JsonLdSellerLocator<F> {
    async fn locate(&self, owner_id: &str) -> Result<SellerInfo, LocateError> {
        let url = format!("{}{owner_id}", self.owner_url);
        let html = self.fetcher.fetch(&url).await?;
        parse_seller_page(&html)
    }
}

/// Maps the first ld+json block of a dealer page onto [`SellerInfo`].
///
/// # Errors
///
/// Returns [`LocateError`] if there is no ld+json block, it does not decode,
/// or any of name, telephone, street, locality, or region is missing. An
/// address with an empty street, locality, or region counts as missing.
pub fn parse_seller_page(html: &str) -> Result<SellerInfo, LocateError> {
    let text = script_text(html, HELMET_LD_JSON, 0)
        .or_else(|_| script_text(html, ANY_LD_JSON, 0))
        .map_err(|_| LocateError::StructuredDataNotFound)?;
    let owner: Value = serde_json::from_str(&text)?;

    let field = |path: &'static str, name: &'static str| -> Result<String, LocateError> {
        owner
            .pointer(path)
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or(LocateError::MissingField { field: name })
    };

    let seller = SellerInfo {
        name: field("/name", "name")?,
        phone_number: field("/telephone", "telephone")?,
        street_address: field("/address/streetAddress", "address.streetAddress")?,
        city: field("/address/addressLocality", "address.addressLocality")?,
        state: field("/address/addressRegion", "address.addressRegion")?,
    };

    if !seller.has_address() {
        return Err(LocateError::MissingField { field: "address" });
    }
    Ok(seller)
}
