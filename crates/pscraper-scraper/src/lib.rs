pub mod cache;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod locate;
pub mod marketplaces;
pub mod notify;
pub mod pagination;
mod record;
pub mod site;

#[cfg(test)]
mod testing;

pub use cache::{CachedSeller, SellerCache};
pub use error::{ExtractionError, FetchError, LocateError, PageError, RecordRejection};
pub use extract::{EmbeddedJsonExtractor, ScriptPrefixExtractor, ScriptTokenExtractor};
pub use fetch::{HttpFetcher, PageFetcher};
pub use locate::{parse_seller_page, JsonLdSellerLocator, SellerLocator};
pub use marketplaces::{Autotrader, Cars};
pub use notify::{LogNotifier, Notifier, SlackNotifier};
pub use pagination::scrape;
pub use site::MarketplaceSite;
