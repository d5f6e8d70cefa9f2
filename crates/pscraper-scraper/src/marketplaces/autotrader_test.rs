use std::sync::Arc;

use serde_json::{json, Map};

use super::*;
use crate::testing::{dealer, CountingLocator};

const SEARCH_URL: &str = "https://search.test/cars?firstRecord={offset}&numRecords=100";

fn site(locator: CountingLocator) -> (Autotrader<Arc<CountingLocator>>, Arc<CountingLocator>) {
    let locator = Arc::new(locator);
    (Autotrader::new(SEARCH_URL, Arc::clone(&locator)), locator)
}

fn vehicle(owner: &str) -> Value {
    json!({
        "id": 612_345_678,
        "owner": owner,
        "vin": "1HGCM82633A004352",
        "make": "Honda",
        "model": "Accord",
        "year": 2003,
        "trim": "EX",
        "specifications": {"mileage": {"value": "12,345"}},
        "style": ["Sedan", "Coupe"],
        "pricingDetail": {"salePrice": 0, "primary": 8995},
        "exteriorColor": "Silver"
    })
}

fn edit(mut raw: Value, f: impl FnOnce(&mut Map<String, Value>)) -> Value {
    f(raw.as_object_mut().unwrap());
    raw
}

#[test]
fn page_count_rounds_half_to_even() {
    assert_eq!(page_count(0), 1);
    assert_eq!(page_count(50), 1);
    assert_eq!(page_count(100), 1);
    assert_eq!(page_count(149), 1);
    assert_eq!(page_count(150), 2);
    assert_eq!(page_count(250), 2);
    assert_eq!(page_count(351), 4);
    assert_eq!(page_count(1000), 10);
}

#[test]
fn page_url_substitutes_record_offset() {
    let (site, _) = site(CountingLocator::default());
    assert_eq!(
        site.page_url(0),
        "https://search.test/cars?firstRecord=0&numRecords=100"
    );
    assert_eq!(
        site.page_url(3),
        "https://search.test/cars?firstRecord=300&numRecords=100"
    );
}

#[test]
fn page_range_reads_result_count() {
    let (site, _) = site(CountingLocator::default());
    let probe = json!({"initialState": {"domain": {"srp": {"results": {"count": 250}}}}});
    assert_eq!(site.page_range(&probe).unwrap(), 0..2);
}

#[test]
fn page_range_without_count_is_missing_field() {
    let (site, _) = site(CountingLocator::default());
    let err = site.page_range(&json!({"initialState": {}})).unwrap_err();
    assert!(
        matches!(err, ExtractionError::MissingField { .. }),
        "got: {err:?}"
    );
}

#[test]
fn listings_keeps_inventory_order() {
    let (site, _) = site(CountingLocator::default());
    let payload = json!({"initialState": {"inventory": {
        "900": {"id": "900"},
        "100": {"id": "100"},
        "500": {"id": "500"}
    }}});
    let ids: Vec<Value> = site
        .listings(payload)
        .unwrap()
        .into_iter()
        .map(|v| v["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!("900"), json!("100"), json!("500")]);
}

#[test]
fn listings_without_inventory_is_missing_field() {
    let (site, _) = site(CountingLocator::default());
    let err = site.listings(json!({"initialState": {}})).unwrap_err();
    assert!(
        matches!(err, ExtractionError::MissingField { .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn normalize_maps_full_record() {
    let (site, _) = site(CountingLocator::default().with_seller("77", dealer("Acme Auto")));
    let mut sellers = SellerCache::default();

    let listing = site.normalize(vehicle("77"), &mut sellers).await.unwrap();

    assert_eq!(listing.vin, "1HGCM82633A004352");
    assert_eq!(listing.listing_id, "612345678");
    assert_eq!(listing.make, "Honda");
    assert_eq!(listing.model, "Accord");
    assert_eq!(listing.year, 2003);
    assert_eq!(listing.trim.as_deref(), Some("EX"));
    assert_eq!(listing.mileage, Some(12_345));
    assert_eq!(listing.body_style.as_deref(), Some("Sedan, Coupe"));
    assert_eq!(listing.price, Some(8995.0));
    assert_eq!(listing.seller.name, "Acme Auto");
    assert_eq!(listing.extra["exteriorColor"], "Silver");
    assert!(!listing.extra.contains_key("vin"));
}

#[tokio::test]
async fn normalize_prefers_nonzero_sale_price() {
    let (site, _) = site(CountingLocator::default().with_seller("77", dealer("Acme")));
    let raw = edit(vehicle("77"), |r| {
        r.insert("pricingDetail".into(), json!({"salePrice": 7500, "primary": 8995}));
    });

    let listing = site.normalize(raw, &mut SellerCache::default()).await.unwrap();

    assert_eq!(listing.price, Some(7500.0));
}

#[tokio::test]
async fn normalize_without_pricing_detail_is_rejected() {
    let (site, _) = site(CountingLocator::default().with_seller("77", dealer("Acme")));
    let raw = edit(vehicle("77"), |r| {
        r.remove("pricingDetail");
    });

    let err = site.normalize(raw, &mut SellerCache::default()).await.unwrap_err();

    assert_eq!(
        err,
        RecordRejection::MissingField {
            field: "pricingDetail"
        }
    );
}

#[tokio::test]
async fn normalize_mileage_value_is_optional() {
    let (site, _) = site(CountingLocator::default().with_seller("77", dealer("Acme")));
    let raw = edit(vehicle("77"), |r| {
        r.insert("specifications".into(), json!({"mileage": {}}));
    });

    let listing = site.normalize(raw, &mut SellerCache::default()).await.unwrap();

    assert_eq!(listing.mileage, None);
}

#[tokio::test]
async fn normalize_without_mileage_spec_is_rejected() {
    let (site, _) = site(CountingLocator::default().with_seller("77", dealer("Acme")));
    let raw = edit(vehicle("77"), |r| {
        r.insert("specifications".into(), json!({"engine": "V6"}));
    });

    let err = site.normalize(raw, &mut SellerCache::default()).await.unwrap_err();

    assert_eq!(
        err,
        RecordRejection::MissingField {
            field: "specifications.mileage"
        }
    );
}

#[tokio::test]
async fn normalize_single_style_and_empty_style_list() {
    let (site, _) = site(CountingLocator::default().with_seller("77", dealer("Acme")));
    let mut sellers = SellerCache::default();

    let single = edit(vehicle("77"), |r| {
        r.insert("style".into(), json!("SUV"));
    });
    let empty = edit(vehicle("77"), |r| {
        r.insert("style".into(), json!([]));
    });

    let single = site.normalize(single, &mut sellers).await.unwrap();
    let empty = site.normalize(empty, &mut sellers).await.unwrap();

    assert_eq!(single.body_style.as_deref(), Some("SUV"));
    assert_eq!(empty.body_style, None);
}

#[tokio::test]
async fn normalize_rejects_missing_identity_fields() {
    let (site, _) = site(CountingLocator::default().with_seller("77", dealer("Acme")));
    let mut sellers = SellerCache::default();

    for field in ["vin", "make", "model", "year"] {
        let raw = edit(vehicle("77"), |r| {
            r.remove(field);
        });
        let err = site.normalize(raw, &mut sellers).await.unwrap_err();
        assert!(
            matches!(err, RecordRejection::MissingField { field: f } if f == field),
            "{field}: got {err:?}"
        );
    }
}

#[tokio::test]
async fn normalize_rejects_short_vin() {
    let (site, _) = site(CountingLocator::default().with_seller("77", dealer("Acme")));
    let raw = edit(vehicle("77"), |r| {
        r.insert("vin".into(), json!("1HGCM8263"));
    });

    let err = site.normalize(raw, &mut SellerCache::default()).await.unwrap_err();

    assert_eq!(err, RecordRejection::InvalidVin { len: 9 });
}

#[tokio::test]
async fn owner_is_located_once_per_run() {
    let (site, locator) = site(CountingLocator::default().with_seller("77", dealer("Acme")));
    let mut sellers = SellerCache::default();

    let first = site.normalize(vehicle("77"), &mut sellers).await.unwrap();
    let second = site.normalize(vehicle("77"), &mut sellers).await.unwrap();

    assert_eq!(first.seller, second.seller);
    assert_eq!(locator.calls(), vec!["77"]);
}

#[tokio::test]
async fn unresolvable_owner_rejects_every_listing_with_one_lookup() {
    let (site, locator) = site(CountingLocator::default());
    let mut sellers = SellerCache::default();

    for _ in 0..2 {
        let err = site.normalize(vehicle("13"), &mut sellers).await.unwrap_err();
        assert_eq!(
            err,
            RecordRejection::SellerUnresolved {
                owner_id: "13".to_owned()
            }
        );
    }
    assert_eq!(locator.calls(), vec!["13"]);
    assert_eq!(sellers.get("13"), Some(&CachedSeller::Unresolvable));
}

#[tokio::test]
async fn normalize_is_deterministic() {
    let (site, _) = site(CountingLocator::default().with_seller("77", dealer("Acme")));
    let mut sellers = SellerCache::default();

    let a = site.normalize(vehicle("77"), &mut sellers).await.unwrap();
    let b = site.normalize(vehicle("77"), &mut sellers).await.unwrap();

    assert_eq!(a, b);
}

#[test]
fn request_headers_ask_for_html() {
    let headers = request_headers();
    assert!(headers[header::ACCEPT]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
}
