use serde_json::json;

use super::*;

fn site() -> Cars {
    Cars::new("https://cars.test/shopping/results/?page={page}&page_size=100")
}

fn vehicle(vin: &str) -> Value {
    json!({
        "vin": vin,
        "listingId": "L1",
        "make": "Honda",
        "model": "Accord",
        "year": 2003,
        "seller": {
            "phoneNumber": "555",
            "streetAddress": "1 Main",
            "city": "X",
            "state": "Y"
        }
    })
}

async fn normalize(raw: Value) -> Result<VehicleListing, RecordRejection> {
    site().normalize(raw, &mut SellerCache::default()).await
}

#[test]
fn page_url_substitutes_page_number() {
    assert_eq!(
        site().page_url(2),
        "https://cars.test/shopping/results/?page=2&page_size=100"
    );
}

#[test]
fn page_range_is_one_based_and_inclusive() {
    let probe = json!({"page": {"search": {"totalNumPages": 3}}});
    assert_eq!(site().page_range(&probe).unwrap(), 1..4);
}

#[test]
fn page_range_without_total_is_missing_field() {
    let err = site().page_range(&json!({"page": {}})).unwrap_err();
    assert!(
        matches!(err, ExtractionError::MissingField { .. }),
        "got: {err:?}"
    );
}

#[test]
fn listings_reads_vehicle_array() {
    let payload = json!({"page": {"vehicle": [{"vin": "a"}, {"vin": "b"}]}});
    assert_eq!(site().listings(payload).unwrap().len(), 2);
}

#[test]
fn listings_without_vehicle_array_is_missing_field() {
    let err = site().listings(json!({"page": {"search": {}}})).unwrap_err();
    assert!(
        matches!(err, ExtractionError::MissingField { .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn accepts_complete_record() {
    let listing = normalize(vehicle("1HGCM82633A004352")).await.unwrap();
    assert_eq!(listing.vin, "1HGCM82633A004352");
    assert_eq!(listing.listing_id, "L1");
    assert_eq!(listing.seller.phone_number, "555");
    assert_eq!(listing.seller.street_address, "1 Main");
    assert_eq!(listing.seller.name, "");
    assert_eq!(listing.mileage, None);
    assert_eq!(listing.price, None);
}

#[tokio::test]
async fn rejects_empty_vin() {
    let err = normalize(vehicle("")).await.unwrap_err();
    assert_eq!(err, RecordRejection::EmptyField { field: "vin" });
}

#[tokio::test]
async fn rejects_vin_of_wrong_length() {
    let err = normalize(vehicle("1HGCM82633A00435")).await.unwrap_err();
    assert_eq!(err, RecordRejection::InvalidVin { len: 16 });
}

#[tokio::test]
async fn rejects_seller_without_phone() {
    let mut raw = vehicle("1HGCM82633A004352");
    raw["seller"]["phoneNumber"] = json!("");
    let err = normalize(raw).await.unwrap_err();
    assert_eq!(
        err,
        RecordRejection::EmptyField {
            field: "phoneNumber"
        }
    );
}

#[tokio::test]
async fn rejects_seller_without_city() {
    let mut raw = vehicle("1HGCM82633A004352");
    raw["seller"].as_object_mut().unwrap().remove("city");
    let err = normalize(raw).await.unwrap_err();
    assert_eq!(err, RecordRejection::MissingField { field: "city" });
}

#[tokio::test]
async fn rejects_missing_seller_block() {
    let mut raw = vehicle("1HGCM82633A004352");
    raw.as_object_mut().unwrap().remove("seller");
    let err = normalize(raw).await.unwrap_err();
    assert_eq!(err, RecordRejection::MissingField { field: "seller" });
}

#[tokio::test]
async fn rejects_missing_model() {
    let mut raw = vehicle("1HGCM82633A004352");
    raw.as_object_mut().unwrap().remove("model");
    let err = normalize(raw).await.unwrap_err();
    assert_eq!(err, RecordRejection::MissingField { field: "model" });
}

#[tokio::test]
async fn optional_fields_and_extras_carry_through() {
    let mut raw = vehicle("1HGCM82633A004352");
    let fields = raw.as_object_mut().unwrap();
    fields.insert("trim".into(), json!("EX-L"));
    fields.insert("mileage".into(), json!(42_000));
    fields.insert("bodyStyle".into(), json!("Sedan"));
    fields.insert("price".into(), json!(12_999.0));
    fields.insert("stockType".into(), json!("used"));
    raw["seller"]["name"] = json!("Main St Motors");

    let listing = normalize(raw).await.unwrap();

    assert_eq!(listing.trim.as_deref(), Some("EX-L"));
    assert_eq!(listing.mileage, Some(42_000));
    assert_eq!(listing.body_style.as_deref(), Some("Sedan"));
    assert_eq!(listing.price, Some(12_999.0));
    assert_eq!(listing.seller.name, "Main St Motors");
    assert_eq!(listing.extra.len(), 1);
    assert_eq!(listing.extra["stockType"], "used");
}

#[tokio::test]
async fn placeholder_mileage_and_price_do_not_reject() {
    let mut raw = vehicle("1HGCM82633A004352");
    let fields = raw.as_object_mut().unwrap();
    fields.insert("mileage".into(), json!("N/A"));
    fields.insert("price".into(), json!("Call for price"));

    let listing = normalize(raw).await.unwrap();

    assert_eq!(listing.vin, "1HGCM82633A004352");
    assert_eq!(listing.mileage, None);
    assert_eq!(listing.price, None);
}

#[tokio::test]
async fn formatted_mileage_and_price_strings_parse() {
    let mut raw = vehicle("1HGCM82633A004352");
    let fields = raw.as_object_mut().unwrap();
    fields.insert("mileage".into(), json!("42,000"));
    fields.insert("price".into(), json!("$12,999"));

    let listing = normalize(raw).await.unwrap();

    assert_eq!(listing.mileage, Some(42_000));
    assert_eq!(listing.price, Some(12_999.0));
}
