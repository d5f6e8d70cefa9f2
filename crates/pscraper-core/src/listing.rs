use serde::{Deserialize, Serialize};

/// Length of a valid Vehicle Identification Number.
pub const VIN_LENGTH: usize = 17;

/// The marketplace a listing was scraped from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Marketplace {
    Autotrader,
    Cars,
}

impl Marketplace {
    /// Human-readable name used in logs and notifications.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Marketplace::Autotrader => "Autotrader",
            Marketplace::Cars => "cars.com",
        }
    }
}

impl std::fmt::Display for Marketplace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Marketplace::Autotrader => write!(f, "autotrader"),
            Marketplace::Cars => write!(f, "cars"),
        }
    }
}

/// Dealer or private seller attached to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerInfo {
    #[serde(default)]
    pub name: String,
    pub phone_number: String,
    pub street_address: String,
    pub city: String,
    pub state: String,
}

impl SellerInfo {
    /// Returns `true` when street, city, and state are all non-empty.
    #[must_use]
    pub fn has_address(&self) -> bool {
        !self.street_address.is_empty() && !self.city.is_empty() && !self.state.is_empty()
    }
}

/// A vehicle listing normalized into the schema shared by both marketplaces.
///
/// Serialized with the camelCase keys downstream consumers expect
/// (`listingId`, `bodyStyle`, `phoneNumber`, ...). Optional fields serialize
/// as `null` rather than being omitted so every record carries every column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleListing {
    pub vin: String,
    pub listing_id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub trim: Option<String>,
    pub mileage: Option<i64>,
    /// Comma-separated body styles, e.g. `"SUV, Crossover"`.
    pub body_style: Option<String>,
    pub price: Option<f64>,
    pub seller: SellerInfo,
    /// Raw marketplace fields that have no slot in the common schema,
    /// carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Returns `true` when `vin` is exactly [`VIN_LENGTH`] characters.
#[must_use]
pub fn is_valid_vin(vin: &str) -> bool {
    vin.chars().count() == VIN_LENGTH
}

impl VehicleListing {
    #[must_use]
    pub fn has_valid_vin(&self) -> bool {
        is_valid_vin(&self.vin)
    }
}
