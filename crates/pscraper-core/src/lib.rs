pub mod app_config;
pub mod config;
pub mod listing;
pub mod summary;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use listing::{is_valid_vin, Marketplace, SellerInfo, VehicleListing, VIN_LENGTH};
pub use summary::{
    parse_master_table, DealerStats, ManufacturerStats, MasterRow, Summary, SummaryError,
    SummaryScope,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
