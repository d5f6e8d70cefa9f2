//! One [`crate::site::MarketplaceSite`] per supported marketplace.

pub mod autotrader;
pub mod cars;

pub use autotrader::Autotrader;
pub use cars::Cars;
