//! Alpaca Market Data v2 REST provider for daily stock bars.

pub mod credentials;
pub mod params;
pub mod provider;
pub mod response;

pub use credentials::AlpacaCredentials;
pub use params::{Adjustment, AlpacaBarsParams, Feed, Sort};
pub use provider::AlpacaProvider;
