//! Provider abstraction for daily bar sources.
//!
//! This module defines the [`DataProvider`] trait, the single interface the
//! forecasting pipeline uses to obtain a [`BarSeries`] for one symbol,
//! whatever the vendor (Alpaca REST) or medium (a JSON file on disk).
//!
//! The trait is async and object-safe, so the concrete source can be chosen at
//! runtime behind a `Box<dyn DataProvider + Send + Sync>`.
//!
//! # Example
//!
//! ```rust
//! use async_trait::async_trait;
//! use market_data_ingestor::models::{bar_series::BarSeries, request_params::BarsRequest};
//! use market_data_ingestor::providers::{DataProvider, ProviderError};
//!
//! struct MyProvider;
//!
//! #[async_trait]
//! impl DataProvider for MyProvider {
//!     async fn fetch_daily_bars(
//!         &self,
//!         request: &BarsRequest,
//!     ) -> Result<BarSeries, ProviderError> {
//!         Ok(BarSeries::new(request.symbol.clone(), vec![]))
//!     }
//! }
//! ```

pub mod alpaca_rest;
pub mod json_file;

use std::path::PathBuf;

use async_trait::async_trait;
use snafu::{Backtrace, Snafu};

use crate::models::{bar_series::BarSeries, request_params::BarsRequest};

/// Trait for fetching the daily bars of one symbol.
#[async_trait]
pub trait DataProvider {
    /// Fetches the bars inside the request window, oldest first.
    ///
    /// # Errors
    ///
    /// Implementations return [`ProviderError::NoData`] when the window holds
    /// no bars at all, rather than an empty series.
    async fn fetch_daily_bars(&self, request: &BarsRequest) -> Result<BarSeries, ProviderError>;
}

/// Rejects requests no provider can serve.
pub fn validate_request(request: &BarsRequest) -> Result<(), ProviderError> {
    if request.symbol.trim().is_empty() {
        return ValidationSnafu {
            message: "symbol must not be empty",
        }
        .fail();
    }
    if request.start > request.end {
        return ValidationSnafu {
            message: format!(
                "start {} is after end {}",
                request.start, request.end
            ),
        }
        .fail();
    }
    Ok(())
}

/// Errors that can occur during the creation of a provider instance.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderInitError {
    /// A required environment variable is not set.
    #[snafu(display("Missing environment variable: {name}"))]
    MissingEnvVar {
        name: String,
        source: std::env::VarError,
        backtrace: Backtrace,
    },

    /// Failed to build the HTTP client.
    #[snafu(display("Failed to build HTTP client: {source}"))]
    ClientBuild {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// API key contains characters that cannot go into a header.
    #[snafu(display("Invalid API key format: {source}"))]
    InvalidApiKey {
        source: reqwest::header::InvalidHeaderValue,
        backtrace: Backtrace,
    },
}

/// Errors that can occur within a `DataProvider` implementation.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum ProviderError {
    /// An error during an API request (e.g., network failure, timeout).
    #[snafu(display("API request failed: {source}"))]
    Reqwest {
        source: reqwest::Error,
        backtrace: Backtrace,
    },

    /// The provider's API answered with a non-success status.
    #[snafu(display("API error ({status}): {message}"))]
    Api {
        status: u16,
        message: String,
        backtrace: Backtrace,
    },

    /// The request could not be served by any provider.
    #[snafu(display("Invalid request: {message}"))]
    Validation {
        message: String,
        backtrace: Backtrace,
    },

    /// The request URL could not be built.
    #[snafu(display("Failed to build request URL: {message}"))]
    InvalidUrl {
        message: String,
        backtrace: Backtrace,
    },

    /// The window holds no bars for the symbol.
    #[snafu(display("No data found for ticker '{symbol}'. It may be invalid or delisted."))]
    NoData {
        symbol: String,
        backtrace: Backtrace,
    },

    /// Reading a local bar file failed.
    #[snafu(display("Failed to read {}: {source}", path.display()))]
    Io {
        path: PathBuf,
        source: std::io::Error,
        backtrace: Backtrace,
    },

    /// A local bar file is not a JSON array of bars.
    #[snafu(display("Failed to decode bars in {}: {source}", path.display()))]
    Decode {
        path: PathBuf,
        source: serde_json::Error,
        backtrace: Backtrace,
    },

    /// An error during provider configuration or initialization.
    #[snafu(display("Provider initialization error: {source}"))]
    Init {
        #[snafu(backtrace)]
        source: ProviderInitError,
    },
}
