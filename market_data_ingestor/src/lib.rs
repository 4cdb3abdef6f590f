//! Daily bar retrieval for a single instrument.
//!
//! [`models`] holds the vendor-agnostic bar types and their validation rules,
//! [`providers`] the sources that produce them (Alpaca REST, local JSON files).

pub mod models;
pub mod providers;
