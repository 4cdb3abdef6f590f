use secrecy::SecretString;
use snafu::ResultExt;

use crate::providers::{MissingEnvVarSnafu, ProviderInitError};

pub const API_KEY_VAR: &str = "APCA_API_KEY_ID";
pub const SECRET_KEY_VAR: &str = "APCA_API_SECRET_KEY";

/// API key pair for Alpaca. Both halves stay wrapped in [`SecretString`].
pub struct AlpacaCredentials {
    pub api_key: SecretString,
    pub secret_key: SecretString,
}

impl AlpacaCredentials {
    /// Reads `APCA_API_KEY_ID` and `APCA_API_SECRET_KEY` from the process environment.
    pub fn from_env() -> Result<Self, ProviderInitError> {
        Self::from_lookup(|name| std::env::var(name))
    }

    /// Reads both keys through `lookup`, which behaves like [`std::env::var`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ProviderInitError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let api_key = lookup(API_KEY_VAR).context(MissingEnvVarSnafu { name: API_KEY_VAR })?;
        let secret_key =
            lookup(SECRET_KEY_VAR).context(MissingEnvVarSnafu { name: SECRET_KEY_VAR })?;
        Ok(Self {
            api_key: SecretString::from(api_key),
            secret_key: SecretString::from(secret_key),
        })
    }
}
