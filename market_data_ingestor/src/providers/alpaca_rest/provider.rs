use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::{Client, Url, header};
use secrecy::ExposeSecret;
use snafu::ResultExt;
use tracing::debug;

use crate::{
    models::{bar::Bar, bar_series::BarSeries, request_params::BarsRequest},
    providers::{
        ApiSnafu, ClientBuildSnafu, DataProvider, InvalidApiKeySnafu, InvalidUrlSnafu, NoDataSnafu,
        ProviderError, ProviderInitError, ReqwestSnafu,
        alpaca_rest::{
            credentials::AlpacaCredentials,
            params::{AlpacaBarsParams, construct_params},
            response::AlpacaResponse,
        },
        validate_request,
    },
};

const BASE_URL: &str = "https://data.alpaca.markets/v2/stocks";

/// Alpaca's free plan allows 200 data API calls per minute.
fn default_quota() -> Quota {
    Quota::per_minute(nonzero!(200u32))
}

/// `{BASE_URL}/{symbol}/bars`, with the symbol percent-encoded as one path segment.
pub fn bars_url(symbol: &str) -> Result<Url, ProviderError> {
    let mut url = Url::parse(BASE_URL).map_err(|e| {
        InvalidUrlSnafu {
            message: e.to_string(),
        }
        .build()
    })?;
    url.path_segments_mut()
        .map_err(|_| {
            InvalidUrlSnafu {
                message: format!("{BASE_URL} cannot take path segments"),
            }
            .build()
        })?
        .push(symbol)
        .push("bars");
    Ok(url)
}

pub struct AlpacaProvider {
    client: Client,
    limiter: DefaultDirectRateLimiter,
    params: AlpacaBarsParams,
}

impl AlpacaProvider {
    /// Creates a new Alpaca provider.
    ///
    /// Reads API keys from the `APCA_API_KEY_ID` and `APCA_API_SECRET_KEY`
    /// environment variables.
    pub fn new() -> Result<Self, ProviderInitError> {
        Self::with_credentials(AlpacaCredentials::from_env()?)
    }

    pub fn with_credentials(credentials: AlpacaCredentials) -> Result<Self, ProviderInitError> {
        let mut key_id = header::HeaderValue::from_str(credentials.api_key.expose_secret())
            .context(InvalidApiKeySnafu)?;
        key_id.set_sensitive(true);
        let mut secret = header::HeaderValue::from_str(credentials.secret_key.expose_secret())
            .context(InvalidApiKeySnafu)?;
        secret.set_sensitive(true);

        let mut headers = header::HeaderMap::new();
        headers.insert(header::HeaderName::from_static("apca-api-key-id"), key_id);
        headers.insert(header::HeaderName::from_static("apca-api-secret-key"), secret);

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .context(ClientBuildSnafu)?;

        Ok(Self {
            client,
            limiter: RateLimiter::direct(default_quota()),
            params: AlpacaBarsParams::default(),
        })
    }

    /// Replaces the default request knobs (adjustment, feed, page size, order).
    pub fn with_params(mut self, params: AlpacaBarsParams) -> Self {
        self.params = params;
        self
    }

    /// Replaces the default 200/minute request budget.
    pub fn with_quota(mut self, quota: Quota) -> Self {
        self.limiter = RateLimiter::direct(quota);
        self
    }
}

#[async_trait]
impl DataProvider for AlpacaProvider {
    async fn fetch_daily_bars(&self, request: &BarsRequest) -> Result<BarSeries, ProviderError> {
        validate_request(request)?;

        let url = bars_url(&request.symbol)?;
        let mut bars: Vec<Bar> = Vec::new();
        let mut next_page_token: Option<String> = None;
        let mut page = 0usize;

        loop {
            let mut query_params = construct_params(request, &self.params);
            if let Some(token) = &next_page_token {
                query_params.push(("page_token".to_string(), token.clone()));
            }

            self.limiter.until_ready().await;
            let response = self
                .client
                .get(url.clone())
                .query(&query_params)
                .send()
                .await
                .context(ReqwestSnafu)?;

            let status = response.status();
            if !status.is_success() {
                let message = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unknown API error".to_string());
                return ApiSnafu {
                    status: status.as_u16(),
                    message,
                }
                .fail();
            }

            let alpaca_response = response
                .json::<AlpacaResponse>()
                .await
                .context(ReqwestSnafu)?;

            let page_bars = alpaca_response.bars.unwrap_or_default();
            page += 1;
            debug!(
                symbol = %request.symbol,
                page,
                bars = page_bars.len(),
                "fetched alpaca bars page"
            );
            bars.extend(page_bars.into_iter().map(Bar::from));

            match alpaca_response.next_page_token {
                Some(token) => next_page_token = Some(token),
                None => break,
            }
        }

        if bars.is_empty() {
            return NoDataSnafu {
                symbol: request.symbol.clone(),
            }
            .fail();
        }

        Ok(BarSeries::new(request.symbol.clone(), bars))
    }
}
