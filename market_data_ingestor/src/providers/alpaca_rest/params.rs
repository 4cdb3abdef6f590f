use serde::{Deserialize, Serialize};

use crate::models::request_params::BarsRequest;

/// Alpaca caps a single page at 10 000 bars.
pub const MAX_PAGE_LIMIT: u32 = 10_000;

/// Specifies the corporate action adjustment for stock data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    Raw,
    Split,
    Dividend,
    #[default]
    All,
}

/// Specifies the source feed for stock data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Feed {
    Sip,
    #[default]
    Iex,
    Otc,
}

/// Specifies the sort order for the bars.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
    #[default]
    Asc,
    Desc,
}

/// Alpaca-specific knobs for a daily bars request.
///
/// The defaults give fully adjusted prices from the free IEX feed, oldest first.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AlpacaBarsParams {
    pub adjustment: Adjustment,
    pub feed: Feed,
    pub limit: u32,
    pub sort: Sort,
}

impl Default for AlpacaBarsParams {
    fn default() -> Self {
        Self {
            adjustment: Adjustment::default(),
            feed: Feed::default(),
            limit: MAX_PAGE_LIMIT,
            sort: Sort::default(),
        }
    }
}

fn as_query_value<T: Serialize>(value: &T) -> String {
    // unit variants serialize to a bare JSON string
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_owned))
        .unwrap_or_default()
}

/// Builds the query string for `GET /v2/stocks/{symbol}/bars`.
pub fn construct_params(request: &BarsRequest, params: &AlpacaBarsParams) -> Vec<(String, String)> {
    vec![
        ("timeframe".to_string(), "1Day".to_string()),
        ("start".to_string(), request.start.format("%Y-%m-%d").to_string()),
        ("end".to_string(), request.end.format("%Y-%m-%d").to_string()),
        ("adjustment".to_string(), as_query_value(&params.adjustment)),
        ("feed".to_string(), as_query_value(&params.feed)),
        ("limit".to_string(), params.limit.min(MAX_PAGE_LIMIT).to_string()),
        ("sort".to_string(), as_query_value(&params.sort)),
    ]
}
