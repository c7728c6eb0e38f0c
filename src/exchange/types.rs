use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Account figures the store cares about. Missing fields stay `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AccountSummary {
    pub id: Option<String>,
    pub currency: Option<String>,
    pub balance: Option<f64>,
    pub nav: Option<f64>,
    pub margin_available: Option<f64>,
    pub unrealized_pl: Option<f64>,
    pub open_trade_count: Option<u64>,
}

impl AccountSummary {
    /// Builds a summary from the `account` object of a v20 summary response.
    /// Decimals arrive as strings; plain numbers are accepted too.
    pub fn from_v20(account: &Value) -> Self {
        Self {
            id: account.get("id").and_then(|v| v.as_str()).map(str::to_string),
            currency: account
                .get("currency")
                .and_then(|v| v.as_str())
                .map(str::to_string),
            balance: decimal(account, "balance"),
            nav: decimal(account, "NAV"),
            margin_available: decimal(account, "marginAvailable"),
            unrealized_pl: decimal(account, "unrealizedPL"),
            open_trade_count: account.get("openTradeCount").and_then(|v| {
                v.as_u64()
                    .or_else(|| v.as_str().and_then(|s| s.parse::<u64>().ok()))
            }),
        }
    }
}

fn decimal(obj: &Value, key: &str) -> Option<f64> {
    let v = obj.get(key)?;
    v.as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| v.as_f64())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Buy,
    Sell,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderType {
    Market,
    Limit,
    Stop,
    MarketIfTouched,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    Gtc,
    Gtd,
    Gfd,
    Fok,
    Ioc,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrderRequest {
    /// Host-side order reference
    pub reference: u64,
    pub instrument: String,
    pub side: Side,
    pub units: f64,
    pub order_type: OrderType,
    pub price: Option<f64>,
    pub time_in_force: TimeInForce,
}
