//! Unit tests for v20 payload parsing.

#[cfg(test)]
mod types_tests {
    use crate::exchange::types::*;
    use serde_json::json;

    #[test]
    fn test_account_summary_from_string_decimals() {
        let account = json!({
            "id": "101-004-1234567-001",
            "currency": "USD",
            "balance": "100000.0000",
            "NAV": "100012.5000",
            "marginAvailable": "98500.2500",
            "unrealizedPL": "12.5000",
            "openTradeCount": 2
        });
        let summary = AccountSummary::from_v20(&account);

        assert_eq!(summary.id.as_deref(), Some("101-004-1234567-001"));
        assert_eq!(summary.currency.as_deref(), Some("USD"));
        assert_eq!(summary.balance, Some(100000.0));
        assert_eq!(summary.nav, Some(100012.5));
        assert_eq!(summary.margin_available, Some(98500.25));
        assert_eq!(summary.unrealized_pl, Some(12.5));
        assert_eq!(summary.open_trade_count, Some(2));
    }

    #[test]
    fn test_account_summary_accepts_numbers() {
        let account = json!({"balance": 250.5, "marginAvailable": 120});
        let summary = AccountSummary::from_v20(&account);
        assert_eq!(summary.balance, Some(250.5));
        assert_eq!(summary.margin_available, Some(120.0));
    }

    #[test]
    fn test_account_summary_missing_and_garbage_fields() {
        let account = json!({"balance": "not-a-number"});
        let summary = AccountSummary::from_v20(&account);
        assert_eq!(summary.balance, None);
        assert_eq!(summary.margin_available, None);
        assert_eq!(summary.id, None);
    }

    #[test]
    fn test_order_enums_serialize_like_v20() {
        assert_eq!(serde_json::to_string(&OrderType::MarketIfTouched).unwrap(), "\"MARKET_IF_TOUCHED\"");
        assert_eq!(serde_json::to_string(&TimeInForce::Fok).unwrap(), "\"FOK\"");
        assert_eq!(serde_json::to_string(&Side::Sell).unwrap(), "\"sell\"");
    }
}
