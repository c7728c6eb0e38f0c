//! Integration tests for the bridge.
//! These tests wire the store to the real OANDA client against a mock server.

use std::sync::Arc;
use std::time::Duration;

use oanda_bridge::commission::{CommissionConfig, OandaCommInfo};
use oanda_bridge::exchange::oanda::OandaClient;
use oanda_bridge::sizer::{CashSizer, SizingRequest};
use oanda_bridge::{registry, Store, StoreConfig, StoreError, TimeFrame};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(account: &str, refresh_secs: f64) -> StoreConfig {
    StoreConfig {
        token: "test-token".to_string(),
        account: account.to_string(),
        practice: true,
        account_tmout: refresh_secs,
    }
}

async fn mock_summary(server: &MockServer, account: &str, margin: &str, balance: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/v3/accounts/{}/summary", account)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "account": {
                "id": account,
                "currency": "USD",
                "balance": balance,
                "marginAvailable": margin
            },
            "lastTransactionID": "1"
        })))
        .mount(server)
        .await;
}

/// Broker start against the HTTP API populates cash and value
#[tokio::test]
async fn test_broker_start_against_http_api() {
    let server = MockServer::start().await;
    mock_summary(&server, "101-1", "4500.0000", "5000.0000").await;

    let client = OandaClient::with_base_urls(&server.uri(), &server.uri(), "test-token").unwrap();
    let store = Arc::new(Store::new(config("101-1", 5.0), Arc::new(client)));

    let broker = store.get_broker();
    broker.start().await.unwrap();

    assert!(store.wait_account_ready(Duration::from_secs(2)).await);
    assert_eq!(broker.get_cash(), 4500.0);
    assert_eq!(broker.get_value(), 5000.0);
    assert!(store.get_notifications().is_empty());

    store.shutdown().await;
}

/// HTTP failures surface as notifications, not errors
#[tokio::test]
async fn test_http_failure_becomes_notification() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let client = OandaClient::with_base_urls(&server.uri(), &server.uri(), "test-token").unwrap();
    let store = Arc::new(Store::new(config("101-2", 0.05), Arc::new(client)));
    store.get_broker().start().await.unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    let notes = store.get_notifications();
    assert!(notes.len() >= 2, "expected repeated failures, got {}", notes.len());
    assert!(notes.iter().all(|n| n.message.contains("500")));
    assert_eq!(store.get_cash(), 0.0);

    store.shutdown().await;
}

/// Process-wide slot: install once, fetch, uninstall
#[tokio::test]
async fn test_registry_lifecycle() {
    let server = MockServer::start().await;
    let client = OandaClient::with_base_urls(&server.uri(), &server.uri(), "t").unwrap();
    let store = Arc::new(Store::new(config("101-3", 10.0), Arc::new(client)));

    assert!(registry::current().is_none());
    registry::install(store.clone()).unwrap();

    let other = Arc::new(Store::new(
        config("101-4", 10.0),
        Arc::new(OandaClient::with_base_urls(&server.uri(), &server.uri(), "t").unwrap()),
    ));
    assert!(matches!(registry::install(other), Err(StoreError::AlreadyInstalled)));

    let current = registry::current().unwrap();
    assert!(Arc::ptr_eq(&current, &store));

    let removed = registry::uninstall().unwrap();
    assert!(Arc::ptr_eq(&removed, &store));
    assert!(registry::current().is_none());
}

/// Feeds resolve granularities and size orders from the store's cash
#[tokio::test]
async fn test_feed_sizing_from_store_cash() {
    let server = MockServer::start().await;
    mock_summary(&server, "101-5", "1000.0000", "1200.0000").await;

    let client = OandaClient::with_base_urls(&server.uri(), &server.uri(), "t").unwrap();
    let store = Arc::new(Store::new(config("101-5", 5.0), Arc::new(client)));
    let broker = store.get_broker();
    broker.start().await.unwrap();
    assert!(store.wait_account_ready(Duration::from_secs(2)).await);

    let data = store.get_data("EUR_USD", TimeFrame::Minutes, 30);
    data.start().await.unwrap();
    assert_eq!(data.granularity(), Some("M30"));
    assert_eq!(broker.started_feeds(), vec!["EUR_USD".to_string()]);

    let comm = OandaCommInfo::new(CommissionConfig::default()).unwrap();
    let req = SizingRequest {
        close: 1.1,
        ..Default::default()
    };
    let size = CashSizer::percent().size(&comm, broker.get_cash(), &req);
    assert_eq!(size, 1000);

    store.shutdown().await;
}
