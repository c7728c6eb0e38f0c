//! Contract between the store and the host framework's brokers and feeds.

use std::sync::{Arc, Mutex};

use tracing::{info, warn};

use crate::error::StoreResult;
use crate::exchange::types::OrderRequest;
use crate::granularity::TimeFrame;
use crate::store::{lock, Store};

pub trait DataFeed: Send + Sync {
    fn name(&self) -> &str;
    fn timeframe(&self) -> TimeFrame;
    fn compression(&self) -> u32;
}

pub trait Broker: Send + Sync {
    /// Called when a data feed registers after the broker did.
    fn data_started(&self, data: &dyn DataFeed);
}

/// Instrument feed backed by the store.
pub struct OandaData {
    store: Arc<Store>,
    dataname: String,
    timeframe: TimeFrame,
    compression: u32,
}

impl OandaData {
    pub fn new(store: Arc<Store>, dataname: impl Into<String>, timeframe: TimeFrame, compression: u32) -> Self {
        Self {
            store,
            dataname: dataname.into(),
            timeframe,
            compression,
        }
    }

    pub async fn start(self: &Arc<Self>) -> StoreResult<()> {
        if self.granularity().is_none() {
            warn!(
                "[DATA] {} has no OANDA granularity for {:?}/{}",
                self.dataname, self.timeframe, self.compression
            );
        }
        let feed: Arc<dyn DataFeed> = self.clone();
        self.store.start(Some(feed), None).await
    }

    pub fn granularity(&self) -> Option<&'static str> {
        self.store.get_granularity(self.timeframe, self.compression)
    }

    pub fn store(&self) -> &Arc<Store> {
        &self.store
    }
}

impl DataFeed for OandaData {
    fn name(&self) -> &str {
        &self.dataname
    }

    fn timeframe(&self) -> TimeFrame {
        self.timeframe
    }

    fn compression(&self) -> u32 {
        self.compression
    }
}

/// Broker facade over the store's account figures and order calls.
pub struct OandaBroker {
    store: Arc<Store>,
    started_feeds: Mutex<Vec<String>>,
}

impl OandaBroker {
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            started_feeds: Mutex::new(Vec::new()),
        }
    }

    pub async fn start(self: &Arc<Self>) -> StoreResult<()> {
        let broker: Arc<dyn Broker> = self.clone();
        self.store.start(None, Some(broker)).await
    }

    pub fn get_cash(&self) -> f64 {
        self.store.get_cash()
    }

    pub fn get_value(&self) -> f64 {
        self.store.get_value()
    }

    pub fn submit(&self, order: &OrderRequest) -> StoreResult<()> {
        self.store.order_create(order, None, None)
    }

    pub fn cancel(&self, order: &OrderRequest) -> StoreResult<()> {
        self.store.order_cancel(order)
    }

    /// Names of feeds announced through [`Broker::data_started`].
    pub fn started_feeds(&self) -> Vec<String> {
        lock(&self.started_feeds).clone()
    }
}

impl Broker for OandaBroker {
    fn data_started(&self, data: &dyn DataFeed) {
        info!("[BROKER] Data feed {} started", data.name());
        lock(&self.started_feeds).push(data.name().to_string());
    }
}
