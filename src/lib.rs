//! OANDA v20 bridge for algorithmic-trading hosts
//!
//! A process-wide [`Store`] owns the broker connection, keeps account
//! cash/value fresh and queues notifications; brokers and data feeds
//! attach to it. Also ships the forex commission scheme and sizers used
//! for backtests against OANDA pricing.

pub mod commission;
pub mod config;
pub mod constants;
pub mod error;
pub mod exchange;
pub mod granularity;
pub mod host;
pub mod notification;
pub mod registry;
pub mod sizer;
pub mod store;

// Re-export commonly used types
pub use config::{AppConfig, StoreConfig};
pub use error::{ExchangeError, StoreError, StoreResult};
pub use granularity::TimeFrame;
pub use host::{Broker, DataFeed, OandaBroker, OandaData};
pub use notification::Notification;
pub use store::Store;
