//! Endpoints, defaults and log event names
//!
//! Centralized so the store, the client and the binary agree on them.

/// OANDA v20 hosts
pub mod endpoints {
    pub const LIVE_API_HOST: &str = "api-fxtrade.oanda.com";
    pub const PRACTICE_API_HOST: &str = "api-fxpractice.oanda.com";
    pub const LIVE_STREAM_HOST: &str = "stream-fxtrade.oanda.com";
    pub const PRACTICE_STREAM_HOST: &str = "stream-fxpractice.oanda.com";

    pub const PORT: u16 = 443;

    /// Timestamps come back as unix seconds instead of RFC3339
    pub const DATETIME_FORMAT_HEADER: &str = "Accept-Datetime-Format";
    pub const DATETIME_FORMAT: &str = "UNIX";
}

/// Store defaults
pub mod store {
    /// Account balance refresh period (seconds)
    pub const ACCOUNT_TMOUT_SECS: f64 = 10.0;

    /// Pending refresh requests for the account worker
    pub const ACCOUNT_COMMAND_CAPACITY: usize = 16;

    /// Buffered transactions between the stream and its listener
    pub const TRANSACTION_CAPACITY: usize = 1024;
}

/// Logging event names for structured logging
pub mod events {
    pub const ACCOUNT_REFRESHED: &str = "account_refreshed";
    pub const ACCOUNT_FETCH_FAILED: &str = "account_fetch_failed";
    pub const ACCOUNT_READY_TIMEOUT: &str = "account_ready_timeout";
    pub const TRANSACTION_RECEIVED: &str = "transaction_received";
}
