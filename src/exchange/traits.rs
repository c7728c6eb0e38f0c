use async_trait::async_trait;

use crate::error::ExchangeError;

use super::types::AccountSummary;

pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// The slice of the broker API the store depends on.
#[async_trait]
pub trait TradingApi: Send + Sync {
    fn name(&self) -> &'static str;

    async fn account_summary(&self, account_id: &str) -> ExchangeResult<AccountSummary>;
}
