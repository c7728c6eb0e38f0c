use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::StoreConfig;
use crate::constants::endpoints;
use crate::error::ExchangeError;

use super::{
    traits::{ExchangeResult, TradingApi},
    types::AccountSummary,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    Live,
    Practice,
}

impl Environment {
    pub fn from_practice(practice: bool) -> Self {
        if practice {
            Environment::Practice
        } else {
            Environment::Live
        }
    }

    pub fn api_host(&self) -> &'static str {
        match self {
            Environment::Live => endpoints::LIVE_API_HOST,
            Environment::Practice => endpoints::PRACTICE_API_HOST,
        }
    }

    pub fn stream_host(&self) -> &'static str {
        match self {
            Environment::Live => endpoints::LIVE_STREAM_HOST,
            Environment::Practice => endpoints::PRACTICE_STREAM_HOST,
        }
    }
}

/// One authenticated connection target (REST or streaming host).
#[derive(Clone, Debug)]
pub struct Context {
    client: Client,
    base_url: Url,
    token: String,
}

impl Context {
    pub fn for_host(host: &str, token: &str, timeout: Option<Duration>) -> ExchangeResult<Self> {
        let base = format!("https://{}:{}/", host, endpoints::PORT);
        Self::with_base_url(&base, token, timeout)
    }

    pub fn with_base_url(base_url: &str, token: &str, timeout: Option<Duration>) -> ExchangeResult<Self> {
        let mut builder = Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let mut base_url = Url::parse(base_url)?;
        // join() replaces the last segment unless the path ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client: builder.build()?,
            base_url,
            token: token.to_string(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn get(&self, path: &str) -> ExchangeResult<RequestBuilder> {
        let url = self.base_url.join(path)?;
        Ok(self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header(endpoints::DATETIME_FORMAT_HEADER, endpoints::DATETIME_FORMAT))
    }
}

/// OANDA v20 client with a trading and a streaming context.
#[derive(Clone, Debug)]
pub struct OandaClient {
    rest: Context,
    stream: Context,
    environment: Environment,
}

impl OandaClient {
    pub fn new(config: &StoreConfig) -> ExchangeResult<Self> {
        let environment = Environment::from_practice(config.practice);
        // REST calls must not outlive a refresh cycle; the stream stays open
        let rest = Context::for_host(
            environment.api_host(),
            &config.token,
            Some(config.refresh_interval()),
        )?;
        let stream = Context::for_host(environment.stream_host(), &config.token, None)?;

        Ok(Self {
            rest,
            stream,
            environment,
        })
    }

    /// Points both contexts at explicit base URLs (proxies, test servers).
    pub fn with_base_urls(rest_url: &str, stream_url: &str, token: &str) -> ExchangeResult<Self> {
        Ok(Self {
            rest: Context::with_base_url(rest_url, token, None)?,
            stream: Context::with_base_url(stream_url, token, None)?,
            environment: Environment::Practice,
        })
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn rest_context(&self) -> &Context {
        &self.rest
    }

    pub fn stream_context(&self) -> &Context {
        &self.stream
    }

    async fn get_json(&self, path: &str) -> ExchangeResult<Value> {
        let resp = self.rest.get(path)?.send().await?;
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(ExchangeError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl TradingApi for OandaClient {
    fn name(&self) -> &'static str {
        "oanda-v20"
    }

    async fn account_summary(&self, account_id: &str) -> ExchangeResult<AccountSummary> {
        let path = format!("v3/accounts/{}/summary", account_id);
        debug!("[OANDA] GET {}", path);

        let data = self.get_json(&path).await?;
        let account = data.get("account").cloned().unwrap_or(Value::Null);
        Ok(AccountSummary::from_v20(&account))
    }
}
