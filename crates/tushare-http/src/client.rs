//! The HTTP query executor.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tushare_core::{
    Params, QueryExecutor, RequestEnvelope, Result, SharedSink, Table, TracingSink,
    TransportStage, TushareError,
};

use crate::{config::ClientConfig, wire};

/// Tushare Pro API client.
///
/// Every query is a single JSON `POST` to the configured endpoint, bounded by
/// the configured timeout. Settings are changed through `&mut self`; share a
/// configured client behind an [`Arc`] to use it from several tasks.
#[derive(Clone)]
pub struct TushareClient {
    http: reqwest::Client,
    config: ClientConfig,
    sink: SharedSink,
}

impl fmt::Debug for TushareClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TushareClient")
            .field("token", &"[REDACTED]")
            .field("api_url", &self.config.api_url)
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}

impl TushareClient {
    /// Creates a client with the given token and default settings.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self::builder().token(token).build()
    }

    /// Creates a client from `TUSHARE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Ok(Self::builder().config(ClientConfig::from_env()?).build())
    }

    /// Returns a builder with default settings.
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Replaces the credential token.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.config.token = token.into();
        self.sink.info("token updated");
    }

    /// Returns the credential token.
    #[must_use]
    pub fn token(&self) -> &str {
        &self.config.token
    }

    /// Sets the bound on each HTTP exchange.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.config.timeout = timeout;
        self.sink.info(&format!("timeout set to {timeout:?}"));
    }

    /// Returns the per-request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Sets the endpoint queries are posted to.
    pub fn set_api_url(&mut self, api_url: impl Into<String>) {
        self.config.api_url = api_url.into();
        self.sink.info(&format!("API url set to {}", self.config.api_url));
    }

    /// Returns the endpoint queries are posted to.
    #[must_use]
    pub fn api_url(&self) -> &str {
        &self.config.api_url
    }

    /// Replaces the log sink.
    pub fn set_log_sink(&mut self, sink: SharedSink) {
        self.sink = sink;
    }

    /// Returns the current configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn failed(&self, api_name: &str, err: TushareError) -> TushareError {
        self.sink.error(&format!("{api_name} query failed: {err}"));
        err
    }
}

fn from_reqwest(stage: TransportStage, e: &reqwest::Error) -> TushareError {
    let stage = if e.is_builder() {
        TransportStage::BuildClient
    } else {
        stage
    };

    if e.is_timeout() {
        TushareError::timeout(stage, e.to_string())
    } else {
        TushareError::transport(stage, e.to_string())
    }
}

#[async_trait]
impl QueryExecutor for TushareClient {
    #[tracing::instrument(level = "debug", skip(self, params, fields))]
    async fn query(&self, api_name: &str, params: Params, fields: &[String]) -> Result<Table> {
        if self.config.token.is_empty() {
            return Err(self.failed(api_name, TushareError::Auth));
        }

        self.sink
            .debug(&format!("querying {api_name} with params {params:?}"));

        let envelope = RequestEnvelope::new(
            api_name,
            self.config.token.as_str(),
            params,
            fields.to_vec(),
        );
        let body = envelope.to_json().map_err(|e| self.failed(api_name, e))?;

        self.sink
            .debug(&format!("sending request to {}", self.config.api_url));

        let response = self
            .http
            .post(&self.config.api_url)
            .header(CONTENT_TYPE, "application/json")
            .timeout(self.config.timeout)
            .body(body)
            .send()
            .await
            .map_err(|e| self.failed(api_name, from_reqwest(TransportStage::Send, &e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.failed(api_name, from_reqwest(TransportStage::ReadBody, &e)))?;

        // Error statuses still carry the API envelope when the gateway produced them.
        let table = match wire::decode(&bytes) {
            Ok(table) if status.is_success() => table,
            Err(e) if status.is_success() || e.api_code().is_some() => {
                return Err(self.failed(api_name, e));
            }
            _ => {
                let err = TushareError::transport(TransportStage::Status, format!("HTTP {status}"));
                return Err(self.failed(api_name, err));
            }
        };

        self.sink
            .debug(&format!("{api_name} returned {} rows", table.len()));
        Ok(table)
    }

    fn log_sink(&self) -> SharedSink {
        Arc::clone(&self.sink)
    }
}

/// Builder for [`TushareClient`].
#[derive(Default)]
pub struct ClientBuilder {
    config: ClientConfig,
    sink: Option<SharedSink>,
    http: Option<reqwest::Client>,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("config", &self.config)
            .field("sink", &self.sink)
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    /// Replaces every connection setting at once.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the credential token.
    #[must_use]
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = token.into();
        self
    }

    /// Sets the endpoint.
    #[must_use]
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.config.api_url = api_url.into();
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Sets the log sink. Defaults to [`TracingSink`].
    #[must_use]
    pub fn log_sink(mut self, sink: SharedSink) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Uses a pre-configured reqwest client.
    #[must_use]
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http = Some(client);
        self
    }

    /// Builds the client.
    #[must_use]
    pub fn build(self) -> TushareClient {
        TushareClient {
            http: self.http.unwrap_or_default(),
            config: self.config,
            sink: self.sink.unwrap_or_else(TracingSink::shared),
        }
    }
}
