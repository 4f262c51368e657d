//! The query seam between the HTTP client and everything built on top of it.
//!
//! Post-processing (adjustment, derived metrics, bar routing) only needs
//! "run this endpoint with these params and give me a table". Depending on
//! [`QueryExecutor`] instead of a concrete client lets those layers be tested
//! against an in-memory fake.

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

use crate::{error::Result, log::SharedSink, params::Params, table::Table};

/// Executes raw Tushare queries.
///
/// # Example
///
/// ```ignore
/// use tushare_core::{Params, QueryExecutor};
///
/// let table = executor
///     .query("trade_cal", Params::new().with("exchange", "SSE"), &[])
///     .await?;
/// println!("{} calendar days", table.len());
/// ```
#[async_trait]
pub trait QueryExecutor: Send + Sync + Debug {
    /// Runs `api_name` with `params`, requesting `fields` (all fields when empty).
    ///
    /// Returns the decoded [`Table`] or the first failure. Implementations must
    /// not retry.
    async fn query(&self, api_name: &str, params: Params, fields: &[String]) -> Result<Table>;

    /// Returns the sink diagnostics should be written to.
    fn log_sink(&self) -> SharedSink;
}

#[async_trait]
impl<T: QueryExecutor + ?Sized> QueryExecutor for Arc<T> {
    async fn query(&self, api_name: &str, params: Params, fields: &[String]) -> Result<Table> {
        (**self).query(api_name, params, fields).await
    }

    fn log_sink(&self) -> SharedSink {
        (**self).log_sink()
    }
}
