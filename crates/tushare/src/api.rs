//! Endpoint calls and convenience shortcuts for any [`QueryExecutor`].

use async_trait::async_trait;
use tracing::debug;
use tushare_core::{Endpoint, Params, QueryExecutor, Result, Table};

/// Returns the commonly requested fields of `endpoint`.
#[must_use]
pub fn common_fields(endpoint: Endpoint) -> Vec<String> {
    endpoint.common_fields()
}

/// Typed endpoint access, implemented for every [`QueryExecutor`].
///
/// [`call`](EndpointApi::call) is the single generic path: it validates the
/// parameters against the endpoint catalogue, fills in defaults and runs the
/// query. The remaining methods are shortcuts for common requests and return
/// every field the endpoint provides.
///
/// # Example
///
/// ```rust,ignore
/// use tushare::{EndpointApi, TushareClient};
///
/// let client = TushareClient::from_env()?;
/// let open_days = client.trade_days("20240101", "20240131").await?;
/// let profile = client.company_info("000001.SZ").await?;
/// ```
#[async_trait]
pub trait EndpointApi: QueryExecutor {
    /// Calls `endpoint` with `params`, requesting `fields` (all when empty).
    ///
    /// Fails with `InvalidParameter` before any request if `params` names a
    /// parameter the endpoint does not accept.
    async fn call(&self, endpoint: Endpoint, params: Params, fields: &[String]) -> Result<Table> {
        let params = endpoint
            .prepare(params)
            .inspect_err(|e| self.log_sink().error(&e.to_string()))?;

        debug!(endpoint = endpoint.name(), params = params.len(), "calling endpoint");
        self.query(endpoint.name(), params, fields).await
    }

    /// Lists every currently listed security.
    async fn list_stocks(&self) -> Result<Table> {
        self.call(
            Endpoint::StockBasic,
            Params::new().with("list_status", "L"),
            &[],
        )
        .await
    }

    /// Lists listed securities of one market board, e.g. `主板` or `创业板`.
    async fn stocks_on_market(&self, market: &str) -> Result<Table> {
        self.call(
            Endpoint::StockBasic,
            Params::new()
                .with("list_status", "L")
                .with("market", market),
            &Endpoint::StockBasic.common_fields(),
        )
        .await
    }

    /// Returns the trading calendar of `exchange` between two dates.
    async fn trade_calendar(&self, exchange: &str, start_date: &str, end_date: &str) -> Result<Table> {
        self.call(
            Endpoint::TradeCal,
            Params::new()
                .with("exchange", exchange)
                .with("start_date", start_date)
                .with("end_date", end_date),
            &[],
        )
        .await
    }

    /// Returns the SSE trading days between two dates.
    async fn trade_days(&self, start_date: &str, end_date: &str) -> Result<Table> {
        self.call(
            Endpoint::TradeCal,
            Params::new()
                .with("exchange", "SSE")
                .with("start_date", start_date)
                .with("end_date", end_date)
                .with("is_open", "1"),
            &[],
        )
        .await
    }

    /// Returns the adjustment factors of one security between two dates.
    async fn stock_adj_factor(&self, ts_code: &str, start_date: &str, end_date: &str) -> Result<Table> {
        self.call(
            Endpoint::AdjFactor,
            Params::new()
                .with("ts_code", ts_code)
                .with("start_date", start_date)
                .with("end_date", end_date),
            &[],
        )
        .await
    }

    /// Returns the adjustment factors of every security on one day.
    async fn day_adj_factor(&self, trade_date: &str) -> Result<Table> {
        self.call(
            Endpoint::AdjFactor,
            Params::new().with("trade_date", trade_date),
            &[],
        )
        .await
    }

    /// Returns the company profile of one security.
    async fn company_info(&self, ts_code: &str) -> Result<Table> {
        self.call(
            Endpoint::StockCompany,
            Params::new().with("ts_code", ts_code),
            &[],
        )
        .await
    }

    /// Returns the company profiles of one exchange.
    async fn companies_on_exchange(&self, exchange: &str) -> Result<Table> {
        self.call(
            Endpoint::StockCompany,
            Params::new().with("exchange", exchange),
            &[],
        )
        .await
    }

    /// Returns Stock Connect constituents of `hs_type` (`SH` or `SZ`).
    ///
    /// `current` selects present constituents; otherwise historical ones.
    async fn hs_constituents(&self, hs_type: &str, current: bool) -> Result<Table> {
        self.call(
            Endpoint::HsConst,
            Params::new()
                .with("hs_type", hs_type)
                .with("is_new", if current { "1" } else { "0" }),
            &[],
        )
        .await
    }

    /// Returns the name history of one security.
    async fn name_history(&self, ts_code: &str) -> Result<Table> {
        self.call(
            Endpoint::NameChange,
            Params::new().with("ts_code", ts_code),
            &[],
        )
        .await
    }

    /// Returns the name changes announced between two dates.
    async fn name_changes_between(&self, start_date: &str, end_date: &str) -> Result<Table> {
        self.call(
            Endpoint::NameChange,
            Params::new()
                .with("start_date", start_date)
                .with("end_date", end_date),
            &[],
        )
        .await
    }

    /// Returns IPOs between two dates. Empty dates return the most recent ones.
    async fn new_shares(&self, start_date: &str, end_date: &str) -> Result<Table> {
        self.call(
            Endpoint::NewShare,
            Params::new()
                .with("start_date", start_date)
                .with("end_date", end_date),
            &[],
        )
        .await
    }

    /// Returns the consolidated income statements of one security.
    async fn latest_income(&self, ts_code: &str) -> Result<Table> {
        self.call(
            Endpoint::Income,
            Params::new()
                .with("ts_code", ts_code)
                .with("report_type", "1"),
            &[],
        )
        .await
    }

    /// Returns the consolidated income statement for a report period, e.g. `20240331`.
    async fn period_income(&self, ts_code: &str, period: &str) -> Result<Table> {
        self.call(
            Endpoint::Income,
            Params::new()
                .with("ts_code", ts_code)
                .with("period", period)
                .with("report_type", "1"),
            &[],
        )
        .await
    }

    /// Returns the consolidated annual income statement of `year`.
    async fn annual_income(&self, ts_code: &str, year: i32) -> Result<Table> {
        self.period_income(ts_code, &format!("{year}1231")).await
    }

    /// Returns the consolidated balance sheets of one security.
    async fn latest_balance_sheet(&self, ts_code: &str) -> Result<Table> {
        self.call(
            Endpoint::BalanceSheet,
            Params::new()
                .with("ts_code", ts_code)
                .with("report_type", "1"),
            &[],
        )
        .await
    }

    /// Returns the consolidated balance sheet for a report period, e.g. `20240331`.
    async fn period_balance_sheet(&self, ts_code: &str, period: &str) -> Result<Table> {
        self.call(
            Endpoint::BalanceSheet,
            Params::new()
                .with("ts_code", ts_code)
                .with("period", period)
                .with("report_type", "1"),
            &[],
        )
        .await
    }

    /// Returns the consolidated annual balance sheet of `year`.
    async fn annual_balance_sheet(&self, ts_code: &str, year: i32) -> Result<Table> {
        self.period_balance_sheet(ts_code, &format!("{year}1231")).await
    }

    /// Returns `freq`-minute bars (1, 5, 15, 30 or 60) of one security on one day.
    async fn minute_bars(&self, ts_code: &str, trade_date: &str, freq: u32) -> Result<Table> {
        self.call(
            Endpoint::StockMinutes,
            Params::new()
                .with("ts_code", ts_code)
                .with("trade_date", trade_date)
                .with("freq", freq.to_string()),
            &[],
        )
        .await
    }
}

impl<T: QueryExecutor + ?Sized> EndpointApi for T {}
