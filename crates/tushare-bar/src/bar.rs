//! Bar requests and the orchestration that serves them.

use chrono::NaiveDate;
use tushare_core::{
    AdjustMode, AssetClass, DATE_FORMAT, Endpoint, Factor, Freq, Params, QueryExecutor, Result,
    Table,
};

use crate::{adjust::adjust, metrics};

/// Parameters of a bar query.
///
/// # Example
///
/// ```
/// use tushare_bar::BarRequest;
/// use tushare_core::{AdjustMode, Factor};
///
/// let request = BarRequest::new("000001.SZ")
///     .start_date("20240101")
///     .end_date("20240630")
///     .adjust(AdjustMode::Forward)
///     .ma([5, 20])
///     .factor(Factor::VolumeRatio);
/// assert_eq!(request.ma, vec![5, 20]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BarRequest {
    /// Security code, e.g. `000001.SZ`. Sent as `symbol` for coins.
    pub ts_code: String,
    /// First date, `YYYYMMDD`. Empty means unbounded.
    pub start_date: String,
    /// Last date, `YYYYMMDD`. Empty means unbounded.
    pub end_date: String,
    /// Bar frequency.
    pub freq: Freq,
    /// Asset class selecting the endpoint family.
    pub asset: AssetClass,
    /// Exchange, used by futures and coins.
    pub exchange: String,
    /// Price adjustment. Only applied to equities.
    pub adjust: Option<AdjustMode>,
    /// Moving-average windows.
    pub ma: Vec<i64>,
    /// Derived factors, applied in order.
    pub factors: Vec<Factor>,
    /// Contract type, used by coins.
    pub contract_type: String,
}

impl BarRequest {
    /// Creates a daily, unadjusted equity request for `ts_code`.
    #[must_use]
    pub fn new(ts_code: impl Into<String>) -> Self {
        Self {
            ts_code: ts_code.into(),
            ..Self::default()
        }
    }

    /// Sets the first date as `YYYYMMDD` text.
    #[must_use]
    pub fn start_date(mut self, date: impl Into<String>) -> Self {
        self.start_date = date.into();
        self
    }

    /// Sets the last date as `YYYYMMDD` text.
    #[must_use]
    pub fn end_date(mut self, date: impl Into<String>) -> Self {
        self.end_date = date.into();
        self
    }

    /// Sets the first date.
    #[must_use]
    pub fn start(self, date: NaiveDate) -> Self {
        self.start_date(date.format(DATE_FORMAT).to_string())
    }

    /// Sets the last date.
    #[must_use]
    pub fn end(self, date: NaiveDate) -> Self {
        self.end_date(date.format(DATE_FORMAT).to_string())
    }

    /// Sets the frequency.
    #[must_use]
    pub const fn freq(mut self, freq: Freq) -> Self {
        self.freq = freq;
        self
    }

    /// Sets the asset class.
    #[must_use]
    pub const fn asset(mut self, asset: AssetClass) -> Self {
        self.asset = asset;
        self
    }

    /// Sets the exchange.
    #[must_use]
    pub fn exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = exchange.into();
        self
    }

    /// Requests price adjustment.
    #[must_use]
    pub const fn adjust(mut self, mode: AdjustMode) -> Self {
        self.adjust = Some(mode);
        self
    }

    /// Sets the moving-average windows.
    #[must_use]
    pub fn ma(mut self, windows: impl IntoIterator<Item = i64>) -> Self {
        self.ma = windows.into_iter().collect();
        self
    }

    /// Adds a derived factor.
    #[must_use]
    pub fn factor(mut self, factor: Factor) -> Self {
        self.factors.push(factor);
        self
    }

    /// Sets the contract type.
    #[must_use]
    pub fn contract_type(mut self, contract_type: impl Into<String>) -> Self {
        self.contract_type = contract_type.into();
        self
    }

    /// Resolves the endpoint and query parameters for this request.
    #[must_use]
    pub fn route(&self) -> (Endpoint, Params) {
        let range = |params: Params| {
            params
                .with("start_date", self.start_date.as_str())
                .with("end_date", self.end_date.as_str())
        };

        match self.asset {
            AssetClass::Equity => {
                let endpoint = match self.freq {
                    Freq::Daily => Endpoint::Daily,
                    Freq::Weekly => Endpoint::Weekly,
                    Freq::Monthly => Endpoint::Monthly,
                };
                (endpoint, range(Params::new().with("ts_code", self.ts_code.as_str())))
            }
            AssetClass::Index => {
                let endpoint = match self.freq {
                    Freq::Daily => Endpoint::IndexDaily,
                    Freq::Weekly => Endpoint::IndexWeekly,
                    Freq::Monthly => Endpoint::IndexMonthly,
                };
                (endpoint, range(Params::new().with("ts_code", self.ts_code.as_str())))
            }
            AssetClass::Futures => (
                Endpoint::FutDaily,
                range(Params::new().with("ts_code", self.ts_code.as_str()))
                    .with("exchange", self.exchange.as_str()),
            ),
            AssetClass::Coin => {
                let freq = match self.freq {
                    Freq::Weekly => "week",
                    Freq::Daily | Freq::Monthly => "daily",
                };
                (
                    Endpoint::CoinBar,
                    range(Params::new().with("symbol", self.ts_code.as_str()))
                        .with("exchange", self.exchange.as_str())
                        .with("freq", freq)
                        .with("contract_type", self.contract_type.as_str()),
                )
            }
        }
    }
}

/// Serves [`BarRequest`]s over any [`QueryExecutor`].
#[derive(Debug, Clone)]
pub struct BarClient<E> {
    executor: E,
}

impl<E: QueryExecutor> BarClient<E> {
    /// Wraps an executor.
    #[must_use]
    pub const fn new(executor: E) -> Self {
        Self { executor }
    }

    /// Returns the wrapped executor.
    #[must_use]
    pub const fn executor(&self) -> &E {
        &self.executor
    }

    /// Consumes the client and returns the executor.
    #[must_use]
    pub fn into_inner(self) -> E {
        self.executor
    }

    /// Fetches bars and applies the requested post-processing.
    ///
    /// Equities: adjustment, then factors, then moving averages. Other asset
    /// classes skip adjustment with a warning.
    #[tracing::instrument(level = "debug", skip(self, request), fields(ts_code = %request.ts_code))]
    pub async fn bar(&self, request: &BarRequest) -> Result<Table> {
        let sink = self.executor.log_sink();
        let (endpoint, params) = request.route();

        let mut series = self.executor.query(endpoint.name(), params, &[]).await?;

        match request.adjust {
            Some(mode) if request.asset.supports_adjustment() => {
                series = adjust(
                    &self.executor,
                    series,
                    &request.ts_code,
                    &request.start_date,
                    &request.end_date,
                    mode,
                )
                .await?;
            }
            Some(mode) => sink.warn(&format!(
                "{mode} adjustment is only supported for equities, ignoring it for asset class {}",
                request.asset.code()
            )),
            None => {}
        }

        metrics::add_factors(&mut series, &request.factors, &*sink);
        metrics::with_moving_averages(&mut series, &request.ma, &*sink);

        Ok(series)
    }
}
