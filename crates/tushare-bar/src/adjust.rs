//! Forward / backward price adjustment.
//!
//! Adjustment rescales the price fields of a bar series by the per-date
//! adjustment factors published on the `adj_factor` endpoint. Backward
//! adjustment (`hfq`) multiplies each bar by its own factor. Forward
//! adjustment (`qfq`) divides that factor by the first factor of the series
//! so prices are expressed relative to the start of the requested range.

use std::collections::HashMap;

use tushare_core::{AdjustMode, Endpoint, Params, QueryExecutor, Result, Row, Scalar, Table};

/// Fields rescaled by adjustment. Every other field is copied verbatim.
pub const PRICE_FIELDS: [&str; 5] = ["open", "high", "low", "close", "pre_close"];

const DATE_FIELD: &str = "trade_date";
const FACTOR_FIELD: &str = "adj_factor";

/// Trade date to adjustment factor lookup built from an `adj_factor` table.
#[derive(Debug, Clone, PartialEq)]
pub struct FactorIndex {
    by_date: HashMap<String, f64>,
    carry_forward: f64,
    first: f64,
}

impl FactorIndex {
    /// Indexes a factor series.
    ///
    /// Rows without a date or with an unparsable factor are skipped. The last
    /// indexed factor, in the order returned, becomes the carry-forward value
    /// for dates missing from the index. The first parsable factor of the
    /// series is the forward-adjustment base; zero or none falls back to `1.0`.
    #[must_use]
    pub fn from_table(factors: &Table) -> Self {
        let mut by_date = HashMap::with_capacity(factors.len());
        let mut carry_forward = 1.0;

        for row in factors {
            let Some(date) = row.get(DATE_FIELD).and_then(Scalar::as_key) else {
                continue;
            };
            let Some(factor) = row.get(FACTOR_FIELD).and_then(Scalar::as_f64) else {
                continue;
            };
            by_date.insert(date.into_owned(), factor);
            carry_forward = factor;
        }

        let first = factors
            .iter()
            .find_map(|row| row.get(FACTOR_FIELD).and_then(Scalar::as_f64))
            .filter(|f| *f != 0.0)
            .unwrap_or(1.0);

        Self {
            by_date,
            carry_forward,
            first,
        }
    }

    /// Returns the number of indexed dates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    /// Returns true if no factor could be indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    /// Returns the factor for `date`, or the carry-forward value.
    #[must_use]
    pub fn factor(&self, date: &str) -> f64 {
        self.by_date.get(date).copied().unwrap_or(self.carry_forward)
    }

    /// Returns the forward-adjustment base.
    #[must_use]
    pub const fn first(&self) -> f64 {
        self.first
    }

    /// Returns the value used for dates missing from the index.
    #[must_use]
    pub const fn carry_forward(&self) -> f64 {
        self.carry_forward
    }

    /// Returns the price multiplier for `date` under `mode`.
    #[must_use]
    pub fn multiplier(&self, date: &str, mode: AdjustMode) -> f64 {
        match mode {
            AdjustMode::Backward => self.factor(date),
            AdjustMode::Forward => self.factor(date) / self.first,
        }
    }
}

fn adjust_row(row: &Row, multiplier: f64) -> Row {
    let mut adjusted = row.clone();
    for field in PRICE_FIELDS {
        if let Some(price) = row.get(field).and_then(Scalar::as_f64) {
            adjusted.insert(field.to_string(), Scalar::Float(price * multiplier));
        }
    }
    adjusted
}

/// Applies indexed factors to every row of `series`.
///
/// Rows without a resolvable `trade_date` are copied unchanged.
#[must_use]
pub fn apply_factors(series: &Table, index: &FactorIndex, mode: AdjustMode) -> Table {
    let rows = series
        .iter()
        .map(|row| match row.get(DATE_FIELD).and_then(Scalar::as_key) {
            Some(date) => adjust_row(row, index.multiplier(&date, mode)),
            None => row.clone(),
        })
        .collect();

    Table::new(series.columns().to_vec(), rows)
}

/// Fetches the factor series for `ts_code` and adjusts `series` with it.
///
/// An empty series is returned as-is without a fetch. When no usable factors
/// exist the unadjusted series is returned and a warning is logged. Only a
/// failed factor fetch is an error.
pub async fn adjust<E>(
    executor: &E,
    series: Table,
    ts_code: &str,
    start_date: &str,
    end_date: &str,
    mode: AdjustMode,
) -> Result<Table>
where
    E: QueryExecutor + ?Sized,
{
    if series.is_empty() {
        return Ok(series);
    }

    let sink = executor.log_sink();
    sink.debug(&format!(
        "fetching adjustment factors, ts_code={ts_code}, start_date={start_date}, end_date={end_date}"
    ));

    let params = Params::new()
        .with("ts_code", ts_code)
        .with("start_date", start_date)
        .with("end_date", end_date);

    let factors = executor
        .query(Endpoint::AdjFactor.name(), params, &[])
        .await
        .inspect_err(|e| sink.error(&format!("failed to fetch adjustment factors: {e}")))?;

    if factors.is_empty() {
        sink.warn(&format!(
            "no adjustment factors found for {ts_code}, returning unadjusted bars"
        ));
        return Ok(series);
    }

    let index = FactorIndex::from_table(&factors);
    if index.is_empty() {
        sink.warn(&format!(
            "adjustment factors for {ts_code} are unusable, returning unadjusted bars"
        ));
        return Ok(series);
    }

    let adjusted = apply_factors(&series, &index, mode);
    sink.debug(&format!("applied {mode} adjustment to {} bars", adjusted.len()));
    Ok(adjusted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockExecutor, bars, factors, floats};
    use tushare_core::{Level, TushareError};

    fn sample_bars() -> Table {
        bars(&[
            ("20240102", 10.0, 100.0),
            ("20240103", 11.0, 120.0),
            ("20240104", 12.0, 90.0),
        ])
    }

    #[test]
    fn test_backward_with_unit_factor_is_identity() {
        let series = sample_bars();
        let index = FactorIndex::from_table(&factors(&[
            ("20240102", Scalar::Float(1.0)),
            ("20240103", Scalar::Float(1.0)),
            ("20240104", Scalar::Float(1.0)),
        ]));

        let adjusted = apply_factors(&series, &index, AdjustMode::Backward);
        for field in PRICE_FIELDS {
            assert_eq!(floats(&adjusted, field), floats(&series, field));
        }
        assert_eq!(adjusted.column("vol"), series.column("vol"));
    }

    #[test]
    fn test_forward_with_constant_factor_is_identity() {
        let series = sample_bars();
        let index = FactorIndex::from_table(&factors(&[
            ("20240102", Scalar::Float(2.5)),
            ("20240103", Scalar::Float(2.5)),
            ("20240104", Scalar::Float(2.5)),
        ]));

        let adjusted = apply_factors(&series, &index, AdjustMode::Forward);
        assert_eq!(floats(&adjusted, "close"), vec![10.0, 11.0, 12.0]);
        assert_eq!(floats(&adjusted, "pre_close"), vec![10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_backward_uses_carry_forward_for_missing_dates() {
        let series = sample_bars();
        let index = FactorIndex::from_table(&factors(&[
            ("20240102", Scalar::Float(1.0)),
            ("20240103", Scalar::Float(2.0)),
        ]));

        assert_eq!(index.carry_forward(), 2.0);
        let adjusted = apply_factors(&series, &index, AdjustMode::Backward);
        assert_eq!(floats(&adjusted, "close"), vec![10.0, 22.0, 24.0]);
    }

    #[test]
    fn test_forward_divides_by_first_factor() {
        let series = sample_bars();
        let index = FactorIndex::from_table(&factors(&[
            ("20240102", Scalar::Float(2.0)),
            ("20240103", Scalar::Float(4.0)),
            ("20240104", Scalar::Float(4.0)),
        ]));

        let adjusted = apply_factors(&series, &index, AdjustMode::Forward);
        assert_eq!(floats(&adjusted, "open"), vec![10.0, 22.0, 24.0]);
    }

    #[test]
    fn test_zero_first_factor_falls_back_to_one() {
        let index = FactorIndex::from_table(&factors(&[
            ("20240102", Scalar::Float(0.0)),
            ("20240103", Scalar::Float(3.0)),
        ]));
        assert_eq!(index.first(), 1.0);
        assert_eq!(index.multiplier("20240103", AdjustMode::Forward), 3.0);
    }

    #[test]
    fn test_string_factors_parse_and_bad_ones_skip() {
        let index = FactorIndex::from_table(&factors(&[
            ("20240102", Scalar::from("n/a")),
            ("20240103", Scalar::from("1.5")),
            ("20240104", Scalar::Null),
        ]));

        assert_eq!(index.len(), 1);
        assert_eq!(index.first(), 1.5);
        assert_eq!(index.factor("20240103"), 1.5);
        assert_eq!(index.factor("20991231"), 1.5);
    }

    #[test]
    fn test_rows_without_date_and_string_prices() {
        let mut series = Table::new(
            vec!["trade_date".into(), "close".into(), "name".into()],
            Vec::new(),
        );
        let mut dated = Row::new();
        dated.insert("trade_date".into(), Scalar::from("20240102"));
        dated.insert("close".into(), Scalar::from("10.0"));
        dated.insert("name".into(), Scalar::from("平安银行"));
        series.push_row(dated);

        let mut undated = Row::new();
        undated.insert("close".into(), Scalar::Float(7.0));
        series.push_row(undated.clone());

        let index = FactorIndex::from_table(&factors(&[("20240102", Scalar::Float(2.0))]));
        let adjusted = apply_factors(&series, &index, AdjustMode::Backward);

        assert_eq!(adjusted.get(0, "close"), Some(&Scalar::Float(20.0)));
        assert_eq!(adjusted.get(0, "name"), Some(&Scalar::from("平安银行")));
        assert_eq!(adjusted.rows()[1], undated);
    }

    #[tokio::test]
    async fn test_adjust_fetches_factors_for_range() {
        let executor = MockExecutor::new().with_table(
            "adj_factor",
            factors(&[
                ("20240102", Scalar::Float(1.0)),
                ("20240103", Scalar::Float(1.1)),
                ("20240104", Scalar::Float(1.1)),
            ]),
        );

        let adjusted = adjust(
            &executor,
            sample_bars(),
            "000001.SZ",
            "20240102",
            "20240104",
            AdjustMode::Backward,
        )
        .await
        .unwrap();

        let closes = floats(&adjusted, "close");
        assert!((closes[1] - 12.1).abs() < 1e-9);

        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "adj_factor");
        assert_eq!(calls[0].1.get("ts_code"), Some(&Scalar::from("000001.SZ")));
        assert_eq!(calls[0].1.get("end_date"), Some(&Scalar::from("20240104")));
    }

    #[tokio::test]
    async fn test_missing_factors_return_unadjusted() {
        let executor = MockExecutor::new().with_table("adj_factor", factors(&[]));
        let series = sample_bars();

        let adjusted = adjust(&executor, series.clone(), "000001.SZ", "", "", AdjustMode::Forward)
            .await
            .unwrap();

        assert_eq!(adjusted, series);
        assert!(executor.memory().contains(Level::Warn, "no adjustment factors"));
    }

    #[tokio::test]
    async fn test_unusable_factors_return_unadjusted() {
        let executor = MockExecutor::new()
            .with_table("adj_factor", factors(&[("20240102", Scalar::from("bad"))]));
        let series = sample_bars();

        let adjusted = adjust(&executor, series.clone(), "000001.SZ", "", "", AdjustMode::Backward)
            .await
            .unwrap();

        assert_eq!(adjusted, series);
        assert!(executor.memory().contains(Level::Warn, "unusable"));
    }

    #[tokio::test]
    async fn test_fetch_error_propagates() {
        let executor = MockExecutor::new().with_api_error("adj_factor", 40203, "没有接口访问权限");

        let err = adjust(&executor, sample_bars(), "000001.SZ", "", "", AdjustMode::Forward)
            .await
            .unwrap_err();

        assert_eq!(err.api_code(), Some(40203));
        assert!(matches!(err, TushareError::Api { .. }));
        assert!(executor.memory().contains(Level::Error, "adjustment factors"));
    }

    #[tokio::test]
    async fn test_empty_series_skips_fetch() {
        let executor = MockExecutor::new();
        let adjusted = adjust(&executor, Table::default(), "000001.SZ", "", "", AdjustMode::Forward)
            .await
            .unwrap();

        assert!(adjusted.is_empty());
        assert!(executor.calls().is_empty());
    }
}
