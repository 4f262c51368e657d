//! In-memory executor for tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tushare_core::{
    MemorySink, Params, QueryExecutor, Result, Row, Scalar, SharedSink, Table, TushareError,
};

#[derive(Debug, Clone)]
enum Canned {
    Table(Table),
    ApiError(i64, String),
}

/// Answers queries from canned tables and records every call.
#[derive(Debug, Default)]
pub(crate) struct MockExecutor {
    responses: HashMap<String, Canned>,
    calls: Mutex<Vec<(String, Params)>>,
    sink: Arc<MemorySink>,
}

impl MockExecutor {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_table(mut self, api_name: &str, table: Table) -> Self {
        self.responses
            .insert(api_name.to_string(), Canned::Table(table));
        self
    }

    pub(crate) fn with_api_error(mut self, api_name: &str, code: i64, message: &str) -> Self {
        self.responses.insert(
            api_name.to_string(),
            Canned::ApiError(code, message.to_string()),
        );
        self
    }

    pub(crate) fn calls(&self) -> Vec<(String, Params)> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn api_names(&self) -> Vec<String> {
        self.calls().into_iter().map(|(name, _)| name).collect()
    }

    pub(crate) fn memory(&self) -> &MemorySink {
        &self.sink
    }
}

#[async_trait]
impl QueryExecutor for MockExecutor {
    async fn query(&self, api_name: &str, params: Params, _fields: &[String]) -> Result<Table> {
        self.calls
            .lock()
            .unwrap()
            .push((api_name.to_string(), params));

        match self.responses.get(api_name) {
            Some(Canned::Table(table)) => Ok(table.clone()),
            Some(Canned::ApiError(code, message)) => Err(TushareError::Api {
                code: *code,
                message: message.clone(),
            }),
            None => Err(TushareError::InvalidParameter(format!(
                "no canned response for {api_name}"
            ))),
        }
    }

    fn log_sink(&self) -> SharedSink {
        self.sink.clone()
    }
}

/// Builds a table from a column list and rows of cells.
pub(crate) fn table(columns: &[&str], rows: Vec<Vec<Scalar>>) -> Table {
    Table::from_items(columns.iter().map(|c| c.to_string()).collect(), rows)
}

/// Bars with identical OHLC prices equal to `close`.
pub(crate) fn bars(rows: &[(&str, f64, f64)]) -> Table {
    let columns = [
        "ts_code",
        "trade_date",
        "open",
        "high",
        "low",
        "close",
        "pre_close",
        "vol",
    ];
    let mut out = Table::new(columns.iter().map(|c| c.to_string()).collect(), Vec::new());
    for (date, close, vol) in rows {
        let mut row = Row::new();
        row.insert("ts_code".into(), Scalar::from("000001.SZ"));
        row.insert("trade_date".into(), Scalar::from(*date));
        for field in ["open", "high", "low", "close", "pre_close"] {
            row.insert(field.into(), Scalar::Float(*close));
        }
        row.insert("vol".into(), Scalar::Float(*vol));
        out.push_row(row);
    }
    out
}

/// Adjustment factor table.
pub(crate) fn factors(rows: &[(&str, Scalar)]) -> Table {
    table(
        &["ts_code", "trade_date", "adj_factor"],
        rows.iter()
            .map(|(date, factor)| {
                vec![
                    Scalar::from("000001.SZ"),
                    Scalar::from(*date),
                    factor.clone(),
                ]
            })
            .collect(),
    )
}

/// Returns `field` of every row as a float, `NaN` where absent or non-numeric.
pub(crate) fn floats(table: &Table, field: &str) -> Vec<f64> {
    table
        .column(field)
        .into_iter()
        .map(|v| v.and_then(Scalar::as_f64).unwrap_or(f64::NAN))
        .collect()
}
