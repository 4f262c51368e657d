#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tushare/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types for the Tushare Pro client.
//!
//! - [`Table`] - Columns plus ordered rows, the result of every query
//! - [`Scalar`] - Dynamically typed cell value
//! - [`Params`] / [`RequestEnvelope`] - Request parameters and wire body
//! - [`Endpoint`] - Static catalogue of supported endpoints
//! - [`QueryExecutor`] - Seam between transport and post-processing
//! - [`LogSink`] - Injectable diagnostics

/// Endpoint catalogue and parameter validation.
pub mod endpoint;
/// Error types for Tushare operations.
pub mod error;
/// The query executor trait.
pub mod executor;
/// Bar frequency, asset class, adjustment and factor selectors.
pub mod frequency;
/// Injectable log sinks.
pub mod log;
/// Request parameters and envelope.
pub mod params;
/// Tabular query results.
pub mod table;
/// Dynamically typed cell values.
pub mod value;

#[cfg(feature = "polars")]
mod frame;

pub use endpoint::{Endpoint, EndpointSpec};
pub use error::{Result, TransportStage, TushareError};
pub use executor::QueryExecutor;
pub use frequency::{AdjustMode, AssetClass, Factor, Freq};
pub use log::{Level, LogEntry, LogSink, MemorySink, NoopSink, SharedSink, TracingSink, WriterSink};
pub use params::{DATE_FORMAT, Params, RequestEnvelope};
pub use table::{Row, Table};
pub use value::Scalar;
