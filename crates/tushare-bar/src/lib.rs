#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tushare/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Bar data on top of any [`QueryExecutor`](tushare_core::QueryExecutor).
//!
//! - [`BarClient`] - Routes a [`BarRequest`] to the right endpoint and
//!   post-processes the result
//! - [`adjust`](adjust::adjust) - Forward / backward price adjustment
//! - [`metrics`] - Moving averages, volume ratio, turnover rate
//!
//! # Example
//!
//! ```rust,ignore
//! use tushare_bar::{BarClient, BarRequest};
//! use tushare_core::{AdjustMode, Factor};
//! use tushare_http::TushareClient;
//!
//! let bars = BarClient::new(TushareClient::from_env()?);
//! let request = BarRequest::new("000001.SZ")
//!     .start_date("20240101")
//!     .end_date("20241231")
//!     .adjust(AdjustMode::Forward)
//!     .factor(Factor::VolumeRatio)
//!     .ma([5, 10, 20]);
//!
//! let table = bars.bar(&request).await?;
//! ```

/// Price adjustment.
pub mod adjust;
/// Bar requests and orchestration.
pub mod bar;
/// Derived metrics.
pub mod metrics;

#[cfg(test)]
mod testing;

pub use adjust::{FactorIndex, PRICE_FIELDS, apply_factors};
pub use bar::{BarClient, BarRequest};
pub use metrics::{add_factors, with_moving_averages, with_turnover_rate, with_volume_ratio};
