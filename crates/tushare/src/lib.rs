#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tushare/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Typed async client for the [Tushare Pro](https://tushare.pro) financial data API.
//!
//! This crate re-exports the core types, the HTTP client and the bar pipeline,
//! and adds [`EndpointApi`], a typed call path over the endpoint catalogue.
//!
//! # Features
//!
//! - `http` - reqwest-based [`TushareClient`]
//! - `bar` - [`BarClient`] with price adjustment and derived metrics
//! - `polars` - `Table::to_polars`
//!
//! # Example
//!
//! ```rust,ignore
//! use tushare::{AdjustMode, BarClient, BarRequest, EndpointApi, TushareClient};
//!
//! #[tokio::main]
//! async fn main() -> tushare::Result<()> {
//!     let client = TushareClient::from_env()?;
//!
//!     let stocks = client.list_stocks().await?;
//!     println!("{} listed securities", stocks.len());
//!
//!     let bars = BarClient::new(client);
//!     let request = BarRequest::new("000001.SZ")
//!         .start_date("20240101")
//!         .end_date("20241231")
//!         .adjust(AdjustMode::Forward)
//!         .ma([5, 20]);
//!     println!("{}", bars.bar(&request).await?.to_csv()?);
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use tushare_core::*;

// Transport
#[cfg(feature = "http")]
pub use tushare_http::{ClientBuilder, ClientConfig, TushareClient};

// Bar pipeline
#[cfg(feature = "bar")]
pub use tushare_bar::{BarClient, BarRequest, FactorIndex};
#[cfg(feature = "bar")]
pub use tushare_bar::{adjust, metrics};

mod api;
pub use api::{EndpointApi, common_fields};
