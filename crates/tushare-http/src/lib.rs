#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/tushare/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! HTTP transport for the [Tushare Pro](https://tushare.pro) API.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tushare_core::{Params, QueryExecutor};
//! use tushare_http::TushareClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = TushareClient::from_env()?;
//!
//!     let params = Params::new()
//!         .with("ts_code", "000001.SZ")
//!         .with("start_date", "20240101");
//!     let daily = client.query("daily", params, &[]).await?;
//!
//!     println!("{}", daily.to_csv()?);
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod wire;

pub use client::{ClientBuilder, TushareClient};
pub use config::{
    API_URL_ENV, ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT, TIMEOUT_ENV, TOKEN_ENV,
};
