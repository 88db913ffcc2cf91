//! # chspeedscope
//!
//! A small HTTP proxy that turns ClickHouse query profiles into flame graphs.
//!
//! ClickHouse samples running queries into `system.trace_log`. This tool runs
//! one grouping query over those samples, collapses each distinct call stack
//! into the `frame;frame;frame count` text format, and serves the result over
//! a CORS-enabled `GET /query` endpoint so that speedscope.app can fetch it
//! directly from the browser.
//!
//! ## Usage
//!
//! ```bash
//! chspeedscope --ch-host db.internal --ch-port 8123 --proxy-port 8080
//! chspeedscope --query-id 3f2a...   # print a ready-to-open speedscope URL
//! ```
//!
//! ## Modules
//!
//! - `clickhouse` - Trace store abstraction and the ClickHouse HTTP client
//! - `collapse` - Collapsed-stack text formatting
//! - `config` - ClickHouse and proxy endpoint configuration
//! - `server` - The axum proxy server and its single route
//! - `speedscope` - speedscope.app URL construction

pub mod clickhouse;
pub mod collapse;
pub mod config;
pub mod error;
pub mod server;
pub mod speedscope;

pub use error::{Error, Result};
