//! Core library for the `smhi` CLI.
//!
//! This crate defines:
//! - Fetching and parsing the SMHI parameter catalogue (Atom XML)
//! - Fetching latest-day air temperatures for every station and reducing
//!   them to the warmest and coldest station
//! - The [`HttpSource`] seam the network calls go through
//!
//! Failures never escape the public fetch operations: they are logged with
//! `tracing` and turn into "no data".

pub mod api;
pub mod catalogue;
pub mod config;
pub mod error;
pub mod model;
pub mod source;
pub mod temperature;

pub use api::SmhiApi;
pub use config::Config;
pub use error::FetchError;
pub use model::{Parameter, Station, StationReading, TemperatureExtremes};
pub use source::HttpSource;
