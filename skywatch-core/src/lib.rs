//! Core library for the `skywatch` CLI.
//!
//! This crate defines:
//! - The MET Norway Locationforecast and Sunrise schemas and their client
//! - OpenStreetMap Nominatim place search
//! - [`MetNoService`], which combines both and can cancel what's in flight
//! - The WMO severe weather alert client
//! - Configuration of endpoints and the shared HTTP client
//!
//! Every remote call is a single GET; nothing here retries or caches.

pub mod config;
pub mod error;
mod http;
pub mod metno;
pub mod model;
pub mod nominatim;
mod object;
pub mod service;
pub mod source;
#[cfg(test)]
mod testing;
pub mod wmo;

pub use config::Config;
pub use error::SourceError;
pub use metno::{
    MetNoClient, SunRequest, decode_forecast, decode_sun, json::ForecastResult, sun::SunResult,
};
pub use model::{ForecastPeriod, ForecastRequest, ForecastStep};
pub use nominatim::{NominatimClient, NominatimLocation};
pub use service::{LocalWeather, MetNoService};
pub use source::{AlertSource, ForecastSource, SourceId};
pub use wmo::{SevereWeatherAlert, WmoSevereWeatherClient};
