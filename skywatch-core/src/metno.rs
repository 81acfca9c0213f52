//! MET Norway client: Locationforecast 2.0 and Sunrise 3.0.
//!
//! MET Norway rejects requests without an identifying `User-Agent`; the
//! injected [`Client`] is expected to carry one (see [`Config::http_client`]).
//!
//! [`Config::http_client`]: crate::Config::http_client

use chrono::{FixedOffset, NaiveDate};
use reqwest::{Client, Url};

use crate::{
    error::SourceError,
    http::{get_body, join_segments, parse_base_url},
    model::ForecastRequest,
    object,
};

pub mod json;
pub mod sun;

pub use json::ForecastResult;
pub use sun::SunResult;

pub const DEFAULT_BASE_URL: &str = "https://api.met.no/";

const FORECAST_PATH: [&str; 4] = ["weatherapi", "locationforecast", "2.0", "compact"];
const SUN_PATH: [&str; 4] = ["weatherapi", "sunrise", "3.0", "sun"];

/// Decode a Locationforecast document.
///
/// Missing fields and unknown fields are accepted. A present field with the
/// wrong JSON type, including an array where an object belongs, yields
/// [`SourceError::Schema`]; input that is not JSON at all yields
/// [`SourceError::Decode`].
pub fn decode_forecast(json: &str) -> Result<ForecastResult, SourceError> {
    object::from_str(json).map_err(|e| SourceError::from_schema_json(None, e))
}

/// Decode a Sunrise 3.0 `/sun` document, with the same rules as
/// [`decode_forecast`].
pub fn decode_sun(json: &str) -> Result<SunResult, SourceError> {
    object::from_str(json).map_err(|e| SourceError::from_schema_json(None, e))
}

/// Sun events for one local day at a location.
#[derive(Debug, Clone, PartialEq)]
pub struct SunRequest {
    pub lat: f64,
    pub lon: f64,
    pub date: NaiveDate,
    /// UTC offset the returned times are expressed in.
    pub offset: FixedOffset,
}

#[derive(Debug, Clone)]
pub struct MetNoClient {
    base_url: Url,
    http: Client,
}

impl MetNoClient {
    pub fn new(base_url: &str, http: Client) -> Result<Self, SourceError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            http,
        })
    }

    /// Coordinates are rounded to 4 decimals, as the MET Norway terms of
    /// service require.
    pub fn forecast_url(&self, request: &ForecastRequest) -> Result<Url, SourceError> {
        let mut url = join_segments(&self.base_url, FORECAST_PATH)?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("lat", &format!("{:.4}", request.lat))
                .append_pair("lon", &format!("{:.4}", request.lon));
            if let Some(altitude) = request.altitude {
                query.append_pair("altitude", &altitude.to_string());
            }
        }
        Ok(url)
    }

    pub fn sun_url(&self, request: &SunRequest) -> Result<Url, SourceError> {
        let mut url = join_segments(&self.base_url, SUN_PATH)?;
        url.query_pairs_mut()
            .append_pair("lat", &format!("{:.4}", request.lat))
            .append_pair("lon", &format!("{:.4}", request.lon))
            .append_pair("date", &request.date.format("%Y-%m-%d").to_string())
            .append_pair("offset", &format_offset(request.offset));
        Ok(url)
    }

    pub async fn get_forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<ForecastResult, SourceError> {
        let url = self.forecast_url(request)?;
        let body = get_body(&self.http, &url).await?;

        object::from_str(&body).map_err(|e| SourceError::from_schema_json(Some(&url), e))
    }

    pub async fn get_sun(&self, request: &SunRequest) -> Result<SunResult, SourceError> {
        let url = self.sun_url(request)?;
        let body = get_body(&self.http, &url).await?;

        object::from_str(&body).map_err(|e| SourceError::from_schema_json(Some(&url), e))
    }
}

/// `+HH:MM` / `-HH:MM`, the form the Sunrise API expects.
pub fn format_offset(offset: FixedOffset) -> String {
    let secs = offset.local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let minutes = secs.unsigned_abs() / 60;
    format!("{sign}{:02}:{:02}", minutes / 60, minutes % 60)
}
