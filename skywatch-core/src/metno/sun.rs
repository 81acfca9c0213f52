//! MET Norway Sunrise 3.0 (`/sun`) response types.
//!
//! Times come as local time with offset and minute precision
//! (`2026-03-01T07:25+01:00`), so they are kept as strings; see
//! [`SunEvent::local_time`].

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use super::json::ForecastGeometry;
use crate::object;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SunResult {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "object::optional")]
    pub geometry: Option<ForecastGeometry>,
    #[serde(default, deserialize_with = "object::optional")]
    pub when: Option<SunInterval>,
    #[serde(default, deserialize_with = "object::optional")]
    pub properties: Option<SunProperties>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SunInterval {
    pub interval: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SunProperties {
    pub body: Option<String>,
    /// Absent during polar night and midnight sun.
    #[serde(default, deserialize_with = "object::optional")]
    pub sunrise: Option<SunEvent>,
    #[serde(default, deserialize_with = "object::optional")]
    pub sunset: Option<SunEvent>,
    #[serde(default, deserialize_with = "object::optional")]
    pub solarnoon: Option<SunElevation>,
    #[serde(default, deserialize_with = "object::optional")]
    pub solarmidnight: Option<SunElevation>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SunEvent {
    pub time: Option<String>,
    pub azimuth: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SunElevation {
    pub time: Option<String>,
    pub disc_centre_elevation: Option<f64>,
    pub visible: Option<bool>,
}

impl SunEvent {
    pub fn local_time(&self) -> Option<DateTime<FixedOffset>> {
        self.time.as_deref().and_then(parse_local_time)
    }
}

impl SunElevation {
    pub fn local_time(&self) -> Option<DateTime<FixedOffset>> {
        self.time.as_deref().and_then(parse_local_time)
    }
}

fn parse_local_time(s: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(s)
        .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M%:z"))
        .ok()
}
