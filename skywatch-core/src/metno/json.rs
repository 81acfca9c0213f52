//! MET Norway Locationforecast 2.0 response types.
//!
//! Every field is optional: the provider omits measurements it does not have
//! for a given step, and a location may come back without `properties` at all.
//! Unknown fields are ignored. Nested records must be JSON objects; decode the
//! root with [`decode_forecast`](super::decode_forecast) so the root is held
//! to the same rule.
//!
//! See: https://api.met.no/weatherapi/locationforecast/2.0/documentation

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::object;

/// Root object of a location forecast.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastResult {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "object::optional")]
    pub geometry: Option<ForecastGeometry>,
    /// `None` means the provider returned no data for this location.
    #[serde(default, deserialize_with = "object::optional")]
    pub properties: Option<ForecastProperties>,
}

/// GeoJSON point: `[lon, lat, altitude]`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastGeometry {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub coordinates: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastProperties {
    #[serde(default, deserialize_with = "object::optional")]
    pub meta: Option<ForecastMeta>,
    #[serde(default, deserialize_with = "object::optional_list")]
    pub timeseries: Option<Vec<ForecastTimeseries>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastMeta {
    pub updated_at: Option<DateTime<Utc>>,
    /// Unit per measurement name, e.g. `air_temperature -> celsius`.
    pub units: Option<BTreeMap<String, String>>,
}

/// One time step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastTimeseries {
    pub time: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "object::optional")]
    pub data: Option<ForecastData>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastData {
    #[serde(default, deserialize_with = "object::optional")]
    pub instant: Option<ForecastDataInstant>,
    #[serde(default, deserialize_with = "object::optional")]
    pub next_1_hours: Option<ForecastDataNextHours>,
    #[serde(default, deserialize_with = "object::optional")]
    pub next_6_hours: Option<ForecastDataNextHours>,
    #[serde(default, deserialize_with = "object::optional")]
    pub next_12_hours: Option<ForecastDataNextHours>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastDataInstant {
    #[serde(default, deserialize_with = "object::optional")]
    pub details: Option<ForecastInstantDetails>,
}

/// Values valid at the exact time of the step.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastInstantDetails {
    pub air_pressure_at_sea_level: Option<f64>,
    pub air_temperature: Option<f64>,
    pub air_temperature_percentile_10: Option<f64>,
    pub air_temperature_percentile_90: Option<f64>,
    pub cloud_area_fraction: Option<f64>,
    pub cloud_area_fraction_high: Option<f64>,
    pub cloud_area_fraction_low: Option<f64>,
    pub cloud_area_fraction_medium: Option<f64>,
    pub dew_point_temperature: Option<f64>,
    pub fog_area_fraction: Option<f64>,
    pub relative_humidity: Option<f64>,
    pub ultraviolet_index_clear_sky: Option<f64>,
    pub wind_from_direction: Option<f64>,
    pub wind_speed: Option<f64>,
    pub wind_speed_of_gust: Option<f64>,
    pub wind_speed_percentile_10: Option<f64>,
    pub wind_speed_percentile_90: Option<f64>,
}

/// Near-term data for the period following a step.
///
/// `summary` and `details` are independent; either may be missing.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastDataNextHours {
    #[serde(default, deserialize_with = "object::optional")]
    pub summary: Option<ForecastDataSummary>,
    #[serde(default, deserialize_with = "object::optional")]
    pub details: Option<ForecastDataDetails>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastDataSummary {
    /// e.g. `clearsky_day`, `lightrain`, `heavysnowshowers_night`.
    pub symbol_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastDataDetails {
    pub air_temperature_max: Option<f64>,
    pub air_temperature_min: Option<f64>,
    pub precipitation_amount: Option<f64>,
    pub precipitation_amount_max: Option<f64>,
    pub precipitation_amount_min: Option<f64>,
    pub probability_of_precipitation: Option<f64>,
    pub probability_of_thunder: Option<f64>,
    pub ultraviolet_index_clear_sky_max: Option<f64>,
}
