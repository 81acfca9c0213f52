use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metno::json::{ForecastDataNextHours, ForecastResult, ForecastTimeseries};

#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRequest {
    pub lat: f64,
    pub lon: f64,
    /// Metres above sea level; MET Norway falls back to its own terrain model
    /// when absent.
    pub altitude: Option<i32>,
}

impl ForecastRequest {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self {
            lat,
            lon,
            altitude: None,
        }
    }

    pub fn with_altitude(mut self, altitude: i32) -> Self {
        self.altitude = Some(altitude);
        self
    }
}

/// Which following period a step's summary and precipitation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastPeriod {
    NextHour,
    NextSixHours,
    NextTwelveHours,
}

impl ForecastPeriod {
    pub fn hours(self) -> u8 {
        match self {
            ForecastPeriod::NextHour => 1,
            ForecastPeriod::NextSixHours => 6,
            ForecastPeriod::NextTwelveHours => 12,
        }
    }
}

/// Flat view of one forecast step. Measurements the provider left out stay
/// `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForecastStep {
    pub time: Option<DateTime<Utc>>,
    pub temperature_c: Option<f64>,
    pub wind_speed_mps: Option<f64>,
    pub wind_from_direction_deg: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub symbol_code: Option<String>,
    pub precipitation_mm: Option<f64>,
    pub period: Option<ForecastPeriod>,
}

impl ForecastResult {
    /// One [`ForecastStep`] per timeseries entry, in provider order.
    ///
    /// Empty when the provider sent no `properties` or no `timeseries`.
    pub fn steps(&self) -> Vec<ForecastStep> {
        self.properties
            .as_ref()
            .and_then(|p| p.timeseries.as_ref())
            .map(|series| series.iter().map(ForecastStep::from).collect())
            .unwrap_or_default()
    }
}

impl From<&ForecastTimeseries> for ForecastStep {
    fn from(entry: &ForecastTimeseries) -> Self {
        let Some(data) = entry.data.as_ref() else {
            return ForecastStep {
                time: entry.time,
                ..Default::default()
            };
        };

        let instant = data.instant.as_ref().and_then(|i| i.details.as_ref());

        // Shortest period that actually carries something; MET Norway drops
        // next_1_hours further out in the forecast.
        let periods = [
            (ForecastPeriod::NextHour, data.next_1_hours.as_ref()),
            (ForecastPeriod::NextSixHours, data.next_6_hours.as_ref()),
            (ForecastPeriod::NextTwelveHours, data.next_12_hours.as_ref()),
        ];
        let chosen = periods
            .into_iter()
            .find_map(|(period, next)| next.filter(|n| has_content(n)).map(|n| (period, n)));

        let symbol_code = chosen
            .and_then(|(_, n)| n.summary.as_ref())
            .and_then(|s| s.symbol_code.clone());
        let precipitation_mm = chosen
            .and_then(|(_, n)| n.details.as_ref())
            .and_then(|d| d.precipitation_amount);

        ForecastStep {
            time: entry.time,
            temperature_c: instant.and_then(|d| d.air_temperature),
            wind_speed_mps: instant.and_then(|d| d.wind_speed),
            wind_from_direction_deg: instant.and_then(|d| d.wind_from_direction),
            humidity_pct: instant.and_then(|d| d.relative_humidity),
            symbol_code,
            precipitation_mm,
            period: chosen.map(|(period, _)| period),
        }
    }
}

fn has_content(next: &ForecastDataNextHours) -> bool {
    next.summary.is_some() || next.details.is_some()
}
