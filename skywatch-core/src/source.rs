use crate::{
    Config, ForecastRequest,
    error::SourceError,
    metno::{ForecastResult, MetNoClient},
    nominatim::NominatimClient,
    service::MetNoService,
    wmo::{SevereWeatherAlert, WmoSevereWeatherClient},
};
use async_trait::async_trait;
use std::{fmt::Debug, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceId {
    MetNo,
    Nominatim,
    WmoSevereWeather,
}

impl SourceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceId::MetNo => "metno",
            SourceId::Nominatim => "nominatim",
            SourceId::WmoSevereWeather => "wmo",
        }
    }

    pub const fn all() -> &'static [SourceId] {
        &[SourceId::MetNo, SourceId::Nominatim, SourceId::WmoSevereWeather]
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown source '{0}' (expected one of: metno, nominatim, wmo)")]
pub struct UnknownSource(pub String);

impl FromStr for SourceId {
    type Err = UnknownSource;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SourceId::all()
            .iter()
            .copied()
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownSource(s.to_string()))
    }
}

/// Something that can produce a location forecast.
#[async_trait]
pub trait ForecastSource: Send + Sync + Debug {
    async fn get_forecast(&self, request: &ForecastRequest)
    -> Result<ForecastResult, SourceError>;
}

/// Something that can list the severe weather alerts for a region.
#[async_trait]
pub trait AlertSource: Send + Sync + Debug {
    async fn get_alerts_by_region(
        &self,
        region: &str,
    ) -> Result<Vec<SevereWeatherAlert>, SourceError>;
}

#[async_trait]
impl ForecastSource for MetNoClient {
    async fn get_forecast(
        &self,
        request: &ForecastRequest,
    ) -> Result<ForecastResult, SourceError> {
        MetNoClient::get_forecast(self, request).await
    }
}

#[async_trait]
impl AlertSource for WmoSevereWeatherClient {
    async fn get_alerts_by_region(
        &self,
        region: &str,
    ) -> Result<Vec<SevereWeatherAlert>, SourceError> {
        WmoSevereWeatherClient::get_alerts_by_region(self, region).await
    }
}

fn configure_hint(id: SourceId, err: SourceError) -> anyhow::Error {
    anyhow::anyhow!(
        "{err}.\n\
         Hint: run `skywatch configure {id}` and enter a valid URL."
    )
}

/// Construct the forecast source described by `config`.
pub fn forecast_source_from_config(config: &Config) -> anyhow::Result<Box<dyn ForecastSource>> {
    let http = config.http_client()?;
    let client = MetNoClient::new(config.base_url(SourceId::MetNo), http)
        .map_err(|e| configure_hint(SourceId::MetNo, e))?;

    Ok(Box::new(client))
}

/// Construct the alert source described by `config`.
pub fn alert_source_from_config(config: &Config) -> anyhow::Result<Box<dyn AlertSource>> {
    let http = config.http_client()?;
    let client = WmoSevereWeatherClient::new(config.base_url(SourceId::WmoSevereWeather), http)
        .map_err(|e| configure_hint(SourceId::WmoSevereWeather, e))?;

    Ok(Box::new(client))
}

/// Construct the MET Norway service (forecast, sun, place search) described
/// by `config`. Both clients share one HTTP client.
pub fn metno_service_from_config(config: &Config) -> anyhow::Result<MetNoService> {
    let http = config.http_client()?;
    let metno = MetNoClient::new(config.base_url(SourceId::MetNo), http.clone())
        .map_err(|e| configure_hint(SourceId::MetNo, e))?;
    let nominatim = NominatimClient::new(config.base_url(SourceId::Nominatim), http)
        .map_err(|e| configure_hint(SourceId::Nominatim, e))?
        .with_language(config.nominatim.language.clone());

    Ok(MetNoService::new(metno, nominatim))
}
