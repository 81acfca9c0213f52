//! MET Norway weather service: forecast + sun for a location, and place
//! lookup, with one switch to abandon everything in flight.

use std::{
    future::Future,
    sync::{Mutex, PoisonError},
};

use chrono::{FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::{
    error::SourceError,
    metno::{ForecastResult, MetNoClient, SunRequest, SunResult},
    model::ForecastRequest,
    nominatim::{NominatimClient, NominatimLocation},
};

/// Forecast and sun events fetched together for one location.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocalWeather {
    pub forecast: ForecastResult,
    pub sun: SunResult,
}

/// Every request method returns `None` when [`MetNoService::cancel`] was
/// called while it was in flight: no result and no error.
#[derive(Debug)]
pub struct MetNoService {
    metno: MetNoClient,
    nominatim: NominatimClient,
    cancel_token: Mutex<CancellationToken>,
}

impl MetNoService {
    pub fn new(metno: MetNoClient, nominatim: NominatimClient) -> Self {
        Self {
            metno,
            nominatim,
            cancel_token: Mutex::new(CancellationToken::new()),
        }
    }

    /// Abort all requests currently in flight. Requests started afterwards run
    /// normally.
    pub fn cancel(&self) {
        let mut token = self
            .cancel_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        token.cancel();
        *token = CancellationToken::new();
        tracing::debug!("cancelled in-flight requests");
    }

    fn current_token(&self) -> CancellationToken {
        self.cancel_token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    async fn cancellable<F: Future>(&self, fut: F) -> Option<F::Output> {
        let token = self.current_token();
        tokio::select! {
            biased;
            _ = token.cancelled() => None,
            out = fut => Some(out),
        }
    }

    /// Fetch the forecast and the day's sun events concurrently. Either
    /// failing fails the whole request.
    pub async fn request_weather(
        &self,
        request: &ForecastRequest,
        date: NaiveDate,
        offset: FixedOffset,
    ) -> Option<Result<LocalWeather, SourceError>> {
        let sun_request = SunRequest {
            lat: request.lat,
            lon: request.lon,
            date,
            offset,
        };

        self.cancellable(async {
            let (forecast, sun) = tokio::try_join!(
                self.metno.get_forecast(request),
                self.metno.get_sun(&sun_request)
            )?;
            Ok(LocalWeather { forecast, sun })
        })
        .await
    }

    pub async fn search_locations(
        &self,
        query: &str,
    ) -> Option<Result<Vec<NominatimLocation>, SourceError>> {
        self.cancellable(self.nominatim.search(query)).await
    }

    pub async fn locate(
        &self,
        lat: f64,
        lon: f64,
    ) -> Option<Result<Option<NominatimLocation>, SourceError>> {
        self.cancellable(self.nominatim.reverse(lat, lon)).await
    }
}
