//! WMO Severe Weather Information Centre alert client.
//!
//! One operation: fetch the alerts currently published for a region.

use reqwest::{Client, Url};

use crate::{
    error::SourceError,
    http::{get_body, join_segments, parse_base_url},
    object,
};

pub mod json;

pub use json::SevereWeatherAlert;

pub const DEFAULT_BASE_URL: &str = "https://severeweather.wmo.int/";

/// Build `{base}/v2/json/{region}.json`.
///
/// `region` is not validated; it becomes a single escaped path segment.
pub fn alerts_url(base_url: &Url, region: &str) -> Result<Url, SourceError> {
    let file = format!("{region}.json");
    join_segments(base_url, ["v2", "json", file.as_str()])
}

/// Decode an alert array body. Anything other than a JSON array of alert
/// objects is a [`SourceError::Decode`].
pub fn decode_alerts(url: &Url, body: &str) -> Result<Vec<SevereWeatherAlert>, SourceError> {
    object::list_from_str(body).map_err(|e| SourceError::decode(url, e))
}

#[derive(Debug, Clone)]
pub struct WmoSevereWeatherClient {
    base_url: Url,
    http: Client,
}

impl WmoSevereWeatherClient {
    pub fn new(base_url: &str, http: Client) -> Result<Self, SourceError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            http,
        })
    }

    pub fn alerts_url(&self, region: &str) -> Result<Url, SourceError> {
        alerts_url(&self.base_url, region)
    }

    /// Fetch the alerts for `region`, in provider order.
    ///
    /// Nothing is sent until the future is polled, and each call issues exactly
    /// one GET. Dropping the future aborts the in-flight request.
    pub async fn get_alerts_by_region(
        &self,
        region: &str,
    ) -> Result<Vec<SevereWeatherAlert>, SourceError> {
        let url = self.alerts_url(region)?;
        let body = get_body(&self.http, &url).await?;
        let alerts = decode_alerts(&url, &body)?;

        tracing::debug!(region, count = alerts.len(), "decoded alerts");
        Ok(alerts)
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use super::*;
    use crate::testing::SignalOnArrival;
    use serde_json::json;
    use tokio::sync::Notify;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path},
    };

    fn client_for(server: &MockServer) -> WmoSevereWeatherClient {
        WmoSevereWeatherClient::new(&server.uri(), Client::new()).unwrap()
    }

    #[test]
    fn alerts_url_substitutes_region() {
        let base = Url::parse(DEFAULT_BASE_URL).unwrap();
        let url = alerts_url(&base, "europe").unwrap();
        assert_eq!(url.as_str(), "https://severeweather.wmo.int/v2/json/europe.json");
    }

    #[test]
    fn alerts_url_escapes_region_into_one_segment() {
        let base = Url::parse(DEFAULT_BASE_URL).unwrap();
        let url = alerts_url(&base, "north america/east").unwrap();
        assert_eq!(url.path(), "/v2/json/north%20america%2Feast.json");
    }

    #[test]
    fn alert_title_prefers_headline() {
        let alert = SevereWeatherAlert {
            event: Some("Gale".into()),
            headline: Some("Gale warning for the coast".into()),
            ..Default::default()
        };
        assert_eq!(alert.title(), Some("Gale warning for the coast"));

        let alert = SevereWeatherAlert {
            event: Some("Gale".into()),
            ..Default::default()
        };
        assert_eq!(alert.title(), Some("Gale"));
        assert_eq!(SevereWeatherAlert::default().title(), None);
    }

    #[tokio::test]
    async fn issues_one_get_for_region() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/json/europe.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "urn:oid:2.49.0.1.578.0.2026.1",
                    "event": "Gale",
                    "headline": "Gale warning",
                    "areaDesc": "Skagerrak",
                    "severity": "Moderate",
                    "capURL": "https://example.org/cap/1.xml",
                    "unknownField": true
                },
                { "id": "second", "event": "Flood" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let alerts = client_for(&server)
            .get_alerts_by_region("europe")
            .await
            .unwrap();

        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].headline.as_deref(), Some("Gale warning"));
        assert_eq!(alerts[0].area_desc.as_deref(), Some("Skagerrak"));
        assert_eq!(
            alerts[0].cap_url.as_deref(),
            Some("https://example.org/cap/1.xml")
        );
        assert_eq!(alerts[1].id.as_deref(), Some("second"));
        assert_eq!(alerts[1].severity, None);

        server.verify().await;
    }

    #[tokio::test]
    async fn empty_array_yields_no_alerts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/json/asia.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        let alerts = client_for(&server)
            .get_alerts_by_region("asia")
            .await
            .unwrap();
        assert!(alerts.is_empty());
    }

    #[tokio::test]
    async fn not_found_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("no such region"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_alerts_by_region("atlantis")
            .await
            .unwrap_err();

        match err {
            SourceError::Http { status, body, url } => {
                assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
                assert_eq!(body, "no such region");
                assert!(url.ends_with("/v2/json/atlantis.json"));
            }
            other => panic!("expected Http error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[{\"id\": "))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_alerts_by_region("europe")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Decode { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn object_instead_of_array_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "alerts": [] })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_alerts_by_region("europe")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Decode { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn alert_given_as_array_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "id": "ok" }, ["id", "event", "headline"]])),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_alerts_by_region("europe")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Decode { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        // Nothing listens on port 1.
        let client = WmoSevereWeatherClient::new("http://127.0.0.1:1/", Client::new()).unwrap();

        let err = client.get_alerts_by_region("europe").await.unwrap_err();
        assert!(matches!(err, SourceError::Network { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn dropping_the_call_discards_the_response() {
        let server = MockServer::start().await;
        let arrived = Arc::new(Notify::new());
        Mock::given(method("GET"))
            .and(path("/v2/json/europe.json"))
            .respond_with(SignalOnArrival {
                arrived: arrived.clone(),
                template: ResponseTemplate::new(200)
                    .set_body_json(json!([{ "id": "late" }]))
                    .set_delay(Duration::from_secs(30)),
            })
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server);
        // Once the server has the request, the call is dropped unfinished.
        let outcome = tokio::select! {
            res = client.get_alerts_by_region("europe") => Some(res),
            _ = arrived.notified() => None,
        };

        assert!(outcome.is_none(), "call completed: {outcome:?}");
        server.verify().await;
    }

    #[tokio::test]
    async fn nothing_is_sent_until_polled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server);
        let pending = client.get_alerts_by_region("europe");
        drop(pending);

        server.verify().await;
    }
}
