//! OpenStreetMap Nominatim client: place search by name and by coordinates.
//!
//! Nominatim's usage policy also asks for an identifying `User-Agent`, so this
//! shares the configured [`Client`] with the MET Norway sources.

use reqwest::{Client, Url};
use serde_json::{Map, Value};

use crate::{
    error::SourceError,
    http::{get_body, join_segments, parse_base_url},
    object,
};

pub mod json;

pub use json::{NominatimAddress, NominatimLocation};

pub const DEFAULT_BASE_URL: &str = "https://nominatim.openstreetmap.org/";

/// Zoom level that makes reverse lookups resolve to a city or town.
const CITY_ZOOM: &str = "10";

#[derive(Debug, Clone)]
pub struct NominatimClient {
    base_url: Url,
    http: Client,
    language: Option<String>,
}

impl NominatimClient {
    pub fn new(base_url: &str, http: Client) -> Result<Self, SourceError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            http,
            language: None,
        })
    }

    /// Preferred result language, sent as `accept-language` (e.g. `nb`, `en`).
    pub fn with_language(mut self, language: Option<String>) -> Self {
        self.language = language.filter(|l| !l.trim().is_empty());
        self
    }

    pub fn search_url(&self, query: &str) -> Result<Url, SourceError> {
        let mut url = join_segments(&self.base_url, ["search"])?;
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("featureType", "city")
            .append_pair("addressdetails", "1")
            .append_pair("format", "jsonv2");
        self.append_language(&mut url);
        Ok(url)
    }

    pub fn reverse_url(&self, lat: f64, lon: f64) -> Result<Url, SourceError> {
        let mut url = join_segments(&self.base_url, ["reverse"])?;
        url.query_pairs_mut()
            .append_pair("lat", &lat.to_string())
            .append_pair("lon", &lon.to_string())
            .append_pair("zoom", CITY_ZOOM)
            .append_pair("addressdetails", "1")
            .append_pair("format", "jsonv2");
        self.append_language(&mut url);
        Ok(url)
    }

    fn append_language(&self, url: &mut Url) {
        if let Some(language) = &self.language {
            url.query_pairs_mut().append_pair("accept-language", language);
        }
    }

    /// Places matching `query`, best match first. No match is an empty list.
    pub async fn search(&self, query: &str) -> Result<Vec<NominatimLocation>, SourceError> {
        let url = self.search_url(query)?;
        let body = get_body(&self.http, &url).await?;
        let places = object::list_from_str(&body).map_err(|e| SourceError::decode(&url, e))?;

        tracing::debug!(query, count = places.len(), "nominatim search");
        Ok(places)
    }

    /// The place at a coordinate, or `None` when Nominatim can't geocode it.
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<Option<NominatimLocation>, SourceError> {
        let url = self.reverse_url(lat, lon)?;
        let body = get_body(&self.http, &url).await?;
        decode_reverse(&url, &body)
    }
}

/// Reverse lookups answer 200 with `{"error": "..."}` for open sea and the like.
fn decode_reverse(url: &Url, body: &str) -> Result<Option<NominatimLocation>, SourceError> {
    let map: Map<String, Value> =
        serde_json::from_str(body).map_err(|e| SourceError::decode(url, e))?;

    if let Some(reason) = map.get("error") {
        tracing::debug!(%url, %reason, "nominatim could not geocode");
        return Ok(None);
    }

    object::from_map(map)
        .map(Some)
        .map_err(|e| SourceError::decode(url, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{header, method, path, query_param},
    };

    fn client_for(server: &MockServer) -> NominatimClient {
        let http = Client::builder()
            .user_agent("skywatch-test/1.0")
            .build()
            .unwrap();
        NominatimClient::new(&server.uri(), http).unwrap()
    }

    fn oslo() -> serde_json::Value {
        json!({
            "place_id": 123,
            "osm_type": "relation",
            "osm_id": 406091,
            "lat": "59.9133301",
            "lon": "10.7389701",
            "category": "boundary",
            "type": "administrative",
            "name": "Oslo",
            "display_name": "Oslo, Norge",
            "address": { "city": "Oslo", "country": "Norge", "country_code": "no" },
            "boundingbox": ["59.8", "60.1", "10.4", "10.9"]
        })
    }

    #[test]
    fn search_url_has_expected_parameters() {
        let client = NominatimClient::new(DEFAULT_BASE_URL, Client::new())
            .unwrap()
            .with_language(Some("nb".into()));
        let url = client.search_url("São Paulo").unwrap();

        assert_eq!(url.path(), "/search");
        assert_eq!(
            url.query(),
            Some("q=S%C3%A3o+Paulo&featureType=city&addressdetails=1&format=jsonv2&accept-language=nb")
        );
    }

    #[test]
    fn blank_language_is_not_sent() {
        let client = NominatimClient::new(DEFAULT_BASE_URL, Client::new())
            .unwrap()
            .with_language(Some(" ".into()));
        let url = client.reverse_url(59.91, 10.75).unwrap();

        assert_eq!(url.path(), "/reverse");
        assert_eq!(
            url.query(),
            Some("lat=59.91&lon=10.75&zoom=10&addressdetails=1&format=jsonv2")
        );
    }

    #[tokio::test]
    async fn search_decodes_places_in_order() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", "oslo"))
            .and(header("user-agent", "skywatch-test/1.0"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([oslo(), { "name": "Oslo", "display_name": "Oslo, Minnesota" }])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let places = client_for(&server).search("oslo").await.unwrap();

        assert_eq!(places.len(), 2);
        assert_eq!(places[0].locality(), Some("Oslo"));
        assert_eq!(places[0].kind.as_deref(), Some("administrative"));
        assert_eq!(places[0].coordinates(), Some((59.9133301, 10.7389701)));
        assert_eq!(places[1].display_name.as_deref(), Some("Oslo, Minnesota"));
    }

    #[tokio::test]
    async fn search_without_matches_is_empty() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
            .mount(&server)
            .await;

        assert!(client_for(&server).search("nowhere").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn search_rejects_non_object_entries() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"[["Oslo", 59.9]]"#))
            .mount(&server)
            .await;

        let err = client_for(&server).search("oslo").await.unwrap_err();
        assert!(matches!(err, SourceError::Decode { .. }), "got {err:?}");
    }

    #[tokio::test]
    async fn search_rate_limit_is_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let err = client_for(&server).search("oslo").await.unwrap_err();
        assert!(
            err.is_http_status(reqwest::StatusCode::TOO_MANY_REQUESTS),
            "got {err:?}"
        );
    }

    #[tokio::test]
    async fn reverse_finds_place() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .and(query_param("lat", "59.91"))
            .and(query_param("zoom", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(oslo()))
            .expect(1)
            .mount(&server)
            .await;

        let place = client_for(&server)
            .reverse(59.91, 10.75)
            .await
            .unwrap()
            .expect("place");
        assert_eq!(place.country(), Some("Norge"));
    }

    #[tokio::test]
    async fn reverse_unable_to_geocode_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/reverse"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "error": "Unable to geocode" })),
            )
            .mount(&server)
            .await;

        let place = client_for(&server).reverse(0.0, -30.0).await.unwrap();
        assert_eq!(place, None);
    }

    #[tokio::test]
    async fn reverse_array_body_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([oslo()])))
            .mount(&server)
            .await;

        let err = client_for(&server).reverse(59.91, 10.75).await.unwrap_err();
        assert!(matches!(err, SourceError::Decode { .. }), "got {err:?}");
    }
}
