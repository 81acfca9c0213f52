use serde::{Deserialize, Serialize};

use crate::object;

/// One `format=jsonv2` place record.
///
/// Nominatim sends coordinates and bounding boxes as strings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NominatimLocation {
    pub place_id: Option<u64>,
    pub licence: Option<String>,
    pub osm_type: Option<String>,
    pub osm_id: Option<u64>,
    pub lat: Option<String>,
    pub lon: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub place_rank: Option<u32>,
    pub importance: Option<f64>,
    pub addresstype: Option<String>,
    pub name: Option<String>,
    pub display_name: Option<String>,
    #[serde(default, deserialize_with = "object::optional")]
    pub address: Option<NominatimAddress>,
    pub boundingbox: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NominatimAddress {
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
    pub country_code: Option<String>,
}

impl NominatimLocation {
    /// `(lat, lon)` when both are present and numeric.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        let lat = self.lat.as_deref()?.trim().parse().ok()?;
        let lon = self.lon.as_deref()?.trim().parse().ok()?;
        Some((lat, lon))
    }

    /// Most specific settlement name available.
    pub fn locality(&self) -> Option<&str> {
        let address = self.address.as_ref();
        address
            .and_then(|a| {
                a.city
                    .as_deref()
                    .or(a.town.as_deref())
                    .or(a.village.as_deref())
                    .or(a.municipality.as_deref())
            })
            .or(self.name.as_deref())
    }

    pub fn country(&self) -> Option<&str> {
        self.address.as_ref().and_then(|a| a.country.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinates_parse_from_strings() {
        let place = NominatimLocation {
            lat: Some("59.9133301".into()),
            lon: Some(" 10.7389701".into()),
            ..Default::default()
        };
        assert_eq!(place.coordinates(), Some((59.9133301, 10.7389701)));

        let broken = NominatimLocation {
            lat: Some("north".into()),
            lon: Some("10.7".into()),
            ..Default::default()
        };
        assert_eq!(broken.coordinates(), None);
        assert_eq!(NominatimLocation::default().coordinates(), None);
    }

    #[test]
    fn locality_prefers_city_then_smaller_places_then_name() {
        let mut place = NominatimLocation {
            name: Some("Oslo S".into()),
            address: Some(NominatimAddress {
                town: Some("Lillestrøm".into()),
                village: Some("Strømmen".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(place.locality(), Some("Lillestrøm"));

        place.address = Some(NominatimAddress {
            country: Some("Norge".into()),
            ..Default::default()
        });
        assert_eq!(place.locality(), Some("Oslo S"));
        assert_eq!(place.country(), Some("Norge"));
    }
}
