use crate::{core::geo::LatLng, services::ServiceClient, MapError, Result};
use serde::{Deserialize, Serialize};

/// A named place returned by a Nominatim search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub lat: f64,
    pub lng: f64,
    pub display_name: String,
}

impl Place {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// Nominatim returns coordinates as strings
#[derive(Debug, Deserialize)]
struct NominatimHit {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimHit {
    fn into_place(self) -> Option<Place> {
        match (self.lat.trim().parse::<f64>(), self.lon.trim().parse::<f64>()) {
            (Ok(lat), Ok(lng)) if lat.is_finite() && lng.is_finite() => Some(Place {
                lat,
                lng,
                display_name: self.display_name,
            }),
            _ => {
                log::warn!(
                    "skipping '{}' with unreadable coordinates ({}, {})",
                    self.display_name,
                    self.lat,
                    self.lon
                );
                None
            }
        }
    }
}

/// Query parameters for a free-text search
pub fn search_params(query: &str) -> Vec<(&'static str, String)> {
    vec![("format", "json".to_string()), ("q", query.to_string())]
}

/// Parses a Nominatim search response, in result order
pub fn parse_places(body: &str) -> Result<Vec<Place>> {
    let hits: Vec<NominatimHit> = serde_json::from_str(body)?;
    Ok(hits.into_iter().filter_map(NominatimHit::into_place).collect())
}

impl ServiceClient {
    /// Resolves an address to the first matching place
    pub async fn geocode(&self, address: &str) -> Result<Place> {
        let address = address.trim();
        if address.is_empty() {
            return Err(MapError::NotFound("empty address".to_string()));
        }

        let body = self
            .get_text(&self.endpoints().nominatim, &search_params(address))
            .await?;
        let place = parse_places(&body)?
            .into_iter()
            .next()
            .ok_or_else(|| MapError::NotFound(address.to_string()))?;
        log::info!("geocoded '{}' -> {}", address, place.display_name);
        Ok(place)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_places() {
        let body = r#"[
            {"place_id": 1, "lat": "33.7490", "lon": "-84.3880", "display_name": "Atlanta, Georgia"},
            {"place_id": 2, "lat": "34.0", "lon": "-84.0", "display_name": "Elsewhere"}
        ]"#;
        let places = parse_places(body).expect("valid body");
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].display_name, "Atlanta, Georgia");
        assert_eq!(places[0].position(), LatLng::new(33.749, -84.388));
    }

    #[test]
    fn test_unreadable_coordinates_skipped() {
        let body = r#"[{"lat": "north", "lon": "-84.0", "display_name": "Bad"}]"#;
        assert!(parse_places(body).expect("valid body").is_empty());
    }

    #[test]
    fn test_empty_response() {
        assert!(parse_places("[]").expect("valid body").is_empty());
        assert!(matches!(parse_places("{}"), Err(MapError::Serialization(_))));
    }

    #[test]
    fn test_search_params() {
        let params = search_params("123 Main St");
        assert!(params.contains(&("format", "json".to_string())));
        assert!(params.contains(&("q", "123 Main St".to_string())));
    }

    #[tokio::test]
    async fn test_blank_address_not_sent() {
        let client = ServiceClient::default();
        let result = client.geocode("   ").await;
        assert!(matches!(result, Err(MapError::NotFound(_))));
    }
}
