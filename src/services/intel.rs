//! Site intel for tree work: power lines and structures near the job.
//!
//! Features come from an Overpass query and are ranked by great-circle
//! distance from the job site.

use crate::{
    core::geo::LatLng,
    services::{geocode::Place, ServiceClient},
    Result,
};
use ::geo::HaversineDistance;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Search radius used when the caller has no preference
pub const DEFAULT_INTEL_RADIUS_METERS: f64 = 200.0;

/// Search radius for a report on a geocoded job address
pub const ADDRESS_INTEL_RADIUS_METERS: f64 = 250.0;

/// Store categories gathered with an address report
pub const INTEL_STORE_QUERIES: [&str; 3] = ["chainsaw", "rope", "tree service equipment"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntelKind {
    Powerline,
    Structure,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntelFeature {
    pub kind: IntelKind,
    pub distance_meters: f64,
    pub tags: BTreeMap<String, String>,
}

/// Power lines and structures, each nearest first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteIntel {
    pub powerlines: Vec<IntelFeature>,
    pub structures: Vec<IntelFeature>,
}

impl SiteIntel {
    pub fn is_empty(&self) -> bool {
        self.powerlines.is_empty() && self.structures.is_empty()
    }

    pub fn nearest_powerline(&self) -> Option<&IntelFeature> {
        self.powerlines.first()
    }
}

/// Everything gathered for one job address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressIntel {
    pub place: Place,
    pub site: SiteIntel,
    /// Nearby stores keyed by search query
    pub stores: BTreeMap<String, Vec<Place>>,
}

impl AddressIntel {
    /// Every store found, query by query
    pub fn all_stores(&self) -> impl Iterator<Item = &Place> {
        self.stores.values().flatten()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

#[derive(Debug, Deserialize)]
pub struct OverpassElement {
    pub center: Option<OverpassCenter>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct OverpassCenter {
    pub lat: f64,
    pub lon: f64,
}

/// Overpass QL for power lines and buildings within `radius_meters`
pub fn overpass_query(center: LatLng, radius_meters: f64) -> String {
    let around = format!("around:{},{},{}", radius_meters, center.lat, center.lng);
    format!(
        "[out:json];\n(\n  way({around})[\"power\"=\"line\"];\n  way({around})[\"building\"];\n);\nout center;\n",
        around = around
    )
}

fn distance_meters(from: LatLng, to: LatLng) -> f64 {
    let from = ::geo::Point::new(from.lng, from.lat);
    let to = ::geo::Point::new(to.lng, to.lat);
    from.haversine_distance(&to)
}

/// Sorts elements into power lines and structures by distance from `center`.
///
/// Elements without a center point are skipped. An element tagged as both a
/// power line and a building counts as a power line.
pub fn parse_intel(response: OverpassResponse, center: LatLng) -> SiteIntel {
    let mut intel = SiteIntel::default();

    for element in response.elements {
        let Some(point) = element.center else {
            continue;
        };
        let kind = if element.tags.get("power").map(String::as_str) == Some("line") {
            IntelKind::Powerline
        } else if element.tags.contains_key("building") {
            IntelKind::Structure
        } else {
            continue;
        };

        let feature = IntelFeature {
            kind,
            distance_meters: distance_meters(center, LatLng::new(point.lat, point.lon)),
            tags: element.tags,
        };
        match kind {
            IntelKind::Powerline => intel.powerlines.push(feature),
            IntelKind::Structure => intel.structures.push(feature),
        }
    }

    intel
        .powerlines
        .sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    intel
        .structures
        .sort_by(|a, b| a.distance_meters.total_cmp(&b.distance_meters));
    intel
}

pub fn parse_intel_json(body: &str, center: LatLng) -> Result<SiteIntel> {
    let response: OverpassResponse = serde_json::from_str(body)?;
    Ok(parse_intel(response, center))
}

impl ServiceClient {
    /// Power lines and buildings within `radius_meters` of `center`
    pub async fn site_intel(&self, center: LatLng, radius_meters: f64) -> Result<SiteIntel> {
        let query = overpass_query(center, radius_meters);
        let body = self.post_text(&self.endpoints().overpass, query).await?;
        let intel = parse_intel_json(&body, center)?;
        log::info!(
            "site intel at {:?}: {} powerlines, {} structures",
            center,
            intel.powerlines.len(),
            intel.structures.len()
        );
        Ok(intel)
    }

    /// Geocodes `address`, then gathers site intel and the stores for each of
    /// [`INTEL_STORE_QUERIES`] around it
    pub async fn address_intel(&self, address: &str) -> Result<AddressIntel> {
        let place = self.geocode(address).await?;
        let center = place.position();
        let site = self.site_intel(center, ADDRESS_INTEL_RADIUS_METERS).await?;

        let lookups = INTEL_STORE_QUERIES
            .iter()
            .map(|query| self.nearby_stores(center, query));
        let found = futures::future::try_join_all(lookups).await?;
        let stores = INTEL_STORE_QUERIES
            .iter()
            .map(|query| query.to_string())
            .zip(found)
            .collect();

        Ok(AddressIntel { place, site, stores })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"{
        "version": 0.6,
        "elements": [
            {"type": "way", "id": 1, "center": {"lat": 33.7510, "lon": -84.3880},
             "tags": {"building": "house"}},
            {"type": "way", "id": 2, "center": {"lat": 33.7495, "lon": -84.3880},
             "tags": {"power": "line", "voltage": "115000"}},
            {"type": "way", "id": 3, "center": {"lat": 33.7492, "lon": -84.3880},
             "tags": {"building": "garage"}},
            {"type": "way", "id": 4, "tags": {"building": "shed"}},
            {"type": "way", "id": 5, "center": {"lat": 33.7491, "lon": -84.3880},
             "tags": {"highway": "residential"}}
        ]
    }"#;

    #[test]
    fn test_parse_intel_sorted_by_distance() {
        let center = LatLng::new(33.7490, -84.3880);
        let intel = parse_intel_json(FIXTURE, center).expect("valid fixture");

        assert_eq!(intel.powerlines.len(), 1);
        assert_eq!(intel.structures.len(), 2);
        assert_eq!(intel.structures[0].tags.get("building").map(String::as_str), Some("garage"));
        assert!(intel.structures[0].distance_meters < intel.structures[1].distance_meters);

        // 0.0005 degrees of latitude is roughly 55 m
        let line = intel.nearest_powerline().expect("powerline");
        assert!((line.distance_meters - 55.6).abs() < 1.0, "{}", line.distance_meters);
        assert_eq!(line.tags.get("voltage").map(String::as_str), Some("115000"));
    }

    #[test]
    fn test_missing_elements() {
        let intel = parse_intel_json("{}", LatLng::new(0.0, 0.0)).expect("valid body");
        assert!(intel.is_empty());
    }

    #[test]
    fn test_address_report_radius() {
        let query = overpass_query(LatLng::new(33.749, -84.388), ADDRESS_INTEL_RADIUS_METERS);
        assert!(query.contains("way(around:250,33.749,-84.388)[\"power\"=\"line\"]"));
    }

    #[test]
    fn test_all_stores_flattens_queries() {
        let store = |name: &str| Place {
            lat: 33.75,
            lng: -84.39,
            display_name: name.to_string(),
        };
        let mut stores = BTreeMap::new();
        stores.insert("chainsaw".to_string(), vec![store("Saw Shop")]);
        stores.insert("rope".to_string(), vec![store("Rope Co"), store("Rigging Supply")]);
        stores.insert("tree service equipment".to_string(), vec![]);

        let report = AddressIntel {
            place: store("Job"),
            site: SiteIntel::default(),
            stores,
        };
        let names: Vec<&str> = report.all_stores().map(|p| p.display_name.as_str()).collect();
        assert_eq!(names, vec!["Saw Shop", "Rope Co", "Rigging Supply"]);
    }

    #[tokio::test]
    async fn test_address_report_needs_an_address() {
        let client = ServiceClient::default();
        let result = client.address_intel("").await;
        assert!(matches!(result, Err(crate::MapError::NotFound(_))));
    }

    #[test]
    fn test_query_mentions_both_feature_kinds() {
        let query = overpass_query(LatLng::new(33.749, -84.388), 200.0);
        assert!(query.starts_with("[out:json];"));
        assert!(query.contains("way(around:200,33.749,-84.388)[\"power\"=\"line\"]"));
        assert!(query.contains("way(around:200,33.749,-84.388)[\"building\"]"));
        assert!(query.trim_end().ends_with("out center;"));
    }
}
