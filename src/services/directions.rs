use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};

/// Where driving directions are opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionsProvider {
    Google,
    Apple,
}

impl DirectionsProvider {
    /// Driving-directions URL from `from` to `to`
    pub fn url(&self, from: LatLng, to: LatLng) -> String {
        match self {
            DirectionsProvider::Google => format!(
                "https://www.google.com/maps/dir/?api=1&origin={},{}&destination={},{}&travelmode=driving",
                from.lat, from.lng, to.lat, to.lng
            ),
            DirectionsProvider::Apple => format!(
                "https://maps.apple.com/?saddr={},{}&daddr={},{}&dirflg=d",
                from.lat, from.lng, to.lat, to.lng
            ),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DirectionsProvider::Google => "Google Maps",
            DirectionsProvider::Apple => "Apple Maps",
        }
    }
}
