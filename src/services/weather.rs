use crate::{core::geo::LatLng, services::ServiceClient, Result};
use serde::{Deserialize, Serialize};

/// Open-Meteo `current_weather` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    /// Degrees Celsius
    pub temperature: f64,
    /// km/h
    pub windspeed: f64,
    /// Degrees, meteorological convention
    pub winddirection: f64,
    /// WMO weather interpretation code
    pub weathercode: u16,
    #[serde(default)]
    pub is_day: Option<u8>,
    #[serde(default)]
    pub time: Option<String>,
}

impl CurrentWeather {
    /// Wind strong enough that climbing and felling should be reconsidered
    pub fn is_windy(&self) -> bool {
        self.windspeed >= 40.0
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<CurrentWeather>,
}

pub fn forecast_params(at: LatLng) -> Vec<(&'static str, String)> {
    vec![
        ("latitude", at.lat.to_string()),
        ("longitude", at.lng.to_string()),
        ("current_weather", "true".to_string()),
    ]
}

/// Extracts the current conditions; `None` when the block is absent
pub fn parse_current_weather(body: &str) -> Result<Option<CurrentWeather>> {
    let response: ForecastResponse = serde_json::from_str(body)?;
    Ok(response.current_weather)
}

impl ServiceClient {
    pub async fn current_weather(&self, at: LatLng) -> Result<Option<CurrentWeather>> {
        let body = self
            .get_text(&self.endpoints().open_meteo, &forecast_params(at))
            .await?;
        parse_current_weather(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_current_weather() {
        let body = r#"{
            "latitude": 33.75, "longitude": -84.375,
            "current_weather": {
                "time": "2024-05-01T14:00", "temperature": 24.3, "windspeed": 11.2,
                "winddirection": 250.0, "weathercode": 3, "is_day": 1
            }
        }"#;
        let weather = parse_current_weather(body)
            .expect("valid body")
            .expect("current weather");
        assert_eq!(weather.weathercode, 3);
        assert!((weather.temperature - 24.3).abs() < 1e-9);
        assert!(!weather.is_windy());
    }

    #[test]
    fn test_missing_block() {
        let weather = parse_current_weather(r#"{"latitude": 1.0}"#).expect("valid body");
        assert!(weather.is_none());
    }

    #[test]
    fn test_forecast_params() {
        let params = forecast_params(LatLng::new(33.5, -84.25));
        assert_eq!(params[0], ("latitude", "33.5".to_string()));
        assert_eq!(params[1], ("longitude", "-84.25".to_string()));
        assert_eq!(params[2], ("current_weather", "true".to_string()));
    }
}
