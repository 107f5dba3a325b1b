//! Client-side HTTP lookups around a job site
//!
//! Every call goes through a [`ServiceClient`], which carries the HTTP client
//! and the configured endpoints. Request parameters and response parsing are
//! plain functions so they can be checked without a network.

pub mod directions;
pub mod geocode;
pub mod intel;
#[cfg(feature = "tokio-runtime")]
pub mod lookup;
pub mod stores;
pub mod weather;

use crate::{core::config::ServiceEndpoints, Result};
use once_cell::sync::Lazy;
use std::time::Duration;

pub use directions::DirectionsProvider;
pub use geocode::Place;
pub use intel::{AddressIntel, IntelFeature, IntelKind, SiteIntel};
#[cfg(feature = "tokio-runtime")]
pub use lookup::LookupTracker;
pub use weather::CurrentWeather;

/// Shared client for callers that keep the default endpoints
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    let defaults = ServiceEndpoints::default();
    reqwest::Client::builder()
        .user_agent(defaults.user_agent)
        .timeout(Duration::from_secs(defaults.timeout_secs))
        .build()
        .unwrap_or_else(|e| {
            log::warn!("falling back to a plain HTTP client: {}", e);
            reqwest::Client::new()
        })
});

/// HTTP client plus the endpoints it talks to. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ServiceClient {
    http: reqwest::Client,
    endpoints: ServiceEndpoints,
}

impl ServiceClient {
    /// Builds a dedicated client honoring the endpoints' user agent and timeout
    pub fn new(endpoints: ServiceEndpoints) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(endpoints.user_agent.clone())
            .timeout(Duration::from_secs(endpoints.timeout_secs))
            .build()?;
        Ok(Self { http, endpoints })
    }

    pub fn endpoints(&self) -> &ServiceEndpoints {
        &self.endpoints
    }

    async fn get_text(&self, url: &str, params: &[(&str, String)]) -> Result<String> {
        log::debug!("GET {} {:?}", url, params);
        let response = self
            .http
            .get(url)
            .query(params)
            .header(reqwest::header::ACCEPT_LANGUAGE, &self.endpoints.accept_language)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }

    async fn post_text(&self, url: &str, body: String) -> Result<String> {
        log::debug!("POST {} ({} bytes)", url, body.len());
        let response = self
            .http
            .post(url)
            .body(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}

impl Default for ServiceClient {
    fn default() -> Self {
        Self {
            http: HTTP_CLIENT.clone(),
            endpoints: ServiceEndpoints::default(),
        }
    }
}
