use crate::{
    core::geo::LatLng,
    services::{
        geocode::{parse_places, Place},
        ServiceClient,
    },
    Result,
};

/// Half-width of the search box around the job, in degrees
pub const STORE_SEARCH_SPAN: f64 = 0.05;
pub const STORE_SEARCH_LIMIT: usize = 10;
pub const DEFAULT_STORE_QUERY: &str = "chainsaw";

/// Nominatim parameters restricting `query` to a box around `center`.
///
/// The viewbox is `left,top,right,bottom`.
pub fn store_search_params(query: &str, center: LatLng) -> Vec<(&'static str, String)> {
    let viewbox = format!(
        "{},{},{},{}",
        center.lng - STORE_SEARCH_SPAN,
        center.lat + STORE_SEARCH_SPAN,
        center.lng + STORE_SEARCH_SPAN,
        center.lat - STORE_SEARCH_SPAN
    );
    vec![
        ("format", "json".to_string()),
        ("q", query.to_string()),
        ("limit", STORE_SEARCH_LIMIT.to_string()),
        ("viewbox", viewbox),
        ("bounded", "1".to_string()),
    ]
}

impl ServiceClient {
    /// Stores matching `query` near `center`
    pub async fn nearby_stores(&self, center: LatLng, query: &str) -> Result<Vec<Place>> {
        let query = if query.trim().is_empty() {
            DEFAULT_STORE_QUERY
        } else {
            query.trim()
        };
        let body = self
            .get_text(&self.endpoints().nominatim, &store_search_params(query, center))
            .await?;
        let stores = parse_places(&body)?;
        log::info!("{} stores for '{}' near {:?}", stores.len(), query, center);
        Ok(stores)
    }
}
