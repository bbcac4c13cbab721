//! Reverse geocoding for diary locations.

use reqwest::Method;
use serde::Deserialize;

use crate::client::ApiClient;
use crate::error::Result;

#[derive(Debug, Deserialize)]
struct LocationResponse {
    address: String,
}

impl ApiClient {
    /// Turns coordinates into a human-readable address.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<String> {
        let builder = self
            .request(Method::GET, "api/location")?
            .query(&[("lat", latitude), ("lng", longitude)]);
        let response: LocationResponse = self.execute(builder, "address").await?;
        Ok(response.address)
    }
}
