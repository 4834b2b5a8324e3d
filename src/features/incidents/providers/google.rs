use async_trait::async_trait;
use serde::Deserialize;

use crate::features::incidents::models::AddressBundle;
use crate::features::incidents::providers::{LocationProvider, ProviderError};

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: Option<String>,
    #[serde(default)]
    address_components: Vec<AddressComponent>,
}

#[derive(Debug, Deserialize)]
struct AddressComponent {
    long_name: String,
    #[serde(default)]
    types: Vec<String>,
}

impl GeocodeResult {
    fn component(&self, wanted: &[&str]) -> String {
        self.address_components
            .iter()
            .find(|c| wanted.iter().any(|t| c.types.iter().any(|ct| ct == t)))
            .map(|c| c.long_name.clone())
            .unwrap_or_default()
    }

    /// A result without a formatted address cannot produce a usable bundle;
    /// the chain must move on to the next provider.
    fn into_bundle(self) -> Result<AddressBundle, ProviderError> {
        let formatted = self.formatted_address.clone().unwrap_or_default();
        if formatted.is_empty() {
            return Err(ProviderError::Empty);
        }

        let landmark = self.component(&["point_of_interest", "establishment", "premise"]);
        let taluk = self.component(&[
            "administrative_area_level_3",
            "sublocality_level_2",
            "sublocality_level_1",
        ]);

        Ok(AddressBundle {
            place_name: formatted.clone(),
            full_address: formatted,
            nearest_landmark: landmark,
            area: self.component(&["sublocality", "sublocality_level_1", "neighborhood"]),
            city: self.component(&["locality"]),
            taluk: if taluk.is_empty() {
                self.component(&["sublocality"])
            } else {
                taluk
            },
            district: self.component(&["administrative_area_level_2"]),
            state: self.component(&["administrative_area_level_1"]),
            pincode: self.component(&["postal_code"]),
            country: self.component(&["country"]),
        })
    }
}

/// Commercial reverse geocoder backed by the Google Geocoding API
pub struct GoogleGeocoder {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GoogleGeocoder {
    pub fn new(client: reqwest::Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }
}

#[async_trait]
impl LocationProvider for GoogleGeocoder {
    fn name(&self) -> &'static str {
        "google-geocoding"
    }

    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<AddressBundle, ProviderError> {
        let url = format!(
            "{}/maps/api/geocode/json?latlng={},{}&key={}&result_type={}",
            self.base_url,
            latitude,
            longitude,
            self.api_key,
            urlencoding::encode("street_address|route|premise|point_of_interest")
        );

        tracing::debug!("Reverse geocoding (google): {},{}", latitude, longitude);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Transport(format!(
                "google geocoding returned status {}",
                response.status()
            )));
        }

        let data: GeocodeResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        if data.status != "OK" {
            return Err(ProviderError::Empty);
        }
        data.results
            .into_iter()
            .next()
            .ok_or(ProviderError::Empty)?
            .into_bundle()
    }
}
