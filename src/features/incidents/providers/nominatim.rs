use async_trait::async_trait;
use serde::Deserialize;

use crate::features::incidents::models::AddressBundle;
use crate::features::incidents::providers::{LocationProvider, ProviderError};

/// Nominatim reverse geocoding response
#[derive(Debug, Deserialize)]
pub struct NominatimResponse {
    pub display_name: Option<String>,
    pub address: Option<NominatimAddress>,
}

/// Nominatim address components
#[derive(Debug, Default, Deserialize)]
pub struct NominatimAddress {
    pub amenity: Option<String>,
    pub building: Option<String>,
    pub leisure: Option<String>,
    pub tourism: Option<String>,
    pub suburb: Option<String>,
    pub neighbourhood: Option<String>,
    pub quarter: Option<String>,
    pub city: Option<String>,
    pub town: Option<String>,
    pub village: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
    pub district: Option<String>,
    pub state: Option<String>,
    pub region: Option<String>,
    pub postcode: Option<String>,
    pub country: Option<String>,
}

impl NominatimAddress {
    /// Get city, falling back to town, village, or municipality
    pub fn get_city(&self) -> Option<String> {
        self.city
            .clone()
            .or_else(|| self.town.clone())
            .or_else(|| self.village.clone())
            .or_else(|| self.municipality.clone())
    }

    pub fn get_landmark(&self) -> Option<String> {
        self.amenity
            .clone()
            .or_else(|| self.building.clone())
            .or_else(|| self.leisure.clone())
            .or_else(|| self.tourism.clone())
    }
}

/// Open-data reverse geocoder backed by Nominatim
pub struct NominatimGeocoder {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimGeocoder {
    pub fn new(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

#[async_trait]
impl LocationProvider for NominatimGeocoder {
    fn name(&self) -> &'static str {
        "nominatim"
    }

    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<AddressBundle, ProviderError> {
        let url = format!(
            "{}/reverse?lat={}&lon={}&format=json&addressdetails=1&zoom=18",
            self.base_url, latitude, longitude
        );

        tracing::debug!("Reverse geocoding (nominatim): {},{}", latitude, longitude);

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ProviderError::Transport(format!(
                "nominatim returned status {}",
                response.status()
            )));
        }

        let data: NominatimResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let display_name = data.display_name.unwrap_or_default();
        if display_name.is_empty() {
            return Err(ProviderError::Empty);
        }
        let address = data.address.unwrap_or_default();

        Ok(AddressBundle {
            place_name: display_name.clone(),
            full_address: display_name,
            nearest_landmark: address.get_landmark().unwrap_or_default(),
            area: address
                .suburb
                .clone()
                .or_else(|| address.neighbourhood.clone())
                .or_else(|| address.quarter.clone())
                .unwrap_or_default(),
            city: address.get_city().unwrap_or_default(),
            taluk: address
                .county
                .clone()
                .or_else(|| address.district.clone())
                .unwrap_or_default(),
            district: address
                .district
                .clone()
                .or_else(|| address.county.clone())
                .unwrap_or_default(),
            state: address
                .state
                .clone()
                .or_else(|| address.region.clone())
                .unwrap_or_default(),
            pincode: address.postcode.clone().unwrap_or_default(),
            country: address.country.clone().unwrap_or_default(),
        })
    }
}
