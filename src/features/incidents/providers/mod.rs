use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::features::incidents::models::{AddressBundle, EnrichedLocation, ImageUpload};

pub mod gemini;
pub mod google;
pub mod nominatim;
pub mod template;

pub use gemini::GeminiProvider;
pub use google::GoogleGeocoder;
pub use nominatim::NominatimGeocoder;
pub use template::TemplateDescriber;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("provider returned no usable result")]
    Empty,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Transport(err.to_string())
    }
}

/// Reverse geocoding capability: coordinates in, structured address out
#[async_trait]
pub trait LocationProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<AddressBundle, ProviderError>;
}

/// Photo description capability. Providers that cannot see the image may
/// still produce a description from the category and the reporter's note.
#[async_trait]
pub trait DescriptionProvider: Send + Sync {
    fn name(&self) -> &'static str;

    async fn describe(
        &self,
        image: &ImageUpload,
        category: &str,
        reporter_note: Option<&str>,
    ) -> Result<String, ProviderError>;
}

pub fn maps_link_for(latitude: f64, longitude: f64) -> String {
    format!("https://www.google.com/maps?q={latitude},{longitude}")
}

pub fn maps_search_link(query: &str) -> String {
    format!(
        "https://www.google.com/maps/search/{}",
        urlencoding::encode(query)
    )
}

/// Terminal geocode provider. Never fails; yields an empty bundle so the
/// incident still carries a map link derived from its raw coordinates.
struct CoordinateFallback;

#[async_trait]
impl LocationProvider for CoordinateFallback {
    fn name(&self) -> &'static str {
        "coordinate-fallback"
    }

    async fn reverse_geocode(
        &self,
        _latitude: f64,
        _longitude: f64,
    ) -> Result<AddressBundle, ProviderError> {
        Ok(AddressBundle::default())
    }
}

/// Ordered reverse-geocoding fallback chain. Providers are tried in order
/// under a per-call timeout; the first success wins and later providers are
/// not contacted. A no-fail terminal provider is appended at construction,
/// so `resolve` always yields an address bundle.
pub struct GeocodeProviderChain {
    providers: Vec<Arc<dyn LocationProvider>>,
    timeout: Duration,
}

impl GeocodeProviderChain {
    pub fn new(mut providers: Vec<Arc<dyn LocationProvider>>, timeout: Duration) -> Self {
        providers.push(Arc::new(CoordinateFallback));
        Self { providers, timeout }
    }

    pub async fn resolve(&self, latitude: f64, longitude: f64) -> EnrichedLocation {
        for provider in &self.providers {
            match tokio::time::timeout(self.timeout, provider.reverse_geocode(latitude, longitude))
                .await
            {
                Ok(Ok(address)) => {
                    tracing::debug!(provider = provider.name(), "reverse geocode succeeded");
                    return EnrichedLocation {
                        address,
                        maps_link: maps_link_for(latitude, longitude),
                    };
                }
                Ok(Err(err)) => {
                    tracing::warn!(provider = provider.name(), error = %err, "reverse geocode failed");
                }
                Err(_) => {
                    tracing::warn!(provider = provider.name(), "reverse geocode timed out");
                }
            }
        }

        // Unreachable while the terminal provider is infallible
        EnrichedLocation {
            address: AddressBundle::default(),
            maps_link: maps_link_for(latitude, longitude),
        }
    }
}

/// Ordered photo-description fallback chain. The category template describer
/// is appended at construction, so `describe` always yields non-empty text.
pub struct DescriptionProviderChain {
    providers: Vec<Arc<dyn DescriptionProvider>>,
    timeout: Duration,
}

impl DescriptionProviderChain {
    pub fn new(mut providers: Vec<Arc<dyn DescriptionProvider>>, timeout: Duration) -> Self {
        providers.push(Arc::new(TemplateDescriber));
        Self { providers, timeout }
    }

    pub async fn describe(
        &self,
        image: &ImageUpload,
        category: &str,
        reporter_note: Option<&str>,
    ) -> String {
        for provider in &self.providers {
            match tokio::time::timeout(
                self.timeout,
                provider.describe(image, category, reporter_note),
            )
            .await
            {
                Ok(Ok(text)) if !text.trim().is_empty() => {
                    tracing::debug!(provider = provider.name(), "photo description succeeded");
                    return text;
                }
                Ok(Ok(_)) => {
                    tracing::warn!(provider = provider.name(), "photo description was empty");
                }
                Ok(Err(err)) => {
                    tracing::warn!(provider = provider.name(), error = %err, "photo description failed");
                }
                Err(_) => {
                    tracing::warn!(provider = provider.name(), "photo description timed out");
                }
            }
        }

        template::template_description(category, reporter_note)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct StaticLocation {
        calls: AtomicUsize,
        result: Option<AddressBundle>,
    }

    impl StaticLocation {
        fn succeeding(city: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result: Some(AddressBundle {
                    city: city.to_string(),
                    full_address: format!("{city}, India"),
                    ..Default::default()
                }),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                result: None,
            }
        }
    }

    #[async_trait]
    impl LocationProvider for StaticLocation {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn reverse_geocode(
            &self,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<AddressBundle, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone().ok_or(ProviderError::Empty)
        }
    }

    struct SlowLocation;

    #[async_trait]
    impl LocationProvider for SlowLocation {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn reverse_geocode(
            &self,
            _latitude: f64,
            _longitude: f64,
        ) -> Result<AddressBundle, ProviderError> {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Ok(AddressBundle::default())
        }
    }

    struct StaticDescription {
        result: Option<String>,
    }

    #[async_trait]
    impl DescriptionProvider for StaticDescription {
        fn name(&self) -> &'static str {
            "static"
        }

        async fn describe(
            &self,
            _image: &ImageUpload,
            _category: &str,
            _reporter_note: Option<&str>,
        ) -> Result<String, ProviderError> {
            self.result.clone().ok_or(ProviderError::Empty)
        }
    }

    fn sample_image() -> ImageUpload {
        ImageUpload {
            file_name: "scene.jpg".to_string(),
            content_type: "image/jpeg".to_string(),
            bytes: vec![0xff, 0xd8, 0xff],
        }
    }

    #[tokio::test]
    async fn first_success_stops_the_chain() {
        let first = Arc::new(StaticLocation::succeeding("Bengaluru"));
        let second = Arc::new(StaticLocation::succeeding("Mysuru"));
        let chain = GeocodeProviderChain::new(
            vec![first.clone(), second.clone()],
            Duration::from_secs(1),
        );

        let resolved = chain.resolve(12.9716, 77.5946).await;

        assert_eq!(resolved.address.city, "Bengaluru");
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failure_falls_through_to_next_provider() {
        let first = Arc::new(StaticLocation::failing());
        let second = Arc::new(StaticLocation::succeeding("Mysuru"));
        let chain = GeocodeProviderChain::new(
            vec![first.clone(), second.clone()],
            Duration::from_secs(1),
        );

        let resolved = chain.resolve(12.2958, 76.6394).await;

        assert_eq!(resolved.address.city, "Mysuru");
        assert_eq!(first.calls.load(Ordering::SeqCst), 1);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn total_failure_degrades_to_coordinates() {
        let chain = GeocodeProviderChain::new(
            vec![
                Arc::new(StaticLocation::failing()),
                Arc::new(StaticLocation::failing()),
            ],
            Duration::from_secs(1),
        );

        let resolved = chain.resolve(12.9716, 77.5946).await;

        assert_eq!(resolved.address, AddressBundle::default());
        assert_eq!(resolved.maps_link, "https://www.google.com/maps?q=12.9716,77.5946");
    }

    #[tokio::test]
    async fn hung_provider_is_timed_out() {
        let fallback = Arc::new(StaticLocation::succeeding("Hubballi"));
        let chain = GeocodeProviderChain::new(
            vec![Arc::new(SlowLocation), fallback.clone()],
            Duration::from_millis(20),
        );

        let resolved = chain.resolve(15.3647, 75.1240).await;

        assert_eq!(resolved.address.city, "Hubballi");
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn description_chain_never_returns_empty() {
        let chain = DescriptionProviderChain::new(
            vec![
                Arc::new(StaticDescription { result: None }),
                Arc::new(StaticDescription {
                    result: Some("   ".to_string()),
                }),
            ],
            Duration::from_secs(1),
        );

        let text = chain.describe(&sample_image(), "Fire", None).await;

        assert!(!text.trim().is_empty());
        assert!(text.contains("Fire incident detected"));
    }

    #[tokio::test]
    async fn description_first_success_wins() {
        let chain = DescriptionProviderChain::new(
            vec![Arc::new(StaticDescription {
                result: Some("Smoke rising from a two-storey building.".to_string()),
            })],
            Duration::from_secs(1),
        );

        let text = chain.describe(&sample_image(), "Fire", None).await;

        assert_eq!(text, "Smoke rising from a two-storey building.");
    }

    #[test]
    fn maps_links_are_well_formed() {
        assert_eq!(
            maps_link_for(12.9716, 77.5946),
            "https://www.google.com/maps?q=12.9716,77.5946"
        );
        assert_eq!(
            maps_search_link("MG Road, Bengaluru"),
            "https://www.google.com/maps/search/MG%20Road%2C%20Bengaluru"
        );
    }
}
