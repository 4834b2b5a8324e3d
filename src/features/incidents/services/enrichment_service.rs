use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::incidents::models::{
    AddressBundle, ImageUpload, Incident, IncidentCategory, NewIncident,
};
use crate::features::incidents::providers::{
    maps_search_link, DescriptionProviderChain, GeocodeProviderChain,
};
use crate::features::incidents::services::coordinate_resolver;
use crate::features::incidents::services::IncidentService;
use crate::modules::storage::LocalUploadStore;

/// A citizen report as it arrives, before any enrichment
#[derive(Debug)]
pub struct IncidentSubmission {
    pub title: String,
    pub description: Option<String>,
    pub category: IncidentCategory,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub user_id: Option<String>,
    pub image: Option<ImageUpload>,
}

/// The enrichment pipeline. Once the photo precondition is satisfied, every
/// later stage absorbs its own failures and the submission always persists.
pub struct EnrichmentService {
    incidents: Arc<IncidentService>,
    geocoder: Arc<GeocodeProviderChain>,
    describer: Arc<DescriptionProviderChain>,
    uploads: Arc<LocalUploadStore>,
}

impl EnrichmentService {
    pub fn new(
        incidents: Arc<IncidentService>,
        geocoder: Arc<GeocodeProviderChain>,
        describer: Arc<DescriptionProviderChain>,
        uploads: Arc<LocalUploadStore>,
    ) -> Self {
        Self {
            incidents,
            geocoder,
            describer,
            uploads,
        }
    }

    pub async fn submit(&self, submission: IncidentSubmission) -> Result<Incident> {
        let image = submission.image.ok_or_else(|| {
            AppError::BadRequest(
                "Camera image is required. Report cannot be accepted.".to_string(),
            )
        })?;
        if submission.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".to_string()));
        }

        let image_url = self.uploads.store(&image).await?;

        let exif_gps = coordinate_resolver::extract_gps(&image.bytes);
        let coordinates = coordinate_resolver::resolve(
            exif_gps,
            submission.latitude,
            submission.longitude,
            &submission.location,
        );

        let (address, maps_link) = match coordinates {
            Some((lat, lng)) => {
                let enriched = self.geocoder.resolve(lat, lng).await;
                (enriched.address, enriched.maps_link)
            }
            None => {
                // No fix anywhere; carry the raw text and a search link
                let address = AddressBundle {
                    place_name: submission.location.clone(),
                    full_address: submission.location.clone(),
                    ..Default::default()
                };
                (address, maps_search_link(&submission.location))
            }
        };

        let photo_analysis = self
            .describer
            .describe(
                &image,
                &submission.category.to_string(),
                submission.description.as_deref(),
            )
            .await;

        let location = if submission.location.is_empty() {
            address.full_address.clone()
        } else {
            submission.location.clone()
        };

        let created = self
            .incidents
            .create(NewIncident {
                title: submission.title,
                description: submission.description,
                category: submission.category,
                location,
                latitude: coordinates.map(|(lat, _)| lat),
                longitude: coordinates.map(|(_, lng)| lng),
                image_url: image_url.clone(),
                user_id: submission
                    .user_id
                    .filter(|u| !u.is_empty())
                    .unwrap_or_else(|| "anonymous".to_string()),
                address,
                maps_link,
                photo_analysis,
            })
            .await;

        // A failed insert must not leave the photo orphaned on disk
        if created.is_err() {
            if let Err(err) = self.uploads.remove(&image_url).await {
                tracing::warn!(error = %err, "failed to remove upload after insert failure");
            }
        }
        created
    }
}
