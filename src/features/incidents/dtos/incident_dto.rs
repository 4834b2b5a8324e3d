use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::incidents::models::Incident;
use crate::features::incidents::providers::maps_link_for;
use crate::features::incidents::services::nearby::NearbyIncident;
use crate::shared::datetime::format_ist;

/// Flat ingestion response: the resolved bundle plus the description, no
/// nesting and no extra keys
#[derive(Debug, Serialize, ToSchema)]
pub struct SubmitIncidentResponse {
    pub status: String,
    pub place_name: String,
    pub full_address: String,
    pub nearest_landmark: String,
    pub area: String,
    pub city: String,
    pub taluk: String,
    pub district: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
    pub google_maps_link: String,
    pub photo_analysis: String,
    pub user_description: String,
    pub reported_datetime: String,
}

impl From<&Incident> for SubmitIncidentResponse {
    fn from(incident: &Incident) -> Self {
        Self {
            status: "success".to_string(),
            place_name: incident.place_name.clone(),
            full_address: incident.full_address.clone(),
            nearest_landmark: incident.nearest_landmark.clone(),
            area: incident.area.clone(),
            city: incident.city.clone(),
            taluk: incident.taluk.clone(),
            district: incident.district.clone(),
            state: incident.state.clone(),
            pincode: incident.pincode.clone(),
            country: incident.country.clone(),
            google_maps_link: incident.maps_link.clone(),
            photo_analysis: incident.photo_analysis.clone(),
            user_description: incident.description.clone().unwrap_or_default(),
            reported_datetime: format_ist(incident.created_at),
        }
    }
}

/// Full incident row plus the IST-formatted submission time
#[derive(Debug, Serialize, ToSchema)]
pub struct IncidentResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub location: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: String,
    pub image_url: String,
    pub user_id: String,
    pub department: Option<String>,
    pub place_name: String,
    pub full_address: String,
    pub nearest_landmark: String,
    pub area: String,
    pub city: String,
    pub taluk: String,
    pub district: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
    pub google_maps_link: String,
    pub photo_analysis: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub reported_datetime: String,
}

impl From<&Incident> for IncidentResponse {
    fn from(incident: &Incident) -> Self {
        Self {
            id: incident.id,
            title: incident.title.clone(),
            description: incident.description.clone(),
            category: incident.category.to_string(),
            location: incident.location.clone(),
            latitude: incident.latitude,
            longitude: incident.longitude,
            status: incident.status.to_string(),
            image_url: incident.image_url.clone(),
            user_id: incident.user_id.clone(),
            department: incident.department.clone(),
            place_name: incident.place_name.clone(),
            full_address: incident.full_address.clone(),
            nearest_landmark: incident.nearest_landmark.clone(),
            area: incident.area.clone(),
            city: incident.city.clone(),
            taluk: incident.taluk.clone(),
            district: incident.district.clone(),
            state: incident.state.clone(),
            pincode: incident.pincode.clone(),
            country: incident.country.clone(),
            google_maps_link: incident.maps_link.clone(),
            photo_analysis: incident.photo_analysis.clone(),
            created_at: incident.created_at,
            updated_at: incident.updated_at,
            reported_datetime: format_ist(incident.created_at),
        }
    }
}

/// `/incidents/{id}/location` payload: the bundle viewed on its own
#[derive(Debug, Serialize, ToSchema)]
pub struct LocationDetailsResponse {
    pub status: String,
    pub place_name: String,
    pub full_address: String,
    pub nearest_landmark: String,
    pub area: String,
    pub city: String,
    pub taluk: String,
    pub district: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
    pub google_maps_link: String,
    pub photo_analysis: String,
    pub user_description: String,
}

impl From<&Incident> for LocationDetailsResponse {
    fn from(incident: &Incident) -> Self {
        let full_address = if incident.full_address.is_empty() {
            incident.location.clone()
        } else {
            incident.full_address.clone()
        };
        let google_maps_link = if incident.maps_link.is_empty() {
            incident
                .coordinates()
                .map(|(lat, lng)| maps_link_for(lat, lng))
                .unwrap_or_default()
        } else {
            incident.maps_link.clone()
        };

        Self {
            status: "success".to_string(),
            place_name: incident.place_name.clone(),
            full_address,
            nearest_landmark: incident.nearest_landmark.clone(),
            area: incident.area.clone(),
            city: incident.city.clone(),
            taluk: incident.taluk.clone(),
            district: incident.district.clone(),
            state: incident.state.clone(),
            pincode: incident.pincode.clone(),
            country: incident.country.clone(),
            google_maps_link,
            photo_analysis: incident.photo_analysis.clone(),
            user_description: incident.description.clone().unwrap_or_default(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NearbyIncidentResponse {
    #[serde(flatten)]
    pub incident: IncidentResponse,
    pub distance: f64,
}

impl From<&NearbyIncident> for NearbyIncidentResponse {
    fn from(nearby: &NearbyIncident) -> Self {
        Self {
            incident: IncidentResponse::from(&nearby.incident),
            distance: nearby.distance_meters,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListIncidentsQuery {
    pub category: Option<String>,
    pub status: Option<String>,
    pub department: Option<String>,
    #[serde(alias = "userId")]
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct NearbyQuery {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius: Option<f64>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RoleBasedQuery {
    pub selected_state: Option<String>,
    pub selected_taluk: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStatusDto {
    pub status: String,
    pub department: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ConvertLocationDto {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConvertLocationResponse {
    pub status: String,
    pub place_name: String,
    pub full_address: String,
    pub nearest_landmark: String,
    pub area: String,
    pub city: String,
    pub taluk: String,
    pub district: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
    pub google_maps_link: String,
}

/// Role-scoped listing payloads

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportLocationDetails {
    pub place_name: String,
    pub full_address: String,
    pub nearest_landmark: String,
    pub area: String,
    pub taluk: String,
    pub district: String,
    pub state: String,
    pub pincode: String,
    pub country: String,
    pub google_maps_link: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReportIssueDetails {
    pub user_id: String,
    pub description: String,
    pub photo_analysis: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RoleBasedReport {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub status: String,
    pub location_details: ReportLocationDetails,
    pub issue_details: ReportIssueDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_datetime: Option<String>,
    pub image_url: String,
    pub created_at: DateTime<Utc>,
}

impl RoleBasedReport {
    pub fn from_incident(incident: &Incident, with_datetime: bool) -> Self {
        let full_address = if incident.full_address.is_empty() {
            incident.location.clone()
        } else {
            incident.full_address.clone()
        };
        let google_maps_link = if incident.maps_link.is_empty() {
            incident
                .coordinates()
                .map(|(lat, lng)| maps_link_for(lat, lng))
                .unwrap_or_default()
        } else {
            incident.maps_link.clone()
        };

        Self {
            id: incident.id,
            title: incident.title.clone(),
            description: incident.description.clone(),
            category: incident.category.to_string(),
            status: incident.status.to_string(),
            location_details: ReportLocationDetails {
                place_name: incident.place_name.clone(),
                full_address,
                nearest_landmark: incident.nearest_landmark.clone(),
                area: incident.area.clone(),
                taluk: incident.taluk.clone(),
                district: incident.district.clone(),
                state: incident.state.clone(),
                pincode: incident.pincode.clone(),
                country: incident.country.clone(),
                google_maps_link,
            },
            issue_details: ReportIssueDetails {
                user_id: incident.user_id.clone(),
                description: incident.description.clone().unwrap_or_default(),
                photo_analysis: incident.photo_analysis.clone(),
            },
            reported_datetime: with_datetime.then(|| format_ist(incident.created_at)),
            image_url: incident.image_url.clone(),
            created_at: incident.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserRoleResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub role: String,
    pub user_visible_reports: Vec<RoleBasedReport>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminFilters {
    pub selected_state: String,
    pub selected_taluk: String,
    pub passes_filter: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HeatmapPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminRoleResponse {
    pub status: String,
    pub role: String,
    pub admin_filters: AdminFilters,
    pub admin_heatmap_data: Vec<HeatmapPoint>,
    pub reports: Vec<RoleBasedReport>,
    pub total_count: usize,
}
