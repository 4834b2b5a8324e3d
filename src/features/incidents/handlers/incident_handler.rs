use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::incidents::dtos::*;
use crate::features::incidents::models::{ImageUpload, IncidentCategory, IncidentStatus};
use crate::features::incidents::providers::GeocodeProviderChain;
use crate::features::incidents::services::{
    nearby, EnrichmentService, IncidentFilters, IncidentService, IncidentSubmission,
};
use crate::shared::constants::{DEFAULT_NEARBY_RADIUS_M, ROLE_ADMIN, ROLE_USER};
use crate::shared::types::ErrorResponse;

#[derive(Clone)]
pub struct IncidentsState {
    pub enrichment: Arc<EnrichmentService>,
    pub incidents: Arc<IncidentService>,
    pub geocoder: Arc<GeocodeProviderChain>,
}

/// Submit a citizen report for enrichment
#[utoipa::path(
    post,
    path = "/api/incidents",
    request_body(content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Incident enriched and stored", body = SubmitIncidentResponse),
        (status = 400, description = "Missing image or invalid fields", body = ErrorResponse)
    ),
    tag = "incidents"
)]
pub async fn submit_incident(
    State(state): State<IncidentsState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse> {
    let mut title = String::new();
    let mut description: Option<String> = None;
    let mut category = String::new();
    let mut location = String::new();
    let mut latitude: Option<f64> = None;
    let mut longitude: Option<f64> = None;
    let mut user_id: Option<String> = None;
    let mut image: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => title = read_text(field).await?,
            "description" => description = Some(read_text(field).await?),
            "category" => category = read_text(field).await?,
            "location" => location = read_text(field).await?,
            "latitude" => latitude = read_text(field).await?.trim().parse().ok(),
            "longitude" => longitude = read_text(field).await?.trim().parse().ok(),
            "user_id" => user_id = Some(read_text(field).await?),
            "image" => {
                let file_name = field.file_name().unwrap_or("upload.jpg").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("image/jpeg")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read image: {e}")))?
                    .to_vec();
                image = Some(ImageUpload {
                    file_name,
                    content_type,
                    bytes,
                });
            }
            _ => {}
        }
    }

    if title.is_empty() || category.is_empty() {
        return Err(AppError::Validation(
            "Title and category are required".to_string(),
        ));
    }
    let category: IncidentCategory = category
        .parse()
        .map_err(|_| AppError::Validation("Invalid category".to_string()))?;

    let incident = state
        .enrichment
        .submit(IncidentSubmission {
            title,
            description,
            category,
            location,
            latitude,
            longitude,
            user_id,
            image,
        })
        .await?;

    tracing::info!(incident_id = incident.id, "incident submitted");

    Ok((
        StatusCode::CREATED,
        Json(SubmitIncidentResponse::from(&incident)),
    ))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart field: {e}")))
}

/// List incidents, optionally filtered
#[utoipa::path(
    get,
    path = "/api/incidents",
    params(ListIncidentsQuery),
    responses((status = 200, description = "Matching incidents", body = [IncidentResponse])),
    tag = "incidents"
)]
pub async fn list_incidents(
    State(state): State<IncidentsState>,
    Query(query): Query<ListIncidentsQuery>,
) -> Result<impl IntoResponse> {
    let filters = IncidentFilters {
        status: query.status.as_deref().and_then(|s| s.parse().ok()),
        category: query
            .category
            .as_deref()
            .filter(|c| *c != "All")
            .and_then(|c| c.parse().ok()),
        department: query.department,
        user_id: query.user_id,
        ..Default::default()
    };

    let incidents = state.incidents.list(&filters).await?;
    let body: Vec<IncidentResponse> = incidents.iter().map(IncidentResponse::from).collect();
    Ok(Json(body))
}

/// Incidents near a point, closest first
#[utoipa::path(
    get,
    path = "/api/incidents/nearby",
    params(NearbyQuery),
    responses(
        (status = 200, description = "Unresolved incidents inside the radius", body = [NearbyIncidentResponse]),
        (status = 400, description = "Missing coordinates", body = ErrorResponse)
    ),
    tag = "incidents"
)]
pub async fn nearby_incidents(
    State(state): State<IncidentsState>,
    Query(query): Query<NearbyQuery>,
) -> Result<impl IntoResponse> {
    let (latitude, longitude) = query
        .latitude
        .zip(query.longitude)
        .ok_or_else(|| AppError::BadRequest("Latitude and longitude required".to_string()))?;
    let radius = query.radius.unwrap_or(DEFAULT_NEARBY_RADIUS_M);

    let candidates = state.incidents.list_active_with_coordinates().await?;
    let ranked = nearby::rank(candidates, latitude, longitude, radius);

    let body: Vec<NearbyIncidentResponse> =
        ranked.iter().map(NearbyIncidentResponse::from).collect();
    Ok(Json(body))
}

/// Listing scoped by the caller's role
#[utoipa::path(
    get,
    path = "/api/incidents/role-based",
    params(RoleBasedQuery),
    responses((status = 200, description = "Role-scoped report listing")),
    security(("bearer_auth" = [])),
    tag = "incidents"
)]
pub async fn role_based_incidents(
    State(state): State<IncidentsState>,
    user: AuthenticatedUser,
    Query(query): Query<RoleBasedQuery>,
) -> Result<axum::response::Response> {
    match user.role.as_str() {
        ROLE_USER => {
            let incidents = state.incidents.list_by_user(&user.id.to_string()).await?;
            let reports: Vec<RoleBasedReport> = incidents
                .iter()
                .map(|i| RoleBasedReport::from_incident(i, false))
                .collect();

            let body = if reports.is_empty() {
                UserRoleResponse {
                    status: "empty".to_string(),
                    message: Some("No issues reported yet.".to_string()),
                    role: ROLE_USER.to_string(),
                    user_visible_reports: Vec::new(),
                }
            } else {
                UserRoleResponse {
                    status: "success".to_string(),
                    message: None,
                    role: ROLE_USER.to_string(),
                    user_visible_reports: reports,
                }
            };
            Ok(Json(body).into_response())
        }
        ROLE_ADMIN => {
            let filtered = query.selected_state.is_some() || query.selected_taluk.is_some();
            let incidents = state
                .incidents
                .list(&IncidentFilters {
                    state: query.selected_state.clone(),
                    taluk: query.selected_taluk.clone(),
                    ..Default::default()
                })
                .await?;

            let heatmap: Vec<HeatmapPoint> = incidents
                .iter()
                .filter_map(|i| i.coordinates())
                .map(|(lat, lng)| HeatmapPoint { lat, lng })
                .collect();
            let reports: Vec<RoleBasedReport> = incidents
                .iter()
                .map(|i| RoleBasedReport::from_incident(i, true))
                .collect();

            let body = AdminRoleResponse {
                status: "success".to_string(),
                role: ROLE_ADMIN.to_string(),
                admin_filters: AdminFilters {
                    selected_state: query.selected_state.unwrap_or_default(),
                    selected_taluk: query.selected_taluk.unwrap_or_default(),
                    passes_filter: !filtered || !incidents.is_empty(),
                },
                admin_heatmap_data: heatmap,
                total_count: reports.len(),
                reports,
            };
            Ok(Json(body).into_response())
        }
        _ => Err(AppError::Forbidden("Invalid role".to_string())),
    }
}

/// Fetch one incident
#[utoipa::path(
    get,
    path = "/api/incidents/{id}",
    params(("id" = i64, Path, description = "Incident id")),
    responses(
        (status = 200, description = "The incident", body = IncidentResponse),
        (status = 404, description = "Unknown id", body = ErrorResponse)
    ),
    tag = "incidents"
)]
pub async fn get_incident(
    State(state): State<IncidentsState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let incident = state.incidents.get_by_id(id).await?;
    Ok(Json(IncidentResponse::from(&incident)))
}

/// Fetch just the resolved-location bundle of an incident
#[utoipa::path(
    get,
    path = "/api/incidents/{id}/location",
    params(("id" = i64, Path, description = "Incident id")),
    responses(
        (status = 200, description = "Resolved location details", body = LocationDetailsResponse),
        (status = 404, description = "Unknown id", body = ErrorResponse)
    ),
    tag = "incidents"
)]
pub async fn get_incident_location(
    State(state): State<IncidentsState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let incident = state.incidents.get_by_id(id).await?;
    Ok(Json(LocationDetailsResponse::from(&incident)))
}

/// A reporter's own submission history
#[utoipa::path(
    get,
    path = "/api/users/{user_id}/incidents",
    params(("user_id" = String, Path, description = "Reporter id")),
    responses((status = 200, description = "The reporter's incidents", body = [IncidentResponse])),
    tag = "incidents"
)]
pub async fn list_user_incidents(
    State(state): State<IncidentsState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse> {
    let incidents = state.incidents.list_by_user(&user_id).await?;
    let body: Vec<IncidentResponse> = incidents.iter().map(IncidentResponse::from).collect();
    Ok(Json(body))
}

/// Admin status update
#[utoipa::path(
    patch,
    path = "/api/incidents/{id}/status",
    params(("id" = i64, Path, description = "Incident id")),
    request_body = UpdateStatusDto,
    responses(
        (status = 200, description = "Updated incident", body = IncidentResponse),
        (status = 400, description = "Status outside the validity set", body = ErrorResponse),
        (status = 403, description = "Caller is not an admin", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "incidents"
)]
pub async fn update_incident_status(
    State(state): State<IncidentsState>,
    user: AuthenticatedUser,
    Path(id): Path<i64>,
    AppJson(dto): AppJson<UpdateStatusDto>,
) -> Result<impl IntoResponse> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    let status: IncidentStatus = dto
        .status
        .parse()
        .map_err(|_| AppError::Validation("Invalid status".to_string()))?;

    let incident = state
        .incidents
        .update_status(id, status, dto.department)
        .await?;

    tracing::info!(incident_id = id, status = %status, "incident status updated");

    Ok(Json(IncidentResponse::from(&incident)))
}

/// Standalone coordinate-to-address conversion
#[utoipa::path(
    post,
    path = "/api/location/convert",
    request_body = ConvertLocationDto,
    responses(
        (status = 200, description = "Resolved address bundle", body = ConvertLocationResponse),
        (status = 400, description = "Missing or invalid coordinates", body = ErrorResponse)
    ),
    tag = "location"
)]
pub async fn convert_location(
    State(state): State<IncidentsState>,
    AppJson(dto): AppJson<ConvertLocationDto>,
) -> Result<impl IntoResponse> {
    let (latitude, longitude) = dto
        .latitude
        .zip(dto.longitude)
        .ok_or_else(|| AppError::BadRequest("Latitude and longitude are required".to_string()))?;
    if !crate::features::incidents::services::coordinate_resolver::is_valid_pair(
        latitude, longitude,
    ) {
        return Err(AppError::BadRequest("Invalid coordinates".to_string()));
    }

    let enriched = state.geocoder.resolve(latitude, longitude).await;

    Ok(Json(ConvertLocationResponse {
        status: "success".to_string(),
        place_name: enriched.address.place_name,
        full_address: enriched.address.full_address,
        nearest_landmark: enriched.address.nearest_landmark,
        area: enriched.address.area,
        city: enriched.address.city,
        taluk: enriched.address.taluk,
        district: enriched.address.district,
        state: enriched.address.state,
        pincode: enriched.address.pincode,
        country: enriched.address.country,
        google_maps_link: enriched.maps_link,
    }))
}
