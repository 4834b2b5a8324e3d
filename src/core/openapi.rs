use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::analytics::{dtos as analytics_dtos, handler as analytics_handler};
use crate::features::auth;
use crate::features::departments::{handler as departments_handler, model as departments_model};
use crate::features::incidents::{dtos as incidents_dtos, handlers as incidents_handlers};
use crate::shared::types::{ErrorResponse, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::signup,
        auth::handlers::login,
        auth::handlers::admin_login,
        auth::handlers::me,
        auth::handlers::logout,
        // Incidents
        incidents_handlers::submit_incident,
        incidents_handlers::list_incidents,
        incidents_handlers::nearby_incidents,
        incidents_handlers::role_based_incidents,
        incidents_handlers::get_incident,
        incidents_handlers::get_incident_location,
        incidents_handlers::list_user_incidents,
        incidents_handlers::update_incident_status,
        incidents_handlers::convert_location,
        // Departments
        departments_handler::list_departments,
        // Analytics
        analytics_handler::get_analytics,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            MessageResponse,
            // Auth
            auth::model::AuthenticatedUser,
            auth::dtos::SignupDto,
            auth::dtos::LoginDto,
            auth::dtos::AdminLoginDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::MeResponseDto,
            // Incidents
            incidents_dtos::SubmitIncidentResponse,
            incidents_dtos::IncidentResponse,
            incidents_dtos::LocationDetailsResponse,
            incidents_dtos::NearbyIncidentResponse,
            incidents_dtos::UpdateStatusDto,
            incidents_dtos::ConvertLocationDto,
            incidents_dtos::ConvertLocationResponse,
            incidents_dtos::RoleBasedReport,
            incidents_dtos::ReportLocationDetails,
            incidents_dtos::ReportIssueDetails,
            incidents_dtos::UserRoleResponse,
            incidents_dtos::AdminRoleResponse,
            incidents_dtos::AdminFilters,
            incidents_dtos::HeatmapPoint,
            // Departments
            departments_model::Department,
            // Analytics
            analytics_dtos::AnalyticsResponse,
            analytics_dtos::CategoryCount,
            analytics_dtos::AreaCount,
            analytics_dtos::StatusCount,
            analytics_dtos::MonthlyCount,
        )
    ),
    tags(
        (name = "auth", description = "Authentication endpoints"),
        (name = "incidents", description = "Incident submission, enrichment, and retrieval"),
        (name = "location", description = "Standalone coordinate-to-address conversion"),
        (name = "departments", description = "Responder departments"),
        (name = "analytics", description = "Admin reporting rollups"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Incident Core API",
        version = "0.1.0",
        description = "Citizen emergency report enrichment pipeline",
    )
)]
pub struct ApiDoc;

/// Adds the opaque bearer token scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new().scheme(HttpAuthScheme::Bearer).build(),
                ),
            );
        }
    }
}
