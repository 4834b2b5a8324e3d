use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};

use crate::core::error::{AppError, Result};
use crate::features::analytics::dtos::{AnalyticsQuery, AnalyticsResponse};
use crate::features::analytics::service::AnalyticsService;
use crate::features::auth::model::AuthenticatedUser;

#[derive(Clone)]
pub struct AnalyticsState {
    pub analytics_service: Arc<AnalyticsService>,
}

/// Admin reporting rollups, optionally narrowed to one month
#[utoipa::path(
    get,
    path = "/api/analytics",
    params(AnalyticsQuery),
    responses(
        (status = 200, description = "Aggregated counts", body = AnalyticsResponse),
        (status = 403, description = "Caller is not an admin")
    ),
    security(("bearer_auth" = [])),
    tag = "analytics"
)]
pub async fn get_analytics(
    State(state): State<AnalyticsState>,
    user: AuthenticatedUser,
    Query(query): Query<AnalyticsQuery>,
) -> Result<impl IntoResponse> {
    if !user.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    let summary = state
        .analytics_service
        .summarize(query.month.as_deref(), query.year.as_deref())
        .await?;
    Ok(Json(summary))
}
