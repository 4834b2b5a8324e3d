use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};

use crate::core::error::Result;
use crate::features::departments::model::Department;
use crate::features::departments::service::DepartmentService;

#[derive(Clone)]
pub struct DepartmentsState {
    pub department_service: Arc<DepartmentService>,
}

/// List responder departments
#[utoipa::path(
    get,
    path = "/api/departments",
    responses((status = 200, description = "All departments", body = [Department])),
    tag = "departments"
)]
pub async fn list_departments(
    State(state): State<DepartmentsState>,
) -> Result<impl IntoResponse> {
    let departments = state.department_service.list().await?;
    Ok(Json(departments))
}
