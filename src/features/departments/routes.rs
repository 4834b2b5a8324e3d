use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::departments::handler::{self, DepartmentsState};
use crate::features::departments::service::DepartmentService;

pub fn routes(department_service: Arc<DepartmentService>) -> Router {
    Router::new()
        .route("/api/departments", get(handler::list_departments))
        .with_state(DepartmentsState { department_service })
}
