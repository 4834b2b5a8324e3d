use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::analytics::handler::{self, AnalyticsState};
use crate::features::analytics::service::AnalyticsService;

pub fn routes(analytics_service: Arc<AnalyticsService>) -> Router {
    Router::new()
        .route("/api/analytics", get(handler::get_analytics))
        .with_state(AnalyticsState { analytics_service })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{test_pool, with_admin_auth, with_citizen_auth};
    use axum_test::TestServer;
    use serde_json::Value;

    #[tokio::test]
    async fn analytics_is_admin_only() {
        let service = Arc::new(AnalyticsService::new(test_pool().await));

        let citizen = TestServer::new(with_citizen_auth(routes(service.clone()))).unwrap();
        citizen.get("/api/analytics").await.assert_status_forbidden();

        let admin = TestServer::new(with_admin_auth(routes(service))).unwrap();
        let response = admin.get("/api/analytics").await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert!(body["byCategory"].is_array());
        assert!(body["topAreas"].is_array());
        assert!(body["byStatus"].is_array());
        assert!(body["monthly"].is_array());
    }
}
