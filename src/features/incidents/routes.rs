use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::incidents::handlers::{self, IncidentsState};

/// Ingestion and read endpoints (no auth required)
pub fn public_routes(state: IncidentsState) -> Router {
    Router::new()
        .route(
            "/api/incidents",
            post(handlers::submit_incident).get(handlers::list_incidents),
        )
        .route("/api/incidents/nearby", get(handlers::nearby_incidents))
        .route("/api/incidents/{id}", get(handlers::get_incident))
        .route(
            "/api/incidents/{id}/location",
            get(handlers::get_incident_location),
        )
        .route(
            "/api/users/{user_id}/incidents",
            get(handlers::list_user_incidents),
        )
        .route("/api/location/convert", post(handlers::convert_location))
        .with_state(state)
}

/// Endpoints that require an authenticated caller
pub fn protected_routes(state: IncidentsState) -> Router {
    Router::new()
        .route(
            "/api/incidents/role-based",
            get(handlers::role_based_incidents),
        )
        .route(
            "/api/incidents/{id}/status",
            patch(handlers::update_incident_status),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::incidents::models::{AddressBundle, IncidentCategory, NewIncident};
    use crate::features::incidents::providers::{
        DescriptionProviderChain, GeocodeProviderChain,
    };
    use crate::features::incidents::services::{EnrichmentService, IncidentService};
    use crate::modules::storage::LocalUploadStore;
    use crate::shared::test_helpers::{test_pool, with_admin_auth, with_citizen_auth};
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use std::time::Duration;

    struct Fixture {
        state: IncidentsState,
        _dir: tempfile::TempDir,
    }

    async fn fixture() -> Fixture {
        let incidents = Arc::new(IncidentService::new(test_pool().await));
        let dir = tempfile::tempdir().unwrap();
        let uploads = Arc::new(LocalUploadStore::new(dir.path()));
        uploads.init().await.unwrap();

        let geocoder = Arc::new(GeocodeProviderChain::new(
            Vec::new(),
            Duration::from_secs(1),
        ));
        let describer = Arc::new(DescriptionProviderChain::new(
            Vec::new(),
            Duration::from_secs(1),
        ));
        let enrichment = Arc::new(EnrichmentService::new(
            incidents.clone(),
            geocoder.clone(),
            describer,
            uploads,
        ));

        Fixture {
            state: IncidentsState {
                enrichment,
                incidents,
                geocoder,
            },
            _dir: dir,
        }
    }

    fn new_incident(user_id: &str, latitude: Option<f64>, longitude: Option<f64>) -> NewIncident {
        NewIncident {
            title: "Street flooding".to_string(),
            description: None,
            category: IncidentCategory::Flood,
            location: "Rajajinagar".to_string(),
            latitude,
            longitude,
            image_url: "/uploads/flood.jpg".to_string(),
            user_id: user_id.to_string(),
            address: AddressBundle {
                state: "Karnataka".to_string(),
                taluk: "Bangalore North".to_string(),
                ..Default::default()
            },
            maps_link: String::new(),
            photo_analysis: "Flooding situation visible.".to_string(),
        }
    }

    fn report_form() -> MultipartForm {
        MultipartForm::new()
            .add_text("title", "Fire near the market")
            .add_text("category", "Fire")
            .add_text("description", "Thick smoke")
            .add_text("location", "12.9716, 77.5946")
            .add_part(
                "image",
                Part::bytes(vec![0xff, 0xd8, 0xff, 0xd9])
                    .file_name("scene.jpg")
                    .mime_type("image/jpeg"),
            )
    }

    #[tokio::test]
    async fn submission_without_an_image_is_rejected() {
        let fx = fixture().await;
        let server = TestServer::new(public_routes(fx.state.clone())).unwrap();

        let response = server
            .post("/api/incidents")
            .multipart(
                MultipartForm::new()
                    .add_text("title", "Fire")
                    .add_text("category", "Fire"),
            )
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["status"], "error");
        assert_eq!(
            body["message"],
            "Camera image is required. Report cannot be accepted."
        );
        assert!(fx.state.incidents.list_by_user("anonymous").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn submission_is_enriched_and_returned_flat() {
        let fx = fixture().await;
        let server = TestServer::new(public_routes(fx.state.clone())).unwrap();

        let response = server.post("/api/incidents").multipart(report_form()).await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let body: Value = response.json();
        assert_eq!(body["status"], "success");
        assert_eq!(
            body["google_maps_link"],
            "https://www.google.com/maps?q=12.9716,77.5946"
        );
        assert!(body["photo_analysis"]
            .as_str()
            .unwrap()
            .contains("Fire incident detected"));
        assert_eq!(body["user_description"], "Thick smoke");
        assert!(body["reported_datetime"].as_str().unwrap().contains("M"));
    }

    #[tokio::test]
    async fn unknown_category_is_rejected() {
        let fx = fixture().await;
        let server = TestServer::new(public_routes(fx.state)).unwrap();

        let form = MultipartForm::new()
            .add_text("title", "Landslide on the ghat road")
            .add_text("category", "Landslide")
            .add_part(
                "image",
                Part::bytes(vec![0xff, 0xd8])
                    .file_name("scene.jpg")
                    .mime_type("image/jpeg"),
            );
        let response = server.post("/api/incidents").multipart(form).await;

        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn nearby_requires_coordinates() {
        let fx = fixture().await;
        let server = TestServer::new(public_routes(fx.state)).unwrap();

        let response = server.get("/api/incidents/nearby").await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["message"], "Latitude and longitude required");
    }

    #[tokio::test]
    async fn nearby_returns_closest_first_with_distance() {
        let fx = fixture().await;
        fx.state
            .incidents
            .create(new_incident("u1", Some(12.9716), Some(77.5946)))
            .await
            .unwrap();
        fx.state
            .incidents
            .create(new_incident("u1", Some(12.9800), Some(77.5946)))
            .await
            .unwrap();
        let server = TestServer::new(public_routes(fx.state)).unwrap();

        let response = server
            .get("/api/incidents/nearby")
            .add_query_param("latitude", 12.9716)
            .add_query_param("longitude", 77.5946)
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        let rows = body.as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["distance"], 0.0);
        assert!(rows[1]["distance"].as_f64().unwrap() > 500.0);
    }

    #[tokio::test]
    async fn unknown_incident_is_not_found() {
        let fx = fixture().await;
        let server = TestServer::new(public_routes(fx.state)).unwrap();

        server.get("/api/incidents/999").await.assert_status_not_found();
        server
            .get("/api/incidents/999/location")
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn location_view_exposes_the_bundle_alone() {
        let fx = fixture().await;
        let created = fx
            .state
            .incidents
            .create(new_incident("u1", Some(12.9716), Some(77.5946)))
            .await
            .unwrap();
        let server = TestServer::new(public_routes(fx.state)).unwrap();

        let response = server
            .get(&format!("/api/incidents/{}/location", created.id))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "success");
        assert_eq!(body["state"], "Karnataka");
        // Stored link is empty, so it is derived from the coordinates
        assert_eq!(
            body["google_maps_link"],
            "https://www.google.com/maps?q=12.9716,77.5946"
        );
    }

    #[tokio::test]
    async fn status_update_requires_an_admin() {
        let fx = fixture().await;
        let created = fx
            .state
            .incidents
            .create(new_incident("u1", None, None))
            .await
            .unwrap();
        let server =
            TestServer::new(with_citizen_auth(protected_routes(fx.state))).unwrap();

        let response = server
            .patch(&format!("/api/incidents/{}/status", created.id))
            .json(&json!({ "status": "Verified" }))
            .await;

        response.assert_status_forbidden();
    }

    #[tokio::test]
    async fn status_outside_the_validity_set_is_rejected() {
        let fx = fixture().await;
        let created = fx
            .state
            .incidents
            .create(new_incident("u1", None, None))
            .await
            .unwrap();
        let server = TestServer::new(with_admin_auth(protected_routes(fx.state))).unwrap();

        let response = server
            .patch(&format!("/api/incidents/{}/status", created.id))
            .json(&json!({ "status": "Closed" }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["message"], "Invalid status");
    }

    #[tokio::test]
    async fn admin_can_write_any_member_of_the_validity_set() {
        let fx = fixture().await;
        let created = fx
            .state
            .incidents
            .create(new_incident("u1", None, None))
            .await
            .unwrap();
        let server = TestServer::new(with_admin_auth(protected_routes(fx.state))).unwrap();

        let response = server
            .patch(&format!("/api/incidents/{}/status", created.id))
            .json(&json!({ "status": "In Progress", "department": "Fire" }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "In Progress");
        assert_eq!(body["department"], "Fire");
    }

    #[tokio::test]
    async fn citizen_with_no_reports_sees_the_empty_envelope() {
        let fx = fixture().await;
        let server =
            TestServer::new(with_citizen_auth(protected_routes(fx.state))).unwrap();

        let response = server.get("/api/incidents/role-based").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "empty");
        assert_eq!(body["message"], "No issues reported yet.");
        assert_eq!(body["role"], "user");
    }

    #[tokio::test]
    async fn citizen_sees_only_their_own_reports() {
        let fx = fixture().await;
        // Test citizen is user id 2
        fx.state
            .incidents
            .create(new_incident("2", Some(12.9716), Some(77.5946)))
            .await
            .unwrap();
        fx.state
            .incidents
            .create(new_incident("someone-else", None, None))
            .await
            .unwrap();
        let server =
            TestServer::new(with_citizen_auth(protected_routes(fx.state))).unwrap();

        let response = server.get("/api/incidents/role-based").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "success");
        assert_eq!(body["user_visible_reports"].as_array().unwrap().len(), 1);
        let report = &body["user_visible_reports"][0];
        assert_eq!(report["issue_details"]["user_id"], "2");
        assert!(report.get("reported_datetime").is_none());
    }

    #[tokio::test]
    async fn admin_view_carries_heatmap_and_filters() {
        let fx = fixture().await;
        fx.state
            .incidents
            .create(new_incident("u1", Some(12.9716), Some(77.5946)))
            .await
            .unwrap();
        fx.state
            .incidents
            .create(new_incident("u2", None, None))
            .await
            .unwrap();
        let server = TestServer::new(with_admin_auth(protected_routes(fx.state))).unwrap();

        let response = server.get("/api/incidents/role-based").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["role"], "admin");
        assert_eq!(body["total_count"], 2);
        assert_eq!(body["admin_heatmap_data"].as_array().unwrap().len(), 1);
        assert_eq!(body["admin_filters"]["passes_filter"], true);
        assert!(body["reports"][0]["reported_datetime"].is_string());
    }

    #[tokio::test]
    async fn admin_filter_that_matches_nothing_fails_the_filter_flag() {
        let fx = fixture().await;
        fx.state
            .incidents
            .create(new_incident("u1", None, None))
            .await
            .unwrap();
        let server = TestServer::new(with_admin_auth(protected_routes(fx.state))).unwrap();

        let response = server
            .get("/api/incidents/role-based")
            .add_query_param("selected_state", "Kerala")
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["admin_filters"]["passes_filter"], false);
        assert_eq!(body["total_count"], 0);
    }

    #[tokio::test]
    async fn list_filters_by_category_and_user() {
        let fx = fixture().await;
        fx.state
            .incidents
            .create(new_incident("u1", None, None))
            .await
            .unwrap();
        let server = TestServer::new(public_routes(fx.state)).unwrap();

        let all: Value = server.get("/api/incidents").await.json();
        assert_eq!(all.as_array().unwrap().len(), 1);

        let fires: Value = server
            .get("/api/incidents")
            .add_query_param("category", "Fire")
            .await
            .json();
        assert!(fires.as_array().unwrap().is_empty());

        let mine: Value = server.get("/api/users/u1/incidents").await.json();
        assert_eq!(mine.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn malformed_json_body_gets_the_flat_error_shape() {
        let fx = fixture().await;
        let server = TestServer::new(public_routes(fx.state)).unwrap();

        let response = server
            .post("/api/location/convert")
            .add_header(
                axum::http::header::CONTENT_TYPE,
                axum::http::HeaderValue::from_static("application/json"),
            )
            .bytes(axum::body::Bytes::from_static(b"{not json"))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["status"], "error");
        assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));
    }

    #[tokio::test]
    async fn convert_location_requires_coordinates() {
        let fx = fixture().await;
        let server = TestServer::new(public_routes(fx.state)).unwrap();

        let response = server.post("/api/location/convert").json(&json!({})).await;
        response.assert_status_bad_request();

        let response = server
            .post("/api/location/convert")
            .json(&json!({ "latitude": 12.9716, "longitude": 77.5946 }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "success");
        assert_eq!(
            body["google_maps_link"],
            "https://www.google.com/maps?q=12.9716,77.5946"
        );
    }
}
