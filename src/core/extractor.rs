use axum::{
    body::Body,
    extract::{rejection::JsonRejection, FromRequest, FromRequestParts, Request},
    http::request::Parts,
    response::{IntoResponse, Response},
    Json,
};
use serde::de::DeserializeOwned;

use crate::core::error::AppError;
use crate::features::auth::model::AuthenticatedUser;

/// JSON extractor whose rejections render as the API's flat
/// `{"status":"error","message"}` body instead of axum's plain-text default.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request<Body>, state: &S) -> Result<Self, Self::Rejection> {
        Json::<T>::from_request(req, state)
            .await
            .map(|Json(dto)| Self(dto))
            .map_err(|rejection| AppError::BadRequest(rejection_message(rejection)).into_response())
    }
}

fn rejection_message(rejection: JsonRejection) -> String {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Request body must be JSON (Content-Type: application/json)".to_string()
        }
        other => format!("Invalid request body: {other}"),
    }
}

/// Caller identity resolved by the auth middleware and stashed in request
/// extensions. Extracting it on a route the middleware does not cover is a
/// wiring mistake, surfaced as 401 rather than a panic.
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reporter() -> AuthenticatedUser {
        AuthenticatedUser {
            id: 5,
            username: "reporter".to_string(),
            role: "user".to_string(),
        }
    }

    #[tokio::test]
    async fn identity_is_read_from_request_extensions() {
        let mut request = axum::http::Request::builder().body(()).unwrap();
        request.extensions_mut().insert(reporter());
        let (mut parts, _) = request.into_parts();

        let user = AuthenticatedUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(user.id, 5);
        assert_eq!(user.role, "user");
    }

    #[tokio::test]
    async fn missing_identity_is_unauthorized() {
        let request = axum::http::Request::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let err = AuthenticatedUser::from_request_parts(&mut parts, &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }
}
