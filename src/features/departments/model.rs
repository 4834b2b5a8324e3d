use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

/// A responder department incidents can be routed to
#[derive(Debug, Clone, FromRow, Serialize, ToSchema)]
pub struct Department {
    pub id: i64,
    pub name: String,
}
