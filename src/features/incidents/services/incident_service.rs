use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::core::error::{AppError, Result};
use crate::features::incidents::models::{
    Incident, IncidentCategory, IncidentStatus, NewIncident,
};

/// Optional admin-side listing filters; unset fields do not constrain
#[derive(Debug, Default)]
pub struct IncidentFilters {
    pub status: Option<IncidentStatus>,
    pub category: Option<IncidentCategory>,
    pub department: Option<String>,
    pub user_id: Option<String>,
    pub state: Option<String>,
    pub taluk: Option<String>,
}

/// Persistence layer for incidents
pub struct IncidentService {
    pool: SqlitePool,
}

impl IncidentService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, new: NewIncident) -> Result<Incident> {
        let result = sqlx::query(
            r#"
            INSERT INTO incidents (
                title, description, category, location, latitude, longitude,
                image_url, user_id, status, place_name, full_address,
                nearest_landmark, area, city, taluk, district, state, pincode,
                country, maps_link, photo_analysis
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, 'Reported', ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.category.to_string())
        .bind(&new.location)
        .bind(new.latitude)
        .bind(new.longitude)
        .bind(&new.image_url)
        .bind(&new.user_id)
        .bind(&new.address.place_name)
        .bind(&new.address.full_address)
        .bind(&new.address.nearest_landmark)
        .bind(&new.address.area)
        .bind(&new.address.city)
        .bind(&new.address.taluk)
        .bind(&new.address.district)
        .bind(&new.address.state)
        .bind(&new.address.pincode)
        .bind(&new.address.country)
        .bind(&new.maps_link)
        .bind(&new.photo_analysis)
        .execute(&self.pool)
        .await?;

        self.get_by_id(result.last_insert_rowid()).await
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Incident> {
        sqlx::query_as::<_, Incident>("SELECT * FROM incidents WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Incident not found".to_string()))
    }

    pub async fn list(&self, filters: &IncidentFilters) -> Result<Vec<Incident>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT * FROM incidents WHERE 1=1");

        if let Some(status) = filters.status {
            query.push(" AND status = ").push_bind(status.to_string());
        }
        if let Some(category) = filters.category {
            query.push(" AND category = ").push_bind(category.to_string());
        }
        if let Some(department) = &filters.department {
            query.push(" AND department = ").push_bind(department.clone());
        }
        if let Some(user_id) = &filters.user_id {
            query.push(" AND user_id = ").push_bind(user_id.clone());
        }
        if let Some(state) = &filters.state {
            query.push(" AND state = ").push_bind(state.clone());
        }
        if let Some(taluk) = &filters.taluk {
            query.push(" AND taluk = ").push_bind(taluk.clone());
        }
        query.push(" ORDER BY created_at DESC, id DESC");

        Ok(query
            .build_query_as::<Incident>()
            .fetch_all(&self.pool)
            .await?)
    }

    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Incident>> {
        Ok(sqlx::query_as::<_, Incident>(
            "SELECT * FROM incidents WHERE user_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?)
    }

    /// Candidates for the nearby query: unresolved incidents with a fix
    pub async fn list_active_with_coordinates(&self) -> Result<Vec<Incident>> {
        Ok(sqlx::query_as::<_, Incident>(
            r#"
            SELECT * FROM incidents
            WHERE latitude IS NOT NULL AND longitude IS NOT NULL
              AND status != 'Resolved'
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    pub async fn update_status(
        &self,
        id: i64,
        status: IncidentStatus,
        department: Option<String>,
    ) -> Result<Incident> {
        let result = sqlx::query(
            r#"
            UPDATE incidents
            SET status = ?, department = ?, updated_at = datetime('now')
            WHERE id = ?
            "#,
        )
        .bind(status.to_string())
        .bind(&department)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Incident not found".to_string()));
        }
        self.get_by_id(id).await
    }
}
