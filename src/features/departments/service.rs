use sqlx::SqlitePool;

use crate::core::error::Result;
use crate::features::departments::model::Department;

pub struct DepartmentService {
    pool: SqlitePool,
}

impl DepartmentService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Department>> {
        Ok(
            sqlx::query_as::<_, Department>("SELECT * FROM departments ORDER BY name")
                .fetch_all(&self.pool)
                .await?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::test_pool;

    #[tokio::test]
    async fn seeded_departments_are_listed_alphabetically() {
        let service = DepartmentService::new(test_pool().await);

        let departments = service.list().await.unwrap();

        let names: Vec<&str> = departments.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Disaster Management", "Electricity", "Fire", "Police"]
        );
    }
}
