use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use crate::core::error::Result;
use crate::features::analytics::dtos::{
    AnalyticsResponse, AreaCount, CategoryCount, MonthlyCount, StatusCount,
};

/// A month/year pair normalized for strftime comparison
#[derive(Debug, Clone)]
struct PeriodFilter {
    month: String,
    year: String,
}

/// Aggregated reporting rollups for the admin dashboard
pub struct AnalyticsService {
    pool: SqlitePool,
}

impl AnalyticsService {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn summarize(
        &self,
        month: Option<&str>,
        year: Option<&str>,
    ) -> Result<AnalyticsResponse> {
        let period = match (month, year) {
            (Some(m), Some(y)) => Some(PeriodFilter {
                month: format!("{:0>2}", m.trim()),
                year: y.trim().to_string(),
            }),
            _ => None,
        };

        Ok(AnalyticsResponse {
            by_category: self
                .grouped_counts("category", &period)
                .await?
                .into_iter()
                .map(|(category, count)| CategoryCount { category, count })
                .collect(),
            top_areas: self.top_areas(&period).await?,
            by_status: self
                .grouped_counts("status", &period)
                .await?
                .into_iter()
                .map(|(status, count)| StatusCount { status, count })
                .collect(),
            monthly: self.monthly().await?,
        })
    }

    async fn grouped_counts(
        &self,
        column: &str,
        period: &Option<PeriodFilter>,
    ) -> Result<Vec<(String, i64)>> {
        // column is one of our own identifiers, never caller input
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {column}, COUNT(*) as count FROM incidents WHERE 1=1"
        ));
        push_period(&mut query, period);
        query.push(format!(" GROUP BY {column}"));

        Ok(query
            .build_query_as::<(String, i64)>()
            .fetch_all(&self.pool)
            .await?)
    }

    async fn top_areas(&self, period: &Option<PeriodFilter>) -> Result<Vec<AreaCount>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new("SELECT location, COUNT(*) as count FROM incidents WHERE 1=1");
        push_period(&mut query, period);
        query.push(" GROUP BY location ORDER BY count DESC LIMIT 10");

        Ok(query
            .build_query_as::<(String, i64)>()
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(|(location, count)| AreaCount { location, count })
            .collect())
    }

    async fn monthly(&self) -> Result<Vec<MonthlyCount>> {
        Ok(sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT strftime('%Y-%m', created_at) as month, COUNT(*) as count
            FROM incidents
            GROUP BY month ORDER BY month DESC LIMIT 12
            "#,
        )
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .map(|(month, count)| MonthlyCount { month, count })
        .collect())
    }
}

fn push_period(query: &mut QueryBuilder<Sqlite>, period: &Option<PeriodFilter>) {
    if let Some(p) = period {
        query
            .push(" AND strftime('%m', created_at) = ")
            .push_bind(p.month.clone())
            .push(" AND strftime('%Y', created_at) = ")
            .push_bind(p.year.clone());
    }
}
