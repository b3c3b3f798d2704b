//! Read access to the projects database.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Connection, FromRow, PgConnection};

use crate::config::DatabaseSettings;
use crate::error::StoreError;
use crate::models::{LegalEntity, Project, UserProject};

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Projects linked to `user_email`, newest first.
    async fn projects_for_user(&self, user_email: &str) -> Result<Vec<UserProject>, StoreError>;
}

const USER_PROJECTS_QUERY: &str = r#"
    SELECT
        p.id AS project_id,
        p.title,
        p.description,
        p.status,
        p.start_date,
        p.end_date,
        p.budget::float8 AS budget,
        up.role AS user_role,
        le.id AS legal_entity_id,
        le.name AS legal_entity_name,
        le.inn,
        le.kpp,
        le.ogrn,
        le.legal_address,
        le.actual_address,
        le.director_name,
        le.phone AS legal_entity_phone,
        le.email AS legal_entity_email
    FROM user_projects up
    JOIN projects p ON up.project_id = p.id
    LEFT JOIN legal_entities le ON p.legal_entity_id = le.id
    WHERE up.user_email = $1
    ORDER BY p.created_at DESC
"#;

/// One row of the user/projects/legal-entities join.
#[derive(Debug, Clone, FromRow, Default)]
pub struct UserProjectRow {
    pub project_id: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub budget: Option<f64>,
    pub user_role: Option<String>,
    pub legal_entity_id: Option<i32>,
    pub legal_entity_name: Option<String>,
    pub inn: Option<String>,
    pub kpp: Option<String>,
    pub ogrn: Option<String>,
    pub legal_address: Option<String>,
    pub actual_address: Option<String>,
    pub director_name: Option<String>,
    pub legal_entity_phone: Option<String>,
    pub legal_entity_email: Option<String>,
}

impl From<UserProjectRow> for UserProject {
    fn from(row: UserProjectRow) -> Self {
        let legal_entity = row.legal_entity_id.map(|id| LegalEntity {
            id,
            name: row.legal_entity_name,
            inn: row.inn,
            kpp: row.kpp,
            ogrn: row.ogrn,
            legal_address: row.legal_address,
            actual_address: row.actual_address,
            director_name: row.director_name,
            phone: row.legal_entity_phone,
            email: row.legal_entity_email,
        });

        UserProject {
            project: Project {
                id: row.project_id,
                title: row.title,
                description: row.description,
                status: row.status,
                start_date: row.start_date.map(|d| d.to_string()),
                end_date: row.end_date.map(|d| d.to_string()),
                // A zero budget is reported as unknown.
                budget: row.budget.filter(|b| *b != 0.0),
                user_role: row.user_role,
            },
            legal_entity,
        }
    }
}

/// Opens one connection per lookup; no pool is kept between invocations.
pub struct PgProjectStore {
    database_url: String,
}

impl PgProjectStore {
    pub fn new(settings: &DatabaseSettings) -> Self {
        PgProjectStore {
            database_url: settings.database_url.clone(),
        }
    }
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn projects_for_user(&self, user_email: &str) -> Result<Vec<UserProject>, StoreError> {
        let mut conn = PgConnection::connect(&self.database_url).await?;

        let rows = sqlx::query_as::<_, UserProjectRow>(USER_PROJECTS_QUERY)
            .bind(user_email)
            .fetch_all(&mut conn)
            .await;

        // Close on both paths; a failed query must not leave the session open.
        if let Err(e) = conn.close().await {
            tracing::warn!(error = %e, "failed to close database connection");
        }

        Ok(rows?.into_iter().map(UserProject::from).collect())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Canned rows, already in the order the query would return them.
    pub struct StaticProjectStore {
        pub rows: Vec<UserProjectRow>,
        pub fail: bool,
    }

    #[async_trait]
    impl ProjectStore for StaticProjectStore {
        async fn projects_for_user(&self, _user_email: &str) -> Result<Vec<UserProject>, StoreError> {
            if self.fail {
                return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
            }
            Ok(self.rows.iter().cloned().map(UserProject::from).collect())
        }
    }
}
