// src/store/postgres.rs
//! Postgres-backed project store. The full record lives in a JSONB column;
//! id, status and timestamps are mirrored into columns for filtering and
//! ordering.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::types::Json;
use sqlx::PgPool;

use super::{ProjectStore, StoreError};
use crate::models::{ProjectStatus, ProjectUpdate, VideoProject};

#[derive(Clone)]
pub struct PgProjectStore {
    pool: PgPool,
}

impl PgProjectStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn write<'e, E>(&self, project: &VideoProject, executor: E) -> Result<(), StoreError>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO video_projects (id, status, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                status = EXCLUDED.status,
                data = EXCLUDED.data,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&project.id)
        .bind(project.status.as_str())
        .bind(Json(project))
        .bind(project.created_at)
        .bind(project.updated_at)
        .execute(executor)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ProjectStore for PgProjectStore {
    async fn upsert(&self, mut project: VideoProject) -> Result<VideoProject, StoreError> {
        project.updated_at = Utc::now();
        self.write(&project, &self.pool).await?;
        tracing::debug!("💾 Saved project {} ({})", project.id, project.status);
        Ok(project)
    }

    async fn replace_if_status(
        &self,
        mut project: VideoProject,
        expected: ProjectStatus,
    ) -> Result<Option<VideoProject>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(String,)> = sqlx::query_as("SELECT status FROM video_projects WHERE id = $1 FOR UPDATE")
            .bind(&project.id)
            .fetch_optional(&mut *tx)
            .await?;

        match row {
            Some((status,)) if status == expected.as_str() => {}
            _ => return Ok(None),
        }

        project.updated_at = Utc::now();
        self.write(&project, &mut *tx).await?;
        tx.commit().await?;

        Ok(Some(project))
    }

    async fn update(&self, id: &str, update: ProjectUpdate) -> Result<Option<VideoProject>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(Json<VideoProject>,)> =
            sqlx::query_as("SELECT data FROM video_projects WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;

        let Some((Json(mut project),)) = row else {
            return Ok(None);
        };

        project.apply(update, Utc::now());
        self.write(&project, &mut *tx).await?;
        tx.commit().await?;

        Ok(Some(project))
    }

    async fn get(&self, id: &str) -> Result<Option<VideoProject>, StoreError> {
        let row: Option<(Json<VideoProject>,)> = sqlx::query_as("SELECT data FROM video_projects WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|(Json(project),)| project))
    }

    async fn list(&self, status: Option<ProjectStatus>) -> Result<Vec<VideoProject>, StoreError> {
        let rows: Vec<(Json<VideoProject>,)> = sqlx::query_as(
            r#"
            SELECT data FROM video_projects
            WHERE $1::TEXT IS NULL OR status = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(status.map(|s| s.as_str()))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(Json(project),)| project).collect())
    }

    async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM video_projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM video_projects").execute(&self.pool).await?;
        tracing::info!("🗑️ Cleared {} projects", result.rows_affected());
        Ok(result.rows_affected())
    }
}
