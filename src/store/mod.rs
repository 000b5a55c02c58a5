// src/store/mod.rs
//! Project persistence. Records are keyed by project id; writes replace by
//! id and stamp `updated_at`, partial updates merge field by field.

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{ProjectStatus, ProjectUpdate, VideoProject};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryProjectStore;
pub use postgres::PgProjectStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Insert a new project (newest first) or replace the one with the same id
    async fn upsert(&self, project: VideoProject) -> Result<VideoProject, StoreError>;

    /// Replace the stored project only while its status is still `expected`.
    /// `None` when the project is gone or has moved on; nothing is written then.
    async fn replace_if_status(
        &self,
        project: VideoProject,
        expected: ProjectStatus,
    ) -> Result<Option<VideoProject>, StoreError>;

    /// Merge `update` into an existing project; `None` when the id is unknown
    async fn update(&self, id: &str, update: ProjectUpdate) -> Result<Option<VideoProject>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<VideoProject>, StoreError>;

    /// All projects, newest first, optionally filtered by status
    async fn list(&self, status: Option<ProjectStatus>) -> Result<Vec<VideoProject>, StoreError>;

    /// Returns whether a project was removed
    async fn remove(&self, id: &str) -> Result<bool, StoreError>;

    /// Remove every project and return how many were removed
    async fn clear(&self) -> Result<u64, StoreError>;
}
