// src/store/memory.rs
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{ProjectStore, StoreError};
use crate::models::{ProjectStatus, ProjectUpdate, VideoProject};

/// Process-local store used when no database is configured
#[derive(Clone, Default)]
pub struct InMemoryProjectStore {
    projects: Arc<RwLock<Vec<VideoProject>>>,
}

impl InMemoryProjectStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProjectStore for InMemoryProjectStore {
    async fn upsert(&self, mut project: VideoProject) -> Result<VideoProject, StoreError> {
        project.updated_at = Utc::now();
        let mut projects = self.projects.write().await;
        match projects.iter_mut().find(|p| p.id == project.id) {
            Some(existing) => *existing = project.clone(),
            None => projects.insert(0, project.clone()),
        }
        Ok(project)
    }

    async fn replace_if_status(
        &self,
        mut project: VideoProject,
        expected: ProjectStatus,
    ) -> Result<Option<VideoProject>, StoreError> {
        let mut projects = self.projects.write().await;
        let Some(existing) = projects.iter_mut().find(|p| p.id == project.id) else {
            return Ok(None);
        };
        if existing.status != expected {
            return Ok(None);
        }
        project.updated_at = Utc::now();
        *existing = project.clone();
        Ok(Some(project))
    }

    async fn update(&self, id: &str, update: ProjectUpdate) -> Result<Option<VideoProject>, StoreError> {
        let mut projects = self.projects.write().await;
        let Some(project) = projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        project.apply(update, Utc::now());
        Ok(Some(project.clone()))
    }

    async fn get(&self, id: &str) -> Result<Option<VideoProject>, StoreError> {
        let projects = self.projects.read().await;
        Ok(projects.iter().find(|p| p.id == id).cloned())
    }

    async fn list(&self, status: Option<ProjectStatus>) -> Result<Vec<VideoProject>, StoreError> {
        let projects = self.projects.read().await;
        Ok(projects
            .iter()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .cloned()
            .collect())
    }

    async fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut projects = self.projects.write().await;
        let before = projects.len();
        projects.retain(|p| p.id != id);
        Ok(projects.len() != before)
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        let mut projects = self.projects.write().await;
        let removed = projects.len() as u64;
        projects.clear();
        Ok(removed)
    }
}
