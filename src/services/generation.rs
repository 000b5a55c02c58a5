// Background generation of new video projects

use std::sync::Arc;
use thiserror::Error;

use crate::models::{ProjectStatus, VideoProject};
use crate::orchestrator::ContentOrchestrator;
use crate::store::{ProjectStore, StoreError};

/// Shortest prompt accepted from the create form
pub const MIN_PROMPT_CHARS: usize = 10;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("{0}")]
    InvalidPrompt(String),
    #[error("Project not found: {0}")]
    NotFound(String),
    #[error("Only failed projects can be resubmitted (status is {0})")]
    NotResubmittable(ProjectStatus),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Clone)]
pub struct GenerationService {
    orchestrator: ContentOrchestrator,
    store: Arc<dyn ProjectStore>,
}

impl GenerationService {
    pub fn new(orchestrator: ContentOrchestrator, store: Arc<dyn ProjectStore>) -> Self {
        Self { orchestrator, store }
    }

    /// Store a `generating` placeholder and generate its content in the background
    pub async fn start(&self, prompt: &str) -> Result<VideoProject, GenerationError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(GenerationError::InvalidPrompt("Prompt cannot be empty.".to_string()));
        }
        if prompt.chars().count() < MIN_PROMPT_CHARS {
            return Err(GenerationError::InvalidPrompt(
                "Prompt must be at least 10 characters long.".to_string(),
            ));
        }

        let project = self.store.upsert(VideoProject::generating(prompt)).await?;
        tracing::info!("📝 Created project {} for prompt '{}'", project.id, project.prompt);
        self.spawn(project.clone());
        Ok(project)
    }

    /// Re-run generation for a failed project under the same id
    pub async fn resubmit(&self, id: &str) -> Result<VideoProject, GenerationError> {
        let existing = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| GenerationError::NotFound(id.to_string()))?;
        if existing.status != ProjectStatus::Failed {
            return Err(GenerationError::NotResubmittable(existing.status));
        }

        let mut pending = existing;
        pending.status = ProjectStatus::Generating;
        pending.error = None;
        let project = self
            .store
            .replace_if_status(pending, ProjectStatus::Failed)
            .await?
            .ok_or_else(|| GenerationError::NotFound(id.to_string()))?;
        tracing::info!("🔁 Resubmitted project {}", project.id);
        self.spawn(project.clone());
        Ok(project)
    }

    fn spawn(&self, project: VideoProject) {
        let service = self.clone();
        tokio::spawn(async move {
            let id = project.id.clone();
            if let Err(e) = service.run(project).await {
                tracing::error!("Failed to store generation result for {}: {}", id, e);
            }
        });
    }

    /// Generate content for `project` and store it as `review` or `failed`.
    /// Returns `None` when the project was deleted or edited while generating;
    /// the stored record is left untouched then.
    pub async fn run(&self, project: VideoProject) -> Result<Option<VideoProject>, StoreError> {
        let finished = match self.orchestrator.generate_all(&project.prompt).await {
            Ok(content) => project.reviewable(content.bundle),
            Err(e) => {
                tracing::error!("❌ Generation failed for project {}: {}", project.id, e);
                project.failed(e.to_string())
            }
        };

        let id = finished.id.clone();
        let Some(saved) = self
            .store
            .replace_if_status(finished, ProjectStatus::Generating)
            .await?
        else {
            tracing::info!("Project {} was removed or edited before generation finished", id);
            return Ok(None);
        };
        tracing::info!("✅ Project {} is now {}", saved.id, saved.status);
        Ok(Some(saved))
    }
}
