// Video project records as stored and served to the dashboard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::{double_option, ContentBundle};

/// Lifecycle of a video project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    Idle,
    Generating,
    Review,
    Scheduled,
    Published,
    Failed,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Idle => "idle",
            ProjectStatus::Generating => "generating",
            ProjectStatus::Review => "review",
            ProjectStatus::Scheduled => "scheduled",
            ProjectStatus::Published => "published",
            ProjectStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(ProjectStatus::Idle),
            "generating" => Ok(ProjectStatus::Generating),
            "review" => Ok(ProjectStatus::Review),
            "scheduled" => Ok(ProjectStatus::Scheduled),
            "published" => Ok(ProjectStatus::Published),
            "failed" => Ok(ProjectStatus::Failed),
            other => Err(format!("Unknown project status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryboardScene {
    pub scene_number: u32,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_data_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoProject {
    pub id: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_data_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captions_srt: Option<String>,
    #[serde(default)]
    pub storyboard: Vec<StoryboardScene>,
    pub status: ProjectStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VideoProject {
    pub fn new_id() -> String {
        format!("proj_{}", Uuid::new_v4().simple())
    }

    /// Placeholder shown while generation runs
    pub fn generating(prompt: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Self::new_id(),
            prompt: prompt.to_string(),
            title: None,
            description: None,
            script: None,
            thumbnail_data_uri: None,
            captions_srt: None,
            storyboard: Vec::new(),
            status: ProjectStatus::Generating,
            scheduled_at: None,
            created_at: now,
            updated_at: now,
            error: None,
        }
    }

    /// The same project, ready for review with freshly generated content
    pub fn reviewable(&self, bundle: ContentBundle) -> Self {
        Self {
            title: bundle.title,
            description: bundle.description,
            script: bundle.script,
            thumbnail_data_uri: bundle.thumbnail_data_uri,
            captions_srt: bundle.captions_srt,
            storyboard: bundle.storyboard.unwrap_or_default(),
            status: ProjectStatus::Review,
            error: None,
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    /// The same project, marked failed with the generation error
    pub fn failed(&self, error: impl Into<String>) -> Self {
        Self {
            status: ProjectStatus::Failed,
            error: Some(error.into()),
            updated_at: Utc::now(),
            ..self.clone()
        }
    }

    pub fn scene(&self, scene_number: u32) -> Option<&StoryboardScene> {
        self.storyboard.iter().find(|scene| scene.scene_number == scene_number)
    }

    /// Merge the fields present in `update` and stamp `updated_at`
    pub fn apply(&mut self, update: ProjectUpdate, now: DateTime<Utc>) {
        if let Some(title) = update.title {
            self.title = Some(title);
        }
        if let Some(description) = update.description {
            self.description = Some(description);
        }
        if let Some(script) = update.script {
            self.script = Some(script);
        }
        if let Some(thumbnail) = update.thumbnail_data_uri {
            self.thumbnail_data_uri = Some(thumbnail);
        }
        if let Some(captions) = update.captions_srt {
            self.captions_srt = Some(captions);
        }
        if let Some(storyboard) = update.storyboard {
            self.storyboard = storyboard;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(scheduled_at) = update.scheduled_at {
            self.scheduled_at = scheduled_at;
        }
        if let Some(error) = update.error {
            self.error = error;
        }
        self.updated_at = now;
    }
}

/// A partial project record. Absent fields are left untouched; for
/// `scheduledAt` and `error` an explicit `null` clears the value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_data_uri: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captions_srt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storyboard: Option<Vec<StoryboardScene>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProjectStatus>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, deserialize_with = "double_option", skip_serializing_if = "Option::is_none")]
    pub error: Option<Option<String>>,
}
