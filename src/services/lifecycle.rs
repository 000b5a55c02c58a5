// Review lifecycle: turning edits on the review screen into project updates

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::models::{ProjectStatus, ProjectUpdate, StoryboardScene, VideoProject};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LifecycleError {
    #[error("Published projects can no longer be edited")]
    AlreadyPublished,
    #[error("Please select a date and time to schedule.")]
    MissingSchedule,
    #[error("{0}")]
    Validation(String),
}

/// The editable fields of a project as submitted from the review screen
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEdits {
    pub title: String,
    pub description: String,
    pub script: String,
    #[serde(default)]
    pub captions_srt: Option<String>,
    #[serde(default)]
    pub thumbnail_data_uri: Option<String>,
    #[serde(default)]
    pub storyboard: Option<Vec<StoryboardScene>>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl ReviewEdits {
    pub fn validate(&self) -> Result<(), LifecycleError> {
        let title = self.title.chars().count();
        if title < 5 {
            return Err(LifecycleError::Validation("Title must be at least 5 characters long.".into()));
        }
        if title > 100 {
            return Err(LifecycleError::Validation("Title cannot exceed 100 characters.".into()));
        }

        let description = self.description.chars().count();
        if description < 20 {
            return Err(LifecycleError::Validation(
                "Description must be at least 20 characters long.".into(),
            ));
        }
        if description > 5000 {
            return Err(LifecycleError::Validation("Description cannot exceed 5000 characters.".into()));
        }

        if self.script.chars().count() < 50 {
            return Err(LifecycleError::Validation("Script must be at least 50 characters long.".into()));
        }

        Ok(())
    }

    fn content_update(&self) -> ProjectUpdate {
        ProjectUpdate {
            title: Some(self.title.clone()),
            description: Some(self.description.clone()),
            script: Some(self.script.clone()),
            captions_srt: self.captions_srt.clone(),
            thumbnail_data_uri: self.thumbnail_data_uri.clone(),
            storyboard: self.storyboard.clone(),
            ..Default::default()
        }
    }
}

fn editable(project: &VideoProject, edits: &ReviewEdits) -> Result<(), LifecycleError> {
    if project.status == ProjectStatus::Published {
        return Err(LifecycleError::AlreadyPublished);
    }
    edits.validate()
}

/// Save edits. Unfinished projects move to review; a scheduled project keeps
/// its status unless the schedule was cleared.
pub fn save_changes(project: &VideoProject, edits: &ReviewEdits) -> Result<ProjectUpdate, LifecycleError> {
    editable(project, edits)?;

    let mut update = edits.content_update();
    update.status = Some(match project.status {
        ProjectStatus::Failed | ProjectStatus::Generating | ProjectStatus::Idle => ProjectStatus::Review,
        other => other,
    });
    // a successful save clears any stale generation error
    update.error = Some(None);

    if project.status == ProjectStatus::Scheduled {
        match edits.scheduled_at {
            Some(at) => update.scheduled_at = Some(Some(at)),
            None => {
                update.status = Some(ProjectStatus::Review);
                update.scheduled_at = Some(None);
            }
        }
    }

    Ok(update)
}

pub fn schedule(project: &VideoProject, edits: &ReviewEdits) -> Result<ProjectUpdate, LifecycleError> {
    editable(project, edits)?;
    let at = edits.scheduled_at.ok_or(LifecycleError::MissingSchedule)?;

    let mut update = edits.content_update();
    update.status = Some(ProjectStatus::Scheduled);
    update.scheduled_at = Some(Some(at));
    update.error = Some(None);
    Ok(update)
}

/// Mark the project published as of `now`
pub fn publish(project: &VideoProject, edits: &ReviewEdits, now: DateTime<Utc>) -> Result<ProjectUpdate, LifecycleError> {
    editable(project, edits)?;

    let mut update = edits.content_update();
    update.status = Some(ProjectStatus::Published);
    update.scheduled_at = Some(Some(now));
    update.error = Some(None);
    Ok(update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn edits() -> ReviewEdits {
        ReviewEdits {
            title: "Perfect Sourdough".to_string(),
            description: "Everything you need to bake sourdough at home.".to_string(),
            script: "Welcome to the bakery. Today we bake a crusty sourdough loaf together.".to_string(),
            ..Default::default()
        }
    }

    fn project(status: ProjectStatus) -> VideoProject {
        let mut project = VideoProject::generating("sourdough");
        project.status = status;
        project
    }

    #[test]
    fn test_save_moves_failed_project_to_review_and_clears_error() {
        let mut failed = project(ProjectStatus::Failed);
        failed.error = Some("Critical AI content generation failed".to_string());

        let update = save_changes(&failed, &edits()).unwrap();
        assert_eq!(update.status, Some(ProjectStatus::Review));
        assert_eq!(update.error, Some(None));
        assert_eq!(update.title.as_deref(), Some("Perfect Sourdough"));

        failed.apply(update, Utc::now());
        assert_eq!(failed.error, None);
    }

    #[test]
    fn test_save_keeps_schedule_or_returns_to_review_when_cleared() {
        let scheduled = project(ProjectStatus::Scheduled);
        let at = Utc::now() + Duration::days(2);

        let kept = save_changes(&scheduled, &ReviewEdits { scheduled_at: Some(at), ..edits() }).unwrap();
        assert_eq!(kept.status, Some(ProjectStatus::Scheduled));
        assert_eq!(kept.scheduled_at, Some(Some(at)));

        let cleared = save_changes(&scheduled, &edits()).unwrap();
        assert_eq!(cleared.status, Some(ProjectStatus::Review));
        assert_eq!(cleared.scheduled_at, Some(None));
    }

    #[test]
    fn test_save_on_review_ignores_schedule_field() {
        let review = project(ProjectStatus::Review);
        let update = save_changes(&review, &ReviewEdits { scheduled_at: Some(Utc::now()), ..edits() }).unwrap();
        assert_eq!(update.status, Some(ProjectStatus::Review));
        assert_eq!(update.scheduled_at, None);
    }

    #[test]
    fn test_schedule_requires_a_date() {
        let review = project(ProjectStatus::Review);
        assert_eq!(schedule(&review, &edits()), Err(LifecycleError::MissingSchedule));

        let at = Utc::now() + Duration::hours(3);
        let update = schedule(&review, &ReviewEdits { scheduled_at: Some(at), ..edits() }).unwrap();
        assert_eq!(update.status, Some(ProjectStatus::Scheduled));
        assert_eq!(update.scheduled_at, Some(Some(at)));
    }

    #[test]
    fn test_publish_stamps_now_and_locks_project() {
        let now = Utc::now();
        let mut review = project(ProjectStatus::Review);
        let update = publish(&review, &edits(), now).unwrap();
        assert_eq!(update.status, Some(ProjectStatus::Published));
        assert_eq!(update.scheduled_at, Some(Some(now)));

        review.apply(update, now);
        assert_eq!(save_changes(&review, &edits()), Err(LifecycleError::AlreadyPublished));
        assert_eq!(publish(&review, &edits(), now), Err(LifecycleError::AlreadyPublished));
    }

    #[test]
    fn test_review_form_limits() {
        let short_title = ReviewEdits { title: "Tiny".to_string(), ..edits() };
        assert!(matches!(short_title.validate(), Err(LifecycleError::Validation(m)) if m.contains("Title")));

        let short_script = ReviewEdits { script: "Too short.".to_string(), ..edits() };
        assert!(matches!(short_script.validate(), Err(LifecycleError::Validation(m)) if m.contains("Script")));

        let long_description = ReviewEdits { description: "x".repeat(5001), ..edits() };
        assert!(long_description.validate().is_err());
        assert!(edits().validate().is_ok());
    }
}
