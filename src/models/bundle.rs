use serde::{Deserialize, Serialize};
use std::fmt;

use super::StoryboardScene;

/// Everything one orchestration call managed to generate. Any field may be
/// missing because every sub-generation can fail independently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBundle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub script: Option<String>,
    pub thumbnail_data_uri: Option<String>,
    pub captions_srt: Option<String>,
    pub storyboard: Option<Vec<StoryboardScene>>,
}

/// Fields a bundle cannot be reviewed without
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CriticalField {
    Title,
    Script,
    Thumbnail,
}

impl fmt::Display for CriticalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CriticalField::Title => "title",
            CriticalField::Script => "script",
            CriticalField::Thumbnail => "thumbnail",
        };
        f.write_str(name)
    }
}

fn present(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|value| !value.trim().is_empty())
}

impl ContentBundle {
    pub fn missing_critical_fields(&self) -> Vec<CriticalField> {
        let mut missing = Vec::new();
        if !present(&self.title) {
            missing.push(CriticalField::Title);
        }
        if !present(&self.script) {
            missing.push(CriticalField::Script);
        }
        if !present(&self.thumbnail_data_uri) {
            missing.push(CriticalField::Thumbnail);
        }
        missing
    }

    /// Title, script and thumbnail are all present
    pub fn is_usable(&self) -> bool {
        self.missing_critical_fields().is_empty()
    }

    pub fn scene_count(&self) -> usize {
        self.storyboard.as_ref().map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usable() -> ContentBundle {
        ContentBundle {
            title: Some("Sourdough".to_string()),
            script: Some("Welcome.".to_string()),
            thumbnail_data_uri: Some("data:image/png;base64,AAAA".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_enrichments_are_not_required() {
        let bundle = usable();
        assert!(bundle.is_usable());
        assert_eq!(bundle.scene_count(), 0);
    }

    #[test]
    fn test_blank_critical_fields_count_as_missing() {
        let bundle = ContentBundle {
            title: Some("  ".to_string()),
            thumbnail_data_uri: None,
            ..usable()
        };
        assert!(!bundle.is_usable());
        assert_eq!(
            bundle.missing_critical_fields(),
            vec![CriticalField::Title, CriticalField::Thumbnail]
        );
    }
}
