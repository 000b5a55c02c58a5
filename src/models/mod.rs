// src/models/mod.rs
pub mod bundle;
pub mod project;

pub use bundle::{ContentBundle, CriticalField};
pub use project::{ProjectStatus, ProjectUpdate, StoryboardScene, VideoProject};

use serde::{Deserialize, Deserializer};

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`)
pub(crate) fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
