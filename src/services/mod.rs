// src/services/mod.rs
pub mod generation;
pub mod lifecycle;

pub use generation::{GenerationError, GenerationService};
pub use lifecycle::{LifecycleError, ReviewEdits};
