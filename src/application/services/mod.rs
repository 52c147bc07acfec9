//! Application services - Use case implementations
//!
//! Leaf services (scene generation, location detection, asset resolution,
//! plot supervision) are generic over their ports; `StoryService` wires them
//! together behind trait objects and owns every session mutation.

pub mod error;
pub mod image_asset_resolver;
pub mod llm;
pub mod location_change_detector;
pub mod plot_supervisor;
pub mod scene_generator;
pub mod story_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::StoryError;
pub use story_service::{StoryPorts, StoryService, StorySettings};
