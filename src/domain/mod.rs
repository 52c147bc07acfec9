//! Domain layer - Story rules with no knowledge of external services
//!
//! This layer contains:
//! - Entities: Scene, Character, PlotEvent, Ending, StoryState
//! - Value Objects: Genre, Gender/voice assignment, Tension, StoryPhase, ids

pub mod entities;
pub mod value_objects;
