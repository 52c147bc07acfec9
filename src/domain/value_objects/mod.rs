//! Value objects - Immutable objects defined by their attributes

mod asset;
mod genre;
mod ids;
mod plot_direction;
mod story_phase;
mod tension;
mod voice;

pub use asset::AssetRef;
pub use genre::Genre;
pub use ids::*;
pub use plot_direction::PlotDirection;
pub use story_phase::StoryPhase;
pub use tension::Tension;
pub use voice::{
    Gender, VoiceAssignment, VoiceId, DEFAULT_FEMALE_VOICE_ID, DEFAULT_MALE_VOICE_ID,
};
