//! Domain entities - Core story objects

mod character;
mod character_state;
mod ending;
mod plot_event;
mod scene;
mod story_state;

pub use character::Character;
pub use character_state::{CharacterState, CharacterUpdate, Relationship, RelationshipKind};
pub use ending::{to_second_person, Ending, EndingKind};
pub use plot_event::{PlotEvent, PlotEventKind};
pub use scene::Scene;
pub use story_state::{GenerationTicket, StateError, StoryState};
