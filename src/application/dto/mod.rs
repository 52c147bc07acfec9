//! Data Transfer Objects - For API and model boundaries
//!
//! DTOs live in the application layer so infrastructure (HTTP) can
//! serialize/deserialize without pulling wire shapes into the domain model.
//! Model output shapes are validated here before any service sees them.

pub mod plot_analysis;
pub mod scene_context;
pub mod scene_payload;
pub mod story;

pub use plot_analysis::{CharacterStateAnalysis, PlotAnalysis, RelationshipAnalysis};
pub use scene_context::SceneRequestContext;
pub use scene_payload::{CharacterDraft, PayloadError, ScenePayload};
pub use story::*;
