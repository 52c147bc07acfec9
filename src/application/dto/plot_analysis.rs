//! Structured plot analysis output from the text generation service

use serde::Deserialize;

use super::scene_payload::{strip_code_fence, PayloadError};

/// What the model thinks should happen to the story next
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlotAnalysis {
    #[serde(default, alias = "shouldEnd")]
    pub should_end_story: bool,
    #[serde(default)]
    pub end_reason: Option<String>,
    #[serde(default, alias = "endingKind")]
    pub ending_type: Option<String>,
    #[serde(default)]
    pub achievement: Option<String>,
    #[serde(default)]
    pub suggested_tension: Option<f64>,
    #[serde(default)]
    pub suggested_phase: Option<String>,
    #[serde(default)]
    pub plot_suggestions: Vec<String>,
    #[serde(default)]
    pub required_characters: Vec<String>,
    /// `None` keeps the current themes
    #[serde(default, alias = "currentThemes")]
    pub themes: Option<Vec<String>>,
    #[serde(default, alias = "characterStates")]
    pub character_updates: Vec<CharacterStateAnalysis>,
}

/// Suggested state of one character; absent values stay as they are
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CharacterStateAnalysis {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub health: Option<f64>,
    #[serde(default)]
    pub mood: Option<f64>,
    #[serde(default)]
    pub trust: Option<f64>,
    #[serde(default)]
    pub relationships: Vec<RelationshipAnalysis>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RelationshipAnalysis {
    #[serde(default, alias = "character", alias = "target")]
    pub with: String,
    #[serde(default, rename = "type", alias = "kind")]
    pub kind: Option<String>,
    #[serde(default)]
    pub level: Option<f64>,
}

impl PlotAnalysis {
    pub fn parse(content: &str) -> Result<Self, PayloadError> {
        serde_json::from_str(strip_code_fence(content))
            .map_err(|e| PayloadError::NotJson(e.to_string()))
    }
}
