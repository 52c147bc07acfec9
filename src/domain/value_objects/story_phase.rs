//! Narrative arc phases

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ordered stage of the narrative arc
///
/// Phases only move forward, one step at a time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum StoryPhase {
    #[default]
    Introduction,
    RisingAction,
    Climax,
    FallingAction,
    Resolution,
}

impl StoryPhase {
    pub fn next(self) -> Option<Self> {
        match self {
            Self::Introduction => Some(Self::RisingAction),
            Self::RisingAction => Some(Self::Climax),
            Self::Climax => Some(Self::FallingAction),
            Self::FallingAction => Some(Self::Resolution),
            Self::Resolution => None,
        }
    }

    /// Move toward a suggested phase
    ///
    /// Holds when the suggestion is the current phase or earlier; otherwise
    /// advances a single step regardless of how far ahead the suggestion is.
    pub fn advance_toward(self, suggested: StoryPhase) -> Self {
        if suggested > self {
            self.next().unwrap_or(self)
        } else {
            self
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Introduction => "introduction",
            Self::RisingAction => "rising_action",
            Self::Climax => "climax",
            Self::FallingAction => "falling_action",
            Self::Resolution => "resolution",
        }
    }

    pub fn is_late(&self) -> bool {
        *self >= Self::FallingAction
    }
}

impl std::fmt::Display for StoryPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StoryPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "introduction" => Ok(Self::Introduction),
            "rising_action" => Ok(Self::RisingAction),
            "climax" => Ok(Self::Climax),
            "falling_action" => Ok(Self::FallingAction),
            "resolution" => Ok(Self::Resolution),
            _ => Err(format!("Unknown story phase: {}", s)),
        }
    }
}
