//! Plot direction carried from the plot supervisor into the next generation

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotDirection {
    /// Suggested beats for the next scene
    pub suggestions: Vec<String>,
    /// Characters the next scene should feature
    pub required_characters: Vec<String>,
}

impl PlotDirection {
    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty() && self.required_characters.is_empty()
    }
}
