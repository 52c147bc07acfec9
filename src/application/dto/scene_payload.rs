//! Structured scene output from the text generation service
//!
//! The model's JSON is validated exactly once, here. Everything downstream
//! works with a [`ScenePayload`] whose required fields are guaranteed present.

use serde::Deserialize;

use crate::domain::entities::Character;
use crate::domain::value_objects::Gender;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("Response is not valid JSON: {0}")]
    NotJson(String),
    #[error("Response is missing required field '{0}'")]
    MissingField(&'static str),
}

/// Strip a markdown code fence the model sometimes wraps its JSON in
pub fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawScenePayload {
    #[serde(default)]
    background: Option<String>,
    #[serde(default)]
    character: Option<RawCharacter>,
    #[serde(default)]
    characters: Vec<RawCharacter>,
    #[serde(default)]
    other_characters: Vec<RawCharacter>,
    #[serde(default)]
    choices: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCharacter {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    dialogue: Option<String>,
    #[serde(default)]
    gender: Option<String>,
    #[serde(default, alias = "appearance")]
    description: Option<String>,
}

/// A character as proposed by the model, before identity and assets are applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharacterDraft {
    pub name: String,
    pub dialogue: String,
    pub gender: Gender,
    pub description: Option<String>,
}

impl CharacterDraft {
    /// Text used to prompt a portrait for this character
    pub fn portrait_description(&self) -> String {
        match &self.description {
            Some(description) => format!("{}, {}", self.name, description),
            None => format!("{}, a {}", self.name, self.gender.as_str()),
        }
    }
}

/// A validated scene proposal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenePayload {
    /// Description of the setting
    pub background: String,
    /// Speaking characters in the order the model listed them, never empty
    pub characters: Vec<CharacterDraft>,
    /// Never empty
    pub choices: Vec<String>,
}

impl ScenePayload {
    pub fn parse(content: &str) -> Result<Self, PayloadError> {
        let raw: RawScenePayload = serde_json::from_str(strip_code_fence(content))
            .map_err(|e| PayloadError::NotJson(e.to_string()))?;

        let background = non_blank(raw.background).ok_or(PayloadError::MissingField("background"))?;

        let mut characters: Vec<CharacterDraft> = Vec::new();
        let candidates = raw
            .character
            .into_iter()
            .chain(raw.characters)
            .chain(raw.other_characters);
        for candidate in candidates {
            let (Some(name), Some(dialogue)) = (non_blank(candidate.name), non_blank(candidate.dialogue))
            else {
                continue;
            };
            let key = Character::identity_key(&name);
            if characters.iter().any(|c| Character::identity_key(&c.name) == key) {
                continue;
            }
            characters.push(CharacterDraft {
                name,
                dialogue,
                gender: Gender::from_label(candidate.gender.as_deref()),
                description: non_blank(candidate.description),
            });
        }
        if characters.is_empty() {
            return Err(PayloadError::MissingField("character"));
        }

        let choices: Vec<String> = raw
            .choices
            .into_iter()
            .filter_map(|choice| non_blank(Some(choice)))
            .collect();
        if choices.is_empty() {
            return Err(PayloadError::MissingField("choices"));
        }

        Ok(Self {
            background,
            characters,
            choices,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
