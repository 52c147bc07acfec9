//! Story endings

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndingKind {
    Success,
    Failure,
}

impl EndingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Success => "Quest Completed!",
            Self::Failure => "Game Over",
        }
    }
}

/// How a playthrough ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ending {
    pub kind: EndingKind,
    pub message: String,
    pub achievement: Option<String>,
}

impl Ending {
    pub fn new(kind: EndingKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            achievement: None,
        }
    }

    pub fn with_achievement(mut self, achievement: impl Into<String>) -> Self {
        let achievement = achievement.into();
        if !achievement.trim().is_empty() {
            self.achievement = Some(achievement);
        }
        self
    }

    /// The ending message addressed to the player
    pub fn display_message(&self) -> String {
        to_second_person(&self.message)
    }
}

static POSSESSIVE_SUBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]+)'s\b").expect("valid possessive pattern"));
static NAMED_CHOICE_SUBJECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][a-z]+\s+(decision|choice|actions?|attempt|response)\b")
        .expect("valid choice pattern")
});
static NAMED_SUBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Z][a-z]+)\s").expect("valid subject pattern"));
static THIRD_PERSON_PRONOUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:his|her|their)\b").expect("valid pronoun pattern"));
static HAS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bhas\b").expect("valid has pattern"));
static WAS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bwas\b").expect("valid was pattern"));

/// Leading words that are never a character name
const NON_NAME_WORDS: &[&str] = &[
    "A", "After", "All", "An", "As", "At", "Before", "By", "Despite", "Every", "For", "In", "It",
    "Nothing", "On", "One", "She", "He", "The", "Their", "There", "These", "They", "This",
    "Those", "Though", "We", "When", "With", "You",
];

/// Rewrite a third-person ending message so it addresses the player
///
/// "Evelyn's loud screams alerted the guards" becomes "Your loud screams
/// alerted the guards"; "Marcus escaped and was free" becomes "You escaped
/// and were free". Messages already starting with "your" are left alone.
pub fn to_second_person(message: &str) -> String {
    let trimmed = message.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.to_lowercase().starts_with("your") {
        return trimmed.to_string();
    }

    let mut subject_is_you = false;
    let rewritten = if POSSESSIVE_SUBJECT.is_match(trimmed) {
        POSSESSIVE_SUBJECT.replace(trimmed, "Your").into_owned()
    } else if NAMED_CHOICE_SUBJECT.is_match(trimmed) {
        NAMED_CHOICE_SUBJECT.replace(trimmed, "Your $1").into_owned()
    } else {
        match NAMED_SUBJECT.captures(trimmed).and_then(|c| c.get(1)) {
            Some(word) if !NON_NAME_WORDS.contains(&word.as_str()) => {
                subject_is_you = true;
                NAMED_SUBJECT.replace(trimmed, "You ").into_owned()
            }
            _ => trimmed.to_string(),
        }
    };

    let mut rewritten = THIRD_PERSON_PRONOUN
        .replace_all(&rewritten, "your")
        .into_owned();
    if subject_is_you {
        rewritten = HAS.replace_all(&rewritten, "have").into_owned();
        rewritten = WAS.replace_all(&rewritten, "were").into_owned();
    }

    let rewritten = rewritten.trim();
    let mut chars = rewritten.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
