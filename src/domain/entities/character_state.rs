//! Character state - How a character feels about the player and everyone else
//!
//! Tracked per established identity and fed to the plot supervisor. Values
//! coming from the model are clamped on the way in.

use serde::{Deserialize, Serialize};

use crate::domain::entities::Character;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    Friend,
    Enemy,
    #[default]
    Neutral,
    Romantic,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Friend => "friend",
            Self::Enemy => "enemy",
            Self::Neutral => "neutral",
            Self::Romantic => "romantic",
        }
    }

    /// Lenient parse of a model label; unknown labels are neutral
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "friend" | "ally" | "friendly" => Self::Friend,
            "enemy" | "rival" | "hostile" => Self::Enemy,
            "romantic" | "romance" | "lover" => Self::Romantic,
            _ => Self::Neutral,
        }
    }
}

/// A directed relationship towards another character
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    /// Display name of the other character
    pub with: String,
    pub kind: RelationshipKind,
    /// `-10..=10`
    pub level: i8,
}

impl Relationship {
    pub const MIN_LEVEL: i8 = -10;
    pub const MAX_LEVEL: i8 = 10;

    pub fn new(with: impl Into<String>, kind: RelationshipKind, level: i64) -> Self {
        Self {
            with: with.into(),
            kind,
            level: clamp_to(level, Self::MIN_LEVEL, Self::MAX_LEVEL),
        }
    }
}

/// Health in `0..=100`; mood and trust in `-10..=10`, zero being indifferent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterStats {
    pub health: u8,
    pub mood: i8,
    pub trust: i8,
}

impl CharacterStats {
    pub const MAX_HEALTH: u8 = 100;
    pub const MIN_FEELING: i8 = -10;
    pub const MAX_FEELING: i8 = 10;
}

impl Default for CharacterStats {
    fn default() -> Self {
        Self {
            health: Self::MAX_HEALTH,
            mood: 0,
            trust: 0,
        }
    }
}

/// Partial change to one character's state, as suggested by the supervisor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CharacterUpdate {
    pub name: String,
    pub health: Option<i64>,
    pub mood: Option<i64>,
    pub trust: Option<i64>,
    pub relationships: Vec<Relationship>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterState {
    pub name: String,
    pub stats: CharacterStats,
    pub relationships: Vec<Relationship>,
}

impl CharacterState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stats: CharacterStats::default(),
            relationships: Vec::new(),
        }
    }

    pub fn is_same_identity(&self, name: &str) -> bool {
        Character::identity_key(&self.name) == Character::identity_key(name)
    }

    pub fn relationship_with(&self, name: &str) -> Option<&Relationship> {
        let key = Character::identity_key(name);
        self.relationships
            .iter()
            .find(|r| Character::identity_key(&r.with) == key)
    }

    /// Overwrite the values present in `update`
    ///
    /// A relationship replaces any earlier one towards the same identity.
    /// Relationships towards the character itself are dropped.
    pub fn apply(&mut self, update: &CharacterUpdate) {
        if let Some(health) = update.health {
            self.stats.health = clamp_to(health, 0, CharacterStats::MAX_HEALTH as i8) as u8;
        }
        if let Some(mood) = update.mood {
            self.stats.mood = clamp_to(mood, CharacterStats::MIN_FEELING, CharacterStats::MAX_FEELING);
        }
        if let Some(trust) = update.trust {
            self.stats.trust = clamp_to(trust, CharacterStats::MIN_FEELING, CharacterStats::MAX_FEELING);
        }

        for relationship in &update.relationships {
            if self.is_same_identity(&relationship.with) {
                continue;
            }
            let key = Character::identity_key(&relationship.with);
            match self
                .relationships
                .iter_mut()
                .find(|r| Character::identity_key(&r.with) == key)
            {
                Some(existing) => *existing = relationship.clone(),
                None => self.relationships.push(relationship.clone()),
            }
        }
    }
}

fn clamp_to(value: i64, min: i8, max: i8) -> i8 {
    value.clamp(min as i64, max as i64) as i8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relationship_labels() {
        assert_eq!(RelationshipKind::from_label(" Friend "), RelationshipKind::Friend);
        assert_eq!(RelationshipKind::from_label("rival"), RelationshipKind::Enemy);
        assert_eq!(RelationshipKind::from_label("romance"), RelationshipKind::Romantic);
        assert_eq!(RelationshipKind::from_label("complicated"), RelationshipKind::Neutral);
    }

    #[test]
    fn test_apply_clamps_and_keeps_missing_values() {
        let mut state = CharacterState::new("Alice");
        state.apply(&CharacterUpdate {
            name: "alice".to_string(),
            mood: Some(-40),
            trust: Some(7),
            ..CharacterUpdate::default()
        });

        assert_eq!(state.stats.mood, -10);
        assert_eq!(state.stats.trust, 7);
        assert_eq!(state.stats.health, 100);

        state.apply(&CharacterUpdate {
            health: Some(-5),
            ..CharacterUpdate::default()
        });
        assert_eq!(state.stats.health, 0);
        assert_eq!(state.stats.trust, 7);
    }

    #[test]
    fn test_relationships_replace_by_identity() {
        let mut state = CharacterState::new("Alice");
        state.apply(&CharacterUpdate {
            relationships: vec![
                Relationship::new("Bob", RelationshipKind::Friend, 3),
                Relationship::new("Alice", RelationshipKind::Romantic, 10),
            ],
            ..CharacterUpdate::default()
        });
        state.apply(&CharacterUpdate {
            relationships: vec![Relationship::new("  BOB ", RelationshipKind::Enemy, -25)],
            ..CharacterUpdate::default()
        });

        assert_eq!(state.relationships.len(), 1);
        let bob = state.relationship_with("bob").unwrap();
        assert_eq!(bob.kind, RelationshipKind::Enemy);
        assert_eq!(bob.level, -10);
    }
}
