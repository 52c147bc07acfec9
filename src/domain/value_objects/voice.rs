//! Character gender and voice assignment

use serde::{Deserialize, Serialize};

/// ElevenLabs "Rachel"
pub const DEFAULT_FEMALE_VOICE_ID: &str = "21m00Tcm4TlvDq8ikWAM";
/// ElevenLabs "Josh"
pub const DEFAULT_MALE_VOICE_ID: &str = "TxGEqnHWrfWFTfGW9XjX";

/// Gender attribute of a story character, fixed at first introduction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Interpret a gender label coming from the model
    ///
    /// Only "female" maps to `Female`; every other label (including missing
    /// or unexpected values) maps to `Male`.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some(value) if value.trim().eq_ignore_ascii_case("female") => Self::Female,
            _ => Self::Male,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

/// Identifier of a text-to-speech voice
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoiceId(String);

impl VoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoiceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Maps a character's gender to one of exactly two voices
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceAssignment {
    female: VoiceId,
    male: VoiceId,
}

impl VoiceAssignment {
    pub fn new(female: VoiceId, male: VoiceId) -> Self {
        Self { female, male }
    }

    pub fn voice_for(&self, gender: Gender) -> VoiceId {
        match gender {
            Gender::Female => self.female.clone(),
            Gender::Male => self.male.clone(),
        }
    }

    pub fn voice_for_label(&self, label: Option<&str>) -> VoiceId {
        self.voice_for(Gender::from_label(label))
    }

    pub fn female_voice(&self) -> &VoiceId {
        &self.female
    }

    pub fn male_voice(&self) -> &VoiceId {
        &self.male
    }
}

impl Default for VoiceAssignment {
    fn default() -> Self {
        Self::new(
            VoiceId::new(DEFAULT_FEMALE_VOICE_ID),
            VoiceId::new(DEFAULT_MALE_VOICE_ID),
        )
    }
}
