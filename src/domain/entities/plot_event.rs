//! Plot events - Things that happened in the story, weighted by severity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotEventKind {
    Dialogue,
    Action,
    Decision,
}

impl PlotEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dialogue => "dialogue",
            Self::Action => "action",
            Self::Decision => "decision",
        }
    }
}

/// A recorded story event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotEvent {
    pub kind: PlotEventKind,
    pub description: String,
    pub consequence: String,
    /// Impact on tension, `1..=10`
    pub severity: u8,
    pub timestamp: DateTime<Utc>,
}

impl PlotEvent {
    pub const MIN_SEVERITY: u8 = 1;
    pub const MAX_SEVERITY: u8 = 10;

    pub fn new(
        kind: PlotEventKind,
        description: impl Into<String>,
        consequence: impl Into<String>,
        severity: u8,
    ) -> Self {
        Self {
            kind,
            description: description.into(),
            consequence: consequence.into(),
            severity: severity.clamp(Self::MIN_SEVERITY, Self::MAX_SEVERITY),
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_is_clamped() {
        assert_eq!(PlotEvent::new(PlotEventKind::Action, "a", "b", 0).severity, 1);
        assert_eq!(PlotEvent::new(PlotEventKind::Action, "a", "b", 42).severity, 10);
        assert_eq!(PlotEvent::new(PlotEventKind::Action, "a", "b", 6).severity, 6);
    }
}
