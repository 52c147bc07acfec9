//! Narrative tension meter

use serde::{Deserialize, Serialize};

/// Bounded narrative intensity in `0..=100`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tension(u8);

impl Tension {
    pub const MAX: u8 = 100;

    /// Build a tension value, clamping out-of-range input
    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, Self::MAX as i64) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// Raise tension by an event severity, saturating at the maximum
    pub fn raise(self, severity: u8) -> Self {
        Self(self.0.saturating_add(severity).min(Self::MAX))
    }
}

impl std::fmt::Display for Tension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.0, Self::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clamps() {
        assert_eq!(Tension::new(-5).value(), 0);
        assert_eq!(Tension::new(42).value(), 42);
        assert_eq!(Tension::new(1_000).value(), 100);
    }

    #[test]
    fn test_raise_saturates() {
        assert_eq!(Tension::new(10).raise(7).value(), 17);
        assert_eq!(Tension::new(95).raise(10).value(), 100);
        assert_eq!(Tension::new(100).raise(255).value(), 100);
    }

    #[test]
    fn test_display_is_out_of_max() {
        assert_eq!(Tension::new(1).to_string(), "1/100");
    }
}
