//! Story genres

use std::str::FromStr;

use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Story category picked once at the start of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Genre {
    Action,
    Thriller,
    Romance,
    Adventure,
    Horror,
    Mystery,
    SciFi,
    Fantasy,
    Comedy,
    Drama,
}

impl Genre {
    pub const ALL: [Genre; 10] = [
        Genre::Action,
        Genre::Thriller,
        Genre::Romance,
        Genre::Adventure,
        Genre::Horror,
        Genre::Mystery,
        Genre::SciFi,
        Genre::Fantasy,
        Genre::Comedy,
        Genre::Drama,
    ];

    /// Pick a genre for the "surprise me" option
    pub fn random() -> Self {
        *Self::ALL
            .choose(&mut rand::thread_rng())
            .unwrap_or(&Genre::Action)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Thriller => "thriller",
            Self::Romance => "romance",
            Self::Adventure => "adventure",
            Self::Horror => "horror",
            Self::Mystery => "mystery",
            Self::SciFi => "sci_fi",
            Self::Fantasy => "fantasy",
            Self::Comedy => "comedy",
            Self::Drama => "drama",
        }
    }

    /// Human-readable label, also used inside prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Action => "Action",
            Self::Thriller => "Thriller",
            Self::Romance => "Romance",
            Self::Adventure => "Adventure",
            Self::Horror => "Horror",
            Self::Mystery => "Mystery",
            Self::SciFi => "Science Fiction",
            Self::Fantasy => "Fantasy",
            Self::Comedy => "Comedy",
            Self::Drama => "Drama",
        }
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_ascii_lowercase()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect();

        match normalized.as_str() {
            "action" => Ok(Self::Action),
            "thriller" => Ok(Self::Thriller),
            "romance" => Ok(Self::Romance),
            "adventure" => Ok(Self::Adventure),
            "horror" => Ok(Self::Horror),
            "mystery" => Ok(Self::Mystery),
            "scifi" | "sciencefiction" => Ok(Self::SciFi),
            "fantasy" => Ok(Self::Fantasy),
            "comedy" => Ok(Self::Comedy),
            "drama" => Ok(Self::Drama),
            _ => Err(format!("Unknown genre: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_genre_variants() {
        assert_eq!("Action".parse::<Genre>(), Ok(Genre::Action));
        assert_eq!("sci-fi".parse::<Genre>(), Ok(Genre::SciFi));
        assert_eq!("sci_fi".parse::<Genre>(), Ok(Genre::SciFi));
        assert_eq!(" Science Fiction ".parse::<Genre>(), Ok(Genre::SciFi));
        assert!("western".parse::<Genre>().is_err());
    }

    #[test]
    fn test_random_genre_is_known() {
        for _ in 0..20 {
            assert!(Genre::ALL.contains(&Genre::random()));
        }
    }

    #[test]
    fn test_as_str_round_trips_through_parse() {
        for genre in Genre::ALL {
            assert_eq!(genre.as_str().parse::<Genre>(), Ok(genre));
        }
    }
}
