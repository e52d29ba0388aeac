use serde::Serialize;

use crate::error::LedgerError;
use crate::player::check_text;

/// Identifier of a catalog game.
pub type GameId = u64;

pub const MAX_GAME_TEXT_LEN: usize = 49;

/// A game in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    pub id: GameId,
    pub name: String,
    pub developer: String,
    pub publisher: String,
    pub rating: f64,
    pub downloads: u32,
}

impl Game {
    pub fn new(
        id: GameId,
        name: impl Into<String>,
        developer: impl Into<String>,
        publisher: impl Into<String>,
        rating: f64,
        downloads: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            developer: developer.into(),
            publisher: publisher.into(),
            rating,
            downloads,
        }
    }

    pub fn validate(&self) -> Result<(), LedgerError> {
        check_text("game name", &self.name, MAX_GAME_TEXT_LEN)?;
        check_text("developer", &self.developer, MAX_GAME_TEXT_LEN)?;
        check_text("publisher", &self.publisher, MAX_GAME_TEXT_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_checks_publisher() {
        let mut g = Game::new(1, "Chess", "FIDE", "FIDE", 4.8, 1000);
        assert!(g.validate().is_ok());
        g.publisher = "p".repeat(MAX_GAME_TEXT_LEN + 1);
        assert!(matches!(
            g.validate(),
            Err(LedgerError::FieldTooLong {
                field: "publisher",
                ..
            })
        ));
    }
}
