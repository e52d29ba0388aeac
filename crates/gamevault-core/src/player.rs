use serde::Serialize;

use crate::error::LedgerError;
use crate::game::GameId;

/// Unique identifier for a player. The key of the player index.
pub type PlayerId = u64;

/// Maximum number of played-game entries kept per player.
pub const MAX_PLAYED_GAMES: usize = 50;

pub const MAX_NAME_LEN: usize = 49;
pub const MAX_PHONE_LEN: usize = 19;
pub const MAX_EMAIL_LEN: usize = 49;
pub const MAX_PASSWORD_LEN: usize = 49;

/// One entry of a player's played-games list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayedGame {
    pub game_id: GameId,
    pub rating: f64,
}

/// A registered player.
///
/// The password is stored as given; it is never validated or hashed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
    pub phone: String,
    pub email: String,
    pub password: String,
    pub primary_game: GameId,
    pub rating: f64,
    games_played: Vec<PlayedGame>,
}

impl Player {
    pub fn new(
        id: PlayerId,
        display_name: impl Into<String>,
        phone: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        primary_game: GameId,
        rating: f64,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            phone: phone.into(),
            email: email.into(),
            password: password.into(),
            primary_game,
            rating,
            games_played: Vec::new(),
        }
    }

    /// Append a played game. Fails once the list holds `MAX_PLAYED_GAMES`
    /// entries, leaving the list untouched.
    pub fn add_game(&mut self, game_id: GameId, rating: f64) -> Result<(), LedgerError> {
        if self.games_played.len() >= MAX_PLAYED_GAMES {
            return Err(LedgerError::CapacityExceeded {
                what: "played-games list",
                capacity: MAX_PLAYED_GAMES,
            });
        }
        self.games_played.push(PlayedGame { game_id, rating });
        Ok(())
    }

    pub fn games_played(&self) -> &[PlayedGame] {
        &self.games_played
    }

    pub fn games_played_count(&self) -> usize {
        self.games_played.len()
    }

    /// Linear scan of the played-games list.
    pub fn has_played(&self, game_id: GameId) -> bool {
        self.games_played.iter().any(|g| g.game_id == game_id)
    }

    /// Check every text field against its maximum length and the record
    /// delimiters.
    pub fn validate(&self) -> Result<(), LedgerError> {
        check_text("name", &self.display_name, MAX_NAME_LEN)?;
        check_text("phone", &self.phone, MAX_PHONE_LEN)?;
        check_text("email", &self.email, MAX_EMAIL_LEN)?;
        check_text("password", &self.password, MAX_PASSWORD_LEN)
    }
}

/// A text field must be non-empty, free of record delimiters and at most
/// `max` bytes long, otherwise it cannot survive a save and reload.
pub(crate) fn check_text(field: &'static str, value: &str, max: usize) -> Result<(), LedgerError> {
    if value.is_empty() {
        return Err(LedgerError::malformed(0, format!("{field} is empty")));
    }
    if value.contains([',', '\n', '\r']) {
        return Err(LedgerError::malformed(
            0,
            format!("{field} contains a record delimiter"),
        ));
    }
    if value.len() > max {
        return Err(LedgerError::FieldTooLong {
            field,
            len: value.len(),
            max,
        });
    }
    Ok(())
}
