pub mod catalog;
pub mod codec;
pub mod error;
pub mod game;
pub mod index;
pub mod player;

pub use catalog::GameCatalog;
pub use error::{Entity, LedgerError};
pub use game::{Game, GameId};
pub use index::PlayerIndex;
pub use player::{PlayedGame, Player, PlayerId};

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::game::{Game, GameId};
    use crate::index::PlayerIndex;
    use crate::player::{Player, PlayerId};

    /// Create a test player whose text fields are derived from its id.
    pub fn make_player(id: PlayerId) -> Player {
        Player::new(
            id,
            format!("Player{id}"),
            format!("555-{:04}", id % 10_000),
            format!("player{id}@example.com"),
            "hunter2",
            1,
            (id % 50) as f64 / 10.0,
        )
    }

    /// Build an index by inserting `ids` in order. Repeated ids are skipped.
    pub fn index_from_ids(ids: &[PlayerId]) -> PlayerIndex {
        let mut index = PlayerIndex::new();
        for &id in ids {
            if !index.contains(id) {
                index
                    .insert(make_player(id))
                    .expect("test player must be valid");
            }
        }
        index
    }

    /// Create a test game whose text fields are derived from its id.
    pub fn make_game(id: GameId) -> Game {
        Game::new(
            id,
            format!("Game{id}"),
            "Test Studio",
            "Test Publisher",
            4.0,
            (id as u32).wrapping_mul(100),
        )
    }
}
