use crate::error::{Entity, LedgerError};
use crate::game::{Game, GameId};

/// Default number of games a catalog holds.
pub const DEFAULT_CATALOG_CAPACITY: usize = 100;

/// Bounded, insertion-ordered collection of games with linear lookup.
#[derive(Debug)]
pub struct GameCatalog {
    games: Vec<Game>,
    capacity: usize,
}

impl Default for GameCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl GameCatalog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CATALOG_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            games: Vec::new(),
            capacity,
        }
    }

    /// Append a game. A full catalog or an id already present leaves the
    /// catalog unchanged and reports why.
    pub fn add(&mut self, game: Game) -> Result<(), LedgerError> {
        if self.is_full() {
            return Err(LedgerError::CapacityExceeded {
                what: "game catalog",
                capacity: self.capacity,
            });
        }
        if self.find(game.id).is_some() {
            return Err(LedgerError::DuplicateKey {
                entity: Entity::Game,
                id: game.id,
            });
        }
        game.validate()?;
        tracing::debug!(game_id = game.id, name = %game.name, "game added");
        self.games.push(game);
        Ok(())
    }

    /// First game with `id`.
    pub fn find(&self, id: GameId) -> Option<&Game> {
        self.games.iter().find(|g| g.id == id)
    }

    /// Every game in insertion order.
    pub fn list_all(&self) -> &[Game] {
        &self.games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.games.len() >= self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::make_game;

    #[test]
    fn full_catalog_ignores_additions() {
        let mut catalog = GameCatalog::with_capacity(2);
        catalog.add(make_game(1)).unwrap();
        catalog.add(make_game(2)).unwrap();
        let err = catalog.add(make_game(3)).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::CapacityExceeded { capacity: 2, .. }
        ));
        assert_eq!(catalog.list_all().len(), 2);
        assert!(catalog.find(3).is_none());
    }

    #[test]
    fn duplicate_game_id_is_rejected() {
        let mut catalog = GameCatalog::new();
        catalog.add(make_game(1)).unwrap();
        let mut dup = make_game(1);
        dup.name = "Other".to_string();
        assert!(matches!(
            catalog.add(dup),
            Err(LedgerError::DuplicateKey {
                entity: Entity::Game,
                id: 1
            })
        ));
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find(1).unwrap().name, "Game1");
    }

    #[test]
    fn list_all_keeps_insertion_order() {
        let mut catalog = GameCatalog::new();
        for id in [5, 1, 3] {
            catalog.add(make_game(id)).unwrap();
        }
        let ids: Vec<GameId> = catalog.list_all().iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![5, 1, 3]);
        assert_eq!(catalog.capacity(), DEFAULT_CATALOG_CAPACITY);
    }

    #[test]
    fn find_missing_game() {
        let catalog = GameCatalog::new();
        assert!(catalog.find(42).is_none());
        assert!(catalog.is_empty());
    }
}
