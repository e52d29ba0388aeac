use std::fmt;

/// Which kind of record an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Player,
    Game,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Game => write!(f, "game"),
        }
    }
}

/// Every recoverable outcome of a ledger operation. None of these are fatal:
/// callers report them and carry on.
#[derive(Debug)]
pub enum LedgerError {
    NotFound {
        entity: Entity,
        id: u64,
    },
    DuplicateKey {
        entity: Entity,
        id: u64,
    },
    CapacityExceeded {
        what: &'static str,
        capacity: usize,
    },
    /// `line` is 1-based; 0 means the record did not come from a file.
    MalformedRecord {
        line: usize,
        reason: String,
    },
    FieldTooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
    Io(std::io::Error),
}

impl LedgerError {
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    pub fn player_not_found(id: u64) -> Self {
        Self::NotFound {
            entity: Entity::Player,
            id,
        }
    }

    pub fn game_not_found(id: u64) -> Self {
        Self::NotFound {
            entity: Entity::Game,
            id,
        }
    }

    /// True for errors raised by a container refusing a well-formed record,
    /// as opposed to the record itself being unreadable.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::DuplicateKey { .. } | Self::CapacityExceeded { .. } | Self::FieldTooLong { .. }
        )
    }
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { entity, id } => write!(f, "{entity} {id} not found"),
            Self::DuplicateKey { entity, id } => {
                write!(f, "duplicate {entity} id {id}, insertion ignored")
            },
            Self::CapacityExceeded { what, capacity } => {
                write!(f, "{what} is full (capacity {capacity})")
            },
            Self::MalformedRecord { line: 0, reason } => write!(f, "malformed record: {reason}"),
            Self::MalformedRecord { line, reason } => {
                write!(f, "malformed record on line {line}: {reason}")
            },
            Self::FieldTooLong { field, len, max } => {
                write!(f, "{field} is {len} bytes long (max {max})")
            },
            Self::Io(e) => write!(f, "i/o error: {e}"),
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            LedgerError::player_not_found(7).to_string(),
            "player 7 not found"
        );
        assert_eq!(
            LedgerError::DuplicateKey {
                entity: Entity::Game,
                id: 3
            }
            .to_string(),
            "duplicate game id 3, insertion ignored"
        );
        assert_eq!(
            LedgerError::malformed(0, "missing rating").to_string(),
            "malformed record: missing rating"
        );
        assert_eq!(
            LedgerError::malformed(4, "missing rating").to_string(),
            "malformed record on line 4: missing rating"
        );
    }

    #[test]
    fn rejection_classification() {
        assert!(
            LedgerError::CapacityExceeded {
                what: "game catalog",
                capacity: 2
            }
            .is_rejection()
        );
        assert!(!LedgerError::malformed(1, "short").is_rejection());
        assert!(!LedgerError::game_not_found(1).is_rejection());
    }

    #[test]
    fn io_error_has_source() {
        let err: LedgerError = std::io::Error::other("disk gone").into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
