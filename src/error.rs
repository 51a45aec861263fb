use thiserror::Error;

use crate::object::ObjectId;

/// Errors for game rules and registry bookkeeping.
///
/// Player-initiated actions (claim, build, hire, remove) fail with one of
/// these before any state is mutated; the caller is expected to surface the
/// message to the player and carry on.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Illegal placement: {0}")]
    IllegalPlacement(String),

    #[error("Not enough resources")]
    InsufficientFunds,

    #[error("Tile {tile} has no more room")]
    InsufficientSpace { tile: ObjectId },

    #[error("Tile is already owned")]
    OwnerConflict,

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("Key already in use: {0}")]
    DuplicateKey(String),

    #[error("Object has no coordinate")]
    NoLocation,

    /// An object failed to resolve its own canonical registry entry.
    /// Signals a programming error, not a recoverable game condition.
    #[error("Registry integrity failure: {0}")]
    Integrity(String),

    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),
}

pub type GameResult<T> = Result<T, GameError>;
