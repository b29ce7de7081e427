//! Errors for operator and overlay actions.

use crate::models::player::PlayerId;

/// Errors that can occur while driving the panels.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum GameError {
    /// Selection index past the end of its list.
    InvalidSelection { index: usize, len: usize },
    /// Player id not present in the current roster.
    PlayerNotFound(PlayerId),
    /// Claimed identity is not a handle in the current identity list.
    UnknownIdentity(String),
    /// Check requested before guesser, target and identity are all selected.
    NotReady,
    /// Selectors cannot change until the overlay is cleared.
    SelectorsLocked,
    /// Record requested without a fresh check.
    NothingToRecord,
    /// Rounds are numbered from 1.
    InvalidRound,
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameError::InvalidSelection { index, len } => {
                write!(f, "Selection {} is out of range (list has {} entries)", index, len)
            }
            GameError::PlayerNotFound(_) => write!(f, "Player not found"),
            GameError::UnknownIdentity(name) => write!(f, "Unknown player name: {}", name),
            GameError::NotReady => {
                write!(f, "Select a guesser, a nickname and a player name first")
            }
            GameError::SelectorsLocked => {
                write!(f, "Clear the current check before changing selections")
            }
            GameError::NothingToRecord => write!(f, "No checked guess to record"),
            GameError::InvalidRound => write!(f, "Round must be at least 1"),
        }
    }
}

impl std::error::Error for GameError {}
