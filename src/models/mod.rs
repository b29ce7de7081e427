//! Data structures for the show: players, guess log, roster.

mod error;
mod guess;
mod player;
mod roster;

pub use error::GameError;
pub use guess::{verdict, GuessLogEntry, Verdict};
pub use player::{Player, PlayerId, STARTING_LIVES};
pub use roster::{Roster, RosterBuild, Row, REQUIRED_COLUMNS};
