//! Player data structure: public nickname, secret handle, lives and guess history.

use crate::models::guess::{verdict, GuessLogEntry, Verdict};
use serde::{Deserialize, Serialize};

/// Position of a player in the sorted roster. Reassigned on every reload.
pub type PlayerId = usize;

/// Lives every player starts a session with.
pub const STARTING_LIVES: u32 = 2;

/// A contestant loaded from one spreadsheet row.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Secret true identity that the other players try to guess.
    pub handle: String,
    /// Public display name; sort key for the roster.
    pub nickname: String,
    pub character: String,
    pub host_status: String,
    /// None when the source row stops before the remarks column.
    pub remarks: Option<String>,
    pub lives: u32,
    /// Guesses made against this player, oldest first.
    pub play_history: Vec<GuessLogEntry>,
}

impl Player {
    /// Create a player with full lives and an empty history. The id is provisional until the roster sorts.
    pub fn new(
        id: PlayerId,
        handle: impl Into<String>,
        nickname: impl Into<String>,
        character: impl Into<String>,
        host_status: impl Into<String>,
        remarks: Option<String>,
    ) -> Self {
        Self {
            id,
            handle: handle.into(),
            nickname: nickname.into(),
            character: character.into(),
            host_status: host_status.into(),
            remarks,
            lives: STARTING_LIVES,
            play_history: Vec::new(),
        }
    }

    pub fn is_eliminated(&self) -> bool {
        self.lives == 0
    }

    /// Whether `claimed_identity` is this player's handle.
    pub fn verdict_for(&self, claimed_identity: &str) -> Verdict {
        verdict(&self.handle, claimed_identity)
    }

    /// Lose one life for a wrong guess. Stops at zero.
    pub fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
    }

    /// Identified by someone: out of the game at once.
    pub fn eliminate(&mut self) {
        self.lives = 0;
    }

    pub fn record_guess(&mut self, entry: GuessLogEntry) {
        self.play_history.push(entry);
    }

    /// Human-readable history lines, with this player as the guessed target.
    pub fn history_lines(&self) -> Vec<String> {
        self.play_history
            .iter()
            .map(|entry| entry.render(self))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bob() -> Player {
        Player::new(0, "bob_h", "Bo", "Mage", "No", None)
    }

    #[test]
    fn new_player_has_two_lives_and_no_history() {
        let p = bob();
        assert_eq!(p.lives, STARTING_LIVES);
        assert!(p.play_history.is_empty());
        assert!(!p.is_eliminated());
    }

    #[test]
    fn lose_life_stops_at_zero() {
        let mut p = bob();
        p.lose_life();
        p.lose_life();
        p.lose_life();
        assert_eq!(p.lives, 0);
        assert!(p.is_eliminated());
    }

    #[test]
    fn eliminate_sets_lives_to_zero() {
        let mut p = bob();
        p.eliminate();
        assert_eq!(p.lives, 0);
    }

    #[test]
    fn verdict_is_case_sensitive() {
        let p = bob();
        assert_eq!(p.verdict_for("bob_h"), Verdict::Match);
        assert_eq!(p.verdict_for("Bob_h"), Verdict::Incorrect);
    }
}
