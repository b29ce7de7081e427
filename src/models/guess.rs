//! Guess log entries and the match/no-match verdict.

use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of comparing a claimed identity against a target's handle.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Match,
    Incorrect,
}

impl Verdict {
    pub fn is_match(self) -> bool {
        self == Verdict::Match
    }

    /// Text shown on the overlay right after a check.
    pub fn banner(self) -> &'static str {
        match self {
            Verdict::Match => "MATCH!",
            Verdict::Incorrect => "INCORRECT",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Match => write!(f, "MATCH"),
            Verdict::Incorrect => write!(f, "INCORRECT"),
        }
    }
}

/// Exact, case-sensitive comparison. Always computed, never stored.
pub fn verdict(target_handle: &str, claimed_identity: &str) -> Verdict {
    if target_handle == claimed_identity {
        Verdict::Match
    } else {
        Verdict::Incorrect
    }
}

/// One guess made against a player. Stored in the target's `play_history`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GuessLogEntry {
    /// Bracket round the guess was recorded in.
    pub round: u32,
    /// Nickname of the player who made the guess.
    pub guesser: String,
    pub guessed_player: PlayerId,
    pub guessed_identity: String,
}

impl GuessLogEntry {
    pub fn new(
        round: u32,
        guesser: impl Into<String>,
        guessed_player: PlayerId,
        guessed_identity: impl Into<String>,
    ) -> Self {
        Self {
            round,
            guesser: guesser.into(),
            guessed_player,
            guessed_identity: guessed_identity.into(),
        }
    }

    /// Verdict against the target's current handle.
    pub fn verdict(&self, target: &Player) -> Verdict {
        verdict(&target.handle, &self.guessed_identity)
    }

    pub fn render(&self, target: &Player) -> String {
        format!(
            "On round {}, player {} guessed {} was {}. Result: {}",
            self.round,
            self.guesser,
            target.nickname,
            self.guessed_identity,
            self.verdict(target)
        )
    }
}
