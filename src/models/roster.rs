//! Roster: all players of one loaded session, sorted by nickname.

use crate::models::error::GameError;
use crate::models::guess::{GuessLogEntry, Verdict};
use crate::models::player::{Player, PlayerId};
use serde::{Deserialize, Serialize};

/// One spreadsheet row of raw cell text.
pub type Row = Vec<String>;

const HANDLE_COLUMN: usize = 1;
const NICKNAME_COLUMN: usize = 2;
const CHARACTER_COLUMN: usize = 3;
const HOST_STATUS_COLUMN: usize = 4;
const REMARKS_COLUMN: usize = 6;

/// Rows shorter than this have no nickname. The API drops trailing blank cells,
/// so character, host status and remarks may be missing and read as empty.
pub const REQUIRED_COLUMNS: usize = NICKNAME_COLUMN + 1;

/// Result of building a roster from raw rows.
#[derive(Clone, Debug, Default)]
pub struct RosterBuild {
    pub roster: Roster,
    /// Rows dropped because they were shorter than `REQUIRED_COLUMNS`.
    pub skipped_rows: usize,
}

/// Players sorted ascending by lowercase nickname; `players[i].id == i`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    players: Vec<Player>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sort by nickname (case-insensitive), then number the players in that order.
    pub fn from_players(mut players: Vec<Player>) -> Self {
        players.sort_by_key(|p| p.nickname.to_lowercase());
        for (i, p) in players.iter_mut().enumerate() {
            p.id = i;
        }
        Self { players }
    }

    /// Build from spreadsheet rows. Short rows are skipped and counted.
    pub fn from_rows(rows: &[Row]) -> RosterBuild {
        let mut skipped_rows = 0;
        let mut players = Vec::with_capacity(rows.len());
        for (row_number, row) in rows.iter().enumerate() {
            match player_from_row(players.len(), row) {
                Some(p) => players.push(p),
                None => {
                    log::warn!(
                        "Skipping row {}: {} columns, need at least {}",
                        row_number + 1,
                        row.len(),
                        REQUIRED_COLUMNS
                    );
                    skipped_rows += 1;
                }
            }
        }
        RosterBuild {
            roster: Self::from_players(players),
            skipped_rows,
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn get(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id)
    }

    pub fn get_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(id)
    }

    /// Nicknames in roster order.
    pub fn nicknames(&self) -> Vec<String> {
        self.players.iter().map(|p| p.nickname.clone()).collect()
    }

    /// Handles in roster order (callers shuffle before showing them).
    pub fn handles(&self) -> Vec<String> {
        self.players.iter().map(|p| p.handle.clone()).collect()
    }

    /// Apply a checked guess: log it on the target, then take a life from the guesser on a miss,
    /// or knock the target out on a match.
    pub fn commit_guess(
        &mut self,
        round: u32,
        guesser: PlayerId,
        target: PlayerId,
        claimed_identity: &str,
    ) -> Result<Verdict, GameError> {
        let guesser_nickname = self
            .get(guesser)
            .ok_or(GameError::PlayerNotFound(guesser))?
            .nickname
            .clone();
        let target_player = self
            .get_mut(target)
            .ok_or(GameError::PlayerNotFound(target))?;
        let verdict = target_player.verdict_for(claimed_identity);
        target_player.record_guess(GuessLogEntry::new(
            round,
            guesser_nickname,
            target,
            claimed_identity,
        ));
        match verdict {
            Verdict::Match => target_player.eliminate(),
            Verdict::Incorrect => {
                // Checked above; the guesser is still in the roster.
                if let Some(g) = self.get_mut(guesser) {
                    g.lose_life();
                }
            }
        }
        Ok(verdict)
    }
}

/// Fixed schema: 1 handle, 2 nickname, 3 character, 4 host status, 6 remarks. Columns 0 and 5 are unused.
fn player_from_row(id: PlayerId, row: &[String]) -> Option<Player> {
    if row.len() < REQUIRED_COLUMNS {
        return None;
    }
    Some(Player::new(
        id,
        row[HANDLE_COLUMN].clone(),
        row[NICKNAME_COLUMN].clone(),
        cell(row, CHARACTER_COLUMN),
        cell(row, HOST_STATUS_COLUMN),
        row.get(REMARKS_COLUMN).cloned(),
    ))
}

fn cell(row: &[String], column: usize) -> String {
    row.get(column).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Row {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn from_rows_sorts_case_insensitively_and_numbers_in_order() {
        let rows = vec![
            row(&["t", "z_h", "zed", "c", "h"]),
            row(&["t", "a_h", "Bob", "c", "h"]),
            row(&["t", "b_h", "alice", "c", "h"]),
        ];
        let build = Roster::from_rows(&rows);
        assert_eq!(build.skipped_rows, 0);
        let names: Vec<_> = build.roster.players().iter().map(|p| p.nickname.as_str()).collect();
        assert_eq!(names, vec!["alice", "Bob", "zed"]);
        for (i, p) in build.roster.players().iter().enumerate() {
            assert_eq!(p.id, i);
        }
    }

    #[test]
    fn remarks_only_present_with_seven_columns() {
        let rows = vec![
            row(&["t", "a_h", "A", "c", "h", "x"]),
            row(&["t", "b_h", "B", "c", "h", "x", "late joiner"]),
        ];
        let roster = Roster::from_rows(&rows).roster;
        assert_eq!(roster.get(0).unwrap().remarks, None);
        assert_eq!(roster.get(1).unwrap().remarks.as_deref(), Some("late joiner"));
    }

    #[test]
    fn rows_without_a_nickname_are_skipped_and_counted() {
        let rows = vec![
            row(&["t", "a_h"]),
            row(&["t", "b_h", "B", "c", "h"]),
            row(&[]),
        ];
        let build = Roster::from_rows(&rows);
        assert_eq!(build.skipped_rows, 2);
        assert_eq!(build.roster.len(), 1);
        assert_eq!(build.roster.get(0).unwrap().handle, "b_h");
    }

    #[test]
    fn trailing_blank_cells_read_as_empty() {
        let rows = vec![row(&["t", "a_h", "A", "Wizard"]), row(&["t", "b_h", "B"])];
        let build = Roster::from_rows(&rows);
        assert_eq!(build.skipped_rows, 0);
        let a = build.roster.get(0).unwrap();
        assert_eq!((a.character.as_str(), a.host_status.as_str()), ("Wizard", ""));
        let b = build.roster.get(1).unwrap();
        assert_eq!((b.character.as_str(), b.host_status.as_str()), ("", ""));
        assert_eq!(b.remarks, None);
    }

    #[test]
    fn commit_guess_rejects_unknown_players() {
        let mut roster = Roster::from_rows(&[row(&["t", "a_h", "A", "c", "h"])]).roster;
        assert_eq!(
            roster.commit_guess(1, 0, 5, "a_h"),
            Err(GameError::PlayerNotFound(5))
        );
        assert_eq!(
            roster.commit_guess(1, 7, 0, "a_h"),
            Err(GameError::PlayerNotFound(7))
        );
        assert!(roster.get(0).unwrap().play_history.is_empty());
    }
}
