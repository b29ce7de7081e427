//! Operator panel: connection fields and the selected-player viewer.

use crate::models::Player;
use serde::{Deserialize, Serialize};

/// The four connection fields of the operator panel, as typed.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LoadForm {
    #[serde(default)]
    pub spreadsheet_id: String,
    #[serde(default)]
    pub credentials_dir: String,
    #[serde(default)]
    pub data_range: String,
    #[serde(default)]
    pub stream_dir: String,
}

impl LoadForm {
    /// True when every field has something besides whitespace.
    pub fn is_complete(&self) -> bool {
        [
            &self.spreadsheet_id,
            &self.credentials_dir,
            &self.data_range,
            &self.stream_dir,
        ]
        .iter()
        .all(|field| !field.trim().is_empty())
    }
}

/// Fields shown for the selected player. All empty when nothing is selected.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct PlayerView {
    pub handle: String,
    pub lives: String,
    pub history: Vec<String>,
}

impl PlayerView {
    pub fn of(player: &Player) -> Self {
        Self {
            handle: player.handle.clone(),
            lives: player.lives.to_string(),
            history: player.history_lines(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GuessLogEntry;

    fn form() -> LoadForm {
        LoadForm {
            spreadsheet_id: "sheet".into(),
            credentials_dir: "/creds".into(),
            data_range: "Form responses 1!A2:G".into(),
            stream_dir: "/stream".into(),
        }
    }

    #[test]
    fn complete_form() {
        assert!(form().is_complete());
    }

    #[test]
    fn whitespace_only_field_is_empty() {
        let mut f = form();
        f.stream_dir = "   \t".into();
        assert!(!f.is_complete());
        assert!(!LoadForm::default().is_complete());
    }

    #[test]
    fn player_view_renders_lives_and_history() {
        let mut p = Player::new(0, "bob_h", "Bo", "", "", None);
        p.record_guess(GuessLogEntry::new(1, "Al", 0, "bob_h"));
        p.eliminate();
        let view = PlayerView::of(&p);
        assert_eq!(view.handle, "bob_h");
        assert_eq!(view.lives, "0");
        assert_eq!(
            view.history,
            vec!["On round 1, player Al guessed Bo was bob_h. Result: MATCH".to_string()]
        );
    }
}
