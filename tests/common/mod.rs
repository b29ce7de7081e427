//! Shared fixtures: an in-memory spreadsheet and a loaded controller.

#![allow(dead_code)]

use guess_who_console::{reload_with_rng, GameController, LoadForm, Row, SheetSource};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::{Path, PathBuf};

/// Spreadsheet stand-in that returns canned rows and remembers how it was called.
#[derive(Default)]
pub struct FakeSheet {
    pub rows: Option<Vec<Row>>,
    pub fail_auth: bool,
    pub initialised_with: Vec<(String, PathBuf)>,
    pub queries: Vec<String>,
    alert: Option<String>,
}

impl FakeSheet {
    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows: Some(rows),
            ..Self::default()
        }
    }
}

impl SheetSource for FakeSheet {
    fn initialise(&mut self, spreadsheet_id: &str, credentials_dir: &Path) {
        self.initialised_with
            .push((spreadsheet_id.to_string(), credentials_dir.to_path_buf()));
        self.alert = self.fail_auth.then(|| "Spreadsheet authentication failed".to_string());
    }

    fn query(&mut self, range: &str) -> Option<Vec<Row>> {
        self.queries.push(range.to_string());
        if self.fail_auth {
            return None;
        }
        self.rows.clone().filter(|rows| !rows.is_empty())
    }

    fn last_alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }
}

pub fn row(cells: &[&str]) -> Row {
    cells.iter().map(|c| c.to_string()).collect()
}

/// The two-player sheet: Al (alice_h) and Bo (bob_h), listed out of order.
pub fn two_player_rows() -> Vec<Row> {
    vec![
        row(&["ts", "bob_h", "Bo", "", "", "x", ""]),
        row(&["ts", "alice_h", "Al", "", "", "x", ""]),
    ]
}

pub fn form() -> LoadForm {
    LoadForm {
        spreadsheet_id: "sheet-1".into(),
        credentials_dir: "/tmp/creds".into(),
        data_range: "Form responses 1!A2:G".into(),
        stream_dir: "/tmp/stream".into(),
    }
}

pub fn loaded(rows: Vec<Row>) -> GameController<FakeSheet> {
    let mut c = GameController::new(FakeSheet::with_rows(rows));
    reload_with_rng(&mut c, form(), &mut StdRng::seed_from_u64(1));
    c
}

/// Index of `handle` in the shuffled player-name list.
pub fn identity_index(c: &GameController<FakeSheet>, handle: &str) -> usize {
    c.identity_list()
        .entries()
        .iter()
        .position(|e| e == handle)
        .expect("handle listed")
}
