//! Integration tests for the reload flow: validation, no-data handling, sorting and list refresh.

mod common;

use common::{form, identity_index, loaded, row, two_player_rows, FakeSheet};
use guess_who_console::sheets::rows_from_values;
use guess_who_console::{
    reload, GameController, LoadStatus, Selector, PLACEHOLDER, STARTING_LIVES,
};
use serde_json::json;
use std::path::Path;

#[test]
fn load_sorts_by_nickname_and_numbers_from_zero() {
    let c = loaded(vec![
        row(&["t", "c_h", "charlie", "", ""]),
        row(&["t", "a_h", "Alpha", "", ""]),
        row(&["t", "b_h", "bravo", "", ""]),
    ]);
    assert_eq!(
        c.status(),
        Some(&LoadStatus::Updated { players: 3, skipped_rows: 0 })
    );
    let players = c.roster().players();
    let names: Vec<_> = players.iter().map(|p| p.nickname.as_str()).collect();
    assert_eq!(names, vec!["Alpha", "bravo", "charlie"]);
    for (i, p) in players.iter().enumerate() {
        assert_eq!(p.id, i);
        assert_eq!(p.lives, STARTING_LIVES);
        assert!(p.play_history.is_empty());
    }
}

#[test]
fn two_player_example_roster() {
    let c = loaded(two_player_rows());
    let p = c.roster().players();
    assert_eq!((p[0].nickname.as_str(), p[0].id), ("Al", 0));
    assert_eq!((p[1].nickname.as_str(), p[1].id), ("Bo", 1));
    assert_eq!(p[0].remarks.as_deref(), Some(""));
}

#[test]
fn lists_start_with_placeholder_and_follow_roster_order() {
    let c = loaded(two_player_rows());
    assert_eq!(c.nickname_list().entries(), &[PLACEHOLDER, "Al", "Bo"]);
    let mut identities = c.identity_list().entries().to_vec();
    assert_eq!(identities[0], PLACEHOLDER);
    identities.sort();
    assert_eq!(identities, vec![PLACEHOLDER, "alice_h", "bob_h"]);
}

#[test]
fn empty_field_does_nothing() {
    let mut c = GameController::new(FakeSheet::with_rows(two_player_rows()));
    let mut f = form();
    f.data_range = "   ".into();
    assert_eq!(reload(&mut c, f), LoadStatus::FieldsEmpty);
    assert_eq!(c.status().map(ToString::to_string).as_deref(), Some("Some fields are empty!"));
    assert!(c.source().initialised_with.is_empty());
    assert!(c.source().queries.is_empty());
    assert!(c.roster().is_empty());
    assert_eq!(c.stream_dir(), None);
}

#[test]
fn no_rows_keeps_previous_roster() {
    let mut c = loaded(two_player_rows());
    c.source_mut().rows = Some(Vec::new());
    assert_eq!(reload(&mut c, form()), LoadStatus::NoData);
    assert_eq!(c.roster().len(), 2);
    assert_eq!(c.nickname_list().len(), 3);

    c.source_mut().rows = None;
    assert_eq!(reload(&mut c, form()), LoadStatus::NoData);
    assert_eq!(c.roster().len(), 2);
}

#[test]
fn only_malformed_rows_counts_as_no_data() {
    let mut c = loaded(two_player_rows());
    c.source_mut().rows = Some(vec![row(&["t", "x_h"])]);
    assert_eq!(reload(&mut c, form()), LoadStatus::NoData);
    assert_eq!(c.roster().len(), 2);
}

#[test]
fn malformed_rows_are_skipped_and_reported() {
    let c = loaded(vec![
        row(&["t", "a_h", "A", "", ""]),
        row(&["t", "short"]),
    ]);
    let status = c.status().unwrap();
    assert_eq!(status, &LoadStatus::Updated { players: 1, skipped_rows: 1 });
    assert_eq!(status.to_string(), "Successfully updated! (1 malformed rows skipped)");
}

#[test]
fn rows_with_trailing_blanks_from_the_api_are_kept() {
    // values.get omits trailing empty cells, so rows come back ragged.
    let rows = rows_from_values(vec![
        vec![json!("ts"), json!("alice_h"), json!("Al"), json!("Wizard")],
        vec![json!("ts"), json!("bob_h"), json!("Bo"), json!("Rogue"), json!("Yes")],
        vec![json!("ts"), json!("cy_h"), json!("Cy")],
    ]);
    let c = loaded(rows);
    assert_eq!(c.status().unwrap(), &LoadStatus::Updated { players: 3, skipped_rows: 0 });
    let al = &c.roster().players()[0];
    assert_eq!((al.nickname.as_str(), al.host_status.as_str()), ("Al", ""));
    assert_eq!(c.roster().players()[2].character, "");
}

#[test]
fn auth_failure_leaves_roster_and_raises_alert() {
    let mut c = loaded(two_player_rows());
    c.source_mut().fail_auth = true;
    assert_eq!(reload(&mut c, form()), LoadStatus::NoData);
    assert_eq!(c.roster().len(), 2);
    assert!(c.operator_snapshot().alert.is_some());
}

#[test]
fn fields_are_trimmed_before_use() {
    let mut c = GameController::new(FakeSheet::with_rows(two_player_rows()));
    let mut f = form();
    f.spreadsheet_id = "  sheet-1 ".into();
    f.credentials_dir = " /tmp/creds".into();
    reload(&mut c, f);
    assert_eq!(
        c.source().initialised_with,
        vec![("sheet-1".to_string(), Path::new("/tmp/creds").to_path_buf())]
    );
    assert_eq!(c.source().queries, vec!["Form responses 1!A2:G".to_string()]);
    assert_eq!(c.stream_dir(), Some(Path::new("/tmp/stream")));
}

#[test]
fn reload_discards_history_and_resets_panels() {
    let mut c = loaded(two_player_rows());
    let bob = identity_index(&c, "bob_h");
    c.overlay_select(Selector::Guesser, 1).unwrap();
    c.overlay_select(Selector::Target, 2).unwrap();
    c.overlay_select(Selector::Identity, bob).unwrap();
    c.check().unwrap();
    c.record().unwrap();
    c.select_operator_player(2).unwrap();
    assert_eq!(c.roster().get(1).unwrap().lives, 0);

    reload(&mut c, form());
    assert!(c.roster().players().iter().all(|p| p.lives == STARTING_LIVES));
    assert!(c.roster().players().iter().all(|p| p.play_history.is_empty()));
    assert_eq!(c.overlay_state().guesser, 0);
    assert_eq!(c.operator_snapshot().selected, 0);
}
