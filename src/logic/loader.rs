//! Reload flow: validate the operator fields, query the spreadsheet, swap in the new roster.

use crate::logic::controller::GameController;
use crate::logic::operator::LoadForm;
use crate::models::Roster;
use crate::sheets::SheetSource;
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Outcome of a reload, shown as the operator's status line.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum LoadStatus {
    /// A required field was blank; nothing was queried.
    FieldsEmpty,
    /// Query returned nothing usable; the previous roster stays.
    NoData,
    Updated { players: usize, skipped_rows: usize },
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStatus::FieldsEmpty => write!(f, "Some fields are empty!"),
            LoadStatus::NoData => write!(f, "Updated, but no data found."),
            LoadStatus::Updated { skipped_rows: 0, .. } => write!(f, "Successfully updated!"),
            LoadStatus::Updated { skipped_rows, .. } => {
                write!(f, "Successfully updated! ({} malformed rows skipped)", skipped_rows)
            }
        }
    }
}

/// Reload the roster using the given operator fields.
pub fn reload<S: SheetSource>(controller: &mut GameController<S>, form: LoadForm) -> LoadStatus {
    reload_with_rng(controller, form, &mut rand::thread_rng())
}

/// `reload` with a caller-supplied shuffle source for the player-name list.
///
/// 1. All four fields must be non-blank, else stop with `FieldsEmpty`.
/// 2. Re-initialise the source and query the data range.
/// 3. No rows (or only malformed rows): `NoData`, keep the current roster.
/// 4. Otherwise build, sort and number the players and replace the roster in one assignment.
pub fn reload_with_rng<S: SheetSource, R: Rng + ?Sized>(
    controller: &mut GameController<S>,
    form: LoadForm,
    rng: &mut R,
) -> LoadStatus {
    controller.form = form;
    let status = run_reload(controller, rng);
    log::info!("Roster reload: {}", status);
    controller.status = Some(status.clone());
    status
}

fn run_reload<S: SheetSource, R: Rng + ?Sized>(
    controller: &mut GameController<S>,
    rng: &mut R,
) -> LoadStatus {
    if !controller.form.is_complete() {
        return LoadStatus::FieldsEmpty;
    }
    let spreadsheet_id = controller.form.spreadsheet_id.trim().to_string();
    let credentials_dir = PathBuf::from(controller.form.credentials_dir.trim());
    let data_range = controller.form.data_range.trim().to_string();
    controller.stream_dir = Some(PathBuf::from(controller.form.stream_dir.trim()));

    log::info!("Updating roster from spreadsheet {} range {}", spreadsheet_id, data_range);
    let source = controller.source_mut();
    source.initialise(&spreadsheet_id, &credentials_dir);
    let Some(rows) = source.query(&data_range) else {
        return LoadStatus::NoData;
    };

    let build = Roster::from_rows(&rows);
    if build.roster.is_empty() {
        return LoadStatus::NoData;
    }
    let players = build.roster.len();
    controller.install_roster(build.roster, rng);
    LoadStatus::Updated {
        players,
        skipped_rows: build.skipped_rows,
    }
}
