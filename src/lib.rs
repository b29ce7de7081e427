//! Guess Who show console: library with models, panel logic and the spreadsheet adapter.

pub mod config;
pub mod logic;
pub mod models;
pub mod sheets;

pub use config::AppConfig;
pub use logic::{
    reload, reload_with_rng, GameController, LoadForm, LoadStatus, OperatorSnapshot,
    OverlayControls, OverlayPhase, OverlaySnapshot, OverlayState, PlayerView, Selector,
    SelectionList, PLACEHOLDER,
};
pub use models::{
    verdict, GameError, GuessLogEntry, Player, PlayerId, Roster, Row, Verdict, STARTING_LIVES,
};
pub use sheets::{GoogleSheetsClient, SheetSource, SheetsError};
