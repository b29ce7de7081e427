//! Panel logic: selection lists, reload flow, overlay state machine, controller.

mod controller;
mod loader;
mod operator;
mod overlay;
mod selection;

pub use controller::{GameController, OperatorSnapshot, OverlaySnapshot};
pub use loader::{reload, reload_with_rng, LoadStatus};
pub use operator::{LoadForm, PlayerView};
pub use overlay::{
    transition, CommitGuess, GuessContext, OverlayControls, OverlayEvent, OverlayPhase,
    OverlayState, Selector, Transition, NEUTRAL_VERDICT,
};
pub use selection::{SelectionList, NO_SELECTION, PLACEHOLDER};
