//! Application controller: owns the roster, the selection lists, both panels' state
//! and the spreadsheet source.

use crate::logic::loader::LoadStatus;
use crate::logic::operator::{LoadForm, PlayerView};
use crate::logic::overlay::{
    transition, GuessContext, OverlayControls, OverlayEvent, OverlayPhase, OverlayState, Selector,
    Transition,
};
use crate::logic::selection::{SelectionList, NO_SELECTION};
use crate::models::{GameError, Roster, Verdict};
use crate::sheets::SheetSource;
use rand::Rng;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Everything the operator page renders.
#[derive(Clone, Debug, Serialize)]
pub struct OperatorSnapshot {
    pub form: LoadForm,
    pub status: String,
    pub alert: Option<String>,
    pub round: u32,
    pub nicknames: Vec<String>,
    pub selected: usize,
    pub player: PlayerView,
}

/// Everything the overlay page renders.
#[derive(Clone, Debug, Serialize)]
pub struct OverlaySnapshot {
    pub nicknames: Vec<String>,
    pub identities: Vec<String>,
    pub state: OverlayState,
    pub controls: OverlayControls,
}

pub struct GameController<S> {
    source: S,
    pub(crate) form: LoadForm,
    pub(crate) stream_dir: Option<PathBuf>,
    pub(crate) status: Option<LoadStatus>,
    roster: Roster,
    /// Nicknames in roster order; backs the operator list and the guesser/target selectors.
    nicknames: SelectionList,
    /// Handles in random order; resolved by text.
    identities: SelectionList,
    overlay: OverlayState,
    operator_selection: usize,
    round: u32,
}

impl<S: SheetSource> GameController<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            form: LoadForm::default(),
            stream_dir: None,
            status: None,
            roster: Roster::new(),
            nicknames: SelectionList::default(),
            identities: SelectionList::default(),
            overlay: OverlayState::default(),
            operator_selection: NO_SELECTION,
            round: 1,
        }
    }

    /// Start with the operator fields filled in.
    pub fn with_form(source: S, form: LoadForm) -> Self {
        Self {
            form,
            ..Self::new(source)
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn form(&self) -> &LoadForm {
        &self.form
    }

    /// Stream directory from the last load that passed validation.
    pub fn stream_dir(&self) -> Option<&Path> {
        self.stream_dir.as_deref()
    }

    pub fn status(&self) -> Option<&LoadStatus> {
        self.status.as_ref()
    }

    pub fn nickname_list(&self) -> &SelectionList {
        &self.nicknames
    }

    pub fn identity_list(&self) -> &SelectionList {
        &self.identities
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn set_round(&mut self, round: u32) -> Result<(), GameError> {
        if round == 0 {
            return Err(GameError::InvalidRound);
        }
        self.round = round;
        Ok(())
    }

    /// Swap in a freshly loaded roster and rebuild every list.
    /// Selections point into the old lists, so both panels reset.
    pub(crate) fn install_roster<R: Rng + ?Sized>(&mut self, roster: Roster, rng: &mut R) {
        self.nicknames = SelectionList::new(roster.nicknames());
        self.identities = SelectionList::shuffled(roster.handles(), rng);
        self.roster = roster;
        self.overlay = OverlayState::default();
        self.operator_selection = NO_SELECTION;
    }

    // Operator panel

    /// Select a player in the operator list (0 clears the view).
    pub fn select_operator_player(&mut self, index: usize) -> Result<PlayerView, GameError> {
        self.operator_selection = self.nicknames.check_index(index)?;
        Ok(self.operator_view())
    }

    pub fn operator_view(&self) -> PlayerView {
        self.nicknames
            .player_at(self.operator_selection)
            .and_then(|id| self.roster.get(id))
            .map(PlayerView::of)
            .unwrap_or_default()
    }

    pub fn operator_snapshot(&self) -> OperatorSnapshot {
        OperatorSnapshot {
            form: self.form.clone(),
            status: self.status.as_ref().map(ToString::to_string).unwrap_or_default(),
            alert: self.source.last_alert().map(str::to_string),
            round: self.round,
            nicknames: self.nicknames.entries().to_vec(),
            selected: self.operator_selection,
            player: self.operator_view(),
        }
    }

    // Overlay panel

    pub fn overlay_state(&self) -> &OverlayState {
        &self.overlay
    }

    pub fn overlay_controls(&self) -> OverlayControls {
        self.overlay.controls()
    }

    pub fn overlay_snapshot(&self) -> OverlaySnapshot {
        OverlaySnapshot {
            nicknames: self.nicknames.entries().to_vec(),
            identities: self.identities.entries().to_vec(),
            state: self.overlay,
            controls: self.overlay.controls(),
        }
    }

    pub fn overlay_select(&mut self, selector: Selector, index: usize) -> Result<(), GameError> {
        self.overlay = self.next(OverlayEvent::Select(selector, index))?.state;
        Ok(())
    }

    /// Compare the selected claimed identity against the selected target's handle.
    pub fn check(&mut self) -> Result<Verdict, GameError> {
        self.overlay = self.next(OverlayEvent::Check)?.state;
        match self.overlay.phase {
            OverlayPhase::Checked { verdict, .. } => Ok(verdict),
            _ => Err(GameError::NotReady),
        }
    }

    /// Commit the checked guess into the roster. Allowed once per check.
    pub fn record(&mut self) -> Result<Verdict, GameError> {
        let next = self.next(OverlayEvent::Record)?;
        let commit = next.commit.ok_or(GameError::NothingToRecord)?;
        let verdict = self.roster.commit_guess(
            self.round,
            commit.guesser,
            commit.target,
            &commit.claimed_identity,
        )?;
        self.overlay = next.state;
        let nickname = |id| self.roster.get(id).map_or("?", |p| p.nickname.as_str());
        log::info!(
            "Round {}: {} guessed {} was {}: {}",
            self.round,
            nickname(commit.guesser),
            nickname(commit.target),
            commit.claimed_identity,
            verdict
        );
        Ok(verdict)
    }

    pub fn clear(&mut self) {
        self.overlay = OverlayState::default();
    }

    fn next(&self, event: OverlayEvent) -> Result<Transition, GameError> {
        let ctx = GuessContext {
            roster: &self.roster,
            nicknames: &self.nicknames,
            identities: &self.identities,
        };
        transition(&self.overlay, event, &ctx)
    }
}
