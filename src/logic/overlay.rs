//! Overlay guess/check flow as a pure state machine.
//!
//! `Idle` -> `Ready` once guesser, target nickname and claimed player name are all chosen.
//! `Check` locks the selectors and shows the verdict; `Record` commits the guess once;
//! `Clear` returns to `Idle` from anywhere.

use crate::logic::selection::{SelectionList, NO_SELECTION};
use crate::models::{verdict, GameError, PlayerId, Roster, Verdict};
use serde::{Deserialize, Serialize};

/// Verdict text before any check.
pub const NEUTRAL_VERDICT: &str = "...";

/// The three overlay selectors.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selector {
    /// Who is making the guess (nickname list).
    Guesser,
    /// Who is being guessed (nickname list).
    Target,
    /// Claimed true identity (shuffled handle list).
    Identity,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "phase")]
pub enum OverlayPhase {
    #[default]
    Idle,
    Ready,
    /// Selectors locked; `recorded` turns true once the guess is committed.
    Checked { verdict: Verdict, recorded: bool },
}

/// Selected index per selector (0 = placeholder) plus the current phase.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct OverlayState {
    pub guesser: usize,
    pub target: usize,
    pub identity: usize,
    #[serde(flatten)]
    pub phase: OverlayPhase,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OverlayEvent {
    Select(Selector, usize),
    Check,
    Record,
    Clear,
}

/// Read-only view of the lists and roster the selections point into.
#[derive(Clone, Copy, Debug)]
pub struct GuessContext<'a> {
    pub roster: &'a Roster,
    /// Nickname list shared by the guesser and target selectors.
    pub nicknames: &'a SelectionList,
    pub identities: &'a SelectionList,
}

/// Guess to apply to the roster after a `Record`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommitGuess {
    pub guesser: PlayerId,
    pub target: PlayerId,
    pub claimed_identity: String,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Transition {
    pub state: OverlayState,
    pub commit: Option<CommitGuess>,
}

impl Transition {
    fn to(state: OverlayState) -> Self {
        Self { state, commit: None }
    }
}

/// Which controls the overlay should enable, and what the verdict label says.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct OverlayControls {
    pub selectors_enabled: bool,
    pub check_enabled: bool,
    pub record_enabled: bool,
    pub verdict_text: &'static str,
}

impl OverlayState {
    pub fn all_selected(&self) -> bool {
        self.guesser != NO_SELECTION && self.target != NO_SELECTION && self.identity != NO_SELECTION
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.phase, OverlayPhase::Checked { .. })
    }

    pub fn controls(&self) -> OverlayControls {
        match self.phase {
            OverlayPhase::Idle => OverlayControls {
                selectors_enabled: true,
                check_enabled: false,
                record_enabled: false,
                verdict_text: NEUTRAL_VERDICT,
            },
            OverlayPhase::Ready => OverlayControls {
                selectors_enabled: true,
                check_enabled: true,
                record_enabled: false,
                verdict_text: NEUTRAL_VERDICT,
            },
            OverlayPhase::Checked { verdict, recorded } => OverlayControls {
                selectors_enabled: false,
                check_enabled: false,
                record_enabled: !recorded,
                verdict_text: verdict.banner(),
            },
        }
    }
}

/// Next state for `event`. Never mutates the roster; a `Record` hands back a `CommitGuess` instead.
pub fn transition(
    state: &OverlayState,
    event: OverlayEvent,
    ctx: &GuessContext<'_>,
) -> Result<Transition, GameError> {
    match event {
        OverlayEvent::Select(selector, index) => {
            if state.is_locked() {
                return Err(GameError::SelectorsLocked);
            }
            let mut next = *state;
            match selector {
                Selector::Guesser => next.guesser = ctx.nicknames.check_index(index)?,
                Selector::Target => next.target = ctx.nicknames.check_index(index)?,
                Selector::Identity => next.identity = ctx.identities.check_index(index)?,
            }
            next.phase = if next.all_selected() {
                OverlayPhase::Ready
            } else {
                OverlayPhase::Idle
            };
            Ok(Transition::to(next))
        }
        OverlayEvent::Check => {
            if state.phase != OverlayPhase::Ready {
                return Err(GameError::NotReady);
            }
            let guess = resolve(state, ctx)?;
            let target = ctx
                .roster
                .get(guess.target)
                .ok_or(GameError::PlayerNotFound(guess.target))?;
            let mut next = *state;
            next.phase = OverlayPhase::Checked {
                verdict: verdict(&target.handle, &guess.claimed_identity),
                recorded: false,
            };
            Ok(Transition::to(next))
        }
        OverlayEvent::Record => match state.phase {
            OverlayPhase::Checked {
                verdict,
                recorded: false,
            } => {
                let commit = resolve(state, ctx)?;
                let mut next = *state;
                next.phase = OverlayPhase::Checked {
                    verdict,
                    recorded: true,
                };
                Ok(Transition {
                    state: next,
                    commit: Some(commit),
                })
            }
            _ => Err(GameError::NothingToRecord),
        },
        OverlayEvent::Clear => Ok(Transition::to(OverlayState::default())),
    }
}

/// Guesser and target by list position; claimed identity by its text.
fn resolve(state: &OverlayState, ctx: &GuessContext<'_>) -> Result<CommitGuess, GameError> {
    let guesser = ctx.nicknames.player_at(state.guesser).ok_or(GameError::NotReady)?;
    let target = ctx.nicknames.player_at(state.target).ok_or(GameError::NotReady)?;
    let claimed_identity = ctx
        .identities
        .text_at(state.identity)
        .ok_or(GameError::NotReady)?
        .to_string();
    if !ctx.roster.players().iter().any(|p| p.handle == claimed_identity) {
        return Err(GameError::UnknownIdentity(claimed_identity));
    }
    Ok(CommitGuess {
        guesser,
        target,
        claimed_identity,
    })
}
