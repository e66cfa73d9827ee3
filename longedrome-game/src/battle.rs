//! Battle transitions: tutorial, turns, submissions, magic, talk, rest and home.
//!
//! Every public transition takes the current [`SessionState`] by reference and
//! returns an outcome carrying the `next` state. Rejected actions leave the
//! state untouched apart from `feedback`.
use rand::Rng;
use thiserror::Error;

use crate::config::{AmiabilityThresholds, GameConfig};
use crate::constants::{
    DAMAGE_GROWTH_PER_TURN, DAMAGE_PER_MISSING_TOKEN, LOG_HOME_ENTER, LOG_HOME_LEAVE,
    LOG_HOME_UNLOCKED, LOG_MAGIC_CAST, LOG_RESPONSE, LOG_REST,
    LOG_SUBMISSION_ACCEPTED, LOG_TALK, LOG_TURN_START, LOG_TUTORIAL_COMPLETE, TALK_FRIENDLY_HP,
    TALK_FRIENDLY_MP, TALK_NEUTRAL_MP,
};
use crate::dialogue::{
    self, ALREADY_SUBMITTED, ENEMY_PREPARING, HOME_ARRIVAL, MAGIC_FLICKER, REFLECTION_TITLE,
    REST_TEXT, ResponseOption, SELECTION_EMPTY, SELECTION_NOT_CONTINUOUS, SELECTION_OUT_OF_RANGE,
    SELECTION_NOT_PALINDROMIC, TUTORIAL_COMPLETED,
};
use crate::disposition::{apply_amiability, score_response};
use crate::numbers::{floor_f64_to_u32, usize_to_f64};
use crate::palindrome::is_palindrome;
use crate::state::{GamePhase, Selection, SessionState};
use crate::stats::Disposition;
use crate::timeline::{self, PendingStep};

/// Why a submission was refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionRejection {
    #[error("submissions are only accepted during the player's turn (currently {0})")]
    WrongPhase(GamePhase),
    #[error("nothing is selected")]
    EmptySelection,
    #[error("a selection was already submitted this round")]
    AlreadySubmitted,
    #[error("selection reaches past the end of the sequence")]
    OutOfRange,
    #[error("selection is not continuous")]
    Discontinuous,
    #[error("selection is not a palindrome")]
    NotPalindrome,
}

impl SubmissionRejection {
    /// Player-facing text for the rejection.
    #[must_use]
    pub fn feedback(self) -> String {
        match self {
            Self::WrongPhase(_) => String::from("Wait for your turn before submitting."),
            Self::EmptySelection => String::from(SELECTION_EMPTY),
            Self::AlreadySubmitted => String::from(ALREADY_SUBMITTED),
            Self::OutOfRange => String::from(SELECTION_OUT_OF_RANGE),
            Self::Discontinuous => String::from(SELECTION_NOT_CONTINUOUS),
            Self::NotPalindrome => String::from(SELECTION_NOT_PALINDROMIC),
        }
    }
}

/// Why a non-submission action was refused.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ActionRejection {
    #[error("{action} is not available during {phase}")]
    WrongPhase {
        action: &'static str,
        phase: GamePhase,
    },
    #[error("{cost} MP required, {available} available")]
    InsufficientMp { cost: i32, available: i32 },
    #[error("the optimal span failed validation")]
    SpellFlickered,
    #[error("already rested this round")]
    AlreadyRested,
    #[error("already talked this round")]
    AlreadyTalked,
    #[error("no dialog is awaiting a response")]
    NoPendingDialog,
    #[error("home is locked")]
    HomeLocked,
    #[error("index {index} is outside a sequence of {len}")]
    OutOfRange { index: usize, len: usize },
}

/// Result of a transition that only changes the session record.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionOutcome {
    pub rejection: Option<ActionRejection>,
    pub next: SessionState,
}

impl ActionOutcome {
    #[must_use]
    pub const fn applied(&self) -> bool {
        self.rejection.is_none()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub valid: bool,
    pub reason: Option<SubmissionRejection>,
    pub next: SessionState,
    /// First enemy-turn step to fire once the submission animation settles.
    pub pending: Option<PendingStep>,
}

/// Dialog opened by talking to the Guardian, or a home reflection.
#[derive(Debug, Clone, PartialEq)]
pub struct TalkDialog {
    pub title: String,
    pub lines: Vec<String>,
    pub options: &'static [ResponseOption],
    pub healed_hp: i32,
    pub healed_mp: i32,
    pub reflection: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TalkOutcome {
    pub rejection: Option<ActionRejection>,
    pub dialog: Option<TalkDialog>,
    pub next: SessionState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RespondOutcome {
    pub rejection: Option<ActionRejection>,
    /// Score of the response before clamping.
    pub delta: i32,
    /// Amiability change that survived clamping.
    pub applied_delta: i32,
    /// Home access became available for the first time this session.
    pub home_unlocked: bool,
    pub next: SessionState,
}

/// Damage dealt when the player's palindrome falls short of the optimal one.
#[must_use]
pub fn calculate_damage(enemy_length: usize, user_length: usize, turn_count: u32) -> u32 {
    if user_length >= enemy_length {
        return 0;
    }
    let missing = usize_to_f64(enemy_length - user_length);
    let growth = 1.0 + f64::from(turn_count) * DAMAGE_GROWTH_PER_TURN;
    floor_f64_to_u32(missing * DAMAGE_PER_MISSING_TOKEN * growth)
}

/// Lengths only: matching or beating the optimal length counts.
#[must_use]
pub const fn user_found_optimal(user_length: usize, optimal_length: usize) -> bool {
    user_length >= optimal_length
}

#[must_use]
pub const fn can_access_home(
    phase: GamePhase,
    amiability: i32,
    thresholds: &AmiabilityThresholds,
) -> bool {
    matches!(phase, GamePhase::Victory) || amiability >= thresholds.friendly
}

/// Record the first moment the way home opens. True only that first time.
pub(crate) fn announce_home_access(state: &mut SessionState, cfg: &GameConfig) -> bool {
    if state.home_prompt_shown
        || !can_access_home(state.phase, state.enemy.amiability, &cfg.amiability_thresholds)
    {
        return false;
    }
    state.home_prompt_shown = true;
    state.push_log(LOG_HOME_UNLOCKED);
    log::debug!("home unlocked during {}", state.phase);
    true
}

pub(crate) fn guardian(state: &SessionState, cfg: &GameConfig) -> &'static str {
    dialogue::guardian_name(state.enemy.amiability, &cfg.amiability_thresholds)
}

fn reject(state: &SessionState, rejection: ActionRejection, feedback: String) -> ActionOutcome {
    let mut next = state.clone();
    next.feedback = feedback;
    ActionOutcome {
        rejection: Some(rejection),
        next,
    }
}

fn wrong_phase(state: &SessionState, action: &'static str) -> ActionOutcome {
    let rejection = ActionRejection::WrongPhase {
        action,
        phase: state.phase,
    };
    log::debug!("rejected: {rejection}");
    ActionOutcome {
        rejection: Some(rejection),
        next: state.clone(),
    }
}

fn applied(next: SessionState) -> ActionOutcome {
    ActionOutcome {
        rejection: None,
        next,
    }
}

/// `Tutorial -> Idle` with a fresh sequence.
pub fn complete_tutorial<R: Rng + ?Sized>(
    state: &SessionState,
    cfg: &GameConfig,
    rng: &mut R,
) -> ActionOutcome {
    if state.phase != GamePhase::Tutorial {
        return wrong_phase(state, "completing the tutorial");
    }
    let mut next = state.clone();
    next.phase = GamePhase::Idle;
    next.regenerate(cfg, rng);
    next.feedback = String::from(TUTORIAL_COMPLETED);
    next.push_log(LOG_TUTORIAL_COMPLETE);
    announce_home_access(&mut next, cfg);
    log::debug!("tutorial complete; first sequence has {} tokens", next.sequence.len());
    applied(next)
}

/// `Idle -> UserTurn`: advances the turn counter and opens a new round.
#[must_use]
pub fn start_turn(state: &SessionState) -> ActionOutcome {
    if state.phase != GamePhase::Idle {
        return wrong_phase(state, "starting a turn");
    }
    let mut next = state.clone();
    next.turn_count = next.turn_count.saturating_add(1);
    next.selection.clear();
    next.show_optimal = false;
    next.flags.reset();
    next.awaiting_response = false;
    next.phase = GamePhase::UserTurn;
    next.feedback = dialogue::turn_prompt(next.turn_count);
    next.bump_epoch();
    next.push_log(LOG_TURN_START);
    log::debug!("turn {} started", next.turn_count);
    applied(next)
}

/// Add or remove one index from the open selection.
#[must_use]
pub fn toggle_selection(state: &SessionState, index: usize) -> ActionOutcome {
    if state.phase != GamePhase::UserTurn {
        return wrong_phase(state, "selecting colors");
    }
    let len = state.sequence.len();
    if index >= len {
        return reject(
            state,
            ActionRejection::OutOfRange { index, len },
            format!("There is no color at position {}.", index + 1),
        );
    }
    let mut next = state.clone();
    next.selection.toggle(index);
    applied(next)
}

/// Validate the selection and hand the round to the Guardian.
#[must_use]
pub fn submit_selection(state: &SessionState) -> SubmissionOutcome {
    let rejection = if state.flags.submitted {
        Some(SubmissionRejection::AlreadySubmitted)
    } else if state.phase != GamePhase::UserTurn {
        Some(SubmissionRejection::WrongPhase(state.phase))
    } else if state.selection.is_empty() {
        Some(SubmissionRejection::EmptySelection)
    } else if state
        .selection
        .as_slice()
        .iter()
        .any(|&index| index >= state.sequence.len())
    {
        Some(SubmissionRejection::OutOfRange)
    } else if !state.selection.is_continuous() {
        Some(SubmissionRejection::Discontinuous)
    } else if !is_palindrome(&state.selected_tokens()) {
        Some(SubmissionRejection::NotPalindrome)
    } else {
        None
    };

    let mut next = state.clone();
    if let Some(reason) = rejection {
        log::debug!("submission rejected: {reason}");
        next.feedback = reason.feedback();
        return SubmissionOutcome {
            valid: false,
            reason: Some(reason),
            next,
            pending: None,
        };
    }

    next.flags.submitted = true;
    next.phase = GamePhase::EnemyTurn;
    next.feedback = String::from(ENEMY_PREPARING);
    next.push_log(LOG_SUBMISSION_ACCEPTED);
    log::debug!(
        "submission accepted: {} tokens against optimal {}",
        next.selection.len(),
        next.optimal.length
    );
    let pending = timeline::first_step(&next);
    SubmissionOutcome {
        valid: true,
        reason: None,
        next,
        pending: Some(pending),
    }
}

/// Spend MP to reveal and select the optimal span.
///
/// Nothing is spent unless the span checks out as a palindrome of the board.
#[must_use]
pub fn cast_magic(state: &SessionState, cfg: &GameConfig) -> ActionOutcome {
    if state.phase != GamePhase::UserTurn {
        return wrong_phase(state, "casting magic");
    }
    if state.player.mp < cfg.magic_cost {
        return reject(
            state,
            ActionRejection::InsufficientMp {
                cost: cfg.magic_cost,
                available: state.player.mp,
            },
            dialogue::insufficient_mp(cfg.magic_cost),
        );
    }

    let span = &state.optimal;
    let valid_span = !span.is_empty()
        && state
            .sequence
            .get(span.indices())
            .is_some_and(|tokens| tokens == span.tokens.as_slice() && is_palindrome(tokens));
    if !valid_span {
        log::warn!("optimal span {}+{} failed validation", span.start, span.length);
        return reject(
            state,
            ActionRejection::SpellFlickered,
            String::from(MAGIC_FLICKER),
        );
    }

    let mut next = state.clone();
    next.player.spend_mp(cfg.magic_cost);
    next.show_optimal = true;
    next.selection = Selection::from_range(span.indices());
    next.feedback = dialogue::magic_revealed(span.length);
    next.push_log(LOG_MAGIC_CAST);
    applied(next)
}

/// Heal at home, once per round.
#[must_use]
pub fn rest(state: &SessionState, cfg: &GameConfig) -> ActionOutcome {
    if state.phase != GamePhase::Home {
        return wrong_phase(state, "resting");
    }
    if state.flags.rested {
        return reject(
            state,
            ActionRejection::AlreadyRested,
            dialogue::already_rested(guardian(state, cfg)),
        );
    }
    let mut next = state.clone();
    let (hp, mp) = next
        .player
        .restore(cfg.rest_healing.hp, cfg.rest_healing.mp);
    next.flags.rested = true;
    next.feedback = String::from(REST_TEXT);
    next.push_log(LOG_REST);
    log::debug!("rested for {hp} hp and {mp} mp");
    applied(next)
}

/// Open a conversation with the Guardian, or reflect when at home.
#[must_use]
pub fn talk(state: &SessionState, cfg: &GameConfig) -> TalkOutcome {
    let name = guardian(state, cfg);
    match state.phase {
        GamePhase::Home => {
            return TalkOutcome {
                rejection: None,
                dialog: Some(TalkDialog {
                    title: String::from(REFLECTION_TITLE),
                    lines: dialogue::reflection_lines(name).to_vec(),
                    options: &[],
                    healed_hp: 0,
                    healed_mp: 0,
                    reflection: true,
                }),
                next: state.clone(),
            };
        }
        GamePhase::Idle => {}
        _ => {
            let outcome = wrong_phase(state, "talking");
            return TalkOutcome {
                rejection: outcome.rejection,
                dialog: None,
                next: outcome.next,
            };
        }
    }
    if state.flags.talked {
        return TalkOutcome {
            rejection: Some(ActionRejection::AlreadyTalked),
            dialog: None,
            next: state.clone(),
        };
    }

    let mut next = state.clone();
    let (hp, mp) = match next.enemy.disposition(&cfg.amiability_thresholds) {
        Disposition::Hostile => (0, 0),
        Disposition::Neutral => (0, TALK_NEUTRAL_MP),
        Disposition::Friendly => (TALK_FRIENDLY_HP, TALK_FRIENDLY_MP),
    };
    let (healed_hp, healed_mp) = next.player.restore(hp, mp);
    next.flags.talked = true;
    next.awaiting_response = true;
    next.push_log(LOG_TALK);

    let lines = dialogue::guardian_dialog(state.turn_count, state.enemy.amiability)
        .iter()
        .map(|line| String::from(*line))
        .collect();
    TalkOutcome {
        rejection: None,
        dialog: Some(TalkDialog {
            title: String::from(name),
            lines,
            options: dialogue::response_options(state.turn_count),
            healed_hp,
            healed_mp,
            reflection: false,
        }),
        next,
    }
}

/// Score the player's reply and close the open dialog.
pub fn respond<R: Rng + ?Sized>(
    state: &SessionState,
    cfg: &GameConfig,
    text: &str,
    rng: &mut R,
) -> RespondOutcome {
    if !state.awaiting_response {
        return RespondOutcome {
            rejection: Some(ActionRejection::NoPendingDialog),
            delta: 0,
            applied_delta: 0,
            home_unlocked: false,
            next: state.clone(),
        };
    }
    let name = guardian(state, cfg);
    let mut next = state.clone();
    let delta = score_response(text, state.turn_count, rng);
    let applied_delta = apply_amiability(&mut next.enemy, delta);
    next.feedback = dialogue::reaction_feedback(delta, name);
    next.awaiting_response = false;
    next.push_log(LOG_RESPONSE);

    let home_unlocked = announce_home_access(&mut next, cfg);
    log::debug!(
        "response scored {delta} (applied {applied_delta}); amiability now {}",
        next.enemy.amiability
    );
    RespondOutcome {
        rejection: None,
        delta,
        applied_delta,
        home_unlocked,
        next,
    }
}

/// Leave the temple when the Guardian allows it.
#[must_use]
pub fn go_home(state: &SessionState, cfg: &GameConfig) -> ActionOutcome {
    if !matches!(
        state.phase,
        GamePhase::Idle | GamePhase::UserTurn | GamePhase::EnemyTurn
    ) {
        return wrong_phase(state, "going home");
    }
    let thresholds = &cfg.amiability_thresholds;
    if !can_access_home(state.phase, state.enemy.amiability, thresholds) {
        return reject(
            state,
            ActionRejection::HomeLocked,
            dialogue::home_access_message(
                state.phase,
                state.enemy.amiability,
                guardian(state, cfg),
                thresholds,
            ),
        );
    }
    let mut next = state.clone();
    next.phase = GamePhase::Home;
    next.clear_board();
    next.awaiting_response = false;
    next.bump_epoch();
    next.feedback = String::from(HOME_ARRIVAL);
    next.push_log(LOG_HOME_ENTER);
    applied(next)
}

/// `Home -> Idle` with a fresh sequence.
pub fn return_to_temple<R: Rng + ?Sized>(
    state: &SessionState,
    cfg: &GameConfig,
    rng: &mut R,
) -> ActionOutcome {
    if state.phase != GamePhase::Home {
        return wrong_phase(state, "returning to the temple");
    }
    let mut next = state.clone();
    next.phase = GamePhase::Idle;
    next.regenerate(cfg, rng);
    next.feedback = dialogue::returned_to_temple(guardian(&next, cfg));
    next.push_log(LOG_HOME_LEAVE);
    applied(next)
}

/// Fresh session; the epoch keeps counting so older pending steps go stale.
#[must_use]
pub fn reset(state: &SessionState, cfg: &GameConfig) -> SessionState {
    let mut next = SessionState::new(cfg);
    next.epoch = state.epoch;
    next.bump_epoch();
    log::debug!("session reset at epoch {}", next.epoch);
    next
}
