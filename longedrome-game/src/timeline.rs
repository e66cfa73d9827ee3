//! Enemy-turn resolution as an explicit sequence of steps.
//!
//! A valid submission yields a [`PendingStep`] stamped with the session epoch.
//! The host fires it whenever its animation delay elapses and gets the next
//! step back. Any transition that moves the session on bumps the epoch, so a
//! step fired late reports [`StepStatus::Stale`] and changes nothing.
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::battle::{
    ActionRejection, announce_home_access, calculate_damage, guardian, user_found_optimal,
};
use crate::config::GameConfig;
use crate::constants::{
    LOG_DEFEAT, LOG_ENEMY_DAMAGE, LOG_ENEMY_NO_EFFECT, LOG_ENEMY_REVEAL, LOG_FINAL_BATTLE,
    LOG_ROUND_COMPLETE, LOG_VICTORY_FINAL, LOG_VICTORY_FRIENDLY,
};
use crate::dialogue::{self, AUTOMATIC_WIN};
use crate::state::{GamePhase, SessionState, TurnReport, TurnVerdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionStep {
    RevealOptimal,
    Compare,
    ApplyDamage,
    CheckDefeat,
    CheckRoundLimit,
    Advance,
}

impl ResolutionStep {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RevealOptimal => "reveal-optimal",
            Self::Compare => "compare",
            Self::ApplyDamage => "apply-damage",
            Self::CheckDefeat => "check-defeat",
            Self::CheckRoundLimit => "check-round-limit",
            Self::Advance => "advance",
        }
    }
}

/// A step scheduled against one epoch of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingStep {
    pub epoch: u64,
    pub step: ResolutionStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Applied,
    Stale,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub status: StepStatus,
    pub next: SessionState,
    pub pending: Option<PendingStep>,
    /// Set once the turn is decided.
    pub verdict: Option<TurnVerdict>,
}

/// Outcome of running a whole enemy turn at once.
#[derive(Debug, Clone, PartialEq)]
pub struct EnemyTurnResolution {
    pub damage: u32,
    pub verdict: TurnVerdict,
    pub next: SessionState,
}

pub(crate) const fn first_step(state: &SessionState) -> PendingStep {
    PendingStep {
        epoch: state.epoch,
        step: ResolutionStep::RevealOptimal,
    }
}

/// True when `pending` no longer belongs to `state`.
#[must_use]
pub fn is_stale(state: &SessionState, pending: PendingStep) -> bool {
    pending.epoch != state.epoch || state.phase != GamePhase::EnemyTurn
}

/// Fire one pending step.
pub fn run_step<R: Rng + ?Sized>(
    state: &SessionState,
    cfg: &GameConfig,
    rng: &mut R,
    pending: PendingStep,
) -> StepOutcome {
    let mut next = state.clone();
    let (status, pending) = apply_step(&mut next, cfg, rng, pending);
    let verdict = if status == StepStatus::Applied && pending.is_none() {
        next.last_turn.as_ref().and_then(|report| report.verdict)
    } else {
        None
    };
    StepOutcome {
        status,
        next,
        pending,
        verdict,
    }
}

/// Run every remaining step of the current enemy turn synchronously.
///
/// # Errors
///
/// Returns [`ActionRejection::WrongPhase`] outside the enemy turn.
pub fn resolve_enemy_turn<R: Rng + ?Sized>(
    state: &SessionState,
    cfg: &GameConfig,
    rng: &mut R,
) -> Result<EnemyTurnResolution, ActionRejection> {
    let mut next = state.clone();
    let (damage, verdict) = resolve_in_place(&mut next, cfg, rng)?;
    Ok(EnemyTurnResolution {
        damage,
        verdict,
        next,
    })
}

pub(crate) fn resolve_in_place<R: Rng + ?Sized>(
    state: &mut SessionState,
    cfg: &GameConfig,
    rng: &mut R,
) -> Result<(u32, TurnVerdict), ActionRejection> {
    if state.phase != GamePhase::EnemyTurn {
        return Err(ActionRejection::WrongPhase {
            action: "resolving the enemy turn",
            phase: state.phase,
        });
    }
    let mut pending = Some(first_step(state));
    while let Some(step) = pending {
        let (_, following) = apply_step(state, cfg, rng, step);
        pending = following;
    }
    let report = state.last_turn.clone().unwrap_or_default();
    Ok((report.damage, report.verdict.unwrap_or(TurnVerdict::Continue)))
}

pub(crate) fn apply_step<R: Rng + ?Sized>(
    state: &mut SessionState,
    cfg: &GameConfig,
    rng: &mut R,
    pending: PendingStep,
) -> (StepStatus, Option<PendingStep>) {
    if is_stale(state, pending) {
        log::debug!(
            "ignoring stale {} step (epoch {} vs {})",
            pending.step.as_str(),
            pending.epoch,
            state.epoch
        );
        return (StepStatus::Stale, None);
    }

    let name = guardian(state, cfg);
    let following = match pending.step {
        ResolutionStep::RevealOptimal => {
            state.show_optimal = true;
            state.feedback = dialogue::enemy_reveal(name, state.optimal.length);
            state.push_log(LOG_ENEMY_REVEAL);
            Some(ResolutionStep::Compare)
        }
        ResolutionStep::Compare => {
            let user_length = state.selection.len();
            let optimal_length = state.optimal.length;
            let found = user_found_optimal(user_length, optimal_length);
            state.last_turn = Some(TurnReport {
                turn: state.turn_count,
                user_length,
                optimal_length,
                found_optimal: found,
                damage: 0,
                verdict: None,
            });
            state.feedback =
                dialogue::comparison_text(user_length, optimal_length, state.final_battle, name);
            if state.final_battle {
                Some(ResolutionStep::CheckRoundLimit)
            } else {
                Some(ResolutionStep::ApplyDamage)
            }
        }
        ResolutionStep::ApplyDamage => {
            let damage = calculate_damage(
                state.optimal.length,
                state.selection.len(),
                state.turn_count,
            );
            if damage > 0 {
                let lost = state.player.take_damage(damage);
                state.feedback = dialogue::enemy_attack(name, state.optimal.length, damage);
                state.push_log(LOG_ENEMY_DAMAGE);
                log::debug!("player took {damage} damage ({lost} hp lost)");
            } else {
                state.feedback = dialogue::attack_deflected(name);
                state.push_log(LOG_ENEMY_NO_EFFECT);
            }
            if let Some(report) = state.last_turn.as_mut() {
                report.damage = damage;
            }
            Some(ResolutionStep::CheckDefeat)
        }
        ResolutionStep::CheckDefeat => {
            if state.player.is_defeated() {
                state.feedback = dialogue::defeated_by(name);
                finish(state, GamePhase::GameOver, TurnVerdict::Defeat, LOG_DEFEAT);
                None
            } else {
                Some(ResolutionStep::CheckRoundLimit)
            }
        }
        ResolutionStep::CheckRoundLimit => check_round_limit(state, cfg, rng, name),
        ResolutionStep::Advance => {
            state.phase = GamePhase::Idle;
            state.regenerate(cfg, rng);
            state.feedback = dialogue::round_complete(state.turn_count, name);
            state.push_log(LOG_ROUND_COMPLETE);
            set_verdict(state, TurnVerdict::Continue);
            None
        }
    };
    let following = following.map(|step| PendingStep {
        epoch: state.epoch,
        step,
    });
    (StepStatus::Applied, following)
}

fn check_round_limit<R: Rng + ?Sized>(
    state: &mut SessionState,
    cfg: &GameConfig,
    rng: &mut R,
    name: &str,
) -> Option<ResolutionStep> {
    if state.final_battle {
        let found = state
            .last_turn
            .as_ref()
            .is_some_and(|report| report.found_optimal);
        if found {
            finish(state, GamePhase::Victory, TurnVerdict::Victory, LOG_VICTORY_FINAL);
            announce_home_access(state, cfg);
        } else {
            finish(state, GamePhase::GameOver, TurnVerdict::Defeat, LOG_DEFEAT);
        }
        return None;
    }
    if state.turn_count < cfg.max_turns {
        return Some(ResolutionStep::Advance);
    }
    if state.enemy.amiability >= cfg.amiability_thresholds.friendly {
        state.feedback = String::from(AUTOMATIC_WIN);
        finish(
            state,
            GamePhase::Victory,
            TurnVerdict::Victory,
            LOG_VICTORY_FRIENDLY,
        );
        announce_home_access(state, cfg);
        return None;
    }

    state.final_battle = true;
    state.regenerate(cfg, rng);
    state.flags.reset();
    state.phase = GamePhase::UserTurn;
    state.feedback = dialogue::final_challenge_announcement(name);
    state.bump_epoch();
    state.push_log(LOG_FINAL_BATTLE);
    set_verdict(state, TurnVerdict::FinalBattle);
    log::debug!("final battle begins after turn {}", state.turn_count);
    None
}

fn finish(state: &mut SessionState, phase: GamePhase, verdict: TurnVerdict, log_key: &str) {
    state.phase = phase;
    state.bump_epoch();
    state.push_log(log_key);
    set_verdict(state, verdict);
    log::debug!("turn {} ended: {}", state.turn_count, verdict.as_str());
}

fn set_verdict(state: &mut SessionState, verdict: TurnVerdict) {
    if let Some(report) = state.last_turn.as_mut() {
        report.verdict = Some(verdict);
    }
}
