//! Stateful façade bundling a session record, its config and RNG streams.
use crate::battle::{self, ActionOutcome, ActionRejection, SubmissionRejection, TalkDialog};
use crate::config::{ConfigError, GameConfig};
use crate::dialogue;
use crate::rng::RngBundle;
use crate::state::{GamePhase, SessionState, TurnVerdict};
use crate::stats::{Disposition, HealthCondition};
use crate::timeline::{self, PendingStep, StepStatus};

/// What firing one pending step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepReport {
    pub status: StepStatus,
    pub pending: Option<PendingStep>,
    pub verdict: Option<TurnVerdict>,
}

/// Result of a scored response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseReport {
    pub delta: i32,
    pub applied_delta: i32,
    pub home_unlocked: bool,
}

/// One player's battle against the Guardian.
///
/// `Send` but not shared: a host driving many sessions owns one per task or
/// wraps it in a mutex.
#[derive(Debug, Clone)]
pub struct BattleSession {
    cfg: GameConfig,
    state: SessionState,
    rng: RngBundle,
}

impl BattleSession {
    /// Validate `cfg` and open a session in the tutorial phase.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `cfg` violates an invariant.
    pub fn new(cfg: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        cfg.validate()?;
        let state = SessionState::new(&cfg);
        Ok(Self {
            cfg,
            state,
            rng: RngBundle::from_user_seed(seed),
        })
    }

    #[must_use]
    pub fn with_defaults(seed: u64) -> Self {
        let cfg = GameConfig::default();
        let state = SessionState::new(&cfg);
        Self {
            cfg,
            state,
            rng: RngBundle::from_user_seed(seed),
        }
    }

    /// Resume from an existing record.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when `cfg` violates an invariant.
    pub fn from_state(state: SessionState, cfg: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            state,
            rng: RngBundle::from_user_seed(seed),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.cfg
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    pub const fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn with_state_mut<R>(&mut self, f: impl FnOnce(&mut SessionState) -> R) -> R {
        f(&mut self.state)
    }

    #[must_use]
    pub fn into_state(self) -> SessionState {
        self.state
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.rng.seed()
    }

    #[must_use]
    pub const fn phase(&self) -> GamePhase {
        self.state.phase
    }

    #[must_use]
    pub fn health_condition(&self) -> HealthCondition {
        self.state.player.condition(&self.cfg.health_thresholds)
    }

    #[must_use]
    pub const fn disposition(&self) -> Disposition {
        self.state.enemy.disposition(&self.cfg.amiability_thresholds)
    }

    #[must_use]
    pub fn guardian_name(&self) -> &'static str {
        battle::guardian(&self.state, &self.cfg)
    }

    #[must_use]
    pub const fn can_access_home(&self) -> bool {
        battle::can_access_home(
            self.state.phase,
            self.state.enemy.amiability,
            &self.cfg.amiability_thresholds,
        )
    }

    /// Closing lines for the most recent decided turn, empty while play continues.
    #[must_use]
    pub fn verdict_dialog(&self) -> &'static [&'static str] {
        match self.state.last_turn.as_ref().and_then(|report| report.verdict) {
            Some(verdict) => dialogue::verdict_dialog(verdict, self.state.final_battle),
            None => &[],
        }
    }

    fn commit(&mut self, outcome: ActionOutcome) -> Result<(), ActionRejection> {
        self.state = outcome.next;
        outcome.rejection.map_or(Ok(()), Err)
    }

    /// # Errors
    ///
    /// Returns [`ActionRejection::WrongPhase`] outside the tutorial.
    pub fn complete_tutorial(&mut self) -> Result<(), ActionRejection> {
        let outcome = battle::complete_tutorial(&self.state, &self.cfg, self.rng.sequence());
        self.commit(outcome)
    }

    /// # Errors
    ///
    /// Returns [`ActionRejection::WrongPhase`] outside `Idle`.
    pub fn start_turn(&mut self) -> Result<(), ActionRejection> {
        let outcome = battle::start_turn(&self.state);
        self.commit(outcome)
    }

    /// # Errors
    ///
    /// Returns [`ActionRejection`] outside the player's turn or for an index past the sequence.
    pub fn toggle_selection(&mut self, index: usize) -> Result<(), ActionRejection> {
        let outcome = battle::toggle_selection(&self.state, index);
        self.commit(outcome)
    }

    /// Submit the selection, returning the first enemy-turn step to fire.
    ///
    /// # Errors
    ///
    /// Returns the [`SubmissionRejection`]; `feedback` carries the player text.
    pub fn submit(&mut self) -> Result<PendingStep, SubmissionRejection> {
        let outcome = battle::submit_selection(&self.state);
        self.state = outcome.next;
        match (outcome.reason, outcome.pending) {
            (None, Some(pending)) => Ok(pending),
            (Some(reason), _) => Err(reason),
            (None, None) => Err(SubmissionRejection::WrongPhase(self.state.phase)),
        }
    }

    /// Fire a step handed out by [`submit`](Self::submit) or a previous step.
    pub fn fire(&mut self, pending: PendingStep) -> StepReport {
        let (status, pending) =
            timeline::apply_step(&mut self.state, &self.cfg, self.rng.sequence(), pending);
        let verdict = match (status, pending) {
            (StepStatus::Applied, None) => self.state.last_turn.as_ref().and_then(|r| r.verdict),
            _ => None,
        };
        StepReport {
            status,
            pending,
            verdict,
        }
    }

    /// Run the rest of the enemy turn at once, returning the damage dealt and the verdict.
    ///
    /// # Errors
    ///
    /// Returns [`ActionRejection::WrongPhase`] outside the enemy turn.
    pub fn resolve_enemy_turn(&mut self) -> Result<(u32, TurnVerdict), ActionRejection> {
        timeline::resolve_in_place(&mut self.state, &self.cfg, self.rng.sequence())
    }

    /// Submit and resolve in one call.
    ///
    /// # Errors
    ///
    /// Returns the submission rejection, or `None` inside the error when the
    /// resolution itself was refused.
    pub fn play_selection(&mut self) -> Result<(u32, TurnVerdict), Option<SubmissionRejection>> {
        self.submit().map_err(Some)?;
        self.resolve_enemy_turn().map_err(|_| None)
    }

    /// # Errors
    ///
    /// Returns [`ActionRejection`] outside the player's turn or without enough MP.
    pub fn cast_magic(&mut self) -> Result<(), ActionRejection> {
        let outcome = battle::cast_magic(&self.state, &self.cfg);
        self.commit(outcome)
    }

    /// # Errors
    ///
    /// Returns [`ActionRejection`] away from home or after resting this round.
    pub fn rest(&mut self) -> Result<(), ActionRejection> {
        let outcome = battle::rest(&self.state, &self.cfg);
        self.commit(outcome)
    }

    /// # Errors
    ///
    /// Returns [`ActionRejection`] outside `Idle`/`Home` or after talking this round.
    pub fn talk(&mut self) -> Result<TalkDialog, ActionRejection> {
        let outcome = battle::talk(&self.state, &self.cfg);
        self.state = outcome.next;
        match (outcome.rejection, outcome.dialog) {
            (Some(rejection), _) => Err(rejection),
            (None, Some(dialog)) => Ok(dialog),
            (None, None) => Err(ActionRejection::NoPendingDialog),
        }
    }

    /// # Errors
    ///
    /// Returns [`ActionRejection::NoPendingDialog`] when no talk is open.
    pub fn respond(&mut self, text: &str) -> Result<ResponseReport, ActionRejection> {
        let outcome = battle::respond(&self.state, &self.cfg, text, self.rng.dialogue());
        self.state = outcome.next;
        outcome.rejection.map_or(
            Ok(ResponseReport {
                delta: outcome.delta,
                applied_delta: outcome.applied_delta,
                home_unlocked: outcome.home_unlocked,
            }),
            Err,
        )
    }

    /// # Errors
    ///
    /// Returns [`ActionRejection::HomeLocked`] until the Guardian is friendly.
    pub fn go_home(&mut self) -> Result<(), ActionRejection> {
        let outcome = battle::go_home(&self.state, &self.cfg);
        self.commit(outcome)
    }

    /// # Errors
    ///
    /// Returns [`ActionRejection::WrongPhase`] away from home.
    pub fn return_to_temple(&mut self) -> Result<(), ActionRejection> {
        let outcome = battle::return_to_temple(&self.state, &self.cfg, self.rng.sequence());
        self.commit(outcome)
    }

    pub fn reset(&mut self) {
        self.state = battle::reset(&self.state, &self.cfg);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn select_optimal(session: &mut BattleSession) {
        let span = session.state().optimal.clone();
        for index in span.indices() {
            session.toggle_selection(index).expect("toggle");
        }
    }

    #[test]
    fn session_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<BattleSession>();
    }

    #[test]
    fn rejects_invalid_config() {
        let cfg = GameConfig {
            max_turns: 0,
            ..GameConfig::default()
        };
        assert!(BattleSession::new(cfg, 1).is_err());
    }

    #[test]
    fn same_seed_same_sequences() {
        let mut a = BattleSession::with_defaults(77);
        let mut b = BattleSession::with_defaults(77);
        a.complete_tutorial().unwrap();
        b.complete_tutorial().unwrap();
        assert_eq!(a.state().sequence, b.state().sequence);
    }

    #[test]
    fn perfect_play_reaches_final_battle_and_victory() {
        let mut session = BattleSession::with_defaults(2024);
        session.complete_tutorial().unwrap();
        let max_turns = session.config().max_turns;
        for turn in 1..=max_turns {
            session.start_turn().unwrap();
            select_optimal(&mut session);
            let (damage, verdict) = session.play_selection().unwrap();
            assert_eq!(damage, 0);
            if turn < max_turns {
                assert_eq!(verdict, TurnVerdict::Continue);
                assert_eq!(session.phase(), GamePhase::Idle);
            } else {
                assert_eq!(verdict, TurnVerdict::FinalBattle);
            }
        }
        assert_eq!(session.phase(), GamePhase::UserTurn);
        select_optimal(&mut session);
        let (_, verdict) = session.play_selection().unwrap();
        assert_eq!(verdict, TurnVerdict::Victory);
        assert_eq!(session.phase(), GamePhase::Victory);
        assert!(session.can_access_home());
    }

    #[test]
    fn stepwise_firing_matches_state_machine() {
        let mut session = BattleSession::with_defaults(5);
        session.complete_tutorial().unwrap();
        session.start_turn().unwrap();
        session.toggle_selection(0).unwrap();
        let mut pending = Some(session.submit().unwrap());
        let mut last = None;
        while let Some(step) = pending {
            let report = session.fire(step);
            assert_eq!(report.status, StepStatus::Applied);
            pending = report.pending;
            last = report.verdict;
        }
        assert_eq!(last, Some(TurnVerdict::Continue));
        assert_eq!(session.phase(), GamePhase::Idle);
    }

    #[test]
    fn talk_and_respond_through_session() {
        let mut session = BattleSession::with_defaults(9);
        session.complete_tutorial().unwrap();
        let dialog = session.talk().unwrap();
        assert_eq!(dialog.title, "Ancient Guardian");
        assert_eq!(dialog.options.len(), 4);
        let report = session.respond("I seek balance and harmony").unwrap();
        assert!(report.delta >= 5);
        assert_eq!(session.state().enemy.amiability, 50 + report.applied_delta);
        assert_eq!(session.talk(), Err(ActionRejection::AlreadyTalked));
    }

    #[test]
    fn reset_returns_to_tutorial() {
        let mut session = BattleSession::with_defaults(3);
        session.complete_tutorial().unwrap();
        session.start_turn().unwrap();
        let epoch = session.state().epoch;
        session.reset();
        assert_eq!(session.phase(), GamePhase::Tutorial);
        assert!(session.state().epoch > epoch);
        assert_eq!(session.state().turn_count, 0);
    }
}
