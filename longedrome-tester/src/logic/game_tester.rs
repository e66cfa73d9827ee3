use std::sync::Arc;

use anyhow::{Context, Result};
use colored::Colorize;
use longedrome_game::{
    BattleSession, Color, GameConfig, GamePhase, SessionState, SubmissionRejection, TurnVerdict,
    home_unlock_dialog, response_options,
};

use crate::logic::policy::{GameplayStrategy, PlayerPolicy, TurnPlan};

/// Upper bound on driver steps per run; a healthy session ends far sooner.
const DEFAULT_STEP_LIMIT: u32 = 256;

/// Declarative plan for running a simulation session.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    pub strategy: GameplayStrategy,
    pub max_rounds: Option<u32>,
    pub setup: Option<fn(&mut SessionState)>,
    pub expectations: Vec<SimulationExpectation>,
}

impl SimulationPlan {
    #[must_use]
    pub const fn new(strategy: GameplayStrategy) -> Self {
        Self {
            strategy,
            max_rounds: None,
            setup: None,
            expectations: Vec::new(),
        }
    }

    /// Stop after this many resolved rounds even if the battle is still running.
    #[must_use]
    pub const fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = Some(max_rounds);
        self
    }

    #[must_use]
    pub fn with_setup(mut self, setup: fn(&mut SessionState)) -> Self {
        self.setup = Some(setup);
        self
    }

    #[must_use]
    pub fn with_expectation(mut self, expectation: impl Into<SimulationExpectation>) -> Self {
        self.expectations.push(expectation.into());
        self
    }
}

/// Assertion hook run after a simulation completes.
type SimulationExpectationFn =
    Arc<dyn Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static>;

#[derive(Clone)]
pub struct SimulationExpectation(SimulationExpectationFn);

impl std::fmt::Debug for SimulationExpectation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulationExpectation").finish()
    }
}

impl SimulationExpectation {
    pub fn evaluate(&self, summary: &SimulationSummary) -> Result<()> {
        (self.0)(summary)
    }
}

impl<F> From<F> for SimulationExpectation
where
    F: Fn(&SimulationSummary) -> Result<()> + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self(Arc::new(f))
    }
}

/// One resolved enemy turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundRecord {
    pub turn: u32,
    pub final_battle: bool,
    pub sequence: Vec<Color>,
    pub optimal_length: usize,
    pub user_length: usize,
    pub used_magic: bool,
    pub damage: u32,
    pub hp_after: i32,
    pub verdict: TurnVerdict,
}

/// Aggregate counters for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunMetrics {
    pub rounds_played: u32,
    pub optimal_rounds: u32,
    pub total_damage: u32,
    pub magic_casts: u32,
    pub talks: u32,
    pub home_unlocks: u32,
    pub home_visits: u32,
    pub rejected_submissions: u32,
    pub final_battle_reached: bool,
    pub amiability_trace: Vec<i32>,
}

/// Complete record of a simulation run.
#[derive(Debug, Clone)]
pub struct SimulationSummary {
    pub seed: u64,
    pub strategy: GameplayStrategy,
    pub config: Arc<GameConfig>,
    pub rounds: Vec<RoundRecord>,
    pub metrics: RunMetrics,
    pub final_state: SessionState,
    pub ending_phase: GamePhase,
    pub game_ended: bool,
    /// Closing dialog for the last decided turn.
    pub closing_lines: &'static [&'static str],
}

impl SimulationSummary {
    #[must_use]
    pub fn victory(&self) -> bool {
        self.ending_phase == GamePhase::Victory
    }

    #[must_use]
    pub fn ending_label(&self) -> &'static str {
        if self.game_ended {
            self.ending_phase.as_str()
        } else {
            "halted"
        }
    }
}

/// Headless deterministic runner for battle sessions.
#[derive(Debug, Clone)]
pub struct GameTester {
    verbose: bool,
    config: Arc<GameConfig>,
}

impl GameTester {
    pub fn new(config: GameConfig, verbose: bool) -> Self {
        Self {
            verbose,
            config: Arc::new(config),
        }
    }

    pub const fn verbose(&self) -> bool {
        self.verbose
    }

    /// Play one session to its end (or the plan's round cap) under `plan.strategy`.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is rejected or the session
    /// refuses an action the driver believed legal.
    pub fn run_plan(&self, plan: &SimulationPlan, seed: u64) -> Result<SimulationSummary> {
        let mut session = BattleSession::new((*self.config).clone(), seed)
            .context("tester configuration rejected")?;
        session
            .complete_tutorial()
            .context("tutorial could not be completed")?;
        if let Some(setup) = plan.setup {
            session.with_state_mut(setup);
        }

        if self.verbose {
            log_initial_state(seed, plan, session.state());
        }
        log::debug!("simulation start seed={seed} strategy={}", plan.strategy);

        let mut policy = plan.strategy.create_policy(seed);
        let mut rounds = Vec::new();
        let mut metrics = RunMetrics {
            amiability_trace: vec![session.state().enemy.amiability],
            ..RunMetrics::default()
        };
        let round_cap = plan.max_rounds.unwrap_or(u32::MAX);

        for _ in 0..DEFAULT_STEP_LIMIT {
            if session.phase().is_terminal() || metrics.rounds_played >= round_cap {
                break;
            }
            match session.phase() {
                GamePhase::Tutorial => session.complete_tutorial()?,
                GamePhase::Idle => {
                    self.between_rounds(&mut session, policy.as_mut(), &mut metrics)?;
                }
                GamePhase::UserTurn => {
                    let record = self.play_turn(&mut session, policy.as_mut(), &mut metrics)?;
                    if self.verbose {
                        log_round(&record);
                    }
                    rounds.push(record);
                }
                GamePhase::EnemyTurn => {
                    session.resolve_enemy_turn()?;
                }
                GamePhase::Home => {
                    metrics.home_visits += 1;
                    session.rest().ok();
                    session.return_to_temple()?;
                }
                GamePhase::GameOver | GamePhase::Victory => break,
            }
        }

        let closing_lines = session.verdict_dialog();
        let final_state = session.into_state();
        let ending_phase = final_state.phase;
        let game_ended = ending_phase.is_terminal();
        if self.verbose {
            println!(
                "🏁 Simulation ended: {} after {} rounds",
                ending_phase.as_str(),
                metrics.rounds_played
            );
        }
        Ok(SimulationSummary {
            seed,
            strategy: plan.strategy,
            config: Arc::clone(&self.config),
            rounds,
            metrics,
            final_state,
            ending_phase,
            game_ended,
            closing_lines,
        })
    }

    fn between_rounds(
        &self,
        session: &mut BattleSession,
        policy: &mut (dyn PlayerPolicy + Send),
        metrics: &mut RunMetrics,
    ) -> Result<()> {
        if policy.wants_talk(session.state()) {
            session.talk()?;
            metrics.talks += 1;
            let reply = policy.respond(
                session.state(),
                response_options(session.state().turn_count),
            );
            let report = session.respond(&reply)?;
            metrics.amiability_trace.push(session.state().enemy.amiability);
            if report.home_unlocked {
                metrics.home_unlocks += 1;
                if self.verbose {
                    println!("  🏠 Home unlocked after: {reply}");
                    for line in home_unlock_dialog() {
                        println!("     {line}");
                    }
                }
                session.go_home()?;
                return Ok(());
            }
        }
        session.start_turn()?;
        Ok(())
    }

    fn play_turn(
        &self,
        session: &mut BattleSession,
        policy: &mut (dyn PlayerPolicy + Send),
        metrics: &mut RunMetrics,
    ) -> Result<RoundRecord> {
        let turn = session.state().turn_count;
        let final_battle = session.state().final_battle;
        let sequence = session.state().sequence.clone();
        let optimal_length = session.state().optimal.length;

        let plan = policy.plan_turn(session.state(), session.config());
        let used_magic = match plan {
            TurnPlan::Magic => {
                session.cast_magic()?;
                metrics.magic_casts += 1;
                true
            }
            TurnPlan::Select(range) => {
                for index in range {
                    session.toggle_selection(index)?;
                }
                false
            }
        };

        let (damage, verdict) = match session.play_selection() {
            Ok(resolved) => resolved,
            Err(Some(rejection)) => {
                metrics.rejected_submissions += 1;
                log::warn!(
                    "{} submission rejected on turn {turn}: {rejection}",
                    policy.name()
                );
                self.retry_with_single_token(session, rejection)?
            }
            Err(None) => anyhow::bail!("enemy turn could not be resolved on turn {turn}"),
        };

        let user_length = session
            .state()
            .last_turn
            .as_ref()
            .map_or(0, |report| report.user_length);
        metrics.rounds_played += 1;
        metrics.total_damage += damage;
        if user_length == optimal_length {
            metrics.optimal_rounds += 1;
        }
        if verdict == TurnVerdict::FinalBattle {
            metrics.final_battle_reached = true;
        }
        metrics.amiability_trace.push(session.state().enemy.amiability);

        Ok(RoundRecord {
            turn,
            final_battle,
            sequence,
            optimal_length,
            user_length,
            used_magic,
            damage,
            hp_after: session.state().player.hp,
            verdict,
        })
    }

    fn retry_with_single_token(
        &self,
        session: &mut BattleSession,
        rejection: SubmissionRejection,
    ) -> Result<(u32, TurnVerdict)> {
        if self.verbose {
            println!("  ⚠️  {}", rejection.feedback().yellow());
        }
        session.with_state_mut(|state| state.selection.clear());
        session.toggle_selection(0)?;
        session
            .play_selection()
            .map_err(|err| anyhow::anyhow!("single-token fallback rejected: {err:?}"))
    }
}

fn log_initial_state(seed: u64, plan: &SimulationPlan, state: &SessionState) {
    println!(
        "🎮 Starting simulation | seed:{seed} strategy:{}",
        plan.strategy.label()
    );
    println!(
        "📊 Initial stats | HP:{}/{} MP:{}/{} Amiability:{}",
        state.player.hp,
        state.player.max_hp,
        state.player.mp,
        state.player.max_mp,
        state.enemy.amiability
    );
}

fn log_round(record: &RoundRecord) {
    let marker = if record.final_battle { "⚔️ " } else { "🎯" };
    println!(
        "{marker} Turn {}: {} / {} tokens{} -> {} damage, HP {} ({})",
        record.turn,
        record.user_length,
        record.optimal_length,
        if record.used_magic { " (magic)" } else { "" },
        record.damage,
        record.hp_after,
        record.verdict.as_str()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tester() -> GameTester {
        GameTester::new(GameConfig::default(), false)
    }

    #[test]
    fn optimal_run_never_takes_damage() {
        let summary = tester()
            .run_plan(&SimulationPlan::new(GameplayStrategy::Optimal), 1337)
            .unwrap();
        assert!(summary.game_ended);
        assert!(summary.victory());
        assert_eq!(summary.metrics.total_damage, 0);
        assert!(summary.metrics.final_battle_reached);
        assert_eq!(summary.rounds.len(), 7);
        assert!(summary.rounds.last().is_some_and(|r| r.final_battle));
    }

    #[test]
    fn careless_run_ends_in_defeat() {
        let summary = tester()
            .run_plan(&SimulationPlan::new(GameplayStrategy::Careless), 42)
            .unwrap();
        assert_eq!(summary.ending_phase, GamePhase::GameOver);
        assert!(summary.metrics.total_damage > 0);
        assert_eq!(summary.metrics.rejected_submissions, 0);
    }

    #[test]
    fn diplomat_unlocks_home_once_and_wins_peacefully() {
        let summary = tester()
            .run_plan(&SimulationPlan::new(GameplayStrategy::Diplomat), 7)
            .unwrap();
        assert!(summary.victory());
        assert_eq!(summary.metrics.home_unlocks, 1);
        assert_eq!(summary.metrics.home_visits, 1);
        assert!(!summary.metrics.final_battle_reached);
    }

    #[test]
    fn round_cap_halts_the_run() {
        let plan = SimulationPlan::new(GameplayStrategy::Optimal).with_max_rounds(2);
        let summary = tester().run_plan(&plan, 5).unwrap();
        assert!(!summary.game_ended);
        assert_eq!(summary.ending_label(), "halted");
        assert_eq!(summary.rounds.len(), 2);
    }

    #[test]
    fn setup_hook_runs_before_play() {
        fn weakened(state: &mut SessionState) {
            state.player.hp = 1;
        }
        let plan = SimulationPlan::new(GameplayStrategy::Careless).with_setup(weakened);
        let summary = tester().run_plan(&plan, 11).unwrap();
        assert_eq!(summary.rounds.len(), 1);
        assert_eq!(summary.ending_phase, GamePhase::GameOver);
    }
}
