//! Invariant checks that hold for any strategy.
use anyhow::{Result, ensure};
use longedrome_game::palindrome::brute_force;
use longedrome_game::{find_longest_palindrome, is_palindrome};

use super::TestScenario;
use crate::logic::{GameTester, GameplayStrategy, SimulationPlan, SimulationSummary};

pub fn palindrome_oracle_scenario() -> TestScenario {
    TestScenario::simulation(
        "Palindrome Oracle",
        SimulationPlan::new(GameplayStrategy::Optimal).with_expectation(oracle_expectation),
    )
}

pub fn generator_guarantee_scenario() -> TestScenario {
    TestScenario::simulation(
        "Generator Guarantee",
        SimulationPlan::new(GameplayStrategy::Chaotic).with_expectation(generator_expectation),
    )
}

pub fn stat_bounds_scenario() -> TestScenario {
    TestScenario::simulation(
        "Stat Bounds",
        SimulationPlan::new(GameplayStrategy::Chaotic).with_expectation(stat_bounds_expectation),
    )
}

pub fn deterministic_replay_scenario() -> TestScenario {
    TestScenario::simulation(
        "Deterministic Replay",
        SimulationPlan::new(GameplayStrategy::Chaotic).with_expectation(replay_expectation),
    )
}

/// The engine's optimal span must match an exhaustive search on every board.
fn oracle_expectation(summary: &SimulationSummary) -> Result<()> {
    for round in &summary.rounds {
        let (_, exhaustive) = brute_force(&round.sequence);
        ensure!(
            round.optimal_length == exhaustive,
            "turn {}: engine found {} but exhaustive search found {}",
            round.turn,
            round.optimal_length,
            exhaustive
        );
        let span = find_longest_palindrome(&round.sequence);
        ensure!(
            is_palindrome(&span.tokens) && round.sequence.get(span.indices()) == Some(&span.tokens[..]),
            "turn {}: span {}+{} is not a palindrome of the board",
            round.turn,
            span.start,
            span.length
        );
        ensure!(
            round.user_length == round.optimal_length && round.damage == 0,
            "turn {}: optimal play scored {} of {} and took {} damage",
            round.turn,
            round.user_length,
            round.optimal_length,
            round.damage
        );
    }
    Ok(())
}

fn generator_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(!summary.rounds.is_empty(), "no rounds were played");
    for round in &summary.rounds {
        ensure!(
            round.sequence.len() >= 5,
            "turn {}: board of {} tokens",
            round.turn,
            round.sequence.len()
        );
        ensure!(
            round.optimal_length >= 5,
            "turn {}: longest palindrome only {}",
            round.turn,
            round.optimal_length
        );
    }
    Ok(())
}

fn stat_bounds_expectation(summary: &SimulationSummary) -> Result<()> {
    let max_hp = summary.final_state.player.max_hp;
    for round in &summary.rounds {
        ensure!(
            (0..=max_hp).contains(&round.hp_after),
            "turn {}: hp {} outside 0..={max_hp}",
            round.turn,
            round.hp_after
        );
    }
    for amiability in &summary.metrics.amiability_trace {
        ensure!(
            (0..=100).contains(amiability),
            "amiability {amiability} left 0..=100"
        );
    }
    let player = &summary.final_state.player;
    ensure!(
        (0..=player.max_mp).contains(&player.mp),
        "mp {} outside 0..={}",
        player.mp,
        player.max_mp
    );
    ensure!(
        summary.game_ended,
        "run halted in {} without reaching an ending",
        summary.ending_phase
    );
    Ok(())
}

/// Replaying the same seed must reproduce every board and the final record.
fn replay_expectation(summary: &SimulationSummary) -> Result<()> {
    let replay = GameTester::new((*summary.config).clone(), false)
        .run_plan(&SimulationPlan::new(summary.strategy), summary.seed)?;
    ensure!(
        replay.rounds == summary.rounds,
        "seed {} produced different rounds on replay",
        summary.seed
    );
    ensure!(
        replay.final_state == summary.final_state,
        "seed {} produced a different final state on replay",
        summary.seed
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use longedrome_game::GameConfig;

    fn run(scenario: &TestScenario, seed: u64) -> Result<()> {
        let summary = GameTester::new(GameConfig::default(), false).run_plan(&scenario.plan, seed)?;
        for expectation in &scenario.plan.expectations {
            expectation.evaluate(&summary)?;
        }
        Ok(())
    }

    #[test]
    fn invariant_scenarios_hold_across_seeds() {
        for seed in 0..8 {
            run(&palindrome_oracle_scenario(), seed).unwrap();
            run(&generator_guarantee_scenario(), seed).unwrap();
            run(&stat_bounds_scenario(), seed).unwrap();
        }
    }

    #[test]
    fn replay_is_deterministic() {
        run(&deterministic_replay_scenario(), 2024).unwrap();
    }
}
