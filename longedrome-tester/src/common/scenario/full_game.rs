use anyhow::{Result, ensure};
use longedrome_game::{GamePhase, TurnVerdict, verdict_dialog};

use super::TestScenario;
use crate::logic::{GameplayStrategy, SimulationPlan, SimulationSummary};

pub fn final_battle_scenario() -> TestScenario {
    TestScenario::simulation(
        "Final Battle - Optimal Strategy",
        SimulationPlan::new(GameplayStrategy::Optimal).with_expectation(final_battle_expectation),
    )
}

pub fn careless_defeat_scenario() -> TestScenario {
    TestScenario::simulation(
        "Careless Defeat",
        SimulationPlan::new(GameplayStrategy::Careless).with_expectation(careless_expectation),
    )
}

pub fn diplomacy_scenario() -> TestScenario {
    TestScenario::simulation(
        "Diplomacy - Peaceful Victory",
        SimulationPlan::new(GameplayStrategy::Diplomat).with_expectation(diplomacy_expectation),
    )
}

pub fn hostility_scenario() -> TestScenario {
    TestScenario::simulation(
        "Hostility - Forced Final Battle",
        SimulationPlan::new(GameplayStrategy::Hostile).with_expectation(hostility_expectation),
    )
}

pub fn magician_scenario() -> TestScenario {
    TestScenario::simulation(
        "Magician - Magic Budget",
        SimulationPlan::new(GameplayStrategy::Magician).with_expectation(magician_expectation),
    )
}

fn final_battle_expectation(summary: &SimulationSummary) -> Result<()> {
    let max_turns = summary.config.max_turns;
    ensure!(summary.victory(), "optimal play ended in {}", summary.ending_label());
    ensure!(
        summary.metrics.final_battle_reached,
        "neutral Guardian should force a final battle"
    );
    ensure!(
        summary.metrics.total_damage == 0,
        "optimal play took {} damage",
        summary.metrics.total_damage
    );
    ensure!(
        summary.metrics.rounds_played == max_turns + 1,
        "expected {} rounds including the final battle, played {}",
        max_turns + 1,
        summary.metrics.rounds_played
    );
    ensure!(
        summary.rounds.last().is_some_and(|r| r.final_battle),
        "last round was not the final battle"
    );
    ensure!(
        summary.closing_lines == verdict_dialog(TurnVerdict::Victory, true),
        "final challenge win closed with {:?}",
        summary.closing_lines
    );
    Ok(())
}

fn careless_expectation(summary: &SimulationSummary) -> Result<()> {
    ensure!(
        summary.ending_phase == GamePhase::GameOver,
        "single-token play ended in {}",
        summary.ending_label()
    );
    ensure!(
        summary.metrics.optimal_rounds == 0,
        "single tokens should never match a five-token palindrome"
    );
    ensure!(
        summary.closing_lines == verdict_dialog(TurnVerdict::Defeat, false),
        "defeat by damage closed with {:?}",
        summary.closing_lines
    );
    let mut previous = i32::MAX;
    for round in &summary.rounds {
        ensure!(
            round.hp_after <= previous,
            "hp rose from {previous} to {} without resting",
            round.hp_after
        );
        previous = round.hp_after;
    }
    Ok(())
}

fn diplomacy_expectation(summary: &SimulationSummary) -> Result<()> {
    let friendly = summary.config.amiability_thresholds.friendly;
    ensure!(summary.victory(), "diplomacy ended in {}", summary.ending_label());
    ensure!(
        !summary.metrics.final_battle_reached,
        "a friendly Guardian should not demand a final battle"
    );
    ensure!(
        summary.closing_lines == verdict_dialog(TurnVerdict::Victory, false),
        "peaceful victory closed with {:?}",
        summary.closing_lines
    );
    ensure!(
        summary.metrics.home_unlocks == 1,
        "home unlock should be announced exactly once, saw {}",
        summary.metrics.home_unlocks
    );
    ensure!(
        summary.final_state.enemy.amiability >= friendly,
        "amiability {} below friendly threshold {friendly}",
        summary.final_state.enemy.amiability
    );
    Ok(())
}

fn hostility_expectation(summary: &SimulationSummary) -> Result<()> {
    let hostile = summary.config.amiability_thresholds.hostile;
    ensure!(
        summary.final_state.enemy.amiability < hostile,
        "amiability {} never dropped below {hostile}",
        summary.final_state.enemy.amiability
    );
    ensure!(summary.metrics.home_unlocks == 0, "a hostile Guardian opened the way home");
    ensure!(
        summary.metrics.final_battle_reached,
        "hostile Guardian should force a final battle"
    );
    ensure!(summary.victory(), "optimal play still ended in {}", summary.ending_label());
    Ok(())
}

fn magician_expectation(summary: &SimulationSummary) -> Result<()> {
    let cost = summary.config.magic_cost;
    let start_mp = summary.config.player.mp;
    let affordable = if cost > 0 { start_mp / cost } else { 0 };
    ensure!(
        i64::from(summary.metrics.magic_casts) <= i64::from(affordable),
        "cast magic {} times with budget for {affordable}",
        summary.metrics.magic_casts
    );
    for round in summary.rounds.iter().filter(|r| r.used_magic) {
        ensure!(
            round.damage == 0 && round.user_length == round.optimal_length,
            "turn {}: magic submission scored {} of {}",
            round.turn,
            round.user_length,
            round.optimal_length
        );
    }
    ensure!(summary.final_state.player.mp >= 0, "mp went negative");
    Ok(())
}
