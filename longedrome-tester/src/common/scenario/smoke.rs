use anyhow::{Context, Result, ensure};
use longedrome_game::GamePhase;

use super::TestScenario;
use crate::logic::{GameplayStrategy, SimulationPlan, SimulationSummary};

/// One optimal round: the board is playable and a perfect answer costs nothing.
pub fn smoke_scenario() -> TestScenario {
    TestScenario::simulation(
        "Smoke Test",
        SimulationPlan::new(GameplayStrategy::Optimal)
            .with_max_rounds(1)
            .with_expectation(smoke_expectation),
    )
}

fn smoke_expectation(summary: &SimulationSummary) -> Result<()> {
    let round = summary.rounds.first().context("no round was played")?;
    ensure!(
        round.sequence.len() >= 5,
        "sequence of {} tokens is too short",
        round.sequence.len()
    );
    ensure!(
        round.optimal_length >= 5,
        "optimal palindrome of {} is below five",
        round.optimal_length
    );
    ensure!(round.damage == 0, "optimal answer took {} damage", round.damage);
    ensure!(
        summary.final_state.phase == GamePhase::Idle,
        "expected idle after one round, found {}",
        summary.final_state.phase
    );
    ensure!(summary.final_state.turn_count == 1, "turn counter did not advance");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::GameTester;
    use longedrome_game::GameConfig;

    #[test]
    fn smoke_passes_on_default_config() {
        let scenario = smoke_scenario();
        let summary = GameTester::new(GameConfig::default(), false)
            .run_plan(&scenario.plan, 1337)
            .unwrap();
        for expectation in &scenario.plan.expectations {
            expectation.evaluate(&summary).unwrap();
        }
    }
}
