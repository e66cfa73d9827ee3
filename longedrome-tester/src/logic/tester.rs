use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::common::scenario::TestScenario;
use crate::logic::game_tester::{GameTester, SimulationPlan, SimulationSummary};

/// How the runs of one scenario/seed pair ended.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeTally {
    pub victories: usize,
    pub defeats: usize,
    pub halted: usize,
    pub final_battles: usize,
    pub total_rounds: u64,
    pub total_damage: u64,
}

impl OutcomeTally {
    fn record(&mut self, summary: &SimulationSummary) {
        if !summary.game_ended {
            self.halted += 1;
        } else if summary.victory() {
            self.victories += 1;
        } else {
            self.defeats += 1;
        }
        if summary.metrics.final_battle_reached {
            self.final_battles += 1;
        }
        self.total_rounds += u64::from(summary.metrics.rounds_played);
        self.total_damage += u64::from(summary.metrics.total_damage);
    }

    #[must_use]
    pub fn runs(&self) -> usize {
        self.victories + self.defeats + self.halted
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_rounds(&self) -> f64 {
        match self.runs() {
            0 => 0.0,
            runs => self.total_rounds as f64 / runs as f64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub strategy: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    pub outcomes: OutcomeTally,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
}

pub struct LogicTester {
    tester: GameTester,
}

impl LogicTester {
    pub const fn new(tester: GameTester) -> Self {
        Self { tester }
    }

    pub fn run_scenario(
        &self,
        scenario: &TestScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.tester.verbose() {
                    println!(
                        "🧪 Testing scenario: {} (strategy: {} seed: {})",
                        scenario.name.bright_white(),
                        scenario.plan.strategy,
                        seed
                    );
                }
                self.run_single_scenario(scenario, seed, iterations)
            })
            .collect()
    }

    fn run_single_scenario(
        &self,
        scenario: &TestScenario,
        seed: u64,
        iterations: usize,
    ) -> ScenarioResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut outcomes = OutcomeTally::default();
        let mut durations = Vec::new();

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));
            match self.run_iteration(&scenario.plan, iteration_seed) {
                Ok(summary) => {
                    outcomes.record(&summary);
                    durations.push(start_time.elapsed());
                    successes += 1;
                    if self.tester.verbose() {
                        println!(
                            "  ✅ Iteration {}/{} passed ({:?}) rounds:{} ending:{}",
                            i + 1,
                            iterations,
                            start_time.elapsed(),
                            summary.metrics.rounds_played,
                            summary.ending_label()
                        );
                    }
                }
                Err(err) => {
                    let message = format!("Iteration {} (seed {iteration_seed}): {err:#}", i + 1);
                    if self.tester.verbose() {
                        println!("  ❌ {}", message.clone().red());
                    }
                    failures.push(message);
                }
            }
        }

        let average_duration = if durations.is_empty() {
            Duration::ZERO
        } else {
            durations.iter().sum::<Duration>() / u32::try_from(durations.len()).unwrap_or(1)
        };

        ScenarioResult {
            scenario_name: scenario.name.clone(),
            strategy: scenario.plan.strategy.label().to_string(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            outcomes,
            average_duration,
        }
    }

    fn run_iteration(&self, plan: &SimulationPlan, seed: u64) -> anyhow::Result<SimulationSummary> {
        let summary = self.tester.run_plan(plan, seed)?;
        for expectation in &plan.expectations {
            expectation.evaluate(&summary).map_err(|err| {
                err.context(format!(
                    "{} run ended {} after {} rounds",
                    summary.strategy,
                    summary.ending_label(),
                    summary.metrics.rounds_played
                ))
            })?;
        }
        Ok(summary)
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(0)))
    }
}
