use crate::logic::SimulationPlan;

pub mod catalog;
pub mod full_game;
pub mod smoke;

/// A named plan with the expectations every run must meet.
#[derive(Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub plan: SimulationPlan,
}

impl TestScenario {
    #[must_use]
    pub fn simulation(name: impl Into<String>, plan: SimulationPlan) -> Self {
        Self {
            name: name.into(),
            plan,
        }
    }
}

/// CLI key, aliases and description for every registered scenario.
const SCENARIOS: &[(&str, &[&str], &str)] = &[
    ("smoke", &[], "Smoke Test"),
    ("palindrome-oracle", &["oracle"], "Palindrome Oracle"),
    ("generator-guarantee", &["generator"], "Generator Guarantee"),
    ("stat-bounds", &["stats"], "Stat Bounds"),
    ("deterministic", &["replay"], "Deterministic Replay"),
    ("final-battle", &["optimal"], "Final Battle - Optimal Strategy"),
    ("careless-defeat", &["careless"], "Careless Defeat"),
    ("diplomacy", &["diplomat"], "Diplomacy - Peaceful Victory"),
    ("hostility", &["hostile"], "Hostility - Forced Final Battle"),
    ("magician", &["magic"], "Magician - Magic Budget"),
];

/// Canonical keys, in registry order.
pub fn scenario_keys() -> impl Iterator<Item = &'static str> {
    SCENARIOS.iter().map(|(key, _, _)| *key)
}

pub fn get_scenario(name: &str) -> Option<TestScenario> {
    let wanted = name.trim().to_lowercase();
    let key = SCENARIOS
        .iter()
        .find(|(key, aliases, _)| *key == wanted || aliases.contains(&wanted.as_str()))
        .map(|(key, _, _)| *key)?;
    let scenario = match key {
        "smoke" => smoke::smoke_scenario(),
        "palindrome-oracle" => catalog::palindrome_oracle_scenario(),
        "generator-guarantee" => catalog::generator_guarantee_scenario(),
        "stat-bounds" => catalog::stat_bounds_scenario(),
        "deterministic" => catalog::deterministic_replay_scenario(),
        "final-battle" => full_game::final_battle_scenario(),
        "careless-defeat" => full_game::careless_defeat_scenario(),
        "diplomacy" => full_game::diplomacy_scenario(),
        "hostility" => full_game::hostility_scenario(),
        "magician" => full_game::magician_scenario(),
        _ => return None,
    };
    Some(scenario)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    SCENARIOS
        .iter()
        .map(|(key, _, description)| (*key, *description))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_key_resolves() {
        for key in scenario_keys() {
            let scenario = get_scenario(key).unwrap();
            assert!(!scenario.name.is_empty());
            assert!(!scenario.plan.expectations.is_empty(), "{key} has no expectations");
        }
    }

    #[test]
    fn aliases_and_case_resolve() {
        assert_eq!(get_scenario("Diplomat").unwrap().name, "Diplomacy - Peaceful Victory");
        assert_eq!(get_scenario(" oracle ").unwrap().name, "Palindrome Oracle");
        assert!(get_scenario("weather").is_none());
    }
}
