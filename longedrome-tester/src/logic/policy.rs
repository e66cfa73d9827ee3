use std::fmt;
use std::ops::Range;

use longedrome_game::{GameConfig, ResponseOption, SessionState, keywords_for_round};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// What a policy does with its turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnPlan {
    /// Toggle every index of the range, then submit.
    Select(Range<usize>),
    /// Cast magic and submit whatever it revealed.
    Magic,
}

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Choose the span to submit this turn.
    fn plan_turn(&mut self, state: &SessionState, cfg: &GameConfig) -> TurnPlan;

    /// Whether to talk to the Guardian before starting the next round.
    fn wants_talk(&mut self, _state: &SessionState) -> bool {
        false
    }

    /// Reply to an open talk.
    fn respond(&mut self, _state: &SessionState, _options: &[ResponseOption]) -> String {
        String::from("...")
    }
}

/// Built-in gameplay strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameplayStrategy {
    /// Always submits the optimal span and never talks.
    Optimal,
    /// Submits a single token every turn.
    Careless,
    /// Talks every round with keyword-rich praise, then plays optimally.
    Diplomat,
    /// Talks every round with threats, then plays optimally.
    Hostile,
    /// Leans on magic while MP lasts.
    Magician,
    /// Seeded coin flips between the other behaviours.
    Chaotic,
}

impl GameplayStrategy {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Optimal => "Optimal",
            Self::Careless => "Careless",
            Self::Diplomat => "Diplomat",
            Self::Hostile => "Hostile",
            Self::Magician => "Magician",
            Self::Chaotic => "Chaotic",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::Optimal => Box::new(OptimalPolicy),
            Self::Careless => Box::new(CarelessPolicy),
            Self::Diplomat => Box::new(TalkingPolicy { praise: true }),
            Self::Hostile => Box::new(TalkingPolicy { praise: false }),
            Self::Magician => Box::new(MagicianPolicy),
            Self::Chaotic => Box::new(ChaoticPolicy::new(seed)),
        }
    }
}

impl fmt::Display for GameplayStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn optimal_plan(state: &SessionState) -> TurnPlan {
    TurnPlan::Select(state.optimal.indices())
}

fn first_token_plan(state: &SessionState) -> TurnPlan {
    TurnPlan::Select(0..state.sequence.len().min(1))
}

struct OptimalPolicy;
struct CarelessPolicy;
struct MagicianPolicy;

struct TalkingPolicy {
    praise: bool,
}

struct ChaoticPolicy {
    rng: ChaCha20Rng,
}

impl ChaoticPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed ^ 0x5EED_C4A0),
        }
    }
}

impl PlayerPolicy for OptimalPolicy {
    fn name(&self) -> &'static str {
        "Optimal"
    }

    fn plan_turn(&mut self, state: &SessionState, _cfg: &GameConfig) -> TurnPlan {
        optimal_plan(state)
    }
}

impl PlayerPolicy for CarelessPolicy {
    fn name(&self) -> &'static str {
        "Careless"
    }

    fn plan_turn(&mut self, state: &SessionState, _cfg: &GameConfig) -> TurnPlan {
        first_token_plan(state)
    }
}

impl PlayerPolicy for MagicianPolicy {
    fn name(&self) -> &'static str {
        "Magician"
    }

    fn plan_turn(&mut self, state: &SessionState, cfg: &GameConfig) -> TurnPlan {
        if state.player.mp >= cfg.magic_cost {
            TurnPlan::Magic
        } else {
            optimal_plan(state)
        }
    }
}

impl PlayerPolicy for TalkingPolicy {
    fn name(&self) -> &'static str {
        if self.praise { "Diplomat" } else { "Hostile" }
    }

    fn plan_turn(&mut self, state: &SessionState, _cfg: &GameConfig) -> TurnPlan {
        optimal_plan(state)
    }

    fn wants_talk(&mut self, state: &SessionState) -> bool {
        !state.flags.talked
    }

    fn respond(&mut self, state: &SessionState, _options: &[ResponseOption]) -> String {
        let keywords = keywords_for_round(state.turn_count);
        let words = if self.praise {
            keywords.positive
        } else {
            keywords.negative
        };
        format!("I speak of {}.", words.join(" and "))
    }
}

impl PlayerPolicy for ChaoticPolicy {
    fn name(&self) -> &'static str {
        "Chaotic"
    }

    fn plan_turn(&mut self, state: &SessionState, cfg: &GameConfig) -> TurnPlan {
        match self.rng.gen_range(0..3) {
            0 if state.player.mp >= cfg.magic_cost => TurnPlan::Magic,
            1 => optimal_plan(state),
            _ => {
                let len = state.sequence.len();
                if len == 0 {
                    return TurnPlan::Select(0..0);
                }
                let index = self.rng.gen_range(0..len);
                TurnPlan::Select(index..index + 1)
            }
        }
    }

    fn wants_talk(&mut self, state: &SessionState) -> bool {
        !state.flags.talked && self.rng.gen_bool(0.5)
    }

    fn respond(&mut self, _state: &SessionState, options: &[ResponseOption]) -> String {
        if options.is_empty() {
            return String::new();
        }
        let pick = self.rng.gen_range(0..options.len());
        options[pick].text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use longedrome_game::{BattleSession, count_matches};

    fn playing_session(seed: u64) -> BattleSession {
        let mut session = BattleSession::with_defaults(seed);
        session.complete_tutorial().unwrap();
        session.start_turn().unwrap();
        session
    }

    #[test]
    fn optimal_policy_targets_the_optimal_span() {
        let session = playing_session(3);
        let mut policy = GameplayStrategy::Optimal.create_policy(3);
        assert_eq!(
            policy.plan_turn(session.state(), session.config()),
            TurnPlan::Select(session.state().optimal.indices())
        );
        assert!(!policy.wants_talk(session.state()));
    }

    #[test]
    fn careless_policy_picks_one_token() {
        let session = playing_session(4);
        let mut policy = GameplayStrategy::Careless.create_policy(4);
        assert_eq!(
            policy.plan_turn(session.state(), session.config()),
            TurnPlan::Select(0..1)
        );
    }

    #[test]
    fn magician_falls_back_once_mp_runs_out() {
        let mut session = playing_session(5);
        let mut policy = GameplayStrategy::Magician.create_policy(5);
        assert_eq!(
            policy.plan_turn(session.state(), session.config()),
            TurnPlan::Magic
        );
        session.state_mut().player.mp = 0;
        assert!(matches!(
            policy.plan_turn(session.state(), session.config()),
            TurnPlan::Select(_)
        ));
    }

    #[test]
    fn talking_policies_use_round_keywords() {
        let state = SessionState::default();
        let mut diplomat = GameplayStrategy::Diplomat.create_policy(1);
        let mut hostile = GameplayStrategy::Hostile.create_policy(1);
        let praise = diplomat.respond(&state, &[]);
        let threat = hostile.respond(&state, &[]);
        assert!(count_matches(&praise, state.turn_count).positive > 0);
        assert_eq!(count_matches(&praise, state.turn_count).negative, 0);
        assert!(count_matches(&threat, state.turn_count).negative > 0);
        assert!(diplomat.wants_talk(&state));
    }

    #[test]
    fn chaotic_policy_is_seed_deterministic() {
        let session = playing_session(9);
        let mut first = GameplayStrategy::Chaotic.create_policy(77);
        let mut second = GameplayStrategy::Chaotic.create_policy(77);
        for _ in 0..10 {
            assert_eq!(
                first.plan_turn(session.state(), session.config()),
                second.plan_turn(session.state(), session.config())
            );
        }
    }
}
