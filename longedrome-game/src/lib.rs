//! Longedrome Game Engine
//!
//! Platform-agnostic core for Longedrome, a turn-based palindrome battle
//! against the Ancient Guardian. This crate owns palindrome search, sequence
//! generation, the battle state machine and the Guardian's disposition,
//! without UI or platform-specific dependencies.

pub mod battle;
pub mod config;
pub mod constants;
pub mod dialogue;
pub mod disposition;
pub mod numbers;
pub mod palindrome;
pub mod rng;
pub mod sequence;
pub mod session;
pub mod state;
pub mod stats;
pub mod timeline;
pub mod token;

// Re-export commonly used types
pub use battle::{
    ActionOutcome, ActionRejection, RespondOutcome, SubmissionOutcome, SubmissionRejection,
    TalkDialog, TalkOutcome, calculate_damage, can_access_home, cast_magic, complete_tutorial,
    go_home, respond, rest, return_to_temple, start_turn, submit_selection, talk,
    toggle_selection, user_found_optimal,
};
pub use config::{
    AmiabilityThresholds, ConfigError, GameConfig, HealthThresholds, RestHealing, SequenceBounds,
};
pub use dialogue::{
    ResponseOption, ResponseTone, enemy_response, guardian_dialog, guardian_name,
    home_access_message, home_unlock_dialog, response_options, verdict_dialog,
};
pub use disposition::{
    KeywordMatches, RoundKeywords, apply_amiability, count_matches, keywords_for_round,
    score_response,
};
pub use palindrome::{PalindromeSpan, SearchMethod, find_longest_palindrome, is_palindrome};
pub use rng::{CountingRng, RngBundle};
pub use sequence::{SequenceError, generate_sequence};
pub use session::{BattleSession, ResponseReport, StepReport};
pub use state::{GamePhase, RoundFlags, Selection, SessionState, TurnReport, TurnVerdict};
pub use stats::{CharacterStats, Disposition, EnemyStats, HealthCondition};
pub use timeline::{
    EnemyTurnResolution, PendingStep, ResolutionStep, StepOutcome, StepStatus,
    resolve_enemy_turn, run_step,
};
pub use token::Color;

/// Source of session configuration.
/// Platform-specific implementations should provide this
pub trait ConfigLoader {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the raw JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read.
    fn load_config_json(&self) -> Result<String, Self::Error>;
}

/// Errors raised while opening a session through [`GameEngine`].
#[derive(Debug, thiserror::Error)]
pub enum EngineError<E: std::error::Error + 'static> {
    #[error("failed to load configuration: {0}")]
    Load(#[source] E),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Main game engine opening sessions from a platform config source
pub struct GameEngine<L>
where
    L: ConfigLoader,
{
    loader: L,
}

impl<L> GameEngine<L>
where
    L: ConfigLoader,
{
    /// Create a new game engine with the provided config loader
    pub const fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Load and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be loaded or fails validation.
    pub fn load_config(&self) -> Result<GameConfig, EngineError<L::Error>> {
        let json = self.loader.load_config_json().map_err(EngineError::Load)?;
        Ok(GameConfig::from_json(&json)?)
    }

    /// Open a new battle session with the specified seed.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded or is invalid.
    pub fn create_session(&self, seed: u64) -> Result<BattleSession, EngineError<L::Error>> {
        let cfg = self.load_config()?;
        Ok(BattleSession::new(cfg, seed)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    struct FixtureLoader(&'static str);

    impl ConfigLoader for FixtureLoader {
        type Error = Infallible;

        fn load_config_json(&self) -> Result<String, Self::Error> {
            Ok(self.0.to_string())
        }
    }

    #[test]
    fn engine_creates_session_from_loader() {
        let engine = GameEngine::new(FixtureLoader(r#"{"max_turns": 3}"#));
        let mut session = engine.create_session(0xABCD).unwrap();
        assert_eq!(session.config().max_turns, 3);
        assert_eq!(session.seed(), 0xABCD);
        session.complete_tutorial().unwrap();
        assert_eq!(session.phase(), GamePhase::Idle);
    }

    #[test]
    fn engine_surfaces_config_errors() {
        let engine = GameEngine::new(FixtureLoader(r#"{"magic_cost": -1}"#));
        assert!(matches!(
            engine.create_session(1),
            Err(EngineError::Config(ConfigError::MinViolation { field: "magic_cost", .. }))
        ));
    }
}
