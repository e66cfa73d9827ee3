//! Centralized balance and tuning constants for Longedrome game logic.
//!
//! Thresholds a designer may want to tweak per session live in
//! [`GameConfig`](crate::config::GameConfig); the values here define the fixed
//! math of the engine and only change through reviewed code.

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_TUTORIAL_COMPLETE: &str = "log.tutorial.complete";
pub(crate) const LOG_TURN_START: &str = "log.turn.start";
pub(crate) const LOG_SUBMISSION_ACCEPTED: &str = "log.submission.accepted";
pub(crate) const LOG_ENEMY_REVEAL: &str = "log.enemy.reveal";
pub(crate) const LOG_ENEMY_DAMAGE: &str = "log.enemy.damage";
pub(crate) const LOG_ENEMY_NO_EFFECT: &str = "log.enemy.no-effect";
pub(crate) const LOG_DEFEAT: &str = "log.defeat";
pub(crate) const LOG_VICTORY_FRIENDLY: &str = "log.victory.friendly";
pub(crate) const LOG_VICTORY_FINAL: &str = "log.victory.final";
pub(crate) const LOG_FINAL_BATTLE: &str = "log.final-battle";
pub(crate) const LOG_ROUND_COMPLETE: &str = "log.round.complete";
pub(crate) const LOG_MAGIC_CAST: &str = "log.magic.cast";
pub(crate) const LOG_REST: &str = "log.rest";
pub(crate) const LOG_TALK: &str = "log.talk";
pub(crate) const LOG_RESPONSE: &str = "log.response";
pub(crate) const LOG_HOME_ENTER: &str = "log.home.enter";
pub(crate) const LOG_HOME_LEAVE: &str = "log.home.leave";
pub(crate) const LOG_HOME_UNLOCKED: &str = "log.home.unlocked";
pub(crate) const SESSION_LOG_CAPACITY: usize = 64;

// Sequence generation ------------------------------------------------------
pub(crate) const SEQUENCE_LENGTH_FLOOR: usize = 5;
pub const MAX_SEQUENCE_LENGTH: usize = 256;
pub(crate) const DIFFICULTY_ROUNDS_PER_STEP: u32 = 3;
pub(crate) const DIFFICULTY_CAP: u32 = 5;
pub(crate) const NOISE_DIFFICULTY_THRESHOLD: u32 = 2;
pub(crate) const PLANTED_PALINDROME_MIN: usize = 5;
pub(crate) const PLANTED_PALINDROME_MAX: usize = 7;

// Combat -------------------------------------------------------------------
pub(crate) const DAMAGE_PER_MISSING_TOKEN: f64 = 5.0;
pub(crate) const DAMAGE_GROWTH_PER_TURN: f64 = 0.05;

// Talking ------------------------------------------------------------------
pub(crate) const TALK_NEUTRAL_MP: i32 = 8;
pub(crate) const TALK_FRIENDLY_HP: i32 = 10;
pub(crate) const TALK_FRIENDLY_MP: i32 = 10;

// Disposition scoring ------------------------------------------------------
pub(crate) const AMIABILITY_MIN: i32 = 0;
pub(crate) const AMIABILITY_MAX: i32 = 100;
pub(crate) const POSITIVE_KEYWORD_WEIGHT: i32 = 8;
pub(crate) const NEGATIVE_KEYWORD_WEIGHT: i32 = 12;
pub(crate) const MIXED_MESSAGE_PENALTY: i32 = 5;
pub(crate) const SCORE_JITTER: i32 = 1;
pub(crate) const NEUTRAL_DRIFT: i32 = 2;
pub(crate) const NEGATIVE_CEILING: i32 = -5;
pub(crate) const NEGATIVE_CORRECTION_FLOOR: i32 = -10;
pub(crate) const POSITIVE_FLOOR: i32 = 5;
pub(crate) const POSITIVE_CORRECTION_CEILING: i32 = 10;

// Guardian reaction buckets ------------------------------------------------
pub(crate) const REACTION_STRONG: i32 = 15;
pub(crate) const REACTION_MODERATE: i32 = 8;
