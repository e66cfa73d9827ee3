//! Session record shared by every battle transition.
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::config::{GameConfig, SequenceBounds};
use crate::constants::SESSION_LOG_CAPACITY;
use crate::dialogue::WELCOME;
use crate::palindrome::{PalindromeSpan, find_longest_palindrome};
use crate::sequence::generate_sequence;
use crate::stats::{CharacterStats, EnemyStats};
use crate::token::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GamePhase {
    #[default]
    Tutorial,
    Idle,
    UserTurn,
    EnemyTurn,
    Home,
    GameOver,
    Victory,
}

impl GamePhase {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tutorial => "tutorial",
            Self::Idle => "idle",
            Self::UserTurn => "user-turn",
            Self::EnemyTurn => "enemy-turn",
            Self::Home => "home",
            Self::GameOver => "game-over",
            Self::Victory => "victory",
        }
    }

    /// Only `reset` leaves a terminal phase.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::GameOver | Self::Victory)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GamePhase {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tutorial" => Ok(Self::Tutorial),
            "idle" => Ok(Self::Idle),
            "user-turn" | "userturn" => Ok(Self::UserTurn),
            "enemy-turn" | "enemyturn" => Ok(Self::EnemyTurn),
            "home" => Ok(Self::Home),
            "game-over" | "gameover" => Ok(Self::GameOver),
            "victory" => Ok(Self::Victory),
            _ => Err(()),
        }
    }
}

/// Once-per-round action markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoundFlags {
    pub submitted: bool,
    pub talked: bool,
    pub rested: bool,
}

impl RoundFlags {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Selected sequence indices, ascending and without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Selection {
    indices: SmallVec<[usize; 16]>,
}

impl Selection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select every index of `range`, replacing the current selection.
    #[must_use]
    pub fn from_range(range: std::ops::Range<usize>) -> Self {
        Self {
            indices: range.collect(),
        }
    }

    /// Add `index` when absent, remove it when present. Returns true when added.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.indices.binary_search(&index) {
            Ok(position) => {
                self.indices.remove(position);
                false
            }
            Err(position) => {
                self.indices.insert(position, index);
                true
            }
        }
    }

    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        self.indices.binary_search(&index).is_ok()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    #[must_use]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    /// Each index is exactly one more than the previous.
    #[must_use]
    pub fn is_continuous(&self) -> bool {
        self.indices.windows(2).all(|pair| pair[1] == pair[0] + 1)
    }

    /// Tokens under the selection, in index order. Indices past `sequence` are
    /// skipped; submission refuses such selections before this is consulted.
    #[must_use]
    pub fn tokens(&self, sequence: &[Color]) -> Vec<Color> {
        self.indices
            .iter()
            .filter_map(|&index| sequence.get(index).copied())
            .collect()
    }
}

/// How an enemy turn ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TurnVerdict {
    Continue,
    FinalBattle,
    Victory,
    Defeat,
}

impl TurnVerdict {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Continue => "continue",
            Self::FinalBattle => "final-battle",
            Self::Victory => "victory",
            Self::Defeat => "defeat",
        }
    }
}

/// Summary of the most recent enemy turn.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TurnReport {
    pub turn: u32,
    pub user_length: usize,
    pub optimal_length: usize,
    pub found_optimal: bool,
    pub damage: u32,
    #[serde(default)]
    pub verdict: Option<TurnVerdict>,
}

#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: GamePhase,
    pub turn_count: u32,
    #[serde(default)]
    pub flags: RoundFlags,
    #[serde(default)]
    pub final_battle: bool,
    #[serde(default)]
    pub sequence: Vec<Color>,
    #[serde(default)]
    pub optimal: PalindromeSpan<Color>,
    #[serde(default)]
    pub selection: Selection,
    #[serde(default)]
    pub show_optimal: bool,
    #[serde(default)]
    pub feedback: String,
    #[serde(default)]
    pub awaiting_response: bool,
    #[serde(default)]
    pub home_prompt_shown: bool,
    /// Resolution generation; pending enemy-turn steps from older epochs are stale.
    #[serde(default)]
    pub epoch: u64,
    pub player: CharacterStats,
    pub enemy: EnemyStats,
    #[serde(default)]
    pub last_turn: Option<TurnReport>,
    #[serde(default)]
    pub logs: Vec<String>,
}

impl SessionState {
    /// Fresh session in the tutorial phase with the configured starting stats.
    #[must_use]
    pub fn new(cfg: &GameConfig) -> Self {
        let mut player = cfg.player;
        let mut enemy = cfg.enemy;
        player.clamp();
        enemy.clamp();
        Self {
            phase: GamePhase::Tutorial,
            turn_count: 0,
            flags: RoundFlags::default(),
            final_battle: false,
            sequence: Vec::new(),
            optimal: PalindromeSpan::empty(),
            selection: Selection::new(),
            show_optimal: false,
            feedback: String::from(WELCOME),
            awaiting_response: false,
            home_prompt_shown: false,
            epoch: 0,
            player,
            enemy,
            last_turn: None,
            logs: Vec::new(),
        }
    }

    /// Append a log key, dropping the oldest entries past the session capacity.
    pub fn push_log(&mut self, key: &str) {
        self.logs.push(String::from(key));
        if self.logs.len() > SESSION_LOG_CAPACITY {
            let overflow = self.logs.len() - SESSION_LOG_CAPACITY;
            self.logs.drain(..overflow);
        }
    }

    pub fn bump_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Replace the sequence for the current round and recompute its optimal span.
    pub fn regenerate<R: Rng + ?Sized>(&mut self, cfg: &GameConfig, rng: &mut R) {
        let SequenceBounds {
            min_length,
            max_length,
        } = cfg.sequence;
        let min = min_length.max(1);
        let max = max_length.max(min);
        self.sequence = match generate_sequence(min, max, self.turn_count, rng) {
            Ok(sequence) => sequence,
            Err(err) => {
                log::error!("sequence generation failed: {err}");
                Vec::new()
            }
        };
        self.optimal = find_longest_palindrome(&self.sequence);
        self.selection.clear();
        self.show_optimal = false;
    }

    /// Empty the board, used when leaving the temple.
    pub fn clear_board(&mut self) {
        self.sequence.clear();
        self.optimal = PalindromeSpan::empty();
        self.selection.clear();
        self.show_optimal = false;
    }

    #[must_use]
    pub fn selected_tokens(&self) -> Vec<Color> {
        self.selection.tokens(&self.sequence)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palindrome::is_palindrome;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn toggle_keeps_indices_sorted_and_unique() {
        let mut selection = Selection::new();
        assert!(selection.toggle(4));
        assert!(selection.toggle(1));
        assert!(selection.toggle(2));
        assert_eq!(selection.as_slice(), &[1, 2, 4]);
        assert!(!selection.is_continuous());
        assert!(!selection.toggle(4));
        assert_eq!(selection.as_slice(), &[1, 2]);
        assert!(selection.is_continuous());
        assert!(selection.contains(2));
    }

    #[test]
    fn empty_and_single_selections_are_continuous() {
        assert!(Selection::new().is_continuous());
        assert!(Selection::from_range(3..4).is_continuous());
        assert!(Selection::from_range(3..8).is_continuous());
    }

    #[test]
    fn phase_names_parse_back() {
        for phase in [
            GamePhase::Tutorial,
            GamePhase::Idle,
            GamePhase::UserTurn,
            GamePhase::EnemyTurn,
            GamePhase::Home,
            GamePhase::GameOver,
            GamePhase::Victory,
        ] {
            assert_eq!(phase.as_str().parse::<GamePhase>(), Ok(phase));
        }
        assert!(GamePhase::Victory.is_terminal());
        assert!(!GamePhase::Home.is_terminal());
    }

    #[test]
    fn log_buffer_is_bounded() {
        let mut state = SessionState::default();
        for _ in 0..(SESSION_LOG_CAPACITY + 10) {
            state.push_log("log.turn.start");
        }
        state.push_log("log.defeat");
        assert_eq!(state.logs.len(), SESSION_LOG_CAPACITY);
        assert_eq!(state.logs.last().map(String::as_str), Some("log.defeat"));
    }

    #[test]
    fn regenerate_refreshes_span_and_clears_selection() {
        let cfg = GameConfig::default();
        let mut state = SessionState::new(&cfg);
        state.selection.toggle(0);
        state.show_optimal = true;
        state.regenerate(&cfg, &mut ChaCha20Rng::seed_from_u64(3));
        assert!(state.sequence.len() >= 5);
        assert!(state.optimal.length >= 5);
        assert!(is_palindrome(&state.optimal.tokens));
        assert!(state.selection.is_empty());
        assert!(!state.show_optimal);

        state.clear_board();
        assert!(state.sequence.is_empty());
        assert!(state.optimal.is_empty());
    }
}
