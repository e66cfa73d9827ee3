//! Guardian dialogue and narrative text.
use serde::{Deserialize, Serialize};

use crate::config::AmiabilityThresholds;
use crate::constants::{REACTION_MODERATE, REACTION_STRONG};
use crate::state::{GamePhase, TurnVerdict};
use crate::stats::Disposition;

pub const WELCOME: &str = "Welcome to Longedrome!";
pub const TUTORIAL_COMPLETED: &str =
    "The Ancient Guardian awaits your challenge. Prepare your strategy!";
pub const ENEMY_PREPARING: &str = "The Ancient Guardian is considering its next move...";
pub const PREPARE_FOR_BATTLE: &str = "Select a palindromic sequence of colors to defend yourself!";
pub const ALREADY_SUBMITTED: &str = "You've already submitted your selection for this turn!";
pub const SELECTION_NOT_CONTINUOUS: &str = "Your selection must be continuous! Try again.";
pub const SELECTION_NOT_PALINDROMIC: &str = "Your selection is not a palindrome! Try again.";
pub const SELECTION_OUT_OF_RANGE: &str =
    "Some of your selected colors are no longer on the board. Select again.";
pub const SELECTION_EMPTY: &str = "Select at least one color before submitting.";
pub const AUTOMATIC_WIN: &str =
    "The Ancient Guardian seems impressed with your skills and friendly demeanor!";
pub const REST_TEXT: &str = "You rest and recover some HP and MP.";
pub const HOME_ARRIVAL: &str =
    "You have returned home safely. You can rest, read, or reflect on your journey.";
pub const MAGIC_FLICKER: &str = "You cast a spell of revelation, but the magic seems to flicker. Try selecting the palindrome yourself.";
pub const REFLECTION_TITLE: &str = "Your Thoughts";

pub const CAN_GO_HOME: [&str; 3] = [
    "You have earned my respect, traveler.",
    "You may return to your home if you wish.",
    "You are welcome to continue our challenges, or rest and return later.",
];

pub const FAILED_FINAL_CHALLENGE: [&str; 3] = [
    "You have failed the final challenge.",
    "The Ancient Guardian has bested you in the battle of palindromes.",
    "Perhaps with more practice, you can return and challenge it again.",
];

pub const WON_FINAL_CHALLENGE: [&str; 3] = [
    "You have proven yourself worthy in the final challenge!",
    "The Ancient Guardian grants you passage and shares its ancient knowledge with you.",
    "Your name shall be recorded in the annals of palindrome masters!",
];

pub const GAME_OVER: [&str; 3] = [
    "The Ancient Guardian has bested you in the battle of palindromes.",
    "Perhaps with more practice, you can return and challenge it again.",
    "Remember: The key is to find the longest palindromic sequence!",
];

pub const AUTOMATIC_WIN_DIALOG: [&str; 3] = [
    "You have proven yourself worthy, both in skill and character.",
    "I shall grant you passage and share my knowledge with you.",
    "Few have earned my respect as you have. You may return home safely.",
];

pub const ONE_FINAL_CHALLENGE: [&str; 3] = [
    "You have shown skill, but your attitude leaves much to be desired.",
    "I shall give you one final challenge. Find the optimal palindrome in this sequence.",
    "Succeed, and you may leave. Fail, and you shall remain here forever!",
];

struct RoundLines {
    hostile: [&'static str; 4],
    neutral: [&'static str; 4],
    friendly: [&'static str; 4],
}

const GUARDIAN_LINES: [RoundLines; 6] = [
    RoundLines {
        hostile: [
            "Your attempts to communicate are interesting, mortal.",
            "Only those who truly understand palindromes may proceed.",
            "Show me your worth through your actions, not just words.",
            "Your presence disturbs the ancient energies of this place.",
        ],
        neutral: [
            "You show potential, seeker of knowledge.",
            "The patterns of colors hold great power. Do you see it?",
            "Each palindrome is a key to understanding the balance of the universe.",
            "Few mortals have ventured this far into the temple. What drives you?",
        ],
        friendly: [
            "Your understanding of palindromes intrigues me.",
            "The symmetry you've shown reflects the harmony of all things.",
            "Perhaps there is more to you than I first perceived.",
            "Your mind has a certain resonance with the ancient patterns.",
        ],
    },
    RoundLines {
        hostile: [
            "You continue to stand before me. Bold.",
            "Your approach to the patterns is unconventional.",
            "Few have survived this long. Interesting.",
            "The temple grows restless with your presence.",
        ],
        neutral: [
            "Interesting approach to the patterns.",
            "You begin to see the symmetry, but there is more to learn.",
            "The colors speak to those who truly listen.",
            "What do you hope to gain from these trials, traveler?",
        ],
        friendly: [
            "Your progress is noteworthy.",
            "The colors respond to your understanding.",
            "Continue this path, and knowledge shall be yours.",
            "I sense a growing connection between you and the ancient patterns.",
        ],
    },
    RoundLines {
        hostile: [
            "Your persistence is remarkable.",
            "Many have tried to master these patterns. Most have failed.",
            "The true test approaches, mortal.",
            "The temple has seen countless seekers come and go. Most leave in despair.",
        ],
        neutral: [
            "The ancient ones created these patterns as tests.",
            "Balance in all things - this is the key to palindromes.",
            "Your understanding grows, but is it enough?",
            "What do you see when you look at these patterns? Mere colors, or something more?",
        ],
        friendly: [
            "Few have shown such aptitude with the color patterns.",
            "The ancient knowledge begins to reveal itself to you.",
            "Our meeting was perhaps not coincidental.",
            "The temple itself seems to respond differently to your presence now.",
        ],
    },
    RoundLines {
        hostile: [
            "Your approach is different from others who came before.",
            "The patterns grow more complex. Your mind must adapt.",
            "Soon, we will see your true potential.",
            "The ancient energies stir. They sense your ambition.",
        ],
        neutral: [
            "These palindromes have existed since time immemorial.",
            "The symmetry of colors reflects the symmetry of the universe.",
            "You are beginning to see beyond the surface.",
            "What drives you to continue these trials? Knowledge? Power? Or something else?",
        ],
        friendly: [
            "Your intuition for palindromes is noteworthy.",
            "Perhaps you were meant to discover these ancient secrets.",
            "I find our exchanges educational.",
            "The temple's energies seem to flow more harmoniously in your presence now.",
        ],
    },
    RoundLines {
        hostile: [
            "The final patterns await your attempt.",
            "The deepest secrets test even the strongest minds.",
            "Prepare to demonstrate your true understanding.",
            "Many have reached this point. Few have proceeded further.",
        ],
        neutral: [
            "We approach the final trials.",
            "The deepest secrets of palindromes await those who persevere.",
            "Show me what you have truly learned.",
            "What will you do with the knowledge you seek, I wonder?",
        ],
        friendly: [
            "We have come far in our understanding.",
            "The final patterns will reveal the ultimate truth.",
            "I believe you may be ready for what comes next.",
            "The temple has accepted you. I can feel its ancient energies resonating with your presence.",
        ],
    },
    RoundLines {
        hostile: [
            "This is your final test. Do not disappoint me.",
            "The culmination of your journey is at hand.",
            "Few reach this point. Even fewer succeed.",
            "Your determination is admirable, if misguided.",
        ],
        neutral: [
            "The final challenge awaits you.",
            "All you have learned will be tested now.",
            "The true nature of palindromes is about to be revealed.",
            "Are you prepared for what comes next?",
        ],
        friendly: [
            "You stand at the threshold of understanding.",
            "I have watched your progress with great interest.",
            "The ancient knowledge is almost within your grasp.",
            "Perhaps you are the one the prophecies spoke of.",
        ],
    },
];

fn round_index(round: u32) -> usize {
    usize::try_from(round).unwrap_or(usize::MAX).min(GUARDIAN_LINES.len() - 1)
}

/// Guardian lines for `round`, bucketed by the fixed 30/70 amiability split.
#[must_use]
pub fn guardian_dialog(round: u32, amiability: i32) -> &'static [&'static str] {
    let lines = &GUARDIAN_LINES[round_index(round)];
    match Disposition::from_amiability(amiability, &AmiabilityThresholds::default()) {
        Disposition::Hostile => &lines.hostile,
        Disposition::Neutral => &lines.neutral,
        Disposition::Friendly => &lines.friendly,
    }
}

#[must_use]
pub fn guardian_name(amiability: i32, thresholds: &AmiabilityThresholds) -> &'static str {
    match Disposition::from_amiability(amiability, thresholds) {
        Disposition::Hostile => "Hostile Guardian",
        Disposition::Neutral => "Ancient Guardian",
        Disposition::Friendly => "Friendly Guardian",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseTone {
    Positive,
    Negative,
}

/// Canned reply offered to the player during a talk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResponseOption {
    pub text: &'static str,
    pub tone: ResponseTone,
}

const fn positive(text: &'static str) -> ResponseOption {
    ResponseOption {
        text,
        tone: ResponseTone::Positive,
    }
}

const fn negative(text: &'static str) -> ResponseOption {
    ResponseOption {
        text,
        tone: ResponseTone::Negative,
    }
}

const RESPONSE_OPTIONS: [[ResponseOption; 4]; 6] = [
    [
        positive("I seek to understand the balance of these patterns."),
        positive("I need to learn more about this symmetry."),
        negative("I demand to know the power behind these colors!"),
        negative("I'll take whatever knowledge I can get."),
    ],
    [
        positive("Your wisdom is appreciated. I'm here to learn."),
        positive("The patterns have a certain beauty to them."),
        negative("This is taking too long. I need results quickly."),
        negative("Just tell me how to master these patterns."),
    ],
    [
        positive("I'm beginning to see the harmony in these sequences."),
        positive("Patience reveals the true nature of palindromes."),
        negative("I'll control these patterns with enough practice."),
        negative("How can I use this power for my own benefit?"),
    ],
    [
        positive("The balance of colors speaks to something deeper."),
        positive("I respect the ancient knowledge you protect."),
        negative("I will dominate these challenges eventually."),
        negative("These tests are merely obstacles to overcome."),
    ],
    [
        positive("We can learn from each other through these challenges."),
        positive("The journey itself brings understanding."),
        negative("I've come too far to fail now. I will succeed."),
        negative("The power of these patterns will be mine."),
    ],
    [
        positive("Thank you for sharing this ancient wisdom with me."),
        positive("The harmony of palindromes reflects the balance of all things."),
        negative("I've mastered your challenges. What's next?"),
        negative("Now I'll show you the true meaning of power."),
    ],
];

#[must_use]
pub fn response_options(round: u32) -> &'static [ResponseOption] {
    let index = usize::try_from(round)
        .unwrap_or(usize::MAX)
        .min(RESPONSE_OPTIONS.len() - 1);
    &RESPONSE_OPTIONS[index]
}

/// Guardian reaction to an amiability change.
#[must_use]
pub fn enemy_response(delta: i32, name: &str) -> String {
    if delta > REACTION_STRONG {
        format!("{name}'s eyes glow with a warm light. Your words have clearly pleased it greatly!")
    } else if delta > REACTION_MODERATE {
        format!(
            "{name} nods with approval. A subtle warmth enters its otherwise stoic expression."
        )
    } else if delta > 0 {
        format!("{name} seems mildly pleased by your words.")
    } else if delta < -REACTION_STRONG {
        format!(
            "{name}'s eyes flash with anger! The air around you grows ice cold. It is clearly displeased."
        )
    } else if delta < -REACTION_MODERATE {
        format!(
            "{name}'s gaze hardens. You sense strong disapproval emanating from its ancient presence."
        )
    } else if delta < 0 {
        format!("{name} seems irritated by your words.")
    } else {
        format!("{name} acknowledges your words with an enigmatic tilt of its head.")
    }
}

/// Reaction text with the signed change appended, e.g. `[Amiability +8.0]`.
#[must_use]
pub fn reaction_feedback(delta: i32, name: &str) -> String {
    let reaction = enemy_response(delta, name);
    if delta == 0 {
        return reaction;
    }
    let sign = if delta > 0 { "+" } else { "" };
    format!("{reaction} [Amiability {sign}{delta}.0]")
}

#[must_use]
pub fn home_access_message(
    phase: GamePhase,
    amiability: i32,
    name: &str,
    thresholds: &AmiabilityThresholds,
) -> String {
    if phase == GamePhase::Victory {
        format!("You have earned {name}'s respect and can now return home.")
    } else if amiability >= thresholds.friendly {
        format!("{name} seems to trust you. You may return home if you wish.")
    } else {
        format!(
            "{name} blocks your path. You cannot leave yet! Continue to improve your relationship with the Guardian."
        )
    }
}

/// Closing lines for a decided turn. `final_battle` separates the final
/// challenge from a friendly win or a defeat by damage.
#[must_use]
pub const fn verdict_dialog(verdict: TurnVerdict, final_battle: bool) -> &'static [&'static str] {
    match (verdict, final_battle) {
        (TurnVerdict::Continue, _) => &[],
        (TurnVerdict::FinalBattle, _) => &ONE_FINAL_CHALLENGE,
        (TurnVerdict::Victory, true) => &WON_FINAL_CHALLENGE,
        (TurnVerdict::Victory, false) => &AUTOMATIC_WIN_DIALOG,
        (TurnVerdict::Defeat, true) => &FAILED_FINAL_CHALLENGE,
        (TurnVerdict::Defeat, false) => &GAME_OVER,
    }
}

/// Lines shown once, the first time the Guardian lets the player leave.
#[must_use]
pub const fn home_unlock_dialog() -> &'static [&'static str] {
    &CAN_GO_HOME
}

#[must_use]
pub fn turn_prompt(turn: u32) -> String {
    format!("Turn {turn}: {PREPARE_FOR_BATTLE}")
}

#[must_use]
pub fn reflection_lines(name: &str) -> [String; 3] {
    [
        format!("You reflect on your encounter with {name}."),
        String::from("The patterns of colors and palindromes seem to hold deeper meaning."),
        String::from("Perhaps with more practice, you can master this ancient art."),
    ]
}

#[must_use]
pub fn enemy_reveal(name: &str, length: usize) -> String {
    format!("{name} identifies a palindrome of length {length}!")
}

#[must_use]
pub fn enemy_attack(name: &str, length: usize, damage: u32) -> String {
    format!("{name} attacks with a palindrome of length {length}! You take {damage} damage.")
}

#[must_use]
pub fn attack_deflected(name: &str) -> String {
    format!("You found the optimal palindrome! {name}'s attack has no effect on you this turn.")
}

#[must_use]
pub fn defeated_by(name: &str) -> String {
    format!("You have been defeated by {name}!")
}

#[must_use]
pub fn final_challenge_announcement(name: &str) -> String {
    format!("{name} seems unimpressed. 'One final test to prove your worth!'")
}

#[must_use]
pub fn round_complete(turn: u32, name: &str) -> String {
    format!(
        "Round {turn} complete. Talk to {name} before starting the next round! Click the Talk button to interact."
    )
}

#[must_use]
pub fn returned_to_temple(name: &str) -> String {
    format!("You have returned to the Ancient Temple. {name} acknowledges your presence.")
}

#[must_use]
pub fn already_rested(name: &str) -> String {
    format!("You have already rested during this turn. You must face {name} again before resting.")
}

#[must_use]
pub fn insufficient_mp(cost: i32) -> String {
    format!("You don't have enough MP to cast this spell! (Requires {cost} MP)")
}

#[must_use]
pub fn magic_revealed(length: usize) -> String {
    format!(
        "You cast a spell of revelation! The optimal palindrome of length {length} is now visible."
    )
}

#[must_use]
pub fn comparison_text(user_length: usize, optimal_length: usize, final_battle: bool, name: &str) -> String {
    match (user_length >= optimal_length, final_battle) {
        (true, true) => format!(
            "Excellent! You found the optimal palindrome of length {user_length}! {name} is impressed!"
        ),
        (true, false) => {
            format!("Excellent! You found the optimal palindrome of length {user_length}!")
        }
        (false, true) => format!(
            "You found a palindrome of length {user_length}, but the optimal one was length {optimal_length}. {name} defeats you!"
        ),
        (false, false) => format!(
            "You found a palindrome of length {user_length}, but there was a better one of length {optimal_length}!"
        ),
    }
}
