//! Colour tokens that make up a battle sequence.
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One symbolic colour from the fixed eight-colour alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    Red,
    Blue,
    Green,
    Yellow,
    Purple,
    Orange,
    White,
}

impl Color {
    /// Every colour in alphabet order.
    pub const ALL: [Self; 8] = [
        Self::Black,
        Self::Red,
        Self::Blue,
        Self::Green,
        Self::Yellow,
        Self::Purple,
        Self::Orange,
        Self::White,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Purple => "purple",
            Self::Orange => "orange",
            Self::White => "white",
        }
    }

    /// Hex swatch used by presentation layers.
    #[must_use]
    pub const fn hex(self) -> &'static str {
        match self {
            Self::Black => "#000000",
            Self::Red => "#FF0000",
            Self::Blue => "#0000FF",
            Self::Green => "#00FF00",
            Self::Yellow => "#FFFF00",
            Self::Purple => "#800080",
            Self::Orange => "#FFA500",
            Self::White => "#FFFFFF",
        }
    }

    /// Draw a uniformly random colour.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Color {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|color| color.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.as_str().to_string()
    }
}
