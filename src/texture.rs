//! Flop texture classification: every three-card board maps to exactly one
//! of eight strategic categories. Turn and river reuse the flop's texture.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::error::GtoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Texture {
    #[serde(rename = "monotone")]
    Monotone,
    #[serde(rename = "paired")]
    Paired,
    #[serde(rename = "wet_connected")]
    WetConnected,
    #[serde(rename = "wet_twotone")]
    WetTwoTone,
    #[serde(rename = "high_dry_A")]
    HighDryAce,
    #[serde(rename = "high_dry_K")]
    HighDryKing,
    #[serde(rename = "medium_dry")]
    MediumDry,
    #[serde(rename = "low_dry")]
    LowDry,
}

pub const ALL_TEXTURES: [Texture; 8] = [
    Texture::Monotone,
    Texture::Paired,
    Texture::WetConnected,
    Texture::WetTwoTone,
    Texture::HighDryAce,
    Texture::HighDryKing,
    Texture::MediumDry,
    Texture::LowDry,
];

impl Texture {
    pub fn as_str(self) -> &'static str {
        match self {
            Texture::Monotone => "monotone",
            Texture::Paired => "paired",
            Texture::WetConnected => "wet_connected",
            Texture::WetTwoTone => "wet_twotone",
            Texture::HighDryAce => "high_dry_A",
            Texture::HighDryKing => "high_dry_K",
            Texture::MediumDry => "medium_dry",
            Texture::LowDry => "low_dry",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Texture::Monotone => "Monotone (3 of one suit)",
            Texture::Paired => "Paired board",
            Texture::WetConnected => "Wet connected (straight-draw heavy)",
            Texture::WetTwoTone => "Wet two-tone (flush-draw heavy)",
            Texture::HighDryAce => "Ace-high dry",
            Texture::HighDryKing => "K/Q-high dry",
            Texture::MediumDry => "Medium dry (J-9 high)",
            Texture::LowDry => "Low dry (8-high or less)",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Texture {
    type Err = GtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_TEXTURES
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| GtoError::InvalidValue(format!("unknown texture '{}'", s)))
    }
}

/// Classify a flop. Only the first three cards are read; passing fewer than
/// three is a caller error and yields an arbitrary (but valid) texture.
pub fn classify_texture(board: &[Card]) -> Texture {
    let flop = &board[..board.len().min(3)];

    let mut suit_counts = [0u8; 4];
    let mut rank_counts = [0u8; 15];
    for c in flop {
        suit_counts[c.suit.index()] += 1;
        rank_counts[c.value() as usize] += 1;
    }
    let max_suit = suit_counts.iter().copied().max().unwrap_or(0);

    if max_suit >= 3 {
        return Texture::Monotone;
    }
    if rank_counts.iter().any(|&n| n >= 2) {
        return Texture::Paired;
    }

    let mut ranks: Vec<u8> = flop.iter().map(|c| c.value()).collect();
    ranks.sort_unstable();
    let max_gap = ranks.windows(2).map(|w| w[1] - w[0]).max().unwrap_or(0);
    let connected = max_gap <= 2;
    let two_tone = max_suit == 2;

    if connected {
        return Texture::WetConnected;
    }
    if two_tone {
        return Texture::WetTwoTone;
    }

    match ranks.last().copied().unwrap_or(0) {
        14 => Texture::HighDryAce,
        12 | 13 => Texture::HighDryKing,
        9..=11 => Texture::MediumDry,
        _ => Texture::LowDry,
    }
}
