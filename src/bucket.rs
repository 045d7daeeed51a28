//! Hand bucketing: hole cards + board → one of 13 strength buckets.
//!
//! The evaluator's coarse category picks a sub-classifier, each
//! sub-classifier returns a [`MadeHand`] describing what hero actually holds,
//! and a single exhaustive match turns that into a [`Bucket`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::error::GtoError;
use crate::hand_evaluator::{evaluate_hand, straight_high, HandCategory};
use crate::texture::{classify_texture, Texture};

/// Strength buckets, strongest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Premium,
    Nut,
    Strong,
    TwoPair,
    TopPair,
    Overpair,
    MidPair,
    Underpair,
    NutDraw,
    Draw,
    WeakMade,
    Gutshot,
    Air,
}

pub const ALL_BUCKETS: [Bucket; 13] = [
    Bucket::Premium,
    Bucket::Nut,
    Bucket::Strong,
    Bucket::TwoPair,
    Bucket::TopPair,
    Bucket::Overpair,
    Bucket::MidPair,
    Bucket::Underpair,
    Bucket::NutDraw,
    Bucket::Draw,
    Bucket::WeakMade,
    Bucket::Gutshot,
    Bucket::Air,
];

impl Bucket {
    pub fn as_str(self) -> &'static str {
        match self {
            Bucket::Premium => "premium",
            Bucket::Nut => "nut",
            Bucket::Strong => "strong",
            Bucket::TwoPair => "two_pair",
            Bucket::TopPair => "top_pair",
            Bucket::Overpair => "overpair",
            Bucket::MidPair => "mid_pair",
            Bucket::Underpair => "underpair",
            Bucket::NutDraw => "nut_draw",
            Bucket::Draw => "draw",
            Bucket::WeakMade => "weak_made",
            Bucket::Gutshot => "gutshot",
            Bucket::Air => "air",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Premium => "Premium (full house+, nut flush, top set)",
            Bucket::Nut => "Nut (set, K/Q-high flush)",
            Bucket::Strong => "Strong (overpair QQ+, two-card straight, trips)",
            Bucket::TwoPair => "Two pair",
            Bucket::TopPair => "Top pair good kicker",
            Bucket::Overpair => "Overpair (TT-JJ)",
            Bucket::MidPair => "Mid pair / TP weak kicker",
            Bucket::Underpair => "Underpair (pocket pair below top card)",
            Bucket::NutDraw => "Nut draw (combo draw)",
            Bucket::Draw => "Draw (flush draw, OESD)",
            Bucket::WeakMade => "Weak made (bottom pair)",
            Bucket::Gutshot => "Gutshot / backdoor / overcards",
            Bucket::Air => "Air (nothing)",
        }
    }

    /// Position in the strongest-first ordering.
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Bucket {
    type Err = GtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_BUCKETS
            .iter()
            .copied()
            .find(|b| b.as_str() == s)
            .ok_or_else(|| GtoError::InvalidValue(format!("unknown bucket '{}'", s)))
    }
}

/// Texture and bucket for one hand on one board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Spot {
    pub texture: Texture,
    pub bucket: Bucket,
}

/// Drawing potential of an unfinished hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Draw {
    /// Flush draw plus any straight draw.
    Combo,
    /// Flush draw or open-ended straight draw.
    Strong,
    Gutshot,
    /// Three to a flush on the flop.
    Backdoor,
}

impl Draw {
    pub fn bucket(self) -> Bucket {
        match self {
            Draw::Combo => Bucket::NutDraw,
            Draw::Strong => Bucket::Draw,
            Draw::Gutshot | Draw::Backdoor => Bucket::Gutshot,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairKind {
    /// Pocket pair above every board card.
    Overpair { rank: u8 },
    TopPair { kicker: u8 },
    MiddlePair,
    BottomPair,
    /// Pocket pair between the top and second board card.
    Underpair,
    /// Pocket pair below the second board card.
    LowPocket,
    /// The pair is the board's; hero's cards are unpaired.
    BoardPair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MadeHand {
    Monster,
    Flush { hero_high: Option<u8> },
    Straight { two_card: bool },
    Set { top: bool },
    Trips,
    TwoPair,
    OnePair(PairKind),
    NoPair { live_overcard: bool },
}

/// Classify hole cards on a 3-5 card board.
///
/// Flush, straight, set and pair boundaries are read straight off the cards;
/// texture does not split any bucket, so it is not an input here. Fewer
/// than five known cards is a caller error and lands in `Air`.
pub fn classify_hand(hole: &[Card], board: &[Card]) -> Bucket {
    let made = match classify_made(hole, board) {
        Some(made) => made,
        None => {
            log::debug!("cannot bucket {} hole + {} board cards", hole.len(), board.len());
            return Bucket::Air;
        }
    };

    match made {
        MadeHand::Monster => Bucket::Premium,
        MadeHand::Flush { hero_high: None } => Bucket::TwoPair,
        MadeHand::Flush { hero_high: Some(14) } => Bucket::Premium,
        MadeHand::Flush { hero_high: Some(12..=13) } => Bucket::Nut,
        MadeHand::Flush { hero_high: Some(_) } => Bucket::Strong,
        MadeHand::Straight { two_card: true } => Bucket::Strong,
        MadeHand::Straight { two_card: false } => Bucket::TwoPair,
        MadeHand::Set { top: true } => Bucket::Premium,
        MadeHand::Set { top: false } => Bucket::Nut,
        MadeHand::Trips => Bucket::Strong,
        MadeHand::TwoPair => Bucket::TwoPair,
        MadeHand::OnePair(PairKind::Overpair { rank }) => match rank {
            12..=14 => Bucket::Strong,
            10..=11 => Bucket::Overpair,
            _ => Bucket::Underpair,
        },
        MadeHand::OnePair(PairKind::TopPair { kicker }) => {
            if kicker >= 11 {
                Bucket::TopPair
            } else {
                Bucket::MidPair
            }
        }
        MadeHand::OnePair(PairKind::MiddlePair) => match detect_draw(hole, board) {
            Some(draw @ (Draw::Combo | Draw::Strong)) => draw.bucket(),
            _ => Bucket::MidPair,
        },
        MadeHand::OnePair(PairKind::BottomPair) => Bucket::WeakMade,
        MadeHand::OnePair(PairKind::Underpair) => Bucket::Underpair,
        MadeHand::OnePair(PairKind::LowPocket) => Bucket::WeakMade,
        MadeHand::OnePair(PairKind::BoardPair) => detect_draw(hole, board).map_or(Bucket::WeakMade, Draw::bucket),
        MadeHand::NoPair { live_overcard } => match detect_draw(hole, board) {
            Some(draw) => draw.bucket(),
            None if live_overcard => Bucket::Gutshot,
            None => Bucket::Air,
        },
    }
}

/// Texture of the flop plus the bucket on the full board so far.
pub fn classify_spot(hole: &[Card], board: &[Card]) -> Spot {
    Spot {
        texture: classify_texture(board),
        bucket: classify_hand(hole, board),
    }
}

fn classify_made(hole: &[Card], board: &[Card]) -> Option<MadeHand> {
    if hole.len() != 2 || board.len() < 3 {
        return None;
    }
    let result = evaluate_hand(hole, board).ok()?;
    let made = match result.category {
        HandCategory::RoyalFlush
        | HandCategory::StraightFlush
        | HandCategory::FourOfAKind
        | HandCategory::FullHouse => MadeHand::Monster,
        HandCategory::Flush => flush_class(hole, board),
        HandCategory::Straight => straight_class(hole, board),
        HandCategory::ThreeOfAKind => trips_class(hole, board),
        HandCategory::TwoPair => MadeHand::TwoPair,
        HandCategory::OnePair => MadeHand::OnePair(pair_class(hole, board)),
        HandCategory::HighCard => {
            let hero_high = hole.iter().map(|c| c.value()).max().unwrap_or(0);
            let board_high = board.iter().map(|c| c.value()).max().unwrap_or(0);
            MadeHand::NoPair {
                live_overcard: hero_high > board_high && hero_high >= 13,
            }
        }
    };
    Some(made)
}

fn flush_class(hole: &[Card], board: &[Card]) -> MadeHand {
    let mut suit_counts = [0u8; 4];
    for c in hole.iter().chain(board) {
        suit_counts[c.suit.index()] += 1;
    }
    let flush_suit = (0..4).max_by_key(|&i| suit_counts[i]).unwrap_or(0);
    let hero_high = hole
        .iter()
        .filter(|c| c.suit.index() == flush_suit)
        .map(|c| c.value())
        .max();
    MadeHand::Flush { hero_high }
}

fn straight_class(hole: &[Card], board: &[Card]) -> MadeHand {
    let board_values: Vec<u8> = board.iter().map(|c| c.value()).collect();
    let one_card = hole.iter().any(|h| {
        let mut values = board_values.clone();
        values.push(h.value());
        straight_high(&values).is_some()
    });
    MadeHand::Straight { two_card: !one_card }
}

fn trips_class(hole: &[Card], board: &[Card]) -> MadeHand {
    let pocket = hole[0].rank == hole[1].rank;
    let on_board = board.iter().any(|c| c.rank == hole[0].rank);
    if pocket && on_board {
        let top_board = board.iter().map(|c| c.value()).max().unwrap_or(0);
        MadeHand::Set {
            top: hole[0].value() == top_board,
        }
    } else {
        MadeHand::Trips
    }
}

fn pair_class(hole: &[Card], board: &[Card]) -> PairKind {
    let (h0, h1) = {
        let (a, b) = (hole[0].value(), hole[1].value());
        (a.max(b), a.min(b))
    };
    let mut board_ranks: Vec<u8> = board.iter().map(|c| c.value()).collect();
    board_ranks.sort_unstable_by(|a, b| b.cmp(a));
    let top = board_ranks[0];
    let second = board_ranks.get(1).copied();
    let third = board_ranks.get(2).copied();
    let pocket = h0 == h1;

    if pocket && h0 > top {
        return PairKind::Overpair { rank: h0 };
    }
    if h0 == top || h1 == top {
        let kicker = if h1 == top { h0 } else { h1 };
        return PairKind::TopPair { kicker };
    }
    if second.is_some_and(|s| h0 == s || h1 == s) {
        return PairKind::MiddlePair;
    }
    if third.is_some_and(|t| h0 == t || h1 == t) {
        return PairKind::BottomPair;
    }
    if pocket {
        return if second.map_or(true, |s| h0 > s) {
            PairKind::Underpair
        } else {
            PairKind::LowPocket
        };
    }
    PairKind::BoardPair
}

/// Draws among every known card. Flop-only backdoor flush counts as the
/// weakest draw.
pub fn detect_draw(hole: &[Card], board: &[Card]) -> Option<Draw> {
    let mut suit_counts = [0u8; 4];
    for c in hole.iter().chain(board) {
        suit_counts[c.suit.index()] += 1;
    }
    let mut ranks: Vec<u8> = hole.iter().chain(board).map(|c| c.value()).collect();
    ranks.sort_unstable();
    ranks.dedup();

    let flush_draw = suit_counts.iter().any(|&n| n == 4);
    let oesd = has_open_ended(&ranks);
    let gutshot = has_gutshot(&ranks);

    if flush_draw && (oesd || gutshot) {
        return Some(Draw::Combo);
    }
    if flush_draw || oesd {
        return Some(Draw::Strong);
    }
    if gutshot {
        return Some(Draw::Gutshot);
    }
    if board.len() == 3 && suit_counts.iter().any(|&n| n == 3) {
        return Some(Draw::Backdoor);
    }
    None
}

/// Sorted unique ranks with the ace also playing low (as 1).
fn with_low_ace(sorted_ranks: &[u8]) -> Vec<u8> {
    let mut extended = Vec::with_capacity(sorted_ranks.len() + 1);
    if sorted_ranks.contains(&14) {
        extended.push(1);
    }
    extended.extend_from_slice(sorted_ranks);
    extended
}

/// Four consecutive ranks with room to complete at both ends.
fn has_open_ended(sorted_ranks: &[u8]) -> bool {
    with_low_ace(sorted_ranks)
        .windows(4)
        .any(|w| w[3] - w[0] == 3 && w[0] > 1 && w[3] < 14)
}

/// Four distinct ranks inside a five-rank span (one missing inside).
fn has_gutshot(sorted_ranks: &[u8]) -> bool {
    with_low_ace(sorted_ranks)
        .windows(4)
        .any(|w| w[3] - w[0] == 4)
}
