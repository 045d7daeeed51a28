use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use itertools::Itertools;

use crate::cards::Card;
use crate::error::{GtoError, GtoResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HandCategory {
    HighCard = 0,
    OnePair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
    RoyalFlush = 9,
}

impl HandCategory {
    /// Coarse rank class, strongest first: 0 royal flush, 1 straight flush,
    /// 2 quads, 3 full house, 4 flush, 5 straight, 6 trips, 7 two pair,
    /// 8 one pair, 9 high card.
    pub fn rank_class(self) -> u8 {
        9 - self as u8
    }
}

impl fmt::Display for HandCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandCategory::HighCard => write!(f, "High Card"),
            HandCategory::OnePair => write!(f, "One Pair"),
            HandCategory::TwoPair => write!(f, "Two Pair"),
            HandCategory::ThreeOfAKind => write!(f, "Three of a Kind"),
            HandCategory::Straight => write!(f, "Straight"),
            HandCategory::Flush => write!(f, "Flush"),
            HandCategory::FullHouse => write!(f, "Full House"),
            HandCategory::FourOfAKind => write!(f, "Four of a Kind"),
            HandCategory::StraightFlush => write!(f, "Straight Flush"),
            HandCategory::RoyalFlush => write!(f, "Royal Flush"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HandResult {
    pub rank: u8,
    pub category: HandCategory,
    pub kickers: Vec<u8>,
    pub cards: Vec<Card>,
}

impl HandResult {
    pub fn new(rank: u8, category: HandCategory, kickers: Vec<u8>, cards: Vec<Card>) -> Self {
        HandResult {
            rank,
            category,
            kickers,
            cards,
        }
    }

    pub fn rank_class(&self) -> u8 {
        self.category.rank_class()
    }
}

impl fmt::Display for HandResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.category)
    }
}

impl PartialEq for HandResult {
    fn eq(&self, other: &Self) -> bool {
        self.rank == other.rank && self.kickers == other.kickers
    }
}

impl Eq for HandResult {}

impl PartialOrd for HandResult {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HandResult {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.rank.cmp(&other.rank) {
            Ordering::Equal => self.kickers.cmp(&other.kickers),
            ord => ord,
        }
    }
}

fn is_flush(cards: &[Card]) -> bool {
    cards.windows(2).all(|w| w[0].suit == w[1].suit)
}

/// High card of the best straight among `values`, wheel counted as 5-high.
/// Works for any number of values, not only five.
pub fn straight_high(values: &[u8]) -> Option<u8> {
    let unique: BTreeSet<u8> = values.iter().copied().collect();
    for high in (6..=14u8).rev() {
        if (high - 4..=high).all(|v| unique.contains(&v)) {
            return Some(high);
        }
    }
    let wheel = [14u8, 2, 3, 4, 5];
    if wheel.iter().all(|v| unique.contains(v)) {
        return Some(5);
    }
    None
}

fn evaluate_five(cards: &[Card; 5]) -> HandResult {
    let mut values: Vec<u8> = cards.iter().map(|c| c.value()).collect();
    values.sort_unstable_by(|a, b| b.cmp(a));

    let flush = is_flush(cards);
    let straight = straight_high(&values);

    let mut counts = [0u8; 15];
    for &v in &values {
        counts[v as usize] += 1;
    }

    if let (true, Some(high)) = (flush, straight) {
        if high == 14 {
            return HandResult::new(9, HandCategory::RoyalFlush, vec![14], cards.to_vec());
        }
        return HandResult::new(8, HandCategory::StraightFlush, vec![high], cards.to_vec());
    }

    // (count, value) sorted by count desc, then value desc
    let mut freq: Vec<(u8, u8)> = (2..=14u8)
        .rev()
        .filter(|&v| counts[v as usize] > 0)
        .map(|v| (counts[v as usize], v))
        .collect();
    freq.sort_by(|a, b| b.0.cmp(&a.0).then(b.1.cmp(&a.1)));

    if freq[0].0 == 4 {
        let quad_val = freq[0].1;
        let kicker = values.iter().find(|&&v| v != quad_val).copied().unwrap_or(0);
        return HandResult::new(7, HandCategory::FourOfAKind, vec![quad_val, kicker], cards.to_vec());
    }

    if freq[0].0 == 3 && freq.len() > 1 && freq[1].0 == 2 {
        return HandResult::new(6, HandCategory::FullHouse, vec![freq[0].1, freq[1].1], cards.to_vec());
    }

    if flush {
        return HandResult::new(5, HandCategory::Flush, values.clone(), cards.to_vec());
    }

    if let Some(high) = straight {
        return HandResult::new(4, HandCategory::Straight, vec![high], cards.to_vec());
    }

    if freq[0].0 == 3 {
        let trip_val = freq[0].1;
        let mut kickers = vec![trip_val];
        kickers.extend(values.iter().filter(|&&v| v != trip_val));
        return HandResult::new(3, HandCategory::ThreeOfAKind, kickers, cards.to_vec());
    }

    let pair_vals: Vec<u8> = (2..=14u8)
        .rev()
        .filter(|&v| counts[v as usize] == 2)
        .collect();

    if pair_vals.len() == 2 {
        let kicker = values
            .iter()
            .find(|&&v| !pair_vals.contains(&v))
            .copied()
            .unwrap_or(0);
        return HandResult::new(
            2,
            HandCategory::TwoPair,
            vec![pair_vals[0], pair_vals[1], kicker],
            cards.to_vec(),
        );
    }

    if pair_vals.len() == 1 {
        let pair_val = pair_vals[0];
        let mut kickers = vec![pair_val];
        kickers.extend(values.iter().filter(|&&v| v != pair_val));
        return HandResult::new(1, HandCategory::OnePair, kickers, cards.to_vec());
    }

    HandResult::new(0, HandCategory::HighCard, values, cards.to_vec())
}

/// Best five-card hand from hole cards plus 3-5 board cards.
pub fn evaluate_hand(hole_cards: &[Card], board: &[Card]) -> GtoResult<HandResult> {
    let mut all_cards: Vec<Card> = Vec::with_capacity(hole_cards.len() + board.len());
    all_cards.extend_from_slice(hole_cards);
    all_cards.extend_from_slice(board);

    if all_cards.len() < 5 {
        return Err(GtoError::NotEnoughCards {
            need: 5,
            got: all_cards.len(),
        });
    }

    all_cards
        .iter()
        .combinations(5)
        .map(|combo| evaluate_five(&[*combo[0], *combo[1], *combo[2], *combo[3], *combo[4]]))
        .max()
        .ok_or(GtoError::NotEnoughCards {
            need: 5,
            got: all_cards.len(),
        })
}

/// Indices of every hand tied for best. Empty input gives an empty set.
pub fn winners(results: &[HandResult]) -> Vec<usize> {
    let Some(best) = results.iter().max() else {
        return Vec::new();
    };
    results
        .iter()
        .enumerate()
        .filter(|(_, r)| *r == best)
        .map(|(i, _)| i)
        .collect()
}
