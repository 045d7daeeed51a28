use std::collections::HashSet;
use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{GtoError, GtoResult};

pub const RANKS_STR: &str = "23456789TJQKA";
pub const SUITS_STR: &str = "shdc";

/// Number of preflop-equivalent starting hand classes.
pub const NUM_HAND_KEYS: usize = 169;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
    Jack = 11,
    Queen = 12,
    King = 13,
    Ace = 14,
}

impl Rank {
    pub fn from_char(c: char) -> GtoResult<Rank> {
        match c {
            '2' => Ok(Rank::Two),
            '3' => Ok(Rank::Three),
            '4' => Ok(Rank::Four),
            '5' => Ok(Rank::Five),
            '6' => Ok(Rank::Six),
            '7' => Ok(Rank::Seven),
            '8' => Ok(Rank::Eight),
            '9' => Ok(Rank::Nine),
            'T' => Ok(Rank::Ten),
            'J' => Ok(Rank::Jack),
            'Q' => Ok(Rank::Queen),
            'K' => Ok(Rank::King),
            'A' => Ok(Rank::Ace),
            _ => Err(GtoError::InvalidRank(c)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    pub fn value(self) -> u8 {
        self as u8
    }
}

pub const ALL_RANKS: [Rank; 13] = [
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
    Rank::Nine,
    Rank::Ten,
    Rank::Jack,
    Rank::Queen,
    Rank::King,
    Rank::Ace,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub fn from_char(c: char) -> GtoResult<Suit> {
        match c.to_ascii_lowercase() {
            's' => Ok(Suit::Spades),
            'h' => Ok(Suit::Hearts),
            'd' => Ok(Suit::Diamonds),
            'c' => Ok(Suit::Clubs),
            _ => Err(GtoError::InvalidSuit(c)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Suit::Spades => 's',
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Suit::Spades => "\u{2660}",
            Suit::Hearts => "\u{2665}",
            Suit::Diamonds => "\u{2666}",
            Suit::Clubs => "\u{2663}",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

pub const ALL_SUITS: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

/// A single playing card. Ordered by rank, then suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Card {
    pub fn new(rank: Rank, suit: Suit) -> Card {
        Card { rank, suit }
    }

    pub fn value(&self) -> u8 {
        self.rank.value()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank.to_char(), self.suit.to_char())
    }
}

pub fn full_deck() -> Vec<Card> {
    ALL_RANKS
        .iter()
        .flat_map(|&r| ALL_SUITS.iter().map(move |&s| Card::new(r, s)))
        .collect()
}

pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(exclude: Option<&[Card]>) -> Deck {
        let excluded: HashSet<Card> = exclude
            .map(|e| e.iter().copied().collect())
            .unwrap_or_default();
        let cards = full_deck()
            .into_iter()
            .filter(|c| !excluded.contains(c))
            .collect();
        Deck { cards }
    }

    /// Shuffle with a caller-supplied generator so deals are reproducible.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &mut Self {
        self.cards.shuffle(rng);
        self
    }

    pub fn deal(&mut self, n: usize) -> GtoResult<Vec<Card>> {
        if n > self.cards.len() {
            return Err(GtoError::NotEnoughDeck {
                requested: n,
                available: self.cards.len(),
            });
        }
        let dealt: Vec<Card> = self.cards.drain(..n).collect();
        Ok(dealt)
    }

    pub fn deal_pair(&mut self) -> GtoResult<[Card; 2]> {
        let cards = self.deal(2)?;
        Ok([cards[0], cards[1]])
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

pub fn parse_card(notation: &str) -> GtoResult<Card> {
    let notation = notation.trim();
    let chars: Vec<char> = notation.chars().collect();
    if chars.len() != 2 {
        return Err(GtoError::InvalidCardNotation(notation.to_string()));
    }
    let rank = Rank::from_char(chars[0].to_ascii_uppercase())?;
    let suit = Suit::from_char(chars[1])?;
    Ok(Card::new(rank, suit))
}

pub fn parse_board(notation: &str) -> GtoResult<Vec<Card>> {
    let notation = notation.trim().replace([' ', ','], "");
    if notation.len() % 2 != 0 {
        return Err(GtoError::InvalidBoardNotation(notation));
    }
    let mut cards = Vec::new();
    let chars: Vec<char> = notation.chars().collect();
    for pair in chars.chunks(2) {
        let s: String = pair.iter().collect();
        let card = parse_card(&s)?;
        if cards.contains(&card) {
            return Err(GtoError::DuplicateCard(card.to_string()));
        }
        cards.push(card);
    }
    Ok(cards)
}

/// Parse exactly two hole cards, e.g. "AhKs".
pub fn parse_hole_cards(notation: &str) -> GtoResult<[Card; 2]> {
    let cards = parse_board(notation)?;
    if cards.len() != 2 {
        return Err(GtoError::InvalidHandSize);
    }
    Ok([cards[0], cards[1]])
}

/// Canonical preflop key for two hole cards: "AA", "AKs", "QJo".
pub fn hand_key(c1: Card, c2: Card) -> String {
    let (hi, lo) = if c1.rank >= c2.rank { (c1, c2) } else { (c2, c1) };
    if hi.rank == lo.rank {
        return format!("{}{}", hi.rank.to_char(), lo.rank.to_char());
    }
    let suffix = if hi.suit == lo.suit { 's' } else { 'o' };
    format!("{}{}{}", hi.rank.to_char(), lo.rank.to_char(), suffix)
}

/// Expand a canonical key into every concrete combination it covers:
/// 6 for a pair, 4 for suited, 12 for offsuit.
pub fn expand_hand_key(key: &str) -> GtoResult<Vec<(Card, Card)>> {
    let key = key.trim();
    let chars: Vec<char> = key.chars().collect();

    if chars.len() == 2 && chars[0] == chars[1] {
        let rank = Rank::from_char(chars[0])?;
        let mut combos = Vec::with_capacity(6);
        for i in 0..ALL_SUITS.len() {
            for j in (i + 1)..ALL_SUITS.len() {
                combos.push((Card::new(rank, ALL_SUITS[i]), Card::new(rank, ALL_SUITS[j])));
            }
        }
        return Ok(combos);
    }

    if chars.len() == 3 && chars[0] != chars[1] {
        let r1 = Rank::from_char(chars[0])?;
        let r2 = Rank::from_char(chars[1])?;
        match chars[2] {
            's' => {
                return Ok(ALL_SUITS
                    .iter()
                    .map(|&s| (Card::new(r1, s), Card::new(r2, s)))
                    .collect());
            }
            'o' => {
                let mut combos = Vec::with_capacity(12);
                for &s1 in &ALL_SUITS {
                    for &s2 in &ALL_SUITS {
                        if s1 != s2 {
                            combos.push((Card::new(r1, s1), Card::new(r2, s2)));
                        }
                    }
                }
                return Ok(combos);
            }
            _ => {}
        }
    }

    Err(GtoError::InvalidHandNotation(key.to_string()))
}

/// The 13x13 grid of canonical keys, row-major from aces down.
/// Pairs sit on the diagonal, suited hands above it, offsuit below.
pub fn all_hand_keys() -> Vec<String> {
    let ranks: Vec<char> = RANKS_STR.chars().rev().collect();
    let mut keys = Vec::with_capacity(NUM_HAND_KEYS);
    for (i, &r1) in ranks.iter().enumerate() {
        for (j, &r2) in ranks.iter().enumerate() {
            let key = if i == j {
                format!("{}{}", r1, r2)
            } else if i < j {
                format!("{}{}s", r1, r2)
            } else {
                format!("{}{}o", r2, r1)
            };
            keys.push(key);
        }
    }
    keys
}

/// Position of a rank char in RANKS_STR, '2' = 0 through 'A' = 12.
pub fn rank_index(c: char) -> Option<usize> {
    RANKS_STR.find(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_unique() {
        let keys = all_hand_keys();
        let set: HashSet<&String> = keys.iter().collect();
        assert_eq!(set.len(), NUM_HAND_KEYS);
        assert_eq!(keys[0], "AA");
        assert_eq!(keys[1], "AKs");
        assert_eq!(keys[13], "AKo");
        assert_eq!(keys[168], "22");
    }
}
