//! Single-decision drills and their grading.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::bucket::{classify_hand, Bucket};
use crate::cards::{hand_key, Card, Deck};
use crate::engine::Engine;
use crate::error::{GtoError, GtoResult};
use crate::preflop::{Position, RFI_POSITIONS};
use crate::strategy::{Action, ActionDistribution, Role, FACING_ACTIONS, FIRST_ACTIONS};
use crate::texture::{classify_texture, Texture};

/// Chance a postflop drill puts the player facing a bet.
pub const FACING_BET_PROBABILITY: f64 = 0.3;
/// Postflop actions played at least this often are acceptable answers.
pub const ACCEPTABLE_FREQUENCY: f64 = 0.15;

const DRILL_POTS: [f64; 6] = [6.0, 8.0, 10.0, 12.0, 15.0, 20.0];

#[derive(Debug, Clone, PartialEq)]
pub enum Drill {
    PreflopRfi {
        position: Position,
        hand: [Card; 2],
        hand_key: String,
        correct: Action,
        range_size: usize,
    },
    PreflopFacing {
        position: Position,
        opener: Position,
        hand: [Card; 2],
        hand_key: String,
        correct: Action,
        raise_range: HashSet<String>,
        call_range: HashSet<String>,
    },
    Postflop {
        role: Role,
        facing_bet: bool,
        hand: [Card; 2],
        board: Vec<Card>,
        texture: Texture,
        bucket: Bucket,
        strategy: ActionDistribution,
        correct: Vec<Action>,
        breakdown: Vec<(Bucket, ActionDistribution)>,
        pot: f64,
    },
}

impl Drill {
    /// Answers offered to the player.
    pub fn actions(&self) -> Vec<Action> {
        match self {
            Drill::PreflopRfi { .. } => vec![Action::Raise, Action::Fold],
            Drill::PreflopFacing { .. } => vec![Action::Raise, Action::Call, Action::Fold],
            Drill::Postflop { facing_bet: true, .. } => FACING_ACTIONS.to_vec(),
            Drill::Postflop { .. } => FIRST_ACTIONS.to_vec(),
        }
    }

    pub fn hand(&self) -> &[Card; 2] {
        match self {
            Drill::PreflopRfi { hand, .. } | Drill::PreflopFacing { hand, .. } | Drill::Postflop { hand, .. } => hand,
        }
    }

    pub fn situation(&self) -> String {
        match self {
            Drill::PreflopRfi { position, .. } => format!("RFI from {}", position),
            Drill::PreflopFacing { position, opener, .. } => format!("{} vs {} open", position, opener),
            Drill::Postflop {
                role,
                facing_bet,
                texture,
                ..
            } => {
                let tex = texture.as_str().replace('_', " ");
                match (role, facing_bet) {
                    (_, true) => format!("{} facing bet on {} board", role, tex),
                    (Role::Oop, false) => format!("OOP first to act on {} board", tex),
                    (Role::Ip, false) => format!("IP after check on {} board", tex),
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn deal_hand<R: Rng + ?Sized>(rng: &mut R) -> GtoResult<(Deck, [Card; 2])> {
    let mut deck = Deck::new(None);
    deck.shuffle_with(rng);
    let hand = deck.deal_pair()?;
    Ok((deck, hand))
}

pub fn generate_preflop_rfi<R: Rng + ?Sized>(engine: &Engine, rng: &mut R) -> GtoResult<Drill> {
    let position = *RFI_POSITIONS
        .choose(rng)
        .ok_or_else(|| GtoError::InvalidValue("no opening positions".to_string()))?;
    let (_, hand) = deal_hand(rng)?;
    let key = hand_key(hand[0], hand[1]);
    Ok(Drill::PreflopRfi {
        position,
        hand,
        correct: engine.charts.preflop_action(position, &key, None),
        range_size: engine.charts.opening_range(position).map_or(0, |r| r.len()),
        hand_key: key,
    })
}

pub fn generate_preflop_facing<R: Rng + ?Sized>(engine: &Engine, rng: &mut R) -> GtoResult<Drill> {
    let matchups = engine.charts.matchups();
    let &(position, opener) = matchups
        .choose(rng)
        .ok_or_else(|| GtoError::InvalidValue("no facing-open tables".to_string()))?;
    let (_, hand) = deal_hand(rng)?;
    let key = hand_key(hand[0], hand[1]);
    let table = engine.charts.facing(position, opener).cloned().unwrap_or_default();
    Ok(Drill::PreflopFacing {
        position,
        opener,
        hand,
        correct: engine.charts.preflop_action(position, &key, Some(opener)),
        hand_key: key,
        raise_range: table.raise,
        call_range: table.call,
    })
}

/// RFI or facing-open, evenly.
pub fn generate_preflop<R: Rng + ?Sized>(engine: &Engine, rng: &mut R) -> GtoResult<Drill> {
    if rng.gen_bool(0.5) {
        generate_preflop_rfi(engine, rng)
    } else {
        generate_preflop_facing(engine, rng)
    }
}

pub fn generate_postflop<R: Rng + ?Sized>(engine: &Engine, rng: &mut R) -> GtoResult<Drill> {
    let (mut deck, hand) = deal_hand(rng)?;
    let board = deck.deal(3)?;
    let role = if rng.gen_bool(0.5) { Role::Oop } else { Role::Ip };
    let facing_bet = rng.gen::<f64>() < FACING_BET_PROBABILITY;
    let texture = classify_texture(&board);
    let bucket = classify_hand(&hand, &board);
    let strategy = engine.strategy.lookup(role, texture, bucket, facing_bet);
    let pot = DRILL_POTS.choose(rng).copied().unwrap_or(10.0);
    Ok(Drill::Postflop {
        role,
        facing_bet,
        hand,
        board,
        texture,
        bucket,
        correct: strategy.correct_actions(),
        breakdown: engine.strategy.range_breakdown(role, texture, facing_bet),
        strategy,
        pot,
    })
}

// ---------------------------------------------------------------------------
// Grading
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Exactly the reference answer.
    Primary,
    /// Not the reference, but a reasonable alternative.
    Acceptable,
    Wrong,
}

impl Verdict {
    pub fn is_correct(self) -> bool {
        self != Verdict::Wrong
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grade {
    pub verdict: Verdict,
    pub answer: Action,
    pub explanation: String,
}

pub fn grade(drill: &Drill, answer: Action) -> Grade {
    match drill {
        Drill::PreflopRfi {
            position,
            hand_key,
            correct,
            range_size,
            ..
        } => {
            let (verdict, explanation) = if answer == *correct {
                (Verdict::Primary, format!("Correct! {} is a {} from {}.", hand_key, correct, position))
            } else {
                (
                    Verdict::Wrong,
                    format!(
                        "{} should be a {} from {}. The {} RFI range has {} hands.",
                        hand_key, correct, position, position, range_size
                    ),
                )
            };
            Grade {
                verdict,
                answer,
                explanation,
            }
        }
        Drill::PreflopFacing {
            position,
            opener,
            hand_key,
            correct,
            raise_range,
            call_range,
            ..
        } => {
            let in_range = raise_range.contains(hand_key) || call_range.contains(hand_key);
            let continuing = matches!(answer, Action::Raise | Action::Call);
            let (verdict, explanation) = if answer == *correct {
                (
                    Verdict::Primary,
                    format!("Correct! {} is a {} from {} vs {} open.", hand_key, correct, position, opener),
                )
            } else if continuing && in_range {
                (
                    Verdict::Acceptable,
                    format!(
                        "Acceptable. {} is primarily a {} from {} vs {} open, but {} is a reasonable alternative since it's in range.",
                        hand_key, correct, position, opener, answer
                    ),
                )
            } else {
                (
                    Verdict::Wrong,
                    format!("{} should be a {} from {} vs {} open.", hand_key, correct, position, opener),
                )
            };
            Grade {
                verdict,
                answer,
                explanation,
            }
        }
        Drill::Postflop {
            texture,
            bucket,
            strategy,
            correct,
            ..
        } => {
            let tex = texture.as_str().replace('_', " ");
            let best = correct.first().map_or("check", |a| a.label());
            let (verdict, explanation) = if correct.contains(&answer) {
                (
                    Verdict::Primary,
                    format!("Good play! With a {} hand on a {} board. Strategy: {}", bucket, tex, strategy),
                )
            } else if strategy.prob(answer) >= ACCEPTABLE_FREQUENCY {
                (
                    Verdict::Acceptable,
                    format!(
                        "Mixed spot. {} at {:.0}% frequency is reasonable, but {} is preferred. Strategy: {}",
                        answer.label(),
                        strategy.prob(answer) * 100.0,
                        best,
                        strategy
                    ),
                )
            } else {
                (
                    Verdict::Wrong,
                    format!(
                        "With a {} hand on a {} board, prefer {}. Strategy: {}",
                        bucket, tex, best, strategy
                    ),
                )
            };
            Grade {
                verdict,
                answer,
                explanation,
            }
        }
    }
}
