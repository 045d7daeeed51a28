//! End-of-session summary over the hand log.

use std::cmp::Ordering;

use crate::preflop::Position;
use crate::strategy::Action;
use crate::table::Street;

/// Decisions deviating more than this count as mistakes.
pub const MISTAKE_THRESHOLD: f64 = 0.3;
pub const TOP_MISTAKES: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRecord {
    pub street: Street,
    pub action: Action,
    pub gto_action: Action,
    pub deviation: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HandRecord {
    pub hand_number: u32,
    pub hero_key: String,
    pub hero_position: Position,
    pub result_bb: f64,
    pub actions: Vec<DecisionRecord>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mistake {
    pub hand_number: u32,
    pub hero_key: String,
    pub street: Street,
    pub action: Action,
    pub gto_action: Action,
    pub deviation: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionReview {
    pub total_pl: f64,
    pub hands_played: usize,
    pub bb_per_hand: f64,
    pub biggest_win: f64,
    pub biggest_loss: f64,
    pub top_mistakes: Vec<Mistake>,
}

pub fn compute_session_review(log: &[HandRecord]) -> SessionReview {
    if log.is_empty() {
        return SessionReview::default();
    }

    let total_pl: f64 = log.iter().map(|h| h.result_bb).sum();
    let hands_played = log.len();
    let biggest_win = log.iter().map(|h| h.result_bb).fold(f64::NEG_INFINITY, f64::max);
    let biggest_loss = log.iter().map(|h| h.result_bb).fold(f64::INFINITY, f64::min);

    let mut mistakes: Vec<Mistake> = log
        .iter()
        .flat_map(|hand| {
            hand.actions
                .iter()
                .filter(|d| d.deviation > MISTAKE_THRESHOLD)
                .map(move |d| Mistake {
                    hand_number: hand.hand_number,
                    hero_key: hand.hero_key.clone(),
                    street: d.street,
                    action: d.action,
                    gto_action: d.gto_action,
                    deviation: d.deviation,
                })
        })
        .collect();
    // Stable sort keeps earlier hands first among equal deviations.
    mistakes.sort_by(|a, b| b.deviation.partial_cmp(&a.deviation).unwrap_or(Ordering::Equal));
    mistakes.truncate(TOP_MISTAKES);

    SessionReview {
        total_pl,
        hands_played,
        bb_per_hand: total_pl / hands_played as f64,
        biggest_win,
        biggest_loss,
        top_mistakes: mistakes,
    }
}
