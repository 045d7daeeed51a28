//! Bayesian narrowing of one opponent's range over the 169 hand keys.
//!
//! Weights are relative likelihoods in [0, 1], rescaled so the heaviest key
//! sits at exactly 1.0 after every postflop update. They are not a
//! probability mass function.

use crate::bucket::classify_hand;
use crate::cards::{all_hand_keys, Card, NUM_HAND_KEYS};
use crate::engine::Engine;
use crate::preflop::{PreflopCharts, Position};
use crate::ranges::live_combos;
use crate::strategy::{Action, Role, StrategyTable, FACING_ACTIONS, FIRST_ACTIONS};
use crate::texture::classify_texture;

/// One observed action, handed to [`RangeEstimator::narrow`].
#[derive(Debug, Clone, PartialEq)]
pub enum Observation {
    Preflop {
        action: Action,
        /// Position of the player who opened the pot, if anyone had.
        opener: Option<Position>,
    },
    Postflop {
        action: Action,
        board: Vec<Card>,
        /// Cards known not to be in this player's hand besides the board.
        dead: Vec<Card>,
        role: Role,
        facing_bet: bool,
    },
}

/// How narrow a range currently is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeStats {
    pub significant: usize,
    pub percentage: f64,
}

/// Tunables for postflop narrowing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NarrowingParams {
    pub noise_weight: f64,
    pub probability_floor: f64,
}

impl Default for NarrowingParams {
    fn default() -> Self {
        NarrowingParams {
            noise_weight: 0.30,
            probability_floor: 0.001,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RangeEstimator {
    position: Position,
    keys: Vec<String>,
    weights: Vec<f64>,
}

impl RangeEstimator {
    /// Prior for `position`: 1.0 on its chart range, 0 elsewhere. A position
    /// without a chart starts with every key at full weight.
    pub fn new(position: Position, charts: &PreflopCharts) -> Self {
        let keys = all_hand_keys();
        let weights = match charts.opening_range(position) {
            Some(range) => keys.iter().map(|k| indicator(range.contains(k))).collect(),
            None => vec![1.0; keys.len()],
        };
        RangeEstimator {
            position,
            keys,
            weights,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn weight(&self, key: &str) -> f64 {
        self.keys
            .iter()
            .position(|k| k == key)
            .map(|i| self.weights[i])
            .unwrap_or(0.0)
    }

    /// (key, weight) pairs in grid order.
    pub fn weights(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.keys.iter().map(String::as_str).zip(self.weights.iter().copied())
    }

    /// Heaviest keys first; ties keep grid order.
    pub fn top_hands(&self, n: usize) -> Vec<(String, f64)> {
        let mut ranked: Vec<(String, f64)> = self
            .weights()
            .filter(|&(_, w)| w > 0.0)
            .map(|(k, w)| (k.to_string(), w))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(n);
        ranked
    }

    pub fn stats(&self, threshold: f64) -> RangeStats {
        let significant = self.weights.iter().filter(|&&w| w > threshold).count();
        RangeStats {
            significant,
            percentage: significant as f64 / NUM_HAND_KEYS as f64 * 100.0,
        }
    }

    /// Apply one observation using the engine's charts, strategies and
    /// narrowing parameters.
    pub fn narrow(&mut self, engine: &Engine, observation: &Observation) {
        match observation {
            Observation::Preflop { action, opener } => {
                self.narrow_preflop(&engine.charts, *action, *opener);
            }
            Observation::Postflop {
                action,
                board,
                dead,
                role,
                facing_bet,
            } => {
                let params = NarrowingParams {
                    noise_weight: engine.config.noise_weight,
                    probability_floor: engine.config.probability_floor,
                };
                self.narrow_postflop(&engine.strategy, params, *action, board, dead, *role, *facing_bet);
            }
        }
        log::debug!(
            "{} range after {:?}: {} keys significant",
            self.position,
            observation_action(observation),
            self.stats(engine.config.significance_threshold).significant
        );
    }

    pub fn narrow_preflop(&mut self, charts: &PreflopCharts, action: Action, opener: Option<Position>) {
        match (action, opener) {
            (Action::Fold, _) => self.weights.iter_mut().for_each(|w| *w = 0.0),
            (Action::Raise, None) => {
                if let Some(range) = charts.opening_range(self.position) {
                    self.set_indicator(|k| range.contains(k));
                }
            }
            (Action::Call | Action::Raise, Some(opener)) => {
                if let Some(table) = charts.facing(self.position, opener) {
                    let set = if action == Action::Raise { &table.raise } else { &table.call };
                    self.set_indicator(|k| set.contains(k));
                }
            }
            // Checks and limps carry no information.
            _ => {}
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn narrow_postflop(
        &mut self,
        strategy: &StrategyTable,
        params: NarrowingParams,
        action: Action,
        board: &[Card],
        dead: &[Card],
        role: Role,
        facing_bet: bool,
    ) {
        let texture = classify_texture(board);
        let alternatives = if facing_bet { FACING_ACTIONS.len() } else { FIRST_ACTIONS.len() };
        let uniform = 1.0 / alternatives as f64;

        let mut blocked: Vec<Card> = board.to_vec();
        blocked.extend_from_slice(dead);

        for (key, weight) in self.keys.iter().zip(self.weights.iter_mut()) {
            if *weight <= 0.0 {
                continue;
            }
            let combos = live_combos(key, &blocked).unwrap_or_default();
            if combos.is_empty() {
                *weight = 0.0;
                continue;
            }
            let total: f64 = combos
                .iter()
                .map(|&(c1, c2)| {
                    let bucket = classify_hand(&[c1, c2], board);
                    strategy.lookup(role, texture, bucket, facing_bet).prob(action)
                })
                .sum();
            let avg = total / combos.len() as f64;
            let effective = (1.0 - params.noise_weight) * avg + params.noise_weight * uniform;
            *weight *= effective.max(params.probability_floor);
        }

        self.rescale();
    }

    fn set_indicator<F: Fn(&str) -> bool>(&mut self, in_range: F) {
        for (key, weight) in self.keys.iter().zip(self.weights.iter_mut()) {
            *weight = indicator(in_range(key));
        }
    }

    fn rescale(&mut self) {
        let max = self.weights.iter().copied().fold(0.0, f64::max);
        if max > 0.0 {
            self.weights.iter_mut().for_each(|w| *w /= max);
        }
    }
}

fn indicator(hit: bool) -> f64 {
    if hit {
        1.0
    } else {
        0.0
    }
}

fn observation_action(observation: &Observation) -> Action {
    match observation {
        Observation::Preflop { action, .. } | Observation::Postflop { action, .. } => *action,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_board;

    #[test]
    fn fully_blocked_key_drops_to_zero() {
        let charts = PreflopCharts::embedded().unwrap();
        let mut est = RangeEstimator::new(Position::Btn, &charts);
        let board = parse_board("AsAhKd").unwrap();
        let dead = parse_board("AdAc").unwrap();
        est.narrow_postflop(
            &StrategyTable::with_defaults(),
            NarrowingParams::default(),
            Action::Check,
            &board,
            &dead,
            Role::Ip,
            false,
        );
        assert_eq!(est.weight("AA"), 0.0);
        assert!(est.weight("KQs") > 0.0);
    }
}
