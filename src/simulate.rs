//! Simulated play: dealing training hands, the opponent policy, scoring
//! hero decisions against the reference strategy, and the session loop.

use std::sync::Arc;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::bucket::classify_spot;
use crate::engine::Engine;
use crate::multiway::check_count;
use crate::error::GtoResult;
use crate::preflop::Position;
use crate::range_estimator::{Observation, RangeEstimator};
use crate::review::{compute_session_review, DecisionRecord, HandRecord, SessionReview};
use crate::strategy::{Action, ActionDistribution};
use crate::table::{BetSizing, HandState, Street};

// ---------------------------------------------------------------------------
// Dealing
// ---------------------------------------------------------------------------

/// A heads-up hand: hero in seat 0, villain in seat 1.
#[derive(Debug, Clone)]
pub struct SimHand {
    pub hand_number: u32,
    pub hero: usize,
    pub villain: usize,
    pub state: HandState,
}

impl SimHand {
    pub fn deal<R: Rng + ?Sized>(
        sizing: BetSizing,
        hero_stack: f64,
        villain_stack: f64,
        hand_number: u32,
        hero_is_sb: bool,
        rng: &mut R,
    ) -> GtoResult<Self> {
        let dealer = if hero_is_sb { 0 } else { 1 };
        let state = HandState::deal(&[hero_stack, villain_stack], Some(0), dealer, sizing, rng)?;
        Ok(SimHand {
            hand_number,
            hero: 0,
            villain: 1,
            state,
        })
    }

    pub fn hero_position(&self) -> Position {
        self.state.players[self.hero].position
    }
}

/// Deal a standard heads-up training hand with blinds posted.
pub fn generate_sim_hand<R: Rng + ?Sized>(
    hero_stack: f64,
    villain_stack: f64,
    hand_number: u32,
    hero_is_sb: bool,
    rng: &mut R,
) -> GtoResult<SimHand> {
    SimHand::deal(BetSizing::default(), hero_stack, villain_stack, hand_number, hero_is_sb, rng)
}

// ---------------------------------------------------------------------------
// Reference strategy
// ---------------------------------------------------------------------------

/// Position of the preflop opener, as seen by `seat`.
fn opener_position(state: &HandState, seat: usize) -> Option<Position> {
    state
        .opener
        .filter(|&o| o != seat)
        .map(|o| state.players[o].position)
}

/// The reference answer for `seat` in the current spot, with the mixed
/// strategy it came from when the spot is postflop.
pub fn gto_reference(engine: &Engine, state: &HandState, seat: usize) -> (Action, Option<ActionDistribution>) {
    let player = &state.players[seat];
    if state.street == Street::Preflop {
        if !state.facing_bet(seat) {
            return (Action::Check, None);
        }
        let key = player.hand_key();
        let chart = if state.opener == Some(seat) {
            let reraiser = state
                .last_aggressor
                .map(|s| state.players[s].position)
                .unwrap_or(player.position);
            engine.charts.versus_reraise(player.position, &key, reraiser)
        } else {
            engine
                .charts
                .preflop_action(player.position, &key, opener_position(state, seat))
        };
        // Beyond a 3-bet the charts only continue by calling.
        let chart = if chart == Action::Raise && state.preflop_raises() >= 2 {
            Action::Call
        } else {
            chart
        };
        return (chart, None);
    }

    let spot = classify_spot(&player.hole, state.visible_board());
    let facing = state.facing_bet(seat);
    let dist = engine
        .strategy
        .lookup(state.role_of(seat), spot.texture, spot.bucket, facing);
    let best = dist
        .correct_actions()
        .first()
        .copied()
        .unwrap_or(if facing { Action::Fold } else { Action::Check });
    (best, Some(dist))
}

/// 0 for the reference action, otherwise how far the chosen action's
/// frequency falls short of the most frequent one. 1 without a strategy.
pub fn compute_deviation(hero: Action, gto: Action, strategy: Option<&ActionDistribution>) -> f64 {
    if hero == gto {
        return 0.0;
    }
    match strategy {
        Some(dist) if dist.max_prob() > 0.0 => 1.0 - dist.prob(hero) / dist.max_prob(),
        _ => 1.0,
    }
}

// ---------------------------------------------------------------------------
// Opponent policy
// ---------------------------------------------------------------------------

/// Closest legal stand-in for `wanted`.
pub fn map_to_legal(wanted: Action, legal: &[Action]) -> Action {
    let preferences: &[Action] = match wanted {
        Action::Fold => &[Action::Fold, Action::Check],
        Action::Check => &[Action::Check, Action::Fold],
        Action::Call => &[Action::Call, Action::Check],
        Action::Raise => &[Action::Raise, Action::BetMedium, Action::Call, Action::Check],
        Action::BetSmall | Action::BetMedium | Action::BetLarge => {
            &[wanted, Action::Raise, Action::Call, Action::Check]
        }
    };
    preferences
        .iter()
        .copied()
        .find(|a| legal.contains(a))
        .or_else(|| legal.first().copied())
        .unwrap_or(Action::Check)
}

/// Imperfect opponent: a uniformly random legal action with probability
/// `villain_noise`, otherwise the chart (preflop) or a draw from the
/// strategy table (postflop).
pub fn villain_action<R: Rng + ?Sized>(engine: &Engine, state: &HandState, seat: usize, rng: &mut R) -> Action {
    let legal = state.legal_actions();
    if legal.is_empty() {
        return Action::Check;
    }
    if rng.gen::<f64>() < engine.config.villain_noise {
        return legal.choose(rng).copied().unwrap_or(Action::Check);
    }

    let wanted = if state.street == Street::Preflop {
        gto_reference(engine, state, seat).0
    } else {
        let player = &state.players[seat];
        let spot = classify_spot(&player.hole, state.visible_board());
        let facing = state.facing_bet(seat);
        let dist = engine
            .strategy
            .lookup(state.role_of(seat), spot.texture, spot.bucket, facing)
            .restricted_to(&legal);
        dist.sample(rng)
            .unwrap_or(if facing { Action::Fold } else { Action::Check })
    };
    map_to_legal(wanted, &legal)
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// What the hero sees when it is their turn.
#[derive(Debug, Clone)]
pub struct HeroView<'a> {
    pub state: &'a HandState,
    pub seat: usize,
    pub legal: Vec<Action>,
    pub gto_action: Action,
    pub strategy: Option<ActionDistribution>,
}

/// Multi-hand training session. Owns the RNG, the log, and one range
/// estimate per opponent for the hand in progress.
pub struct Session<R: Rng> {
    engine: Arc<Engine>,
    rng: R,
    num_players: usize,
    hand_number: u32,
    log: Vec<HandRecord>,
    ranges: Vec<(usize, RangeEstimator)>,
}

impl<R: Rng> Session<R> {
    pub fn new(engine: Arc<Engine>, rng: R, num_players: usize) -> GtoResult<Self> {
        check_count(num_players)?;
        Ok(Session {
            engine,
            rng,
            num_players,
            hand_number: 0,
            log: Vec::new(),
            ranges: Vec::new(),
        })
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn log(&self) -> &[HandRecord] {
        &self.log
    }

    /// Range estimates for the opponents of the most recent hand.
    pub fn ranges(&self) -> &[(usize, RangeEstimator)] {
        &self.ranges
    }

    pub fn review(&self) -> SessionReview {
        compute_session_review(&self.log)
    }

    /// Play one hand to completion. The button rotates every hand and all
    /// stacks start at `starting_stack`.
    pub fn play_hand<F>(&mut self, hero_policy: &mut F) -> GtoResult<HandRecord>
    where
        F: FnMut(&HeroView<'_>) -> Action,
    {
        self.hand_number += 1;
        let n = self.num_players;
        let hero = 0;
        let dealer = (self.hand_number as usize - 1) % n;
        let stacks = vec![self.engine.config.starting_stack; n];
        let sizing = BetSizing::from(&self.engine.config);
        let mut state = HandState::deal(&stacks, Some(hero), dealer, sizing, &mut self.rng)?;

        self.ranges = (0..n)
            .filter(|&s| s != hero)
            .map(|s| (s, RangeEstimator::new(state.players[s].position, &self.engine.charts)))
            .collect();

        let mut decisions = Vec::new();
        while let Some(seat) = state.to_act() {
            if seat == hero {
                let (gto_action, strategy) = gto_reference(&self.engine, &state, seat);
                let view = HeroView {
                    state: &state,
                    seat,
                    legal: state.legal_actions(),
                    gto_action,
                    strategy: strategy.clone(),
                };
                let action = hero_policy(&view);
                decisions.push(DecisionRecord {
                    street: state.street,
                    action,
                    gto_action,
                    deviation: compute_deviation(action, gto_action, strategy.as_ref()),
                });
                state.apply(action);
            } else {
                let action = villain_action(&self.engine, &state, seat, &mut self.rng);
                let observation = self.observe(&state, seat, hero, action);
                state.apply(action);
                if let Some((_, est)) = self.ranges.iter_mut().find(|(s, _)| *s == seat) {
                    est.narrow(&self.engine, &observation);
                }
            }
        }

        let result_bb = state
            .settlement
            .as_ref()
            .and_then(|s| s.net.get(hero).copied())
            .unwrap_or(0.0)
            / self.engine.config.big_blind;
        let record = HandRecord {
            hand_number: self.hand_number,
            hero_key: state.players[hero].hand_key(),
            hero_position: state.players[hero].position,
            result_bb,
            actions: decisions,
        };
        log::info!(
            "hand {} {} {}: {:+.2} bb",
            record.hand_number,
            record.hero_position,
            record.hero_key,
            record.result_bb
        );
        self.log.push(record.clone());
        Ok(record)
    }

    /// What the hero learns from `seat` taking `action`, captured before the
    /// action changes the state.
    fn observe(&self, state: &HandState, seat: usize, hero: usize, action: Action) -> Observation {
        if state.street == Street::Preflop {
            return Observation::Preflop {
                action,
                opener: opener_position(state, seat),
            };
        }
        Observation::Postflop {
            action,
            board: state.visible_board().to_vec(),
            dead: state.players[hero].hole.to_vec(),
            role: state.role_of(seat),
            facing_bet: state.facing_bet(seat),
        }
    }
}

/// Hero policy that always plays the reference action.
pub fn autopilot(view: &HeroView<'_>) -> Action {
    map_to_legal(view.gto_action, &view.legal)
}
