//! Betting state machine for one hand at a 2-6 handed table.
//!
//! The machine trusts its caller: it never rejects an action. Offer only
//! what [`HandState::legal_actions`] returns, otherwise pot accounting is
//! undefined.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use rand::Rng;

use crate::cards::{hand_key, Card, Deck};
use crate::config::TrainerConfig;
use crate::error::{GtoError, GtoResult};
use crate::hand_evaluator::{evaluate_hand, winners, HandResult};
use crate::multiway::{blind_seats, clockwise_from, postflop_order, preflop_order, seat_positions};
use crate::preflop::Position;
use crate::strategy::{Action, Role};

const EPS: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Streets and sizing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
}

impl Street {
    pub fn next(self) -> Option<Street> {
        match self {
            Street::Preflop => Some(Street::Flop),
            Street::Flop => Some(Street::Turn),
            Street::Turn => Some(Street::River),
            Street::River => None,
        }
    }

    /// Board cards visible on this street.
    pub fn board_cards(self) -> usize {
        match self {
            Street::Preflop => 0,
            Street::Flop => 3,
            Street::Turn => 4,
            Street::River => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Street::Preflop => "preflop",
            Street::Flop => "flop",
            Street::Turn => "turn",
            Street::River => "river",
        }
    }
}

impl fmt::Display for Street {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Blinds and bet sizes, all in big blinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetSizing {
    pub small_blind: f64,
    pub big_blind: f64,
    pub open_raise: f64,
    pub three_bet: f64,
    pub raise_multiplier: f64,
    /// Pot fractions for bet_s, bet_m and bet_l.
    pub bet_fractions: [f64; 3],
}

impl From<&TrainerConfig> for BetSizing {
    fn from(config: &TrainerConfig) -> Self {
        BetSizing {
            small_blind: config.small_blind,
            big_blind: config.big_blind,
            open_raise: config.open_raise,
            three_bet: config.three_bet,
            raise_multiplier: config.raise_multiplier,
            bet_fractions: [config.bet_small, config.bet_medium, config.bet_large],
        }
    }
}

impl Default for BetSizing {
    fn default() -> Self {
        BetSizing::from(&TrainerConfig::default())
    }
}

impl BetSizing {
    pub fn bet_fraction(&self, action: Action) -> Option<f64> {
        match action {
            Action::BetSmall => Some(self.bet_fractions[0]),
            Action::BetMedium => Some(self.bet_fractions[1]),
            Action::BetLarge => Some(self.bet_fractions[2]),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Players and records
// ---------------------------------------------------------------------------

/// What a seat brings to a new hand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Seat {
    pub hole: [Card; 2],
    pub stack: f64,
    pub is_hero: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub position: Position,
    pub hole: [Card; 2],
    pub stack: f64,
    pub street_invested: f64,
    pub total_invested: f64,
    pub folded: bool,
    pub is_hero: bool,
}

impl Player {
    pub fn hand_key(&self) -> String {
        hand_key(self.hole[0], self.hole[1])
    }

    pub fn is_all_in(&self) -> bool {
        self.stack <= EPS
    }

    /// Still in the hand with chips behind.
    pub fn can_act(&self) -> bool {
        !self.folded && !self.is_all_in()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActionRecord {
    pub seat: usize,
    pub position: Position,
    pub street: Street,
    pub action: Action,
    /// Chips put in by this action.
    pub amount: f64,
}

/// How the pot was paid out.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub pot: f64,
    /// Chips awarded per seat.
    pub payouts: Vec<f64>,
    /// Award minus everything invested, per seat.
    pub net: Vec<f64>,
    pub winners: Vec<usize>,
    pub showdown: bool,
}

impl Settlement {
    /// Fraction of the pot awarded to `seat`.
    pub fn share(&self, seat: usize) -> f64 {
        if self.pot <= EPS {
            return 0.0;
        }
        self.payouts.get(seat).copied().unwrap_or(0.0) / self.pot
    }
}

// ---------------------------------------------------------------------------
// HandState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct HandState {
    pub players: Vec<Player>,
    pub dealer: usize,
    pub street: Street,
    pub pot: f64,
    pub current_bet: f64,
    pub last_aggressor: Option<usize>,
    /// First preflop raiser.
    pub opener: Option<usize>,
    pub hand_over: bool,
    pub settlement: Option<Settlement>,
    pub log: Vec<ActionRecord>,
    board: Vec<Card>,
    queue: VecDeque<usize>,
    preflop_raises: u32,
    sizing: BetSizing,
}

impl HandState {
    /// Seat the players, post blinds and build the preflop queue. `board`
    /// holds all five community cards up front; streets only reveal them.
    pub fn new(seats: Vec<Seat>, board: Vec<Card>, dealer: usize, sizing: BetSizing) -> GtoResult<Self> {
        let n = seats.len();
        let positions = seat_positions(n, dealer)?;
        if board.len() != 5 {
            return Err(GtoError::NotEnoughCards {
                need: 5,
                got: board.len(),
            });
        }
        let mut seen = BTreeSet::new();
        for card in seats.iter().flat_map(|s| s.hole.iter()).chain(board.iter()) {
            if !seen.insert(*card) {
                return Err(GtoError::DuplicateCard(card.to_string()));
            }
        }

        let dealer = dealer % n;
        let players = seats
            .into_iter()
            .zip(positions)
            .map(|(seat, position)| Player {
                position,
                hole: seat.hole,
                stack: seat.stack,
                street_invested: 0.0,
                total_invested: 0.0,
                folded: false,
                is_hero: seat.is_hero,
            })
            .collect();

        let mut state = HandState {
            players,
            dealer,
            street: Street::Preflop,
            pot: 0.0,
            current_bet: 0.0,
            last_aggressor: None,
            opener: None,
            hand_over: false,
            settlement: None,
            log: Vec::new(),
            board,
            queue: VecDeque::new(),
            preflop_raises: 0,
            sizing,
        };

        let (sb, bb) = blind_seats(n, dealer)?;
        state.put_in(sb, sizing.small_blind);
        state.put_in(bb, sizing.big_blind);
        state.current_bet = sizing.big_blind;

        let folded = state.folded_flags();
        state.queue = preflop_order(&folded, dealer)?
            .into_iter()
            .filter(|&s| state.players[s].can_act())
            .collect();
        if state.queue.is_empty() {
            state.end_street();
        }
        Ok(state)
    }

    /// Shuffle a fresh deck and deal `stacks.len()` players plus the board.
    pub fn deal<R: Rng + ?Sized>(
        stacks: &[f64],
        hero: Option<usize>,
        dealer: usize,
        sizing: BetSizing,
        rng: &mut R,
    ) -> GtoResult<Self> {
        let mut deck = Deck::new(None);
        deck.shuffle_with(rng);
        let mut seats = Vec::with_capacity(stacks.len());
        for (i, &stack) in stacks.iter().enumerate() {
            seats.push(Seat {
                hole: deck.deal_pair()?,
                stack,
                is_hero: hero == Some(i),
            });
        }
        let board = deck.deal(5)?;
        Self::new(seats, board, dealer, sizing)
    }

    // -- queries -------------------------------------------------------------

    pub fn num_players(&self) -> usize {
        self.players.len()
    }

    pub fn sizing(&self) -> &BetSizing {
        &self.sizing
    }

    /// Seat whose turn it is, if the hand is still running.
    pub fn to_act(&self) -> Option<usize> {
        if self.hand_over {
            return None;
        }
        self.queue.front().copied()
    }

    /// Seats still to act this street, in order.
    pub fn pending(&self) -> Vec<usize> {
        self.queue.iter().copied().collect()
    }

    pub fn visible_board(&self) -> &[Card] {
        &self.board[..self.street.board_cards()]
    }

    pub fn full_board(&self) -> &[Card] {
        &self.board
    }

    pub fn owed(&self, seat: usize) -> f64 {
        (self.current_bet - self.players[seat].street_invested).max(0.0)
    }

    pub fn facing_bet(&self, seat: usize) -> bool {
        self.owed(seat) > EPS
    }

    pub fn active_seats(&self) -> Vec<usize> {
        (0..self.players.len()).filter(|&s| !self.players[s].folded).collect()
    }

    pub fn folded_flags(&self) -> Vec<bool> {
        self.players.iter().map(|p| p.folded).collect()
    }

    pub fn hero_seat(&self) -> Option<usize> {
        self.players.iter().position(|p| p.is_hero)
    }

    /// IP when `seat` acts last among the players still in the hand.
    pub fn role_of(&self, seat: usize) -> Role {
        match postflop_order(&self.folded_flags(), self.dealer).last() {
            Some(&last) if last == seat => Role::Ip,
            _ => Role::Oop,
        }
    }

    /// Actions that keep the pot consistent for the player to act.
    pub fn legal_actions(&self) -> Vec<Action> {
        let Some(seat) = self.to_act() else {
            return Vec::new();
        };
        let owed = self.owed(seat);
        if owed > EPS {
            let mut actions = vec![Action::Fold, Action::Call];
            if self.players[seat].stack > owed + EPS {
                actions.push(Action::Raise);
            }
            actions
        } else if self.street == Street::Preflop {
            vec![Action::Check, Action::Raise]
        } else {
            vec![Action::Check, Action::BetSmall, Action::BetMedium, Action::BetLarge]
        }
    }

    /// Raises made so far preflop.
    pub fn preflop_raises(&self) -> u32 {
        self.preflop_raises
    }

    /// Street total a raise would make right now.
    pub fn raise_target(&self) -> f64 {
        let s = &self.sizing;
        if self.street == Street::Preflop {
            match self.preflop_raises {
                0 => s.open_raise * s.big_blind,
                1 => s.three_bet * s.big_blind,
                _ => self.current_bet * s.raise_multiplier,
            }
        } else {
            (self.current_bet * s.raise_multiplier).max(s.big_blind)
        }
    }

    // -- transitions ---------------------------------------------------------

    /// Apply `action` for the player at the front of the queue and return
    /// the chips it put in. A finished hand ignores further actions.
    pub fn apply(&mut self, action: Action) -> f64 {
        if self.hand_over {
            return 0.0;
        }
        let Some(seat) = self.queue.pop_front() else {
            return 0.0;
        };

        let amount = match action {
            Action::Fold => {
                self.players[seat].folded = true;
                0.0
            }
            Action::Check => 0.0,
            Action::Call => {
                let owed = self.owed(seat);
                self.put_in(seat, owed)
            }
            Action::BetSmall | Action::BetMedium | Action::BetLarge => {
                let fraction = self.sizing.bet_fraction(action).unwrap_or(0.0);
                let put = self.put_in(seat, self.pot * fraction);
                self.reopen(seat);
                put
            }
            Action::Raise => {
                let target = self.raise_target();
                let put = self.put_in(seat, target - self.players[seat].street_invested);
                if self.street == Street::Preflop {
                    self.preflop_raises += 1;
                    self.opener.get_or_insert(seat);
                }
                self.reopen(seat);
                put
            }
        };

        self.log.push(ActionRecord {
            seat,
            position: self.players[seat].position,
            street: self.street,
            action,
            amount,
        });
        log::trace!(
            "{} {} {} {:.2} (pot {:.2})",
            self.street,
            self.players[seat].position,
            action,
            amount,
            self.pot
        );

        if self.active_seats().len() == 1 {
            self.fold_out();
        } else if self.queue.is_empty() {
            self.end_street();
        }
        amount
    }

    fn put_in(&mut self, seat: usize, amount: f64) -> f64 {
        let player = &mut self.players[seat];
        let amount = amount.max(0.0).min(player.stack);
        player.stack -= amount;
        player.street_invested += amount;
        player.total_invested += amount;
        self.pot += amount;
        if player.street_invested > self.current_bet {
            self.current_bet = player.street_invested;
        }
        amount
    }

    /// Everyone else still able to act gets to respond, clockwise from the
    /// aggressor.
    fn reopen(&mut self, aggressor: usize) {
        self.last_aggressor = Some(aggressor);
        let n = self.players.len();
        self.queue = clockwise_from(n, aggressor)
            .filter(|&s| s != aggressor && self.players[s].can_act())
            .collect();
    }

    fn end_street(&mut self) {
        for p in &mut self.players {
            p.street_invested = 0.0;
        }
        self.current_bet = 0.0;
        self.last_aggressor = None;

        let Some(next) = self.street.next() else {
            self.showdown();
            return;
        };
        self.street = next;

        let can_act = self.players.iter().filter(|p| p.can_act()).count();
        if can_act < 2 {
            log::debug!("fewer than two players can bet, running out the board");
            self.street = Street::River;
            self.showdown();
            return;
        }
        self.queue = postflop_order(&self.folded_flags(), self.dealer)
            .into_iter()
            .filter(|&s| self.players[s].can_act())
            .collect();
        log::debug!("{} dealt, pot {:.2}, {} to act", self.street, self.pot, self.queue.len());
    }

    fn fold_out(&mut self) {
        let n = self.players.len();
        let mut payouts = vec![0.0; n];
        let winners = self.active_seats();
        if let Some(&winner) = winners.first() {
            payouts[winner] = self.pot;
            self.players[winner].stack += self.pot;
            log::debug!("{} wins {:.2} uncontested", self.players[winner].position, self.pot);
        }
        self.finish(payouts, winners, false);
    }

    /// Pay each contribution layer to the best hand eligible for it, so an
    /// all-in player only wins what they matched.
    fn showdown(&mut self) {
        let contenders = self.active_seats();
        let results: Vec<(usize, HandResult)> = contenders
            .iter()
            .filter_map(|&s| evaluate_hand(&self.players[s].hole, &self.board).ok().map(|r| (s, r)))
            .collect();

        let mut levels: Vec<f64> = contenders.iter().map(|&s| self.players[s].total_invested).collect();
        levels.sort_by(f64::total_cmp);
        levels.dedup_by(|a, b| (*a - *b).abs() < EPS);

        let n = self.players.len();
        let mut payouts = vec![0.0; n];
        let mut all_winners = BTreeSet::new();
        let mut top_winners: Vec<usize> = Vec::new();
        let mut prev = 0.0;
        for level in levels {
            let layer: f64 = self
                .players
                .iter()
                .map(|p| p.total_invested.min(level) - p.total_invested.min(prev))
                .sum();
            prev = level;
            if layer <= EPS {
                continue;
            }
            let eligible: Vec<&(usize, HandResult)> = results
                .iter()
                .filter(|(s, _)| self.players[*s].total_invested + EPS >= level)
                .collect();
            let hands: Vec<HandResult> = eligible.iter().map(|(_, r)| r.clone()).collect();
            let layer_winners: Vec<usize> = winners(&hands).into_iter().map(|i| eligible[i].0).collect();
            if layer_winners.is_empty() {
                continue;
            }
            let share = layer / layer_winners.len() as f64;
            for &w in &layer_winners {
                payouts[w] += share;
                all_winners.insert(w);
            }
            top_winners = layer_winners;
        }

        // Chips folded players put in above the deepest contender.
        let leftover = self.pot - payouts.iter().sum::<f64>();
        if leftover > EPS && !top_winners.is_empty() {
            let share = leftover / top_winners.len() as f64;
            for &w in &top_winners {
                payouts[w] += share;
            }
        }

        for (player, &won) in self.players.iter_mut().zip(&payouts) {
            player.stack += won;
        }
        let winners: Vec<usize> = all_winners.into_iter().collect();
        log::debug!("showdown, pot {:.2}, winners {:?}", self.pot, winners);
        self.finish(payouts, winners, true);
    }

    fn finish(&mut self, payouts: Vec<f64>, winners: Vec<usize>, showdown: bool) {
        let net = self
            .players
            .iter()
            .zip(&payouts)
            .map(|(p, won)| won - p.total_invested)
            .collect();
        self.settlement = Some(Settlement {
            pot: self.pot,
            payouts,
            net,
            winners,
            showdown,
        });
        self.queue.clear();
        self.hand_over = true;
    }
}
