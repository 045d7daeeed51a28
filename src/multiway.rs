//! Seating for 2-6 handed tables: position labels, blinds and turn order.
//!
//! Seats are numbered clockwise from 0. The dealer button rotates over
//! seat indices; labels are derived from the distance to the button.

use crate::error::{GtoError, GtoResult};
use crate::preflop::Position;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;

const EARLY_SEATS: [Position; 3] = [Position::Utg, Position::Mp, Position::Co];

/// Error unless `n` is a supported table size.
pub fn check_count(n: usize) -> GtoResult<()> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&n) {
        return Err(GtoError::InvalidPlayerCount(n));
    }
    Ok(())
}

/// Position label for every seat. Heads-up the dealer posts the small
/// blind; otherwise the two seats after the button post the blinds and the
/// remaining seats take the latest of UTG/MP/CO.
pub fn seat_positions(n: usize, dealer: usize) -> GtoResult<Vec<Position>> {
    check_count(n)?;
    let dealer = dealer % n;
    let mut labels = vec![Position::Btn; n];
    if n == 2 {
        labels[dealer] = Position::Sb;
        labels[(dealer + 1) % n] = Position::Bb;
        return Ok(labels);
    }
    labels[(dealer + 1) % n] = Position::Sb;
    labels[(dealer + 2) % n] = Position::Bb;
    let early = &EARLY_SEATS[EARLY_SEATS.len() - (n - 3)..];
    for (offset, &pos) in early.iter().enumerate() {
        labels[(dealer + 3 + offset) % n] = pos;
    }
    Ok(labels)
}

/// (small blind seat, big blind seat).
pub fn blind_seats(n: usize, dealer: usize) -> GtoResult<(usize, usize)> {
    check_count(n)?;
    let dealer = dealer % n;
    if n == 2 {
        Ok((dealer, (dealer + 1) % n))
    } else {
        Ok(((dealer + 1) % n, (dealer + 2) % n))
    }
}

/// Seats clockwise starting after `after`, ending on `after` itself.
pub fn clockwise_from(n: usize, after: usize) -> impl Iterator<Item = usize> {
    (1..=n).map(move |step| (after + step) % n)
}

/// Preflop order: first seat after the big blind round to the big blind.
pub fn preflop_order(folded: &[bool], dealer: usize) -> GtoResult<Vec<usize>> {
    let n = folded.len();
    let (_, bb) = blind_seats(n, dealer)?;
    Ok(clockwise_from(n, bb).filter(|&s| !folded[s]).collect())
}

/// Postflop order: first active seat after the dealer, ending on the
/// button (or the closest active seat before it).
pub fn postflop_order(folded: &[bool], dealer: usize) -> Vec<usize> {
    let n = folded.len();
    if n == 0 {
        return Vec::new();
    }
    clockwise_from(n, dealer % n).filter(|&s| !folded[s]).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_handed_labels() {
        let labels = seat_positions(4, 0).unwrap();
        assert_eq!(labels, vec![Position::Btn, Position::Sb, Position::Bb, Position::Co]);
    }

    #[test]
    fn heads_up_dealer_is_small_blind() {
        assert_eq!(blind_seats(2, 1).unwrap(), (1, 0));
        assert_eq!(seat_positions(2, 1).unwrap(), vec![Position::Bb, Position::Sb]);
    }
}
