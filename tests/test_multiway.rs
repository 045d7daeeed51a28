use gto_trainer::multiway::*;
use gto_trainer::preflop::Position;

#[test]
fn test_six_handed_labels() {
    use Position::*;
    assert_eq!(seat_positions(6, 0).unwrap(), vec![Btn, Sb, Bb, Utg, Mp, Co]);
    assert_eq!(seat_positions(6, 3).unwrap(), vec![Utg, Mp, Co, Btn, Sb, Bb]);
}

#[test]
fn test_short_tables_drop_early_seats() {
    use Position::*;
    assert_eq!(seat_positions(5, 0).unwrap(), vec![Btn, Sb, Bb, Mp, Co]);
    assert_eq!(seat_positions(3, 2).unwrap(), vec![Sb, Bb, Btn]);
}

#[test]
fn test_every_table_size_has_one_of_each_blind() {
    for n in MIN_PLAYERS..=MAX_PLAYERS {
        for dealer in 0..n {
            let labels = seat_positions(n, dealer).unwrap();
            assert_eq!(labels.iter().filter(|&&p| p == Position::Sb).count(), 1);
            assert_eq!(labels.iter().filter(|&&p| p == Position::Bb).count(), 1);
            let (sb, bb) = blind_seats(n, dealer).unwrap();
            assert_eq!(labels[sb], Position::Sb);
            assert_eq!(labels[bb], Position::Bb);
        }
    }
}

#[test]
fn test_bad_player_counts() {
    assert!(seat_positions(1, 0).is_err());
    assert!(seat_positions(7, 0).is_err());
    assert!(blind_seats(0, 0).is_err());
}

#[test]
fn test_preflop_order_ends_on_big_blind() {
    assert_eq!(preflop_order(&[false; 4], 0).unwrap(), vec![3, 0, 1, 2]);
    // Heads-up the dealer is the small blind and acts first.
    assert_eq!(preflop_order(&[false; 2], 1).unwrap(), vec![1, 0]);
}

#[test]
fn test_postflop_order_skips_folded() {
    assert_eq!(postflop_order(&[false; 4], 1), vec![2, 3, 0, 1]);
    assert_eq!(postflop_order(&[false, false, true, false], 1), vec![3, 0, 1]);
    assert_eq!(postflop_order(&[false, true, false, false], 1), vec![2, 3, 0]);
    assert!(postflop_order(&[], 0).is_empty());
}

#[test]
fn test_clockwise_wraps() {
    assert_eq!(clockwise_from(4, 2).collect::<Vec<_>>(), vec![3, 0, 1, 2]);
}
