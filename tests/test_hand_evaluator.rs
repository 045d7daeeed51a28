use gto_trainer::cards::*;
use gto_trainer::hand_evaluator::*;

fn c(notation: &str) -> Card {
    parse_card(notation).unwrap()
}

#[test]
fn test_royal_flush() {
    let hole = vec![c("As"), c("Ks")];
    let board = parse_board("QsTsJs2h3d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::RoyalFlush);
    assert_eq!(result.rank, 9);
}

#[test]
fn test_straight_flush() {
    let hole = vec![c("9h"), c("8h")];
    let board = parse_board("7h6h5hAcKd").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::StraightFlush);
}

#[test]
fn test_four_of_a_kind() {
    let hole = vec![c("Ks"), c("Kh")];
    let board = parse_board("KdKc5s2h3d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::FourOfAKind);
}

#[test]
fn test_full_house() {
    let hole = vec![c("As"), c("Ah")];
    let board = parse_board("AdKsKh2c3d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::FullHouse);
    assert_eq!(result.kickers, vec![14, 13]);
}

#[test]
fn test_flush() {
    let hole = vec![c("As"), c("Ts")];
    let board = parse_board("8s5s2sKdQh").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::Flush);
}

#[test]
fn test_straight() {
    let hole = vec![c("9s"), c("8h")];
    let board = parse_board("7d6c5sAhKd").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::Straight);
    assert_eq!(result.kickers, vec![9]);
}

#[test]
fn test_wheel() {
    let hole = vec![c("As"), c("2h")];
    let board = parse_board("3d4c5sKhQd").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::Straight);
    assert_eq!(result.kickers, vec![5]);
}

#[test]
fn test_three_of_a_kind() {
    let hole = vec![c("Qs"), c("Qh")];
    let board = parse_board("Qd7s3h2cKd").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::ThreeOfAKind);
}

#[test]
fn test_two_pair() {
    let hole = vec![c("As"), c("Kh")];
    let board = parse_board("AdKs5c2h3d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::TwoPair);
    assert_eq!(result.kickers, vec![14, 13, 5]);
}

#[test]
fn test_one_pair() {
    let hole = vec![c("As"), c("Ah")];
    let board = parse_board("Kd7s3c2h5d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::OnePair);
    assert_eq!(result.kickers, vec![14, 13, 7, 5]);
}

#[test]
fn test_high_card() {
    let hole = vec![c("As"), c("Kh")];
    let board = parse_board("Qd9s3c2h5d").unwrap();
    let result = evaluate_hand(&hole, &board).unwrap();
    assert_eq!(result.category, HandCategory::HighCard);
}

#[test]
fn test_not_enough_cards() {
    assert!(evaluate_hand(&[c("As"), c("Kh")], &[c("Qd")]).is_err());
}

fn showdown(hands: &[[&str; 2]], board: &str) -> Vec<usize> {
    let board = parse_board(board).unwrap();
    let results: Vec<HandResult> = hands
        .iter()
        .map(|h| evaluate_hand(&[c(h[0]), c(h[1])], &board).unwrap())
        .collect();
    winners(&results)
}

#[test]
fn test_flush_beats_straight() {
    assert_eq!(showdown(&[["As", "2s"], ["8h", "9h"]], "7s6s5s4dAh"), vec![0]);
}

#[test]
fn test_higher_pair_wins() {
    assert_eq!(showdown(&[["Ks", "Kh"], ["As", "Ah"]], "2s5d8cTh3d"), vec![1]);
}

#[test]
fn test_kicker_decides() {
    assert_eq!(showdown(&[["Ad", "Kh"], ["Ah", "Qd"]], "As5d8cTh3d"), vec![0]);
}

#[test]
fn test_board_plays_is_a_tie() {
    assert_eq!(showdown(&[["2h", "3d"], ["4h", "5d"]], "AsKdQhJsTs"), vec![0, 1]);
}

#[test]
fn test_two_pair_kicker() {
    assert_eq!(showdown(&[["Kh", "3c"], ["Qh", "3d"], ["Jh", "4c"]], "AsAd5s5d2c"), vec![0]);
}

#[test]
fn test_hand_result_ordering() {
    let high = HandResult::new(0, HandCategory::HighCard, vec![14, 13, 12, 11, 9], vec![]);
    let pair = HandResult::new(1, HandCategory::OnePair, vec![14, 13, 12, 11], vec![]);
    assert!(pair > high);
    assert!(high < pair);
}

#[test]
fn test_hand_result_kicker() {
    let h1 = HandResult::new(1, HandCategory::OnePair, vec![14, 13, 12, 11], vec![]);
    let h2 = HandResult::new(1, HandCategory::OnePair, vec![14, 13, 12, 10], vec![]);
    assert!(h1 > h2);
}

#[test]
fn test_rank_class_is_strongest_first() {
    assert_eq!(HandCategory::RoyalFlush.rank_class(), 0);
    assert_eq!(HandCategory::StraightFlush.rank_class(), 1);
    assert_eq!(HandCategory::FourOfAKind.rank_class(), 2);
    assert_eq!(HandCategory::OnePair.rank_class(), 8);
    assert_eq!(HandCategory::HighCard.rank_class(), 9);
}

#[test]
fn test_straight_high_on_seven_values() {
    assert_eq!(straight_high(&[14, 2, 3, 4, 5, 9, 9]), Some(5));
    assert_eq!(straight_high(&[10, 11, 12, 13, 14, 2, 3]), Some(14));
    assert_eq!(straight_high(&[2, 3, 4, 5, 6, 7, 14]), Some(7));
    assert_eq!(straight_high(&[2, 3, 4, 5, 7, 8, 9]), None);
}

#[test]
fn test_winners_returns_every_tied_hand() {
    let board = parse_board("AsKdQhJsTs").unwrap();
    let results: Vec<HandResult> = [[c("2h"), c("3d")], [c("4h"), c("5d")], [c("9h"), c("8d")]]
        .iter()
        .map(|h| evaluate_hand(h, &board).unwrap())
        .collect();
    assert_eq!(winners(&results), vec![0, 1, 2]);

    // Two more spades make a flush and break the tie.
    let flush = evaluate_hand(&[c("9s"), c("8s")], &board).unwrap();
    let mut with_flush = results.clone();
    with_flush.push(flush);
    assert_eq!(winners(&with_flush), vec![3]);
}

#[test]
fn test_winners_single() {
    let board = parse_board("Kd5c3h8d9c").unwrap();
    let results = vec![
        evaluate_hand(&[c("As"), c("Ah")], &board).unwrap(),
        evaluate_hand(&[c("7s"), c("2h")], &board).unwrap(),
    ];
    assert_eq!(winners(&results), vec![0]);
}
