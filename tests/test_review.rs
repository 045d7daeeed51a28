use approx::assert_relative_eq;
use gto_trainer::preflop::Position;
use gto_trainer::review::*;
use gto_trainer::strategy::Action;
use gto_trainer::table::Street;

fn decision(action: Action, gto_action: Action, deviation: f64) -> DecisionRecord {
    DecisionRecord {
        street: Street::Flop,
        action,
        gto_action,
        deviation,
    }
}

fn hand(number: u32, result_bb: f64, actions: Vec<DecisionRecord>) -> HandRecord {
    HandRecord {
        hand_number: number,
        hero_key: "AKo".to_string(),
        hero_position: Position::Btn,
        result_bb,
        actions,
    }
}

#[test]
fn test_empty_log() {
    let review = compute_session_review(&[]);
    assert_eq!(review, SessionReview::default());
    assert_eq!(review.hands_played, 0);
    assert!(review.top_mistakes.is_empty());
}

#[test]
fn test_totals() {
    let log = vec![hand(1, 5.0, Vec::new()), hand(2, -2.0, Vec::new())];
    let review = compute_session_review(&log);
    assert_eq!(review.hands_played, 2);
    assert_relative_eq!(review.total_pl, 3.0);
    assert_relative_eq!(review.bb_per_hand, 1.5);
    assert_relative_eq!(review.biggest_win, 5.0);
    assert_relative_eq!(review.biggest_loss, -2.0);
}

#[test]
fn test_single_losing_hand() {
    let review = compute_session_review(&[hand(1, -4.5, Vec::new())]);
    assert_relative_eq!(review.biggest_win, -4.5);
    assert_relative_eq!(review.biggest_loss, -4.5);
}

#[test]
fn test_mistakes_above_threshold_only() {
    let log = vec![hand(
        1,
        0.0,
        vec![
            decision(Action::Check, Action::Check, 0.0),
            decision(Action::Call, Action::Fold, MISTAKE_THRESHOLD),
            decision(Action::Fold, Action::Call, 0.8),
        ],
    )];
    let review = compute_session_review(&log);
    assert_eq!(review.top_mistakes.len(), 1);
    assert_eq!(review.top_mistakes[0].action, Action::Fold);
    assert_eq!(review.top_mistakes[0].hero_key, "AKo");
}

#[test]
fn test_top_mistakes_sorted_and_capped() {
    let log: Vec<HandRecord> = (1..=4)
        .map(|n| {
            hand(
                n,
                0.0,
                vec![
                    decision(Action::BetLarge, Action::Check, 0.4 + n as f64 * 0.1),
                    decision(Action::Call, Action::Fold, 1.0),
                ],
            )
        })
        .collect();
    let review = compute_session_review(&log);
    assert_eq!(review.top_mistakes.len(), TOP_MISTAKES);
    assert!(review
        .top_mistakes
        .windows(2)
        .all(|w| w[0].deviation >= w[1].deviation));
    // Equal deviations keep hand order.
    let firsts: Vec<u32> = review.top_mistakes.iter().take(4).map(|m| m.hand_number).collect();
    assert_eq!(firsts, vec![1, 2, 3, 4]);
    assert_eq!(review.top_mistakes[4].hand_number, 4);
    assert_relative_eq!(review.top_mistakes[4].deviation, 0.8);
}
