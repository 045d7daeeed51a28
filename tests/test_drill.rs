use std::collections::HashSet;

use gto_trainer::bucket::Bucket;
use gto_trainer::cards::{hand_key, parse_board, parse_hole_cards};
use gto_trainer::drill::*;
use gto_trainer::engine::Engine;
use gto_trainer::preflop::Position;
use gto_trainer::strategy::{Action, ActionDistribution, Role};
use gto_trainer::texture::Texture;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn set(keys: &[&str]) -> HashSet<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

fn facing_drill(key: &str, correct: Action) -> Drill {
    Drill::PreflopFacing {
        position: Position::Btn,
        opener: Position::Utg,
        hand: parse_hole_cards("9s9h").unwrap(),
        hand_key: key.to_string(),
        correct,
        raise_range: set(&["AA", "KK"]),
        call_range: set(&["99", "AQs"]),
    }
}

fn postflop_drill() -> Drill {
    let strategy = ActionDistribution::new(&[
        (Action::Check, 0.35),
        (Action::BetSmall, 0.25),
        (Action::BetMedium, 0.40),
    ]);
    Drill::Postflop {
        role: Role::Oop,
        facing_bet: false,
        hand: parse_hole_cards("AsQd").unwrap(),
        board: parse_board("Qh 7c 2s").unwrap(),
        texture: Texture::HighDryKing,
        bucket: Bucket::TopPair,
        correct: strategy.correct_actions(),
        strategy,
        breakdown: Vec::new(),
        pot: 10.0,
    }
}

#[test]
fn test_rfi_grading_is_exact() {
    let drill = Drill::PreflopRfi {
        position: Position::Utg,
        hand: parse_hole_cards("AsAh").unwrap(),
        hand_key: "AA".to_string(),
        correct: Action::Raise,
        range_size: 20,
    };
    assert_eq!(drill.actions(), vec![Action::Raise, Action::Fold]);
    assert_eq!(drill.situation(), "RFI from UTG");
    let good = grade(&drill, Action::Raise);
    assert_eq!(good.verdict, Verdict::Primary);
    assert!(good.explanation.starts_with("Correct!"));
    let bad = grade(&drill, Action::Fold);
    assert_eq!(bad.verdict, Verdict::Wrong);
    assert!(!bad.verdict.is_correct());
    assert!(bad.explanation.contains("20 hands"));
}

#[test]
fn test_facing_grading_accepts_other_continue() {
    let drill = facing_drill("99", Action::Call);
    assert_eq!(drill.situation(), "BTN vs UTG open");
    assert_eq!(grade(&drill, Action::Call).verdict, Verdict::Primary);
    let alt = grade(&drill, Action::Raise);
    assert_eq!(alt.verdict, Verdict::Acceptable);
    assert!(alt.verdict.is_correct());
    assert_eq!(grade(&drill, Action::Fold).verdict, Verdict::Wrong);
}

#[test]
fn test_facing_grading_out_of_range() {
    let drill = facing_drill("72o", Action::Fold);
    assert_eq!(grade(&drill, Action::Fold).verdict, Verdict::Primary);
    assert_eq!(grade(&drill, Action::Call).verdict, Verdict::Wrong);
    assert_eq!(grade(&drill, Action::Raise).verdict, Verdict::Wrong);
}

#[test]
fn test_postflop_grading() {
    let drill = postflop_drill();
    assert_eq!(drill.actions().len(), 4);
    assert_eq!(drill.situation(), "OOP first to act on high dry K board");
    assert_eq!(grade(&drill, Action::BetMedium).verdict, Verdict::Primary);
    assert_eq!(grade(&drill, Action::Check).verdict, Verdict::Primary);
    let mixed = grade(&drill, Action::BetSmall);
    assert_eq!(mixed.verdict, Verdict::Acceptable);
    assert!(mixed.explanation.contains("25%"));
    assert_eq!(grade(&drill, Action::BetLarge).verdict, Verdict::Wrong);
}

#[test]
fn test_rfi_drills_match_charts() {
    let engine = Engine::standard().unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    for _ in 0..200 {
        let drill = generate_preflop_rfi(&engine, &mut rng).unwrap();
        let Drill::PreflopRfi {
            position,
            hand,
            hand_key: key,
            correct,
            ..
        } = &drill
        else {
            panic!("expected an RFI drill");
        };
        assert_ne!(*position, Position::Bb);
        assert_eq!(*key, hand_key(hand[0], hand[1]));
        assert_eq!(*correct, engine.charts.preflop_action(*position, key, None));
        assert_eq!(grade(&drill, *correct).verdict, Verdict::Primary);
    }
}

#[test]
fn test_facing_drills_use_existing_tables() {
    let engine = Engine::standard().unwrap();
    let mut rng = StdRng::seed_from_u64(6);
    for _ in 0..200 {
        let drill = generate_preflop_facing(&engine, &mut rng).unwrap();
        let Drill::PreflopFacing { position, opener, .. } = &drill else {
            panic!("expected a facing drill");
        };
        assert!(engine.charts.facing(*position, *opener).is_some());
        assert_eq!(drill.actions().len(), 3);
    }
}

#[test]
fn test_mixed_preflop_drills() {
    let engine = Engine::standard().unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let drills: Vec<Drill> = (0..100)
        .map(|_| generate_preflop(&engine, &mut rng).unwrap())
        .collect();
    assert!(drills.iter().any(|d| matches!(d, Drill::PreflopRfi { .. })));
    assert!(drills.iter().any(|d| matches!(d, Drill::PreflopFacing { .. })));
}

#[test]
fn test_postflop_drills() {
    let engine = Engine::standard().unwrap();
    let mut rng = StdRng::seed_from_u64(8);
    let mut facing = 0;
    for _ in 0..1_000 {
        let drill = generate_postflop(&engine, &mut rng).unwrap();
        let Drill::Postflop {
            facing_bet,
            board,
            correct,
            strategy,
            breakdown,
            ..
        } = &drill
        else {
            panic!("expected a postflop drill");
        };
        assert_eq!(board.len(), 3);
        assert!(!correct.is_empty());
        assert!(correct.iter().all(|a| drill.actions().contains(a)));
        assert_eq!(*correct, strategy.correct_actions());
        assert!(!breakdown.is_empty());
        if *facing_bet {
            facing += 1;
        }
    }
    assert!((220..380).contains(&facing), "{}", facing);
}
