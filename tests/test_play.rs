use std::sync::Arc;

use gto_trainer::config::TrainerConfig;
use gto_trainer::engine::Engine;
use gto_trainer::play::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

// ---------------------------------------------------------------------------
// Drills
// ---------------------------------------------------------------------------

#[test]
fn test_postflop_drills_show_board_and_score() {
    let engine = Engine::standard().unwrap();
    let mut rng = StdRng::seed_from_u64(10);
    let input = b"1\n1\n1\n1\n";
    let mut reader = &input[..];
    let mut output = Vec::new();
    let score = run_drills(&engine, DrillKind::Postflop, Some(4), &mut rng, &mut reader, &mut output).unwrap();
    let out = String::from_utf8(output).unwrap();

    assert_eq!(score.attempted, 4);
    assert_eq!(score.correct(), score.primary + score.acceptable);
    assert!(out.contains("Board:"), "postflop drills should show the flop");
    assert!(out.contains(&format!("Score: {}/4", score.correct())));
}

#[test]
fn test_drills_stop_when_input_ends() {
    let engine = Engine::standard().unwrap();
    let mut rng = StdRng::seed_from_u64(12);
    let input = b"raise\n";
    let mut reader = &input[..];
    let mut output = Vec::new();
    let score = run_drills(&engine, DrillKind::Preflop, None, &mut rng, &mut reader, &mut output).unwrap();
    assert_eq!(score.attempted, 1);
}

#[test]
fn test_postflop_drills_accept_label_prefix() {
    let engine = Engine::standard().unwrap();
    let mut rng = StdRng::seed_from_u64(13);
    // "c" is check or call depending on the spot; every drill offers one.
    let input = b"c\nc\nc\nc\nc\nc\n";
    let mut reader = &input[..];
    let mut output = Vec::new();
    let score = run_drills(&engine, DrillKind::Postflop, Some(6), &mut rng, &mut reader, &mut output).unwrap();
    let out = String::from_utf8(output).unwrap();
    assert_eq!(score.attempted, 6);
    assert!(!out.contains("Pick one of the listed actions."));
}

#[test]
fn test_drill_score_accuracy() {
    let score = DrillScore {
        attempted: 4,
        primary: 2,
        acceptable: 1,
    };
    assert_eq!(score.correct(), 3);
    assert!((score.accuracy() - 0.75).abs() < 1e-12);
    assert_eq!(DrillScore::default().accuracy(), 0.0);
}

// ---------------------------------------------------------------------------
// Table play
// ---------------------------------------------------------------------------

#[test]
fn test_table_session_quits_after_current_hand() {
    let engine = Engine::standard().unwrap();
    let rng = StdRng::seed_from_u64(14);
    let input = b"q\n";
    let mut reader = &input[..];
    let mut output = Vec::new();
    run_table_session(engine, rng, 2, 5, &mut reader, &mut output).unwrap();
    let out = String::from_utf8(output).unwrap();

    assert!(out.contains("PREFLOP"), "hero acts first heads-up");
    assert!(out.contains("Hand #1"));
    assert!(!out.contains("Hand #2"));
    assert!(out.contains("Session review"));
}

#[test]
fn test_table_session_uses_configured_threshold() {
    let config = TrainerConfig {
        significance_threshold: 1.0,
        ..TrainerConfig::default()
    };
    let engine = Arc::new(Engine::new(config).unwrap());
    let rng = StdRng::seed_from_u64(14);
    let input = b"q\n";
    let mut reader = &input[..];
    let mut output = Vec::new();
    run_table_session(engine, rng, 3, 1, &mut reader, &mut output).unwrap();
    let out = String::from_utf8(output).unwrap();

    // No weight can exceed 1.0, so nothing counts as significant.
    assert_eq!(out.matches("0 hands, 0.0% of range").count(), 2);
}

#[test]
fn test_table_session_plays_requested_hands() {
    let engine = Engine::standard().unwrap();
    let rng = StdRng::seed_from_u64(15);
    let input = "1\n".repeat(200);
    let mut reader = input.as_bytes();
    let mut output = Vec::new();
    run_table_session(engine, rng, 4, 3, &mut reader, &mut output).unwrap();
    let out = String::from_utf8(output).unwrap();

    assert!(out.contains("Hand #3"));
    assert!(!out.contains("Hand #4"));
    assert!(out.contains("Estimated range"));
}
