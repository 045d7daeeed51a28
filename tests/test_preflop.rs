use gto_trainer::preflop::*;
use gto_trainer::strategy::Action;

fn charts() -> PreflopCharts {
    PreflopCharts::embedded().unwrap()
}

#[test]
fn test_rfi_utg() {
    let c = charts();
    let r = c.opening_range(Position::Utg).unwrap();
    assert!(r.contains("AA"));
    assert!(r.contains("KK"));
    assert!(r.contains("A5s"));
    assert!(!r.contains("72o"));
}

#[test]
fn test_btn_opens_wider_than_utg() {
    let c = charts();
    let utg = c.opening_range(Position::Utg).unwrap();
    let btn = c.opening_range(Position::Btn).unwrap();
    assert!(btn.len() > utg.len());
    assert!(utg.iter().all(|k| btn.contains(k)));
}

#[test]
fn test_every_position_has_a_prior() {
    let c = charts();
    for pos in POSITIONS_6MAX {
        assert!(c.opening_range(pos).is_some(), "{} missing", pos);
    }
}

#[test]
fn test_facing_tables_do_not_overlap() {
    let c = charts();
    for (responder, opener) in c.matchups() {
        let t = c.facing(responder, opener).unwrap();
        assert!(t.call.is_disjoint(&t.raise), "{} vs {}", responder, opener);
        assert!(t.raise.contains("AA") || t.raise.contains("QQ"));
    }
}

#[test]
fn test_small_blind_never_flats() {
    let c = charts();
    for opener in [Position::Utg, Position::Mp, Position::Co, Position::Btn] {
        assert!(c.facing(Position::Sb, opener).unwrap().call.is_empty());
    }
}

#[test]
fn test_bb_defends_wide_vs_btn() {
    let c = charts();
    let t = c.facing(Position::Bb, Position::Btn).unwrap();
    assert!(t.call.len() > 50);
    assert!(t.continues("K7o"));
    assert!(!t.continues("72o"));
}

#[test]
fn test_preflop_action_rfi() {
    let c = charts();
    assert_eq!(c.preflop_action(Position::Utg, "AA", None), Action::Raise);
    assert_eq!(c.preflop_action(Position::Utg, "72o", None), Action::Fold);
    assert_eq!(c.preflop_action(Position::Btn, "K2s", None), Action::Raise);
}

#[test]
fn test_preflop_action_facing() {
    let c = charts();
    assert_eq!(c.preflop_action(Position::Btn, "AA", Some(Position::Utg)), Action::Raise);
    assert_eq!(c.preflop_action(Position::Btn, "99", Some(Position::Utg)), Action::Call);
    assert_eq!(c.preflop_action(Position::Btn, "72o", Some(Position::Utg)), Action::Fold);
}

#[test]
fn test_missing_table_uses_nearest() {
    let c = charts();
    assert!(c.facing(Position::Mp, Position::Co).is_none());
    assert!(c.facing_or_nearest(Position::Mp, Position::Co).is_some());
    assert_eq!(c.preflop_action(Position::Mp, "AA", Some(Position::Co)), Action::Raise);
}

#[test]
fn test_opener_facing_reraise() {
    let c = charts();
    assert_eq!(c.versus_reraise(Position::Utg, "KK", Position::Mp), Action::Call);
    assert_eq!(c.versus_reraise(Position::Utg, "T9s", Position::Mp), Action::Fold);
}

#[test]
fn test_position_parsing() {
    assert_eq!("btn".parse::<Position>().unwrap(), Position::Btn);
    assert_eq!(" UTG ".parse::<Position>().unwrap(), Position::Utg);
    assert!("HJ".parse::<Position>().is_err());
}

#[test]
fn test_bad_chart_json_is_an_error() {
    assert!(PreflopCharts::from_json_str("{}").is_err());
    let bad_range = r#"{"6max": {"RFI": {"UTG": {"raise": "AA,ZZ+"}}}}"#;
    assert!(PreflopCharts::from_json_str(bad_range).is_err());
}
