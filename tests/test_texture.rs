use std::collections::HashSet;

use gto_trainer::cards::*;
use gto_trainer::texture::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn tex(board: &str) -> Texture {
    classify_texture(&parse_board(board).unwrap())
}

#[test]
fn test_each_category() {
    assert_eq!(tex("Ah 7h 2h"), Texture::Monotone);
    assert_eq!(tex("Kd Ks 5c"), Texture::Paired);
    assert_eq!(tex("9h 8d 7c"), Texture::WetConnected);
    assert_eq!(tex("Ah 9h 4c"), Texture::WetTwoTone);
    assert_eq!(tex("Ad 8c 3s"), Texture::HighDryAce);
    assert_eq!(tex("Kd 8c 3s"), Texture::HighDryKing);
    assert_eq!(tex("Qd 7c 2s"), Texture::HighDryKing);
    assert_eq!(tex("Jd 6c 2s"), Texture::MediumDry);
    assert_eq!(tex("8d 4c 2s"), Texture::LowDry);
}

#[test]
fn test_priority_order() {
    // Monotone wins over connected, paired over two-tone, connected over two-tone.
    assert_eq!(tex("9h 8h 7h"), Texture::Monotone);
    assert_eq!(tex("9h 9d 2h"), Texture::Paired);
    assert_eq!(tex("Th 9h 8c"), Texture::WetConnected);
}

#[test]
fn test_gap_of_two_is_connected() {
    assert_eq!(tex("Kd Js 9c"), Texture::WetConnected);
    assert_eq!(tex("Kd Ts 8c"), Texture::HighDryKing);
}

#[test]
fn test_wheel_ace_is_high() {
    // The ace only counts high, so A-2-3 is not connected.
    assert_eq!(tex("Ad 2s 3c"), Texture::HighDryAce);
}

#[test]
fn test_only_flop_cards_matter() {
    assert_eq!(tex("8d 4c 2s"), tex("8d 4c 2s 8h 8c"));
}

#[test]
fn test_order_does_not_matter() {
    let cards = parse_board("Qs 9h 4h").unwrap();
    let expected = classify_texture(&cards);
    for perm in [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]] {
        let shuffled: Vec<Card> = perm.iter().map(|&i| cards[i]).collect();
        assert_eq!(classify_texture(&shuffled), expected);
    }
}

#[test]
fn test_random_flops_hit_every_texture() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut seen = HashSet::new();
    for _ in 0..3000 {
        let mut deck = Deck::new(None);
        deck.shuffle_with(&mut rng);
        let flop = deck.deal(3).unwrap();
        let t = classify_texture(&flop);
        assert!(ALL_TEXTURES.contains(&t));
        seen.insert(t);
    }
    assert_eq!(seen.len(), ALL_TEXTURES.len());
}

#[test]
fn test_names_round_trip() {
    for t in ALL_TEXTURES {
        assert_eq!(t.as_str().parse::<Texture>().unwrap(), t);
    }
    assert!("wet".parse::<Texture>().is_err());
}
