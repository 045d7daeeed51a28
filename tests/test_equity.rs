use approx::assert_relative_eq;
use gto_trainer::bucket::{Bucket, ALL_BUCKETS};
use gto_trainer::equity::*;
use gto_trainer::range_analysis::*;
use gto_trainer::strategy::Role;
use gto_trainer::texture::{Texture, ALL_TEXTURES};

#[test]
fn test_ordinal_equity() {
    assert_eq!(ordinal_equity(Bucket::Premium, Bucket::Air), 0.75);
    assert_eq!(ordinal_equity(Bucket::Air, Bucket::Premium), 0.25);
    assert_eq!(ordinal_equity(Bucket::Draw, Bucket::Draw), 0.5);
}

#[test]
fn test_default_table_is_uniform_and_ordinal() {
    let table = EquityTable::default();
    for t in ALL_TEXTURES {
        assert_relative_eq!(table.bucket_probs(t).iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }
    assert_eq!(table.equity(Texture::Paired, Bucket::Nut, Bucket::TopPair), 0.75);
}

#[test]
fn test_estimate_is_seeded() {
    let a = EquityTable::estimate(600, 30, 42).unwrap();
    let b = EquityTable::estimate(600, 30, 42).unwrap();
    assert_eq!(a, b);

    for t in ALL_TEXTURES {
        assert_relative_eq!(a.bucket_probs(t).iter().sum::<f64>(), 1.0, epsilon = 1e-9);
        for &h in &ALL_BUCKETS {
            for &v in &ALL_BUCKETS {
                let e = a.equity(t, h, v);
                assert!((0.0..=1.0).contains(&e));
                if h != v {
                    assert_relative_eq!(e + a.equity(t, v, h), 1.0, epsilon = 1e-9);
                }
            }
        }
    }
}

#[test]
fn test_from_document() {
    let json = r#"{
        "strategies": {},
        "bucket_probs": {"monotone": {"premium": 0.5, "air": 0.5}, "sideways": {"air": 1.0}},
        "equity_matrix": {"monotone": {"premium": {"air": 0.9}}}
    }"#;
    let table = EquityTable::from_json_str(json).unwrap();
    assert_eq!(table.bucket_probs(Texture::Monotone)[Bucket::Premium.index()], 0.5);
    assert_eq!(table.bucket_probs(Texture::Monotone)[Bucket::Nut.index()], 0.0);
    assert_eq!(table.equity(Texture::Monotone, Bucket::Premium, Bucket::Air), 0.9);
    assert_eq!(table.equity(Texture::Paired, Bucket::Premium, Bucket::Air), 0.75);
    assert!(EquityTable::from_json_str("[1, 2").is_err());
}

#[test]
fn test_out_of_position_range_is_stronger() {
    let table = EquityTable::default();
    let oop = range_vs_range(&table, Texture::WetConnected, Role::Oop);
    let ip = range_vs_range(&table, Texture::WetConnected, Role::Ip);
    assert!(oop.hero_equity > 0.5);
    assert_relative_eq!(oop.hero_equity, 1.0 - ip.hero_equity, epsilon = 1e-12);
    assert_relative_eq!(oop.villain_equity(), ip.hero_equity, epsilon = 1e-12);
    assert_relative_eq!(oop.magnitude, (oop.hero_equity - 0.5).abs());
    assert_eq!(oop.hero_dist, ip.villain_dist);
}

fn flat_matrix(texture: Texture, eq: f64) -> EquityTable {
    let row: Vec<String> = ALL_BUCKETS
        .iter()
        .map(|b| format!("\"{}\": {}", b.as_str(), eq))
        .collect();
    let rows: Vec<String> = ALL_BUCKETS
        .iter()
        .map(|b| format!("\"{}\": {{{}}}", b.as_str(), row.join(", ")))
        .collect();
    let json = format!(r#"{{"equity_matrix": {{"{}": {{{}}}}}}}"#, texture.as_str(), rows.join(", "));
    EquityTable::from_json_str(&json).unwrap()
}

#[test]
fn test_advantage_margin() {
    let rvr = range_vs_range(&flat_matrix(Texture::Paired, 0.6), Texture::Paired, Role::Ip);
    assert_relative_eq!(rvr.hero_equity, 0.6, epsilon = 1e-9);
    assert_eq!(rvr.advantage, Advantage::Hero);
    let rvr = range_vs_range(&flat_matrix(Texture::Paired, 0.4), Texture::Paired, Role::Oop);
    assert_eq!(rvr.advantage, Advantage::Villain);
    let rvr = range_vs_range(&flat_matrix(Texture::Paired, 0.52), Texture::Paired, Role::Oop);
    assert_eq!(rvr.advantage, Advantage::Even);
    assert!(rvr.magnitude < ADVANTAGE_MARGIN);
}

#[test]
fn test_skew_keeps_distribution_normalised() {
    let base = [1.0 / NUM_BUCKETS as f64; NUM_BUCKETS];
    let oop = skewed_distribution(&base, Role::Oop);
    let ip = skewed_distribution(&base, Role::Ip);
    assert_relative_eq!(oop.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    assert!(oop[Bucket::Premium.index()] > ip[Bucket::Premium.index()]);
    assert!(oop[Bucket::Air.index()] < ip[Bucket::Air.index()]);
}

#[test]
fn test_skew_only_moves_listed_buckets() {
    let base = [1.0 / NUM_BUCKETS as f64; NUM_BUCKETS];
    let ratio = |dist: &[f64; NUM_BUCKETS], b: Bucket| dist[b.index()] / dist[Bucket::TopPair.index()];

    let oop = skewed_distribution(&base, Role::Oop);
    assert_relative_eq!(ratio(&oop, Bucket::Premium), 1.10, epsilon = 1e-12);
    assert_relative_eq!(ratio(&oop, Bucket::WeakMade), 0.95, epsilon = 1e-12);
    assert_relative_eq!(ratio(&oop, Bucket::Gutshot), 1.0, epsilon = 1e-12);
    assert_relative_eq!(ratio(&oop, Bucket::Draw), 1.0, epsilon = 1e-12);

    let ip = skewed_distribution(&base, Role::Ip);
    assert_relative_eq!(ratio(&ip, Bucket::Draw), 1.05, epsilon = 1e-12);
    assert_relative_eq!(ratio(&ip, Bucket::Air), 1.10, epsilon = 1e-12);
    assert_relative_eq!(ratio(&ip, Bucket::NutDraw), 1.0, epsilon = 1e-12);
    assert_relative_eq!(ratio(&ip, Bucket::Overpair), 1.0, epsilon = 1e-12);
    assert_relative_eq!(ratio(&ip, Bucket::Gutshot), 1.0, epsilon = 1e-12);
}
