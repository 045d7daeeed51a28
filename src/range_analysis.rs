//! Range-vs-range equity on a texture, from bucket frequencies skewed by
//! position and the bucket equity matrix.

use std::fmt;

use crate::bucket::{Bucket, ALL_BUCKETS};
use crate::equity::{BucketDist, EquityTable, NUM_BUCKETS};
use crate::strategy::Role;
use crate::texture::Texture;

/// Equity edge beyond which one side is said to have the range advantage.
pub const ADVANTAGE_MARGIN: f64 = 0.03;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advantage {
    Hero,
    Villain,
    Even,
}

impl fmt::Display for Advantage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Advantage::Hero => write!(f, "Hero has range advantage"),
            Advantage::Villain => write!(f, "Villain has range advantage"),
            Advantage::Even => write!(f, "Ranges are roughly even"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeVsRange {
    pub texture: Texture,
    pub hero_role: Role,
    pub hero_dist: BucketDist,
    pub villain_dist: BucketDist,
    pub hero_equity: f64,
    pub advantage: Advantage,
    /// |hero equity - 0.5|
    pub magnitude: f64,
}

impl RangeVsRange {
    pub fn villain_equity(&self) -> f64 {
        1.0 - self.hero_equity
    }
}

/// The out-of-position player keeps more strong hands after preflop, the
/// in-position player more marginal ones.
fn position_skew(role: Role, bucket: Bucket) -> f64 {
    match (role, bucket) {
        (Role::Oop, Bucket::Premium) => 1.10,
        (Role::Oop, Bucket::Nut) => 1.05,
        (Role::Oop, Bucket::WeakMade) => 0.95,
        (Role::Oop, Bucket::Air) => 0.90,
        (Role::Ip, Bucket::Premium) => 0.90,
        (Role::Ip, Bucket::Nut) => 0.95,
        (Role::Ip, Bucket::Draw) => 1.05,
        (Role::Ip, Bucket::Air) => 1.10,
        _ => 1.0,
    }
}

pub fn skewed_distribution(base: &BucketDist, role: Role) -> BucketDist {
    let mut out = [0.0; NUM_BUCKETS];
    for &b in &ALL_BUCKETS {
        out[b.index()] = base[b.index()] * position_skew(role, b);
    }
    let total: f64 = out.iter().sum();
    if total > 0.0 {
        out.iter_mut().for_each(|p| *p /= total);
    }
    out
}

pub fn range_vs_range(table: &EquityTable, texture: Texture, hero_role: Role) -> RangeVsRange {
    let base = table.bucket_probs(texture);
    let hero_dist = skewed_distribution(base, hero_role);
    let villain_dist = skewed_distribution(base, hero_role.other());

    let mut hero_equity = 0.0;
    for &hb in &ALL_BUCKETS {
        for &vb in &ALL_BUCKETS {
            hero_equity += hero_dist[hb.index()] * villain_dist[vb.index()] * table.equity(texture, hb, vb);
        }
    }

    let diff = hero_equity - 0.5;
    let advantage = if diff > ADVANTAGE_MARGIN {
        Advantage::Hero
    } else if diff < -ADVANTAGE_MARGIN {
        Advantage::Villain
    } else {
        Advantage::Even
    };

    RangeVsRange {
        texture,
        hero_role,
        hero_dist,
        villain_dist,
        hero_equity,
        advantage,
        magnitude: diff.abs(),
    }
}
