//! Bucket-level equity: how often each bucket shows up per flop texture,
//! and how each bucket fares against each other bucket by the river.

use std::collections::HashMap;
use std::fmt;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::Deserialize;

use crate::bucket::{classify_hand, Bucket, ALL_BUCKETS};
use crate::cards::Deck;
use crate::error::GtoResult;
use crate::hand_evaluator::evaluate_hand;
use crate::texture::{classify_texture, Texture, ALL_TEXTURES};

pub const NUM_BUCKETS: usize = ALL_BUCKETS.len();
pub const NUM_TEXTURES: usize = ALL_TEXTURES.len();

/// Dealt flops per rayon task when estimating bucket frequencies.
const CHUNK: usize = 2_000;
/// Give up on a rare texture after this many deals per wanted matchup.
const MAX_ATTEMPTS_PER_MATCHUP: usize = 30;

pub type BucketDist = [f64; NUM_BUCKETS];
pub type EquityMatrix = [[f64; NUM_BUCKETS]; NUM_BUCKETS];

/// Equity for a cell with too few observations: 0.75 when hero's bucket is
/// stronger, 0.25 when weaker, 0.5 when equal.
pub fn ordinal_equity(hero: Bucket, villain: Bucket) -> f64 {
    match hero.index().cmp(&villain.index()) {
        std::cmp::Ordering::Less => 0.75,
        std::cmp::Ordering::Greater => 0.25,
        std::cmp::Ordering::Equal => 0.5,
    }
}

fn uniform_dist() -> BucketDist {
    [1.0 / NUM_BUCKETS as f64; NUM_BUCKETS]
}

fn ordinal_matrix() -> EquityMatrix {
    let mut m = [[0.5; NUM_BUCKETS]; NUM_BUCKETS];
    for &h in &ALL_BUCKETS {
        for &v in &ALL_BUCKETS {
            m[h.index()][v.index()] = ordinal_equity(h, v);
        }
    }
    m
}

// ---------------------------------------------------------------------------
// Sampling accumulators
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct MatchupCounts {
    wins: [[f64; NUM_BUCKETS]; NUM_BUCKETS],
    totals: [[u32; NUM_BUCKETS]; NUM_BUCKETS],
    done: usize,
}

impl MatchupCounts {
    fn new() -> Self {
        MatchupCounts {
            wins: [[0.0; NUM_BUCKETS]; NUM_BUCKETS],
            totals: [[0; NUM_BUCKETS]; NUM_BUCKETS],
            done: 0,
        }
    }

    /// `cmp` is hand a against hand b.
    fn record(&mut self, a: Bucket, b: Bucket, cmp: std::cmp::Ordering) {
        let (ai, bi) = (a.index(), b.index());
        match cmp {
            std::cmp::Ordering::Greater => self.wins[ai][bi] += 1.0,
            std::cmp::Ordering::Less => self.wins[bi][ai] += 1.0,
            std::cmp::Ordering::Equal => {
                self.wins[ai][bi] += 0.5;
                self.wins[bi][ai] += 0.5;
            }
        }
        self.totals[ai][bi] += 1;
        self.totals[bi][ai] += 1;
        self.done += 1;
    }

    fn matrix(&self, min_samples: u32) -> EquityMatrix {
        let mut m = ordinal_matrix();
        for h in 0..NUM_BUCKETS {
            for v in 0..NUM_BUCKETS {
                let t = self.totals[h][v];
                if t > 0 && t >= min_samples {
                    m[h][v] = self.wins[h][v] / t as f64;
                }
            }
        }
        m
    }
}

fn seeded(seed: u64, stream: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

fn count_buckets(samples: usize, seed: u64, chunk: u64) -> GtoResult<[[u32; NUM_BUCKETS]; NUM_TEXTURES]> {
    let mut rng = seeded(seed, chunk);
    let mut counts = [[0u32; NUM_BUCKETS]; NUM_TEXTURES];
    for _ in 0..samples {
        let mut deck = Deck::new(None);
        deck.shuffle_with(&mut rng);
        let cards = deck.deal(5)?;
        let (hole, flop) = cards.split_at(2);
        let texture = classify_texture(flop);
        let bucket = classify_hand(hole, flop);
        counts[texture.index()][bucket.index()] += 1;
    }
    Ok(counts)
}

fn sample_matchups(texture: Texture, wanted: usize, seed: u64) -> GtoResult<MatchupCounts> {
    let mut rng = seeded(seed, 1_000 + texture.index() as u64);
    let mut counts = MatchupCounts::new();
    for _ in 0..wanted.saturating_mul(MAX_ATTEMPTS_PER_MATCHUP) {
        if counts.done >= wanted {
            break;
        }
        let mut deck = Deck::new(None);
        deck.shuffle_with(&mut rng);
        let cards = deck.deal(9)?;
        let flop = &cards[..3];
        if classify_texture(flop) != texture {
            continue;
        }
        let (h1, h2) = (&cards[3..5], &cards[5..7]);
        let mut full_board = flop.to_vec();
        full_board.extend_from_slice(&cards[7..9]);

        let b1 = classify_hand(h1, flop);
        let b2 = classify_hand(h2, flop);
        let r1 = evaluate_hand(h1, &full_board)?;
        let r2 = evaluate_hand(h2, &full_board)?;
        counts.record(b1, b2, r1.cmp(&r2));
    }
    Ok(counts)
}

// ---------------------------------------------------------------------------
// EquityTable
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct EquityTable {
    bucket_probs: [BucketDist; NUM_TEXTURES],
    equity: [EquityMatrix; NUM_TEXTURES],
}

impl Default for EquityTable {
    /// Uniform bucket frequencies and ordinal equities everywhere.
    fn default() -> Self {
        EquityTable {
            bucket_probs: [uniform_dist(); NUM_TEXTURES],
            equity: [ordinal_matrix(); NUM_TEXTURES],
        }
    }
}

#[derive(Deserialize, Debug, Default)]
struct RawEquityDocument {
    #[serde(default)]
    bucket_probs: HashMap<String, HashMap<String, f64>>,
    #[serde(default)]
    equity_matrix: HashMap<String, HashMap<String, HashMap<String, f64>>>,
}

impl EquityTable {
    /// Monte-Carlo estimate: `samples` random flops for bucket frequencies,
    /// and up to `samples` bucket-vs-bucket matchups per texture run out to
    /// the river. Same seed, same table.
    pub fn estimate(samples: usize, min_samples: u32, seed: u64) -> GtoResult<Self> {
        let chunks = samples.div_ceil(CHUNK).max(1);
        let partials: Vec<[[u32; NUM_BUCKETS]; NUM_TEXTURES]> = (0..chunks)
            .into_par_iter()
            .map(|i| {
                let n = CHUNK.min(samples.saturating_sub(i * CHUNK));
                count_buckets(n, seed, i as u64)
            })
            .collect::<GtoResult<_>>()?;

        let mut table = EquityTable::default();
        for &texture in &ALL_TEXTURES {
            let t = texture.index();
            let mut counts = [0u32; NUM_BUCKETS];
            for partial in &partials {
                for b in 0..NUM_BUCKETS {
                    counts[b] += partial[t][b];
                }
            }
            let total: u32 = counts.iter().sum();
            if total > 0 {
                for b in 0..NUM_BUCKETS {
                    table.bucket_probs[t][b] = counts[b] as f64 / total as f64;
                }
            }
        }

        let matchups: Vec<(Texture, MatchupCounts)> = ALL_TEXTURES
            .par_iter()
            .map(|&texture| sample_matchups(texture, samples, seed).map(|c| (texture, c)))
            .collect::<GtoResult<_>>()?;
        for (texture, counts) in matchups {
            log::debug!("{}: {} matchups sampled", texture, counts.done);
            table.equity[texture.index()] = counts.matrix(min_samples);
        }
        Ok(table)
    }

    /// Read `bucket_probs` and `equity_matrix` from a strategy document.
    /// Missing textures keep uniform frequencies and ordinal equities.
    pub fn from_json_str(json: &str) -> GtoResult<Self> {
        let doc: RawEquityDocument = serde_json::from_str(json)?;
        let mut table = EquityTable::default();

        for (tex_name, probs) in &doc.bucket_probs {
            let Ok(texture) = tex_name.parse::<Texture>() else {
                log::warn!("bucket_probs: skipping unknown texture '{}'", tex_name);
                continue;
            };
            let mut dist = [0.0; NUM_BUCKETS];
            for (bucket_name, &p) in probs {
                if let Ok(bucket) = bucket_name.parse::<Bucket>() {
                    dist[bucket.index()] = p;
                }
            }
            if dist.iter().sum::<f64>() > 0.0 {
                table.bucket_probs[texture.index()] = dist;
            }
        }

        for (tex_name, rows) in &doc.equity_matrix {
            let Ok(texture) = tex_name.parse::<Texture>() else {
                log::warn!("equity_matrix: skipping unknown texture '{}'", tex_name);
                continue;
            };
            let matrix = &mut table.equity[texture.index()];
            for (hero_name, cols) in rows {
                let Ok(hero) = hero_name.parse::<Bucket>() else { continue };
                for (villain_name, &eq) in cols {
                    if let Ok(villain) = villain_name.parse::<Bucket>() {
                        matrix[hero.index()][villain.index()] = eq;
                    }
                }
            }
        }
        Ok(table)
    }

    pub fn bucket_probs(&self, texture: Texture) -> &BucketDist {
        &self.bucket_probs[texture.index()]
    }

    pub fn equity(&self, texture: Texture, hero: Bucket, villain: Bucket) -> f64 {
        self.equity[texture.index()][hero.index()][villain.index()]
    }
}

impl fmt::Display for EquityTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &texture in &ALL_TEXTURES {
            write!(f, "{:<14}", texture.as_str())?;
            for &b in &ALL_BUCKETS {
                let p = self.bucket_probs(texture)[b.index()];
                if p > 0.005 {
                    write!(f, " {}={:.1}%", b, p * 100.0)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
