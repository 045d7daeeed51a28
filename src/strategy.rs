//! Strategy lookup: (role, texture, bucket, facing-bet) → mixed strategy.
//!
//! Built once from per-bucket defaults, then overridden texture by texture
//! from a solved strategy document when one is available. Lookups never
//! fail: a missing entry falls back to a playable default.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::bucket::{Bucket, ALL_BUCKETS};
use crate::error::{GtoError, GtoResult};
use crate::texture::{Texture, ALL_TEXTURES};

// ---------------------------------------------------------------------------
// Actions and roles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "check")]
    Check,
    #[serde(rename = "bet_s")]
    BetSmall,
    #[serde(rename = "bet_m")]
    BetMedium,
    #[serde(rename = "bet_l")]
    BetLarge,
    #[serde(rename = "fold")]
    Fold,
    #[serde(rename = "call")]
    Call,
    #[serde(rename = "raise")]
    Raise,
}

pub const ALL_ACTIONS: [Action; 7] = [
    Action::Check,
    Action::BetSmall,
    Action::BetMedium,
    Action::BetLarge,
    Action::Fold,
    Action::Call,
    Action::Raise,
];

/// Actions offered when nobody has bet yet.
pub const FIRST_ACTIONS: [Action; 4] = [
    Action::Check,
    Action::BetSmall,
    Action::BetMedium,
    Action::BetLarge,
];

/// Actions offered when facing a bet.
pub const FACING_ACTIONS: [Action; 3] = [Action::Fold, Action::Call, Action::Raise];

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Check => "check",
            Action::BetSmall => "bet_s",
            Action::BetMedium => "bet_m",
            Action::BetLarge => "bet_l",
            Action::Fold => "fold",
            Action::Call => "call",
            Action::Raise => "raise",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Action::Check => "Check",
            Action::BetSmall => "Bet 33%",
            Action::BetMedium => "Bet 66%",
            Action::BetLarge => "Bet 100%",
            Action::Fold => "Fold",
            Action::Call => "Call",
            Action::Raise => "Raise",
        }
    }

    pub fn is_bet(self) -> bool {
        matches!(self, Action::BetSmall | Action::BetMedium | Action::BetLarge)
    }

    pub fn is_aggressive(self) -> bool {
        self.is_bet() || self == Action::Raise
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = GtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_ACTIONS
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| GtoError::InvalidValue(format!("unknown action '{}'", s)))
    }
}

/// Postflop role of the actor: first to act, or acting after a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "OOP")]
    Oop,
    #[serde(rename = "IP")]
    Ip,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Oop => "OOP",
            Role::Ip => "IP",
        }
    }

    pub fn other(self) -> Role {
        match self {
            Role::Oop => Role::Ip,
            Role::Ip => Role::Oop,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ActionDistribution
// ---------------------------------------------------------------------------

/// Probability per action. Absent actions have probability zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionDistribution(BTreeMap<Action, f64>);

impl ActionDistribution {
    pub fn new(entries: &[(Action, f64)]) -> Self {
        ActionDistribution(entries.iter().copied().collect())
    }

    pub fn pure(action: Action) -> Self {
        Self::new(&[(action, 1.0)])
    }

    pub fn prob(&self, action: Action) -> f64 {
        self.0.get(&action).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> f64 {
        self.0.values().sum()
    }

    /// True when no action carries probability.
    pub fn is_empty(&self) -> bool {
        self.0.values().all(|&p| p <= 0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Action, f64)> + '_ {
        self.0.iter().map(|(&a, &p)| (a, p))
    }

    /// Entries sorted by probability, highest first. Ties keep action order.
    pub fn sorted(&self) -> Vec<(Action, f64)> {
        let mut entries: Vec<(Action, f64)> = self.iter().filter(|&(_, p)| p > 0.0).collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1));
        entries
    }

    pub fn best(&self) -> Option<(Action, f64)> {
        self.sorted().into_iter().next()
    }

    pub fn max_prob(&self) -> f64 {
        self.0.values().copied().fold(0.0, f64::max)
    }

    /// The acceptable answers for this spot: the top action alone when it
    /// carries at least 50%, otherwise the top action plus the runner-up
    /// when that has at least 25%.
    pub fn correct_actions(&self) -> Vec<Action> {
        let sorted = self.sorted();
        let Some(&(best, best_prob)) = sorted.first() else {
            return Vec::new();
        };
        let mut correct = vec![best];
        if best_prob < 0.50 {
            if let Some(&(second, second_prob)) = sorted.get(1) {
                if second_prob >= 0.25 {
                    correct.push(second);
                }
            }
        }
        correct
    }

    /// Draw one action. An empty distribution yields `None`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Action> {
        let total = self.total();
        if total <= 0.0 {
            return None;
        }
        let mut target = rng.gen::<f64>() * total;
        let mut last = None;
        for (action, p) in self.iter().filter(|&(_, p)| p > 0.0) {
            if target < p {
                return Some(action);
            }
            target -= p;
            last = Some(action);
        }
        last
    }

    /// Keep only `allowed` actions, renormalised. Empty when nothing survives.
    pub fn restricted_to(&self, allowed: &[Action]) -> ActionDistribution {
        let kept: BTreeMap<Action, f64> = self
            .0
            .iter()
            .filter(|(a, &p)| allowed.contains(a) && p > 0.0)
            .map(|(&a, &p)| (a, p))
            .collect();
        let total: f64 = kept.values().sum();
        if total <= 0.0 {
            return ActionDistribution::default();
        }
        ActionDistribution(kept.into_iter().map(|(a, p)| (a, p / total)).collect())
    }
}

impl FromIterator<(Action, f64)> for ActionDistribution {
    fn from_iter<I: IntoIterator<Item = (Action, f64)>>(iter: I) -> Self {
        ActionDistribution(iter.into_iter().collect())
    }
}

impl fmt::Display for ActionDistribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .sorted()
            .iter()
            .map(|(a, p)| format!("{} {:.0}%", a.label(), p * 100.0))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

use Action::{BetLarge as L, BetMedium as M, BetSmall as S, Call as CALL, Check as X, Fold as F, Raise as RAISE};

fn oop_default(bucket: Bucket) -> ActionDistribution {
    let entries: &[(Action, f64)] = match bucket {
        Bucket::Premium => &[(X, 0.25), (M, 0.25), (L, 0.50)],
        Bucket::Nut => &[(X, 0.20), (M, 0.30), (L, 0.50)],
        Bucket::Strong => &[(X, 0.20), (M, 0.55), (L, 0.25)],
        Bucket::TwoPair => &[(X, 0.25), (M, 0.50), (L, 0.25)],
        Bucket::TopPair => &[(X, 0.35), (S, 0.25), (M, 0.40)],
        Bucket::Overpair => &[(X, 0.40), (S, 0.25), (M, 0.35)],
        Bucket::MidPair => &[(X, 0.60), (S, 0.25), (M, 0.15)],
        Bucket::Underpair => &[(X, 0.70), (S, 0.20), (M, 0.10)],
        Bucket::NutDraw => &[(X, 0.25), (M, 0.40), (L, 0.35)],
        Bucket::Draw => &[(X, 0.40), (S, 0.30), (M, 0.30)],
        Bucket::WeakMade => &[(X, 0.80), (S, 0.20)],
        Bucket::Gutshot => &[(X, 0.75), (S, 0.25)],
        Bucket::Air => &[(X, 0.65), (S, 0.10), (L, 0.25)],
    };
    ActionDistribution::new(entries)
}

fn ip_default(bucket: Bucket) -> ActionDistribution {
    let entries: &[(Action, f64)] = match bucket {
        Bucket::Premium => &[(X, 0.20), (M, 0.25), (L, 0.55)],
        Bucket::Nut => &[(X, 0.15), (M, 0.35), (L, 0.50)],
        Bucket::Strong => &[(X, 0.15), (M, 0.60), (L, 0.25)],
        Bucket::TwoPair => &[(X, 0.20), (M, 0.55), (L, 0.25)],
        Bucket::TopPair => &[(X, 0.25), (S, 0.30), (M, 0.45)],
        Bucket::Overpair => &[(X, 0.30), (S, 0.35), (M, 0.35)],
        Bucket::MidPair => &[(X, 0.45), (S, 0.35), (M, 0.20)],
        Bucket::Underpair => &[(X, 0.55), (S, 0.30), (M, 0.15)],
        Bucket::NutDraw => &[(X, 0.15), (M, 0.45), (L, 0.40)],
        Bucket::Draw => &[(X, 0.25), (S, 0.35), (M, 0.40)],
        Bucket::WeakMade => &[(X, 0.65), (S, 0.35)],
        Bucket::Gutshot => &[(X, 0.55), (S, 0.45)],
        Bucket::Air => &[(X, 0.45), (S, 0.15), (L, 0.40)],
    };
    ActionDistribution::new(entries)
}

fn facing_default(bucket: Bucket) -> ActionDistribution {
    let entries: &[(Action, f64)] = match bucket {
        Bucket::Premium => &[(CALL, 0.30), (RAISE, 0.70)],
        Bucket::Nut => &[(CALL, 0.40), (RAISE, 0.60)],
        Bucket::Strong => &[(CALL, 0.80), (RAISE, 0.20)],
        Bucket::TwoPair => &[(CALL, 0.75), (RAISE, 0.25)],
        Bucket::TopPair => &[(CALL, 0.75), (F, 0.10), (RAISE, 0.15)],
        Bucket::Overpair => &[(CALL, 0.70), (F, 0.15), (RAISE, 0.15)],
        Bucket::MidPair => &[(CALL, 0.55), (F, 0.45)],
        Bucket::Underpair => &[(CALL, 0.40), (F, 0.60)],
        Bucket::NutDraw => &[(CALL, 0.45), (RAISE, 0.35), (F, 0.20)],
        Bucket::Draw => &[(CALL, 0.50), (RAISE, 0.20), (F, 0.30)],
        Bucket::WeakMade => &[(F, 0.55), (CALL, 0.45)],
        Bucket::Gutshot => &[(F, 0.60), (CALL, 0.40)],
        Bucket::Air => &[(F, 0.70), (RAISE, 0.15), (CALL, 0.15)],
    };
    ActionDistribution::new(entries)
}

/// Used when the first-action tables have no entry.
pub fn fallback_first_action() -> ActionDistribution {
    ActionDistribution::pure(Action::Check)
}

/// Used when the facing-bet table has no entry.
pub fn fallback_facing_bet() -> ActionDistribution {
    ActionDistribution::new(&[(Action::Fold, 0.5), (Action::Call, 0.5)])
}

// ---------------------------------------------------------------------------
// Strategy document
// ---------------------------------------------------------------------------

type RawSection = HashMap<String, HashMap<String, HashMap<String, f64>>>;

#[derive(Deserialize, Debug, Default)]
struct RawStrategies {
    #[serde(rename = "OOP", default)]
    oop: RawSection,
    #[serde(rename = "IP", default)]
    ip: RawSection,
    #[serde(rename = "FACING_BET", default)]
    facing_bet: RawSection,
}

/// The solver's output file. Only `strategies` is read here; the equity
/// sections are picked up by [`crate::equity::EquityTable`].
#[derive(Deserialize, Debug, Default)]
struct RawDocument {
    #[serde(default)]
    strategies: RawStrategies,
}

fn parse_distribution(raw: &HashMap<String, f64>) -> ActionDistribution {
    raw.iter()
        .filter_map(|(name, &p)| match name.parse::<Action>() {
            Ok(action) => Some((action, p)),
            Err(_) => {
                log::warn!("skipping unknown action '{}' in strategy document", name);
                None
            }
        })
        .collect()
}

/// Walk texture → bucket → distribution, skipping unknown keys and empty
/// entries. Calls `apply` for every usable entry.
fn walk_section<F>(section: &RawSection, name: &str, mut apply: F) -> usize
where
    F: FnMut(Texture, Bucket, ActionDistribution),
{
    let mut applied = 0;
    for (tex_name, buckets) in section {
        let Ok(texture) = tex_name.parse::<Texture>() else {
            log::warn!("{}: skipping unknown texture '{}'", name, tex_name);
            continue;
        };
        for (bucket_name, raw) in buckets {
            let Ok(bucket) = bucket_name.parse::<Bucket>() else {
                log::warn!("{}: skipping unknown bucket '{}'", name, bucket_name);
                continue;
            };
            let dist = parse_distribution(raw);
            if dist.is_empty() {
                continue;
            }
            apply(texture, bucket, dist);
            applied += 1;
        }
    }
    applied
}

// ---------------------------------------------------------------------------
// StrategyTable
// ---------------------------------------------------------------------------

/// Read-only after construction; share it between sessions behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct StrategyTable {
    first_action: HashMap<(Role, Texture, Bucket), ActionDistribution>,
    facing_bet: HashMap<(Texture, Bucket), ActionDistribution>,
}

impl StrategyTable {
    /// A table with no entries; every lookup hits the fallback.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Default mixed strategies for every texture/bucket pair.
    pub fn with_defaults() -> Self {
        let mut table = Self::empty();
        for &texture in &ALL_TEXTURES {
            for &bucket in &ALL_BUCKETS {
                table
                    .first_action
                    .insert((Role::Oop, texture, bucket), oop_default(bucket));
                table
                    .first_action
                    .insert((Role::Ip, texture, bucket), ip_default(bucket));
                table
                    .facing_bet
                    .insert((texture, bucket), facing_default(bucket));
            }
        }
        table
    }

    /// Defaults overridden by a solved strategy document.
    pub fn from_json_str(json: &str) -> GtoResult<Self> {
        let mut table = Self::with_defaults();
        table.overlay_json(json)?;
        Ok(table)
    }

    /// Load from `path`, falling back to defaults when the file is missing
    /// or unreadable.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::info!("no strategy document configured, using default strategies");
            return Self::with_defaults();
        };
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("strategy document {} not loaded ({}), using defaults", path.display(), e);
                return Self::with_defaults();
            }
        };
        match Self::from_json_str(&json) {
            Ok(table) => table,
            Err(e) => {
                log::warn!("strategy document {} is malformed ({}), using defaults", path.display(), e);
                Self::with_defaults()
            }
        }
    }

    /// Override entries from a strategy document. Missing sections,
    /// textures, buckets and empty entries leave the current entry alone.
    pub fn overlay_json(&mut self, json: &str) -> GtoResult<usize> {
        let doc: RawDocument = serde_json::from_str(json)?;
        let strategies = &doc.strategies;

        let oop = walk_section(&strategies.oop, "OOP", |t, b, d| {
            self.first_action.insert((Role::Oop, t, b), d);
        });
        let ip = walk_section(&strategies.ip, "IP", |t, b, d| {
            self.first_action.insert((Role::Ip, t, b), d);
        });
        let facing = walk_section(&strategies.facing_bet, "FACING_BET", |t, b, d| {
            self.facing_bet.insert((t, b), d);
        });
        log::info!(
            "strategy document applied: {} OOP, {} IP, {} facing-bet entries",
            oop,
            ip,
            facing
        );
        Ok(oop + ip + facing)
    }

    pub fn set(&mut self, role: Role, texture: Texture, bucket: Bucket, facing_bet: bool, dist: ActionDistribution) {
        if facing_bet {
            self.facing_bet.insert((texture, bucket), dist);
        } else {
            self.first_action.insert((role, texture, bucket), dist);
        }
    }

    /// Strategy for a spot. The facing-bet table ignores `role`.
    pub fn lookup(&self, role: Role, texture: Texture, bucket: Bucket, facing_bet: bool) -> ActionDistribution {
        let found = if facing_bet {
            self.facing_bet.get(&(texture, bucket))
        } else {
            self.first_action.get(&(role, texture, bucket))
        };
        match found {
            Some(dist) if !dist.is_empty() => dist.clone(),
            _ if facing_bet => fallback_facing_bet(),
            _ => fallback_first_action(),
        }
    }

    /// Strategy for every bucket in one context, strongest bucket first.
    pub fn range_breakdown(&self, role: Role, texture: Texture, facing_bet: bool) -> Vec<(Bucket, ActionDistribution)> {
        ALL_BUCKETS
            .iter()
            .map(|&b| (b, self.lookup(role, texture, b, facing_bet)))
            .collect()
    }

    /// Every stored distribution, for validation and reporting.
    pub fn entries(&self) -> impl Iterator<Item = &ActionDistribution> {
        self.first_action.values().chain(self.facing_bet.values())
    }

    pub fn len(&self) -> usize {
        self.first_action.len() + self.facing_bet.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_replaces_only_present_entries() {
        let json = r#"{"strategies": {"OOP": {"low_dry": {"air": {"check": 1.0}, "nut": {}}}}}"#;
        let table = StrategyTable::from_json_str(json).unwrap();
        let air = table.lookup(Role::Oop, Texture::LowDry, Bucket::Air, false);
        assert_eq!(air, ActionDistribution::pure(Action::Check));
        let nut = table.lookup(Role::Oop, Texture::LowDry, Bucket::Nut, false);
        assert_eq!(nut, oop_default(Bucket::Nut));
    }

    #[test]
    fn unknown_keys_are_skipped() {
        let json = r#"{"strategies": {"IP": {"high_dry": {"air": {"check": 1.0}},
                       "paired": {"mystery": {"check": 1.0}, "air": {"shove": 1.0}}}}}"#;
        let table = StrategyTable::from_json_str(json).unwrap();
        assert_eq!(
            table.lookup(Role::Ip, Texture::Paired, Bucket::Air, false),
            ip_default(Bucket::Air)
        );
    }
}
