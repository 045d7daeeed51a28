use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{GtoError, GtoResult};
use crate::ranges::parse_range;
use crate::strategy::Action;

static RANGES_6MAX_JSON: &str = include_str!("../data/ranges_6max.json");

// ---------------------------------------------------------------------------
// Positions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Position {
    Utg,
    Mp,
    Co,
    Btn,
    Sb,
    Bb,
}

/// Preflop action order at a full 6-max table.
pub const POSITIONS_6MAX: [Position; 6] = [
    Position::Utg,
    Position::Mp,
    Position::Co,
    Position::Btn,
    Position::Sb,
    Position::Bb,
];

/// Positions that can open the pot.
pub const RFI_POSITIONS: [Position; 5] = [
    Position::Utg,
    Position::Mp,
    Position::Co,
    Position::Btn,
    Position::Sb,
];

impl Position {
    pub fn as_str(self) -> &'static str {
        match self {
            Position::Utg => "UTG",
            Position::Mp => "MP",
            Position::Co => "CO",
            Position::Btn => "BTN",
            Position::Sb => "SB",
            Position::Bb => "BB",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Position {
    type Err = GtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        POSITIONS_6MAX
            .iter()
            .copied()
            .find(|p| p.as_str() == upper)
            .ok_or_else(|| GtoError::UnknownPosition(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Chart file
// ---------------------------------------------------------------------------

#[derive(Deserialize, Debug)]
struct RfiEntry {
    #[serde(rename = "raise")]
    raise_range: String,
}

#[derive(Deserialize, Debug)]
struct VsRfiEntry {
    #[serde(default)]
    call: String,
    #[serde(rename = "3bet", default)]
    three_bet: String,
}

#[derive(Deserialize, Debug)]
struct RangeData {
    #[serde(rename = "RFI")]
    rfi: HashMap<String, RfiEntry>,
    #[serde(rename = "vs_RFI", default)]
    vs_rfi: HashMap<String, VsRfiEntry>,
}

#[derive(Deserialize, Debug)]
struct RangeFile6Max {
    #[serde(rename = "6max")]
    data: RangeData,
}

// ---------------------------------------------------------------------------
// Charts
// ---------------------------------------------------------------------------

/// Continuing ranges for one responder against one opener.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacingRange {
    pub call: HashSet<String>,
    pub raise: HashSet<String>,
}

impl FacingRange {
    pub fn continues(&self, key: &str) -> bool {
        self.call.contains(key) || self.raise.contains(key)
    }
}

/// Static preflop charts, parsed once and owned by the engine.
#[derive(Debug, Clone)]
pub struct PreflopCharts {
    rfi: HashMap<Position, HashSet<String>>,
    facing: BTreeMap<(Position, Position), FacingRange>,
}

fn parse_set(notation: &str) -> GtoResult<HashSet<String>> {
    Ok(parse_range(notation)?.into_iter().collect())
}

impl PreflopCharts {
    /// The charts compiled into the binary.
    pub fn embedded() -> GtoResult<Self> {
        Self::from_json_str(RANGES_6MAX_JSON)
    }

    pub fn from_json_str(json: &str) -> GtoResult<Self> {
        let file: RangeFile6Max = serde_json::from_str(json)?;
        let mut rfi = HashMap::new();
        for (pos, entry) in &file.data.rfi {
            rfi.insert(pos.parse::<Position>()?, parse_set(&entry.raise_range)?);
        }

        let mut facing = BTreeMap::new();
        for (key, entry) in &file.data.vs_rfi {
            let (hero, opener) = key
                .split_once("_vs_")
                .ok_or_else(|| GtoError::InvalidValue(format!("bad facing key '{}'", key)))?;
            facing.insert(
                (hero.parse::<Position>()?, opener.parse::<Position>()?),
                FacingRange {
                    call: parse_set(&entry.call)?,
                    raise: parse_set(&entry.three_bet)?,
                },
            );
        }
        log::debug!("preflop charts: {} opening ranges, {} facing tables", rfi.len(), facing.len());
        Ok(PreflopCharts { rfi, facing })
    }

    /// Opening range for `position`. BB's entry is its defending range and
    /// only serves as its prior.
    pub fn opening_range(&self, position: Position) -> Option<&HashSet<String>> {
        self.rfi.get(&position)
    }

    pub fn in_opening_range(&self, position: Position, key: &str) -> bool {
        self.opening_range(position).is_some_and(|r| r.contains(key))
    }

    /// Facing table for `responder` against `opener`, if one exists.
    pub fn facing(&self, responder: Position, opener: Position) -> Option<&FacingRange> {
        self.facing.get(&(responder, opener))
    }

    /// Exact table when present, otherwise the first table for `responder`.
    pub fn facing_or_nearest(&self, responder: Position, opener: Position) -> Option<&FacingRange> {
        self.facing(responder, opener).or_else(|| {
            self.facing
                .iter()
                .find(|((r, _), _)| *r == responder)
                .map(|(_, table)| table)
        })
    }

    /// Every (responder, opener) pair that has a facing table.
    pub fn matchups(&self) -> Vec<(Position, Position)> {
        self.facing.keys().copied().collect()
    }

    /// Opener facing a re-raise: continue with the hands the chart would
    /// re-raise with against that player, fold the rest. Early openers have
    /// no table of their own and use the re-raiser's value range instead.
    pub fn versus_reraise(&self, position: Position, key: &str, reraiser: Position) -> Action {
        let table = self
            .facing(position, reraiser)
            .or_else(|| self.facing(reraiser, position))
            .or_else(|| self.facing_or_nearest(position, reraiser));
        match table {
            Some(table) if table.raise.contains(key) => Action::Call,
            _ => Action::Fold,
        }
    }

    /// Chart answer for `key` at `position`: open-or-fold when `opener` is
    /// `None`, otherwise 3-bet, call or fold against that opener.
    pub fn preflop_action(&self, position: Position, key: &str, opener: Option<Position>) -> Action {
        match opener {
            None => {
                let pos = if self.rfi.contains_key(&position) { position } else { Position::Btn };
                if self.in_opening_range(pos, key) {
                    Action::Raise
                } else {
                    Action::Fold
                }
            }
            Some(opener) => match self.facing_or_nearest(position, opener) {
                Some(table) if table.raise.contains(key) => Action::Raise,
                Some(table) if table.call.contains(key) => Action::Call,
                _ => Action::Fold,
            },
        }
    }
}
