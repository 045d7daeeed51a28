use std::collections::HashSet;

use crate::cards::{all_hand_keys, expand_hand_key, rank_index, Card, RANKS_STR};
use crate::error::{GtoError, GtoResult};

/// Total two-card combinations in a 52-card deck.
pub const TOTAL_COMBOS: f64 = 1326.0;

pub fn combo_count(notation: &str) -> u32 {
    let chars: Vec<char> = notation.chars().collect();
    if chars.len() == 2 && chars[0] == chars[1] {
        return 6;
    }
    if chars.len() == 3 {
        if chars[2] == 's' {
            return 4;
        }
        if chars[2] == 'o' {
            return 12;
        }
    }
    0
}

/// Expand range notation ("66+, A8s+, A5s-A4s, KQo") into canonical keys,
/// returned in grid order. Unknown tokens are rejected.
pub fn parse_range(range_str: &str) -> GtoResult<Vec<String>> {
    let mut hands = HashSet::new();
    for part in range_str.replace(' ', "").split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let expanded = if let Some(base) = part.strip_suffix('+') {
            expand_plus(base)
        } else if part.contains('-') && part.len() > 3 {
            expand_dash(part)
        } else {
            vec![part.to_string()]
        };
        for h in expanded {
            if combo_count(&h) == 0 || expand_hand_key(&h).is_err() {
                return Err(GtoError::InvalidHandNotation(part.to_string()));
            }
            hands.insert(h);
        }
    }
    let grid = all_hand_keys();
    let mut result: Vec<String> = hands.into_iter().collect();
    result.sort_by_key(|h| grid.iter().position(|k| k == h).unwrap_or(grid.len()));
    Ok(result)
}

fn expand_plus(base: &str) -> Vec<String> {
    let chars: Vec<char> = base.chars().collect();
    let ranks: Vec<char> = RANKS_STR.chars().collect();

    // Pair: "TT+"
    if chars.len() == 2 && chars[0] == chars[1] {
        if let Some(rank_idx) = rank_index(chars[0]) {
            return (rank_idx..ranks.len())
                .map(|i| format!("{}{}", ranks[i], ranks[i]))
                .collect();
        }
        return vec![base.to_string()];
    }

    // Suited/offsuit: "ATs+" climbs the kicker up to one below the top card
    if chars.len() == 3 {
        let (high, low, kind) = (chars[0], chars[1], chars[2]);
        if let (Some(low_idx), Some(high_idx)) = (rank_index(low), rank_index(high)) {
            return (low_idx..high_idx)
                .map(|i| format!("{}{}{}", high, ranks[i], kind))
                .collect();
        }
    }

    vec![base.to_string()]
}

fn expand_dash(range_str: &str) -> Vec<String> {
    let Some((start, end)) = range_str.split_once('-') else {
        return vec![range_str.to_string()];
    };
    let start_chars: Vec<char> = start.chars().collect();
    let end_chars: Vec<char> = end.chars().collect();
    let ranks: Vec<char> = RANKS_STR.chars().collect();

    // Pair range: "77-TT"
    if start_chars.len() == 2
        && end_chars.len() == 2
        && start_chars[0] == start_chars[1]
        && end_chars[0] == end_chars[1]
    {
        if let (Some(si), Some(ei)) = (rank_index(start_chars[0]), rank_index(end_chars[0])) {
            let (lo, hi) = (si.min(ei), si.max(ei));
            return (lo..=hi).map(|i| format!("{}{}", ranks[i], ranks[i])).collect();
        }
    }

    // Suited/offsuit range: "A5s-A2s"
    if start_chars.len() == 3
        && end_chars.len() == 3
        && start_chars[0] == end_chars[0]
        && start_chars[2] == end_chars[2]
    {
        let (high, kind) = (start_chars[0], start_chars[2]);
        if let (Some(si), Some(ei)) = (rank_index(start_chars[1]), rank_index(end_chars[1])) {
            let (lo, hi) = (si.min(ei), si.max(ei));
            return (lo..=hi)
                .map(|i| format!("{}{}{}", high, ranks[i], kind))
                .collect();
        }
    }

    vec![range_str.to_string()]
}

pub fn total_combos<S: AsRef<str>>(hands: &[S]) -> u32 {
    hands.iter().map(|h| combo_count(h.as_ref())).sum()
}

/// Share of all 1326 starting combos covered by `hands`, in percent.
pub fn range_pct<S: AsRef<str>>(hands: &[S]) -> f64 {
    total_combos(hands) as f64 / TOTAL_COMBOS * 100.0
}

/// Concrete combos of `key` that share no card with `dead`.
pub fn live_combos(key: &str, dead: &[Card]) -> GtoResult<Vec<(Card, Card)>> {
    Ok(expand_hand_key(key)?
        .into_iter()
        .filter(|(c1, c2)| !dead.contains(c1) && !dead.contains(c2))
        .collect())
}
