use std::collections::HashSet;

use colored::Colorize;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::bucket::{Bucket, ALL_BUCKETS};
use crate::cards::{Card, Suit};
use crate::range_analysis::{Advantage, RangeVsRange};
use crate::range_estimator::RangeEstimator;
use crate::review::SessionReview;
use crate::strategy::{Action, ActionDistribution};

const RANGE_GRID_RANKS: [char; 13] = ['A', 'K', 'Q', 'J', 'T', '9', '8', '7', '6', '5', '4', '3', '2'];

fn grid_key(i: usize, j: usize) -> String {
    let (r1, r2) = (RANGE_GRID_RANKS[i], RANGE_GRID_RANKS[j]);
    if i == j {
        format!("{}{}", r1, r2)
    } else if i < j {
        format!("{}{}s", r1, r2)
    } else {
        format!("{}{}o", r2, r1)
    }
}

fn grid<F>(title: &str, mut cell: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("")];
    for &r in &RANGE_GRID_RANKS {
        header.push(Cell::new(r).set_alignment(CellAlignment::Center));
    }
    table.set_header(header);

    for (i, &r1) in RANGE_GRID_RANKS.iter().enumerate() {
        let mut row = vec![Cell::new(format!("{}", r1).bold().to_string())];
        for j in 0..RANGE_GRID_RANKS.len() {
            let hand = grid_key(i, j);
            row.push(Cell::new(cell(&hand)).set_alignment(CellAlignment::Center));
        }
        table.add_row(row);
    }

    format!("  {}\n{}", title.bold(), table)
}

/// 13x13 grid with the listed hands highlighted.
pub fn range_grid<S: AsRef<str>>(hands_in_range: &[S], title: &str) -> String {
    let in_range: HashSet<&str> = hands_in_range.iter().map(|s| s.as_ref()).collect();
    grid(title, |hand| {
        if in_range.contains(hand) {
            hand.green().bold().to_string()
        } else {
            hand.dimmed().to_string()
        }
    })
}

/// 13x13 grid shaded by the estimator's weight for each hand. Weights at or
/// below `threshold` are dimmed.
pub fn weighted_range_grid(estimator: &RangeEstimator, threshold: f64, title: &str) -> String {
    grid(title, |hand| {
        let w = estimator.weight(hand);
        if w >= 0.75 {
            hand.green().bold().to_string()
        } else if w >= 0.4 {
            hand.yellow().to_string()
        } else if w > threshold {
            hand.red().to_string()
        } else {
            hand.dimmed().to_string()
        }
    })
}

pub fn equity_bar(equity: f64, width: usize) -> String {
    let filled = ((equity.clamp(0.0, 1.0) * width as f64) as usize).min(width);
    let bar: String = "\u{2588}".repeat(filled) + &"\u{2591}".repeat(width - filled);
    let pct = format!("{:.1}%", equity * 100.0);

    if equity >= 0.6 {
        format!("{} {}", bar.green(), pct)
    } else if equity >= 0.4 {
        format!("{} {}", bar.yellow(), pct)
    } else {
        format!("{} {}", bar.red(), pct)
    }
}

pub fn board_display(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|card| {
            let face = format!("{}{}", card.rank.to_char(), card.suit.symbol());
            match card.suit {
                Suit::Spades => face.white().to_string(),
                Suit::Hearts => face.red().to_string(),
                Suit::Diamonds => face.blue().to_string(),
                Suit::Clubs => face.green().to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn styled_action(action: Action) -> String {
    let label = action.label().to_uppercase();
    match action {
        Action::Raise | Action::BetSmall | Action::BetMedium | Action::BetLarge => label.red().bold().to_string(),
        Action::Call => label.green().bold().to_string(),
        Action::Fold => label.dimmed().bold().to_string(),
        Action::Check => label.yellow().bold().to_string(),
    }
}

/// One row per action, most frequent first.
pub fn strategy_table(dist: &ActionDistribution) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Action").set_alignment(CellAlignment::Left),
        Cell::new("Frequency").set_alignment(CellAlignment::Right),
        Cell::new(""),
    ]);

    for (action, p) in dist.sorted() {
        table.add_row(vec![
            Cell::new(styled_action(action)),
            Cell::new(format!("{:.0}%", p * 100.0)).set_alignment(CellAlignment::Right),
            Cell::new("\u{2588}".repeat((p * 20.0).round() as usize)),
        ]);
    }

    table.to_string()
}

/// Buckets down, `actions` across.
pub fn breakdown_table(breakdown: &[(Bucket, ActionDistribution)], actions: &[Action], highlight: Option<Bucket>) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("Hand")];
    for &a in actions {
        header.push(Cell::new(a.label()).set_alignment(CellAlignment::Right));
    }
    table.set_header(header);

    for (bucket, dist) in breakdown {
        let name = if Some(*bucket) == highlight {
            format!("> {}", bucket.label()).cyan().bold().to_string()
        } else {
            bucket.label().to_string()
        };
        let mut row = vec![Cell::new(name)];
        for &a in actions {
            let p = dist.prob(a);
            let text = if p > 0.0 { format!("{:.0}%", p * 100.0) } else { "-".to_string() };
            row.push(Cell::new(text).set_alignment(CellAlignment::Right));
        }
        table.add_row(row);
    }

    table.to_string()
}

pub fn range_vs_range_report(rvr: &RangeVsRange) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Bucket"),
        Cell::new(format!("Hero ({})", rvr.hero_role)).set_alignment(CellAlignment::Right),
        Cell::new(format!("Villain ({})", rvr.hero_role.other())).set_alignment(CellAlignment::Right),
    ]);
    for &b in &ALL_BUCKETS {
        let (h, v) = (rvr.hero_dist[b.index()], rvr.villain_dist[b.index()]);
        if h < 0.0005 && v < 0.0005 {
            continue;
        }
        table.add_row(vec![
            Cell::new(b.label()),
            Cell::new(format!("{:.1}%", h * 100.0)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.1}%", v * 100.0)).set_alignment(CellAlignment::Right),
        ]);
    }

    let verdict = match rvr.advantage {
        Advantage::Hero => rvr.advantage.to_string().green().bold(),
        Advantage::Villain => rvr.advantage.to_string().red().bold(),
        Advantage::Even => rvr.advantage.to_string().yellow().bold(),
    };
    format!(
        "{}\n  Hero    {}\n  Villain {}\n  {} ({:.1} pts)",
        table,
        equity_bar(rvr.hero_equity, 30),
        equity_bar(rvr.villain_equity(), 30),
        verdict,
        rvr.magnitude * 100.0
    )
}

pub fn review_report(review: &SessionReview) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Metric").set_alignment(CellAlignment::Left),
        Cell::new("Value").set_alignment(CellAlignment::Right),
    ]);

    let signed = |v: f64| {
        let s = format!("{:+.2} bb", v);
        if v >= 0.0 {
            s.green().to_string()
        } else {
            s.red().to_string()
        }
    };
    table.add_row(vec![Cell::new("Hands".bold().to_string()), Cell::new(review.hands_played)]);
    table.add_row(vec![Cell::new("Total".bold().to_string()), Cell::new(signed(review.total_pl))]);
    table.add_row(vec![Cell::new("Per hand".bold().to_string()), Cell::new(signed(review.bb_per_hand))]);
    table.add_row(vec![Cell::new("Biggest win".bold().to_string()), Cell::new(signed(review.biggest_win))]);
    table.add_row(vec![Cell::new("Biggest loss".bold().to_string()), Cell::new(signed(review.biggest_loss))]);

    let mut out = table.to_string();
    if review.top_mistakes.is_empty() {
        out.push_str(&format!("\n  {}", "No significant mistakes.".green()));
    } else {
        out.push_str(&format!("\n  {}", "Top mistakes".bold()));
        for m in &review.top_mistakes {
            out.push_str(&format!(
                "\n    #{} {} {}: played {}, prefer {} (deviation {:.2})",
                m.hand_number,
                m.hero_key,
                m.street,
                styled_action(m.action),
                styled_action(m.gto_action),
                m.deviation
            ));
        }
    }
    out
}

pub fn print_section(title: &str, content: &str) {
    println!("\n{}", title.cyan().bold());
    println!("  {}", content);
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "Error:".red().bold(), msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_keys_follow_chart_layout() {
        assert_eq!(grid_key(0, 0), "AA");
        assert_eq!(grid_key(0, 1), "AKs");
        assert_eq!(grid_key(1, 0), "AKo");
        assert_eq!(grid_key(12, 11), "32o");
    }

    #[test]
    fn equity_bar_is_full_width() {
        colored::control::set_override(false);
        let bar = equity_bar(0.5, 10);
        assert!(bar.ends_with("50.0%"));
        assert_eq!(bar.chars().filter(|&c| c == '\u{2588}').count(), 5);
        assert_eq!(bar.chars().filter(|&c| c == '\u{2591}').count(), 5);
    }
}
