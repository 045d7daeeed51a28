use std::io::{self, BufRead, Write};
use std::sync::Arc;

use colored::Colorize;
use rand::Rng;

use crate::display::{board_display, breakdown_table, review_report, styled_action, weighted_range_grid};
use crate::drill::{generate_postflop, generate_preflop, grade, Drill, Grade, Verdict};
use crate::engine::Engine;
use crate::error::GtoResult;
use crate::simulate::{autopilot, HeroView, Session};
use crate::strategy::Action;

/// Which drills to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum DrillKind {
    Preflop,
    Postflop,
    Mixed,
}

/// Running score for a drill session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrillScore {
    pub attempted: u32,
    pub primary: u32,
    pub acceptable: u32,
}

impl DrillScore {
    pub fn record(&mut self, grade: &Grade) {
        self.attempted += 1;
        match grade.verdict {
            Verdict::Primary => self.primary += 1,
            Verdict::Acceptable => self.acceptable += 1,
            Verdict::Wrong => {}
        }
    }

    pub fn correct(&self) -> u32 {
        self.primary + self.acceptable
    }

    pub fn accuracy(&self) -> f64 {
        if self.attempted == 0 {
            0.0
        } else {
            self.correct() as f64 / self.attempted as f64
        }
    }
}

// ---------------------------------------------------------------------------
// Input helpers
// ---------------------------------------------------------------------------

fn prompt(message: &str, default: Option<&str>, reader: &mut dyn BufRead, writer: &mut dyn Write) -> String {
    if let Some(d) = default {
        write!(writer, "{} [{}]: ", message, d).ok();
    } else {
        write!(writer, "{}: ", message).ok();
    }
    writer.flush().ok();

    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) => "q".to_string(),
        Ok(_) => {
            let trimmed = line.trim().to_string();
            if trimmed.is_empty() {
                default.unwrap_or("").to_string()
            } else {
                trimmed
            }
        }
        Err(_) => "q".to_string(),
    }
}

/// Numbered action menu. Accepts the number, the short name ("bet_m") or a
/// prefix of the label. `None` means quit.
fn prompt_action(options: &[Action], reader: &mut dyn BufRead, writer: &mut dyn Write) -> Option<Action> {
    for (i, opt) in options.iter().enumerate() {
        writeln!(writer, "    {}  {}", format!("{}.", i + 1).bold(), styled_action(*opt)).ok();
    }
    loop {
        let answer = prompt("  Your action", None, reader, writer).to_lowercase();
        if answer == "q" || answer == "quit" {
            return None;
        }
        if let Ok(n) = answer.parse::<usize>() {
            if (1..=options.len()).contains(&n) {
                return Some(options[n - 1]);
            }
        }
        if let Ok(a) = answer.parse::<Action>() {
            if options.contains(&a) {
                return Some(a);
            }
        }
        if let Some(&a) = options
            .iter()
            .find(|a| !answer.is_empty() && a.label().to_lowercase().starts_with(&answer))
        {
            return Some(a);
        }
        writeln!(writer, "  {}", "Pick one of the listed actions.".yellow()).ok();
    }
}

// ---------------------------------------------------------------------------
// Drills
// ---------------------------------------------------------------------------

pub fn drill_command<R: Rng>(engine: &Engine, kind: DrillKind, count: Option<u32>, rng: &mut R) -> GtoResult<DrillScore> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut reader = stdin.lock();
    let mut writer = stdout.lock();
    run_drills(engine, kind, count, rng, &mut reader, &mut writer)
}

fn describe_drill(drill: &Drill, writer: &mut dyn Write) {
    writeln!(writer, "\n  {}", drill.situation().cyan().bold()).ok();
    writeln!(writer, "  Hand:  {}", board_display(drill.hand())).ok();
    if let Drill::Postflop { board, pot, facing_bet, .. } = drill {
        writeln!(writer, "  Board: {}", board_display(board)).ok();
        if *facing_bet {
            writeln!(writer, "  Pot:   {:.0} bb, villain bets", pot).ok();
        } else {
            writeln!(writer, "  Pot:   {:.0} bb", pot).ok();
        }
    }
}

fn show_grade(drill: &Drill, grade: &Grade, writer: &mut dyn Write) {
    let headline = match grade.verdict {
        Verdict::Primary => "\u{2713}".green().bold(),
        Verdict::Acceptable => "~".yellow().bold(),
        Verdict::Wrong => "\u{2717}".red().bold(),
    };
    writeln!(writer, "\n  {} {}", headline, grade.explanation).ok();
    if let Drill::Postflop { breakdown, bucket, .. } = drill {
        writeln!(writer, "{}", breakdown_table(breakdown, &drill.actions(), Some(*bucket))).ok();
    }
}

/// Serve drills until `count` is reached or the player quits.
pub fn run_drills<R: Rng>(
    engine: &Engine,
    kind: DrillKind,
    count: Option<u32>,
    rng: &mut R,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> GtoResult<DrillScore> {
    writeln!(writer).ok();
    writeln!(writer, "{}", "GTO Drills".cyan().bold()).ok();
    writeln!(writer, "Type {} at any prompt to quit.", "'q'".bold()).ok();

    let mut score = DrillScore::default();
    while count.map_or(true, |n| score.attempted < n) {
        let postflop = match kind {
            DrillKind::Preflop => false,
            DrillKind::Postflop => true,
            DrillKind::Mixed => rng.gen_bool(0.5),
        };
        let drill = if postflop {
            generate_postflop(engine, rng)?
        } else {
            generate_preflop(engine, rng)?
        };

        describe_drill(&drill, writer);
        let Some(answer) = prompt_action(&drill.actions(), reader, writer) else {
            break;
        };
        let result = grade(&drill, answer);
        show_grade(&drill, &result, writer);
        score.record(&result);
        log::debug!("drill {:?}: answered {} -> {:?}", drill.situation(), answer, result.verdict);
    }

    writeln!(
        writer,
        "\n  Score: {}/{} ({:.0}%)",
        score.correct(),
        score.attempted,
        score.accuracy() * 100.0
    )
    .ok();
    Ok(score)
}

// ---------------------------------------------------------------------------
// Table play
// ---------------------------------------------------------------------------

pub fn table_command<R: Rng>(engine: Arc<Engine>, rng: R, num_players: usize, hands: u32) -> GtoResult<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut reader = stdin.lock();
    let mut writer = stdout.lock();
    run_table_session(engine, rng, num_players, hands, &mut reader, &mut writer)
}

fn show_view(view: &HeroView<'_>, writer: &mut dyn Write) {
    let state = view.state;
    let me = &state.players[view.seat];
    writeln!(
        writer,
        "\n  {} {}  {}  pot {:.1} bb  stack {:.1} bb",
        state.street.as_str().to_uppercase().bold(),
        me.position,
        board_display(&me.hole),
        state.pot,
        me.stack
    )
    .ok();
    if !state.visible_board().is_empty() {
        writeln!(writer, "  Board: {}", board_display(state.visible_board())).ok();
    }
    let owed = state.owed(view.seat);
    if owed > 0.0 {
        writeln!(writer, "  {:.1} bb to call", owed).ok();
    }
}

/// Play `hands` hands at an `num_players` table, the player choosing the
/// hero's actions. Returns once all hands are done or the player quits.
pub fn run_table_session<R: Rng>(
    engine: Arc<Engine>,
    rng: R,
    num_players: usize,
    hands: u32,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> GtoResult<()> {
    writeln!(writer).ok();
    writeln!(writer, "{}", "GTO Table".cyan().bold()).ok();
    writeln!(writer, "Type {} at any prompt to quit.", "'q'".bold()).ok();

    let mut session = Session::new(engine, rng, num_players)?;
    let mut quit = false;
    for _ in 0..hands {
        let record = session.play_hand(&mut |view: &HeroView<'_>| {
            if quit {
                return autopilot(view);
            }
            show_view(view, writer);
            match prompt_action(&view.legal, reader, writer) {
                Some(action) => {
                    if action != view.gto_action {
                        writeln!(writer, "  Reference play: {}", styled_action(view.gto_action)).ok();
                    }
                    action
                }
                None => {
                    quit = true;
                    autopilot(view)
                }
            }
        })?;

        let result = format!("{:+.2} bb", record.result_bb);
        let result = if record.result_bb >= 0.0 { result.green() } else { result.red() };
        writeln!(writer, "\n  Hand #{} {}: {}", record.hand_number, record.hero_key, result.bold()).ok();
        let threshold = session.engine().config.significance_threshold;
        for (seat, est) in session.ranges() {
            let stats = est.stats(threshold);
            writeln!(
                writer,
                "  Seat {} ({}): {} hands, {:.1}% of range",
                seat,
                est.position(),
                stats.significant,
                stats.percentage
            )
            .ok();
        }
        if let Some((_, est)) = session.ranges().first() {
            writeln!(writer, "{}", weighted_range_grid(est, threshold, "Estimated range")).ok();
        }
        if quit {
            break;
        }
    }

    writeln!(writer, "\n{}", "Session review".cyan().bold()).ok();
    writeln!(writer, "{}", review_report(&session.review())).ok();
    Ok(())
}
