use std::path::PathBuf;
use std::sync::Arc;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use comfy_table::{Cell, ContentArrangement, Table};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::bucket::{classify_spot, detect_draw};
use crate::cards::{hand_key, parse_board, parse_hole_cards};
use crate::config::TrainerConfig;
use crate::display::{
    board_display, breakdown_table, print_error, print_section, range_grid, range_vs_range_report, review_report,
    strategy_table, styled_action, weighted_range_grid,
};
use crate::engine::Engine;
use crate::equity::EquityTable;
use crate::error::{GtoError, GtoResult};
use crate::hand_evaluator::evaluate_hand;
use crate::play::{drill_command, table_command, DrillKind};
use crate::preflop::Position;
use crate::range_analysis::range_vs_range;
use crate::range_estimator::{Observation, RangeEstimator};
use crate::ranges::{range_pct, total_combos};
use crate::simulate::{autopilot, Session};
use crate::strategy::{Action, Role, FACING_ACTIONS, FIRST_ACTIONS};
use crate::texture::{classify_texture, Texture};

/// Flops dealt per estimate when the strategy document has no equity data.
const DEFAULT_EQUITY_SAMPLES: usize = 20_000;

#[derive(Parser)]
#[command(name = "gto", version, about = "GTO poker trainer: board textures, hand buckets, strategies, ranges and drills.")]
struct Cli {
    /// Trainer configuration (JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Strategy document (JSON) overriding the built-in defaults.
    #[arg(long, global = true)]
    strategies: Option<PathBuf>,

    /// Seed for every random choice.
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// -v for debug logging, -vv for trace.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Oop,
    Ip,
}

impl From<RoleArg> for Role {
    fn from(r: RoleArg) -> Role {
        match r {
            RoleArg::Oop => Role::Oop,
            RoleArg::Ip => Role::Ip,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a flop's texture
    Texture {
        /// Flop cards, e.g. "Ah Kd 7c"
        board: String,
    },

    /// Classify hole cards on a board into a strength bucket
    Classify {
        /// Hole cards, e.g. "AhKd"
        hand: String,
        board: String,
    },

    /// Look up the strategy for a hand on a board
    Strategy {
        hand: String,
        board: String,
        #[arg(short, long, value_enum, default_value = "oop")]
        role: RoleArg,
        /// Acting player faces a bet
        #[arg(short, long)]
        facing: bool,
    },

    /// Preflop charts, narrowed range estimates, or range-vs-range equity
    Range {
        /// Position whose chart or estimate to show
        position: Option<String>,

        /// Show the facing-open table against this opener
        #[arg(long)]
        vs: Option<String>,

        /// Narrow with this preflop action (raise, call, fold)
        #[arg(long)]
        preflop: Option<String>,

        /// Flop for a postflop narrowing step
        #[arg(long)]
        board: Option<String>,

        /// Narrow with this postflop action (check, bet_s, bet_m, bet_l, fold, call, raise)
        #[arg(long)]
        postflop: Option<String>,

        #[arg(short, long, value_enum, default_value = "ip")]
        role: RoleArg,

        /// The postflop action was made facing a bet
        #[arg(short, long)]
        facing: bool,

        /// Compare ranges on this texture instead (e.g. paired, high_dry_A)
        #[arg(short, long)]
        texture: Option<String>,

        /// Monte-Carlo samples for range-vs-range equity
        #[arg(short = 'n', long)]
        samples: Option<usize>,
    },

    /// Play hands against simulated opponents and review the session
    Simulate {
        #[arg(short = 'n', long, default_value = "10")]
        hands: u32,

        #[arg(short, long, default_value = "2")]
        players: usize,

        /// Choose hero actions at the prompt instead of auto-playing
        #[arg(short, long)]
        interactive: bool,
    },

    /// Quiz single decisions
    Drill {
        #[arg(short, long, value_enum, default_value = "mixed")]
        kind: DrillKind,

        /// Stop after this many drills
        #[arg(short = 'n', long)]
        count: Option<u32>,
    },
}

pub fn run() {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    if let Err(e) = dispatch(cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

pub fn run_with_args(args: Vec<String>) -> GtoResult<()> {
    dispatch(Cli::parse_from(args))
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init()
        .ok();
}

fn load_config(cli: &Cli) -> GtoResult<TrainerConfig> {
    let mut config = match &cli.config {
        Some(path) => TrainerConfig::from_file(path)?,
        None => TrainerConfig::default(),
    };
    if cli.strategies.is_some() {
        config.strategy_path = cli.strategies.clone();
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    Ok(config)
}

fn make_rng(config: &TrainerConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

fn dispatch(cli: Cli) -> GtoResult<()> {
    let config = load_config(&cli)?;
    match cli.command {
        Commands::Texture { board } => cmd_texture(&board),
        Commands::Classify { hand, board } => cmd_classify(&hand, &board),
        Commands::Strategy {
            hand,
            board,
            role,
            facing,
        } => cmd_strategy(&Engine::new(config)?, &hand, &board, role.into(), facing),
        Commands::Range {
            position,
            vs,
            preflop,
            board,
            postflop,
            role,
            facing,
            texture,
            samples,
        } => {
            let engine = Engine::new(config)?;
            match (texture, position) {
                (Some(texture), _) => cmd_range_vs_range(&engine, &texture, role.into(), samples),
                (None, Some(position)) => cmd_range(
                    &engine,
                    &position,
                    vs.as_deref(),
                    preflop.as_deref(),
                    board.as_deref(),
                    postflop.as_deref(),
                    role.into(),
                    facing,
                ),
                (None, None) => Err(GtoError::InvalidValue(
                    "give a position, or --texture for range-vs-range".to_string(),
                )),
            }
        }
        Commands::Simulate {
            hands,
            players,
            interactive,
        } => {
            let rng = make_rng(&config);
            let engine = Arc::new(Engine::new(config)?);
            if interactive {
                table_command(engine, rng, players, hands)
            } else {
                cmd_simulate(engine, rng, players, hands)
            }
        }
        Commands::Drill { kind, count } => {
            let mut rng = make_rng(&config);
            let engine = Engine::new(config)?;
            drill_command(&engine, kind, count, &mut rng).map(|_| ())
        }
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

fn cmd_texture(board: &str) -> GtoResult<()> {
    let cards = parse_board(board)?;
    if cards.len() < 3 {
        return Err(GtoError::NotEnoughCards {
            need: 3,
            got: cards.len(),
        });
    }
    let texture = classify_texture(&cards);

    println!();
    println!("  Board:   {}", board_display(&cards));
    println!("  Texture: {} ({})", texture.label().bold(), texture.as_str().dimmed());
    println!();
    Ok(())
}

fn cmd_classify(hand: &str, board: &str) -> GtoResult<()> {
    let hole = parse_hole_cards(hand)?;
    let cards = parse_board(board)?;
    if cards.len() < 3 {
        return Err(GtoError::NotEnoughCards {
            need: 3,
            got: cards.len(),
        });
    }
    let spot = classify_spot(&hole, &cards);
    let made = evaluate_hand(&hole, &cards)?;

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![Cell::new(""), Cell::new("")]);
    table.add_row(vec![
        Cell::new("Hand".bold().to_string()),
        Cell::new(format!("{} ({})", board_display(&hole), hand_key(hole[0], hole[1]))),
    ]);
    table.add_row(vec![Cell::new("Board".bold().to_string()), Cell::new(board_display(&cards))]);
    table.add_row(vec![Cell::new("Made hand".bold().to_string()), Cell::new(made.category.to_string())]);
    table.add_row(vec![Cell::new("Bucket".bold().to_string()), Cell::new(spot.bucket.label())]);
    table.add_row(vec![Cell::new("Texture".bold().to_string()), Cell::new(spot.texture.label())]);
    if let Some(draw) = detect_draw(&hole, &cards) {
        table.add_row(vec![Cell::new("Draw".bold().to_string()), Cell::new(format!("{:?}", draw))]);
    }

    println!();
    println!("{}", table);
    println!();
    Ok(())
}

fn cmd_strategy(engine: &Engine, hand: &str, board: &str, role: Role, facing: bool) -> GtoResult<()> {
    let hole = parse_hole_cards(hand)?;
    let cards = parse_board(board)?;
    if cards.len() < 3 {
        return Err(GtoError::NotEnoughCards {
            need: 3,
            got: cards.len(),
        });
    }
    let spot = classify_spot(&hole, &cards);
    let dist = engine.strategy.lookup(role, spot.texture, spot.bucket, facing);
    let situation = if facing { "facing a bet" } else { "first to act" };

    println!();
    println!("  {} on {}", board_display(&hole), board_display(&cards));
    println!(
        "  {} {}, {} hand on a {} board",
        role.as_str().bold(),
        situation,
        spot.bucket.label(),
        spot.texture.label()
    );
    println!("{}", strategy_table(&dist));

    let correct: Vec<String> = dist.correct_actions().into_iter().map(styled_action).collect();
    print_section("Play", &correct.join(" or "));

    let actions: &[Action] = if facing { &FACING_ACTIONS } else { &FIRST_ACTIONS };
    let breakdown = engine.strategy.range_breakdown(role, spot.texture, facing);
    println!("\n{}", "Whole range".cyan().bold());
    println!("{}", breakdown_table(&breakdown, actions, Some(spot.bucket)));
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn chart_title(label: &str, keys: &[&String]) -> String {
    format!(
        "{} ({} hands, {} combos, {:.1}%)",
        label,
        keys.len(),
        total_combos(keys),
        range_pct(keys)
    )
}

fn cmd_range(
    engine: &Engine,
    position: &str,
    vs: Option<&str>,
    preflop: Option<&str>,
    board: Option<&str>,
    postflop: Option<&str>,
    role: Role,
    facing: bool,
) -> GtoResult<()> {
    let position: Position = position.parse()?;
    let opener = vs.map(str::parse::<Position>).transpose()?;

    if preflop.is_none() && postflop.is_none() {
        println!();
        match opener {
            Some(opener) => {
                let table = engine.charts.facing(position, opener).ok_or_else(|| {
                    GtoError::InvalidValue(format!("no chart for {} facing a {} open", position, opener))
                })?;
                let raise: Vec<&String> = table.raise.iter().collect();
                let call: Vec<&String> = table.call.iter().collect();
                println!("{}", range_grid(&raise, &chart_title(&format!("{} 3-bet vs {}", position, opener), &raise)));
                println!("{}", range_grid(&call, &chart_title(&format!("{} call vs {}", position, opener), &call)));
            }
            None => {
                let keys: Vec<&String> = engine
                    .charts
                    .opening_range(position)
                    .map(|r| r.iter().collect())
                    .unwrap_or_default();
                println!("{}", range_grid(&keys, &chart_title(&format!("{} opening range", position), &keys)));
            }
        }
        return Ok(());
    }

    let mut est = RangeEstimator::new(position, &engine.charts);
    if let Some(action) = preflop {
        let action: Action = action.parse()?;
        est.narrow(engine, &Observation::Preflop { action, opener });
    }
    if let Some(action) = postflop {
        let action: Action = action.parse()?;
        let board = board.ok_or_else(|| GtoError::InvalidValue("--postflop needs --board".to_string()))?;
        let cards = parse_board(board)?;
        if cards.len() < 3 {
            return Err(GtoError::NotEnoughCards {
                need: 3,
                got: cards.len(),
            });
        }
        est.narrow(
            engine,
            &Observation::Postflop {
                action,
                board: cards,
                dead: Vec::new(),
                role,
                facing_bet: facing,
            },
        );
    }

    let stats = est.stats(engine.config.significance_threshold);
    println!();
    println!(
        "{}",
        weighted_range_grid(
            &est,
            engine.config.significance_threshold,
            &format!("{} estimated range", position)
        )
    );
    println!(
        "  {} hands above {:.2} ({:.1}% of all hands)",
        stats.significant, engine.config.significance_threshold, stats.percentage
    );
    let top: Vec<String> = est
        .top_hands(10)
        .into_iter()
        .map(|(k, w)| format!("{} {:.2}", k, w))
        .collect();
    print_section("Heaviest", &top.join(", "));
    Ok(())
}

fn cmd_range_vs_range(engine: &Engine, texture: &str, hero_role: Role, samples: Option<usize>) -> GtoResult<()> {
    let texture: Texture = texture.parse()?;
    let table = match (&engine.config.strategy_path, samples) {
        (Some(path), None) => EquityTable::from_json_str(&std::fs::read_to_string(path)?)?,
        (_, samples) => EquityTable::estimate(
            samples.unwrap_or(DEFAULT_EQUITY_SAMPLES),
            engine.config.min_equity_samples,
            engine.config.seed.unwrap_or(0),
        )?,
    };
    let rvr = range_vs_range(&table, texture, hero_role);

    println!();
    println!("  {} board, hero {}", texture.label().bold(), hero_role);
    println!("{}", range_vs_range_report(&rvr));
    println!();
    Ok(())
}

fn cmd_simulate(engine: Arc<Engine>, rng: StdRng, players: usize, hands: u32) -> GtoResult<()> {
    let mut session = Session::new(engine, rng, players)?;
    for _ in 0..hands {
        let record = session.play_hand(&mut autopilot)?;
        let result = format!("{:+.2} bb", record.result_bb);
        let result = if record.result_bb >= 0.0 { result.green() } else { result.red() };
        println!("  #{:<4} {:<4} {:<4} {}", record.hand_number, record.hero_position, record.hero_key, result);
    }
    println!("\n{}", "Session review".cyan().bold());
    println!("{}", review_report(&session.review()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        std::iter::once("gto".to_string())
            .chain(line.split_whitespace().map(String::from))
            .collect()
    }

    #[test]
    fn texture_command_runs() {
        assert!(run_with_args(args("texture AhKd7c")).is_ok());
    }

    #[test]
    fn short_board_is_rejected() {
        assert!(run_with_args(args("texture AhKd")).is_err());
    }

    #[test]
    fn autopilot_simulation_runs() {
        assert!(run_with_args(args("--seed 9 simulate -n 3 -p 3")).is_ok());
        assert!(run_with_args(args("simulate -n 1 -p 0")).is_err());
        assert!(run_with_args(args("simulate -n 1 -p 7")).is_err());
    }

    #[test]
    fn chart_title_counts_combos() {
        let keys = ["AA".to_string(), "AKs".to_string(), "AKo".to_string()];
        let refs: Vec<&String> = keys.iter().collect();
        assert_eq!(chart_title("BTN opening range", &refs), "BTN opening range (3 hands, 22 combos, 1.7%)");
    }

    #[test]
    fn range_needs_position_or_texture() {
        assert!(run_with_args(args("range")).is_err());
        assert!(run_with_args(args("range BTN --preflop raise")).is_ok());
    }
}
