//! Command-line driver for the Save-the-King engine.
//!
//! Builds a board from a placement string and either prints the engine's
//! choice for one side, prints the evaluation terms, or plays a match against
//! itself through the same controller the game uses.

mod config;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use config::BotConfig;
use serde::Serialize;
use solo_core::{Color, Placement};
use solo_engine::eval::breakdown;
use solo_engine::{
    encode, legal_moves, Board, Controller, Difficulty, GameState, MatchMode, SearchResult,
    Searcher,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Classic layout with White on row 0 advancing toward the last row.
const DEFAULT_PLACEMENT: &str = "RNBQKBNR/PPPPPPPP/8/8/8/8/pppppppp/rnbqkbnr";

#[derive(Parser)]
#[command(name = "solo-bot")]
#[command(about = "Save-the-King engine driver")]
struct Cli {
    /// Config file (TOML with [search] and [match] tables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct BoardArgs {
    /// Board layout, rows separated by '/', row 0 first
    #[arg(short, long, default_value = DEFAULT_PLACEMENT)]
    placement: String,
    /// Search depth in plies (overrides config and difficulty)
    #[arg(short, long)]
    depth: Option<u32>,
    /// Engine strength: easy, normal, or hard
    #[arg(long)]
    difficulty: Option<Difficulty>,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the engine's best move for one side
    BestMove {
        #[command(flatten)]
        board: BoardArgs,
        /// Side to search for
        #[arg(long, default_value = "white")]
        color: Color,
    },
    /// Print the evaluation terms for one side
    Evaluate {
        #[command(flatten)]
        board: BoardArgs,
        #[arg(long, default_value = "white")]
        color: Color,
    },
    /// Let the engine play both sides
    SelfPlay {
        #[command(flatten)]
        board: BoardArgs,
        /// Stop after this many plies
        #[arg(long, default_value = "40")]
        plies: u32,
        /// Match rules: solo or versus
        #[arg(long)]
        mode: Option<MatchMode>,
    },
}

#[derive(Serialize)]
struct BestMoveReport {
    #[serde(flatten)]
    result: SearchResult,
    notation: Option<String>,
}

#[derive(Serialize)]
struct SelfPlayReport {
    result: Option<String>,
    moves: Vec<String>,
    score: u32,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_path = cli.config.unwrap_or_else(BotConfig::default_path);
    let mut config = BotConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;

    match cli.command {
        Commands::BestMove { board, color } => {
            apply_overrides(&mut config, &board);
            let position = load_board(&board.placement)?;
            let mut searcher =
                Searcher::from_config(&config.search, config.match_config.difficulty);
            let result = searcher.search(&position, color);
            let notation = result
                .best
                .map(|m| encode(m.kind, m.start, m.end, m.is_capture, m.is_en_passant));

            if board.json {
                let report = BestMoveReport { result, notation };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                match (result.best, notation) {
                    (Some(m), Some(text)) => {
                        println!("{} ({}), score {}, {} nodes", text, m, result.score, result.nodes)
                    }
                    _ => println!("no move for {}", color),
                }
            }
        }
        Commands::Evaluate { board, color } => {
            let position = load_board(&board.placement)?;
            let terms = breakdown(&position, color);
            if board.json {
                println!("{}", serde_json::to_string_pretty(&terms)?);
            } else {
                print!("{}", position);
                println!("material        {:>6}", terms.material);
                println!("king safety     {:>6}", terms.king_safety);
                println!("pawn structure  {:>6}", terms.pawn_structure);
                println!("mobility        {:>6}", terms.mobility);
                println!("activity        {:>6}", terms.activity);
                println!("total           {:>6}", terms.total());
            }
        }
        Commands::SelfPlay { board, plies, mode } => {
            apply_overrides(&mut config, &board);
            if let Some(mode) = mode {
                config.match_config.mode = mode;
            }
            let report = self_play(&config, &board.placement, plies)?;
            if board.json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for line in &report.moves {
                    println!("{}", line);
                }
                match &report.result {
                    Some(result) => println!("result: {} (score {})", result, report.score),
                    None => println!("unfinished after {} plies (score {})", plies, report.score),
                }
            }
        }
    }

    Ok(())
}

fn apply_overrides(config: &mut BotConfig, args: &BoardArgs) {
    if let Some(difficulty) = args.difficulty {
        config.match_config.difficulty = difficulty;
    }
    if args.depth.is_some() {
        config.search.depth = args.depth;
    }
}

fn load_board(placement: &str) -> Result<Board> {
    let placement =
        Placement::parse(placement).with_context(|| format!("invalid placement {:?}", placement))?;
    Ok(Board::from_placement(&placement)?)
}

/// Plays White with a searcher of its own and lets the controller answer
/// for Black.
fn self_play(config: &BotConfig, placement: &str, plies: u32) -> Result<SelfPlayReport> {
    let board = load_board(placement)?;
    let state = GameState::new(config.match_config);
    let mut white = Searcher::from_config(&config.search, config.match_config.difficulty);
    let mut controller = Controller::new(board, state, config.search);

    for _ in 0..plies {
        if controller.is_finished() {
            break;
        }
        let played = match controller.side_to_move() {
            Color::White => {
                let Some(m) = pick_white_move(&mut white, controller.board()) else {
                    break;
                };
                controller.play_move(m.start, m.end)
            }
            Color::Black => controller.play_engine_turn(),
        };
        if played.is_none() {
            bail!("no move was played with {} to move", controller.side_to_move());
        }
    }

    Ok(SelfPlayReport {
        result: controller.result().map(|r| format!("{:?}", r)),
        moves: controller
            .state()
            .pgn()
            .to_text()
            .lines()
            .map(str::to_string)
            .collect(),
        score: controller.state().score(),
    })
}

fn pick_white_move(searcher: &mut Searcher, board: &Board) -> Option<solo_core::Move> {
    let legal = legal_moves(board, Color::White);
    match searcher.get_best_move(board, Color::White) {
        Some(m) if legal.contains(&m) => Some(m),
        _ => legal.first().copied(),
    }
}
