//! Reversi-MCTS: an Othello move-selection engine.
//!
//! ## Usage
//!
//! - `reversi-mcts` - Show a demo game (MCTS against minimax)
//! - `reversi-mcts console` - Start the text protocol on stdin/stdout
//! - `reversi-mcts selfplay` - Play a series of engine-vs-engine games

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use flexi_logger::Logger;

use reversi_mcts::board::{GameOutcome, Side};
use reversi_mcts::config::SearchConfig;
use reversi_mcts::console::ConsoleEngine;
use reversi_mcts::constants::{DEFAULT_GAME_TIME, MINIMAX_DEPTH, N_SIMS, ROLLOUT_DEPTH};
use reversi_mcts::player::{EngineKind, play_game};

/// Reversi-MCTS: Monte Carlo Tree Search engine for Othello
#[derive(Parser)]
#[command(name = "reversi-mcts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    search: SearchArgs,

    /// Log specification, e.g. "info" or "reversi_mcts=debug"; RUST_LOG wins
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct SearchArgs {
    /// Maximum MCTS simulations per move
    #[arg(long, global = true, default_value_t = N_SIMS)]
    sims: usize,

    /// Hard cap on seconds per move
    #[arg(long, global = true)]
    time: Option<f64>,

    /// UCT exploration constant
    #[arg(long, global = true, default_value_t = std::f64::consts::SQRT_2)]
    exploration: f64,

    /// Ply cap for random playouts
    #[arg(long, global = true, default_value_t = ROLLOUT_DEPTH)]
    rollout_depth: usize,

    /// Alpha-beta depth for the minimax engine
    #[arg(long, global = true, default_value_t = MINIMAX_DEPTH)]
    depth: usize,

    /// Seed for reproducible playouts
    #[arg(long, global = true)]
    seed: Option<u64>,
}

impl SearchArgs {
    fn config(&self) -> Result<SearchConfig> {
        let mut config = SearchConfig::default()
            .with_simulations(self.sims)
            .with_exploration(self.exploration)
            .with_rollout_depth(self.rollout_depth);
        if let Some(secs) = self.time {
            let t = Duration::try_from_secs_f64(secs).context("invalid --time")?;
            config = config.with_move_time(t);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the text protocol server for use with GUIs or by hand
    Console {
        /// Engine answering genmove
        #[arg(long, default_value = "mcts")]
        engine: EngineKind,
    },
    /// Play engine-vs-engine games and report the results
    Selfplay {
        #[arg(long, default_value = "mcts")]
        black: EngineKind,
        #[arg(long, default_value = "minimax")]
        white: EngineKind,
        /// Number of games
        #[arg(long, default_value_t = 1)]
        games: usize,
        /// Seconds on each side's clock per game
        #[arg(long, default_value_t = DEFAULT_GAME_TIME.as_secs_f64())]
        game_time: f64,
        /// Print the board after every move
        #[arg(long)]
        show: bool,
    },
    /// Run a single demo game, MCTS (black) against minimax (white)
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let _logger = Logger::try_with_env_or_str(&cli.log_level)
        .context("invalid log specification")?
        .log_to_stderr()
        .start()
        .context("failed to start logger")?;

    let config = cli.search.config()?;

    match cli.command {
        Some(Commands::Console { engine }) => {
            let mut console = ConsoleEngine::new(engine, config, cli.search.depth);
            console.run().context("console I/O failed")?;
        }
        Some(Commands::Selfplay {
            black,
            white,
            games,
            game_time,
            show,
        }) => {
            let game_time =
                Duration::try_from_secs_f64(game_time).context("invalid --game-time")?;
            run_selfplay(black, white, games, game_time, show, &config, cli.search.depth)?;
        }
        Some(Commands::Demo) | None => {
            run_selfplay(
                EngineKind::Mcts,
                EngineKind::Minimax,
                1,
                DEFAULT_GAME_TIME,
                true,
                &config,
                cli.search.depth,
            )?;
        }
    }

    Ok(())
}

fn run_selfplay(
    black: EngineKind,
    white: EngineKind,
    games: usize,
    game_time: Duration,
    show: bool,
    config: &SearchConfig,
    depth: usize,
) -> Result<()> {
    println!("Reversi-MCTS: {black} (X) vs {white} (O), {games} game(s)\n");

    let (mut black_wins, mut white_wins, mut draws) = (0, 0, 0);
    for i in 1..=games {
        let mut black_engine = black.build(config, depth);
        let mut white_engine = white.build(config, depth);

        let game = play_game(black_engine.as_mut(), white_engine.as_mut(), game_time, |g| {
            if show {
                if let Some((side, mv)) = g.history().last() {
                    println!("{side} plays {mv}");
                }
                println!("{}", g.board());
            }
        })
        .with_context(|| format!("game {i} failed"))?;

        let (b, w) = game.score();
        let result = match game.outcome() {
            GameOutcome::Win(Side::Black) => {
                black_wins += 1;
                "black wins"
            }
            GameOutcome::Win(Side::White) => {
                white_wins += 1;
                "white wins"
            }
            _ => {
                draws += 1;
                "draw"
            }
        };
        println!("game {i}: {result} {b}-{w} after {} moves", game.history().len());
    }

    println!("\n{black}: {black_wins}  {white}: {white_wins}  draws: {draws}");
    Ok(())
}
