//! Line-oriented text protocol for driving the engine.
//!
//! The protocol follows the shape of the Go Text Protocol: one command per
//! line, an optional numeric id in front, and replies of the form
//! `=[id] message` or `?[id] error` followed by a blank line. Board output and
//! moves use Othello coordinates (`a1`..`h8`, `pass`).
//!
//! ## Supported Commands
//!
//! - `name`, `version`, `protocol_version`
//! - `list_commands`, `known_command <cmd>`
//! - `quit`
//! - `clear_board` - Reset to the starting position
//! - `play <color> <vertex>` - Play a move for the given color
//! - `genmove <color>` - Let the engine choose and play a move
//! - `showboard` - Print the board, stone counts and side to move
//! - `final_score` - Result such as `B+4`, `W+10` or `0`
//! - `time_left <seconds>` - Set the engine's remaining game time
//! - `engine <mcts|minimax|random>` - Switch the move selector
//!
//! ## Example
//!
//! ```ignore
//! use reversi_mcts::console::ConsoleEngine;
//! let mut console = ConsoleEngine::default();
//! console.run()?;
//! ```

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use log::warn;

use crate::board::{Move, Side, parse_coord};
use crate::config::SearchConfig;
use crate::constants::{DEFAULT_GAME_TIME, MINIMAX_DEPTH};
use crate::game::Game;
use crate::player::{EngineKind, MoveSelector};

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "clear_board",
    "engine",
    "final_score",
    "genmove",
    "known_command",
    "list_commands",
    "name",
    "play",
    "protocol_version",
    "quit",
    "showboard",
    "time_left",
    "version",
];

/// Console state: the game being played and the engine playing it.
pub struct ConsoleEngine {
    game: Game,
    engine: Box<dyn MoveSelector>,
    config: SearchConfig,
    depth: usize,
    time_left: Duration,
}

impl Default for ConsoleEngine {
    fn default() -> Self {
        Self::new(EngineKind::Mcts, SearchConfig::default(), MINIMAX_DEPTH)
    }
}

impl ConsoleEngine {
    pub fn new(kind: EngineKind, config: SearchConfig, depth: usize) -> Self {
        Self {
            game: Game::new(),
            engine: kind.build(&config, depth),
            config,
            depth,
            time_left: DEFAULT_GAME_TIME,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Run the command loop on stdin/stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        self.run_with(stdin.lock(), io::stdout())
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run_with<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;

            // Skip empty lines and comments
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }

            let command = parts[0].to_lowercase();
            let (success, message) = self.execute(&command, &parts[1..]);

            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Parse an optional numeric command id from the beginning of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let trimmed = line.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());

        match trimmed[..end].parse::<u32>() {
            Ok(id) => (Some(id), trimmed[end..].trim()),
            Err(_) => (None, trimmed),
        }
    }

    /// Bring the turn to `side`, passing for the side to move if it has to.
    fn take_turn(&mut self, side: Side) -> Result<(), String> {
        if self.game.side_to_move() == side {
            return Ok(());
        }
        if self.game.must_pass() {
            self.game.play(Move::Pass).map_err(|e| e.to_string())?;
            return Ok(());
        }
        Err(format!("it is {}'s turn", self.game.side_to_move()))
    }

    fn showboard(&self) -> String {
        let (black, white) = self.game.score();
        format!(
            "\n{}black (X) {black}, white (O) {white}, {} to move",
            self.game.board(),
            self.game.side_to_move()
        )
    }

    fn final_score(&self) -> String {
        let (black, white) = self.game.score();
        match black.cmp(&white) {
            std::cmp::Ordering::Greater => format!("B+{}", black - white),
            std::cmp::Ordering::Less => format!("W+{}", white - black),
            std::cmp::Ordering::Equal => "0".to_string(),
        }
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "protocol_version" => (true, "2".to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let known = KNOWN_COMMANDS.contains(&args[0].to_lowercase().as_str());
                (true, if known { "true" } else { "false" }.to_string())
            }

            "quit" => (true, String::new()),

            "clear_board" => {
                self.game.clear();
                self.engine.reset();
                (true, String::new())
            }

            "showboard" => (true, self.showboard()),

            "final_score" => (true, self.final_score()),

            "time_left" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                match args[0].parse::<f64>().map(Duration::try_from_secs_f64) {
                    Ok(Ok(time)) => {
                        self.time_left = time;
                        (true, String::new())
                    }
                    _ => (false, "invalid time".to_string()),
                }
            }

            "engine" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                match args[0].parse::<EngineKind>() {
                    Ok(kind) => {
                        self.engine = kind.build(&self.config, self.depth);
                        (true, kind.to_string())
                    }
                    Err(e) => (false, e),
                }
            }

            "play" => {
                if args.len() < 2 {
                    return (false, "missing arguments".to_string());
                }
                let Some(side) = Side::parse(args[0]) else {
                    return (false, format!("invalid color {:?}", args[0]));
                };
                let mv = match parse_coord(args[1]) {
                    Ok(mv) => mv,
                    Err(e) => return (false, e.to_string()),
                };
                if let Err(e) = self.take_turn(side) {
                    return (false, e);
                }
                match self.game.play(mv) {
                    Ok(()) => (true, String::new()),
                    Err(e) => (false, e.to_string()),
                }
            }

            "genmove" => {
                if args.is_empty() {
                    return (false, "missing argument".to_string());
                }
                let Some(side) = Side::parse(args[0]) else {
                    return (false, format!("invalid color {:?}", args[0]));
                };
                if self.game.is_over() {
                    return (true, "pass".to_string());
                }
                if let Err(e) = self.take_turn(side) {
                    return (false, e);
                }

                let start = Instant::now();
                let mv = self
                    .engine
                    .select_move(self.game.board(), side, self.time_left);
                self.time_left = self.time_left.saturating_sub(start.elapsed());

                match self.game.play(mv) {
                    Ok(()) => (true, mv.to_string()),
                    Err(e) => {
                        warn!("engine {} produced {mv}: {e}", self.engine.name());
                        (false, e.to_string())
                    }
                }
            }

            _ => (false, format!("unknown command: {command}")),
        }
    }
}
