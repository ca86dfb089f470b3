//! Move selection entry points.
//!
//! [`MctsPlayer::select_move`] is the engine's per-move entry point. It keeps
//! the search tree between calls: when the position it is asked about is a
//! known child of the node it returned last time, and the side to move there
//! is the side the statistics were scored for, that subtree is reused.
//! Otherwise a fresh tree is built.
//!
//! Minimax and random movers implement the same [`MoveSelector`] trait so the
//! engines can be swapped or played against each other.

use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use log::info;

use crate::board::{Board, Move, Side};
use crate::config::SearchConfig;
use crate::constants::{MINIMAX_DEPTH, TIME_MARGIN};
use crate::game::{Game, GameError};
use crate::mcts::{Mcts, SearchStats};
use crate::minimax::Minimax;
use crate::playout::choose_random_move;
use crate::tree::Tree;

/// Anything that can pick a move for a position.
pub trait MoveSelector {
    fn name(&self) -> &'static str;

    /// Choose a move for `side`. `remaining` is the time left on the mover's
    /// game clock. Returns `Move::Pass` only when no placement exists.
    fn select_move(&mut self, board: &Board, side: Side, remaining: Duration) -> Move;

    /// Forget any state carried between moves.
    fn reset(&mut self) {}
}

/// Splits the remaining game time into a per-move budget.
#[derive(Debug, Clone, Copy)]
pub struct TimeControl {
    /// Held back from every budget
    pub margin: Duration,
    /// Upper bound on any single move
    pub max_move_time: Option<Duration>,
}

impl Default for TimeControl {
    fn default() -> Self {
        Self {
            margin: TIME_MARGIN,
            max_move_time: None,
        }
    }
}

impl TimeControl {
    /// Budget for the next move: the remaining time shared over the mover's
    /// expected remaining moves (half the empty cells, at least one).
    pub fn move_budget(&self, board: &Board, remaining: Duration) -> Duration {
        let moves_left = (board.empties() / 2).max(1) as u32;
        let budget = (remaining / moves_left).saturating_sub(self.margin);
        match self.max_move_time {
            Some(cap) => budget.min(cap),
            None => budget,
        }
    }
}

/// MCTS engine with a tree retained across moves.
pub struct MctsPlayer {
    mcts: Mcts,
    clock: TimeControl,
    tree: Option<Tree>,
    /// Side whose rewards fill the retained tree
    scored_for: Option<Side>,
    last_stats: Option<SearchStats>,
    reused: bool,
}

impl MctsPlayer {
    pub fn new(config: SearchConfig) -> Self {
        let clock = TimeControl {
            max_move_time: config.move_time,
            ..TimeControl::default()
        };
        Self {
            mcts: Mcts::new(config),
            clock,
            tree: None,
            scored_for: None,
            last_stats: None,
            reused: false,
        }
    }

    /// The retained tree, rooted at the node chosen by the last search.
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    pub fn last_stats(&self) -> Option<&SearchStats> {
        self.last_stats.as_ref()
    }

    /// Whether the last call continued a cached subtree.
    pub fn reused_tree(&self) -> bool {
        self.reused
    }

    /// Take the retained tree down to `board`, or start over.
    ///
    /// Only a child of the retained root can be reused, and only when `side`
    /// is the side its rewards were scored for.
    fn tree_for(&mut self, board: &Board, side: Side) -> Tree {
        self.reused = false;
        let scored_for = self.scored_for.take();
        if let Some(mut tree) = self.tree.take() {
            if scored_for != Some(side) {
                info!("retained tree is scored for the other side, starting fresh");
                return Tree::new(*board, side);
            }
            let root = tree.root();
            if let Some(child) = tree.find_child(root, board, side) {
                info!("reusing subtree with {} visits", tree.get(child).n);
                tree.reroot(child);
                self.reused = true;
                return tree;
            }
            info!("position not in retained tree, starting fresh");
        }
        Tree::new(*board, side)
    }
}

impl MoveSelector for MctsPlayer {
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn select_move(&mut self, board: &Board, side: Side, remaining: Duration) -> Move {
        let budget = self.clock.move_budget(board, remaining);
        let mut tree = self.tree_for(board, side);

        let root = tree.root();
        tree.expand_all(root);

        let result = self.mcts.search(&mut tree, Some(budget));
        self.last_stats = Some(result.stats);

        // Keep the chosen node, fully expanded, so the opponent's reply can
        // be found among its children next time.
        self.tree = result.node.map(|node| {
            tree.reroot(node);
            let root = tree.root();
            tree.expand_all(root);
            tree
        });
        self.scored_for = self.tree.as_ref().map(|_| side);

        result.mv
    }

    fn reset(&mut self) {
        self.tree = None;
        self.scored_for = None;
        self.last_stats = None;
        self.reused = false;
    }
}

/// Fixed-depth alpha-beta mover.
pub struct MinimaxPlayer {
    search: Minimax,
}

impl MinimaxPlayer {
    pub fn new(depth: usize) -> Self {
        Self {
            search: Minimax::new(depth),
        }
    }
}

impl Default for MinimaxPlayer {
    fn default() -> Self {
        Self::new(MINIMAX_DEPTH)
    }
}

impl MoveSelector for MinimaxPlayer {
    fn name(&self) -> &'static str {
        "minimax"
    }

    fn select_move(&mut self, board: &Board, side: Side, _remaining: Duration) -> Move {
        self.search.best_move(board, side).best_move
    }
}

/// Uniformly random mover.
pub struct RandomPlayer {
    rng: fastrand::Rng,
}

impl RandomPlayer {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self { rng }
    }
}

impl MoveSelector for RandomPlayer {
    fn name(&self) -> &'static str {
        "random"
    }

    fn select_move(&mut self, board: &Board, side: Side, _remaining: Duration) -> Move {
        choose_random_move(board, side, &mut self.rng)
    }
}

/// Engine choice for the console and the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Mcts,
    Minimax,
    Random,
}

impl EngineKind {
    /// Build a mover of this kind.
    pub fn build(self, config: &SearchConfig, depth: usize) -> Box<dyn MoveSelector> {
        match self {
            EngineKind::Mcts => Box::new(MctsPlayer::new(config.clone())),
            EngineKind::Minimax => Box::new(MinimaxPlayer::new(depth)),
            EngineKind::Random => Box::new(RandomPlayer::new(config.seed)),
        }
    }
}

impl FromStr for EngineKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mcts" => Ok(EngineKind::Mcts),
            "minimax" | "alphabeta" => Ok(EngineKind::Minimax),
            "random" => Ok(EngineKind::Random),
            other => Err(format!("unknown engine {other:?} (expected mcts, minimax or random)")),
        }
    }
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineKind::Mcts => write!(f, "mcts"),
            EngineKind::Minimax => write!(f, "minimax"),
            EngineKind::Random => write!(f, "random"),
        }
    }
}

/// Play a full game between two movers, each with its own game clock.
///
/// `observe` is called after every move with the game so far.
pub fn play_game(
    black: &mut dyn MoveSelector,
    white: &mut dyn MoveSelector,
    game_time: Duration,
    mut observe: impl FnMut(&Game),
) -> Result<Game, GameError> {
    let mut game = Game::new();
    let mut clocks = [game_time, game_time];

    while !game.is_over() {
        let side = game.side_to_move();
        let slot = match side {
            Side::Black => 0,
            Side::White => 1,
        };

        let start = Instant::now();
        let mv = match side {
            Side::Black => black.select_move(game.board(), side, clocks[slot]),
            Side::White => white.select_move(game.board(), side, clocks[slot]),
        };
        clocks[slot] = clocks[slot].saturating_sub(start.elapsed());

        game.play(mv)?;
        observe(&game);
    }

    Ok(game)
}
