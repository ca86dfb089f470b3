//! Constants for board geometry, evaluation weights and search parameters.
//!
//! Everything that is fixed at compile time lives here. Runtime tunables are
//! collected in [`crate::config::SearchConfig`], whose defaults are taken from
//! the values below.

use std::time::Duration;

// =============================================================================
// Board Geometry
// =============================================================================

/// Board size (NxN). Othello is always played on 8x8.
pub const N: usize = 8;

/// Number of cells on the board.
pub const BOARDSIZE: usize = N * N;

/// The eight compass directions as (row, col) steps.
/// Order: N, NE, E, SE, S, SW, W, NW
pub const DIRECTIONS: [(isize, isize); 8] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

// =============================================================================
// Static Evaluation
// =============================================================================

/// Positional weights. Corners are worth a lot, the cells next to them
/// (X- and C-squares) hand the corner to the opponent and are penalised.
pub const BOARD_WEIGHTS: [[i32; N]; N] = [
    [99, -8, 8, 6, 6, 8, -8, 99],
    [-8, -24, -4, -3, -3, -4, -24, -8],
    [8, -4, 7, 4, 4, 7, -4, 8],
    [6, -3, 4, 0, 0, 4, -3, 6],
    [6, -3, 4, 0, 0, 4, -3, 6],
    [8, -4, 7, 4, 4, 7, -4, 8],
    [-8, -24, -4, -3, -3, -4, -24, -8],
    [99, -8, 8, 6, 6, 8, -8, 99],
];

/// Score of a finished game won by the evaluated side, before the disc margin
/// is added. Larger than any positional sum the weight table can produce.
pub const WIN_SCORE: f64 = 1000.0;

// =============================================================================
// MCTS Parameters
// =============================================================================

/// UCT exploration constant (sqrt 2).
pub const EXPLORATION: f64 = std::f64::consts::SQRT_2;

/// Upper bound on simulations per move. The time budget usually stops first.
pub const N_SIMS: usize = 100_000;

/// Maximum number of plies in a single random playout.
pub const ROLLOUT_DEPTH: usize = 60;

/// Time budget for a move when no game clock is given.
pub const DEFAULT_MOVE_TIME: Duration = Duration::from_secs(1);

/// Total game time used by the console and self-play when none is given.
pub const DEFAULT_GAME_TIME: Duration = Duration::from_secs(60);

/// Held back from every per-move budget to cover tree bookkeeping.
pub const TIME_MARGIN: Duration = Duration::from_millis(20);

// =============================================================================
// Minimax Parameters
// =============================================================================

/// Default alpha-beta search depth in plies.
pub const MINIMAX_DEPTH: usize = 4;
