//! MCTS configuration parameters.

use std::time::Duration;

use crate::constants::{EXPLORATION, N_SIMS, ROLLOUT_DEPTH};

/// How a leaf is valued after selection and expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rollout {
    /// Uniformly random playout up to the depth cap, then evaluate.
    Random,
    /// Evaluate the leaf board directly. Fully deterministic.
    Static,
}

/// Rule for picking the move to play once the search is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalSelection {
    /// Highest UCT value, exploration bonus included.
    Uct,
    /// Most visited child.
    MostVisited,
    /// Highest mean reward Q/N.
    BestMean,
}

/// Configuration for Monte Carlo Tree Search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Upper bound on simulations per search. The time budget may stop earlier.
    pub max_simulations: usize,

    /// Exploration constant `c` in the UCT formula.
    pub exploration: f64,

    /// Maximum number of plies in one random playout.
    pub rollout_depth: usize,

    /// Leaf valuation strategy.
    pub rollout: Rollout,

    /// Rule for the final move choice.
    pub final_selection: FinalSelection,

    /// Seed for the playout RNG. `None` seeds from the system.
    pub seed: Option<u64>,

    /// Hard cap on the time spent on a single move.
    pub move_time: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_simulations: N_SIMS,
            exploration: EXPLORATION,
            rollout_depth: ROLLOUT_DEPTH,
            rollout: Rollout::Random,
            final_selection: FinalSelection::Uct,
            seed: None,
            move_time: None,
        }
    }
}

impl SearchConfig {
    /// Deterministic config for tests: static leaf evaluation, fixed seed.
    pub fn for_testing(sims: usize) -> Self {
        Self::default()
            .with_simulations(sims)
            .with_rollout(Rollout::Static)
            .with_seed(0)
    }

    pub fn with_simulations(mut self, n: usize) -> Self {
        self.max_simulations = n;
        self
    }

    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    pub fn with_rollout_depth(mut self, depth: usize) -> Self {
        self.rollout_depth = depth;
        self
    }

    pub fn with_rollout(mut self, rollout: Rollout) -> Self {
        self.rollout = rollout;
        self
    }

    pub fn with_final_selection(mut self, rule: FinalSelection) -> Self {
        self.final_selection = rule;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_move_time(mut self, t: Duration) -> Self {
        self.move_time = Some(t);
        self
    }

    /// A fresh playout RNG according to `seed`.
    pub fn rng(&self) -> fastrand::Rng {
        match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        }
    }
}
