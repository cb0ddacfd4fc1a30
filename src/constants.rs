//! Constants for board symbols, game rules, and search parameters.
//!
//! This module contains the compile-time defaults for the checkers engine.
//! Runtime overrides go through [`crate::mcts::SearchConfig`].

// =============================================================================
// Board Symbols
// =============================================================================

/// Empty cell.
pub const EMPTY: char = '_';

/// Black man.
pub const BLACK_MAN: char = 'b';

/// Black king.
pub const BLACK_KING: char = 'B';

/// White man.
pub const WHITE_MAN: char = 'w';

/// White king.
pub const WHITE_KING: char = 'W';

/// Smallest supported board size.
pub const MIN_BOARD_SIZE: usize = 4;

/// Standard board size.
pub const DEFAULT_BOARD_SIZE: usize = 8;

// =============================================================================
// Game Rules
// =============================================================================

/// Number of consecutive non-capturing moves after which the game is drawn.
pub const DRAW_SHIFT_LIMIT: u32 = 40;

// =============================================================================
// Static Evaluation
// =============================================================================

/// Base value of a man before the positional weight is added.
pub const MAN_BASE_VALUE: i32 = 3;

/// Flat value of a king.
pub const DEFAULT_KING_BONUS: i32 = 20;

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Default search budget per move, in seconds.
pub const DEFAULT_SIM_TIME: f64 = 5.0;

/// UCB exploration constant.
pub const DEFAULT_EXPLORATION: f64 = 1.0;

/// AMAF bias used by the beta blending weight.
pub const DEFAULT_AMAF_BIAS: f64 = 0.1;

/// Probability of playing the greedy move during a rollout.
pub const DEFAULT_ROLLOUT_EPSILON: f64 = 0.0;

// =============================================================================
// Prior Values (for MCTS node initialization)
// =============================================================================

/// Visits every node starts with, for both plain and AMAF counters.
pub const PRIOR_PLAYS: u32 = 10;

/// Wins every node starts with, for both plain and AMAF counters.
pub const PRIOR_WINS: f64 = 0.5;
