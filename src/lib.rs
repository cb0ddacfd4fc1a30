//! Checkers-MCTS: a checkers engine driven by Monte Carlo Tree Search.
//!
//! This crate provides a rules engine for NxN checkers with forced multi-jump
//! captures, and an MCTS agent that blends UCB1 with All-Moves-As-First
//! statistics to choose a move within a wall-clock budget.
//!
//! ## Modules
//!
//! - [`constants`] - Board symbols, rule thresholds, and search defaults
//! - [`board`] - Board grid, cells, and colors
//! - [`checkers`] - Move generation, move execution, and game-over detection
//! - [`eval`] - Static evaluation used by biased playouts
//! - [`tree`] - Arena search tree with a transposition table
//! - [`playout`] - Simulated games for position evaluation
//! - [`mcts`] - The MCTS agent
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//!
//! use checkers_mcts::board::{Board, Color};
//! use checkers_mcts::checkers::{Checkers, GameState, legal_moves};
//! use checkers_mcts::mcts::{MonteCarloAgent, SearchConfig};
//!
//! let state = GameState::new(Board::initial(8).unwrap(), Color::Black);
//! let config = SearchConfig::default().with_sim_time(Duration::from_millis(50));
//! let mut agent = MonteCarloAgent::new(Color::Black, Checkers::new(), config);
//!
//! let mv = agent.play(&state).unwrap();
//! assert!(legal_moves(&state).contains(&mv));
//! println!("Best move: {mv}");
//! ```

pub mod board;
pub mod checkers;
pub mod constants;
pub mod eval;
pub mod mcts;
pub mod playout;
pub mod tree;

/// Errors reported by board construction and the agent.
#[derive(Debug, thiserror::Error)]
pub enum CheckersError {
    #[error("board size must be even and at least 4, got {0}")]
    InvalidSize(usize),

    #[error("unknown cell symbol {0:?}")]
    InvalidCell(char),

    #[error("expected {expected} cells, found {found}")]
    WrongCellCount { expected: usize, found: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("unknown color {0:?}")]
    InvalidColor(String),

    #[error("no legal moves for the side to move")]
    NoLegalMoves,
}

pub type Result<T> = std::result::Result<T, CheckersError>;
