//! Monte Carlo playouts (simulated games).
//!
//! A playout plays a private copy of the game to completion and scores the
//! result for the searching agent: 1 for a win, 0.5 for a draw, 0 for a loss.
//! Moves are picked uniformly at random, or with probability `epsilon` by the
//! static evaluator. Every move played is recorded per color for the AMAF
//! update.

use crate::board::Color;
use crate::checkers::{Checkers, GameState, Move, Outcome, legal_moves, update_board};
use crate::eval::evaluate;

/// How playouts choose their moves.
#[derive(Copy, Clone, Debug)]
pub struct RolloutPolicy {
    /// Probability of playing the best-scoring move instead of a random one
    pub epsilon: f64,
    /// King value handed to the evaluator
    pub king_bonus: i32,
}

/// Moves played by each color during one playout, in order.
#[derive(Clone, Debug, Default)]
pub struct Actions {
    by_color: [Vec<Move>; 2],
}

impl Actions {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn get(&self, color: Color) -> &[Move] {
        &self.by_color[color.index()]
    }

    #[inline]
    pub fn push(&mut self, color: Color, mv: Move) {
        self.by_color[color.index()].push(mv);
    }

    /// Total number of moves recorded.
    pub fn len(&self) -> usize {
        self.by_color.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Score of a finished game for `agent`.
#[inline]
pub fn outcome_value(outcome: Outcome, agent: Color) -> f64 {
    match outcome {
        Outcome::Winner(c) if c == agent => 1.0,
        Outcome::Winner(_) => 0.0,
        Outcome::Draw => 0.5,
    }
}

/// Pick the move among `moves` whose resulting board scores best for the mover.
/// Ties go to the earliest move.
fn greedy_move(state: &GameState, moves: &[Move], king_bonus: i32) -> usize {
    let mut best = 0;
    let mut best_score = i32::MIN;
    for (i, mv) in moves.iter().enumerate() {
        let score = evaluate(&update_board(state, mv).board, state.to_move, king_bonus);
        if score > best_score {
            best_score = score;
            best = i;
        }
    }
    best
}

/// Choose the next playout move.
///
/// # Panics
/// Panics if `moves` is empty.
pub fn choose_move(
    state: &GameState,
    moves: &[Move],
    policy: &RolloutPolicy,
    rng: &mut fastrand::Rng,
) -> usize {
    assert!(!moves.is_empty(), "no move to choose from");
    if rng.f64() < policy.epsilon {
        greedy_move(state, moves, policy.king_bonus)
    } else {
        rng.usize(..moves.len())
    }
}

/// Play `state` out to the end of the game.
///
/// `checkers` is cloned so the playout has its own shift counter; neither the
/// state nor the engine passed in is modified. Returns the result from
/// `agent`'s side together with the moves each color played.
pub fn simulate(
    state: &GameState,
    checkers: &Checkers,
    agent: Color,
    policy: &RolloutPolicy,
    rng: &mut fastrand::Rng,
) -> (f64, Actions) {
    let mut actions = Actions::new();
    let mut state = state.clone();
    let mut engine = checkers.clone();

    loop {
        if let Some(outcome) = engine.end_game(&state) {
            return (outcome_value(outcome, agent), actions);
        }

        let mover = state.to_move;
        let mut moves = legal_moves(&state);
        let picked = moves.swap_remove(choose_move(&state, &moves, policy, rng));

        state.apply(&picked);
        engine.update_shift_count(&picked);
        actions.push(mover, picked);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::constants::{DEFAULT_KING_BONUS, DRAW_SHIFT_LIMIT};

    fn random_policy() -> RolloutPolicy {
        RolloutPolicy {
            epsilon: 0.0,
            king_bonus: DEFAULT_KING_BONUS,
        }
    }

    #[test]
    fn test_outcome_values() {
        assert_eq!(outcome_value(Outcome::Winner(Color::Black), Color::Black), 1.0);
        assert_eq!(outcome_value(Outcome::Winner(Color::White), Color::Black), 0.0);
        assert_eq!(outcome_value(Outcome::Draw, Color::White), 0.5);
    }

    #[test]
    fn test_simulate_terminal_state_plays_nothing() {
        let board = Board::parse(4, "______________w_").unwrap();
        let state = GameState::new(board, Color::Black);
        let mut rng = fastrand::Rng::with_seed(1);
        let (value, actions) =
            simulate(&state, &Checkers::new(), Color::White, &random_policy(), &mut rng);
        assert_eq!(value, 1.0);
        assert!(actions.is_empty());
    }

    #[test]
    fn test_simulate_draw_by_shift_limit() {
        let board = Board::parse(4, "_b____________w_").unwrap();
        let state = GameState::new(board, Color::Black);
        let mut rng = fastrand::Rng::with_seed(1);
        let checkers = Checkers::with_shift_count(DRAW_SHIFT_LIMIT);
        let (value, actions) = simulate(&state, &checkers, Color::Black, &random_policy(), &mut rng);
        assert_eq!(value, 0.5);
        assert!(actions.is_empty());
        assert_eq!(checkers.shift_count(), DRAW_SHIFT_LIMIT);
    }

    #[test]
    fn test_simulate_records_moves_per_color() {
        let state = GameState::new(Board::initial(8).unwrap(), Color::Black);
        let before = state.clone();
        let mut rng = fastrand::Rng::with_seed(7);
        let (value, actions) =
            simulate(&state, &Checkers::new(), Color::Black, &random_policy(), &mut rng);

        assert!([0.0, 0.5, 1.0].contains(&value));
        assert_eq!(state, before);

        // Black moves first, so it plays as many moves as White or one more.
        let black = actions.get(Color::Black).len();
        let white = actions.get(Color::White).len();
        assert!(black == white || black == white + 1);

        // Replaying the record reproduces a legal game.
        let mut replay = before;
        for i in 0..black.max(white) {
            for color in [Color::Black, Color::White] {
                if let Some(mv) = actions.get(color).get(i) {
                    assert!(legal_moves(&replay).contains(mv));
                    replay.apply(mv);
                }
            }
        }
    }

    #[test]
    fn test_greedy_prefers_higher_score() {
        let board = Board::parse(
            8,
            "________\
             ________\
             ________\
             ________\
             ________\
             ___b____\
             ________\
             ________",
        )
        .unwrap();
        let state = GameState::new(board, Color::Black);
        let moves = legal_moves(&state);
        assert_eq!(moves.len(), 2);
        // (5,3) -> (6,2) lands on ring 3, (5,3) -> (6,4) also on ring 3 (row 6).
        // Crowning is not possible, so scores tie and the first move is kept.
        let policy = RolloutPolicy {
            epsilon: 1.0,
            king_bonus: DEFAULT_KING_BONUS,
        };
        let mut rng = fastrand::Rng::with_seed(3);
        assert_eq!(choose_move(&state, &moves, &policy, &mut rng), 0);

        let board = Board::parse(
            8,
            "________\
             ________\
             ________\
             ________\
             ________\
             ______b_\
             ________\
             ________",
        )
        .unwrap();
        let state = GameState::new(board, Color::Black);
        let moves = legal_moves(&state);
        // (5,6) -> (6,5) weighs 3, (5,6) -> (6,7) sits on the edge column and weighs 4.
        assert_eq!(moves[1].to(), (6, 7));
        assert_eq!(choose_move(&state, &moves, &policy, &mut rng), 1);
    }
}
