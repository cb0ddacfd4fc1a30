//! Checkers rules: move generation, move execution, and game-over detection.
//!
//! This module provides the core game logic, including:
//! - Non-capturing diagonal shifts
//! - Forced captures with recursive multi-jump chains
//! - Promotion to king, including in the middle of a chain
//! - Win, loss, and draw detection
//!
//! Move generation works on a scratch board with apply/undo backtracking.
//! Position state that must survive (tree nodes, table keys) is always an
//! owned [`GameState`] clone, never a board that is later mutated.

use std::fmt;

use crate::board::{Board, Cell, Color, Pos};
use crate::constants::DRAW_SHIFT_LIMIT;

/// A board together with the side to move.
///
/// Two states are equal iff their boards and side to move are identical, so
/// a `GameState` can be used directly as a transposition-table key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GameState {
    pub board: Board,
    pub to_move: Color,
}

impl GameState {
    pub fn new(board: Board, to_move: Color) -> Self {
        Self { board, to_move }
    }

    /// Apply `mv` in place and pass the turn.
    ///
    /// # Panics
    /// Panics if any step of `mv` is not a legal shift or capture.
    pub fn apply(&mut self, mv: &Move) {
        for step in mv.path().windows(2) {
            update_board_single(&mut self.board, step[0], step[1]);
        }
        self.to_move = self.to_move.opponent();
    }
}

/// An ordered sequence of at least two board positions.
///
/// A move whose first step spans one row is a shift. A move whose steps span
/// two rows is a capture chain, each step removing one opposing piece.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move(Vec<Pos>);

impl Move {
    /// # Panics
    /// Panics if `path` has fewer than two positions.
    pub fn new(path: Vec<Pos>) -> Self {
        assert!(path.len() >= 2, "a move needs at least two positions, got {path:?}");
        Move(path)
    }

    #[inline]
    pub fn path(&self) -> &[Pos] {
        &self.0
    }

    #[inline]
    pub fn from(&self) -> Pos {
        self.0[0]
    }

    #[inline]
    pub fn to(&self) -> Pos {
        self.0[self.0.len() - 1]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if this move captures.
    #[inline]
    pub fn is_capture(&self) -> bool {
        self.0[0].0.abs_diff(self.0[1].0) == 2
    }

    /// Number of pieces this move removes.
    pub fn captures(&self) -> usize {
        if self.is_capture() { self.0.len() - 1 } else { 0 }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (row, col)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " -> ")?;
            }
            write!(f, "({row}, {col})")?;
        }
        Ok(())
    }
}

/// Result of a finished game.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Winner(Color),
    Draw,
}

// =============================================================================
// Move Generation
// =============================================================================

/// Row directions a piece may move in: forward only for a man, both for a king.
#[inline]
fn directions(color: Color, king: bool) -> &'static [isize] {
    match (color.forward(), king) {
        (1, false) => &[1],
        (1, true) => &[1, -1],
        (_, false) => &[-1],
        (_, true) => &[-1, 1],
    }
}

/// Enumerate the one-step diagonal shifts of the piece at `pos`.
pub fn shifts(board: &Board, pos: Pos, king: bool, color: Color) -> Vec<Move> {
    let mut moves = Vec::new();
    for &dr in directions(color, king) {
        for dc in [-1, 1] {
            if let Some(free) = board.offset(pos, dr, dc) {
                if board.get(free).is_empty() {
                    moves.push(Move(vec![pos, free]));
                }
            }
        }
    }
    moves
}

/// Landing squares of every single jump available to the piece at `pos`.
pub fn single_jumps(board: &Board, pos: Pos, king: bool, color: Color) -> Vec<Pos> {
    let mut landings = Vec::new();
    for &dr in directions(color, king) {
        for dc in [-1, 1] {
            let Some(free) = board.offset(pos, 2 * dr, 2 * dc) else {
                continue;
            };
            let Some(oppo) = board.offset(pos, dr, dc) else {
                continue;
            };
            if board.get(free).is_empty() && board.get(oppo).is_opponent_of(color) {
                landings.push(free);
            }
        }
    }
    landings
}

/// Check whether `jump` occurs as a contiguous run inside `existing`.
#[inline]
fn is_sub_jump(jump: &[Pos], existing: &[Pos]) -> bool {
    existing.windows(jump.len()).any(|w| w == jump)
}

/// Finish a chain that has no further jumps and record it if it is new.
///
/// A chain that returns to its starting square drops the repeated square.
/// A chain already contained in a recorded move is discarded.
fn finalize_chain(chain: &[Pos], moves: &mut Vec<Move>) {
    let mut jump = chain.to_vec();
    if jump.last() == jump.first() {
        jump.pop();
    }
    if !moves.iter().any(|m| is_sub_jump(&jump, m.path())) {
        moves.push(Move(jump));
    }
}

/// Recursively search capture chains from `pos`.
///
/// `board` is a scratch board with every jump of `chain` already applied. Each
/// candidate jump is applied, explored, and undone, so `board` is unchanged on
/// return. A man landing on its crowning row continues the chain as a king.
fn jumps(
    board: &mut Board,
    pos: Pos,
    chain: &mut Vec<Pos>,
    moves: &mut Vec<Move>,
    king: bool,
    color: Color,
) {
    let landings = single_jumps(board, pos, king, color);

    if landings.is_empty() {
        if chain.len() > 1 {
            finalize_chain(chain, moves);
        }
        return;
    }

    let crowning_row = color.crowning_row(board.size());
    for new_pos in landings {
        let mid = ((pos.0 + new_pos.0) / 2, (pos.1 + new_pos.1) / 2);
        let mover = board.get(pos);
        let captured = board.get(mid);
        let new_king = king || new_pos.0 == crowning_row;

        board.set(mid, Cell::Empty);
        board.set(pos, Cell::Empty);
        board.set(new_pos, if new_king { Cell::King(color) } else { mover });
        chain.push(new_pos);

        jumps(board, new_pos, chain, moves, new_king, color);

        chain.pop();
        board.set(new_pos, Cell::Empty);
        board.set(pos, mover);
        board.set(mid, captured);
    }
}

/// Every legal move for `color` on `board`.
///
/// Captures are compulsory: if any piece can jump, only capture chains are
/// returned. Otherwise every shift of every piece is returned.
pub fn legal_moves_for(board: &Board, color: Color) -> Vec<Move> {
    let pieces = board.pieces(color);
    let mut scratch = board.clone();
    let mut moves = Vec::new();

    for &p in &pieces {
        let king = board.get(p).is_king();
        let mut chain = vec![p];
        jumps(&mut scratch, p, &mut chain, &mut moves, king, color);
    }

    if moves.is_empty() {
        for &p in &pieces {
            let king = board.get(p).is_king();
            moves.extend(shifts(board, p, king, color));
        }
    }

    moves
}

/// Every legal move for the side to move in `state`.
#[inline]
pub fn legal_moves(state: &GameState) -> Vec<Move> {
    legal_moves_for(&state.board, state.to_move)
}

// =============================================================================
// Move Execution
// =============================================================================

/// Apply a single shift or jump step to `board`.
///
/// A man ending the step on its crowning row becomes a king.
///
/// # Panics
/// Panics if the step is not a diagonal of length one onto an empty square,
/// or of length two over an opposing piece onto an empty square.
pub fn update_board_single(board: &mut Board, from: Pos, to: Pos) {
    let dr = from.0.abs_diff(to.0);
    let dc = from.1.abs_diff(to.1);
    assert!(
        (dr == 1 || dr == 2) && dr == dc,
        "step {from:?} -> {to:?} cannot be performed by a legal move"
    );
    let mover = board.get(from);
    let Some(color) = mover.color() else {
        panic!("step {from:?} -> {to:?} starts on an empty square");
    };
    assert!(board.get(to).is_empty(), "destination {to:?} is not empty");

    if dr == 2 {
        let capt = ((from.0 + to.0) / 2, (from.1 + to.1) / 2);
        assert!(
            board.get(capt).is_opponent_of(color),
            "no opposing piece to capture at {capt:?}"
        );
        board.set(capt, Cell::Empty);
    }

    let landed = if to.0 == color.crowning_row(board.size()) {
        Cell::King(color)
    } else {
        mover
    };
    board.set(from, Cell::Empty);
    board.set(to, landed);
}

/// Return the state reached by playing `mv` from `state`.
///
/// The input state is left untouched.
///
/// # Panics
/// Panics if any step of `mv` is illegal on `state.board`.
pub fn update_board(state: &GameState, mv: &Move) -> GameState {
    let mut next = state.clone();
    next.apply(mv);
    next
}

// =============================================================================
// Game Progress
// =============================================================================

/// Per-game rule bookkeeping.
///
/// Holds the count of consecutive non-capturing moves. Each simulated game
/// needs its own clone so the real game's counter is never disturbed.
#[derive(Clone, Debug, Default)]
pub struct Checkers {
    shift_count: u32,
}

impl Checkers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine whose counter starts at `shift_count`.
    pub fn with_shift_count(shift_count: u32) -> Self {
        Self { shift_count }
    }

    #[inline]
    pub fn shift_count(&self) -> u32 {
        self.shift_count
    }

    /// Record that `mv` was played.
    pub fn update_shift_count(&mut self, mv: &Move) {
        if mv.is_capture() {
            self.shift_count = 0;
        } else {
            self.shift_count += 1;
        }
    }

    /// Decide whether `state` is finished.
    ///
    /// The side to move loses if it has no legal move. If instead the
    /// opponent would have no reply, the side to move wins. The game is drawn
    /// once the shift counter reaches [`DRAW_SHIFT_LIMIT`].
    pub fn end_game(&self, state: &GameState) -> Option<Outcome> {
        if legal_moves(state).is_empty() {
            Some(Outcome::Winner(state.to_move.opponent()))
        } else if legal_moves_for(&state.board, state.to_move.opponent()).is_empty() {
            Some(Outcome::Winner(state.to_move))
        } else if self.shift_count >= DRAW_SHIFT_LIMIT {
            Some(Outcome::Draw)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(size: usize, text: &str, to_move: Color) -> GameState {
        GameState::new(Board::parse(size, text).unwrap(), to_move)
    }

    fn mv(path: &[Pos]) -> Move {
        Move::new(path.to_vec())
    }

    #[test]
    fn test_man_shifts_forward_only() {
        let s = state(
            8,
            "________\
             ________\
             ________\
             ___b____\
             ________\
             ________\
             ________\
             ________",
            Color::Black,
        );
        let moves = legal_moves(&s);
        assert_eq!(moves, vec![mv(&[(3, 3), (4, 2)]), mv(&[(3, 3), (4, 4)])]);
    }

    #[test]
    fn test_white_man_moves_north() {
        let s = state(
            8,
            "________\
             ________\
             ________\
             ________\
             ________\
             ________\
             ________\
             w_______",
            Color::White,
        );
        assert_eq!(legal_moves(&s), vec![mv(&[(7, 0), (6, 1)])]);
    }

    #[test]
    fn test_king_shifts_both_ways() {
        let s = state(
            8,
            "________\
             ________\
             ________\
             ___B____\
             ________\
             ________\
             ________\
             ________",
            Color::Black,
        );
        assert_eq!(legal_moves(&s).len(), 4);
    }

    #[test]
    fn test_capture_is_forced() {
        let s = state(
            8,
            "________\
             ________\
             ___b____\
             ____w___\
             ________\
             b_______\
             ________\
             ________",
            Color::Black,
        );
        let moves = legal_moves(&s);
        assert_eq!(moves, vec![mv(&[(2, 3), (4, 5)])]);
        assert!(moves.iter().all(Move::is_capture));
    }

    #[test]
    fn test_man_cannot_capture_backwards() {
        let s = state(
            8,
            "________\
             ________\
             ________\
             ____w___\
             ___b____\
             ________\
             ________\
             ________",
            Color::Black,
        );
        assert!(legal_moves(&s).iter().all(|m| !m.is_capture()));
    }

    #[test]
    fn test_double_jump() {
        let s = state(
            8,
            "_b______\
             __w_____\
             ________\
             ____w___\
             ________\
             ________\
             ________\
             ________",
            Color::Black,
        );
        assert_eq!(legal_moves(&s), vec![mv(&[(0, 1), (2, 3), (4, 5)])]);
    }

    #[test]
    fn test_branching_chains() {
        let s = state(
            8,
            "___b____\
             __w_w___\
             ________\
             ________\
             ________\
             ________\
             ________\
             ________",
            Color::Black,
        );
        assert_eq!(
            legal_moves(&s),
            vec![mv(&[(0, 3), (2, 1)]), mv(&[(0, 3), (2, 5)])]
        );
    }

    #[test]
    fn test_promotion_mid_chain_enables_backward_jump() {
        let s = state(
            8,
            "________\
             ________\
             ________\
             ________\
             ________\
             b_______\
             _w_w____\
             ________",
            Color::Black,
        );
        let moves = legal_moves(&s);
        assert_eq!(moves, vec![mv(&[(5, 0), (7, 2), (5, 4)])]);

        let next = update_board(&s, &moves[0]);
        assert_eq!(next.board.get((5, 4)), Cell::King(Color::Black));
        assert!(next.board.get((6, 1)).is_empty());
        assert!(next.board.get((6, 3)).is_empty());
        assert_eq!(next.to_move, Color::White);
    }

    #[test]
    fn test_loop_chain_drops_repeated_start() {
        let s = state(
            8,
            "________\
             ___w_w__\
             __B_____\
             ___w_w__\
             ________\
             ________\
             ________\
             ________",
            Color::Black,
        );
        let moves = legal_moves(&s);
        assert_eq!(
            moves,
            vec![
                mv(&[(2, 2), (4, 4), (2, 6), (0, 4)]),
                mv(&[(2, 2), (0, 4), (2, 6), (4, 4)]),
            ]
        );
        // The trimmed loop captures three of the four pieces.
        let next = update_board(&s, &moves[0]);
        assert_eq!(next.board.count(Color::White), 1);
    }

    #[test]
    fn test_sub_jump_detection() {
        let long = [(0, 1), (2, 3), (4, 5), (6, 7)];
        assert!(is_sub_jump(&[(0, 1), (2, 3)], &long));
        assert!(is_sub_jump(&[(2, 3), (4, 5)], &long));
        assert!(is_sub_jump(&long, &long));
        assert!(!is_sub_jump(&[(0, 1), (4, 5)], &long));
        assert!(!is_sub_jump(&[(0, 1), (2, 3), (4, 5), (6, 7), (4, 5)], &long));
    }

    #[test]
    fn test_finalize_skips_contained_chain() {
        let mut moves = vec![mv(&[(0, 1), (2, 3), (4, 5)])];
        finalize_chain(&[(0, 1), (2, 3)], &mut moves);
        assert_eq!(moves.len(), 1);
        finalize_chain(&[(0, 1), (2, 3), (4, 1)], &mut moves);
        assert_eq!(moves.len(), 2);
    }

    #[test]
    fn test_move_generation_leaves_board_untouched() {
        let s = state(
            8,
            "________\
             ___w_w__\
             __B_____\
             ___w_w__\
             ________\
             ________\
             ________\
             ________",
            Color::Black,
        );
        let before = s.clone();
        let _ = legal_moves(&s);
        assert_eq!(s, before);
    }

    #[test]
    fn test_shift_promotes() {
        let s = state(4, "________w_______", Color::White);
        let next = update_board(&s, &mv(&[(2, 0), (1, 1)]));
        assert_eq!(next.board.get((1, 1)), Cell::Man(Color::White));
        let next = update_board(&GameState::new(next.board, Color::White), &mv(&[(1, 1), (0, 0)]));
        assert_eq!(next.board.get((0, 0)), Cell::King(Color::White));
    }

    #[test]
    #[should_panic(expected = "not empty")]
    fn test_update_rejects_occupied_destination() {
        let s = state(4, "_b____w_________", Color::Black);
        update_board(&s, &mv(&[(0, 1), (1, 2)]));
    }

    #[test]
    #[should_panic(expected = "no opposing piece")]
    fn test_update_rejects_empty_capture() {
        let s = state(4, "_b______________", Color::Black);
        update_board(&s, &mv(&[(0, 1), (2, 3)]));
    }

    #[test]
    #[should_panic(expected = "cannot be performed")]
    fn test_update_rejects_long_step() {
        let s = state(4, "_b______________", Color::Black);
        update_board(&s, &mv(&[(0, 1), (3, 0)]));
    }

    #[test]
    fn test_shift_counter() {
        let mut checkers = Checkers::new();
        checkers.update_shift_count(&mv(&[(0, 1), (1, 2)]));
        checkers.update_shift_count(&mv(&[(5, 0), (4, 1)]));
        assert_eq!(checkers.shift_count(), 2);
        checkers.update_shift_count(&mv(&[(2, 1), (4, 3)]));
        assert_eq!(checkers.shift_count(), 0);
    }

    #[test]
    fn test_end_game() {
        let checkers = Checkers::new();

        // Black has nothing left.
        let s = state(4, "______________w_", Color::Black);
        assert_eq!(checkers.end_game(&s), Some(Outcome::Winner(Color::White)));

        // Black can move but White would have no reply.
        let s = state(4, "_b______________", Color::Black);
        assert_eq!(checkers.end_game(&s), Some(Outcome::Winner(Color::Black)));

        let s = state(4, "_b____________w_", Color::Black);
        assert_eq!(checkers.end_game(&s), None);
        assert_eq!(
            Checkers::with_shift_count(DRAW_SHIFT_LIMIT - 1).end_game(&s),
            None
        );
        assert_eq!(
            Checkers::with_shift_count(DRAW_SHIFT_LIMIT).end_game(&s),
            Some(Outcome::Draw)
        );
    }

    #[test]
    fn test_move_display() {
        assert_eq!(mv(&[(5, 0), (7, 2), (5, 4)]).to_string(), "(5, 0) -> (7, 2) -> (5, 4)");
    }
}
