//! Static position evaluation used to bias rollouts.
//!
//! A man is worth [`MAN_BASE_VALUE`] plus a positional weight that favours
//! the edge rings of the board. A king is worth a flat bonus. The score of a
//! position is the mover's total minus the opponent's total.

use crate::board::{Board, Cell, Color, Pos};
use crate::constants::MAN_BASE_VALUE;

/// Positional weight of a man standing on `pos`.
///
/// The outer rows weigh 5 and the outer columns 4. The next rings are
/// matched by fixed row/column indices (1 and 6, then 2 and 5) in that
/// order, weighing 3 and 2. Everything else weighs 1.
pub fn concentric_weight(size: usize, (row, col): Pos) -> i32 {
    let last = size - 1;
    if row == 0 || row == last {
        5
    } else if col == 0 || col == last {
        4
    } else if row == 1 || row == 6 || col == 1 || col == 6 {
        3
    } else if row == 2 || row == 5 || col == 2 || col == 5 {
        2
    } else {
        1
    }
}

/// Material-and-position balance of `board` from `color`'s side.
pub fn evaluate(board: &Board, color: Color, king_bonus: i32) -> i32 {
    let mut play = 0;
    let mut oppo = 0;

    for (pos, cell) in board.cells() {
        let value = match cell {
            Cell::Empty => continue,
            Cell::Man(_) => MAN_BASE_VALUE + concentric_weight(board.size(), pos),
            Cell::King(_) => king_bonus,
        };
        if cell.color() == Some(color) {
            play += value;
        } else {
            oppo += value;
        }
    }

    play - oppo
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DEFAULT_KING_BONUS;

    #[test]
    fn test_concentric_rings_8x8() {
        assert_eq!(concentric_weight(8, (0, 3)), 5);
        assert_eq!(concentric_weight(8, (7, 0)), 5);
        assert_eq!(concentric_weight(8, (3, 0)), 4);
        assert_eq!(concentric_weight(8, (4, 7)), 4);
        assert_eq!(concentric_weight(8, (1, 4)), 3);
        assert_eq!(concentric_weight(8, (4, 6)), 3);
        assert_eq!(concentric_weight(8, (2, 3)), 2);
        assert_eq!(concentric_weight(8, (3, 5)), 2);
        assert_eq!(concentric_weight(8, (3, 3)), 1);
        assert_eq!(concentric_weight(8, (4, 4)), 1);
    }

    #[test]
    fn test_rings_use_fixed_indices_on_larger_boards() {
        // Row 6 still counts as the second ring on a 10x10 board.
        assert_eq!(concentric_weight(10, (6, 4)), 3);
        assert_eq!(concentric_weight(10, (8, 4)), 1);
        assert_eq!(concentric_weight(10, (4, 9)), 4);
    }

    #[test]
    fn test_initial_position_is_balanced() {
        let board = Board::initial(8).unwrap();
        assert_eq!(evaluate(&board, Color::Black, DEFAULT_KING_BONUS), 0);
        assert_eq!(evaluate(&board, Color::White, DEFAULT_KING_BONUS), 0);
    }

    #[test]
    fn test_kings_use_flat_bonus() {
        let board = Board::parse(4, "_B______________").unwrap();
        assert_eq!(evaluate(&board, Color::Black, 20), 20);
        assert_eq!(evaluate(&board, Color::White, 7), -7);
    }

    #[test]
    fn test_man_values() {
        // Black man on the top edge (5) against a white man on the left edge (4).
        let board = Board::parse(8, &format!("_b{}w{}", "_".repeat(22), "_".repeat(39))).unwrap();
        assert_eq!(board.get((3, 0)), Cell::Man(Color::White));
        assert_eq!(evaluate(&board, Color::Black, DEFAULT_KING_BONUS), (3 + 5) - (3 + 4));
        assert_eq!(evaluate(&board, Color::White, DEFAULT_KING_BONUS), -1);
    }
}
