//! Square checkers board.
//!
//! The board is a plain row-major grid of [`Cell`]s. It carries no game logic
//! beyond bounds checking and cell access; move rules live in
//! [`crate::checkers`].

use std::fmt;

use crate::constants::{BLACK_KING, BLACK_MAN, EMPTY, MIN_BOARD_SIZE, WHITE_KING, WHITE_MAN};
use crate::{CheckersError, Result};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// The other side.
    #[inline]
    pub fn opponent(self) -> Color {
        match self {
            Color::Black => Color::White,
            Color::White => Color::Black,
        }
    }

    /// Row step of a man of this color. Black moves south, White moves north.
    #[inline]
    pub fn forward(self) -> isize {
        match self {
            Color::Black => 1,
            Color::White => -1,
        }
    }

    /// Row on which a man of this color is crowned.
    #[inline]
    pub fn crowning_row(self, size: usize) -> usize {
        match self {
            Color::Black => size - 1,
            Color::White => 0,
        }
    }

    /// Index for per-color tables.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Color::Black => 0,
            Color::White => 1,
        }
    }

    /// Parse a color from `b`/`black` or `w`/`white` (any case).
    pub fn parse(s: &str) -> Result<Color> {
        match s.to_ascii_lowercase().as_str() {
            "b" | "black" => Ok(Color::Black),
            "w" | "white" => Ok(Color::White),
            _ => Err(CheckersError::InvalidColor(s.to_string())),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::Black => write!(f, "black"),
            Color::White => write!(f, "white"),
        }
    }
}

/// Contents of one board cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    #[default]
    Empty,
    Man(Color),
    King(Color),
}

impl Cell {
    /// Color of the piece in this cell, if any.
    #[inline]
    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::Man(c) | Cell::King(c) => Some(c),
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    #[inline]
    pub fn is_king(self) -> bool {
        matches!(self, Cell::King(_))
    }

    /// True if this cell holds a piece of the side opposing `color`.
    #[inline]
    pub fn is_opponent_of(self, color: Color) -> bool {
        self.color() == Some(color.opponent())
    }

    pub fn from_char(ch: char) -> Result<Cell> {
        match ch {
            EMPTY => Ok(Cell::Empty),
            BLACK_MAN => Ok(Cell::Man(Color::Black)),
            BLACK_KING => Ok(Cell::King(Color::Black)),
            WHITE_MAN => Ok(Cell::Man(Color::White)),
            WHITE_KING => Ok(Cell::King(Color::White)),
            other => Err(CheckersError::InvalidCell(other)),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => EMPTY,
            Cell::Man(Color::Black) => BLACK_MAN,
            Cell::King(Color::Black) => BLACK_KING,
            Cell::Man(Color::White) => WHITE_MAN,
            Cell::King(Color::White) => WHITE_KING,
        }
    }
}

/// A board coordinate as `(row, col)`.
pub type Pos = (usize, usize);

/// An NxN checkers board. Two boards are equal iff all their cells are.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Create an empty board. `size` must be even and at least 4.
    pub fn new(size: usize) -> Result<Self> {
        if size < MIN_BOARD_SIZE || size % 2 != 0 {
            return Err(CheckersError::InvalidSize(size));
        }
        Ok(Self {
            size,
            cells: vec![Cell::Empty; size * size],
        })
    }

    /// Create a board with the standard starting layout.
    ///
    /// Men occupy the dark squares (`row + col` odd) of the first
    /// `size / 2 - 1` rows on each side, black on top, white at the bottom.
    pub fn initial(size: usize) -> Result<Self> {
        let mut board = Self::new(size)?;
        let rows = size / 2 - 1;
        for row in 0..size {
            for col in 0..size {
                if (row + col) % 2 == 0 {
                    continue;
                }
                if row < rows {
                    board.set((row, col), Cell::Man(Color::Black));
                } else if row >= size - rows {
                    board.set((row, col), Cell::Man(Color::White));
                }
            }
        }
        Ok(board)
    }

    /// Parse a board from a flat string of `size * size` cell symbols.
    /// Spaces and newlines are ignored.
    pub fn parse(size: usize, text: &str) -> Result<Self> {
        let mut board = Self::new(size)?;
        let symbols: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
        if symbols.len() != size * size {
            return Err(CheckersError::WrongCellCount {
                expected: size * size,
                found: symbols.len(),
            });
        }
        for (i, ch) in symbols.into_iter().enumerate() {
            board.cells[i] = Cell::from_char(ch)?;
        }
        Ok(board)
    }

    /// Build a board from pre-split rows. The size is the number of rows.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self> {
        let size = rows.len();
        let mut board = Self::new(size)?;
        for (row, line) in rows.iter().enumerate() {
            let line = line.as_ref();
            let found = line.chars().count();
            if found != size {
                return Err(CheckersError::RaggedRow {
                    row,
                    expected: size,
                    found,
                });
            }
            for (col, ch) in line.chars().enumerate() {
                board.set((row, col), Cell::from_char(ch)?);
            }
        }
        Ok(board)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn idx(&self, (row, col): Pos) -> usize {
        row * self.size + col
    }

    /// Check that a signed coordinate lies on the board.
    #[inline]
    pub fn is_inbound(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.size && (col as usize) < self.size
    }

    /// Offset a position, returning `None` when it leaves the board.
    #[inline]
    pub fn offset(&self, (row, col): Pos, dr: isize, dc: isize) -> Option<Pos> {
        let r = row as isize + dr;
        let c = col as isize + dc;
        self.is_inbound(r, c).then(|| (r as usize, c as usize))
    }

    /// Cell at `pos`.
    ///
    /// # Panics
    /// Panics if `pos` is off the board.
    #[inline]
    pub fn get(&self, pos: Pos) -> Cell {
        assert!(pos.0 < self.size && pos.1 < self.size, "position {pos:?} is not on the board");
        self.cells[self.idx(pos)]
    }

    /// Overwrite the cell at `pos`.
    ///
    /// # Panics
    /// Panics if `pos` is off the board.
    #[inline]
    pub fn set(&mut self, pos: Pos, cell: Cell) {
        assert!(pos.0 < self.size && pos.1 < self.size, "position {pos:?} is not on the board");
        let i = self.idx(pos);
        self.cells[i] = cell;
    }

    /// Iterate over all cells in row-major order with their positions.
    pub fn cells(&self) -> impl Iterator<Item = (Pos, Cell)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| ((i / size, i % size), cell))
    }

    /// Positions of every piece of `color`, row-major.
    pub fn pieces(&self, color: Color) -> Vec<Pos> {
        self.cells()
            .filter(|(_, cell)| cell.color() == Some(color))
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Number of pieces of `color`.
    pub fn count(&self, color: Color) -> usize {
        self.cells.iter().filter(|c| c.color() == Some(color)).count()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            for col in 0..self.size {
                write!(f, "{}", self.get((row, col)).to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
