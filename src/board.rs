use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MoveError;
use crate::moves::{Move, Square};
use crate::piece::{Color, Piece};

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Board {
    pub squares: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board { squares: [[None; 8]; 8] }
    }

    /// Standard opening layout: Black on rows 0-2, Red on rows 5-7, dark squares only.
    pub fn new() -> Self {
        let mut board = Board::empty();
        for row in 0..8 {
            let color = match row {
                0..=2 => Color::Black,
                5..=7 => Color::Red,
                _ => continue,
            };
            for col in ((row + 1) % 2..8).step_by(2) {
                board.squares[row][col] = Some(Piece::new(color));
            }
        }
        board
    }

    pub fn in_bounds(row: i32, col: i32) -> bool {
        (0..8).contains(&row) && (0..8).contains(&col)
    }

    /// Offset a square by a (row, col) delta, or None if that leaves the board.
    fn offset(sq: Square, dr: i32, dc: i32) -> Option<Square> {
        let r = sq.0 as i32 + dr;
        let c = sq.1 as i32 + dc;
        if Self::in_bounds(r, c) {
            Some((r as usize, c as usize))
        } else {
            None
        }
    }

    pub fn get(&self, sq: Square) -> Option<Piece> {
        let (row, col) = sq;
        if row < 8 && col < 8 {
            self.squares[row][col]
        } else {
            None
        }
    }

    /// Put or clear a piece when setting up a position.
    pub fn place(&mut self, sq: Square, piece: Option<Piece>) -> Result<(), MoveError> {
        if sq.0 >= 8 || sq.1 >= 8 {
            return Err(MoveError::OutOfBounds(sq));
        }
        self.set(sq, piece);
        Ok(())
    }

    /// Callers pass squares that came from the board itself.
    pub(crate) fn set(&mut self, sq: Square, piece: Option<Piece>) {
        debug_assert!(sq.0 < 8 && sq.1 < 8, "square {sq:?} is off the board");
        self.squares[sq.0][sq.1] = piece;
    }

    pub fn piece_count(&self, color: Color) -> usize {
        self.squares
            .iter()
            .flatten()
            .flatten()
            .filter(|p| p.color == color)
            .count()
    }

    /// Every step and jump open to the piece on `sq`, in direction order.
    /// Captures are not prioritised here; the mandatory-capture rule is the
    /// engine's concern. An empty square yields no moves.
    pub fn generate_piece_moves(&self, sq: Square) -> Vec<Move> {
        let piece = match self.get(sq) {
            Some(p) => p,
            None => return Vec::new(),
        };

        let mut moves = Vec::new();
        for (dr, dc) in piece.directions() {
            let Some(next) = Self::offset(sq, dr, dc) else {
                continue;
            };
            match self.get(next) {
                None => moves.push(Move::step(sq, next)),
                Some(other) if other.color != piece.color => {
                    if let Some(landing) = Self::offset(sq, 2 * dr, 2 * dc) {
                        if self.get(landing).is_none() {
                            moves.push(Move::capture(sq, landing, next));
                        }
                    }
                }
                Some(_) => {}
            }
        }
        moves
    }

    pub fn generate_piece_captures(&self, sq: Square) -> Vec<Move> {
        self.generate_piece_moves(sq)
            .into_iter()
            .filter(Move::is_capture)
            .collect()
    }

    /// Squares holding a `color` piece, row-major.
    pub fn squares_of(&self, color: Color) -> Vec<Square> {
        let mut out = Vec::new();
        for r in 0..8 {
            for c in 0..8 {
                if let Some(p) = self.squares[r][c] {
                    if p.color == color {
                        out.push((r, c));
                    }
                }
            }
        }
        out
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.squares {
            let line: String = row
                .iter()
                .map(|sq| sq.map(|p| p.symbol()).unwrap_or('.'))
                .collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
