use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Debug)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    pub fn opposite(self) -> Color {
        match self {
            Color::Red => Color::Black,
            Color::Black => Color::Red,
        }
    }

    /// Row delta of a forward step. Red moves up the board (toward row 0).
    pub fn forward(self) -> i32 {
        match self {
            Color::Red => -1,
            Color::Black => 1,
        }
    }

    /// The row on which a man of this color is crowned.
    pub fn back_rank(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Black => 7,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Piece {
    pub color: Color,
    pub is_king: bool,
}

impl Piece {
    pub fn new(color: Color) -> Self {
        Piece { color, is_king: false }
    }

    pub fn king(color: Color) -> Self {
        Piece { color, is_king: true }
    }

    /// Diagonal directions this piece may travel in, as (row, col) deltas.
    pub fn directions(&self) -> Vec<(i32, i32)> {
        if self.is_king {
            vec![(1, 1), (1, -1), (-1, 1), (-1, -1)]
        } else {
            let dr = self.color.forward();
            vec![(dr, 1), (dr, -1)]
        }
    }

    /// Character used by the text board: `r`/`b` for men, `R`/`B` for kings.
    pub fn symbol(&self) -> char {
        match (self.color, self.is_king) {
            (Color::Red, false) => 'r',
            (Color::Red, true) => 'R',
            (Color::Black, false) => 'b',
            (Color::Black, true) => 'B',
        }
    }
}
