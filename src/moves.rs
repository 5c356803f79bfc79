use serde::{Deserialize, Serialize};

use crate::error::NotationError;

/// A board coordinate as (row, col). Row 0 is Black's home edge.
pub type Square = (usize, usize);

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub enum MoveKind {
    Step,
    Capture { captured: Square },
}

#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
}

impl Move {
    pub fn step(from: Square, to: Square) -> Self {
        Move { from, to, kind: MoveKind::Step }
    }

    pub fn capture(from: Square, to: Square, captured: Square) -> Self {
        Move { from, to, kind: MoveKind::Capture { captured } }
    }

    pub fn is_capture(&self) -> bool {
        matches!(self.kind, MoveKind::Capture { .. })
    }

    pub fn captured(&self) -> Option<Square> {
        match self.kind {
            MoveKind::Capture { captured } => Some(captured),
            MoveKind::Step => None,
        }
    }

    /// Standard notation, e.g. "22-18" for a step or "15x22" for a jump.
    pub fn to_notation(&self) -> String {
        let sep = if self.is_capture() { 'x' } else { '-' };
        match (square_number(self.from), square_number(self.to)) {
            (Some(f), Some(t)) => format!("{f}{sep}{t}"),
            _ => format!("{:?}{sep}{:?}", self.from, self.to),
        }
    }
}

/// Number a playable square 1-32, counting row-major from row 0.
/// Light squares and off-board coordinates have no number.
pub fn square_number(sq: Square) -> Option<u32> {
    let (row, col) = sq;
    if row >= 8 || col >= 8 || (row + col) % 2 == 0 {
        return None;
    }
    Some((row * 4 + col / 2 + 1) as u32)
}

pub fn square_from_number(n: u32) -> Result<Square, NotationError> {
    if !(1..=32).contains(&n) {
        return Err(NotationError::SquareNumber(n));
    }
    let idx = (n - 1) as usize;
    let row = idx / 4;
    let col = 2 * (idx % 4) + if row % 2 == 0 { 1 } else { 0 };
    Ok((row, col))
}

/// A parsed turn: the squares the piece visits, starting square first, and
/// whether it was written as a jump (`x`) or a step (`-`).
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Notation {
    pub path: Vec<Square>,
    pub jump: bool,
}

/// Parse "11-15", "22x15" or a multi-jump such as "9x18x27".
pub fn parse_notation(s: &str) -> Result<Notation, NotationError> {
    let text = s.trim();
    let malformed = || NotationError::Malformed(s.to_string());

    let has_step = text.contains('-');
    let jump = text.contains(['x', 'X']);
    if has_step == jump {
        return Err(malformed());
    }

    let parts: Vec<&str> = text.split(['-', 'x', 'X']).collect();
    // A step has exactly one hop; only jumps may chain.
    if parts.len() < 2 || (has_step && parts.len() != 2) {
        return Err(malformed());
    }

    let path = parts
        .iter()
        .map(|p| {
            let n: u32 = p.trim().parse().map_err(|_| malformed())?;
            square_from_number(n)
        })
        .collect::<Result<Vec<Square>, NotationError>>()?;
    Ok(Notation { path, jump })
}
