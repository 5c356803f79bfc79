use crate::moves::Square;

/// Why the engine refused a selection or a move. A refused call never
/// changes any state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("square {0:?} is off the board")]
    OutOfBounds(Square),

    #[error("no piece on {0:?}")]
    EmptySquare(Square),

    #[error("piece on {0:?} does not belong to the player to move")]
    NotYourPiece(Square),

    #[error("a capture is available; select one of the capturing pieces")]
    CaptureRequired,

    #[error("the piece on {0:?} must continue its capture")]
    ChainInProgress(Square),

    #[error("piece on {0:?} has no legal moves")]
    NoLegalMoves(Square),

    #[error("no piece is selected")]
    NothingSelected,

    #[error("{0:?} is not a legal target for the selected piece")]
    IllegalTarget(Square),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("malformed move text: {0:?}")]
    Malformed(String),

    #[error("square number {0} is outside 1-32")]
    SquareNumber(u32),

    #[error("{text:?} is written as {}", mismatch(.written_jump))]
    KindMismatch { text: String, written_jump: bool },

    #[error("jump is incomplete, piece on {0:?} must continue")]
    IncompleteJump(Square),
}

fn mismatch(written_jump: &bool) -> &'static str {
    if *written_jump {
        "a jump but the move is a step"
    } else {
        "a step but the move is a jump"
    }
}
