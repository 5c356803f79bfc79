// =============================================================================
// Draughts Rules Engine
//
// GameEngine owns the board and drives the per-turn cycle:
//   awaiting selection -> piece selected -> (jump chain) piece selected -> ...
// A capture anywhere on the board makes capturing mandatory, and a piece that
// can keep jumping after a capture must do so before the turn passes.
//
// Every mutating call either applies in full or leaves the engine untouched.
// The boolean methods are thin wrappers over the try_* methods, which say why
// a call was refused.
// =============================================================================

use std::collections::BTreeSet;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::error::MoveError;
use crate::moves::{Move, Square};
use crate::piece::Color;

/// What an accepted move did.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct MoveOutcome {
    pub mv: Move,
    pub promoted: bool,
    /// The same piece must jump again; the turn has not passed.
    pub chain_continues: bool,
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Debug)]
pub struct GameEngine {
    board: Board,
    current_player: Color,
    selected_square: Option<Square>,
    legal_moves: Vec<Move>,
    mandatory_capture_squares: BTreeSet<Square>,
    chain_square: Option<Square>,
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEngine {
    pub fn new() -> Self {
        Self::from_position(Board::new(), Color::Red)
    }

    /// Start from an arbitrary position with `to_move` on turn.
    pub fn from_position(board: Board, to_move: Color) -> Self {
        let mut engine = GameEngine {
            board,
            current_player: to_move,
            selected_square: None,
            legal_moves: Vec::new(),
            mandatory_capture_squares: BTreeSet::new(),
            chain_square: None,
        };
        engine.mandatory_capture_squares = engine.compute_mandatory_captures();
        engine
    }

    pub fn reset(&mut self) {
        *self = Self::new();
        info!("game reset");
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn selected_square(&self) -> Option<Square> {
        self.selected_square
    }

    /// Moves open to the selected piece after the capture rules are applied.
    pub fn legal_moves(&self) -> &[Move] {
        &self.legal_moves
    }

    pub fn legal_targets(&self) -> Vec<Square> {
        self.legal_moves.iter().map(|m| m.to).collect()
    }

    pub fn mandatory_capture_squares(&self) -> &BTreeSet<Square> {
        &self.mandatory_capture_squares
    }

    pub fn chain_in_progress(&self) -> bool {
        self.chain_square.is_some()
    }

    pub fn piece_count(&self, color: Color) -> usize {
        self.board.piece_count(color)
    }

    /// All steps and jumps of the piece on `sq`, without capture priority.
    pub fn compute_moves_for_piece(&self, sq: Square) -> Vec<Move> {
        self.board.generate_piece_moves(sq)
    }

    /// Squares of the player to move whose piece has at least one jump.
    pub fn compute_mandatory_captures(&self) -> BTreeSet<Square> {
        self.board
            .squares_of(self.current_player)
            .into_iter()
            .filter(|&sq| !self.board.generate_piece_captures(sq).is_empty())
            .collect()
    }

    /// The moves selecting `sq` would offer, or the reason it can't be selected.
    fn selection_moves(&self, sq: Square) -> Result<Vec<Move>, MoveError> {
        if sq.0 >= 8 || sq.1 >= 8 {
            return Err(MoveError::OutOfBounds(sq));
        }
        let piece = self.board.get(sq).ok_or(MoveError::EmptySquare(sq))?;
        if piece.color != self.current_player {
            return Err(MoveError::NotYourPiece(sq));
        }
        if let Some(chain) = self.chain_square {
            if chain != sq {
                return Err(MoveError::ChainInProgress(chain));
            }
        }
        if !self.mandatory_capture_squares.is_empty()
            && !self.mandatory_capture_squares.contains(&sq)
        {
            return Err(MoveError::CaptureRequired);
        }

        let mut moves = self.compute_moves_for_piece(sq);
        if moves.iter().any(Move::is_capture) {
            moves.retain(Move::is_capture);
        }
        if moves.is_empty() {
            return Err(MoveError::NoLegalMoves(sq));
        }
        Ok(moves)
    }

    /// Squares the player to move could select right now.
    pub fn selectable_squares(&self) -> Vec<Square> {
        self.board
            .squares_of(self.current_player)
            .into_iter()
            .filter(|&sq| self.selection_moves(sq).is_ok())
            .collect()
    }

    /// False when the player to move is stuck: every piece is blocked or gone.
    pub fn has_legal_moves(&self) -> bool {
        !self.selectable_squares().is_empty()
    }

    pub fn try_select_piece(&mut self, sq: Square) -> Result<(), MoveError> {
        let moves = self.selection_moves(sq)?;
        debug!("{:?} selects {:?}: {} move(s)", self.current_player, sq, moves.len());
        self.selected_square = Some(sq);
        self.legal_moves = moves;
        Ok(())
    }

    pub fn select_piece(&mut self, sq: Square) -> bool {
        match self.try_select_piece(sq) {
            Ok(()) => true,
            Err(e) => {
                debug!("selection rejected: {e}");
                false
            }
        }
    }

    pub fn deselect_piece(&mut self) {
        self.selected_square = None;
        self.legal_moves.clear();
    }

    pub fn try_make_move(&mut self, target: Square) -> Result<MoveOutcome, MoveError> {
        let from = self.selected_square.ok_or(MoveError::NothingSelected)?;
        let mv = *self
            .legal_moves
            .iter()
            .find(|m| m.to == target)
            .ok_or(MoveError::IllegalTarget(target))?;
        let mut piece = self.board.get(from).ok_or(MoveError::EmptySquare(from))?;

        self.board.set(from, None);
        if let Some(captured) = mv.captured() {
            self.board.set(captured, None);
        }

        let promoted = !piece.is_king && target.0 == piece.color.back_rank();
        if promoted {
            piece.is_king = true;
            info!("{:?} crowned on {:?}", piece.color, target);
        }
        self.board.set(target, Some(piece));

        // A jumping piece keeps the turn while it has another jump.
        if mv.is_capture() {
            let further = self.board.generate_piece_captures(target);
            if !further.is_empty() {
                debug!("{:?} must keep jumping from {:?}", piece.color, target);
                self.selected_square = Some(target);
                self.legal_moves = further;
                self.chain_square = Some(target);
                self.mandatory_capture_squares = BTreeSet::from([target]);
                return Ok(MoveOutcome { mv, promoted, chain_continues: true });
            }
        }

        self.end_turn();
        Ok(MoveOutcome { mv, promoted, chain_continues: false })
    }

    pub fn make_move(&mut self, target: Square) -> bool {
        match self.try_make_move(target) {
            Ok(_) => true,
            Err(e) => {
                debug!("move rejected: {e}");
                false
            }
        }
    }

    fn end_turn(&mut self) {
        self.current_player = self.current_player.opposite();
        self.deselect_piece();
        self.chain_square = None;
        self.mandatory_capture_squares = self.compute_mandatory_captures();
        debug!(
            "{:?} to move, {} piece(s) must capture",
            self.current_player,
            self.mandatory_capture_squares.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Piece;

    fn position(pieces: &[(Square, Piece)], to_move: Color) -> GameEngine {
        let mut board = Board::empty();
        for &(sq, p) in pieces {
            board.set(sq, Some(p));
        }
        GameEngine::from_position(board, to_move)
    }

    fn red() -> Piece {
        Piece::new(Color::Red)
    }

    fn black() -> Piece {
        Piece::new(Color::Black)
    }

    #[test]
    fn new_game_starts_with_red_and_nothing_selected() {
        let engine = GameEngine::new();
        assert_eq!(engine.current_player(), Color::Red);
        assert_eq!(engine.selected_square(), None);
        assert!(engine.legal_moves().is_empty());
        assert!(engine.mandatory_capture_squares().is_empty());
        assert_eq!(engine.piece_count(Color::Red), 12);
        assert_eq!(engine.piece_count(Color::Black), 12);
    }

    #[test]
    fn opening_step_passes_the_turn() {
        let mut engine = GameEngine::new();
        assert!(!engine.select_piece((2, 1)), "black piece on red's turn");
        assert!(engine.select_piece((5, 0)));
        assert_eq!(engine.legal_targets(), vec![(4, 1)]);

        assert!(engine.make_move((4, 1)));
        assert_eq!(engine.current_player(), Color::Black);
        assert_eq!(engine.selected_square(), None);
        assert!(engine.legal_moves().is_empty());
        assert_eq!(engine.board().get((4, 1)), Some(red()));
        assert_eq!(engine.board().get((5, 0)), None);
    }

    #[test]
    fn single_capture_removes_jumped_piece() {
        let mut engine = position(&[((3, 4), red()), ((2, 3), black())], Color::Red);
        assert!(engine.select_piece((3, 4)));
        assert_eq!(engine.legal_targets(), vec![(1, 2)]);

        assert!(engine.make_move((1, 2)));
        assert_eq!(engine.board().get((2, 3)), None);
        assert_eq!(engine.board().get((1, 2)), Some(red()));
        assert_eq!(engine.board().get((3, 4)), None);
        assert_eq!(engine.current_player(), Color::Black);
        assert_eq!(engine.piece_count(Color::Black), 0);
    }

    #[test]
    fn capture_is_mandatory_at_selection() {
        let mut engine = position(
            &[((5, 2), red()), ((5, 6), red()), ((4, 3), black()), ((0, 7), black())],
            Color::Red,
        );
        assert_eq!(engine.mandatory_capture_squares(), &BTreeSet::from([(5, 2)]));

        assert_eq!(engine.try_select_piece((5, 6)), Err(MoveError::CaptureRequired));
        assert_eq!(engine.selected_square(), None);

        assert!(engine.select_piece((5, 2)));
        // The step to (4, 1) is dropped in favour of the jump.
        assert_eq!(engine.legal_targets(), vec![(3, 4)]);
        assert!(!engine.make_move((4, 1)));
    }

    #[test]
    fn jump_chain_keeps_the_turn_until_exhausted() {
        let mut engine = position(
            &[((5, 0), red()), ((4, 1), black()), ((2, 3), black()), ((0, 7), black())],
            Color::Red,
        );
        assert!(engine.select_piece((5, 0)));
        let outcome = engine.try_make_move((3, 2)).unwrap();
        assert!(outcome.chain_continues);
        assert_eq!(outcome.mv.captured(), Some((4, 1)));

        assert_eq!(engine.current_player(), Color::Red);
        assert_eq!(engine.selected_square(), Some((3, 2)));
        // The step to (2, 1) is not offered mid-chain.
        assert_eq!(engine.legal_targets(), vec![(1, 4)]);
        assert!(engine.chain_in_progress());

        let outcome = engine.try_make_move((1, 4)).unwrap();
        assert!(!outcome.chain_continues);
        assert_eq!(engine.board().get((2, 3)), None);
        assert_eq!(engine.current_player(), Color::Black);
        assert_eq!(engine.selected_square(), None);
        assert!(!engine.chain_in_progress());
    }

    #[test]
    fn deselecting_mid_chain_does_not_release_the_piece() {
        let mut engine = position(
            &[
                ((5, 0), red()),
                ((5, 6), red()),
                ((4, 1), black()),
                ((2, 3), black()),
                ((0, 7), black()),
            ],
            Color::Red,
        );
        assert!(engine.select_piece((5, 0)));
        assert!(engine.make_move((3, 2)));
        assert_eq!(engine.mandatory_capture_squares(), &BTreeSet::from([(3, 2)]));
        assert_eq!(engine.selectable_squares(), vec![(3, 2)]);
        assert!(engine.has_legal_moves());

        engine.deselect_piece();
        assert_eq!(engine.selected_square(), None);
        assert!(engine.legal_moves().is_empty());
        assert_eq!(engine.mandatory_capture_squares(), &BTreeSet::from([(3, 2)]));
        assert_eq!(engine.selectable_squares(), vec![(3, 2)]);

        assert_eq!(
            engine.try_select_piece((5, 6)),
            Err(MoveError::ChainInProgress((3, 2)))
        );
        assert!(engine.select_piece((3, 2)));
        assert_eq!(engine.legal_targets(), vec![(1, 4)]);
    }

    #[test]
    fn man_reaching_back_rank_is_crowned() {
        let mut engine = position(&[((1, 2), red()), ((6, 7), black())], Color::Red);
        assert!(engine.select_piece((1, 2)));
        let outcome = engine.try_make_move((0, 3)).unwrap();
        assert!(outcome.promoted);
        assert_eq!(engine.board().get((0, 3)), Some(Piece::king(Color::Red)));
        assert_eq!(engine.current_player(), Color::Black);
    }

    #[test]
    fn king_returning_to_back_rank_is_not_crowned_again() {
        let mut engine = position(&[((1, 2), Piece::king(Color::Red)), ((6, 7), black())], Color::Red);
        assert!(engine.select_piece((1, 2)));
        let outcome = engine.try_make_move((0, 1)).unwrap();
        assert!(!outcome.promoted);
        assert_eq!(engine.board().get((0, 1)), Some(Piece::king(Color::Red)));

        // Black crowns on row 7.
        assert!(engine.select_piece((6, 7)));
        let outcome = engine.try_make_move((7, 6)).unwrap();
        assert!(outcome.promoted);
        assert_eq!(engine.board().get((7, 6)), Some(Piece::king(Color::Black)));
    }

    #[test]
    fn crowning_mid_jump_lets_the_new_king_jump_backwards() {
        let mut engine = position(
            &[((2, 1), red()), ((1, 2), black()), ((1, 4), black())],
            Color::Red,
        );
        assert!(engine.select_piece((2, 1)));
        let outcome = engine.try_make_move((0, 3)).unwrap();
        assert!(outcome.promoted);
        assert!(outcome.chain_continues);
        assert_eq!(engine.legal_targets(), vec![(2, 5)]);

        assert!(engine.make_move((2, 5)));
        assert_eq!(engine.piece_count(Color::Black), 0);
        assert_eq!(engine.board().get((2, 5)), Some(Piece::king(Color::Red)));
    }

    #[test]
    fn rejected_move_changes_nothing() {
        let mut engine = GameEngine::new();
        assert_eq!(engine.try_make_move((4, 1)), Err(MoveError::NothingSelected));

        assert!(engine.select_piece((5, 0)));
        let before = engine.clone();
        assert_eq!(engine.try_make_move((3, 2)), Err(MoveError::IllegalTarget((3, 2))));
        assert!(!engine.make_move((4, 3)));
        assert_eq!(engine, before);
    }

    #[test]
    fn rejected_selection_keeps_previous_selection() {
        let mut engine = GameEngine::new();
        assert!(engine.select_piece((5, 2)));
        let before = engine.clone();

        assert_eq!(engine.try_select_piece((4, 1)), Err(MoveError::EmptySquare((4, 1))));
        assert_eq!(engine.try_select_piece((2, 1)), Err(MoveError::NotYourPiece((2, 1))));
        assert_eq!(engine.try_select_piece((8, 0)), Err(MoveError::OutOfBounds((8, 0))));
        assert_eq!(engine.try_select_piece((6, 1)), Err(MoveError::NoLegalMoves((6, 1))));
        assert_eq!(engine, before);
    }

    #[test]
    fn reset_restores_the_opening_position() {
        let mut engine = GameEngine::new();
        assert!(engine.select_piece((5, 0)));
        assert!(engine.make_move((4, 1)));
        assert!(engine.select_piece((2, 3)));

        engine.reset();
        assert_eq!(engine, GameEngine::new());
    }

    #[test]
    fn selectable_squares_in_opening() {
        let engine = GameEngine::new();
        assert_eq!(engine.selectable_squares(), vec![(5, 0), (5, 2), (5, 4), (5, 6)]);
        assert!(engine.has_legal_moves());
    }

    #[test]
    fn blocked_player_has_no_legal_moves() {
        let engine = position(&[((5, 0), red()), ((4, 1), black()), ((3, 2), black())], Color::Red);
        assert!(!engine.has_legal_moves());

        let engine = position(&[((5, 0), red()), ((7, 0), black())], Color::Black);
        assert!(!engine.has_legal_moves());

        let engine = position(&[((5, 0), red())], Color::Black);
        assert!(!engine.has_legal_moves());
    }

    #[test]
    fn snapshot_serializes_for_the_renderer() {
        let mut engine = GameEngine::new();
        assert!(engine.select_piece((5, 0)));
        let json = serde_json::to_value(&engine).unwrap();
        assert_eq!(json["current_player"], "Red");
        assert_eq!(json["selected_square"], serde_json::json!([5, 0]));
        assert_eq!(json["board"]["squares"][0][1]["color"], "Black");
        assert_eq!(json["board"]["squares"][0][1]["is_king"], false);
        assert!(json["board"]["squares"][0][0].is_null());
    }
}
