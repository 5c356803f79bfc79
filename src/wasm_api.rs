use crate::engine::GameEngine;
use crate::moves::Square;
use crate::piece::Color;
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct SquarePiece {
    color: String,
    is_king: bool,
}

#[derive(Serialize)]
struct TargetJson {
    to: [usize; 2],
    capture: Option<[usize; 2]>,
    notation: String,
}

#[derive(Serialize)]
struct BoardState {
    squares: Vec<Vec<Option<SquarePiece>>>,
    current_player: String,
    selected_square: Option<[usize; 2]>,
    legal_targets: Vec<TargetJson>,
    mandatory_captures: Vec<[usize; 2]>,
    selectable: Vec<[usize; 2]>,
    chain_in_progress: bool,
    has_legal_moves: bool,
    red_count: usize,
    black_count: usize,
}

#[derive(Serialize)]
struct MoveResult {
    #[serde(flatten)]
    board_state: Option<BoardState>,
    promoted: bool,
    error: Option<String>,
}

fn color_to_string(c: Color) -> String {
    match c {
        Color::Red => "Red".to_string(),
        Color::Black => "Black".to_string(),
    }
}

fn sq(s: Square) -> [usize; 2] {
    [s.0, s.1]
}

fn build_board_state(engine: &GameEngine) -> BoardState {
    let board = engine.board();
    let squares: Vec<Vec<Option<SquarePiece>>> = (0..8)
        .map(|r| {
            (0..8)
                .map(|c| {
                    board.squares[r][c].map(|p| SquarePiece {
                        color: color_to_string(p.color),
                        is_king: p.is_king,
                    })
                })
                .collect()
        })
        .collect();

    let legal_targets: Vec<TargetJson> = engine
        .legal_moves()
        .iter()
        .map(|m| TargetJson {
            to: sq(m.to),
            capture: m.captured().map(sq),
            notation: m.to_notation(),
        })
        .collect();

    BoardState {
        squares,
        current_player: color_to_string(engine.current_player()),
        selected_square: engine.selected_square().map(sq),
        legal_targets,
        mandatory_captures: engine.mandatory_capture_squares().iter().copied().map(sq).collect(),
        selectable: engine.selectable_squares().into_iter().map(sq).collect(),
        chain_in_progress: engine.chain_in_progress(),
        has_legal_moves: engine.has_legal_moves(),
        red_count: engine.piece_count(Color::Red),
        black_count: engine.piece_count(Color::Black),
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    // A second init (e.g. hot reload) is harmless.
    let _ = console_log::init_with_level(log::Level::Debug);
}

#[wasm_bindgen]
pub struct Game {
    engine: GameEngine,
}

#[wasm_bindgen]
impl Game {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Game {
        Game {
            engine: GameEngine::new(),
        }
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }

    pub fn build_timestamp() -> String {
        env!("BUILD_TIMESTAMP").to_string()
    }

    pub fn get_state(&self) -> JsValue {
        let state = build_board_state(&self.engine);
        serde_wasm_bindgen::to_value(&state).unwrap_or(JsValue::NULL)
    }

    pub fn select_piece(&mut self, row: usize, col: usize) -> bool {
        self.engine.select_piece((row, col))
    }

    pub fn deselect_piece(&mut self) {
        self.engine.deselect_piece();
    }

    pub fn make_move(&mut self, row: usize, col: usize) -> JsValue {
        let result = match self.engine.try_make_move((row, col)) {
            Ok(outcome) => MoveResult {
                board_state: Some(build_board_state(&self.engine)),
                promoted: outcome.promoted,
                error: None,
            },
            Err(e) => MoveResult {
                board_state: None,
                promoted: false,
                error: Some(e.to_string()),
            },
        };
        serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
    }

    pub fn get_legal_targets(&self) -> JsValue {
        let targets: Vec<[usize; 2]> = self.engine.legal_targets().into_iter().map(sq).collect();
        serde_wasm_bindgen::to_value(&targets).unwrap_or(JsValue::NULL)
    }
}
