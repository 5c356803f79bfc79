use std::io::Read;

use checkers::engine::GameEngine;
use checkers::error::NotationError;
use checkers::moves::parse_notation;
use clap::Parser;

/// Replay a game given in standard notation ("11-15", "22x15", "9x18x27"),
/// one turn per argument, or from stdin when no moves are given.
#[derive(Parser, Debug)]
struct Args {
    moves: Vec<String>,

    /// Print the final engine state as JSON.
    #[arg(long)]
    json: bool,
}

/// Play one turn. The written separator must agree with the move: `-` for a
/// step, `x` for every hop of a jump.
fn play_turn(engine: &mut GameEngine, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let notation = parse_notation(text)?;
    let mut at = notation.path[0];
    engine.try_select_piece(at)?;

    let mut chain_continues = false;
    for &to in &notation.path[1..] {
        if let Some(planned) = engine.legal_moves().iter().find(|m| m.to == to) {
            if planned.is_capture() != notation.jump {
                return Err(NotationError::KindMismatch {
                    text: text.to_string(),
                    written_jump: notation.jump,
                }
                .into());
            }
        }
        chain_continues = engine.try_make_move(to)?.chain_continues;
        at = to;
    }
    if chain_continues {
        return Err(NotationError::IncompleteJump(at).into());
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    let moves = if args.moves.is_empty() {
        let mut input = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut input) {
            eprintln!("failed to read stdin: {e}");
            std::process::exit(1);
        }
        input.split_whitespace().map(str::to_string).collect()
    } else {
        args.moves
    };

    let mut engine = GameEngine::new();
    for (i, text) in moves.iter().enumerate() {
        if let Err(e) = play_turn(&mut engine, text) {
            eprintln!("turn {} ({text}): {e}", i + 1);
            std::process::exit(1);
        }
        log::info!("{text}");
    }

    if args.json {
        match serde_json::to_string_pretty(&engine) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                eprintln!("failed to serialize state: {e}");
                std::process::exit(1);
            }
        }
    } else {
        print!("{}", engine.board());
        let status = if engine.has_legal_moves() { "to move" } else { "has no legal moves" };
        println!("{:?} {status}", engine.current_player());
    }
}
