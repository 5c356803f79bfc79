use checkers::engine::GameEngine;
use checkers::error::MoveError;
use checkers::piece::Color;
use clap::Parser;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;

/// Play random legal games to exercise the rules engine.
#[derive(Parser, Debug)]
struct Args {
    /// Number of games to play.
    #[arg(long, default_value_t = 1)]
    games: usize,

    /// Stop a game after this many turns and call it unfinished.
    #[arg(long, default_value_t = 200)]
    max_plies: u32,

    /// Seed for reproducible games; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Print one JSON summary per game instead of text.
    #[arg(long)]
    json: bool,
}

#[derive(Serialize, Debug)]
struct GameSummary {
    game: usize,
    plies: u32,
    /// Side left to move with no legal move loses; None if the ply limit hit first.
    winner: Option<Color>,
    red_pieces: usize,
    black_pieces: usize,
}

fn play_game(rng: &mut StdRng, max_plies: u32) -> Result<(GameEngine, u32, Option<Color>), MoveError> {
    let mut engine = GameEngine::new();

    for ply in 0..max_plies {
        let selectable = engine.selectable_squares();
        let Some(&from) = selectable.choose(rng) else {
            let winner = engine.current_player().opposite();
            return Ok((engine, ply, Some(winner)));
        };
        engine.try_select_piece(from)?;

        loop {
            let targets = engine.legal_targets();
            let Some(&to) = targets.choose(rng) else {
                return Err(MoveError::NoLegalMoves(from));
            };
            let outcome = engine.try_make_move(to)?;
            log::debug!("{}", outcome.mv.to_notation());
            if !outcome.chain_continues {
                break;
            }
        }
    }

    Ok((engine, max_plies, None))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("seed {seed}");
    let mut rng = StdRng::seed_from_u64(seed);

    let (mut red_wins, mut black_wins, mut unfinished) = (0, 0, 0);
    for game in 1..=args.games {
        let (engine, plies, winner) = play_game(&mut rng, args.max_plies)?;
        match winner {
            Some(Color::Red) => red_wins += 1,
            Some(Color::Black) => black_wins += 1,
            None => unfinished += 1,
        }

        let summary = GameSummary {
            game,
            plies,
            winner,
            red_pieces: engine.piece_count(Color::Red),
            black_pieces: engine.piece_count(Color::Black),
        };
        if args.json {
            println!("{}", serde_json::to_string(&summary)?);
        } else {
            let result = match winner {
                Some(c) => format!("{c:?} wins"),
                None => "unfinished".to_string(),
            };
            eprintln!("Game {game}: {result} after {plies} plies");
            eprint!("{}", engine.board());
        }
    }

    if !args.json {
        eprintln!("Red {red_wins}, Black {black_wins}, unfinished {unfinished}");
    }
    Ok(())
}
