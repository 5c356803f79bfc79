pub mod board;
pub mod engine;
pub mod error;
pub mod moves;
pub mod piece;

#[cfg(target_arch = "wasm32")]
mod wasm_api;
