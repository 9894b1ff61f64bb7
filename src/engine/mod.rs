pub mod attacks;
pub mod board;
pub mod game;
pub mod history;
pub mod legality;
pub mod movegen;
pub mod types;

pub use board::Position;
pub use game::GameState;
pub use legality::legal_moves;
pub use types::*;
