//! Core chess types: the board contract the search runs against and its
//! concrete implementation.

mod board;
mod chess_move;
mod color;
mod error;
mod perft;
mod piece_kind;
mod position;
mod square;

pub use board::Board;
pub use chess_move::{Move, MoveFlag};
pub use color::Color;
pub use error::BoardError;
pub use perft::{divide, perft};
pub use piece_kind::PieceKind;
pub use position::{MoveGuard, Position};
pub use square::{Square, SquareIter, SquareSet};

/// FEN of the standard starting position.
pub const STARTING_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
