//! Falling-block puzzle engine: board, pieces, collision, locking, line
//! clearing and scoring, plus a gravity-driven game loop. Drawing and raw
//! input capture live in the binary.

pub mod board;
pub mod collision;
pub mod config;
pub mod game;
pub mod gravity;
pub mod lines;
pub mod piece;
pub mod score;

pub use board::{BlockId, Board, Position, SettledBlock, SettledBlocks};
pub use config::Config;
pub use game::{Game, GameEvent, LockOutcome, TickOutcome};
pub use gravity::{Command, GameLoop, GravityTimer};
pub use piece::{ActivePiece, Color, Orientation, PieceKind};
