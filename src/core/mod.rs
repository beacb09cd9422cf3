//! Core types: seats, colors, pieces, commands, dice, match state.
//!
//! Everything here is plain data. Rule semantics live in `rules`; the
//! session layer and presenter consume these types read-only.

pub mod color;
pub mod command;
pub mod piece;
pub mod rng;
pub mod seat;
pub mod state;

pub use color::Color;
pub use command::Command;
pub use piece::{Piece, PieceId, PieceLocation, HOME_STRETCH_LEN, PIECES_PER_PLAYER, TRACK_LEN};
pub use rng::{DiceRng, DiceSource, ScriptedDice};
pub use seat::{Seat, SeatMap, MAX_SEATS, MIN_SEATS};
pub use state::{EventLog, GameState, PlayerState, TurnPhase, LOG_CAPACITY};
