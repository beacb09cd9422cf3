//! # ludo-engine
//!
//! A rules engine and session layer for four-player Ludo.
//!
//! ## Design Principles
//!
//! 1. **Transport-Agnostic**: No sockets, no terminal. The engine takes
//!    commands and returns outcomes; front ends render snapshots.
//!
//! 2. **Deterministic by Construction**: All randomness flows through the
//!    `DiceSource` trait. A seeded engine replays a match exactly.
//!
//! 3. **State In, State Out**: Commands mutate a `GameState` that is
//!    cheap to clone and fully serializable, so a server can broadcast
//!    the whole board after every move.
//!
//! ## Modules
//!
//! - `core`: Colors, seats, pieces, commands, dice, game state
//! - `rules`: The turn state machine (rolls, moves, captures, ranking)
//! - `session`: Lobby, seating, host control, disconnects, snapshots
//! - `presenter`: Piece-location to board-grid mapping for renderers

pub mod core;
pub mod presenter;
pub mod rules;
pub mod session;

// Re-export commonly used types
pub use crate::core::{
    Color, Command, DiceRng, DiceSource, EventLog, GameState, Piece, PieceId, PieceLocation, PlayerState,
    ScriptedDice, Seat, SeatMap, TurnPhase, HOME_STRETCH_LEN, LOG_CAPACITY, MAX_SEATS, MIN_SEATS,
    PIECES_PER_PLAYER, TRACK_LEN,
};

pub use crate::rules::{
    CommandOutcome, DiceOutcome, MoveKind, MoveOutcome, RulesEngine, RulesError, MAX_EXTRA_ROLLS,
};

pub use crate::session::{ConnectionId, GameSession, SessionError, SessionStatus, Snapshot};

pub use crate::presenter::{board_cell, Coordinate};
