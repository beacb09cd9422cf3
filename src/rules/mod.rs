//! Rule semantics: the state machine that drives a match.
//!
//! The engine interprets `core` data; it never renders, listens on
//! sockets, or blocks. Collaborators (terminal UI, network transport)
//! feed it commands and present the resulting state.

pub mod engine;

pub use engine::{
    CommandOutcome, DiceOutcome, MoveKind, MoveOutcome, RulesEngine, RulesError, MAX_EXTRA_ROLLS,
};
