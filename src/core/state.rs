//! Match state: seats, turn bookkeeping, and the rolling event log.
//!
//! ## GameState
//!
//! The single authoritative value for a match. It is created once per
//! match, mutated only through the rules engine, and discarded when the
//! match ends. No process-wide globals: callers own the state and pass it
//! into every engine call.
//!
//! ## EventLog
//!
//! A fixed-capacity FIFO of human-readable event strings. Pushing past
//! capacity evicts the oldest entry.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::color::Color;
use super::piece::{Piece, PieceId, PieceLocation, PIECES_PER_PLAYER};
use super::seat::{Seat, SeatMap};

/// Entries kept in the rolling log.
pub const LOG_CAPACITY: usize = 5;

/// Where the acting seat is in its turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    /// Waiting for the acting seat to roll.
    AwaitingRoll,
    /// Dice rolled; waiting for the acting seat to pick a movable piece.
    AwaitingPieceChoice,
    /// Match finished; no further commands are accepted.
    GameOver,
}

/// Bounded rolling log of human-readable event strings.
///
/// Uses a persistent vector so snapshots share structure with the live
/// state.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EventLog {
    entries: Vector<String>,
}

impl EventLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, evicting the oldest entry past capacity.
    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.push_back(message.into());
        while self.entries.len() > LOG_CAPACITY {
            self.entries.pop_front();
        }
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Is the log empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// The most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }
}

/// One seat's side of the match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    /// Color bound to this seat for the match duration.
    pub color: Color,
    /// The four pieces.
    pub pieces: [Piece; PIECES_PER_PLAYER],
    /// Pieces in `Finished` (0..=4).
    pub finished_count: u8,
    /// 1-based finishing rank, set when the fourth piece finishes.
    pub rank: Option<u8>,
    /// False once the remote player drops; always true in offline play.
    pub connected: bool,
}

impl PlayerState {
    /// Create a player with all pieces in base.
    #[must_use]
    pub fn new(color: Color) -> Self {
        let pieces = [
            Piece::in_base(PieceId::new(0)),
            Piece::in_base(PieceId::new(1)),
            Piece::in_base(PieceId::new(2)),
            Piece::in_base(PieceId::new(3)),
        ];
        Self {
            color,
            pieces,
            finished_count: 0,
            rank: None,
            connected: true,
        }
    }

    /// Has this player brought all four pieces home?
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished_count as usize == PIECES_PER_PLAYER
    }

    /// Piece IDs currently flagged movable.
    pub fn movable_pieces(&self) -> impl Iterator<Item = PieceId> + '_ {
        self.pieces.iter().filter(|p| p.movable).map(|p| p.id)
    }

    /// Clear all movable flags (end of decision point).
    pub fn clear_movable(&mut self) {
        for piece in &mut self.pieces {
            piece.movable = false;
        }
    }
}

/// Authoritative state of one Ludo match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    seats: SeatMap<PlayerState>,

    /// The acting seat.
    pub current_turn: Seat,

    /// Last rolled value; 0 means not yet rolled this decision point.
    pub last_dice_value: u8,

    /// Extra rolls already granted for consecutive sixes (capped at 2).
    pub consecutive_six_count: u8,

    /// Turn phase.
    pub phase: TurnPhase,

    /// Rolling log of the last few events.
    pub log: EventLog,

    /// Players who have finished all four pieces.
    pub finished_player_count: u8,
}

impl GameState {
    /// Create a fresh match state for `seat_count` players (2..=4).
    ///
    /// Seat 0 acts first; all pieces start in base.
    #[must_use]
    pub fn new(seat_count: usize) -> Self {
        Self {
            seats: SeatMap::new(seat_count, |seat| PlayerState::new(Color::for_seat(seat))),
            current_turn: Seat::new(0),
            last_dice_value: 0,
            consecutive_six_count: 0,
            phase: TurnPhase::AwaitingRoll,
            log: EventLog::new(),
            finished_player_count: 0,
        }
    }

    /// Number of seats in this match.
    #[must_use]
    pub fn seat_count(&self) -> usize {
        self.seats.seat_count()
    }

    /// Iterate all seats.
    pub fn seats(&self) -> impl Iterator<Item = Seat> {
        Seat::all(self.seat_count())
    }

    /// Get a seat's player state.
    #[must_use]
    pub fn player(&self, seat: Seat) -> &PlayerState {
        &self.seats[seat]
    }

    /// Get a seat's player state mutably.
    pub fn player_mut(&mut self, seat: Seat) -> &mut PlayerState {
        &mut self.seats[seat]
    }

    /// Iterate (Seat, &PlayerState) pairs.
    pub fn players(&self) -> impl Iterator<Item = (Seat, &PlayerState)> {
        self.seats.iter()
    }

    /// "Player N (Color)" label used in log messages.
    #[must_use]
    pub fn seat_label(&self, seat: Seat) -> String {
        format!("{} ({})", seat, self.player(seat).color)
    }

    /// Look up a piece location directly.
    #[must_use]
    pub fn piece_location(&self, seat: Seat, piece: PieceId) -> PieceLocation {
        self.player(seat).pieces[piece.index()].location
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(4);

        assert_eq!(state.seat_count(), 4);
        assert_eq!(state.current_turn, Seat::new(0));
        assert_eq!(state.last_dice_value, 0);
        assert_eq!(state.phase, TurnPhase::AwaitingRoll);
        assert_eq!(state.finished_player_count, 0);

        for (seat, player) in state.players() {
            assert_eq!(player.color, Color::for_seat(seat));
            assert_eq!(player.finished_count, 0);
            assert_eq!(player.rank, None);
            assert!(player.connected);
            for piece in &player.pieces {
                assert_eq!(piece.location, PieceLocation::Base);
                assert!(!piece.movable);
            }
        }
    }

    #[test]
    fn test_two_player_state() {
        let state = GameState::new(2);
        assert_eq!(state.seat_count(), 2);
        assert_eq!(state.player(Seat::new(1)).color, Color::Green);
    }

    #[test]
    fn test_seat_label() {
        let state = GameState::new(4);
        assert_eq!(state.seat_label(Seat::new(0)), "Player 1 (Red)");
        assert_eq!(state.seat_label(Seat::new(3)), "Player 4 (Blue)");
    }

    #[test]
    fn test_event_log_eviction() {
        let mut log = EventLog::new();
        for i in 0..7 {
            log.push(format!("event {}", i));
        }

        assert_eq!(log.len(), LOG_CAPACITY);
        let entries: Vec<_> = log.iter().collect();
        assert_eq!(
            entries,
            vec!["event 2", "event 3", "event 4", "event 5", "event 6"]
        );
        assert_eq!(log.latest(), Some("event 6"));
    }

    #[test]
    fn test_event_log_empty() {
        let log = EventLog::new();
        assert!(log.is_empty());
        assert_eq!(log.latest(), None);
    }

    #[test]
    fn test_movable_pieces() {
        let mut state = GameState::new(2);
        let seat = Seat::new(0);
        state.player_mut(seat).pieces[1].movable = true;
        state.player_mut(seat).pieces[3].movable = true;

        let movable: Vec<_> = state.player(seat).movable_pieces().collect();
        assert_eq!(movable, vec![PieceId::new(1), PieceId::new(3)]);

        state.player_mut(seat).clear_movable();
        assert_eq!(state.player(seat).movable_pieces().count(), 0);
    }

    #[test]
    fn test_state_serialization() {
        let mut state = GameState::new(3);
        state.log.push("hello");
        state.player_mut(Seat::new(1)).pieces[0].location = PieceLocation::Track { pos: 10 };

        let json = serde_json::to_string(&state).unwrap();
        let deserialized: GameState = serde_json::from_str(&json).unwrap();

        assert_eq!(state, deserialized);
    }
}
