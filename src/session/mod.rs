//! Multiplayer session management: seats, the host, and the match
//! lifecycle.
//!
//! A [`GameSession`] owns one match from lobby to finish. Connections
//! (whatever the transport) are identified by an opaque
//! [`ConnectionId`]; the session maps them to seats, starts the match
//! when the table fills or the host forces it, and routes commands into
//! the rules engine. After every accepted command callers typically
//! broadcast [`GameSession::snapshot`] so every client renders the same
//! state.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{Command, DiceRng, DiceSource, GameState, Seat, TurnPhase, MAX_SEATS, MIN_SEATS};
use crate::rules::{CommandOutcome, RulesEngine, RulesError};

/// Opaque handle for one connected client, assigned by the transport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConnectionId(pub u64);

/// Where the session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    /// Lobby: seats are filling, no match yet.
    Waiting,
    /// Match in progress.
    Playing,
    /// Match over; the session is read-only.
    Finished,
}

/// Errors surfaced to the transport layer.
#[derive(thiserror::Error, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionError {
    #[error("all {MAX_SEATS} seats are taken")]
    Full,
    #[error("connection is not seated in this session")]
    UnknownConnection,
    #[error("only the host may start the match")]
    NotHost,
    #[error("the match has not started")]
    NotStarted,
    #[error("the match has already started")]
    AlreadyStarted,
    #[error("at least {MIN_SEATS} players are required")]
    NotEnoughPlayers,
    #[error(transparent)]
    Rules(#[from] RulesError),
}

/// Serializable view of the session, broadcast to every client after
/// each accepted command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub status: SessionStatus,
    pub state: Option<GameState>,
}

impl Snapshot {
    /// Encode for the wire.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Decode a snapshot received from the wire.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(bytes)
    }
}

/// One table: lobby, roster, and (once started) the live match.
#[derive(Debug)]
pub struct GameSession<D = DiceRng> {
    engine: RulesEngine<D>,
    status: SessionStatus,
    state: Option<GameState>,
    roster: FxHashMap<ConnectionId, Seat>,
    join_order: Vec<ConnectionId>,
    host: Option<ConnectionId>,
}

impl GameSession<DiceRng> {
    /// Session with a deterministic dice stream, for replays and tests.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(RulesEngine::seeded(seed))
    }

    /// Session with OS-seeded dice.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(RulesEngine::from_entropy())
    }
}

impl<D: DiceSource> GameSession<D> {
    /// Build a session around an existing engine.
    #[must_use]
    pub fn new(engine: RulesEngine<D>) -> Self {
        Self {
            engine,
            status: SessionStatus::Waiting,
            state: None,
            roster: FxHashMap::default(),
            join_order: Vec::new(),
            host: None,
        }
    }

    /// Rebuild a session from a persisted snapshot, reseating the given
    /// connections. The lowest seat's connection becomes host.
    #[must_use]
    pub fn restore(
        engine: RulesEngine<D>,
        snapshot: Snapshot,
        roster: impl IntoIterator<Item = (ConnectionId, Seat)>,
    ) -> Self {
        let mut seated: Vec<(ConnectionId, Seat)> = roster.into_iter().collect();
        seated.sort_by_key(|(_, seat)| *seat);
        let join_order: Vec<ConnectionId> = seated.iter().map(|(conn, _)| *conn).collect();
        Self {
            engine,
            status: snapshot.status,
            state: snapshot.state,
            roster: seated.into_iter().collect(),
            join_order: join_order.clone(),
            host: join_order.first().copied(),
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// Live match state, if the match has started.
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// The connection that opened the table.
    pub fn host(&self) -> Option<ConnectionId> {
        self.host
    }

    /// Seat held by `conn`, if any.
    pub fn seat_of(&self, conn: ConnectionId) -> Option<Seat> {
        self.roster.get(&conn).copied()
    }

    pub fn player_count(&self) -> usize {
        self.join_order.len()
    }

    /// Seat a connection. Seats are handed out in arrival order; the
    /// first arrival becomes host. A connection that is already seated
    /// gets its existing seat back. Seating the fourth player starts
    /// the match immediately.
    pub fn join(&mut self, conn: ConnectionId) -> Result<Seat, SessionError> {
        if self.status != SessionStatus::Waiting {
            return Err(SessionError::AlreadyStarted);
        }
        if let Some(seat) = self.roster.get(&conn) {
            return Ok(*seat);
        }
        if self.join_order.len() >= MAX_SEATS {
            return Err(SessionError::Full);
        }
        let seat = Seat(self.join_order.len() as u8);
        self.roster.insert(conn, seat);
        self.join_order.push(conn);
        if self.host.is_none() {
            self.host = Some(conn);
        }
        if self.join_order.len() == MAX_SEATS {
            self.begin();
        }
        Ok(seat)
    }

    /// Start the match before the table is full. Host only, and at
    /// least two players must be seated.
    pub fn force_start(&mut self, conn: ConnectionId) -> Result<(), SessionError> {
        if self.status != SessionStatus::Waiting {
            return Err(SessionError::AlreadyStarted);
        }
        if !self.roster.contains_key(&conn) {
            return Err(SessionError::UnknownConnection);
        }
        if self.host != Some(conn) {
            return Err(SessionError::NotHost);
        }
        if self.join_order.len() < MIN_SEATS {
            return Err(SessionError::NotEnoughPlayers);
        }
        self.begin();
        Ok(())
    }

    /// Route a command from a seated connection into the rules engine.
    pub fn handle_command(
        &mut self,
        conn: ConnectionId,
        command: Command,
    ) -> Result<CommandOutcome, SessionError> {
        let seat = self
            .roster
            .get(&conn)
            .copied()
            .ok_or(SessionError::UnknownConnection)?;
        if self.status != SessionStatus::Playing {
            return Err(SessionError::NotStarted);
        }
        let state = self.state.as_mut().ok_or(SessionError::NotStarted)?;
        let outcome = self.engine.apply(state, seat, command)?;
        if state.phase == TurnPhase::GameOver {
            self.status = SessionStatus::Finished;
        }
        Ok(outcome)
    }

    /// Handle a dropped connection.
    ///
    /// In the lobby the seat is freed and later arrivals shift down so
    /// seats stay contiguous; if the host left, the next-oldest player
    /// inherits the table. Mid-match the seat stays on the board but is
    /// marked disconnected, and if it was the acting seat its turn is
    /// forfeited so play continues.
    pub fn leave(&mut self, conn: ConnectionId) -> Result<(), SessionError> {
        let seat = self
            .roster
            .remove(&conn)
            .ok_or(SessionError::UnknownConnection)?;
        match self.status {
            SessionStatus::Waiting => {
                self.join_order.retain(|c| *c != conn);
                self.roster.clear();
                for (i, c) in self.join_order.iter().enumerate() {
                    self.roster.insert(*c, Seat(i as u8));
                }
                if self.host == Some(conn) {
                    self.host = self.join_order.first().copied();
                }
            }
            SessionStatus::Playing => {
                if let Some(state) = self.state.as_mut() {
                    state.player_mut(seat).connected = false;
                    let label = state.seat_label(seat);
                    state.log.push(format!("{} disconnected.", label));
                    if state.current_turn == seat && state.phase != TurnPhase::GameOver {
                        self.engine.forfeit_turn(state);
                    }
                    if state.phase == TurnPhase::GameOver {
                        self.status = SessionStatus::Finished;
                    }
                }
            }
            SessionStatus::Finished => {}
        }
        Ok(())
    }

    /// Current view for broadcast.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status,
            state: self.state.clone(),
        }
    }

    fn begin(&mut self) {
        self.state = Some(self.engine.start_game(self.join_order.len()));
        self.status = SessionStatus::Playing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PieceId, ScriptedDice};

    fn conn(n: u64) -> ConnectionId {
        ConnectionId(n)
    }

    fn scripted(faces: impl Into<Vec<u8>>) -> GameSession<ScriptedDice> {
        GameSession::new(RulesEngine::new(ScriptedDice::new(faces)))
    }

    #[test]
    fn first_join_becomes_host() {
        let mut session = GameSession::seeded(1);
        let seat = session.join(conn(10)).unwrap();
        assert_eq!(seat, Seat(0));
        assert_eq!(session.host(), Some(conn(10)));
        assert_eq!(session.status(), SessionStatus::Waiting);
    }

    #[test]
    fn rejoin_returns_existing_seat() {
        let mut session = GameSession::seeded(1);
        let first = session.join(conn(10)).unwrap();
        let again = session.join(conn(10)).unwrap();
        assert_eq!(first, again);
        assert_eq!(session.player_count(), 1);
    }

    #[test]
    fn fourth_join_starts_the_match() {
        let mut session = GameSession::seeded(1);
        for n in 0..4 {
            session.join(conn(n)).unwrap();
        }
        assert_eq!(session.status(), SessionStatus::Playing);
        assert_eq!(session.state().map(GameState::seat_count), Some(4));
        assert_eq!(session.join(conn(9)), Err(SessionError::AlreadyStarted));
    }

    #[test]
    fn force_start_requires_host_and_quorum() {
        let mut session = GameSession::seeded(1);
        session.join(conn(0)).unwrap();
        assert_eq!(
            session.force_start(conn(0)),
            Err(SessionError::NotEnoughPlayers)
        );
        session.join(conn(1)).unwrap();
        assert_eq!(session.force_start(conn(1)), Err(SessionError::NotHost));
        assert_eq!(
            session.force_start(conn(7)),
            Err(SessionError::UnknownConnection)
        );
        session.force_start(conn(0)).unwrap();
        assert_eq!(session.status(), SessionStatus::Playing);
        assert_eq!(session.state().map(GameState::seat_count), Some(2));
    }

    #[test]
    fn commands_rejected_before_start() {
        let mut session = GameSession::seeded(1);
        session.join(conn(0)).unwrap();
        assert_eq!(
            session.handle_command(conn(0), Command::RollDice),
            Err(SessionError::NotStarted)
        );
        assert_eq!(
            session.handle_command(conn(5), Command::RollDice),
            Err(SessionError::UnknownConnection)
        );
    }

    #[test]
    fn out_of_turn_command_leaves_state_untouched() {
        let mut session = scripted([6]);
        session.join(conn(0)).unwrap();
        session.join(conn(1)).unwrap();
        session.force_start(conn(0)).unwrap();
        let before = session.state().cloned();
        let err = session.handle_command(conn(1), Command::RollDice);
        assert!(matches!(err, Err(SessionError::Rules(_))));
        assert_eq!(session.state().cloned(), before);
    }

    #[test]
    fn command_routing_reaches_the_engine() {
        let mut session = scripted([6]);
        session.join(conn(0)).unwrap();
        session.join(conn(1)).unwrap();
        session.force_start(conn(0)).unwrap();
        session.handle_command(conn(0), Command::RollDice).unwrap();
        session
            .handle_command(conn(0), Command::MovePiece { piece: PieceId::new(0) })
            .unwrap();
        let state = session.state().unwrap();
        assert!(state.player(Seat(0)).pieces[0].location.is_track());
    }

    #[test]
    fn lobby_leave_reseats_and_passes_host() {
        let mut session = GameSession::seeded(1);
        session.join(conn(0)).unwrap();
        session.join(conn(1)).unwrap();
        session.join(conn(2)).unwrap();
        session.leave(conn(0)).unwrap();
        assert_eq!(session.host(), Some(conn(1)));
        assert_eq!(session.seat_of(conn(1)), Some(Seat(0)));
        assert_eq!(session.seat_of(conn(2)), Some(Seat(1)));
        assert_eq!(session.player_count(), 2);
    }

    #[test]
    fn acting_player_leaving_forfeits_the_turn() {
        let mut session = scripted([1]);
        session.join(conn(0)).unwrap();
        session.join(conn(1)).unwrap();
        session.force_start(conn(0)).unwrap();
        session.leave(conn(0)).unwrap();
        let state = session.state().unwrap();
        assert!(!state.player(Seat(0)).connected);
        assert_eq!(state.current_turn, Seat(1));
        assert_eq!(session.seat_of(conn(0)), None);
    }

    #[test]
    fn leaving_mid_match_off_turn_only_marks_the_seat() {
        let mut session = scripted([1]);
        session.join(conn(0)).unwrap();
        session.join(conn(1)).unwrap();
        session.force_start(conn(0)).unwrap();
        session.leave(conn(1)).unwrap();
        let state = session.state().unwrap();
        assert!(!state.player(Seat(1)).connected);
        assert_eq!(state.current_turn, Seat(0));
    }

    #[test]
    fn snapshot_round_trips_through_bincode() {
        let mut session = GameSession::seeded(42);
        for n in 0..4 {
            session.join(conn(n)).unwrap();
        }
        let snapshot = session.snapshot();
        let bytes = snapshot.to_bytes().unwrap();
        let decoded = Snapshot::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, snapshot);
    }
}
