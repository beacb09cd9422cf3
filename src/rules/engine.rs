//! The Ludo rules engine.
//!
//! Owns the dice source and applies `RollDice` / `MovePiece` commands to a
//! `GameState`: movement legality, home-stretch entry, capture, the
//! roll-a-6 extra turn, turn-skip on no legal move, and win/rank
//! detection. Every operation is a synchronous state transition; illegal
//! calls return a typed error and leave the state untouched.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::core::command::Command;
use crate::core::piece::{PieceId, PieceLocation, HOME_STRETCH_LEN, PIECES_PER_PLAYER, TRACK_LEN};
use crate::core::rng::{DiceRng, DiceSource};
use crate::core::seat::Seat;
use crate::core::state::{GameState, TurnPhase};

/// Extra rolls granted for consecutive sixes before the turn passes.
pub const MAX_EXTRA_ROLLS: u8 = 2;

/// Rule violations. Fully recoverable: no state is mutated, the caller
/// re-derives legal options from the current state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RulesError {
    /// Command violates the current phase, turn, or movability
    /// preconditions.
    #[error("{seat} may not act during {phase:?}")]
    IllegalAction { seat: Seat, phase: TurnPhase },

    /// Piece id outside 0..=3.
    #[error("piece id {id} is out of range")]
    InvalidPieceId { id: u8 },
}

/// Result of a dice roll.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceOutcome {
    /// The rolled face (1..=6).
    pub value: u8,
    /// Pieces the acting player may now move (for highlighting).
    pub movable: SmallVec<[PieceId; 4]>,
    /// True when nothing was movable and the turn resolved immediately.
    pub turn_passed: bool,
}

/// How a piece move resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveKind {
    /// Left base onto the track start cell (requires a 6).
    EnteredTrack,
    /// Advanced along the shared track.
    Advanced,
    /// Crossed the home-entry cell into the home stretch.
    EnteredHomeStretch,
    /// Advanced within the home stretch.
    AdvancedHomeStretch,
    /// Reached the goal.
    Finished,
    /// Crossing move would overshoot the home stretch; absorbed with no
    /// piece movement, but the turn is still consumed.
    OvershootRejected,
}

/// Result of a piece move.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOutcome {
    /// The piece that was moved.
    pub piece: PieceId,
    /// How the move resolved.
    pub kind: MoveKind,
    /// The piece's location after the move.
    pub location: PieceLocation,
    /// Opposing pieces sent back to base by this move.
    pub captures: SmallVec<[(Seat, PieceId); 4]>,
    /// True when this move ended the match.
    pub game_over: bool,
}

/// Outcome of a generic command dispatch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandOutcome {
    Rolled(DiceOutcome),
    Moved(MoveOutcome),
}

/// The rules engine: a dice source plus the transition functions.
///
/// Holds no game state of its own; callers own the `GameState` and pass
/// it into every call. Externally serialized: one command at a time.
#[derive(Clone, Debug)]
pub struct RulesEngine<D = DiceRng> {
    dice: D,
}

impl RulesEngine<DiceRng> {
    /// Engine with a seeded deterministic dice stream.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(DiceRng::new(seed))
    }

    /// Engine with OS-entropy dice.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(DiceRng::from_entropy())
    }
}

impl<D: DiceSource> RulesEngine<D> {
    /// Create an engine over any dice source.
    #[must_use]
    pub fn new(dice: D) -> Self {
        Self { dice }
    }

    /// Start a fresh match for `seat_count` players (2..=4, pre-validated
    /// by the caller).
    #[must_use]
    pub fn start_game(&self, seat_count: usize) -> GameState {
        let mut state = GameState::new(seat_count);
        state.log.push("Welcome to Ludo!");
        let label = state.seat_label(state.current_turn);
        state.log.push(format!("{}'s turn.", label));
        state
    }

    /// Dispatch a command for the acting seat.
    pub fn apply(
        &mut self,
        state: &mut GameState,
        seat: Seat,
        command: Command,
    ) -> Result<CommandOutcome, RulesError> {
        match command {
            Command::RollDice => self.roll_dice(state, seat).map(CommandOutcome::Rolled),
            Command::MovePiece { piece } => self
                .move_piece(state, seat, piece)
                .map(CommandOutcome::Moved),
        }
    }

    /// Roll the dice and recompute which pieces the acting player may move.
    ///
    /// Base pieces are movable only on a 6; home-stretch pieces only when
    /// `step + roll <= 6` (an exact 6 finishes at move time, overshoot
    /// waits for a smaller roll); track pieces are always movable. With no
    /// movable piece the turn resolves immediately, skipping the piece
    /// choice.
    pub fn roll_dice(
        &mut self,
        state: &mut GameState,
        seat: Seat,
    ) -> Result<DiceOutcome, RulesError> {
        if state.phase != TurnPhase::AwaitingRoll || seat != state.current_turn {
            return Err(RulesError::IllegalAction {
                seat,
                phase: state.phase,
            });
        }

        let value = self.dice.roll_die();
        state.last_dice_value = value;

        let player = state.player_mut(seat);
        let mut movable: SmallVec<[PieceId; 4]> = SmallVec::new();
        for piece in &mut player.pieces {
            piece.movable = match piece.location {
                PieceLocation::Base => value == 6,
                PieceLocation::Track { .. } => true,
                PieceLocation::HomeStretch { step } => step + value <= HOME_STRETCH_LEN,
                PieceLocation::Finished => false,
            };
            if piece.movable {
                movable.push(piece.id);
            }
        }

        state.log.push(format!("Rolled a {}.", value));

        let turn_passed = movable.is_empty();
        if turn_passed {
            state.log.push("No movable piece; passing the turn.");
            self.advance_turn(state);
        } else {
            state.phase = TurnPhase::AwaitingPieceChoice;
            state.log.push("Choose a piece to move.");
        }

        Ok(DiceOutcome {
            value,
            movable,
            turn_passed,
        })
    }

    /// Move a piece by the rolled value.
    ///
    /// Resolution priority: base entry on a 6, home-stretch finish or
    /// advance, track crossing into the home stretch, plain track advance.
    /// Any move ending on the shared track captures every opposing piece
    /// on the same absolute cell. The turn always advances afterwards,
    /// including for the absorbed overshoot move.
    pub fn move_piece(
        &mut self,
        state: &mut GameState,
        seat: Seat,
        piece: PieceId,
    ) -> Result<MoveOutcome, RulesError> {
        if state.phase != TurnPhase::AwaitingPieceChoice || seat != state.current_turn {
            return Err(RulesError::IllegalAction {
                seat,
                phase: state.phase,
            });
        }
        if piece.index() >= PIECES_PER_PLAYER {
            return Err(RulesError::InvalidPieceId { id: piece.0 });
        }

        let roll = state.last_dice_value;
        let color = state.player(seat).color;
        let current = state.player(seat).pieces[piece.index()];
        if !current.movable {
            return Err(RulesError::IllegalAction {
                seat,
                phase: state.phase,
            });
        }

        let (kind, destination) = match current.location {
            PieceLocation::Base => (MoveKind::EnteredTrack, PieceLocation::Track { pos: 0 }),
            PieceLocation::HomeStretch { step } if step + roll == HOME_STRETCH_LEN => {
                (MoveKind::Finished, PieceLocation::Finished)
            }
            // Movability guarantees step + roll < 6 here.
            PieceLocation::HomeStretch { step } => (
                MoveKind::AdvancedHomeStretch,
                PieceLocation::HomeStretch { step: step + roll },
            ),
            PieceLocation::Track { pos } => {
                let home_entry = color.home_entry();
                if pos <= home_entry && pos + roll > home_entry {
                    let overshoot = roll - (home_entry - pos + 1);
                    if overshoot < HOME_STRETCH_LEN {
                        (
                            MoveKind::EnteredHomeStretch,
                            PieceLocation::HomeStretch { step: overshoot },
                        )
                    } else {
                        // Unreachable with a d6, kept to match the
                        // observed rule: the move is silently absorbed.
                        (MoveKind::OvershootRejected, PieceLocation::Track { pos })
                    }
                } else {
                    (
                        MoveKind::Advanced,
                        PieceLocation::Track {
                            pos: (pos + roll) % TRACK_LEN,
                        },
                    )
                }
            }
            PieceLocation::Finished => {
                return Err(RulesError::IllegalAction {
                    seat,
                    phase: state.phase,
                });
            }
        };

        state.player_mut(seat).pieces[piece.index()].location = destination;

        let mut game_over = false;
        if kind == MoveKind::Finished {
            state.log.push("Piece reached the goal!");
            state.player_mut(seat).finished_count += 1;
            if state.player(seat).is_finished() {
                state.finished_player_count += 1;
                let rank = state.finished_player_count;
                state.player_mut(seat).rank = Some(rank);
                let label = state.seat_label(seat);
                state.log.push(format!("{} brought all pieces home!", label));
                if state.finished_player_count as usize >= state.seat_count() - 1 {
                    state.phase = TurnPhase::GameOver;
                    game_over = true;
                    self.rank_last_player(state);
                    state.log.push("Game over!");
                }
            }
        }

        let mut captures: SmallVec<[(Seat, PieceId); 4]> = SmallVec::new();
        if let Some(target_cell) = destination.absolute_cell(color) {
            for other_seat in state.seats() {
                if other_seat == seat {
                    continue;
                }
                let other = state.player_mut(other_seat);
                let other_color = other.color;
                for other_piece in &mut other.pieces {
                    if other_piece.location.absolute_cell(other_color) == Some(target_cell) {
                        other_piece.location = PieceLocation::Base;
                        captures.push((other_seat, other_piece.id));
                    }
                }
            }
            for (captured_seat, _) in &captures {
                let label = state.seat_label(*captured_seat);
                state.log.push(format!("Sent {}'s piece back to base!", label));
            }
        }

        self.advance_turn(state);

        Ok(MoveOutcome {
            piece,
            kind,
            location: destination,
            captures,
            game_over,
        })
    }

    /// Turn-repair primitive: discard any pending roll and rotate with no
    /// extra-roll credit. Used when the acting seat drops mid-turn.
    pub fn forfeit_turn(&self, state: &mut GameState) {
        if state.phase == TurnPhase::GameOver {
            return;
        }
        state.last_dice_value = 0;
        state.consecutive_six_count = 0;
        self.advance_turn(state);
    }

    /// Close the decision point and hand the turn on.
    ///
    /// A 6 grants the same seat another roll, at most `MAX_EXTRA_ROLLS`
    /// times in a row; otherwise rotation skips finished and disconnected
    /// seats, bounded so an all-ineligible roster cannot loop.
    fn advance_turn(&self, state: &mut GameState) {
        let seat = state.current_turn;
        state.player_mut(seat).clear_movable();

        if state.phase == TurnPhase::GameOver {
            state.last_dice_value = 0;
            return;
        }

        if state.last_dice_value == 6 && state.consecutive_six_count < MAX_EXTRA_ROLLS {
            state.consecutive_six_count += 1;
            state.log.push("Rolled a 6; roll again.");
        } else {
            state.consecutive_six_count = 0;
            let seat_count = state.seat_count();
            let mut next = seat;
            for _ in 0..seat_count {
                next = next.next(seat_count);
                let candidate = state.player(next);
                if !candidate.is_finished() && candidate.connected {
                    state.current_turn = next;
                    break;
                }
            }
            let label = state.seat_label(state.current_turn);
            state.log.push(format!("{}'s turn.", label));
        }

        state.last_dice_value = 0;
        state.phase = TurnPhase::AwaitingRoll;
    }

    /// At game end exactly one player is still on the board; give them the
    /// final rank so ranks always form a permutation of 1..=n.
    fn rank_last_player(&self, state: &mut GameState) {
        let last_rank = state.finished_player_count + 1;
        let seats: Vec<Seat> = state.seats().collect();
        for seat in seats {
            let player = state.player_mut(seat);
            if player.rank.is_none() && !player.is_finished() {
                player.rank = Some(last_rank);
            }
        }
    }
}
