//! Pieces and their board locations.
//!
//! A piece is always in exactly one of four places: its base yard
//! (not yet entered), the shared 52-cell track (position relative to its
//! color's start cell), its color's private 6-cell home stretch, or the
//! goal. Raw integer position encodings from earlier prototypes are
//! replaced by a tagged enum so every transition is matched exhaustively.

use serde::{Deserialize, Serialize};

use super::color::Color;

/// Length of the shared circular track.
pub const TRACK_LEN: u8 = 52;
/// Length of each color's private home stretch.
pub const HOME_STRETCH_LEN: u8 = 6;
/// Pieces per player.
pub const PIECES_PER_PLAYER: usize = 4;

/// Piece identifier within a player's set (0..=3).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PieceId(pub u8);

impl PieceId {
    /// Create a new piece ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw piece index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all four piece IDs.
    pub fn all() -> impl Iterator<Item = PieceId> {
        (0..PIECES_PER_PLAYER as u8).map(PieceId)
    }
}

/// Where a piece currently sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceLocation {
    /// Not yet entered; leaves on a 6.
    Base,
    /// On the shared track, `pos` relative to the owning color's start cell
    /// (0..=51).
    Track { pos: u8 },
    /// In the private home stretch, `step` 0..=5; step 5 is one move from
    /// the goal.
    HomeStretch { step: u8 },
    /// Permanently removed from play.
    Finished,
}

impl PieceLocation {
    /// Absolute board cell for a track piece of the given color.
    ///
    /// `None` for pieces off the shared track.
    #[must_use]
    pub fn absolute_cell(self, color: Color) -> Option<u8> {
        match self {
            PieceLocation::Track { pos } => Some(color.absolute_cell(pos)),
            _ => None,
        }
    }

    /// Is the piece on the shared track?
    #[must_use]
    pub fn is_track(self) -> bool {
        matches!(self, PieceLocation::Track { .. })
    }
}

/// A single piece: identity, location, and the transient movable flag.
///
/// `movable` is only meaningful during the current decision point; it is
/// recomputed on every dice roll and cleared when the turn advances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    pub id: PieceId,
    pub location: PieceLocation,
    pub movable: bool,
}

impl Piece {
    /// Create a piece in its base yard.
    #[must_use]
    pub fn in_base(id: PieceId) -> Self {
        Self {
            id,
            location: PieceLocation::Base,
            movable: false,
        }
    }
}
