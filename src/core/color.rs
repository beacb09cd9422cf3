//! Seat colors and their fixed board geometry.
//!
//! Each color owns a start cell on the shared 52-cell track and a
//! home-entry cell one step before its private home stretch. Seat order
//! is fixed for the match: seat 0 is Red, then Green, Yellow, Blue.

use serde::{Deserialize, Serialize};

use super::piece::TRACK_LEN;
use super::seat::Seat;

/// The four player colors, in seat order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Red,
    Green,
    Yellow,
    Blue,
}

impl Color {
    /// All colors in seat order.
    pub const ALL: [Color; 4] = [Color::Red, Color::Green, Color::Yellow, Color::Blue];

    /// The color bound to a seat for the match duration.
    ///
    /// Seats above 3 have no color; callers validate seat counts first.
    #[must_use]
    pub fn for_seat(seat: Seat) -> Self {
        Self::ALL[seat.index()]
    }

    /// Offset of this color's start cell on the shared track.
    ///
    /// Absolute board cell = `(relative_position + offset) mod 52`.
    #[must_use]
    pub const fn track_offset(self) -> u8 {
        match self {
            Color::Red => 0,
            Color::Green => 13,
            Color::Yellow => 26,
            Color::Blue => 39,
        }
    }

    /// Relative track index of this color's home-entry cell.
    ///
    /// A piece crossing this cell leaves the shared track and enters the
    /// color's private home stretch.
    #[must_use]
    pub const fn home_entry(self) -> u8 {
        match self {
            Color::Red => 50,
            Color::Green => 11,
            Color::Yellow => 24,
            Color::Blue => 37,
        }
    }

    /// Convert a relative track position to an absolute board cell.
    #[must_use]
    pub const fn absolute_cell(self, relative_position: u8) -> u8 {
        (relative_position + self.track_offset()) % TRACK_LEN
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Color::Red => "Red",
            Color::Green => "Green",
            Color::Yellow => "Yellow",
            Color::Blue => "Blue",
        };
        write!(f, "{}", name)
    }
}
