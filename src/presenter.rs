//! Board geometry for renderers.
//!
//! The engine tracks pieces in game terms (base, relative track
//! position, home-stretch step). Front ends draw a 15x15 Ludo board, so
//! this module maps a [`PieceLocation`] to its cell on that grid. The
//! tables mirror the classic layout: four 6x6 base yards in the
//! corners, the 52-cell track snaking around the cross, and each
//! color's 6-cell home column pointing at the center.

use crate::core::{Color, PieceId, PieceLocation};

/// One cell on the 15x15 board grid, row 0 at the top.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub row: u8,
    pub col: u8,
}

const fn at(row: u8, col: u8) -> Coordinate {
    Coordinate { row, col }
}

/// Resting slots inside each color's base yard, indexed by piece.
const BASE_CELLS: [[Coordinate; 4]; 4] = [
    [at(1, 1), at(1, 4), at(4, 1), at(4, 4)],
    [at(1, 10), at(1, 13), at(4, 10), at(4, 13)],
    [at(10, 10), at(10, 13), at(13, 10), at(13, 13)],
    [at(10, 1), at(10, 4), at(13, 1), at(13, 4)],
];

/// The shared track in absolute-cell order, starting at Red's entry.
const PATH_CELLS: [Coordinate; 52] = [
    at(6, 1),
    at(6, 2),
    at(6, 3),
    at(6, 4),
    at(6, 5),
    at(5, 6),
    at(4, 6),
    at(3, 6),
    at(2, 6),
    at(1, 6),
    at(0, 6),
    at(0, 7),
    at(0, 8),
    at(1, 8),
    at(2, 8),
    at(3, 8),
    at(4, 8),
    at(5, 8),
    at(6, 9),
    at(6, 10),
    at(6, 11),
    at(6, 12),
    at(6, 13),
    at(6, 14),
    at(7, 14),
    at(8, 14),
    at(8, 13),
    at(8, 12),
    at(8, 11),
    at(8, 10),
    at(8, 9),
    at(9, 8),
    at(10, 8),
    at(11, 8),
    at(12, 8),
    at(13, 8),
    at(14, 8),
    at(14, 7),
    at(14, 6),
    at(13, 6),
    at(12, 6),
    at(11, 6),
    at(10, 6),
    at(9, 6),
    at(8, 5),
    at(8, 4),
    at(8, 3),
    at(8, 2),
    at(8, 1),
    at(8, 0),
    at(7, 0),
    at(6, 0),
];

/// Each color's home column, from the first stretch step to the center.
const HOME_CELLS: [[Coordinate; 6]; 4] = [
    [at(7, 1), at(7, 2), at(7, 3), at(7, 4), at(7, 5), at(7, 6)],
    [at(1, 7), at(2, 7), at(3, 7), at(4, 7), at(5, 7), at(6, 7)],
    [
        at(7, 13),
        at(7, 12),
        at(7, 11),
        at(7, 10),
        at(7, 9),
        at(7, 8),
    ],
    [
        at(13, 7),
        at(12, 7),
        at(11, 7),
        at(10, 7),
        at(9, 7),
        at(8, 7),
    ],
];

/// Grid cell occupied by a piece, or `None` once it has finished.
///
/// Finished pieces leave the board; renderers typically show them in a
/// side panel rather than on the grid.
#[must_use]
pub fn board_cell(location: PieceLocation, color: Color, piece: PieceId) -> Option<Coordinate> {
    match location {
        PieceLocation::Base => Some(BASE_CELLS[color as usize][piece.index()]),
        PieceLocation::Track { pos } => Some(PATH_CELLS[color.absolute_cell(pos) as usize]),
        PieceLocation::HomeStretch { step } => Some(HOME_CELLS[color as usize][step as usize]),
        PieceLocation::Finished => None,
    }
}
