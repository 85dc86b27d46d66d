//! Pieces module - tetromino shapes, rotation and kick-offset tables
//!
//! A piece owns a small [`Grid`] holding its shape in the current orientation.
//! Rotation rebuilds that grid by transposing it about its bounding box, so
//! the kick tables below are expressed as per-orientation offsets: the
//! translation for kick test `i` is `offsets[from][i] - offsets[to][i]`.
//! Reference: <https://tetris.wiki/SRS> (offset formulation)

use crate::grid::Grid;
use crate::types::{CellTag, Coord, Orientation, PieceKind, KICK_TESTS};

/// Offsets per orientation (Up, Right, Down, Left), five kick tests each
pub type KickTable = [[Coord; KICK_TESTS]; 4];

const fn c(x: i32, y: i32) -> Coord {
    Coord::new(x, y)
}

/// JLSTZ offsets (shared by J, L, S, T, Z)
pub const JLSTZ_KICKS: KickTable = [
    // Up
    [c(0, 0), c(0, 0), c(0, 0), c(0, 0), c(0, 0)],
    // Right
    [c(0, 0), c(1, 0), c(1, -1), c(0, 2), c(1, 2)],
    // Down
    [c(0, 0), c(0, 0), c(0, 0), c(0, 0), c(0, 0)],
    // Left
    [c(0, 0), c(-1, 0), c(-1, -1), c(0, 2), c(-1, 2)],
];

/// I offsets, shifted so the first test is the plain bounding-box rotation
pub const I_KICKS: KickTable = [
    // Up
    [c(0, 0), c(-1, 0), c(2, 0), c(-1, 0), c(2, 0)],
    // Right
    [c(0, 0), c(1, 0), c(1, 0), c(1, 1), c(1, -2)],
    // Down
    [c(0, 0), c(2, 0), c(-1, 0), c(2, -1), c(-1, -1)],
    // Left
    [c(0, 0), c(0, 0), c(0, 0), c(0, -2), c(0, 1)],
];

/// O piece has no kicks (a 2x2 box rotates onto itself)
pub const O_KICKS: KickTable = [[c(0, 0); KICK_TESTS]; 4];

/// Per-kind origin used to line pieces up across previews, indexed by [`PieceKind::index`]
const ORIGINS: [Coord; 7] = [
    c(1, 2), // I
    c(1, 1), // O
    c(0, 1), // T
    c(0, 1), // S
    c(0, 1), // Z
    c(0, 1), // J
    c(0, 1), // L
];

/// Per-kind nudge applied only when spawning
const SPAWN_OFFSETS: [Coord; 7] = [
    c(0, 0),  // I
    c(0, -1), // O
    c(0, -1), // T
    c(0, -1), // S
    c(0, -1), // Z
    c(0, -1), // J
    c(0, -1), // L
];

/// Bounding box side length per kind
const BOX_SIZES: [i32; 7] = [4, 2, 3, 3, 3, 3, 3];

/// Spawn shapes, piece-local with y up
const SHAPES: [[(i32, i32); 4]; 7] = [
    [(0, 2), (1, 2), (2, 2), (3, 2)], // I
    [(0, 0), (0, 1), (1, 0), (1, 1)], // O
    [(0, 1), (1, 1), (2, 1), (1, 2)], // T
    [(0, 1), (1, 1), (1, 2), (2, 2)], // S
    [(0, 2), (1, 2), (1, 1), (2, 1)], // Z
    [(0, 1), (0, 2), (1, 1), (2, 1)], // J
    [(0, 1), (1, 1), (2, 1), (2, 2)], // L
];

/// Get the kick-offset table for a piece kind
pub fn kick_table(kind: PieceKind) -> &'static KickTable {
    match kind {
        PieceKind::O => &O_KICKS,
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    }
}

pub fn origin(kind: PieceKind) -> Coord {
    ORIGINS[kind.index()]
}

pub fn spawn_offset(kind: PieceKind) -> Coord {
    SPAWN_OFFSETS[kind.index()]
}

/// Build the spawn-orientation grid for a kind, tagged with the kind
pub fn spawn_grid(kind: PieceKind) -> Grid {
    let size = BOX_SIZES[kind.index()];
    let mut grid = Grid::filled(size, size, CellTag::Piece(kind));
    for &(x, y) in SHAPES[kind.index()].iter() {
        grid.set(x, y, true);
    }
    grid
}

/// A tetromino: identity, current shape and orientation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    grid: Grid,
    orientation: Orientation,
    kicks: &'static KickTable,
}

impl Piece {
    /// Wrap an existing shape; orientation starts at Up
    pub fn new(kind: PieceKind, grid: Grid, kicks: &'static KickTable) -> Self {
        Self {
            kind,
            grid,
            orientation: Orientation::Up,
            kicks,
        }
    }

    /// A fresh piece of `kind` in spawn orientation
    pub fn spawn(kind: PieceKind) -> Self {
        Self::new(kind, spawn_grid(kind), kick_table(kind))
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn kicks(&self) -> &'static KickTable {
        self.kicks
    }

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    pub fn origin(&self) -> Coord {
        origin(self.kind)
    }

    pub fn spawn_offset(&self) -> Coord {
        spawn_offset(self.kind)
    }

    /// Reskin every cell, e.g. with [`CellTag::Ghost`] for the landing preview
    pub fn set_all_tags(&mut self, tag: CellTag) {
        self.grid.set_all_tags(tag);
    }

    /// Rotate 90° clockwise about the bounding box
    pub fn rotate_cw(&mut self) -> &mut Self {
        let (w, h) = (self.grid.width(), self.grid.height());
        let mut rotated = Grid::new(h, w);
        for y in 0..h {
            for x in 0..w {
                rotated.set_cell(y, w - 1 - x, self.grid.cell(x, y));
            }
        }
        self.grid = rotated;
        self.orientation = self.orientation.rotate_cw();
        self
    }

    /// Rotate 90° counter-clockwise about the bounding box
    pub fn rotate_ccw(&mut self) -> &mut Self {
        let (w, h) = (self.grid.width(), self.grid.height());
        let mut rotated = Grid::new(h, w);
        for y in 0..h {
            for x in 0..w {
                rotated.set_cell(h - 1 - y, x, self.grid.cell(x, y));
            }
        }
        self.grid = rotated;
        self.orientation = self.orientation.rotate_ccw();
        self
    }

    /// Translation for kick test `index` when going from `from` to `to`
    pub fn kick_translation(&self, from: Orientation, to: Orientation, index: usize) -> Coord {
        self.kicks[from.index()][index] - self.kicks[to.index()][index]
    }
}
