//! Grid module - fixed-size 2D array of cells
//!
//! Used both for the playing field and for each piece's shape.
//! Uses a flat vector in row-major order (`y * width + x`) for cache locality.
//! Coordinates: (x, y) with the origin at the bottom-left, y growing upwards.
//!
//! Out-of-range reads report an unoccupied cell and out-of-range writes are
//! ignored. Collision tests near the field borders rely on this.

use crate::types::{Cell, CellTag};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a grid of unoccupied, untagged cells
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, CellTag::Empty)
    }

    /// Create a grid of unoccupied cells that all carry `tag`
    pub fn filled(width: i32, height: i32, tag: CellTag) -> Self {
        debug_assert!(width > 0 && height > 0, "grid dimensions must be positive");
        let len = (width.max(0) as usize) * (height.max(0) as usize);
        Self {
            width,
            height,
            cells: vec![Cell::new(false, tag); len],
        }
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Occupancy at (x, y); false when out of bounds
    pub fn get(&self, x: i32, y: i32) -> bool {
        self.index(x, y).is_some_and(|idx| self.cells[idx].occupied)
    }

    /// Cell at (x, y); [`Cell::EMPTY`] when out of bounds
    pub fn cell(&self, x: i32, y: i32) -> Cell {
        self.index(x, y).map_or(Cell::EMPTY, |idx| self.cells[idx])
    }

    /// Set occupancy, keeping the tag.
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, occupied: bool) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx].occupied = occupied;
                true
            }
            None => false,
        }
    }

    /// Set occupancy and tag.
    /// Returns false if out of bounds
    pub fn set_tagged(&mut self, x: i32, y: i32, occupied: bool, tag: CellTag) -> bool {
        self.set_cell(x, y, Cell::new(occupied, tag))
    }

    /// Replace the whole cell.
    /// Returns false if out of bounds
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Rewrite every cell's tag without touching occupancy
    pub fn set_all_tags(&mut self, tag: CellTag) {
        for cell in &mut self.cells {
            cell.tag = tag;
        }
    }

    /// True iff some occupied cell (x, y) of `self` lines up with an occupied
    /// cell (x - offset_x, y - offset_y) of `other`.
    ///
    /// Scans the full extent of `self`, so call it on the field with the
    /// moving piece as `other`: `field.intersects(piece, pos.x, pos.y)`.
    pub fn intersects(&self, other: &Grid, offset_x: i32, offset_y: i32) -> bool {
        for y in 0..self.height {
            for x in 0..self.width {
                if self.get(x, y) && other.get(x - offset_x, y - offset_y) {
                    return true;
                }
            }
        }
        false
    }

    /// Occupied cells as `(x, y, cell)`, bottom row first
    pub fn occupied_cells(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        let width = self.width.max(1) as usize;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.occupied)
            .map(move |(idx, cell)| ((idx % width) as i32, (idx / width) as i32, *cell))
    }

    /// Row-major view of every cell
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row (bottom is 0); empty slice when out of bounds
    pub fn row(&self, y: i32) -> &[Cell] {
        if y < 0 || y >= self.height {
            return &[];
        }
        let start = (y as usize) * (self.width as usize);
        &self.cells[start..start + self.width as usize]
    }

    /// Build a grid from rows written top row first, `#` for occupied.
    ///
    /// Handy for shapes and test fixtures:
    ///
    /// ```
    /// use blockfall_core::Grid;
    ///
    /// let t = Grid::from_rows(&["...", ".#.", "###"]);
    /// assert!(t.get(1, 1));
    /// assert!(!t.get(0, 2));
    /// ```
    pub fn from_rows(rows: &[&str]) -> Self {
        let height = rows.len() as i32;
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0) as i32;
        let mut grid = Grid::new(width, height);
        for (i, row) in rows.iter().enumerate() {
            let y = height - 1 - i as i32;
            for (x, ch) in row.chars().enumerate() {
                if ch == '#' {
                    grid.set(x as i32, y, true);
                }
            }
        }
        grid
    }
}
