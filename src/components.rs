use bevy::prelude::*;

// ---------------------------------------------------------------------------
// Grid and spatial
// ---------------------------------------------------------------------------

/// A grid coordinate. Ordered so cell collections iterate deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    /// The cell one step away in `dir`.
    pub fn step(self, dir: Direction) -> Cell {
        let (dx, dy) = dir.delta();
        Cell::new(self.x + dx, self.y + dy)
    }

    /// Walkable-agnostic neighbours under the given connectivity.
    pub fn neighbors(self, connectivity: Connectivity) -> impl Iterator<Item = Cell> {
        connectivity
            .directions()
            .iter()
            .map(move |dir| self.step(*dir))
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Manhattan distance, the admissible heuristic for 4-connected movement.
pub fn manhattan(a: &Cell, b: &Cell) -> u32 {
    (a.x - b.x).unsigned_abs() + (a.y - b.y).unsigned_abs()
}

/// Chebyshev distance, the admissible heuristic for 8-connected movement.
pub fn chebyshev(a: &Cell, b: &Cell) -> u32 {
    (a.x - b.x).unsigned_abs().max((a.y - b.y).unsigned_abs())
}

/// Movement direction, including diagonals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl Direction {
    pub const CARDINAL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    /// Grid offset for this direction.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::UpRight => (1, -1),
            Direction::Right => (1, 0),
            Direction::DownRight => (1, 1),
            Direction::Down => (0, 1),
            Direction::DownLeft => (-1, 1),
            Direction::Left => (-1, 0),
            Direction::UpLeft => (-1, -1),
        }
    }
}

/// Which neighbours count as one step for path search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connectivity {
    Four,
    Eight,
}

impl Connectivity {
    pub fn directions(&self) -> &'static [Direction] {
        match self {
            Connectivity::Four => &Direction::CARDINAL,
            Connectivity::Eight => &Direction::ALL,
        }
    }

    /// Admissible distance estimate matching this connectivity.
    pub fn distance(&self, a: &Cell, b: &Cell) -> u32 {
        match self {
            Connectivity::Four => manhattan(a, b),
            Connectivity::Eight => chebyshev(a, b),
        }
    }
}

// ---------------------------------------------------------------------------
// Display markers
// ---------------------------------------------------------------------------

/// UI text node showing one cell of the glyph frame.
#[derive(Component, Debug, Clone, Copy)]
pub struct GlyphCell {
    pub column: usize,
    pub row: usize,
}
