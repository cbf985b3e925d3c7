//! Map generators: producers of the walkable cell set for a round.

use std::collections::BTreeSet;

use micromegas_tracing::prelude::*;
use rand::{Rng, RngCore};
use thiserror::Error;

use crate::components::Cell;

/// Carves a walkable set into a `width` x `height` rectangle, calling
/// `on_cell` once per walkable cell. Call order is unspecified.
pub trait MapGenerator: Send + Sync {
    fn generate(
        &mut self,
        width: i32,
        height: i32,
        rng: &mut dyn RngCore,
        on_cell: &mut dyn FnMut(Cell),
    );
}

// ---------------------------------------------------------------------------
// Open floor
// ---------------------------------------------------------------------------

/// Every cell of the rectangle is walkable.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenFloor;

impl MapGenerator for OpenFloor {
    fn generate(
        &mut self,
        width: i32,
        height: i32,
        _rng: &mut dyn RngCore,
        on_cell: &mut dyn FnMut(Cell),
    ) {
        for y in 0..height {
            for x in 0..width {
                on_cell(Cell::new(x, y));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// ASCII layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("empty map")]
    Empty,
    #[error("unknown map character '{ch}' at ({x}, {y})")]
    UnknownChar { ch: char, x: usize, y: usize },
}

/// Fixed layout: `.` or space is walkable, `#` is wall.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsciiMap {
    width: i32,
    height: i32,
    walkable: Vec<Cell>,
}

impl AsciiMap {
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let lines: Vec<&str> = text.lines().collect();
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        if lines.is_empty() || width == 0 {
            return Err(MapError::Empty);
        }

        let mut walkable = Vec::new();
        for (y, line) in lines.iter().enumerate() {
            for (x, ch) in line.chars().enumerate() {
                match ch {
                    '.' | ' ' => walkable.push(Cell::new(x as i32, y as i32)),
                    '#' => {}
                    _ => return Err(MapError::UnknownChar { ch, x, y }),
                }
            }
        }

        Ok(AsciiMap {
            width: width as i32,
            height: lines.len() as i32,
            walkable,
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }
}

impl MapGenerator for AsciiMap {
    /// Emits the parsed layout clipped to the requested rectangle.
    fn generate(
        &mut self,
        width: i32,
        height: i32,
        _rng: &mut dyn RngCore,
        on_cell: &mut dyn FnMut(Cell),
    ) {
        for cell in &self.walkable {
            if cell.x < width && cell.y < height {
                on_cell(*cell);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Rooms and corridors
// ---------------------------------------------------------------------------

const ROOM_ATTEMPTS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Room {
    x: i32,
    y: i32,
    w: i32,
    h: i32,
}

impl Room {
    fn center(&self) -> Cell {
        Cell::new(self.x + self.w / 2, self.y + self.h / 2)
    }

    /// Overlap test including a one-cell wall gap.
    fn touches(&self, other: &Room) -> bool {
        self.x - 1 <= other.x + other.w
            && other.x - 1 <= self.x + self.w
            && self.y - 1 <= other.y + other.h
            && other.y - 1 <= self.y + self.h
    }

    fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (self.y..self.y + self.h)
            .flat_map(move |y| (self.x..self.x + self.w).map(move |x| Cell::new(x, y)))
    }
}

/// Dungeon of random non-overlapping rooms joined by L-shaped corridors.
/// The outer border is always wall.
#[derive(Debug, Clone)]
pub struct Digger {
    pub room_width: (i32, i32),
    pub room_height: (i32, i32),
    /// Stop placing rooms once this share of the interior is dug.
    pub dug_percentage: f32,
}

impl Default for Digger {
    fn default() -> Self {
        Digger {
            room_width: (3, 9),
            room_height: (3, 5),
            dug_percentage: 0.2,
        }
    }
}

impl Digger {
    fn place_rooms(&self, width: i32, height: i32, rng: &mut dyn RngCore) -> Vec<Room> {
        let interior = ((width - 2).max(0) * (height - 2).max(0)) as f32;
        let mut rooms: Vec<Room> = Vec::new();
        let mut dug = 0;

        for _ in 0..ROOM_ATTEMPTS {
            if dug as f32 >= interior * self.dug_percentage {
                break;
            }
            let w = rng.gen_range(self.room_width.0..=self.room_width.1);
            let h = rng.gen_range(self.room_height.0..=self.room_height.1);
            if w > width - 2 || h > height - 2 {
                continue;
            }
            let room = Room {
                x: rng.gen_range(1..=width - 1 - w),
                y: rng.gen_range(1..=height - 1 - h),
                w,
                h,
            };
            if rooms.iter().any(|r| r.touches(&room)) {
                continue;
            }
            dug += w * h;
            rooms.push(room);
        }
        rooms
    }
}

impl MapGenerator for Digger {
    fn generate(
        &mut self,
        width: i32,
        height: i32,
        rng: &mut dyn RngCore,
        on_cell: &mut dyn FnMut(Cell),
    ) {
        span_scope!("digger_generate");
        let rooms = self.place_rooms(width, height, rng);
        if rooms.is_empty() {
            warn!("digger: no room fits {}x{}, falling back to open floor", width, height);
            OpenFloor.generate(width, height, rng, on_cell);
            return;
        }

        let mut carved: BTreeSet<Cell> = BTreeSet::new();
        for room in &rooms {
            carved.extend(room.cells());
        }
        for pair in rooms.windows(2) {
            let (a, b) = (pair[0].center(), pair[1].center());
            let horizontal_first = rng.gen_bool(0.5);
            carved.extend(l_corridor(a, b, horizontal_first));
        }

        debug!("digger: rooms={} cells={}", rooms.len(), carved.len());
        for cell in carved {
            on_cell(cell);
        }
    }
}

/// Cells of an L-shaped corridor from `a` to `b`, both ends included.
fn l_corridor(a: Cell, b: Cell, horizontal_first: bool) -> Vec<Cell> {
    let corner = if horizontal_first {
        Cell::new(b.x, a.y)
    } else {
        Cell::new(a.x, b.y)
    };
    let mut cells = straight(a, corner);
    cells.extend(straight(corner, b));
    cells
}

fn straight(from: Cell, to: Cell) -> Vec<Cell> {
    let (dx, dy) = ((to.x - from.x).signum(), (to.y - from.y).signum());
    let mut cells = vec![from];
    let mut at = from;
    while at != to {
        at = Cell::new(at.x + dx, at.y + dy);
        cells.push(at);
    }
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Connectivity;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::VecDeque;

    fn collect(generator: &mut dyn MapGenerator, w: i32, h: i32, seed: u64) -> BTreeSet<Cell> {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut cells = BTreeSet::new();
        generator.generate(w, h, &mut rng, &mut |c| {
            cells.insert(c);
        });
        cells
    }

    #[test]
    fn open_floor_covers_rectangle() {
        let cells = collect(&mut OpenFloor, 5, 4, 0);
        assert_eq!(cells.len(), 20);
        assert!(cells.contains(&Cell::new(4, 3)));
    }

    #[test]
    fn ascii_map_parses_walkable_cells() {
        let mut map = AsciiMap::parse("###\n#.#\n# #").unwrap();
        assert_eq!((map.width(), map.height()), (3, 3));
        let cells = collect(&mut map, 3, 3, 0);
        assert_eq!(
            cells.into_iter().collect::<Vec<_>>(),
            vec![Cell::new(1, 1), Cell::new(1, 2)]
        );
    }

    #[test]
    fn ascii_map_rejects_bad_input() {
        assert_eq!(AsciiMap::parse(""), Err(MapError::Empty));
        assert_eq!(
            AsciiMap::parse("#.\n#X"),
            Err(MapError::UnknownChar { ch: 'X', x: 1, y: 1 })
        );
    }

    #[test]
    fn digger_stays_inside_border() {
        for seed in 0..10 {
            let cells = collect(&mut Digger::default(), 80, 22, seed);
            assert!(!cells.is_empty());
            assert!(cells
                .iter()
                .all(|c| c.x >= 1 && c.y >= 1 && c.x <= 78 && c.y <= 20));
        }
    }

    #[test]
    fn digger_output_is_connected() {
        let cells = collect(&mut Digger::default(), 80, 22, 99);
        let start = *cells.iter().next().unwrap();
        let mut seen = BTreeSet::from([start]);
        let mut queue = VecDeque::from([start]);
        while let Some(c) = queue.pop_front() {
            for n in c.neighbors(Connectivity::Four) {
                if cells.contains(&n) && seen.insert(n) {
                    queue.push_back(n);
                }
            }
        }
        assert_eq!(seen.len(), cells.len());
    }

    #[test]
    fn digger_is_deterministic_per_seed() {
        let a = collect(&mut Digger::default(), 60, 20, 5);
        let b = collect(&mut Digger::default(), 60, 20, 5);
        assert_eq!(a, b);
    }

    #[test]
    fn digger_falls_back_on_tiny_maps() {
        let cells = collect(&mut Digger::default(), 3, 3, 1);
        assert_eq!(cells.len(), 9);
    }
}
