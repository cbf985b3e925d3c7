//! Tile grid: per-cell tile state, passability and box interactions.
//!
//! Only cells produced by the map generator have a tile. Everything else is
//! impassable wall and has no entry at all, so passability is simply
//! "has a tile".

use std::collections::BTreeMap;

use bevy::color::Color;
use micromegas_tracing::prelude::*;
use rand::Rng;
use thiserror::Error;

use crate::components::Cell;
use crate::mapgen::MapGenerator;
use crate::render::{Glyph, RenderSurface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("no tile at {0}, cell is not walkable")]
    NotFound(Cell),
}

// ---------------------------------------------------------------------------
// Tiles
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tile {
    Floor,
    Box,
    SearchedBox,
    DestroyedBox,
}

impl Tile {
    pub fn glyph(&self) -> Glyph {
        match self {
            Tile::Floor => Glyph::new('.'),
            Tile::Box => Glyph::new('#').with_foreground(Color::srgb_u8(0x65, 0x43, 0x21)),
            Tile::SearchedBox => Glyph::new('#').with_foreground(Color::srgb_u8(0x66, 0x66, 0x66)),
            Tile::DestroyedBox => Glyph::new('x').with_foreground(Color::srgb_u8(0x55, 0x55, 0x55)),
        }
    }

    /// Box-like tiles a pursuer can still smash.
    pub fn is_intact_box(&self) -> bool {
        matches!(self, Tile::Box | Tile::SearchedBox)
    }
}

/// Result of the seeker searching the cell it stands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    NoBox,
    Empty,
    FoundPrize,
    Smashed,
    AlreadyDestroyed,
}

impl SearchOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            SearchOutcome::NoBox => "There is no box here.",
            SearchOutcome::Empty => "This box is empty.",
            SearchOutcome::FoundPrize => "You found the pineapple!",
            SearchOutcome::Smashed => "You smash the empty box.",
            SearchOutcome::AlreadyDestroyed => "This box is already destroyed.",
        }
    }
}

/// Result of a pursuer destroying the box at its cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyOutcome {
    Destroyed { prize: bool },
    Nothing,
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: BTreeMap<Cell, Tile>,
    prize: Option<Cell>,
}

impl TileGrid {
    /// Clear all state and carve a new walkable set with `generator`.
    pub fn generate(
        &mut self,
        generator: &mut dyn MapGenerator,
        width: i32,
        height: i32,
        rng: &mut dyn rand::RngCore,
    ) {
        span_scope!("grid_generate");
        self.tiles.clear();
        self.prize = None;
        self.width = width;
        self.height = height;

        let tiles = &mut self.tiles;
        generator.generate(width, height, rng, &mut |cell| {
            tiles.insert(cell, Tile::Floor);
        });

        info!("map generated: {}x{} walkable={}", width, height, self.tiles.len());
    }

    /// Build a grid from an explicit walkable set, all floor.
    pub fn from_cells(width: i32, height: i32, cells: impl IntoIterator<Item = Cell>) -> Self {
        TileGrid {
            width,
            height,
            tiles: cells.into_iter().map(|c| (c, Tile::Floor)).collect(),
            prize: None,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn walkable_count(&self) -> usize {
        self.tiles.len()
    }

    /// Turn `count` distinct random walkable cells into boxes. The first pick
    /// hides the prize.
    pub fn place_boxes(&mut self, count: usize, rng: &mut (impl Rng + ?Sized)) -> Vec<Cell> {
        let candidates: Vec<Cell> = self.tiles.keys().copied().collect();
        let picked = sample_without_replacement(candidates, count, rng);
        for cell in &picked {
            self.tiles.insert(*cell, Tile::Box);
        }
        self.prize = picked.first().copied();
        picked
    }

    pub fn is_passable(&self, cell: Cell) -> bool {
        self.tiles.contains_key(&cell)
    }

    pub fn tile_at(&self, cell: Cell) -> Result<Tile, GridError> {
        self.tiles.get(&cell).copied().ok_or(GridError::NotFound(cell))
    }

    /// Overwrite the tile of a walkable cell. Never extends the walkable set.
    pub fn set_tile(&mut self, cell: Cell, tile: Tile) -> Result<(), GridError> {
        let slot = self.tiles.get_mut(&cell).ok_or(GridError::NotFound(cell))?;
        *slot = tile;
        Ok(())
    }

    /// Up to `quantity` distinct random cells currently holding `tile`.
    pub fn random_cells_of_type(
        &self,
        tile: Tile,
        quantity: usize,
        rng: &mut (impl Rng + ?Sized),
    ) -> Vec<Cell> {
        let candidates: Vec<Cell> = self
            .tiles
            .iter()
            .filter(|(_, t)| **t == tile)
            .map(|(c, _)| *c)
            .collect();
        sample_without_replacement(candidates, quantity, rng)
    }

    pub fn prize(&self) -> Option<Cell> {
        self.prize
    }

    pub fn designate_prize(&mut self, cell: Cell) -> Result<(), GridError> {
        self.tile_at(cell)?;
        self.prize = Some(cell);
        Ok(())
    }

    pub fn is_prize(&self, cell: Cell) -> bool {
        self.prize == Some(cell)
    }

    pub fn count_of(&self, tile: Tile) -> usize {
        self.tiles.values().filter(|t| **t == tile).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Cell, Tile)> + '_ {
        self.tiles.iter().map(|(c, t)| (*c, *t))
    }

    /// Seeker interaction: `Box -> SearchedBox -> DestroyedBox`.
    pub fn search(&mut self, cell: Cell) -> SearchOutcome {
        let Some(tile) = self.tiles.get_mut(&cell) else {
            return SearchOutcome::NoBox;
        };
        match *tile {
            Tile::Floor => SearchOutcome::NoBox,
            Tile::Box => {
                *tile = Tile::SearchedBox;
                if self.prize == Some(cell) {
                    SearchOutcome::FoundPrize
                } else {
                    SearchOutcome::Empty
                }
            }
            Tile::SearchedBox => {
                *tile = Tile::DestroyedBox;
                SearchOutcome::Smashed
            }
            Tile::DestroyedBox => SearchOutcome::AlreadyDestroyed,
        }
    }

    /// Pursuer interaction: any intact box goes straight to `DestroyedBox`.
    pub fn destroy_box(&mut self, cell: Cell) -> DestroyOutcome {
        match self.tiles.get_mut(&cell) {
            Some(tile) if tile.is_intact_box() => {
                let was_unsearched = *tile == Tile::Box;
                *tile = Tile::DestroyedBox;
                DestroyOutcome::Destroyed {
                    prize: was_unsearched && self.prize == Some(cell),
                }
            }
            _ => DestroyOutcome::Nothing,
        }
    }

    pub fn draw(&self, surface: &mut impl RenderSurface) {
        for (cell, tile) in self.iter() {
            surface.draw_glyph(cell, tile.glyph());
        }
    }
}

/// Pick-and-remove sampling: each candidate is chosen at most once.
pub fn sample_without_replacement(
    mut candidates: Vec<Cell>,
    quantity: usize,
    rng: &mut (impl Rng + ?Sized),
) -> Vec<Cell> {
    let mut picked = Vec::with_capacity(quantity.min(candidates.len()));
    while !candidates.is_empty() && picked.len() < quantity {
        let index = rng.gen_range(0..candidates.len());
        picked.push(candidates.remove(index));
    }
    picked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapgen::OpenFloor;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    fn open_grid(w: i32, h: i32) -> TileGrid {
        let mut grid = TileGrid::default();
        let mut rng = StdRng::seed_from_u64(7);
        grid.generate(&mut OpenFloor, w, h, &mut rng);
        grid
    }

    #[test]
    fn passable_iff_generated() {
        let grid = TileGrid::from_cells(4, 4, [Cell::new(1, 1), Cell::new(2, 1)]);
        assert!(grid.is_passable(Cell::new(1, 1)));
        assert!(grid.is_passable(Cell::new(2, 1)));
        assert!(!grid.is_passable(Cell::new(0, 0)));
        assert!(!grid.is_passable(Cell::new(-1, 1)));
    }

    #[test]
    fn tile_at_unknown_cell_is_not_found() {
        let grid = TileGrid::from_cells(2, 2, [Cell::new(0, 0)]);
        assert_eq!(grid.tile_at(Cell::new(0, 0)), Ok(Tile::Floor));
        assert_eq!(
            grid.tile_at(Cell::new(1, 1)),
            Err(GridError::NotFound(Cell::new(1, 1)))
        );
    }

    #[test]
    fn set_tile_never_adds_walkable_cells() {
        let mut grid = TileGrid::from_cells(2, 2, [Cell::new(0, 0)]);
        assert!(grid.set_tile(Cell::new(1, 0), Tile::Box).is_err());
        assert!(!grid.is_passable(Cell::new(1, 0)));
        assert!(grid.set_tile(Cell::new(0, 0), Tile::Box).is_ok());
        assert_eq!(grid.tile_at(Cell::new(0, 0)), Ok(Tile::Box));
    }

    #[test]
    fn regenerate_clears_previous_state() {
        let mut grid = TileGrid::from_cells(50, 50, [Cell::new(40, 40)]);
        grid.designate_prize(Cell::new(40, 40)).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        grid.generate(&mut OpenFloor, 3, 3, &mut rng);
        assert_eq!(grid.walkable_count(), 9);
        assert!(!grid.is_passable(Cell::new(40, 40)));
        assert_eq!(grid.prize(), None);
    }

    #[test]
    fn place_boxes_distinct_and_first_is_prize() {
        let mut grid = open_grid(6, 6);
        let mut rng = StdRng::seed_from_u64(42);
        let boxes = grid.place_boxes(10, &mut rng);
        assert_eq!(boxes.len(), 10);
        let unique: HashSet<_> = boxes.iter().collect();
        assert_eq!(unique.len(), 10);
        assert_eq!(grid.prize(), Some(boxes[0]));
        assert_eq!(grid.count_of(Tile::Box), 10);
    }

    #[test]
    fn place_boxes_limited_by_walkable_cells() {
        let mut grid = open_grid(2, 1);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(grid.place_boxes(10, &mut rng).len(), 2);
    }

    #[test]
    fn random_cells_of_type_never_exceeds_qualifying_set() {
        let mut grid = open_grid(4, 4);
        grid.set_tile(Cell::new(0, 0), Tile::Box).unwrap();
        grid.set_tile(Cell::new(3, 3), Tile::Box).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let mut picked = grid.random_cells_of_type(Tile::Box, 10, &mut rng);
        picked.sort();
        assert_eq!(picked, vec![Cell::new(0, 0), Cell::new(3, 3)]);
        assert!(grid.random_cells_of_type(Tile::DestroyedBox, 3, &mut rng).is_empty());
    }

    #[test]
    fn search_state_machine_is_monotonic() {
        let mut grid = open_grid(3, 3);
        let cell = Cell::new(1, 1);
        grid.set_tile(cell, Tile::Box).unwrap();

        assert_eq!(grid.search(cell), SearchOutcome::Empty);
        assert_eq!(grid.tile_at(cell), Ok(Tile::SearchedBox));
        assert_eq!(grid.search(cell), SearchOutcome::Smashed);
        assert_eq!(grid.tile_at(cell), Ok(Tile::DestroyedBox));
        assert_eq!(grid.search(cell), SearchOutcome::AlreadyDestroyed);
        assert_eq!(grid.tile_at(cell), Ok(Tile::DestroyedBox));
    }

    #[test]
    fn searching_prize_box_finds_it() {
        let mut grid = open_grid(3, 3);
        let cell = Cell::new(2, 2);
        grid.set_tile(cell, Tile::Box).unwrap();
        grid.designate_prize(cell).unwrap();
        assert_eq!(grid.search(cell), SearchOutcome::FoundPrize);
        assert_eq!(grid.search(Cell::new(0, 0)), SearchOutcome::NoBox);
    }

    #[test]
    fn destroy_skips_straight_to_destroyed() {
        let mut grid = open_grid(3, 3);
        let prize = Cell::new(0, 0);
        let plain = Cell::new(1, 0);
        let searched = Cell::new(2, 0);
        grid.set_tile(prize, Tile::Box).unwrap();
        grid.set_tile(plain, Tile::Box).unwrap();
        grid.set_tile(searched, Tile::SearchedBox).unwrap();
        grid.designate_prize(prize).unwrap();

        assert_eq!(grid.destroy_box(plain), DestroyOutcome::Destroyed { prize: false });
        assert_eq!(grid.destroy_box(searched), DestroyOutcome::Destroyed { prize: false });
        assert_eq!(grid.destroy_box(prize), DestroyOutcome::Destroyed { prize: true });
        assert_eq!(grid.destroy_box(prize), DestroyOutcome::Nothing);
        assert_eq!(grid.destroy_box(Cell::new(1, 1)), DestroyOutcome::Nothing);
        assert_eq!(grid.count_of(Tile::DestroyedBox), 3);
    }
}
