pub mod backtrack;

use std::collections::HashSet;

use rand::prelude::{IndexedRandom, SeedableRng, SliceRandom, StdRng};
use strum::IntoEnumIterator;
use tracing::debug;

use crate::error::{MazeError, Result};
use crate::grid::{Cell, Coord, Direction, Grid};

use backtrack::Backtrack;

/// A logical maze cell, before expansion into the wall grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Room {
    pub row: usize,
    pub col: usize,
}

impl Room {
    pub fn new(row: usize, col: usize) -> Room {
        Room { row, col }
    }

    pub fn to_grid(self) -> Coord {
        Coord::from_room(self.row, self.col)
    }
}

pub struct MazeMaker {
    pub grid: Grid,
    rng: StdRng,
    rows: usize,
    cols: usize,
    visited: Vec<Vec<bool>>,
}

impl MazeMaker {
    pub fn new(rows: usize, cols: usize, seed: Option<u64>) -> Result<Self> {
        if rows < 1 || cols < 1 {
            return Err(MazeError::InvalidDimensions { rows, cols });
        }

        let grid = Grid::filled(2 * rows + 1, 2 * cols + 1, Cell::Wall);

        Ok(MazeMaker {
            grid,
            rng: rng_from_seed(seed),
            rows,
            cols,
            visited: vec![vec![false; cols]; rows],
        })
    }

    fn neighbor(&self, room: Room, direction: Direction) -> Option<Room> {
        let (dr, dc) = direction.delta();
        let row = room.row.checked_add_signed(dr)?;
        let col = room.col.checked_add_signed(dc)?;

        if row < self.rows && col < self.cols {
            Some(Room::new(row, col))
        } else {
            None
        }
    }

    fn unvisited_neighbor(&self, room: Room, direction: Direction) -> Option<Room> {
        self.neighbor(room, direction)
            .filter(|next| !self.is_visited(*next))
    }

    fn visit_room(&mut self, room: Room) {
        self.visited[room.row][room.col] = true;
        self.grid.set(room.to_grid(), Cell::Open);
    }

    fn is_visited(&self, room: Room) -> bool {
        self.visited[room.row][room.col]
    }

    fn shuffled_directions(&mut self) -> Vec<Direction> {
        let mut directions: Vec<Direction> = Direction::iter().collect();
        directions.shuffle(&mut self.rng);
        directions
    }

    fn remove_wall_between(&mut self, room_1: Room, room_2: Room) {
        let a = room_1.to_grid();
        let b = room_2.to_grid();
        let wall = Coord::new((a.row + b.row) / 2, (a.col + b.col) / 2);
        self.grid.set(wall, Cell::Open);
    }
}

/// Carves a perfect maze of `rows` x `cols` rooms into a `(2*rows+1) x (2*cols+1)` grid.
///
/// The same `seed` and dimensions always give the same grid. Without a seed the
/// carving order comes from the thread-local generator.
pub fn generate(rows: usize, cols: usize, seed: Option<u64>) -> Result<Grid> {
    let mut maker = MazeMaker::new(rows, cols, seed)?;
    maker.backtrack();

    debug!(
        rows,
        cols,
        ?seed,
        height = maker.grid.height(),
        width = maker.grid.width(),
        "carved maze"
    );

    Ok(maker.grid)
}

/// Picks an open cell outside `exclude`, uniformly at random.
pub fn find_valid_cell(grid: &Grid, exclude: &HashSet<Coord>, seed: Option<u64>) -> Result<Coord> {
    let candidates: Vec<Coord> = grid
        .open_cells()
        .filter(|coord| !exclude.contains(coord))
        .collect();

    let mut rng = rng_from_seed(seed);
    candidates
        .choose(&mut rng)
        .copied()
        .ok_or(MazeError::NoCandidateCell)
}

pub(crate) fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}
