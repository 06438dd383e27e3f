use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use crate::error::{MazeError, Result};
use crate::render::{self, AsciiStyle};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    Wall,
    Open,
}

/// The four moves of 4-connectivity, in the order the generator shuffles them from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter)]
pub enum Direction {
    East,
    South,
    West,
    North,
}

impl Direction {
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::North => (-1, 0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub row: usize,
    pub col: usize,
}

impl Coord {
    pub const fn new(row: usize, col: usize) -> Self {
        Coord { row, col }
    }

    /// Grid cell of a room: odd indices hold rooms, even indices hold walls.
    pub const fn from_room(room_row: usize, room_col: usize) -> Self {
        Coord {
            row: 2 * room_row + 1,
            col: 2 * room_col + 1,
        }
    }

    /// Moves one step, or `None` when the step would leave the non-negative quadrant.
    pub fn step(self, direction: Direction) -> Option<Coord> {
        let (dr, dc) = direction.delta();
        Some(Coord {
            row: self.row.checked_add_signed(dr)?,
            col: self.col.checked_add_signed(dc)?,
        })
    }

    pub fn manhattan(self, other: Coord) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }

    pub fn is_adjacent(self, other: Coord) -> bool {
        self.manhattan(other) == 1
    }
}

impl From<(usize, usize)> for Coord {
    fn from((row, col): (usize, usize)) -> Self {
        Coord { row, col }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Start to goal inclusive, each step 4-adjacent.
pub type Path = Vec<Coord>;

/// Rectangular matrix of walls and open cells.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Cell>>", into = "Vec<Vec<Cell>>")]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn filled(height: usize, width: usize, cell: Cell) -> Self {
        Grid {
            cells: vec![vec![cell; width]; height],
        }
    }

    /// An empty vector gives the degenerate 0x0 grid.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Result<Self> {
        if let Some(first) = rows.first() {
            let expected = first.len();
            for (row, cells) in rows.iter().enumerate() {
                if cells.is_empty() || cells.len() != expected {
                    return Err(MazeError::RaggedGrid {
                        row,
                        expected,
                        found: cells.len(),
                    });
                }
            }
        }

        Ok(Grid { cells: rows })
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.cells
    }

    pub fn contains(&self, coord: Coord) -> bool {
        coord.row < self.height() && coord.col < self.width()
    }

    pub fn get(&self, coord: Coord) -> Option<Cell> {
        self.cells.get(coord.row)?.get(coord.col).copied()
    }

    pub fn is_open(&self, coord: Coord) -> bool {
        self.get(coord) == Some(Cell::Open)
    }

    /// Replaces the cell at `coord` and returns what was there, or `None` when
    /// `coord` is outside the grid (the grid is left untouched).
    pub fn set(&mut self, coord: Coord, cell: Cell) -> Option<Cell> {
        let slot = self.cells.get_mut(coord.row)?.get_mut(coord.col)?;
        Some(std::mem::replace(slot, cell))
    }

    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        Direction::iter()
            .filter_map(move |direction| coord.step(direction))
            .filter(|next| self.contains(*next))
    }

    pub fn open_neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        self.neighbors(coord).filter(|next| self.is_open(*next))
    }

    /// Row-major.
    pub fn cells_where(&self, state: Cell) -> impl Iterator<Item = Coord> + '_ {
        self.cells.iter().enumerate().flat_map(move |(row, cells)| {
            cells
                .iter()
                .enumerate()
                .filter(move |(_, cell)| **cell == state)
                .map(move |(col, _)| Coord::new(row, col))
        })
    }

    pub fn open_cells(&self) -> impl Iterator<Item = Coord> + '_ {
        self.cells_where(Cell::Open)
    }
}

impl TryFrom<Vec<Vec<Cell>>> for Grid {
    type Error = MazeError;

    fn try_from(rows: Vec<Vec<Cell>>) -> Result<Self> {
        Grid::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<Cell>> {
    fn from(grid: Grid) -> Self {
        grid.cells
    }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = render::to_ascii(self, None, None, None, &AsciiStyle::default());
        write!(f, "{}", text)
    }
}

/// Builds a grid from text art where `#` is a wall and anything else is open.
#[cfg(test)]
pub(crate) fn parse(art: &str) -> Grid {
    let rows = art
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.chars()
                .map(|ch| if ch == '#' { Cell::Wall } else { Cell::Open })
                .collect()
        })
        .collect();
    Grid::from_rows(rows).expect("test art should be rectangular")
}
