pub mod error;
pub mod grid;
pub mod maker;
pub mod mutate;
pub mod pathfinding;
pub mod render;

pub use error::{MazeError, Result};
pub use grid::{Cell, Coord, Direction, Grid, Path};
pub use maker::{find_valid_cell, generate};
pub use mutate::{add_alternate_route, make_unsolvable};
pub use pathfinding::{AStar, PathOracle, find_path};
