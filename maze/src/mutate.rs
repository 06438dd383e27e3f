//! Edits a grid's connectivity between two endpoints, using a [`PathOracle`]
//! to judge each single-cell change.
//!
//! Every change is tried on the grid itself and reverted when the oracle does not
//! approve it, so between trials, and after a `false` result, the grid is exactly
//! what the caller passed in.

use rand::prelude::{SliceRandom, StdRng};
use tracing::{debug, trace};

use crate::error::{MazeError, Result};
use crate::grid::{Cell, Coord, Grid};
use crate::maker::rng_from_seed;
use crate::pathfinding::PathOracle;

/// Opens one wall so that the oracle's route from `start` to `goal` changes.
///
/// Candidates are walls with at least two open neighbors, tried in an order
/// shuffled by `seed`; at most `max_tries` are opened. Returns `Ok(false)` when
/// the endpoints are not connected to begin with or no candidate changed the route.
pub fn add_alternate_route(
    grid: &mut Grid,
    start: Coord,
    goal: Coord,
    oracle: &impl PathOracle,
    max_tries: usize,
    seed: Option<u64>,
) -> Result<bool> {
    check_endpoints(grid, start, goal)?;
    let mut rng = rng_from_seed(seed);

    let Some(original) = oracle.find_path(grid, start, goal) else {
        debug!(%start, %goal, "endpoints are not connected, nothing to diversify");
        return Ok(false);
    };

    let candidates: Vec<Coord> = grid
        .cells_where(Cell::Wall)
        .filter(|wall| grid.open_neighbors(*wall).count() >= 2)
        .collect();
    let candidates = shuffled(candidates, &mut rng);

    for (attempt, wall) in candidates.into_iter().take(max_tries).enumerate() {
        let kept = try_set(grid, wall, Cell::Open, |grid| {
            oracle
                .find_path(grid, start, goal)
                .is_some_and(|path| path != original)
        });

        if kept {
            debug!(%wall, attempt, "opened wall for an alternate route");
            return Ok(true);
        }
        trace!(%wall, attempt, "route unchanged, wall restored");
    }

    Ok(false)
}

/// Walls off one cell so that `goal` can no longer be reached from `start`.
///
/// Cells on the oracle's current route are tried first; if none of those works
/// within `max_tries`, up to `max_tries` other open cells are tried. The endpoints
/// themselves are never closed. Already-disconnected endpoints return `Ok(true)`
/// without touching the grid.
pub fn make_unsolvable(
    grid: &mut Grid,
    start: Coord,
    goal: Coord,
    oracle: &impl PathOracle,
    max_tries: usize,
    seed: Option<u64>,
) -> Result<bool> {
    check_endpoints(grid, start, goal)?;
    let mut rng = rng_from_seed(seed);

    let Some(path) = oracle.find_path(grid, start, goal) else {
        return Ok(true);
    };

    let is_endpoint = |cell: &Coord| *cell == start || *cell == goal;

    let on_route: Vec<Coord> = match path.get(1..path.len().saturating_sub(1)) {
        Some(interior) if !interior.is_empty() => interior.to_vec(),
        // Adjacent endpoints: the only cell after `start` is `goal`, which stays open.
        _ => Vec::new(),
    };

    if block_any(grid, start, goal, oracle, shuffled(on_route, &mut rng), max_tries, "route") {
        return Ok(true);
    }

    let elsewhere: Vec<Coord> = grid.open_cells().filter(|cell| !is_endpoint(cell)).collect();

    Ok(block_any(grid, start, goal, oracle, shuffled(elsewhere, &mut rng), max_tries, "fallback"))
}

fn block_any(
    grid: &mut Grid,
    start: Coord,
    goal: Coord,
    oracle: &impl PathOracle,
    candidates: Vec<Coord>,
    max_tries: usize,
    round: &str,
) -> bool {
    for (attempt, cell) in candidates.into_iter().take(max_tries).enumerate() {
        let kept = try_set(grid, cell, Cell::Wall, |grid| {
            oracle.find_path(grid, start, goal).is_none()
        });

        if kept {
            debug!(%cell, attempt, round, "blocked cell, endpoints disconnected");
            return true;
        }
        trace!(%cell, attempt, round, "still solvable, cell reopened");
    }

    false
}

/// Sets `cell` to `state` and keeps the change only if `keep` approves the edited grid.
fn try_set(grid: &mut Grid, cell: Coord, state: Cell, keep: impl FnOnce(&Grid) -> bool) -> bool {
    let Some(saved) = grid.set(cell, state) else {
        return false;
    };

    if keep(grid) {
        return true;
    }

    grid.set(cell, saved);
    false
}

fn shuffled(mut cells: Vec<Coord>, rng: &mut StdRng) -> Vec<Coord> {
    cells.shuffle(rng);
    cells
}

fn check_endpoints(grid: &Grid, start: Coord, goal: Coord) -> Result<()> {
    for endpoint in [start, goal] {
        if !grid.is_open(endpoint) {
            return Err(MazeError::InvalidEndpoint(endpoint));
        }
    }
    Ok(())
}
