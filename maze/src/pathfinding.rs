use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet};

use crate::grid::{Coord, Grid, Path};

/// Anything that can answer "what is a shortest path from `start` to `goal`?".
///
/// The mutation routines only talk to the search through this trait, so a test
/// can swap in a recording or scripted oracle. Plain functions and closures with
/// the signature of [`find_path`] implement it.
pub trait PathOracle {
    fn find_path(&self, grid: &Grid, start: Coord, goal: Coord) -> Option<Path>;
}

impl<F> PathOracle for F
where
    F: Fn(&Grid, Coord, Coord) -> Option<Path>,
{
    fn find_path(&self, grid: &Grid, start: Coord, goal: Coord) -> Option<Path> {
        self(grid, start, goal)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AStar;

impl PathOracle for AStar {
    fn find_path(&self, grid: &Grid, start: Coord, goal: Coord) -> Option<Path> {
        find_path(grid, start, goal)
    }
}

/// A* over open cells with unit steps and the Manhattan heuristic.
///
/// Returns `None` when either endpoint is a wall or outside the grid, or when
/// the goal cannot be reached. Frontier entries with equal f-score pop in
/// insertion order, so the same grid always yields the same path.
pub fn find_path(grid: &Grid, start: Coord, goal: Coord) -> Option<Path> {
    if !grid.is_open(start) || !grid.is_open(goal) {
        return None;
    }

    // (f-score, insertion order, cell), smallest first.
    let mut frontier = BinaryHeap::new();
    let mut g_score: HashMap<Coord, usize> = HashMap::from([(start, 0)]);
    let mut came_from: HashMap<Coord, Coord> = HashMap::new();
    let mut closed: HashSet<Coord> = HashSet::new();
    let mut pushed = 0usize;

    frontier.push(Reverse((start.manhattan(goal), pushed, start)));

    while let Some(Reverse((_, _, current))) = frontier.pop() {
        if current == goal {
            return Some(reconstruct(&came_from, goal));
        }

        if !closed.insert(current) {
            continue;
        }

        let g = g_score[&current];

        for next in grid.open_neighbors(current) {
            if closed.contains(&next) {
                continue;
            }

            let tentative = g + 1;
            if g_score.get(&next).is_none_or(|&best| tentative < best) {
                came_from.insert(next, current);
                g_score.insert(next, tentative);
                pushed += 1;
                frontier.push(Reverse((tentative + next.manhattan(goal), pushed, next)));
            }
        }
    }

    None
}

fn reconstruct(came_from: &HashMap<Coord, Coord>, goal: Coord) -> Path {
    let mut path = vec![goal];
    let mut current = goal;

    while let Some(&previous) = came_from.get(&current) {
        path.push(previous);
        current = previous;
    }

    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use rand::prelude::{Rng, SeedableRng, StdRng};

    use super::*;
    use crate::grid::{Cell, parse};
    use crate::maker::generate;

    fn bfs_distance(grid: &Grid, start: Coord, goal: Coord) -> Option<usize> {
        if !grid.is_open(start) || !grid.is_open(goal) {
            return None;
        }

        let mut distance = HashMap::from([(start, 0)]);
        let mut queue = VecDeque::from([start]);

        while let Some(curr) = queue.pop_front() {
            if curr == goal {
                return distance.get(&curr).copied();
            }
            let d = distance[&curr];
            for next in grid.open_neighbors(curr) {
                if !distance.contains_key(&next) {
                    distance.insert(next, d + 1);
                    queue.push_back(next);
                }
            }
        }

        None
    }

    fn assert_valid_path(grid: &Grid, path: &Path, start: Coord, goal: Coord) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&goal));
        for cell in path {
            assert!(grid.is_open(*cell), "path crosses wall {}:\n{}", cell, grid);
        }
        for pair in path.windows(2) {
            assert!(
                pair[0].is_adjacent(pair[1]),
                "{} and {} are not neighbors",
                pair[0],
                pair[1]
            );
        }
    }

    fn random_grid(rng: &mut StdRng, height: usize, width: usize) -> Grid {
        let rows = (0..height)
            .map(|_| {
                (0..width)
                    .map(|_| {
                        if rng.random_bool(0.65) {
                            Cell::Open
                        } else {
                            Cell::Wall
                        }
                    })
                    .collect()
            })
            .collect();
        Grid::from_rows(rows).expect("rows have equal length")
    }

    #[test]
    fn test_start_equals_goal() {
        let grid = generate(3, 3, Some(1)).expect("dimensions are valid");
        let start = Coord::new(3, 3);
        assert_eq!(find_path(&grid, start, start), Some(vec![start]));
    }

    #[test]
    fn test_wall_endpoints_have_no_path() {
        let grid = parse(
            "
            #####
            #...#
            #####
            ",
        );
        assert_eq!(find_path(&grid, Coord::new(0, 0), Coord::new(1, 1)), None);
        assert_eq!(find_path(&grid, Coord::new(1, 1), Coord::new(2, 2)), None);
        assert_eq!(find_path(&grid, Coord::new(1, 1), Coord::new(9, 9)), None);
    }

    #[test]
    fn test_separate_regions_have_no_path() {
        let grid = parse(
            "
            ..#..
            ..#..
            ..#..
            ",
        );
        assert_eq!(find_path(&grid, Coord::new(0, 0), Coord::new(2, 4)), None);
    }

    #[test]
    fn test_follows_the_only_corridor() {
        let grid = parse(
            "
            .#...
            .#.#.
            ...#.
            ",
        );
        let path = find_path(&grid, Coord::new(0, 0), Coord::new(2, 4)).expect("connected");
        assert_eq!(
            path,
            vec![
                Coord::new(0, 0),
                Coord::new(1, 0),
                Coord::new(2, 0),
                Coord::new(2, 1),
                Coord::new(2, 2),
                Coord::new(1, 2),
                Coord::new(0, 2),
                Coord::new(0, 3),
                Coord::new(0, 4),
                Coord::new(1, 4),
                Coord::new(2, 4),
            ]
        );
    }

    #[test]
    fn test_open_field_path_has_manhattan_length() {
        let grid = Grid::filled(12, 15, Cell::Open);
        let start = Coord::new(0, 0);
        let goal = Coord::new(11, 14);

        let path = find_path(&grid, start, goal).expect("everything is open");
        assert_valid_path(&grid, &path, start, goal);
        assert_eq!(path.len(), start.manhattan(goal) + 1);
    }

    #[test]
    fn test_path_length_matches_breadth_first_search() {
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..200 {
            let grid = random_grid(&mut rng, 9, 11);
            let start = Coord::new(rng.random_range(0..9), rng.random_range(0..11));
            let goal = Coord::new(rng.random_range(0..9), rng.random_range(0..11));

            let expected = bfs_distance(&grid, start, goal);
            let found = find_path(&grid, start, goal);

            match (expected, found) {
                (None, None) => {}
                (Some(distance), Some(path)) => {
                    assert_valid_path(&grid, &path, start, goal);
                    assert_eq!(path.len(), distance + 1, "suboptimal path in:\n{}", grid);
                }
                (expected, found) => panic!(
                    "search disagrees with BFS ({:?} vs {:?}) from {} to {}:\n{}",
                    expected, found, start, goal, grid
                ),
            }
        }
    }

    #[test]
    fn test_generated_maze_is_solved_corner_to_corner() {
        let grid = generate(5, 5, Some(42)).expect("dimensions are valid");
        let start = Coord::new(1, 1);
        let goal = Coord::new(9, 9);

        let path = find_path(&grid, start, goal).expect("perfect mazes are connected");
        assert_valid_path(&grid, &path, start, goal);
        assert!(path.len() > start.manhattan(goal));
        assert_eq!(Some(path.len() - 1), bfs_distance(&grid, start, goal));
    }

    #[test]
    fn test_search_is_repeatable() {
        let grid = Grid::filled(7, 7, Cell::Open);
        let first = find_path(&grid, Coord::new(0, 0), Coord::new(6, 6));
        let second = find_path(&grid, Coord::new(0, 0), Coord::new(6, 6));
        assert_eq!(first, second);
    }

    #[test]
    fn test_closures_and_astar_are_oracles() {
        let grid = Grid::filled(3, 3, Cell::Open);
        let start = Coord::new(0, 0);
        let goal = Coord::new(2, 2);

        let never = |_: &Grid, _: Coord, _: Coord| -> Option<Path> { None };
        assert_eq!(never.find_path(&grid, start, goal), None);

        let via_fn = find_path.find_path(&grid, start, goal);
        assert_eq!(via_fn, AStar.find_path(&grid, start, goal));
        assert_eq!(via_fn.map(|path| path.len()), Some(5));
    }
}
