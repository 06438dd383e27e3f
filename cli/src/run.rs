use std::collections::HashSet;
use std::path::{Path as FsPath, PathBuf};

use clap::{Parser, ValueEnum};
use crossterm::style::{Color, Stylize};
use serde::Serialize;
use tracing::{info, warn};

use maze::render::{self, AsciiStyle, Tile};
use maze::{AStar, Coord, Grid, Path};

use crate::config::Defaults;

pub const MULTIPLE_MAX_TRIES: usize = 200;
pub const UNSOLVABLE_MAX_TRIES: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mutation {
    None,
    Multiple,
    Unsolvable,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// Generate a maze, optionally change how solvable it is, and solve it with A*.
#[derive(Parser, Debug)]
#[command(name = "maze-cli", version, about)]
pub struct Args {
    /// Rooms per column [env: MAZE_ROWS]
    #[arg(long)]
    pub rows: Option<usize>,

    /// Rooms per row [env: MAZE_COLS]
    #[arg(long)]
    pub cols: Option<usize>,

    /// Seed for reproducible output [env: MAZE_SEED]
    #[arg(long)]
    pub seed: Option<u64>,

    /// Edit the maze after carving it
    #[arg(long, value_enum, default_value_t = Mutation::None)]
    pub mutate: Mutation,

    /// Attempts allowed per mutation round [env: MAZE_MAX_TRIES]
    #[arg(long)]
    pub max_tries: Option<usize>,

    /// Pick start and end among open cells instead of opposite corners
    #[arg(long)]
    pub random_endpoints: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Colour the text output
    #[arg(long)]
    pub color: bool,

    /// Also write PREFIX.png and PREFIX_path.png
    #[arg(long, value_name = "PREFIX")]
    pub png: Option<PathBuf>,

    /// Pixels per grid cell in the PNG output
    #[arg(long, default_value_t = render::CELL_SIZE)]
    pub cell_size: u32,
}

/// Everything a run needs, after flags and environment are merged.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub rows: usize,
    pub cols: usize,
    pub seed: Option<u64>,
    pub mutation: Mutation,
    pub max_tries: usize,
    pub random_endpoints: bool,
}

impl Settings {
    pub fn resolve(args: &Args, defaults: &Defaults) -> Self {
        let mutation = args.mutate;
        let max_tries = args
            .max_tries
            .or(defaults.max_tries)
            .unwrap_or(match mutation {
                Mutation::Unsolvable => UNSOLVABLE_MAX_TRIES,
                Mutation::None | Mutation::Multiple => MULTIPLE_MAX_TRIES,
            });

        Settings {
            rows: args.rows.unwrap_or(defaults.rows),
            cols: args.cols.unwrap_or(defaults.cols),
            seed: args.seed.or(defaults.seed),
            mutation,
            max_tries,
            random_endpoints: args.random_endpoints,
        }
    }

    // Each step draws from its own stream so that, say, changing the mutation
    // does not move the endpoints.
    fn seed_for(&self, step: u64) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(step))
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub grid: Grid,
    pub start: Coord,
    pub end: Coord,
    pub path: Option<Path>,
    pub mutation: Mutation,
    /// Whether the requested mutation succeeded; `None` when nothing was requested.
    pub mutated: Option<bool>,
}

impl Report {
    /// Writes the maze without and with its path; returns both file names.
    pub fn save_images(&self, prefix: &FsPath, cell_size: u32) -> image::ImageResult<(PathBuf, PathBuf)> {
        let saved = render::save_images(
            &self.grid,
            self.path.as_deref(),
            Some(self.start),
            Some(self.end),
            cell_size,
            prefix,
        )?;
        info!(plain = %saved.0.display(), solved = %saved.1.display(), "saved images");
        Ok(saved)
    }
}

pub fn run(settings: &Settings) -> maze::Result<Report> {
    let mut grid = maze::generate(settings.rows, settings.cols, settings.seed_for(0))?;

    let (start, end) = if settings.random_endpoints {
        let start = maze::find_valid_cell(&grid, &HashSet::new(), settings.seed_for(1))?;
        let end = maze::find_valid_cell(&grid, &HashSet::from([start]), settings.seed_for(2))?;
        (start, end)
    } else {
        (
            Coord::new(1, 1),
            Coord::new(grid.height() - 2, grid.width() - 2),
        )
    };

    let mutated = match settings.mutation {
        Mutation::None => None,
        Mutation::Multiple => Some(maze::add_alternate_route(
            &mut grid,
            start,
            end,
            &AStar,
            settings.max_tries,
            settings.seed_for(3),
        )?),
        Mutation::Unsolvable => Some(maze::make_unsolvable(
            &mut grid,
            start,
            end,
            &AStar,
            settings.max_tries,
            settings.seed_for(3),
        )?),
    };

    if mutated == Some(false) {
        warn!(
            mutation = ?settings.mutation,
            max_tries = settings.max_tries,
            "mutation gave up, maze left as carved"
        );
    }

    let path = maze::find_path(&grid, start, end);
    info!(%start, %end, length = path.as_ref().map(Vec::len), "solved");

    Ok(Report {
        grid,
        start,
        end,
        path,
        mutation: settings.mutation,
        mutated,
    })
}

pub fn render(report: &Report, format: Format, color: bool) -> serde_json::Result<String> {
    match format {
        Format::Json => serde_json::to_string_pretty(report),
        Format::Text => Ok(render_text(report, color)),
    }
}

fn render_text(report: &Report, color: bool) -> String {
    let style = AsciiStyle::default();
    let path = report.path.as_deref();

    let picture = if color {
        render::tiles(&report.grid, path, Some(report.start), Some(report.end))
            .iter()
            .map(|row| {
                row.iter()
                    .map(|tile| tile.symbol(&style).with(tile_color(*tile)).to_string())
                    .collect::<String>()
            })
            .collect::<Vec<String>>()
            .join("\n")
    } else {
        render::to_ascii(&report.grid, path, Some(report.start), Some(report.end), &style)
    };

    let summary = match &report.path {
        Some(path) => format!("Path length: {}", path.len()),
        None => format!("No path from {} to {}.", report.start, report.end),
    };

    format!("{}\n{}", picture, summary)
}

fn tile_color(tile: Tile) -> Color {
    match tile {
        Tile::Start => Color::Green,
        Tile::End => Color::Red,
        Tile::Path => Color::Blue,
        Tile::Wall => Color::DarkGrey,
        Tile::Open => Color::Grey,
    }
}
