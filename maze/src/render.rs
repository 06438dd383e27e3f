use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use image::error::{ImageError, LimitError, LimitErrorKind};
use image::{ImageResult, Rgb, RgbImage};

use crate::grid::{Cell, Coord, Grid};

/// Pixel size of one grid cell in [`to_image`] unless told otherwise.
pub const CELL_SIZE: u32 = 16;

const SEPARATOR: Rgb<u8> = Rgb([0, 0, 0]);
const WALL: Rgb<u8> = Rgb([40, 40, 40]);
const FLOOR: Rgb<u8> = Rgb([211, 211, 211]);
const START: Rgb<u8> = Rgb([0, 200, 0]);
const END: Rgb<u8> = Rgb([200, 0, 0]);
const PATH: Rgb<u8> = Rgb([0, 0, 200]);

/// Symbols used by [`to_ascii`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AsciiStyle {
    pub start: char,
    pub end: char,
    pub path: char,
    pub wall: char,
    pub open: char,
}

impl Default for AsciiStyle {
    fn default() -> Self {
        AsciiStyle {
            start: 'S',
            end: 'E',
            path: '*',
            wall: '█',
            open: '.',
        }
    }
}

/// What a single grid cell shows once endpoints and the path are overlaid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tile {
    Start,
    End,
    Path,
    Wall,
    Open,
}

impl Tile {
    pub fn symbol(self, style: &AsciiStyle) -> char {
        match self {
            Tile::Start => style.start,
            Tile::End => style.end,
            Tile::Path => style.path,
            Tile::Wall => style.wall,
            Tile::Open => style.open,
        }
    }

    pub fn pixel(self) -> Rgb<u8> {
        match self {
            Tile::Start => START,
            Tile::End => END,
            Tile::Path => PATH,
            Tile::Wall => WALL,
            Tile::Open => FLOOR,
        }
    }
}

/// Tiles row by row. Start wins over end, end over path, path over the cell itself.
pub fn tiles(
    grid: &Grid,
    path: Option<&[Coord]>,
    start: Option<Coord>,
    end: Option<Coord>,
) -> Vec<Vec<Tile>> {
    let on_path: HashSet<Coord> = path.unwrap_or_default().iter().copied().collect();

    grid.rows()
        .iter()
        .enumerate()
        .map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    let coord = Coord::new(row, col);
                    if Some(coord) == start {
                        Tile::Start
                    } else if Some(coord) == end {
                        Tile::End
                    } else if on_path.contains(&coord) {
                        Tile::Path
                    } else if *cell == Cell::Wall {
                        Tile::Wall
                    } else {
                        Tile::Open
                    }
                })
                .collect()
        })
        .collect()
}

/// One line per grid row, joined with `\n` and no trailing newline.
pub fn to_ascii(
    grid: &Grid,
    path: Option<&[Coord]>,
    start: Option<Coord>,
    end: Option<Coord>,
    style: &AsciiStyle,
) -> String {
    tiles(grid, path, start, end)
        .iter()
        .map(|row| row.iter().map(|tile| tile.symbol(style)).collect::<String>())
        .collect::<Vec<String>>()
        .join("\n")
}

/// Draws each cell as a `cell_size` square, with a 1-pixel black line around
/// and between cells, so a grid of `w` columns is `w * cell_size + w + 1` pixels wide.
///
/// Fails only when the picture would not fit in `u32` pixels per side.
pub fn to_image(
    grid: &Grid,
    path: Option<&[Coord]>,
    start: Option<Coord>,
    end: Option<Coord>,
    cell_size: u32,
) -> ImageResult<RgbImage> {
    let (Some(width), Some(height)) = (
        extent(grid.width(), cell_size),
        extent(grid.height(), cell_size),
    ) else {
        return Err(ImageError::Limits(LimitError::from_kind(
            LimitErrorKind::DimensionError,
        )));
    };

    let mut picture = RgbImage::from_pixel(width, height, SEPARATOR);
    let pitch = cell_size + 1;

    for (row, tiles) in tiles(grid, path, start, end).iter().enumerate() {
        let y0 = row as u32 * pitch + 1;
        for (col, tile) in tiles.iter().enumerate() {
            let x0 = col as u32 * pitch + 1;
            for y in y0..y0 + cell_size {
                for x in x0..x0 + cell_size {
                    picture.put_pixel(x, y, tile.pixel());
                }
            }
        }
    }

    Ok(picture)
}

fn extent(cells: usize, cell_size: u32) -> Option<u32> {
    let cells = u32::try_from(cells).ok()?;
    cells.checked_mul(cell_size)?.checked_add(cells)?.checked_add(1)
}

/// Writes `<prefix>.png` without the path and `<prefix>_path.png` with it,
/// returning both file names in that order.
pub fn save_images(
    grid: &Grid,
    path: Option<&[Coord]>,
    start: Option<Coord>,
    end: Option<Coord>,
    cell_size: u32,
    prefix: &Path,
) -> ImageResult<(PathBuf, PathBuf)> {
    let plain = with_suffix(prefix, ".png");
    let solved = with_suffix(prefix, "_path.png");

    to_image(grid, None, start, end, cell_size)?.save(&plain)?;
    to_image(grid, path, start, end, cell_size)?.save(&solved)?;

    Ok((plain, solved))
}

fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(prefix.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::parse;

    #[test]
    fn test_plain_grid_uses_wall_and_open_symbols() {
        let grid = parse(
            "
            ###
            #.#
            ###
            ",
        );
        assert_eq!(grid.to_string(), "███\n█.█\n███");
    }

    #[test]
    fn test_overlays_follow_precedence() {
        let grid = parse(
            "
            ....
            ####
            ",
        );
        let path = [
            Coord::new(0, 0),
            Coord::new(0, 1),
            Coord::new(0, 2),
            Coord::new(0, 3),
        ];

        let text = to_ascii(
            &grid,
            Some(&path),
            Some(Coord::new(0, 0)),
            Some(Coord::new(0, 3)),
            &AsciiStyle::default(),
        );
        assert_eq!(text, "S**E\n████");
    }

    #[test]
    fn test_custom_symbols() {
        let grid = parse(
            "
            #..
            ",
        );
        let style = AsciiStyle {
            start: 'A',
            end: 'B',
            path: '+',
            wall: '#',
            open: ' ',
        };

        let text = to_ascii(&grid, None, Some(Coord::new(0, 2)), None, &style);
        assert_eq!(text, "# A");
    }

    #[test]
    fn test_empty_grid_renders_nothing() {
        let grid = Grid::from_rows(Vec::new()).expect("empty grid is allowed");
        assert_eq!(to_ascii(&grid, None, None, None, &AsciiStyle::default()), "");
    }

    fn corridor() -> Grid {
        parse(
            "
            #...
            ####
            ",
        )
    }

    // Top-left pixel of a cell when cells are 4 pixels wide.
    fn corner(row: u32, col: u32) -> (u32, u32) {
        (col * 5 + 1, row * 5 + 1)
    }

    #[test]
    fn test_image_size_counts_separators() {
        let grid = corridor();
        let picture = to_image(&grid, None, None, None, 4).expect("small grid fits");
        assert_eq!(picture.dimensions(), (4 * 4 + 4 + 1, 2 * 4 + 2 + 1));

        let grid = Grid::filled(5, 7, Cell::Wall);
        let picture = to_image(&grid, None, None, None, CELL_SIZE).expect("small grid fits");
        assert_eq!(picture.dimensions(), (7 * 16 + 8, 5 * 16 + 6));
    }

    #[test]
    fn test_image_colours_cells_like_the_tiles() {
        let grid = corridor();
        let path = [Coord::new(0, 1), Coord::new(0, 2), Coord::new(0, 3)];
        let picture = to_image(
            &grid,
            Some(&path),
            Some(Coord::new(0, 1)),
            Some(Coord::new(0, 3)),
            4,
        )
        .expect("small grid fits");

        let at = |(x, y): (u32, u32)| *picture.get_pixel(x, y);
        assert_eq!(at(corner(0, 0)), WALL);
        assert_eq!(at(corner(0, 1)), START);
        assert_eq!(at(corner(0, 2)), PATH);
        assert_eq!(at(corner(0, 3)), END);
        assert_eq!(at(corner(1, 2)), WALL);

        let (x, y) = corner(0, 2);
        assert_eq!(at((x + 3, y + 3)), PATH);
        assert_eq!(at((x + 4, y)), SEPARATOR);
        assert_eq!(at((0, 0)), SEPARATOR);
        assert_eq!(at((20, 10)), SEPARATOR);
    }

    #[test]
    fn test_image_without_path_shows_floor() {
        let grid = corridor();
        let picture = to_image(&grid, None, Some(Coord::new(0, 1)), Some(Coord::new(0, 3)), 4)
            .expect("small grid fits");

        let (x, y) = corner(0, 2);
        assert_eq!(*picture.get_pixel(x, y), FLOOR);
    }

    #[test]
    fn test_oversized_image_is_refused() {
        let grid = Grid::filled(1, 2, Cell::Open);
        let err = to_image(&grid, None, None, None, u32::MAX).expect_err("too wide for u32");
        assert!(matches!(err, ImageError::Limits(_)));
    }

    #[test]
    fn test_save_images_writes_both_pictures() {
        let grid = corridor();
        let path = [Coord::new(0, 1), Coord::new(0, 2), Coord::new(0, 3)];
        let prefix = std::env::temp_dir().join(format!("maze-render-{}", std::process::id()));

        let (plain, solved) = save_images(
            &grid,
            Some(&path),
            Some(Coord::new(0, 1)),
            Some(Coord::new(0, 3)),
            4,
            &prefix,
        )
        .expect("temp dir is writable");

        assert_eq!(plain, with_suffix(&prefix, ".png"));
        assert_eq!(solved, with_suffix(&prefix, "_path.png"));

        let (x, y) = corner(0, 2);
        let plain_picture = image::open(&plain).expect("png decodes").to_rgb8();
        let solved_picture = image::open(&solved).expect("png decodes").to_rgb8();
        assert_eq!(plain_picture.dimensions(), (21, 11));
        assert_eq!(*plain_picture.get_pixel(x, y), FLOOR);
        assert_eq!(*solved_picture.get_pixel(x, y), PATH);

        std::fs::remove_file(plain).ok();
        std::fs::remove_file(solved).ok();
    }
}
