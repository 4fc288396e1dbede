use crate::game_logic::errors::{TileQuestError, TileQuestResult};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Integer coordinate on the logical tile grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The four orthogonal neighbours, east/west/north/south
    pub fn neighbors(self) -> [Cell; 4] {
        [
            Cell::new(self.x.saturating_add(1), self.y),
            Cell::new(self.x.saturating_sub(1), self.y),
            Cell::new(self.x, self.y.saturating_add(1)),
            Cell::new(self.x, self.y.saturating_sub(1)),
        ]
    }

    pub fn distance_squared(self, other: Cell) -> i64 {
        let dx = self.x as i64 - other.x as i64;
        let dy = self.y as i64 - other.y as i64;
        dx.saturating_mul(dx).saturating_add(dy.saturating_mul(dy))
    }

    /// Whether `self` is at least `min_distance` away from `other`
    pub fn is_at_least(self, other: Cell, min_distance: f32) -> bool {
        self.distance_squared(other) as f64 >= (min_distance as f64) * (min_distance as f64)
    }

    pub fn is_orthogonally_adjacent(self, other: Cell) -> bool {
        matches!(
            (self.x.abs_diff(other.x), self.y.abs_diff(other.y)),
            (1, 0) | (0, 1)
        )
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TerrainKind {
    /// Outside the generated bounds or never written
    #[default]
    Empty,
    Grass,
    Water,
    Mountain,
}

impl TerrainKind {
    pub const PLACEABLE: [TerrainKind; 3] =
        [TerrainKind::Grass, TerrainKind::Water, TerrainKind::Mountain];

    /// Water and Mountain need an ability to enter
    pub fn is_challenging(self) -> bool {
        matches!(self, TerrainKind::Water | TerrainKind::Mountain)
    }

    pub fn glyph(self) -> char {
        match self {
            TerrainKind::Empty => ' ',
            TerrainKind::Grass => '.',
            TerrainKind::Water => '~',
            TerrainKind::Mountain => '^',
        }
    }
}

/// Dense terrain storage for `[0,width) x [0,height)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TerrainGrid {
    #[validate(range(min = 1, max = 2048))]
    pub width: i32,
    #[validate(range(min = 1, max = 2048))]
    pub height: i32,
    tiles: Vec<TerrainKind>, // Flattened 2D array (row-major)
}

impl TerrainGrid {
    /// Create an unwritten grid; every cell starts as `Empty`
    pub fn new(width: i32, height: i32) -> TileQuestResult<Self> {
        let grid = Self {
            width,
            height,
            tiles: Vec::new(),
        };
        grid.validate()
            .map_err(|e| TileQuestError::InvalidGenerationParams {
                reason: format!("grid size {width}x{height} rejected: {e}"),
            })?;

        Ok(Self {
            tiles: vec![TerrainKind::Empty; (width * height) as usize],
            ..grid
        })
    }

    /// Create a grid with every cell set to `kind`
    pub fn filled(width: i32, height: i32, kind: TerrainKind) -> TileQuestResult<Self> {
        let mut grid = Self::new(width, height)?;
        grid.tiles.fill(kind);
        Ok(grid)
    }

    /// Build a grid from text rows using the `glyph` characters, top row is `y = 0`
    pub fn from_rows(rows: &[&str]) -> TileQuestResult<Self> {
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.chars().count()) as i32;
        let mut grid = Self::new(width, height)?;

        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() as i32 != width {
                return Err(TileQuestError::InvalidGenerationParams {
                    reason: format!("row {y} has a different width than row 0"),
                });
            }
            for (x, ch) in row.chars().enumerate() {
                let kind = match ch {
                    '.' => TerrainKind::Grass,
                    '~' => TerrainKind::Water,
                    '^' => TerrainKind::Mountain,
                    other => {
                        return Err(TileQuestError::InvalidGenerationParams {
                            reason: format!("unknown tile glyph '{other}' at ({x}, {y})"),
                        });
                    }
                };
                grid.set(Cell::new(x as i32, y as i32), kind);
            }
        }

        Ok(grid)
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.y >= 0 && cell.x < self.width && cell.y < self.height
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.in_bounds(cell)
            .then(|| (cell.y * self.width + cell.x) as usize)
    }

    /// Terrain at `cell`, `Empty` when out of bounds
    pub fn get(&self, cell: Cell) -> TerrainKind {
        self.index(cell)
            .and_then(|i| self.tiles.get(i).copied())
            .unwrap_or(TerrainKind::Empty)
    }

    /// Write a tile; returns false when the cell is out of bounds
    pub fn set(&mut self, cell: Cell, kind: TerrainKind) -> bool {
        match self.index(cell) {
            Some(i) => {
                self.tiles[i] = kind;
                true
            }
            None => false,
        }
    }

    pub fn is_outer_ring(&self, cell: Cell) -> bool {
        cell.x == 0 || cell.y == 0 || cell.x == self.width - 1 || cell.y == self.height - 1
    }

    /// All in-bounds cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.height).flat_map(move |y| (0..self.width).map(move |x| Cell::new(x, y)))
    }

    pub fn cells_of(&self, kind: TerrainKind) -> Vec<Cell> {
        self.cells().filter(|&c| self.get(c) == kind).collect()
    }

    pub fn count(&self, kind: TerrainKind) -> usize {
        self.tiles.iter().filter(|&&k| k == kind).count()
    }

    pub fn is_fully_populated(&self) -> bool {
        !self.tiles.contains(&TerrainKind::Empty)
    }

    /// Text rendering using the tile glyphs, one line per row with `y = 0` first
    pub fn to_ascii(&self) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(self.get(Cell::new(x, y)).glyph());
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_empty() {
        let grid = TerrainGrid::new(3, 2).unwrap();
        assert_eq!(grid.count(TerrainKind::Empty), 6);
        assert!(!grid.is_fully_populated());
    }

    #[test]
    fn test_invalid_grid_size() {
        assert!(TerrainGrid::new(0, 5).is_err());
        assert!(TerrainGrid::new(5, 3000).is_err());
    }

    #[test]
    fn test_out_of_bounds_lookup_is_empty() {
        let mut grid = TerrainGrid::filled(4, 4, TerrainKind::Grass).unwrap();
        assert_eq!(grid.get(Cell::new(-1, 0)), TerrainKind::Empty);
        assert_eq!(grid.get(Cell::new(4, 2)), TerrainKind::Empty);
        assert!(!grid.set(Cell::new(4, 4), TerrainKind::Water));
        assert_eq!(grid.get(Cell::new(3, 3)), TerrainKind::Grass);
    }

    #[test]
    fn test_from_rows() {
        let grid = TerrainGrid::from_rows(&["^^^", "^.~", "^^^"]).unwrap();
        assert_eq!(grid.width, 3);
        assert_eq!(grid.height, 3);
        assert_eq!(grid.get(Cell::new(1, 1)), TerrainKind::Grass);
        assert_eq!(grid.get(Cell::new(2, 1)), TerrainKind::Water);
        assert_eq!(grid.to_ascii(), "^^^\n^.~\n^^^\n");

        assert!(TerrainGrid::from_rows(&["..", "."]).is_err());
        assert!(TerrainGrid::from_rows(&["x."]).is_err());
    }

    #[test]
    fn test_cells_row_major() {
        let grid = TerrainGrid::filled(2, 2, TerrainKind::Grass).unwrap();
        let cells: Vec<Cell> = grid.cells().collect();
        assert_eq!(
            cells,
            vec![
                Cell::new(0, 0),
                Cell::new(1, 0),
                Cell::new(0, 1),
                Cell::new(1, 1)
            ]
        );
    }

    #[test]
    fn test_cell_distance() {
        let a = Cell::new(0, 0);
        let b = Cell::new(3, 4);
        assert_eq!(a.distance_squared(b), 25);
        assert!(b.is_at_least(a, 5.0));
        assert!(!b.is_at_least(a, 5.1));
        assert!(a.is_orthogonally_adjacent(Cell::new(0, -1)));
        assert!(!a.is_orthogonally_adjacent(Cell::new(1, 1)));
    }

    #[test]
    fn test_extreme_cells_do_not_overflow() {
        let low = Cell::new(i32::MIN, i32::MIN);
        let high = Cell::new(i32::MAX, i32::MAX);
        assert_eq!(low.distance_squared(Cell::new(i32::MIN, 0)), (i32::MIN as i64).pow(2));
        assert!(!low.is_orthogonally_adjacent(high));
        assert!(high.neighbors().contains(&high));
        assert_eq!(low.distance_squared(high), i64::MAX);
    }
}
