use crate::map::{Cell, TerrainGrid};
use crate::terrain::constants::DEFAULT_CELL_SIZE;
use bevy::math::Vec2;

/// Maps grid cells to world positions with the grid centred on the origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    pub width: i32,
    pub height: i32,
    /// World units per grid cell
    pub cell_size: f32,
}

impl GridLayout {
    pub fn new(width: i32, height: i32, cell_size: f32) -> Self {
        Self {
            width,
            height,
            cell_size,
        }
    }

    pub fn for_grid(grid: &TerrainGrid) -> Self {
        Self::new(grid.width, grid.height, DEFAULT_CELL_SIZE)
    }

    /// World-space offset of cell (0, 0), in cells
    fn origin(&self) -> (i32, i32) {
        (-(self.width / 2), -(self.height / 2))
    }

    /// Centre of a cell in world coordinates
    pub fn cell_center(&self, cell: Cell) -> Vec2 {
        let (ox, oy) = self.origin();
        Vec2::new(
            ((ox + cell.x) as f32 + 0.5) * self.cell_size,
            ((oy + cell.y) as f32 + 0.5) * self.cell_size,
        )
    }

    /// Cell containing a world position; may lie outside the grid bounds.
    ///
    /// Positions too far away for an `i32` cell saturate at the edge of the
    /// cell range, which is always out of bounds.
    pub fn world_to_cell(&self, world: Vec2) -> Cell {
        let (ox, oy) = self.origin();
        Cell::new(
            self.axis_to_cell(world.x, ox),
            self.axis_to_cell(world.y, oy),
        )
    }

    fn axis_to_cell(&self, world: f32, origin: i32) -> i32 {
        let cell = (world as f64 / self.cell_size as f64).floor() - origin as f64;
        // NaN casts to 0, infinities saturate
        cell.clamp(i32::MIN as f64, i32::MAX as f64) as i32
    }

    /// Centre of the whole grid in world coordinates
    pub fn world_center(&self) -> Vec2 {
        let (ox, oy) = self.origin();
        Vec2::new(
            (ox as f32 + self.width as f32 / 2.0) * self.cell_size,
            (oy as f32 + self.height as f32 / 2.0) * self.cell_size,
        )
    }

    pub fn world_size(&self) -> Vec2 {
        Vec2::new(
            self.width as f32 * self.cell_size,
            self.height as f32 * self.cell_size,
        )
    }
}
