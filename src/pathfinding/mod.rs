use crate::map::{Cell, TerrainGrid, TerrainKind};
use crate::terrain::constants::MAX_REACHABLE_VISITS;
use pathfinding::prelude::{bfs, bfs_reach};
use std::collections::HashSet;

pub mod navigator;

pub use navigator::*;

/// In-bounds orthogonal neighbours of `cell` whose terrain passes `is_walkable`
fn walkable_neighbors(
    grid: &TerrainGrid,
    cell: Cell,
    is_walkable: impl Fn(TerrainKind) -> bool,
) -> Vec<Cell> {
    cell.neighbors()
        .into_iter()
        .filter(|&next| grid.in_bounds(next) && is_walkable(grid.get(next)))
        .collect()
}

/// Cells connected to `start` through terrain in `walkable`.
///
/// `start` is always part of the result, whatever its own terrain. The search
/// stops after [`MAX_REACHABLE_VISITS`] cells, so on very large connected areas
/// the set is partial and only means "at least this big".
pub fn reachable(grid: &TerrainGrid, start: Cell, walkable: &[TerrainKind]) -> HashSet<Cell> {
    bfs_reach(start, |&cell| {
        walkable_neighbors(grid, cell, |kind| walkable.contains(&kind))
    })
    .take(MAX_REACHABLE_VISITS)
    .collect()
}

/// Fewest-cells path from `start` to `goal`, both included.
///
/// Returns `[start]` when they are equal and an empty vec when `goal` cannot be
/// reached. Edges are unweighted, so breadth-first order gives a shortest path.
pub fn shortest_path(
    grid: &TerrainGrid,
    start: Cell,
    goal: Cell,
    is_walkable: impl Fn(TerrainKind) -> bool,
) -> Vec<Cell> {
    bfs(
        &start,
        |&cell| walkable_neighbors(grid, cell, &is_walkable),
        |&cell| cell == goal,
    )
    .unwrap_or_default()
}
