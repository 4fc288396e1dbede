use crate::game_logic::abilities::AbilitySet;
use crate::game_logic::movement::step_towards;
use crate::map::{Cell, TerrainGrid};
use crate::pathfinding::shortest_path;
use crate::terrain::GridLayout;
use crate::terrain::constants::ARRIVE_EPSILON;
use bevy::log::{debug, warn};
use bevy::math::Vec2;
use std::collections::VecDeque;

/// Follows shortest paths across the grid, one waypoint at a time
#[derive(Debug, Clone)]
pub struct Navigator {
    waypoints: VecDeque<Vec2>,
    pub arrive_epsilon: f32,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            waypoints: VecDeque::new(),
            arrive_epsilon: ARRIVE_EPSILON,
        }
    }

    /// World-space path from `start_world` to `goal_world` under `abilities`
    pub fn plan(
        grid: &TerrainGrid,
        layout: &GridLayout,
        start_world: Vec2,
        goal_world: Vec2,
        abilities: AbilitySet,
    ) -> Vec<Vec2> {
        let start = layout.world_to_cell(start_world);
        let goal = layout.world_to_cell(goal_world);
        debug!("Finding path from {start} to {goal} with {abilities:?}");

        shortest_path(grid, start, goal, |kind| abilities.can_enter(kind))
            .into_iter()
            .map(|cell: Cell| layout.cell_center(cell))
            .collect()
    }

    /// Replace any in-flight path with a new one; returns the waypoint count.
    ///
    /// When no path exists the navigator is left idle.
    pub fn request(
        &mut self,
        grid: &TerrainGrid,
        layout: &GridLayout,
        start_world: Vec2,
        goal_world: Vec2,
        abilities: AbilitySet,
    ) -> usize {
        self.waypoints = Self::plan(grid, layout, start_world, goal_world, abilities).into();
        if self.waypoints.is_empty() {
            warn!("No path found to ({:.2}, {:.2})", goal_world.x, goal_world.y);
        } else {
            debug!("Path found with {} tiles", self.waypoints.len());
        }
        self.waypoints.len()
    }

    pub fn current_target(&self) -> Option<Vec2> {
        self.waypoints.front().copied()
    }

    pub fn remaining(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_idle(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
    }

    /// Move toward the current waypoint by at most `max_step` and pop it when reached
    pub fn advance(&mut self, position: Vec2, max_step: f32) -> Vec2 {
        let Some(target) = self.current_target() else {
            return position;
        };

        let step = step_towards(position, target, max_step, self.arrive_epsilon);
        if step.reached {
            self.waypoints.pop_front();
            debug!("Reached node. Remaining: {}", self.waypoints.len());
        }
        step.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::TerrainKind;

    fn corridor() -> (TerrainGrid, GridLayout) {
        let grid = TerrainGrid::from_rows(&[
            "^^^^^^",
            "^..~.^",
            "^^^^^^",
        ])
        .unwrap();
        let layout = GridLayout::for_grid(&grid);
        (grid, layout)
    }

    #[test]
    fn test_request_without_sail_stays_idle() {
        let (grid, layout) = corridor();
        let mut nav = Navigator::new();
        let start = layout.cell_center(Cell::new(1, 1));
        let goal = layout.cell_center(Cell::new(4, 1));

        assert_eq!(nav.request(&grid, &layout, start, goal, AbilitySet::default()), 0);
        assert!(nav.is_idle());
        assert_eq!(nav.advance(start, 1.0), start);
    }

    #[test]
    fn test_request_with_sail_crosses_water() {
        let (grid, layout) = corridor();
        let mut nav = Navigator::new();
        let start = layout.cell_center(Cell::new(1, 1));
        let goal = layout.cell_center(Cell::new(4, 1));
        let sail = AbilitySet {
            can_sail: true,
            ..AbilitySet::default()
        };

        assert_eq!(nav.request(&grid, &layout, start, goal, sail), 4);
        // First waypoint is the start cell itself
        assert_eq!(nav.current_target(), Some(start));
    }

    #[test]
    fn test_new_request_discards_old_path() {
        let (grid, layout) = corridor();
        let mut nav = Navigator::new();
        let start = layout.cell_center(Cell::new(1, 1));
        nav.request(&grid, &layout, start, layout.cell_center(Cell::new(2, 1)), AbilitySet::default());
        assert_eq!(nav.remaining(), 2);

        nav.request(&grid, &layout, start, start, AbilitySet::default());
        assert_eq!(nav.remaining(), 1);

        // Unreachable request clears the in-flight path
        nav.request(&grid, &layout, start, layout.cell_center(Cell::new(0, 0)), AbilitySet::default());
        assert!(nav.is_idle());
    }

    #[test]
    fn test_far_away_target_has_no_path() {
        let grid = TerrainGrid::filled(60, 40, TerrainKind::Grass).unwrap();
        let layout = GridLayout::for_grid(&grid);
        let mut nav = Navigator::new();
        let start = layout.cell_center(Cell::new(30, 20));

        for goal in [
            Vec2::new(3.0e9, 0.0),
            Vec2::new(-3.0e9, 3.0e9),
            Vec2::new(f32::MAX, f32::MIN),
        ] {
            assert_eq!(nav.request(&grid, &layout, start, goal, AbilitySet::ALL), 0);
            assert!(nav.is_idle());
        }
    }

    #[test]
    fn test_advance_walks_whole_path() {
        let (grid, layout) = corridor();
        let mut nav = Navigator::new();
        let start = layout.cell_center(Cell::new(1, 1));
        let goal = layout.cell_center(Cell::new(4, 1));
        nav.request(&grid, &layout, start, goal, AbilitySet::ALL);

        let mut position = start;
        for _ in 0..100 {
            position = nav.advance(position, 0.25);
            if nav.is_idle() {
                break;
            }
        }
        assert!(nav.is_idle());
        assert_eq!(position, goal);
        assert_eq!(grid.get(layout.world_to_cell(position)), TerrainKind::Grass);
    }
}
