use crate::game_logic::abilities::{AbilitySet, ItemKind};
use crate::game_logic::errors::{TileQuestError, TileQuestResult};
use crate::map::{Cell, TerrainGrid, TerrainKind};
use crate::pathfinding::reachable;
use crate::terrain::GridLayout;
use crate::terrain::constants::{
    DEFAULT_MAX_REGENERATIONS, MAX_REACHABLE_VISITS, PICK_ATTEMPTS, PICKAXE_ATTEMPTS, SEED_RANGE,
};
use crate::terrain_generation::{TerrainGenerator, TerrainParams};
use bevy::log::{debug, info, warn};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Order in which the two traversal items are placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scenario {
    /// Goat on Grass, then Boat preferably on a Mountain reachable by climbing
    GoatFirst,
    /// Boat then Goat, both on Grass
    BoatFirst,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    pub terrain: TerrainParams,
    /// Minimum Grass-only reachable area around the player spawn
    pub min_reachable: usize,
    /// Random spawn candidates tried before the map is regenerated
    pub max_tries: u32,
    pub min_item_distance: f32,
    pub min_goal_distance: f32,
    /// Initial seed; drawn from the process RNG when unset
    pub seed: Option<u32>,
    pub max_regenerations: u32,
    /// Force a scenario instead of choosing one per attempt
    pub scenario: Option<Scenario>,
    /// Treat a missing goal as a failed attempt
    pub restart_without_goal: bool,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            terrain: TerrainParams::default(),
            min_reachable: 100,
            max_tries: 200,
            min_item_distance: 5.0,
            min_goal_distance: 15.0,
            seed: None,
            max_regenerations: DEFAULT_MAX_REGENERATIONS,
            scenario: None,
            restart_without_goal: false,
        }
    }
}

impl PlacementConfig {
    pub fn validate(&self) -> TileQuestResult<()> {
        self.terrain.validate()?;
        if self.min_reachable > MAX_REACHABLE_VISITS {
            return Err(TileQuestError::InvalidGenerationParams {
                reason: format!(
                    "min reachable area {} exceeds the search limit of {MAX_REACHABLE_VISITS}",
                    self.min_reachable
                ),
            });
        }
        for (name, value) in [
            ("item", self.min_item_distance),
            ("goal", self.min_goal_distance),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(TileQuestError::InvalidGenerationParams {
                    reason: format!("minimum {name} distance {value} must be finite and non-negative"),
                });
            }
        }
        Ok(())
    }
}

/// Why a generation attempt was thrown away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartReason {
    NoGrass,
    NoValidSpawn { tries: u32 },
    EmptyCandidatePool,
    NoGoal,
}

impl std::fmt::Display for RestartReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestartReason::NoGrass => write!(f, "no grass cells on the map"),
            RestartReason::NoValidSpawn { tries } => {
                write!(f, "no player spawn with enough room after {tries} tries")
            }
            RestartReason::EmptyCandidatePool => write!(f, "no item candidates far enough from the player"),
            RestartReason::NoGoal => write!(f, "goal could not be placed"),
        }
    }
}

/// Cells already carrying an entity in the current attempt
#[derive(Debug, Clone, Default)]
pub struct UsedCells(HashSet<Cell>);

impl UsedCells {
    /// Returns false if the cell was already taken
    pub fn claim(&mut self, cell: Cell) -> bool {
        self.0.insert(cell)
    }

    pub fn release(&mut self, cell: Cell) {
        self.0.remove(&cell);
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.0.contains(&cell)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRecord {
    pub item: ItemKind,
    pub cell: Cell,
    pub terrain: TerrainKind,
}

/// Entity placements for one successful attempt
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub player: Cell,
    pub player_reachable: usize,
    pub scenario: Scenario,
    pub records: Vec<PlacementRecord>,
}

/// A generated map together with its placements
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub grid: TerrainGrid,
    /// Seed that produced `grid`
    pub seed: u32,
    pub player: Cell,
    pub placements: Vec<PlacementRecord>,
    pub scenario: Scenario,
    /// Attempts discarded before this one
    pub restarts: u32,
}

impl Level {
    pub fn placement(&self, item: ItemKind) -> Option<&PlacementRecord> {
        self.placements.iter().find(|r| r.item == item)
    }

    pub fn layout(&self) -> GridLayout {
        GridLayout::for_grid(&self.grid)
    }

    /// One line per item: what it unlocks and where it landed
    pub fn summary(&self) -> Vec<String> {
        ItemKind::ALL
            .into_iter()
            .map(|item| {
                let unlock = match item.capability() {
                    Some(cap) => format!("{cap:?}"),
                    None => "finish".to_string(),
                };
                match self.placement(item) {
                    Some(record) => {
                        format!("{item} ({unlock}) on {:?} at {}", record.terrain, record.cell)
                    }
                    None => format!("{item} ({unlock}) NOT PLACED"),
                }
            })
            .collect()
    }
}

const CLIMBER: AbilitySet = AbilitySet {
    can_sail: false,
    can_climb: true,
    can_mine: false,
};

/// Sort cells top row first, left to right
fn row_major(mut cells: Vec<Cell>) -> Vec<Cell> {
    cells.sort_by_key(|c| (c.y, c.x));
    cells
}

/// Generates maps and places the player, items and goal until a level is valid
pub struct PlacementEngine {
    pub config: PlacementConfig,
    generator: TerrainGenerator,
    rng: Pcg64,
    initial_seed: u32,
    /// Attempts discarded during the latest `generate` call
    pub restarts: u32,
}

impl PlacementEngine {
    pub fn new(config: PlacementConfig) -> TileQuestResult<Self> {
        config.validate()?;
        let generator = TerrainGenerator::new(config.terrain.clone())?;
        let initial_seed = config
            .seed
            .unwrap_or_else(|| rand::random::<u32>() % SEED_RANGE);

        Ok(Self {
            config,
            generator,
            rng: Pcg64::seed_from_u64(initial_seed as u64),
            initial_seed,
            restarts: 0,
        })
    }

    pub fn initial_seed(&self) -> u32 {
        self.initial_seed
    }

    /// Run generate/validate/restart until a level is valid or the ceiling is hit
    pub fn generate(&mut self) -> TileQuestResult<Level> {
        self.restarts = 0;
        let mut seed = self.initial_seed;

        loop {
            let grid = self.generator.generate(seed)?;
            match self.try_place(&grid) {
                Ok(placement) => {
                    info!(
                        "Level ready: seed {seed}, {:?}, player at {} reaching {} grass cells, {} restart(s)",
                        placement.scenario,
                        placement.player,
                        placement.player_reachable,
                        self.restarts
                    );
                    return Ok(Level {
                        grid,
                        seed,
                        player: placement.player,
                        placements: placement.records,
                        scenario: placement.scenario,
                        restarts: self.restarts,
                    });
                }
                Err(reason) => {
                    self.restarts += 1;
                    if self.restarts > self.config.max_regenerations {
                        warn!("Giving up after {} attempts: {reason}", self.restarts);
                        return Err(TileQuestError::RegenerationLimitExceeded {
                            attempts: self.restarts,
                        });
                    }
                    seed = self.rng.gen_range(0..SEED_RANGE);
                    debug!("Restart {} ({reason}), next seed {seed}", self.restarts);
                }
            }
        }
    }

    /// One placement attempt on an already generated grid
    pub fn try_place(&mut self, grid: &TerrainGrid) -> Result<Placement, RestartReason> {
        let mut used = UsedCells::default();
        let mut records = Vec::new();

        let (player, player_area) = self.place_player(grid)?;
        used.claim(player);
        let player_reachable = player_area.len();

        let mut grass_pool: Vec<Cell> = row_major(player_area.into_iter().collect())
            .into_iter()
            .filter(|&c| c.is_at_least(player, self.config.min_item_distance))
            .collect();
        if grass_pool.is_empty() {
            return Err(RestartReason::EmptyCandidatePool);
        }

        let scenario = self
            .config
            .scenario
            .unwrap_or_else(|| if self.rng.gen_bool(0.5) { Scenario::GoatFirst } else { Scenario::BoatFirst });

        let place = |item: ItemKind, cell: Option<Cell>, records: &mut Vec<PlacementRecord>| match cell {
            Some(cell) => records.push(PlacementRecord {
                item,
                cell,
                terrain: grid.get(cell),
            }),
            None => warn!("Could not place {item}"),
        };

        match scenario {
            Scenario::GoatFirst => {
                let goat = self.pick(grid, &mut grass_pool, &mut used, TerrainKind::Grass);
                place(ItemKind::Goat, goat, &mut records);

                let mut mountain_pool: Vec<Cell> = row_major(
                    // Reach once the goat's climbing is granted
                    reachable(grid, player, &CLIMBER.walkable_kinds())
                        .into_iter()
                        .collect(),
                )
                .into_iter()
                .filter(|&c| {
                    grid.get(c) == TerrainKind::Mountain
                        && c.is_at_least(player, self.config.min_item_distance)
                })
                .collect();

                let boat = self
                    .pick(grid, &mut mountain_pool, &mut used, TerrainKind::Mountain)
                    .or_else(|| self.pick(grid, &mut grass_pool, &mut used, TerrainKind::Grass));
                place(ItemKind::Boat, boat, &mut records);
            }
            Scenario::BoatFirst => {
                let boat = self.pick(grid, &mut grass_pool, &mut used, TerrainKind::Grass);
                place(ItemKind::Boat, boat, &mut records);
                let goat = self.pick(grid, &mut grass_pool, &mut used, TerrainKind::Grass);
                place(ItemKind::Goat, goat, &mut records);
            }
        }

        let pickaxe = self.place_pickaxe(grid, &mut grass_pool, &mut used);
        place(ItemKind::Pickaxe, pickaxe, &mut records);

        let goal = self.place_goal(grid, player, &mut used);
        if goal.is_none() && self.config.restart_without_goal {
            return Err(RestartReason::NoGoal);
        }
        place(ItemKind::Goal, goal, &mut records);

        Ok(Placement {
            player,
            player_reachable,
            scenario,
            records,
        })
    }

    fn place_player(&mut self, grid: &TerrainGrid) -> Result<(Cell, HashSet<Cell>), RestartReason> {
        let grass = grid.cells_of(TerrainKind::Grass);
        if grass.is_empty() {
            return Err(RestartReason::NoGrass);
        }

        for _ in 0..self.config.max_tries {
            let candidate = grass[self.rng.gen_range(0..grass.len())];
            let area = reachable(grid, candidate, &[TerrainKind::Grass]);
            if area.len() >= self.config.min_reachable {
                debug!("Player spawn {candidate} reaches {} grass cells", area.len());
                return Ok((candidate, area));
            }
        }

        Err(RestartReason::NoValidSpawn {
            tries: self.config.max_tries,
        })
    }

    /// Draw random cells from `pool` until one is unused and of `kind`.
    ///
    /// Rejected cells are removed from the pool; the accepted one is claimed.
    fn pick(
        &mut self,
        grid: &TerrainGrid,
        pool: &mut Vec<Cell>,
        used: &mut UsedCells,
        kind: TerrainKind,
    ) -> Option<Cell> {
        for _ in 0..PICK_ATTEMPTS {
            if pool.is_empty() {
                return None;
            }
            let index = self.rng.gen_range(0..pool.len());
            let cell = pool[index];
            if !used.contains(cell) && grid.get(cell) == kind {
                used.claim(cell);
                return Some(cell);
            }
            pool.swap_remove(index);
        }
        None
    }

    fn place_pickaxe(
        &mut self,
        grid: &TerrainGrid,
        pool: &mut Vec<Cell>,
        used: &mut UsedCells,
    ) -> Option<Cell> {
        for _ in 0..PICKAXE_ATTEMPTS {
            let cell = self.pick(grid, pool, used, TerrainKind::Grass)?;
            // Tile is re-read after the claim
            if grid.get(cell) == TerrainKind::Grass {
                return Some(cell);
            }
            used.release(cell);
        }
        None
    }

    /// First unused far challenging cell in row order, else the first unused far cell
    fn place_goal(&self, grid: &TerrainGrid, player: Cell, used: &mut UsedCells) -> Option<Cell> {
        let far: Vec<Cell> = row_major(
            reachable(grid, player, &AbilitySet::ALL.walkable_kinds())
                .into_iter()
                .collect(),
        )
        .into_iter()
        .filter(|&c| c.is_at_least(player, self.config.min_goal_distance))
        .collect();

        let goal = far
            .iter()
            .copied()
            .find(|&c| grid.get(c).is_challenging() && !used.contains(c))
            .or_else(|| far.iter().copied().find(|&c| !used.contains(c)))?;

        used.claim(goal);
        Some(goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_grass_config(size: i32) -> PlacementConfig {
        PlacementConfig {
            terrain: TerrainParams {
                width: size,
                height: size,
                water_threshold: 0.0,
                mountain_threshold: 1.0,
                border_mountains: true,
                ..TerrainParams::default()
            },
            min_reachable: 50,
            seed: Some(1),
            ..PlacementConfig::default()
        }
    }

    /// Grass field on the left, a mountain band, then a sea on the right
    fn banded_grid() -> TerrainGrid {
        let rows: Vec<String> = (0..20)
            .map(|_| format!("{}{}{}", ".".repeat(16), "^".repeat(4), "~".repeat(10)))
            .collect();
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        TerrainGrid::from_rows(&rows).unwrap()
    }

    fn assert_unique_cells(player: Cell, records: &[PlacementRecord]) {
        let mut seen = HashSet::from([player]);
        for record in records {
            assert!(seen.insert(record.cell), "{:?} shares a cell", record.item);
        }
    }

    #[test]
    fn test_all_grass_spawn_succeeds_first_attempt() {
        let mut engine = PlacementEngine::new(all_grass_config(20)).unwrap();
        let level = engine.generate().unwrap();

        assert_eq!(level.restarts, 0);
        assert_eq!(level.seed, 1);
        assert!(!level.grid.is_outer_ring(level.player));
        let area = reachable(&level.grid, level.player, &[TerrainKind::Grass]);
        assert_eq!(area.len(), 18 * 18);
    }

    #[test]
    fn test_zero_grass_restarts() {
        let config = PlacementConfig {
            terrain: TerrainParams {
                width: 16,
                height: 16,
                water_threshold: 1.0,
                mountain_threshold: 1.5,
                ..TerrainParams::default()
            },
            seed: Some(3),
            max_regenerations: 4,
            ..PlacementConfig::default()
        };
        let mut engine = PlacementEngine::new(config).unwrap();

        match engine.generate() {
            Err(TileQuestError::RegenerationLimitExceeded { attempts }) => assert_eq!(attempts, 5),
            other => panic!("expected the regeneration limit, got {other:?}"),
        }
        assert!(engine.restarts >= 1);
    }

    #[test]
    fn test_no_grass_reason() {
        let grid = TerrainGrid::filled(8, 8, TerrainKind::Water).unwrap();
        let mut engine = PlacementEngine::new(PlacementConfig {
            seed: Some(5),
            ..PlacementConfig::default()
        })
        .unwrap();
        assert_eq!(engine.try_place(&grid), Err(RestartReason::NoGrass));
    }

    #[test]
    fn test_small_area_has_no_spawn() {
        let grid = TerrainGrid::from_rows(&["^^^^", "^..^", "^^^^"]).unwrap();
        let mut engine = PlacementEngine::new(PlacementConfig {
            seed: Some(5),
            max_tries: 7,
            ..PlacementConfig::default()
        })
        .unwrap();
        assert_eq!(
            engine.try_place(&grid),
            Err(RestartReason::NoValidSpawn { tries: 7 })
        );
    }

    #[test]
    fn test_spacing_smaller_than_area_empties_pool() {
        // 3x3 field but every cell is within 5 of any spawn
        let grid = TerrainGrid::from_rows(&["^^^^^", "^...^", "^...^", "^...^", "^^^^^"]).unwrap();
        let mut engine = PlacementEngine::new(PlacementConfig {
            seed: Some(9),
            min_reachable: 9,
            ..PlacementConfig::default()
        })
        .unwrap();
        assert_eq!(engine.try_place(&grid), Err(RestartReason::EmptyCandidatePool));
    }

    #[test]
    fn test_goat_first_boat_on_reachable_mountain() {
        let grid = banded_grid();
        for seed in 0..10 {
            let mut engine = PlacementEngine::new(PlacementConfig {
                seed: Some(seed),
                min_reachable: 50,
                min_goal_distance: 10.0,
                scenario: Some(Scenario::GoatFirst),
                ..PlacementConfig::default()
            })
            .unwrap();
            let placement = engine.try_place(&grid).unwrap();
            assert!(placement.player_reachable >= 50);
            let boat = placement
                .records
                .iter()
                .find(|r| r.item == ItemKind::Boat)
                .unwrap();

            assert_eq!(boat.terrain, TerrainKind::Mountain, "seed {seed}");
            let climbable = reachable(
                &grid,
                placement.player,
                &[TerrainKind::Grass, TerrainKind::Mountain],
            );
            assert!(climbable.contains(&boat.cell));
            assert_unique_cells(placement.player, &placement.records);
        }
    }

    #[test]
    fn test_goat_first_without_mountains_falls_back_to_grass() {
        let rows: Vec<String> = (0..20)
            .map(|_| format!("{}{}", ".".repeat(16), "~".repeat(6)))
            .collect();
        let rows: Vec<&str> = rows.iter().map(String::as_str).collect();
        let grid = TerrainGrid::from_rows(&rows).unwrap();

        let mut engine = PlacementEngine::new(PlacementConfig {
            seed: Some(11),
            min_reachable: 50,
            scenario: Some(Scenario::GoatFirst),
            ..PlacementConfig::default()
        })
        .unwrap();
        let placement = engine.try_place(&grid).unwrap();
        for record in &placement.records {
            if record.item != ItemKind::Goal {
                assert_eq!(record.terrain, TerrainKind::Grass, "{:?}", record.item);
            }
        }
    }

    #[test]
    fn test_boat_first_never_on_water() {
        let grid = banded_grid();
        let mut engine = PlacementEngine::new(PlacementConfig {
            seed: Some(2),
            min_reachable: 50,
            scenario: Some(Scenario::BoatFirst),
            ..PlacementConfig::default()
        })
        .unwrap();
        let placement = engine.try_place(&grid).unwrap();
        for item in [ItemKind::Boat, ItemKind::Goat, ItemKind::Pickaxe] {
            let record = placement.records.iter().find(|r| r.item == item).unwrap();
            assert_eq!(record.terrain, TerrainKind::Grass);
        }
    }

    #[test]
    fn test_goal_prefers_challenging_cell() {
        let grid = banded_grid();
        let mut engine = PlacementEngine::new(PlacementConfig {
            seed: Some(4),
            min_reachable: 50,
            min_goal_distance: 3.0,
            ..PlacementConfig::default()
        })
        .unwrap();
        let placement = engine.try_place(&grid).unwrap();
        let goal = placement
            .records
            .iter()
            .find(|r| r.item == ItemKind::Goal)
            .unwrap();
        assert!(goal.terrain.is_challenging());
        assert!(goal.cell.is_at_least(placement.player, 3.0));
    }

    #[test]
    fn test_goal_falls_back_to_far_grass() {
        let grid = TerrainGrid::filled(30, 30, TerrainKind::Grass).unwrap();
        let mut engine = PlacementEngine::new(PlacementConfig {
            seed: Some(8),
            ..PlacementConfig::default()
        })
        .unwrap();
        let placement = engine.try_place(&grid).unwrap();
        let goal = placement
            .records
            .iter()
            .find(|r| r.item == ItemKind::Goal)
            .unwrap();
        assert_eq!(goal.terrain, TerrainKind::Grass);
        assert!(goal.cell.is_at_least(placement.player, 15.0));
    }

    #[test]
    fn test_missing_goal_is_soft_unless_configured() {
        // 12x12 field: nothing is 40 cells away
        let grid = TerrainGrid::filled(12, 12, TerrainKind::Grass).unwrap();
        let config = PlacementConfig {
            seed: Some(6),
            min_goal_distance: 40.0,
            ..PlacementConfig::default()
        };

        let mut engine = PlacementEngine::new(config.clone()).unwrap();
        let placement = engine.try_place(&grid).unwrap();
        assert!(placement.records.iter().all(|r| r.item != ItemKind::Goal));

        let mut strict = PlacementEngine::new(PlacementConfig {
            restart_without_goal: true,
            ..config
        })
        .unwrap();
        assert_eq!(strict.try_place(&grid), Err(RestartReason::NoGoal));
    }

    #[test]
    fn test_generated_levels_respect_constraints() {
        for seed in [1, 42, 777, 123_456] {
            let config = PlacementConfig {
                seed: Some(seed),
                ..PlacementConfig::default()
            };
            let mut engine = PlacementEngine::new(config.clone()).unwrap();
            let level = engine.generate().unwrap();

            assert_unique_cells(level.player, &level.placements);
            let area = reachable(&level.grid, level.player, &[TerrainKind::Grass]);
            assert!(area.len() >= config.min_reachable);

            for record in &level.placements {
                let min = match record.item {
                    ItemKind::Goal => config.min_goal_distance,
                    _ => config.min_item_distance,
                };
                assert!(record.cell.is_at_least(level.player, min), "{record:?}");
                if record.item != ItemKind::Goal {
                    assert_ne!(record.terrain, TerrainKind::Water, "{record:?}");
                }
                assert_eq!(record.terrain, level.grid.get(record.cell));
            }
        }
    }

    #[test]
    fn test_same_seed_same_level() {
        let config = PlacementConfig {
            seed: Some(2024),
            ..PlacementConfig::default()
        };
        let a = PlacementEngine::new(config.clone()).unwrap().generate().unwrap();
        let b = PlacementEngine::new(config).unwrap().generate().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_summary_lists_every_item() {
        let grid = TerrainGrid::filled(12, 12, TerrainKind::Grass).unwrap();
        let level = Level {
            grid,
            seed: 0,
            player: Cell::new(1, 1),
            placements: vec![PlacementRecord {
                item: ItemKind::Boat,
                cell: Cell::new(8, 8),
                terrain: TerrainKind::Grass,
            }],
            scenario: Scenario::BoatFirst,
            restarts: 0,
        };
        let summary = level.summary();
        assert_eq!(summary.len(), 4);
        assert!(summary.iter().any(|l| l.starts_with("BOAT (Sail) on Grass")));
        assert!(summary.iter().any(|l| l == "GOAL (finish) NOT PLACED"));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PlacementConfig {
            min_reachable: MAX_REACHABLE_VISITS + 1,
            ..PlacementConfig::default()
        };
        assert!(PlacementEngine::new(config).is_err());

        let config = PlacementConfig {
            min_item_distance: f32::NAN,
            ..PlacementConfig::default()
        };
        assert!(PlacementEngine::new(config).is_err());
    }
}
