//! Constants for terrain generation and level placement

/// Reachability search stops after visiting this many cells
pub const MAX_REACHABLE_VISITS: usize = 10_000;

/// Random draws per item before giving up on a candidate pool
pub const PICK_ATTEMPTS: usize = 80;

/// Pick-and-verify rounds for the pickaxe
pub const PICKAXE_ATTEMPTS: usize = 100;

/// Fresh seeds are drawn from `0..SEED_RANGE`
pub const SEED_RANGE: u32 = 1_000_000;

/// Seed of the Perlin function itself; map seeds only offset the sample point
pub const NOISE_FUNCTION_SEED: u32 = 0;

/// Default safety ceiling on full map regenerations
pub const DEFAULT_MAX_REGENERATIONS: u32 = 1000;

/// A waypoint counts as reached within this world distance
pub const ARRIVE_EPSILON: f32 = 0.01;

/// World units per tile
pub const DEFAULT_CELL_SIZE: f32 = 1.0;
