use crate::game_logic::errors::{TileQuestError, TileQuestResult};
use crate::map::{Cell, TerrainGrid, TerrainKind};
use crate::terrain::constants::NOISE_FUNCTION_SEED;
use bevy::log::debug;
use noise::{NoiseFn, Perlin};

/// Parameters for noise-driven terrain synthesis
#[derive(Debug, Clone, PartialEq)]
pub struct TerrainParams {
    pub width: i32,
    pub height: i32,
    pub noise_scale: f64,
    /// Samples below this become Water
    pub water_threshold: f64,
    /// Samples above this become Mountain
    pub mountain_threshold: f64,
    /// Force the outer ring of cells to Mountain
    pub border_mountains: bool,
}

impl Default for TerrainParams {
    fn default() -> Self {
        Self {
            width: 60,
            height: 40,
            noise_scale: 0.12,
            water_threshold: 0.35,
            mountain_threshold: 0.62,
            border_mountains: true,
        }
    }
}

impl TerrainParams {
    pub fn validate(&self) -> TileQuestResult<()> {
        if self.width < 1 || self.height < 1 {
            return Err(TileQuestError::InvalidGenerationParams {
                reason: format!("grid size {}x{} must be positive", self.width, self.height),
            });
        }
        if !self.noise_scale.is_finite() || self.noise_scale <= 0.0 {
            return Err(TileQuestError::InvalidGenerationParams {
                reason: format!("noise scale {} must be finite and positive", self.noise_scale),
            });
        }
        if !(self.water_threshold < self.mountain_threshold) {
            return Err(TileQuestError::InvalidGenerationParams {
                reason: format!(
                    "water threshold {} must be below mountain threshold {}",
                    self.water_threshold, self.mountain_threshold
                ),
            });
        }
        Ok(())
    }
}

/// Fills a terrain grid from a coherent noise field
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    pub params: TerrainParams,
    perlin: Perlin,
}

impl TerrainGenerator {
    pub fn new(params: TerrainParams) -> TileQuestResult<Self> {
        params.validate()?;
        Ok(Self {
            params,
            perlin: Perlin::new(NOISE_FUNCTION_SEED),
        })
    }

    /// Noise value in `[0, 1)` for a cell; the seed shifts the sample point
    pub fn sample(&self, cell: Cell, seed: u32) -> f64 {
        let nx = (cell.x as f64 + seed as f64) * self.params.noise_scale;
        let ny = (cell.y as f64 + seed as f64) * self.params.noise_scale;
        let raw = self.perlin.get([nx, ny]);
        ((raw + 1.0) * 0.5).clamp(0.0, 1.0 - f64::EPSILON)
    }

    fn classify(&self, n: f64) -> TerrainKind {
        if n < self.params.water_threshold {
            TerrainKind::Water
        } else if n > self.params.mountain_threshold {
            TerrainKind::Mountain
        } else {
            TerrainKind::Grass
        }
    }

    /// Generate a fully populated grid; the same seed always yields the same grid
    pub fn generate(&self, seed: u32) -> TileQuestResult<TerrainGrid> {
        let mut grid = TerrainGrid::new(self.params.width, self.params.height)?;

        for y in 0..self.params.height {
            for x in 0..self.params.width {
                let cell = Cell::new(x, y);
                let kind = if self.params.border_mountains && grid.is_outer_ring(cell) {
                    TerrainKind::Mountain
                } else {
                    self.classify(self.sample(cell, seed))
                };
                grid.set(cell, kind);
            }
        }

        debug!(
            "Generated {}x{} terrain for seed {seed}: grass={} water={} mountain={}",
            grid.width,
            grid.height,
            grid.count(TerrainKind::Grass),
            grid.count(TerrainKind::Water),
            grid.count(TerrainKind::Mountain)
        );

        Ok(grid)
    }
}
