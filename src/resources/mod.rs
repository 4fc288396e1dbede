use crate::config::range_types::*;
use crate::game_logic::errors::{TileQuestError, TileQuestResult};
use crate::game_logic::mining::MiningRules;
use crate::map::TerrainKind;
use crate::placement::{PlacementConfig, Scenario};
use crate::terrain::constants::DEFAULT_MAX_REGENERATIONS;
use crate::terrain_generation::TerrainParams;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

#[derive(Resource, Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct GameConfig {
    pub settings: GameSettings,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
// NOTE: Plain values stay above the nested tables so the TOML output keeps them in [settings]
pub struct GameSettings {
    // Player settings
    pub player_movement_speed: MovementSpeed,

    // UI settings
    pub window_width: f32,
    pub window_height: f32,
    pub hud_font_size: f32,
    pub show_instructions: bool,

    pub generation: GenerationSettings,
    pub tiles: TileCatalog,
    pub mining: MiningRules,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            player_movement_speed: MovementSpeed::new(6.0),

            window_width: 1280.0,
            window_height: 860.0,
            hud_font_size: 16.0,
            show_instructions: true,

            generation: GenerationSettings::default(),
            tiles: TileCatalog::default(),
            mining: MiningRules::default(),
        }
    }
}

fn validate_thresholds(settings: &GenerationSettings) -> Result<(), ValidationError> {
    if settings.water_threshold < settings.mountain_threshold {
        Ok(())
    } else {
        Err(ValidationError::new("water_threshold_not_below_mountain"))
    }
}

/// Level generation knobs as they appear in config.toml
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_thresholds"))]
pub struct GenerationSettings {
    #[validate(range(min = 3, max = 512))]
    pub width: i32,
    #[validate(range(min = 3, max = 512))]
    pub height: i32,
    pub noise_scale: NoiseScale,
    #[validate(range(min = 0.0, max = 1.5))]
    pub water_threshold: f64,
    #[validate(range(min = 0.0, max = 1.5))]
    pub mountain_threshold: f64,
    pub border_mountains: bool,

    #[validate(range(min = 1, max = 10000))]
    pub min_reachable: usize,
    #[validate(range(min = 1, max = 100000))]
    pub max_tries: u32,
    pub min_item_distance: SpacingDistance,
    pub min_goal_distance: SpacingDistance,

    /// Fixed seed; a fresh one is drawn per run when unset
    pub seed: Option<u32>,
    #[validate(range(max = 1000000))]
    pub max_regenerations: u32,
    pub scenario: Option<Scenario>,
    pub restart_without_goal: bool,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        let terrain = TerrainParams::default();
        let placement = PlacementConfig::default();
        Self {
            width: terrain.width,
            height: terrain.height,
            noise_scale: NoiseScale::new(terrain.noise_scale),
            water_threshold: terrain.water_threshold,
            mountain_threshold: terrain.mountain_threshold,
            border_mountains: terrain.border_mountains,

            min_reachable: placement.min_reachable,
            max_tries: placement.max_tries,
            min_item_distance: SpacingDistance::new(placement.min_item_distance),
            min_goal_distance: SpacingDistance::new(placement.min_goal_distance),

            seed: None,
            max_regenerations: DEFAULT_MAX_REGENERATIONS,
            scenario: None,
            restart_without_goal: false,
        }
    }
}

impl GenerationSettings {
    /// Run validator rules and turn failures into a single readable error
    pub fn check(&self) -> TileQuestResult<()> {
        self.validate().map_err(|validation_errors| {
            let mut details: Vec<String> = validation_errors
                .field_errors()
                .iter()
                .map(|(field, errors)| {
                    let msgs: Vec<String> = errors.iter().map(|e| e.code.to_string()).collect();
                    format!("{field}: {}", msgs.join(", "))
                })
                .collect();
            details.sort();

            TileQuestError::ConfigValidationFailed {
                reason: details.join("; "),
            }
        })
    }

    pub fn to_params(&self) -> TileQuestResult<PlacementConfig> {
        self.check()?;

        Ok(PlacementConfig {
            terrain: TerrainParams {
                width: self.width,
                height: self.height,
                noise_scale: self.noise_scale.get(),
                water_threshold: self.water_threshold,
                mountain_threshold: self.mountain_threshold,
                border_mountains: self.border_mountains,
            },
            min_reachable: self.min_reachable,
            max_tries: self.max_tries,
            min_item_distance: self.min_item_distance.get(),
            min_goal_distance: self.min_goal_distance.get(),
            seed: self.seed,
            max_regenerations: self.max_regenerations,
            scenario: self.scenario,
            restart_without_goal: self.restart_without_goal,
        })
    }
}

/// Flat colour per terrain kind; a missing entry is a setup error
#[derive(Resource, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TileCatalog {
    pub grass: Option<[f32; 3]>,
    pub water: Option<[f32; 3]>,
    pub mountain: Option<[f32; 3]>,
}

impl Default for TileCatalog {
    fn default() -> Self {
        Self {
            grass: Some([0.35, 0.62, 0.28]),
            water: Some([0.18, 0.38, 0.72]),
            mountain: Some([0.48, 0.44, 0.40]),
        }
    }
}

impl TileCatalog {
    pub fn rgb(&self, kind: TerrainKind) -> TileQuestResult<[f32; 3]> {
        let style = match kind {
            TerrainKind::Grass => self.grass,
            TerrainKind::Water => self.water,
            TerrainKind::Mountain => self.mountain,
            TerrainKind::Empty => Some([0.0, 0.0, 0.0]),
        };
        style.ok_or(TileQuestError::MissingTile { kind })
    }

    pub fn color(&self, kind: TerrainKind) -> TileQuestResult<Color> {
        let [r, g, b] = self.rgb(kind)?;
        Ok(Color::srgb(r, g, b))
    }

    /// Every placeable kind must have a style before a level is built
    pub fn check(&self) -> TileQuestResult<()> {
        for kind in TerrainKind::PLACEABLE {
            self.rgb(kind)?;
        }
        Ok(())
    }
}

#[derive(States, Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameState {
    #[default]
    Generating,
    Playing,
    Won,
    /// Setup or generation failed; nothing to play
    Failed,
}
