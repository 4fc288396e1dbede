pub mod config;
pub mod game_logic;
pub mod interfaces;
pub mod map;
pub mod pathfinding;
pub mod placement;
pub mod plugins;
pub mod resources;
pub mod session;
pub mod terrain;
pub mod terrain_generation;

// Selective re-exports for external consumers

// Plugins - main.rs needs all plugins
pub use plugins::*;

// Game logic - binaries need errors and the ability types
pub use game_logic::abilities::{AbilitySet, Capability, ItemKind};
pub use game_logic::errors::{TileQuestError, TileQuestResult};

// Engine entry points
pub use map::{Cell, TerrainGrid, TerrainKind};
pub use placement::{Level, PlacementConfig, PlacementEngine, Scenario};
pub use session::Session;
pub use terrain_generation::{TerrainGenerator, TerrainParams};
