use crate::map::TerrainKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TileQuestError {
    // Config-related errors
    #[error("Failed to get config directory")]
    ConfigDirNotFound,

    #[error("Failed to access config file: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("Failed to serialize config: {0}")]
    SerializationFailed(#[from] toml::ser::Error),

    #[error("Failed to deserialize config: {0}")]
    DeserializationFailed(#[from] toml::de::Error),

    #[error("Config validation failed: {reason}")]
    ConfigValidationFailed { reason: String },

    // Setup errors, detected once before generation starts
    #[error("Tile catalog has no style for {kind:?}")]
    MissingTile { kind: TerrainKind },

    #[error("Invalid generation parameters: {reason}")]
    InvalidGenerationParams { reason: String },

    // Generation errors
    #[error("Gave up after {attempts} map regenerations without a valid level")]
    RegenerationLimitExceeded { attempts: u32 },

    // CLI errors
    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },
}

/// Result type alias for all operations
pub type TileQuestResult<T> = Result<T, TileQuestError>;
