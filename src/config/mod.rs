use crate::game_logic::errors::{TileQuestError, TileQuestResult};
use crate::resources::GameConfig;
use bevy::log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

pub mod range_types;

pub fn get_config_path() -> TileQuestResult<PathBuf> {
    let mut path = dirs::config_dir().ok_or(TileQuestError::ConfigDirNotFound)?;
    path.push("tilequest");
    fs::create_dir_all(&path)?;
    path.push("config.toml");
    Ok(path)
}

/// Parse and validate a config file
pub fn load_config_from(path: &Path) -> TileQuestResult<GameConfig> {
    let contents = fs::read_to_string(path)?;
    let config: GameConfig = toml::from_str(&contents)?;
    config.settings.generation.check()?;
    config.settings.tiles.check()?;
    Ok(config)
}

/// Missing config files are written out with defaults; invalid ones are reported and ignored
pub fn load_config_or_default() -> GameConfig {
    match get_config_path() {
        Ok(path) if path.exists() => match load_config_from(&path) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config at {}: {e}", path.display());
                GameConfig::default()
            }
        },
        Ok(path) => {
            let config = GameConfig::default();
            match save_config_to(&config, &path) {
                Ok(()) => info!("Wrote default config to {}", path.display()),
                Err(e) => warn!("Could not write default config: {e}"),
            }
            config
        }
        Err(e) => {
            warn!("No config directory available: {e}");
            GameConfig::default()
        }
    }
}

pub fn save_config_to(config: &GameConfig, path: &Path) -> TileQuestResult<()> {
    let contents = toml::to_string_pretty(config)?;
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tilequest-{}-{name}.toml", std::process::id()))
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("roundtrip");
        let mut config = GameConfig::default();
        config.settings.generation.seed = Some(31_337);
        config.settings.generation.width = 48;

        save_config_to(&config, &path).unwrap();
        let loaded = load_config_from(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded.settings.generation.seed, Some(31_337));
        assert_eq!(loaded.settings.generation.width, 48);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let path = temp_path("invalid");
        let mut config = GameConfig::default();
        config.settings.generation.water_threshold = 0.9;
        config.settings.generation.mountain_threshold = 0.2;
        save_config_to(&config, &path).unwrap();

        let result = load_config_from(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(
            result,
            Err(TileQuestError::ConfigValidationFailed { .. })
        ));
    }

    #[test]
    fn test_malformed_toml() {
        let path = temp_path("malformed");
        fs::write(&path, "settings = [not toml").unwrap();
        let result = load_config_from(&path);
        let _ = fs::remove_file(&path);
        assert!(matches!(result, Err(TileQuestError::DeserializationFailed(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_config_from(&temp_path("does-not-exist"));
        assert!(matches!(result, Err(TileQuestError::ConfigIo(_))));
    }
}
