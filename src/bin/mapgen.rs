use clap::Parser;
use tilequest::game_logic::errors::TileQuestResult;
use tilequest::map::{Cell, TerrainKind};
use tilequest::placement::{Level, PlacementConfig, PlacementEngine};
use tilequest::terrain_generation::TerrainParams;

mod mapgen {
    pub mod cli_utils;
}

use mapgen::cli_utils::*;

#[derive(Parser, Clone)]
#[command(name = "mapgen")]
#[command(about = "Generate a tilequest level and print it as text")]
struct Args {
    /// Grid size in cells (format: WIDTHxHEIGHT)
    #[arg(long, default_value = "60x40")]
    size: String,

    /// Random seed for reproducible generation
    #[arg(long)]
    seed: Option<u32>,

    /// Noise frequency (terrain feature density)
    #[arg(long, default_value = "0.12")]
    noise_scale: f64,

    /// Samples below this become water
    #[arg(long, default_value = "0.35")]
    water: f64,

    /// Samples above this become mountain
    #[arg(long, default_value = "0.62")]
    mountain: f64,

    /// Leave the outer ring to the noise instead of forcing mountains
    #[arg(long)]
    no_border: bool,

    /// Minimum grass area reachable from the player spawn
    #[arg(long, default_value = "100")]
    min_reachable: usize,

    /// Minimum distance between the player and ability items
    #[arg(long, default_value = "5.0")]
    item_distance: f32,

    /// Minimum distance between the player and the goal
    #[arg(long, default_value = "15.0")]
    goal_distance: f32,

    /// Item order (random, goat-first, boat-first)
    #[arg(long, default_value = "random")]
    scenario: String,

    /// Give up after this many map regenerations
    #[arg(long, default_value = "1000")]
    max_regenerations: u32,

    /// Only print the summary, not the map
    #[arg(long)]
    quiet: bool,
}

/// Parse and validate all CLI arguments into engine parameters
fn build_config(args: &Args) -> TileQuestResult<PlacementConfig> {
    let (width, height) = parse_size(&args.size)?;
    let scenario = parse_scenario(&args.scenario)?;

    Ok(PlacementConfig {
        terrain: TerrainParams {
            width,
            height,
            noise_scale: args.noise_scale,
            water_threshold: validate_threshold("water", args.water),
            mountain_threshold: validate_threshold("mountain", args.mountain),
            border_mountains: !args.no_border,
        },
        min_reachable: args.min_reachable,
        min_item_distance: args.item_distance,
        min_goal_distance: args.goal_distance,
        seed: args.seed,
        max_regenerations: args.max_regenerations,
        scenario,
        ..PlacementConfig::default()
    })
}

fn main() -> TileQuestResult<()> {
    let args = Args::parse();
    let config = build_config(&args)?;
    let (width, height) = (config.terrain.width, config.terrain.height);

    let mut engine = PlacementEngine::new(config)?;
    println!("Generating {width}x{height} level (seed: {})", engine.initial_seed());
    let level = engine.generate()?;

    if !args.quiet {
        println!();
        print!("{}", render_level(&level));
    }
    print_level_summary(&level);
    Ok(())
}

/// Map text with the player and items drawn over the terrain
fn render_level(level: &Level) -> String {
    let mut out = String::new();
    for y in 0..level.grid.height {
        for x in 0..level.grid.width {
            let cell = Cell::new(x, y);
            let glyph = if cell == level.player {
                '@'
            } else if let Some(record) = level.placements.iter().find(|r| r.cell == cell) {
                record.item.glyph()
            } else {
                level.grid.get(cell).glyph()
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn print_level_summary(level: &Level) {
    println!("\nLevel summary:");
    println!(
        "  Seed: {} (after {} restart{})",
        level.seed,
        level.restarts,
        if level.restarts == 1 { "" } else { "s" }
    );
    println!("  Scenario: {:?}", level.scenario);
    println!("  Player: {}", level.player);
    println!(
        "  Terrain: {} grass, {} water, {} mountain",
        level.grid.count(TerrainKind::Grass),
        level.grid.count(TerrainKind::Water),
        level.grid.count(TerrainKind::Mountain)
    );
    for line in level.summary() {
        println!("  {line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        Args::parse_from(std::iter::once("mapgen").chain(extra.iter().copied()))
    }

    #[test]
    fn test_thresholds_are_clamped_alike() {
        let config = build_config(&parse(&["--water=-0.5", "--mountain=1.7"])).unwrap();
        assert_eq!(config.terrain.water_threshold, 0.0);
        assert_eq!(config.terrain.mountain_threshold, 1.0);
    }

    #[test]
    fn test_build_config_from_flags() {
        let args = parse(&["--size", "30x20", "--seed", "7", "--scenario", "boat-first", "--no-border"]);
        let config = build_config(&args).unwrap();
        assert_eq!((config.terrain.width, config.terrain.height), (30, 20));
        assert_eq!(config.seed, Some(7));
        assert!(!config.terrain.border_mountains);
        assert_eq!(config.scenario, Some(tilequest::Scenario::BoatFirst));

        assert!(build_config(&parse(&["--size", "1x1"])).is_err());
    }

    #[test]
    fn test_render_marks_player() {
        let config = build_config(&parse(&["--size", "30x30", "--seed", "3", "--min-reachable", "10"])).unwrap();
        let level = PlacementEngine::new(config).unwrap().generate().unwrap();
        let text = render_level(&level);
        assert_eq!(text.lines().count(), 30);
        assert_eq!(text.matches('@').count(), 1);
    }
}
