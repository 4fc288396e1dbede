use tilequest::Scenario;
use tilequest::game_logic::errors::{TileQuestError, TileQuestResult};

/// Generic parser for delimited strings that return tuples
pub fn parse_delimited<T, const N: usize>(
    input: &str,
    delimiter: char,
    type_name: &str,
    parser: impl Fn(&str) -> Result<T, std::num::ParseIntError>,
) -> TileQuestResult<[T; N]>
where
    T: Copy + Default,
{
    let parts: Vec<&str> = input.split(delimiter).collect();
    if parts.len() != N {
        return Err(TileQuestError::InvalidArgument {
            reason: format!(
                "Invalid {type_name} format '{input}'. Expected {N} {delimiter}-separated values"
            ),
        });
    }

    let mut result = [T::default(); N];
    for (i, part) in parts.iter().enumerate() {
        result[i] = parser(part.trim()).map_err(|_| TileQuestError::InvalidArgument {
            reason: format!("Invalid {type_name} value: '{part}'"),
        })?;
    }

    Ok(result)
}

/// Parse size string "WIDTHxHEIGHT" with validation
pub fn parse_size(size_str: &str) -> TileQuestResult<(i32, i32)> {
    let [width, height] = parse_delimited::<i32, 2>(size_str, 'x', "size", |s| s.parse())?;

    if width < 3 || height < 3 {
        return Err(TileQuestError::InvalidArgument {
            reason: "Width and height must be at least 3".to_string(),
        });
    }

    if width > 2048 || height > 2048 {
        return Err(TileQuestError::InvalidArgument {
            reason: "Width and height must not exceed 2048".to_string(),
        });
    }

    Ok((width, height))
}

/// Parse a scenario name, "random" leaves the choice to the engine
pub fn parse_scenario(name: &str) -> TileQuestResult<Option<Scenario>> {
    match name.trim().to_ascii_lowercase().as_str() {
        "random" => Ok(None),
        "goat" | "goat-first" => Ok(Some(Scenario::GoatFirst)),
        "boat" | "boat-first" => Ok(Some(Scenario::BoatFirst)),
        other => Err(TileQuestError::InvalidArgument {
            reason: format!("Unknown scenario '{other}', expected random, goat-first or boat-first"),
        }),
    }
}

/// Validate a noise threshold and clamp to the sampled range
pub fn validate_threshold(name: &str, value: f64) -> f64 {
    if !(0.0..=1.0).contains(&value) {
        println!("Warning: {name} threshold {value} is out of range [0.0, 1.0], clamping to valid range");
        value.clamp(0.0, 1.0)
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("60x40").unwrap(), (60, 40));
        assert_eq!(parse_size("128x256").unwrap(), (128, 256));
        assert_eq!(parse_size("3x3").unwrap(), (3, 3));

        assert!(parse_size("64").is_err());
        assert!(parse_size("2x64").is_err());
        assert!(parse_size("3000x64").is_err());
        assert!(parse_size("ax4").is_err());
    }

    #[test]
    fn test_parse_scenario() {
        assert_eq!(parse_scenario("random").unwrap(), None);
        assert_eq!(parse_scenario("Goat-First").unwrap(), Some(Scenario::GoatFirst));
        assert_eq!(parse_scenario("boat").unwrap(), Some(Scenario::BoatFirst));
        assert!(parse_scenario("pickaxe").is_err());
    }

    #[test]
    fn test_validate_threshold() {
        assert_eq!(validate_threshold("water", 0.35), 0.35);
        assert_eq!(validate_threshold("water", -0.1), 0.0);
        assert_eq!(validate_threshold("mountain", 1.5), 1.0);
    }
}
