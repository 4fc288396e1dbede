use derive_more::Display;
use serde::{Deserialize, Serialize};

/// A movement speed in tiles per second constrained to [0.5, 40.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32")]
pub struct MovementSpeed(f32);

impl MovementSpeed {
    const MIN: f32 = 0.5;
    const MAX: f32 = 40.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

// Deserialized values go through the same clamp as `new`
impl From<f32> for MovementSpeed {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl Default for MovementSpeed {
    fn default() -> Self {
        Self::new(6.0)
    }
}

/// A noise frequency constrained to [0.005, 2.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f64")]
pub struct NoiseScale(f64);

impl NoiseScale {
    const MIN: f64 = 0.005;
    const MAX: f64 = 2.0;

    pub fn new(value: f64) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl From<f64> for NoiseScale {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl Default for NoiseScale {
    fn default() -> Self {
        Self::new(0.12)
    }
}

/// A spacing distance in cells constrained to [0.0, 256.0]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Display, Serialize, Deserialize)]
#[serde(from = "f32")]
pub struct SpacingDistance(f32);

impl SpacingDistance {
    const MIN: f32 = 0.0;
    const MAX: f32 = 256.0;

    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn get(self) -> f32 {
        self.0
    }
}

impl From<f32> for SpacingDistance {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl Default for SpacingDistance {
    fn default() -> Self {
        Self::new(5.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movement_speed_clamping() {
        assert_eq!(MovementSpeed::new(-1.0).get(), 0.5);
        assert_eq!(MovementSpeed::new(6.0).get(), 6.0);
        assert_eq!(MovementSpeed::new(100.0).get(), 40.0);
    }

    #[test]
    fn test_spacing_clamping() {
        assert_eq!(SpacingDistance::new(-3.0).get(), 0.0);
        assert_eq!(SpacingDistance::new(15.0).get(), 15.0);
        assert_eq!(NoiseScale::new(0.0).get(), 0.005);
    }

    #[test]
    fn test_display() {
        let speed = MovementSpeed::new(5.5);
        assert_eq!(format!("{speed}"), "5.5");
    }

    #[test]
    fn test_deserialize_clamps() {
        #[derive(Deserialize)]
        struct Values {
            speed: MovementSpeed,
            scale: NoiseScale,
            spacing: SpacingDistance,
        }

        let values: Values = toml::from_str("speed = 500.0\nscale = 0.0\nspacing = -3.0").unwrap();
        assert_eq!(values.speed.get(), 40.0);
        assert_eq!(values.scale.get(), 0.005);
        assert_eq!(values.spacing.get(), 0.0);
        assert_eq!(NoiseScale::from(9.0).get(), 2.0);
    }

    #[test]
    fn test_defaults() {
        assert_eq!(MovementSpeed::default().get(), 6.0);
        assert_eq!(NoiseScale::default().get(), 0.12);
    }
}
