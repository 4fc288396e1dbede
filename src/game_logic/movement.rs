use bevy::math::Vec2;

/// Pure movement calculation logic that can be tested without Bevy runtime
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementStep {
    pub position: Vec2,
    pub distance_remaining: f32,
    pub reached: bool,
}

/// Move `current` toward `target` by at most `max_step`, never overshooting.
///
/// `reached` is set once the remaining distance drops below `arrive_epsilon`.
pub fn step_towards(current: Vec2, target: Vec2, max_step: f32, arrive_epsilon: f32) -> MovementStep {
    let offset = target - current;
    let distance = offset.length();

    let position = if distance <= max_step.max(0.0) || distance <= f32::EPSILON {
        target
    } else {
        current + offset / distance * max_step.max(0.0)
    };

    let distance_remaining = position.distance(target);
    MovementStep {
        position,
        distance_remaining,
        reached: distance_remaining < arrive_epsilon,
    }
}

/// Validate a click target before planning toward it
pub fn validate_target(target: Vec2) -> bool {
    target.x.is_finite() && target.y.is_finite()
}
