use cgmath::{InnerSpace, Vector3, Zero};
use serde::{Deserialize, Serialize};

/// Per-frame kinematic input supplied by the pointer
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArcInput {
    /// World position the projectile is launched from
    pub origin: Vector3<f32>,
    /// Initial velocity of the projectile
    pub velocity: Vector3<f32>,
    pub use_gravity: bool,
    /// Pointer is aimed too far up or down to produce a usable arc
    pub pointer_at_bad_angle: bool,
    /// Caller already knows the current target cannot be teleported to
    pub bad_teleport: bool,
}

impl Default for ArcInput {
    fn default() -> Self {
        ArcInput {
            origin: Vector3::zero(),
            velocity: Vector3::zero(),
            use_gravity: true,
            pointer_at_bad_angle: false,
            bad_teleport: false,
        }
    }
}

impl ArcInput {
    pub fn new(origin: Vector3<f32>, velocity: Vector3<f32>) -> Self {
        ArcInput {
            origin,
            velocity,
            ..ArcInput::default()
        }
    }

    /// Whether the caller flags make every landing invalid this frame
    pub fn is_invalid(&self) -> bool {
        self.pointer_at_bad_angle || self.bad_teleport
    }
}

/// Closed-form projectile position:
/// `origin + (velocity * t + 0.5 * t² * g) * scale`, with `g` zeroed when
/// gravity is disabled.
pub fn position_at_time(
    origin: Vector3<f32>,
    velocity: Vector3<f32>,
    gravity: Option<Vector3<f32>>,
    scale: f32,
    time: f32,
) -> Vector3<f32> {
    let gravity = gravity.unwrap_or_else(Vector3::zero);
    origin + (velocity * time + gravity * (0.5 * time * time)) * scale
}

/// Samples positions along a single predicted trajectory
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrajectorySampler {
    origin: Vector3<f32>,
    velocity: Vector3<f32>,
    gravity: Option<Vector3<f32>>,
    scale: f32,
}

impl TrajectorySampler {
    pub fn new(input: &ArcInput, gravity: Vector3<f32>, scale: f32) -> Self {
        TrajectorySampler {
            origin: input.origin,
            velocity: input.velocity,
            gravity: input.use_gravity.then_some(gravity),
            scale,
        }
    }

    /// Position of the projectile `time` seconds after launch
    pub fn position_at(&self, time: f32) -> Vector3<f32> {
        position_at_time(self.origin, self.velocity, self.gravity, self.scale, time)
    }

    /// Positions at `segments + 1` evenly spaced times covering `[0, duration]`
    pub fn sample_points(&self, duration: f32, segments: usize) -> Vec<Vector3<f32>> {
        let segments = segments.max(1);
        let time_step = duration / segments as f32;

        (0..=segments)
            .map(|i| self.position_at(i as f32 * time_step))
            .collect()
    }

    /// Polyline length of the arc over `[0, duration]`, useful for visual feedback
    pub fn arc_length(&self, duration: f32, segments: usize) -> f32 {
        self.sample_points(duration, segments)
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).magnitude())
            .sum()
    }
}
