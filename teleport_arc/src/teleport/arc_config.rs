use std::fmt;

use cgmath::Vector3;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ArcStyle;

bitflags::bitflags! {
    /// Collision layers a surface can live on; the arc only traces against
    /// layers present in its filter
    pub struct TraceLayers: u32 {
        const WORLD = 0x01;
        const PROPS = 0x02;
        const TELEPORT_SURFACES = 0x04;
        const DYNAMIC = 0x08;
    }
}

impl Default for TraceLayers {
    fn default() -> Self {
        TraceLayers::all()
    }
}

impl Serialize for TraceLayers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.bits())
    }
}

impl<'de> Deserialize<'de> for TraceLayers {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bits = u32::deserialize(deserializer)?;
        Ok(TraceLayers::from_bits_truncate(bits))
    }
}

/// Standard earth gravity, pointing down the y axis
pub const DEFAULT_GRAVITY: Vector3<f32> = Vector3 {
    x: 0.0,
    y: -9.81,
    z: 0.0,
};

/// Immutable description of how the arc is simulated and drawn.
///
/// A new value is handed to [`super::TeleportArc::configure`] whenever any of
/// it changes; the controller diffs it against the previous one to decide
/// whether the segment pool must be rebuilt.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcConfig {
    pub segment_count: usize,
    pub thickness: f32,
    /// Seconds of projectile motion to predict
    pub duration: f32,
    /// Seconds of trajectory left undrawn between two visible segments
    pub segment_gap: f32,
    /// Animation speed multiplier applied to wall-clock time
    pub speed: f32,
    pub scale: f32,
    pub gravity: Vector3<f32>,
    pub trace_layers: TraceLayers,
    pub style: ArcStyle,
}

impl Default for ArcConfig {
    fn default() -> Self {
        ArcConfig {
            segment_count: 60,
            thickness: 0.01,
            duration: 3.0,
            segment_gap: 0.025,
            speed: 0.2,
            scale: 1.5,
            gravity: DEFAULT_GRAVITY,
            trace_layers: TraceLayers::default(),
            style: ArcStyle::default(),
        }
    }
}

impl ArcConfig {
    /// Duration of a single segment
    pub fn time_step(&self) -> f32 {
        self.duration / self.segment_count as f32
    }

    /// World-space width of every segment line
    pub fn segment_width(&self) -> f32 {
        self.thickness * self.scale
    }

    /// Whether switching from `self` to `other` invalidates the segment pool
    pub fn needs_rebuild(&self, other: &ArcConfig) -> bool {
        self.segment_width() != other.segment_width() || self.segment_count != other.segment_count
    }

    pub fn validate(&self) -> Result<(), ArcConfigError> {
        if self.segment_count == 0 {
            return Err(ArcConfigError::NoSegments);
        }

        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(ArcConfigError::InvalidDuration(self.duration));
        }

        let non_negative = [
            ("thickness", self.thickness),
            ("segment_gap", self.segment_gap),
            ("speed", self.speed),
            ("scale", self.scale),
        ];

        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ArcConfigError::Negative { field, value });
            }
        }

        let g = self.gravity;
        if !(g.x.is_finite() && g.y.is_finite() && g.z.is_finite()) {
            return Err(ArcConfigError::NonFiniteGravity);
        }

        Ok(())
    }
}

/// Reasons a configuration is refused by the controller
#[derive(Debug, Clone, PartialEq)]
pub enum ArcConfigError {
    NoSegments,
    InvalidDuration(f32),
    Negative { field: &'static str, value: f32 },
    NonFiniteGravity,
}

impl fmt::Display for ArcConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArcConfigError::NoSegments => write!(f, "arc needs at least one segment"),
            ArcConfigError::InvalidDuration(duration) => {
                write!(f, "arc duration must be positive and finite, got {}", duration)
            }
            ArcConfigError::Negative { field, value } => {
                write!(f, "{} must be a finite non-negative number, got {}", field, value)
            }
            ArcConfigError::NonFiniteGravity => write!(f, "gravity vector must be finite"),
        }
    }
}

impl std::error::Error for ArcConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    #[test]
    fn test_default_config_is_valid() {
        let config = ArcConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.time_step() - 0.05).abs() < 1e-6);
        assert!((config.segment_width() - 0.015).abs() < 1e-6);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = ArcConfig {
            segment_count: 0,
            ..ArcConfig::default()
        };
        assert_eq!(config.validate(), Err(ArcConfigError::NoSegments));

        let config = ArcConfig {
            duration: 0.0,
            ..ArcConfig::default()
        };
        assert_eq!(config.validate(), Err(ArcConfigError::InvalidDuration(0.0)));

        let config = ArcConfig {
            segment_gap: -0.1,
            ..ArcConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ArcConfigError::Negative {
                field: "segment_gap",
                ..
            })
        ));

        let config = ArcConfig {
            gravity: vec3(0.0, f32::NAN, 0.0),
            ..ArcConfig::default()
        };
        assert_eq!(config.validate(), Err(ArcConfigError::NonFiniteGravity));
    }

    #[test]
    fn test_needs_rebuild_only_for_pool_shape() {
        let base = ArcConfig::default();

        let faster = ArcConfig {
            speed: 2.0,
            duration: 5.0,
            ..base.clone()
        };
        assert!(!base.needs_rebuild(&faster));

        let thicker = ArcConfig {
            thickness: 0.02,
            ..base.clone()
        };
        assert!(base.needs_rebuild(&thicker));

        let wider = ArcConfig {
            scale: 3.0,
            ..base.clone()
        };
        assert!(base.needs_rebuild(&wider));

        let barely_thicker = ArcConfig {
            thickness: base.thickness + 1e-8,
            ..base.clone()
        };
        assert!(base.needs_rebuild(&barely_thicker));

        let more = ArcConfig {
            segment_count: 61,
            ..base.clone()
        };
        assert!(base.needs_rebuild(&more));
    }

    #[test]
    fn test_config_from_json_fills_defaults() {
        let config: ArcConfig =
            serde_json::from_str(r#"{ "segment_count": 10, "trace_layers": 5 }"#).unwrap();

        assert_eq!(config.segment_count, 10);
        assert_eq!(
            config.trace_layers,
            TraceLayers::WORLD | TraceLayers::TELEPORT_SURFACES
        );
        assert_eq!(config.duration, 3.0);
        assert_eq!(config.style, ArcStyle::default());
    }
}
