use cgmath::{Vector4, vec4};
use serde::{Deserialize, Serialize};

/// Colors the arc cycles through as its landing target changes validity
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcStyle {
    pub default_color: Vector4<f32>,
    pub valid_color: Vector4<f32>,
    pub invalid_color: Vector4<f32>,
    /// Half-extent of the debug cross drawn at a rejected hit point
    pub cross_size: f32,
}

impl Default for ArcStyle {
    fn default() -> Self {
        Self {
            default_color: vec4(0.0, 1.0, 1.0, 1.0),   // Cyan until the first scan
            valid_color: vec4(0.0, 1.0, 0.34, 0.45),   // Translucent green
            invalid_color: vec4(1.0, 0.0, 0.36, 0.45), // Translucent pink-red
            cross_size: 0.5,
        }
    }
}

impl ArcStyle {
    pub fn color_for(&self, valid: bool) -> Vector4<f32> {
        if valid {
            self.valid_color
        } else {
            self.invalid_color
        }
    }
}
