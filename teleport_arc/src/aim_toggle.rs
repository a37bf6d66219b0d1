use cgmath::{InnerSpace, Vector3};
use serde::{Deserialize, Serialize};

use crate::teleport_log;

/// Identifier of a scene object a pointer ray can hit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// What a single pointer ray saw this frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerHit {
    pub pointer_origin: Vector3<f32>,
    pub target: Option<ObjectId>,
}

/// Hides an object once a pointer aims at it from close enough
#[derive(Clone, Debug)]
pub struct AimToggle {
    pub id: ObjectId,
    pub position: Vector3<f32>,
    pub activation_distance: f32,
    active: bool,
}

impl AimToggle {
    pub const DEFAULT_ACTIVATION_DISTANCE: f32 = 5.0;

    pub fn new(id: ObjectId, position: Vector3<f32>) -> Self {
        AimToggle {
            id,
            position,
            activation_distance: Self::DEFAULT_ACTIVATION_DISTANCE,
            active: true,
        }
    }

    pub fn with_activation_distance(mut self, distance: f32) -> Self {
        self.activation_distance = distance;
        self
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Check both hands; returns true on the frame the object was deactivated
    pub fn update(&mut self, left: Option<&PointerHit>, right: Option<&PointerHit>) -> bool {
        let was_active = self.active;

        for hit in [left, right].into_iter().flatten() {
            self.check(hit);
        }

        was_active && !self.active
    }

    fn check(&mut self, hit: &PointerHit) {
        if !self.active || hit.target != Some(self.id) {
            return;
        }

        let distance = (hit.pointer_origin - self.position).magnitude();
        if distance <= self.activation_distance {
            teleport_log!(DEBUG, id = self.id.0, distance, "Aimed object deactivated");
            self.active = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::vec3;

    fn toggle() -> AimToggle {
        AimToggle::new(ObjectId(7), vec3(0.0, 1.0, -3.0))
    }

    #[test]
    fn test_close_aim_deactivates_once() {
        let mut toggle = toggle();
        let hit = PointerHit {
            pointer_origin: vec3(0.0, 1.0, 0.0),
            target: Some(ObjectId(7)),
        };

        assert!(toggle.update(None, Some(&hit)));
        assert!(!toggle.is_active());
        assert!(!toggle.update(Some(&hit), None));
    }

    #[test]
    fn test_far_or_other_targets_are_ignored() {
        let mut toggle = toggle().with_activation_distance(2.0);
        let far = PointerHit {
            pointer_origin: vec3(0.0, 1.0, 0.0),
            target: Some(ObjectId(7)),
        };
        let other = PointerHit {
            pointer_origin: vec3(0.0, 1.0, -2.5),
            target: Some(ObjectId(8)),
        };
        let miss = PointerHit {
            pointer_origin: vec3(0.0, 1.0, -2.5),
            target: None,
        };

        assert!(!toggle.update(Some(&far), Some(&other)));
        assert!(!toggle.update(Some(&miss), None));
        assert!(toggle.is_active());
    }

    #[test]
    fn test_boundary_distance_counts() {
        let mut toggle = toggle();
        let hit = PointerHit {
            pointer_origin: vec3(0.0, 1.0, 2.0),
            target: Some(ObjectId(7)),
        };

        assert!(toggle.update(Some(&hit), None));
    }
}
