use cgmath::{InnerSpace, Vector3, VectorSpace};
use serde::{Deserialize, Serialize};

use super::{ArcInput, CollisionResult, SpatialTracer, TeleportArc};
use crate::teleport_log;

/// Which controller a pointer belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

/// Per-frame pointer kinematics from the input layer. `None` means the hand
/// is not currently aiming.
pub trait PointerSource {
    fn arc_input(&self, hand: Handedness) -> Option<ArcInput>;
}

/// Configuration for executing a teleport once a target is chosen
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeleportConfig {
    /// Travel speed of the smooth teleport, in world units per second
    pub speed: f32,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        TeleportConfig { speed: 0.5 }
    }
}

/// Push this frame's pointer input into `arc` and update it, or hide the arc
/// when the hand is not aiming.
pub fn drive_arc<T: SpatialTracer, P: PointerSource + ?Sized>(
    arc: &mut TeleportArc<T>,
    source: &P,
    hand: Handedness,
    now: f32,
) -> Option<CollisionResult> {
    match source.arc_input(hand) {
        Some(input) => {
            arc.set_input(input);
            arc.show();
            Some(arc.update(now))
        }
        None => {
            arc.hide();
            None
        }
    }
}

/// Landing point of the first arc offering a valid target, left hand first
pub fn choose_teleport_target<L: SpatialTracer, R: SpatialTracer>(
    left: &TeleportArc<L>,
    right: &TeleportArc<R>,
) -> Option<Vector3<f32>> {
    let valid_candidate = |valid: bool, candidate: Option<Vector3<f32>>| candidate.filter(|_| valid);

    valid_candidate(left.is_valid(), left.teleport_position_candidate())
        .or_else(|| valid_candidate(right.is_valid(), right.teleport_position_candidate()))
}

/// Moves the player toward a target at constant speed
#[derive(Clone, Debug, PartialEq)]
pub struct TeleportMover {
    start: Vector3<f32>,
    target: Vector3<f32>,
    duration: f32,
    elapsed: f32,
    position: Vector3<f32>,
}

impl TeleportMover {
    pub fn start(from: Vector3<f32>, to: Vector3<f32>, speed: f32) -> Self {
        let distance = (to - from).magnitude();
        let duration = if speed > 0.0 { distance / speed } else { 0.0 };

        teleport_log!(DEBUG, distance, duration, "Starting smooth teleport");

        let mut mover = TeleportMover {
            start: from,
            target: to,
            duration,
            elapsed: 0.0,
            position: from,
        };

        if !(duration > 0.0) {
            mover.position = to;
        }

        mover
    }

    /// Start moving `player` toward the first valid arc target, if any
    pub fn from_arcs<L: SpatialTracer, R: SpatialTracer>(
        player: Vector3<f32>,
        left: &TeleportArc<L>,
        right: &TeleportArc<R>,
        config: &TeleportConfig,
    ) -> Option<Self> {
        choose_teleport_target(left, right).map(|target| Self::start(player, target, config.speed))
    }

    /// Advance by `delta` seconds and return the new player position
    pub fn advance(&mut self, delta: f32) -> Vector3<f32> {
        if self.is_finished() {
            return self.position;
        }

        self.elapsed += delta.max(0.0);

        self.position = if self.elapsed >= self.duration {
            self.target
        } else {
            self.start.lerp(self.target, self.elapsed / self.duration)
        };

        self.position
    }

    pub fn is_finished(&self) -> bool {
        self.position == self.target
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn target(&self) -> Vector3<f32> {
        self.target
    }

    pub fn duration(&self) -> f32 {
        self.duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::teleport::{ArcConfig, SurfaceTag, TraceHit, TraceLayers};
    use cgmath::vec3;

    struct FloorAt(f32, SurfaceTag);

    impl SpatialTracer for FloorAt {
        fn trace(
            &self,
            from: Vector3<f32>,
            to: Vector3<f32>,
            _layers: TraceLayers,
            hits: &mut Vec<TraceHit>,
        ) {
            if from.y >= self.0 && to.y < self.0 {
                let s = (from.y - self.0) / (from.y - to.y);
                let point = from + (to - from) * s;
                hits.push(TraceHit {
                    point,
                    normal: vec3(0.0, 1.0, 0.0),
                    distance: (point - from).magnitude(),
                    surface: self.1,
                });
            }
        }
    }

    struct OneHanded(Handedness);

    impl PointerSource for OneHanded {
        fn arc_input(&self, hand: Handedness) -> Option<ArcInput> {
            (hand == self.0).then(|| ArcInput::new(vec3(0.0, 1.5, 0.0), vec3(0.0, 2.0, -4.0)))
        }
    }

    fn arc(surface: SurfaceTag) -> TeleportArc<FloorAt> {
        TeleportArc::new(FloorAt(0.0, surface), ArcConfig::default(), 0.0).unwrap()
    }

    #[test]
    fn test_mover_interpolates_and_snaps() {
        let mut mover = TeleportMover::start(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, -2.0), 0.5);
        assert!((mover.duration() - 4.0).abs() < 1e-6);

        let halfway = mover.advance(2.0);
        assert!((halfway - vec3(0.0, 0.0, -1.0)).magnitude() < 1e-5);
        assert!(!mover.is_finished());

        assert_eq!(mover.advance(2.5), vec3(0.0, 0.0, -2.0));
        assert!(mover.is_finished());
        assert_eq!(mover.advance(1.0), vec3(0.0, 0.0, -2.0));
    }

    #[test]
    fn test_degenerate_moves_finish_immediately() {
        let here = vec3(1.0, 0.0, 1.0);
        assert!(TeleportMover::start(here, here, 0.5).is_finished());

        let stuck = TeleportMover::start(here, vec3(5.0, 0.0, 1.0), 0.0);
        assert!(stuck.is_finished());
        assert_eq!(stuck.position(), vec3(5.0, 0.0, 1.0));
    }

    #[test]
    fn test_drive_arc_updates_aiming_hand_only() {
        let source = OneHanded(Handedness::Right);
        let mut left = arc(SurfaceTag::TeleportArea);
        let mut right = arc(SurfaceTag::TeleportArea);

        assert!(drive_arc(&mut left, &source, Handedness::Left, 0.0).is_none());
        assert!(!left.is_visible());

        let result = drive_arc(&mut right, &source, Handedness::Right, 0.0).unwrap();
        assert!(result.is_hit());
        assert!(right.is_visible());
    }

    #[test]
    fn test_target_prefers_left_then_right() {
        let source = OneHanded(Handedness::Left);
        let mut left = arc(SurfaceTag::TeleportArea);
        let right = arc(SurfaceTag::TeleportArea);
        drive_arc(&mut left, &source, Handedness::Left, 0.0);

        let target = choose_teleport_target(&left, &right).unwrap();
        assert_eq!(Some(target), left.teleport_position_candidate());

        let mut blocked = arc(SurfaceTag::Blocking);
        drive_arc(&mut blocked, &source, Handedness::Left, 0.0);
        let mut fallback = arc(SurfaceTag::TeleportArea);
        drive_arc(&mut fallback, &OneHanded(Handedness::Right), Handedness::Right, 0.0);

        assert_eq!(
            choose_teleport_target(&blocked, &fallback),
            fallback.teleport_position_candidate()
        );

        let mover = TeleportMover::from_arcs(
            vec3(0.0, 0.0, 0.0),
            &blocked,
            &right,
            &TeleportConfig::default(),
        );
        assert!(mover.is_none());
    }
}
