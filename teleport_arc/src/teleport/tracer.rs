use cgmath::Vector3;
use serde::{Deserialize, Serialize};

use super::TraceLayers;

/// Most hits a single segment trace will ever report. Anything a tracer
/// produces beyond this is dropped before sorting.
pub const MAX_TRACE_HITS: usize = 500;

/// How a scene surface is tagged for teleportation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SurfaceTag {
    /// Player may land here
    TeleportArea,
    /// Solid, but not a landing spot
    Blocking,
}

impl SurfaceTag {
    pub fn is_teleport_area(self) -> bool {
        matches!(self, SurfaceTag::TeleportArea)
    }
}

/// One intersection reported by a [`SpatialTracer`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TraceHit {
    pub point: Vector3<f32>,
    pub normal: Vector3<f32>,
    /// Distance from the start of the traced segment to `point`
    pub distance: f32,
    pub surface: SurfaceTag,
}

/// Multi-hit line query against whatever world the arc is aimed into.
///
/// Implementations append every surface crossed by the straight segment
/// `from -> to` whose layer intersects `layers`. The buffer arrives empty and
/// should not grow past [`MAX_TRACE_HITS`]; callers truncate anything beyond.
pub trait SpatialTracer {
    fn trace(
        &self,
        from: Vector3<f32>,
        to: Vector3<f32>,
        layers: TraceLayers,
        hits: &mut Vec<TraceHit>,
    );
}

impl<T: SpatialTracer + ?Sized> SpatialTracer for &T {
    fn trace(
        &self,
        from: Vector3<f32>,
        to: Vector3<f32>,
        layers: TraceLayers,
        hits: &mut Vec<TraceHit>,
    ) {
        (**self).trace(from, to, layers, hits)
    }
}

impl<T: SpatialTracer + ?Sized> SpatialTracer for Box<T> {
    fn trace(
        &self,
        from: Vector3<f32>,
        to: Vector3<f32>,
        layers: TraceLayers,
        hits: &mut Vec<TraceHit>,
    ) {
        (**self).trace(from, to, layers, hits)
    }
}
