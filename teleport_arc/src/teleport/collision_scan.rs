use std::cmp::Reverse;

use cgmath::{InnerSpace, Vector3};
use ordered_float::OrderedFloat;

use super::{ArcConfig, MAX_TRACE_HITS, SpatialTracer, SurfaceTag, TraceHit, TrajectorySampler};
use crate::collision_log;

/// The earliest intersection between the arc and the world
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcHit {
    /// Seconds after launch, always within `[0, duration]`
    pub time: f32,
    pub point: Vector3<f32>,
    pub normal: Vector3<f32>,
    /// Distance along the segment chord at which the tracer reported the hit
    pub distance: f32,
    pub surface: SurfaceTag,
    /// Surface is a teleport area and the caller did not flag the arc invalid
    pub valid: bool,
}

/// Outcome of one collision scan. Produced fresh every frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CollisionResult {
    pub hit: Option<ArcHit>,
}

impl CollisionResult {
    /// Hit time reported when the arc crosses nothing over its whole duration
    pub const NO_COLLISION_TIME: f32 = f32::MAX;

    pub fn miss() -> Self {
        CollisionResult { hit: None }
    }

    pub fn is_hit(&self) -> bool {
        self.hit.is_some()
    }

    /// Hit time, or [`Self::NO_COLLISION_TIME`] for a miss
    pub fn hit_time(&self) -> f32 {
        self.hit.map_or(Self::NO_COLLISION_TIME, |hit| hit.time)
    }

    /// True for a miss or for a hit the player may not land on
    pub fn non_teleport_area_under_arc(&self) -> bool {
        self.hit.is_none_or(|hit| !hit.valid)
    }
}

/// Walks the trajectory one segment at a time looking for the first surface.
///
/// Owns its hit buffer so steady-state scans do not allocate.
pub struct CollisionScanner {
    hits: Vec<TraceHit>,
}

impl Default for CollisionScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionScanner {
    pub fn new() -> Self {
        CollisionScanner {
            hits: Vec::with_capacity(MAX_TRACE_HITS),
        }
    }

    /// Scan segments in chronological order and stop at the first one that
    /// reports any hit. Later segments are never traced, so the returned hit
    /// is the earliest along the arc.
    pub fn scan<T: SpatialTracer + ?Sized>(
        &mut self,
        sampler: &TrajectorySampler,
        config: &ArcConfig,
        arc_invalid: bool,
        tracer: &T,
    ) -> CollisionResult {
        let time_step = config.time_step();
        let mut segment_start_time = 0.0;
        let mut segment_start = sampler.position_at(segment_start_time);

        for segment in 0..config.segment_count {
            let segment_end_time = segment_start_time + time_step;
            let segment_end = sampler.position_at(segment_end_time);

            self.hits.clear();
            tracer.trace(segment_start, segment_end, config.trace_layers, &mut self.hits);

            if self.hits.len() > MAX_TRACE_HITS {
                collision_log!(
                    DEBUG,
                    segment,
                    reported = self.hits.len(),
                    "Dropping trace hits beyond capacity"
                );
                self.hits.truncate(MAX_TRACE_HITS);
            }

            // NaN heights would sort above every real hit
            self.hits.retain(|hit| hit.point.y.is_finite() && hit.distance.is_finite());

            // Highest surface wins; stable sort keeps tracer order for ties
            self.hits.sort_by_key(|hit| Reverse(OrderedFloat(hit.point.y)));

            if let Some(hit) = self.hits.first() {
                let segment_length = (segment_end - segment_start).magnitude();
                let fraction = if segment_length > f32::EPSILON {
                    (hit.distance / segment_length).max(0.0).min(1.0)
                } else {
                    0.0
                };

                let time = (segment_start_time + time_step * fraction).min(config.duration);
                let valid = hit.surface.is_teleport_area() && !arc_invalid;

                collision_log!(
                    DEBUG,
                    segment,
                    time,
                    valid,
                    surface = ?hit.surface,
                    "Arc hit surface"
                );

                return CollisionResult {
                    hit: Some(ArcHit {
                        time,
                        point: hit.point,
                        normal: hit.normal,
                        distance: hit.distance,
                        surface: hit.surface,
                        valid,
                    }),
                };
            }

            segment_start_time = segment_end_time;
            segment_start = segment_end;
        }

        collision_log!(TRACE, "Arc crossed no surface");
        CollisionResult::miss()
    }
}
