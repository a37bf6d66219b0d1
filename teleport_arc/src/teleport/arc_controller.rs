use cgmath::{Vector3, Vector4};

use super::{
    AnimationScheduler, ArcConfig, ArcConfigError, ArcInput, ArcLines, ArcMode, CollisionResult,
    CollisionScanner, SegmentLayout, SegmentRenderer, SegmentVisual, SpatialTracer,
    TrajectorySampler,
};
use crate::arc_log;

/// Frame-to-frame outputs of the arc, read by teleport and feedback systems
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcState {
    /// Caller flagged the pointer angle or target as bad this frame
    pub arc_invalid: bool,
    /// Last scan found nothing, or found a surface the player cannot land on
    pub non_teleport_area_under_arc: bool,
    /// Point of the most recent hit, kept across frames that hit nothing
    pub teleport_position_candidate: Option<Vector3<f32>>,
    pub teleport_normal_candidate: Option<Vector3<f32>>,
}

impl Default for ArcState {
    fn default() -> Self {
        ArcState {
            arc_invalid: false,
            non_teleport_area_under_arc: true,
            teleport_position_candidate: None,
            teleport_normal_candidate: None,
        }
    }
}

/// A teleport-aiming arc: predicts the trajectory from the pointer, finds where
/// it lands and lays out the animated segments that visualize it.
///
/// Call [`TeleportArc::set_input`] and then [`TeleportArc::update`] once per
/// frame. Outputs are stable until the next `update`.
pub struct TeleportArc<T: SpatialTracer> {
    tracer: T,
    config: ArcConfig,
    input: ArcInput,
    scheduler: AnimationScheduler,
    scanner: CollisionScanner,
    renderer: Option<SegmentRenderer>,
    pool_builds: u64,
    visible: bool,
    state: ArcState,
    last_collision: CollisionResult,
}

impl<T: SpatialTracer> TeleportArc<T> {
    pub fn new(tracer: T, config: ArcConfig, now: f32) -> Result<Self, ArcConfigError> {
        config.validate()?;

        Ok(TeleportArc {
            tracer,
            config,
            input: ArcInput::default(),
            scheduler: AnimationScheduler::new(now),
            scanner: CollisionScanner::new(),
            renderer: None,
            pool_builds: 0,
            visible: false,
            state: ArcState::default(),
            last_collision: CollisionResult::miss(),
        })
    }

    /// Apply a new configuration. Rejected configurations leave the current
    /// one in place. The segment pool is rebuilt only when segment count or
    /// segment width changed.
    pub fn configure(&mut self, config: ArcConfig) -> Result<(), ArcConfigError> {
        config.validate()?;

        let rebuild = self.config.needs_rebuild(&config);
        self.config = config;

        if rebuild && self.renderer.is_some() {
            self.rebuild_segments();
        }

        Ok(())
    }

    pub fn show(&mut self) {
        self.visible = true;

        if self.renderer.is_none() {
            self.rebuild_segments();
        }
    }

    /// Stop drawing. Scan results and animation state are kept.
    pub fn hide(&mut self) {
        if self.visible {
            if let Some(renderer) = self.renderer.as_mut() {
                renderer.hide_all();
            }
        }

        self.visible = false;
    }

    pub fn set_input(&mut self, input: ArcInput) {
        self.scheduler.set_pointer_at_bad_angle(input.pointer_at_bad_angle);
        self.state.arc_invalid = input.is_invalid();
        self.input = input;
    }

    /// Scan for the landing point, advance the animation and lay out the
    /// visible segments. `now` is the embedder's clock in seconds.
    pub fn update(&mut self, now: f32) -> CollisionResult {
        let sampler = self.sampler();

        let collision =
            self.scanner
                .scan(&sampler, &self.config, self.state.arc_invalid, &self.tracer);

        self.state.non_teleport_area_under_arc = collision.non_teleport_area_under_arc();
        if let Some(hit) = collision.hit {
            self.state.teleport_position_candidate = Some(hit.point);
            self.state.teleport_normal_candidate = Some(hit.normal);
        }

        let time_offset = self.scheduler.advance(
            now,
            self.config.time_step(),
            self.config.segment_gap,
            self.config.speed,
        );

        if self.visible {
            if let Some(renderer) = self.renderer.as_mut() {
                let valid = collision.hit.is_some_and(|hit| hit.valid);
                renderer.set_color(self.config.style.color_for(valid));

                let layout = SegmentLayout {
                    mode: self.scheduler.mode(),
                    time_offset,
                    hit_time: collision.hit_time(),
                    time_step: self.config.time_step(),
                    segment_gap: self.config.segment_gap,
                    duration: self.config.duration,
                };
                renderer.layout(&layout, &sampler);
            }
        }

        arc_log!(
            TRACE,
            now,
            time_offset,
            hit = collision.is_hit(),
            valid = self.is_valid(),
            "Arc updated"
        );

        self.last_collision = collision;
        collision
    }

    pub fn is_valid(&self) -> bool {
        !self.state.arc_invalid && !self.state.non_teleport_area_under_arc
    }

    /// Position on the current trajectory `time` seconds after launch
    pub fn position_at(&self, time: f32) -> Vector3<f32> {
        self.sampler().position_at(time)
    }

    /// Override the shared segment color until the next update recolors it
    pub fn set_color(&mut self, color: Vector4<f32>) {
        if let Some(renderer) = self.renderer.as_mut() {
            renderer.set_color(color);
        }
    }

    /// Line list for the visible segments, with a cross at a rejected landing point
    pub fn lines(&self) -> ArcLines {
        let renderer = match self.renderer.as_ref() {
            Some(renderer) if self.visible => renderer,
            _ => {
                return ArcLines::from_segments(
                    &[],
                    self.config.style.default_color,
                    self.config.segment_width(),
                );
            }
        };

        let mut lines = renderer.lines();
        if let Some(hit) = self.last_collision.hit.filter(|hit| !hit.valid) {
            lines.add_cross(hit.point, self.config.style.cross_size);
        }
        lines
    }

    pub fn teleport_position_candidate(&self) -> Option<Vector3<f32>> {
        self.state.teleport_position_candidate
    }

    pub fn teleport_normal_candidate(&self) -> Option<Vector3<f32>> {
        self.state.teleport_normal_candidate
    }

    pub fn non_teleport_area_under_arc(&self) -> bool {
        self.state.non_teleport_area_under_arc
    }

    pub fn state(&self) -> &ArcState {
        &self.state
    }

    pub fn mode(&self) -> ArcMode {
        self.scheduler.mode()
    }

    pub fn animation_anchor(&self) -> f32 {
        self.scheduler.anchor()
    }

    pub fn config(&self) -> &ArcConfig {
        &self.config
    }

    pub fn input(&self) -> &ArcInput {
        &self.input
    }

    pub fn last_collision(&self) -> &CollisionResult {
        &self.last_collision
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Segment records, empty until the pool is first built by [`Self::show`]
    pub fn segments(&self) -> &[SegmentVisual] {
        self.renderer
            .as_ref()
            .map(SegmentRenderer::segments)
            .unwrap_or(&[])
    }

    /// Number of times the segment pool has been (re)built
    pub fn pool_builds(&self) -> u64 {
        self.pool_builds
    }

    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    pub fn tracer_mut(&mut self) -> &mut T {
        &mut self.tracer
    }

    fn sampler(&self) -> TrajectorySampler {
        TrajectorySampler::new(&self.input, self.config.gravity, self.config.scale)
    }

    fn rebuild_segments(&mut self) {
        let color = self
            .renderer
            .as_ref()
            .map_or(self.config.style.default_color, |renderer| renderer.color());

        // Dropping the old renderer releases the previous pool
        self.renderer = Some(SegmentRenderer::new(
            self.config.segment_count,
            self.config.segment_width(),
            color,
        ));
        self.pool_builds += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::teleport::{SurfaceTag, TraceHit, TraceLayers};
    use cgmath::{InnerSpace, vec3};

    /// Horizontal floor at y = 0 with a configurable tag
    struct Floor(SurfaceTag);

    impl SpatialTracer for Floor {
        fn trace(
            &self,
            from: Vector3<f32>,
            to: Vector3<f32>,
            _layers: TraceLayers,
            hits: &mut Vec<TraceHit>,
        ) {
            if from.y >= 0.0 && to.y < 0.0 {
                let s = from.y / (from.y - to.y);
                let point = from + (to - from) * s;
                hits.push(TraceHit {
                    point,
                    normal: vec3(0.0, 1.0, 0.0),
                    distance: (point - from).magnitude(),
                    surface: self.0,
                });
            }
        }
    }

    fn aimed_input() -> ArcInput {
        ArcInput::new(vec3(0.0, 1.5, 0.0), vec3(0.0, 2.0, -4.0))
    }

    fn arc(surface: SurfaceTag) -> TeleportArc<Floor> {
        let mut arc = TeleportArc::new(Floor(surface), ArcConfig::default(), 0.0).unwrap();
        arc.show();
        arc
    }

    #[test]
    fn test_valid_landing_sets_candidates_and_color() {
        let mut arc = arc(SurfaceTag::TeleportArea);
        assert!(!arc.is_valid());

        arc.set_input(aimed_input());
        let collision = arc.update(0.0);

        assert!(collision.is_hit());
        assert!(arc.is_valid());
        let candidate = arc.teleport_position_candidate().unwrap();
        assert!(candidate.y.abs() < 1e-4);
        assert_eq!(arc.teleport_normal_candidate(), Some(vec3(0.0, 1.0, 0.0)));

        let lines = arc.lines();
        assert_eq!(lines.color, arc.config().style.valid_color);
        assert!(lines.line_count() > 0);
    }

    #[test]
    fn test_blocking_surface_is_invalid_and_marked() {
        let mut arc = arc(SurfaceTag::Blocking);
        arc.set_input(aimed_input());
        arc.update(0.0);

        assert!(!arc.is_valid());
        assert!(arc.non_teleport_area_under_arc());
        assert!(arc.teleport_position_candidate().is_some());

        let lines = arc.lines();
        assert_eq!(lines.color, arc.config().style.invalid_color);
        // Three cross lines follow the segments
        assert_eq!(lines.line_count(), arc.renderer.as_ref().unwrap().enabled_count() + 3);
    }

    #[test]
    fn test_hide_keeps_state_and_clears_lines() {
        let mut arc = arc(SurfaceTag::TeleportArea);
        arc.set_input(aimed_input());
        arc.update(0.0);
        arc.hide();

        assert!(arc.is_valid());
        assert!(arc.segments().iter().all(|s| !s.enabled));
        assert!(arc.lines().is_empty());

        // Scanning continues while hidden
        arc.update(0.1);
        assert!(arc.is_valid());
        assert!(arc.segments().iter().all(|s| !s.enabled));
    }

    #[test]
    fn test_pool_is_built_lazily_once() {
        let mut arc = TeleportArc::new(Floor(SurfaceTag::TeleportArea), ArcConfig::default(), 0.0)
            .unwrap();
        assert!(arc.segments().is_empty());
        assert_eq!(arc.pool_builds(), 0);

        arc.show();
        arc.show();
        assert_eq!(arc.pool_builds(), 1);
        assert_eq!(arc.segments().len(), 60);
    }

    #[test]
    fn test_scale_change_rebuilds_with_new_width() {
        let mut arc = arc(SurfaceTag::TeleportArea);
        let wider = ArcConfig {
            scale: 3.0,
            ..ArcConfig::default()
        };

        arc.configure(wider).unwrap();

        assert_eq!(arc.pool_builds(), 2);
        assert_eq!(arc.segments()[0].width, arc.config().segment_width());

        arc.set_input(aimed_input());
        arc.update(0.0);
        assert_eq!(arc.lines().width, arc.config().segment_width());
    }

    #[test]
    fn test_rejected_config_keeps_previous() {
        let mut arc = arc(SurfaceTag::TeleportArea);
        let bad = ArcConfig {
            segment_count: 0,
            ..ArcConfig::default()
        };

        assert_eq!(arc.configure(bad), Err(ArcConfigError::NoSegments));
        assert_eq!(arc.config().segment_count, 60);
        assert_eq!(arc.pool_builds(), 1);
    }

    #[test]
    fn test_position_at_uses_current_input() {
        let mut arc = arc(SurfaceTag::TeleportArea);
        arc.set_input(aimed_input());

        let expected = TrajectorySampler::new(&aimed_input(), arc.config().gravity, 1.5)
            .position_at(0.7);
        assert_eq!(arc.position_at(0.7), expected);
    }
}
