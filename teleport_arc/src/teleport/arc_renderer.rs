use cgmath::{Vector3, Vector4, Zero, vec3};

use super::{ArcMode, TrajectorySampler};
use crate::render_log;

/// One drawable piece of the arc
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SegmentVisual {
    pub index: usize,
    pub enabled: bool,
    pub start: Vector3<f32>,
    pub end: Vector3<f32>,
    pub width: f32,
}

impl SegmentVisual {
    fn hidden(index: usize, width: f32) -> Self {
        SegmentVisual {
            index,
            enabled: false,
            start: Vector3::zero(),
            end: Vector3::zero(),
            width,
        }
    }
}

/// Everything the renderer needs to know about the current frame's timing
#[derive(Clone, Copy, Debug)]
pub struct SegmentLayout {
    pub mode: ArcMode,
    /// Start time of the first marching segment, from the scheduler
    pub time_offset: f32,
    /// Collision time, or the no-collision sentinel
    pub hit_time: f32,
    pub time_step: f32,
    pub segment_gap: f32,
    pub duration: f32,
}

/// Fixed-size pool of segment records.
///
/// The pool is never resized; a new renderer is built whenever segment count
/// or thickness change.
pub struct SegmentRenderer {
    segments: Vec<SegmentVisual>,
    color: Vector4<f32>,
    width: f32,
}

impl SegmentRenderer {
    pub fn new(segment_count: usize, width: f32, color: Vector4<f32>) -> Self {
        render_log!(DEBUG, segment_count, width, "Building arc segment pool");

        SegmentRenderer {
            segments: (0..segment_count)
                .map(|index| SegmentVisual::hidden(index, width))
                .collect(),
            color,
            width,
        }
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> &[SegmentVisual] {
        &self.segments
    }

    pub fn enabled_count(&self) -> usize {
        self.segments.iter().filter(|s| s.enabled).count()
    }

    pub fn color(&self) -> Vector4<f32> {
        self.color
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    /// Shared color applied to every segment
    pub fn set_color(&mut self, color: Vector4<f32>) {
        self.color = color;
    }

    /// Enable and position the segments visible this frame, disabling the rest
    pub fn layout(&mut self, layout: &SegmentLayout, sampler: &TrajectorySampler) {
        let count = self.segments.len();

        if layout.mode == ArcMode::FirstSegmentOnly {
            let end_time = layout.hit_time.min(layout.time_step);
            self.draw_segment(0, 0.0, end_time, sampler);
            self.hide_segments(1, count);
            return;
        }

        let mut segment_start_time = layout.time_offset;
        let mut loop_start = 0;

        // Partial segment growing out of the pointer while the loop advances
        if layout.time_offset > layout.segment_gap {
            let first_end_time = (layout.time_offset - layout.segment_gap).min(layout.hit_time);
            self.draw_segment(0, 0.0, first_end_time, sampler);
            loop_start = 1;
        }

        let hide_from = if segment_start_time < layout.hit_time {
            let mut last_drawn = None;

            for index in loop_start..count {
                let mut segment_end_time = segment_start_time + layout.time_step;
                let mut stop = false;

                if segment_end_time >= layout.duration {
                    segment_end_time = layout.duration;
                    stop = true;
                }

                if segment_end_time >= layout.hit_time {
                    segment_end_time = layout.hit_time;
                    stop = true;
                }

                self.draw_segment(index, segment_start_time, segment_end_time, sampler);
                last_drawn = Some(index);

                segment_start_time += layout.time_step + layout.segment_gap;

                if stop
                    || segment_start_time >= layout.duration
                    || segment_start_time >= layout.hit_time
                {
                    break;
                }
            }

            last_drawn.map_or(loop_start, |index| index + 1)
        } else {
            // Target is closer than the animation offset; show nothing
            0
        };

        self.hide_segments(hide_from, count);
    }

    /// Disable segments in `start..end`. Indices past the pool are skipped.
    pub fn hide_segments(&mut self, start: usize, end: usize) {
        for segment in self.segments.iter_mut().take(end).skip(start) {
            segment.enabled = false;
        }
    }

    pub fn hide_all(&mut self) {
        let count = self.segments.len();
        self.hide_segments(0, count);
    }

    fn draw_segment(
        &mut self,
        index: usize,
        start_time: f32,
        end_time: f32,
        sampler: &TrajectorySampler,
    ) {
        if let Some(segment) = self.segments.get_mut(index) {
            segment.enabled = true;
            segment.start = sampler.position_at(start_time);
            segment.end = sampler.position_at(end_time);
        }
    }

    /// Build the line list for the currently enabled segments
    pub fn lines(&self) -> ArcLines {
        ArcLines::from_segments(&self.segments, self.color, self.width)
    }
}

/// Backend-neutral line list: every two consecutive vertices form one line
#[derive(Clone, Debug, PartialEq)]
pub struct ArcLines {
    pub vertices: Vec<Vector3<f32>>,
    pub color: Vector4<f32>,
    pub width: f32,
}

impl ArcLines {
    pub fn from_segments(segments: &[SegmentVisual], color: Vector4<f32>, width: f32) -> Self {
        let mut vertices = Vec::with_capacity(segments.len() * 2);

        for segment in segments.iter().filter(|s| s.enabled) {
            vertices.push(segment.start);
            vertices.push(segment.end);
        }

        ArcLines {
            vertices,
            color,
            width,
        }
    }

    pub fn line_count(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Append a three-axis cross marking `origin`, used for rejected landing points
    pub fn add_cross(&mut self, origin: Vector3<f32>, size: f32) {
        for axis in [vec3(1.0, 0.0, 0.0), vec3(0.0, 1.0, 0.0), vec3(0.0, 0.0, 1.0)] {
            self.vertices.push(origin + axis * size);
            self.vertices.push(origin - axis * size);
        }
    }
}
