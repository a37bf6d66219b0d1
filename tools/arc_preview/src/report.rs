use serde::Serialize;
use teleport_arc::{ArcMode, SpatialTracer, TeleportArc};

/// Per-frame summary printed by `simulate`
#[derive(Debug, Serialize)]
pub struct FrameReport {
    pub frame: usize,
    pub time: f32,
    pub mode: ArcMode,
    pub hit_time: Option<f32>,
    pub valid: bool,
    pub candidate: Option<[f32; 3]>,
    pub enabled_segments: usize,
    pub line_vertices: usize,
}

impl FrameReport {
    pub fn capture<T: SpatialTracer>(frame: usize, time: f32, arc: &TeleportArc<T>) -> Self {
        FrameReport {
            frame,
            time,
            mode: arc.mode(),
            hit_time: arc.last_collision().hit.map(|hit| hit.time),
            valid: arc.is_valid(),
            candidate: arc.teleport_position_candidate().map(Into::into),
            enabled_segments: arc.segments().iter().filter(|s| s.enabled).count(),
            line_vertices: arc.lines().vertices.len(),
        }
    }

    pub fn print(&self) {
        let hit = match self.hit_time {
            Some(time) => format!("{:.3}s", time),
            None => "none".to_string(),
        };
        let candidate = match self.candidate {
            Some([x, y, z]) => format!("({:.2}, {:.2}, {:.2})", x, y, z),
            None => "-".to_string(),
        };

        println!(
            "frame {:>4}  t={:>7.3}  {:?}  hit={:>7}  valid={:<5}  segments={:>3}  target={}",
            self.frame,
            self.time,
            self.mode,
            hit,
            self.valid,
            self.enabled_segments,
            candidate
        );
    }
}
