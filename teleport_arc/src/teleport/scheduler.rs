use serde::{Deserialize, Serialize};

use crate::arc_log;

/// How much of the arc is laid out this frame
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArcMode {
    /// Segments march along the whole arc in a loop
    Cycling,
    /// Pointer is at a bad angle; only a stub of the first segment is shown
    FirstSegmentOnly,
}

/// Keeps the loop-start anchor for the marching-segment animation.
///
/// The anchor is only ever reset to "now", and never moved backwards even if
/// the embedder's clock is rewound.
#[derive(Clone, Debug)]
pub struct AnimationScheduler {
    anchor: f32,
    mode: ArcMode,
    restart_pending: bool,
}

impl AnimationScheduler {
    pub fn new(now: f32) -> Self {
        AnimationScheduler {
            anchor: now,
            mode: ArcMode::Cycling,
            restart_pending: false,
        }
    }

    pub fn mode(&self) -> ArcMode {
        self.mode
    }

    pub fn anchor(&self) -> f32 {
        self.anchor
    }

    /// Switch modes from the pointer's angle flag. Leaving
    /// [`ArcMode::FirstSegmentOnly`] restarts the loop at the next
    /// [`Self::advance`] so the arc grows back out from the pointer.
    pub fn set_pointer_at_bad_angle(&mut self, bad_angle: bool) {
        if self.mode == ArcMode::FirstSegmentOnly && !bad_angle {
            arc_log!(TRACE, "Pointer angle recovered, restarting arc loop");
            self.restart_pending = true;
        }

        self.mode = if bad_angle {
            ArcMode::FirstSegmentOnly
        } else {
            ArcMode::Cycling
        };
    }

    /// Time offset of the first visible segment for this frame.
    ///
    /// Wraps back to zero once the offset runs past one segment plus its gap.
    /// Always zero while only the first segment is shown.
    pub fn advance(&mut self, now: f32, time_step: f32, segment_gap: f32, speed: f32) -> f32 {
        if self.mode == ArcMode::FirstSegmentOnly {
            return 0.0;
        }

        if self.restart_pending {
            self.restart_pending = false;
            self.restart(now);
        }

        let elapsed = ((now - self.anchor) * speed).max(0.0);

        if elapsed > time_step + segment_gap {
            self.restart(now);
            return 0.0;
        }

        elapsed
    }

    fn restart(&mut self, now: f32) {
        if now >= self.anchor {
            self.anchor = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STEP: f32 = 0.05;
    const GAP: f32 = 0.025;
    const SPEED: f32 = 0.2;

    #[test]
    fn test_offset_grows_then_wraps() {
        let mut scheduler = AnimationScheduler::new(0.0);

        let offset = scheduler.advance(0.3, STEP, GAP, SPEED);
        assert!((offset - 0.06).abs() < 1e-6);
        assert_eq!(scheduler.anchor(), 0.0);

        // 0.4 * 0.2 = 0.08 > 0.075
        let offset = scheduler.advance(0.4, STEP, GAP, SPEED);
        assert_eq!(offset, 0.0);
        assert_eq!(scheduler.anchor(), 0.4);

        let offset = scheduler.advance(0.5, STEP, GAP, SPEED);
        assert!((offset - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_bad_angle_forces_first_segment_mode() {
        let mut scheduler = AnimationScheduler::new(0.0);
        scheduler.set_pointer_at_bad_angle(true);

        assert_eq!(scheduler.mode(), ArcMode::FirstSegmentOnly);
        assert_eq!(scheduler.advance(0.3, STEP, GAP, SPEED), 0.0);
        // Entering the mode leaves the anchor alone
        assert_eq!(scheduler.anchor(), 0.0);
    }

    #[test]
    fn test_recovering_angle_resets_anchor() {
        let mut scheduler = AnimationScheduler::new(0.0);
        scheduler.set_pointer_at_bad_angle(true);
        assert_eq!(scheduler.advance(1.0, STEP, GAP, SPEED), 0.0);
        scheduler.set_pointer_at_bad_angle(false);

        assert_eq!(scheduler.mode(), ArcMode::Cycling);
        assert_eq!(scheduler.advance(5.0, STEP, GAP, SPEED), 0.0);
        assert_eq!(scheduler.anchor(), 5.0);
        assert!((scheduler.advance(5.1, STEP, GAP, SPEED) - 0.02).abs() < 1e-5);
    }

    #[test]
    fn test_good_angle_while_cycling_keeps_anchor() {
        let mut scheduler = AnimationScheduler::new(0.0);
        scheduler.set_pointer_at_bad_angle(false);

        assert_eq!(scheduler.anchor(), 0.0);
        assert!((scheduler.advance(0.3, STEP, GAP, SPEED) - 0.06).abs() < 1e-6);
    }

    #[test]
    fn test_rewound_clock_never_moves_anchor_back() {
        let mut scheduler = AnimationScheduler::new(10.0);

        assert_eq!(scheduler.advance(4.0, STEP, GAP, SPEED), 0.0);
        assert_eq!(scheduler.anchor(), 10.0);

        scheduler.set_pointer_at_bad_angle(true);
        scheduler.set_pointer_at_bad_angle(false);
        assert_eq!(scheduler.advance(2.0, STEP, GAP, SPEED), 0.0);
        assert_eq!(scheduler.anchor(), 10.0);
    }
}
