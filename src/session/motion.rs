use crate::config::AnimationConfig;
use crate::foundation::core::{FrameIndex, Point};

/// Horizontal margin the circle starts at (and stops short of on the right).
pub const EDGE_MARGIN: f64 = 100.0;

/// Left-to-right linear path at half canvas height.
///
/// The circle starts at `x = 100` and advances `(width - 200) / totalFrames` per frame, so the
/// final frame lands one step short of `width - 100`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionPath {
    start: Point,
    step: f64,
}

impl MotionPath {
    /// Path for the canvas and frame count in `cfg`.
    pub fn for_config(cfg: &AnimationConfig) -> Self {
        let width = f64::from(cfg.screen_width);
        let height = f64::from(cfg.screen_height);
        Self {
            start: Point::new(EDGE_MARGIN, height / 2.0),
            step: (width - 2.0 * EDGE_MARGIN) / cfg.total_frames.max(1) as f64,
        }
    }

    /// Position at frame 0.
    pub fn start(&self) -> Point {
        self.start
    }

    /// Horizontal advance per frame. Negative on canvases narrower than 200px.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Position at `frame`, computed from the start rather than accumulated.
    pub fn position(&self, frame: FrameIndex) -> Point {
        Point::new(self.start.x + frame.0 as f64 * self.step, self.start.y)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/motion.rs"]
mod tests;
