use std::path::PathBuf;

use crate::foundation::core::{Canvas, Fps, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};

/// Largest canvas edge the CPU rasterizer can address.
pub const MAX_CANVAS_EDGE: u32 = u16::MAX as u32;

/// Immutable settings for one animation run.
///
/// Field names serialize in camelCase, matching the Lua globals a script declares
/// (`screenWidth`, `circleColor`, ...).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnimationConfig {
    /// Canvas width in pixels.
    pub screen_width: u32,
    /// Canvas height in pixels.
    pub screen_height: u32,
    /// Output frame rate.
    pub fps: u32,
    /// Number of frames to render.
    pub total_frames: u64,
    /// Radius of the built-in circle.
    pub circle_radius: f64,
    /// Fill color of the built-in circle.
    pub circle_color: Rgba8,
    /// Color every frame is cleared to.
    pub background_color: Rgba8,
    /// Font used by `DrawText`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_path: Option<PathBuf>,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            screen_width: 1920,
            screen_height: 1080,
            fps: 30,
            total_frames: 600,
            circle_radius: 50.0,
            circle_color: Rgba8::rgb(230, 41, 55),
            background_color: Rgba8::BLACK,
            font_path: None,
        }
    }
}

impl AnimationConfig {
    /// Check ranges; errors name the offending Lua global.
    pub fn validate(&self) -> ReelResult<()> {
        check_edge("screenWidth", self.screen_width)?;
        check_edge("screenHeight", self.screen_height)?;
        if self.fps == 0 {
            return Err(ReelError::config("fps must be >= 1"));
        }
        if self.total_frames == 0 {
            return Err(ReelError::config("totalFrames must be >= 1"));
        }
        if !self.circle_radius.is_finite() || self.circle_radius < 0.0 {
            return Err(ReelError::config(
                "circleRadius must be a finite number >= 0",
            ));
        }
        Ok(())
    }

    /// Canvas dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.screen_width,
            height: self.screen_height,
        }
    }

    /// Validated frame rate.
    pub fn frame_rate(&self) -> ReelResult<Fps> {
        Fps::new(self.fps).map_err(|_| ReelError::config("fps must be >= 1"))
    }

    /// Replace the font path.
    pub fn with_font_path(mut self, font_path: Option<PathBuf>) -> Self {
        self.font_path = font_path;
        self
    }
}

fn check_edge(name: &str, v: u32) -> ReelResult<()> {
    if v == 0 || v > MAX_CANVAS_EDGE {
        return Err(ReelError::config(format!(
            "{name} must be in 1..={MAX_CANVAS_EDGE}, got {v}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
