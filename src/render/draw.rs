use crate::foundation::core::{FrameIndex, Point, Rect, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};

/// The closed set of drawing primitives exposed to scripts.
///
/// Every variant goes through [`DrawCommand::validate`] before it reaches a [`Painter`], so
/// painters can assume finite coordinates and non-negative extents.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    /// Filled circle.
    Circle {
        /// Circle center.
        center: Point,
        /// Radius in pixels.
        radius: f64,
        /// Fill color.
        color: Rgba8,
    },
    /// Filled axis-aligned rectangle.
    Rectangle {
        /// Rectangle in canvas coordinates (`x0,y0` is the top-left corner).
        rect: Rect,
        /// Fill color.
        color: Rgba8,
    },
    /// Single line of text.
    Text {
        /// Text to draw.
        text: String,
        /// Top-left corner of the text box.
        origin: Point,
        /// Font size in pixels.
        font_size: f64,
        /// Text color.
        color: Rgba8,
    },
    /// One pixel wide line segment.
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Stroke color.
        color: Rgba8,
    },
}

impl DrawCommand {
    /// Script-facing name of the primitive.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Circle { .. } => "DrawCircle",
            Self::Rectangle { .. } => "DrawRectangle",
            Self::Text { .. } => "DrawText",
            Self::Line { .. } => "DrawLine",
        }
    }

    /// Build a rectangle command from its top-left corner and size.
    pub fn rectangle(x: f64, y: f64, width: f64, height: f64, color: Rgba8) -> ReelResult<Self> {
        non_negative("DrawRectangle", "width", width)?;
        non_negative("DrawRectangle", "height", height)?;
        let cmd = Self::Rectangle {
            rect: Rect::new(x, y, x + width, y + height),
            color,
        };
        cmd.validate()?;
        Ok(cmd)
    }

    /// Enforce the shared argument contract: finite numbers, non-negative extents, positive font
    /// size.
    pub fn validate(&self) -> ReelResult<()> {
        let name = self.name();
        match self {
            Self::Circle { center, radius, .. } => {
                finite_point(name, "center", *center)?;
                non_negative(name, "radius", *radius)
            }
            Self::Rectangle { rect, .. } => {
                finite_point(name, "x/y", Point::new(rect.x0, rect.y0))?;
                finite_point(name, "width/height", Point::new(rect.x1, rect.y1))?;
                if rect.x1 < rect.x0 || rect.y1 < rect.y0 {
                    return Err(ReelError::validation(format!(
                        "{name}: width and height must be >= 0"
                    )));
                }
                Ok(())
            }
            Self::Text {
                origin, font_size, ..
            } => {
                finite_point(name, "x/y", *origin)?;
                if !font_size.is_finite() || *font_size <= 0.0 {
                    return Err(ReelError::validation(format!(
                        "{name}: fontSize must be a finite number > 0, got {font_size}"
                    )));
                }
                Ok(())
            }
            Self::Line { from, to, .. } => {
                finite_point(name, "start", *from)?;
                finite_point(name, "end", *to)
            }
        }
    }
}

fn finite_point(name: &str, what: &str, p: Point) -> ReelResult<()> {
    if !p.x.is_finite() || !p.y.is_finite() {
        return Err(ReelError::validation(format!(
            "{name}: {what} must be finite, got ({}, {})",
            p.x, p.y
        )));
    }
    Ok(())
}

fn non_negative(name: &str, what: &str, v: f64) -> ReelResult<()> {
    if !v.is_finite() || v < 0.0 {
        return Err(ReelError::validation(format!(
            "{name}: {what} must be a finite number >= 0, got {v}"
        )));
    }
    Ok(())
}

/// Receiver of validated draw commands for the frame being rendered.
pub trait Painter {
    /// Rasterize one command onto the current frame.
    fn paint(&mut self, cmd: &DrawCommand) -> ReelResult<()>;
}

/// A per-frame drawing callback supplied from outside the renderer.
///
/// Invoked synchronously once per frame with the circle position and the 0-based frame index.
pub trait FrameScript {
    /// Whether a callback is defined; when `false` the renderer draws the built-in circle.
    fn has_frame_callback(&self) -> bool;

    /// Issue zero or more draw commands for `frame`.
    fn render_frame(
        &mut self,
        pos: Point,
        frame: FrameIndex,
        painter: &mut dyn Painter,
    ) -> ReelResult<()>;
}

/// Painter that only records commands. Handy for inspecting what a script draws.
#[derive(Debug, Default)]
pub struct RecordingPainter {
    /// Commands in paint order.
    pub commands: Vec<DrawCommand>,
}

impl Painter for RecordingPainter {
    fn paint(&mut self, cmd: &DrawCommand) -> ReelResult<()> {
        self.commands.push(cmd.clone());
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/draw.rs"]
mod tests;
