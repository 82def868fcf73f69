use kurbo::Shape;

use crate::config::AnimationConfig;
use crate::foundation::core::{Canvas, FrameIndex, Point, Rgba8};
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::draw::{DrawCommand, FrameScript, Painter};
use crate::render::frame::FrameBuffer;
use crate::render::text::{TextBrush, TextLayoutEngine};

/// Curve flattening tolerance in pixels.
const SHAPE_TOLERANCE: f64 = 0.1;

/// Options for [`CpuRenderer`].
#[derive(Clone, Debug, Default)]
pub struct CpuRendererOpts {
    /// Raw font bytes, taking precedence over `AnimationConfig::font_path`.
    pub font_bytes: Option<Vec<u8>>,
}

/// Off-screen renderer powered by `vello_cpu`.
///
/// Owns the drawing surface and the [`FrameBuffer`] it is read back into. One frame is in flight
/// at a time: `begin_frame -> draw_* -> end_frame -> extract_pixels`.
pub struct CpuRenderer {
    canvas: Canvas,
    width_u16: u16,
    height_u16: u16,
    background: Rgba8,
    circle_radius: f64,
    circle_color: Rgba8,

    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    frame: FrameBuffer,
    text: Option<TextLayoutEngine>,
    warned_missing_font: bool,
    in_frame: bool,
}

impl CpuRenderer {
    /// Allocate the surface and frame buffer for `cfg`.
    pub fn new(cfg: &AnimationConfig, opts: CpuRendererOpts) -> ReelResult<Self> {
        cfg.validate()?;
        let canvas = cfg.canvas();
        let width_u16: u16 = canvas
            .width
            .try_into()
            .map_err(|_| ReelError::config("screenWidth exceeds u16"))?;
        let height_u16: u16 = canvas
            .height
            .try_into()
            .map_err(|_| ReelError::config("screenHeight exceeds u16"))?;

        let text = match (opts.font_bytes, cfg.font_path.as_deref()) {
            (Some(bytes), _) => Some(TextLayoutEngine::from_font_bytes(bytes)?),
            (None, Some(path)) => Some(TextLayoutEngine::from_font_file(path)?),
            (None, None) => None,
        };

        Ok(Self {
            canvas,
            width_u16,
            height_u16,
            background: cfg.background_color,
            circle_radius: cfg.circle_radius,
            circle_color: cfg.circle_color,
            ctx: vello_cpu::RenderContext::new(width_u16, height_u16),
            pixmap: vello_cpu::Pixmap::new(width_u16, height_u16),
            frame: FrameBuffer::new(canvas),
            text,
            warned_missing_font: false,
            in_frame: false,
        })
    }

    /// Canvas dimensions of the surface and frame buffer.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Start a frame: reset the context and clear to the background color.
    pub fn begin_frame(&mut self) {
        self.ctx.reset();
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_paint(color_to_cpu(self.background));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width_u16),
            f64::from(self.height_u16),
        ));
        self.in_frame = true;
    }

    /// Draw the built-in filled circle centered at `(x, y)`.
    pub fn draw_default(&mut self, x: f64, y: f64) -> ReelResult<()> {
        let cmd = DrawCommand::Circle {
            center: Point::new(x, y),
            radius: self.circle_radius,
            color: self.circle_color,
        };
        self.paint(&cmd)
    }

    /// Let `script` draw the frame through this renderer.
    pub fn draw_via_script(
        &mut self,
        script: &mut dyn FrameScript,
        x: f64,
        y: f64,
        frame: FrameIndex,
    ) -> ReelResult<()> {
        script.render_frame(Point::new(x, y), frame, self)
    }

    /// Finish the frame and rasterize it into the surface.
    pub fn end_frame(&mut self) -> ReelResult<()> {
        if !self.in_frame {
            return Err(ReelError::validation("end_frame called without begin_frame"));
        }
        self.ctx.flush();
        self.pixmap.data_as_u8_slice_mut().fill(0);
        self.ctx.render_to_pixmap(&mut self.pixmap);
        self.in_frame = false;
        Ok(())
    }

    /// Read the surface back into the frame buffer as top-down RGB24.
    ///
    /// The returned buffer is overwritten by the next frame.
    pub fn extract_pixels(&mut self) -> ReelResult<&FrameBuffer> {
        if self.in_frame {
            return Err(ReelError::validation(
                "extract_pixels called before end_frame",
            ));
        }
        self.frame
            .fill_from_premul_rgba8(self.pixmap.data_as_u8_slice())?;
        Ok(&self.frame)
    }

    fn draw_text(
        &mut self,
        text: &str,
        origin: Point,
        font_size: f64,
        color: Rgba8,
    ) -> ReelResult<()> {
        let Some(engine) = self.text.as_mut() else {
            if !self.warned_missing_font {
                tracing::warn!("DrawText needs a font (set `fontPath` or --font); skipping text");
                self.warned_missing_font = true;
            }
            return Ok(());
        };

        let layout = engine.layout_line(text, font_size as f32, TextBrush::from(color))?;
        let font = engine.font().data.clone();

        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                // Positioned glyphs carry the pen advance and the line baseline.
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(())
    }
}

impl Painter for CpuRenderer {
    fn paint(&mut self, cmd: &DrawCommand) -> ReelResult<()> {
        if !self.in_frame {
            return Err(ReelError::validation(format!(
                "{} issued outside begin_frame/end_frame",
                cmd.name()
            )));
        }
        cmd.validate()?;

        self.ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        match cmd {
            DrawCommand::Circle {
                center,
                radius,
                color,
            } => {
                let circle = kurbo::Circle::new(*center, *radius);
                self.ctx.set_paint(color_to_cpu(*color));
                self.ctx
                    .fill_path(&bezpath_to_cpu(&circle.to_path(SHAPE_TOLERANCE)));
            }
            DrawCommand::Rectangle { rect, color } => {
                self.ctx.set_paint(color_to_cpu(*color));
                self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    rect.x0, rect.y0, rect.x1, rect.y1,
                ));
            }
            DrawCommand::Line { from, to, color } => {
                let line = kurbo::Line::new(*from, *to);
                self.ctx.set_paint(color_to_cpu(*color));
                self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(1.0));
                self.ctx
                    .stroke_path(&bezpath_to_cpu(&line.to_path(SHAPE_TOLERANCE)));
            }
            DrawCommand::Text {
                text,
                origin,
                font_size,
                color,
            } => {
                self.draw_text(text, *origin, *font_size, *color)?;
            }
        }
        Ok(())
    }
}

fn color_to_cpu(c: Rgba8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

fn point_to_cpu(p: kurbo::Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
