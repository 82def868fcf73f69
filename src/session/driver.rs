use crate::config::AnimationConfig;
use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::cpu::CpuRenderer;
use crate::render::draw::FrameScript;
use crate::render::frame::FrameBuffer;
use crate::session::motion::MotionPath;

/// Counters reported by [`Animation::run`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames handed to the sink.
    pub frames_written: u64,
    /// Bytes handed to the sink.
    pub bytes_written: u64,
}

/// One full animation run over a fixed configuration.
#[derive(Clone, Debug)]
pub struct Animation {
    config: AnimationConfig,
    path: MotionPath,
}

impl Animation {
    /// Validate `config` and prepare the motion path.
    pub fn new(config: AnimationConfig) -> ReelResult<Self> {
        config.validate()?;
        let path = MotionPath::for_config(&config);
        Ok(Self { config, path })
    }

    /// Configuration this animation renders.
    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    /// Circle path this animation follows.
    pub fn motion(&self) -> &MotionPath {
        &self.path
    }

    /// Render every frame and stream it to `sink`.
    ///
    /// When `script` defines a frame callback it draws each frame; otherwise the built-in circle
    /// is drawn. The first error stops the loop and no further frames reach the sink.
    #[tracing::instrument(skip_all, fields(frames = self.config.total_frames))]
    pub fn run(
        &self,
        renderer: &mut CpuRenderer,
        mut script: Option<&mut (dyn FrameScript + '_)>,
        sink: &mut dyn FrameSink,
    ) -> ReelResult<RenderStats> {
        let canvas = self.config.canvas();
        if renderer.canvas() != canvas {
            return Err(ReelError::validation(format!(
                "renderer canvas {}x{} does not match config {}x{}",
                renderer.canvas().width,
                renderer.canvas().height,
                canvas.width,
                canvas.height
            )));
        }

        sink.begin(SinkConfig {
            width: canvas.width,
            height: canvas.height,
            fps: self.config.frame_rate()?,
        })?;
        tracing::info!(
            width = canvas.width,
            height = canvas.height,
            fps = self.config.fps,
            step = self.path.step(),
            "render started"
        );

        let mut stats = RenderStats::default();
        for i in 0..self.config.total_frames {
            let idx = FrameIndex(i);
            let frame = draw_frame(renderer, script.as_deref_mut(), self.path, idx)?;
            sink.push_frame(idx, frame)?;
            stats.frames_written += 1;
            stats.bytes_written += frame.data().len() as u64;
            tracing::debug!(frame = i, "frame written");
        }

        sink.end()?;
        tracing::info!(
            frames = stats.frames_written,
            bytes = stats.bytes_written,
            "render finished"
        );
        Ok(stats)
    }
}

/// Render frame `frame` of `config` without a sink.
pub fn render_single_frame<'r>(
    renderer: &'r mut CpuRenderer,
    script: Option<&mut (dyn FrameScript + '_)>,
    config: &AnimationConfig,
    frame: FrameIndex,
) -> ReelResult<&'r FrameBuffer> {
    config.validate()?;
    if frame.0 >= config.total_frames {
        return Err(ReelError::validation(format!(
            "frame {} is out of range (totalFrames = {})",
            frame.0, config.total_frames
        )));
    }
    draw_frame(renderer, script, MotionPath::for_config(config), frame)
}

fn draw_frame<'r>(
    renderer: &'r mut CpuRenderer,
    script: Option<&mut (dyn FrameScript + '_)>,
    path: MotionPath,
    idx: FrameIndex,
) -> ReelResult<&'r FrameBuffer> {
    let pos = path.position(idx);
    renderer.begin_frame();
    match script {
        Some(script) if script.has_frame_callback() => {
            renderer.draw_via_script(script, pos.x, pos.y, idx)?
        }
        _ => renderer.draw_default(pos.x, pos.y)?,
    }
    renderer.end_frame()?;
    renderer.extract_pixels()
}
