//! Scriptreel renders a short 2D animation off-screen and encodes it to MP4.
//!
//! A Lua script declares the animation parameters as globals and may take over drawing through an
//! `onRender(x, y, frameIndex)` callback. Every frame is rasterized on the CPU, read back as
//! top-down RGB24 and streamed to a system `ffmpeg` process.
//!
//! - Load a script with [`ScriptHost`] and resolve an [`AnimationConfig`]
//! - Create a [`CpuRenderer`] for that configuration
//! - Drive the frame loop with [`Animation::run`] into a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Animation parameters.
pub mod config;
/// Encoding sinks.
pub mod encode;
/// Off-screen rendering.
pub mod render;
/// Lua scripting host.
pub mod script;
/// Frame loop.
pub mod session;

pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Point, Rect, Rgba8};
pub use crate::foundation::error::{ReelError, ReelResult};

pub use crate::config::AnimationConfig;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::render::cpu::{CpuRenderer, CpuRendererOpts};
pub use crate::render::draw::{DrawCommand, FrameScript, Painter, RecordingPainter};
pub use crate::render::frame::FrameBuffer;
pub use crate::script::ScriptHost;
pub use crate::session::driver::{Animation, RenderStats, render_single_frame};
pub use crate::session::motion::MotionPath;
