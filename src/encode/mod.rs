//! Encoding sinks.
//!
//! Sinks consume rendered frames in timeline order and are driven by [`crate::Animation::run`].

/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
