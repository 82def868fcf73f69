//! Off-screen rendering of one frame at a time.

/// CPU renderer powered by `vello_cpu`.
pub mod cpu;
/// Draw commands and the painter/script seams.
pub mod draw;
/// Packed RGB24 frame buffer.
pub mod frame;
pub(crate) mod text;
