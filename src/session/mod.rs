//! Frame loop: motion path, rendering and sink hand-off.

/// Animation driver and single-frame rendering.
pub mod driver;
/// Circle position per frame.
pub mod motion;
