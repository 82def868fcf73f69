use crate::foundation::core::Canvas;
use crate::foundation::error::{ReelError, ReelResult};

/// One packed RGB24 frame, row-major, top row first.
///
/// Allocated once per run and overwritten in place every frame; `data.len()` is always
/// `width * height * 3`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameBuffer {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Allocate a black frame for `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            width: canvas.width,
            height: canvas.height,
            data: vec![0u8; canvas.rgb24_len()],
        }
    }

    /// Packed RGB bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Frame dimensions.
    pub fn canvas(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// RGB triple at `(x, y)`, `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 3;
        Some([self.data[i], self.data[i + 1], self.data[i + 2]])
    }

    /// Overwrite this frame from premultiplied RGBA8 pixels of the same dimensions.
    ///
    /// Any remaining transparency is flattened over black, the encoder has no alpha channel.
    pub(crate) fn fill_from_premul_rgba8(&mut self, src: &[u8]) -> ReelResult<()> {
        pack_premul_rgba8_to_rgb24(&mut self.data, src)
    }
}

fn pack_premul_rgba8_to_rgb24(dst: &mut [u8], src_premul: &[u8]) -> ReelResult<()> {
    if !src_premul.len().is_multiple_of(4) || dst.len() / 3 != src_premul.len() / 4 {
        return Err(ReelError::validation(format!(
            "pixel readback size mismatch: {} rgba bytes for {} rgb bytes",
            src_premul.len(),
            dst.len()
        )));
    }

    // Premultiplied over opaque black is the color channels themselves.
    for (d, s) in dst.chunks_exact_mut(3).zip(src_premul.chunks_exact(4)) {
        let a = s[3];
        d[0] = s[0].min(a);
        d[1] = s[1].min(a);
        d[2] = s[2].min(a);
    }

    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
