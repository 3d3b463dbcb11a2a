//! Built-in image content.
//!
//! The renderer is trivial: the boundary protocol does not care
//! what the pixels mean. Pixel `(x, y)` is `(x % 255, y % 255, 0)`.

use tracing::{debug, trace};

/// Channel values wrap at this modulus.
pub const GRADIENT_MODULUS: u32 = 255;

/// Renders a `width` x `height` gradient as row-major 3-byte pixels.
///
/// Returns `None` if the byte length overflows or cannot be allocated, so a
/// huge request fails the call instead of aborting the process.
pub fn render_gradient(width: u32, height: u32) -> Option<Vec<u8>> {
    trace!(width, height, "render_gradient");
    let len = (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(3)?;

    let mut buf = Vec::new();
    if let Err(e) = buf.try_reserve_exact(len) {
        debug!(len, error = %e, "gradient allocation failed");
        return None;
    }

    for y in 0..height {
        let g = (y % GRADIENT_MODULUS) as u8;
        for x in 0..width {
            let r = (x % GRADIENT_MODULUS) as u8;
            buf.extend_from_slice(&[r, g, 0]);
        }
    }
    debug_assert_eq!(buf.len(), len);
    Some(buf)
}
