//! PNG snapshot encoding.

use image::{ImageBuffer, Rgba};
use std::path::Path;

use crate::error::{RenderError, RenderResult};

/// Options for taking snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct SnapshotOptions {
    /// Zero the alpha channel so the background is transparent; otherwise
    /// alpha is forced opaque.
    pub transparent_background: bool,
    /// Reverse row order before encoding. Needed when the pixel source is
    /// bottom-up (GL-style readback); wgpu readbacks are already top-down.
    pub flip_rows: bool,
}

/// Reverses the row order of an RGBA pixel buffer.
#[must_use]
pub fn reverse_rows(data: &[u8], width: u32, height: u32) -> Vec<u8> {
    let row_bytes = (width * 4) as usize;
    let mut out = Vec::with_capacity(data.len());
    for row in (0..height as usize).rev() {
        out.extend_from_slice(&data[row * row_bytes..(row + 1) * row_bytes]);
    }
    out
}

/// Encodes RGBA pixel data as a PNG file, returning the dimensions
/// written.
pub fn save_png(
    filename: impl AsRef<Path>,
    data: &[u8],
    width: u32,
    height: u32,
    options: SnapshotOptions,
) -> RenderResult<(u32, u32)> {
    let mut pixels = if options.flip_rows {
        reverse_rows(data, width, height)
    } else {
        data.to_vec()
    };
    let alpha = if options.transparent_background { 0 } else { 255 };
    for px in pixels.chunks_exact_mut(4) {
        px[3] = alpha;
    }
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> = ImageBuffer::from_raw(width, height, pixels)
        .ok_or_else(|| RenderError::Surface("pixel buffer size mismatch".to_string()))?;
    img.save_with_format(filename.as_ref(), image::ImageFormat::Png)?;
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_rows() {
        // 1x3 image: rows a, b, c.
        let data = [1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3];
        let out = reverse_rows(&data, 1, 3);
        assert_eq!(out, vec![3, 3, 3, 3, 2, 2, 2, 2, 1, 1, 1, 1]);
    }

    #[test]
    fn test_save_png_round_trip_dimensions() {
        let (w, h) = (4u32, 3u32);
        let data = vec![128u8; (w * h * 4) as usize];
        let path = std::env::temp_dir().join("mathplot_snapshot_test.png");
        let dims = save_png(&path, &data, w, h, SnapshotOptions::default()).unwrap();
        assert_eq!(dims, (w, h));
        let back = image::open(&path).unwrap();
        assert_eq!((back.width(), back.height()), (w, h));
        std::fs::remove_file(path).ok();
    }

    #[test]
    fn test_transparent_background_zeroes_alpha() {
        let data = vec![200u8; 16];
        let path = std::env::temp_dir().join("mathplot_snapshot_alpha_test.png");
        save_png(
            &path,
            &data,
            2,
            2,
            SnapshotOptions {
                transparent_background: true,
                flip_rows: false,
            },
        )
        .unwrap();
        let back = image::open(&path).unwrap().to_rgba8();
        assert!(back.pixels().all(|p| p.0[3] == 0));
        std::fs::remove_file(path).ok();
    }
}
