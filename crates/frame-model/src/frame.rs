//! Frame buffers and crop geometry.
//!
//! Camera-style frames are BGRA byte buffers with an explicit row stride
//! (bytes per row may exceed `width * 4` due to padding). All access goes
//! through [`FrameView`], which validates geometry once at construction.

use digitlens_common::{DigitlensError, DigitlensResult};
use image::RgbImage;

/// Bytes per BGRA pixel.
pub const BYTES_PER_PIXEL: u32 = 4;

/// A single pixel in blue/green/red/alpha channel order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bgra {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl Bgra {
    pub const WHITE: Bgra = Bgra {
        b: 255,
        g: 255,
        r: 255,
        a: 255,
    };

    pub const BLACK: Bgra = Bgra {
        b: 0,
        g: 0,
        r: 0,
        a: 255,
    };

    /// Summed color-channel intensity (`b + g + r`), in `0..=765`.
    ///
    /// Pixels whose sum falls below the ink threshold are classified as
    /// part of the drawn digit.
    pub fn intensity_sum(&self) -> u16 {
        self.b as u16 + self.g as u16 + self.r as u16
    }
}

/// A read-only, bounds-checked view over a BGRA pixel buffer.
///
/// Geometry is validated once at construction; per-pixel access is plain
/// indexing within the proven bounds.
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    data: &'a [u8],
    width: u32,
    height: u32,
    stride_bytes: u32,
}

impl<'a> FrameView<'a> {
    /// Create a view, validating that the buffer holds `height` rows of at
    /// least `width * 4` bytes each at the given stride.
    pub fn new(
        data: &'a [u8],
        width: u32,
        height: u32,
        stride_bytes: u32,
    ) -> DigitlensResult<Self> {
        if width == 0 || height == 0 {
            return Err(DigitlensError::frame(format!(
                "Empty frame: {width}x{height}"
            )));
        }
        if stride_bytes < width * BYTES_PER_PIXEL {
            return Err(DigitlensError::frame(format!(
                "Row stride {stride_bytes} too small for width {width}"
            )));
        }
        let required = stride_bytes as usize * height as usize;
        if data.len() < required {
            return Err(DigitlensError::frame(format!(
                "Buffer of {} bytes too small for {width}x{height} frame with stride {stride_bytes} ({required} required)",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            stride_bytes,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride_bytes(&self) -> u32 {
        self.stride_bytes
    }

    /// Pixel at `(x, y)` in top-left-origin frame coordinates.
    pub fn pixel(&self, x: u32, y: u32) -> Bgra {
        debug_assert!(x < self.width && y < self.height);
        let offset = y as usize * self.stride_bytes as usize + x as usize * 4;
        Bgra {
            b: self.data[offset],
            g: self.data[offset + 1],
            r: self.data[offset + 2],
            a: self.data[offset + 3],
        }
    }
}

/// A heap-owned BGRA frame, as produced by a frame source.
///
/// Each frame is owned exclusively by the capture loop and lent to the
/// pipeline as a [`FrameView`] for the duration of one frame's processing.
#[derive(Debug, Clone)]
pub struct OwnedFrame {
    width: u32,
    height: u32,
    stride_bytes: u32,
    data: Vec<u8>,
}

impl OwnedFrame {
    /// A tightly packed frame filled with a single color.
    pub fn solid(width: u32, height: u32, color: Bgra) -> Self {
        let stride_bytes = width * BYTES_PER_PIXEL;
        let mut data = Vec::with_capacity(stride_bytes as usize * height as usize);
        for _ in 0..width as usize * height as usize {
            data.extend_from_slice(&[color.b, color.g, color.r, color.a]);
        }
        Self {
            width,
            height,
            stride_bytes,
            data,
        }
    }

    /// Convert an RGB raster into a tightly packed BGRA frame.
    pub fn from_rgb(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let mut frame = Self::solid(width, height, Bgra::BLACK);
        for (x, y, pixel) in image.enumerate_pixels() {
            let [r, g, b] = pixel.0;
            frame.put_pixel(x, y, Bgra { b, g, r, a: 255 });
        }
        frame
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, color: Bgra) {
        debug_assert!(x < self.width && y < self.height);
        let offset = y as usize * self.stride_bytes as usize + x as usize * 4;
        self.data[offset] = color.b;
        self.data[offset + 1] = color.g;
        self.data[offset + 2] = color.r;
        self.data[offset + 3] = color.a;
    }

    /// Borrow the frame as a read-only view.
    pub fn view(&self) -> FrameView<'_> {
        // Constructors keep the geometry invariant, so no re-validation.
        FrameView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride_bytes: self.stride_bytes,
        }
    }
}

/// The fixed square window cut from the center of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    /// Left edge in frame coordinates.
    pub x: u32,
    /// Top edge in frame coordinates.
    pub y: u32,
    /// Side length.
    pub size: u32,
}

impl CropRect {
    /// Center a `size`-sided square inside a frame, using floor division.
    ///
    /// Fails with [`DigitlensError::InvalidRegion`] when either frame
    /// dimension is below `size`; the crop never silently truncates.
    pub fn centered(frame_width: u32, frame_height: u32, size: u32) -> DigitlensResult<Self> {
        if frame_width < size || frame_height < size {
            return Err(DigitlensError::invalid_region(
                frame_width,
                frame_height,
                size,
            ));
        }
        Ok(Self {
            x: frame_width / 2 - size / 2,
            y: frame_height / 2 - size / 2,
            size,
        })
    }

    pub fn right(&self) -> u32 {
        self.x + self.size
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_rejects_undersized_buffer() {
        let data = vec![0u8; 10];
        assert!(FrameView::new(&data, 4, 4, 16).is_err());
    }

    #[test]
    fn view_rejects_stride_below_row_width() {
        let data = vec![0u8; 64];
        assert!(FrameView::new(&data, 4, 4, 12).is_err());
    }

    #[test]
    fn view_accepts_padded_stride() {
        // 2x2 frame with 4 bytes of row padding.
        let data = vec![0u8; 12 * 2];
        let view = FrameView::new(&data, 2, 2, 12).unwrap();
        assert_eq!(view.pixel(1, 1), Bgra { b: 0, g: 0, r: 0, a: 0 });
    }

    #[test]
    fn pixel_respects_stride() {
        let mut frame = OwnedFrame::solid(3, 2, Bgra::WHITE);
        frame.put_pixel(2, 1, Bgra { b: 1, g: 2, r: 3, a: 4 });
        let view = frame.view();
        assert_eq!(view.pixel(2, 1), Bgra { b: 1, g: 2, r: 3, a: 4 });
        assert_eq!(view.pixel(0, 0), Bgra::WHITE);
    }

    #[test]
    fn intensity_sum_spans_full_range() {
        assert_eq!(Bgra::BLACK.intensity_sum(), 0);
        assert_eq!(Bgra::WHITE.intensity_sum(), 765);
    }

    #[test]
    fn crop_centered_on_exact_fit_covers_frame() {
        let rect = CropRect::centered(323, 323, 323).unwrap();
        assert_eq!(rect, CropRect { x: 0, y: 0, size: 323 });
        assert_eq!(rect.right(), 323);
        assert_eq!(rect.bottom(), 323);
    }

    #[test]
    fn crop_centered_uses_floor_division() {
        // 640/2 - 161 = 159, 480/2 - 161 = 79
        let rect = CropRect::centered(640, 480, 323).unwrap();
        assert_eq!(rect.x, 159);
        assert_eq!(rect.y, 79);
    }

    #[test]
    fn crop_fails_when_either_dimension_too_small() {
        assert!(CropRect::centered(322, 323, 323).is_err());
        assert!(CropRect::centered(323, 100, 323).is_err());
        let err = CropRect::centered(100, 100, 323).unwrap_err();
        assert!(matches!(
            err,
            digitlens_common::DigitlensError::InvalidRegion { crop_size: 323, .. }
        ));
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn centered_crop_always_lies_inside_frame(
                width in 323u32..4096,
                height in 323u32..4096,
            ) {
                let rect = CropRect::centered(width, height, 323).unwrap();
                prop_assert!(rect.right() <= width);
                prop_assert!(rect.bottom() <= height);
                // Centered to within one pixel of floor division.
                prop_assert!(rect.x.abs_diff(width - rect.right()) <= 1);
                prop_assert!(rect.y.abs_diff(height - rect.bottom()) <= 1);
            }
        }
    }
}
