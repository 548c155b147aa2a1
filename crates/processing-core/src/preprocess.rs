//! Frame preprocessing: crop, ink centroid, and digit normalization.
//!
//! Per frame the preprocessor cuts a fixed square window from the center,
//! classifies dark pixels as ink, and uses the ink centroid to place the
//! downscaled digit on the canvas so the classifier always sees a roughly
//! centered glyph regardless of where it sat in the viewfinder.

use digitlens_common::DigitlensResult;
use digitlens_frame_model::{CropRect, DigitImage, FrameView};
use image::imageops::{self, FilterType};
use image::{GrayImage, Rgb, RgbImage};

/// Tunable parameters of the preprocessing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessConfig {
    /// Side length of the square cropped from the frame center.
    pub crop_size: u32,

    /// Summed-channel (`b + g + r`) threshold below which a pixel is ink.
    pub ink_threshold: u16,

    /// Side length the cropped digit is downscaled to.
    pub content_size: u32,

    /// Side length of the output canvas.
    pub canvas_size: u32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            crop_size: 323,
            ink_threshold: 100,
            content_size: 20,
            canvas_size: DigitImage::SIDE,
        }
    }
}

impl From<&digitlens_common::PipelineDefaults> for PreprocessConfig {
    fn from(defaults: &digitlens_common::PipelineDefaults) -> Self {
        Self {
            crop_size: defaults.crop_size,
            ink_threshold: defaults.ink_threshold,
            content_size: defaults.content_size,
            canvas_size: defaults.canvas_size,
        }
    }
}

/// Accumulated result of the single ink-scan pass over a crop region.
///
/// Coordinates are crop-local.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InkScan {
    sum_x: u64,
    sum_y: u64,
    count: u64,
}

impl InkScan {
    /// Number of pixels classified as ink.
    pub fn ink_pixels(&self) -> u64 {
        self.count
    }

    /// Mean ink position in crop-local coordinates (integer division),
    /// or `None` when the crop contains no ink at all.
    pub fn centroid(&self) -> Option<(u32, u32)> {
        if self.count == 0 {
            return None;
        }
        Some((
            (self.sum_x / self.count) as u32,
            (self.sum_y / self.count) as u32,
        ))
    }
}

/// Turns raw BGRA frames into normalized [`DigitImage`]s.
pub struct FramePreprocessor {
    config: PreprocessConfig,
}

impl FramePreprocessor {
    pub fn new(config: PreprocessConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(PreprocessConfig::default())
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    /// The centered crop window for a frame, failing fast when the frame is
    /// smaller than the crop in either dimension.
    pub fn crop_rect(&self, frame: &FrameView) -> DigitlensResult<CropRect> {
        CropRect::centered(frame.width(), frame.height(), self.config.crop_size)
    }

    /// Single pass over the crop region accumulating ink statistics.
    pub fn scan_ink(&self, frame: &FrameView, rect: CropRect) -> InkScan {
        let mut scan = InkScan::default();
        for y in 0..rect.size {
            for x in 0..rect.size {
                let pixel = frame.pixel(rect.x + x, rect.y + y);
                if pixel.intensity_sum() < self.config.ink_threshold {
                    scan.sum_x += u64::from(x);
                    scan.sum_y += u64::from(y);
                    scan.count += 1;
                }
            }
        }
        scan
    }

    /// Signed per-axis offset of a crop-local centroid from the content
    /// center, in downscaled-canvas pixels.
    ///
    /// The crop-to-content scale is `content_size / crop_size` (~0.061 for
    /// the 20/323 defaults); subtracting half the content size converts the
    /// scaled position into a distance from center.
    pub fn centroid_offset(&self, centroid: (u32, u32)) -> (f64, f64) {
        let scale = f64::from(self.config.content_size) / f64::from(self.config.crop_size);
        let half_content = f64::from(self.config.content_size) / 2.0;
        (
            f64::from(centroid.0) * scale - half_content,
            f64::from(centroid.1) * scale - half_content,
        )
    }

    /// Canvas position for one axis given the centroid offset on that axis.
    ///
    /// An offset inside the margin maps linearly (`4 - offset` for the
    /// defaults); anything beyond is pinned to the near or far edge, giving
    /// the digit an 8-pixel range of motion on the canvas.
    pub fn placement(&self, offset: f64) -> u32 {
        let margin = self.config.canvas_size - self.config.content_size;
        let center = f64::from(margin) / 2.0;
        (center - offset).round().clamp(0.0, f64::from(margin)) as u32
    }

    /// Default placement used when the crop contains no ink: digit content
    /// centered on the canvas.
    pub fn default_placement(&self) -> (u32, u32) {
        let center = (self.config.canvas_size - self.config.content_size) / 2;
        (center, center)
    }

    /// Inverted-grayscale rendition of the crop region, full resolution.
    ///
    /// This is the preview surface shown next to the viewfinder: ink is
    /// bright, background dark, exactly what the classifier input looks
    /// like before downscaling.
    pub fn preview(&self, frame: &FrameView) -> DigitlensResult<GrayImage> {
        let rect = self.crop_rect(frame)?;
        Ok(self.inverted_grayscale(frame, rect))
    }

    /// Full preprocessing: crop, centroid, normalize to a [`DigitImage`].
    pub fn preprocess(&self, frame: &FrameView) -> DigitlensResult<DigitImage> {
        let rect = self.crop_rect(frame)?;

        let scan = self.scan_ink(frame, rect);
        let (px, py) = match scan.centroid() {
            Some(centroid) => {
                let (ox, oy) = self.centroid_offset(centroid);
                tracing::trace!(
                    centroid_x = centroid.0,
                    centroid_y = centroid.1,
                    offset_x = ox,
                    offset_y = oy,
                    ink_pixels = scan.ink_pixels(),
                    "Ink centroid"
                );
                (self.placement(ox), self.placement(oy))
            }
            None => self.default_placement(),
        };

        let gray = self.inverted_grayscale(frame, rect);
        let content = imageops::resize(
            &gray,
            self.config.content_size,
            self.config.content_size,
            FilterType::Lanczos3,
        );

        let mut canvas = GrayImage::new(self.config.canvas_size, self.config.canvas_size);
        imageops::overlay(&mut canvas, &content, i64::from(px), i64::from(py));
        // The classifier contract inherits the bottom-left-origin canvas of
        // the training pipeline; flipping here keeps predictions upright.
        imageops::flip_vertical_in_place(&mut canvas);

        DigitImage::from_canvas(canvas)
    }

    fn inverted_grayscale(&self, frame: &FrameView, rect: CropRect) -> GrayImage {
        let mut crop = RgbImage::new(rect.size, rect.size);
        for y in 0..rect.size {
            for x in 0..rect.size {
                let pixel = frame.pixel(rect.x + x, rect.y + y);
                crop.put_pixel(x, y, Rgb([pixel.r, pixel.g, pixel.b]));
            }
        }
        let mut gray = imageops::grayscale(&crop);
        imageops::invert(&mut gray);
        gray
    }
}
