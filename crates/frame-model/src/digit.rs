//! The normalized digit image handed to the classifier.

use digitlens_common::{DigitlensError, DigitlensResult};
use image::GrayImage;

/// A fixed 28x28 single-channel digit image.
///
/// Grayscale is inverted relative to the source frame: ink is bright,
/// background is dark, matching the orientation and polarity the classifier
/// was trained on. The digit content occupies roughly a 20x20 area placed
/// according to the ink centroid.
#[derive(Debug, Clone, PartialEq)]
pub struct DigitImage {
    canvas: GrayImage,
}

impl DigitImage {
    /// Canvas side length expected by the classifier.
    pub const SIDE: u32 = 28;

    /// Number of pixels in the flattened tensor.
    pub const PIXELS: usize = (Self::SIDE * Self::SIDE) as usize;

    /// Wrap a finished canvas, validating the shape contract.
    pub fn from_canvas(canvas: GrayImage) -> DigitlensResult<Self> {
        let (width, height) = canvas.dimensions();
        if width != Self::SIDE || height != Self::SIDE {
            return Err(DigitlensError::preprocess(format!(
                "Digit canvas must be {side}x{side}, got {width}x{height}",
                side = Self::SIDE
            )));
        }
        Ok(Self { canvas })
    }

    /// An all-background (blank) digit image.
    pub fn blank() -> Self {
        Self {
            canvas: GrayImage::new(Self::SIDE, Self::SIDE),
        }
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.canvas
    }

    /// Flatten to a row-major `f32` tensor normalized to `[0, 1]`.
    ///
    /// This is the 28x28x1 input shape of the inference contract.
    pub fn to_tensor(&self) -> Vec<f32> {
        self.canvas
            .as_raw()
            .iter()
            .map(|&v| f32::from(v) / 255.0)
            .collect()
    }

    /// Whether the canvas contains any non-background pixel.
    pub fn is_blank(&self) -> bool {
        self.canvas.as_raw().iter().all(|&v| v == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn rejects_wrong_dimensions() {
        assert!(DigitImage::from_canvas(GrayImage::new(20, 20)).is_err());
        assert!(DigitImage::from_canvas(GrayImage::new(28, 27)).is_err());
        assert!(DigitImage::from_canvas(GrayImage::new(28, 28)).is_ok());
    }

    #[test]
    fn tensor_is_normalized_row_major() {
        let mut canvas = GrayImage::new(28, 28);
        canvas.put_pixel(1, 0, Luma([255]));
        canvas.put_pixel(0, 1, Luma([51]));
        let digit = DigitImage::from_canvas(canvas).unwrap();

        let tensor = digit.to_tensor();
        assert_eq!(tensor.len(), DigitImage::PIXELS);
        assert!((tensor[1] - 1.0).abs() < 1e-6);
        assert!((tensor[28] - 0.2).abs() < 1e-6);
        assert_eq!(tensor[0], 0.0);
    }

    #[test]
    fn blank_is_blank() {
        assert!(DigitImage::blank().is_blank());
    }
}
