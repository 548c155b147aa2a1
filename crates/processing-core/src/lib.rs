//! Digitlens Processing Core — Frame Preprocessing
//!
//! Turns a raw BGRA camera frame into the classifier's 28x28 input:
//! - **Crop:** a fixed 323x323 window cut from the frame center
//! - **Ink scan:** centroid of pixels darker than the ink threshold
//! - **Normalize:** inverted grayscale, Lanczos downscale to ~20x20,
//!   centroid-driven placement on the 28x28 canvas
//!
//! This crate is pure computation — no I/O, no platform dependencies.
//! All inputs are data; all outputs are data.

pub mod preprocess;

pub use preprocess::{FramePreprocessor, InkScan, PreprocessConfig};
