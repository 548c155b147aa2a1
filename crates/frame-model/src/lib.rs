//! Digitlens Frame Model
//!
//! Core data types shared by the recognition pipeline:
//! - **Frames:** bounds-checked views over BGRA pixel buffers
//! - **Crop regions:** the fixed square window cut from the frame center
//! - **Digit images:** the 28x28 inverted-grayscale classifier input
//! - **Confidence vectors:** per-digit model output
//!
//! This crate is pure data — no I/O, no platform dependencies.

pub mod confidence;
pub mod digit;
pub mod display;
pub mod frame;

pub use confidence::ConfidenceVector;
pub use digit::DigitImage;
pub use display::{DisplayKind, DisplayUpdate};
pub use frame::{Bgra, CropRect, FrameView, OwnedFrame};
