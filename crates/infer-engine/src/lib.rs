//! Digitlens Inference Engine
//!
//! The boundary between the recognition pipeline and whatever model backs
//! it. The pipeline only ever sees:
//!
//! - [`DigitClassifier`] — a synchronous, object-safe trait any model
//!   implementation plugs into
//! - [`InferenceHandle`] — the async dispatcher that runs classification on
//!   a blocking execution context and validates model output
//!
//! Model weights, file formats, and accelerators are the implementation's
//! business; the contract is shape-only (28x28x1 in, ten confidences out).

pub mod classifier;
pub mod handle;

pub use classifier::{DigitClassifier, UniformClassifier};
pub use handle::InferenceHandle;
