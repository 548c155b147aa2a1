//! The digit classifier trait and the built-in placeholder.

use digitlens_common::DigitlensResult;
use digitlens_frame_model::{ConfidenceVector, DigitImage};

/// Trait for digit classification backends.
///
/// Implementations take the normalized 28x28 inverted-grayscale digit image
/// and score each of the ten digit classes. `classify` is synchronous;
/// blocking model work stays inside the implementation, and the
/// [`crate::InferenceHandle`] moves the whole call onto a blocking execution
/// context.
pub trait DigitClassifier: Send + Sync {
    /// Score the digit image. Fails with an inference error when the model
    /// cannot process the input.
    fn classify(&self, image: &DigitImage) -> DigitlensResult<ConfidenceVector>;

    /// Backend name for logging.
    fn name(&self) -> &str;
}

/// Placeholder classifier assigning every class the same confidence.
///
/// Stands in where no trained model is wired up, so the pipeline and demo
/// tooling run end to end without model weights.
#[derive(Debug, Default, Clone, Copy)]
pub struct UniformClassifier;

impl DigitClassifier for UniformClassifier {
    fn classify(&self, _image: &DigitImage) -> DigitlensResult<ConfidenceVector> {
        Ok(ConfidenceVector::uniform())
    }

    fn name(&self) -> &str {
        "uniform"
    }
}
