//! Async dispatch of classification onto a blocking execution context.

use std::sync::Arc;

use digitlens_common::{DigitlensError, DigitlensResult};
use digitlens_frame_model::{ConfidenceVector, DigitImage};

use crate::classifier::DigitClassifier;

/// Shared, cloneable handle that runs a [`DigitClassifier`] off the caller's
/// task.
///
/// Preprocessing is synchronous CPU work on the frame loop; model inference
/// may stall on dedicated hardware or a large forward pass, so each call is
/// moved onto tokio's blocking pool. The caller awaits the result and
/// resumes on its own context, which keeps display updates on whatever task
/// originated the request.
#[derive(Clone)]
pub struct InferenceHandle {
    classifier: Arc<dyn DigitClassifier>,
}

impl InferenceHandle {
    pub fn new(classifier: Arc<dyn DigitClassifier>) -> Self {
        Self { classifier }
    }

    /// Backend name for logging.
    pub fn name(&self) -> &str {
        self.classifier.name()
    }

    /// Classify a digit image on the blocking pool.
    ///
    /// Model failures and a panicked or cancelled blocking task all surface
    /// as inference errors; callers treat them as per-frame and move on.
    pub async fn classify(&self, image: DigitImage) -> DigitlensResult<ConfidenceVector> {
        let classifier = Arc::clone(&self.classifier);
        let result = tokio::task::spawn_blocking(move || classifier.classify(&image))
            .await
            .map_err(|e| DigitlensError::inference(format!("Inference task failed: {e}")))?;

        match &result {
            Ok(vector) => {
                let (digit, confidence) = vector.top_digit();
                tracing::debug!(backend = %self.classifier.name(), digit, confidence, "Classified digit");
            }
            Err(e) => {
                tracing::debug!(backend = %self.classifier.name(), error = %e, "Classification failed");
            }
        }
        result
    }
}
