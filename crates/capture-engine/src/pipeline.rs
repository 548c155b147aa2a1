//! The per-frame recognition stage: preprocess, infer, build the update.

use std::sync::Arc;

use digitlens_common::{DigitlensResult, DisplayMode};
use digitlens_frame_model::{ConfidenceVector, DisplayUpdate, FrameView};
use digitlens_infer_engine::{DigitClassifier, InferenceHandle};
use digitlens_processing_core::{FramePreprocessor, PreprocessConfig};

/// Sequences one frame through preprocessing and inference, producing the
/// display update the configured mode calls for.
///
/// Preprocessing is synchronous CPU work on the calling task; the only
/// suspension point is the inference call.
pub struct RecognitionPipeline {
    preprocessor: FramePreprocessor,
    inference: InferenceHandle,
    display_mode: DisplayMode,
}

impl RecognitionPipeline {
    pub fn new(
        config: PreprocessConfig,
        classifier: Arc<dyn DigitClassifier>,
        display_mode: DisplayMode,
    ) -> Self {
        Self {
            preprocessor: FramePreprocessor::new(config),
            inference: InferenceHandle::new(classifier),
            display_mode,
        }
    }

    pub fn preprocessor(&self) -> &FramePreprocessor {
        &self.preprocessor
    }

    pub fn inference(&self) -> &InferenceHandle {
        &self.inference
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    /// Process one frame end to end.
    pub async fn process_frame(
        &self,
        frame: &FrameView<'_>,
        seq: u64,
    ) -> DigitlensResult<DisplayUpdate> {
        let digit = self.preprocessor.preprocess(frame)?;
        let vector = self.inference.classify(digit).await?;
        Ok(make_update(self.display_mode, seq, vector))
    }
}

/// Build the display update the given mode calls for.
pub(crate) fn make_update(
    mode: DisplayMode,
    seq: u64,
    vector: ConfidenceVector,
) -> DisplayUpdate {
    match mode {
        DisplayMode::Confidences => DisplayUpdate::confidences(seq, vector),
        DisplayMode::TopDigit => DisplayUpdate::top_digit(seq, vector),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digitlens_frame_model::{Bgra, DisplayKind, OwnedFrame};
    use digitlens_infer_engine::UniformClassifier;

    fn pipeline(mode: DisplayMode) -> RecognitionPipeline {
        RecognitionPipeline::new(PreprocessConfig::default(), Arc::new(UniformClassifier), mode)
    }

    #[tokio::test]
    async fn confidences_mode_carries_full_vector() {
        let frame = OwnedFrame::solid(323, 323, Bgra::WHITE);
        let update = pipeline(DisplayMode::Confidences)
            .process_frame(&frame.view(), 7)
            .await
            .unwrap();
        assert_eq!(update.seq, 7);
        assert!(matches!(update.kind, DisplayKind::Confidences(_)));
    }

    #[tokio::test]
    async fn top_digit_mode_reduces_to_argmax() {
        let frame = OwnedFrame::solid(323, 323, Bgra::WHITE);
        let update = pipeline(DisplayMode::TopDigit)
            .process_frame(&frame.view(), 0)
            .await
            .unwrap();
        // Uniform classifier ties everywhere; lowest index wins.
        assert!(matches!(
            update.kind,
            DisplayKind::TopDigit { digit: 0, .. }
        ));
    }

    #[tokio::test]
    async fn undersized_frame_fails_with_invalid_region() {
        let frame = OwnedFrame::solid(100, 100, Bgra::WHITE);
        let err = pipeline(DisplayMode::Confidences)
            .process_frame(&frame.view(), 0)
            .await
            .unwrap_err();
        assert!(err.is_per_frame());
    }
}
