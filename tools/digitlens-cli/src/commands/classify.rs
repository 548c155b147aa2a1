//! Classify the digit in a still image.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use digitlens_capture_engine::display::{format_confidence_labels, format_top_label};
use digitlens_capture_engine::{FrameSource, RecognitionPipeline, StillImageSource};
use digitlens_common::{AppConfig, DisplayMode};
use digitlens_frame_model::DisplayKind;
use digitlens_infer_engine::UniformClassifier;
use digitlens_processing_core::PreprocessConfig;
use serde::Serialize;

#[derive(Serialize)]
struct ClassifyReport {
    image: String,
    digit: u8,
    confidence: f32,
    // Absent in --top mode; an empty list would read as all-zero output.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    confidences: Vec<f32>,
}

pub async fn run(image: PathBuf, top: bool, json: bool) -> anyhow::Result<()> {
    let config = AppConfig::load();
    let mode = if top {
        DisplayMode::TopDigit
    } else {
        DisplayMode::Confidences
    };

    let mut source = StillImageSource::open(&image)?;
    let frame = source
        .next_frame()?
        .context("Image source produced no frame")?;

    tracing::info!(
        image = %image.display(),
        width = frame.width(),
        height = frame.height(),
        "Classifying still image"
    );

    // No trained model is bundled; the uniform placeholder keeps the
    // pipeline runnable end to end.
    let pipeline = RecognitionPipeline::new(
        PreprocessConfig::from(&config.pipeline),
        Arc::new(UniformClassifier),
        mode,
    );
    let update = pipeline.process_frame(&frame.view(), 0).await?;

    match update.kind {
        DisplayKind::Confidences(vector) => {
            if json {
                let (digit, confidence) = vector.top_digit();
                let report = ClassifyReport {
                    image: image.display().to_string(),
                    digit,
                    confidence,
                    confidences: vector.values().to_vec(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                for label in format_confidence_labels(&vector) {
                    println!("{label}");
                }
            }
        }
        DisplayKind::TopDigit { digit, confidence } => {
            if json {
                let report = ClassifyReport {
                    image: image.display().to_string(),
                    digit,
                    confidence,
                    confidences: Vec::new(),
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", format_top_label(digit, confidence));
            }
        }
    }

    Ok(())
}
