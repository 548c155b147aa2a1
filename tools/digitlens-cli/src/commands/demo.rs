//! Run a recognition session over synthetic frames.

use std::sync::Arc;
use std::time::Duration;

use digitlens_capture_engine::{CaptureSession, ConsoleSink, SessionConfig, SyntheticSource};
use digitlens_common::{AppConfig, DisplayMode};
use digitlens_infer_engine::UniformClassifier;
use digitlens_processing_core::PreprocessConfig;

pub async fn run(
    frames: u64,
    width: u32,
    height: u32,
    interval_ms: u64,
    top: bool,
) -> anyhow::Result<()> {
    let config = AppConfig::load();

    // Draw a block in the upper-left quadrant of the crop so the centroid
    // logic has something to chase.
    let crop = config.pipeline.crop_size;
    let block_size = crop / 8;
    let block_x = (width / 2).saturating_sub(crop / 4);
    let block_y = (height / 2).saturating_sub(crop / 4);
    let source =
        SyntheticSource::new(frames, width, height).with_block(block_x, block_y, block_size);

    let session_config = SessionConfig {
        preprocess: PreprocessConfig::from(&config.pipeline),
        display_mode: if top {
            DisplayMode::TopDigit
        } else {
            config.pipeline.display_mode
        },
        max_in_flight: config.pipeline.max_in_flight.max(1),
        frame_interval: (interval_ms > 0).then(|| Duration::from_millis(interval_ms)),
    };

    let mut session = CaptureSession::new(
        session_config,
        Box::new(source),
        Arc::new(UniformClassifier),
        Box::new(ConsoleSink::default()),
    );
    session.start()?;
    let stats = session.run_to_completion().await?;

    println!();
    println!("Frames seen:      {}", stats.frames_seen);
    println!("Frames processed: {}", stats.frames_processed);
    println!("Frames dropped:   {}", stats.frames_dropped);
    println!("Frames failed:    {}", stats.frames_failed);
    println!("Drop rate:        {:.1}%", stats.drop_rate());

    Ok(())
}
