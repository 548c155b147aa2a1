//! Capture session: owns the frame loop from source to display sink.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use digitlens_common::{DigitlensError, DigitlensResult, DisplayMode, PipelineDefaults};
use digitlens_frame_model::DisplayUpdate;
use digitlens_infer_engine::{DigitClassifier, InferenceHandle};
use digitlens_processing_core::{FramePreprocessor, PreprocessConfig};
use serde::Serialize;
use tokio::sync::mpsc;

use crate::display::DisplaySink;
use crate::pipeline::make_update;
use crate::source::FrameSource;

/// Configuration for a capture session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Preprocessing parameters.
    pub preprocess: PreprocessConfig,

    /// What the display sink receives.
    pub display_mode: DisplayMode,

    /// Maximum number of concurrently in-flight classifications. Frames
    /// arriving while at the limit are dropped, never queued.
    pub max_in_flight: usize,

    /// Optional pacing between frame pulls, emulating a camera tick.
    pub frame_interval: Option<Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_defaults(&PipelineDefaults::default())
    }
}

impl SessionConfig {
    pub fn from_defaults(defaults: &PipelineDefaults) -> Self {
        Self {
            preprocess: PreprocessConfig::from(defaults),
            display_mode: defaults.display_mode,
            max_in_flight: defaults.max_in_flight.max(1),
            frame_interval: None,
        }
    }
}

/// State of a capture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Session created but not started.
    Idle,
    /// Frame loop running.
    Running,
    /// Frame loop finished or stopped.
    Stopped,
}

/// Counters kept by the frame loop.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SessionStats {
    /// Frames pulled from the source.
    pub frames_seen: u64,

    /// Frames classified and delivered to the sink.
    pub frames_processed: u64,

    /// Frames dropped by the busy back-pressure policy.
    pub frames_dropped: u64,

    /// Frames that failed preprocessing or inference (swallowed per-frame).
    pub frames_failed: u64,
}

impl SessionStats {
    /// Drop rate as a percentage of frames seen.
    pub fn drop_rate(&self) -> f64 {
        if self.frames_seen == 0 {
            return 0.0;
        }
        self.frames_dropped as f64 / self.frames_seen as f64 * 100.0
    }
}

struct LoopParts {
    source: Box<dyn FrameSource>,
    sink: Box<dyn DisplaySink>,
    classifier: Arc<dyn DigitClassifier>,
}

/// A session that pulls frames from a source, runs recognition, and feeds a
/// display sink.
///
/// Constructed once with all collaborators, started explicitly, and torn
/// down explicitly; `stop()` returns the loop's final statistics.
pub struct CaptureSession {
    config: SessionConfig,
    state: SessionState,
    stop_flag: Arc<AtomicBool>,
    parts: Option<LoopParts>,
    task: Option<tokio::task::JoinHandle<DigitlensResult<SessionStats>>>,
}

impl CaptureSession {
    pub fn new(
        config: SessionConfig,
        source: Box<dyn FrameSource>,
        classifier: Arc<dyn DigitClassifier>,
        sink: Box<dyn DisplaySink>,
    ) -> Self {
        Self {
            config,
            state: SessionState::Idle,
            stop_flag: Arc::new(AtomicBool::new(false)),
            parts: Some(LoopParts {
                source,
                sink,
                classifier,
            }),
            task: None,
        }
    }

    /// Current session state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Start the frame loop as a background task.
    pub fn start(&mut self) -> DigitlensResult<()> {
        if self.state != SessionState::Idle {
            return Err(DigitlensError::capture("Session already started"));
        }
        let parts = self
            .parts
            .take()
            .ok_or_else(|| DigitlensError::capture("Session collaborators already consumed"))?;

        tracing::info!(
            source = %parts.source.name(),
            classifier = %parts.classifier.name(),
            max_in_flight = self.config.max_in_flight,
            "Starting capture session"
        );

        let config = self.config.clone();
        let stop_flag = self.stop_flag.clone();
        self.task = Some(tokio::spawn(run_loop(config, parts, stop_flag)));
        self.state = SessionState::Running;
        Ok(())
    }

    /// Stop the frame loop and collect its statistics.
    pub async fn stop(&mut self) -> DigitlensResult<SessionStats> {
        if self.state != SessionState::Running {
            return Err(DigitlensError::capture("Session not running"));
        }
        self.stop_flag.store(true, Ordering::SeqCst);

        let task = self
            .task
            .take()
            .ok_or_else(|| DigitlensError::capture("Session task missing"))?;
        let stats = task
            .await
            .map_err(|e| DigitlensError::capture(format!("Frame loop task failed: {e}")))??;

        self.state = SessionState::Stopped;
        tracing::info!(
            frames_seen = stats.frames_seen,
            frames_processed = stats.frames_processed,
            frames_dropped = stats.frames_dropped,
            frames_failed = stats.frames_failed,
            "Capture session stopped"
        );
        Ok(stats)
    }

    /// Wait for the source to end on its own (finite sources), then collect
    /// statistics.
    pub async fn run_to_completion(&mut self) -> DigitlensResult<SessionStats> {
        if self.state != SessionState::Running {
            return Err(DigitlensError::capture("Session not running"));
        }
        let task = self
            .task
            .take()
            .ok_or_else(|| DigitlensError::capture("Session task missing"))?;
        let stats = task
            .await
            .map_err(|e| DigitlensError::capture(format!("Frame loop task failed: {e}")))??;
        self.state = SessionState::Stopped;
        Ok(stats)
    }

    /// Get a clone of the stop flag for external coordination.
    pub fn stop_flag(&self) -> Arc<AtomicBool> {
        self.stop_flag.clone()
    }
}

struct TaskOutcome {
    seq: u64,
    result: DigitlensResult<DisplayUpdate>,
}

async fn run_loop(
    config: SessionConfig,
    parts: LoopParts,
    stop_flag: Arc<AtomicBool>,
) -> DigitlensResult<SessionStats> {
    let LoopParts {
        mut source,
        mut sink,
        classifier,
    } = parts;

    let preprocessor = FramePreprocessor::new(config.preprocess);
    let inference = InferenceHandle::new(classifier);
    let (tx, mut rx) = mpsc::unbounded_channel::<TaskOutcome>();

    let mut stats = SessionStats::default();
    let mut in_flight: usize = 0;
    let mut next_seq: u64 = 0;

    while !stop_flag.load(Ordering::Relaxed) {
        // Deliver any completed classifications first.
        while let Ok(outcome) = rx.try_recv() {
            in_flight -= 1;
            deliver(&mut *sink, &mut stats, outcome);
        }

        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                tracing::debug!(source = %source.name(), "Frame source ended");
                break;
            }
            Err(e) => {
                tracing::error!(source = %source.name(), error = %e, "Frame source failed");
                return Err(e);
            }
        };
        stats.frames_seen += 1;

        // Drop-late policy: never queue behind a busy classifier.
        if in_flight >= config.max_in_flight {
            stats.frames_dropped += 1;
            pace(config.frame_interval).await;
            continue;
        }

        match preprocessor.preprocess(&frame.view()) {
            Ok(digit) => {
                let seq = next_seq;
                next_seq += 1;
                in_flight += 1;

                let inference = inference.clone();
                let tx = tx.clone();
                let mode = config.display_mode;
                tokio::spawn(async move {
                    let result = inference
                        .classify(digit)
                        .await
                        .map(|vector| make_update(mode, seq, vector));
                    // The receiver only closes when the loop is gone.
                    let _ = tx.send(TaskOutcome { seq, result });
                });
            }
            Err(e) if e.is_per_frame() => {
                tracing::warn!(error = %e, "Skipping frame");
                stats.frames_failed += 1;
            }
            Err(e) => return Err(e),
        }

        pace(config.frame_interval).await;
    }

    // Drain in-flight classifications before reporting.
    drop(tx);
    while let Some(outcome) = rx.recv().await {
        deliver(&mut *sink, &mut stats, outcome);
    }

    Ok(stats)
}

fn deliver(sink: &mut dyn DisplaySink, stats: &mut SessionStats, outcome: TaskOutcome) {
    match outcome.result {
        Ok(update) => {
            sink.present(&update);
            stats.frames_processed += 1;
        }
        Err(e) => {
            tracing::warn!(seq = outcome.seq, error = %e, "Skipping display update");
            stats.frames_failed += 1;
        }
    }
}

async fn pace(interval: Option<Duration>) {
    match interval {
        Some(interval) => tokio::time::sleep(interval).await,
        // Yield so spawned classifications get polled between frames.
        None => tokio::task::yield_now().await,
    }
}
