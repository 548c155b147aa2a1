//! Digitlens Capture Engine
//!
//! Everything between a frame producer and a display surface:
//!
//! - **Sources:** pull-based [`FrameSource`] implementations (synthetic
//!   patterns, still images)
//! - **Pipeline:** the per-frame stage sequencing preprocessing →
//!   inference → display update
//! - **Display:** percentage-label presentation and last-write-wins sinks
//! - **Session:** [`CaptureSession`] owning source, pipeline, and sink,
//!   running the frame loop as a tokio task with drop-late back-pressure
//!
//! Camera device management stays outside this crate; anything that can
//! hand over BGRA frames can drive the pipeline.

pub mod display;
pub mod pipeline;
pub mod session;
pub mod source;

pub use display::{ConsoleSink, DisplaySink, MemorySink};
pub use pipeline::RecognitionPipeline;
pub use session::{CaptureSession, SessionConfig, SessionState, SessionStats};
pub use source::{FrameSource, StillImageSource, SyntheticSource};
