//! Error types shared across Digitlens crates.

/// Top-level error type for Digitlens operations.
#[derive(Debug, thiserror::Error)]
pub enum DigitlensError {
    /// The fixed-size crop region does not fit inside the source frame.
    #[error(
        "Crop region of {crop_size}x{crop_size} does not fit inside \
         {frame_width}x{frame_height} frame"
    )]
    InvalidRegion {
        frame_width: u32,
        frame_height: u32,
        crop_size: u32,
    },

    #[error("Frame error: {message}")]
    Frame { message: String },

    #[error("Capture error: {message}")]
    Capture { message: String },

    #[error("Preprocessing error: {message}")]
    Preprocess { message: String },

    #[error("Inference error: {message}")]
    Inference { message: String },

    #[error("Display error: {message}")]
    Display { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using DigitlensError.
pub type DigitlensResult<T> = Result<T, DigitlensError>;

impl DigitlensError {
    pub fn invalid_region(frame_width: u32, frame_height: u32, crop_size: u32) -> Self {
        Self::InvalidRegion {
            frame_width,
            frame_height,
            crop_size,
        }
    }

    pub fn frame(msg: impl Into<String>) -> Self {
        Self::Frame {
            message: msg.into(),
        }
    }

    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture {
            message: msg.into(),
        }
    }

    pub fn preprocess(msg: impl Into<String>) -> Self {
        Self::Preprocess {
            message: msg.into(),
        }
    }

    pub fn inference(msg: impl Into<String>) -> Self {
        Self::Inference {
            message: msg.into(),
        }
    }

    pub fn display(msg: impl Into<String>) -> Self {
        Self::Display {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Whether a failure is scoped to a single frame.
    ///
    /// Per-frame failures are swallowed by the frame loop: a fresh frame
    /// arrives imminently and stale retries provide no value.
    pub fn is_per_frame(&self) -> bool {
        matches!(
            self,
            Self::InvalidRegion { .. } | Self::Preprocess { .. } | Self::Inference { .. }
        )
    }
}
