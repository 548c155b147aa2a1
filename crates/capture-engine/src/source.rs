//! Pull-based frame sources.

use std::path::Path;

use digitlens_common::{DigitlensError, DigitlensResult};
use digitlens_frame_model::{Bgra, OwnedFrame};

/// Trait for frame producers.
///
/// The session pulls one frame at a time; a source that returns `Ok(None)`
/// has ended and the session winds down. Sources own their frames until
/// handed over, matching the one-frame-at-a-time ownership of a camera
/// callback.
pub trait FrameSource: Send {
    /// Produce the next frame, or `None` when the stream has ended.
    fn next_frame(&mut self) -> DigitlensResult<Option<OwnedFrame>>;

    /// Source name for logging.
    fn name(&self) -> &str;
}

/// Synthetic source: white frames with an optional black block, the test
/// pattern equivalent of a digit held up to the camera.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    width: u32,
    height: u32,
    frames_remaining: u64,
    block: Option<BlockSpec>,
}

#[derive(Debug, Clone, Copy)]
struct BlockSpec {
    x: u32,
    y: u32,
    size: u32,
}

impl SyntheticSource {
    pub fn new(frames: u64, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            frames_remaining: frames,
            block: None,
        }
    }

    /// Draw a black `size`-sided block at `(x, y)` in frame coordinates on
    /// every produced frame.
    pub fn with_block(mut self, x: u32, y: u32, size: u32) -> Self {
        self.block = Some(BlockSpec { x, y, size });
        self
    }
}

impl FrameSource for SyntheticSource {
    fn next_frame(&mut self) -> DigitlensResult<Option<OwnedFrame>> {
        if self.frames_remaining == 0 {
            return Ok(None);
        }
        self.frames_remaining -= 1;

        let mut frame = OwnedFrame::solid(self.width, self.height, Bgra::WHITE);
        if let Some(block) = self.block {
            let right = (block.x + block.size).min(self.width);
            let bottom = (block.y + block.size).min(self.height);
            for y in block.y..bottom {
                for x in block.x..right {
                    frame.put_pixel(x, y, Bgra::BLACK);
                }
            }
        }
        Ok(Some(frame))
    }

    fn name(&self) -> &str {
        "synthetic"
    }
}

/// Source that yields a single frame decoded from an image file.
pub struct StillImageSource {
    frame: Option<OwnedFrame>,
    name: String,
}

impl StillImageSource {
    pub fn open(path: impl AsRef<Path>) -> DigitlensResult<Self> {
        let path = path.as_ref();
        let image = image::open(path)
            .map_err(|e| DigitlensError::capture(format!("{}: {e}", path.display())))?
            .to_rgb8();
        Ok(Self {
            frame: Some(OwnedFrame::from_rgb(&image)),
            name: path.display().to_string(),
        })
    }
}

impl FrameSource for StillImageSource {
    fn next_frame(&mut self) -> DigitlensResult<Option<OwnedFrame>> {
        Ok(self.frame.take())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
