//! Video source abstraction.
//!
//! The compositor only needs four things from a video: its dimensions, its
//! frame count, and random access to decoded frames. [`VideoSource`] captures
//! exactly that, so any decoding backend can feed a sheet.
//! [`FfmpegSource`](crate::FfmpegSource) is the FFmpeg-backed implementation;
//! [`SyntheticSource`] generates deterministic frames in memory.

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};

use crate::error::ThumbnailError;

/// Random-access reader of decoded RGB frames.
pub trait VideoSource {
    /// Intrinsic frame width in pixels.
    fn width(&self) -> u32;

    /// Intrinsic frame height in pixels.
    fn height(&self) -> u32;

    /// Number of frames available for sampling.
    fn frame_count(&self) -> u64;

    /// Seek to `index` and decode that frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the seek or the decode fails. The compositor
    /// reports any failure as
    /// [`ThumbnailError::CannotDecodeFrame`].
    fn frame_at(&mut self, index: u64) -> Result<RgbImage, ThumbnailError>;

    /// Location of the video, used in error messages.
    fn path(&self) -> &Path;
}

/// In-memory source producing a deterministic gradient per frame.
///
/// Pixel `(x, y)` of frame `n` is `(x + n, y + 2n, x + y + 3n)` modulo 256,
/// so every frame differs from its neighbours and two sources with the same
/// parameters always agree. Useful for tests and benchmarks that must not
/// depend on FFmpeg fixtures.
///
/// # Example
///
/// ```
/// use vidsheet::{SyntheticSource, ThumbnailConfig};
///
/// let mut source = SyntheticSource::new(64, 36, 100);
/// let config = ThumbnailConfig::new().with_cell_max_size(32, 32);
/// let sheet = vidsheet::build_thumbnail(&mut source, &config, None)?;
/// assert_eq!(sheet.width(), 20 + 4 * (56 + 20));
/// # Ok::<(), vidsheet::ThumbnailError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    width: u32,
    height: u32,
    frame_count: u64,
    failing_frame: Option<u64>,
    path: PathBuf,
    reads: Vec<u64>,
}

impl SyntheticSource {
    /// Create a source of `frame_count` frames, each `width` x `height`.
    pub fn new(width: u32, height: u32, frame_count: u64) -> Self {
        Self {
            width,
            height,
            frame_count,
            failing_frame: None,
            path: PathBuf::from("synthetic"),
            reads: Vec::new(),
        }
    }

    /// Make [`frame_at`](VideoSource::frame_at) fail for `index`.
    #[must_use]
    pub fn failing_at(mut self, index: u64) -> Self {
        self.failing_frame = Some(index);
        self
    }

    /// Report `path` as the source location.
    #[must_use]
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.path = path.as_ref().to_path_buf();
        self
    }

    /// Frame indices requested so far, in call order.
    pub fn reads(&self) -> &[u64] {
        &self.reads
    }

    /// The frame that [`frame_at`](VideoSource::frame_at) returns for `index`.
    pub fn render_frame(&self, index: u64) -> RgbImage {
        let shift = (index % 256) as u32;
        RgbImage::from_fn(self.width, self.height, |x, y| {
            Rgb([
                ((x + shift) % 256) as u8,
                ((y + 2 * shift) % 256) as u8,
                ((x + y + 3 * shift) % 256) as u8,
            ])
        })
    }
}

impl VideoSource for SyntheticSource {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn frame_count(&self) -> u64 {
        self.frame_count
    }

    fn frame_at(&mut self, index: u64) -> Result<RgbImage, ThumbnailError> {
        self.reads.push(index);
        if self.failing_frame == Some(index) || index >= self.frame_count {
            return Err(ThumbnailError::CannotDecodeFrame {
                path: self.path.clone(),
                frame_index: index,
                reason: "no frame at this index".to_string(),
            });
        }
        Ok(self.render_frame(index))
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
