//! Error types for the `vidsheet` crate.
//!
//! This module defines [`ThumbnailError`], the unified error type returned by
//! all fallible operations in the crate. Errors carry the offending path and
//! frame index where one exists, so a message is useful without extra logging
//! at the call site.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `vidsheet` operations.
///
/// Every error is terminal for the video being processed. Batch runs record
/// the error against the item and carry on with the remaining files.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ThumbnailError {
    /// The path does not carry a recognised video file extension.
    #[error("{path} is not a video file")]
    NotAVideoFile {
        /// Path that was rejected.
        path: PathBuf,
    },

    /// The video could not be opened, or it reports nothing to sample.
    #[error("Cannot open {path}: {reason}")]
    CannotOpenSource {
        /// Path of the video.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// Seeking to or decoding a sampled frame failed.
    #[error("Cannot read frame {frame_index} from {path}: {reason}")]
    CannotDecodeFrame {
        /// Path of the video.
        path: PathBuf,
        /// The sampled frame index that failed.
        frame_index: u64,
        /// Underlying reason the decode failed.
        reason: String,
    },

    /// A configuration value is out of its accepted range.
    #[error("Invalid {field}: {value}")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: String,
    },

    /// The input path does not exist.
    #[error("{} does not exist", .0.display())]
    PathNotFound(PathBuf),

    /// More frames were handed to the compositor than the grid has cells.
    #[error("Too many cells: the grid only holds {cells}")]
    TooManyCellsAppended {
        /// The configured cell count.
        cells: u32,
    },

    /// A font could not be read or parsed.
    #[error("Failed to load font: {0}")]
    FontLoad(String),

    /// The batch worker pool could not be started.
    #[error("Failed to start worker pool: {0}")]
    WorkerPool(String),

    /// The operation was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate while building or encoding the sheet.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}

impl From<FfmpegError> for ThumbnailError {
    fn from(error: FfmpegError) -> Self {
        ThumbnailError::FfmpegError(error.to_string())
    }
}

impl ThumbnailError {
    /// Shorthand for an [`InvalidConfig`](ThumbnailError::InvalidConfig) error.
    pub(crate) fn invalid_config(field: &'static str, value: impl ToString) -> Self {
        ThumbnailError::InvalidConfig {
            field,
            value: value.to_string(),
        }
    }
}
