//! FFmpeg-backed [`VideoSource`].
//!
//! [`FfmpegSource`] opens a media file, picks its best video stream and
//! caches the dimensions and frame count. Each
//! [`frame_at`](VideoSource::frame_at) call builds a fresh decoder, seeks to
//! the nearest keyframe at or before the requested index, and decodes forward
//! until the frame is reached.
//!
//! FFmpeg keeps its own log separate from the Rust [`log`] facade;
//! [`set_ffmpeg_log_level`] lines the two up.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
};

use ffmpeg_next::{
    Rational,
    codec::context::Context as CodecContext,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
    util::log::Level,
};
use image::RgbImage;
use log::LevelFilter;

use crate::{error::ThumbnailError, source::VideoSource, utilities};

/// A video file opened through FFmpeg.
///
/// # Example
///
/// ```no_run
/// use vidsheet::{FfmpegSource, ThumbnailError, VideoSource};
///
/// let mut source = FfmpegSource::open("input.mp4")?;
/// println!("{}x{}, {} frames", source.width(), source.height(), source.frame_count());
/// let first = source.frame_at(0)?;
/// first.save("first_frame.png")?;
/// # Ok::<(), ThumbnailError>(())
/// ```
pub struct FfmpegSource {
    input_context: Input,
    video_stream_index: usize,
    width: u32,
    height: u32,
    frame_count: u64,
    frames_per_second: f64,
    time_base: Rational,
    /// Presentation timestamp of the stream's first frame, in `time_base`.
    start_pts: i64,
    path: PathBuf,
}

impl Debug for FfmpegSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FfmpegSource")
            .field("path", &self.path)
            .field("video_stream_index", &self.video_stream_index)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("frame_count", &self.frame_count)
            .field("frames_per_second", &self.frames_per_second)
            .finish_non_exhaustive()
    }
}

impl FfmpegSource {
    /// Open a video file.
    ///
    /// Initializes FFmpeg (idempotent), opens the container, locates the best
    /// video stream, and reads its dimensions, frame rate, and frame count.
    /// The frame count comes from the stream header when present and is
    /// otherwise estimated from the duration and frame rate.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbnailError::CannotOpenSource`] if the file cannot be
    /// opened, has no video stream, or its decoder cannot be created.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ThumbnailError> {
        let path = path.as_ref().to_path_buf();
        let cannot_open = |reason: String| ThumbnailError::CannotOpenSource {
            path: path.clone(),
            reason,
        };

        log::debug!("Opening video: {}", path.display());

        ffmpeg_next::init()
            .map_err(|error| cannot_open(format!("FFmpeg initialisation failed: {error}")))?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| cannot_open(error.to_string()))?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or_else(|| cannot_open("no video stream".to_string()))?;
        let video_stream_index = stream.index();
        let time_base = stream.time_base();

        let decoder_context = CodecContext::from_parameters(stream.parameters())
            .map_err(|error| cannot_open(format!("cannot read codec parameters: {error}")))?;
        let decoder = decoder_context
            .decoder()
            .video()
            .map_err(|error| cannot_open(format!("cannot create video decoder: {error}")))?;
        let width = decoder.width();
        let height = decoder.height();

        let frame_rate = stream.avg_frame_rate();
        let frames_per_second = if frame_rate.denominator() != 0 && frame_rate.numerator() > 0 {
            f64::from(frame_rate)
        } else {
            let rate = stream.rate();
            if rate.denominator() != 0 && rate.numerator() > 0 {
                f64::from(rate)
            } else {
                0.0
            }
        };
        if frames_per_second <= 0.0 {
            return Err(cannot_open("unknown frame rate".to_string()));
        }

        let frame_count = if stream.frames() > 0 {
            stream.frames() as u64
        } else {
            let duration_microseconds = input_context.duration();
            if duration_microseconds > 0 {
                (duration_microseconds as f64 / 1_000_000.0 * frames_per_second) as u64
            } else {
                0
            }
        };

        let start_pts = match stream.start_time() {
            ffmpeg_sys_next::AV_NOPTS_VALUE => 0,
            start => start,
        };

        log::debug!(
            "{}: {}x{} @ {:.3} fps, {} frames",
            path.display(),
            width,
            height,
            frames_per_second,
            frame_count
        );

        Ok(Self {
            input_context,
            video_stream_index,
            width,
            height,
            frame_count,
            frames_per_second,
            time_base,
            start_pts,
            path,
        })
    }

    /// Average frame rate of the video stream.
    pub fn frames_per_second(&self) -> f64 {
        self.frames_per_second
    }

    fn decode_frame(&mut self, index: u64) -> Result<RgbImage, ThumbnailError> {
        let video_stream_index = self.video_stream_index;
        let time_base = self.time_base;
        let frames_per_second = self.frames_per_second;
        let start_pts = self.start_pts;
        let (width, height) = (self.width, self.height);

        // Build a fresh decoder from the stream parameters.
        let stream = self
            .input_context
            .stream(video_stream_index)
            .ok_or_else(|| ThumbnailError::FfmpegError("video stream disappeared".to_string()))?;
        let decoder_context = CodecContext::from_parameters(stream.parameters())?;
        let mut decoder = decoder_context.decoder().video()?;

        // Pixel-format conversion only; resizing happens in the compositor.
        let mut scaler = ScalingContext::get(
            decoder.format(),
            decoder.width(),
            decoder.height(),
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )?;

        let seek_target = utilities::frame_number_to_seek_timestamp(index, frames_per_second)
            + utilities::pts_to_microseconds(start_pts, time_base);
        self.input_context.seek(seek_target, ..seek_target)?;

        let frame_index_of = |frame: &VideoFrame| {
            let pts = frame.timestamp().or(frame.pts()).unwrap_or(start_pts);
            utilities::pts_to_frame_number(
                pts.saturating_sub(start_pts),
                time_base,
                frames_per_second,
            )
        };

        let mut decoded_frame = VideoFrame::empty();
        let mut rgb_frame = VideoFrame::empty();

        for (stream, packet) in self.input_context.packets() {
            if stream.index() != video_stream_index {
                continue;
            }

            decoder.send_packet(&packet)?;

            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                // The seek lands on a keyframe at or before the target; the
                // first frame at or past it is the one we want.
                if frame_index_of(&decoded_frame) >= index {
                    scaler.run(&decoded_frame, &mut rgb_frame)?;
                    return convert_frame_to_image(&rgb_frame, width, height);
                }
            }
        }

        decoder.send_eof()?;
        while decoder.receive_frame(&mut decoded_frame).is_ok() {
            if frame_index_of(&decoded_frame) >= index {
                scaler.run(&decoded_frame, &mut rgb_frame)?;
                return convert_frame_to_image(&rgb_frame, width, height);
            }
        }

        Err(ThumbnailError::CannotDecodeFrame {
            path: self.path.clone(),
            frame_index: index,
            reason: "frame not found in the video stream".to_string(),
        })
    }
}

impl VideoSource for FfmpegSource {
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
        if index >= self.frame_count {
            return Err(ThumbnailError::CannotDecodeFrame {
                path: self.path.clone(),
                frame_index: index,
                reason: format!("video has {} frames", self.frame_count),
            });
        }

        self.decode_frame(index)
            .map_err(|error| match error {
                ThumbnailError::CannotDecodeFrame { .. } => error,
                other => ThumbnailError::CannotDecodeFrame {
                    path: self.path.clone(),
                    frame_index: index,
                    reason: other.to_string(),
                },
            })
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Convert a scaled RGB24 video frame to an [`RgbImage`].
fn convert_frame_to_image(
    rgb_frame: &VideoFrame,
    width: u32,
    height: u32,
) -> Result<RgbImage, ThumbnailError> {
    let buffer = utilities::frame_to_rgb_buffer(rgb_frame, width, height);
    RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
        ThumbnailError::FfmpegError(
            "decoded frame does not match the stream dimensions".to_string(),
        )
    })
}

/// Set FFmpeg's internal log level from a Rust [`LevelFilter`].
///
/// This only affects what FFmpeg itself prints to stderr. `Off` silences
/// FFmpeg entirely; `Error` (the command-line default) keeps only errors.
///
/// # Example
///
/// ```no_run
/// vidsheet::set_ffmpeg_log_level(log::LevelFilter::Error);
/// ```
pub fn set_ffmpeg_log_level(filter: LevelFilter) {
    let level = match filter {
        LevelFilter::Off => Level::Quiet,
        LevelFilter::Error => Level::Error,
        LevelFilter::Warn => Level::Warning,
        LevelFilter::Info => Level::Info,
        LevelFilter::Debug => Level::Debug,
        LevelFilter::Trace => Level::Trace,
    };
    ffmpeg_next::util::log::set_level(level);
}
