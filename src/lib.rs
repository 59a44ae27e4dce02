//! # vidsheet
//!
//! Contact sheets for video files: a grid of evenly spaced frames on a white
//! canvas, optionally headed by the file name.
//!
//! `vidsheet` samples `cells` frames across the whole video, scales each to
//! a cell that keeps the source aspect ratio, and pastes them row by row
//! into a single [`image::RgbImage`]. Decoding is powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate; the sheet
//! builder itself only needs a [`VideoSource`], so anything that can hand
//! out RGB frames by index can be laid out.
//!
//! ## Quick Start
//!
//! ### One Video
//!
//! ```no_run
//! use vidsheet::{ThumbnailConfig, ThumbnailError};
//!
//! let written = vidsheet::create_thumbnail("holiday.mp4", &ThumbnailConfig::new(), None)?;
//! assert_eq!(written, std::path::Path::new("holiday.jpg"));
//! # Ok::<(), ThumbnailError>(())
//! ```
//!
//! ### A Directory Tree
//!
//! ```no_run
//! use vidsheet::{BatchOptions, ThumbnailConfig, ThumbnailError, WorkItem};
//!
//! let config = ThumbnailConfig::new().with_cells(9).with_cell_columns(3);
//! let items = vidsheet::find_videos("videos")?
//!     .into_iter()
//!     .map(|path| WorkItem::new(path, config))
//!     .collect();
//! let report = vidsheet::run_batch(items, &BatchOptions::new(), None)?;
//! println!("{}", report.to_json());
//! # Ok::<(), ThumbnailError>(())
//! ```
//!
//! ### With a Title
//!
//! ```no_run
//! use vidsheet::{FfmpegSource, RenderContext, ThumbnailConfig, ThumbnailError, Title};
//!
//! let render = RenderContext::from_file("DejaVuSans.ttf", vidsheet::DEFAULT_FONT_SIZE)?;
//! let mut source = FfmpegSource::open("holiday.mp4")?;
//! let sheet = vidsheet::build_thumbnail(
//!     &mut source,
//!     &ThumbnailConfig::new(),
//!     Some(Title::new("holiday.mp4", &render)),
//! )?;
//! sheet.save("holiday.jpg")?;
//! # Ok::<(), ThumbnailError>(())
//! ```
//!
//! ## Features
//!
//! - **Aspect-preserving cells**: landscape sources are bounded by the max
//!   height, portrait and square ones by the max width
//! - **Even sampling**: `cells` frame indices spread over `[0, frame_count)`
//! - **Area-averaged downscaling** and cubic upscaling
//! - **Batch runs** on a fixed-size rayon pool, with per-item outcomes and
//!   a JSON report
//! - **Progress & cancellation** via [`ProgressCallback`] and
//!   [`CancellationToken`]
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod batch;
pub mod compositor;
pub mod config;
pub mod discovery;
pub mod error;
pub mod ffmpeg;
pub mod geometry;
pub mod layout;
pub mod progress;
pub mod render;
pub mod sampler;
pub mod source;
mod utilities;

pub use batch::{
    BatchReport, ItemOutcome, WorkItem, create_thumbnail, create_thumbnail_with_options,
    run_batch, run_batch_with,
};
pub use compositor::{
    BACKGROUND, Canvas, SheetPlan, Title, build_thumbnail, build_thumbnail_with_options,
    plan_sheet, resize_frame,
};
pub use config::{BatchOptions, BuildOptions, ThumbnailConfig};
pub use discovery::{VIDEO_FILE_EXTENSIONS, find_videos, is_video_file, output_path_for};
pub use error::ThumbnailError;
pub use ffmpeg::{FfmpegSource, set_ffmpeg_log_level};
pub use geometry::{CellSize, calc_cell_size};
pub use layout::{GridLayout, GridPosition, MAX_CANVAS_PIXELS};
pub use progress::{CancellationToken, OperationType, ProgressCallback, ProgressInfo};
pub use render::{DEFAULT_FONT_SIZE, RenderContext, TextBounds};
pub use sampler::sample_indices;
pub use source::{SyntheticSource, VideoSource};
