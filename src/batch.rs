//! Writing sheets to disk, one file or many.
//!
//! [`create_thumbnail`] is the single-file path: open, build, write the JPEG
//! next to the video. [`run_batch`] fans a list of [`WorkItem`]s out over a
//! fixed-size rayon pool. Each worker opens its own demuxer and owns its own
//! canvas, so items share nothing but the read-only config and render
//! context. A failing item is recorded in the [`BatchReport`] and never stops
//! the others.
//!
//! There is no per-item timeout: a decode that hangs inside FFmpeg blocks its
//! worker until it returns.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde_json::{Value, json};

use crate::compositor::{Title, build_thumbnail_with_options};
use crate::config::{BatchOptions, BuildOptions, ThumbnailConfig};
use crate::discovery::{is_video_file, output_path_for};
use crate::error::ThumbnailError;
use crate::ffmpeg::FfmpegSource;
use crate::progress::{OperationType, ProgressTracker};
use crate::render::RenderContext;

/// One video to process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    /// Path of the video.
    pub path: PathBuf,
    /// Grid settings for its sheet.
    pub config: ThumbnailConfig,
}

impl WorkItem {
    /// Pair a video path with its config.
    pub fn new<P: AsRef<Path>>(path: P, config: ThumbnailConfig) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config,
        }
    }
}

/// The result of processing one [`WorkItem`].
#[derive(Debug)]
pub struct ItemOutcome {
    /// Path of the video.
    pub path: PathBuf,
    /// Path of the written sheet, or why it was not written.
    pub result: Result<PathBuf, ThumbnailError>,
}

impl ItemOutcome {
    /// Whether the sheet was written.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-item outcomes of a batch, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// One outcome per work item.
    pub outcomes: Vec<ItemOutcome>,
}

impl BatchReport {
    /// Outcomes whose sheet was written.
    pub fn succeeded(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_success())
    }

    /// Outcomes that failed.
    pub fn failed(&self) -> impl Iterator<Item = &ItemOutcome> {
        self.outcomes.iter().filter(|outcome| !outcome.is_success())
    }

    /// `true` when every item succeeded (vacuously true for an empty batch).
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(ItemOutcome::is_success)
    }

    /// Machine-readable summary.
    pub fn to_json(&self) -> Value {
        let items: Vec<Value> = self
            .outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(output) => json!({
                    "input": outcome.path.display().to_string(),
                    "output": output.display().to_string(),
                }),
                Err(error) => json!({
                    "input": outcome.path.display().to_string(),
                    "error": error.to_string(),
                }),
            })
            .collect();

        json!({
            "total": self.outcomes.len(),
            "succeeded": self.succeeded().count(),
            "failed": self.failed().count(),
            "items": items,
        })
    }
}

/// Build the sheet for one video and write it next to the source.
///
/// The sheet is written to [`output_path_for`]`(path)` as a JPEG. When
/// `render` is given, the video's file name is drawn as the title.
///
/// # Errors
///
/// - [`ThumbnailError::PathNotFound`] if `path` does not exist.
/// - [`ThumbnailError::NotAVideoFile`] if the extension is not a video one.
/// - Any error from [`FfmpegSource::open`] or
///   [`build_thumbnail`](crate::build_thumbnail); nothing is written in that case.
/// - [`ThumbnailError::ImageError`] if the JPEG cannot be written.
pub fn create_thumbnail<P: AsRef<Path>>(
    path: P,
    config: &ThumbnailConfig,
    render: Option<&RenderContext>,
) -> Result<PathBuf, ThumbnailError> {
    create_thumbnail_with_options(path, config, render, &BuildOptions::default())
}

/// Like [`create_thumbnail`], reporting per-cell progress and honouring
/// cancellation through `options`.
///
/// # Errors
///
/// See [`create_thumbnail`]. Also returns [`ThumbnailError::Cancelled`] if
/// the token in `options` fires before the last cell.
pub fn create_thumbnail_with_options<P: AsRef<Path>>(
    path: P,
    config: &ThumbnailConfig,
    render: Option<&RenderContext>,
    options: &BuildOptions,
) -> Result<PathBuf, ThumbnailError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ThumbnailError::PathNotFound(path.to_path_buf()));
    }
    if !is_video_file(path) {
        return Err(ThumbnailError::NotAVideoFile {
            path: path.to_path_buf(),
        });
    }

    let mut source = FfmpegSource::open(path)?;
    let title_text = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let title = render.map(|render| Title::new(&title_text, render));

    let sheet = build_thumbnail_with_options(&mut source, config, title, options)?;

    let output_path = output_path_for(path);
    sheet.save(&output_path)?;
    log::info!("Wrote {}", output_path.display());
    Ok(output_path)
}

/// Build and write sheets for every item on a fixed-size worker pool.
///
/// # Errors
///
/// Returns [`ThumbnailError::WorkerPool`] if the pool cannot be started.
/// Per-item failures are reported in the [`BatchReport`], not here.
///
/// # Example
///
/// ```no_run
/// use vidsheet::{BatchOptions, ThumbnailConfig, ThumbnailError, WorkItem};
///
/// let items: Vec<WorkItem> = vidsheet::find_videos("videos")?
///     .into_iter()
///     .map(|path| WorkItem::new(path, ThumbnailConfig::new()))
///     .collect();
/// let report = vidsheet::run_batch(items, &BatchOptions::new().with_workers(4), None)?;
/// for failure in report.failed() {
///     eprintln!("{}: {:?}", failure.path.display(), failure.result);
/// }
/// # Ok::<(), ThumbnailError>(())
/// ```
pub fn run_batch(
    items: Vec<WorkItem>,
    options: &BatchOptions,
    render: Option<&RenderContext>,
) -> Result<BatchReport, ThumbnailError> {
    run_batch_with(items, options, |item| {
        create_thumbnail(&item.path, &item.config, render)
    })
}

/// Run `job` for every item on a fixed-size worker pool.
///
/// This is the task-distribution core of [`run_batch`]; `job` returns the
/// path of the written artifact. Items not yet started when the cancellation
/// token fires are recorded as [`ThumbnailError::Cancelled`].
///
/// # Errors
///
/// Returns [`ThumbnailError::WorkerPool`] if the pool cannot be started.
pub fn run_batch_with<F>(
    items: Vec<WorkItem>,
    options: &BatchOptions,
    job: F,
) -> Result<BatchReport, ThumbnailError>
where
    F: Fn(&WorkItem) -> Result<PathBuf, ThumbnailError> + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.workers.unwrap_or(0))
        .build()
        .map_err(|error| ThumbnailError::WorkerPool(error.to_string()))?;

    log::debug!(
        "Processing {} item(s) on {} worker(s)",
        items.len(),
        pool.current_num_threads()
    );

    let tracker = ProgressTracker::new(
        options.progress.clone(),
        OperationType::BatchProcessing,
        Some(items.len() as u64),
    );

    let outcomes = pool.install(|| {
        items
            .par_iter()
            .map(|item| {
                let result = if options.is_cancelled() {
                    Err(ThumbnailError::Cancelled)
                } else {
                    job(item)
                };
                if let Err(error) = &result {
                    log::warn!("FAILED: {}: {error}", item.path.display());
                }
                tracker.advance(None);
                ItemOutcome {
                    path: item.path.clone(),
                    result,
                }
            })
            .collect()
    });

    Ok(BatchReport { outcomes })
}
