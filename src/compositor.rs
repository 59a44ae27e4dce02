//! Contact-sheet composition.
//!
//! [`build_thumbnail`] turns a [`VideoSource`] and a [`ThumbnailConfig`]
//! into a finished canvas. Everything that does not need pixels (cell size,
//! sample indices, canvas size, every cell offset) is decided up front by
//! [`plan_sheet`]; the build then walks the samples in order, decoding,
//! resizing, and pasting each frame into its pre-computed slot.
//!
//! # Example
//!
//! ```no_run
//! use vidsheet::{FfmpegSource, ThumbnailConfig, ThumbnailError};
//!
//! let mut source = FfmpegSource::open("input.mp4")?;
//! let sheet = vidsheet::build_thumbnail(&mut source, &ThumbnailConfig::new(), None)?;
//! sheet.save("input.jpg")?;
//! # Ok::<(), ThumbnailError>(())
//! ```

use image::{GenericImage, Rgb, RgbImage, imageops::FilterType};

use crate::config::{BuildOptions, ThumbnailConfig};
use crate::error::ThumbnailError;
use crate::geometry::{CellSize, calc_cell_size};
use crate::layout::{GridLayout, GridPosition};
use crate::progress::{OperationType, ProgressTracker};
use crate::render::RenderContext;
use crate::sampler::sample_indices;
use crate::source::VideoSource;

/// The finished sheet: an 8-bit RGB bitmap.
pub type Canvas = RgbImage;

/// Background colour of a fresh canvas.
pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);

/// Title text together with the context that draws it.
#[derive(Debug, Clone, Copy)]
pub struct Title<'a> {
    /// Text to draw in the header band.
    pub text: &'a str,
    /// Font, size and colour.
    pub render: &'a RenderContext,
}

impl<'a> Title<'a> {
    /// Pair `text` with `render`.
    pub fn new(text: &'a str, render: &'a RenderContext) -> Self {
        Self { text, render }
    }
}

/// Every decision about a sheet that can be made without decoding a frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetPlan {
    /// Size of every cell.
    pub cell: CellSize,
    /// Frame index shown in each cell, in fill order.
    pub frame_indices: Vec<u64>,
    /// Canvas size and cell offsets.
    pub layout: GridLayout,
}

/// Plan a sheet for a `width` x `height` video with `frame_count` frames.
///
/// `title_height` is the height of the title band, zero for none.
///
/// # Errors
///
/// Returns [`ThumbnailError::InvalidConfig`] if the config fails
/// [`validate`](ThumbnailConfig::validate), if `width`, `height`, or
/// `frame_count` is zero, or if the canvas would overflow 32-bit dimensions
/// or exceed [`MAX_CANVAS_PIXELS`](crate::MAX_CANVAS_PIXELS).
pub fn plan_sheet(
    width: u32,
    height: u32,
    frame_count: u64,
    config: &ThumbnailConfig,
    title_height: u32,
) -> Result<SheetPlan, ThumbnailError> {
    config.validate()?;
    if width == 0 || height == 0 {
        return Err(ThumbnailError::invalid_config(
            "source dimensions",
            format!("{width}x{height}"),
        ));
    }
    if frame_count == 0 {
        return Err(ThumbnailError::invalid_config("frame_count", frame_count));
    }

    let cell = calc_cell_size(width, height, config.cell_max_width, config.cell_max_height);
    let layout = GridLayout::try_new(
        config.cells,
        config.cell_columns,
        cell,
        config.cell_border,
        title_height,
    )?;
    let frame_indices = sample_indices(frame_count, config.cells);

    Ok(SheetPlan {
        cell,
        frame_indices,
        layout,
    })
}

impl SheetPlan {
    /// Position of the cell that shows `frame_indices[cell_index]`.
    ///
    /// The fields are public, so a hand-edited plan can list more frames
    /// than its layout has cells.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbnailError::TooManyCellsAppended`] if the layout has no
    /// cell `cell_index`.
    pub fn cell_position(&self, cell_index: usize) -> Result<GridPosition, ThumbnailError> {
        u32::try_from(cell_index)
            .ok()
            .and_then(|index| self.layout.position(index))
            .ok_or(ThumbnailError::TooManyCellsAppended {
                cells: self.layout.cells,
            })
    }
}

/// Build a contact sheet from `source`.
///
/// Equivalent to [`build_thumbnail_with_options`] with default
/// [`BuildOptions`].
///
/// # Errors
///
/// See [`build_thumbnail_with_options`].
pub fn build_thumbnail<S: VideoSource + ?Sized>(
    source: &mut S,
    config: &ThumbnailConfig,
    title: Option<Title<'_>>,
) -> Result<Canvas, ThumbnailError> {
    build_thumbnail_with_options(source, config, title, &BuildOptions::default())
}

/// Build a contact sheet from `source` with progress and cancellation.
///
/// When `title` is given and its text has visible glyphs, a header band as
/// tall as the text's ink box is reserved and the title is drawn in it.
///
/// # Errors
///
/// - [`ThumbnailError::CannotOpenSource`] if the source reports zero width,
///   height, or frames. No canvas is allocated.
/// - [`ThumbnailError::InvalidConfig`] if the config is invalid.
/// - [`ThumbnailError::CannotDecodeFrame`] if any sampled frame cannot be
///   read. The partial canvas is discarded.
/// - [`ThumbnailError::Cancelled`] if the token in `options` is cancelled.
pub fn build_thumbnail_with_options<S: VideoSource + ?Sized>(
    source: &mut S,
    config: &ThumbnailConfig,
    title: Option<Title<'_>>,
    options: &BuildOptions,
) -> Result<Canvas, ThumbnailError> {
    let (width, height, frame_count) = (source.width(), source.height(), source.frame_count());
    if width == 0 || height == 0 {
        return Err(ThumbnailError::CannotOpenSource {
            path: source.path().to_path_buf(),
            reason: format!("video reports invalid dimensions {width}x{height}"),
        });
    }
    if frame_count == 0 {
        return Err(ThumbnailError::CannotOpenSource {
            path: source.path().to_path_buf(),
            reason: "video reports no frames".to_string(),
        });
    }

    let title_height = title.map_or(0, |title| title.render.measure(title.text).height);
    let plan = plan_sheet(width, height, frame_count, config, title_height)?;
    let layout = &plan.layout;

    log::debug!(
        "Building {}x{} sheet for {}: {} cells of {}x{}, frames {:?}",
        layout.canvas_width,
        layout.canvas_height,
        source.path().display(),
        layout.cells,
        plan.cell.width,
        plan.cell.height,
        plan.frame_indices
    );

    let mut canvas = RgbImage::from_pixel(layout.canvas_width, layout.canvas_height, BACKGROUND);

    if let (Some(title), Some((x, y))) = (title, layout.title_origin()) {
        title.render.draw(&mut canvas, x, y, title.text);
    }

    let tracker = ProgressTracker::new(
        options.progress.clone(),
        OperationType::CellExtraction,
        Some(plan.frame_indices.len() as u64),
    );

    for (cell_index, &frame_index) in plan.frame_indices.iter().enumerate() {
        if options.is_cancelled() {
            return Err(ThumbnailError::Cancelled);
        }

        let position = plan.cell_position(cell_index)?;

        let frame = source
            .frame_at(frame_index)
            .map_err(|error| match error {
                ThumbnailError::CannotDecodeFrame { .. } => error,
                other => ThumbnailError::CannotDecodeFrame {
                    path: source.path().to_path_buf(),
                    frame_index,
                    reason: other.to_string(),
                },
            })?;

        let cell_image = resize_frame(&frame, plan.cell);
        canvas.copy_from(&cell_image, position.x, position.y)?;

        tracker.advance(Some(frame_index));
    }

    Ok(canvas)
}

/// Resize `frame` to exactly `cell`.
///
/// Frames already at the cell size are copied unchanged. When the cell is
/// shorter than the frame the result is area-averaged, so every source pixel
/// contributes in proportion to its coverage; otherwise a Catmull-Rom cubic
/// filter is used for enlarging.
pub fn resize_frame(frame: &RgbImage, cell: CellSize) -> RgbImage {
    if frame.dimensions() == (cell.width, cell.height) {
        return frame.clone();
    }
    if cell.height < frame.height() {
        area_resize(frame, cell.width, cell.height)
    } else {
        image::imageops::resize(frame, cell.width, cell.height, FilterType::CatmullRom)
    }
}

/// For each destination index, the overlapping source indices and the
/// fraction of the destination pixel each one covers.
fn area_weights(source_length: u32, target_length: u32) -> Vec<Vec<(usize, f32)>> {
    let scale = f64::from(source_length) / f64::from(target_length);
    (0..target_length)
        .map(|target| {
            let start = f64::from(target) * scale;
            let end = start + scale;
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(source_length as usize);
            (first..last)
                .filter_map(|source| {
                    let overlap = end.min(source as f64 + 1.0) - start.max(source as f64);
                    (overlap > 0.0).then_some((source, (overlap / scale) as f32))
                })
                .collect()
        })
        .collect()
}

/// Area-averaging resize, applied separably: columns first, then rows.
///
/// `image` only offers kernel filters, none of which weight source pixels by
/// coverage, so the box filter is done here.
fn area_resize(frame: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (source_width, source_height) = frame.dimensions();
    let column_weights = area_weights(source_width, width);
    let row_weights = area_weights(source_height, height);

    let width = width as usize;
    let source_width = source_width as usize;
    let pixels = frame.as_raw();

    let mut horizontal = vec![0.0_f32; width * source_height as usize * 3];
    for row in 0..source_height as usize {
        let source_row = &pixels[row * source_width * 3..(row + 1) * source_width * 3];
        let target_row = &mut horizontal[row * width * 3..(row + 1) * width * 3];
        for (column, taps) in column_weights.iter().enumerate() {
            for &(source_column, weight) in taps {
                for channel in 0..3 {
                    target_row[column * 3 + channel] +=
                        f32::from(source_row[source_column * 3 + channel]) * weight;
                }
            }
        }
    }

    let mut output = vec![0.0_f32; width * height as usize * 3];
    for (row, taps) in row_weights.iter().enumerate() {
        let target_row = &mut output[row * width * 3..(row + 1) * width * 3];
        for &(source_row, weight) in taps {
            let source = &horizontal[source_row * width * 3..(source_row + 1) * width * 3];
            for (target, value) in target_row.iter_mut().zip(source) {
                *target += value * weight;
            }
        }
    }

    RgbImage::from_fn(width as u32, height, |x, y| {
        let offset = (y as usize * width + x as usize) * 3;
        Rgb([
            to_channel(output[offset]),
            to_channel(output[offset + 1]),
            to_channel(output[offset + 2]),
        ])
    })
}

fn to_channel(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
