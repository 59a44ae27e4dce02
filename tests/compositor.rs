//! Sheet composition tests.
//!
//! All tests use the in-memory `SyntheticSource`, so none of them need FFmpeg
//! fixtures.

use std::sync::{Arc, Mutex};

use image::{Rgb, RgbImage};
use vidsheet::{
    BACKGROUND, BuildOptions, CancellationToken, CellSize, OperationType, ProgressCallback,
    ProgressInfo, SyntheticSource, ThumbnailConfig, ThumbnailError, VideoSource, plan_sheet,
    resize_frame,
};

/// Source frames sized so cells match them and resizing is a copy.
fn small_config() -> ThumbnailConfig {
    ThumbnailConfig::new()
        .with_cells(4)
        .with_cell_columns(2)
        .with_cell_max_size(32, 18)
        .with_cell_border(4)
}

struct RecordingProgress {
    seen: Mutex<Vec<ProgressInfo>>,
}

impl ProgressCallback for RecordingProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        self.seen.lock().unwrap().push(info.clone());
    }
}

// ── planning ───────────────────────────────────────────────────────

#[test]
fn plan_default_config_for_full_hd() {
    let plan = plan_sheet(1920, 1080, 1000, &ThumbnailConfig::new(), 0).unwrap();
    assert_eq!(plan.cell, CellSize::new(1280, 720));
    assert_eq!(plan.frame_indices.len(), 16);
    assert_eq!(plan.frame_indices[1], 62);
    assert_eq!(plan.layout.canvas_width, 20 + 4 * 1300);
    assert_eq!(plan.layout.canvas_height, 20 + 4 * 740);
}

#[test]
fn plan_rejects_invalid_config() {
    let config = ThumbnailConfig::new().with_cell_columns(0);
    assert!(matches!(
        plan_sheet(640, 480, 10, &config, 0),
        Err(ThumbnailError::InvalidConfig { field: "cell_columns", .. })
    ));
}

#[test]
fn plan_rejects_oversized_canvas() {
    let config = ThumbnailConfig::new()
        .with_cells(u32::MAX)
        .with_cell_columns(1);
    assert!(matches!(
        plan_sheet(640, 480, 10, &config, 0),
        Err(ThumbnailError::InvalidConfig { field: "canvas size", .. })
    ));
}

#[test]
fn plan_rejects_canvas_too_large_to_allocate() {
    // Both sides fit in u32, the pixel buffer does not.
    let config = ThumbnailConfig::new()
        .with_cells(1)
        .with_cell_columns(1)
        .with_cell_max_size(1, 1)
        .with_cell_border(1_400_000_000);
    assert!(config.validate().is_ok());

    match plan_sheet(2, 1, 1, &config, 0) {
        Err(ThumbnailError::InvalidConfig { field, value }) => {
            assert_eq!(field, "canvas size");
            assert_eq!(value, "2800000002x2800000001");
        }
        other => panic!("expected InvalidConfig, got {other:?}"),
    }

    let mut source = SyntheticSource::new(2, 1, 1);
    assert!(matches!(
        vidsheet::build_thumbnail(&mut source, &config, None),
        Err(ThumbnailError::InvalidConfig { field: "canvas size", .. })
    ));
    assert!(source.reads().is_empty());
}

#[test]
fn cell_position_past_the_grid_is_too_many_cells() {
    let mut plan = plan_sheet(32, 18, 100, &small_config(), 0).unwrap();
    assert_eq!(plan.cell_position(3).map(|p| (p.row, p.column)).ok(), Some((1, 1)));

    plan.frame_indices.push(99);
    assert!(matches!(
        plan.cell_position(plan.frame_indices.len() - 1),
        Err(ThumbnailError::TooManyCellsAppended { cells: 4 })
    ));
}

// ── building ───────────────────────────────────────────────────────

#[test]
fn cells_hold_the_sampled_frames() {
    let mut source = SyntheticSource::new(32, 18, 100);
    let sheet = vidsheet::build_thumbnail(&mut source, &small_config(), None).unwrap();

    assert_eq!(sheet.dimensions(), (4 + 2 * 36, 4 + 2 * 22));
    assert_eq!(source.reads(), &[0, 25, 50, 75]);

    // Cell 3 sits at row 1, column 1 and shows frame 75 unchanged.
    let expected = source.render_frame(75);
    let (x0, y0) = (4 + 36, 4 + 22);
    for (x, y, pixel) in expected.enumerate_pixels() {
        assert_eq!(sheet.get_pixel(x0 + x, y0 + y), pixel);
    }
}

#[test]
fn borders_stay_background() {
    let mut source = SyntheticSource::new(32, 18, 10);
    let sheet = vidsheet::build_thumbnail(&mut source, &small_config(), None).unwrap();

    for x in 0..sheet.width() {
        assert_eq!(*sheet.get_pixel(x, 0), BACKGROUND);
        assert_eq!(*sheet.get_pixel(x, sheet.height() - 1), BACKGROUND);
    }
    // Gutter between the two columns.
    for y in 0..sheet.height() {
        assert_eq!(*sheet.get_pixel(36, y), BACKGROUND);
    }
}

#[test]
fn unfilled_cells_stay_background() {
    let config = small_config().with_cells(3);
    let mut source = SyntheticSource::new(32, 18, 30);
    let sheet = vidsheet::build_thumbnail(&mut source, &config, None).unwrap();

    assert_eq!(sheet.height(), 4 + 2 * 22);
    assert_eq!(*sheet.get_pixel(4 + 36 + 10, 4 + 22 + 10), BACKGROUND);
}

#[test]
fn building_twice_is_identical() {
    let config = ThumbnailConfig::new()
        .with_cells(6)
        .with_cell_columns(3)
        .with_cell_max_size(20, 20);
    let first =
        vidsheet::build_thumbnail(&mut SyntheticSource::new(64, 48, 300), &config, None).unwrap();
    let second =
        vidsheet::build_thumbnail(&mut SyntheticSource::new(64, 48, 300), &config, None).unwrap();
    assert_eq!(first, second);
}

#[test]
fn short_video_repeats_frames() {
    let mut source = SyntheticSource::new(32, 18, 2);
    vidsheet::build_thumbnail(&mut source, &small_config(), None).unwrap();
    assert_eq!(source.reads(), &[0, 0, 1, 1]);
}

#[test]
fn portrait_cells() {
    let config = ThumbnailConfig::new()
        .with_cells(2)
        .with_cell_columns(2)
        .with_cell_max_size(9, 100)
        .with_cell_border(1);
    let mut source = SyntheticSource::new(18, 32, 10);
    let sheet = vidsheet::build_thumbnail(&mut source, &config, None).unwrap();
    // 9 / (18 / 32) = 16
    assert_eq!(sheet.dimensions(), (1 + 2 * 10, 1 + 17));
}

// ── failures ───────────────────────────────────────────────────────

#[test]
fn zero_frames_is_cannot_open() {
    let mut source = SyntheticSource::new(32, 18, 0).with_path("empty.mp4");
    let error = vidsheet::build_thumbnail(&mut source, &small_config(), None).unwrap_err();
    assert!(matches!(error, ThumbnailError::CannotOpenSource { .. }));
    assert!(error.to_string().contains("empty.mp4"));
    assert!(source.reads().is_empty());
}

#[test]
fn zero_dimensions_is_cannot_open() {
    let mut source = SyntheticSource::new(0, 18, 10);
    assert!(matches!(
        vidsheet::build_thumbnail(&mut source, &small_config(), None),
        Err(ThumbnailError::CannotOpenSource { .. })
    ));
}

#[test]
fn failing_frame_aborts_the_build() {
    let mut source = SyntheticSource::new(32, 18, 100)
        .failing_at(50)
        .with_path("broken.mkv");
    let error = vidsheet::build_thumbnail(&mut source, &small_config(), None).unwrap_err();

    match error {
        ThumbnailError::CannotDecodeFrame {
            path, frame_index, ..
        } => {
            assert_eq!(path.to_str(), Some("broken.mkv"));
            assert_eq!(frame_index, 50);
        }
        other => panic!("expected CannotDecodeFrame, got {other:?}"),
    }
    // Frame 75 is never attempted.
    assert_eq!(source.reads(), &[0, 25, 50]);
}

/// A source whose reads fail with a non-decode error.
struct FlakySource(SyntheticSource);

impl VideoSource for FlakySource {
    fn width(&self) -> u32 {
        self.0.width()
    }
    fn height(&self) -> u32 {
        self.0.height()
    }
    fn frame_count(&self) -> u64 {
        self.0.frame_count()
    }
    fn frame_at(&mut self, _index: u64) -> Result<RgbImage, ThumbnailError> {
        Err(ThumbnailError::FfmpegError("seek failed".to_string()))
    }
    fn path(&self) -> &std::path::Path {
        self.0.path()
    }
}

#[test]
fn other_read_errors_become_decode_errors() {
    let mut source = FlakySource(SyntheticSource::new(32, 18, 10));
    let error = vidsheet::build_thumbnail(&mut source, &small_config(), None).unwrap_err();
    assert!(matches!(
        error,
        ThumbnailError::CannotDecodeFrame { frame_index: 0, .. }
    ));
    assert!(error.to_string().contains("seek failed"));
}

// ── progress & cancellation ────────────────────────────────────────

#[test]
fn progress_reported_per_cell() {
    let recorder = Arc::new(RecordingProgress {
        seen: Mutex::new(Vec::new()),
    });
    let options = BuildOptions::new().with_progress(recorder.clone());
    let mut source = SyntheticSource::new(32, 18, 100);
    vidsheet::build_thumbnail_with_options(&mut source, &small_config(), None, &options).unwrap();

    let seen = recorder.seen.lock().unwrap();
    assert_eq!(seen.len(), 4);
    assert!(seen.iter().all(|info| info.operation == OperationType::CellExtraction));
    assert!(seen.iter().all(|info| info.total == Some(4)));
    let frames: Vec<Option<u64>> = seen.iter().map(|info| info.current_frame).collect();
    assert_eq!(frames, vec![Some(0), Some(25), Some(50), Some(75)]);
    assert_eq!(seen[3].current, 4);
    assert_eq!(seen[3].percentage, Some(100.0));
}

#[test]
fn cancelled_build_reads_nothing() {
    let token = CancellationToken::new();
    token.cancel();
    let options = BuildOptions::new().with_cancellation(token);
    let mut source = SyntheticSource::new(32, 18, 100);

    let result = vidsheet::build_thumbnail_with_options(&mut source, &small_config(), None, &options);
    assert!(matches!(result, Err(ThumbnailError::Cancelled)));
    assert!(source.reads().is_empty());
}

// ── resizing ───────────────────────────────────────────────────────

#[test]
fn resize_same_size_is_a_copy() {
    let frame = SyntheticSource::new(16, 9, 1).render_frame(0);
    assert_eq!(resize_frame(&frame, CellSize::new(16, 9)), frame);
}

#[test]
fn downscale_averages_area() {
    // Alternating black and white columns average to mid grey.
    let frame = RgbImage::from_fn(8, 4, |x, _| {
        if x % 2 == 0 {
            Rgb([0, 0, 0])
        } else {
            Rgb([255, 255, 255])
        }
    });
    let cell = resize_frame(&frame, CellSize::new(4, 2));
    assert_eq!(cell.dimensions(), (4, 2));
    for pixel in cell.pixels() {
        assert!((127..=128).contains(&pixel[0]), "{pixel:?}");
    }
}

#[test]
fn downscale_of_flat_colour_is_exact() {
    let frame = RgbImage::from_pixel(30, 20, Rgb([10, 200, 77]));
    let cell = resize_frame(&frame, CellSize::new(7, 3));
    assert!(cell.pixels().all(|pixel| *pixel == Rgb([10, 200, 77])));
}

#[test]
fn upscale_hits_target_size() {
    let frame = RgbImage::from_pixel(4, 3, Rgb([50, 60, 70]));
    let cell = resize_frame(&frame, CellSize::new(16, 12));
    assert_eq!(cell.dimensions(), (16, 12));
    assert!(cell.pixels().all(|pixel| *pixel == Rgb([50, 60, 70])));
}
