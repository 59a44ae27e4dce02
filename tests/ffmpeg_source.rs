//! FfmpegSource integration tests.
//!
//! Tests require fixture files from `tests/fixtures/generate_fixtures.sh`.

use std::path::Path;

use vidsheet::{FfmpegSource, ThumbnailConfig, ThumbnailError, VideoSource};

fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

fn sample_audio_only_path() -> &'static str {
    "tests/fixtures/sample_audio_only.mp4"
}

// ── opening ────────────────────────────────────────────────────────

#[test]
fn open_reports_stream_properties() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let source = FfmpegSource::open(path).expect("Failed to open fixture");
    assert_eq!(source.width(), 640);
    assert_eq!(source.height(), 480);
    assert!((source.frames_per_second() - 30.0).abs() < 0.01);
    // 5 seconds at 30 fps, give or take container rounding.
    assert!((149..=151).contains(&source.frame_count()), "{}", source.frame_count());
    assert_eq!(source.path(), Path::new(path));
}

#[test]
fn open_missing_file_is_cannot_open() {
    let result = FfmpegSource::open("this_file_does_not_exist.mp4");
    match result {
        Err(ThumbnailError::CannotOpenSource { path, .. }) => {
            assert_eq!(path, Path::new("this_file_does_not_exist.mp4"));
        }
        other => panic!("expected CannotOpenSource, got {other:?}"),
    }
}

#[test]
fn open_audio_only_has_no_video_stream() {
    let path = sample_audio_only_path();
    if !Path::new(path).exists() {
        return;
    }

    let error = FfmpegSource::open(path).unwrap_err();
    assert!(matches!(error, ThumbnailError::CannotOpenSource { .. }));
    assert!(error.to_string().contains("no video stream"), "{error}");
}

// ── decoding ───────────────────────────────────────────────────────

#[test]
fn frame_at_returns_full_size_rgb() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut source = FfmpegSource::open(path).expect("Failed to open fixture");
    for index in [0, 1, 75, source.frame_count() - 1] {
        let frame = source.frame_at(index).expect("Failed to decode frame");
        assert_eq!(frame.dimensions(), (640, 480));
    }
}

#[test]
fn frame_at_is_repeatable() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut source = FfmpegSource::open(path).expect("Failed to open fixture");
    let first = source.frame_at(90).unwrap();
    let _ = source.frame_at(10).unwrap();
    let again = source.frame_at(90).unwrap();
    assert_eq!(first, again);
}

#[test]
fn frame_past_end_is_decode_error() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut source = FfmpegSource::open(path).expect("Failed to open fixture");
    let past_end = source.frame_count();
    match source.frame_at(past_end) {
        Err(ThumbnailError::CannotDecodeFrame { frame_index, .. }) => {
            assert_eq!(frame_index, past_end);
        }
        other => panic!("expected CannotDecodeFrame, got {other:?}"),
    }
}

// ── end to end ─────────────────────────────────────────────────────

#[test]
fn default_sheet_from_fixture() {
    let path = sample_video_path();
    if !Path::new(path).exists() {
        return;
    }

    let mut source = FfmpegSource::open(path).expect("Failed to open fixture");
    let config = ThumbnailConfig::new();
    let sheet = vidsheet::build_thumbnail(&mut source, &config, None).unwrap();

    // 640x480 is landscape: 960x720 cells.
    assert_eq!(sheet.width(), 20 + 4 * (960 + 20));
    assert_eq!(sheet.height(), 20 + 4 * (720 + 20));
}

#[test]
fn create_thumbnail_writes_next_to_input() {
    let fixture = sample_video_path();
    if !Path::new(fixture).exists() {
        return;
    }

    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let input = temporary_directory.path().join("clip.MP4");
    std::fs::copy(fixture, &input).expect("Failed to copy fixture");

    let config = ThumbnailConfig::new()
        .with_cells(6)
        .with_cell_columns(3)
        .with_cell_max_size(160, 120)
        .with_cell_border(4);
    let output = vidsheet::create_thumbnail(&input, &config, None).unwrap();

    assert_eq!(output, temporary_directory.path().join("clip.jpg"));
    let sheet = image::open(&output).expect("Failed to decode sheet");
    assert_eq!(sheet.width(), 4 + 3 * (160 + 4));
    assert_eq!(sheet.height(), 4 + 2 * (120 + 4));
}
