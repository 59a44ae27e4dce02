//! Cell sizing tests.

use vidsheet::{CellSize, calc_cell_size};

// ── orientation ────────────────────────────────────────────────────

#[test]
fn landscape_fixes_height() {
    assert_eq!(calc_cell_size(1920, 1080, 720, 720), CellSize::new(1280, 720));
}

#[test]
fn portrait_fixes_width() {
    assert_eq!(calc_cell_size(1080, 1920, 720, 720), CellSize::new(720, 1280));
}

#[test]
fn square_fixes_width() {
    assert_eq!(calc_cell_size(500, 500, 300, 200), CellSize::new(300, 300));
}

#[test]
fn other_axis_is_not_clamped() {
    // 4:1 panorama: the width ignores max_width entirely.
    let cell = calc_cell_size(4000, 1000, 100, 100);
    assert_eq!(cell, CellSize::new(400, 100));
    assert!(cell.width > 100);
}

#[test]
fn fractional_sizes_truncate() {
    // 640 / 480 * 100 = 133.33...
    assert_eq!(calc_cell_size(640, 480, 100, 100).width, 133);
    // 100 / (480 / 640) = 133.33...
    assert_eq!(calc_cell_size(480, 640, 100, 100).height, 133);
}

#[test]
#[should_panic(expected = "source dimensions must be positive")]
fn zero_height_panics() {
    calc_cell_size(1920, 0, 720, 720);
}

// ── properties ─────────────────────────────────────────────────────

#[test]
fn fixed_axis_matches_its_bound_exactly() {
    let sizes = [(1, 1), (2, 1), (1, 2), (1921, 1080), (720, 1280), (37, 999), (3840, 2160)];
    let bounds = [(1, 1), (64, 48), (720, 720), (300, 900)];

    for &(width, height) in &sizes {
        for &(max_width, max_height) in &bounds {
            let cell = calc_cell_size(width, height, max_width, max_height);
            if width > height {
                assert_eq!(cell.height, max_height, "{width}x{height}");
                assert!(cell.width >= cell.height, "{width}x{height} -> {cell:?}");
            } else {
                assert_eq!(cell.width, max_width, "{width}x{height}");
                assert!(cell.height >= cell.width, "{width}x{height} -> {cell:?}");
            }
        }
    }
}
