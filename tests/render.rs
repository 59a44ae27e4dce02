//! Title rendering tests.
//!
//! Glyphs come from DejaVu Sans Mono, checked in under `tests/fixtures/`
//! (Bitstream Vera license, see `DejaVuSansMono.LICENSE`).

use image::Rgb;
use vidsheet::{
    BACKGROUND, RenderContext, SyntheticSource, ThumbnailConfig, ThumbnailError, Title,
};

const FONT_PATH: &str = "tests/fixtures/DejaVuSansMono.ttf";
const FONT_BYTES: &[u8] = include_bytes!("fixtures/DejaVuSansMono.ttf");

fn font(size: f32) -> RenderContext {
    RenderContext::from_bytes(FONT_BYTES.to_vec(), size).expect("Failed to load fixture font")
}

// ── loading ────────────────────────────────────────────────────────

#[test]
fn garbage_bytes_are_font_load_error() {
    let result = RenderContext::from_bytes(b"definitely not a font".to_vec(), 32.0);
    assert!(matches!(result, Err(ThumbnailError::FontLoad(_))));
}

#[test]
fn missing_font_file_is_font_load_error() {
    let result = RenderContext::from_file("no/such/font.ttf", 32.0);
    match result {
        Err(ThumbnailError::FontLoad(reason)) => assert!(reason.contains("font.ttf")),
        other => panic!("expected FontLoad, got {other:?}"),
    }
}

#[test]
fn font_file_loads_from_disk() {
    let render = RenderContext::from_file(FONT_PATH, 20.0).unwrap();
    assert_eq!(render.measure("clip.mp4"), font(20.0).measure("clip.mp4"));
}

#[test]
fn non_positive_size_is_rejected() {
    assert!(matches!(
        RenderContext::from_bytes(FONT_BYTES.to_vec(), 0.0),
        Err(ThumbnailError::FontLoad(_))
    ));
    assert!(matches!(
        RenderContext::from_bytes(FONT_BYTES.to_vec(), f32::NAN),
        Err(ThumbnailError::FontLoad(_))
    ));
}

// ── measuring ──────────────────────────────────────────────────────

#[test]
fn blank_text_measures_zero() {
    let render = font(32.0);
    assert_eq!(render.measure("").height, 0);
    assert_eq!(render.measure("   ").width, 0);
}

#[test]
fn larger_size_measures_taller() {
    let (small, large) = (font(16.0), font(48.0));
    let text = "holiday.mp4";
    assert!(small.measure(text).height > 0);
    assert!(large.measure(text).height > small.measure(text).height);
    assert!(large.measure(text).width > small.measure(text).width);
}

// ── drawing ────────────────────────────────────────────────────────

#[test]
fn titled_sheet_reserves_a_band() {
    let render = font(24.0);
    let config = ThumbnailConfig::new()
        .with_cells(2)
        .with_cell_columns(2)
        .with_cell_max_size(32, 18)
        .with_cell_border(5);
    let text = "clip.mp4";
    let bounds = render.measure(text);

    let plain = vidsheet::build_thumbnail(&mut SyntheticSource::new(32, 18, 10), &config, None)
        .unwrap();
    let titled = vidsheet::build_thumbnail(
        &mut SyntheticSource::new(32, 18, 10),
        &config,
        Some(Title::new(text, &render)),
    )
    .unwrap();

    assert!(bounds.height > 0);
    assert_eq!(titled.width(), plain.width());
    assert_eq!(titled.height(), 5 + bounds.height + 5 + (18 + 5));
    assert_eq!(titled.height(), plain.height() + bounds.height + 5);

    // The first cell starts below the band and its border.
    let first_cell = SyntheticSource::new(32, 18, 10).render_frame(0);
    let grid_top = 2 * 5 + bounds.height;
    assert_eq!(titled.get_pixel(5, grid_top), first_cell.get_pixel(0, 0));
    assert_eq!(titled.get_pixel(5, grid_top - 1), &BACKGROUND);

    // Ink lies inside the band and nowhere above it.
    let band_bottom = 5 + bounds.height;
    let inked: Vec<(u32, u32)> = titled
        .enumerate_pixels()
        .filter(|(_, y, pixel)| *y < band_bottom && **pixel != BACKGROUND)
        .map(|(x, y, _)| (x, y))
        .collect();
    assert!(!inked.is_empty());
    assert!(inked.iter().all(|&(x, y)| y >= 5 && x >= 5));

    // The grid is the untitled grid shifted down by the band.
    let shift = bounds.height + 5;
    for y in 5..plain.height() {
        for x in 0..plain.width() {
            assert_eq!(titled.get_pixel(x, y + shift), plain.get_pixel(x, y));
        }
    }
}

#[test]
fn draw_uses_the_configured_colour() {
    let render = font(40.0);
    let render = render.with_color(Rgb([255, 0, 0]));
    let mut canvas = image::RgbImage::from_pixel(200, 60, BACKGROUND);
    render.draw(&mut canvas, 2, 2, "HI");

    // Covered pixels blend from white towards pure red.
    assert!(canvas.pixels().any(|pixel| pixel[1] < 32 && pixel[2] < 32));
    assert!(canvas.pixels().all(|pixel| pixel[0] == 255 && pixel[1] == pixel[2]));
}

#[test]
fn drawing_off_canvas_is_clipped() {
    let render = font(64.0);
    let mut canvas = image::RgbImage::from_pixel(10, 10, BACKGROUND);
    render.draw(&mut canvas, 5, 5, "WWWWWW");
    assert!(canvas.pixels().any(|pixel| *pixel != BACKGROUND));
}

#[test]
fn blank_title_adds_no_band() {
    let render = font(24.0);
    let config = ThumbnailConfig::new()
        .with_cells(1)
        .with_cell_max_size(16, 9);
    let plain =
        vidsheet::build_thumbnail(&mut SyntheticSource::new(16, 9, 1), &config, None).unwrap();
    let titled = vidsheet::build_thumbnail(
        &mut SyntheticSource::new(16, 9, 1),
        &config,
        Some(Title::new(" ", &render)),
    )
    .unwrap();
    assert_eq!(titled, plain);
}
