//! Cell sizing.
//!
//! A sheet's cells share one size, derived from the source video's aspect
//! ratio and the configured maximum bounds. Orientation picks which bound is
//! honoured: landscape sources fix the cell height, portrait and square
//! sources fix the cell width. The other axis follows the aspect ratio and
//! is not clamped, so it may exceed its own configured maximum.

/// Pixel dimensions of one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellSize {
    /// Cell width in pixels.
    pub width: u32,
    /// Cell height in pixels.
    pub height: u32,
}

impl CellSize {
    /// Create a cell size from explicit dimensions.
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Compute the cell size for a `width` x `height` source.
///
/// When `width / height > 1` the height is fixed at `max_height` and the
/// width is `max_height * aspect`, truncated. Otherwise the width is fixed at
/// `max_width` and the height is `max_width / aspect`, truncated.
///
/// # Panics
///
/// Panics if `width` or `height` is zero.
///
/// # Example
///
/// ```
/// use vidsheet::{CellSize, calc_cell_size};
///
/// assert_eq!(calc_cell_size(1920, 1080, 720, 720), CellSize::new(1280, 720));
/// assert_eq!(calc_cell_size(1080, 1920, 720, 720), CellSize::new(720, 1280));
/// ```
pub fn calc_cell_size(width: u32, height: u32, max_width: u32, max_height: u32) -> CellSize {
    assert!(
        width > 0 && height > 0,
        "source dimensions must be positive, got {width}x{height}"
    );

    let aspect_ratio = width as f64 / height as f64;
    if aspect_ratio > 1.0 {
        let cell_width = (max_height as f64 * aspect_ratio) as u32;
        CellSize::new(cell_width, max_height)
    } else {
        let cell_height = (max_width as f64 / aspect_ratio) as u32;
        CellSize::new(max_width, cell_height)
    }
}
