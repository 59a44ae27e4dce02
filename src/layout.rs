//! Grid layout.
//!
//! [`GridLayout`] fixes the canvas size and the pixel offset of every cell
//! before any frame is decoded. Cells are filled row-major; every cell is
//! surrounded by `border` pixels of padding, and an optional title band sits
//! between the top border and the first row.
//!
//! ```text
//! border
//! title band (title_height)    <- only when titled
//! border                       <- only when titled
//! row 0: border cell border cell ... border
//! border
//! row 1: ...
//! border
//! ```

use crate::error::ThumbnailError;
use crate::geometry::CellSize;

/// Largest canvas, in pixels, that [`GridLayout::try_new`] accepts (one
/// gigapixel, 3 GiB of RGB).
pub const MAX_CANVAS_PIXELS: u64 = 1 << 30;

/// Position of one cell on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Zero-based row.
    pub row: u32,
    /// Zero-based column.
    pub column: u32,
    /// Left edge in pixels.
    pub x: u32,
    /// Top edge in pixels.
    pub y: u32,
}

/// Canvas dimensions and cell placement for one sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridLayout {
    /// Number of cells in the grid.
    pub cells: u32,
    /// Cells per row.
    pub columns: u32,
    /// Number of rows, `ceil(cells / columns)`.
    pub rows: u32,
    /// Size of every cell.
    pub cell: CellSize,
    /// Padding around and between cells.
    pub border: u32,
    /// Height of the title band; zero when untitled.
    pub title_height: u32,
    /// Total canvas width.
    pub canvas_width: u32,
    /// Total canvas height.
    pub canvas_height: u32,
}

impl GridLayout {
    /// Lay out `cells` cells of size `cell` in `columns` columns.
    ///
    /// A non-zero `title_height` reserves a band of that height, followed by
    /// one extra border, above the first row.
    ///
    /// # Panics
    ///
    /// Panics if `columns` is zero or if either canvas side overflows `u32`.
    /// Use [`try_new`](Self::try_new) for sizes that come from user input.
    ///
    /// # Example
    ///
    /// ```
    /// use vidsheet::{CellSize, GridLayout};
    ///
    /// let layout = GridLayout::new(5, 4, CellSize::new(100, 50), 10, 0);
    /// assert_eq!(layout.rows, 2);
    /// assert_eq!((layout.canvas_width, layout.canvas_height), (450, 130));
    /// ```
    pub fn new(cells: u32, columns: u32, cell: CellSize, border: u32, title_height: u32) -> Self {
        assert!(columns >= 1, "a grid needs at least one column");
        match Self::layout(cells, columns, cell, border, title_height) {
            Some(layout) => layout,
            None => panic!("canvas size overflows u32"),
        }
    }

    /// Like [`new`](Self::new), but rejects grids that cannot be allocated.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbnailError::InvalidConfig`] if `columns` is zero, if
    /// either canvas side overflows `u32`, or if the canvas holds more than
    /// [`MAX_CANVAS_PIXELS`] pixels.
    pub fn try_new(
        cells: u32,
        columns: u32,
        cell: CellSize,
        border: u32,
        title_height: u32,
    ) -> Result<Self, ThumbnailError> {
        if columns == 0 {
            return Err(ThumbnailError::invalid_config("cell_columns", columns));
        }
        let layout = Self::layout(cells, columns, cell, border, title_height).ok_or_else(|| {
            ThumbnailError::invalid_config(
                "canvas size",
                format!(
                    "{cells} cells of {}x{} in {columns} columns with border {border}",
                    cell.width, cell.height
                ),
            )
        })?;

        let pixels = u64::from(layout.canvas_width) * u64::from(layout.canvas_height);
        if pixels > MAX_CANVAS_PIXELS {
            return Err(ThumbnailError::invalid_config(
                "canvas size",
                format!("{}x{}", layout.canvas_width, layout.canvas_height),
            ));
        }
        Ok(layout)
    }

    fn layout(
        cells: u32,
        columns: u32,
        cell: CellSize,
        border: u32,
        title_height: u32,
    ) -> Option<Self> {
        let rows = cells.div_ceil(columns);
        let canvas_width = cell
            .width
            .checked_add(border)?
            .checked_mul(columns)?
            .checked_add(border)?;
        let title_band = if title_height > 0 {
            title_height.checked_add(border)?
        } else {
            0
        };
        let canvas_height = cell
            .height
            .checked_add(border)?
            .checked_mul(rows)?
            .checked_add(title_band)?
            .checked_add(border)?;

        Some(Self {
            cells,
            columns,
            rows,
            cell,
            border,
            title_height,
            canvas_width,
            canvas_height,
        })
    }

    /// Whether a title band is reserved.
    pub fn is_titled(&self) -> bool {
        self.title_height > 0
    }

    /// Top-left corner of the title band, if one is reserved.
    pub fn title_origin(&self) -> Option<(u32, u32)> {
        self.is_titled().then_some((self.border, self.border))
    }

    /// Top edge of the first row of cells.
    fn grid_top(&self) -> u32 {
        if self.is_titled() {
            self.border + self.title_height + self.border
        } else {
            self.border
        }
    }

    /// Position of cell `index`, or `None` if the grid has no such cell.
    pub fn position(&self, index: u32) -> Option<GridPosition> {
        if index >= self.cells {
            return None;
        }
        let row = index / self.columns;
        let column = index % self.columns;
        Some(GridPosition {
            row,
            column,
            x: self.border + column * (self.cell.width + self.border),
            y: self.grid_top() + row * (self.cell.height + self.border),
        })
    }

    /// Positions of every cell, in fill order.
    pub fn positions(&self) -> Vec<GridPosition> {
        (0..self.cells).filter_map(|index| self.position(index)).collect()
    }
}
