//! Contact-sheet and run configuration.
//!
//! [`ThumbnailConfig`] describes the grid itself: how many cells, how many
//! columns, the cell bounds and the border. [`BuildOptions`] and
//! [`BatchOptions`] thread progress callbacks, cancellation tokens, and
//! worker counts through the build functions without polluting every
//! signature.
//!
//! # Example
//!
//! ```
//! use vidsheet::ThumbnailConfig;
//!
//! let config = ThumbnailConfig::new()
//!     .with_cells(9)
//!     .with_cell_columns(3)
//!     .with_cell_border(8);
//! assert!(config.validate().is_ok());
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::error::ThumbnailError;
use crate::progress::{CancellationToken, NoOpProgress, ProgressCallback};

/// Default number of cells in a sheet.
pub const DEFAULT_CELLS: u32 = 16;
/// Default number of columns in a sheet.
pub const DEFAULT_CELL_COLUMNS: u32 = 4;
/// Default maximum cell width in pixels.
pub const DEFAULT_CELL_MAX_WIDTH: u32 = 720;
/// Default maximum cell height in pixels.
pub const DEFAULT_CELL_MAX_HEIGHT: u32 = 720;
/// Default border width in pixels.
pub const DEFAULT_CELL_BORDER: u32 = 20;

/// Grid settings for one contact sheet.
///
/// The same config is shared read-only by every build in a batch. Call
/// [`validate`](ThumbnailConfig::validate) before handing a user-supplied
/// config to the compositor; the build functions validate it again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct ThumbnailConfig {
    /// Number of frames sampled into the sheet.
    pub cells: u32,
    /// Number of cells per row.
    pub cell_columns: u32,
    /// Cell width used when the source is portrait or square.
    pub cell_max_width: u32,
    /// Cell height used when the source is landscape.
    pub cell_max_height: u32,
    /// Padding around and between cells, in pixels.
    pub cell_border: u32,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl ThumbnailConfig {
    /// Create a config with the default 4x4 grid of 720px cells and a
    /// 20px border.
    pub fn new() -> Self {
        Self {
            cells: DEFAULT_CELLS,
            cell_columns: DEFAULT_CELL_COLUMNS,
            cell_max_width: DEFAULT_CELL_MAX_WIDTH,
            cell_max_height: DEFAULT_CELL_MAX_HEIGHT,
            cell_border: DEFAULT_CELL_BORDER,
        }
    }

    /// Set the number of sampled cells.
    pub fn with_cells(mut self, cells: u32) -> Self {
        self.cells = cells;
        self
    }

    /// Set the number of columns.
    pub fn with_cell_columns(mut self, columns: u32) -> Self {
        self.cell_columns = columns;
        self
    }

    /// Set both cell bounds at once.
    pub fn with_cell_max_size(mut self, width: u32, height: u32) -> Self {
        self.cell_max_width = width;
        self.cell_max_height = height;
        self
    }

    /// Set the border width.
    pub fn with_cell_border(mut self, border: u32) -> Self {
        self.cell_border = border;
        self
    }

    /// Number of grid rows needed for [`cells`](ThumbnailConfig::cells).
    pub fn rows(&self) -> u32 {
        self.cells.div_ceil(self.cell_columns.max(1))
    }

    /// Check every field against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbnailError::InvalidConfig`] naming the first field that
    /// is zero where a positive value is required.
    pub fn validate(&self) -> Result<(), ThumbnailError> {
        if self.cells < 1 {
            return Err(ThumbnailError::invalid_config("cells", self.cells));
        }
        if self.cell_columns < 1 {
            return Err(ThumbnailError::invalid_config(
                "cell_columns",
                self.cell_columns,
            ));
        }
        if self.cell_max_width < 1 {
            return Err(ThumbnailError::invalid_config(
                "cell_max_width",
                self.cell_max_width,
            ));
        }
        if self.cell_max_height < 1 {
            return Err(ThumbnailError::invalid_config(
                "cell_max_height",
                self.cell_max_height,
            ));
        }
        Ok(())
    }
}

/// Operational settings for a single build.
///
/// A default-constructed value reports nothing and never cancels.
#[derive(Clone)]
pub struct BuildOptions {
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// Cancellation token. `None` means never cancelled.
    pub(crate) cancellation: Option<CancellationToken>,
}

impl Debug for BuildOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("BuildOptions")
            .field("has_cancellation", &self.cancellation.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl BuildOptions {
    /// Create options with no progress reporting and no cancellation.
    pub fn new() -> Self {
        Self {
            progress: Arc::new(NoOpProgress),
            cancellation: None,
        }
    }

    /// Attach a progress callback, invoked once per pasted cell.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token, checked before each cell is decoded.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}

/// Operational settings for a batch run.
#[derive(Clone)]
pub struct BatchOptions {
    /// Worker count. `None` uses the available parallelism.
    pub(crate) workers: Option<usize>,
    /// Progress callback, invoked once per finished item.
    pub(crate) progress: Arc<dyn ProgressCallback>,
    /// Cancellation token. `None` means never cancelled.
    pub(crate) cancellation: Option<CancellationToken>,
}

impl Debug for BatchOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("BatchOptions")
            .field("workers", &self.workers)
            .field("has_cancellation", &self.cancellation.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchOptions {
    /// Create options with the default worker count, no progress reporting,
    /// and no cancellation.
    pub fn new() -> Self {
        Self {
            workers: None,
            progress: Arc::new(NoOpProgress),
            cancellation: None,
        }
    }

    /// Use a fixed number of workers. Clamped to a minimum of 1.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers.max(1));
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token, checked before each item starts.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
