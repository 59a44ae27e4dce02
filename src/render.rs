//! Title text rendering.
//!
//! [`RenderContext`] owns a parsed font, a pixel size and a text colour. It is
//! built once by the caller and passed by reference to every build that
//! draws a title; nothing in the crate holds font state globally. The
//! context is immutable and `Sync`, so batch workers share one instance.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::fs;
use std::path::Path;

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use fontdue::{Font, FontSettings};
use image::{Rgb, RgbImage};

use crate::error::ThumbnailError;

/// Default title size in pixels.
pub const DEFAULT_FONT_SIZE: f32 = 32.0;

/// Ink bounding box of a laid-out string, relative to the layout origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextBounds {
    /// Leftmost inked column.
    pub left: i32,
    /// Topmost inked row.
    pub top: i32,
    /// Width of the inked area.
    pub width: u32,
    /// Height of the inked area.
    pub height: u32,
}

/// Font, size and colour used to draw sheet titles.
pub struct RenderContext {
    font: Font,
    size: f32,
    color: Rgb<u8>,
}

impl Debug for RenderContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("RenderContext")
            .field("size", &self.size)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}

/// One glyph placed by the layout engine.
struct PlacedGlyph {
    x: i32,
    y: i32,
    width: usize,
    height: usize,
    coverage: Vec<u8>,
}

impl RenderContext {
    /// Parse a TrueType or OpenType font from memory.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbnailError::FontLoad`] if the bytes are not a usable
    /// font or `size` is not a positive number.
    pub fn from_bytes(bytes: Vec<u8>, size: f32) -> Result<Self, ThumbnailError> {
        if !(size.is_finite() && size > 0.0) {
            return Err(ThumbnailError::FontLoad(format!(
                "font size must be positive, got {size}"
            )));
        }
        let font = Font::from_bytes(bytes, FontSettings::default())
            .map_err(|reason| ThumbnailError::FontLoad(reason.to_string()))?;
        Ok(Self {
            font,
            size,
            color: Rgb([0, 0, 0]),
        })
    }

    /// Read and parse a font file.
    ///
    /// # Errors
    ///
    /// Returns [`ThumbnailError::FontLoad`] if the file cannot be read or
    /// parsed.
    pub fn from_file<P: AsRef<Path>>(path: P, size: f32) -> Result<Self, ThumbnailError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|error| {
            ThumbnailError::FontLoad(format!("cannot read {}: {error}", path.display()))
        })?;
        Self::from_bytes(bytes, size)
    }

    /// Use `color` for the title text. Defaults to black.
    #[must_use]
    pub fn with_color(mut self, color: Rgb<u8>) -> Self {
        self.color = color;
        self
    }

    /// Pixel size of the font.
    pub fn size(&self) -> f32 {
        self.size
    }

    /// Measure the ink bounding box of `text`.
    ///
    /// Text without any visible glyph measures zero by zero.
    pub fn measure(&self, text: &str) -> TextBounds {
        bounds_of(&self.layout(text))
    }

    /// Draw `text` so that its ink box's top-left corner lands at `(x, y)`.
    ///
    /// Glyph coverage is alpha-blended over the existing pixels; anything
    /// falling outside the canvas is clipped.
    pub fn draw(&self, canvas: &mut RgbImage, x: u32, y: u32, text: &str) {
        let glyphs = self.layout(text);
        let bounds = bounds_of(&glyphs);
        let offset_x = x as i32 - bounds.left;
        let offset_y = y as i32 - bounds.top;

        for glyph in &glyphs {
            for row in 0..glyph.height {
                for column in 0..glyph.width {
                    let alpha = glyph.coverage[row * glyph.width + column];
                    if alpha == 0 {
                        continue;
                    }
                    let pixel_x = offset_x + glyph.x + column as i32;
                    let pixel_y = offset_y + glyph.y + row as i32;
                    if pixel_x < 0
                        || pixel_y < 0
                        || pixel_x >= canvas.width() as i32
                        || pixel_y >= canvas.height() as i32
                    {
                        continue;
                    }
                    let pixel = canvas.get_pixel_mut(pixel_x as u32, pixel_y as u32);
                    *pixel = blend(*pixel, self.color, alpha);
                }
            }
        }
    }

    fn layout(&self, text: &str) -> Vec<PlacedGlyph> {
        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[&self.font], &TextStyle::new(text, self.size, 0));

        layout
            .glyphs()
            .iter()
            .filter(|glyph| glyph.width > 0 && glyph.height > 0)
            .map(|glyph| {
                let (_, coverage) = self.font.rasterize_config(glyph.key);
                PlacedGlyph {
                    x: glyph.x.round() as i32,
                    y: glyph.y.round() as i32,
                    width: glyph.width,
                    height: glyph.height,
                    coverage,
                }
            })
            .collect()
    }
}

fn bounds_of(glyphs: &[PlacedGlyph]) -> TextBounds {
    let mut boxes = glyphs.iter().map(|glyph| {
        (
            glyph.x,
            glyph.y,
            glyph.x + glyph.width as i32,
            glyph.y + glyph.height as i32,
        )
    });
    let Some(first) = boxes.next() else {
        return TextBounds::default();
    };
    let (left, top, right, bottom) = boxes.fold(first, |acc, next| {
        (
            acc.0.min(next.0),
            acc.1.min(next.1),
            acc.2.max(next.2),
            acc.3.max(next.3),
        )
    });
    TextBounds {
        left,
        top,
        width: (right - left) as u32,
        height: (bottom - top) as u32,
    }
}

fn blend(background: Rgb<u8>, foreground: Rgb<u8>, alpha: u8) -> Rgb<u8> {
    let alpha = u32::from(alpha);
    let mix = |back: u8, front: u8| {
        ((u32::from(front) * alpha + u32::from(back) * (255 - alpha) + 127) / 255) as u8
    };
    Rgb([
        mix(background[0], foreground[0]),
        mix(background[1], foreground[1]),
        mix(background[2], foreground[2]),
    ])
}
