//! The raster-surface contract.
//!
//! The orchestrator talks to the pixel buffer through this trait so
//! backends are interchangeable. Operations mirror what cell painting
//! needs: solid fills, stroked edge lines with dash patterns, filled
//! text runs, and stretched image blits. Errors from any operation are
//! not caught by the renderer; they terminate the current draw.

use crate::error::Result;
use crate::style::{TextAlign, TextBaseline};
use crate::units::Rect;

/// Stroke settings for one border line. Caps are square and joins are
/// mitered on every backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokePaint<'a> {
    pub color: &'a str,
    /// Line width in device pixels.
    pub width: f32,
    /// Dash pattern in device pixels; empty strokes solid.
    pub segments: &'a [f32],
}

/// Fill settings for one line of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextPaint<'a> {
    pub color: &'a str,
    /// Font string as produced by style lowering.
    pub font: &'a str,
    pub align: TextAlign,
    pub baseline: TextBaseline,
    /// Pass-through text direction (`"inherit"`, `"ltr"`, `"rtl"`).
    pub direction: &'a str,
    /// When set, the backend compresses glyph advances so the line fits.
    pub max_width: Option<f32>,
}

/// A 2D pixel buffer the renderer paints into.
pub trait RasterSurface {
    /// Resize the raster to the sheet's canvas size, clearing previous
    /// contents.
    fn set_size(&mut self, width: u32, height: u32) -> Result<()>;

    /// Set or clear the presentation (display) size; the raster size is
    /// unaffected.
    fn set_presentation_size(&mut self, size: Option<(f32, f32)>);

    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Fill a rectangle with a solid color.
    fn fill_rect(&mut self, rect: Rect, color: &str) -> Result<()>;

    /// Stroke a straight line between two points.
    fn stroke_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, paint: &StrokePaint)
        -> Result<()>;

    /// Draw one line of text. `x`/`y` anchor the line according to the
    /// paint's align and baseline.
    fn fill_text(&mut self, text: &str, x: f32, y: f32, paint: &TextPaint) -> Result<()>;

    /// Draw a decoded bitmap stretched to `rect`.
    fn draw_image(&mut self, bitmap: &image::RgbaImage, rect: Rect) -> Result<()>;
}
