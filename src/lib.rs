//! xlraster - paint a worksheet onto a 2D raster surface
//!
//! Takes an in-memory workbook model (worksheets, columns, rows, styled
//! cells, merged regions, embedded images) and reproduces the visual
//! layout of a spreadsheet application pixel by pixel:
//! - Column widths in character units, row heights in points, scaled to
//!   device pixels through a single DPI factor
//! - Per-cell backgrounds, four directional borders with dash patterns,
//!   styled text with alignment, wrapping, and shrink-to-fit
//! - Merged regions painted once at their bounding rect
//! - Anchor-based image placement with asynchronous decoding
//!
//! # Usage
//!
//! ```no_run
//! use xlraster::{PixmapSurface, RenderOptions, SheetRenderer, SheetSelector};
//!
//! # async fn draw(workbook: impl xlraster::Workbook) -> xlraster::Result<()> {
//! let mut surface = PixmapSurface::new(1, 1)?;
//! let mut renderer = SheetRenderer::new()?;
//! renderer
//!     .render(
//!         &mut surface,
//!         &workbook,
//!         &SheetSelector::Default,
//!         &RenderOptions::default(),
//!         None,
//!     )
//!     .await?;
//! let png = surface.encode_png()?;
//! # Ok(())
//! # }
//! ```

// Model and lowering modules
pub mod anchor;
pub mod cell_ref;
pub mod config;
pub mod error;
pub mod fonts;
pub mod model;
pub mod style;
pub mod text;
pub mod units;

// Layout and rendering modules
pub mod layout;
pub mod render;

pub use config::RenderOptions;
pub use error::{RasterError, Result};
pub use model::{Cell, Workbook, Worksheet};
pub use render::{PixmapSurface, RasterSurface, SheetRenderer, SheetSelector};

/// Paint one worksheet of `workbook` onto `surface` with a fresh
/// renderer.
///
/// `selector` picks the worksheet (the workbook default when
/// [`SheetSelector::Default`]); `display_scale`, when set, sizes the
/// surface presentation to the raster size times the scale.
///
/// # Errors
/// Fails when the measurement surface cannot be created or when a
/// raster-surface operation fails mid-draw.
pub async fn render<S, W>(
    surface: &mut S,
    workbook: &W,
    selector: &SheetSelector,
    options: &RenderOptions,
    display_scale: Option<f32>,
) -> Result<()>
where
    S: RasterSurface,
    W: Workbook,
{
    SheetRenderer::new()?
        .render(surface, workbook, selector, options, display_scale)
        .await
}

/// Get the library version
#[must_use]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
