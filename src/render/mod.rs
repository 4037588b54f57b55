//! Rendering engine with a pluggable raster surface.
//!
//! This module provides:
//! - The backend-agnostic [`RasterSurface`] trait and paint types
//! - The draw orchestrator ([`SheetRenderer`])
//! - The asynchronous image compositor
//! - A software backend on tiny-skia ([`PixmapSurface`])

pub mod colors;
pub mod images;
pub mod pixmap;
pub mod renderer;
pub mod surface;

pub use pixmap::PixmapSurface;
pub use renderer::{SheetRenderer, SheetSelector};
pub use surface::{RasterSurface, StrokePaint, TextPaint};
