//! Structured error types for xlraster.
//!
//! Per-item problems during a draw (malformed references, unresolved
//! anchors, unreadable images) are silent skips and never surface here;
//! only fatal initialisation failures and raster-surface failures do.

/// All errors that can occur while setting up or running the renderer.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// The shared text-measurement surface could not be created.
    /// Raised once at startup; the renderer cannot be used without it.
    #[error("Measurement surface unavailable: {0}")]
    MeasurementSurface(String),

    /// A raster-surface operation failed. Surface errors are not caught
    /// by the renderer; they terminate the current draw.
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, RasterError>;

impl From<String> for RasterError {
    fn from(s: String) -> Self {
        Self::Surface(s)
    }
}

impl From<&str> for RasterError {
    fn from(s: &str) -> Self {
        Self::Surface(s.to_string())
    }
}
