//! The process-wide text stack: font-string parsing and the shared
//! measurement surface.
//!
//! One `FontSystem` serves the whole process for the lifetime of the
//! renderer; it is created lazily and guarded by a mutex. Measurement
//! fails fatally at startup when no usable fonts exist, per the error
//! taxonomy.

use std::sync::{Mutex, MutexGuard, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping, Style, Weight};

use crate::error::{RasterError, Result};
use crate::text::MeasureSurface;

/// A parsed font string, e.g. `"italic bold 26.6px Calibri sans-serif"`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FontSpec {
    pub italic: bool,
    pub bold: bool,
    /// Size in device pixels.
    pub px: f32,
    /// Primary family name; empty means "whatever the shaper picks".
    pub family: String,
    /// Trailing generic family keyword, if any.
    pub generic: Option<Generic>,
}

/// Generic font families the style lowering can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generic {
    Serif,
    SansSerif,
    Monospace,
}

impl Generic {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "serif" => Some(Self::Serif),
            "sans-serif" => Some(Self::SansSerif),
            "monospace" => Some(Self::Monospace),
            _ => None,
        }
    }

    fn family(self) -> Family<'static> {
        match self {
            Self::Serif => Family::Serif,
            Self::SansSerif => Family::SansSerif,
            Self::Monospace => Family::Monospace,
        }
    }
}

impl FontSpec {
    /// Parse the font-string format produced by style lowering. Unknown
    /// leading tokens are ignored; a missing size yields `px = 0`.
    pub fn parse(font: &str) -> Self {
        let mut spec = FontSpec::default();
        let mut rest: Vec<&str> = Vec::new();
        let mut saw_size = false;

        for token in font.split_whitespace() {
            if saw_size {
                rest.push(token);
                continue;
            }
            match token {
                "italic" => spec.italic = true,
                "bold" => spec.bold = true,
                _ => {
                    if let Some(px) = token
                        .strip_suffix("px")
                        .and_then(|n| n.parse::<f32>().ok())
                    {
                        spec.px = px;
                        saw_size = true;
                    }
                }
            }
        }

        if let Some(last) = rest.last().copied().and_then(Generic::parse) {
            spec.generic = Some(last);
            rest.pop();
        }
        spec.family = rest.join(" ");
        spec
    }

    pub(crate) fn attrs(&self) -> Attrs<'_> {
        let mut attrs = Attrs::new()
            .weight(if self.bold { Weight::BOLD } else { Weight::NORMAL })
            .style(if self.italic { Style::Italic } else { Style::Normal });
        if !self.family.is_empty() {
            attrs = attrs.family(Family::Name(&self.family));
        } else if let Some(generic) = self.generic {
            attrs = attrs.family(generic.family());
        }
        attrs
    }
}

static FONT_SYSTEM: OnceLock<Mutex<FontSystem>> = OnceLock::new();

/// Lock the process-wide `FontSystem`, creating it on first use.
pub fn font_system() -> MutexGuard<'static, FontSystem> {
    let mutex = FONT_SYSTEM.get_or_init(|| Mutex::new(FontSystem::new()));
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// The measurement surface backed by the shared `FontSystem`.
///
/// Construction is the renderer's fatal init point: it fails when the
/// font database is empty, since every measurement would be zero.
#[derive(Debug, Clone, Copy)]
pub struct SystemTextMeasurer;

impl SystemTextMeasurer {
    pub fn shared() -> Result<Self> {
        let fonts = font_system().db().faces().count();
        if fonts == 0 {
            return Err(RasterError::MeasurementSurface(
                "no fonts available to the shared font system".to_string(),
            ));
        }
        Ok(Self)
    }
}

impl MeasureSurface for SystemTextMeasurer {
    fn measure_text_width(&mut self, font: &str, text: &str) -> f32 {
        let spec = FontSpec::parse(font);
        if spec.px <= 0.0 || text.is_empty() {
            return 0.0;
        }
        let mut fs = font_system();
        let mut buffer = Buffer::new(&mut fs, Metrics::new(spec.px, spec.px));
        buffer.set_text(&mut fs, text, spec.attrs(), Shaping::Advanced);
        buffer.shape_until_scroll(&mut fs, false);
        buffer
            .layout_runs()
            .map(|run| run.line_w)
            .fold(0.0, f32::max)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_font_string() {
        let spec = FontSpec::parse("italic bold 26.5px Times New Roman serif");
        assert!(spec.italic);
        assert!(spec.bold);
        assert_eq!(spec.px, 26.5);
        assert_eq!(spec.family, "Times New Roman");
        assert_eq!(spec.generic, Some(Generic::Serif));
    }

    #[test]
    fn test_parse_minimal_font_string() {
        let spec = FontSpec::parse("20px Arial");
        assert!(!spec.italic);
        assert!(!spec.bold);
        assert_eq!(spec.px, 20.0);
        assert_eq!(spec.family, "Arial");
        assert_eq!(spec.generic, None);
    }

    #[test]
    fn test_parse_generic_only() {
        let spec = FontSpec::parse("16px monospace");
        assert_eq!(spec.family, "");
        assert_eq!(spec.generic, Some(Generic::Monospace));
    }
}
