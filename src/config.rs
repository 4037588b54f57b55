//! Renderer configuration and per-draw drawing parameters.
//!
//! [`RenderOptions`] is the caller-facing surface with one field per
//! recognised option; [`DrawParams`] is the resolved form computed once
//! at the start of each draw, with every point-valued quantity already
//! multiplied into device pixels.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::BorderStyle;
use crate::units::Scale;

/// Points per character of the reference font.
pub const DEFAULT_CHARACTER_UNIT: f32 = 5.85;

/// Default raster density.
pub const DEFAULT_DPI: f32 = 192.0;

/// Caller-facing render options. All fields have defaults; deserialise
/// from a partial map or start from `RenderOptions::default()` and
/// override fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Points per character unit for column widths.
    pub character_unit: f32,
    /// Raster density in dots per inch.
    pub dpi: f32,

    /// Border color when a border declares none.
    pub border_fallback_color: String,
    /// Border style when a border declares none; `None` means no line.
    pub border_fallback_style: Option<BorderStyle>,
    /// Per-style border line widths in points.
    pub border_point_width_map: HashMap<BorderStyle, f32>,
    /// Per-style dash patterns in points; an absent or empty entry is a
    /// solid line.
    pub border_point_segments_map: HashMap<BorderStyle, Vec<f32>>,

    pub text_fallback_color: String,
    pub text_fallback_font_family_name: String,
    /// Font size fallback in points.
    pub text_fallback_font_size: f32,
    pub text_fallback_alignment_horizontal: String,
    pub text_fallback_alignment_vertical: String,
    pub text_fallback_alignment_wrap_text: bool,
    pub text_fallback_alignment_shrink_to_fit: bool,
    pub text_fallback_alignment_indent: u32,
    pub text_fallback_alignment_text_direction: String,
    pub text_fallback_alignment_text_rotation: i32,
    /// Line height as a multiple of the font size.
    pub text_line_height: f32,

    pub background_color: String,
    /// Column width in character units when neither the column nor the
    /// sheet declares one.
    pub fallback_col_char_unit_width: f32,
    /// Inset between a cell edge and its text, in points.
    pub cell_point_padding: f32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            character_unit: DEFAULT_CHARACTER_UNIT,
            dpi: DEFAULT_DPI,
            border_fallback_color: "lightgray".to_string(),
            border_fallback_style: None,
            border_point_width_map: default_border_point_width_map(),
            border_point_segments_map: default_border_point_segments_map(),
            text_fallback_color: "black".to_string(),
            text_fallback_font_family_name: "Arial".to_string(),
            text_fallback_font_size: 10.0,
            text_fallback_alignment_horizontal: "left".to_string(),
            text_fallback_alignment_vertical: "bottom".to_string(),
            text_fallback_alignment_wrap_text: false,
            text_fallback_alignment_shrink_to_fit: false,
            text_fallback_alignment_indent: 0,
            text_fallback_alignment_text_direction: "inherit".to_string(),
            text_fallback_alignment_text_rotation: 0,
            text_line_height: 1.2,
            background_color: "white".to_string(),
            fallback_col_char_unit_width: 13.0,
            cell_point_padding: 2.0,
        }
    }
}

fn default_border_point_width_map() -> HashMap<BorderStyle, f32> {
    BorderStyle::ALL
        .iter()
        .map(|&style| {
            let width = match style {
                BorderStyle::Hair => 0.5,
                BorderStyle::Thin
                | BorderStyle::Double
                | BorderStyle::Dotted
                | BorderStyle::Dashed
                | BorderStyle::DashDot
                | BorderStyle::DashDotDot => 0.75,
                BorderStyle::Medium
                | BorderStyle::MediumDashDot
                | BorderStyle::MediumDashDotDot
                | BorderStyle::MediumDashed
                | BorderStyle::SlantDashDot => 1.5,
                BorderStyle::Thick => 2.25,
            };
            (style, width)
        })
        .collect()
}

fn default_border_point_segments_map() -> HashMap<BorderStyle, Vec<f32>> {
    let mut segments = HashMap::new();
    for style in [
        BorderStyle::DashDot,
        BorderStyle::MediumDashDot,
        BorderStyle::SlantDashDot,
    ] {
        segments.insert(style, vec![4.0, 2.0, 2.0, 2.0]);
    }
    for style in [BorderStyle::DashDotDot, BorderStyle::MediumDashDotDot] {
        segments.insert(style, vec![4.0, 2.0, 2.0, 2.0, 2.0, 2.0]);
    }
    for style in [BorderStyle::Dashed, BorderStyle::MediumDashed] {
        segments.insert(style, vec![4.0]);
    }
    segments.insert(BorderStyle::Dotted, vec![2.0]);
    segments
}

/// Resolved drawing parameters for one draw. Pixel values are pre-scaled
/// here so `pixel_per_point` is applied exactly once per quantity.
#[derive(Debug, Clone)]
pub struct DrawParams {
    pub scale: Scale,

    pub border_fallback_color: String,
    pub border_fallback_style: Option<BorderStyle>,
    /// Per-style line widths in device pixels.
    pub border_pixel_width: HashMap<BorderStyle, f32>,
    /// Per-style dash patterns in device pixels.
    pub border_pixel_segments: HashMap<BorderStyle, Vec<f32>>,

    pub text_fallback_color: String,
    pub text_fallback_font_family_name: String,
    pub text_fallback_font_size: f32,
    pub text_fallback_alignment_horizontal: String,
    pub text_fallback_alignment_vertical: String,
    pub text_fallback_alignment_wrap_text: bool,
    pub text_fallback_alignment_shrink_to_fit: bool,
    pub text_fallback_alignment_indent: u32,
    pub text_fallback_alignment_text_direction: String,
    pub text_fallback_alignment_text_rotation: i32,
    pub text_line_height: f32,

    pub background_color: String,
    pub fallback_col_char_unit_width: f32,
    /// Cell text inset in device pixels.
    pub cell_pixel_padding: f32,
}

impl DrawParams {
    pub fn resolve(options: &RenderOptions) -> Self {
        let scale = Scale::new(options.character_unit, options.dpi);
        let ppp = scale.pixel_per_point;

        let border_pixel_width = options
            .border_point_width_map
            .iter()
            .map(|(&style, &points)| (style, points * ppp))
            .collect();
        let border_pixel_segments = options
            .border_point_segments_map
            .iter()
            .map(|(&style, points)| (style, points.iter().map(|p| p * ppp).collect()))
            .collect();

        Self {
            scale,
            border_fallback_color: options.border_fallback_color.clone(),
            border_fallback_style: options.border_fallback_style,
            border_pixel_width,
            border_pixel_segments,
            text_fallback_color: options.text_fallback_color.clone(),
            text_fallback_font_family_name: options.text_fallback_font_family_name.clone(),
            text_fallback_font_size: options.text_fallback_font_size,
            text_fallback_alignment_horizontal: options
                .text_fallback_alignment_horizontal
                .clone(),
            text_fallback_alignment_vertical: options.text_fallback_alignment_vertical.clone(),
            text_fallback_alignment_wrap_text: options.text_fallback_alignment_wrap_text,
            text_fallback_alignment_shrink_to_fit: options.text_fallback_alignment_shrink_to_fit,
            text_fallback_alignment_indent: options.text_fallback_alignment_indent,
            text_fallback_alignment_text_direction: options
                .text_fallback_alignment_text_direction
                .clone(),
            text_fallback_alignment_text_rotation: options.text_fallback_alignment_text_rotation,
            text_line_height: options.text_line_height,
            background_color: options.background_color.clone(),
            fallback_col_char_unit_width: options.fallback_col_char_unit_width,
            cell_pixel_padding: options.cell_point_padding * ppp,
        }
    }

    /// Line width in device pixels for a declared border style.
    pub fn border_width_px(&self, style: BorderStyle) -> f32 {
        self.border_pixel_width.get(&style).copied().unwrap_or(0.0)
    }

    /// Dash pattern in device pixels for a declared border style; empty
    /// means solid.
    pub fn border_segments_px(&self, style: BorderStyle) -> Vec<f32> {
        self.border_pixel_segments
            .get(&style)
            .cloned()
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = RenderOptions::default();
        assert_eq!(options.character_unit, 5.85);
        assert_eq!(options.dpi, 192.0);
        assert_eq!(options.text_fallback_font_size, 10.0);
        assert_eq!(options.fallback_col_char_unit_width, 13.0);
        assert_eq!(options.border_point_width_map.len(), BorderStyle::ALL.len());
        assert_eq!(
            options.border_point_segments_map.get(&BorderStyle::Dotted),
            Some(&vec![2.0])
        );
        assert_eq!(
            options.border_point_segments_map.get(&BorderStyle::DashDotDot),
            Some(&vec![4.0, 2.0, 2.0, 2.0, 2.0, 2.0])
        );
        assert!(!options
            .border_point_segments_map
            .contains_key(&BorderStyle::Thin));
    }

    #[test]
    fn test_partial_deserialisation_keeps_defaults() {
        let options: RenderOptions = serde_json::from_str(r#"{"dpi": 96}"#).unwrap();
        assert_eq!(options.dpi, 96.0);
        assert_eq!(options.character_unit, 5.85);
        assert_eq!(options.background_color, "white");
    }

    #[test]
    fn test_resolve_prescales_point_values() {
        let params = DrawParams::resolve(&RenderOptions::default());
        let ppp = 192.0 / 72.0;
        assert_eq!(params.scale.pixel_per_point, ppp);
        assert_eq!(params.cell_pixel_padding, 2.0 * ppp);
        assert_eq!(params.border_width_px(BorderStyle::Thick), 2.25 * ppp);
        assert_eq!(
            params.border_segments_px(BorderStyle::Dashed),
            vec![4.0 * ppp]
        );
        // Undeclared segments stay solid.
        assert!(params.border_segments_px(BorderStyle::Thin).is_empty());
    }
}
