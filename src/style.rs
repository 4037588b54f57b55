//! Lowering workbook styles into canvas primitives.
//!
//! Workbook colors are ARGB hex strings; the canvas side wants
//! `#RRGGBBAA`. Borders lower to a width/dash pair pre-scaled to device
//! pixels, fonts to a single font string shared by the measurement and
//! drawing surfaces, and alignment values are validated against the
//! closed canvas vocabulary with unrecognised values falling back to the
//! configured defaults.

use crate::config::DrawParams;
use crate::model::{BorderEdge, Borders, CellAlignment, CellFont, Fill};

/// Convert an ARGB hex string (no `#`) to `#RRGGBBAA`.
///
/// The leading alpha pair moves to the back: `FF0080C0` -> `#0080C0FF`.
pub fn argb_to_rgba(argb: &str) -> Option<String> {
    if argb.len() != 8 || !argb.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let (alpha, rgb) = argb.split_at(2);
    Some(format!("#{rgb}{alpha}"))
}

/// Horizontal text alignment, the canvas `textAlign` vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    Start,
    End,
}

impl TextAlign {
    /// Validate a workbook alignment value; `None` for anything outside
    /// the vocabulary.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "center" => Some(Self::Center),
            "start" => Some(Self::Start),
            "end" => Some(Self::End),
            _ => None,
        }
    }
}

/// Vertical text anchoring, the canvas `textBaseline` vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    Top,
    Hanging,
    Middle,
    Alphabetic,
    Ideographic,
    #[default]
    Bottom,
}

impl TextBaseline {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "top" => Some(Self::Top),
            "hanging" => Some(Self::Hanging),
            "middle" => Some(Self::Middle),
            "alphabetic" => Some(Self::Alphabetic),
            "ideographic" => Some(Self::Ideographic),
            "bottom" => Some(Self::Bottom),
            _ => None,
        }
    }
}

/// A lowered border side, ready to stroke.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanvasBorder {
    pub color: String,
    /// `None` means no line; width and segments are then zero/empty.
    pub style: Option<crate::model::BorderStyle>,
    /// Line width in device pixels.
    pub width: f32,
    /// Dash pattern in device pixels; empty is solid.
    pub segments: Vec<f32>,
}

/// All four lowered border sides.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CanvasBorders {
    pub left: CanvasBorder,
    pub top: CanvasBorder,
    pub right: CanvasBorder,
    pub bottom: CanvasBorder,
}

/// Lowered alignment attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasAlignment {
    pub horizontal: TextAlign,
    pub vertical: TextBaseline,
    pub wrap_text: bool,
    pub shrink_to_fit: bool,
    pub indent: u32,
    pub text_direction: String,
    pub text_rotation: i32,
}

/// The lowered text block of a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct CanvasCellText {
    pub color: String,
    /// Font string shared by the measurement and drawing surfaces.
    pub font: String,
    pub alignment: CanvasAlignment,
    /// Line advance in device pixels.
    pub line_height: f32,
    pub value: String,
}

/// Background color for a cell: pattern fills use their background
/// color, anything else falls back to the canvas background.
pub fn lower_background(fill: Option<&Fill>, params: &DrawParams) -> String {
    match fill {
        Some(Fill::Pattern { bg_color }) => bg_color
            .as_deref()
            .and_then(argb_to_rgba)
            .unwrap_or_else(|| params.background_color.clone()),
        _ => params.background_color.clone(),
    }
}

fn lower_border_side(edge: Option<&BorderEdge>, params: &DrawParams) -> CanvasBorder {
    let color = edge
        .and_then(|e| e.color.as_deref())
        .and_then(argb_to_rgba)
        .unwrap_or_else(|| params.border_fallback_color.clone());
    let style = edge
        .and_then(|e| e.style)
        .or(params.border_fallback_style);

    match style {
        None => CanvasBorder {
            color,
            style: None,
            width: 0.0,
            segments: Vec::new(),
        },
        Some(style) => CanvasBorder {
            color,
            style: Some(style),
            width: params.border_width_px(style),
            segments: params.border_segments_px(style),
        },
    }
}

/// Lower all four border sides of a cell.
pub fn lower_borders(borders: Option<&Borders>, params: &DrawParams) -> CanvasBorders {
    CanvasBorders {
        left: lower_border_side(borders.and_then(|b| b.left.as_ref()), params),
        top: lower_border_side(borders.and_then(|b| b.top.as_ref()), params),
        right: lower_border_side(borders.and_then(|b| b.right.as_ref()), params),
        bottom: lower_border_side(borders.and_then(|b| b.bottom.as_ref()), params),
    }
}

/// The generic family keyword for a numeric font family hint.
fn generic_family(family: Option<u32>) -> &'static str {
    match family {
        Some(1) => "serif",
        Some(2) => "sans-serif",
        Some(3) => "monospace",
        _ => "",
    }
}

/// Build the font string used by both the measurement and the drawing
/// surfaces, e.g. `"italic bold 26.666666px Arial sans-serif"`.
pub fn font_string(font: Option<&CellFont>, params: &DrawParams) -> String {
    let size_points = font
        .and_then(|f| f.size)
        .unwrap_or(params.text_fallback_font_size);
    let size_px = params.scale.points_to_px(size_points);
    let name = font
        .and_then(|f| f.name.as_deref())
        .unwrap_or(&params.text_fallback_font_family_name);

    let mut out = String::new();
    if font.is_some_and(|f| f.italic) {
        out.push_str("italic ");
    }
    if font.is_some_and(|f| f.bold) {
        out.push_str("bold ");
    }
    out.push_str(&format!("{size_px}px {name}"));
    let generic = generic_family(font.and_then(|f| f.family));
    if !generic.is_empty() {
        out.push(' ');
        out.push_str(generic);
    }
    out
}

fn lower_alignment(alignment: Option<&CellAlignment>, params: &DrawParams) -> CanvasAlignment {
    let fallback_horizontal =
        TextAlign::parse(&params.text_fallback_alignment_horizontal).unwrap_or_default();
    let fallback_vertical =
        TextBaseline::parse(&params.text_fallback_alignment_vertical).unwrap_or_default();

    CanvasAlignment {
        horizontal: alignment
            .and_then(|a| a.horizontal.as_deref())
            .and_then(TextAlign::parse)
            .unwrap_or(fallback_horizontal),
        vertical: alignment
            .and_then(|a| a.vertical.as_deref())
            .and_then(TextBaseline::parse)
            .unwrap_or(fallback_vertical),
        wrap_text: alignment
            .and_then(|a| a.wrap_text)
            .unwrap_or(params.text_fallback_alignment_wrap_text),
        shrink_to_fit: alignment
            .and_then(|a| a.shrink_to_fit)
            .unwrap_or(params.text_fallback_alignment_shrink_to_fit),
        indent: alignment
            .and_then(|a| a.indent)
            .unwrap_or(params.text_fallback_alignment_indent),
        text_direction: alignment
            .and_then(|a| a.text_direction.clone())
            .unwrap_or_else(|| params.text_fallback_alignment_text_direction.clone()),
        text_rotation: alignment
            .and_then(|a| a.text_rotation)
            .unwrap_or(params.text_fallback_alignment_text_rotation),
    }
}

/// Lower a cell's value plus font/alignment attributes into the text
/// block consumed by the draw orchestrator.
pub fn lower_text(
    value: String,
    font: Option<&CellFont>,
    alignment: Option<&CellAlignment>,
    params: &DrawParams,
) -> CanvasCellText {
    let size_points = font
        .and_then(|f| f.size)
        .unwrap_or(params.text_fallback_font_size);
    let color = font
        .and_then(|f| f.color.as_deref())
        .and_then(argb_to_rgba)
        .unwrap_or_else(|| params.text_fallback_color.clone());

    CanvasCellText {
        color,
        font: font_string(font, params),
        alignment: lower_alignment(alignment, params),
        line_height: params.scale.points_to_px(size_points) * params.text_line_height,
        value,
    }
}
