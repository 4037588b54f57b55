//! The read-only workbook object model the renderer consumes.
//!
//! The renderer is polymorphic over whatever the upstream parser
//! produces: workbooks, worksheets, and cells are capability traits, and
//! the styling attached to a cell is plain data. Nothing here is ever
//! mutated during a draw.

use serde::{Deserialize, Serialize};

/// A workbook: a list of worksheets plus an image store.
pub trait Workbook {
    type Sheet: Worksheet;

    /// Number of worksheets in the workbook.
    fn worksheet_count(&self) -> usize;

    /// Fetch a worksheet by 1-based index.
    fn worksheet_by_index(&self, index: u32) -> Option<&Self::Sheet>;

    /// Fetch a worksheet by name.
    fn worksheet_by_name(&self, name: &str) -> Option<&Self::Sheet>;

    /// The worksheet drawn when the caller names none.
    fn default_worksheet(&self) -> Option<&Self::Sheet> {
        self.worksheet_by_index(1)
    }

    /// Fetch the payload for an embedded image by numeric id.
    fn image(&self, id: u32) -> Option<ImagePayload>;
}

/// A single worksheet: dimensions, band properties, cells, merges, and
/// anchored images.
pub trait Worksheet {
    type Cell: Cell;

    fn column_count(&self) -> u32;
    fn row_count(&self) -> u32;

    /// Default column width in character units, when the sheet declares one.
    fn default_col_width(&self) -> Option<f32>;

    /// Default row height in points.
    fn default_row_height(&self) -> f32;

    /// Properties for a 1-based column number. `None` means the column
    /// carries no explicit properties (defaults apply).
    fn column(&self, number: u32) -> Option<ColumnInfo>;

    /// All row records in order. An empty result means the sheet yields
    /// no data and the draw becomes a no-op.
    fn rows(&self) -> Vec<RowInfo>;

    /// The cell at a 1-based (col, row) coordinate, if present.
    fn cell(&self, col: u32, row: u32) -> Option<&Self::Cell>;

    /// Merged ranges as textual range references, in workbook order.
    fn merges(&self) -> Vec<String>;

    /// Embedded images with their placements, in workbook order.
    fn images(&self) -> Vec<SheetImage>;
}

/// A cell: its display text plus optional styling.
pub trait Cell {
    /// The cell's display text. `None` when the value cannot be read;
    /// the renderer substitutes an empty string and never aborts.
    fn text(&self) -> Option<String>;

    /// Whether the cell belongs to a merged range.
    fn is_merged(&self) -> bool;

    fn fill(&self) -> Option<Fill>;
    fn border(&self) -> Option<Borders>;
    fn font(&self) -> Option<CellFont>;
    fn alignment(&self) -> Option<CellAlignment>;
}

/// Explicit column properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnInfo {
    pub number: u32,
    /// Width in character units.
    pub width: Option<f32>,
    pub hidden: bool,
    pub collapsed: bool,
}

/// Explicit row properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RowInfo {
    pub number: u32,
    /// Height in points.
    pub height: Option<f32>,
    pub hidden: bool,
    pub collapsed: bool,
}

/// A cell fill. Only pattern fills carry a usable background color; any
/// other fill kind falls back to the configured canvas background.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Fill {
    #[serde(rename_all = "camelCase")]
    Pattern {
        /// ARGB hex without `#`, e.g. `FF0080C0`.
        bg_color: Option<String>,
    },
    Gradient,
}

/// One directional border edge.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderEdge {
    /// ARGB hex without `#`.
    pub color: Option<String>,
    pub style: Option<BorderStyle>,
}

/// The four directional borders of a cell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Borders {
    pub left: Option<BorderEdge>,
    pub top: Option<BorderEdge>,
    pub right: Option<BorderEdge>,
    pub bottom: Option<BorderEdge>,
}

/// The closed set of border line styles a workbook can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BorderStyle {
    Hair,
    Thin,
    Double,
    Dotted,
    Dashed,
    DashDot,
    DashDotDot,
    Medium,
    MediumDashDot,
    MediumDashDotDot,
    MediumDashed,
    SlantDashDot,
    Thick,
}

impl BorderStyle {
    /// Every declared style, for building the per-style config maps.
    pub const ALL: [BorderStyle; 13] = [
        BorderStyle::Hair,
        BorderStyle::Thin,
        BorderStyle::Double,
        BorderStyle::Dotted,
        BorderStyle::Dashed,
        BorderStyle::DashDot,
        BorderStyle::DashDotDot,
        BorderStyle::Medium,
        BorderStyle::MediumDashDot,
        BorderStyle::MediumDashDotDot,
        BorderStyle::MediumDashed,
        BorderStyle::SlantDashDot,
        BorderStyle::Thick,
    ];
}

/// Font attributes attached to a cell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CellFont {
    pub name: Option<String>,
    /// Numeric font family hint: 1 = serif, 2 = sans-serif, 3 = monospace.
    pub family: Option<u32>,
    /// Size in points.
    pub size: Option<f32>,
    pub bold: bool,
    pub italic: bool,
    /// ARGB hex without `#`.
    pub color: Option<String>,
}

/// Alignment attributes attached to a cell. Values are validated during
/// style lowering; unrecognised ones fall back to the configured defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CellAlignment {
    pub horizontal: Option<String>,
    pub vertical: Option<String>,
    pub wrap_text: Option<bool>,
    pub shrink_to_fit: Option<bool>,
    pub indent: Option<u32>,
    pub text_direction: Option<String>,
    pub text_rotation: Option<i32>,
}

/// Image bytes as stored in the workbook: either a raw buffer or a
/// base64 string.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ImagePayload {
    Buffer(Vec<u8>),
    Base64(String),
}

/// Reference from a worksheet to an image in the workbook store.
/// Textual ids are normalised by decimal parse before lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageKey {
    Id(u32),
    Text(String),
}

impl ImageKey {
    /// Normalise to the numeric id the workbook store is keyed by.
    pub fn to_id(&self) -> Option<u32> {
        match self {
            ImageKey::Id(id) => Some(*id),
            ImageKey::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// One embedded image on a worksheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetImage {
    pub image_id: ImageKey,
    pub placement: ImagePlacement,
}

/// Where an image sits: a textual cell range, or explicit anchors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImagePlacement {
    Range(String),
    Anchors(AnchorSpec),
}

/// Anchor-based placement: a top-left and/or bottom-right anchor, plus
/// an optional extent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnchorSpec {
    pub tl: Option<ModelAnchor>,
    pub br: Option<ModelAnchor>,
    pub ext: Option<Extent>,
}

/// A raw anchor record: a 0-based cell corner plus EMU offsets into it.
/// `native_col`/`native_row` are preferred over `col`/`row` when both
/// are present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ModelAnchor {
    pub native_col: Option<u32>,
    pub native_row: Option<u32>,
    pub col: Option<u32>,
    pub row: Option<u32>,
    pub native_col_off: Option<i64>,
    pub native_row_off: Option<i64>,
}

impl ModelAnchor {
    /// The 0-based column this anchor refers to.
    pub fn column(&self) -> u32 {
        self.native_col.or(self.col).unwrap_or(0)
    }

    /// The 0-based row this anchor refers to.
    pub fn row(&self) -> u32 {
        self.native_row.or(self.row).unwrap_or(0)
    }

    pub fn col_offset_emu(&self) -> i64 {
        self.native_col_off.unwrap_or(0)
    }

    pub fn row_offset_emu(&self) -> i64 {
        self.native_row_off.unwrap_or(0)
    }
}

/// An image extent declared as pixels at 96 DPI.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}
