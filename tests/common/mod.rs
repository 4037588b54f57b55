//! Common test fixtures: an in-memory workbook model, a deterministic
//! measurement surface, and a raster surface that records its op stream
//! instead of painting pixels.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::float_cmp
)]

use std::collections::HashMap;

use xlraster::error::Result;
use xlraster::model::{
    Borders, Cell, CellAlignment, CellFont, ColumnInfo, Fill, ImagePayload, RowInfo, SheetImage,
    Workbook, Worksheet,
};
use xlraster::render::surface::{RasterSurface, StrokePaint, TextPaint};
use xlraster::style::{TextAlign, TextBaseline};
use xlraster::text::MeasureSurface;
use xlraster::units::Rect;

// ============================================================================
// Workbook fixtures
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct FixtureCell {
    pub value: Option<String>,
    pub merged: bool,
    pub fill: Option<Fill>,
    pub borders: Option<Borders>,
    pub font: Option<CellFont>,
    pub alignment: Option<CellAlignment>,
}

impl FixtureCell {
    pub fn with_value(value: &str) -> Self {
        Self {
            value: Some(value.to_string()),
            ..Self::default()
        }
    }
}

impl Cell for FixtureCell {
    fn text(&self) -> Option<String> {
        self.value.clone()
    }
    fn is_merged(&self) -> bool {
        self.merged
    }
    fn fill(&self) -> Option<Fill> {
        self.fill.clone()
    }
    fn border(&self) -> Option<Borders> {
        self.borders.clone()
    }
    fn font(&self) -> Option<CellFont> {
        self.font.clone()
    }
    fn alignment(&self) -> Option<CellAlignment> {
        self.alignment.clone()
    }
}

#[derive(Debug, Clone)]
pub struct FixtureSheet {
    pub column_count: u32,
    pub row_count: u32,
    pub default_col_width: Option<f32>,
    pub default_row_height: f32,
    pub columns: HashMap<u32, ColumnInfo>,
    pub row_overrides: HashMap<u32, RowInfo>,
    pub cells: HashMap<(u32, u32), FixtureCell>,
    pub merges: Vec<String>,
    pub images: Vec<SheetImage>,
}

impl FixtureSheet {
    /// A uniform grid: `default_col_width` character units per column,
    /// `default_row_height` points per row.
    pub fn grid(cols: u32, rows: u32, col_width: f32, row_height: f32) -> Self {
        Self {
            column_count: cols,
            row_count: rows,
            default_col_width: Some(col_width),
            default_row_height: row_height,
            columns: HashMap::new(),
            row_overrides: HashMap::new(),
            cells: HashMap::new(),
            merges: Vec::new(),
            images: Vec::new(),
        }
    }

    pub fn set_cell(&mut self, col: u32, row: u32, cell: FixtureCell) -> &mut Self {
        self.cells.insert((col, row), cell);
        self
    }

    pub fn set_value(&mut self, col: u32, row: u32, value: &str) -> &mut Self {
        self.set_cell(col, row, FixtureCell::with_value(value))
    }

    pub fn hide_column(&mut self, number: u32) -> &mut Self {
        self.columns.insert(
            number,
            ColumnInfo {
                number,
                width: None,
                hidden: true,
                collapsed: false,
            },
        );
        self
    }

    pub fn hide_row(&mut self, number: u32) -> &mut Self {
        self.row_overrides.insert(
            number,
            RowInfo {
                number,
                height: None,
                hidden: true,
                collapsed: false,
            },
        );
        self
    }

    /// Mark every cell covered by `range_ref` as merged and record the
    /// range, the way the parser populates the model.
    pub fn merge(&mut self, range_ref: &str) -> &mut Self {
        if let Some(range) = xlraster::cell_ref::parse_cell_range(range_ref) {
            for col in range.start.col..=range.end.col {
                for row in range.start.row..=range.end.row {
                    self.cells.entry((col, row)).or_default().merged = true;
                }
            }
        }
        self.merges.push(range_ref.to_string());
        self
    }
}

impl Worksheet for FixtureSheet {
    type Cell = FixtureCell;

    fn column_count(&self) -> u32 {
        self.column_count
    }
    fn row_count(&self) -> u32 {
        self.row_count
    }
    fn default_col_width(&self) -> Option<f32> {
        self.default_col_width
    }
    fn default_row_height(&self) -> f32 {
        self.default_row_height
    }
    fn column(&self, number: u32) -> Option<ColumnInfo> {
        self.columns.get(&number).cloned()
    }
    fn rows(&self) -> Vec<RowInfo> {
        (1..=self.row_count)
            .map(|number| {
                self.row_overrides
                    .get(&number)
                    .cloned()
                    .unwrap_or(RowInfo {
                        number,
                        height: None,
                        hidden: false,
                        collapsed: false,
                    })
            })
            .collect()
    }
    fn cell(&self, col: u32, row: u32) -> Option<&FixtureCell> {
        self.cells.get(&(col, row))
    }
    fn merges(&self) -> Vec<String> {
        self.merges.clone()
    }
    fn images(&self) -> Vec<SheetImage> {
        self.images.clone()
    }
}

#[derive(Debug, Clone, Default)]
pub struct FixtureWorkbook {
    pub sheets: Vec<(String, FixtureSheet)>,
    pub images: HashMap<u32, ImagePayload>,
}

impl FixtureWorkbook {
    pub fn single(sheet: FixtureSheet) -> Self {
        Self {
            sheets: vec![("Sheet1".to_string(), sheet)],
            images: HashMap::new(),
        }
    }
}

impl Workbook for FixtureWorkbook {
    type Sheet = FixtureSheet;

    fn worksheet_count(&self) -> usize {
        self.sheets.len()
    }
    fn worksheet_by_index(&self, index: u32) -> Option<&FixtureSheet> {
        let index = usize::try_from(index).ok()?.checked_sub(1)?;
        self.sheets.get(index).map(|(_, sheet)| sheet)
    }
    fn worksheet_by_name(&self, name: &str) -> Option<&FixtureSheet> {
        self.sheets
            .iter()
            .find(|(sheet_name, _)| sheet_name == name)
            .map(|(_, sheet)| sheet)
    }
    fn image(&self, id: u32) -> Option<ImagePayload> {
        self.images.get(&id).cloned()
    }
}

// ============================================================================
// Measurement fixture
// ============================================================================

/// Deterministic measurement: every character is `char_width` pixels
/// wide regardless of font.
pub struct FixedWidthMeasurer {
    pub char_width: f32,
}

impl FixedWidthMeasurer {
    pub fn new(char_width: f32) -> Self {
        Self { char_width }
    }
}

impl MeasureSurface for FixedWidthMeasurer {
    fn measure_text_width(&mut self, _font: &str, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }
}

// ============================================================================
// Recording surface
// ============================================================================

/// One recorded surface operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    SetSize {
        width: u32,
        height: u32,
    },
    Presentation(Option<(f32, f32)>),
    FillRect {
        rect: Rect,
        color: String,
    },
    StrokeLine {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        color: String,
        width: f32,
        segments: Vec<f32>,
    },
    FillText {
        text: String,
        x: f32,
        y: f32,
        color: String,
        font: String,
        align: TextAlign,
        baseline: TextBaseline,
        max_width: Option<f32>,
    },
    DrawImage {
        rect: Rect,
        bitmap_width: u32,
        bitmap_height: u32,
    },
}

/// A raster surface that records operations instead of painting.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<Op>,
    width: u32,
    height: u32,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill_rects(&self) -> Vec<&Op> {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::FillRect { .. }))
            .collect()
    }

    pub fn stroke_lines(&self) -> Vec<&Op> {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::StrokeLine { .. }))
            .collect()
    }

    pub fn fill_texts(&self) -> Vec<&Op> {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::FillText { .. }))
            .collect()
    }

    pub fn drawn_images(&self) -> Vec<&Op> {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::DrawImage { .. }))
            .collect()
    }
}

impl RasterSurface for RecordingSurface {
    fn set_size(&mut self, width: u32, height: u32) -> Result<()> {
        self.width = width;
        self.height = height;
        self.ops.push(Op::SetSize { width, height });
        Ok(())
    }

    fn set_presentation_size(&mut self, size: Option<(f32, f32)>) {
        self.ops.push(Op::Presentation(size));
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) -> Result<()> {
        self.ops.push(Op::FillRect {
            rect,
            color: color.to_string(),
        });
        Ok(())
    }

    fn stroke_line(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        paint: &StrokePaint,
    ) -> Result<()> {
        self.ops.push(Op::StrokeLine {
            x1,
            y1,
            x2,
            y2,
            color: paint.color.to_string(),
            width: paint.width,
            segments: paint.segments.to_vec(),
        });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, paint: &TextPaint) -> Result<()> {
        self.ops.push(Op::FillText {
            text: text.to_string(),
            x,
            y,
            color: paint.color.to_string(),
            font: paint.font.to_string(),
            align: paint.align,
            baseline: paint.baseline,
            max_width: paint.max_width,
        });
        Ok(())
    }

    fn draw_image(&mut self, bitmap: &image::RgbaImage, rect: Rect) -> Result<()> {
        self.ops.push(Op::DrawImage {
            rect,
            bitmap_width: bitmap.width(),
            bitmap_height: bitmap.height(),
        });
        Ok(())
    }
}

// ============================================================================
// Render helper
// ============================================================================

/// Render `workbook`'s default sheet with a fixed-width measurer and
/// return the recorded op stream.
pub fn render_recorded(
    workbook: &FixtureWorkbook,
    options: &xlraster::RenderOptions,
    char_width: f32,
) -> RecordingSurface {
    let mut surface = RecordingSurface::new();
    let mut renderer =
        xlraster::SheetRenderer::with_measurer(Box::new(FixedWidthMeasurer::new(char_width)));
    futures::executor::block_on(renderer.render(
        &mut surface,
        workbook,
        &xlraster::SheetSelector::Default,
        options,
        None,
    ))
    .expect("render should succeed");
    surface
}
