//! The draw orchestrator.
//!
//! A draw resolves options into drawing parameters, computes the sheet
//! layout, sizes the surface, and paints: background first, then every
//! cell (background, borders, value, in that order), then the embedded
//! images. Merged cells are painted before row cells, and within each
//! phase cells are ordered empty / fitting / overflowing so spilled
//! values land on top of blank neighbours. Spill is not clipped against
//! neighbouring cells; that matches the observable behavior this
//! renderer reproduces.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::cell_ref::CellNumbers;
use crate::config::{DrawParams, RenderOptions};
use crate::error::Result;
use crate::fonts::SystemTextMeasurer;
use crate::layout::SheetLayout;
use crate::model::{Cell, Workbook, Worksheet};
use crate::render::images::composite_images;
use crate::render::surface::{RasterSurface, StrokePaint, TextPaint};
use crate::style::{
    lower_background, lower_borders, lower_text, CanvasBorders, CanvasCellText, TextAlign,
    TextBaseline,
};
use crate::text::{break_text_lines, MeasureSurface};
use crate::units::Rect;

/// Which worksheet of the workbook to draw.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SheetSelector {
    /// The workbook's default worksheet.
    #[default]
    Default,
    /// 1-based worksheet index.
    Index(u32),
    /// Worksheet name.
    Name(String),
}

/// A fully lowered cell, built during iteration and consumed by the
/// painting pass; never retained across draws.
struct CanvasCell {
    rect: Rect,
    background: String,
    borders: CanvasBorders,
    text: CanvasCellText,
}

/// The renderer: owns the measurement surface and a draw generation
/// counter used to discard image blits from superseded draws.
pub struct SheetRenderer {
    measurer: Box<dyn MeasureSurface + Send>,
    generation: Arc<AtomicU64>,
}

impl SheetRenderer {
    /// Create a renderer on the shared system measurement surface.
    ///
    /// # Errors
    /// Fails when the measurement surface cannot be created; the
    /// renderer is unusable in that case.
    pub fn new() -> Result<Self> {
        Ok(Self::with_measurer(Box::new(SystemTextMeasurer::shared()?)))
    }

    /// Create a renderer with a caller-supplied measurement surface.
    pub fn with_measurer(measurer: Box<dyn MeasureSurface + Send>) -> Self {
        Self {
            measurer,
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Paint one worksheet onto `surface`.
    ///
    /// `display_scale` sets the surface's presentation size to the
    /// raster size times the scale; `None` clears any previous
    /// presentation size. Missing worksheets and sheets without rows
    /// are no-ops. Starting a new draw invalidates the image blits of
    /// any draw still in flight.
    pub async fn render<S, W>(
        &mut self,
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
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let params = DrawParams::resolve(options);

        let sheet = match selector {
            SheetSelector::Default => workbook.default_worksheet(),
            SheetSelector::Index(index) => workbook.worksheet_by_index(*index),
            SheetSelector::Name(name) => workbook.worksheet_by_name(name),
        };
        let Some(sheet) = sheet else {
            log::warn!("worksheet {selector:?} not found; skipping draw");
            return Ok(());
        };

        let Some(layout) = SheetLayout::build(sheet, &params) else {
            return Ok(());
        };

        let size = layout.size();
        let raster_width = size.width.round().max(0.0) as u32;
        let raster_height = size.height.round().max(0.0) as u32;
        surface.set_size(raster_width, raster_height)?;
        surface.set_presentation_size(
            display_scale.map(|scale| (size.width * scale, size.height * scale)),
        );

        surface.fill_rect(
            Rect::new(0.0, 0.0, size.width, size.height),
            &params.background_color,
        )?;

        let merged = self.collect_merged_cells(sheet, &layout, &params);
        for cell in self.overflow_order(merged) {
            self.draw_cell(surface, &cell, &params)?;
        }

        let row_cells = self.collect_row_cells(sheet, &layout, &params);
        for cell in self.overflow_order(row_cells) {
            self.draw_cell(surface, &cell, &params)?;
        }

        composite_images(
            surface,
            workbook,
            sheet,
            &layout,
            &params,
            &self.generation,
            generation,
        )
        .await
    }

    /// Phase one: merged ranges, in workbook order. Styling comes from
    /// the range's top-left cell.
    fn collect_merged_cells<S: Worksheet>(
        &mut self,
        sheet: &S,
        layout: &SheetLayout,
        params: &DrawParams,
    ) -> Vec<CanvasCell> {
        let mut cells = Vec::new();
        for range in layout.merges().ranges() {
            let Some(rect) = layout.range_rect(range) else {
                continue;
            };
            cells.push(build_canvas_cell(
                sheet,
                range.start,
                rect,
                params,
            ));
        }
        cells
    }

    /// Phase two: for each visible row in order, every non-merged cell
    /// in column order.
    fn collect_row_cells<S: Worksheet>(
        &mut self,
        sheet: &S,
        layout: &SheetLayout,
        params: &DrawParams,
    ) -> Vec<CanvasCell> {
        let mut cells = Vec::new();
        for row in layout.rows() {
            for column in layout.columns() {
                let cell_numbers = CellNumbers {
                    col: column.number,
                    row: row.number,
                };
                if layout.merges().is_merged(cell_numbers) {
                    continue;
                }
                let rect = Rect::new(column.x, row.y, column.width, row.height);
                cells.push(build_canvas_cell(sheet, cell_numbers, rect, params));
            }
        }
        cells
    }

    /// Order cells so blank ones paint first, fitting values next, and
    /// overflowing values last. Overflowing values may spill over blank
    /// neighbours painted earlier; this approximation is intentional.
    fn overflow_order(&mut self, cells: Vec<CanvasCell>) -> Vec<CanvasCell> {
        let mut empty = Vec::new();
        let mut fits = Vec::new();
        let mut overflows = Vec::new();

        for cell in cells {
            if cell.text.value.is_empty() {
                empty.push(cell);
            } else if !cell.text.alignment.shrink_to_fit
                && self
                    .measurer
                    .measure_text_width(&cell.text.font, &cell.text.value)
                    < cell.rect.width
            {
                fits.push(cell);
            } else {
                overflows.push(cell);
            }
        }

        empty.extend(fits);
        empty.extend(overflows);
        empty
    }

    /// Paint one cell: background, then borders, then value.
    fn draw_cell<S: RasterSurface>(
        &mut self,
        surface: &mut S,
        cell: &CanvasCell,
        params: &DrawParams,
    ) -> Result<()> {
        surface.fill_rect(cell.rect, &cell.background)?;
        self.draw_borders(surface, cell)?;
        self.draw_value(surface, cell, params)
    }

    fn draw_borders<S: RasterSurface>(&self, surface: &mut S, cell: &CanvasCell) -> Result<()> {
        let rect = cell.rect;
        let borders = &cell.borders;
        let sides = [
            (&borders.left, (rect.x, rect.y, rect.x, rect.bottom())),
            (&borders.top, (rect.x, rect.y, rect.right(), rect.y)),
            (
                &borders.right,
                (rect.right(), rect.y, rect.right(), rect.bottom()),
            ),
            (
                &borders.bottom,
                (rect.x, rect.bottom(), rect.right(), rect.bottom()),
            ),
        ];

        for (border, (x1, y1, x2, y2)) in sides {
            if border.style.is_none() || border.width <= 0.0 {
                continue;
            }
            surface.stroke_line(
                x1,
                y1,
                x2,
                y2,
                &StrokePaint {
                    color: &border.color,
                    width: border.width,
                    segments: &border.segments,
                },
            )?;
        }
        Ok(())
    }

    fn draw_value<S: RasterSurface>(
        &mut self,
        surface: &mut S,
        cell: &CanvasCell,
        params: &DrawParams,
    ) -> Result<()> {
        let text = &cell.text;
        if text.value.is_empty() {
            return Ok(());
        }

        let inner = cell.rect.inset(params.cell_pixel_padding);
        let lines = break_text_lines(
            self.measurer.as_mut(),
            &text.font,
            &text.value,
            inner.width,
            text.alignment.wrap_text,
        );

        let x = match text.alignment.horizontal {
            TextAlign::Left | TextAlign::Start => inner.x,
            TextAlign::Center => inner.x + inner.width / 2.0,
            TextAlign::Right | TextAlign::End => inner.x + inner.width,
        };
        let extra = (lines.len().saturating_sub(1)) as f32 * text.line_height;
        let mut y = match text.alignment.vertical {
            TextBaseline::Top | TextBaseline::Hanging => inner.y,
            TextBaseline::Middle => inner.y + (inner.height - extra) / 2.0,
            TextBaseline::Alphabetic | TextBaseline::Ideographic | TextBaseline::Bottom => {
                inner.y + inner.height - extra
            }
        };

        let max_width = text.alignment.shrink_to_fit.then_some(inner.width);
        let paint = TextPaint {
            color: &text.color,
            font: &text.font,
            align: text.alignment.horizontal,
            baseline: text.alignment.vertical,
            direction: &text.alignment.text_direction,
            max_width,
        };
        for line in &lines {
            surface.fill_text(line, x, y, &paint)?;
            y += text.line_height;
        }
        Ok(())
    }
}

/// Lower one cell of the model into a transient canvas cell. A missing
/// or unreadable cell value becomes an empty string; the draw never
/// aborts over one cell.
fn build_canvas_cell<S: Worksheet>(
    sheet: &S,
    numbers: CellNumbers,
    rect: Rect,
    params: &DrawParams,
) -> CanvasCell {
    let cell = sheet.cell(numbers.col, numbers.row);
    let value = cell.and_then(Cell::text).unwrap_or_default();
    let fill = cell.and_then(Cell::fill);
    let borders = cell.and_then(Cell::border);
    let font = cell.and_then(Cell::font);
    let alignment = cell.and_then(Cell::alignment);

    CanvasCell {
        rect,
        background: lower_background(fill.as_ref(), params),
        borders: lower_borders(borders.as_ref(), params),
        text: lower_text(value, font.as_ref(), alignment.as_ref(), params),
    }
}
