//! Visible band layout and cell-rectangle resolution for a sheet.
//!
//! Bands are computed once per draw: every visible column/row gets a
//! cumulative pixel offset and size, and the canvas size is the sum of
//! the visible bands on each axis.

use crate::cell_ref::{CellNumbers, CellRangeNumbers};
use crate::config::DrawParams;
use crate::layout::MergeIndex;
use crate::model::Worksheet;
use crate::units::{Rect, Size};

/// A visible column band in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasColumn {
    pub number: u32,
    pub x: f32,
    pub width: f32,
}

/// A visible row band in device pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRow {
    pub number: u32,
    pub y: f32,
    pub height: f32,
}

/// Pre-computed layout data for one sheet.
#[derive(Debug, Clone)]
pub struct SheetLayout {
    columns: Vec<CanvasColumn>,
    rows: Vec<CanvasRow>,
    size: Size,
    merges: MergeIndex,
}

impl SheetLayout {
    /// Compute the layout for `sheet`. Returns `None` when the sheet
    /// yields no rows; the draw is then a no-op.
    pub fn build<S: Worksheet>(sheet: &S, params: &DrawParams) -> Option<Self> {
        let row_infos = sheet.rows();
        if row_infos.is_empty() {
            log::debug!("worksheet yields no rows; nothing to draw");
            return None;
        }

        let mut columns = Vec::new();
        let mut x: f32 = 0.0;
        for number in 1..=sheet.column_count() {
            let info = sheet.column(number);
            if info
                .as_ref()
                .is_some_and(|c| c.hidden || c.collapsed)
            {
                continue;
            }
            let char_units = info
                .and_then(|c| c.width)
                .or_else(|| sheet.default_col_width())
                .unwrap_or(params.fallback_col_char_unit_width);
            let width = params.scale.char_units_to_px(char_units);
            columns.push(CanvasColumn { number, x, width });
            x += width;
        }

        let mut rows = Vec::new();
        let mut y: f32 = 0.0;
        for info in row_infos {
            if info.hidden || info.collapsed {
                continue;
            }
            let points = info.height.unwrap_or_else(|| sheet.default_row_height());
            let height = params.scale.points_to_px(points);
            rows.push(CanvasRow {
                number: info.number,
                y,
                height,
            });
            y += height;
        }

        Some(SheetLayout {
            columns,
            rows,
            size: Size::new(x, y),
            merges: MergeIndex::build(&sheet.merges()),
        })
    }

    /// Canvas size: the sum of visible column widths by visible row
    /// heights.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn columns(&self) -> &[CanvasColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[CanvasRow] {
        &self.rows
    }

    pub fn merges(&self) -> &MergeIndex {
        &self.merges
    }

    /// The visible column band with this 1-based number.
    pub fn column(&self, number: u32) -> Option<&CanvasColumn> {
        self.columns
            .binary_search_by_key(&number, |c| c.number)
            .ok()
            .and_then(|i| self.columns.get(i))
    }

    /// The visible row band with this 1-based number.
    pub fn row(&self, number: u32) -> Option<&CanvasRow> {
        self.rows
            .binary_search_by_key(&number, |r| r.number)
            .ok()
            .and_then(|i| self.rows.get(i))
    }

    /// Rect of a single cell; `None` when its column or row is hidden or
    /// out of range.
    pub fn cell_rect(&self, cell: CellNumbers) -> Option<Rect> {
        let column = self.column(cell.col)?;
        let row = self.row(cell.row)?;
        Some(Rect::new(column.x, row.y, column.width, row.height))
    }

    /// Bounding rect of a merged range, combined from the rects of its
    /// two corner cells.
    pub fn range_rect(&self, range: &CellRangeNumbers) -> Option<Rect> {
        let start = self.cell_rect(range.start)?;
        let end = self.cell_rect(range.end)?;
        Some(Rect::from_bounds(
            start.x,
            start.y,
            end.right(),
            end.bottom(),
        ))
    }

    /// Merge-aware rect: the bounding rect of the containing merged
    /// range when there is one, the single-cell rect otherwise.
    pub fn rect_for(&self, cell: CellNumbers) -> Option<Rect> {
        match self.merges.merge_range(cell) {
            Some(range) => self.range_rect(range),
            None => self.cell_rect(cell),
        }
    }
}
