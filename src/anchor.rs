//! Anchor-based image placement.
//!
//! Drawing anchors name a 0-based cell corner plus an EMU offset into
//! it. The top-left anchor is shifted by +1 on both axes so that it
//! refers to the cell whose leading edge is the anchored point; both
//! variants are then looked up as 1-based cell numbers in the layout.

use crate::cell_ref::{parse_cell_range, CellNumbers};
use crate::layout::SheetLayout;
use crate::model::{AnchorSpec, Extent, ImagePlacement, ModelAnchor};
use crate::units::{Rect, Scale};

/// An anchor lowered into layout coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasAnchor {
    pub col: u32,
    pub row: u32,
    pub pixel_offset_x: f32,
    pub pixel_offset_y: f32,
}

impl CanvasAnchor {
    /// Lower a top-left anchor: +1 on both axes, EMU offsets to pixels.
    pub fn top_left(anchor: &ModelAnchor, scale: &Scale) -> Self {
        Self {
            col: anchor.column() + 1,
            row: anchor.row() + 1,
            pixel_offset_x: scale.emu_to_px(anchor.col_offset_emu()),
            pixel_offset_y: scale.emu_to_px(anchor.row_offset_emu()),
        }
    }

    /// Lower a bottom-right anchor: axes kept as-is.
    pub fn bottom_right(anchor: &ModelAnchor, scale: &Scale) -> Self {
        Self {
            col: anchor.column(),
            row: anchor.row(),
            pixel_offset_x: scale.emu_to_px(anchor.col_offset_emu()),
            pixel_offset_y: scale.emu_to_px(anchor.row_offset_emu()),
        }
    }

    /// Resolve to the anchored cell's rect shifted by the pixel offsets.
    /// `None` when the cell is hidden or out of range.
    pub fn resolve(&self, layout: &SheetLayout) -> Option<Rect> {
        let cell = layout.cell_rect(CellNumbers {
            col: self.col,
            row: self.row,
        })?;
        Some(Rect::new(
            cell.x + self.pixel_offset_x,
            cell.y + self.pixel_offset_y,
            cell.width,
            cell.height,
        ))
    }
}

fn ext_size(ext: &Extent, scale: &Scale) -> (f32, f32) {
    (scale.ext_to_px(ext.width), scale.ext_to_px(ext.height))
}

fn anchors_rect(spec: &AnchorSpec, layout: &SheetLayout, scale: &Scale) -> Option<Rect> {
    let tl = spec
        .tl
        .as_ref()
        .map(|a| CanvasAnchor::top_left(a, scale))
        .and_then(|a| a.resolve(layout));
    let br = spec
        .br
        .as_ref()
        .map(|a| CanvasAnchor::bottom_right(a, scale))
        .and_then(|a| a.resolve(layout));

    match (tl, br) {
        (Some(tl), Some(br)) => Some(Rect::from_bounds(tl.x, tl.y, br.right(), br.bottom())),
        (Some(tl), None) => match spec.ext {
            Some(ext) => {
                let (width, height) = ext_size(&ext, scale);
                Some(Rect::new(tl.x, tl.y, width, height))
            }
            None => Some(tl),
        },
        (None, Some(br)) => match spec.ext {
            Some(ext) => {
                // Anchored at the bottom-right corner; the rect extends
                // upwards and leftwards.
                let (width, height) = ext_size(&ext, scale);
                Some(Rect::from_bounds(
                    br.right() - width,
                    br.bottom() - height,
                    br.right(),
                    br.bottom(),
                ))
            }
            None => Some(br),
        },
        (None, None) => None,
    }
}

/// Resolve an image placement to its destination rect. `None` means the
/// image is skipped for this draw.
pub fn image_rect(
    placement: &ImagePlacement,
    layout: &SheetLayout,
    scale: &Scale,
) -> Option<Rect> {
    match placement {
        ImagePlacement::Range(range_ref) => {
            let range = parse_cell_range(range_ref)?;
            layout.range_rect(&range)
        }
        ImagePlacement::Anchors(spec) => anchors_rect(spec, layout, scale),
    }
}
