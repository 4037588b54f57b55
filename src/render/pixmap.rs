//! Software raster surface backed by tiny-skia.
//!
//! This is the concrete surface the crate ships: cells and borders go
//! through tiny-skia's scanline rasteriser, text is shaped by the shared
//! font system and composited glyph by glyph, and decoded images are
//! blitted through a scaled pattern shader. Invalid paint inputs are
//! ignored the way a 2D canvas ignores them; only allocation failures
//! surface as errors.

use cosmic_text::{Buffer, Metrics, Shaping, SwashCache};
use image::RgbaImage;
use tiny_skia::{
    ColorU8, FilterQuality, LineCap, LineJoin, Paint, PathBuilder, Pattern, Pixmap, Rect as SkRect,
    SpreadMode, Stroke, StrokeDash, Transform,
};

use crate::error::{RasterError, Result};
use crate::fonts::{font_system, FontSpec};
use crate::render::colors::Rgba;
use crate::render::surface::{RasterSurface, StrokePaint, TextPaint};
use crate::style::{TextAlign, TextBaseline};
use crate::units::Rect;

/// A CPU pixel buffer implementing [`RasterSurface`].
pub struct PixmapSurface {
    pixmap: Pixmap,
    presentation: Option<(f32, f32)>,
    swash: SwashCache,
}

impl PixmapSurface {
    /// Allocate a surface. Zero dimensions are clamped to one pixel.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            pixmap: allocate(width, height)?,
            presentation: None,
            swash: SwashCache::new(),
        })
    }

    /// The underlying pixel buffer.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// The presentation size set by the last draw, if any.
    pub fn presentation_size(&self) -> Option<(f32, f32)> {
        self.presentation
    }

    /// Encode the current contents as PNG bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| RasterError::Surface(format!("PNG encoding failed: {e}")))
    }

    fn solid_paint(color: Rgba) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color.r, color.g, color.b, color.a);
        paint
    }
}

fn allocate(width: u32, height: u32) -> Result<Pixmap> {
    Pixmap::new(width.max(1), height.max(1))
        .ok_or_else(|| RasterError::Surface(format!("cannot allocate {width}x{height} pixmap")))
}

/// Canvas dash semantics: an odd-length list is doubled before use.
fn stroke_dash(segments: &[f32]) -> Option<StrokeDash> {
    if segments.is_empty() {
        return None;
    }
    let mut array = segments.to_vec();
    if array.len() % 2 != 0 {
        array.extend_from_slice(segments);
    }
    StrokeDash::new(array, 0.0)
}

/// Source-over blend of a straight-alpha color onto premultiplied pixels.
fn blend_span(pixmap: &mut Pixmap, x: i32, y: i32, w: u32, h: u32, color: Rgba) {
    if color.a == 0 {
        return;
    }
    let width = pixmap.width() as i32;
    let height = pixmap.height() as i32;
    let alpha = f32::from(color.a) / 255.0;
    let src_r = f32::from(color.r) * alpha;
    let src_g = f32::from(color.g) * alpha;
    let src_b = f32::from(color.b) * alpha;
    let src_a = alpha * 255.0;

    for py in y..y.saturating_add(h as i32) {
        if py < 0 || py >= height {
            continue;
        }
        for px in x..x.saturating_add(w as i32) {
            if px < 0 || px >= width {
                continue;
            }
            let idx = (py * width + px) as usize;
            let Some(dst) = pixmap.pixels_mut().get_mut(idx) else {
                continue;
            };
            let inv = 1.0 - alpha;
            let r = (src_r + f32::from(dst.red()) * inv) as u8;
            let g = (src_g + f32::from(dst.green()) * inv) as u8;
            let b = (src_b + f32::from(dst.blue()) * inv) as u8;
            let a = (src_a + f32::from(dst.alpha()) * inv) as u8;
            if let Some(premul) = tiny_skia::PremultipliedColorU8::from_rgba(r, g, b, a) {
                *dst = premul;
            }
        }
    }
}

impl RasterSurface for PixmapSurface {
    fn set_size(&mut self, width: u32, height: u32) -> Result<()> {
        self.pixmap = allocate(width, height)?;
        Ok(())
    }

    fn set_presentation_size(&mut self, size: Option<(f32, f32)>) {
        self.presentation = size;
    }

    fn width(&self) -> u32 {
        self.pixmap.width()
    }

    fn height(&self) -> u32 {
        self.pixmap.height()
    }

    fn fill_rect(&mut self, rect: Rect, color: &str) -> Result<()> {
        let Some(color) = Rgba::parse(color) else {
            log::debug!("unparseable fill color {color:?}; ignoring fill");
            return Ok(());
        };
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return Ok(());
        }
        let Some(sk_rect) = SkRect::from_xywh(rect.x, rect.y, rect.width, rect.height) else {
            return Ok(());
        };
        let paint = Self::solid_paint(color);
        self.pixmap
            .fill_rect(sk_rect, &paint, Transform::identity(), None);
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
        let Some(color) = Rgba::parse(paint.color) else {
            log::debug!("unparseable stroke color {:?}; ignoring stroke", paint.color);
            return Ok(());
        };
        if paint.width <= 0.0 {
            return Ok(());
        }

        let mut builder = PathBuilder::new();
        builder.move_to(x1, y1);
        builder.line_to(x2, y2);
        let Some(path) = builder.finish() else {
            return Ok(());
        };

        let stroke = Stroke {
            width: paint.width,
            line_cap: LineCap::Square,
            line_join: LineJoin::Miter,
            dash: stroke_dash(paint.segments),
            ..Stroke::default()
        };
        let sk_paint = Self::solid_paint(color);
        self.pixmap
            .stroke_path(&path, &sk_paint, &stroke, Transform::identity(), None);
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, paint: &TextPaint) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        let Some(color) = Rgba::parse(paint.color) else {
            log::debug!("unparseable text color {:?}; ignoring text", paint.color);
            return Ok(());
        };
        let spec = FontSpec::parse(paint.font);
        if spec.px <= 0.0 {
            return Ok(());
        }

        let mut fs = font_system();
        let shape = |fs: &mut cosmic_text::FontSystem, px: f32| {
            let mut buffer = Buffer::new(fs, Metrics::new(px, px));
            buffer.set_text(fs, text, spec.attrs(), Shaping::Advanced);
            buffer.shape_until_scroll(fs, false);
            let width = buffer
                .layout_runs()
                .map(|run| run.line_w)
                .fold(0.0, f32::max);
            (buffer, width)
        };

        let (mut buffer, mut width) = shape(&mut fs, spec.px);
        let mut px = spec.px;
        // Shrink-to-fit: compress by re-shaping at a reduced size.
        if let Some(max_width) = paint.max_width {
            if width > max_width && width > 0.0 && max_width > 0.0 {
                px = spec.px * max_width / width;
                let reshaped = shape(&mut fs, px);
                buffer = reshaped.0;
                width = reshaped.1;
            }
        }

        let left = match paint.align {
            TextAlign::Left | TextAlign::Start => x,
            TextAlign::Center => x - width / 2.0,
            TextAlign::Right | TextAlign::End => x - width,
        };
        let top = match paint.baseline {
            TextBaseline::Top | TextBaseline::Hanging => y,
            TextBaseline::Middle => y - px / 2.0,
            // Baseline sits at roughly 80% of the em box.
            TextBaseline::Alphabetic => y - px * 0.8,
            TextBaseline::Ideographic | TextBaseline::Bottom => y - px,
        };

        let text_color = cosmic_text::Color::rgba(color.r, color.g, color.b, color.a);
        let pixmap = &mut self.pixmap;
        buffer.draw(&mut fs, &mut self.swash, text_color, |gx, gy, gw, gh, c| {
            let rgba = Rgba::new(c.r(), c.g(), c.b(), c.a());
            blend_span(
                pixmap,
                gx + left.round() as i32,
                gy + top.round() as i32,
                gw,
                gh,
                rgba,
            );
        });
        Ok(())
    }

    fn draw_image(&mut self, bitmap: &RgbaImage, rect: Rect) -> Result<()> {
        if rect.width <= 0.0 || rect.height <= 0.0 {
            return Ok(());
        }
        let (src_w, src_h) = bitmap.dimensions();
        if src_w == 0 || src_h == 0 {
            return Ok(());
        }

        let mut source = allocate(src_w, src_h)?;
        for (pixel, out) in bitmap.pixels().zip(source.pixels_mut()) {
            *out = ColorU8::from_rgba(pixel[0], pixel[1], pixel[2], pixel[3]).premultiply();
        }

        let transform = Transform::from_scale(rect.width / src_w as f32, rect.height / src_h as f32)
            .post_translate(rect.x, rect.y);
        let mut paint = Paint::default();
        paint.shader = Pattern::new(
            source.as_ref(),
            SpreadMode::Pad,
            FilterQuality::Bilinear,
            1.0,
            transform,
        );
        let Some(sk_rect) = SkRect::from_xywh(rect.x, rect.y, rect.width, rect.height) else {
            return Ok(());
        };
        self.pixmap
            .fill_rect(sk_rect, &paint, Transform::identity(), None);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn pixel(surface: &PixmapSurface, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let p = surface
            .pixmap()
            .pixel(x, y)
            .unwrap()
            .demultiply();
        (p.red(), p.green(), p.blue(), p.alpha())
    }

    #[test]
    fn test_set_size_reallocates() {
        let mut surface = PixmapSurface::new(4, 4).unwrap();
        surface.set_size(10, 20).unwrap();
        assert_eq!(surface.width(), 10);
        assert_eq!(surface.height(), 20);
    }

    #[test]
    fn test_fill_rect_paints_pixels() {
        let mut surface = PixmapSurface::new(8, 8).unwrap();
        surface
            .fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), "white")
            .unwrap();
        surface
            .fill_rect(Rect::new(2.0, 2.0, 4.0, 4.0), "#FF0000FF")
            .unwrap();
        assert_eq!(pixel(&surface, 3, 3), (255, 0, 0, 255));
        assert_eq!(pixel(&surface, 0, 0), (255, 255, 255, 255));
    }

    #[test]
    fn test_unparseable_color_is_ignored() {
        let mut surface = PixmapSurface::new(4, 4).unwrap();
        surface
            .fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), "definitely-not-a-color")
            .unwrap();
        assert_eq!(pixel(&surface, 1, 1), (0, 0, 0, 0));
    }

    #[test]
    fn test_stroke_line_paints_edge() {
        let mut surface = PixmapSurface::new(10, 10).unwrap();
        surface
            .stroke_line(
                0.0,
                5.0,
                10.0,
                5.0,
                &StrokePaint {
                    color: "#000000FF",
                    width: 2.0,
                    segments: &[],
                },
            )
            .unwrap();
        let (_, _, _, alpha) = pixel(&surface, 5, 5);
        assert!(alpha > 0);
    }

    #[test]
    fn test_draw_image_stretches_to_rect() {
        let mut surface = PixmapSurface::new(8, 8).unwrap();
        // A single green source pixel stretched over a quadrant.
        let mut bitmap = RgbaImage::new(1, 1);
        bitmap.put_pixel(0, 0, image::Rgba([0, 255, 0, 255]));
        surface
            .draw_image(&bitmap, Rect::new(4.0, 4.0, 4.0, 4.0))
            .unwrap();
        assert_eq!(pixel(&surface, 6, 6), (0, 255, 0, 255));
        assert_eq!(pixel(&surface, 1, 1), (0, 0, 0, 0));
    }

    #[test]
    fn test_stroke_dash_doubles_odd_patterns() {
        assert!(stroke_dash(&[]).is_none());
        assert!(stroke_dash(&[4.0]).is_some());
        assert!(stroke_dash(&[4.0, 2.0]).is_some());
    }
}
