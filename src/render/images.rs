//! Asynchronous image compositing.
//!
//! After every cell is painted, the sheet's embedded images resolve to
//! destination rects and decode concurrently; each decoded bitmap is
//! blitted stretched to its rect and dropped immediately. Undecodable
//! or unresolvable entries are skipped without aborting the draw. A
//! blit is discarded when a newer draw has started since this one.

use std::sync::atomic::{AtomicU64, Ordering};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{ImageFormat, RgbaImage};

use crate::anchor::image_rect;
use crate::config::DrawParams;
use crate::error::Result;
use crate::layout::SheetLayout;
use crate::model::{ImagePayload, Workbook, Worksheet};
use crate::render::surface::RasterSurface;
use crate::units::Rect;

/// Magic-byte classification; formats outside this set are skipped.
fn classify(bytes: &[u8]) -> Option<ImageFormat> {
    match image::guess_format(bytes).ok()? {
        format @ (ImageFormat::Png
        | ImageFormat::Jpeg
        | ImageFormat::Gif
        | ImageFormat::Bmp
        | ImageFormat::WebP) => Some(format),
        _ => None,
    }
}

/// Payload bytes: raw buffers pass through, base64 decodes directly.
fn payload_bytes(payload: ImagePayload) -> Option<Vec<u8>> {
    match payload {
        ImagePayload::Buffer(bytes) => Some(bytes),
        ImagePayload::Base64(encoded) => BASE64.decode(encoded.trim()).ok(),
    }
}

async fn decode(payload: ImagePayload) -> Option<RgbaImage> {
    let bytes = payload_bytes(payload)?;
    let format = classify(&bytes)?;
    let decoded = image::load_from_memory_with_format(&bytes, format).ok()?;
    Some(decoded.into_rgba8())
}

/// Resolve, decode, and blit every embedded image of `sheet`.
///
/// Decodes run concurrently; the draw completes only once all of them
/// settle. `generation`/`snapshot` implement redraw cancellation: when
/// a newer draw has bumped the counter, remaining bitmaps are dropped
/// without touching the surface.
pub(crate) async fn composite_images<S, W, Sh>(
    surface: &mut S,
    workbook: &W,
    sheet: &Sh,
    layout: &SheetLayout,
    params: &DrawParams,
    generation: &AtomicU64,
    snapshot: u64,
) -> Result<()>
where
    S: RasterSurface,
    W: Workbook,
    Sh: Worksheet,
{
    let mut pending: Vec<(Rect, ImagePayload)> = Vec::new();
    for sheet_image in sheet.images() {
        let Some(rect) = image_rect(&sheet_image.placement, layout, &params.scale) else {
            log::debug!("unresolved image anchor; skipping image");
            continue;
        };
        let Some(id) = sheet_image.image_id.to_id() else {
            log::debug!("non-numeric image id {:?}; skipping image", sheet_image.image_id);
            continue;
        };
        let Some(payload) = workbook.image(id) else {
            log::debug!("workbook has no image {id}; skipping image");
            continue;
        };
        pending.push((rect, payload));
    }

    let decodes = pending
        .into_iter()
        .map(|(rect, payload)| async move { Some((rect, decode(payload).await?)) });
    let decoded = futures::future::join_all(decodes).await;

    for (rect, bitmap) in decoded.into_iter().flatten() {
        if generation.load(Ordering::SeqCst) != snapshot {
            log::debug!("draw superseded; discarding decoded image");
            continue;
        }
        surface.draw_image(&bitmap, rect)?;
        drop(bitmap);
    }
    Ok(())
}
