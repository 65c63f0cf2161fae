use crate::{CHANNELS, ImageError, Roi};
use image::{RgbImage, imageops};
use relay_base::{Rect, Tensor, Vec2};

/// Crop `roi` out of an HWC `u8` frame and resample it to a `size` x `size`
/// model input.
///
/// Returns an NHWC tensor `[1, size, size, 3]` with values in `[0.0, 1.0]`.
/// Parts of the ROI outside the frame are filled with zeros.
pub fn crop(frame: &Tensor<u8>, roi: &Roi, size: usize) -> Result<Tensor<f32>, ImageError> {
    let (height, width) = match frame.shape.as_slice() {
        [h, w, c] if *c == CHANNELS && *h > 0 && *w > 0 => (*h, *w),
        _ => return Err(ImageError::Shape(frame.shape.clone())),
    };
    if size == 0 {
        return Err(ImageError::EmptyCrop);
    }

    let pixels = if roi.is_axis_aligned() {
        crop_axis_aligned(frame, width, height, roi, size)?
    } else {
        crop_rotated(frame, width, height, roi, size)
    };

    let data = pixels.into_iter().map(|v| v as f32 / 255.0).collect();
    Ok(Tensor::new(vec![1, size, size, CHANNELS], data)?)
}

/// Crop the visible part with the `image` crate, resize it and paste it on a
/// zero canvas at the matching offset.
fn crop_axis_aligned(
    frame: &Tensor<u8>,
    width: usize,
    height: usize,
    roi: &Roi,
    size: usize,
) -> Result<Vec<u8>, ImageError> {
    let mut canvas = RgbImage::new(size as u32, size as u32);
    let roi_rect = roi.bounding_rect();
    let frame_rect = Rect::new(Vec2::zero(), Vec2::new(width as f32, height as f32));

    let Some(visible) = roi_rect.intersection(&frame_rect) else {
        return Ok(canvas.into_raw());
    };

    let x0 = visible.origin.x.floor().max(0.0) as u32;
    let y0 = visible.origin.y.floor().max(0.0) as u32;
    let x1 = (visible.max().x.ceil() as u32).min(width as u32);
    let y1 = (visible.max().y.ceil() as u32).min(height as u32);
    if x1 <= x0 || y1 <= y0 {
        return Ok(canvas.into_raw());
    }

    let source = RgbImage::from_raw(width as u32, height as u32, frame.data.clone())
        .ok_or_else(|| ImageError::Shape(frame.shape.clone()))?;
    let visible_part = imageops::crop_imm(&source, x0, y0, x1 - x0, y1 - y0).to_image();

    let scale = size as f32 / roi.size;
    let scaled_w = (((x1 - x0) as f32 * scale).round() as u32).max(1);
    let scaled_h = (((y1 - y0) as f32 * scale).round() as u32).max(1);
    let resized = imageops::resize(
        &visible_part,
        scaled_w,
        scaled_h,
        imageops::FilterType::Triangle,
    );

    let offset_x = ((x0 as f32 - roi_rect.origin.x) * scale).round() as i64;
    let offset_y = ((y0 as f32 - roi_rect.origin.y) * scale).round() as i64;
    imageops::replace(&mut canvas, &resized, offset_x, offset_y);

    Ok(canvas.into_raw())
}

/// Bilinear sampling through the rotated square.
fn crop_rotated(
    frame: &Tensor<u8>,
    width: usize,
    height: usize,
    roi: &Roi,
    size: usize,
) -> Vec<u8> {
    let mut out = vec![0u8; size * size * CHANNELS];
    let step = 1.0 / size as f32;

    for v in 0..size {
        for u in 0..size {
            let p = Vec2::new((u as f32 + 0.5) * step, (v as f32 + 0.5) * step);
            // Pixel centers sit at +0.5
            let src = roi.project(p) - Vec2::new(0.5, 0.5);
            let dst = (v * size + u) * CHANNELS;
            for ch in 0..CHANNELS {
                let value = sample_bilinear(&frame.data, width, height, src, ch);
                out[dst + ch] = value.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    out
}

fn sample_bilinear(data: &[u8], width: usize, height: usize, at: Vec2<f32>, ch: usize) -> f32 {
    let x0 = at.x.floor();
    let y0 = at.y.floor();
    let fx = at.x - x0;
    let fy = at.y - y0;

    let fetch = |x: f32, y: f32| -> f32 {
        if x < 0.0 || y < 0.0 || x >= width as f32 || y >= height as f32 {
            return 0.0;
        }
        data[(y as usize * width + x as usize) * CHANNELS + ch] as f32
    };

    let top = fetch(x0, y0) * (1.0 - fx) + fetch(x0 + 1.0, y0) * fx;
    let bottom = fetch(x0, y0 + 1.0) * (1.0 - fx) + fetch(x0 + 1.0, y0 + 1.0) * fx;
    top * (1.0 - fy) + bottom * fy
}
