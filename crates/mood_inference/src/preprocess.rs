//! Image to tensor conversion.
//!
//! The model consumes a `(3, H, W)` float tensor in `[0, 1]`. Decoding and
//! colour conversion happen before this point; this module only resizes,
//! scales and reorders.

use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array3;

/// Resize `image` to exactly `target_size = (height, width)` with Lanczos
/// resampling and lay it out channel-first. Single-channel images are
/// broadcast to three identical channels.
pub fn preprocess(image: &DynamicImage, target_size: (u32, u32)) -> Array3<f32> {
    let (height, width) = target_size;
    let resized = image.resize_exact(width, height, FilterType::Lanczos3);
    let shape = (3, height as usize, width as usize);

    if resized.color().has_color() {
        let rgb = resized.to_rgb8();
        Array3::from_shape_fn(shape, |(c, y, x)| {
            f32::from(rgb.get_pixel(x as u32, y as u32)[c]) / 255.0
        })
    } else {
        let luma = resized.to_luma8();
        Array3::from_shape_fn(shape, |(_, y, x)| {
            f32::from(luma.get_pixel(x as u32, y as u32)[0]) / 255.0
        })
    }
}
