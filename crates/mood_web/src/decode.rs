//! Request payload decoding: raw bytes and data-URL base64 into RGB images.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::DynamicImage;
use mood_core::{Error, Result};

/// Decode image bytes in any supported format and convert to 8-bit RGB.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    let image = image::load_from_memory(bytes)
        .map_err(|e| Error::Decode(format!("Invalid image data: {e}")))?;
    Ok(DynamicImage::ImageRgb8(image.to_rgb8()))
}

/// Strip a `data:<mime>;base64,` prefix and decode the remainder. A string
/// without a comma is decoded whole.
pub fn decode_data_url(data: &str) -> Result<Vec<u8>> {
    let payload = data.split_once(',').map_or(data, |(_, payload)| payload);
    STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::Decode(format!("Invalid base64 image data: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, ImageFormat, Luma};
    use std::io::Cursor;

    #[test]
    fn test_data_url_prefix_is_stripped() {
        let encoded = STANDARD.encode(b"hello");
        assert_eq!(decode_data_url(&format!("data:image/png;base64,{encoded}")).unwrap(), b"hello");
        assert_eq!(decode_data_url(&encoded).unwrap(), b"hello");
    }

    #[test]
    fn test_invalid_base64() {
        let err = decode_data_url("data:image/png;base64,@@not base64@@").unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_decode_converts_to_rgb() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(4, 4, Luma([128])));
        let mut buf = Cursor::new(Vec::new());
        gray.write_to(&mut buf, ImageFormat::Png).unwrap();

        let image = decode_image(buf.get_ref()).unwrap();
        assert!(matches!(image, DynamicImage::ImageRgb8(_)));
        assert_eq!(image.to_rgb8().get_pixel(0, 0).0, [128, 128, 128]);
    }

    #[test]
    fn test_garbage_bytes_are_a_decode_error() {
        let err = decode_image(b"not an image").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
