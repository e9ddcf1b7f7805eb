//! Screenshot intake: base64 / data-URL decoding and media type sniffing.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::ScreenshotError;

/// A decoded screenshot ready to send to the vision model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    pub bytes: Vec<u8>,
    pub mime_type: &'static str,
}

impl Screenshot {
    /// Decode a base64 screenshot as sent by the browser client.
    ///
    /// Accepts either bare base64 or a data URL (`data:image/png;base64,...`);
    /// everything up to the first comma is dropped. ASCII whitespace inside
    /// the payload (line-wrapped base64) is ignored. The image is never
    /// decoded, only its format is detected from its leading bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, ScreenshotError> {
        let payload = match encoded.split_once(',') {
            Some((_prefix, data)) => data,
            None => encoded,
        };
        let payload: String = payload
            .chars()
            .filter(|c| !c.is_ascii_whitespace())
            .collect();
        if payload.is_empty() {
            return Err(ScreenshotError::Missing);
        }

        let bytes = STANDARD.decode(&payload)?;
        let format = image::guess_format(&bytes).map_err(|_| ScreenshotError::UnknownFormat)?;
        let mime_type = match format {
            image::ImageFormat::Png => "image/png",
            image::ImageFormat::Jpeg => "image/jpeg",
            image::ImageFormat::Gif => "image/gif",
            image::ImageFormat::WebP => "image/webp",
            _ => return Err(ScreenshotError::UnknownFormat),
        };

        Ok(Self { bytes, mime_type })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    const JPEG_HEADER: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F'];

    #[test]
    fn decodes_bare_base64_png() {
        let encoded = STANDARD.encode(PNG_HEADER);
        let shot = Screenshot::from_base64(&encoded).unwrap();
        assert_eq!(shot.mime_type, "image/png");
        assert_eq!(shot.bytes, PNG_HEADER);
    }

    #[test]
    fn strips_data_url_prefix() {
        let encoded = format!("data:image/jpeg;base64,{}", STANDARD.encode(JPEG_HEADER));
        let shot = Screenshot::from_base64(&encoded).unwrap();
        assert_eq!(shot.mime_type, "image/jpeg");
    }

    #[test]
    fn ignores_line_breaks_in_payload() {
        let encoded = STANDARD.encode(PNG_HEADER);
        let (head, tail) = encoded.split_at(8);
        let wrapped = format!("data:image/png;base64,{head}\r\n{tail}\n");
        let shot = Screenshot::from_base64(&wrapped).unwrap();
        assert_eq!(shot.mime_type, "image/png");
        assert_eq!(shot.bytes, PNG_HEADER);
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = Screenshot::from_base64("data:image/png;base64,@@not-base64@@").unwrap_err();
        assert!(matches!(err, ScreenshotError::InvalidBase64(_)));
    }

    #[test]
    fn rejects_non_image_bytes() {
        let encoded = STANDARD.encode(b"just some text, not an image");
        let err = Screenshot::from_base64(&encoded).unwrap_err();
        assert!(matches!(err, ScreenshotError::UnknownFormat));
    }

    #[test]
    fn empty_payload_is_missing() {
        assert!(matches!(
            Screenshot::from_base64("data:image/png;base64,"),
            Err(ScreenshotError::Missing)
        ));
    }
}
