//! QR code rendering for the offer letter.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use image::{DynamicImage, ImageFormat, Luma};
use qrcode::QrCode;
use thiserror::Error;

use crate::offer::models::OfferSubmission;

/// Pixel size of a single QR module.
const MODULE_SIZE: u32 = 10;

#[derive(Debug, Error)]
pub enum QrError {
    #[error("failed to encode QR data: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("failed to encode QR image as PNG: {0}")]
    Png(#[from] image::ImageError),
}

/// Human-readable content carried by the QR code.
pub fn qr_payload(submission: &OfferSubmission) -> String {
    [
        submission.intern_name.clone(),
        submission.domain.clone(),
        submission.start_date.to_string(),
        submission.end_date.to_string(),
        submission.offer_date.to_string(),
        submission.offer_id.clone(),
    ]
    .iter()
    .map(|part| part.replace('|', " "))
    .collect::<Vec<_>>()
    .join(", ")
}

/// Render `payload` to PNG bytes.
pub fn render_qr_png(payload: &str) -> Result<Vec<u8>, QrError> {
    let code = QrCode::new(payload.as_bytes())?;
    let image = code
        .render::<Luma<u8>>()
        .module_dimensions(MODULE_SIZE, MODULE_SIZE)
        .quiet_zone(true)
        .build();

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(image).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

/// Inline `data:` URI for embedding PNG bytes into HTML.
pub fn png_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", BASE64.encode(png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn submission() -> OfferSubmission {
        OfferSubmission {
            offer_id: "AB12CD34E".to_string(),
            intern_name: "Jane | Doe".to_string(),
            domain: "Data Science".to_string(),
            email: "jane@example.com".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            offer_date: NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
        }
    }

    #[test]
    fn test_payload_is_pipe_free() {
        let payload = qr_payload(&submission());
        assert!(!payload.contains('|'));
        assert_eq!(
            payload,
            "Jane   Doe, Data Science, 2024-01-01, 2024-06-01, 2023-12-01, AB12CD34E"
        );
    }

    #[test]
    fn test_render_qr_png() {
        let png = render_qr_png("hello").unwrap();
        assert!(png.starts_with(&[0x89, 0x50, 0x4E, 0x47]));
    }

    #[test]
    fn test_png_data_uri() {
        assert_eq!(png_data_uri(b"abc"), "data:image/png;base64,YWJj");
    }
}
