// SPDX-License-Identifier: Apache-2.0

use crate::error::PixError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};

pub const QR_MIN_DIMENSION: u32 = 300;

/// Renders `code` as an SVG QR symbol (error correction H, quiet zone) and
/// returns it as a base64 data URI.
pub fn render_qr_data_uri(code: &str) -> Result<String, PixError> {
    let symbol = QrCode::with_error_correction_level(code.as_bytes(), EcLevel::H)
        .map_err(|e| PixError::Render(e.to_string()))?;
    let image = symbol
        .render::<svg::Color>()
        .min_dimensions(QR_MIN_DIMENSION, QR_MIN_DIMENSION)
        .quiet_zone(true)
        .build();
    Ok(format!(
        "data:image/svg+xml;base64,{}",
        STANDARD.encode(image.as_bytes())
    ))
}
