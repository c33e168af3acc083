//! QR code rendering.
//!
//! Payloads are rendered as standalone SVG documents.

use std::fmt;
use std::str::FromStr;

use qrcode::render::svg;
use qrcode::{EcLevel, QrCode};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File extension for rendered QR codes.
pub const QR_FILE_EXTENSION: &str = "svg";

/// QR error correction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorCorrection {
    /// Recovers ~7% of data.
    L,
    /// Recovers ~15% of data.
    #[default]
    M,
    /// Recovers ~25% of data.
    Q,
    /// Recovers ~30% of data.
    H,
}

impl From<ErrorCorrection> for EcLevel {
    fn from(level: ErrorCorrection) -> Self {
        match level {
            ErrorCorrection::L => Self::L,
            ErrorCorrection::M => Self::M,
            ErrorCorrection::Q => Self::Q,
            ErrorCorrection::H => Self::H,
        }
    }
}

impl fmt::Display for ErrorCorrection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::L => write!(f, "L"),
            Self::M => write!(f, "M"),
            Self::Q => write!(f, "Q"),
            Self::H => write!(f, "H"),
        }
    }
}

impl FromStr for ErrorCorrection {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "L" => Ok(Self::L),
            "M" => Ok(Self::M),
            "Q" => Ok(Self::Q),
            "H" => Ok(Self::H),
            other => Err(format!("unknown error correction level '{other}'")),
        }
    }
}

/// Renders payloads to SVG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrRenderer {
    error_correction: ErrorCorrection,
    min_dimension: u32,
}

impl Default for QrRenderer {
    fn default() -> Self {
        Self::new(ErrorCorrection::default(), 200)
    }
}

impl QrRenderer {
    /// Create a renderer.
    #[must_use]
    pub fn new(error_correction: ErrorCorrection, min_dimension: u32) -> Self {
        Self {
            error_correction,
            min_dimension,
        }
    }

    /// Render `payload` as an SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::QrEncode`] if the payload does not fit in a QR
    /// code at the configured error correction level.
    pub fn render_svg(&self, payload: &str) -> Result<String> {
        let code =
            QrCode::with_error_correction_level(payload.as_bytes(), self.error_correction.into())?;
        Ok(code
            .render::<svg::Color<'_>>()
            .min_dimensions(self.min_dimension, self.min_dimension)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build())
    }
}
