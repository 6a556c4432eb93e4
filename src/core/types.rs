use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Largest surface edge cairo accepts, in pixels.
pub const MAX_SURFACE_EDGE: u32 = 32_767;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        (1..=MAX_SURFACE_EDGE).contains(&self.width) && (1..=MAX_SURFACE_EDGE).contains(&self.height)
    }

    /// Width and height as the `i32` pair cairo surface constructors expect.
    pub fn surface_size(self) -> ChartResult<(i32, i32)> {
        if !self.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.width,
                height: self.height,
            });
        }
        // Both edges are bounded by MAX_SURFACE_EDGE, so the casts are lossless.
        Ok((self.width as i32, self.height as i32))
    }
}

/// Direction in which bar values grow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    /// Bars extend left to right, columns stacked top to bottom.
    #[default]
    Horizontal,
    /// Bars extend bottom to top, columns laid out left to right.
    Vertical,
}

impl Orientation {
    /// Only the exact token `vertical` selects [`Orientation::Vertical`].
    #[must_use]
    pub fn from_direction(direction: &str) -> Self {
        if direction == "vertical" {
            Self::Vertical
        } else {
            Self::Horizontal
        }
    }
}

/// Artifact encodings the surface backends can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// PNG image surface.
    Raster,
    /// Single-page PDF surface.
    Vector,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 2] = [OutputFormat::Raster, OutputFormat::Vector];

    /// Resolves the form token (`png`, `pdf`) into a format.
    pub fn from_token(token: &str) -> ChartResult<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.token() == token)
            .ok_or_else(|| ChartError::UnsupportedFormat {
                token: token.to_owned(),
            })
    }

    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Raster => "png",
            Self::Vector => "pdf",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Raster => "PNG",
            Self::Vector => "PDF",
        }
    }

    /// File extension without the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        self.token()
    }
}
