//! RGBA8 rasters and compositing
//!
//! Rendered pages arrive as canvas `ImageData` (already RGBA8, straight
//! alpha); signatures arrive as PNG files. Both end up as a `Raster`, and the
//! flattened export is one `Raster` drawn onto another.

use crate::coords::Rect;
use crate::error::StampError;
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// RGBA8 image with straight (non-premultiplied) alpha
#[derive(Clone, PartialEq, Eq)]
pub struct Raster {
    image: RgbaImage,
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Raster({}x{})", self.width(), self.height())
    }
}

impl Raster {
    /// Wrap an RGBA8 buffer
    ///
    /// # Errors
    ///
    /// Returns `StampError::InvalidRaster` if the buffer length is not
    /// `width * height * 4` or either dimension is zero.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, StampError> {
        if width == 0 || height == 0 {
            return Err(StampError::InvalidRaster(format!(
                "Empty raster {}x{}",
                width, height
            )));
        }
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(StampError::InvalidRaster(format!(
                "Expected {} bytes for {}x{}, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }
        RgbaImage::from_raw(width, height, pixels)
            .map(|image| Self { image })
            .ok_or_else(|| StampError::InvalidRaster("Buffer too small".to_string()))
    }

    /// A raster filled with one color
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(width, height, Rgba(rgba)),
        }
    }

    /// Decode a PNG file into RGBA8
    ///
    /// Palette, grayscale and 16-bit images are converted.
    pub fn decode_png(bytes: &[u8]) -> Result<Self, StampError> {
        let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .map_err(|e| StampError::ImageDecode(e.to_string()))?;
        if decoded.width() == 0 || decoded.height() == 0 {
            return Err(StampError::ImageDecode("Image is empty".to_string()));
        }
        Ok(Self {
            image: decoded.to_rgba8(),
        })
    }

    /// Encode as an RGBA8 PNG
    pub fn encode_png(&self) -> Result<Vec<u8>, StampError> {
        let mut out = Cursor::new(Vec::new());
        self.image
            .write_to(&mut out, ImageFormat::Png)
            .map_err(|e| StampError::Write(e.to_string()))?;
        Ok(out.into_inner())
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Width divided by height
    pub fn aspect_ratio(&self) -> f64 {
        self.width() as f64 / self.height() as f64
    }

    /// Row-major RGBA8 bytes
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|px| px.0)
    }

    /// True when every pixel has alpha 255
    pub fn is_opaque(&self) -> bool {
        self.image.pixels().all(|px| px[3] == 255)
    }

    /// Draw `src` stretched into `dest` with source-over blending
    ///
    /// `dest` is in this raster's pixel space and may extend past its edges;
    /// the part outside is clipped. Resampling is bilinear.
    pub fn draw_scaled(&mut self, src: &Raster, dest: Rect) {
        let width = dest.width.round();
        let height = dest.height.round();
        if !(width >= 1.0 && height >= 1.0) {
            return;
        }

        let scaled = imageops::resize(&src.image, width as u32, height as u32, FilterType::Triangle);
        imageops::overlay(
            &mut self.image,
            &scaled,
            dest.x.round() as i64,
            dest.y.round() as i64,
        );
    }
}

#[cfg(test)]
pub(crate) fn png_fixture(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    Raster::filled(width, height, rgba).encode_png().unwrap()
}
