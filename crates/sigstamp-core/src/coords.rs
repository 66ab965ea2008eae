//! Coordinate transformation between screen and document space
//!
//! The page is rendered at a fixed zoom factor `z`, so screen space is
//! document space scaled uniformly by `z`. Export is the inverse: the full
//! composited surface is shrunk by `1/z`, which keeps the overlay exactly
//! where the user saw it.

use serde::{Deserialize, Serialize};

/// Width/height pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Divide both dimensions by `factor`
    pub fn unscaled(&self, factor: f64) -> Self {
        Self {
            width: self.width / factor,
            height: self.height / factor,
        }
    }
}

/// Axis-aligned rectangle with a top-left origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn unscaled(&self, factor: f64) -> Self {
        Self {
            x: self.x / factor,
            y: self.y / factor,
            width: self.width / factor,
            height: self.height / factor,
        }
    }
}

/// Page size and overlay rect in native document units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExportLayout {
    pub page_size: Size,
    pub overlay: Rect,
}

/// Project an on-screen surface and overlay into document space
///
/// `surface` is the rendered page's pixel size at `zoom`, `overlay` is the
/// overlay rect in the same pixel space.
pub fn export_layout(surface: Size, overlay: Rect, zoom: f64) -> ExportLayout {
    ExportLayout {
        page_size: surface.unscaled(zoom),
        overlay: overlay.unscaled(zoom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letter_page_at_default_zoom() {
        let surface = Size::new(918.0, 1188.0);
        let layout = export_layout(surface, Rect::new(0.0, 0.0, 150.0, 75.0), 1.5);
        assert!((layout.page_size.width - 612.0).abs() < 1e-9);
        assert!((layout.page_size.height - 792.0).abs() < 1e-9);
        assert!((layout.overlay.width - 100.0).abs() < 1e-9);
        assert!((layout.overlay.height - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_scenario_600x800() {
        let surface = Size::new(900.0, 1200.0);
        let layout = export_layout(surface, Rect::new(50.0, 50.0, 150.0, 60.0), 1.5);
        assert_eq!(layout.page_size, Size::new(600.0, 800.0));
        assert!((layout.overlay.x - 33.333).abs() < 0.001);
        assert!((layout.overlay.y - 33.333).abs() < 0.001);
        assert!((layout.overlay.width - 100.0).abs() < 1e-9);
        assert!((layout.overlay.height - 40.0).abs() < 1e-9);
    }
}
