//! View state and rendered surfaces

use crate::coords::Size;
use crate::raster::Raster;

/// Fixed zoom and the page currently shown
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    zoom: f64,
    current_page: u32,
}

impl ViewState {
    pub fn new(zoom: f64) -> Self {
        Self {
            zoom,
            current_page: 1,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// 1-based index of the page on screen
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub(crate) fn set_current_page(&mut self, page: u32) {
        self.current_page = page;
    }
}

/// A page rasterized by the host renderer
#[derive(Debug, Clone)]
pub struct RenderedSurface {
    zoom: f64,
    raster: Raster,
}

impl RenderedSurface {
    pub fn new(zoom: f64, raster: Raster) -> Self {
        Self { zoom, raster }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Pixel bounds of the surface
    pub fn size(&self) -> Size {
        Size::new(self.raster.width() as f64, self.raster.height() as f64)
    }
}

/// A render the host should perform
///
/// The generation ties the eventual result to the document that was current
/// when the request was made.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderRequest {
    pub generation: u64,
    pub page: u32,
    pub zoom: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_starts_on_first_page() {
        let mut view = ViewState::new(1.5);
        assert_eq!(view.current_page(), 1);
        assert_eq!(view.zoom(), 1.5);
        view.set_current_page(3);
        assert_eq!(view.current_page(), 3);
    }

    #[test]
    fn test_rendered_surface_bounds() {
        let surface = RenderedSurface::new(1.5, Raster::filled(900, 1200, [0; 4]));
        assert_eq!(surface.size(), Size::new(900.0, 1200.0));
        assert_eq!(surface.zoom(), 1.5);
    }
}
