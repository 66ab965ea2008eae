//! Flattening and export
//!
//! Export composites the overlay onto the rendered surface at screen
//! resolution, then places that raster over a page of native size. The PDF
//! viewer performs the 1/zoom downscale, so the output matches the screen.

use crate::coords::{export_layout, ExportLayout};
use crate::error::StampError;
use crate::overlay::OverlayPlacement;
use crate::raster::Raster;
use crate::view::RenderedSurface;
use crate::writer::write_single_page_pdf;
use serde::Serialize;

/// The finished output document
#[derive(Debug, Clone, Serialize)]
pub struct ExportArtifact {
    pub filename: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub layout: ExportLayout,
}

/// Composite the signature onto a copy of the surface raster
pub fn flatten(surface: &RenderedSurface, signature: &Raster, placement: &OverlayPlacement) -> Raster {
    let mut flattened = surface.raster().clone();
    flattened.draw_scaled(signature, placement.rect());
    flattened
}

/// Flatten and write the output document
pub fn export_document(
    surface: &RenderedSurface,
    signature: &Raster,
    placement: &OverlayPlacement,
    filename: &str,
) -> Result<ExportArtifact, StampError> {
    let layout = export_layout(surface.size(), placement.rect(), surface.zoom());
    let flattened = flatten(surface, signature, placement);
    let bytes = write_single_page_pdf(&flattened, layout.page_size)?;

    tracing::info!(
        width = layout.page_size.width,
        height = layout.page_size.height,
        bytes = bytes.len(),
        "Exported {}",
        filename
    );

    Ok(ExportArtifact {
        filename: filename.to_string(),
        bytes,
        layout,
    })
}
