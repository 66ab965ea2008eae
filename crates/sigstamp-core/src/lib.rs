//! Signature stamping core
//!
//! Places a signature image over a rendered PDF page and exports the
//! composited page as a new single-page PDF.
//!
//! Decoding and rasterizing the PDF are left to the host (pdf.js in the
//! browser); this crate holds everything else:
//! - `SigningSession`: session-scoped state driven by the host's handlers
//! - `overlay`: drag/resize state machine over toolkit-neutral pointer events
//! - `coords`: screen ↔ document transform at a fixed zoom
//! - `raster` / `writer`: compositing and PDF output

pub mod config;
pub mod coords;
pub mod document;
pub mod error;
pub mod export;
pub mod overlay;
pub mod raster;
pub mod session;
pub mod view;
pub mod writer;

pub use config::{InitialOverlay, StampConfig};
pub use coords::{export_layout, ExportLayout, Rect, Size};
pub use document::{DocumentTicket, SourceDocument};
pub use error::StampError;
pub use export::ExportArtifact;
pub use overlay::{
    Gesture, OverlayManipulator, OverlayPlacement, Point, PointerEvent, PointerKind,
    PointerTarget,
};
pub use raster::Raster;
pub use session::{LoadOutcome, SigningSession};
pub use view::{RenderRequest, RenderedSurface, ViewState};
pub use writer::write_single_page_pdf;
