//! Session-scoped signing state
//!
//! All mutable state of one signing session lives in [`SigningSession`] and
//! is passed explicitly to every handler. Decoding and rendering are
//! asynchronous in the host, so both are split into a begin and a complete
//! step. The ticket in between keeps a slow decode or render of an old
//! selection from overwriting a newer one.

use crate::config::StampConfig;
use crate::document::{DocumentTicket, SourceDocument};
use crate::error::StampError;
use crate::export::{export_document, ExportArtifact};
use crate::overlay::{Gesture, OverlayManipulator, OverlayPlacement, PointerEvent, PointerKind};
use crate::raster::Raster;
use crate::view::{RenderRequest, RenderedSurface, ViewState};

/// Result of handing a file to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file was accepted and state changed
    Loaded,
    /// The file type did not match; nothing changed
    Ignored,
}

/// The selected signature image and where it sits on screen
#[derive(Debug, Clone)]
struct Signature {
    name: String,
    image: Raster,
    placement: OverlayPlacement,
}

/// State of one signing session
#[derive(Debug)]
pub struct SigningSession {
    config: StampConfig,
    view: ViewState,
    document: Option<SourceDocument>,
    load_ticket: u64,
    generation: u64,
    surface: Option<RenderedSurface>,
    signature: Option<Signature>,
    manipulator: OverlayManipulator,
}

impl Default for SigningSession {
    fn default() -> Self {
        Self::with_config(StampConfig::default())
    }
}

impl SigningSession {
    /// Create a session with a validated configuration
    pub fn new(config: StampConfig) -> Result<Self, StampError> {
        config.validate()?;
        Ok(Self::with_config(config))
    }

    fn with_config(config: StampConfig) -> Self {
        Self {
            view: ViewState::new(config.zoom),
            config,
            document: None,
            load_ticket: 0,
            generation: 0,
            surface: None,
            signature: None,
            manipulator: OverlayManipulator::new(),
        }
    }

    pub fn config(&self) -> &StampConfig {
        &self.config
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn document(&self) -> Option<&SourceDocument> {
        self.document.as_ref()
    }

    pub fn surface(&self) -> Option<&RenderedSurface> {
        self.surface.as_ref()
    }

    pub fn overlay(&self) -> Option<OverlayPlacement> {
        self.signature.as_ref().map(|s| s.placement)
    }

    pub fn signature_name(&self) -> Option<&str> {
        self.signature.as_ref().map(|s| s.name.as_str())
    }

    pub fn gesture(&self) -> Gesture {
        self.manipulator.gesture()
    }

    // ============ Document ============

    /// Start loading a newly selected document
    ///
    /// A file whose type is not the configured document type is ignored and
    /// `None` is returned. Otherwise the host decodes the file and reports
    /// back with the ticket; a later selection supersedes this one.
    pub fn begin_document_load(&mut self, name: &str, mime: &str) -> Option<DocumentTicket> {
        if mime != self.config.document_mime {
            tracing::debug!(name, mime, "Ignoring document of unsupported type");
            return None;
        }
        self.load_ticket += 1;
        Some(DocumentTicket(self.load_ticket))
    }

    /// Install a document the host decoded
    ///
    /// Replaces the current document, invalidates the rendered surface and
    /// resets to page 1. Returns false, changing nothing, when a newer
    /// selection has been made since the ticket was issued.
    pub fn complete_document_load(&mut self, ticket: DocumentTicket, document: SourceDocument) -> bool {
        if ticket.0 != self.load_ticket {
            tracing::warn!(
                name = document.name(),
                "Discarding document superseded by a newer selection"
            );
            return false;
        }

        tracing::info!(
            name = document.name(),
            pages = document.page_count(),
            "Loaded document"
        );
        self.document = Some(document);
        self.generation += 1;
        self.surface = None;
        self.view.set_current_page(1);
        true
    }

    /// Record a failed decode; the previous document stays in place
    pub fn fail_document_load(&self, ticket: DocumentTicket, reason: &str) {
        tracing::warn!(ticket = ticket.0, reason, "Error loading PDF");
    }

    /// Generation of the current document, bumped on every replacement
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ask for the current page to be rendered
    ///
    /// Returns `None` when no document is loaded.
    pub fn begin_render(&self) -> Option<RenderRequest> {
        self.document.as_ref()?;
        Some(RenderRequest {
            generation: self.generation,
            page: self.view.current_page(),
            zoom: self.view.zoom(),
        })
    }

    /// Install a finished render
    ///
    /// Returns false, leaving state untouched, when the request belongs to a
    /// document that has since been replaced.
    pub fn complete_render(&mut self, request: RenderRequest, raster: Raster) -> bool {
        if request.generation != self.generation {
            tracing::warn!(
                stale = request.generation,
                current = self.generation,
                "Discarding render for a replaced document"
            );
            return false;
        }

        tracing::debug!(
            page = request.page,
            width = raster.width(),
            height = raster.height(),
            "Page rendered"
        );
        self.surface = Some(RenderedSurface::new(request.zoom, raster));
        true
    }

    /// Record a failed render; state is left as it was
    pub fn fail_render(&self, request: RenderRequest, reason: &str) {
        tracing::warn!(page = request.page, reason, "Error rendering page");
    }

    // ============ Signature overlay ============

    /// Select a signature image, replacing any existing overlay
    ///
    /// A file whose type is not the configured image type is ignored. An
    /// undecodable image leaves the current overlay in place.
    pub fn load_signature(
        &mut self,
        name: &str,
        mime: &str,
        bytes: &[u8],
    ) -> Result<LoadOutcome, StampError> {
        if mime != self.config.signature_mime {
            tracing::debug!(mime, "Ignoring signature of unsupported type");
            return Ok(LoadOutcome::Ignored);
        }

        let image = Raster::decode_png(bytes)?;
        let initial = self.config.initial_overlay;
        let placement =
            OverlayPlacement::new(initial.left, initial.top, initial.width, image.aspect_ratio());

        tracing::info!(
            name,
            width = image.width(),
            height = image.height(),
            "Placed signature"
        );

        self.manipulator.reset();
        self.signature = Some(Signature {
            name: name.to_string(),
            image,
            placement,
        });
        Ok(LoadOutcome::Loaded)
    }

    /// Remove the overlay and forget the signature image
    pub fn clear_signature(&mut self) {
        self.manipulator.reset();
        if self.signature.take().is_some() {
            tracing::debug!("Cleared signature");
        }
    }

    /// Feed a pointer event to the drag/resize state machine
    ///
    /// Returns the placement after the event, or `None` without an overlay.
    /// Gestures start only once a page is on screen, since clamping needs the
    /// surface bounds.
    pub fn pointer(&mut self, event: PointerEvent) -> Option<OverlayPlacement> {
        let signature = self.signature.as_mut()?;

        let Some(surface) = self.surface.as_ref() else {
            if event.kind == PointerKind::Up {
                self.manipulator.reset();
            }
            return Some(signature.placement);
        };

        let before = self.manipulator.gesture();
        self.manipulator.handle(
            event,
            &mut signature.placement,
            surface.size(),
            self.config.min_overlay_width,
        );
        let after = self.manipulator.gesture();
        if before.name() != after.name() {
            tracing::debug!(from = before.name(), to = after.name(), "Gesture");
        }

        Some(signature.placement)
    }

    // ============ Export ============

    /// True exactly when a page is rendered and an overlay exists
    pub fn can_export(&self) -> bool {
        self.surface.is_some() && self.signature.is_some()
    }

    /// True exactly when an overlay exists
    pub fn can_clear(&self) -> bool {
        self.signature.is_some()
    }

    /// Flatten the page and overlay into the output document
    ///
    /// Returns `Ok(None)` when there is nothing to export.
    pub fn export(&self) -> Result<Option<ExportArtifact>, StampError> {
        let (Some(surface), Some(signature)) = (self.surface.as_ref(), self.signature.as_ref())
        else {
            tracing::debug!("Export skipped: page or signature missing");
            return Ok(None);
        };

        export_document(
            surface,
            &signature.image,
            &signature.placement,
            &self.config.output_filename,
        )
        .map(Some)
    }
}
