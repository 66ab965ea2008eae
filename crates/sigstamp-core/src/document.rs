//! Source document handle
//!
//! Decoding and rasterizing the PDF belong to the host renderer. The session
//! only tracks which document is current, so the handle carries what the
//! renderer reported about it.

use crate::error::StampError;

/// A document the host renderer has decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    name: String,
    page_count: u32,
}

impl SourceDocument {
    /// Record a decoded document
    ///
    /// # Errors
    ///
    /// Returns `StampError::DocumentDecode` if the renderer found no pages.
    pub fn new(name: &str, page_count: u32) -> Result<Self, StampError> {
        if page_count == 0 {
            return Err(StampError::DocumentDecode(
                "Document has no pages".to_string(),
            ));
        }
        Ok(Self {
            name: name.to_string(),
            page_count,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn page_count(&self) -> u32 {
        self.page_count
    }
}

/// Ties a decode in flight to the file selection that started it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentTicket(pub(crate) u64);
