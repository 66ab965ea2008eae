//! Session configuration
//!
//! Every field has a default, so an empty JSON object (or no config at all)
//! yields the stock behaviour: zoom 1.5, a 150px overlay at (50, 50), and
//! `signed-document.pdf` as the output name.

use crate::error::StampError;
use serde::{Deserialize, Serialize};

/// Tunables for a signing session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StampConfig {
    /// Zoom factor from document units to on-screen pixels (default: 1.5)
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    /// Lower bound for the overlay width while resizing, in pixels (default: 50)
    #[serde(default = "default_min_overlay_width")]
    pub min_overlay_width: f64,
    /// Where a freshly selected signature lands on the surface
    #[serde(default)]
    pub initial_overlay: InitialOverlay,
    /// File name of the exported document (default: "signed-document.pdf")
    #[serde(default = "default_output_filename")]
    pub output_filename: String,
    /// Accepted file type for source documents (default: "application/pdf")
    #[serde(default = "default_document_mime")]
    pub document_mime: String,
    /// Accepted file type for signature images (default: "image/png")
    #[serde(default = "default_signature_mime")]
    pub signature_mime: String,
}

/// Initial on-screen placement of a new overlay, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialOverlay {
    #[serde(default = "default_initial_offset")]
    pub left: f64,
    #[serde(default = "default_initial_offset")]
    pub top: f64,
    #[serde(default = "default_initial_width")]
    pub width: f64,
}

impl Default for InitialOverlay {
    fn default() -> Self {
        Self {
            left: default_initial_offset(),
            top: default_initial_offset(),
            width: default_initial_width(),
        }
    }
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            zoom: default_zoom(),
            min_overlay_width: default_min_overlay_width(),
            initial_overlay: InitialOverlay::default(),
            output_filename: default_output_filename(),
            document_mime: default_document_mime(),
            signature_mime: default_signature_mime(),
        }
    }
}

impl StampConfig {
    /// Parse a (possibly partial) JSON configuration and validate it
    ///
    /// # Errors
    ///
    /// Returns `StampError::Config` if the JSON is malformed or a value is out
    /// of range.
    pub fn from_json(s: &str) -> Result<Self, StampError> {
        let config: Self = serde_json::from_str(s)
            .map_err(|e| StampError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), StampError> {
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(StampError::Config(format!(
                "zoom must be a positive number, got {}",
                self.zoom
            )));
        }
        if !self.min_overlay_width.is_finite() || self.min_overlay_width <= 0.0 {
            return Err(StampError::Config(format!(
                "min_overlay_width must be positive, got {}",
                self.min_overlay_width
            )));
        }
        if self.initial_overlay.width < self.min_overlay_width {
            return Err(StampError::Config(format!(
                "initial overlay width {} is below the minimum {}",
                self.initial_overlay.width, self.min_overlay_width
            )));
        }
        if self.output_filename.trim().is_empty() {
            return Err(StampError::Config(
                "output_filename must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_zoom() -> f64 {
    1.5
}

fn default_min_overlay_width() -> f64 {
    50.0
}

fn default_initial_offset() -> f64 {
    50.0
}

fn default_initial_width() -> f64 {
    150.0
}

fn default_output_filename() -> String {
    "signed-document.pdf".to_string()
}

fn default_document_mime() -> String {
    "application/pdf".to_string()
}

fn default_signature_mime() -> String {
    "image/png".to_string()
}
