//! Overlay placement and the drag/resize state machine
//!
//! The overlay is positioned in on-screen pixels over the rendered surface.
//! Pointer input arrives as toolkit-neutral [`PointerEvent`]s; the host maps
//! its own mouse/touch events onto them.

use crate::coords::{Rect, Size};
use serde::{Deserialize, Serialize};

/// On-screen placement of the signature overlay
///
/// Height is not stored: it always follows the image's natural aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlayPlacement {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    /// Natural width / natural height of the signature image
    pub aspect_ratio: f64,
}

impl OverlayPlacement {
    pub fn new(left: f64, top: f64, width: f64, aspect_ratio: f64) -> Self {
        Self {
            left,
            top,
            width,
            aspect_ratio,
        }
    }

    pub fn height(&self) -> f64 {
        self.width / self.aspect_ratio
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.width, self.height())
    }

    /// Move to `(left, top)`, kept inside `bounds` on both axes
    ///
    /// When the overlay is larger than the bounds the upper limit goes
    /// negative and the position pins to 0.
    pub fn move_clamped(&mut self, left: f64, top: f64, bounds: Size) {
        self.left = left.min(bounds.width - self.width).max(0.0);
        self.top = top.min(bounds.height - self.height()).max(0.0);
    }

    /// Set the width, floored at `min_width`; height is left to follow
    pub fn resize_clamped(&mut self, width: f64, min_width: f64) {
        self.width = width.max(min_width);
    }
}

/// Screen-space point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// What a pointer-down landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
    /// The overlay image itself
    OverlayBody,
    /// The resize grip in the overlay's corner
    ResizeHandle,
    /// Anything else on the page
    Elsewhere,
}

impl PointerTarget {
    /// Parse the host's target name; unknown names count as `Elsewhere`
    pub fn from_name(name: &str) -> Self {
        match name {
            "overlay" | "overlay-body" | "signature-element" => PointerTarget::OverlayBody,
            "resize" | "resize-handle" => PointerTarget::ResizeHandle,
            _ => PointerTarget::Elsewhere,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Down,
    Move,
    Up,
}

/// Toolkit-neutral pointer input
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub position: Point,
    pub target: PointerTarget,
}

impl PointerEvent {
    pub fn down(x: f64, y: f64, target: PointerTarget) -> Self {
        Self {
            kind: PointerKind::Down,
            position: Point::new(x, y),
            target,
        }
    }

    pub fn moved(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Move,
            position: Point::new(x, y),
            target: PointerTarget::Elsewhere,
        }
    }

    pub fn up(x: f64, y: f64) -> Self {
        Self {
            kind: PointerKind::Up,
            position: Point::new(x, y),
            target: PointerTarget::Elsewhere,
        }
    }
}

/// Manipulation state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gesture {
    #[default]
    Idle,
    Dragging {
        start: Point,
        origin_left: f64,
        origin_top: f64,
    },
    Resizing {
        start_x: f64,
        origin_width: f64,
    },
}

impl Gesture {
    pub fn is_idle(&self) -> bool {
        matches!(self, Gesture::Idle)
    }

    /// Short name for logs and the host UI ("idle", "dragging", "resizing")
    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Idle => "idle",
            Gesture::Dragging { .. } => "dragging",
            Gesture::Resizing { .. } => "resizing",
        }
    }
}

/// Drives an [`OverlayPlacement`] from pointer events
#[derive(Debug, Clone, Default)]
pub struct OverlayManipulator {
    gesture: Gesture,
}

impl OverlayManipulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    /// Drop any gesture in progress
    pub fn reset(&mut self) {
        self.gesture = Gesture::Idle;
    }

    /// Feed one event; `bounds` is the surface's current pixel size
    ///
    /// Returns true when the placement changed.
    pub fn handle(
        &mut self,
        event: PointerEvent,
        placement: &mut OverlayPlacement,
        bounds: Size,
        min_width: f64,
    ) -> bool {
        match (event.kind, self.gesture) {
            (PointerKind::Down, Gesture::Idle) => {
                self.gesture = match event.target {
                    PointerTarget::OverlayBody => Gesture::Dragging {
                        start: event.position,
                        origin_left: placement.left,
                        origin_top: placement.top,
                    },
                    PointerTarget::ResizeHandle => Gesture::Resizing {
                        start_x: event.position.x,
                        origin_width: placement.width,
                    },
                    PointerTarget::Elsewhere => Gesture::Idle,
                };
                false
            }
            (PointerKind::Move, Gesture::Dragging {
                start,
                origin_left,
                origin_top,
            }) => {
                let before = *placement;
                let dx = event.position.x - start.x;
                let dy = event.position.y - start.y;
                placement.move_clamped(origin_left + dx, origin_top + dy, bounds);
                before != *placement
            }
            (PointerKind::Move, Gesture::Resizing {
                start_x,
                origin_width,
            }) => {
                let before = *placement;
                let dx = event.position.x - start_x;
                placement.resize_clamped(origin_width + dx, min_width);
                before != *placement
            }
            (PointerKind::Up, _) => {
                self.gesture = Gesture::Idle;
                false
            }
            // Moves while idle, or a second press mid-gesture
            _ => false,
        }
    }
}
