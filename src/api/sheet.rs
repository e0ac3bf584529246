//! Gesture state for the draggable bottom sheet.
//!
//! The sheet is positioned by a downward translation (`offset`, in pixels):
//! `0` is fully open and `collapsed_offset` leaves only the handle visible.
//! The controller does no DOM work; the host applies [`SheetController::offset`]
//! and [`SheetController::transition`] after each call.

use tracing::debug;

/// Height of the handle that stays visible when collapsed, in pixels.
pub const MIN_VISIBLE_HEIGHT: f64 = 32.0;

/// Expansion ratio above which the backdrop overlay is shown.
pub const EXPANDED_THRESHOLD: f64 = 0.25;

/// Pointer travel beyond which a press counts as a drag, not a click.
pub const CLICK_SUPPRESS_DISTANCE: f64 = 4.0;

/// Duration of the settle animation, in milliseconds.
pub const SETTLE_TRANSITION_MS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SheetPhase {
    Idle,
    Dragging { start_y: f64, start_offset: f64 },
    /// Animating towards the current offset.
    Settling,
}

/// Whether the host should animate offset changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetTransition {
    None,
    Ease { duration_ms: u32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetController {
    phase: SheetPhase,
    collapsed_offset: f64,
    offset: f64,
    last_pointer_y: f64,
    ignore_click: bool,
}

impl Default for SheetController {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetController {
    /// A controller with no measured height. Call [`resize`](Self::resize)
    /// once the sheet has been laid out.
    pub fn new() -> Self {
        Self {
            phase: SheetPhase::Idle,
            collapsed_offset: 0.0,
            offset: 0.0,
            last_pointer_y: 0.0,
            ignore_click: false,
        }
    }

    pub fn phase(&self) -> SheetPhase {
        self.phase
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn collapsed_offset(&self) -> f64 {
        self.collapsed_offset
    }

    pub fn transition(&self) -> SheetTransition {
        match self.phase {
            SheetPhase::Settling => SheetTransition::Ease {
                duration_ms: SETTLE_TRANSITION_MS,
            },
            _ => SheetTransition::None,
        }
    }

    /// `0.0` when collapsed, `1.0` when fully open.
    pub fn expansion_ratio(&self) -> f64 {
        if self.collapsed_offset == 0.0 {
            return 0.0;
        }
        1.0 - self.offset / self.collapsed_offset
    }

    /// Whether the backdrop overlay should be shown.
    pub fn is_expanded(&self) -> bool {
        self.expansion_ratio() > EXPANDED_THRESHOLD
    }

    fn set_offset(&mut self, value: f64) {
        self.offset = value.clamp(0.0, self.collapsed_offset.max(0.0));
    }

    /// Recomputes bounds for a new sheet height.
    ///
    /// With `preserve_position` the current openness ratio is kept; otherwise
    /// the sheet collapses. Heights of zero are ignored (layout not ready)
    /// and `false` is returned so the host can retry on the next frame.
    ///
    /// A drag in progress continues from the new position under the pointer.
    pub fn resize(&mut self, sheet_height: f64, preserve_position: bool) -> bool {
        if !(sheet_height > 0.0) {
            debug!(sheet_height, "sheet not laid out yet");
            return false;
        }

        let openness = if preserve_position && self.collapsed_offset > 0.0 {
            self.expansion_ratio()
        } else {
            0.0
        };

        self.collapsed_offset = (sheet_height - MIN_VISIBLE_HEIGHT).max(0.0);
        let target = if preserve_position {
            self.collapsed_offset * (1.0 - openness)
        } else {
            self.collapsed_offset
        };

        self.set_offset(target);
        match self.phase {
            SheetPhase::Dragging { .. } => {
                self.phase = SheetPhase::Dragging {
                    start_y: self.last_pointer_y,
                    start_offset: self.offset,
                };
            }
            // Jumps straight to the new position without animating.
            SheetPhase::Settling => self.phase = SheetPhase::Idle,
            SheetPhase::Idle => {}
        }
        true
    }

    pub fn begin_drag(&mut self, y: f64) {
        self.phase = SheetPhase::Dragging {
            start_y: y,
            start_offset: self.offset,
        };
        self.last_pointer_y = y;
        self.ignore_click = false;
    }

    /// Moves the sheet with the pointer. No-op unless dragging.
    pub fn drag_to(&mut self, y: f64) {
        let SheetPhase::Dragging {
            start_y,
            start_offset,
        } = self.phase
        else {
            return;
        };

        self.last_pointer_y = y;
        let delta = y - start_y;
        if !self.ignore_click && delta.abs() > CLICK_SUPPRESS_DISTANCE {
            self.ignore_click = true;
        }
        self.set_offset(start_offset + delta);
    }

    /// Releases the pointer. The sheet stays where it was dropped.
    pub fn end_drag(&mut self) {
        if matches!(self.phase, SheetPhase::Dragging { .. }) {
            self.phase = SheetPhase::Settling;
        }
    }

    /// Handle click: toggles open/closed unless the press was a drag.
    pub fn click_handle(&mut self) {
        if self.ignore_click {
            self.ignore_click = false;
            return;
        }
        self.toggle();
    }

    /// Collapses past the midpoint, opens otherwise.
    pub fn toggle(&mut self) {
        self.phase = SheetPhase::Settling;
        if self.expansion_ratio() > 0.5 {
            self.set_offset(self.collapsed_offset);
        } else {
            self.set_offset(0.0);
        }
    }

    /// Backdrop click always collapses.
    pub fn click_overlay(&mut self) {
        self.ignore_click = false;
        self.phase = SheetPhase::Settling;
        self.set_offset(self.collapsed_offset);
    }

    /// Called by the host when the settle animation ends.
    pub fn settle_complete(&mut self) {
        if self.phase == SheetPhase::Settling {
            self.phase = SheetPhase::Idle;
        }
    }
}
