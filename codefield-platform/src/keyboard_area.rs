//! Keyboard heights that do not need a platform query.
//!
//! ## Usage
//!
//! Hosts that learn the keyboard frame from notifications (iOS
//! `keyboardWillShow`/`keyboardWillHide`) report it here and hand a
//! [`ReportedKeyboardArea`] to the controller.

use std::sync::{Arc, OnceLock};

use codefield::KeyboardHeight;
use parking_lot::RwLock;
use tracing::trace;

/// Strategy for platforms without a keyboard overlay; always `0.0`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOverlay;

impl KeyboardHeight for NoOverlay {
    fn keyboard_height(&self) -> f32 {
        0.0
    }
}

#[derive(Default)]
struct KeyboardAreaState {
    height: f32,
}

/// Keyboard height taken from the last frame the host reported.
///
/// Clones share the reported value.
#[derive(Clone, Default)]
pub struct ReportedKeyboardArea {
    state: Arc<RwLock<KeyboardAreaState>>,
}

impl ReportedKeyboardArea {
    /// Creates an area that reports `0.0` until told otherwise.
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide area written by [`report_keyboard_area`].
    pub fn shared() -> Self {
        keyboard_area_state().clone()
    }

    /// Records the height of the keyboard frame. Negative heights count as
    /// hidden.
    pub fn report(&self, height: f32) {
        trace!(height, "keyboard area reported");
        self.state.write().height = height.max(0.0);
    }

    /// Records that the keyboard was hidden.
    pub fn clear(&self) {
        self.state.write().height = 0.0;
    }
}

impl KeyboardHeight for ReportedKeyboardArea {
    fn keyboard_height(&self) -> f32 {
        self.state.read().height
    }
}

fn keyboard_area_state() -> &'static ReportedKeyboardArea {
    static STATE: OnceLock<ReportedKeyboardArea> = OnceLock::new();
    STATE.get_or_init(ReportedKeyboardArea::new)
}

/// Reports the keyboard frame height to [`ReportedKeyboardArea::shared`].
pub fn report_keyboard_area(height: f32) {
    keyboard_area_state().report(height);
}

/// Reports to [`ReportedKeyboardArea::shared`] that the keyboard is hidden.
pub fn clear_keyboard_area() {
    keyboard_area_state().clear();
}
