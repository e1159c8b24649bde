//! Platform keyboard geometry for codefield.
//!
//! ## Usage
//!
//! Pass [`platform_keyboard_height`] as the
//! [`keyboard_height`](codefield::HostServices::keyboard_height) service. The
//! strategy is picked for the build target:
//!
//! - Android: [`AndroidVisibleFrame`], measured from the activity window
//! - iOS: [`ReportedKeyboardArea::shared`], fed by the host's keyboard
//!   notifications through [`report_keyboard_area`]
//! - everything else: [`NoOverlay`]
#![deny(missing_docs, clippy::unwrap_used)]

#[cfg(target_os = "android")]
pub mod android;
pub mod keyboard_area;

use std::sync::Arc;

use codefield::KeyboardHeight;

#[cfg(target_os = "android")]
pub use android::AndroidVisibleFrame;
pub use keyboard_area::{NoOverlay, ReportedKeyboardArea, clear_keyboard_area, report_keyboard_area};

/// Keyboard height strategy for the current build target.
pub fn platform_keyboard_height() -> Arc<dyn KeyboardHeight> {
    #[cfg(target_os = "android")]
    {
        Arc::new(AndroidVisibleFrame::new())
    }
    #[cfg(target_os = "ios")]
    {
        Arc::new(ReportedKeyboardArea::shared())
    }
    #[cfg(not(any(target_os = "android", target_os = "ios")))]
    {
        Arc::new(NoOverlay)
    }
}

#[cfg(all(test, not(any(target_os = "android", target_os = "ios"))))]
mod tests {
    use super::*;

    #[test]
    fn desktop_reports_no_overlay() {
        report_keyboard_area(320.0);
        assert_eq!(platform_keyboard_height().keyboard_height(), 0.0);
        clear_keyboard_area();
    }
}
