//! codefield keeps a row of text-entry fields, such as the digit boxes of a
//! PIN or one-time-code screen, behaving as one input.
//!
//! # Overview
//!
//! A [`FieldSequenceController`] owns no widgets. The host hands it its
//! fields through the [`Field`] trait and its platform services through
//! [`HostServices`]:
//!
//! - [`VirtualKeyboard`] opens the on-screen keyboard, with a layout chosen
//!   from each field's [`ContentType`]
//! - [`KeyboardHeight`] reports how much of the screen the keyboard covers
//! - [`UiTree`] locates and moves the panel kept above the keyboard
//!
//! Platform implementations of [`KeyboardHeight`] live in the
//! `codefield-platform` crate.
//!
//! # Lifecycle
//!
//! ```rust,ignore
//! let controller = FieldSequenceController::new(node, fields, services, config)?;
//! controller.initialize()?;      // wire listeners, focus the first field
//! controller.enable(&scheduler); // start following the keyboard
//! // ...
//! let code = controller.concatenated_text();
//! controller.disable();          // stop and put the panel back
//! ```
//!
//! # Testing
//!
//! The `testing` feature exposes in-memory hosts in [`testing`].
#![warn(missing_docs)]

pub mod config;
pub mod controller;
pub mod error;
pub mod field;
pub mod keyboard;
pub mod panel;
pub mod scheduler;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod tree;

pub use glam::Vec3;

pub use config::{DEFAULT_POLL_INTERVAL, FieldSequenceConfig};
pub use controller::{FieldSequenceController, HostServices};
pub use error::{Error, Result};
pub use field::{ContentType, Field, FieldEvent, FieldListener};
pub use keyboard::{
    FixedHeight, KeyboardHeight, KeyboardKind, KeyboardRequest, KeyboardSession, VirtualKeyboard,
};
pub use panel::FollowPanel;
pub use scheduler::{FrameScheduler, RepeatingTask, Scheduler, TaskHandle};
pub use tree::{NodeId, UiTree};
