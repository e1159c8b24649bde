//! # Text Entry Fields
//!
//! The controller never owns a text widget. It talks to the host's widgets
//! through the [`Field`] trait, which exposes the few attributes the
//! auto-advance logic reads and a way to subscribe to the widget's events.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use codefield::{ContentType, Field, FieldEvent, FieldListener};
//!
//! struct DigitBox;
//!
//! impl Field for DigitBox {
//!     fn text(&self) -> String { String::new() }
//!     fn character_limit(&self) -> usize { 1 }
//!     fn content_type(&self) -> ContentType { ContentType::Pin }
//!     fn is_focused(&self) -> bool { false }
//!     fn screen_y(&self) -> f32 { 0.0 }
//!     fn activate(&self) {}
//!     fn add_listener(&self, _event: FieldEvent, _listener: FieldListener) {}
//! }
//!
//! let field: Arc<dyn Field> = Arc::new(DigitBox);
//! assert!(field.is_single_character());
//! ```

use std::sync::Arc;

/// Classification of the input a field expects.
///
/// Drives the layout of the virtual keyboard opened for the field, see
/// [`KeyboardKind::for_content`](crate::KeyboardKind::for_content).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContentType {
    /// Free-form text.
    #[default]
    Standard,
    /// Free-form text with autocorrection.
    Autocorrected,
    /// Whole numbers.
    IntegerNumber,
    /// Numbers with a decimal separator.
    DecimalNumber,
    /// Letters and digits only.
    Alphanumeric,
    /// Personal names.
    Name,
    /// Email addresses.
    EmailAddress,
    /// Masked text.
    Password,
    /// Masked digits, typically one-time codes.
    Pin,
    /// Host-defined validation.
    Custom,
}

/// Events a [`Field`] reports to its listeners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldEvent {
    /// The field gained focus.
    Selected,
    /// The field's text content changed.
    ValueChanged,
    /// The user finished editing the field (submit or focus loss).
    EditEnded,
}

/// Callback invoked when a subscribed [`FieldEvent`] fires.
pub type FieldListener = Arc<dyn Fn() + Send + Sync>;

/// A host-owned text entry widget.
///
/// Implementations must fire listeners on the UI thread. Listeners may call
/// back into [`Field::activate`] on other fields of the same sequence.
pub trait Field: Send + Sync {
    /// Current text content.
    fn text(&self) -> String;

    /// Maximum number of characters, `0` meaning unlimited.
    fn character_limit(&self) -> usize;

    /// Expected kind of input.
    fn content_type(&self) -> ContentType;

    /// Whether the field currently holds input focus.
    fn is_focused(&self) -> bool;

    /// Vertical position of the field on screen, in the same units the
    /// keyboard height is reported in.
    fn screen_y(&self) -> f32;

    /// Gives the field input focus.
    fn activate(&self);

    /// Subscribes `listener` to `event`.
    fn add_listener(&self, event: FieldEvent, listener: FieldListener);

    /// Whether the field holds no text.
    fn is_empty(&self) -> bool {
        self.text().is_empty()
    }

    /// Whether the field accepts exactly one character, as OTP digit boxes do.
    fn is_single_character(&self) -> bool {
        self.character_limit() == 1
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn content_type_uses_variant_names() {
        assert_eq!(serde_json::to_string(&ContentType::Pin).unwrap(), r#""Pin""#);
        let parsed: ContentType = serde_json::from_str(r#""EmailAddress""#).unwrap();
        assert_eq!(parsed, ContentType::EmailAddress);
    }
}
