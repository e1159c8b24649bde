//! Virtual keyboard services provided by the host platform.
//!
//! ## Usage
//!
//! Implement [`VirtualKeyboard`] over the platform's on-screen keyboard and
//! [`KeyboardHeight`] over its geometry query. `codefield-platform` ships
//! height strategies for the common targets.

use std::sync::Arc;

use crate::field::ContentType;

/// Layout of the on-screen keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyboardKind {
    /// Full text layout.
    #[default]
    Default,
    /// Digits only.
    NumberPad,
    /// Digits with a decimal separator.
    DecimalPad,
    /// Text layout with `@` and `.` keys.
    EmailAddress,
    /// Digits with one-time-code autofill suggestions.
    OneTimeCode,
}

impl KeyboardKind {
    /// Keyboard layout used for a field of the given content type.
    pub fn for_content(content: ContentType) -> Self {
        match content {
            ContentType::IntegerNumber | ContentType::Custom => Self::NumberPad,
            ContentType::DecimalNumber => Self::DecimalPad,
            ContentType::EmailAddress => Self::EmailAddress,
            ContentType::Pin => Self::OneTimeCode,
            ContentType::Standard
            | ContentType::Autocorrected
            | ContentType::Alphanumeric
            | ContentType::Name
            | ContentType::Password => Self::Default,
        }
    }
}

/// Parameters for opening a keyboard session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardRequest {
    /// Text the keyboard starts editing from.
    pub text: String,
    /// Keyboard layout.
    pub kind: KeyboardKind,
    /// Whether the platform may autocorrect input.
    pub autocorrect: bool,
    /// Whether the return key inserts new lines.
    pub multiline: bool,
    /// Whether typed characters are masked.
    pub secure: bool,
    /// Whether the keyboard uses the alert appearance.
    pub alert: bool,
    /// Placeholder shown in the keyboard's input line.
    pub placeholder: String,
}

impl KeyboardRequest {
    /// Plain single-line request for `kind`, seeded with `text`.
    pub fn new(text: impl Into<String>, kind: KeyboardKind) -> Self {
        Self {
            text: text.into(),
            kind,
            autocorrect: false,
            multiline: false,
            secure: false,
            alert: false,
            placeholder: String::new(),
        }
    }
}

/// A live keyboard session returned by [`VirtualKeyboard::open`].
pub trait KeyboardSession: Send + Sync {
    /// Closes the keyboard for this session.
    fn deactivate(&self);

    /// Whether the session still owns the on-screen keyboard.
    fn is_active(&self) -> bool;
}

/// The platform's on-screen keyboard.
pub trait VirtualKeyboard: Send + Sync {
    /// Opens the keyboard, replacing any session that is already open.
    fn open(&self, request: KeyboardRequest) -> Arc<dyn KeyboardSession>;

    /// Whether any on-screen keyboard is currently visible.
    fn is_visible(&self) -> bool;

    /// Hides or shows the input line the platform draws above the keyboard.
    fn set_hide_input(&self, _hide: bool) {}
}

/// Height of the region covered by the visible keyboard.
///
/// Platforms that cannot report an overlay height return `0.0`.
pub trait KeyboardHeight: Send + Sync {
    /// Current keyboard height in screen units.
    fn keyboard_height(&self) -> f32;
}

/// Keyboard height fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixedHeight(pub f32);

impl KeyboardHeight for FixedHeight {
    fn keyboard_height(&self) -> f32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_content_gets_number_pad() {
        assert_eq!(
            KeyboardKind::for_content(ContentType::IntegerNumber),
            KeyboardKind::NumberPad
        );
        assert_eq!(
            KeyboardKind::for_content(ContentType::Custom),
            KeyboardKind::NumberPad
        );
        assert_eq!(
            KeyboardKind::for_content(ContentType::DecimalNumber),
            KeyboardKind::DecimalPad
        );
    }

    #[test]
    fn pin_and_email_get_dedicated_layouts() {
        assert_eq!(
            KeyboardKind::for_content(ContentType::Pin),
            KeyboardKind::OneTimeCode
        );
        assert_eq!(
            KeyboardKind::for_content(ContentType::EmailAddress),
            KeyboardKind::EmailAddress
        );
    }

    #[test]
    fn text_content_falls_back_to_default() {
        for content in [
            ContentType::Standard,
            ContentType::Autocorrected,
            ContentType::Alphanumeric,
            ContentType::Name,
            ContentType::Password,
        ] {
            assert_eq!(KeyboardKind::for_content(content), KeyboardKind::Default);
        }
    }

    #[test]
    fn request_disables_extras() {
        let request = KeyboardRequest::new("4", KeyboardKind::OneTimeCode);
        assert_eq!(request.text, "4");
        assert!(!request.autocorrect);
        assert!(!request.multiline);
        assert!(!request.secure);
        assert!(!request.alert);
        assert!(request.placeholder.is_empty());
    }

    #[test]
    fn fixed_height_reports_its_value() {
        assert_eq!(FixedHeight(240.0).keyboard_height(), 240.0);
        assert_eq!(FixedHeight::default().keyboard_height(), 0.0);
    }
}
