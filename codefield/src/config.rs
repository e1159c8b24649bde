//! Configuration of a field sequence controller.

use std::time::Duration;

use derive_setters::Setters;

/// Default period of the panel-follow loop.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Options for a [`FieldSequenceController`](crate::FieldSequenceController).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use codefield::FieldSequenceConfig;
///
/// let config = FieldSequenceConfig::default()
///     .auto_activate_first(false)
///     .poll_interval(Duration::from_millis(50));
/// assert!(config.auto_advance);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Setters)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FieldSequenceConfig {
    /// Focus the first field on initialization unless a keyboard is already
    /// visible.
    pub auto_activate_first: bool,
    /// Move to the next field when editing of a multi-character field ends.
    pub auto_advance: bool,
    /// Hide the input line the platform draws above the keyboard.
    pub hide_input: bool,
    /// Period of the panel-follow loop.
    pub poll_interval: Duration,
}

impl Default for FieldSequenceConfig {
    fn default() -> Self {
        Self {
            auto_activate_first: true,
            auto_advance: true,
            hide_input: true,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}
