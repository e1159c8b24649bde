//! # Field Sequence Controller
//!
//! Drives an ordered sequence of text fields, such as the digit boxes of a
//! one-time-code screen.
//!
//! ## Overview
//!
//! The controller has three jobs:
//!
//! - open a keyboard matching the content type of every field that gains focus
//! - move focus forward when a single-character field fills up, backward when
//!   it is cleared, and close the keyboard after the last field
//! - keep the panel that contains the fields above the on-screen keyboard
//!
//! The first two are wired as listeners on the fields during
//! [`initialize`](FieldSequenceController::initialize). The third is a
//! repeating task started by [`enable`](FieldSequenceController::enable) and
//! stopped by [`disable`](FieldSequenceController::disable).
//!
//! ## Re-entrancy
//!
//! Hosts commonly fire the focus event from inside [`Field::activate`]. The
//! controller never holds its state lock across a call into the host, so such
//! nested events are handled in place.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::{
    config::FieldSequenceConfig,
    error::{Error, Result},
    field::{Field, FieldEvent, FieldListener},
    keyboard::{KeyboardHeight, KeyboardKind, KeyboardRequest, KeyboardSession, VirtualKeyboard},
    panel::{FollowPanel, displacement},
    scheduler::{Scheduler, TaskHandle},
    tree::{NodeId, UiTree, find_follow_panel},
};

/// Host capabilities the controller depends on.
#[derive(Clone)]
pub struct HostServices {
    /// The platform's on-screen keyboard.
    pub keyboard: Arc<dyn VirtualKeyboard>,
    /// Geometry query for the visible keyboard.
    pub keyboard_height: Arc<dyn KeyboardHeight>,
    /// The UI hierarchy the controller is attached to.
    pub tree: Arc<dyn UiTree>,
}

#[derive(Default)]
struct ControllerState {
    initialized: bool,
    keyboard: Option<Arc<dyn KeyboardSession>>,
    focused: Option<usize>,
    focused_y: f32,
    panel: Option<FollowPanel>,
    follow_task: Option<TaskHandle>,
}

struct Inner {
    node: NodeId,
    fields: Vec<Arc<dyn Field>>,
    services: HostServices,
    config: FieldSequenceConfig,
    state: Mutex<ControllerState>,
}

/// Coordinates focus and keyboard handling for an ordered sequence of fields.
///
/// Cloning yields another handle to the same controller.
#[derive(Clone)]
pub struct FieldSequenceController {
    inner: Arc<Inner>,
}

impl FieldSequenceController {
    /// Creates a controller attached to `node` for `fields`, in tab order.
    ///
    /// No listener is registered until [`initialize`](Self::initialize).
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySequence`] when `fields` is empty.
    pub fn new(
        node: NodeId,
        fields: Vec<Arc<dyn Field>>,
        services: HostServices,
        config: FieldSequenceConfig,
    ) -> Result<Self> {
        if fields.is_empty() {
            return Err(Error::EmptySequence);
        }
        Ok(Self {
            inner: Arc::new(Inner {
                node,
                fields,
                services,
                config,
                state: Mutex::new(ControllerState::default()),
            }),
        })
    }

    /// Discovers the follow panel and wires the field listeners.
    ///
    /// Every field gets a focus listener and a value listener. When
    /// [`auto_advance`](FieldSequenceConfig::auto_advance) is set, fields that
    /// accept more than one character also get an edit-ended listener. Finally
    /// the first field is focused if
    /// [`auto_activate_first`](FieldSequenceConfig::auto_activate_first) is set
    /// and no keyboard is showing.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyInitialized`] on a second call.
    /// - [`Error::NoRootCanvas`] or [`Error::PanelOutOfRange`] when the
    ///   controller node is not nested deep enough under a canvas.
    pub fn initialize(&self) -> Result<()> {
        let inner = &self.inner;
        if inner.state.lock().initialized {
            return Err(Error::AlreadyInitialized);
        }

        let tree = inner.services.tree.as_ref();
        let panel = FollowPanel::capture(tree, find_follow_panel(tree, inner.node)?);
        {
            let mut state = inner.state.lock();
            if state.initialized {
                return Err(Error::AlreadyInitialized);
            }
            state.initialized = true;
            state.panel = Some(panel);
        }

        if inner.config.hide_input {
            inner.services.keyboard.set_hide_input(true);
        }

        for (index, field) in inner.fields.iter().enumerate() {
            field.add_listener(
                FieldEvent::Selected,
                listener(inner, move |inner| inner.on_selected(index)),
            );
            field.add_listener(
                FieldEvent::ValueChanged,
                listener(inner, move |inner| inner.on_value_changed(index)),
            );
            if inner.config.auto_advance && !field.is_single_character() {
                field.add_listener(
                    FieldEvent::EditEnded,
                    listener(inner, move |inner| inner.advance_or_finish(index)),
                );
            }
        }

        info!(
            node = ?inner.node,
            panel = ?panel.node(),
            fields = inner.fields.len(),
            "field sequence initialized"
        );

        if inner.config.auto_activate_first && !inner.services.keyboard.is_visible() {
            inner.focus(0);
        }
        Ok(())
    }

    /// Starts the panel-follow loop on `scheduler`.
    ///
    /// Does nothing if the loop is already running.
    pub fn enable(&self, scheduler: &dyn Scheduler) {
        if self.is_enabled() {
            return;
        }
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let handle = scheduler.schedule_repeating(
            self.inner.config.poll_interval,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    inner.follow_keyboard();
                }
            }),
        );

        let previous = self.inner.state.lock().follow_task.replace(handle);
        if let Some(previous) = previous {
            previous.cancel();
        }
        debug!(node = ?self.inner.node, "panel-follow loop started");
    }

    /// Stops the panel-follow loop and puts the panel back where it was found.
    pub fn disable(&self) {
        let (task, panel) = {
            let mut state = self.inner.state.lock();
            (state.follow_task.take(), state.panel)
        };
        if let Some(task) = task {
            task.cancel();
        }
        if let Some(panel) = panel {
            panel.restore(self.inner.services.tree.as_ref());
        }
        debug!(node = ?self.inner.node, "panel-follow loop stopped");
    }

    /// Whether the panel-follow loop is running.
    pub fn is_enabled(&self) -> bool {
        self.inner
            .state
            .lock()
            .follow_task
            .as_ref()
            .is_some_and(|task| !task.is_cancelled())
    }

    /// Runs one step of the panel-follow loop.
    ///
    /// The scheduled task calls this every poll interval; hosts that drive
    /// the loop themselves may call it directly.
    pub fn follow_keyboard(&self) {
        self.inner.follow_keyboard();
    }

    /// Text of all fields joined in sequence order.
    pub fn concatenated_text(&self) -> String {
        self.inner.fields.iter().map(|field| field.text()).collect()
    }

    /// Focuses the first field without text and returns its index.
    pub fn activate_first_empty_field(&self) -> Option<usize> {
        let index = self.inner.fields.iter().position(|field| field.is_empty())?;
        self.inner.focus(index);
        Some(index)
    }

    /// Index of the field that last gained focus.
    pub fn focused_index(&self) -> Option<usize> {
        self.inner.state.lock().focused
    }

    /// The follow panel, once discovered by [`initialize`](Self::initialize).
    pub fn panel(&self) -> Option<FollowPanel> {
        self.inner.state.lock().panel
    }
}

fn listener(
    inner: &Arc<Inner>,
    handler: impl Fn(&Inner) + Send + Sync + 'static,
) -> FieldListener {
    let weak = Arc::downgrade(inner);
    Arc::new(move || {
        if let Some(inner) = weak.upgrade() {
            handler(&*inner);
        }
    })
}

impl Inner {
    fn focus(&self, index: usize) {
        debug!(index, "focusing field");
        self.fields[index].activate();
    }

    fn on_selected(&self, index: usize) {
        let field = &self.fields[index];
        let kind = KeyboardKind::for_content(field.content_type());
        debug!(index, ?kind, "opening keyboard");
        let session = self
            .services
            .keyboard
            .open(KeyboardRequest::new(field.text(), kind));
        let field_y = field.screen_y();

        let mut state = self.state.lock();
        state.keyboard = Some(session);
        state.focused = Some(index);
        state.focused_y = field_y;
    }

    fn on_value_changed(&self, index: usize) {
        let field = &self.fields[index];
        if !field.is_single_character() {
            return;
        }

        // Clearing and filling move focus in opposite directions.
        if field.is_empty() {
            if let Some(previous) = index.checked_sub(1) {
                self.focus(previous);
            }
        } else {
            self.advance_or_finish(index);
        }
    }

    fn advance_or_finish(&self, index: usize) {
        if index + 1 < self.fields.len() {
            self.focus(index + 1);
            return;
        }
        let keyboard = self.state.lock().keyboard.clone();
        if let Some(keyboard) = keyboard {
            debug!(index, "last field done, closing keyboard");
            keyboard.deactivate();
        }
    }

    fn follow_keyboard(&self) {
        let (focused, keyboard, focused_y, panel) = {
            let state = self.state.lock();
            (
                state.focused,
                state.keyboard.clone(),
                state.focused_y,
                state.panel,
            )
        };
        let Some(panel) = panel else {
            return;
        };
        let tree = self.services.tree.as_ref();

        let lost_focus = focused.is_some_and(|index| !self.fields[index].is_focused());
        if lost_focus {
            if let Some(keyboard) = keyboard {
                keyboard.deactivate();
            }
            panel.restore(tree);
            return;
        }

        if self.services.keyboard.is_visible() && panel.is_at_rest(tree) {
            let height = self.services.keyboard_height.keyboard_height();
            if let Some(displacement) = displacement(height, focused_y) {
                panel.raise(tree, displacement);
            }
        }
    }
}
