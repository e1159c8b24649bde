//! In-memory host implementations for tests and demos.
//!
//! ## Usage
//!
//! Enable the `testing` feature and build a [`TestHost`]; it provides a
//! keyboard, a UI tree with a canvas, a safe area and a panel, and fields that
//! share one focus scope.
//!
//! ```rust,ignore
//! use codefield::{Field, FieldSequenceConfig, FieldSequenceController};
//! use codefield::testing::{TestHost, as_fields};
//!
//! let host = TestHost::new();
//! let digits = host.digits(4);
//! let controller = FieldSequenceController::new(
//!     host.node,
//!     as_fields(&digits),
//!     host.services(),
//!     FieldSequenceConfig::default(),
//! )
//! .unwrap();
//! controller.initialize().unwrap();
//!
//! digits[0].type_text("4");
//! assert!(digits[1].is_focused());
//! ```
//!
//! Fields fire their listeners synchronously from [`TestField::activate`] and
//! the editing helpers, the way most retained-mode toolkits do.

use std::{
    collections::HashMap,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
};

use glam::Vec3;
use parking_lot::{Mutex, RwLock};

use crate::{
    controller::HostServices,
    field::{ContentType, Field, FieldEvent, FieldListener},
    keyboard::{KeyboardHeight, KeyboardRequest, KeyboardSession, VirtualKeyboard},
    tree::{NodeId, UiTree},
};

/// Focus shared by a group of [`TestField`]s; at most one member holds it.
#[derive(Clone, Default)]
pub struct FocusScope {
    focused: Arc<RwLock<Option<u64>>>,
    next_id: Arc<AtomicU64>,
}

impl FocusScope {
    /// Creates a scope where nothing is focused.
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn is_focused(&self, id: u64) -> bool {
        *self.focused.read() == Some(id)
    }

    fn request_focus(&self, id: u64) {
        *self.focused.write() = Some(id);
    }

    fn unfocus(&self, id: u64) {
        let mut focused = self.focused.write();
        if *focused == Some(id) {
            *focused = None;
        }
    }
}

/// A text field living in memory.
pub struct TestField {
    id: u64,
    scope: FocusScope,
    character_limit: usize,
    content_type: ContentType,
    text: RwLock<String>,
    screen_y: RwLock<f32>,
    listeners: Mutex<Vec<(FieldEvent, FieldListener)>>,
}

impl TestField {
    /// Creates an empty field in `scope`.
    pub fn new(scope: &FocusScope, character_limit: usize, content_type: ContentType) -> Self {
        Self {
            id: scope.allocate(),
            scope: scope.clone(),
            character_limit,
            content_type,
            text: RwLock::new(String::new()),
            screen_y: RwLock::new(0.0),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// Replaces the text and fires [`FieldEvent::ValueChanged`].
    pub fn type_text(&self, text: &str) {
        self.set_text_silently(text);
        self.fire(FieldEvent::ValueChanged);
    }

    /// Empties the field and fires [`FieldEvent::ValueChanged`].
    pub fn clear(&self) {
        self.type_text("");
    }

    /// Replaces the text without notifying listeners.
    pub fn set_text_silently(&self, text: &str) {
        *self.text.write() = text.to_string();
    }

    /// Fires [`FieldEvent::EditEnded`].
    pub fn end_edit(&self) {
        self.fire(FieldEvent::EditEnded);
    }

    /// Drops focus without notifying listeners, as a tap outside the field
    /// would.
    pub fn blur(&self) {
        self.scope.unfocus(self.id);
    }

    /// Moves the field to `y` on screen.
    pub fn set_screen_y(&self, y: f32) {
        *self.screen_y.write() = y;
    }

    /// Number of registered listeners across all events.
    pub fn listener_count(&self) -> usize {
        self.listeners.lock().len()
    }

    fn fire(&self, event: FieldEvent) {
        let listeners: Vec<FieldListener> = self
            .listeners
            .lock()
            .iter()
            .filter(|(kind, _)| *kind == event)
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener();
        }
    }
}

impl Field for TestField {
    fn text(&self) -> String {
        self.text.read().clone()
    }

    fn character_limit(&self) -> usize {
        self.character_limit
    }

    fn content_type(&self) -> ContentType {
        self.content_type
    }

    fn is_focused(&self) -> bool {
        self.scope.is_focused(self.id)
    }

    fn screen_y(&self) -> f32 {
        *self.screen_y.read()
    }

    fn activate(&self) {
        self.scope.request_focus(self.id);
        self.fire(FieldEvent::Selected);
    }

    fn add_listener(&self, event: FieldEvent, listener: FieldListener) {
        self.listeners.lock().push((event, listener));
    }
}

/// Upcasts test fields for [`FieldSequenceController::new`](crate::FieldSequenceController::new).
pub fn as_fields(fields: &[Arc<TestField>]) -> Vec<Arc<dyn Field>> {
    fields
        .iter()
        .map(|field| field.clone() as Arc<dyn Field>)
        .collect()
}

/// Keyboard session handed out by [`TestKeyboard`].
#[derive(Debug, Default)]
pub struct TestSession {
    active: AtomicBool,
}

impl KeyboardSession for TestSession {
    fn deactivate(&self) {
        self.active.store(false, Ordering::Release);
    }

    fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

#[derive(Default)]
struct KeyboardState {
    requests: Vec<KeyboardRequest>,
    current: Option<Arc<TestSession>>,
    forced_visible: bool,
    hide_input: bool,
    height: f32,
}

/// Virtual keyboard that records every request.
///
/// Also reports its own height, so one instance can serve as both
/// [`VirtualKeyboard`] and [`KeyboardHeight`].
#[derive(Default)]
pub struct TestKeyboard {
    state: Mutex<KeyboardState>,
}

impl TestKeyboard {
    /// Creates a hidden keyboard with zero height.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces the keyboard to report as visible regardless of sessions.
    pub fn set_visible(&self, visible: bool) {
        self.state.lock().forced_visible = visible;
    }

    /// Sets the reported keyboard height.
    pub fn set_height(&self, height: f32) {
        self.state.lock().height = height;
    }

    /// Whether the native input line was hidden.
    pub fn hides_input(&self) -> bool {
        self.state.lock().hide_input
    }

    /// Number of sessions opened so far.
    pub fn open_count(&self) -> usize {
        self.state.lock().requests.len()
    }

    /// The most recent open request.
    pub fn last_request(&self) -> Option<KeyboardRequest> {
        self.state.lock().requests.last().cloned()
    }

    /// The most recently opened session.
    pub fn current_session(&self) -> Option<Arc<TestSession>> {
        self.state.lock().current.clone()
    }
}

impl VirtualKeyboard for TestKeyboard {
    fn open(&self, request: KeyboardRequest) -> Arc<dyn KeyboardSession> {
        let session = Arc::new(TestSession {
            active: AtomicBool::new(true),
        });
        let mut state = self.state.lock();
        if let Some(previous) = state.current.replace(session.clone()) {
            previous.deactivate();
        }
        state.requests.push(request);
        session
    }

    fn is_visible(&self) -> bool {
        let state = self.state.lock();
        state.forced_visible
            || state
                .current
                .as_ref()
                .is_some_and(|session| session.is_active())
    }

    fn set_hide_input(&self, hide: bool) {
        self.state.lock().hide_input = hide;
    }
}

impl KeyboardHeight for TestKeyboard {
    fn keyboard_height(&self) -> f32 {
        self.state.lock().height
    }
}

struct TestNode {
    parent: Option<NodeId>,
    canvas: bool,
    position: Vec3,
}

/// UI hierarchy held in a map.
#[derive(Default)]
pub struct TestTree {
    nodes: RwLock<HashMap<NodeId, TestNode>>,
    next_id: AtomicU64,
}

impl TestTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a root canvas.
    pub fn add_root(&self) -> NodeId {
        self.insert(None, true)
    }

    /// Adds a node under `parent`.
    pub fn add_child(&self, parent: NodeId) -> NodeId {
        self.insert(Some(parent), false)
    }

    fn insert(&self, parent: Option<NodeId>, canvas: bool) -> NodeId {
        let id = NodeId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.nodes.write().insert(
            id,
            TestNode {
                parent,
                canvas,
                position: Vec3::ZERO,
            },
        );
        id
    }
}

impl UiTree for TestTree {
    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.read().get(&node).and_then(|node| node.parent)
    }

    fn root_canvas(&self, node: NodeId) -> Option<NodeId> {
        let nodes = self.nodes.read();
        let mut current = nodes.get(&node)?;
        let mut id = node;
        let mut canvas = None;
        loop {
            if current.canvas {
                canvas = Some(id);
            }
            let Some(parent) = current.parent else {
                return canvas;
            };
            id = parent;
            current = nodes.get(&parent)?;
        }
    }

    fn position(&self, node: NodeId) -> Vec3 {
        self.nodes
            .read()
            .get(&node)
            .map_or(Vec3::ZERO, |node| node.position)
    }

    fn set_position(&self, node: NodeId, position: Vec3) {
        if let Some(node) = self.nodes.write().get_mut(&node) {
            node.position = position;
        }
    }
}

/// A complete in-memory host: `canvas > safe_area > panel > node`.
pub struct TestHost {
    /// Focus shared by fields created through this host.
    pub focus: FocusScope,
    /// Keyboard and keyboard height service.
    pub keyboard: Arc<TestKeyboard>,
    /// UI hierarchy.
    pub tree: Arc<TestTree>,
    /// Root canvas.
    pub canvas: NodeId,
    /// Container directly under the canvas.
    pub safe_area: NodeId,
    /// Panel the controller should discover.
    pub panel: NodeId,
    /// Node the controller is attached to.
    pub node: NodeId,
}

impl Default for TestHost {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHost {
    /// Builds the host hierarchy with every position at the origin.
    pub fn new() -> Self {
        let tree = Arc::new(TestTree::new());
        let canvas = tree.add_root();
        let safe_area = tree.add_child(canvas);
        let panel = tree.add_child(safe_area);
        let node = tree.add_child(panel);
        Self {
            focus: FocusScope::new(),
            keyboard: Arc::new(TestKeyboard::new()),
            tree,
            canvas,
            safe_area,
            panel,
            node,
        }
    }

    /// Services backed by this host.
    pub fn services(&self) -> HostServices {
        HostServices {
            keyboard: self.keyboard.clone(),
            keyboard_height: self.keyboard.clone(),
            tree: self.tree.clone(),
        }
    }

    /// Creates a field in this host's focus scope.
    pub fn field(&self, character_limit: usize, content_type: ContentType) -> Arc<TestField> {
        Arc::new(TestField::new(&self.focus, character_limit, content_type))
    }

    /// Creates `count` single-digit PIN boxes.
    pub fn digits(&self, count: usize) -> Vec<Arc<TestField>> {
        (0..count)
            .map(|_| self.field(1, ContentType::Pin))
            .collect()
    }
}
