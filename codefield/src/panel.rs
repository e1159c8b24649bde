//! Panel that is raised above the virtual keyboard.

use glam::Vec3;
use tracing::debug;

use crate::tree::{NodeId, UiTree};

/// A UI container whose position is shifted to keep the focused field
/// visible while the keyboard is up.
///
/// The original position is captured once, when the panel is discovered, and
/// every later write is relative to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FollowPanel {
    node: NodeId,
    original: Vec3,
}

impl FollowPanel {
    /// Captures the current position of `node` as its resting position.
    pub fn capture(tree: &dyn UiTree, node: NodeId) -> Self {
        Self {
            node,
            original: tree.position(node),
        }
    }

    /// Node of the panel in the UI hierarchy.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Resting position captured at discovery.
    pub fn original_position(&self) -> Vec3 {
        self.original
    }

    /// Whether the panel currently sits at its resting position.
    pub fn is_at_rest(&self, tree: &dyn UiTree) -> bool {
        tree.position(self.node) == self.original
    }

    /// Moves the panel up by `displacement` from its resting position.
    pub fn raise(&self, tree: &dyn UiTree, displacement: f32) {
        debug!(node = ?self.node, displacement, "raising follow panel");
        tree.set_position(self.node, self.original + Vec3::Y * displacement);
    }

    /// Puts the panel back at its resting position.
    pub fn restore(&self, tree: &dyn UiTree) {
        tree.set_position(self.node, self.original);
    }
}

/// Distance the panel must move for a field at `field_y` to clear a keyboard
/// of `keyboard_height`, or `None` when the field is already above it.
pub fn displacement(keyboard_height: f32, field_y: f32) -> Option<f32> {
    let displacement = keyboard_height - field_y;
    (displacement >= 0.0).then_some(displacement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestTree;

    #[test]
    fn displacement_is_height_minus_field_position() {
        assert_eq!(displacement(300.0, 120.0), Some(180.0));
        assert_eq!(displacement(300.0, 300.0), Some(0.0));
        assert_eq!(displacement(100.0, 250.0), None);
        assert_eq!(displacement(0.0, 10.0), None);
    }

    #[test]
    fn raise_and_restore_are_relative_to_capture() {
        let tree = TestTree::new();
        let canvas = tree.add_root();
        let node = tree.add_child(canvas);
        tree.set_position(node, Vec3::new(5.0, 40.0, 1.0));

        let panel = FollowPanel::capture(&tree, node);
        assert!(panel.is_at_rest(&tree));

        panel.raise(&tree, 60.0);
        assert_eq!(tree.position(node), Vec3::new(5.0, 100.0, 1.0));
        assert!(!panel.is_at_rest(&tree));

        panel.raise(&tree, 10.0);
        assert_eq!(tree.position(node), Vec3::new(5.0, 50.0, 1.0));

        panel.restore(&tree);
        assert_eq!(tree.position(node), panel.original_position());
    }
}
