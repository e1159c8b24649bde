//! UI hierarchy access and follow panel discovery.
//!
//! ## Usage
//!
//! Implement [`UiTree`] over the host's node hierarchy. The controller uses it
//! once at initialization to find the panel it keeps above the keyboard, then
//! to read and write that panel's position.

use glam::Vec3;

use crate::error::{Error, Result};

/// Opaque identifier of a node in the host's UI hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// Read and write access to the host's UI hierarchy.
pub trait UiTree: Send + Sync {
    /// Parent of `node`, or `None` at the top of the hierarchy.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// Root canvas that `node` is drawn under.
    fn root_canvas(&self, node: NodeId) -> Option<NodeId>;

    /// World position of `node`.
    fn position(&self, node: NodeId) -> Vec3;

    /// Moves `node` to the world position `position`.
    fn set_position(&self, node: NodeId, position: Vec3);
}

/// Collects `node` and its ancestors up to, but excluding, the root canvas.
///
/// The walk also stops at a node without a parent, so a detached subtree
/// yields its full chain.
pub fn ancestors_below_canvas(tree: &dyn UiTree, node: NodeId) -> Result<Vec<NodeId>> {
    let canvas = tree.root_canvas(node).ok_or(Error::NoRootCanvas { node })?;
    let mut chain = Vec::new();
    let mut current = Some(node);
    while let Some(id) = current {
        if id == canvas {
            break;
        }
        chain.push(id);
        current = tree.parent(id);
    }
    Ok(chain)
}

/// Finds the panel that follows the keyboard for a controller attached to
/// `node`.
///
/// The panel is the second-to-last entry of [`ancestors_below_canvas`]: the
/// child of the top-level container that sits directly under the canvas (a
/// safe-area node in typical layouts). A controller placed directly under the
/// canvas has a chain of one entry and gets [`Error::PanelOutOfRange`].
pub fn find_follow_panel(tree: &dyn UiTree, node: NodeId) -> Result<NodeId> {
    let chain = ancestors_below_canvas(tree, node)?;
    let depth = chain.len();
    depth
        .checked_sub(2)
        .and_then(|index| chain.get(index).copied())
        .ok_or(Error::PanelOutOfRange { depth })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::TestTree;

    #[test]
    fn chain_stops_below_canvas() {
        let tree = TestTree::new();
        let canvas = tree.add_root();
        let safe_area = tree.add_child(canvas);
        let panel = tree.add_child(safe_area);
        let leaf = tree.add_child(panel);

        let chain = ancestors_below_canvas(&tree, leaf).unwrap();
        assert_eq!(chain, vec![leaf, panel, safe_area]);
    }

    #[test]
    fn panel_is_second_to_last() {
        let tree = TestTree::new();
        let canvas = tree.add_root();
        let safe_area = tree.add_child(canvas);
        let panel = tree.add_child(safe_area);
        let row = tree.add_child(panel);
        let controller = tree.add_child(row);

        assert_eq!(find_follow_panel(&tree, controller), Ok(panel));
    }

    #[test]
    fn node_two_levels_down_is_its_own_panel() {
        let tree = TestTree::new();
        let canvas = tree.add_root();
        let safe_area = tree.add_child(canvas);
        let controller = tree.add_child(safe_area);

        assert_eq!(find_follow_panel(&tree, controller), Ok(controller));
    }

    #[test]
    fn node_under_canvas_is_out_of_range() {
        let tree = TestTree::new();
        let canvas = tree.add_root();
        let controller = tree.add_child(canvas);

        assert_eq!(
            find_follow_panel(&tree, controller),
            Err(Error::PanelOutOfRange { depth: 1 })
        );
    }

    #[test]
    fn missing_canvas_is_reported() {
        let tree = TestTree::new();
        let orphan = NodeId(99);

        assert_eq!(
            find_follow_panel(&tree, orphan),
            Err(Error::NoRootCanvas { node: orphan })
        );
    }
}
