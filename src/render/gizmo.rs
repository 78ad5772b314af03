//! Transform-gizmo binding state machine.
//!
//! The widget itself (handles, drag math) belongs to the rendering engine;
//! this tracks what the gizmo is attached to and whether a drag is in
//! flight, which is all the editor core needs.

use crate::render::{NodeId, SceneGraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GizmoMode {
    #[default]
    Translate,
    Rotate,
    Scale,
}

#[derive(Debug, Default)]
pub struct Gizmo {
    attached: Option<NodeId>,
    dragging: bool,
    pub mode: GizmoMode,
}

impl Gizmo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the gizmo to `node`. Attaching to a node that is not in the
    /// graph detaches instead.
    pub fn attach(&mut self, graph: &SceneGraph, node: NodeId) {
        if graph.contains(node) {
            self.attached = Some(node);
        } else {
            self.attached = None;
        }
        self.dragging = false;
    }

    pub fn detach(&mut self) {
        self.attached = None;
        self.dragging = false;
    }

    pub fn attached(&self) -> Option<NodeId> {
        self.attached
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging && self.attached.is_some();
    }

    /// Per-frame sync: drops a binding whose node has been removed.
    pub fn update(&mut self, graph: &SceneGraph) {
        if let Some(node) = self.attached {
            if !graph.contains(node) {
                self.detach();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::Node;

    #[test]
    fn attach_to_missing_node_detaches() {
        let mut graph = SceneGraph::new();
        let node = graph.insert(Node::default());
        graph.remove_subtree(node);

        let mut gizmo = Gizmo::new();
        gizmo.attach(&graph, node);
        assert!(gizmo.attached().is_none());
    }

    #[test]
    fn update_drops_stale_binding() {
        let mut graph = SceneGraph::new();
        let node = graph.insert(Node::default());
        let mut gizmo = Gizmo::new();
        gizmo.attach(&graph, node);
        gizmo.set_dragging(true);
        assert!(gizmo.is_dragging());

        graph.remove_subtree(node);
        gizmo.update(&graph);
        assert!(gizmo.attached().is_none());
        assert!(!gizmo.is_dragging());
    }

    #[test]
    fn dragging_requires_attachment() {
        let mut gizmo = Gizmo::new();
        gizmo.set_dragging(true);
        assert!(!gizmo.is_dragging());
    }
}
