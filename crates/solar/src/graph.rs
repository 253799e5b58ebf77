use glam::Mat4;
use sketchbook_common::{Color, Transform};
use sketchbook_render::{MaterialKey, MeshKey};

/// Index of a node in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// What a node contributes besides its transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    /// Grouping or pivot node.
    Empty,
    Mesh { mesh: MeshKey, material: MaterialKey },
    Light { color: Color, intensity: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub transform: Transform,
    pub kind: NodeKind,
}

/// Arena of transform nodes.
///
/// # Invariants
/// - A parent is always added before its children, so a single pass in
///   index order composes world matrices.
/// - Nodes are never removed; a [`NodeId`] stays valid for the graph's life.
#[derive(Debug, Clone, Default)]
pub struct SceneGraph {
    nodes: Vec<Node>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node under `parent` (or at the root). Panics if `parent` is not
    /// a node of this graph.
    pub fn add_node(
        &mut self,
        parent: Option<NodeId>,
        name: impl Into<String>,
        transform: Transform,
        kind: NodeKind,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        if let Some(p) = parent {
            self.nodes[p.0].children.push(id);
        }
        self.nodes.push(Node {
            name: name.into(),
            parent,
            children: Vec::new(),
            transform,
            kind,
        });
        id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i), n))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// First node with the given name, in insertion order.
    pub fn find(&self, name: &str) -> Option<NodeId> {
        self.nodes.iter().position(|n| n.name == name).map(NodeId)
    }

    /// Spin a node about its local Y axis. Returns false for unknown ids.
    pub fn rotate_y(&mut self, id: NodeId, delta: f32) -> bool {
        match self.nodes.get_mut(id.0) {
            Some(node) => {
                node.transform.rotation.y += delta;
                true
            }
            None => false,
        }
    }

    /// World matrix of one node, walking up to the root.
    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        let mut matrix = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.nodes.get(c.0)) {
            matrix = node.transform.matrix() * matrix;
            current = node.parent;
        }
        matrix
    }

    /// World matrices of every node, indexed by [`NodeId`].
    pub fn world_matrices(&self) -> Vec<Mat4> {
        let mut out: Vec<Mat4> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let local = node.transform.matrix();
            let world = match node.parent {
                Some(p) => out[p.0] * local,
                None => local,
            };
            out.push(world);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn add_and_find() {
        let mut g = SceneGraph::new();
        assert!(g.is_empty());
        let root = g.add_node(None, "root", Transform::default(), NodeKind::Empty);
        let child = g.add_node(Some(root), "child", Transform::default(), NodeKind::Empty);
        assert_eq!(g.len(), 2);
        assert_eq!(g.children(root), &[child]);
        assert_eq!(g.find("child"), Some(child));
        assert_eq!(g.find("nope"), None);
        assert_eq!(g.node(child).and_then(|n| n.parent), Some(root));
    }

    #[test]
    fn parent_transform_applies_before_child() {
        let mut g = SceneGraph::new();
        let orbit = g.add_node(None, "orbit", Transform::default(), NodeKind::Empty);
        let planet = g.add_node(
            Some(orbit),
            "planet",
            Transform::from_position(Vec3::new(1.0, 0.0, 0.0)),
            NodeKind::Empty,
        );
        let moon = g.add_node(
            Some(planet),
            "moon",
            Transform::from_position(Vec3::new(0.0, 0.0, 0.5)),
            NodeKind::Empty,
        );

        g.rotate_y(orbit, FRAC_PI_2);
        let world = g.world_matrix(moon).transform_point3(Vec3::ZERO);
        // Orbit spin carries the whole subtree: (1, 0, 0.5) turns to (0.5, 0, -1).
        assert!(close(world, Vec3::new(0.5, 0.0, -1.0)), "{world:?}");
    }

    #[test]
    fn single_pass_matches_walk() {
        let mut g = SceneGraph::new();
        let a = g.add_node(
            None,
            "a",
            Transform::from_position(Vec3::new(2.0, 0.0, 0.0)).with_rotation(Vec3::new(0.0, 0.3, 0.0)),
            NodeKind::Empty,
        );
        let b = g.add_node(
            Some(a),
            "b",
            Transform::from_position(Vec3::new(0.0, 1.0, 3.0)).with_rotation(Vec3::new(0.2, 0.0, 0.1)),
            NodeKind::Empty,
        );
        g.add_node(
            Some(b),
            "c",
            Transform::from_position(Vec3::new(-1.0, 0.5, 0.0)),
            NodeKind::Empty,
        );
        let all = g.world_matrices();
        for (id, _) in g.nodes() {
            assert!(all[id.0].abs_diff_eq(g.world_matrix(id), 1e-5));
        }
    }

    #[test]
    fn rotate_unknown_node() {
        let mut g = SceneGraph::new();
        assert!(!g.rotate_y(NodeId(3), 1.0));
        assert!(g.children(NodeId(3)).is_empty());
    }
}
