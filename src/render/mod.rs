//! Engine-facing surface the editor drives: tracked GPU-style resources,
//! a scene graph with parent/child nodes, camera, picking, gizmo and
//! navigation controls.
//!
//! Geometry, material and texture allocations are accounted for explicitly
//! so that teardown behavior (full dispose on every rebuild) stays
//! observable in tests. Actual rasterization is a collaborator concern.

pub mod camera;
pub mod controls;
pub mod gizmo;
pub mod pick;

use crate::color::Rgb;
use crate::scene::{ObjectId, ShapeKind};
use glam::{Mat4, Quat, Vec3};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GeometryHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialHandle(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(u64);

/// Axis-aligned bounds in node-local space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Geometry {
    pub bounds: Aabb,
}

#[derive(Debug, Clone)]
pub struct Material {
    pub color: Rgb,
    pub texture: Option<TextureHandle>,
    pub double_sided: bool,
}

impl Material {
    pub fn flat(color: Rgb) -> Self {
        Self {
            color,
            texture: None,
            double_sided: false,
        }
    }
}

/// Light payload carried by a light node.
#[derive(Debug, Clone)]
pub struct Light {
    pub color: Rgb,
    pub intensity: f32,
    pub range: f32,
}

/// Allocation tables for engine resources. Disposal is conditional on
/// presence and idempotent; nothing here is fatal.
#[derive(Debug, Default)]
pub struct Resources {
    geometries: HashMap<u64, Geometry>,
    materials: HashMap<u64, Material>,
    textures: HashMap<u64, (u32, u32)>,
    next: u64,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next += 1;
        self.next
    }

    pub fn create_geometry(&mut self, geometry: Geometry) -> GeometryHandle {
        let id = self.next_id();
        self.geometries.insert(id, geometry);
        GeometryHandle(id)
    }

    pub fn geometry(&self, handle: GeometryHandle) -> Option<&Geometry> {
        self.geometries.get(&handle.0)
    }

    pub fn dispose_geometry(&mut self, handle: GeometryHandle) {
        self.geometries.remove(&handle.0);
    }

    pub fn create_material(&mut self, material: Material) -> MaterialHandle {
        let id = self.next_id();
        self.materials.insert(id, material);
        MaterialHandle(id)
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(&handle.0)
    }

    pub fn material_mut(&mut self, handle: MaterialHandle) -> Option<&mut Material> {
        self.materials.get_mut(&handle.0)
    }

    pub fn material_alive(&self, handle: MaterialHandle) -> bool {
        self.materials.contains_key(&handle.0)
    }

    /// Disposes the material and any texture it owns.
    pub fn dispose_material(&mut self, handle: MaterialHandle) {
        if let Some(material) = self.materials.remove(&handle.0) {
            if let Some(texture) = material.texture {
                self.dispose_texture(texture);
            }
        }
    }

    pub fn create_texture(&mut self, width: u32, height: u32) -> TextureHandle {
        let id = self.next_id();
        self.textures.insert(id, (width, height));
        TextureHandle(id)
    }

    pub fn dispose_texture(&mut self, handle: TextureHandle) {
        self.textures.remove(&handle.0);
    }

    pub fn alive_geometries(&self) -> usize {
        self.geometries.len()
    }

    pub fn alive_materials(&self) -> usize {
        self.materials.len()
    }

    pub fn alive_textures(&self) -> usize {
        self.textures.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u64);

/// Lightweight type marker stamped on live instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Shape(ShapeKind),
    PointLight,
    ImagePlane,
}

/// Back-reference from a live node to its record, plus the record color at
/// creation time for highlight restoration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceTag {
    pub object: ObjectId,
    pub kind: TagKind,
    pub original_color: Rgb,
}

#[derive(Debug, Clone)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub position: Vec3,
    pub rotation: Quat,
    /// Authored orientation (e.g. image planes lie face-up) composed under
    /// the record rotation.
    pub base_rotation: Quat,
    pub scale: Vec3,
    pub bounds: Aabb,
    pub geometry: Option<GeometryHandle>,
    pub material: Option<MaterialHandle>,
    pub light: Option<Light>,
    pub is_static: bool,
    pub visible: bool,
    pub tag: Option<InstanceTag>,
}

impl Default for Node {
    fn default() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            base_rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
            bounds: Aabb::from_center_size(Vec3::ZERO, Vec3::ZERO),
            geometry: None,
            material: None,
            light: None,
            is_static: false,
            visible: true,
            tag: None,
        }
    }
}

impl Node {
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation * self.base_rotation,
            self.position,
        )
    }
}

/// Node container with add/remove and depth-first traversal.
#[derive(Debug, Default)]
pub struct SceneGraph {
    nodes: HashMap<u64, Node>,
    roots: Vec<NodeId>,
    next: u64,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> NodeId {
        self.next += 1;
        NodeId(self.next)
    }

    pub fn insert(&mut self, node: Node) -> NodeId {
        let id = self.next_id();
        self.nodes.insert(id.0, node);
        self.roots.push(id);
        id
    }

    /// Inserts `node` as a child of `parent`. Falls back to a root node if
    /// the parent is gone.
    pub fn insert_child(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        if !self.contains(parent) {
            return self.insert(node);
        }
        let id = self.next_id();
        node.parent = Some(parent);
        self.nodes.insert(id.0, node);
        if let Some(parent_node) = self.nodes.get_mut(&parent.0) {
            parent_node.children.push(id);
        }
        id
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id.0)
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id.0)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id.0)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth-first list of `id` and everything below it.
    pub fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.get(current) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children.iter().copied());
        }
        out
    }

    pub fn world_matrix(&self, id: NodeId) -> Mat4 {
        match self.get(id) {
            Some(node) => match node.parent {
                Some(parent) => self.world_matrix(parent) * node.local_matrix(),
                None => node.local_matrix(),
            },
            None => Mat4::IDENTITY,
        }
    }

    /// Releases every geometry/material/texture owned by `id` and its
    /// descendants. Nodes without resources are tolerated.
    pub fn dispose_subtree(&mut self, id: NodeId, resources: &mut Resources) {
        for member in self.subtree(id) {
            let Some(node) = self.get(member) else {
                continue;
            };
            if let Some(geometry) = node.geometry {
                resources.dispose_geometry(geometry);
            }
            if let Some(material) = node.material {
                resources.dispose_material(material);
            }
        }
    }

    /// Removes `id` and its descendants from the graph. Resource disposal
    /// is separate and must come first.
    pub fn remove_subtree(&mut self, id: NodeId) {
        if let Some(parent) = self.parent(id) {
            if let Some(parent_node) = self.nodes.get_mut(&parent.0) {
                parent_node.children.retain(|child| *child != id);
            }
        }
        self.roots.retain(|root| *root != id);
        for member in self.subtree(id) {
            self.nodes.remove(&member.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispose_is_conditional_and_idempotent() {
        let mut resources = Resources::new();
        let geometry = resources.create_geometry(Geometry {
            bounds: Aabb::from_center_size(Vec3::ZERO, Vec3::ONE),
        });
        resources.dispose_geometry(geometry);
        resources.dispose_geometry(geometry);
        assert_eq!(resources.alive_geometries(), 0);
    }

    #[test]
    fn material_disposal_releases_its_texture() {
        let mut resources = Resources::new();
        let texture = resources.create_texture(2, 2);
        let mut material = Material::flat(0xffffff);
        material.texture = Some(texture);
        let handle = resources.create_material(material);

        resources.dispose_material(handle);
        assert_eq!(resources.alive_materials(), 0);
        assert_eq!(resources.alive_textures(), 0);
    }

    #[test]
    fn subtree_covers_children() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(Node::default());
        let child = graph.insert_child(root, Node::default());
        let grandchild = graph.insert_child(child, Node::default());

        let members = graph.subtree(root);
        assert_eq!(members.len(), 3);
        assert!(members.contains(&grandchild));
    }

    #[test]
    fn remove_subtree_detaches_from_parent() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(Node::default());
        let child = graph.insert_child(root, Node::default());
        graph.remove_subtree(child);
        assert!(!graph.contains(child));
        assert!(graph.get(root).unwrap().children.is_empty());
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn dispose_subtree_releases_child_resources() {
        let mut graph = SceneGraph::new();
        let mut resources = Resources::new();
        let root_geometry = resources.create_geometry(Geometry {
            bounds: Aabb::from_center_size(Vec3::ZERO, Vec3::ONE),
        });
        let root_material = resources.create_material(Material::flat(0xff0000));
        let child_geometry = resources.create_geometry(Geometry {
            bounds: Aabb::from_center_size(Vec3::ZERO, Vec3::ONE),
        });
        let child_material = resources.create_material(Material::flat(0x00ff00));

        let root = graph.insert(Node {
            geometry: Some(root_geometry),
            material: Some(root_material),
            ..Node::default()
        });
        graph.insert_child(
            root,
            Node {
                geometry: Some(child_geometry),
                material: Some(child_material),
                ..Node::default()
            },
        );

        graph.dispose_subtree(root, &mut resources);
        graph.remove_subtree(root);
        assert_eq!(resources.alive_geometries(), 0);
        assert_eq!(resources.alive_materials(), 0);
        assert_eq!(graph.node_count(), 0);
    }

    #[test]
    fn world_matrix_composes_parent_chain() {
        let mut graph = SceneGraph::new();
        let root = graph.insert(Node {
            position: Vec3::new(1.0, 0.0, 0.0),
            ..Node::default()
        });
        let child = graph.insert_child(
            root,
            Node {
                position: Vec3::new(0.0, 2.0, 0.0),
                ..Node::default()
            },
        );
        let world = graph.world_matrix(child);
        let origin = world.transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(1.0, 2.0, 0.0)).length() < 1e-6);
    }
}
