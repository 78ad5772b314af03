//! Ray intersection against live scene-graph nodes.
//!
//! Bounds are stored per node in local space; the ray is transformed by the
//! inverse world matrix so rotated and scaled nodes intersect correctly.
//! Because the local-space direction is left unnormalized, the returned
//! parameter stays comparable across nodes as a world-space distance.

use crate::render::{NodeId, SceneGraph};
use glam::{Mat4, Vec3};

#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction in world space.
    pub dir: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub node: NodeId,
    pub distance: f32,
}

/// Intersects `ray` against `roots` and all their descendants, nearest
/// first. Invisible nodes and nodes without geometry are skipped.
pub fn raycast(graph: &SceneGraph, roots: &[NodeId], ray: Ray) -> Vec<Hit> {
    let mut hits = Vec::new();
    for &root in roots {
        for id in graph.subtree(root) {
            let Some(node) = graph.get(id) else {
                continue;
            };
            if !node.visible || node.geometry.is_none() {
                continue;
            }
            let world = graph.world_matrix(id);
            if let Some(distance) = intersect_bounds(&world, node.bounds.min, node.bounds.max, ray)
            {
                hits.push(Hit { node: id, distance });
            }
        }
    }
    hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    hits
}

/// Slab test against an oriented box given by local-space bounds and a
/// world transform. Returns the world-space distance to the entry point, or
/// to the exit point when the ray starts inside.
fn intersect_bounds(world: &Mat4, min: Vec3, max: Vec3, ray: Ray) -> Option<f32> {
    // A collapsed transform (zero scale on some axis) has no inverse; the
    // NaNs it produces would otherwise satisfy the slab test everywhere.
    let det = world.determinant();
    if det == 0.0 || !det.is_finite() {
        return None;
    }
    let inverse = world.inverse();
    let origin = inverse.transform_point3(ray.origin);
    // Unnormalized on purpose; see module docs.
    let dir = inverse.transform_vector3(ray.dir);

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    for axis in 0..3 {
        let o = origin[axis];
        let d = dir[axis];
        if d.abs() < 1e-9 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let t0 = (min[axis] - o) / d;
        let t1 = (max[axis] - o) / d;
        let (near, far) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
        t_enter = t_enter.max(near);
        t_exit = t_exit.min(far);
        if t_enter > t_exit {
            return None;
        }
    }
    if t_exit < 0.0 {
        return None;
    }
    Some(if t_enter >= 0.0 { t_enter } else { t_exit })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{Aabb, Geometry, Node, Resources, SceneGraph};
    use glam::Quat;

    fn unit_box_node(resources: &mut Resources, position: Vec3) -> Node {
        let bounds = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        Node {
            position,
            bounds,
            geometry: Some(resources.create_geometry(Geometry { bounds })),
            ..Node::default()
        }
    }

    fn x_ray() -> Ray {
        Ray {
            origin: Vec3::new(-10.0, 0.0, 0.0),
            dir: Vec3::X,
        }
    }

    #[test]
    fn nearest_hit_comes_first() {
        let mut graph = SceneGraph::new();
        let mut resources = Resources::new();
        let near = graph.insert(unit_box_node(&mut resources, Vec3::new(-2.0, 0.0, 0.0)));
        let far = graph.insert(unit_box_node(&mut resources, Vec3::new(5.0, 0.0, 0.0)));

        let hits = raycast(&graph, &[far, near], x_ray());
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].node, near);
        assert!(hits[0].distance < hits[1].distance);
    }

    #[test]
    fn miss_returns_empty() {
        let mut graph = SceneGraph::new();
        let mut resources = Resources::new();
        let node = graph.insert(unit_box_node(&mut resources, Vec3::new(0.0, 30.0, 0.0)));
        assert!(raycast(&graph, &[node], x_ray()).is_empty());
    }

    #[test]
    fn descendants_are_pickable() {
        let mut graph = SceneGraph::new();
        let mut resources = Resources::new();
        // Parent without geometry (a light), child helper mesh at the
        // parent's position.
        let parent = graph.insert(Node {
            position: Vec3::new(0.0, 0.0, 0.0),
            ..Node::default()
        });
        let helper = graph.insert_child(parent, unit_box_node(&mut resources, Vec3::ZERO));

        let hits = raycast(&graph, &[parent], x_ray());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].node, helper);
    }

    #[test]
    fn scaled_node_grows_its_silhouette() {
        let mut graph = SceneGraph::new();
        let mut resources = Resources::new();
        let mut node = unit_box_node(&mut resources, Vec3::ZERO);
        node.scale = Vec3::splat(4.0);
        let id = graph.insert(node);

        // Would miss a unit box, hits the scaled one.
        let ray = Ray {
            origin: Vec3::new(-10.0, 3.0, 0.0),
            dir: Vec3::X,
        };
        assert_eq!(raycast(&graph, &[id], ray).len(), 1);
    }

    #[test]
    fn rotated_node_uses_oriented_bounds() {
        let mut graph = SceneGraph::new();
        let mut resources = Resources::new();
        // Thin slab, long side along x. A 90 degree yaw swings the long
        // side into z, so a z-axis ray offset to x=3 stops hitting.
        let bounds = Aabb::from_center_size(Vec3::ZERO, Vec3::new(8.0, 1.0, 0.2));
        let plain = graph.insert(Node {
            bounds,
            geometry: Some(resources.create_geometry(Geometry { bounds })),
            ..Node::default()
        });
        let rotated = graph.insert(Node {
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            bounds,
            geometry: Some(resources.create_geometry(Geometry { bounds })),
            ..Node::default()
        });

        let offset_z_ray = Ray {
            origin: Vec3::new(3.0, 0.0, -10.0),
            dir: Vec3::Z,
        };
        assert_eq!(raycast(&graph, &[plain], offset_z_ray).len(), 1);
        assert!(raycast(&graph, &[rotated], offset_z_ray).is_empty());
    }

    #[test]
    fn zero_scaled_node_is_never_hit() {
        let mut graph = SceneGraph::new();
        let mut resources = Resources::new();
        let mut node = unit_box_node(&mut resources, Vec3::ZERO);
        node.scale = Vec3::new(1.0, 0.0, 1.0);
        let id = graph.insert(node);

        let far_away = Ray {
            origin: Vec3::new(-10.0, 30.0, 0.0),
            dir: Vec3::X,
        };
        assert!(raycast(&graph, &[id], far_away).is_empty());
        assert!(raycast(&graph, &[id], x_ray()).is_empty());
    }

    #[test]
    fn ray_starting_inside_still_hits() {
        let mut graph = SceneGraph::new();
        let mut resources = Resources::new();
        let id = graph.insert(unit_box_node(&mut resources, Vec3::ZERO));
        let ray = Ray {
            origin: Vec3::ZERO,
            dir: Vec3::X,
        };
        let hits = raycast(&graph, &[id], ray);
        assert_eq!(hits.len(), 1);
        assert!(hits[0].distance > 0.0);
    }
}
