//! Object Factory: builds one live node (plus children) from one record.
//!
//! Geometry parameters are fixed per kind; only `color`, `intensity` and
//! `aspect_ratio` flow in from the record. Transforms are applied by the
//! reconciliation pass, not here.

use crate::assets::TextureQueue;
use crate::color;
use crate::render::{
    Aabb, Geometry, InstanceTag, Light, Material, Node, NodeId, Resources, SceneGraph, TagKind,
};
use crate::scene::{ObjectKind, SceneObject, ShapeKind};
use glam::{Quat, Vec3};

pub const BOX_SIZE: f32 = 2.0;
pub const SPHERE_RADIUS: f32 = 1.5;
pub const CYLINDER_RADIUS: f32 = 1.0;
pub const CYLINDER_HEIGHT: f32 = 3.0;
pub const CONE_RADIUS: f32 = 1.5;
pub const CONE_HEIGHT: f32 = 3.0;
pub const TORUS_RADIUS: f32 = 2.0;
pub const TORUS_TUBE: f32 = 0.5;
pub const PLANE_WIDTH: f32 = 10.0;
pub const LIGHT_RANGE: f32 = 100.0;
pub const LIGHT_HELPER_SIZE: f32 = 1.0;

/// Default resting height substituted when a new object's Y input is left
/// at zero, so spawns do not intersect the ground plane.
pub fn resting_height(kind: &ObjectKind) -> f32 {
    match kind {
        ObjectKind::Shape(ShapeKind::Box) => BOX_SIZE / 2.0,
        ObjectKind::Shape(ShapeKind::Cylinder) => CYLINDER_HEIGHT / 2.0,
        ObjectKind::Shape(ShapeKind::Cone) => CONE_HEIGHT / 2.0,
        ObjectKind::Shape(ShapeKind::Sphere) => SPHERE_RADIUS,
        ObjectKind::Shape(ShapeKind::Torus) => TORUS_RADIUS,
        ObjectKind::ImagePlane { .. } => 0.05,
        ObjectKind::PointLight { .. } => 5.0,
    }
}

fn shape_bounds(kind: ShapeKind) -> Aabb {
    let size = match kind {
        ShapeKind::Box => Vec3::splat(BOX_SIZE),
        ShapeKind::Sphere => Vec3::splat(SPHERE_RADIUS * 2.0),
        ShapeKind::Cylinder => Vec3::new(
            CYLINDER_RADIUS * 2.0,
            CYLINDER_HEIGHT,
            CYLINDER_RADIUS * 2.0,
        ),
        ShapeKind::Cone => Vec3::new(CONE_RADIUS * 2.0, CONE_HEIGHT, CONE_RADIUS * 2.0),
        // Torus lies in its local XY plane, tube around Z.
        ShapeKind::Torus => Vec3::new(
            (TORUS_RADIUS + TORUS_TUBE) * 2.0,
            (TORUS_RADIUS + TORUS_TUBE) * 2.0,
            TORUS_TUBE * 2.0,
        ),
    };
    Aabb::from_center_size(Vec3::ZERO, size)
}

/// Creates the live instance for `object` and inserts it into the graph.
///
/// Image-plane pixels arrive through the texture queue later; the material
/// starts untextured and white. Point lights get a small helper child for
/// pickability which carries no instance tag of its own.
pub fn spawn_object(
    object: &SceneObject,
    graph: &mut SceneGraph,
    resources: &mut Resources,
    textures: &mut TextureQueue,
) -> NodeId {
    match &object.kind {
        ObjectKind::Shape(shape) => {
            let bounds = shape_bounds(*shape);
            let node = Node {
                bounds,
                geometry: Some(resources.create_geometry(Geometry { bounds })),
                material: Some(resources.create_material(Material::flat(object.color))),
                tag: Some(InstanceTag {
                    object: object.id,
                    kind: TagKind::Shape(*shape),
                    original_color: object.color,
                }),
                ..Node::default()
            };
            graph.insert(node)
        }
        ObjectKind::ImagePlane {
            image,
            aspect_ratio,
        } => {
            let ratio = if aspect_ratio.is_finite() && *aspect_ratio > 0.0 {
                *aspect_ratio
            } else {
                log::warn!("image plane has invalid aspect ratio, assuming square");
                1.0
            };
            let height = PLANE_WIDTH / ratio;
            let bounds =
                Aabb::from_center_size(Vec3::ZERO, Vec3::new(PLANE_WIDTH, height, 0.02));
            let material = Material {
                color: color::WHITE,
                texture: None,
                double_sided: true,
            };
            let material = resources.create_material(material);
            textures.request(material, image.clone());
            let node = Node {
                // Authored lying flat, face up; the record rotation
                // composes on top of this.
                base_rotation: Quat::from_rotation_x(-std::f32::consts::FRAC_PI_2),
                bounds,
                geometry: Some(resources.create_geometry(Geometry { bounds })),
                material: Some(material),
                tag: Some(InstanceTag {
                    object: object.id,
                    kind: TagKind::ImagePlane,
                    original_color: object.color,
                }),
                ..Node::default()
            };
            graph.insert(node)
        }
        ObjectKind::PointLight { intensity } => {
            let light = graph.insert(Node {
                light: Some(Light {
                    color: object.color,
                    intensity: *intensity,
                    range: LIGHT_RANGE,
                }),
                tag: Some(InstanceTag {
                    object: object.id,
                    kind: TagKind::PointLight,
                    original_color: object.color,
                }),
                ..Node::default()
            });
            // Helper mesh so the light can be seen and picked.
            let bounds = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(LIGHT_HELPER_SIZE));
            graph.insert_child(
                light,
                Node {
                    bounds,
                    geometry: Some(resources.create_geometry(Geometry { bounds })),
                    material: Some(resources.create_material(Material::flat(object.color))),
                    ..Node::default()
                },
            );
            light
        }
    }
}
