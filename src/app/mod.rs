//! The editor: interaction controller plus scene synchronizer.
//!
//! All user intents funnel through [`Editor`], which owns the canonical
//! record list, the undo/redo history and the live scene graph. Every
//! mutation follows the same sequence: mutate records, record history
//! (user actions only), rebuild live instances, reapply selection and
//! highlights. Undo/redo install snapshots through the same rebuild but
//! never re-record.

mod input;

pub use input::{InputState, Key};

use crate::assets::{AssetError, TextureQueue, TextureStore};
use crate::color::{self, Rgb};
use crate::history::History;
use crate::render::camera::Camera;
use crate::render::controls::NavControls;
use crate::render::gizmo::Gizmo;
use crate::render::pick;
use crate::render::{Aabb, Geometry, Material, Node, NodeId, Resources, SceneGraph};
use crate::scene::factory;
use crate::scene::{IdAllocator, ObjectId, ObjectKind, SceneList, SceneObject, ShapeKind};
use glam::{EulerRot, Quat, Vec3};

/// Axis selector for per-component property edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Lenient numeric parsing for property fields: anything that does not
/// parse becomes zero rather than rejecting the edit.
pub fn parse_number(text: &str) -> f32 {
    text.trim().parse().unwrap_or(0.0)
}

const GRID_SIZE: f32 = 50.0;
const DEFAULT_LIGHT_INTENSITY: f32 = 1.0;

pub struct Editor {
    ids: IdAllocator,
    scene: SceneList,
    history: History,
    graph: SceneGraph,
    resources: Resources,
    textures: TextureStore,
    texture_queue: TextureQueue,
    camera: Camera,
    controls: NavControls,
    gizmo: Gizmo,
    input: InputState,
    /// Top-level live instances, in record order.
    live: Vec<NodeId>,
    selected: Option<ObjectId>,
    /// Spawn position for new objects, fed by the position input fields.
    position_inputs: [f32; 3],
    grid_nodes: Vec<NodeId>,
    grid_visible: bool,
    background: Rgb,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        let mut camera = Camera::new(Vec3::new(0.0, 10.0, 20.0), 0.0, 0.0);
        camera.look_at(Vec3::ZERO);
        let mut editor = Self {
            ids: IdAllocator::new(),
            scene: SceneList::new(),
            history: History::new(),
            graph: SceneGraph::new(),
            resources: Resources::new(),
            textures: TextureStore::new(),
            texture_queue: TextureQueue::new(),
            camera,
            controls: NavControls::new(),
            gizmo: Gizmo::new(),
            input: InputState::default(),
            live: Vec::new(),
            selected: None,
            position_inputs: [0.0; 3],
            grid_nodes: Vec::new(),
            grid_visible: true,
            background: 0xf0f0f0,
        };
        editor.build_grid();
        editor
    }

    // ------------------------------------------------------------------
    // Read-only views for the presentation layer
    // ------------------------------------------------------------------

    pub fn object_count(&self) -> usize {
        self.scene.len()
    }

    pub fn objects(&self) -> &[SceneObject] {
        self.scene.objects()
    }

    pub fn selected_id(&self) -> Option<ObjectId> {
        self.selected
    }

    /// Value-copied view of the selected record; absent when nothing is
    /// selected.
    pub fn selected_properties(&self) -> Option<SceneObject> {
        self.scene.get(self.selected?).cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn is_grid_visible(&self) -> bool {
        self.grid_visible
    }

    pub fn is_auto_rotating(&self) -> bool {
        self.controls.auto_rotate
    }

    pub fn is_camera_motion_enabled(&self) -> bool {
        self.controls.enabled
    }

    pub fn background_color(&self) -> Rgb {
        self.background
    }

    pub fn live_instances(&self) -> &[NodeId] {
        &self.live
    }

    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    pub fn resources(&self) -> &Resources {
        &self.resources
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn gizmo(&self) -> &Gizmo {
        &self.gizmo
    }

    pub fn gizmo_mut(&mut self) -> &mut Gizmo {
        &mut self.gizmo
    }

    // ------------------------------------------------------------------
    // User intents
    // ------------------------------------------------------------------

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.camera.set_viewport(width, height);
    }

    pub fn set_position_input(&mut self, axis: Axis, text: &str) {
        self.position_inputs[axis.index()] = parse_number(text);
    }

    pub fn set_background_color(&mut self, color: Rgb) {
        self.background = color;
    }

    pub fn add_shape(&mut self, shape: ShapeKind) -> ObjectId {
        let color = rand::random::<u32>() & 0xff_ff_ff;
        let id = self.add_record(ObjectKind::Shape(shape), color);
        log::info!("added {:?} to the scene", shape);
        id
    }

    pub fn add_point_light(&mut self) -> ObjectId {
        let id = self.add_record(
            ObjectKind::PointLight {
                intensity: DEFAULT_LIGHT_INTENSITY,
            },
            color::WHITE,
        );
        log::info!("added point light to the scene");
        id
    }

    /// Decodes `bytes` and adds an image plane sized by the decoded aspect
    /// ratio. A decode failure adds nothing.
    pub fn import_image(&mut self, bytes: &[u8]) -> Result<ObjectId, AssetError> {
        let (image, aspect_ratio) = self.textures.import_image(bytes)?;
        let id = self.add_record(
            ObjectKind::ImagePlane {
                image,
                aspect_ratio,
            },
            color::WHITE,
        );
        log::info!("imported image plane (aspect {:.3})", aspect_ratio);
        Ok(id)
    }

    pub fn remove_last(&mut self) {
        if self.scene.remove_last().is_none() {
            log::debug!("remove-last ignored: scene is empty");
            return;
        }
        self.selected = None;
        self.commit();
        log::info!("removed last object");
    }

    pub fn remove_selected(&mut self) {
        let Some(id) = self.selected else {
            log::debug!("remove-selected ignored: nothing selected");
            return;
        };
        self.selected = None;
        if self.scene.remove(id).is_none() {
            // Selection referenced a record that is already gone; treat as
            // a no-op.
            self.apply_highlights();
            return;
        }
        self.commit();
        log::info!("removed selected object {:?}", id);
    }

    pub fn set_selected_color(&mut self, color: Rgb) {
        let Some(mut updated) = self.selected_properties() else {
            return;
        };
        updated.color = color;
        self.replace_selected(updated);
    }

    pub fn set_selected_scale(&mut self, axis: Axis, text: &str) {
        let Some(mut updated) = self.selected_properties() else {
            return;
        };
        updated.scale[axis.index()] = parse_number(text);
        self.replace_selected(updated);
    }

    /// Intensity edits apply to point lights only; for anything else the
    /// intent is a no-op.
    pub fn set_selected_intensity(&mut self, text: &str) {
        let Some(mut updated) = self.selected_properties() else {
            return;
        };
        let ObjectKind::PointLight { intensity } = &mut updated.kind else {
            return;
        };
        *intensity = parse_number(text);
        self.replace_selected(updated);
    }

    pub fn undo(&mut self) {
        let Some(snapshot) = self.history.undo() else {
            log::debug!("nothing to undo");
            return;
        };
        self.scene.restore(snapshot);
        self.selected = None;
        self.sync();
        log::info!("undo");
    }

    pub fn redo(&mut self) {
        let Some(snapshot) = self.history.redo() else {
            log::debug!("nothing to redo");
            return;
        };
        self.scene.restore(snapshot);
        self.selected = None;
        self.sync();
        log::info!("redo");
    }

    pub fn reset(&mut self) {
        self.scene.clear();
        self.selected = None;
        self.history.reset();
        self.sync();
        log::info!("scene reset to initial state");
    }

    pub fn toggle_grid(&mut self) {
        self.grid_visible = !self.grid_visible;
        for &node in &self.grid_nodes {
            if let Some(grid) = self.graph.get_mut(node) {
                grid.visible = self.grid_visible;
            }
        }
    }

    pub fn toggle_auto_rotate(&mut self) {
        self.controls.auto_rotate = !self.controls.auto_rotate;
        // Turning auto-rotate on re-enables camera motion.
        if self.controls.auto_rotate && !self.controls.enabled {
            self.controls.enabled = true;
        }
    }

    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        if key == Key::Space {
            if pressed {
                self.toggle_camera_motion();
            }
            return;
        }
        self.input.handle_key(key, pressed);
    }

    fn toggle_camera_motion(&mut self) {
        self.controls.enabled = !self.controls.enabled;
        // Disabling motion must not leave auto-rotation fighting the
        // frozen camera.
        if !self.controls.enabled {
            self.controls.auto_rotate = false;
        }
    }

    /// Pointer-down picking. While the gizmo drags, selection is frozen.
    pub fn handle_pointer_down(&mut self, x: f32, y: f32) {
        if self.gizmo.is_dragging() {
            return;
        }
        let ray = self.camera.ray_from_screen(x, y);
        let hit_owner = pick::raycast(&self.graph, &self.live, ray)
            .first()
            .and_then(|hit| self.owning_instance(hit.node));
        let next = match hit_owner.and_then(|node| self.graph.get(node)?.tag) {
            // Clicking the already selected object deselects it.
            Some(tag) if Some(tag.object) == self.selected => None,
            Some(tag) => Some(tag.object),
            None => None,
        };
        self.set_selected(next);
    }

    /// One frame of the cooperative loop: camera movement from held keys,
    /// auto-rotation, gizmo liveness and deferred texture loads.
    pub fn tick(&mut self, dt: f32) {
        if self.controls.enabled {
            self.camera.update_movement(&self.input.movement(), dt);
        }
        self.controls.update(&mut self.camera, dt);
        self.gizmo.update(&self.graph);
        self.texture_queue.pump(&self.textures, &mut self.resources);
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn add_record(&mut self, kind: ObjectKind, color: Rgb) -> ObjectId {
        let mut position = self.position_inputs;
        // Y left at zero means "unset": substitute the type's resting
        // height. An explicit zero is indistinguishable, by design.
        if position[1] == 0.0 {
            position[1] = factory::resting_height(&kind);
        }
        let id = self.ids.allocate();
        self.scene.push(SceneObject {
            id,
            position,
            rotation: [0.0; 3],
            scale: [1.0; 3],
            color,
            kind,
        });
        self.commit();
        id
    }

    fn replace_selected(&mut self, updated: SceneObject) {
        if !self.scene.replace(updated.id, updated) {
            // The record vanished under the edit; recover by clearing the
            // stale selection.
            self.selected = None;
            self.apply_highlights();
            return;
        }
        self.commit();
    }

    /// User-action commit: record history, then rebuild.
    fn commit(&mut self) {
        self.history.record(self.scene.to_snapshot());
        self.sync();
    }

    /// Full-rebuild reconciliation. Order matters: detach the gizmo before
    /// teardown, dispose before removal, rebuild in record order, then
    /// restore selection and highlights.
    fn sync(&mut self) {
        self.gizmo.detach();
        for node in std::mem::take(&mut self.live) {
            self.graph.dispose_subtree(node, &mut self.resources);
            self.graph.remove_subtree(node);
        }

        let mut live = Vec::with_capacity(self.scene.len());
        for object in self.scene.objects() {
            let node = factory::spawn_object(
                object,
                &mut self.graph,
                &mut self.resources,
                &mut self.texture_queue,
            );
            if let Some(instance) = self.graph.get_mut(node) {
                instance.position = Vec3::from_array(object.position);
                instance.rotation = Quat::from_euler(
                    EulerRot::XYZ,
                    object.rotation[0],
                    object.rotation[1],
                    object.rotation[2],
                );
                // Scale has no meaning for lights; leave the node alone.
                if !object.kind.is_light() {
                    instance.scale = Vec3::from_array(object.scale);
                }
            }
            live.push(node);
        }
        self.live = live;

        if let Some(selected) = self.selected {
            match self.find_live(selected) {
                Some(node) => self.gizmo.attach(&self.graph, node),
                None => self.selected = None,
            }
        }
        self.apply_highlights();
    }

    fn set_selected(&mut self, next: Option<ObjectId>) {
        self.selected = next;
        match next.and_then(|id| self.find_live(id)) {
            Some(node) => self.gizmo.attach(&self.graph, node),
            None => self.gizmo.detach(),
        }
        self.apply_highlights();
    }

    fn find_live(&self, id: ObjectId) -> Option<NodeId> {
        self.live.iter().copied().find(|&node| {
            self.graph
                .get(node)
                .and_then(|n| n.tag)
                .is_some_and(|tag| tag.object == id)
        })
    }

    /// Walks the parent chain from a picked node to the top-level live
    /// instance that owns it (e.g. a light helper resolves to its light).
    fn owning_instance(&self, hit: NodeId) -> Option<NodeId> {
        let mut current = Some(hit);
        while let Some(node) = current {
            if self.live.contains(&node) {
                return Some(node);
            }
            current = self.graph.parent(node);
        }
        None
    }

    /// Display-color pass: the selected instance shows a lightened variant
    /// of its original color, everything else is restored exactly.
    fn apply_highlights(&mut self) {
        for index in 0..self.live.len() {
            let node_id = self.live[index];
            let Some(tag) = self.graph.get(node_id).and_then(|node| node.tag) else {
                continue;
            };
            let display = if Some(tag.object) == self.selected {
                color::lighter(tag.original_color)
            } else {
                tag.original_color
            };
            // Whole subtree, so a light's helper mesh tracks the light.
            for member in self.graph.subtree(node_id) {
                if let Some(material) = self.graph.get(member).and_then(|node| node.material) {
                    if let Some(slot) = self.resources.material_mut(material) {
                        slot.color = display;
                    }
                }
            }
            if let Some(node) = self.graph.get_mut(node_id) {
                if let Some(light) = node.light.as_mut() {
                    light.color = display;
                }
            }
        }
    }

    /// Static scene furniture: ground grid and highlighted center lines.
    /// Never pickable (picking only walks live instances) and never torn
    /// down by reconciliation.
    fn build_grid(&mut self) {
        let mut add_static = |graph: &mut SceneGraph, resources: &mut Resources, size: Vec3, color: Rgb| {
            let bounds = Aabb::from_center_size(Vec3::ZERO, size);
            let node = Node {
                bounds,
                geometry: Some(resources.create_geometry(Geometry { bounds })),
                material: Some(resources.create_material(Material::flat(color))),
                is_static: true,
                ..Node::default()
            };
            graph.insert(node)
        };
        self.grid_nodes = vec![
            add_static(
                &mut self.graph,
                &mut self.resources,
                Vec3::new(GRID_SIZE, 0.01, GRID_SIZE),
                0xbbbbbb,
            ),
            add_static(
                &mut self.graph,
                &mut self.resources,
                Vec3::new(GRID_SIZE, 0.01, 0.01),
                0xadd8e6,
            ),
            add_static(
                &mut self.graph,
                &mut self.resources,
                Vec3::new(0.01, 0.01, GRID_SIZE),
                0xadd8e6,
            ),
        ];
    }
}
