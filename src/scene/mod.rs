pub mod factory;

use crate::assets::TextureRef;
use crate::color::Rgb;

/// Stable identifier for one scene object. Allocated once, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct ObjectId(u64);

/// Monotonic [`ObjectId`] source.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self) -> ObjectId {
        let id = ObjectId(self.next);
        self.next += 1;
        id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ShapeKind {
    Box,
    Sphere,
    Cylinder,
    Cone,
    Torus,
}

/// Type-specific record data. Fields that only make sense for one object
/// type live in its variant, so invalid combinations cannot be represented.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ObjectKind {
    Shape(ShapeKind),
    PointLight {
        /// Domain-clamped to [0, 10] by the UI, not enforced here.
        intensity: f32,
    },
    ImagePlane {
        image: TextureRef,
        /// width / height of the source image, used to size the plane.
        aspect_ratio: f32,
    },
}

impl ObjectKind {
    pub fn is_light(&self) -> bool {
        matches!(self, ObjectKind::PointLight { .. })
    }
}

/// Canonical serializable description of one scene object.
///
/// Mutated only by whole-record replacement; `rotation` is Euler XYZ in
/// radians. `scale` and `rotation` are carried but semantically unused for
/// lights.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneObject {
    pub id: ObjectId,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    pub color: Rgb,
    pub kind: ObjectKind,
}

/// The canonical record list. Insertion-ordered; at most one record per id.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneList {
    objects: Vec<SceneObject>,
}

impl SceneList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.iter().find(|object| object.id == id)
    }

    pub fn push(&mut self, object: SceneObject) {
        debug_assert!(
            self.get(object.id).is_none(),
            "duplicate object id in scene list"
        );
        self.objects.push(object);
    }

    /// Drops the most recently added record, if any.
    pub fn remove_last(&mut self) -> Option<SceneObject> {
        self.objects.pop()
    }

    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let index = self.objects.iter().position(|object| object.id == id)?;
        Some(self.objects.remove(index))
    }

    /// Whole-record replacement. Returns false when `id` is gone (the edit
    /// raced a removal and degrades to a no-op).
    pub fn replace(&mut self, id: ObjectId, updated: SceneObject) -> bool {
        debug_assert_eq!(id, updated.id, "replacement must keep the record id");
        match self.objects.iter_mut().find(|object| object.id == id) {
            Some(slot) => {
                *slot = updated;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Value copy for the history stack.
    pub fn to_snapshot(&self) -> Vec<SceneObject> {
        self.objects.clone()
    }

    pub fn restore(&mut self, snapshot: &[SceneObject]) {
        self.objects = snapshot.to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(id: ObjectId, kind: ShapeKind) -> SceneObject {
        SceneObject {
            id,
            position: [0.0, 1.0, 0.0],
            rotation: [0.0; 3],
            scale: [1.0; 3],
            color: 0x4488cc,
            kind: ObjectKind::Shape(kind),
        }
    }

    #[test]
    fn ids_are_never_reused() {
        let mut ids = IdAllocator::new();
        let a = ids.allocate();
        let b = ids.allocate();
        assert_ne!(a, b);
        let mut list = SceneList::new();
        list.push(shape(a, ShapeKind::Box));
        list.remove(a);
        let c = ids.allocate();
        assert_ne!(a, c);
    }

    #[test]
    fn remove_last_follows_insertion_order() {
        let mut ids = IdAllocator::new();
        let mut list = SceneList::new();
        let first = ids.allocate();
        let second = ids.allocate();
        list.push(shape(first, ShapeKind::Box));
        list.push(shape(second, ShapeKind::Sphere));
        assert_eq!(list.remove_last().map(|o| o.id), Some(second));
        assert_eq!(list.remove_last().map(|o| o.id), Some(first));
        assert!(list.remove_last().is_none());
    }

    #[test]
    fn replace_missing_id_is_a_noop() {
        let mut ids = IdAllocator::new();
        let mut list = SceneList::new();
        let id = ids.allocate();
        let ghost = shape(id, ShapeKind::Cone);
        assert!(!list.replace(id, ghost));
        assert!(list.is_empty());
    }

    #[test]
    fn records_serialize_with_tagged_kinds() {
        let mut ids = IdAllocator::new();
        let object = SceneObject {
            id: ids.allocate(),
            position: [1.0, 5.0, -2.0],
            rotation: [0.0; 3],
            scale: [1.0; 3],
            color: 0xffffff,
            kind: ObjectKind::PointLight { intensity: 1.0 },
        };
        let json = serde_json::to_string(&object).unwrap();
        assert!(json.contains("PointLight"));
        let back: SceneObject = serde_json::from_str(&json).unwrap();
        assert_eq!(back, object);
    }
}
