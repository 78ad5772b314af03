//! Linear undo/redo history over scene record-list snapshots.
//!
//! Only user actions are recorded; installing a snapshot via
//! [`History::undo`] / [`History::redo`] moves the cursor without recording,
//! so the caller never needs identity comparisons to tell the two apart.

use crate::scene::SceneObject;

#[derive(Debug)]
pub struct History {
    snapshots: Vec<Vec<SceneObject>>,
    index: usize,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    /// Starts with a single empty-scene snapshot at index 0.
    pub fn new() -> Self {
        Self {
            snapshots: vec![Vec::new()],
            index: 0,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.snapshots.len()
    }

    /// Number of stored snapshots; never less than one.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn current(&self) -> &[SceneObject] {
        &self.snapshots[self.index]
    }

    /// Records a user action: truncates any redo tail, appends the snapshot
    /// and advances the cursor to it.
    pub fn record(&mut self, snapshot: Vec<SceneObject>) {
        self.snapshots.truncate(self.index + 1);
        self.snapshots.push(snapshot);
        self.index = self.snapshots.len() - 1;
    }

    /// Steps back one snapshot. No-op at the oldest entry.
    pub fn undo(&mut self) -> Option<&[SceneObject]> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.snapshots[self.index])
    }

    /// Steps forward one snapshot. No-op at the newest entry.
    pub fn redo(&mut self) -> Option<&[SceneObject]> {
        if self.index + 1 >= self.snapshots.len() {
            return None;
        }
        self.index += 1;
        Some(&self.snapshots[self.index])
    }

    pub fn reset(&mut self) {
        self.snapshots = vec![Vec::new()];
        self.index = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{IdAllocator, ObjectKind, SceneObject, ShapeKind};

    fn snapshot(ids: &mut IdAllocator, count: usize) -> Vec<SceneObject> {
        (0..count)
            .map(|_| SceneObject {
                id: ids.allocate(),
                position: [0.0, 1.0, 0.0],
                rotation: [0.0; 3],
                scale: [1.0; 3],
                color: 0x123456,
                kind: ObjectKind::Shape(ShapeKind::Box),
            })
            .collect()
    }

    #[test]
    fn starts_with_empty_snapshot() {
        let history = History::new();
        assert_eq!(history.len(), 1);
        assert!(history.current().is_empty());
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn undo_then_redo_restores_both_states() {
        let mut ids = IdAllocator::new();
        let mut history = History::new();
        let one = snapshot(&mut ids, 1);
        history.record(one.clone());

        assert_eq!(history.undo().map(<[SceneObject]>::to_vec), Some(vec![]));
        assert_eq!(history.redo().map(<[SceneObject]>::to_vec), Some(one));
        assert!(history.redo().is_none());
    }

    #[test]
    fn recording_discards_redo_tail() {
        let mut ids = IdAllocator::new();
        let mut history = History::new();
        history.record(snapshot(&mut ids, 1));
        history.record(snapshot(&mut ids, 2));
        history.undo();
        assert!(history.can_redo());

        history.record(snapshot(&mut ids, 3));
        assert!(!history.can_redo());
        assert_eq!(history.len(), 3);
        assert_eq!(history.current().len(), 3);
    }

    #[test]
    fn undo_at_floor_is_a_noop() {
        let mut history = History::new();
        assert!(history.undo().is_none());
        assert!(history.undo().is_none());
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn reset_reinitializes() {
        let mut ids = IdAllocator::new();
        let mut history = History::new();
        history.record(snapshot(&mut ids, 2));
        history.record(snapshot(&mut ids, 3));
        history.reset();
        assert_eq!(history.len(), 1);
        assert!(history.current().is_empty());
        assert!(!history.can_undo() && !history.can_redo());
    }
}
