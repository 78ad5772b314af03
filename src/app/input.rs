//! Keyboard state for camera movement.

use crate::render::camera::CameraMovement;

/// Keys the editor core reacts to. The windowing layer maps its own key
/// codes onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Space,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct InputState {
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,
}

impl InputState {
    pub fn handle_key(&mut self, key: Key, pressed: bool) {
        match key {
            Key::ArrowUp => self.move_forward = pressed,
            Key::ArrowDown => self.move_backward = pressed,
            Key::ArrowLeft => self.move_left = pressed,
            Key::ArrowRight => self.move_right = pressed,
            Key::Space => {}
        }
    }

    pub fn movement(&self) -> CameraMovement {
        CameraMovement {
            move_forward: self.move_forward,
            move_backward: self.move_backward,
            move_left: self.move_left,
            move_right: self.move_right,
        }
    }
}
