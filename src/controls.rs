//! Keyboard and mouse driven camera movement.
//!
//! Window and device events are folded into an [`InputState`] as they arrive.
//! Once per frame, before the scene is rendered, [`Controls::update`] turns the
//! sampled input into camera motion.

use std::collections::HashSet;

use cgmath::Rad;
use instant::Duration;
use winit::keyboard::KeyCode;

use crate::camera::Camera;

/// Continuously sampled input between two frames.
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<KeyCode>,
    cursor_delta: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, code: KeyCode) {
        self.held.insert(code);
    }

    pub fn release(&mut self, code: KeyCode) {
        self.held.remove(&code);
    }

    /// Focus loss means we won't see the key releases.
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Accumulates raw mouse motion in pixels.
    pub fn move_cursor(&mut self, dx: f64, dy: f64) {
        self.cursor_delta.0 += dx;
        self.cursor_delta.1 += dy;
    }

    /// The cursor offset since the last call, which puts the cursor back to the centre.
    pub fn take_cursor_delta(&mut self) -> (f64, f64) {
        std::mem::take(&mut self.cursor_delta)
    }

    fn axis(&self, positive: [KeyCode; 2], negative: [KeyCode; 2]) -> f32 {
        let pressed = |keys: [KeyCode; 2]| keys.iter().any(|key| self.held.contains(key));
        match (pressed(positive), pressed(negative)) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Controls {
    speed: f32,
    sensitivity: f32,
}

impl Controls {
    /// `speed` is in units per second, `sensitivity` in radians per pixel of cursor motion.
    pub fn new(speed: f32, sensitivity: f32) -> Self {
        Self { speed, sensitivity }
    }

    pub fn update(&self, camera: &mut Camera, input: &mut InputState, dt: Duration) {
        let dt = dt.as_secs_f32();

        let (dx, dy) = input.take_cursor_delta();
        // Moving the mouse up looks up, screen y grows downwards
        camera.rotate(
            Rad(self.sensitivity * dx as f32),
            Rad(-self.sensitivity * dy as f32),
        );

        let forward = input.axis(
            [KeyCode::KeyW, KeyCode::ArrowUp],
            [KeyCode::KeyS, KeyCode::ArrowDown],
        );
        let strafe = input.axis(
            [KeyCode::KeyD, KeyCode::ArrowRight],
            [KeyCode::KeyA, KeyCode::ArrowLeft],
        );
        let step = self.speed * dt;
        camera.position += camera.forward() * forward * step;
        camera.position += camera.right() * strafe * step;
    }
}
