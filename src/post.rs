//! Post-processing parameters.
//!
//! The composite pass runs the offscreen colour texture through one of four
//! effects. The effect is chosen with the number keys and stays selected until
//! another number key is pressed; several effects animate with a time value.

use instant::Instant;
use winit::keyboard::KeyCode;

/// The effect applied when the offscreen image is drawn to the window.
#[repr(u32)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ShaderMode {
    #[default]
    Passthrough = 0,
    Greyscale = 1,
    Invert = 2,
    Wave = 3,
}

impl ShaderMode {
    pub const ALL: [ShaderMode; 4] = [
        ShaderMode::Passthrough,
        ShaderMode::Greyscale,
        ShaderMode::Invert,
        ShaderMode::Wave,
    ];

    /// Keys 1 to 4 select modes 0 to 3.
    pub fn from_key(code: KeyCode) -> Option<Self> {
        match code {
            KeyCode::Digit1 | KeyCode::Numpad1 => Some(ShaderMode::Passthrough),
            KeyCode::Digit2 | KeyCode::Numpad2 => Some(ShaderMode::Greyscale),
            KeyCode::Digit3 | KeyCode::Numpad3 => Some(ShaderMode::Invert),
            KeyCode::Digit4 | KeyCode::Numpad4 => Some(ShaderMode::Wave),
            _ => None,
        }
    }

    pub fn index(self) -> u32 {
        self as u32
    }
}

/// Remembers the most recently pressed mode key.
///
/// Key presses arrive as ordered events, so when several mode keys are pressed
/// between two frames the last one wins.
#[derive(Debug, Default)]
pub struct ModeSelector {
    current: ShaderMode,
}

impl ModeSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the key selected a mode.
    pub fn press(&mut self, code: KeyCode) -> bool {
        match ShaderMode::from_key(code) {
            Some(mode) => {
                if mode != self.current {
                    log::info!("Post effect: {:?}", mode);
                }
                self.current = mode;
                true
            }
            None => false,
        }
    }

    pub fn current(&self) -> ShaderMode {
        self.current
    }
}

/// Monotonic time parameter of the post effect: seconds since start times `scale`.
#[derive(Debug, Clone)]
pub struct PostClock {
    start: Instant,
    scale: f32,
}

impl PostClock {
    pub fn starting_at(start: Instant, scale: f32) -> Self {
        Self { start, scale }
    }

    pub fn time_at(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.start).as_secs_f32() * self.scale
    }

    pub fn time(&self) -> f32 {
        self.time_at(Instant::now())
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PostUniform {
    pub mode: u32,
    pub time: f32,
    // Uniforms require 16 byte (4 float) spacing
    _padding: [u32; 2],
}

impl PostUniform {
    pub fn new(mode: ShaderMode, time: f32) -> Self {
        Self {
            mode: mode.index(),
            time,
            _padding: [0; 2],
        }
    }
}
