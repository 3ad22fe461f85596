//! Start-up settings.
//!
//! Everything is fixed at compile time except the list of models, which can be
//! replaced from the command line.

use std::path::PathBuf;

use cgmath::{Deg, Point3};

use crate::offscreen::OffscreenDescriptor;

pub const DEFAULT_MODELS: [&str; 4] = [
    "person.obj",
    "earthobj.obj",
    "CarvedTable.obj",
    "glass bottle.obj",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub title: String,
    pub window_size: (u32, u32),
    pub clear_colour: wgpu::Color,
    /// Offscreen target size; the initial window size when unset.
    pub offscreen_size: Option<(u32, u32)>,
    pub camera_position: Point3<f32>,
    pub camera_yaw: Deg<f32>,
    pub camera_pitch: Deg<f32>,
    pub fovy: Deg<f32>,
    pub znear: f32,
    pub zfar: f32,
    /// Units per second.
    pub speed: f32,
    /// Radians per pixel of cursor movement.
    pub sensitivity: f32,
    /// Post effect time advances this many units per real second.
    pub time_scale: f32,
    pub light_position: [f32; 3],
    pub light_colour: [f32; 3],
    /// Relative model paths that don't exist are looked up here.
    pub asset_dir: PathBuf,
    pub models: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "renderEngine Skeleton".to_string(),
            window_size: (1024, 768),
            clear_colour: wgpu::Color {
                r: 0.0,
                g: 0.0,
                b: 0.4,
                a: 1.0,
            },
            offscreen_size: None,
            camera_position: Point3::new(0.0, 100.0, 200.0),
            camera_yaw: Deg(-90.0),
            camera_pitch: Deg(0.0),
            fovy: Deg(45.0),
            znear: 0.1,
            zfar: 1000.0,
            speed: 30.0,
            sensitivity: 0.005,
            time_scale: 10.0,
            light_position: [0.0, 300.0, 300.0],
            light_colour: [1.0, 1.0, 1.0],
            asset_dir: PathBuf::from("assets"),
            models: DEFAULT_MODELS.iter().map(PathBuf::from).collect(),
        }
    }
}

impl Config {
    /// Defaults with the model list replaced by `args`, unless there are none.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathBuf>,
    {
        let models: Vec<PathBuf> = args.into_iter().map(Into::into).collect();
        let mut config = Self::default();
        if !models.is_empty() {
            config.models = models;
        }
        config
    }

    pub fn offscreen_descriptor(&self) -> OffscreenDescriptor {
        let (width, height) = self.offscreen_size.unwrap_or(self.window_size);
        OffscreenDescriptor::new(width, height)
    }
}

