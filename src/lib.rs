//! render-engine
//!
//! A minimal real-time 3D renderer. OBJ/MTL models are loaded into a scene of
//! groups and meshes, viewed through a fly camera, rendered into a single
//! offscreen target and composited to the window through a selectable
//! post-processing effect.
//!
//! High-level modules
//! - `camera`: camera, projection and the camera uniform
//! - `config`: start-up settings and command line handling
//! - `context`: window surface, device and queue
//! - `controls`: keyboard and mouse input applied to the camera
//! - `data_structures`: meshes, materials, transforms and the scene graph
//! - `driver`: the winit event loop running one frame per redraw
//! - `frame`: the ordered passes of a frame
//! - `offscreen`: the render target the scene is drawn into
//! - `pipelines`: the scene and post-processing render pipelines
//! - `post`: post effect modes and their time parameter
//! - `render`: per-frame draw call lists
//! - `resources`: model import and the GPU resource arena
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod controls;
pub mod data_structures;
pub mod driver;
pub mod frame;
pub mod offscreen;
pub mod pipelines;
pub mod post;
pub mod render;
pub mod resources;
