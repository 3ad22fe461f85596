//! Engine data structures: models, textures, scene graphs, and instances.
//!
//! This module contains the core data types for scene representation:
//!
//! - `model` contains mesh and material definitions and their GPU counterparts
//! - `texture` contains GPU texture wrapper and creation utilities
//! - `instance` holds local transforms and the per-draw matrices sent to the shader
//! - `scene_graph` enables hierarchical scene organization

pub mod instance;
pub mod model;
pub mod scene_graph;
pub mod texture;
