//! Per-frame render descriptions.
//!
//! Traversing the scene does not touch the GPU. It produces a [`SceneRender`]:
//! the camera uniform of the frame plus one [`DrawCall`] per mesh. The scene
//! pass then uploads the model matrices of all calls into one instance buffer
//! and issues the draws in order.

use crate::{
    camera::CameraUniform,
    data_structures::instance::InstanceRaw,
    resources::arena::{MaterialHandle, MeshHandle},
};

/// A single indexed draw of an uploaded mesh.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCall {
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
    /// Number of vertices the indexed draw emits.
    pub vertex_count: u32,
    /// World matrix composed from all parent transforms.
    pub model: cgmath::Matrix4<f32>,
}

/// Everything the scene pass needs for one frame.
#[derive(Clone, Debug)]
pub struct SceneRender {
    pub camera: CameraUniform,
    pub calls: Vec<DrawCall>,
}

impl SceneRender {
    /// Instance buffer contents: slot `i` holds the matrices of `calls[i]`.
    pub fn instances(&self) -> Vec<InstanceRaw> {
        self.calls
            .iter()
            .map(|call| InstanceRaw::from_world(&call.model))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}
