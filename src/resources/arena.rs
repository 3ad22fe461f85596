//! Ownership of every GPU object the scene uses.
//!
//! Drawables never hold wgpu objects themselves. They upload through an
//! [`Uploader`] and keep the returned handle; the [`GpuArena`] owns the buffers,
//! textures and bind groups and releases all of them when it is dropped.

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        model::{GpuMesh, Material, MaterialData, MaterialUniform, MeshData},
        texture::Texture,
    },
    resources::texture::material_layout,
};

/// Index of an uploaded mesh inside the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MeshHandle(pub usize);

/// Index of an uploaded material inside the arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub usize);

/// Seam between the scene graph and the graphics backend.
pub trait Uploader {
    fn upload_mesh(&mut self, mesh: &MeshData) -> anyhow::Result<MeshHandle>;

    fn upload_material(&mut self, material: &MaterialData) -> anyhow::Result<MaterialHandle>;

    /// The material used by meshes that reference none.
    fn default_material(&mut self) -> anyhow::Result<MaterialHandle>;
}

pub struct GpuArena {
    device: wgpu::Device,
    queue: wgpu::Queue,
    layout: wgpu::BindGroupLayout,
    meshes: Vec<GpuMesh>,
    materials: Vec<Material>,
    default_material: Option<MaterialHandle>,
}

impl GpuArena {
    /// The clones of `device` and `queue` only clone the internal Arcs.
    pub fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self {
            layout: material_layout(device),
            device: device.clone(),
            queue: queue.clone(),
            meshes: Vec::new(),
            materials: Vec::new(),
            default_material: None,
        }
    }

    pub fn material_layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn mesh(&self, handle: MeshHandle) -> Option<&GpuMesh> {
        self.meshes.get(handle.0)
    }

    pub fn material(&self, handle: MaterialHandle) -> Option<&Material> {
        self.materials.get(handle.0)
    }
}

impl Uploader for GpuArena {
    fn upload_mesh(&mut self, mesh: &MeshData) -> anyhow::Result<MeshHandle> {
        anyhow::ensure!(!mesh.is_empty(), "mesh {} has no geometry", mesh.name);
        let vertex_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} Vertex Buffer", mesh.name)),
                contents: bytemuck::cast_slice(&mesh.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} Index Buffer", mesh.name)),
                contents: bytemuck::cast_slice(&mesh.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        self.meshes.push(GpuMesh {
            name: mesh.name.clone(),
            vertex_buffer,
            index_buffer,
            num_elements: mesh.indices.len() as u32,
        });
        Ok(MeshHandle(self.meshes.len() - 1))
    }

    fn upload_material(&mut self, material: &MaterialData) -> anyhow::Result<MaterialHandle> {
        let diffuse_texture = match &material.diffuse_texture {
            Some(img) => {
                match Texture::from_image(&self.device, &self.queue, img, Some(material.name.as_str())) {
                    Ok(texture) => texture,
                    Err(e) => {
                        log::warn!("Using the flat colour of {}: {e:#}", material.name);
                        Texture::create_solid([255; 4], 1, 1, &self.device, &self.queue)
                    }
                }
            }
            None => Texture::create_solid([255; 4], 1, 1, &self.device, &self.queue),
        };
        let uniform_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{} Material Buffer", material.name)),
                contents: bytemuck::cast_slice(&[MaterialUniform::from(material)]),
                usage: wgpu::BufferUsages::UNIFORM,
            });
        self.materials.push(Material::new(
            &self.device,
            &material.name,
            diffuse_texture,
            uniform_buffer,
            &self.layout,
        ));
        Ok(MaterialHandle(self.materials.len() - 1))
    }

    fn default_material(&mut self) -> anyhow::Result<MaterialHandle> {
        if let Some(handle) = self.default_material {
            return Ok(handle);
        }
        let handle = self.upload_material(&MaterialData::default())?;
        self.default_material = Some(handle);
        Ok(handle)
    }
}
