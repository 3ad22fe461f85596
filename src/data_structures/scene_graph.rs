//! Scene graph and hierarchical scene organization.
//!
//! A [`Scene`] is an ordered list of [`Drawable`]s. A drawable is either a
//! [`Mesh`] (geometry plus a material) or a [`Group`] of further drawables.
//! Every node carries a local transform; world transforms are composed from
//! the root down while the scene is traversed.
//!
//! Nodes are built from importer output, initialized exactly once (which
//! uploads their geometry and materials through an [`Uploader`]) and are
//! read-only afterwards.

use anyhow::{Context as _, bail};
use cgmath::SquareMatrix;

use crate::{
    camera::{Camera, CameraUniform},
    data_structures::{
        instance::Transform,
        model::{MaterialData, MeshData},
    },
    render::{DrawCall, SceneRender},
    resources::{
        ImportedModel,
        arena::{MaterialHandle, MeshHandle, Uploader},
    },
};

#[derive(Debug)]
enum MeshState {
    Pending(MeshData),
    Uploaded {
        name: String,
        mesh: MeshHandle,
        material: MaterialHandle,
        vertex_count: u32,
    },
}

/// Geometry with a material, the leaf of the scene graph.
#[derive(Debug)]
pub struct Mesh {
    transform: Transform,
    state: MeshState,
}

impl Mesh {
    pub fn new(data: MeshData) -> Self {
        Self {
            transform: Transform::default(),
            state: MeshState::Pending(data),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        if self.is_initialized() {
            log::warn!("Ignoring transform change of mesh {}, it is already initialized.", self.name());
        } else {
            self.transform = transform;
        }
        self
    }

    pub fn name(&self) -> &str {
        match &self.state {
            MeshState::Pending(data) => &data.name,
            MeshState::Uploaded { name, .. } => name,
        }
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.state, MeshState::Uploaded { .. })
    }

    pub fn local_transform(&self) -> &Transform {
        &self.transform
    }

    /// Uploads the geometry. `materials` maps the mesh's material index to uploaded materials.
    fn init(&mut self, uploader: &mut dyn Uploader, materials: &[MaterialHandle]) -> anyhow::Result<()> {
        let MeshState::Pending(data) = &self.state else {
            bail!("mesh {} is already initialized", self.name());
        };
        if data.is_empty() {
            bail!("mesh {} has no geometry", data.name);
        }
        let material = match data.material.and_then(|idx| materials.get(idx)) {
            Some(handle) => *handle,
            None => uploader.default_material()?,
        };
        let mesh = uploader.upload_mesh(data)?;
        let name = data.name.clone();
        let vertex_count = data.indices.len() as u32;
        self.state = MeshState::Uploaded {
            name,
            mesh,
            material,
            vertex_count,
        };
        Ok(())
    }

    fn collect(&self, parent: &cgmath::Matrix4<f32>, calls: &mut Vec<DrawCall>) {
        if let MeshState::Uploaded {
            mesh,
            material,
            vertex_count,
            ..
        } = &self.state
        {
            calls.push(DrawCall {
                mesh: *mesh,
                material: *material,
                vertex_count: *vertex_count,
                model: *parent * self.transform.to_matrix(),
            });
        }
    }
}

/// A named composite of meshes and nested groups.
///
/// A group owns the materials its meshes refer to until it is initialized.
#[derive(Debug)]
pub struct Group {
    name: String,
    transform: Transform,
    children: Vec<Drawable>,
    materials: Vec<MaterialData>,
    initialized: bool,
}

impl Group {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            transform: Transform::default(),
            children: Vec::new(),
            materials: Vec::new(),
            initialized: false,
        }
    }

    /// One mesh child per imported mesh; the group keeps the imported materials.
    pub fn from_import(model: ImportedModel) -> Self {
        let mut group = Self::new(&model.name);
        group.materials = model.materials;
        group.children = model
            .meshes
            .into_iter()
            .map(|data| Drawable::Mesh(Mesh::new(data)))
            .collect();
        group
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        if self.initialized {
            log::warn!("Ignoring transform change of group {}, it is already initialized.", self.name);
        } else {
            self.transform = transform;
        }
        self
    }

    pub fn add_child(&mut self, child: impl Into<Drawable>) -> anyhow::Result<()> {
        if self.initialized {
            bail!("cannot add children to group {} after it was initialized", self.name);
        }
        self.children.push(child.into());
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn local_transform(&self) -> &Transform {
        &self.transform
    }

    /// Uploads all materials and meshes below this group.
    ///
    /// Fails when called a second time or when the group holds no geometry at all.
    pub fn init(&mut self, uploader: &mut dyn Uploader) -> anyhow::Result<()> {
        self.init_with(uploader, &[])
    }

    fn init_with(&mut self, uploader: &mut dyn Uploader, inherited: &[MaterialHandle]) -> anyhow::Result<()> {
        if self.initialized {
            bail!("group {} is already initialized", self.name);
        }
        if self.mesh_count() == 0 {
            bail!("group {} contains no geometry", self.name);
        }
        let own = self
            .materials
            .iter()
            .map(|material| uploader.upload_material(material))
            .collect::<anyhow::Result<Vec<_>>>()
            .with_context(|| format!("uploading materials of {}", self.name))?;
        // Nested groups without materials of their own use the parent's
        let materials = if own.is_empty() { inherited } else { own.as_slice() };
        for child in self.children.iter_mut() {
            match child {
                Drawable::Mesh(mesh) => mesh.init(uploader, materials)?,
                Drawable::Group(group) if group.mesh_count() == 0 => {
                    log::warn!("Skipping group {} inside {}, it contains no geometry.", group.name, self.name);
                }
                Drawable::Group(group) => group.init_with(uploader, materials)?,
            }
        }
        // The decoded images are on the GPU now
        self.materials = Vec::new();
        self.initialized = true;
        Ok(())
    }

    /// Number of meshes in this group and all nested groups.
    pub fn mesh_count(&self) -> usize {
        self.children
            .iter()
            .map(|child| match child {
                Drawable::Mesh(_) => 1,
                Drawable::Group(group) => group.mesh_count(),
            })
            .sum()
    }

    fn collect(&self, parent: &cgmath::Matrix4<f32>, calls: &mut Vec<DrawCall>) {
        // push: the world matrix of this group only lives for the traversal of its children
        let world = *parent * self.transform.to_matrix();
        for child in &self.children {
            child.collect(&world, calls);
        }
    }
}

/// A node of the scene graph.
#[derive(Debug)]
pub enum Drawable {
    Mesh(Mesh),
    Group(Group),
}

impl Drawable {
    pub fn init(&mut self, uploader: &mut dyn Uploader) -> anyhow::Result<()> {
        match self {
            Drawable::Mesh(mesh) => mesh.init(uploader, &[]),
            Drawable::Group(group) => group.init(uploader),
        }
    }

    pub fn is_initialized(&self) -> bool {
        match self {
            Drawable::Mesh(mesh) => mesh.is_initialized(),
            Drawable::Group(group) => group.is_initialized(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Drawable::Mesh(mesh) => mesh.name(),
            Drawable::Group(group) => group.name(),
        }
    }

    /// Depth-first traversal emitting one draw call per uploaded mesh.
    pub fn collect(&self, parent: &cgmath::Matrix4<f32>, calls: &mut Vec<DrawCall>) {
        match self {
            Drawable::Mesh(mesh) => mesh.collect(parent, calls),
            Drawable::Group(group) => group.collect(parent, calls),
        }
    }
}

impl From<Mesh> for Drawable {
    fn from(mesh: Mesh) -> Self {
        Drawable::Mesh(mesh)
    }
}

impl From<Group> for Drawable {
    fn from(group: Group) -> Self {
        Drawable::Group(group)
    }
}

/// The ordered top-level drawables of the application.
#[derive(Debug, Default)]
pub struct Scene {
    drawables: Vec<Drawable>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&mut self, drawable: impl Into<Drawable>) {
        let drawable = drawable.into();
        if !drawable.is_initialized() {
            log::warn!(
                "{} was added to the scene before it was initialized and will not be drawn.",
                drawable.name()
            );
        }
        self.drawables.push(drawable);
    }

    pub fn drawables(&self) -> &[Drawable] {
        &self.drawables
    }

    pub fn groups(&self) -> impl Iterator<Item = &Group> {
        self.drawables.iter().filter_map(|drawable| match drawable {
            Drawable::Group(group) => Some(group),
            Drawable::Mesh(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.drawables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drawables.is_empty()
    }

    /// Everything needed to draw the scene from `camera` this frame.
    pub fn render(&self, camera: &Camera) -> SceneRender {
        let mut calls = Vec::new();
        let root = cgmath::Matrix4::identity();
        for drawable in &self.drawables {
            drawable.collect(&root, &mut calls);
        }
        SceneRender {
            camera: CameraUniform::from_camera(camera),
            calls,
        }
    }
}
