use std::path::{Path, PathBuf};

use render_engine::{
    data_structures::model::{MaterialData, MeshData, ModelVertex},
    resources::arena::{MaterialHandle, MeshHandle, Uploader},
};

/// Records every upload instead of talking to a GPU.
#[derive(Debug, Default)]
pub struct RecordingUploader {
    pub meshes: Vec<(String, usize)>,
    pub materials: Vec<String>,
    pub default_material: Option<MaterialHandle>,
    pub fail_meshes: bool,
}

impl RecordingUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail_meshes: true,
            ..Self::default()
        }
    }
}

impl Uploader for RecordingUploader {
    fn upload_mesh(&mut self, mesh: &MeshData) -> anyhow::Result<MeshHandle> {
        if self.fail_meshes {
            anyhow::bail!("refusing to upload {}", mesh.name);
        }
        self.meshes.push((mesh.name.clone(), mesh.indices.len()));
        Ok(MeshHandle(self.meshes.len() - 1))
    }

    fn upload_material(&mut self, material: &MaterialData) -> anyhow::Result<MaterialHandle> {
        self.materials.push(material.name.clone());
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

/// A single counter-clockwise triangle in the z = `z` plane.
pub fn triangle(name: &str, size: f32, z: f32) -> MeshData {
    let vertex = |x: f32, y: f32, u: f32, v: f32| ModelVertex {
        position: [x, y, z],
        tex_coords: [u, v],
        normal: [0.0, 0.0, 1.0],
    };
    MeshData {
        name: name.to_string(),
        vertices: vec![
            vertex(-size, -size, 0.0, 1.0),
            vertex(size, -size, 1.0, 1.0),
            vertex(0.0, size, 0.5, 0.0),
        ],
        indices: vec![0, 1, 2],
        material: None,
    }
}

pub const TRIANGLE_OBJ: &str = "\
o triangle
v -1.0 -1.0 0.0
v 1.0 -1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 0.5 1.0
f 1/1 2/2 3/3
";

pub const TEXTURED_QUAD_OBJ: &str = "\
mtllib quad.mtl
o quad
v -1.0 -1.0 0.0
v 1.0 -1.0 0.0
v 1.0 1.0 0.0
v -1.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vt 1.0 1.0
vt 0.0 1.0
vn 0.0 0.0 1.0
usemtl red
f 1/1/1 2/2/1 3/3/1 4/4/1
";

pub const QUAD_MTL: &str = "\
newmtl red
Ka 0.2 0.0 0.0
Kd 1.0 0.0 0.0
Ks 0.5 0.5 0.5
Ns 16.0
d 0.5
map_Kd missing_texture.png
";

/// An empty directory below the system temp dir, unique to this test and process.
pub fn fixture_dir(test_name: &str) -> PathBuf {
    let dir = std::env::temp_dir()
        .join("render-engine-tests")
        .join(format!("{}-{}", test_name, std::process::id()));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}
