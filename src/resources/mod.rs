use std::{
    io::{BufReader, Cursor},
    path::{Path, PathBuf},
};

use anyhow::Context as _;

use crate::{
    data_structures::{
        model::{MaterialData, MeshData},
        scene_graph::{Group, Scene},
    },
    resources::{
        arena::Uploader,
        texture::{load_image, load_string, resolve_path},
    },
};

/**
 * This module contains all logic for loading meshes, materials and textures from external files.
 */
pub mod arena;
pub mod mesh;
pub mod texture;

/// CPU-side result of importing one model file.
#[derive(Debug)]
pub struct ImportedModel {
    pub name: String,
    pub meshes: Vec<MeshData>,
    pub materials: Vec<MaterialData>,
}

pub async fn load_model_obj(file_name: &Path, asset_dir: &Path) -> anyhow::Result<ImportedModel> {
    let path = resolve_path(file_name, asset_dir);
    let name = file_name.to_string_lossy().to_string();
    let obj_text = load_string(&path).await?;
    let obj_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let mut obj_reader = BufReader::new(Cursor::new(obj_text));

    let (models, obj_materials) = tobj::load_obj_buf_async(
        &mut obj_reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |p| {
            let mtl_path = obj_dir.join(&p);
            async move {
                match load_string(&mtl_path).await {
                    Ok(mat_text) => tobj::load_mtl_buf(&mut BufReader::new(Cursor::new(mat_text))),
                    Err(e) => {
                        log::warn!("{:#}", e);
                        Err(tobj::LoadError::OpenFileFailed)
                    }
                }
            }
        },
    )
    .await
    .with_context(|| format!("parsing {}", path.display()))?;

    let obj_materials = match obj_materials {
        Ok(materials) => materials,
        Err(e) => {
            log::warn!("Materials of {} could not be loaded ({}), using the default material.", name, e);
            Vec::new()
        }
    };

    let mut materials = Vec::with_capacity(obj_materials.len());
    for m in obj_materials {
        materials.push(load_material(m, &obj_dir).await);
    }

    let meshes: Vec<MeshData> = mesh::load_meshes(&models, &name)
        .into_iter()
        .filter(|mesh| !mesh.is_empty())
        .collect();
    anyhow::ensure!(!meshes.is_empty(), "{} contains no geometry", path.display());

    log::info!(
        "Loaded {} ({} meshes, {} materials)",
        name,
        meshes.len(),
        materials.len()
    );
    Ok(ImportedModel {
        name,
        meshes,
        materials,
    })
}

async fn load_material(m: tobj::Material, obj_dir: &Path) -> MaterialData {
    let defaults = MaterialData::default();
    let diffuse_texture = match &m.diffuse_texture {
        Some(texture_name) => {
            let texture_path = obj_dir.join(texture_name);
            match load_image(&texture_path).await {
                Ok(img) => Some(img),
                Err(e) => {
                    log::warn!(
                        "Diffuse map of material {} not usable, falling back to its flat colour: {:#}",
                        m.name,
                        e
                    );
                    None
                }
            }
        }
        None => None,
    };
    MaterialData {
        ambient: m.ambient.unwrap_or(defaults.ambient),
        diffuse: m.diffuse.unwrap_or(defaults.diffuse),
        specular: m.specular.unwrap_or(defaults.specular),
        shininess: m.shininess.unwrap_or(defaults.shininess),
        dissolve: m.dissolve.unwrap_or(defaults.dissolve),
        diffuse_texture,
        name: m.name,
    }
}

/// Imports all files concurrently. Files that fail are logged and left out.
pub async fn import_all(paths: &[PathBuf], asset_dir: &Path) -> Vec<ImportedModel> {
    let results = futures::future::join_all(paths.iter().map(|p| load_model_obj(p, asset_dir))).await;
    results
        .into_iter()
        .zip(paths)
        .filter_map(|(result, path)| match result {
            Ok(model) => Some(model),
            Err(e) => {
                log::error!("Skipping {}: {:#}", path.display(), e);
                None
            }
        })
        .collect()
}

/// One initialized group per imported model, in import order.
pub fn build_scene(imports: Vec<ImportedModel>, uploader: &mut dyn Uploader) -> Scene {
    let mut scene = Scene::new();
    for model in imports {
        let mut group = Group::from_import(model);
        match group.init(uploader) {
            Ok(()) => scene.add_object(group),
            Err(e) => log::error!("Skipping {}: {:#}", group.name(), e),
        }
    }
    scene
}

pub async fn load_scene(paths: &[PathBuf], asset_dir: &Path, uploader: &mut dyn Uploader) -> Scene {
    let imports = import_all(paths, asset_dir).await;
    let scene = build_scene(imports, uploader);
    log::info!("Scene holds {} of {} models", scene.len(), paths.len());
    scene
}
