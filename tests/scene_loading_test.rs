use render_engine::{
    config::{Config, DEFAULT_MODELS},
    resources::{build_scene, import_all, load_model_obj, load_scene},
};

use crate::common::test_utils::{
    QUAD_MTL, RecordingUploader, TEXTURED_QUAD_OBJ, TRIANGLE_OBJ, fixture_dir, write_file,
};

mod common;

#[tokio::test]
async fn should_load_one_group_per_valid_model() {
    let dir = fixture_dir("valid_and_invalid");
    let first = write_file(&dir, "first.obj", TRIANGLE_OBJ);
    let second = write_file(&dir, "second.obj", TRIANGLE_OBJ);
    let empty = write_file(&dir, "empty.obj", "# no faces in here\n");
    let missing = dir.join("missing.obj");

    let mut uploader = RecordingUploader::new();
    let scene = load_scene(&[first.clone(), missing, second.clone(), empty], &dir, &mut uploader).await;

    assert_eq!(scene.len(), 2);
    let names: Vec<_> = scene.groups().map(|group| group.name().to_string()).collect();
    assert_eq!(
        names,
        vec![first.to_string_lossy().to_string(), second.to_string_lossy().to_string()]
    );
    assert!(scene.drawables().iter().all(|drawable| drawable.is_initialized()));
    assert_eq!(uploader.meshes.len(), 2);
}

#[tokio::test]
async fn should_load_the_default_models_from_the_asset_dir() {
    let dir = fixture_dir("default_models");
    for name in DEFAULT_MODELS {
        write_file(&dir, name, TRIANGLE_OBJ);
    }
    let config = Config::from_args(Vec::<String>::new());

    let mut uploader = RecordingUploader::new();
    let scene = load_scene(&config.models, &dir, &mut uploader).await;

    assert_eq!(scene.len(), 4);
    let names: Vec<_> = scene.groups().map(|group| group.name().to_string()).collect();
    assert_eq!(names, DEFAULT_MODELS.to_vec());
}

#[tokio::test]
async fn should_fail_on_files_without_geometry() {
    let dir = fixture_dir("no_geometry");
    let path = write_file(&dir, "points.obj", "v 0 0 0\nv 1 0 0\n");

    let err = load_model_obj(&path, &dir).await.unwrap_err();

    assert!(format!("{:#}", err).contains("contains no geometry"));
}

#[tokio::test]
async fn should_flip_texture_v_and_compute_missing_normals() {
    let dir = fixture_dir("triangle");
    let path = write_file(&dir, "triangle.obj", TRIANGLE_OBJ);

    let model = load_model_obj(&path, &dir).await.unwrap();

    assert_eq!(model.meshes.len(), 1);
    let mesh = &model.meshes[0];
    assert!(mesh.name.ends_with("/triangle"));
    assert_eq!(mesh.indices.len(), 3);
    assert_eq!(mesh.vertices[0].tex_coords, [0.0, 1.0]);
    assert_eq!(mesh.vertices[2].tex_coords, [0.5, 0.0]);
    for vertex in &mesh.vertices {
        assert!((vertex.normal[2] - 1.0).abs() < 1e-6);
    }
    assert!(model.materials.is_empty());
}

#[tokio::test]
async fn should_keep_material_when_its_texture_is_missing() {
    let dir = fixture_dir("textured_quad");
    write_file(&dir, "quad.mtl", QUAD_MTL);
    let path = write_file(&dir, "quad.obj", TEXTURED_QUAD_OBJ);

    let model = load_model_obj(&path, &dir).await.unwrap();

    assert_eq!(model.materials.len(), 1);
    let material = &model.materials[0];
    assert_eq!(material.name, "red");
    assert_eq!(material.diffuse, [1.0, 0.0, 0.0]);
    assert_eq!(material.dissolve, 0.5);
    assert!(material.diffuse_texture.is_none());
    // The quad is triangulated
    assert_eq!(model.meshes[0].indices.len(), 6);
    assert_eq!(model.meshes[0].material, Some(0));
}

#[tokio::test]
async fn should_load_without_materials_when_the_mtl_is_missing() {
    let dir = fixture_dir("missing_mtl");
    let path = write_file(&dir, "quad.obj", TEXTURED_QUAD_OBJ);

    let imports = import_all(&[path], &dir).await;
    assert_eq!(imports.len(), 1);
    assert!(imports[0].materials.is_empty());

    let mut uploader = RecordingUploader::new();
    let scene = build_scene(imports, &mut uploader);

    assert_eq!(scene.len(), 1);
    assert_eq!(uploader.materials, vec!["default".to_string()]);
}

#[tokio::test]
async fn should_skip_models_that_fail_to_upload() {
    let dir = fixture_dir("failing_upload");
    let path = write_file(&dir, "triangle.obj", TRIANGLE_OBJ);

    let mut uploader = RecordingUploader::failing();
    let scene = load_scene(&[path], &dir, &mut uploader).await;

    assert!(scene.is_empty());
}
