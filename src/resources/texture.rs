use std::path::{Path, PathBuf};

use anyhow::Context as _;

pub fn material_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    multisampled: false,
                    view_dimension: wgpu::TextureViewDimension::D2,
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 2,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            },
        ],
        label: Some("Model material_bind_group_layout"),
    })
}

/// Resolve a model or texture path.
///
/// The path is used as given when it exists. Relative paths that don't exist are
/// looked up below `asset_dir` instead.
pub fn resolve_path(file_name: &Path, asset_dir: &Path) -> PathBuf {
    if file_name.exists() || file_name.is_absolute() {
        return file_name.to_path_buf();
    }
    let in_assets = asset_dir.join(file_name);
    if in_assets.exists() {
        in_assets
    } else {
        file_name.to_path_buf()
    }
}

pub async fn load_string(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

pub async fn load_binary(path: &Path) -> anyhow::Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))
}

/// Read and decode an image file into RGBA8 pixels.
pub async fn load_image(path: &Path) -> anyhow::Result<image::RgbaImage> {
    let data = load_binary(path).await?;
    let img = image::load_from_memory(&data)
        .with_context(|| format!("decoding {}", path.display()))?;
    Ok(img.to_rgba8())
}
