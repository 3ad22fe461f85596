use cgmath::SquareMatrix;
use wgpu::util::DeviceExt;

use crate::{
    camera::{Camera, CameraResources},
    data_structures::{
        instance::InstanceRaw,
        model::{self, DrawMesh, Vertex},
    },
    offscreen::OffscreenDescriptor,
    pipelines::light::{LightResources, LightUniform},
    render::SceneRender,
    resources::arena::GpuArena,
};

pub fn mk_scene_pipeline(
    device: &wgpu::Device,
    target: &OffscreenDescriptor,
    material_bind_group_layout: &wgpu::BindGroupLayout,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    light_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Scene Pipeline Layout"),
        bind_group_layouts: &[
            material_bind_group_layout,
            camera_bind_group_layout,
            light_bind_group_layout,
        ],
        immediate_size: 0,
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Scene Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
    };

    mk_render_pipeline(
        device,
        &render_pipeline_layout,
        target.color_format,
        // Blend with what is already drawn so dissolve < 1 is see-through
        Some(wgpu::BlendState::ALPHA_BLENDING),
        Some(target.depth_format),
        Some(wgpu::Face::Back),
        &[model::ModelVertex::desc(), InstanceRaw::desc()],
        shader,
    )
}

#[allow(clippy::too_many_arguments)]
pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_format: Option<wgpu::TextureFormat>,
    cull_mode: Option<wgpu::Face>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: wgpu::ShaderModuleDescriptor,
) -> wgpu::RenderPipeline {
    let shader = device.create_shader_module(shader);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: Some("Render Pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview_mask: None,
    })
}

/// The scene pipeline with the camera, light and instance buffers it reads.
pub struct SceneRenderer {
    pipeline: wgpu::RenderPipeline,
    pub camera: CameraResources,
    pub light: LightResources,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
}

impl SceneRenderer {
    pub fn new(
        device: &wgpu::Device,
        target: &OffscreenDescriptor,
        material_bind_group_layout: &wgpu::BindGroupLayout,
        camera: &Camera,
        light: LightUniform,
    ) -> Self {
        let camera = CameraResources::new(device, camera);
        let light = LightResources::new(device, light);
        let pipeline = mk_scene_pipeline(
            device,
            target,
            material_bind_group_layout,
            &camera.bind_group_layout,
            &light.bind_group_layout,
        );
        let instance_capacity = 1;
        let instance_buffer = mk_instance_buffer(device, instance_capacity);
        Self {
            pipeline,
            camera,
            light,
            instance_buffer,
            instance_capacity,
        }
    }

    /// Writes the camera and all model matrices of this frame.
    ///
    /// Must run before the scene pass is recorded. The instance buffer only grows.
    pub fn prepare(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, render: &SceneRender) {
        self.camera.write(queue, &render.camera);
        let instances = render.instances();
        if instances.len() > self.instance_capacity {
            self.instance_capacity = instances.len().next_power_of_two();
            self.instance_buffer = mk_instance_buffer(device, self.instance_capacity);
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, arena: &GpuArena, render: &SceneRender) {
        if render.is_empty() {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        for (slot, call) in render.calls.iter().enumerate() {
            let (Some(mesh), Some(material)) = (arena.mesh(call.mesh), arena.material(call.material))
            else {
                log::warn!("Skipping draw call with unknown resources {:?}", call);
                continue;
            };
            render_pass.draw_mesh(
                mesh,
                material,
                slot as u32,
                &self.camera.bind_group,
                &self.light.bind_group,
            );
        }
    }
}

fn mk_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Instance Buffer"),
        contents: bytemuck::cast_slice(&vec![InstanceRaw::from_world(&cgmath::Matrix4::identity()); capacity]),
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
    })
}
