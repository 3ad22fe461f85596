#[cfg(feature = "integration-tests")]
mod common;

#[cfg(feature = "integration-tests")]
mod gpu {
    use cgmath::Deg;
    use instant::Duration;
    use render_engine::{
        camera::{Camera, Projection},
        data_structures::{
            model::MaterialData,
            scene_graph::{Group, Mesh, Scene},
            texture::Texture,
        },
        frame::Frame,
        offscreen::{OffscreenDescriptor, OffscreenTarget},
        pipelines::{basic::SceneRenderer, light::LightUniform, post::PostStage},
        post::{PostUniform, ShaderMode},
        resources::arena::{GpuArena, MaterialHandle, Uploader},
    };

    use crate::common::test_utils::triangle;

    const SIZE: u32 = 64;
    const CLEAR: wgpu::Color = wgpu::Color {
        r: 0.0,
        g: 0.0,
        b: 0.4,
        a: 1.0,
    };

    async fn headless_device() -> (wgpu::Device, wgpu::Queue) {
        let instance = wgpu::Instance::default();
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .expect("No adapter available for headless rendering");
        adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .expect("Failed to create a device")
    }

    fn camera() -> Camera {
        Camera::new(
            (0.0, 0.0, 0.0),
            Deg(-90.0),
            Deg(0.0),
            Projection::new(SIZE, SIZE, Deg(45.0), 0.1, 1000.0),
        )
    }

    /// Renders `scene` through the whole frame and reads the composited output back.
    async fn render_to_pixels(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        arena: &GpuArena,
        scene: &Scene,
        mode: ShaderMode,
    ) -> image::RgbaImage {
        let target = OffscreenTarget::new(device, OffscreenDescriptor::new(SIZE, SIZE)).unwrap();
        let camera = camera();
        let mut renderer = SceneRenderer::new(
            device,
            target.descriptor(),
            arena.material_layout(),
            &camera,
            LightUniform::new([0.0, 0.0, 10.0], [1.0, 1.0, 1.0]),
        );
        let output_format = wgpu::TextureFormat::Rgba8UnormSrgb;
        let post = PostStage::new(device, output_format, &target.color);
        let output = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Test Output Texture"),
            size: wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: output_format,
            usage: wgpu::TextureUsages::COPY_SRC | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        // 64 pixels * 4 bytes is a multiple of the 256 byte row alignment
        let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: None,
            size: (SIZE * SIZE * 4) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let render = scene.render(&camera);
        renderer.prepare(device, queue, &render);
        let view = output.create_view(&wgpu::TextureViewDescriptor::default());
        let mut frame = Frame::headless(device, queue, view, CLEAR)
            .render_scene(&target, &renderer, arena, &render)
            .composite(&post, &PostUniform::new(mode, 0.0));
        frame.encoder().copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &output,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &output_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(SIZE * 4),
                    rows_per_image: Some(SIZE),
                },
            },
            wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
        );
        frame.present();

        let (tx, rx) = futures_intrusive::channel::shared::oneshot_channel();
        let buffer_slice = output_buffer.slice(..);
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).unwrap();
        });
        device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: Some(Duration::from_secs(3)),
            })
            .unwrap();
        rx.receive().await.unwrap().unwrap();
        let data = buffer_slice.get_mapped_range().to_vec();
        output_buffer.unmap();
        image::RgbaImage::from_raw(SIZE, SIZE, data).unwrap()
    }

    #[tokio::test]
    async fn should_composite_the_clear_colour() {
        let (device, queue) = headless_device().await;
        let arena = GpuArena::new(&device, &queue);

        let img = render_to_pixels(&device, &queue, &arena, &Scene::new(), ShaderMode::Passthrough).await;

        for pixel in img.pixels() {
            assert_eq!(pixel[0], 0);
            assert_eq!(pixel[1], 0);
            assert!(pixel[2] > 150, "{:?}", pixel);
        }
    }

    #[tokio::test]
    async fn should_invert_the_offscreen_image() {
        let (device, queue) = headless_device().await;
        let arena = GpuArena::new(&device, &queue);

        let img = render_to_pixels(&device, &queue, &arena, &Scene::new(), ShaderMode::Invert).await;

        for pixel in img.pixels() {
            assert_eq!(pixel[0], 255);
            assert_eq!(pixel[1], 255);
            assert!(pixel[2] < 255);
        }
    }

    #[tokio::test]
    async fn should_draw_a_triangle_into_the_offscreen_target() {
        let (device, queue) = headless_device().await;
        let mut arena = GpuArena::new(&device, &queue);
        let mut group = Group::new("triangle");
        group.add_child(Mesh::new(triangle("tri", 3.0, -5.0))).unwrap();
        group.init(&mut arena).unwrap();
        let mut scene = Scene::new();
        scene.add_object(group);

        let img = render_to_pixels(&device, &queue, &arena, &scene, ShaderMode::Passthrough).await;

        let center = img.get_pixel(SIZE / 2, SIZE / 2);
        assert!(center[0] > 0, "{:?}", center);
        let corner = img.get_pixel(0, 0);
        assert_eq!(corner[0], 0);
    }

    #[tokio::test]
    async fn should_clear_the_output_to_the_clear_colour() {
        let (device, queue) = headless_device().await;
        let arena = GpuArena::new(&device, &queue);
        let target = OffscreenTarget::new(&device, OffscreenDescriptor::new(SIZE, SIZE)).unwrap();
        let renderer = SceneRenderer::new(
            &device,
            target.descriptor(),
            arena.material_layout(),
            &camera(),
            LightUniform::new([0.0, 0.0, 10.0], [1.0, 1.0, 1.0]),
        );
        let post = PostStage::new(&device, wgpu::TextureFormat::Rgba8UnormSrgb, &target.color);
        let render = Scene::new().render(&camera());

        let output = device.create_texture(&wgpu::TextureDescriptor {
            label: None,
            size: wgpu::Extent3d {
                width: SIZE,
                height: SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let frame = Frame::headless(&device, &queue, output.create_view(&Default::default()), CLEAR)
            .render_scene(&target, &renderer, &arena, &render)
            .composite(&post, &PostUniform::new(ShaderMode::Passthrough, 0.0));
        assert_eq!(frame.clear_colour(), CLEAR);
        frame.present();
    }

    #[tokio::test]
    async fn should_refuse_textures_larger_than_the_device_allows() {
        let (device, queue) = headless_device().await;
        let max_dimension = device.limits().max_texture_dimension_2d;

        let wide = image::RgbaImage::new(max_dimension + 1, 1);
        assert!(Texture::from_image(&device, &queue, &wide, Some("wide")).is_err());
        let tall = image::RgbaImage::new(1, max_dimension + 1);
        assert!(Texture::from_image(&device, &queue, &tall, Some("tall")).is_err());
        let fits = image::RgbaImage::new(max_dimension, 1);
        assert!(Texture::from_image(&device, &queue, &fits, Some("fits")).is_ok());
    }

    #[tokio::test]
    async fn should_use_the_flat_colour_for_an_oversized_diffuse_map() {
        let (device, queue) = headless_device().await;
        let mut arena = GpuArena::new(&device, &queue);
        let max_dimension = device.limits().max_texture_dimension_2d;
        let material = MaterialData {
            name: "earth".to_string(),
            diffuse_texture: Some(image::RgbaImage::new(max_dimension + 1, 1)),
            ..Default::default()
        };

        let handle = arena.upload_material(&material).unwrap();

        assert_eq!(handle, MaterialHandle(0));
        assert!(arena.material(handle).is_some());
    }

    #[tokio::test]
    async fn should_refuse_an_empty_offscreen_target() {
        let (device, _queue) = headless_device().await;

        assert!(OffscreenTarget::new(&device, OffscreenDescriptor::new(0, 0)).is_err());
    }
}
