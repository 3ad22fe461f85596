//! One frame of rendering as a chain of typed stages.
//!
//! A frame first draws the scene into the offscreen target, then composites the
//! offscreen colour texture onto the output through the post stage, and is
//! finally presented. Each step consumes the frame and returns it in the next
//! stage, so passes cannot be recorded out of order or skipped.

use std::marker::PhantomData;

use crate::{
    context::Context,
    offscreen::OffscreenTarget,
    pipelines::{basic::SceneRenderer, post::PostStage},
    post::PostUniform,
    render::SceneRender,
    resources::arena::GpuArena,
};

/// The scene pass has not been recorded yet.
#[derive(Debug)]
pub struct Offscreen;
/// The scene is in the offscreen target; the composite pass is next.
#[derive(Debug)]
pub struct Composite;
/// Both passes are recorded.
#[derive(Debug)]
pub struct Present;

pub struct Frame<'c, S> {
    queue: &'c wgpu::Queue,
    surface_texture: Option<wgpu::SurfaceTexture>,
    view: wgpu::TextureView,
    encoder: wgpu::CommandEncoder,
    clear_colour: wgpu::Color,
    _stage: PhantomData<S>,
}

impl<S> Frame<'_, S> {
    /// Both the offscreen target and the output are cleared to this colour.
    pub fn clear_colour(&self) -> wgpu::Color {
        self.clear_colour
    }
}

impl<'c> Frame<'c, Offscreen> {
    /// Starts a frame that ends up in the window's next surface texture.
    pub fn begin(ctx: &'c Context) -> Result<Self, wgpu::SurfaceError> {
        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        Ok(Self::new(
            &ctx.device,
            &ctx.queue,
            Some(output),
            view,
            ctx.clear_colour,
        ))
    }

    /// Starts a frame that composites into `view` instead of a window surface.
    pub fn headless(
        device: &'c wgpu::Device,
        queue: &'c wgpu::Queue,
        view: wgpu::TextureView,
        clear_colour: wgpu::Color,
    ) -> Self {
        Self::new(device, queue, None, view, clear_colour)
    }

    fn new(
        device: &'c wgpu::Device,
        queue: &'c wgpu::Queue,
        surface_texture: Option<wgpu::SurfaceTexture>,
        view: wgpu::TextureView,
        clear_colour: wgpu::Color,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Render Encoder"),
        });
        Self {
            queue,
            surface_texture,
            view,
            encoder,
            clear_colour,
            _stage: PhantomData,
        }
    }

    /// Clears the offscreen target and draws every call of `render` into it.
    ///
    /// The renderer must already be prepared with `render`.
    pub fn render_scene(
        mut self,
        target: &OffscreenTarget,
        renderer: &SceneRenderer,
        arena: &GpuArena,
        render: &SceneRender,
    ) -> Frame<'c, Composite> {
        {
            let mut render_pass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.color.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &target.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });
            renderer.draw(&mut render_pass, arena, render);
        }
        self.advance()
    }
}

impl<'c> Frame<'c, Composite> {
    /// Draws the offscreen colour texture onto the output with the current post effect.
    pub fn composite(mut self, post: &PostStage, uniform: &PostUniform) -> Frame<'c, Present> {
        post.write(self.queue, uniform);
        {
            let mut render_pass = self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Composite Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                ..Default::default()
            });
            post.draw(&mut render_pass);
        }
        self.advance()
    }
}

impl Frame<'_, Present> {
    /// Gives access to the encoder after both passes, e.g. to copy the output out.
    pub fn encoder(&mut self) -> &mut wgpu::CommandEncoder {
        &mut self.encoder
    }

    /// Submits the recorded passes and shows the surface texture, if any.
    pub fn present(self) -> wgpu::SubmissionIndex {
        let index = self.queue.submit(std::iter::once(self.encoder.finish()));
        if let Some(output) = self.surface_texture {
            output.present();
        }
        index
    }
}

impl<'c, S> Frame<'c, S> {
    fn advance<N>(self) -> Frame<'c, N> {
        Frame {
            queue: self.queue,
            surface_texture: self.surface_texture,
            view: self.view,
            encoder: self.encoder,
            clear_colour: self.clear_colour,
            _stage: PhantomData,
        }
    }
}
