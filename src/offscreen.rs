//! The single off-screen render target the scene is drawn into.
//!
//! The target is one colour texture and one depth texture of a fixed size. It
//! is validated before any GPU object is created; a target that could never be
//! rendered into is a setup error, not something to retry each frame.

use std::fmt;

use crate::data_structures::texture::Texture;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IncompleteReason {
    ZeroSize,
    TooLarge { max_dimension: u32 },
    ColorFormatNotRenderable(wgpu::TextureFormat),
    MissingDepthAspect(wgpu::TextureFormat),
}

impl fmt::Display for IncompleteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncompleteReason::ZeroSize => f.write_str("the target has a zero-sized dimension"),
            IncompleteReason::TooLarge { max_dimension } => {
                write!(f, "the target exceeds the maximum texture size of {max_dimension}")
            }
            IncompleteReason::ColorFormatNotRenderable(format) => {
                write!(f, "{format:?} cannot be used as a colour attachment")
            }
            IncompleteReason::MissingDepthAspect(format) => {
                write!(f, "{format:?} has no depth aspect")
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetStatus {
    Complete,
    Incomplete(IncompleteReason),
}

impl TargetStatus {
    pub fn is_complete(&self) -> bool {
        matches!(self, TargetStatus::Complete)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OffscreenDescriptor {
    pub width: u32,
    pub height: u32,
    pub color_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
}

impl OffscreenDescriptor {
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            color_format: Self::COLOR_FORMAT,
            depth_format: Texture::DEPTH_FORMAT,
        }
    }

    /// Completeness check against the device's largest supported 2D texture.
    pub fn status(&self, max_dimension: u32) -> TargetStatus {
        if self.width == 0 || self.height == 0 {
            return TargetStatus::Incomplete(IncompleteReason::ZeroSize);
        }
        if self.width > max_dimension || self.height > max_dimension {
            return TargetStatus::Incomplete(IncompleteReason::TooLarge { max_dimension });
        }
        if self.color_format.is_depth_stencil_format() {
            return TargetStatus::Incomplete(IncompleteReason::ColorFormatNotRenderable(
                self.color_format,
            ));
        }
        if !self.depth_format.has_depth_aspect() {
            return TargetStatus::Incomplete(IncompleteReason::MissingDepthAspect(
                self.depth_format,
            ));
        }
        TargetStatus::Complete
    }
}

/// Colour and depth attachments of the scene pass.
#[derive(Debug)]
pub struct OffscreenTarget {
    descriptor: OffscreenDescriptor,
    pub color: Texture,
    pub depth: Texture,
}

impl OffscreenTarget {
    /// Creates the target, refusing configurations that fail [`OffscreenDescriptor::status`].
    pub fn new(device: &wgpu::Device, descriptor: OffscreenDescriptor) -> anyhow::Result<Self> {
        let max_dimension = device.limits().max_texture_dimension_2d;
        if let TargetStatus::Incomplete(reason) = descriptor.status(max_dimension) {
            anyhow::bail!(
                "offscreen target {}x{} is incomplete: {}",
                descriptor.width,
                descriptor.height,
                reason
            );
        }
        let size = [descriptor.width, descriptor.height];
        let color = Texture::create_render_target(
            device,
            size,
            descriptor.color_format,
            "offscreen_color",
        );
        let depth =
            Texture::create_depth_texture(device, size, descriptor.depth_format, "offscreen_depth");
        log::info!(
            "Offscreen target {}x{} ({:?} + {:?})",
            descriptor.width,
            descriptor.height,
            descriptor.color_format,
            descriptor.depth_format
        );
        Ok(Self {
            descriptor,
            color,
            depth,
        })
    }

    pub fn descriptor(&self) -> &OffscreenDescriptor {
        &self.descriptor
    }

    pub fn size(&self) -> (u32, u32) {
        (self.descriptor.width, self.descriptor.height)
    }
}
