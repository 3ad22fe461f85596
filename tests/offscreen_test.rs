use render_engine::{
    config::Config,
    offscreen::{IncompleteReason, OffscreenDescriptor, TargetStatus},
};

const MAX_DIMENSION: u32 = 8192;

#[test]
fn should_accept_the_default_target() {
    let descriptor = Config::default().offscreen_descriptor();

    assert_eq!((descriptor.width, descriptor.height), (1024, 768));
    assert_eq!(descriptor.color_format, wgpu::TextureFormat::Rgba8UnormSrgb);
    assert_eq!(descriptor.depth_format, wgpu::TextureFormat::Depth32Float);
    assert!(descriptor.status(MAX_DIMENSION).is_complete());
}

#[test]
fn should_reject_zero_sized_targets() {
    for (width, height) in [(0, 768), (1024, 0), (0, 0)] {
        let status = OffscreenDescriptor::new(width, height).status(MAX_DIMENSION);
        assert_eq!(status, TargetStatus::Incomplete(IncompleteReason::ZeroSize));
    }
}

#[test]
fn should_reject_targets_above_the_device_limit() {
    let status = OffscreenDescriptor::new(MAX_DIMENSION + 1, 16).status(MAX_DIMENSION);

    assert_eq!(
        status,
        TargetStatus::Incomplete(IncompleteReason::TooLarge {
            max_dimension: MAX_DIMENSION
        })
    );
    assert!(OffscreenDescriptor::new(MAX_DIMENSION, MAX_DIMENSION)
        .status(MAX_DIMENSION)
        .is_complete());
}

#[test]
fn should_reject_unusable_formats() {
    let mut descriptor = OffscreenDescriptor::new(64, 64);
    descriptor.color_format = wgpu::TextureFormat::Depth24Plus;
    assert_eq!(
        descriptor.status(MAX_DIMENSION),
        TargetStatus::Incomplete(IncompleteReason::ColorFormatNotRenderable(
            wgpu::TextureFormat::Depth24Plus
        ))
    );

    let mut descriptor = OffscreenDescriptor::new(64, 64);
    descriptor.depth_format = wgpu::TextureFormat::Rgba8Unorm;
    assert!(!descriptor.status(MAX_DIMENSION).is_complete());
}

#[test]
fn should_describe_why_a_target_is_incomplete() {
    let reason = IncompleteReason::TooLarge { max_dimension: 2048 };
    assert!(reason.to_string().contains("2048"));
    assert!(IncompleteReason::ZeroSize.to_string().contains("zero"));
}
