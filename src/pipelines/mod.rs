//! Render pipelines: the lit scene pass and the post-processing composite pass.

pub mod basic;
pub mod light;
pub mod post;
