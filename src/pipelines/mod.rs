//! Render pipelines and the light uniform they share.

pub mod basic;
pub mod ground;
pub mod light;

#[derive(Debug)]
pub struct Pipelines {
    pub model: wgpu::RenderPipeline,
    pub ground: wgpu::RenderPipeline,
}
