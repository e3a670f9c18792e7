use crate::data_structures::{
    model::{ModelVertex, Vertex},
    texture::Texture,
};

/// Unlit, double-sided pipeline for the floor plane.
///
/// Bind groups: 0 camera, 1 ground colour.
pub fn mk_ground_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    ground_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Ground Pipeline Layout"),
        bind_group_layouts: &[camera_bind_group_layout, ground_bind_group_layout],
        push_constant_ranges: &[],
    });
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Ground Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("ground.wgsl").into()),
    };
    crate::pipelines::basic::mk_render_pipeline(
        device,
        &layout,
        config.format,
        Some(wgpu::BlendState {
            alpha: wgpu::BlendComponent::REPLACE,
            color: wgpu::BlendComponent::REPLACE,
        }),
        Some(Texture::DEPTH_FORMAT),
        &[ModelVertex::desc()],
        None,
        shader,
    )
}
