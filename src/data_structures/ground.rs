//! The unlit floor plane the vehicles stand on.

use wgpu::util::DeviceExt;

use crate::{data_structures::model::ModelVertex, showroom::style::Rgb};

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct GroundUniform {
    color: [f32; 4],
}

/// A square in the y = 0 plane centred on the origin.
#[derive(Debug)]
pub struct Ground {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_indices: u32,
    pub bind_group: wgpu::BindGroup,
}

/// Corner vertices of a `size` x `size` square, wound counter-clockwise
/// when seen from above.
pub fn plane_vertices(size: f32) -> [ModelVertex; 4] {
    let h = size / 2.0;
    let vertex = |x: f32, z: f32, u: f32, v: f32| ModelVertex {
        position: [x, 0.0, z],
        tex_coords: [u, v],
        normal: [0.0, 1.0, 0.0],
    };
    [
        vertex(-h, -h, 0.0, 0.0),
        vertex(-h, h, 0.0, 1.0),
        vertex(h, h, 1.0, 1.0),
        vertex(h, -h, 1.0, 0.0),
    ]
}

const PLANE_INDICES: [u16; 6] = [0, 1, 2, 0, 2, 3];

impl Ground {
    pub fn new(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        size: f32,
        color: Rgb,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ground Vertex Buffer"),
            contents: bytemuck::cast_slice(&plane_vertices(size)),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ground Index Buffer"),
            contents: bytemuck::cast_slice(&PLANE_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        let [r, g, b] = color.to_linear();
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ground Uniform Buffer"),
            contents: bytemuck::cast_slice(&[GroundUniform {
                color: [r, g, b, 1.0],
            }]),
            usage: wgpu::BufferUsages::UNIFORM,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("ground_bind_group"),
        });

        Self {
            vertex_buffer,
            index_buffer,
            num_indices: PLANE_INDICES.len() as u32,
            bind_group,
        }
    }
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("ground_bind_group_layout"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane_spans_requested_size() {
        let vertices = plane_vertices(1000.0);
        let xs: Vec<f32> = vertices.iter().map(|v| v.position[0]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 500.0);
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), -500.0);
        assert!(vertices.iter().all(|v| v.position[1] == 0.0));
    }
}
