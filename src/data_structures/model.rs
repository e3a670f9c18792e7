//! Meshes, materials and the draw helpers for them.

use std::ops::Range;

use wgpu::util::DeviceExt;

use crate::{
    data_structures::texture::Texture,
    showroom::{style::Rgb, updater::Surface},
};

pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 5]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}

#[derive(Debug)]
pub struct Mesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
    /// Index into the owning model's materials.
    pub material: usize,
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct MaterialUniform {
    base_color: [f32; 4],
}

/// Base colour times an optional surface map.
///
/// Mutations only touch the CPU side and raise `needs_update`; the uniform
/// and bind group are rebuilt by [`write_to_buffer`](Self::write_to_buffer)
/// before the next draw.
#[derive(Debug)]
pub struct Material {
    pub name: String,
    /// Linear RGB.
    base_color: [f32; 3],
    map: Option<Texture>,
    needs_update: bool,
    // Sampled when no map is assigned.
    placeholder: Texture,
    layout: wgpu::BindGroupLayout,
    buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

impl Material {
    pub fn new(
        device: &wgpu::Device,
        name: &str,
        base_color: [f32; 3],
        map: Option<Texture>,
        placeholder: Texture,
        layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let uniform = MaterialUniform {
            base_color: [base_color[0], base_color[1], base_color[2], 1.0],
        };
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{name} Material Buffer")),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = mk_bind_group(
            device,
            name,
            layout,
            map.as_ref().unwrap_or(&placeholder),
            &buffer,
        );
        Self {
            name: name.to_string(),
            base_color,
            map,
            needs_update: false,
            placeholder,
            layout: layout.clone(),
            buffer,
            bind_group,
        }
    }

    /// Upload pending changes, if any.
    pub fn write_to_buffer(&mut self, queue: &wgpu::Queue, device: &wgpu::Device) {
        if !self.needs_update {
            return;
        }
        let [r, g, b] = self.base_color;
        let uniform = MaterialUniform {
            base_color: [r, g, b, 1.0],
        };
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[uniform]));
        self.bind_group = mk_bind_group(
            device,
            &self.name,
            &self.layout,
            self.map.as_ref().unwrap_or(&self.placeholder),
            &self.buffer,
        );
        self.needs_update = false;
    }
}

impl Surface for Material {
    type Map = Texture;

    fn set_base_color(&mut self, color: Rgb) {
        self.base_color = color.to_linear();
    }

    fn clear_map(&mut self) {
        self.map = None;
    }

    fn set_map(&mut self, map: Texture) {
        self.map = Some(map);
    }

    fn mark_needs_update(&mut self) {
        self.needs_update = true;
    }
}

fn mk_bind_group(
    device: &wgpu::Device,
    name: &str,
    layout: &wgpu::BindGroupLayout,
    texture: &Texture,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    let sampler = match &texture.sampler {
        Some(sampler) => sampler.clone(),
        None => crate::data_structures::texture::create_default_sampler(device),
    };
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&sampler),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: buffer.as_entire_binding(),
            },
        ],
        label: Some(name),
    })
}

#[derive(Debug)]
pub struct Model {
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
}

pub trait DrawModel<'a> {
    fn draw_mesh_instanced(
        &mut self,
        mesh: &'a Mesh,
        material: &'a Material,
        instances: Range<u32>,
        camera_bind_group: &'a wgpu::BindGroup,
        light_bind_group: &'a wgpu::BindGroup,
    );

    fn draw_model_instanced(
        &mut self,
        model: &'a Model,
        instances: Range<u32>,
        camera_bind_group: &'a wgpu::BindGroup,
        light_bind_group: &'a wgpu::BindGroup,
    );
}

impl<'a, 'b> DrawModel<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh_instanced(
        &mut self,
        mesh: &'b Mesh,
        material: &'b Material,
        instances: Range<u32>,
        camera_bind_group: &'b wgpu::BindGroup,
        light_bind_group: &'b wgpu::BindGroup,
    ) {
        self.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        self.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.set_bind_group(0, &material.bind_group, &[]);
        self.set_bind_group(1, camera_bind_group, &[]);
        self.set_bind_group(2, light_bind_group, &[]);
        self.draw_indexed(0..mesh.num_elements, 0, instances);
    }

    fn draw_model_instanced(
        &mut self,
        model: &'b Model,
        instances: Range<u32>,
        camera_bind_group: &'b wgpu::BindGroup,
        light_bind_group: &'b wgpu::BindGroup,
    ) {
        for mesh in &model.meshes {
            let Some(material) = model.materials.get(mesh.material) else {
                log::warn!("Mesh {} references a missing material", mesh.name);
                continue;
            };
            self.draw_mesh_instanced(
                mesh,
                material,
                instances.clone(),
                camera_bind_group,
                light_bind_group,
            );
        }
    }
}
